// CSV point source - reads raw records from a delimited file with a header row
use crate::application::trip_io::PointSource;
use crate::domain::point::RawRecord;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CsvPointSource {
    path: PathBuf,
}

impl CsvPointSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointSource for CsvPointSource {
    fn load_records(&self) -> Result<Vec<RawRecord>> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Failed to open input file {}", self.path.display()))?;

        let records = read_records(file)
            .with_context(|| format!("Failed to read input file {}", self.path.display()))?;

        tracing::debug!("Read {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

/// Short rows leave trailing columns out of the record, extra cells are dropped.
/// Cells that are not valid UTF-8 are kept lossily and marked, so the row is
/// rejected by validation instead of failing the whole read.
fn read_records<R: Read>(input: R) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let mut records = Vec::new();
    for row in reader.byte_records() {
        let row = row?;
        let mut record = RawRecord::new();
        for (name, cell) in headers.iter().zip(row.iter()) {
            match std::str::from_utf8(cell) {
                Ok(value) => record.insert(name.as_str(), value),
                Err(_) => record.insert_undecodable(name.as_str(), String::from_utf8_lossy(cell)),
            }
        }
        records.push(record);
    }

    Ok(records)
}
