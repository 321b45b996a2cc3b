// Domain layer - GPS points, trips and the math behind them
pub mod geo;
pub mod point;
pub mod timestamp;
pub mod trip;
