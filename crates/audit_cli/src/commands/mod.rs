pub mod audit;
pub mod baseline;
pub mod check;
