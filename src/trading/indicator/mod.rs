pub mod statistics;
pub mod technical;
