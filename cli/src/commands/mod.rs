pub mod chain;
pub mod splits;
