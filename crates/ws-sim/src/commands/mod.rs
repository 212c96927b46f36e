pub mod generate;
pub mod stats;
