pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod reporting;
pub mod types;
