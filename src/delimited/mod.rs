//! Delimited text (CSV) sources.

mod config;
mod service;

pub use config::{CsvConf, DEFAULT_DELIMITER};
pub use service::{CsvSourceService, decode_records};
