//! Error types for imping-geo

use std::io;
use thiserror::Error;

/// Result type for imping-geo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in imping-geo operations
#[derive(Error, Debug)]
pub enum Error {
    /// Coordinate outside the valid domain of its reference system
    #[error("Coordinate out of range: {axis} = {value} (valid range {min}..={max})")]
    OutOfRangeCoordinate {
        axis: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// No usable measurements left for an interpolation query
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Rejected interpolation parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// First failing element of a batch operation
    #[error("Batch element {index} failed: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// Raw coordinate field that could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Required CSV column is absent
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    /// Wraps an element error with its position in the batch
    pub fn at_index(index: usize, source: Error) -> Self {
        Error::Batch {
            index,
            source: Box::new(source),
        }
    }

    /// Returns the innermost error, looking through batch wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::Batch { source, .. } => source.root(),
            other => other,
        }
    }
}
