//! Error types for fxt-core

use thiserror::Error;

/// Main error type for fxt-core
#[derive(Error, Debug)]
pub enum FxtError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Time out of range: {0}")]
    OutOfRange(String),

    #[error("Odd length of bar data: {length} (not a multiple of {record_size} bytes)")]
    MalformedLength { length: usize, record_size: usize },

    #[error("Illegal data for bar[{index}]: O={open} H={high} L={low} C={close} V={ticks} T={time}")]
    InvalidRecord {
        index: usize,
        open: u32,
        high: u32,
        low: u32,
        close: u32,
        ticks: u32,
        time: String,
    },

    #[error("Not implemented: {0}")]
    Unimplemented(&'static str),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type alias for fxt-core operations
pub type Result<T> = std::result::Result<T, FxtError>;
