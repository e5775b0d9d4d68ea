//! Unified error types for Pinpoint

use thiserror::Error;

/// Unified error type for all Pinpoint operations
#[derive(Error, Debug)]
pub enum PinpointError {
    // DOM errors
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Node is not an element: {0}")]
    NotAnElement(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    // Persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

/// Result type alias using PinpointError
pub type Result<T> = std::result::Result<T, PinpointError>;
