//! # Error Types
//!
//! This module defines error types used throughout the microview library.

use thiserror::Error;

/// Main error type for microview operations
#[derive(Debug, Error)]
pub enum MicroViewError {
    /// Transport-level errors (open, configure, write, close)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed command text
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Operation attempted on a closed session or transport
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Preview image error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
