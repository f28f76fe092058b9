//! Error types for NodeCut.
//!
//! Transient conditions inside the evaluation path (missing footage, no
//! decoder, no frame) are never errors; they resolve to empty values. The
//! variants here cover contract violations and resource failures outside
//! that boundary.

use thiserror::Error;

/// Main error type for NodeCut operations.
#[derive(Error, Debug)]
pub enum NodecutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("illegal state: {0}")]
    IllegalState(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("incompatible connection: {0}")]
    IncompatibleConnection(String),

    #[error("media error: {0}")]
    Media(String),

    #[error("color error: {0}")]
    Color(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for NodeCut operations.
pub type Result<T> = std::result::Result<T, NodecutError>;
