//! Error types for the Forensight analysis pipeline.
//!
//! Errors are organized by stage so that a failed analysis names the file,
//! the stage that failed and the specific issue.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Forensight operations.
#[derive(Error, Debug)]
pub enum ForensightError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Error level analysis errors outside of a file pipeline
    #[error("ELA error: {0}")]
    Ela(#[from] ElaError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Operation timed out
    #[error("Timeout in {stage} stage for {path} after {timeout_ms}ms")]
    Timeout {
        path: PathBuf,
        stage: String,
        timeout_ms: u64,
    },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Only JPEG and PNG inputs are accepted
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Filename has nothing left after sanitization
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Error level analysis failed
    #[error("Error level analysis failed for {path}: {source}")]
    Ela {
        path: PathBuf,
        #[source]
        source: ElaError,
    },
}

/// Failures of the error level analysis core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElaError {
    /// Raster is empty or its sample buffer does not match its shape
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Color layout cannot be recompressed as JPEG without conversion
    #[error("Unsupported color format: {0}")]
    UnsupportedFormat(String),

    /// JPEG quality outside 1..=100
    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    /// Recompressed raster does not match the source shape
    #[error(
        "Recompressed image is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// The in-memory JPEG encode failed
    #[error("JPEG encode failed: {0}")]
    Encode(String),

    /// The in-memory JPEG decode failed
    #[error("JPEG decode failed: {0}")]
    Decode(String),
}

/// Convenience type alias for Forensight results.
pub type Result<T> = std::result::Result<T, ForensightError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
