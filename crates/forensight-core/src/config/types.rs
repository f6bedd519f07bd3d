//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ela::DEFAULT_QUALITY;

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Error level analysis timeout in milliseconds
    pub ela_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 16,
            max_image_dimension: 10000,
            decode_timeout_ms: 5000,
            ela_timeout_ms: 30000,
        }
    }
}

/// Error level analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElaConfig {
    /// JPEG quality used for recompression (1-100)
    pub quality: u8,

    /// Fixed contrast multiplier. When unset, the largest difference is
    /// stretched to full intensity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

impl Default for ElaConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            scale: None,
        }
    }
}

/// Embedded thumbnail analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Whether to extract and compare the EXIF thumbnail
    pub enabled: bool,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Directory for report files when no explicit output path is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
            report_dir: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
