//! Core data types for the Forensight analysis pipeline.
//!
//! These types represent the report produced by analyzing one image.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The complete forensic report for an analyzed image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForensicReport {
    // === File Identification ===
    /// Sanitized filename of the analyzed file
    pub file_name: String,

    /// File size in bytes
    pub file_size: u64,

    /// Detected format ("jpeg" or "png")
    pub format: String,

    // === Image Properties ===
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    // === Findings ===
    /// Extracted EXIF metadata
    pub metadata: MetadataReport,

    /// Digests of the original file bytes
    pub hashes: FileHashes,

    /// Error level analysis result
    pub ela: ElaSummary,

    /// Embedded EXIF thumbnail analysis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_analysis: Option<ThumbnailAnalysis>,
}

/// EXIF metadata, or a status explaining why there is none.
///
/// Serializes as a flat map: `{"Status": "No EXIF data found."}` or
/// `{"Make": "Canon", "DateTime": "2024:01:01 10:00:00", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataReport {
    Status {
        #[serde(rename = "Status")]
        status: String,
    },
    Fields(BTreeMap<String, String>),
}

impl MetadataReport {
    pub const NO_EXIF: &'static str = "No EXIF data found.";
    pub const NO_READABLE_TAGS: &'static str = "No readable EXIF tags found.";

    pub fn status(message: impl Into<String>) -> Self {
        Self::Status {
            status: message.into(),
        }
    }

    /// Look up an extracted field by its EXIF tag name.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            Self::Fields(fields) => fields.get(key).map(String::as_str),
            Self::Status { .. } => None,
        }
    }
}

/// Hex-encoded digests of the original file bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHashes {
    #[serde(rename = "MD5")]
    pub md5: String,

    #[serde(rename = "SHA-1")]
    pub sha1: String,

    #[serde(rename = "SHA-256")]
    pub sha256: String,

    #[serde(rename = "BLAKE3")]
    pub blake3: String,
}

/// Error level analysis output, ready for transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElaSummary {
    /// JPEG quality used for recompression
    pub quality: u8,

    /// Effective contrast multiplier
    pub scale: f64,

    /// Largest raw difference before scaling (0-255)
    pub max_diff: u8,

    /// Base64-encoded PNG of the visualization
    pub image_png_base64: String,
}

impl ElaSummary {
    /// Decode the embedded visualization back to PNG bytes.
    pub fn png_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.image_png_base64)
    }
}

/// Outcome of looking for an embedded EXIF thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailStatus {
    Found,
    NoExif,
    NoThumbnail,
    Error,
}

/// Embedded thumbnail analysis.
///
/// Cameras write a small preview into EXIF at capture time. Editors often
/// update the main image without regenerating it, so a thumbnail that no
/// longer resembles the image is a strong modification signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailAnalysis {
    pub status: ThumbnailStatus,

    /// Human-readable explanation of the status
    pub message: String,

    /// Base64-encoded PNG of the extracted thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_png_base64: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Hamming distance between perceptual hashes of thumbnail and image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perceptual_distance: Option<u32>,
}

impl ThumbnailAnalysis {
    /// An analysis that found no usable thumbnail.
    pub fn without_thumbnail(status: ThumbnailStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            thumbnail_png_base64: None,
            width: None,
            height: None,
            perceptual_distance: None,
        }
    }
}
