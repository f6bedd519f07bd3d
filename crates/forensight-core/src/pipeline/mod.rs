//! Analysis pipeline components.
//!
//! This module contains the collaborators around the ELA core:
//! - **validate**: Extension, size and magic-byte checks; filename sanitization
//! - **decode**: Load and decode JPEG/PNG images with limits and timeout
//! - **metadata**: Extract EXIF metadata
//! - **hash**: Cryptographic digests and perceptual hashes
//! - **thumbnail**: Embedded EXIF thumbnail analysis
//! - **analyzer**: Orchestrates the full analysis

pub mod analyzer;
pub mod decode;
pub mod hash;
pub mod metadata;
pub mod thumbnail;
pub mod validate;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-exports for convenient access
pub use analyzer::{AnalyzeOptions, ForensicAnalyzer};
pub use decode::{DecodedImage, ImageDecoder};
pub use hash::Hasher;
pub use metadata::MetadataExtractor;
pub use thumbnail::ThumbnailInspector;
pub use validate::{sanitize_filename, Validator};
