//! Forensight Core - Embeddable image forensics library.
//!
//! Forensight takes a JPEG or PNG and produces a forensic report: EXIF
//! metadata, file digests, an Error Level Analysis (ELA) heatmap and an
//! analysis of the embedded EXIF thumbnail.
//!
//! # Architecture
//!
//! ```text
//! File → Validate → Hash → EXIF → Decode → Thumbnail → ELA → Report (JSON)
//! ```
//!
//! The ELA core in [`ela`] is a pure function over an in-memory raster and
//! can be used on its own.
//!
//! # Usage
//!
//! ```rust,ignore
//! use forensight_core::{Config, ForensicAnalyzer};
//!
//! #[tokio::main]
//! async fn main() -> forensight_core::Result<()> {
//!     let config = Config::load()?;
//!     let analyzer = ForensicAnalyzer::new(&config);
//!
//!     let report = analyzer.analyze("./image.jpg".as_ref()).await?;
//!     println!("SHA-256: {}", report.hashes.sha256);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod ela;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use ela::{compute_ela, ElaImage, Raster};
pub use error::{ConfigError, ElaError, ForensightError, PipelineError, PipelineResult, Result};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{AnalyzeOptions, ForensicAnalyzer};
pub use types::{FileHashes, ForensicReport, MetadataReport, ThumbnailAnalysis};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
