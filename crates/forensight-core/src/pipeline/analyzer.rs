//! Analysis orchestration - wires together all stages into a report.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::DynamicImage;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::config::{Config, ElaConfig, LimitsConfig};
use crate::ela::{compute_ela, ElaImage, Raster};
use crate::error::{ElaError, PipelineError, PipelineResult, Result};
use crate::types::{ElaSummary, ForensicReport};

use super::decode::{format_to_string, ImageDecoder};
use super::hash::Hasher;
use super::metadata::MetadataExtractor;
use super::thumbnail::ThumbnailInspector;
use super::validate::{sanitize_filename, Validator};

/// Options for controlling a single analysis.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Skip embedded thumbnail analysis
    pub skip_thumbnail: bool,
}

/// The main analyzer that orchestrates the full pipeline.
pub struct ForensicAnalyzer {
    validator: Validator,
    decoder: ImageDecoder,
    thumbnails: ThumbnailInspector,
    ela: ElaConfig,
    limits: LimitsConfig,
}

impl ForensicAnalyzer {
    /// Create a new analyzer with the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            validator: Validator::new(config.limits.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
            thumbnails: ThumbnailInspector::new(config.thumbnail.clone()),
            ela: config.ela.clone(),
            limits: config.limits.clone(),
        }
    }

    /// Analyze a single image with default options.
    pub async fn analyze(&self, path: &Path) -> Result<ForensicReport> {
        self.analyze_with_options(path, &AnalyzeOptions::default())
            .await
    }

    /// Analyze a single image with custom options.
    pub async fn analyze_with_options(
        &self,
        path: &Path,
        options: &AnalyzeOptions,
    ) -> Result<ForensicReport> {
        let start = Instant::now();
        tracing::debug!("Analyzing: {:?}", path);

        // Validate
        self.validator.validate(path)?;
        let file_name = sanitize_filename(&path.file_name().unwrap_or_default().to_string_lossy())?;
        tracing::trace!("  Validate: {:?}", start.elapsed());

        // Read once; hashing, metadata and decoding share the buffer
        let bytes = tokio::fs::read(path).await?;

        let hash_start = Instant::now();
        let hashes = Hasher::file_hashes(&bytes);
        tracing::trace!("  Hashes: {:?}", hash_start.elapsed());

        let metadata_start = Instant::now();
        let exif = MetadataExtractor::read(&bytes);
        let metadata = MetadataExtractor::from_result(&exif);
        tracing::trace!("  Metadata: {:?}", metadata_start.elapsed());

        let decode_start = Instant::now();
        let decoded = self.decoder.decode_from_bytes(bytes, path).await?;
        tracing::trace!("  Decode: {:?}", decode_start.elapsed());

        let thumb_start = Instant::now();
        let thumbnail_analysis = if options.skip_thumbnail {
            None
        } else {
            self.thumbnails.inspect(&exif, &decoded.image)
        };
        tracing::trace!("  Thumbnail: {:?}", thumb_start.elapsed());

        let ela_start = Instant::now();
        let ela = self.run_ela(decoded.image, path).await?;
        let ela_png = ela.to_png().map_err(|source| PipelineError::Ela {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::trace!("  ELA: {:?}", ela_start.elapsed());

        tracing::debug!(
            "Analyzed {:?} in {:?} ({}x{}, max ELA difference {})",
            file_name,
            start.elapsed(),
            decoded.width,
            decoded.height,
            ela.max_diff()
        );

        Ok(ForensicReport {
            file_name,
            file_size: decoded.file_size,
            format: format_to_string(decoded.format),
            width: decoded.width,
            height: decoded.height,
            metadata,
            hashes,
            ela: ElaSummary {
                quality: ela.quality(),
                scale: ela.scale(),
                max_diff: ela.max_diff(),
                image_png_base64: BASE64.encode(ela_png),
            },
            thumbnail_analysis,
        })
    }

    /// Validate, decode and run only error level analysis on a file.
    pub async fn ela_only(&self, path: &Path) -> Result<ElaImage> {
        self.validator.validate(path)?;
        let bytes = tokio::fs::read(path).await?;
        let decoded = self.decoder.decode_from_bytes(bytes, path).await?;
        Ok(self.run_ela(decoded.image, path).await?)
    }

    /// Convert to RGB and run error level analysis off the async runtime.
    pub async fn run_ela(&self, image: DynamicImage, path: &Path) -> PipelineResult<ElaImage> {
        let quality = self.ela.quality;
        let scale = self.ela.scale;
        let timeout_duration = Duration::from_millis(self.limits.ela_timeout_ms);

        // A timed-out task is not cancelled: it finishes on the blocking
        // pool and its result is dropped.
        let result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || -> std::result::Result<ElaImage, ElaError> {
                let raster = Raster::from_rgb_image(&image)?;
                compute_ela(&raster, quality, scale)
            })
            .await
        })
        .await;

        match result {
            Ok(Ok(Ok(ela))) => Ok(ela),
            Ok(Ok(Err(source))) => Err(PipelineError::Ela {
                path: path.to_path_buf(),
                source,
            }),
            Ok(Err(e)) => Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Task join error: {}", e),
            }),
            Err(_) => Err(PipelineError::Timeout {
                path: path.to_path_buf(),
                stage: "ela".to_string(),
                timeout_ms: self.limits.ela_timeout_ms,
            }),
        }
    }

    /// Check if embedded thumbnail analysis is enabled.
    pub fn thumbnails_enabled(&self) -> bool {
        self.thumbnails.is_enabled()
    }

    /// The ELA settings this analyzer applies.
    pub fn ela_config(&self) -> &ElaConfig {
        &self.ela
    }
}
