//! Error Level Analysis (ELA).
//!
//! ELA re-encodes an image as JPEG at a known quality and visualizes how far
//! each sample moved. Regions that were already compressed at that quality
//! barely change; regions pasted in from another source, or re-saved at a
//! different quality, change more and show up brighter.
//!
//! ```text
//! source ── JPEG(q) ──► recompressed
//!    └──────── |source - recompressed| ──► diff ── × scale, clamp 255 ──► ELA
//! ```
//!
//! Everything here is synchronous, allocation-local and free of I/O, so
//! independent calls can run in parallel without coordination.

mod raster;

pub use raster::Raster;

use image::codecs::jpeg::JpegEncoder;
use image::{GenericImageView, ImageFormat};

use crate::error::ElaError;

/// JPEG quality used when none is configured.
pub const DEFAULT_QUALITY: u8 = 90;

/// Largest width or height a baseline JPEG frame can describe.
pub const MAX_JPEG_DIMENSION: u32 = 65535;

/// Result of an error level analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ElaImage {
    raster: Raster,
    quality: u8,
    max_diff: u8,
    scale: f64,
}

impl ElaImage {
    /// Build the ELA visualization from a source raster and its recompressed
    /// counterpart.
    ///
    /// With `scale = None` the contrast is stretched so the largest
    /// difference maps to 255. When no sample changed at all the effective
    /// scale is 1 and the output is black.
    pub fn from_pair(
        source: &Raster,
        recompressed: &Raster,
        quality: u8,
        scale: Option<u32>,
    ) -> Result<Self, ElaError> {
        let diff = difference(source, recompressed)?;
        let max_diff = diff.max_sample();
        let scale = effective_scale(max_diff, scale);

        let samples = diff
            .samples()
            .iter()
            .map(|&d| scale_sample(d, scale))
            .collect();
        let raster = Raster::new(diff.width(), diff.height(), diff.channels(), samples)?;

        Ok(Self {
            raster,
            quality,
            max_diff,
            scale,
        })
    }

    /// The scaled visualization.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// JPEG quality the source was recompressed at.
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Largest unscaled difference over all samples.
    pub fn max_diff(&self) -> u8 {
        self.max_diff
    }

    /// Multiplier applied to every difference.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    /// Encode the visualization as PNG for display or embedding.
    pub fn to_png(&self) -> Result<Vec<u8>, ElaError> {
        self.raster.to_png()
    }
}

/// Run error level analysis on `image`.
///
/// `quality` must be in `1..=100`. Lower qualities amplify tampering but also
/// amplify ordinary high-frequency content such as text and fine texture;
/// 85-95 is the usual range.
///
/// The image must be 8-bit grayscale or RGB. Convert other layouts with
/// [`Raster::from_rgb_image`] first, otherwise this fails with
/// [`ElaError::UnsupportedFormat`].
pub fn compute_ela(image: &Raster, quality: u8, scale: Option<u32>) -> Result<ElaImage, ElaError> {
    let recompressed = recompress(image, quality)?;
    ElaImage::from_pair(image, &recompressed, quality, scale)
}

/// Round-trip `image` through an in-memory JPEG at `quality`.
///
/// The result always has the same width, height and channel count as the
/// input.
pub fn recompress(image: &Raster, quality: u8) -> Result<Raster, ElaError> {
    if !(1..=100).contains(&quality) {
        return Err(ElaError::InvalidQuality(quality));
    }
    if !matches!(image.channels(), 1 | 3) {
        return Err(ElaError::UnsupportedFormat(format!(
            "{} channel images cannot be JPEG encoded; convert to RGB first",
            image.channels()
        )));
    }
    if image.width() > MAX_JPEG_DIMENSION || image.height() > MAX_JPEG_DIMENSION {
        return Err(ElaError::UnsupportedFormat(format!(
            "JPEG cannot encode images larger than {} px",
            MAX_JPEG_DIMENSION
        )));
    }

    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, quality)
        .encode(
            image.samples(),
            image.width(),
            image.height(),
            image.color_type(),
        )
        .map_err(|e| ElaError::Encode(e.to_string()))?;

    let decoded = image::load_from_memory_with_format(&encoded, ImageFormat::Jpeg)
        .map_err(|e| ElaError::Decode(e.to_string()))?;

    let (width, height) = decoded.dimensions();
    if (width, height) != image.dimensions() {
        return Err(ElaError::DimensionMismatch {
            expected_width: image.width(),
            expected_height: image.height(),
            actual_width: width,
            actual_height: height,
        });
    }

    let samples = if image.channels() == 1 {
        decoded.into_luma8().into_raw()
    } else {
        decoded.into_rgb8().into_raw()
    };
    Raster::new(width, height, image.channels(), samples)
}

/// Per-sample absolute difference of two rasters of identical shape.
pub fn difference(a: &Raster, b: &Raster) -> Result<Raster, ElaError> {
    if !a.same_shape(b) {
        return Err(ElaError::DimensionMismatch {
            expected_width: a.width(),
            expected_height: a.height(),
            actual_width: b.width(),
            actual_height: b.height(),
        });
    }

    let samples = a
        .samples()
        .iter()
        .zip(b.samples())
        .map(|(&x, &y)| x.abs_diff(y))
        .collect();
    Raster::new(a.width(), a.height(), a.channels(), samples)
}

/// Resolve the multiplier for a given maximum difference.
fn effective_scale(max_diff: u8, requested: Option<u32>) -> f64 {
    if max_diff == 0 {
        return 1.0;
    }
    match requested {
        Some(scale) => f64::from(scale),
        None => 255.0 / f64::from(max_diff),
    }
}

fn scale_sample(diff: u8, scale: f64) -> u8 {
    (f64::from(diff) * scale).round().min(255.0) as u8
}
