//! Owned, contiguous 8-bit sample buffers.

use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

use crate::error::ElaError;

/// An interleaved 8-bit raster with explicit shape.
///
/// Source, recompressed and ELA images are each a separate `Raster`; no
/// buffer is shared between stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    channels: u8,
    samples: Vec<u8>,
}

impl Raster {
    /// Build a raster from raw interleaved samples.
    ///
    /// Fails with [`ElaError::InvalidImage`] if either dimension is zero, the
    /// channel count is not 1-4, or `samples` is not exactly
    /// `width * height * channels` long.
    pub fn new(width: u32, height: u32, channels: u8, samples: Vec<u8>) -> Result<Self, ElaError> {
        if width == 0 || height == 0 {
            return Err(ElaError::InvalidImage(format!(
                "image has zero size ({}x{})",
                width, height
            )));
        }
        if !(1..=4).contains(&channels) {
            return Err(ElaError::InvalidImage(format!(
                "unsupported channel count {}",
                channels
            )));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels as usize))
            .ok_or_else(|| {
                ElaError::InvalidImage(format!("image too large ({}x{})", width, height))
            })?;
        if samples.len() != expected {
            return Err(ElaError::InvalidImage(format!(
                "expected {} samples for {}x{}x{}, got {}",
                expected,
                width,
                height,
                channels,
                samples.len()
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Convert any decoded image to 3-channel 8-bit RGB.
    ///
    /// Alpha is dropped, grayscale is expanded and palette or 16-bit images
    /// are flattened, which is the precondition for JPEG recompression.
    pub fn from_rgb_image(image: &DynamicImage) -> Result<Self, ElaError> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::new(width, height, 3, rgb.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Samples per pixel.
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Interleaved samples, row-major.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Sample at pixel `(x, y)`, channel `c`. Returns `None` out of bounds.
    pub fn sample(&self, x: u32, y: u32, c: u8) -> Option<u8> {
        if x >= self.width || y >= self.height || c >= self.channels {
            return None;
        }
        let index = (y as usize * self.width as usize + x as usize) * self.channels as usize
            + c as usize;
        self.samples.get(index).copied()
    }

    /// Largest sample value in the buffer.
    pub fn max_sample(&self) -> u8 {
        self.samples.iter().copied().max().unwrap_or(0)
    }

    /// Whether `other` has the same width, height and channel count.
    pub fn same_shape(&self, other: &Raster) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }

    pub(crate) fn color_type(&self) -> ExtendedColorType {
        match self.channels {
            1 => ExtendedColorType::L8,
            2 => ExtendedColorType::La8,
            3 => ExtendedColorType::Rgb8,
            _ => ExtendedColorType::Rgba8,
        }
    }

    /// Encode the raster as a lossless PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, ElaError> {
        let mut buffer = Vec::new();
        PngEncoder::new(&mut buffer)
            .write_image(&self.samples, self.width, self.height, self.color_type())
            .map_err(|e| ElaError::Encode(e.to_string()))?;
        Ok(buffer)
    }
}
