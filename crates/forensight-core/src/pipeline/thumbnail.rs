//! Embedded EXIF thumbnail extraction and comparison.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use exif::{Exif, In, Tag, Value};
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use super::hash::Hasher;
use crate::config::ThumbnailConfig;
use crate::types::{ThumbnailAnalysis, ThumbnailStatus};

/// Extracts the preview image cameras embed in EXIF and compares it with
/// the main image.
pub struct ThumbnailInspector {
    config: ThumbnailConfig,
    hasher: Hasher,
}

impl ThumbnailInspector {
    /// Create a new inspector with the given configuration.
    pub fn new(config: ThumbnailConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Check if thumbnail analysis is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Analyze the embedded thumbnail of an image.
    ///
    /// Returns `None` when analysis is disabled. Missing or corrupt
    /// thumbnails are reported through the status, never as an error.
    pub fn inspect(
        &self,
        exif: &Result<Exif, exif::Error>,
        main_image: &DynamicImage,
    ) -> Option<ThumbnailAnalysis> {
        if !self.config.enabled {
            return None;
        }

        let exif = match exif {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => {
                return Some(ThumbnailAnalysis::without_thumbnail(
                    ThumbnailStatus::NoExif,
                    "No EXIF data found, so no thumbnail.",
                ))
            }
            Err(e) => {
                return Some(ThumbnailAnalysis::without_thumbnail(
                    ThumbnailStatus::Error,
                    format!("Error reading EXIF data: {}", e),
                ))
            }
        };

        let bytes = match embedded_thumbnail(exif) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                return Some(ThumbnailAnalysis::without_thumbnail(
                    ThumbnailStatus::NoThumbnail,
                    "No embedded thumbnail found.",
                ))
            }
            Err(message) => {
                return Some(ThumbnailAnalysis::without_thumbnail(
                    ThumbnailStatus::Error,
                    message,
                ))
            }
        };

        Some(self.analyze(bytes, main_image))
    }

    fn analyze(&self, bytes: &[u8], main_image: &DynamicImage) -> ThumbnailAnalysis {
        let thumbnail = match image::load_from_memory(bytes) {
            Ok(img) => img,
            Err(e) => {
                return ThumbnailAnalysis::without_thumbnail(
                    ThumbnailStatus::Error,
                    format!("Error decoding thumbnail: {}", e),
                )
            }
        };

        // PNG for lossless display
        let mut png = Cursor::new(Vec::new());
        if let Err(e) = thumbnail.write_to(&mut png, ImageFormat::Png) {
            return ThumbnailAnalysis::without_thumbnail(
                ThumbnailStatus::Error,
                format!("Error encoding thumbnail: {}", e),
            );
        }

        let (width, height) = thumbnail.dimensions();
        let distance = self.hasher.perceptual_distance(&thumbnail, main_image);
        tracing::debug!(
            "Embedded thumbnail {}x{}, perceptual distance {}",
            width,
            height,
            distance
        );

        ThumbnailAnalysis {
            status: ThumbnailStatus::Found,
            message: "Embedded thumbnail extracted. Compare it to the main image.".to_string(),
            thumbnail_png_base64: Some(BASE64.encode(png.into_inner())),
            width: Some(width),
            height: Some(height),
            perceptual_distance: Some(distance),
        }
    }
}

/// Locate the thumbnail JPEG inside the raw EXIF buffer.
///
/// Offsets in IFD1 are relative to the start of the TIFF header, which is
/// where `Exif::buf` begins.
fn embedded_thumbnail(exif: &Exif) -> Result<Option<&[u8]>, String> {
    let offset = exif.get_field(Tag::JPEGInterchangeFormat, In::THUMBNAIL);
    let length = exif.get_field(Tag::JPEGInterchangeFormatLength, In::THUMBNAIL);

    let (offset, length) = match (offset, length) {
        (Some(o), Some(l)) => (first_u32(&o.value), first_u32(&l.value)),
        _ => return Ok(None),
    };
    let (offset, length) = match (offset, length) {
        (Some(o), Some(l)) if l > 0 => (o as usize, l as usize),
        _ => return Ok(None),
    };

    let buf = exif.buf();
    offset
        .checked_add(length)
        .and_then(|end| buf.get(offset..end))
        .map(Some)
        .ok_or_else(|| {
            format!(
                "Thumbnail range {}+{} exceeds EXIF block of {} bytes",
                offset,
                length,
                buf.len()
            )
        })
}

fn first_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Long(v) => v.first().copied(),
        Value::Short(v) => v.first().map(|&x| x as u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::{ascii_field, encode, gradient, jpeg_with_exif, plain_jpeg};
    use crate::pipeline::metadata::MetadataExtractor;

    fn inspector() -> ThumbnailInspector {
        ThumbnailInspector::new(ThumbnailConfig::default())
    }

    #[test]
    fn test_disabled_returns_none() {
        let inspector = ThumbnailInspector::new(ThumbnailConfig { enabled: false });
        let exif = MetadataExtractor::read(&plain_jpeg(8, 8));
        assert!(inspector.inspect(&exif, &gradient(8, 8)).is_none());
    }

    #[test]
    fn test_no_exif() {
        let exif = MetadataExtractor::read(&plain_jpeg(8, 8));
        let analysis = inspector().inspect(&exif, &gradient(8, 8)).unwrap();
        assert_eq!(analysis.status, ThumbnailStatus::NoExif);
    }

    #[test]
    fn test_exif_without_thumbnail() {
        let bytes = jpeg_with_exif(&[ascii_field(Tag::Make, "Nikon")], None);
        let exif = MetadataExtractor::read(&bytes);
        let analysis = inspector().inspect(&exif, &gradient(64, 48)).unwrap();
        assert_eq!(analysis.status, ThumbnailStatus::NoThumbnail);
        assert!(analysis.thumbnail_png_base64.is_none());
    }

    #[test]
    fn test_found_thumbnail_is_png_and_close_to_main() {
        let main = gradient(64, 48);
        let thumb = encode(&main.thumbnail(16, 12), ImageFormat::Jpeg);
        let bytes = jpeg_with_exif(&[ascii_field(Tag::Make, "Nikon")], Some(&thumb));
        let exif = MetadataExtractor::read(&bytes);

        let analysis = inspector().inspect(&exif, &main).unwrap();
        assert_eq!(analysis.status, ThumbnailStatus::Found);
        assert_eq!(analysis.width, Some(16));
        assert_eq!(analysis.height, Some(12));

        let png = BASE64
            .decode(analysis.thumbnail_png_base64.unwrap())
            .unwrap();
        assert_eq!(&png[1..4], b"PNG");

        // A thumbnail of a different picture sits further from the main image
        let other = encode(&main.fliph().flipv().thumbnail(16, 12), ImageFormat::Jpeg);
        let bytes = jpeg_with_exif(&[ascii_field(Tag::Make, "Nikon")], Some(&other));
        let mismatched = inspector()
            .inspect(&MetadataExtractor::read(&bytes), &main)
            .unwrap();
        assert!(analysis.perceptual_distance.unwrap() < mismatched.perceptual_distance.unwrap());
    }

    #[test]
    fn test_corrupt_thumbnail_reports_error() {
        let garbage = vec![0xFF, 0xD8, 0xFF, 0x00, 0x01, 0x02, 0x03, 0x04];
        let bytes = jpeg_with_exif(&[ascii_field(Tag::Make, "Nikon")], Some(&garbage));
        let exif = MetadataExtractor::read(&bytes);

        let analysis = inspector().inspect(&exif, &gradient(64, 48)).unwrap();
        assert_eq!(analysis.status, ThumbnailStatus::Error);
        assert!(analysis.message.contains("thumbnail"));
    }
}
