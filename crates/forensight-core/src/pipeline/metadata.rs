//! EXIF metadata extraction from images.

use exif::{Exif, In, Reader, Tag, Value};
use std::collections::BTreeMap;
use std::io::Cursor;

use crate::types::MetadataReport;

/// Tags reported from IFD0, in the order they are looked up.
const GENERAL_TAGS: [(Tag, &str); 4] = [
    (Tag::Make, "Make"),
    (Tag::Model, "Model"),
    (Tag::Software, "Software"),
    (Tag::DateTime, "DateTime"),
];

/// Tags reported from the Exif sub-IFD.
const EXIF_TAGS: [(Tag, &str); 4] = [
    (Tag::DateTimeOriginal, "DateTimeOriginal"),
    (Tag::DateTimeDigitized, "DateTimeDigitized"),
    (Tag::PixelXDimension, "PixelXDimension"),
    (Tag::PixelYDimension, "PixelYDimension"),
];

/// Extracts EXIF metadata from image bytes.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Parse the EXIF block of a JPEG or PNG held in memory.
    pub fn read(bytes: &[u8]) -> Result<Exif, exif::Error> {
        Reader::new().read_from_container(&mut Cursor::new(bytes))
    }

    /// Extract the forensic metadata fields from image bytes.
    ///
    /// Never fails: a missing EXIF block or an unreadable one is reported as
    /// a status or an `Error` entry instead.
    pub fn extract_from_bytes(bytes: &[u8]) -> MetadataReport {
        Self::from_result(&Self::read(bytes))
    }

    /// Summarize an EXIF parse result.
    pub fn from_result(result: &Result<Exif, exif::Error>) -> MetadataReport {
        match result {
            Ok(exif) => Self::summarize(exif),
            Err(exif::Error::NotFound(_)) => MetadataReport::status(MetadataReport::NO_EXIF),
            Err(e) => {
                let mut fields = BTreeMap::new();
                fields.insert(
                    "Error".to_string(),
                    format!("Could not read metadata: {}", e),
                );
                MetadataReport::Fields(fields)
            }
        }
    }

    /// Collect the fields present in a parsed EXIF block.
    pub fn summarize(exif: &Exif) -> MetadataReport {
        let mut fields = BTreeMap::new();

        if exif.get_field(Tag::GPSLatitude, In::PRIMARY).is_some() {
            let coordinates = Self::get_gps_coordinates(exif)
                .unwrap_or_else(|e| format!("Error processing GPS data: {}", e));
            fields.insert("GPS_Coordinates".to_string(), coordinates);
        }

        for (tag, name) in GENERAL_TAGS.iter().chain(EXIF_TAGS.iter()) {
            if let Some(value) = Self::get_value(exif, *tag) {
                fields.insert(name.to_string(), value);
            }
        }

        if fields.is_empty() {
            MetadataReport::status(MetadataReport::NO_READABLE_TAGS)
        } else {
            MetadataReport::Fields(fields)
        }
    }

    /// Render a field as text, skipping empty strings and zero values.
    fn get_value(exif: &Exif, tag: Tag) -> Option<String> {
        let field = exif.get_field(tag, In::PRIMARY)?;
        let value = match &field.value {
            Value::Ascii(parts) => {
                let raw = parts.first()?;
                String::from_utf8_lossy(raw)
                    .trim_matches('\0')
                    .trim()
                    .to_string()
            }
            Value::Short(v) => v.first().filter(|&&x| x != 0)?.to_string(),
            Value::Long(v) => v.first().filter(|&&x| x != 0)?.to_string(),
            _ => field.display_value().to_string(),
        };
        (!value.is_empty()).then_some(value)
    }

    /// Format GPS latitude and longitude as `"lat, lon"` in decimal degrees.
    fn get_gps_coordinates(exif: &Exif) -> Result<String, String> {
        let lat = Self::get_gps_coord(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
        let lon = Self::get_gps_coord(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef)?;
        Ok(format!("{}, {}", lat, lon))
    }

    /// Get GPS coordinate, converting from degrees/minutes/seconds to decimal.
    fn get_gps_coord(exif: &Exif, coord_tag: Tag, ref_tag: Tag) -> Result<f64, String> {
        let coord = exif
            .get_field(coord_tag, In::PRIMARY)
            .ok_or_else(|| format!("missing {}", coord_tag))?;
        let reference = exif
            .get_field(ref_tag, In::PRIMARY)
            .ok_or_else(|| format!("missing {}", ref_tag))?;

        let degrees = Self::parse_gps_rationals(&coord.value)
            .ok_or_else(|| format!("{} is not three rationals", coord_tag))?;
        let ref_str = reference.display_value().to_string();

        // S and W are negative
        let sign = if ref_str.contains('S') || ref_str.contains('W') {
            -1.0
        } else {
            1.0
        };

        Ok(sign * degrees)
    }

    /// Parse GPS rationals (degrees, minutes, seconds) to decimal degrees.
    fn parse_gps_rationals(value: &Value) -> Option<f64> {
        match value {
            Value::Rational(rationals) if rationals.len() >= 3 => {
                if rationals[..3].iter().any(|r| r.denom == 0) {
                    return None;
                }
                let degrees = rationals[0].to_f64();
                let minutes = rationals[1].to_f64();
                let seconds = rationals[2].to_f64();
                Some(degrees + minutes / 60.0 + seconds / 3600.0)
            }
            _ => None,
        }
    }
}
