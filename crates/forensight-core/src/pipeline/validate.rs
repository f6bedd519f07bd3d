//! Input validation before analysis.
//!
//! Only JPEG and PNG files are accepted. Both the extension and the leading
//! magic bytes must agree that the file is one of those.

use image::ImageFormat;
use std::io::Read;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// File extensions accepted for analysis (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Validates files before analysis.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation before reading the whole file.
    ///
    /// Checks:
    /// - Extension is one of [`ALLOWED_EXTENSIONS`]
    /// - File exists and is readable
    /// - File size is within limits
    /// - File starts with JPEG or PNG magic bytes
    ///
    /// Returns the format the magic bytes identify.
    pub fn validate(&self, path: &Path) -> Result<ImageFormat, PipelineError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_allowed_file(&file_name) {
            return Err(PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: extension_of(&file_name).unwrap_or("none").to_string(),
            });
        }

        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read metadata: {}", e),
        })?;

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        self.check_magic_bytes(path)
    }

    /// Check file magic bytes to verify it's a JPEG or PNG.
    fn check_magic_bytes(&self, path: &Path) -> Result<ImageFormat, PipelineError> {
        let mut file = std::fs::File::open(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot open file: {}", e),
        })?;

        let mut header = [0u8; 8];
        let bytes_read = file.read(&mut header).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read header: {}", e),
        })?;

        if bytes_read < 4 {
            return Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: "File too small to be a valid image".to_string(),
            });
        }

        sniff_format(&header[..bytes_read]).ok_or_else(|| PipelineError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: "unrecognized (expected JPEG or PNG)".to_string(),
        })
    }
}

/// Identify JPEG or PNG from leading bytes.
pub fn sniff_format(header: &[u8]) -> Option<ImageFormat> {
    // JPEG: FF D8 FF
    if header.len() >= 3 && header[..3] == [0xFF, 0xD8, 0xFF] {
        return Some(ImageFormat::Jpeg);
    }

    // PNG: 89 50 4E 47
    if header.len() >= 4 && header[..4] == [0x89, b'P', b'N', b'G'] {
        return Some(ImageFormat::Png);
    }

    None
}

/// Whether a filename carries one of the allowed extensions.
pub fn is_allowed_file(file_name: &str) -> bool {
    extension_of(file_name)
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn extension_of(file_name: &str) -> Option<&str> {
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

/// Reduce a user-supplied filename to a safe, flat ASCII name.
///
/// Non-ASCII characters are dropped, path separators become spaces, runs of
/// whitespace become `_`, anything outside `[A-Za-z0-9_.-]` is removed and
/// leading or trailing `.`/`_` are stripped. `"../../etc/passwd"` becomes
/// `"etc_passwd"`.
pub fn sanitize_filename(file_name: &str) -> Result<String, PipelineError> {
    let ascii: String = file_name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let sanitized = filtered.trim_matches(|c| c == '.' || c == '_');
    if sanitized.is_empty() {
        return Err(PipelineError::InvalidFilename(file_name.to_string()));
    }
    Ok(sanitized.to_string())
}

/// File stem of a sanitized name (`"holiday.photo.jpg"` → `"holiday.photo"`).
pub fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}
