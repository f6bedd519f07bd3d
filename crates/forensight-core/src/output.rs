//! Report output in JSON or JSON Lines form.

use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::pipeline::validate::file_stem;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object
    Json,
    /// One compact JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }

    /// File extension for reports in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::JsonLines => "jsonl",
        }
    }
}

/// A writer that serializes reports as JSON or JSONL.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects [`OutputFormat::Json`]; JSONL is always one
    /// object per line.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write a single item followed by a newline.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty && self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Path of the report for an analyzed file inside `dir`.
///
/// `"holiday.jpg"` becomes `<dir>/report_holiday.json`.
pub fn report_path(dir: &Path, sanitized_name: &str, format: OutputFormat) -> PathBuf {
    dir.join(format!(
        "report_{}.{}",
        file_stem(sanitized_name),
        format.extension()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Finding {
        name: String,
        max_diff: u8,
    }

    fn finding() -> Finding {
        Finding {
            name: "scan.png".to_string(),
            max_diff: 42,
        }
    }

    #[test]
    fn test_write_json() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer.write(&finding()).unwrap();
        writer.flush().unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, "{\"name\":\"scan.png\",\"max_diff\":42}\n");
    }

    #[test]
    fn test_pretty_json_spans_lines() {
        let mut buffer = Vec::new();
        OutputWriter::new(&mut buffer, OutputFormat::Json, true)
            .write(&finding())
            .unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.lines().count() > 1);
    }

    #[test]
    fn test_jsonl_ignores_pretty() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true);
        writer.write(&finding()).unwrap();
        writer.write(&finding()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("jsonl"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("NDJSON"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("pdf"), None);
    }

    #[test]
    fn test_report_path() {
        let path = report_path(Path::new("/tmp/reports"), "holiday.photo.jpg", OutputFormat::Json);
        assert_eq!(path, PathBuf::from("/tmp/reports/report_holiday.photo.json"));

        let path = report_path(Path::new("out"), "scan.png", OutputFormat::JsonLines);
        assert_eq!(path, PathBuf::from("out/report_scan.jsonl"));
    }
}
