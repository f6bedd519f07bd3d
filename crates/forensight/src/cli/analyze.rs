//! The `forensight analyze` command.

use clap::{Args, ValueEnum};
use forensight_core::output::report_path;
use forensight_core::pipeline::sanitize_filename;
use forensight_core::{
    AnalyzeOptions, Config, ForensicAnalyzer, ForensicReport, OutputFormat as CoreOutputFormat,
    OutputWriter,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Supported report formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// JPEG or PNG image to analyze
    #[arg(required = true)]
    pub input: PathBuf,

    /// JPEG quality used for ELA recompression (1-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Fixed ELA brightness multiplier (omit for automatic contrast)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub scale: Option<u32>,

    /// Report file (defaults to stdout, or `output.report_dir` when configured)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format (defaults to `output.format`)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON reports
    #[arg(long)]
    pub pretty: bool,

    /// Also write the ELA visualization as a PNG file
    #[arg(long)]
    pub ela_out: Option<PathBuf>,

    /// Skip embedded thumbnail analysis
    #[arg(long)]
    pub no_thumbnail: bool,
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs, mut config: Config) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.input
        );
    }

    apply_overrides(&mut config, &args);
    config.validate()?;

    let format = match args.format {
        Some(format) => format.into(),
        None => CoreOutputFormat::parse(&config.output.format).unwrap_or(CoreOutputFormat::Json),
    };
    let pretty = args.pretty || config.output.pretty;

    let analyzer = ForensicAnalyzer::new(&config);
    let options = AnalyzeOptions {
        skip_thumbnail: args.no_thumbnail,
    };
    let report = analyzer.analyze_with_options(&args.input, &options).await?;
    tracing::info!(
        "Analyzed {} ({}x{} {}, max ELA difference {})",
        report.file_name,
        report.width,
        report.height,
        report.format,
        report.ela.max_diff
    );

    if let Some(ref ela_out) = args.ela_out {
        let ela_out = expand_path(ela_out);
        std::fs::write(&ela_out, report.ela.png_bytes()?)?;
        tracing::info!("ELA image written to {:?}", ela_out);
    }

    match report_destination(&args, &config, format)? {
        Some(path) => {
            let file = File::create(&path)?;
            write_report(BufWriter::new(file), &report, format, pretty)?;
            tracing::info!("Report written to {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            write_report(stdout.lock(), &report, format, pretty)?;
        }
    }

    Ok(())
}

/// Fold command-line flags into the loaded configuration.
fn apply_overrides(config: &mut Config, args: &AnalyzeArgs) {
    if let Some(quality) = args.quality {
        config.ela.quality = quality;
    }
    if args.scale.is_some() {
        config.ela.scale = args.scale;
    }
    if args.no_thumbnail {
        config.thumbnail.enabled = false;
    }
}

/// Where the report goes: `--output`, then `output.report_dir`, then stdout.
fn report_destination(
    args: &AnalyzeArgs,
    config: &Config,
    format: CoreOutputFormat,
) -> anyhow::Result<Option<PathBuf>> {
    if let Some(ref output) = args.output {
        return Ok(Some(expand_path(output)));
    }

    let Some(dir) = config.report_dir() else {
        return Ok(None);
    };
    std::fs::create_dir_all(&dir)?;

    let name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = sanitize_filename(&name)?;
    Ok(Some(report_path(&dir, &name, format)))
}

fn write_report<W: Write>(
    writer: W,
    report: &ForensicReport,
    format: CoreOutputFormat,
    pretty: bool,
) -> anyhow::Result<()> {
    let mut writer = OutputWriter::new(writer, format, pretty);
    writer.write(report)?;
    writer.flush()?;
    Ok(())
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref())
}
