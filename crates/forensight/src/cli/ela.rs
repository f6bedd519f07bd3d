//! The `forensight ela` command: write only the ELA visualization.

use clap::Args;
use forensight_core::{Config, ForensicAnalyzer};
use std::path::PathBuf;

/// Arguments for the `ela` command.
#[derive(Args, Debug)]
pub struct ElaArgs {
    /// JPEG or PNG image to analyze
    #[arg(required = true)]
    pub input: PathBuf,

    /// Destination PNG file
    #[arg(long, required = true)]
    pub out: PathBuf,

    /// JPEG quality used for recompression (1-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Fixed brightness multiplier (omit for automatic contrast)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub scale: Option<u32>,
}

/// Execute the ela command.
pub async fn execute(args: ElaArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(quality) = args.quality {
        config.ela.quality = quality;
    }
    if args.scale.is_some() {
        config.ela.scale = args.scale;
    }
    config.validate()?;

    let analyzer = ForensicAnalyzer::new(&config);
    let ela = analyzer.ela_only(&args.input).await?;

    let out = PathBuf::from(shellexpand::tilde(&args.out.to_string_lossy()).as_ref());
    std::fs::write(&out, ela.to_png()?)?;

    tracing::info!(
        "ELA written to {:?} (quality {}, scale {:.2}, max difference {})",
        out,
        ela.quality(),
        ela.scale(),
        ela.max_diff()
    );
    Ok(())
}
