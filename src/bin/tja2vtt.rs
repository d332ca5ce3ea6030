//! Converts the lyrics of every TJA chart under the given paths into WebVTT captions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use encoding_rs::Encoding;
use tja_rs::batch::{BatchError, ConvertOptions, convert_all, find_chart_files};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tja2vtt")]
#[command(about = "Converts TJA lyric commands into WebVTT captions", version)]
struct Args {
    /// Chart files or directories to search for charts
    #[arg(default_value = ".")]
    roots: Vec<PathBuf>,

    /// Encoding of the chart files, such as `utf-8` or `shift_jis`
    #[arg(short, long, default_value = "utf-8")]
    encoding: String,

    /// Skip charts whose WAVE file is missing
    #[arg(long)]
    require_audio: bool,

    /// Report what would be written without writing
    #[arg(long)]
    dry_run: bool,

    /// Print a source report for each chart that fails to convert
    #[arg(long)]
    diagnostics: bool,

    /// Log each chart as it is analyzed
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let encoding = Encoding::for_label(args.encoding.as_bytes())
        .with_context(|| format!("unknown encoding `{}`", args.encoding))?;
    let options = ConvertOptions {
        encoding,
        require_audio: args.require_audio,
        dry_run: args.dry_run,
    };

    let mut charts = vec![];
    for root in &args.roots {
        let found = find_chart_files(root)
            .with_context(|| format!("failed to search `{}`", root.display()))?;
        info!("Found {} charts under {}", found.len(), root.display());
        charts.extend(found);
    }

    let report = convert_all(&charts, &options);

    for (path, err) in report.failures() {
        error!("{}: {err}", path.display());
        if args.diagnostics {
            emit_diagnostics(path, err);
        }
    }

    info!(
        "Converted {}, skipped {}, failed {}",
        report.converted(),
        report.skipped(),
        report.outcomes.len() - report.converted() - report.skipped()
    );

    if report.has_failures() {
        bail!("some charts failed to convert");
    }
    Ok(())
}

#[cfg(feature = "diagnostics")]
fn emit_diagnostics(path: &Path, err: &BatchError) {
    if let BatchError::Convert { text, source, .. } = err {
        tja_rs::diagnostics::emit_convert_error(&path.display().to_string(), text, source);
    }
}

#[cfg(not(feature = "diagnostics"))]
fn emit_diagnostics(path: &Path, _: &BatchError) {
    tracing::warn!(
        "{}: source reports need the `diagnostics` feature",
        path.display()
    );
}
