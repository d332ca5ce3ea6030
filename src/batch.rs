//! Converting chart files on disk.
//!
//! [`find_chart_files`] collects `.tja` files under a directory, [`convert_file`] converts one of
//! them into a `.vtt` next to it, and [`convert_all`] converts a list of them, recording each
//! failure without stopping. The conversion itself is [`convert_source`], which touches no file.

use std::{
    collections::VecDeque,
    fs, io,
    path::{Path, PathBuf},
};

use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::tja::{model::Tja, timeline::ConvertErrorWithRange};

/// Extension of chart files. Compared case-sensitively.
pub const CHART_EXTENSION: &str = "tja";
/// Extension of caption files.
pub const CAPTION_EXTENSION: &str = "vtt";

/// An error occurred when converting a chart file.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BatchError {
    /// The chart could not be read.
    #[error("failed to read `{}`: {source}", path.display())]
    Read {
        /// The chart path.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The chart is not valid in the configured encoding.
    #[error("`{}` is not valid {encoding}", path.display())]
    Decode {
        /// The chart path.
        path: PathBuf,
        /// Name of the configured encoding.
        encoding: &'static str,
    },
    /// The chart could not be timed.
    #[error("failed to convert `{}`: {source}", path.display())]
    Convert {
        /// The chart path.
        path: PathBuf,
        /// The decoded chart text, kept for diagnostics.
        text: String,
        /// The underlying error.
        source: ConvertErrorWithRange,
    },
    /// The caption could not be written.
    #[error("failed to write `{}`: {source}", path.display())]
    Write {
        /// The caption path.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

/// Settings of a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Encoding of the chart files.
    pub encoding: &'static Encoding,
    /// Skip charts whose `WAVE` file does not exist next to them.
    pub require_audio: bool,
    /// Convert without writing any caption file.
    pub dry_run: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            encoding: UTF_8,
            require_audio: false,
            dry_run: false,
        }
    }
}

/// What happened to a chart file that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The caption was written to this path.
    Written(PathBuf),
    /// The caption would have been written to this path, but the run is a dry run.
    DryRun(PathBuf),
    /// The first course has no lyric, so nothing was written.
    NoLyrics,
    /// The `WAVE` file is missing, so nothing was written.
    MissingAudio,
}

/// Outcomes of [`convert_all`], in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Each chart path with its outcome.
    pub outcomes: Vec<(PathBuf, Result<FileOutcome, BatchError>)>,
}

impl BatchReport {
    /// Number of caption files written, or that would be written in a dry run.
    #[must_use]
    pub fn converted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| {
                matches!(outcome, Ok(FileOutcome::Written(_) | FileOutcome::DryRun(_)))
            })
            .count()
    }

    /// Number of charts skipped without error.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| {
                matches!(outcome, Ok(FileOutcome::NoLyrics | FileOutcome::MissingAudio))
            })
            .count()
    }

    /// Iterates over the failed charts.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &BatchError)> {
        self.outcomes
            .iter()
            .filter_map(|(path, outcome)| outcome.as_ref().err().map(|err| (path.as_path(), err)))
    }

    /// Whether any chart failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Whether `path` names a chart file.
#[must_use]
pub fn is_chart_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension == CHART_EXTENSION)
}

/// Returns the caption path for a chart: the same path with the caption extension.
#[must_use]
pub fn caption_path(path: &Path) -> PathBuf {
    path.with_extension(CAPTION_EXTENSION)
}

/// Collects chart files under `root`, breadth first, sorted by path.
///
/// When `root` is a file, it is returned alone if it is a chart.
///
/// # Errors
///
/// Fails when a directory cannot be read.
pub fn find_chart_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(if is_chart_path(root) {
            vec![root.to_path_buf()]
        } else {
            vec![]
        });
    }
    let mut charts = vec![];
    let mut folders = VecDeque::from([root.to_path_buf()]);
    while let Some(folder) = folders.pop_front() {
        for entry in fs::read_dir(&folder)? {
            let path = entry?.path();
            if path.is_dir() {
                folders.push_back(path);
            } else if path.is_file() && is_chart_path(&path) {
                charts.push(path);
            }
        }
    }
    charts.sort();
    Ok(charts)
}

/// Whether the `WAVE` file of the chart exists in the chart's directory.
#[must_use]
pub fn audio_exists(chart_path: &Path, tja: &Tja) -> bool {
    let Some(wave) = tja.wave() else {
        return false;
    };
    chart_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(wave)
        .is_file()
}

/// Converts chart text into caption text, or `None` when the chart has no lyric.
///
/// # Errors
///
/// Fails as [`Tja::lyric_cues`] does.
pub fn convert_source(source: &str) -> Result<Option<String>, ConvertErrorWithRange> {
    convert_chart(&Tja::parse(source))
}

fn convert_chart(tja: &Tja) -> Result<Option<String>, ConvertErrorWithRange> {
    if !tja.with_lyrics_command() {
        return Ok(None);
    }
    tja.lyrics_to_vtt().map(Some)
}

/// Converts one chart file, writing the caption next to it.
///
/// # Errors
///
/// Fails when the chart cannot be read or decoded, cannot be timed, or the caption cannot be
/// written.
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<FileOutcome, BatchError> {
    debug!(path = %path.display(), "analyzing");
    let bytes = fs::read(path).map_err(|source| BatchError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, _, had_errors) = options.encoding.decode(&bytes);
    if had_errors {
        return Err(BatchError::Decode {
            path: path.to_path_buf(),
            encoding: options.encoding.name(),
        });
    }
    let tja = Tja::parse(&text);
    if options.require_audio && !audio_exists(path, &tja) {
        debug!(path = %path.display(), wave = tja.wave(), "audio missing, skipped");
        return Ok(FileOutcome::MissingAudio);
    }
    let Some(caption) = convert_chart(&tja).map_err(|source| BatchError::Convert {
        path: path.to_path_buf(),
        text: text.to_string(),
        source,
    })?
    else {
        debug!(path = %path.display(), "no lyrics, skipped");
        return Ok(FileOutcome::NoLyrics);
    };
    let output = caption_path(path);
    if options.dry_run {
        info!(path = %output.display(), "would write");
        return Ok(FileOutcome::DryRun(output));
    }
    fs::write(&output, caption).map_err(|source| BatchError::Write {
        path: output.clone(),
        source,
    })?;
    info!(path = %output.display(), "written");
    Ok(FileOutcome::Written(output))
}

/// Converts every chart in `paths`. A failing chart is recorded and does not stop the others.
/// Paths that are not charts are ignored.
pub fn convert_all<P: AsRef<Path>>(
    paths: impl IntoIterator<Item = P>,
    options: &ConvertOptions,
) -> BatchReport {
    let mut report = BatchReport::default();
    for path in paths {
        let path = path.as_ref();
        if !is_chart_path(path) {
            continue;
        }
        let outcome = convert_file(path, options);
        if let Err(err) = &outcome {
            warn!("{err}");
        }
        report.outcomes.push((path.to_path_buf(), outcome));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_extension_is_exact() {
        assert!(is_chart_path(Path::new("songs/a.tja")));
        assert!(!is_chart_path(Path::new("songs/a.TJA")));
        assert!(!is_chart_path(Path::new("songs/a.tja.bak")));
        assert!(!is_chart_path(Path::new("songs/tja")));
    }

    #[test]
    fn caption_replaces_extension() {
        assert_eq!(
            caption_path(Path::new("songs/My Song.tja")),
            PathBuf::from("songs/My Song.vtt")
        );
    }

    #[test]
    fn source_without_lyrics_converts_to_nothing() {
        let source = "OFFSET:0\nBPM:120\nCOURSE:Oni\n#START\n#LYRIC\n1111,\n#END\n";
        assert_eq!(convert_source(source), Ok(None));
    }

    #[test]
    fn source_without_course_converts_to_nothing() {
        assert_eq!(convert_source("TITLE:Empty\n"), Ok(None));
    }
}
