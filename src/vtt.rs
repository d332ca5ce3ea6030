//! WebVTT caption output.
//!
//! ```text
//! WEBVTT
//!
//! 00:01.500 --> 00:03.000
//! first lyric
//!
//! 00:03.000 --> 00:04.250
//! second lyric
//! ```
//!
//! The document has no trailing newline.

use std::fmt;

use itertools::Itertools;

use crate::tja::{
    model::Tja,
    timeline::{Cue, Result},
};

/// The first line of every caption file.
pub const HEADER: &str = "WEBVTT";

/// Added before truncating to milliseconds, so that values sitting just below a millisecond
/// boundary round up.
const ROUNDING_EPSILON: f64 = 0.0005;

/// A caption timestamp in whole milliseconds, displayed as `MM:SS.mmm`.
///
/// Times before zero saturate to zero. Minutes are at least two digits and widen instead of
/// wrapping past 99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp {
    millis: u64,
}

impl Timestamp {
    /// Creates a timestamp from seconds.
    #[must_use]
    pub fn from_secs(secs: f64) -> Self {
        let shifted = (secs + ROUNDING_EPSILON) * 1000.0;
        if shifted.is_nan() || shifted <= 0.0 {
            return Self::default();
        }
        Self {
            millis: shifted.floor() as u64,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.millis / 60_000;
        let seconds = self.millis / 1000 % 60;
        let millis = self.millis % 1000;
        write!(f, "{minutes:02}:{seconds:02}.{millis:03}")
    }
}

/// Formats seconds as a caption timestamp.
///
/// ```
/// use tja_rs::vtt::to_time;
///
/// assert_eq!(to_time(0.0005), "00:00.001");
/// assert_eq!(to_time(83.25), "01:23.250");
/// ```
#[must_use]
pub fn to_time(secs: f64) -> String {
    Timestamp::from_secs(secs).to_string()
}

/// Formats one cue block: the time range line followed by the text.
#[must_use]
pub fn format_cue(cue: &Cue) -> String {
    format!(
        "{} --> {}\n{}",
        Timestamp::from_secs(cue.start),
        Timestamp::from_secs(cue.end),
        cue.text
    )
}

/// Assembles the caption document: the header, then each cue after a blank line.
#[must_use]
pub fn emit<'a>(cues: impl IntoIterator<Item = &'a Cue>) -> String {
    std::iter::once(HEADER.to_owned())
        .chain(cues.into_iter().map(format_cue))
        .join("\n\n")
}

impl Tja {
    /// Converts the lyrics of the first course into a caption document.
    ///
    /// # Errors
    ///
    /// Fails as [`Tja::lyric_cues`] does.
    pub fn lyrics_to_vtt(&self) -> Result<String> {
        Ok(emit(&self.lyric_cues()?))
    }
}
