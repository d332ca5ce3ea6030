//! The parser module of TJA (.tja) charts.
//!
//! This module consists of three phases: line classifying, chart parsing and lyric timing.
//!
//! `lex` module cleans the source into content lines and classifies each one as a header, a
//! command or note data. The classification is structural, so any line containing `:` is a
//! header even when it starts with `#`.
//!
//! `parse` module builds a [`model::Tja`] from those lines: global headers, then courses, each
//! with its own headers and measures of raw lines. It never fails; lines it cannot place are
//! dropped.
//!
//! `timeline` module walks the first course and computes the [`timeline::Cue`]s of its
//! `#LYRIC` commands.
//!
//! In detail, our policies are:
//!
//! - Support only UTF-8 (as required `&str` to input). Decode other encodings before parsing.
//! - Do not validate the chart grammar.
//! - Convert only the first course of a chart.

pub mod command;
pub mod lex;
pub mod model;
pub mod parse;
pub mod prelude;
pub mod timeline;

use self::model::Tja;

/// Parses a TJA source text.
///
/// # Example
///
/// ```
/// use tja_rs::tja::parse_tja;
///
/// let source = "OFFSET:0\nBPM:120\nCOURSE:Oni\n#START\n#LYRIC Hello\n1111,\n#END\n";
/// let tja = parse_tja(source);
/// assert!(tja.with_lyrics_command());
/// assert_eq!(tja.courses[0].name(), "Oni");
/// ```
#[must_use]
pub fn parse_tja(source: &str) -> Tja {
    Tja::parse(source)
}
