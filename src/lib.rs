//! The TJA chart parser and lyric-to-WebVTT converter.
//!
//! TJA is the chart format of taiko rhythm games. Besides note data, a chart may carry `#LYRIC`
//! commands that show lines of the song text while playing. This crate parses charts into a
//! [`tja::model::Tja`], times those lyrics and writes them as a WebVTT caption file.
//!
//! # Usage
//!
//! ```
//! use tja_rs::tja::parse_tja;
//!
//! let source = "\
//! OFFSET:0
//! BPM:120
//! COURSE:Oni
//! #START
//! #LYRIC A
//! 1111,
//! #LYRIC B
//! 1,
//! #END
//! ";
//! let tja = parse_tja(source);
//! assert!(tja.with_lyrics_command());
//! assert_eq!(
//!     tja.lyrics_to_vtt().unwrap(),
//!     "WEBVTT\n\n00:00.000 --> 00:02.000\nA\n\n00:02.000 --> 00:04.000\nB",
//! );
//! ```
//!
//! [`batch`] finds charts on disk and converts them, and the `tja2vtt` binary drives it from the
//! command line.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod batch;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod tja;
pub mod vtt;
