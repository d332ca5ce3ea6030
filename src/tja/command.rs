//! Definitions of the commands embedded in course content.
//!
//! Structures in this module are used by both the [parse](crate::tja::parse) part and the
//! [timeline](crate::tja::timeline) part.

pub mod mixin;

use crate::tja::lex::{is_command_line, split_command};

/// The exact line that closes a chart. The dual-chart continuation rule matches on it verbatim.
pub const END_MARKER: &str = "#END";

/// A command line inside a course, split into its name and raw parameters.
///
/// Command names are case-sensitive. Parameters are kept as written; converting them into
/// numbers is left to the consumer, which decides whether a malformed value is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Command<'a> {
    /// `#START [player]`. Opens the note data of a chart.
    Start(&'a str),
    /// `#END`. Closes the note data of a chart.
    End,
    /// `#LYRIC [text]`. Shows `text` from here on. Empty text clears the lyric.
    Lyric(&'a str),
    /// `#MEASURE [a]/[b]`. Changes the time signature of the following measures.
    Measure(&'a str),
    /// `#BPMCHANGE [bpm]`. Changes the tempo from here on.
    BpmChange(&'a str),
    /// Any other command, such as `#GOGOSTART` or `#SCROLL`.
    Other {
        /// String after `#` and until the first space.
        name: &'a str,
        /// String after the first space.
        params: &'a str,
    },
}

impl<'a> Command<'a> {
    /// Parses a command line. Returns `None` when the line does not start with `#`.
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        if !is_command_line(line) {
            return None;
        }
        let (name, params) = split_command(line);
        Some(match name {
            "START" => Self::Start(params),
            "END" => Self::End,
            "LYRIC" => Self::Lyric(params),
            "MEASURE" => Self::Measure(params),
            "BPMCHANGE" => Self::BpmChange(params),
            name => Self::Other { name, params },
        })
    }

    /// Returns the command name without the marker.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        match self {
            Self::Start(_) => "START",
            Self::End => "END",
            Self::Lyric(_) => "LYRIC",
            Self::Measure(_) => "MEASURE",
            Self::BpmChange(_) => "BPMCHANGE",
            Self::Other { name, .. } => *name,
        }
    }

    /// Whether this is a `#LYRIC` with some text, which makes a chart worth converting.
    #[must_use]
    pub const fn is_non_empty_lyric(&self) -> bool {
        matches!(self, Self::Lyric(text) if !text.is_empty())
    }
}
