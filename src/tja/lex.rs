//! Line classifier of the TJA format.
//!
//! Raw [String] == [`Cursor`] ==> cleaned lines == [lex] ==> [`LineKind`] == [parse](crate::tja::parse) ==> [`Tja`](crate::tja::model::Tja)
//!
//! Every function here is pure string inspection. A line is classified
//! structurally: anything containing `:` is a header, even when it also starts
//! with `#`.

pub mod cursor;

pub use self::cursor::Cursor;

/// The first character of a command line.
pub const COMMAND_MARKER: char = '#';
/// Separates a header name from its value.
pub const HEADER_SEPARATOR: char = ':';
/// Terminates a measure in note data.
pub const BAR_TERMINATOR: char = ',';

/// Characters that each represent one note.
const NOTE_CHARS: &str = "0123456789ABCFG";

/// The structural kind of a cleaned line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// `NAME:VALUE`.
    Header,
    /// `#NAME PARAMETERS`, without any `:`.
    Command,
    /// Notes, spaces and bar terminators only.
    NoteData,
    /// Anything else.
    Other,
}

impl LineKind {
    /// Classifies `line`, checking header first, then command, then note data.
    #[must_use]
    pub fn classify(line: &str) -> Self {
        if is_header_line(line) {
            Self::Header
        } else if is_command_line(line) {
            Self::Command
        } else if is_note_data_line(line) {
            Self::NoteData
        } else {
            Self::Other
        }
    }
}

/// Whether the line contains the header separator.
#[must_use]
pub fn is_header_line(line: &str) -> bool {
    line.contains(HEADER_SEPARATOR)
}

/// Splits a header line into the text before and after the first `:`.
#[must_use]
pub fn split_header(line: &str) -> Option<(&str, &str)> {
    line.split_once(HEADER_SEPARATOR)
}

/// Whether the first character of the line is the command marker.
#[must_use]
pub fn is_command_line(line: &str) -> bool {
    line.starts_with(COMMAND_MARKER)
}

/// Splits a command line into its name and parameters.
///
/// The name runs from after the marker up to the first space. The parameters
/// are everything after that space, or empty when there is none.
#[must_use]
pub fn split_command(line: &str) -> (&str, &str) {
    let mut chars = line.chars();
    chars.next();
    let body = chars.as_str();
    body.split_once(' ').unwrap_or((body, ""))
}

/// Whether the line consists only of notes, spaces and bar terminators.
#[must_use]
pub fn is_note_data_line(line: &str) -> bool {
    line.chars()
        .all(|c| is_note_char(c) || c == ' ' || c == BAR_TERMINATOR)
}

/// Counts the note characters in the line.
#[must_use]
pub fn count_notes(line: &str) -> usize {
    line.chars().filter(|&c| is_note_char(c)).count()
}

fn is_note_char(c: char) -> bool {
    NOTE_CHARS.contains(c)
}
