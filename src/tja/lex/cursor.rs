use std::{borrow::Cow, ops::Range};

use crate::tja::command::mixin::SourceRangeMixin;

/// The byte order mark, removed wherever it appears in a line.
const BOM: char = '\u{feff}';
/// Everything from this marker to the end of the line is a comment.
const COMMENT: &str = "//";

/// Walks the source text line by line, yielding only lines with content.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. Each yielded line has its byte
/// order marks and trailing comment removed, and carries the byte range of its
/// raw line in the source.
pub struct Cursor<'a> {
    /// The line position, starts with 1.
    line: usize,
    /// The index position.
    index: usize,
    /// The source str.
    source: &'a str,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `source`.
    pub const fn new(source: &'a str) -> Self {
        Self {
            line: 1,
            index: 0,
            source,
        }
    }

    /// Whether every raw line has been consumed.
    pub const fn is_end(&self) -> bool {
        self.index >= self.source.len()
    }

    /// Returns the line number of the next raw line, starting with 1.
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the current byte index in the source string.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Move cursor through the next raw line and return it with its range.
    fn next_raw_line(&mut self) -> Option<(Range<usize>, &'a str)> {
        if self.is_end() {
            return None;
        }
        let rest = &self.source[self.index..];
        let content_len = rest.find(['\n', '\r']).unwrap_or(rest.len());
        let terminator_len = if rest[content_len..].starts_with("\r\n") {
            2
        } else if content_len < rest.len() {
            1
        } else {
            0
        };
        let range = self.index..self.index + content_len;
        self.index += content_len + terminator_len;
        self.line += 1;
        Some((range.clone(), &self.source[range]))
    }

    /// Move cursor through raw lines until one has content after cleaning.
    pub fn next_content_line(&mut self) -> Option<SourceRangeMixin<Cow<'a, str>>> {
        while let Some((range, raw)) = self.next_raw_line() {
            let cleaned = clean_line(raw);
            if !cleaned.is_empty() {
                return Some(SourceRangeMixin::new(cleaned, range));
            }
        }
        None
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = SourceRangeMixin<Cow<'a, str>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_content_line()
    }
}

fn clean_line(raw: &str) -> Cow<'_, str> {
    if raw.contains(BOM) {
        let mut owned = raw.replace(BOM, "");
        if let Some(pos) = owned.find(COMMENT) {
            owned.truncate(pos);
        }
        Cow::Owned(owned)
    } else {
        Cow::Borrowed(raw.find(COMMENT).map_or(raw, |pos| &raw[..pos]))
    }
}

#[test]
fn test_skips_blank_and_comment_lines() {
    const SOURCE: &str = "TITLE:Hoge\n\n// only a comment\nBPM:120 // trailing\n";

    let mut cursor = Cursor::new(SOURCE);

    let title = cursor.next().expect("title line");
    assert_eq!(title.as_str(), "TITLE:Hoge");
    assert_eq!(title.range(), 0..10);

    let bpm = cursor.next().expect("bpm line");
    assert_eq!(bpm.as_str(), "BPM:120 ");
    assert_eq!(&SOURCE[bpm.range()], "BPM:120 // trailing");

    assert_eq!(cursor.next(), None);
    assert!(cursor.is_end());
    assert_eq!(cursor.line(), 5);
}

#[test]
fn test_next_line_crlf_and_bom() {
    const SOURCE: &str = "\u{feff}TITLE:Foo\r\n#START\r1111,\r\n";

    let lines: Vec<_> = Cursor::new(SOURCE)
        .map(|line| line.as_str().to_owned())
        .collect();

    assert_eq!(lines, ["TITLE:Foo", "#START", "1111,"]);
}

#[test]
fn test_no_trailing_newline() {
    let mut cursor = Cursor::new("#END");
    assert_eq!(cursor.next().map(|line| line.range()), Some(0..4));
    assert_eq!(cursor.index(), 4);
    assert_eq!(cursor.next(), None);
}

#[test]
fn test_whitespace_only_line_is_kept() {
    let lines: Vec<_> = Cursor::new("  \n,").map(|line| line.into_content()).collect();
    assert_eq!(lines, ["  ", ","]);
}
