//! Building a [`Tja`] from cleaned lines.
//!
//! Raw [String] == [lex](crate::tja::lex) ==> cleaned lines == [parse] ==> [`Tja`]
//!
//! The parser never fails. Lines it cannot place are dropped, and header fields a consumer
//! needs are checked by that consumer.

use tracing::debug;

use crate::tja::{
    command::{
        Command, END_MARKER,
        mixin::{SourceRangeMixin, SourceRangeMixinExt},
    },
    lex::{BAR_TERMINATOR, Cursor, is_command_line, split_header},
    model::{COURSE_KEY, ChartLine, Course, DEFAULT_COURSE, LEVEL_KEY, Measure, Tja},
};

impl Tja {
    /// Parses the TJA source text.
    ///
    /// # Example
    ///
    /// ```
    /// use tja_rs::tja::model::Tja;
    ///
    /// let tja = Tja::parse("BPM:120\nCOURSE:Oni\n#START\n1111,\n#END\n");
    /// assert_eq!(tja.header.get("BPM"), Some("120"));
    /// assert_eq!(tja.courses[0].measures().len(), 2);
    /// ```
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self::from_lines(Cursor::new(source))
    }

    /// Builds a chart from lines that are already cleaned: no line breaks, byte order marks or
    /// comments, and no empty lines.
    #[must_use]
    pub fn from_lines<S: AsRef<str>>(lines: impl IntoIterator<Item = SourceRangeMixin<S>>) -> Self {
        let mut parser = ChartParser::default();
        for line in lines {
            parser.feed(line.as_str(), line.range());
        }
        parser.finish()
    }
}

/// Position of the course and measure receiving content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParserCursor {
    course: usize,
    measure: usize,
}

/// Incremental chart builder.
#[derive(Debug, Default)]
struct ChartParser {
    tja: Tja,
    /// `None` until the first course opens.
    cursor: Option<ParserCursor>,
}

impl ChartParser {
    fn feed(&mut self, line: &str, range: std::ops::Range<usize>) {
        if let Some((name, value)) = split_header(line) {
            self.on_header(line, name, value, range);
        } else if self.cursor.is_some() {
            self.append_content(line.to_owned().into_wrapper_range(range));
        }
    }

    fn on_header(&mut self, line: &str, name: &str, value: &str, range: std::ops::Range<usize>) {
        if name == COURSE_KEY {
            self.open_course(Course::new(value.to_owned().into_wrapper_range(range)));
            return;
        }
        if self.cursor.is_some() {
            if self.current_chart_ended() && continues_dual_chart(line) {
                self.open_dual_chart_course();
            }
            if let Some(course) = self.current_course_mut() {
                course
                    .header
                    .insert(name, value.to_owned().into_wrapper_range(range));
            }
        } else if matches!(Command::parse(line), Some(Command::Start(_))) {
            self.open_course(Course::default());
        } else if !is_command_line(line) {
            self.tja
                .header
                .insert(name, value.to_owned().into_wrapper_range(range));
        }
    }

    /// Appends to the current measure, opening a new one after a bar terminator in note data.
    fn append_content(&mut self, line: ChartLine) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let closes_measure =
            line.as_str().contains(BAR_TERMINATOR) && !is_command_line(line.as_str());
        let Some(course) = self.tja.courses.get_mut(cursor.course) else {
            return;
        };
        if let Some(measure) = course.measure_mut(cursor.measure) {
            measure.push(line);
        }
        if closes_measure {
            let measure = course.push_measure();
            self.cursor = Some(ParserCursor {
                course: cursor.course,
                measure,
            });
        }
    }

    fn open_course(&mut self, course: Course) {
        debug!(course = course.name(), index = self.tja.courses.len(), "course opened");
        self.tja.courses.push(course);
        self.cursor = Some(ParserCursor {
            course: self.tja.courses.len() - 1,
            measure: 0,
        });
    }

    /// Opens a course of the same difficulty as the current one, carrying its level over.
    fn open_dual_chart_course(&mut self) {
        let Some(previous) = self.current_course() else {
            return;
        };
        let mut course = Course::new(
            previous
                .header
                .get_with_range(COURSE_KEY)
                .cloned()
                .unwrap_or_else(|| DEFAULT_COURSE.to_owned().into_wrapper_range(0..0)),
        );
        if let Some(level) = previous.header.get_with_range(LEVEL_KEY) {
            course.header.insert(LEVEL_KEY, level.clone());
        }
        debug!(course = course.name(), "continuing dual chart");
        self.open_course(course);
    }

    /// Whether the current measure is non-empty and begins with the end marker.
    fn current_chart_ended(&self) -> bool {
        self.current_measure()
            .and_then(Measure::first_line)
            .is_some_and(|first| first.as_str() == END_MARKER)
    }

    fn current_course(&self) -> Option<&Course> {
        self.tja.courses.get(self.cursor?.course)
    }

    fn current_course_mut(&mut self) -> Option<&mut Course> {
        let cursor = self.cursor?;
        self.tja.courses.get_mut(cursor.course)
    }

    fn current_measure(&self) -> Option<&Measure> {
        let cursor = self.cursor?;
        self.current_course()?.measures().get(cursor.measure)
    }

    fn finish(self) -> Tja {
        self.tja
    }
}

/// Whether a header line following an ended chart starts another chart of the same course.
///
/// A `START` command does, as does any header that is not a command. Other commands do not.
fn continues_dual_chart(line: &str) -> bool {
    match Command::parse(line) {
        Some(Command::Start(_)) => true,
        Some(_) => false,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lines_of(course: &Course) -> Vec<Vec<&str>> {
        course
            .measures()
            .iter()
            .map(|measure| measure.lines().iter().map(SourceRangeMixin::as_str).collect())
            .collect()
    }

    #[test]
    fn headers_before_course_are_global() {
        let tja = Tja::parse("TITLE:Song\nBPM:120\nCOURSE:Hard\nLEVEL:7\n");
        assert_eq!(tja.header.get("TITLE"), Some("Song"));
        assert_eq!(tja.header.get("BPM"), Some("120"));
        assert_eq!(tja.header.get("LEVEL"), None);
        assert_eq!(tja.courses.len(), 1);
        assert_eq!(tja.courses[0].name(), "Hard");
        assert_eq!(tja.courses[0].level(), Some("7"));
    }

    #[test]
    fn bar_terminator_splits_measures() {
        let tja = Tja::parse("COURSE:Oni\n#START\n1000\n1000,\n#LYRIC a,b\n2,\n#END\n");
        assert_eq!(
            lines_of(&tja.courses[0]),
            vec![
                vec!["#START", "1000", "1000,"],
                vec!["#LYRIC a,b", "2,"],
                vec!["#END"],
            ]
        );
    }

    #[test]
    fn content_before_any_course_is_dropped() {
        let tja = Tja::parse("BPM:120\n#START\n1111,\n#END\n");
        assert!(tja.courses.is_empty());
        assert_eq!(tja.header.len(), 1);
    }

    #[test]
    fn start_header_without_course_opens_default_course() {
        let tja = Tja::parse("BPM:120\n#START P:1\n1111,\n");
        assert_eq!(tja.courses.len(), 1);
        assert_eq!(tja.courses[0].name(), "Oni");
        assert_eq!(lines_of(&tja.courses[0]), vec![vec!["1111,"], vec![]]);
        assert!(!tja.header.contains("#START P"));
    }

    #[test]
    fn command_header_without_course_is_dropped() {
        let tja = Tja::parse("#TITLE:x\nBPM:120\n");
        assert_eq!(tja.header.iter().collect::<Vec<_>>(), vec![("BPM", "120")]);
    }

    #[test]
    fn header_after_end_opens_dual_chart() {
        let tja = Tja::parse(
            "COURSE:Oni\nLEVEL:9\n#START P1\n1,\n#END\nBALLOON:4\n#START P2\n2,\n#END\n",
        );
        assert_eq!(tja.courses.len(), 2);
        let second = &tja.courses[1];
        assert_eq!(second.name(), "Oni");
        assert_eq!(second.level(), Some("9"));
        assert_eq!(second.header.get("BALLOON"), Some("4"));
        assert_eq!(tja.courses[0].header.get("BALLOON"), None);
        assert_eq!(lines_of(&tja.courses[0]).last(), Some(&vec!["#END"]));
    }

    #[test]
    fn command_header_after_end_stays_in_course() {
        let tja = Tja::parse("COURSE:Oni\n#START\n1,\n#END\n#LYRIC 12:00\n");
        assert_eq!(tja.courses.len(), 1);
        assert_eq!(tja.courses[0].header.get("#LYRIC 12"), Some("00"));
    }

    #[test]
    fn end_not_first_in_measure_does_not_continue() {
        let tja = Tja::parse("COURSE:Oni\n#START\n1\n#END\nBALLOON:4\n");
        assert_eq!(tja.courses.len(), 1);
        assert_eq!(tja.courses[0].header.get("BALLOON"), Some("4"));
    }
}
