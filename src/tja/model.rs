//! Data model of a parsed TJA chart.
//!
//! A [`Tja`] holds the global [`Header`] and every [`Course`] in source order. Each course owns
//! its own header and its [`Measure`]s, and each measure keeps its raw content lines. Nothing is
//! interpreted here; see [`timeline`](crate::tja::timeline) for the timing semantics.

use std::collections::BTreeMap;

use crate::tja::{
    command::mixin::{SourceRangeMixin, SourceRangeMixinExt},
    lex::{count_notes, is_note_data_line},
};

/// Header key declaring a new course.
pub const COURSE_KEY: &str = "COURSE";
/// Header key holding the difficulty level of a course.
pub const LEVEL_KEY: &str = "LEVEL";
/// Global header key holding the start offset in seconds.
pub const OFFSET_KEY: &str = "OFFSET";
/// Global header key holding the initial tempo.
pub const BPM_KEY: &str = "BPM";
/// Global header key holding the audio file name.
pub const WAVE_KEY: &str = "WAVE";
/// The difficulty used when a course is opened without a name.
pub const DEFAULT_COURSE: &str = "Oni";

/// A header value with the range of its source line.
pub type HeaderValue = SourceRangeMixin<String>;

/// A raw content line of a measure with its source range.
pub type ChartLine = SourceRangeMixin<String>;

/// String-keyed header mapping. Keys are unique; a later definition replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header(BTreeMap<String, HeaderValue>);

impl Header {
    /// Creates an empty header mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Records `value` under `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: HeaderValue) {
        self.0.insert(name.into(), value);
    }

    /// Returns the value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(SourceRangeMixin::as_str)
    }

    /// Returns the value of `name` together with the range of its line.
    #[must_use]
    pub fn get_with_range(&self, name: &str) -> Option<&HeaderValue> {
        self.0.get(name)
    }

    /// Whether `name` is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of defined names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no name is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over names and values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Lines of one musical bar, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measure {
    lines: Vec<ChartLine>,
}

impl Measure {
    /// Returns the lines of this measure.
    #[must_use]
    pub fn lines(&self) -> &[ChartLine] {
        &self.lines
    }

    /// Returns the first recorded line.
    #[must_use]
    pub fn first_line(&self) -> Option<&ChartLine> {
        self.lines.first()
    }

    /// Whether no line has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total notes over all note data lines of this measure.
    #[must_use]
    pub fn note_total(&self) -> usize {
        self.lines
            .iter()
            .map(SourceRangeMixin::as_str)
            .filter(|line| is_note_data_line(line))
            .map(count_notes)
            .sum()
    }

    pub(crate) fn push(&mut self, line: ChartLine) {
        self.lines.push(line);
    }
}

/// A difficulty variant of the chart.
///
/// A course always has at least one measure, the last of which may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Course {
    /// Headers declared after this course began. Always holds [`COURSE_KEY`].
    pub header: Header,
    measures: Vec<Measure>,
}

impl Default for Course {
    fn default() -> Self {
        Self::new(DEFAULT_COURSE.to_owned().into_wrapper_range(0..0))
    }
}

impl Course {
    /// Creates a course with the difficulty `name` and a single empty measure.
    #[must_use]
    pub fn new(name: HeaderValue) -> Self {
        let mut header = Header::new();
        header.insert(COURSE_KEY, name);
        Self {
            header,
            measures: vec![Measure::default()],
        }
    }

    /// Returns the difficulty name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.header.get(COURSE_KEY).unwrap_or(DEFAULT_COURSE)
    }

    /// Returns the difficulty level, if declared.
    #[must_use]
    pub fn level(&self) -> Option<&str> {
        self.header.get(LEVEL_KEY)
    }

    /// Returns the measures in order. Never empty.
    #[must_use]
    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    /// Iterates over every content line of every measure.
    pub fn lines(&self) -> impl Iterator<Item = &ChartLine> {
        self.measures.iter().flat_map(Measure::lines)
    }

    pub(crate) fn measure_mut(&mut self, index: usize) -> Option<&mut Measure> {
        self.measures.get_mut(index)
    }

    /// Appends an empty measure and returns its index.
    pub(crate) fn push_measure(&mut self) -> usize {
        self.measures.push(Measure::default());
        self.measures.len() - 1
    }
}

/// A parsed TJA chart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tja {
    /// Headers declared before any course.
    pub header: Header,
    /// Courses in source order. May be empty.
    pub courses: Vec<Course>,
}

impl Tja {
    /// Returns the audio file name declared by `WAVE`.
    #[must_use]
    pub fn wave(&self) -> Option<&str> {
        self.header.get(WAVE_KEY)
    }

    /// Returns the first course, which is the one converted to captions.
    #[must_use]
    pub fn first_course(&self) -> Option<&Course> {
        self.courses.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> ChartLine {
        text.to_owned().into_wrapper_range(0..text.len())
    }

    #[test]
    fn default_course_is_oni_with_one_measure() {
        let course = Course::default();
        assert_eq!(course.name(), DEFAULT_COURSE);
        assert_eq!(course.level(), None);
        assert_eq!(course.measures().len(), 1);
        assert!(course.measures().iter().all(Measure::is_empty));
    }

    #[test]
    fn note_total_ignores_commands() {
        let mut measure = Measure::default();
        measure.push(line("#BPMCHANGE 120"));
        measure.push(line("1010"));
        measure.push(line("#LYRIC 1234"));
        measure.push(line("22,"));
        assert_eq!(measure.note_total(), 6);
        assert_eq!(measure.first_line().map(SourceRangeMixin::as_str), Some("#BPMCHANGE 120"));
    }

    #[test]
    fn header_replaces_previous_value() {
        let mut header = Header::new();
        header.insert("BPM", line("120"));
        header.insert("BPM", line("150"));
        assert_eq!(header.get("BPM"), Some("150"));
        assert_eq!(header.len(), 1);
        assert!(header.contains("BPM"));
        assert!(!header.contains("OFFSET"));
    }
}
