//! Timing of lyric cues.
//!
//! The engine walks the measures of the first course in order, accumulating elapsed seconds from
//! the note density of each measure, the current tempo and the current time signature. Every
//! `#LYRIC` closes the previous lyric and opens the next one; `#END` closes the last.
//!
//! A whole measure lasts `240 * ratio / bpm` seconds, where `ratio` is the time signature as a
//! fraction of 4/4. A note data line takes the share of its measure proportional to its notes.

use std::ops::{ControlFlow, Range};

use num::{ToPrimitive, rational::Ratio};
use thiserror::Error;

use crate::tja::{
    command::{
        Command,
        mixin::{SourceRangeMixin, SourceRangeMixinExt},
    },
    lex::{LineKind, count_notes},
    model::{BPM_KEY, ChartLine, Course, HeaderValue, Measure, OFFSET_KEY, Tja},
};

/// Seconds of one 4/4 measure at one beat per minute.
const WHOLE_MEASURE_SECONDS: f64 = 240.0;

/// An error that makes a chart impossible to time.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConvertError {
    /// The chart has no course to convert.
    #[error("the chart declares no course")]
    NoCourse,
    /// A global header the engine needs is not defined.
    #[error("required header `{0}` is missing")]
    MissingHeader(String),
    /// A header or command parameter is not a number.
    #[error("`{field}` expects a number, but found `{value}`")]
    InvalidNumber {
        /// The header or command name.
        field: String,
        /// The text found.
        value: String,
    },
    /// A tempo is zero or not finite.
    #[error("`{field}` expects a non-zero tempo, but found `{value}`")]
    InvalidTempo {
        /// The header or command name.
        field: String,
        /// The text found.
        value: String,
    },
    /// A `#MEASURE` parameter is not `numerator/denominator` with a non-zero denominator.
    #[error("`MEASURE` expects `<numerator>/<denominator>`, but found `{0}`")]
    InvalidMeasure(String),
}

/// A [`ConvertError`] with the range of the line that caused it.
///
/// Errors not caused by any line, such as a missing header, have an empty range at 0.
pub type ConvertErrorWithRange = SourceRangeMixin<ConvertError>;

/// Type alias of `core::result::Result<T, ConvertErrorWithRange>`
pub type Result<T> = core::result::Result<T, ConvertErrorWithRange>;

/// A lyric shown from `start` until `end`, in seconds from the audio start.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cue {
    /// Time the lyric appears.
    pub start: f64,
    /// Time the lyric disappears.
    pub end: f64,
    /// The lyric text.
    pub text: String,
}

impl Tja {
    /// Whether the first course has a `#LYRIC` with some text.
    ///
    /// Charts failing this check are not converted at all.
    #[must_use]
    pub fn with_lyrics_command(&self) -> bool {
        self.first_course().is_some_and(|course| {
            course.lines().any(|line| {
                Command::parse(line.as_str()).is_some_and(|command| command.is_non_empty_lyric())
            })
        })
    }

    /// Computes the lyric cues of the first course.
    ///
    /// # Errors
    ///
    /// Fails when `OFFSET` or `BPM` is missing or not a number, when there is no course, or
    /// when a `#MEASURE` or `#BPMCHANGE` reached before `#END` is malformed.
    pub fn lyric_cues(&self) -> Result<Vec<Cue>> {
        let offset = self.required_header(OFFSET_KEY)?;
        let offset = parse_number(OFFSET_KEY, offset.as_str())
            .map_err(|err| err.into_wrapper(offset))?;
        let bpm = self.required_header(BPM_KEY)?;
        let bpm = parse_tempo(BPM_KEY, bpm.as_str(), bpm.range())?;
        let course = self
            .first_course()
            .ok_or_else(|| ConvertError::NoCourse.into_wrapper_range(0..0))?;
        let mut timeline = Timeline::new(-offset, bpm);
        timeline.walk(course)?;
        Ok(timeline.cues)
    }

    fn required_header(&self, name: &str) -> Result<&HeaderValue> {
        self.header.get_with_range(name).ok_or_else(|| {
            ConvertError::MissingHeader(name.to_owned()).into_wrapper_range(0..0)
        })
    }
}

/// Running state of the engine.
#[derive(Debug, Clone, PartialEq)]
struct Timeline {
    time: f64,
    bpm: f64,
    measure_ratio: f64,
    last_lyric_time: f64,
    /// Empty while no lyric is showing.
    last_lyric_text: String,
    cues: Vec<Cue>,
}

impl Timeline {
    const fn new(time: f64, bpm: f64) -> Self {
        Self {
            time,
            bpm,
            measure_ratio: 1.0,
            last_lyric_time: 0.0,
            last_lyric_text: String::new(),
            cues: Vec::new(),
        }
    }

    fn walk(&mut self, course: &Course) -> Result<()> {
        for measure in course.measures() {
            if self.walk_measure(measure)?.is_break() {
                break;
            }
        }
        Ok(())
    }

    fn walk_measure(&mut self, measure: &Measure) -> Result<ControlFlow<()>> {
        let note_total = measure.note_total();
        for line in measure.lines() {
            let text = line.as_str();
            match LineKind::classify(text) {
                LineKind::NoteData => self.advance(count_notes(text), note_total),
                LineKind::Command => {
                    if self.on_command(line)?.is_break() {
                        return Ok(ControlFlow::Break(()));
                    }
                }
                LineKind::Header | LineKind::Other => {}
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn on_command(&mut self, line: &ChartLine) -> Result<ControlFlow<()>> {
        match Command::parse(line.as_str()) {
            Some(Command::Measure(params)) => {
                self.measure_ratio =
                    parse_measure_ratio(params).map_err(|err| err.into_wrapper(line))?;
            }
            Some(Command::BpmChange(params)) => {
                self.bpm = parse_tempo("BPMCHANGE", params, line.range())?;
            }
            Some(Command::Lyric(params)) => self.on_lyric(params),
            Some(Command::End) => {
                self.flush_lyric();
                return Ok(ControlFlow::Break(()));
            }
            _ => {}
        }
        Ok(ControlFlow::Continue(()))
    }

    fn advance(&mut self, notes: usize, note_total: usize) {
        if note_total == 0 {
            self.time += WHOLE_MEASURE_SECONDS * self.measure_ratio / self.bpm;
        } else {
            self.time += WHOLE_MEASURE_SECONDS * self.measure_ratio * notes as f64
                / self.bpm
                / note_total as f64;
        }
    }

    fn on_lyric(&mut self, text: &str) {
        self.flush_lyric();
        self.last_lyric_time = self.time;
        self.last_lyric_text = text.to_owned();
    }

    /// Emits the showing lyric up to the current time.
    fn flush_lyric(&mut self) {
        if !self.last_lyric_text.is_empty() {
            self.cues.push(Cue {
                start: self.last_lyric_time,
                end: self.time,
                text: self.last_lyric_text.clone(),
            });
        }
    }
}

fn parse_number(field: &str, value: &str) -> core::result::Result<f64, ConvertError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConvertError::InvalidNumber {
            field: field.to_owned(),
            value: value.to_owned(),
        })
}

/// Parses a tempo, rejecting values the engine cannot divide by.
fn parse_tempo(field: &str, value: &str, range: Range<usize>) -> Result<f64> {
    let bpm = parse_number(field, value).map_err(|err| err.into_wrapper_range(range.clone()))?;
    if bpm.is_finite() && bpm.abs() > 0.0 {
        return Ok(bpm);
    }
    let err = ConvertError::InvalidTempo {
        field: field.to_owned(),
        value: value.to_owned(),
    };
    Err(err.into_wrapper_range(range))
}

/// Parses `a/b` into the real-valued ratio `a / b`.
fn parse_measure_ratio(params: &str) -> core::result::Result<f64, ConvertError> {
    let invalid = || ConvertError::InvalidMeasure(params.to_owned());
    let (numer, denom) = params.split_once('/').ok_or_else(invalid)?;
    let numer: i64 = numer.trim().parse().map_err(|_| invalid())?;
    let denom: i64 = denom.trim().parse().map_err(|_| invalid())?;
    if denom == 0 {
        return Err(invalid());
    }
    Ratio::new(numer, denom).to_f64().ok_or_else(invalid)
}
