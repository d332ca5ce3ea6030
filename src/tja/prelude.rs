//! Prelude module for the TJA module.
//!
//! You can use `use tja_rs::tja::prelude::*;` to import all TJA types at once.

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{SimpleSource, ToAriadne, emit_convert_error};

pub use super::{
    command::{
        Command, END_MARKER,
        mixin::{SourceRangeMixin, SourceRangeMixinExt},
    },
    lex::{
        BAR_TERMINATOR, COMMAND_MARKER, Cursor, HEADER_SEPARATOR, LineKind, count_notes,
        is_command_line, is_header_line, is_note_data_line, split_command, split_header,
    },
    model::{
        BPM_KEY, COURSE_KEY, ChartLine, Course, DEFAULT_COURSE, Header, HeaderValue, LEVEL_KEY,
        Measure, OFFSET_KEY, Tja, WAVE_KEY,
    },
    parse_tja,
    timeline::{ConvertError, ConvertErrorWithRange, Cue},
};
pub use crate::vtt::{Timestamp, emit, to_time};
