//! Fancy diagnostics support using `ariadne`.
//!
//! This module converts a [`ConvertErrorWithRange`] into an `ariadne::Report`. The error carries
//! the byte range of the offending line, and ariadne works out rows and columns from it.
//!
//! # Usage Example
//!
//! ```rust
//! use tja_rs::{diagnostics::emit_convert_error, tja::parse_tja};
//!
//! let source = "OFFSET:0\nBPM:120\nCOURSE:Oni\n#START\n#MEASURE 4\n#LYRIC a\n1,\n#END\n";
//! if let Err(err) = parse_tja(source).lyric_cues() {
//!     emit_convert_error("song.tja", source, &err);
//! }
//! ```

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::tja::timeline::ConvertErrorWithRange;

/// Simple source container that holds the filename and source text.
pub struct SimpleSource<'a> {
    /// Name of the source file.
    name: &'a str,
    /// Source text content.
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Trait for converting positioned errors to `ariadne::Report`.
pub trait ToAriadne {
    /// Convert error to ariadne Report.
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

impl ToAriadne for ConvertErrorWithRange {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        let (start, end) = self.as_span();
        let end = end.min(src.text().len());
        let start = start.min(end);
        let filename = src.name().to_string();
        Report::build(ReportKind::Error, (filename.clone(), start..end))
            .with_message(format!("convert: {}", self.content()))
            .with_label(
                Label::new((filename, start..end))
                    .with_message(self.content().to_string())
                    .with_color(Color::Red),
            )
            .finish()
    }
}

/// Convenience method: render a conversion error against its source.
pub fn emit_convert_error(name: &str, source: &str, error: &ConvertErrorWithRange) {
    let simple = SimpleSource::new(name, source);
    let report = error.to_report(&simple);
    let _ = report.eprint((name.to_string(), Source::from(source)));
}
