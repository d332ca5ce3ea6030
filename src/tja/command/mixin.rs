//! Mixin types for structures.
//!
//! - [`SourceRangeMixin`] attaches a byte range of the source text to a value.
//! - [`SourceRangeMixinExt`] provides extension methods to wrap any value into a [`SourceRangeMixin`].

use std::ops::Range;

/// A generic wrapper that attaches position information (index span) to a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceRangeMixin<T> {
    /// Wrapped content value
    content: T,
    /// Start index in the source string (0-based, inclusive)
    start: usize,
    /// End index in the source string (0-based, exclusive)
    end: usize,
}

impl<T> SourceRangeMixin<T> {
    /// Instances a new `SourceRangeMixin` over `range`.
    pub const fn new(content: T, range: Range<usize>) -> Self {
        Self {
            content,
            start: range.start,
            end: range.end,
        }
    }

    /// Returns the wrapped content.
    pub const fn content(&self) -> &T {
        &self.content
    }

    /// Leans the content out of the wrapper.
    pub fn into_content(self) -> T {
        self.content
    }

    /// Returns the source span as a range.
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the source span as a tuple of (start, end).
    pub const fn as_span(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Returns true if the source span's length is 0.
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Maps the content of the wrapper, keeping the span.
    pub fn map<U, F>(self, f: F) -> SourceRangeMixin<U>
    where
        F: FnOnce(T) -> U,
    {
        SourceRangeMixin::new(f(self.content), self.start..self.end)
    }
}

impl<T: AsRef<str>> SourceRangeMixin<T> {
    /// Returns the wrapped content as a string slice.
    pub fn as_str(&self) -> &str {
        self.content.as_ref()
    }
}

impl<T: std::fmt::Display> std::fmt::Display for SourceRangeMixin<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at indices [{}, {})",
            self.content, self.start, self.end
        )
    }
}

impl<T: std::error::Error + 'static> std::error::Error for SourceRangeMixin<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.content)
    }
}

/// Extension methods for wrapping values into a [`SourceRangeMixin`].
pub trait SourceRangeMixinExt {
    /// Instances a new `SourceRangeMixin` with the same span as `wrapper`.
    fn into_wrapper<W>(self, wrapper: &SourceRangeMixin<W>) -> SourceRangeMixin<Self>
    where
        Self: Sized,
    {
        SourceRangeMixin::new(self, wrapper.range())
    }

    /// Instances a new `SourceRangeMixin` with the given range.
    fn into_wrapper_range(self, range: Range<usize>) -> SourceRangeMixin<Self>
    where
        Self: Sized,
    {
        SourceRangeMixin::new(self, range)
    }
}

impl<T> SourceRangeMixinExt for T {}
