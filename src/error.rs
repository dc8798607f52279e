//! Errors raised while building patterns or driving a cursor.

use thiserror::Error;

/// Represents an error encountered while constructing or compiling a pattern.
///
/// A text which simply fails to match is not an error: that is reported as
/// [`Outcome::Failure`](crate::Outcome::Failure).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A required string argument was empty.
    #[error("argument `{param}` must not be empty")]
    EmptyArgument { param: &'static str },

    /// A repetition count was zero.
    #[error("repeat count must be positive, got {count}")]
    NonPositiveCount { count: usize },

    /// A span was asked to repeat a pattern which can match the empty string.
    #[error("span body can match the empty string")]
    ZeroWidthSpan,

    /// A nested range whose opening and closing delimiters are the same.
    #[error("nested range requires distinct delimiters, got `{delimiter}` for both")]
    AmbiguousNesting { delimiter: String },

    /// A character range whose first character sorts after its last.
    #[error("character range reversed: {first:?} is greater than {last:?}")]
    ReversedCharRange { first: char, last: char },

    /// A capture reference whose capture is not defined anywhere in the tree.
    #[error("capture `{name}` is referenced but never defined")]
    UndefinedCapture { name: String },

    /// More capture definitions than slots.
    #[error("capture count limit exceeded")]
    TooManyCaptures,

    /// A mark was restored on a cursor other than the one that produced it.
    #[error("mark does not belong to this cursor")]
    InvalidMark,

    /// A match was requested from a position past the end of the input.
    #[error("start position {start} is past the end of the input (length {len})")]
    StartOutOfBounds { start: usize, len: usize },

    /// A match was requested from a byte offset inside a UTF-8 sequence.
    #[error("start position {start} is not on a character boundary")]
    NotCharBoundary { start: usize },
}
