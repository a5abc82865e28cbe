//! Error types raised while reading JSON text.

use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors surfaced while classifying, skipping, or decoding a JSON value.
///
/// Every variant records the byte offset at which the reader gave up so the
/// caller can report the position of the fault within the original buffer.
#[derive(Debug, Error)]
pub enum JsonError {
    /// The buffer ended where another token was required.
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEnd {
        /// Offset equal to the buffer length.
        offset: usize,
    },
    /// A structural character other than the expected one was found.
    #[error("expected {expected} at byte {offset}, found '{found}'")]
    Unexpected {
        /// Human readable description of the expected token.
        expected: &'static str,
        /// Character found instead.
        found: char,
        /// Offset of the offending byte.
        offset: usize,
    },
    /// A string literal was not closed before the buffer ended.
    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString {
        /// Offset of the opening quote.
        offset: usize,
    },
    /// A backslash escape outside the supported set was encountered.
    #[error("unsupported escape '\\{escape}' at byte {offset}")]
    BadEscape {
        /// Character following the backslash.
        escape: char,
        /// Offset of the backslash.
        offset: usize,
    },
    /// A number literal did not match `-?digit+(.digit+)?([eE][+-]?digit+)?`.
    #[error("malformed number at byte {offset}")]
    BadNumber {
        /// Offset of the first byte of the literal.
        offset: usize,
    },
    /// A boolean literal was neither `true` nor `false`.
    #[error("malformed boolean at byte {offset}")]
    BadBoolean {
        /// Offset of the first byte of the literal.
        offset: usize,
    },
    /// A `null` literal was misspelt.
    #[error("malformed null at byte {offset}")]
    BadNull {
        /// Offset of the first byte of the literal.
        offset: usize,
    },
    /// An array was missing its closing bracket or contained a stray delimiter.
    #[error("malformed array at byte {offset}")]
    BadArray {
        /// Offset at which the array structure broke down.
        offset: usize,
    },
    /// An object was missing a key, colon, comma, or closing brace.
    #[error("malformed object at byte {offset}")]
    BadObject {
        /// Offset at which the object structure broke down.
        offset: usize,
    },
    /// Containers were nested beyond [`MAX_DEPTH`](crate::MAX_DEPTH).
    #[error("nesting deeper than {max} levels at byte {offset}")]
    NestingTooDeep {
        /// Configured nesting limit.
        max: usize,
        /// Offset of the container that exceeded the limit.
        offset: usize,
    },
    /// A decoded string was not valid UTF-8.
    #[error("string at byte {offset} is not valid UTF-8")]
    InvalidUtf8 {
        /// Offset of the opening quote.
        offset: usize,
        /// Underlying conversion failure.
        #[source]
        source: FromUtf8Error,
    },
}

impl JsonError {
    /// Offset within the source buffer where the error was detected.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::UnexpectedEnd { offset }
            | Self::Unexpected { offset, .. }
            | Self::UnterminatedString { offset }
            | Self::BadEscape { offset, .. }
            | Self::BadNumber { offset }
            | Self::BadBoolean { offset }
            | Self::BadNull { offset }
            | Self::BadArray { offset }
            | Self::BadObject { offset }
            | Self::NestingTooDeep { offset, .. }
            | Self::InvalidUtf8 { offset, .. } => *offset,
        }
    }
}
