//! Errors reported by this library

#[cfg(doc)]
use crate::parse::PlistParser;

use alloc::collections::TryReserveError;
use core::fmt;
use core::result;
use core::str::Utf8Error;

/// An error describing problems encountered while building or parsing
/// property list trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlistError {
    /// A required argument was missing or malformed (e.g. an empty data
    /// buffer passed to a constructor that requires content).
    InvalidParameter(&'static str),

    /// An allocation for the scanner buffer could not be satisfied.
    NotEnoughMemory,

    /// The operation was applied to a node of the wrong kind.
    WrongKind,

    /// The value already has a parent and may not be attached again.
    AlreadyAttached,

    /// An array index outside the valid bounds.
    OutOfRange,

    /// The named dictionary key does not exist, or [`PlistParser::result`]
    /// was called before a complete root value was parsed.
    NotFound,

    /// The input was not a valid property list: bad grammar, an
    /// unterminated token, a number that fails conversion, or a duplicate
    /// dictionary key.
    ParseError,

    /// While trying to convert bytes that were supposed to be a string,
    /// invalid `str` sequences were encountered.
    StrError(Utf8Error),
}

impl From<Utf8Error> for PlistError {
    fn from(e: Utf8Error) -> PlistError {
        PlistError::StrError(e)
    }
}

impl From<TryReserveError> for PlistError {
    fn from(_: TryReserveError) -> PlistError {
        PlistError::NotEnoughMemory
    }
}

/// The result of a fallible plist operation.
pub type Result<T> = result::Result<T, PlistError>;

impl fmt::Display for PlistError {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match *self {
            PlistError::InvalidParameter(err) => write!(f, "Invalid parameter supplied: {}", err),
            PlistError::NotEnoughMemory => write!(f, "Unable to grow the scanner buffer."),

            PlistError::WrongKind => write!(f, "Operation applied to a node of the wrong kind."),
            PlistError::AlreadyAttached => write!(f, "Node is already attached to a parent."),
            PlistError::OutOfRange => write!(f, "Array index out of range."),
            PlistError::NotFound => write!(f, "No such key or no parsed value available."),

            PlistError::ParseError => write!(f, "Failed to parse property list. It is invalid."),
            PlistError::StrError(utf_err) => {
                write!(f, "Failed to parse property list string: {}", utf_err)
            }
        }
    }
}
