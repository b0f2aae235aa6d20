//! Definitions of enums and constants from the OpenStep property list format.
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use static_assertions::const_assert_eq;

use core::fmt;

/// Canonical lowercase names of every node kind, indexed by the [`Kind`]
/// discriminant.
pub const KIND_NAMES: [&str; 10] = [
    "dict", "key", "array", "data", "date", "string", "integer", "real", "boolean", "unknown",
];

// A name for every kind, a kind for every name.
const_assert_eq!(KIND_NAMES.len(), Kind::Unknown as usize + 1);

/// An enumeration of the kinds a property list node may take.
///
/// `Unknown` is a sentinel produced only by [`Kind::from_name`]; no node in
/// a tree ever carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Kind {
    Dict = 0,
    Key,
    Array,
    Data,
    Date,
    String,
    Integer,
    Real,
    Boolean,
    Unknown,
}

impl Kind {
    /// Returns the canonical lowercase name of this kind.
    #[inline]
    #[must_use]
    pub fn as_name(self) -> &'static str {
        KIND_NAMES[self as usize]
    }

    /// Looks a kind up by name, ignoring ASCII case.
    ///
    /// Names that match no kind map to [`Kind::Unknown`].
    #[must_use]
    pub fn from_name(name: &str) -> Kind {
        KIND_NAMES
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .and_then(Kind::from_usize)
            .unwrap_or(Kind::Unknown)
    }

    /// Whether nodes of this kind hold children (Dict, Key, Array).
    #[inline]
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, Kind::Dict | Kind::Key | Kind::Array)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_name())
    }
}

/// An enumeration of the single-byte tokens that separate values within the
/// textual plist grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub(crate) enum PlistTok {
    StringMark = 0x22, // '"'
    ArrayBegin = 0x28, // '('
    ArrayEnd = 0x29,   // ')'
    ElemSep = 0x2c,    // ','
    KeySep = 0x3a,     // ':'
    EntryEnd = 0x3b,   // ';'
    DataBegin = 0x3c,  // '<'
    DataEnd = 0x3e,    // '>'
    DictBegin = 0x7b,  // '{'
    DictEnd = 0x7d,    // '}'
}

/// Marker bytes distinguishing a date literal from a data literal after `<`.
pub(crate) const DATE_MARK: u8 = b'*';
pub(crate) const DATE_KIND: u8 = b'D';

/// Blank bytes skipped between tokens. Newlines are treated as blanks.
#[inline]
pub(crate) fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Translates the byte following a backslash inside a quoted string.
///
/// Bytes outside the escape table pass through as themselves.
#[inline]
pub(crate) fn unescape(b: u8) -> u8 {
    match b {
        b'b' => 0x08,
        b't' => 0x09,
        b'f' => 0x0c,
        b'n' => 0x0a,
        b'r' => 0x0d,
        other => other,
    }
}

/// A broken-down calendar time as carried by a date literal.
///
/// `utc_offset` is the offset east of UTC in seconds, as parsed from the
/// literal's trailing `+HHMM`/`-HHMM` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlistDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub utc_offset: i32,
}
