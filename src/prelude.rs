//! Module exporting traits of this library.
pub use fallible_iterator::FallibleIterator;
