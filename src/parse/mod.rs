//! Incremental parsing of textual property lists.
//!
//! Two layers, smallest first:
//!
//! * [`TokenScanner`] / [`ChunkTokens`]: a resumable tokenizer exposed as
//!   a [`FallibleIterator`] over the tokens completed within one chunk.
//! * [`PlistParser`]: the push parser: feed arbitrary byte chunks, then
//!   take the finished [`Plist`] with [`PlistParser::result`].
//!
//! # Examples
//!
//! ```
//! use plist_rs::parse::PlistParser;
//!
//! let mut parser = PlistParser::new();
//! parser.feed(b"{ \"name\" : \"Al").unwrap();
//! parser.feed(b"ice\" ; }").unwrap();
//!
//! let plist = parser.result().unwrap();
//! let root = plist.root().unwrap();
//! assert_eq!(root.get("name").unwrap().as_str(), Some("Alice"));
//! ```
//!
//! [`FallibleIterator`]: fallible_iterator::FallibleIterator

#[doc(hidden)]
pub mod parser;
#[doc(hidden)]
pub mod token;

#[doc(inline)]
pub use parser::{parse, Plist, PlistParser};
#[doc(inline)]
pub use token::{ChunkTokens, Token, TokenScanner};
