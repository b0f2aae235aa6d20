//! An incremental parser and in-memory tree for NeXT/OpenStep textual
//! property lists, extended with the scalar kinds (booleans, integers,
//! reals, dates) the classic ASCII grammar cannot express.
//!
//! The crate has two halves:
//!
//! * [`tree`]: the owned node arena: dictionaries, arrays, and seven
//!   scalar kinds with parent links, insertion-order iteration, deep copy,
//!   and iterative teardown.
//! * [`parse`]: the resumable parser: feed the input as arbitrary byte
//!   chunks (token boundaries may fall anywhere) and take the finished
//!   tree once the root value completes.
//!
//! ```
//! use plist_rs::parse;
//!
//! let plist = parse::parse(b"{ \"name\" : \"Alice\" ; \"age\" : 37 ; }").unwrap();
//! let root = plist.root().unwrap();
//! assert_eq!(root.get("age").unwrap().as_integer(), Some(37));
//! ```
//!
//! The crate is `no_std`-capable (an allocator is required); the `std`
//! feature is on by default.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate core;

extern crate alloc;

pub mod dump;
pub mod error;
pub mod parse;
pub mod prelude;
pub mod spec;
pub mod tree;

mod buf_util;
