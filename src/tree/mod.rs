//! The in-memory property list tree.
//!
//! A [`PlistTree`] owns every node in slot storage and hands out stable
//! [`NodeId`] indices; parent links are stored as ids, so arbitrarily deep
//! trees need no recursion to copy or tear down.
//!
//! # Examples
//!
//! ```
//! use plist_rs::tree::PlistTree;
//!
//! let mut tree = PlistTree::new();
//! let dict = tree.new_dict();
//! let name = tree.new_string("Alice");
//! tree.dict_set(dict, "name", name).unwrap();
//!
//! let root = tree.node(dict).unwrap();
//! assert_eq!(root.get("name").unwrap().as_str(), Some("Alice"));
//! ```

#[doc(hidden)]
pub mod node;
#[doc(hidden)]
pub mod tree;

pub mod iters;

#[doc(inline)]
pub use node::{NodeId, PlistNode};
#[doc(inline)]
pub use tree::PlistTree;
