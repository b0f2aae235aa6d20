//! Node payloads and the read-only node handle.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::slice;

use super::iters::{Children, Dfs};
use super::tree::PlistTree;
use crate::spec::{Kind, PlistDate};

/// An identifier of a node within a [`PlistTree`].
///
/// Ids are stable for the lifetime of the node they name. Releasing a node
/// retires its id; a retired id must not be used again (the slot may be
/// recycled for a later node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// The typed payload of a node. One variant per kind.
#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Dict(Vec<NodeId>),
    Key { name: String, value: Option<NodeId> },
    Array(Vec<NodeId>),
    Data(Vec<u8>),
    Date(PlistDate),
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
}

impl Payload {
    pub fn kind(&self) -> Kind {
        match self {
            Payload::Dict(..) => Kind::Dict,
            Payload::Key { .. } => Kind::Key,
            Payload::Array(..) => Kind::Array,
            Payload::Data(..) => Kind::Data,
            Payload::Date(..) => Kind::Date,
            Payload::String(..) => Kind::String,
            Payload::Integer(..) => Kind::Integer,
            Payload::Real(..) => Kind::Real,
            Payload::Boolean(..) => Kind::Boolean,
        }
    }

    /// Child ids in insertion order. Empty for scalars and valueless keys.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Payload::Dict(kids) | Payload::Array(kids) => kids,
            Payload::Key { value, .. } => value.as_ref().map(slice::from_ref).unwrap_or(&[]),
            _ => &[],
        }
    }
}

/// A stored node: its parent link plus the typed payload.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub parent: Option<NodeId>,
    pub payload: Payload,
}

/// A read-only handle on one node of a [`PlistTree`].
///
/// The handle borrows the tree, so it is cheap to copy and can never
/// outlive a mutation that would invalidate it.
#[derive(Clone, Copy)]
pub struct PlistNode<'a> {
    tree: &'a PlistTree,
    id: NodeId,
    pub(crate) node: &'a NodeData,
}

impl<'a> PlistNode<'a> {
    pub(crate) fn new(tree: &'a PlistTree, id: NodeId, node: &'a NodeData) -> Self {
        Self { tree, id, node }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn tree(&self) -> &'a PlistTree {
        self.tree
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.node.payload.kind()
    }

    pub fn parent(&self) -> Option<PlistNode<'a>> {
        self.tree.node(self.node.parent?)
    }

    /// Iterates the direct children in insertion order.
    pub fn children(&self) -> Children<'a> {
        Children::new(self.tree, self.node.payload.children())
    }

    /// Iterates this subtree in pre-order, yielding `(depth, node)`.
    pub fn dfs(&self) -> Dfs<'a> {
        Dfs::new(*self)
    }

    /// The number of direct children: key count for a Dict, element count
    /// for an Array.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.node.payload.children().len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The name of a Key node.
    pub fn key_name(&self) -> Option<&'a str> {
        match &self.node.payload {
            Payload::Key { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The value of a Key node.
    pub fn key_value(&self) -> Option<PlistNode<'a>> {
        match &self.node.payload {
            Payload::Key { value, .. } => self.tree.node((*value)?),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match &self.node.payload {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&'a [u8]> {
        match &self.node.payload {
            Payload::Data(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&'a PlistDate> {
        match &self.node.payload {
            Payload::Date(date) => Some(date),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.node.payload {
            Payload::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self.node.payload {
            Payload::Real(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self.node.payload {
            Payload::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// Looks a Dict entry up by key name and returns its value.
    pub fn get(&self, name: &str) -> Option<PlistNode<'a>> {
        match &self.node.payload {
            Payload::Dict(..) => {
                let value = self.tree.dict_get(self.id, name)?;
                self.tree.node(value)
            }
            _ => None,
        }
    }

    /// Returns the Array element at `loc`.
    pub fn at(&self, loc: usize) -> Option<PlistNode<'a>> {
        match &self.node.payload {
            Payload::Array(items) => self.tree.node(*items.get(loc)?),
            _ => None,
        }
    }
}

/// Structural equality: equal kinds, payloads, key names and child order,
/// compared iteratively over a worklist of node pairs.
impl<'a, 'b> PartialEq<PlistNode<'b>> for PlistNode<'a> {
    fn eq(&self, other: &PlistNode<'b>) -> bool {
        let mut work: Vec<(PlistNode<'a>, PlistNode<'b>)> = Vec::new();
        work.push((*self, *other));

        while let Some((a, b)) = work.pop() {
            match (&a.node.payload, &b.node.payload) {
                (Payload::Data(x), Payload::Data(y)) if x == y => {}
                (Payload::Date(x), Payload::Date(y)) if x == y => {}
                (Payload::String(x), Payload::String(y)) if x == y => {}
                (Payload::Integer(x), Payload::Integer(y)) if x == y => {}
                (Payload::Real(x), Payload::Real(y)) if x == y => {}
                (Payload::Boolean(x), Payload::Boolean(y)) if x == y => {}
                (Payload::Key { name: x, .. }, Payload::Key { name: y, .. }) if x == y => {
                    if !push_child_pairs(&a, &b, &mut work) {
                        return false;
                    }
                }
                (Payload::Dict(..), Payload::Dict(..)) | (Payload::Array(..), Payload::Array(..)) => {
                    if !push_child_pairs(&a, &b, &mut work) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

fn push_child_pairs<'a, 'b>(
    a: &PlistNode<'a>,
    b: &PlistNode<'b>,
    work: &mut Vec<(PlistNode<'a>, PlistNode<'b>)>,
) -> bool {
    if a.len() != b.len() {
        return false;
    }
    for (ca, cb) in a.children().zip(b.children()) {
        work.push((ca, cb));
    }
    true
}

impl fmt::Debug for PlistNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PlistNode")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .finish()
    }
}
