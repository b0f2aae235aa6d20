//! The node arena and every mutating tree operation.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::node::{NodeData, NodeId, Payload, PlistNode};
use crate::error::{PlistError, Result};
use crate::spec::{Kind, PlistDate};

/// An arena owning property list nodes.
///
/// Nodes live in slot storage addressed by [`NodeId`]; released slots are
/// recycled through a free list. One tree may hold several disjoint roots
/// (detached values are simply parentless nodes awaiting re-attach or
/// release).
#[derive(Debug, Default, Clone)]
pub struct PlistTree {
    slots: Vec<Option<NodeData>>,
    free: Vec<usize>,
}

impl PlistTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, payload: Payload) -> NodeId {
        let data = NodeData {
            parent: None,
            payload,
        };
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(data);
                NodeId(slot)
            }
            None => {
                self.slots.push(Some(data));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub(crate) fn data(&self, id: NodeId) -> Result<&NodeData> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(PlistError::NotFound)
    }

    pub(crate) fn data_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(PlistError::NotFound)
    }

    /// Returns a read handle on the node, or `None` for a retired id.
    pub fn node(&self, id: NodeId) -> Option<PlistNode<'_>> {
        let data = self.slots.get(id.0)?.as_ref()?;
        Some(PlistNode::new(self, id, data))
    }

    /// The kind of the node named by `id`.
    pub fn kind(&self, id: NodeId) -> Result<Kind> {
        Ok(self.data(id)?.payload.kind())
    }

    /// The number of live nodes in the arena.
    ///
    /// After releasing a subtree of N nodes this drops by exactly N, which
    /// is what the leak-freedom tests observe.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /* ------------------------- constructors ------------------------- */

    pub fn new_dict(&mut self) -> NodeId {
        self.alloc(Payload::Dict(Vec::new()))
    }

    pub fn new_array(&mut self) -> NodeId {
        self.alloc(Payload::Array(Vec::new()))
    }

    /// Creates a Data node owning a copy of `bytes`.
    ///
    /// Rejects an empty buffer with
    /// [`InvalidParameter`](PlistError::InvalidParameter).
    pub fn new_data(&mut self, bytes: &[u8]) -> Result<NodeId> {
        if bytes.is_empty() {
            return Err(PlistError::InvalidParameter("empty data buffer"));
        }
        Ok(self.alloc(Payload::Data(bytes.to_vec())))
    }

    /// Creates a Date node holding a copy of the broken-down time.
    pub fn new_date(&mut self, date: &PlistDate) -> NodeId {
        self.alloc(Payload::Date(*date))
    }

    pub fn new_string(&mut self, s: &str) -> NodeId {
        self.alloc(Payload::String(String::from(s)))
    }

    /// Wraps an already-owned string without copying. The parser hands the
    /// scanner buffer's bytes straight in through this.
    pub(crate) fn new_string_owned(&mut self, s: String) -> NodeId {
        self.alloc(Payload::String(s))
    }

    /// The formatted-string constructor: renders `args` and wraps the
    /// result in a String node.
    pub fn new_string_fmt(&mut self, args: fmt::Arguments) -> NodeId {
        self.alloc(Payload::String(alloc::fmt::format(args)))
    }

    pub fn new_integer(&mut self, v: i64) -> NodeId {
        self.alloc(Payload::Integer(v))
    }

    pub fn new_real(&mut self, v: f64) -> NodeId {
        self.alloc(Payload::Real(v))
    }

    pub fn new_boolean(&mut self, v: bool) -> NodeId {
        self.alloc(Payload::Boolean(v))
    }

    /// Creates a detached Key owning a copy of `name` and adopting `value`.
    ///
    /// Detached Keys exist to be handed to [`PlistTree::dict_update`];
    /// inside a Dict, entries are created with [`PlistTree::dict_set`].
    pub fn new_key(&mut self, name: &str, value: NodeId) -> Result<NodeId> {
        if self.data(value)?.parent.is_some() {
            return Err(PlistError::AlreadyAttached);
        }
        let key = self.alloc(Payload::Key {
            name: String::from(name),
            value: None,
        });
        self.adopt(key, value)?;
        Ok(key)
    }

    /// Creates a detached Key node with no value yet. The parser fills the
    /// value in as soon as the next value token completes.
    pub(crate) fn new_open_key(&mut self, name: String) -> NodeId {
        self.alloc(Payload::Key { name, value: None })
    }

    /* ------------------------- attach checks ------------------------ */

    /// A value may be attached if it is live, parentless, and does not
    /// contain the container it is being attached under.
    fn check_attachable(&self, container: NodeId, value: NodeId) -> Result<()> {
        if self.data(value)?.parent.is_some() {
            return Err(PlistError::AlreadyAttached);
        }
        let mut cur = Some(container);
        while let Some(c) = cur {
            if c == value {
                return Err(PlistError::InvalidParameter("attach would create a cycle"));
            }
            cur = self.data(c)?.parent;
        }
        Ok(())
    }

    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<()> {
        self.data_mut(id)?.parent = parent;
        Ok(())
    }

    /* --------------------------- dict ops --------------------------- */

    fn dict_keys(&self, dict: NodeId) -> Result<&[NodeId]> {
        match &self.data(dict)?.payload {
            Payload::Dict(keys) => Ok(keys),
            _ => Err(PlistError::WrongKind),
        }
    }

    fn dict_keys_mut(&mut self, dict: NodeId) -> Result<&mut Vec<NodeId>> {
        match &mut self.data_mut(dict)?.payload {
            Payload::Dict(keys) => Ok(keys),
            _ => Err(PlistError::WrongKind),
        }
    }

    /// Finds the Key node of `dict` named `name`.
    pub(crate) fn dict_find_key(&self, dict: NodeId, name: &str) -> Result<Option<NodeId>> {
        for &key in self.dict_keys(dict)? {
            if let Payload::Key { name: kname, .. } = &self.data(key)?.payload {
                if kname == name {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }

    /// Returns the value stored under `name`, if any.
    pub fn dict_get(&self, dict: NodeId, name: &str) -> Option<NodeId> {
        let key = self.dict_find_key(dict, name).ok()??;
        match self.data(key).ok()?.payload {
            Payload::Key { value, .. } => value,
            _ => None,
        }
    }

    /// Whether `dict` holds an entry named `name`.
    #[must_use]
    pub fn dict_has(&self, dict: NodeId, name: &str) -> bool {
        matches!(self.dict_find_key(dict, name), Ok(Some(_)))
    }

    /// Stores `value` under `name`, replacing (and releasing) any existing
    /// entry of that name. The new entry is appended at the tail of the
    /// iteration order; the Key owns a copy of `name` and adopts `value`.
    pub fn dict_set(&mut self, dict: NodeId, name: &str, value: NodeId) -> Result<()> {
        self.dict_keys(dict)?;
        self.check_attachable(dict, value)?;

        if let Some(old) = self.dict_find_key(dict, name)? {
            self.release(old)?;
        }

        let key = self.new_open_key(String::from(name));
        self.adopt(key, value)?;
        self.set_parent(key, Some(dict))?;
        self.dict_keys_mut(dict)?.push(key);
        Ok(())
    }

    /// Detaches the entry named `name`, frees the Key wrapper, and returns
    /// the now-parentless value.
    pub fn dict_pop(&mut self, dict: NodeId, name: &str) -> Result<NodeId> {
        let key = self
            .dict_find_key(dict, name)?
            .ok_or(PlistError::NotFound)?;
        self.dict_keys_mut(dict)?.retain(|&k| k != key);

        let value = match &mut self.data_mut(key)?.payload {
            Payload::Key { value, .. } => value.take(),
            _ => None,
        }
        .ok_or(PlistError::NotFound)?;

        self.set_parent(value, None)?;
        self.slots[key.0] = None;
        self.free.push(key.0);
        Ok(value)
    }

    /// Removes the entry named `name` and releases its value.
    pub fn dict_del(&mut self, dict: NodeId, name: &str) -> Result<()> {
        let value = self.dict_pop(dict, name)?;
        self.release(value)
    }

    /// Merges the Keys contributed by `other` into `dict`.
    ///
    /// `other` may be another Dict, a single Key, or an Array whose
    /// elements are all Keys. Each contributed Key is deep-copied; a
    /// same-named existing entry is released before the copy is appended.
    /// The copies are staged first, so a failure part-way leaves `dict`
    /// unchanged.
    pub fn dict_update(&mut self, dict: NodeId, other: NodeId) -> Result<()> {
        self.dict_keys(dict)?;

        let sources: Vec<NodeId> = match &self.data(other)?.payload {
            Payload::Dict(keys) => keys.clone(),
            Payload::Key { .. } => alloc::vec![other],
            Payload::Array(items) => {
                for &item in items {
                    if self.kind(item)? != Kind::Key {
                        return Err(PlistError::WrongKind);
                    }
                }
                items.clone()
            }
            _ => return Err(PlistError::WrongKind),
        };

        let mut staged: Vec<NodeId> = Vec::new();
        for src in sources {
            match self.copy(src) {
                Ok(copy) => staged.push(copy),
                Err(e) => {
                    for s in staged {
                        let _ = self.release(s);
                    }
                    return Err(e);
                }
            }
        }

        for key in staged {
            let name = match &self.data(key)?.payload {
                Payload::Key { name, .. } => name.clone(),
                _ => return Err(PlistError::WrongKind),
            };
            if let Some(old) = self.dict_find_key(dict, &name)? {
                self.release(old)?;
            }
            self.set_parent(key, Some(dict))?;
            self.dict_keys_mut(dict)?.push(key);
        }
        Ok(())
    }

    /* -------------------------- array ops --------------------------- */

    fn array_items(&self, array: NodeId) -> Result<&[NodeId]> {
        match &self.data(array)?.payload {
            Payload::Array(items) => Ok(items),
            _ => Err(PlistError::WrongKind),
        }
    }

    fn array_items_mut(&mut self, array: NodeId) -> Result<&mut Vec<NodeId>> {
        match &mut self.data_mut(array)?.payload {
            Payload::Array(items) => Ok(items),
            _ => Err(PlistError::WrongKind),
        }
    }

    /// Appends `value` at the tail of `array`.
    pub fn array_append(&mut self, array: NodeId, value: NodeId) -> Result<()> {
        let count = self.array_items(array)?.len();
        self.array_insert(array, count, value)
    }

    /// Inserts `value` at `loc`. `loc` may be anywhere in `[0, count]`;
    /// inserting at `count` is an append.
    pub fn array_insert(&mut self, array: NodeId, loc: usize, value: NodeId) -> Result<()> {
        let count = self.array_items(array)?.len();
        if loc > count {
            return Err(PlistError::OutOfRange);
        }
        self.check_attachable(array, value)?;
        self.set_parent(value, Some(array))?;
        self.array_items_mut(array)?.insert(loc, value);
        Ok(())
    }

    /// Detaches and returns the element at `loc`.
    pub fn array_pop(&mut self, array: NodeId, loc: usize) -> Result<NodeId> {
        let count = self.array_items(array)?.len();
        if loc >= count {
            return Err(PlistError::OutOfRange);
        }
        let value = self.array_items_mut(array)?.remove(loc);
        self.set_parent(value, None)?;
        Ok(value)
    }

    /// Removes the element at `loc` and releases it.
    pub fn array_del(&mut self, array: NodeId, loc: usize) -> Result<()> {
        let value = self.array_pop(array, loc)?;
        self.release(value)
    }

    /* ------------------------- copy / release ----------------------- */

    /// A childless clone of one node's payload.
    fn shallow(&self, id: NodeId) -> Result<Payload> {
        Ok(match &self.data(id)?.payload {
            Payload::Dict(..) => Payload::Dict(Vec::new()),
            Payload::Array(..) => Payload::Array(Vec::new()),
            Payload::Key { name, .. } => Payload::Key {
                name: name.clone(),
                value: None,
            },
            scalar => scalar.clone(),
        })
    }

    /// Wires a freshly created, parentless node under a container. Callers
    /// are responsible for the attach checks; the parser and `copy` both
    /// attach nodes they just allocated.
    pub(crate) fn adopt(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        match &mut self.data_mut(parent)?.payload {
            Payload::Dict(kids) | Payload::Array(kids) => kids.push(child),
            Payload::Key { value, .. } => *value = Some(child),
            _ => return Err(PlistError::WrongKind),
        }
        self.set_parent(child, Some(parent))
    }

    /// Deep-copies the subtree rooted at `src`, returning a disjoint,
    /// parentless copy in the same arena.
    ///
    /// The traversal is an iterative pre-order descent over a frontier of
    /// `(source child, destination parent)` pairs; nothing recurses, so
    /// arbitrarily deep trees are safe.
    pub fn copy(&mut self, src: NodeId) -> Result<NodeId> {
        let payload = self.shallow(src)?;
        let dst_root = self.alloc(payload);

        let mut frontier: Vec<(NodeId, NodeId)> = Vec::new();
        for &child in self.data(src)?.payload.children().iter().rev() {
            frontier.push((child, dst_root));
        }

        while let Some((s, dst_parent)) = frontier.pop() {
            let payload = self.shallow(s)?;
            let d = self.alloc(payload);
            self.adopt(dst_parent, d)?;
            for &child in self.data(s)?.payload.children().iter().rev() {
                frontier.push((child, d));
            }
        }
        Ok(dst_root)
    }

    /// Detaches `node` from its parent and releases the entire subtree.
    ///
    /// Teardown walks a worklist of pending ids, never the call stack.
    pub fn release(&mut self, node: NodeId) -> Result<()> {
        if let Some(parent) = self.data(node)?.parent {
            match &mut self.data_mut(parent)?.payload {
                Payload::Dict(kids) | Payload::Array(kids) => kids.retain(|&k| k != node),
                Payload::Key { value, .. } => *value = None,
                _ => return Err(PlistError::WrongKind),
            }
        }

        let mut work = alloc::vec![node];
        while let Some(n) = work.pop() {
            if let Some(data) = self.slots.get_mut(n.0).and_then(Option::take) {
                work.extend(data.payload.children().iter().copied());
                self.free.push(n.0);
            }
        }
        Ok(())
    }
}
