//! The resumable push parser.
//!
//! [`PlistParser`] consumes the token stream of [`ChunkTokens`] and builds
//! the tree as tokens complete. The innermost open container is tracked
//! through the tree's own parent links, so parsing depth costs no side
//! stack and no recursion.
//!
//! [`ChunkTokens`]: crate::parse::ChunkTokens

use core::mem;

use fallible_iterator::FallibleIterator;

use super::token::{Token, TokenScanner};
use crate::error::{PlistError, Result};
use crate::spec::Kind;
use crate::tree::node::Payload;
use crate::tree::{NodeId, PlistNode, PlistTree};

/// A completely parsed document: the node arena plus its root id.
#[derive(Debug)]
pub struct Plist {
    tree: PlistTree,
    root: NodeId,
}

impl Plist {
    #[inline]
    pub fn tree(&self) -> &PlistTree {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut PlistTree {
        &mut self.tree
    }

    #[inline]
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// A read handle on the root value. `None` only if the root was
    /// released through [`Plist::tree_mut`].
    pub fn root(&self) -> Option<PlistNode<'_>> {
        self.tree.node(self.root)
    }

    pub fn into_parts(self) -> (PlistTree, NodeId) {
        (self.tree, self.root)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Building,
    Done,
    Failed,
}

/// Owns the tree under construction and the open-frame chain.
#[derive(Debug)]
struct Builder {
    tree: PlistTree,
    root: Option<NodeId>,
    /// The innermost open Dict, Key, or Array.
    open: Option<NodeId>,
}

impl Builder {
    fn new() -> Self {
        Self {
            tree: PlistTree::new(),
            root: None,
            open: None,
        }
    }

    /// A complete root exists and every container has been closed.
    fn finished(&self) -> bool {
        self.root.is_some() && self.open.is_none()
    }

    fn parent_of(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.tree.data(id)?.parent)
    }

    fn open_kind(&self) -> Result<Option<Kind>> {
        match self.open {
            Some(id) => Ok(Some(self.tree.kind(id)?)),
            None => Ok(None),
        }
    }

    fn key_filled(&self, key: NodeId) -> Result<bool> {
        match &self.tree.data(key)?.payload {
            Payload::Key { value, .. } => Ok(value.is_some()),
            _ => Err(PlistError::ParseError),
        }
    }

    /// Attaches a completed value per the open-frame rule; containers stay
    /// open afterwards.
    fn attach(&mut self, value: NodeId, open_it: bool) -> Result<()> {
        match self.open {
            None => {
                if self.root.is_some() {
                    // A second root value is not part of any document.
                    return Err(PlistError::ParseError);
                }
                self.root = Some(value);
            }
            Some(open) => match self.tree.kind(open)? {
                Kind::Array => self.tree.adopt(open, value)?,
                Kind::Key => {
                    if self.key_filled(open)? {
                        return Err(PlistError::ParseError);
                    }
                    self.tree.adopt(open, value)?;
                }
                // A value directly inside a Dict must be a key string;
                // those never reach this path.
                _ => return Err(PlistError::ParseError),
            },
        }
        if open_it {
            self.open = Some(value);
        }
        Ok(())
    }

    fn apply(&mut self, tok: Token) -> Result<()> {
        match tok {
            Token::DictBegin => {
                let dict = self.tree.new_dict();
                self.attach(dict, true)
            }
            Token::ArrayBegin => {
                let array = self.tree.new_array();
                self.attach(array, true)
            }
            Token::DictEnd => {
                // `{ "k" : v }` without a trailing `;` leaves the Key
                // open; pop it before closing the dict.
                if let Some(open) = self.open {
                    if self.tree.kind(open)? == Kind::Key {
                        if !self.key_filled(open)? {
                            return Err(PlistError::ParseError);
                        }
                        self.open = self.parent_of(open)?;
                    }
                }
                match self.open {
                    Some(dict) if self.tree.kind(dict) == Ok(Kind::Dict) => {
                        self.open = self.parent_of(dict)?;
                        Ok(())
                    }
                    _ => Err(PlistError::ParseError),
                }
            }
            Token::ArrayEnd => match self.open {
                Some(array) if self.tree.kind(array) == Ok(Kind::Array) => {
                    self.open = self.parent_of(array)?;
                    Ok(())
                }
                _ => Err(PlistError::ParseError),
            },
            Token::ElemSep => match self.open_kind()? {
                Some(Kind::Array) => Ok(()),
                _ => Err(PlistError::ParseError),
            },
            Token::KeySep => match self.open_kind()? {
                Some(Kind::Key) => Ok(()),
                _ => Err(PlistError::ParseError),
            },
            Token::EntryEnd => match self.open {
                Some(key)
                    if self.tree.kind(key) == Ok(Kind::Key)
                        && self.key_filled(key) == Ok(true) =>
                {
                    self.open = self.parent_of(key)?;
                    Ok(())
                }
                _ => Err(PlistError::ParseError),
            },
            Token::Str(s) => {
                if let Some(open) = self.open {
                    if self.tree.kind(open)? == Kind::Dict {
                        // The string becomes the dict's open Key.
                        if self.tree.dict_find_key(open, &s)?.is_some() {
                            return Err(PlistError::ParseError);
                        }
                        let key = self.tree.new_open_key(s);
                        self.tree.adopt(open, key)?;
                        self.open = Some(key);
                        return Ok(());
                    }
                }
                let node = self.tree.new_string_owned(s);
                self.attach(node, false)
            }
            Token::Integer(v) => {
                let node = self.tree.new_integer(v);
                self.attach(node, false)
            }
            Token::Real(v) => {
                let node = self.tree.new_real(v);
                self.attach(node, false)
            }
            Token::Boolean(v) => {
                let node = self.tree.new_boolean(v);
                self.attach(node, false)
            }
            Token::Date(d) => {
                let node = self.tree.new_date(&d);
                self.attach(node, false)
            }
            Token::Data(bytes) => {
                let node = self
                    .tree
                    .new_data(&bytes)
                    .map_err(|_| PlistError::ParseError)?;
                self.attach(node, false)
            }
        }
    }
}

/// A resumable property list parser.
///
/// Feed byte chunks with [`feed`]; token boundaries may fall anywhere,
/// including inside escapes and multi-byte literals. Extract the finished
/// document with [`result`], which also recycles the parser for the next
/// document.
///
/// [`feed`]: PlistParser::feed
/// [`result`]: PlistParser::result
#[derive(Debug)]
pub struct PlistParser {
    scanner: TokenScanner,
    builder: Builder,
    phase: Phase,
}

impl Default for PlistParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PlistParser {
    pub fn new() -> Self {
        Self {
            scanner: TokenScanner::new(),
            builder: Builder::new(),
            phase: Phase::Building,
        }
    }

    /// Consumes one chunk of input.
    ///
    /// An empty chunk is a no-op. A chunk ending mid-token saves the
    /// partial progress and returns success. Any byte fed after the root
    /// value completed, or after a parse error, returns
    /// [`ParseError`](PlistError::ParseError); errors are sticky until
    /// [`PlistParser::result`] recycles the parser.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }
        if self.phase != Phase::Building {
            // Done keeps its finished tree; Failed stays failed.
            return Err(PlistError::ParseError);
        }

        let mut toks = self.scanner.tokens(chunk);
        loop {
            match toks.next() {
                Ok(Some(tok)) => {
                    if let Err(e) = self.builder.apply(tok) {
                        self.phase = Phase::Failed;
                        return Err(normalize(e));
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    self.phase = Phase::Failed;
                    return Err(normalize(e));
                }
            }
        }

        if self.builder.finished() && self.scanner.is_idle() {
            self.phase = Phase::Done;
        }
        Ok(())
    }

    /// Hands the parsed document over and resets the parser for reuse.
    ///
    /// Before the root value is complete (or after a parse error) the
    /// partial tree is released and [`NotFound`](PlistError::NotFound) is
    /// returned; the reset happens either way.
    pub fn result(&mut self) -> Result<Plist> {
        let done = self.phase == Phase::Done;
        let builder = mem::replace(&mut self.builder, Builder::new());
        self.scanner.reset();
        self.phase = Phase::Building;

        match (done, builder.root) {
            (true, Some(root)) => Ok(Plist {
                tree: builder.tree,
                root,
            }),
            _ => Err(PlistError::NotFound),
        }
    }
}

/// Scanner and builder failures all surface as parse errors; only memory
/// exhaustion keeps its own code.
fn normalize(e: PlistError) -> PlistError {
    match e {
        PlistError::NotEnoughMemory => e,
        _ => PlistError::ParseError,
    }
}

/// One-shot convenience: parse a complete document held in memory.
pub fn parse(bytes: &[u8]) -> Result<Plist> {
    let mut parser = PlistParser::new();
    parser.feed(bytes)?;
    parser.result()
}
