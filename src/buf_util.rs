//! Append-only byte accumulator for tokens that straddle chunk boundaries.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::Result;

/// Minimum number of bytes added per reallocation.
const GROW_STEP: usize = 32;

/// A growable scratch buffer holding the bytes of a partially scanned token.
///
/// The buffer only ever grows while a token is in flight; [`ScanBuf::reset`]
/// or one of the `take_*` methods empties it between tokens while keeping
/// the allocation.
#[derive(Debug, Default)]
pub(crate) struct ScanBuf {
    buf: Vec<u8>,
}

impl ScanBuf {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Empties the buffer without shrinking it.
    #[inline]
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Ensures capacity for `extra` more bytes.
    ///
    /// Reallocation is geometric with a [`GROW_STEP`] floor. A failed
    /// allocation is reported as [`NotEnoughMemory`].
    ///
    /// [`NotEnoughMemory`]: crate::error::PlistError::NotEnoughMemory
    pub fn reserve(&mut self, extra: usize) -> Result<()> {
        if self.buf.capacity() - self.buf.len() < extra {
            self.buf.try_reserve(extra.max(GROW_STEP))?;
        }
        Ok(())
    }

    #[inline]
    pub fn push(&mut self, b: u8) -> Result<()> {
        self.reserve(1)?;
        self.buf.push(b);
        Ok(())
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Takes the accumulated bytes, leaving the buffer empty.
    pub fn take_bytes(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.buf)
    }

    /// Takes the accumulated bytes as an owned UTF-8 string.
    pub fn take_string(&mut self) -> Result<String> {
        String::from_utf8(self.take_bytes()).map_err(|e| e.utf8_error().into())
    }
}
