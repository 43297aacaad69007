//! Linear chunk scan over a raw cache buffer.
//!
//! Blocks are cheap to derive and are never stored alongside the buffer;
//! callers re-scan whenever they need the chunk table, including over the
//! decompressed bytes of a group.

use super::format::{CHUNK_HEADER_SIZE, MAX_CHUNKS, SIZE_OFFSET, TYPE_CODE_OFFSET};
use crate::util::{Error, Result};

/// One chunk inside a raw buffer: a half-open payload range plus the
/// 4-byte type tag from its header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    /// Payload start (first byte after the 16-byte header).
    pub start: usize,
    /// Payload end (exclusive).
    pub end: usize,
    /// Type code from the chunk header.
    pub type_code: u32,
}

impl Block {
    /// Payload length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the payload is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Slice this block's payload out of the buffer it was scanned from.
    #[inline]
    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.start..self.end]
    }
}

/// Scan a buffer into its chunk table.
///
/// Walks 16-byte chunk headers from address 0, emitting one [`Block`] per
/// chunk, and stops when fewer than two bytes remain or after
/// [`MAX_CHUNKS`] chunks. A header or payload extending past the buffer is
/// a [`Error::MalformedContainer`].
pub fn scan_blocks(data: &[u8]) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut address = 0usize;

    while address + 1 < data.len() {
        if blocks.len() >= MAX_CHUNKS {
            break;
        }
        if address + CHUNK_HEADER_SIZE > data.len() {
            return Err(Error::malformed(format!(
                "truncated chunk header at offset {address}"
            )));
        }

        let tc = address + TYPE_CODE_OFFSET;
        let type_code = u32::from_le_bytes([data[tc], data[tc + 1], data[tc + 2], data[tc + 3]]);
        let sz = address + SIZE_OFFSET;
        let size = u64::from_le_bytes([
            data[sz], data[sz + 1], data[sz + 2], data[sz + 3],
            data[sz + 4], data[sz + 5], data[sz + 6], data[sz + 7],
        ]) as usize;

        let start = address + CHUNK_HEADER_SIZE;
        let end = start.checked_add(size).ok_or_else(|| {
            Error::malformed(format!("chunk at offset {address} overflows address space"))
        })?;
        if end > data.len() {
            return Err(Error::malformed(format!(
                "chunk at offset {address} claims {size} payload bytes past end of buffer"
            )));
        }

        blocks.push(Block { start, end, type_code });
        address = end;
    }

    Ok(blocks)
}
