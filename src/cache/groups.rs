//! Group resolution and per-session decompression cache.
//!
//! Each data block after the manifest chunk is one "group": an
//! independently encoded unit whose decompressed bytes are themselves a
//! chunk sequence. Groups are decompressed at most once per decode session
//! and the bytes held until the session is dropped; the cache is owned by
//! one node's one-frame export and never shared.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::Read;

use flate2::read::ZlibDecoder;

use super::block::{scan_blocks, Block};
use super::format::DEFLATE_SUBHEADER_SIZE;
use super::header::{CacheHeader, PackedAddress};
use crate::util::{Error, Result};

/// Resolves packed addresses to raw item bytes, memoizing group
/// decompression for the lifetime of one decode session.
pub struct GroupStore<'a> {
    raw: &'a [u8],
    header: CacheHeader,
    data_blocks: &'a [Block],
    groups: HashMap<u32, Vec<u8>>,
}

impl<'a> GroupStore<'a> {
    /// Create a store over the raw buffer and its post-manifest data blocks.
    pub fn new(raw: &'a [u8], header: CacheHeader, data_blocks: &'a [Block]) -> Self {
        Self {
            raw,
            header,
            data_blocks,
            groups: HashMap::new(),
        }
    }

    /// Number of groups decoded so far.
    ///
    /// Groups are never evicted, so this doubles as a decompression
    /// counter for tests.
    #[inline]
    pub fn loaded_groups(&self) -> usize {
        self.groups.len()
    }

    /// Resolve a packed address to the bytes of one sub-block.
    ///
    /// Decodes the group on first touch (verbatim, or inflating the zlib
    /// stream that follows the 32-byte sub-header when `GroupDeflate` is
    /// set), then re-scans the group bytes and slices out sub-block
    /// `addr.index`.
    pub fn resolve(&mut self, addr: PackedAddress) -> Result<&[u8]> {
        let bytes: &Vec<u8> = match self.groups.entry(addr.group) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(load_group(
                self.raw,
                &self.header,
                self.data_blocks,
                addr.group,
            )?),
        };

        let blocks = scan_blocks(bytes)?;
        let block = blocks.get(addr.index as usize).ok_or(Error::BlockOutOfBounds {
            group: addr.group,
            index: addr.index,
            count: blocks.len(),
        })?;
        Ok(block.payload(bytes))
    }
}

/// Decode one group's bytes from its data block.
fn load_group(
    raw: &[u8],
    header: &CacheHeader,
    data_blocks: &[Block],
    group: u32,
) -> Result<Vec<u8>> {
    let block = data_blocks
        .get(group as usize)
        .ok_or(Error::GroupOutOfBounds {
            group,
            count: data_blocks.len(),
        })?;
    let payload = block.payload(raw);

    if header.group_base64 {
        return Err(Error::UnsupportedEncoding("base64"));
    }

    if header.group_deflate {
        if payload.len() < DEFLATE_SUBHEADER_SIZE {
            return Err(Error::malformed(format!(
                "deflate group {group} payload shorter than its {DEFLATE_SUBHEADER_SIZE}-byte sub-header"
            )));
        }
        let mut decoder = ZlibDecoder::new(&payload[DEFLATE_SUBHEADER_SIZE..]);
        let mut inflated = Vec::new();
        decoder
            .read_to_end(&mut inflated)
            .map_err(|source| Error::Decompression { group, source })?;
        tracing::debug!(
            group,
            compressed = payload.len(),
            inflated = inflated.len(),
            "inflated spline-cache group"
        );
        Ok(inflated)
    } else {
        Ok(payload.to_vec())
    }
}
