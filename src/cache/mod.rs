//! The spline-cache container format.
//!
//! Layout, outermost first:
//!
//! 1. a flat chunk sequence ([`block`]); chunk 0 is the JSON manifest,
//!    every later chunk is one independently encoded "group";
//! 2. the manifest ([`header`]) maps item keys to packed `(group, block)`
//!    addresses and carries the group encoding flags;
//! 3. group bytes ([`groups`]) are themselves a chunk sequence once
//!    decoded, and sub-blocks hold the typed arrays ([`extract`]).
//!
//! [`SplineCache::decode`] runs the whole pipeline for one blob. A decode
//! session owns all intermediate buffers and shares nothing; callers decode
//! fresh per node per frame.

pub mod format;
pub mod block;
pub mod header;
pub mod groups;
pub mod extract;

pub use block::{scan_blocks, Block};
pub use extract::{extract_pages, PrimitiveInfo, PrimitivePage};
pub use groups::GroupStore;
pub use header::{CacheHeader, CacheManifest, ItemIndex, PackedAddress};

use crate::util::{Error, Result};

/// A fully decoded spline cache: the manifest plus every primitive page.
#[derive(Clone, Debug)]
pub struct SplineCache {
    manifest: CacheManifest,
    pages: Vec<PrimitivePage>,
}

impl SplineCache {
    /// Decode an opaque spline-data blob.
    ///
    /// Scans the chunk table, parses the chunk-0 manifest, builds the item
    /// index, and extracts every primitive page through a session-scoped
    /// [`GroupStore`]. All buffers the session allocated are dropped here
    /// except the typed pages handed back.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let blocks = scan_blocks(raw)?;
        let Some((manifest_block, data_blocks)) = blocks.split_first() else {
            return Err(Error::malformed("buffer contains no chunks"));
        };

        let manifest = CacheManifest::parse(manifest_block.payload(raw))?;
        let index = ItemIndex::build(&manifest);
        let mut store = GroupStore::new(raw, manifest.header, data_blocks);
        let pages = extract_pages(&index, &mut store)?;

        tracing::debug!(
            data_blocks = data_blocks.len(),
            groups = store.loaded_groups(),
            pages = pages.len(),
            "decoded spline cache"
        );
        Ok(Self { manifest, pages })
    }

    /// The decoded chunk-0 manifest.
    #[inline]
    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    /// The primitive pages, one per address slot.
    #[inline]
    pub fn pages(&self) -> &[PrimitivePage] {
        &self.pages
    }

    /// Total primitive count across pages, degenerate runs included.
    pub fn num_primitives(&self) -> usize {
        self.pages.iter().map(|p| p.infos.len()).sum()
    }
}
