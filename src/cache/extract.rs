//! Typed views over decoded item bytes.
//!
//! Items arrive as raw byte runs; this module reinterprets them as the
//! fixed-width records the reassembler consumes. All wire integers are
//! little-endian; the primitive descriptor is packed `<u32, u64>` with no
//! padding between the fields, so records are 12 bytes, not 16.

use byteorder::{LittleEndian, ReadBytesExt};

use super::format::{KEY_POSITIONS, KEY_PRIMITIVE_INFOS, KEY_WIDTHS, PRIMITIVE_INFO_SIZE};
use super::groups::GroupStore;
use super::header::ItemIndex;
use crate::util::{Error, Result};

/// One polyline's placement in its page's flat position/width arrays:
/// `offset` is the starting vertex index, `length` the vertex count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimitiveInfo {
    pub offset: u32,
    pub length: u64,
}

impl PrimitiveInfo {
    /// Runs shorter than two vertices describe no usable curve and are
    /// skipped by the reassembler.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length < 2
    }
}

/// Parallel arrays for one address slot: the `j`-th `PrimitiveInfos`
/// address pairs with the `j`-th `Positions` (and `WIDTH_CV`) address, and
/// descriptor offsets are relative to this page's own arrays.
#[derive(Clone, Debug)]
pub struct PrimitivePage {
    pub infos: Vec<PrimitiveInfo>,
    /// Flat x,y,z triples.
    pub positions: Vec<f32>,
    /// One width per control vertex; `None` when the cache carries none.
    pub widths: Option<Vec<f32>>,
}

/// Reinterpret an item's bytes as packed primitive descriptors.
pub fn read_primitive_infos(bytes: &[u8]) -> Result<Vec<PrimitiveInfo>> {
    if bytes.len() % PRIMITIVE_INFO_SIZE != 0 {
        return Err(Error::malformed(format!(
            "PrimitiveInfos byte length {} is not a multiple of {PRIMITIVE_INFO_SIZE}",
            bytes.len()
        )));
    }
    let mut cursor = std::io::Cursor::new(bytes);
    let mut infos = Vec::with_capacity(bytes.len() / PRIMITIVE_INFO_SIZE);
    for _ in 0..bytes.len() / PRIMITIVE_INFO_SIZE {
        let offset = cursor.read_u32::<LittleEndian>()?;
        let length = cursor.read_u64::<LittleEndian>()?;
        infos.push(PrimitiveInfo { offset, length });
    }
    Ok(infos)
}

/// Reinterpret an item's bytes as a flat little-endian f32 array.
pub fn read_f32_array(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::malformed(format!(
            "float array byte length {} is not a multiple of 4",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Pull every primitive page out of the cache.
///
/// Resolves each key's addresses in index order and zips them by position:
/// page `j` is built from the `j`-th address of `PrimitiveInfos`,
/// `Positions`, and (when present) `WIDTH_CV`. A page-count mismatch
/// between descriptors and positions is container damage.
pub fn extract_pages(index: &ItemIndex, store: &mut GroupStore<'_>) -> Result<Vec<PrimitivePage>> {
    let mut info_pages = Vec::new();
    for addr in index.get(KEY_PRIMITIVE_INFOS) {
        info_pages.push(read_primitive_infos(store.resolve(*addr)?)?);
    }
    let mut position_pages = Vec::new();
    for addr in index.get(KEY_POSITIONS) {
        position_pages.push(read_f32_array(store.resolve(*addr)?)?);
    }
    let mut width_pages = Vec::new();
    for addr in index.get(KEY_WIDTHS) {
        width_pages.push(read_f32_array(store.resolve(*addr)?)?);
    }

    if info_pages.len() != position_pages.len() {
        return Err(Error::malformed(format!(
            "{} PrimitiveInfos pages but {} Positions pages",
            info_pages.len(),
            position_pages.len()
        )));
    }
    if !width_pages.is_empty() && width_pages.len() != info_pages.len() {
        return Err(Error::malformed(format!(
            "{} WIDTH_CV pages but {} PrimitiveInfos pages",
            width_pages.len(),
            info_pages.len()
        )));
    }

    let mut widths = width_pages.into_iter().map(Some).collect::<Vec<_>>();
    widths.resize(info_pages.len(), None);

    Ok(info_pages
        .into_iter()
        .zip(position_pages)
        .zip(widths)
        .map(|((infos, positions), widths)| PrimitivePage {
            infos,
            positions,
            widths,
        })
        .collect())
}
