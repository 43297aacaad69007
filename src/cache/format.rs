//! Spline-cache container constants.
//!
//! The container is a flat sequence of self-describing chunks. Each chunk
//! carries a 16-byte header: a little-endian u32 type code at bytes [0, 4)
//! and a little-endian u64 payload size at bytes [8, 16). Bytes [4, 8) are
//! unused in every cache observed so far.

/// Size of a chunk header in bytes.
pub const CHUNK_HEADER_SIZE: usize = 16;

/// Offset of the type code within a chunk header.
pub const TYPE_CODE_OFFSET: usize = 0;

/// Offset of the payload size within a chunk header.
pub const SIZE_OFFSET: usize = 8;

/// Hard cap on the number of chunks a single scan will produce.
///
/// Not a format limit: a guard against malformed input driving the scan
/// through garbage. Scans stop after exactly this many chunks.
pub const MAX_CHUNKS: usize = 100;

/// Size of the fixed sub-header preceding the zlib stream in a
/// deflate-compressed group payload.
pub const DEFLATE_SUBHEADER_SIZE: usize = 32;

/// Manifest item key for primitive descriptor arrays.
pub const KEY_PRIMITIVE_INFOS: &str = "PrimitiveInfos";

/// Manifest item key for flat position arrays.
pub const KEY_POSITIONS: &str = "Positions";

/// Manifest item key for per-control-vertex width arrays.
pub const KEY_WIDTHS: &str = "WIDTH_CV";

/// Size of one packed primitive descriptor record.
pub const PRIMITIVE_INFO_SIZE: usize = 12;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        assert_eq!(CHUNK_HEADER_SIZE, 16);
        assert!(TYPE_CODE_OFFSET + 4 <= SIZE_OFFSET);
        assert_eq!(SIZE_OFFSET + 8, CHUNK_HEADER_SIZE);
    }

    #[test]
    fn test_record_sizes() {
        // offset u32 + length u64, packed
        assert_eq!(PRIMITIVE_INFO_SIZE, 4 + 8);
    }
}
