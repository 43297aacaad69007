//! Cache manifest (chunk 0) and the item address index.
//!
//! Chunk 0 of a spline cache holds UTF-8 JSON describing where every named
//! item lives: a `Header` object with the group encoding flags, and two
//! arrays of maps (`Items`, `RefMeshArray`) whose integer values are packed
//! 64-bit `(group, block)` addresses into the remaining data blocks.

use serde::Deserialize;
use serde_json::Value;
use smallvec::SmallVec;

use crate::util::{Error, Result};

/// Group encoding flags from the manifest `Header` object.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct CacheHeader {
    /// Groups are base64-wrapped. Never observed; decoding is refused.
    #[serde(rename = "GroupBase64")]
    pub group_base64: bool,
    /// Group payloads carry a 32-byte sub-header followed by a zlib stream.
    #[serde(rename = "GroupDeflate")]
    pub group_deflate: bool,
}

/// Decoded chunk-0 manifest.
///
/// All fields are required; a manifest missing any of them is treated as
/// schema drift and rejected rather than defaulted.
#[derive(Clone, Debug, Deserialize)]
pub struct CacheManifest {
    #[serde(rename = "Header")]
    pub header: CacheHeader,
    #[serde(rename = "Items")]
    pub items: Vec<serde_json::Map<String, Value>>,
    #[serde(rename = "RefMeshArray")]
    pub ref_mesh_array: Vec<serde_json::Map<String, Value>>,
}

impl CacheManifest {
    /// Parse the chunk-0 payload as a manifest.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload)
            .map_err(|e| Error::malformed(format!("manifest JSON: {e}")))
    }
}

/// A 64-bit packed item address: group index in the high half, block index
/// within that group in the low half.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PackedAddress {
    pub group: u32,
    pub index: u32,
}

impl PackedAddress {
    /// Split a packed 64-bit address into its halves.
    #[inline]
    pub const fn unpack(v: u64) -> Self {
        Self {
            group: (v >> 32) as u32,
            index: (v & 0xFFFF_FFFF) as u32,
        }
    }

    /// Re-pack into the 64-bit wire form.
    #[inline]
    pub const fn pack(self) -> u64 {
        ((self.group as u64) << 32) | self.index as u64
    }
}

type AddressList = SmallVec<[PackedAddress; 4]>;

/// Item key → ordered address list, merged from every manifest map.
///
/// Multiple maps may contribute addresses under the same key (one per
/// host-internal patch); later occurrences append rather than overwrite,
/// and downstream consumers zip the lists positionally. That append order
/// is load-bearing.
#[derive(Clone, Debug, Default)]
pub struct ItemIndex {
    entries: Vec<(String, AddressList)>,
}

impl ItemIndex {
    /// Build the index from a manifest: `Items` maps first, then
    /// `RefMeshArray` maps, appending every integer-valued entry. Values of
    /// any other JSON type are ignored.
    pub fn build(manifest: &CacheManifest) -> Self {
        let mut index = Self::default();
        for map in manifest.items.iter().chain(manifest.ref_mesh_array.iter()) {
            for (key, value) in map {
                if let Some(packed) = value.as_u64() {
                    index.append(key, PackedAddress::unpack(packed));
                }
            }
        }
        index
    }

    fn append(&mut self, key: &str, addr: PackedAddress) {
        for (k, list) in &mut self.entries {
            if k == key {
                list.push(addr);
                return;
            }
        }
        self.entries.push((key.to_string(), SmallVec::from_slice(&[addr])));
    }

    /// Addresses recorded under a key, in append order.
    pub fn get(&self, key: &str) -> &[PackedAddress] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }

    /// Check if a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, addresses)` pairs in first-seen key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PackedAddress])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest_from(json: &str) -> CacheManifest {
        CacheManifest::parse(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_manifest() {
        let m = manifest_from(
            r#"{"Header":{"GroupBase64":false,"GroupDeflate":true},
                "Items":[{"Positions":4294967298}],"RefMeshArray":[]}"#,
        );
        assert!(!m.header.group_base64);
        assert!(m.header.group_deflate);
        assert_eq!(m.items.len(), 1);
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        // No Header object at all.
        let r = CacheManifest::parse(br#"{"Items":[],"RefMeshArray":[]}"#);
        assert!(matches!(r, Err(Error::MalformedContainer(_))));

        // Header present but missing a flag.
        let r = CacheManifest::parse(
            br#"{"Header":{"GroupBase64":false},"Items":[],"RefMeshArray":[]}"#,
        );
        assert!(matches!(r, Err(Error::MalformedContainer(_))));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let r = CacheManifest::parse(&[0xFF, 0xFE, 0x00]);
        assert!(matches!(r, Err(Error::MalformedContainer(_))));
    }

    #[test]
    fn test_packed_address_roundtrip() {
        let addr = PackedAddress::unpack((3 << 32) | 17);
        assert_eq!(addr.group, 3);
        assert_eq!(addr.index, 17);
        assert_eq!(addr.pack(), (3 << 32) | 17);
    }

    #[test]
    fn test_index_merge_order() {
        // Two successive Items maps contribute to the same key; append
        // order must follow map order.
        let m = manifest_from(
            r#"{"Header":{"GroupBase64":false,"GroupDeflate":false},
                "Items":[{"Positions":4294967298},{"Positions":12884901892}],
                "RefMeshArray":[]}"#,
        );
        let index = ItemIndex::build(&m);
        assert_eq!(
            index.get("Positions"),
            &[
                PackedAddress { group: 1, index: 2 },
                PackedAddress { group: 3, index: 4 },
            ]
        );
    }

    #[test]
    fn test_index_ref_mesh_after_items() {
        let m = manifest_from(
            r#"{"Header":{"GroupBase64":false,"GroupDeflate":false},
                "Items":[{"Positions":1}],
                "RefMeshArray":[{"Positions":4294967296}]}"#,
        );
        let index = ItemIndex::build(&m);
        assert_eq!(
            index.get("Positions"),
            &[
                PackedAddress { group: 0, index: 1 },
                PackedAddress { group: 1, index: 0 },
            ]
        );
    }

    #[test]
    fn test_index_ignores_non_integers() {
        let m = manifest_from(
            r#"{"Header":{"GroupBase64":false,"GroupDeflate":false},
                "Items":[{"Name":"scalp","Positions":2,"Weight":0.5}],
                "RefMeshArray":[]}"#,
        );
        let index = ItemIndex::build(&m);
        assert!(!index.contains("Name"));
        assert!(!index.contains("Weight"));
        assert_eq!(index.get("Positions").len(), 1);
        assert!(index.get("Missing").is_empty());
    }
}
