//! Geometry sink contract.
//!
//! A sink persists finished curve batches plus per-set groom metadata in
//! its own container format; the pipeline never looks back at what it
//! wrote. The property names downstream groom consumers expect are fixed
//! here so every sink implementation agrees on the wire contract.

mod json;

pub use json::JsonSink;

use crate::geom::CurveBatch;
use crate::util::Result;

/// Arbitrary-parameter name carrying the groom group name.
pub const PROP_GROUP_NAME: &str = "groom_group_name";

/// Arbitrary-parameter name flagging guide curves.
pub const PROP_GUIDE: &str = "groom_guide";

/// Arbitrary-parameter name carrying the numeric group id.
pub const PROP_GROUP_ID: &str = "groom_group_id";

/// Arbitrary-parameter name carrying per-root UV coordinates.
pub const PROP_ROOT_UV: &str = "groom_root_uv";

/// Per-set groom metadata written alongside the curve buffers.
#[derive(Clone, Debug, Default)]
pub struct CurveSetMeta {
    pub group_name: String,
    pub is_guide: bool,
    pub group_id: Option<i32>,
    /// One UV pair per curve root, when baking was requested.
    pub root_uvs: Option<Vec<glam::Vec2>>,
}

/// Consumes finished curve batches.
pub trait GeometrySink {
    /// Persist one named curve set.
    fn write_curves(&mut self, name: &str, batch: &CurveBatch, meta: &CurveSetMeta) -> Result<()>;
}

/// One captured curve set.
#[derive(Clone, Debug)]
pub struct ExportedSet {
    pub name: String,
    pub batch: CurveBatch,
    pub meta: CurveSetMeta,
}

/// In-memory sink for tests and inspection.
#[derive(Default)]
pub struct MemorySink {
    pub sets: Vec<ExportedSet>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl GeometrySink for MemorySink {
    fn write_curves(&mut self, name: &str, batch: &CurveBatch, meta: &CurveSetMeta) -> Result<()> {
        self.sets.push(ExportedSet {
            name: name.to_string(),
            batch: batch.clone(),
            meta: meta.clone(),
        });
        Ok(())
    }
}
