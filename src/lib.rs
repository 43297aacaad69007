//! # groomcache
//!
//! Decoder for the XGen interactive-groom spline cache, the proprietary
//! chunked binary container a hair-simulation plugin hands out as an opaque
//! blob, and the reassembly pipeline that turns it into interchange-ready
//! curve buffers (vertex counts, positions, widths, knots, orders).
//!
//! The container format is undocumented; the decoding here matches observed
//! caches: a linear chunk scan, a JSON manifest in chunk 0, per-group
//! deflate compression, and flat position/width arrays indexed by packed
//! 64-bit `(group, block)` addresses.
//!
//! ## Modules
//!
//! - [`util`] - Error types shared across the crate
//! - [`cache`] - The spline-cache container: blocks, manifest, groups, typed arrays
//! - [`geom`] - Curve batches, knot synthesis, reassembly
//! - [`source`] - Curve sources (spline cache / host-native curves) and host traits
//! - [`sink`] - Geometry sink contract and reference sinks
//! - [`export`] - Export orchestration across sources and sinks
//!
//! ## Example
//!
//! ```ignore
//! use groomcache::cache::SplineCache;
//! use groomcache::geom::{reassemble, ReassembleOptions};
//!
//! let cache = SplineCache::decode(&blob)?;
//! let batch = reassemble(cache.pages(), &ReassembleOptions::default())?;
//! ```

pub mod util;
pub mod cache;
pub mod geom;
pub mod source;
pub mod sink;
pub mod export;

// Re-export commonly used types
pub use util::{Error, Result};
pub use cache::SplineCache;
pub use geom::CurveBatch;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::cache::SplineCache;
    pub use crate::geom::{reassemble, CurveBatch, HostCurve, KnotStyle, ReassembleOptions};
    pub use crate::source::{CurveSource, FileSplineData, SplineDataSource};
    pub use crate::sink::{CurveSetMeta, GeometrySink, JsonSink, MemorySink};
    pub use crate::export::{ExportItem, Exporter};
}
