//! Curve sources and the host-application collaborator traits.
//!
//! The host side of the pipeline is reached through three narrow traits:
//! an opaque blob fetch for spline-cache nodes, a control-vertex query for
//! host-native curve nodes, and a point-to-UV lookup for root baking.
//! [`CurveSource`] is the per-node selection between the two decode paths;
//! both produce the same [`CurveBatch`] shape.

mod file;

pub use file::FileSplineData;

use crate::cache::SplineCache;
use crate::geom::{batch_from_host_curves, reassemble, CurveBatch, HostCurve, ReassembleOptions};
use crate::util::Result;

/// Supplies the raw spline-data blob for one node.
///
/// Fetched fresh per export call; the core never caches blobs across
/// frames.
pub trait SplineDataSource {
    fn fetch(&self) -> Result<Vec<u8>>;
}

impl SplineDataSource for Vec<u8> {
    fn fetch(&self) -> Result<Vec<u8>> {
        Ok(self.clone())
    }
}

/// Supplies host-native curves (CVs, knots, degree) for one node.
pub trait HostCurveSource {
    fn curves(&self) -> Result<Vec<HostCurve>>;
}

impl HostCurveSource for Vec<HostCurve> {
    fn curves(&self) -> Result<Vec<HostCurve>> {
        Ok(self.clone())
    }
}

/// Point-to-UV lookup on a host mesh.
///
/// UV-set selection belongs to the host-side implementation; an invalid
/// set surfaces as an error from here.
pub trait UvSampler {
    fn uv_at(&self, point: glam::Vec3) -> Result<glam::Vec2>;
}

/// One node's curve data, behind whichever decode path it needs.
pub enum CurveSource {
    /// Proprietary spline-cache blob; decoded and reassembled.
    SplineCache(Box<dyn SplineDataSource>),
    /// Host-native curves; copied through, no parsing.
    HostCurves(Box<dyn HostCurveSource>),
}

impl CurveSource {
    /// Build the curve batch for this source.
    ///
    /// The host-native path carries no widths and uses the host's own
    /// knot vectors; only `track_roots` applies to it.
    pub fn curve_batch(&self, opts: &ReassembleOptions) -> Result<CurveBatch> {
        match self {
            CurveSource::SplineCache(source) => {
                let blob = source.fetch()?;
                let cache = SplineCache::decode(&blob)?;
                reassemble(cache.pages(), opts)
            }
            CurveSource::HostCurves(source) => {
                let curves = source.curves()?;
                Ok(batch_from_host_curves(&curves, opts.track_roots))
            }
        }
    }

    /// Check if this is the spline-cache path.
    pub fn is_spline_cache(&self) -> bool {
        matches!(self, CurveSource::SplineCache(_))
    }
}
