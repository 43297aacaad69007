//! Curve geometry: batch buffers, knot synthesis, reassembly.

pub mod curves;
pub mod knots;
pub mod reassemble;

pub use curves::{BasisType, CurveBatch, CurvePeriodicity, CurveType};
pub use knots::{append_uniform_knots, pad_host_knots, KnotStyle, CACHE_DEGREE};
pub use reassemble::{batch_from_host_curves, reassemble, HostCurve, ReassembleOptions};
