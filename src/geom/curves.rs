//! Curve batch buffers and their interchange topology tags.
//!
//! Both decode paths (spline cache and host-native curves) produce the same
//! batch shape; the sink contract is written against these buffers alone.

use crate::util::{Error, Result};

/// Curve type tag, in the interchange wire encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurveType {
    /// Cubic curves
    #[default]
    Cubic,
    /// Linear curves (polylines)
    Linear,
}

impl CurveType {
    /// Wire u8 value.
    pub fn to_u8(self) -> u8 {
        match self {
            CurveType::Cubic => 0,
            CurveType::Linear => 1,
        }
    }

    /// Tag for a host curve of the given degree. Degree-3 curves are
    /// cubic; anything else is written linear, the conservative encoding
    /// downstream consumers accept for odd orders.
    pub fn from_degree(degree: u8) -> Self {
        if degree == 3 {
            CurveType::Cubic
        } else {
            CurveType::Linear
        }
    }
}

/// Curve periodicity (wrap mode), in the interchange wire encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurvePeriodicity {
    /// Non-periodic (open) curves
    #[default]
    NonPeriodic,
    /// Periodic (closed) curves
    Periodic,
}

impl CurvePeriodicity {
    /// Wire u8 value.
    pub fn to_u8(self) -> u8 {
        match self {
            CurvePeriodicity::NonPeriodic => 0,
            CurvePeriodicity::Periodic => 1,
        }
    }
}

/// Basis type, in the interchange wire encoding. Groom curves always carry
/// the B-spline basis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BasisType {
    /// No specific basis
    #[default]
    NoBasis,
    /// B-spline basis
    Bspline,
}

impl BasisType {
    /// Wire u8 value.
    pub fn to_u8(self) -> u8 {
        match self {
            BasisType::NoBasis => 0,
            BasisType::Bspline => 2,
        }
    }
}

/// Reassembled curve geometry, ready for a geometry sink.
///
/// Parallel buffers: one `vertex_counts`/`orders` entry per curve;
/// `positions` holds every curve's vertices concatenated; `widths` is
/// per-vertex and empty when the source carries none; `knots` holds every
/// curve's knot sequence concatenated; `roots` holds each curve's first
/// vertex and is only populated when root tracking was requested.
#[derive(Clone, Debug, Default)]
pub struct CurveBatch {
    pub vertex_counts: Vec<i32>,
    pub positions: Vec<glam::Vec3>,
    pub widths: Vec<f32>,
    pub knots: Vec<f32>,
    pub orders: Vec<u8>,
    pub roots: Vec<glam::Vec3>,
    pub curve_type: CurveType,
    pub wrap: CurvePeriodicity,
    pub basis: BasisType,
}

impl CurveBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of curves.
    pub fn num_curves(&self) -> usize {
        self.vertex_counts.len()
    }

    /// Total vertex count across curves.
    pub fn total_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Check if the batch carries per-vertex widths.
    pub fn has_widths(&self) -> bool {
        !self.widths.is_empty()
    }

    /// Check if root points were tracked.
    pub fn has_roots(&self) -> bool {
        !self.roots.is_empty()
    }

    /// Positions as a flat `[x, y, z, ...]` f32 view.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Positions of one curve.
    pub fn curve_positions(&self, curve_idx: usize) -> Option<&[glam::Vec3]> {
        if curve_idx >= self.vertex_counts.len() {
            return None;
        }
        let start: usize = self.vertex_counts[..curve_idx]
            .iter()
            .map(|&n| n as usize)
            .sum();
        let count = self.vertex_counts[curve_idx] as usize;
        if start + count <= self.positions.len() {
            Some(&self.positions[start..start + count])
        } else {
            None
        }
    }

    /// Check the parallel-buffer invariants.
    ///
    /// `sum(vertex_counts) == positions.len()`, one order per curve, and
    /// when widths are present, one width per vertex.
    pub fn validate(&self) -> Result<()> {
        let total: usize = self.vertex_counts.iter().map(|&n| n as usize).sum();
        if total != self.positions.len() {
            return Err(Error::other(format!(
                "batch invariant broken: {} vertices counted, {} positions",
                total,
                self.positions.len()
            )));
        }
        if self.orders.len() != self.vertex_counts.len() {
            return Err(Error::other(format!(
                "batch invariant broken: {} orders for {} curves",
                self.orders.len(),
                self.vertex_counts.len()
            )));
        }
        if self.has_widths() && self.widths.len() != total {
            return Err(Error::other(format!(
                "batch invariant broken: {} widths for {} vertices",
                self.widths.len(),
                total
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    #[test]
    fn test_empty_batch() {
        let batch = CurveBatch::new();
        assert_eq!(batch.num_curves(), 0);
        assert_eq!(batch.total_vertices(), 0);
        assert!(!batch.has_widths());
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_curve_positions() {
        let batch = CurveBatch {
            vertex_counts: vec![4, 2],
            positions: vec![
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(1.0, 1.0, 0.0),
                vec3(0.0, 1.0, 0.0),
                vec3(2.0, 0.0, 0.0),
                vec3(3.0, 1.0, 0.0),
            ],
            orders: vec![4, 4],
            ..Default::default()
        };
        assert_eq!(batch.num_curves(), 2);
        assert_eq!(batch.curve_positions(0).unwrap().len(), 4);
        assert_eq!(batch.curve_positions(1).unwrap()[1], vec3(3.0, 1.0, 0.0));
        assert!(batch.curve_positions(2).is_none());
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_positions_flat() {
        let batch = CurveBatch {
            vertex_counts: vec![2],
            positions: vec![vec3(1.0, 2.0, 3.0), vec3(4.0, 5.0, 6.0)],
            orders: vec![4],
            ..Default::default()
        };
        assert_eq!(batch.positions_flat(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_validate_catches_mismatch() {
        let batch = CurveBatch {
            vertex_counts: vec![3],
            positions: vec![vec3(0.0, 0.0, 0.0)],
            orders: vec![4],
            ..Default::default()
        };
        assert!(batch.validate().is_err());

        let batch = CurveBatch {
            vertex_counts: vec![1],
            positions: vec![vec3(0.0, 0.0, 0.0)],
            orders: vec![4],
            widths: vec![0.1, 0.1],
            ..Default::default()
        };
        assert!(batch.validate().is_err());
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(CurveType::Cubic.to_u8(), 0);
        assert_eq!(CurveType::Linear.to_u8(), 1);
        assert_eq!(BasisType::Bspline.to_u8(), 2);
        assert_eq!(CurvePeriodicity::NonPeriodic.to_u8(), 0);
        assert_eq!(CurveType::from_degree(3), CurveType::Cubic);
        assert_eq!(CurveType::from_degree(1), CurveType::Linear);
        assert_eq!(CurveType::from_degree(2), CurveType::Linear);
    }
}
