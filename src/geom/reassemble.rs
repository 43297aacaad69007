//! Curve reassembly from primitive pages and from host-native curves.
//!
//! Walks each page's descriptors in array order, slices the per-curve
//! vertex runs out of the flat arrays, and emits one [`CurveBatch`] with
//! the synthesized knot vectors. The host-native path builds the same
//! batch shape from real control-vertex and knot data instead.

use glam::vec3;

use super::curves::{BasisType, CurveBatch, CurvePeriodicity, CurveType};
use super::knots::{append_uniform_knots, pad_host_knots, KnotStyle, CACHE_DEGREE};
use crate::cache::PrimitivePage;
use crate::util::{Error, Result};

/// Options for spline-cache reassembly.
#[derive(Clone, Copy, Debug)]
pub struct ReassembleOptions {
    /// Copy per-vertex widths into the batch. The spline cache always
    /// carries widths; requesting them from a cache that has none is
    /// treated as container damage.
    pub with_widths: bool,
    /// Record each curve's first vertex for downstream UV baking.
    pub track_roots: bool,
    /// End-repeat rule for the synthesized knot vectors.
    pub knot_style: KnotStyle,
}

impl Default for ReassembleOptions {
    fn default() -> Self {
        Self {
            with_widths: true,
            track_roots: false,
            knot_style: KnotStyle::default(),
        }
    }
}

/// Reassemble primitive pages into one curve batch.
///
/// Degenerate descriptors (fewer than two vertices) are skipped and leave
/// no trace in any output buffer. Descriptor runs that fall outside their
/// page's arrays are container damage.
pub fn reassemble(pages: &[PrimitivePage], opts: &ReassembleOptions) -> Result<CurveBatch> {
    let mut batch = CurveBatch {
        curve_type: CurveType::Cubic,
        wrap: CurvePeriodicity::NonPeriodic,
        basis: BasisType::Bspline,
        ..CurveBatch::default()
    };
    let order = (CACHE_DEGREE + 1) as u8;

    for (page_idx, page) in pages.iter().enumerate() {
        let widths = if opts.with_widths {
            Some(page.widths.as_deref().ok_or_else(|| {
                Error::malformed(format!("page {page_idx} carries no WIDTH_CV data"))
            })?)
        } else {
            None
        };

        for info in &page.infos {
            if info.is_degenerate() {
                continue;
            }
            let start = info.offset as usize;
            let length = info.length as usize;
            let vertex_end = start
                .checked_add(length)
                .and_then(|end| end.checked_mul(3).map(|_| end))
                .ok_or_else(|| {
                    Error::malformed(format!("primitive run overflows at offset {start}"))
                })?;

            if vertex_end * 3 > page.positions.len() {
                return Err(Error::malformed(format!(
                    "primitive run [{start}, {vertex_end}) past end of page {page_idx} positions ({} vertices)",
                    page.positions.len() / 3
                )));
            }
            let run = &page.positions[start * 3..vertex_end * 3];
            if opts.track_roots {
                batch.roots.push(vec3(run[0], run[1], run[2]));
            }
            batch
                .positions
                .extend(run.chunks_exact(3).map(|c| vec3(c[0], c[1], c[2])));

            if let Some(widths) = widths {
                if vertex_end > widths.len() {
                    return Err(Error::malformed(format!(
                        "width run [{start}, {vertex_end}) past end of page {page_idx} widths ({} values)",
                        widths.len()
                    )));
                }
                batch.widths.extend_from_slice(&widths[start..vertex_end]);
            }

            batch.vertex_counts.push(length as i32);
            batch.orders.push(order);
            append_uniform_knots(length, CACHE_DEGREE, opts.knot_style, &mut batch.knots);
        }
    }

    Ok(batch)
}

/// One host-native curve: control vertices plus the host's own parametric
/// knot vector.
#[derive(Clone, Debug)]
pub struct HostCurve {
    pub cvs: Vec<glam::Vec3>,
    pub knots: Vec<f32>,
    pub degree: u8,
}

/// Build a curve batch directly from host-native curves.
///
/// No parsing: CVs are copied through and the host knot vectors padded to
/// the interchange length. The batch's curve-type tag follows the first
/// curve's degree.
pub fn batch_from_host_curves(curves: &[HostCurve], track_roots: bool) -> CurveBatch {
    let mut batch = CurveBatch {
        wrap: CurvePeriodicity::NonPeriodic,
        basis: BasisType::Bspline,
        ..CurveBatch::default()
    };
    if let Some(first) = curves.first() {
        batch.curve_type = CurveType::from_degree(first.degree);
    }

    for curve in curves {
        batch.vertex_counts.push(curve.cvs.len() as i32);
        batch.orders.push(curve.degree + 1);
        if track_roots {
            if let Some(&root) = curve.cvs.first() {
                batch.roots.push(root);
            }
        }
        batch.positions.extend_from_slice(&curve.cvs);
        pad_host_knots(&curve.knots, &mut batch.knots);
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::PrimitiveInfo;

    fn line_page(num_vertices: usize) -> PrimitivePage {
        let mut positions = Vec::new();
        for i in 0..num_vertices {
            positions.extend_from_slice(&[i as f32, 0.0, 0.0]);
        }
        PrimitivePage {
            infos: vec![PrimitiveInfo { offset: 0, length: num_vertices as u64 }],
            positions,
            widths: Some(vec![0.1; num_vertices]),
        }
    }

    #[test]
    fn test_single_curve() {
        let batch = reassemble(&[line_page(4)], &ReassembleOptions::default()).unwrap();
        assert_eq!(batch.vertex_counts, vec![4]);
        assert_eq!(
            batch.positions_flat(),
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0, 3.0, 0.0, 0.0]
        );
        assert_eq!(batch.widths, vec![0.1; 4]);
        assert_eq!(batch.orders, vec![4]);
        assert_eq!(batch.knots, vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(batch.curve_type, CurveType::Cubic);
        assert_eq!(batch.basis, BasisType::Bspline);
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_degenerate_skipped() {
        let mut page = line_page(6);
        page.infos.push(PrimitiveInfo { offset: 5, length: 1 });
        page.infos.push(PrimitiveInfo { offset: 0, length: 0 });

        let batch = reassemble(&[page], &ReassembleOptions::default()).unwrap();
        // Only the length-6 run survives; degenerate runs leave nothing.
        assert_eq!(batch.num_curves(), 1);
        assert_eq!(batch.vertex_counts, vec![6]);
        assert_eq!(batch.total_vertices(), 6);
        assert_eq!(batch.widths.len(), 6);
        assert_eq!(batch.knots.len(), 6 + CACHE_DEGREE + 1);
    }

    #[test]
    fn test_offset_run_and_roots() {
        let mut page = line_page(8);
        page.infos = vec![
            PrimitiveInfo { offset: 0, length: 4 },
            PrimitiveInfo { offset: 4, length: 4 },
        ];
        let opts = ReassembleOptions {
            track_roots: true,
            ..ReassembleOptions::default()
        };
        let batch = reassemble(&[page], &opts).unwrap();
        assert_eq!(batch.num_curves(), 2);
        assert_eq!(batch.roots, vec![vec3(0.0, 0.0, 0.0), vec3(4.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_run_out_of_range() {
        let mut page = line_page(4);
        page.infos = vec![PrimitiveInfo { offset: 2, length: 4 }];
        let r = reassemble(&[page], &ReassembleOptions::default());
        assert!(matches!(r, Err(Error::MalformedContainer(_))));
    }

    #[test]
    fn test_widths_required_but_absent() {
        let mut page = line_page(4);
        page.widths = None;
        let r = reassemble(&[page], &ReassembleOptions::default());
        assert!(matches!(r, Err(Error::MalformedContainer(_))));

        // Without the request the page is fine.
        let mut page = line_page(4);
        page.widths = None;
        let opts = ReassembleOptions {
            with_widths: false,
            ..ReassembleOptions::default()
        };
        let batch = reassemble(&[page], &opts).unwrap();
        assert!(!batch.has_widths());
    }

    #[test]
    fn test_pages_stay_zipped() {
        // Two pages with identical offsets; runs must slice their own page.
        let mut a = line_page(4);
        a.positions.iter_mut().for_each(|v| *v += 100.0);
        let b = line_page(4);
        let batch = reassemble(&[a, b], &ReassembleOptions::default()).unwrap();
        assert_eq!(batch.num_curves(), 2);
        assert_eq!(batch.positions[0], vec3(100.0, 100.0, 100.0));
        assert_eq!(batch.positions[4], vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_host_curves() {
        let curves = vec![
            HostCurve {
                cvs: vec![vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), vec3(2.0, 0.0, 0.0), vec3(3.0, 0.0, 0.0)],
                knots: vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
                degree: 3,
            },
            HostCurve {
                cvs: vec![vec3(0.0, 1.0, 0.0), vec3(1.0, 1.0, 0.0)],
                knots: vec![0.0, 1.0],
                degree: 1,
            },
        ];
        let batch = batch_from_host_curves(&curves, true);
        assert_eq!(batch.vertex_counts, vec![4, 2]);
        assert_eq!(batch.orders, vec![4, 2]);
        assert_eq!(batch.curve_type, CurveType::Cubic);
        assert!(!batch.has_widths());
        assert_eq!(batch.roots.len(), 2);
        // Clamped host vector pads verbatim, open vector extrapolates.
        assert_eq!(
            batch.knots,
            vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, -1.0, 0.0, 1.0, 2.0]
        );
        assert!(batch.validate().is_ok());
    }
}
