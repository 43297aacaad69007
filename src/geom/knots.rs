//! Knot vector synthesis.
//!
//! Spline-cache curves carry no knot data; the interchange consumer wants a
//! knot sequence per curve, so one is synthesized from the vertex count.
//! Host-native curves carry a real parametric knot vector that only needs
//! padding to the consumer's expected length.

/// Polynomial degree of spline-cache curves. The cache stores plain vertex
/// runs; cubic is the degree the producing plugin simulates at.
pub const CACHE_DEGREE: usize = 3;

/// Which end-repeat count to use when synthesizing knot vectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KnotStyle {
    /// Fully clamped open-uniform form: `degree` repeats at each end, so
    /// the curve interpolates its first and last control points.
    #[default]
    Clamped,
    /// `degree - 1` repeats at each end. A sibling exporter emits this
    /// shorter form; it under-clamps the ends and is kept only for
    /// bit-for-bit compatibility with consumers tuned to it.
    LegacyTrimmed,
}

impl KnotStyle {
    /// End-repeat count for a given degree.
    #[inline]
    pub fn end_repeats(self, degree: usize) -> usize {
        match self {
            KnotStyle::Clamped => degree,
            KnotStyle::LegacyTrimmed => degree - 1,
        }
    }
}

/// Append a synthesized open-uniform knot vector for one curve.
///
/// Interior values are `0..n` with `n = length - degree + 1`; the boundary
/// value is repeated per `style` at each end. For `KnotStyle::Clamped` the
/// sequence is `length + degree + 1` values long. Runs shorter than
/// `degree + 1` vertices make `n` reach zero and the sequence degenerate;
/// they are emitted as computed, matching what such caches decode to.
pub fn append_uniform_knots(length: usize, degree: usize, style: KnotStyle, out: &mut Vec<f32>) {
    let repeats = style.end_repeats(degree);
    // Signed: n - 1 is -1 for two-vertex runs.
    let n = length as i64 - degree as i64 + 1;

    for _ in 0..repeats {
        out.push(0.0);
    }
    for v in 0..n {
        out.push(v as f32);
    }
    for _ in 0..repeats {
        out.push((n - 1) as f32);
    }
}

/// Pad a host curve's knot vector by one value at each end.
///
/// An already-clamped boundary (first knot equal to the last, or equal to
/// its neighbor) repeats the boundary knot verbatim; an open boundary
/// extrapolates linearly. Vectors with fewer than two knots contribute
/// nothing.
pub fn pad_host_knots(knots: &[f32], out: &mut Vec<f32>) {
    if knots.len() < 2 {
        return;
    }
    let first = knots[0];
    let last = knots[knots.len() - 1];

    if first == last || first == knots[1] {
        out.push(first);
    } else {
        out.push(2.0 * first - knots[1]);
    }
    out.extend_from_slice(knots);
    if first == last || last == knots[knots.len() - 2] {
        out.push(last);
    } else {
        out.push(2.0 * last - knots[knots.len() - 2]);
    }
}
