//! Export orchestration.
//!
//! An [`Exporter`] owns the list of items to export and drives each one
//! through its source, optional root-UV baking, and the sink. It is a
//! plain owned value created and dropped by the host integration layer;
//! nothing in the pipeline is process-global.

use std::time::Instant;

use crate::geom::{KnotStyle, ReassembleOptions};
use crate::sink::{CurveSetMeta, GeometrySink};
use crate::source::{CurveSource, HostCurveSource, SplineDataSource, UvSampler};
use crate::util::{Error, Result};

/// Naming convention for guide-curve groups: a trailing `_guide` on the
/// node name is dropped from the group name.
pub const GUIDE_SUFFIX: &str = "_guide";

/// Strip the guide suffix from a node name, if present.
pub fn trim_guide_suffix(name: &str) -> &str {
    name.strip_suffix(GUIDE_SUFFIX).unwrap_or(name)
}

/// One node queued for export.
pub struct ExportItem {
    /// Object name written to the sink.
    pub name: String,
    pub group_name: String,
    pub is_guide: bool,
    pub bake_uv: bool,
    pub group_id: Option<i32>,
    pub source: CurveSource,
}

impl ExportItem {
    /// Item for a spline-cache node. The group name defaults to the node
    /// name; cache curves are rendered hair, not guides.
    pub fn spline_cache(name: impl Into<String>, source: impl SplineDataSource + 'static) -> Self {
        let name = name.into();
        Self {
            group_name: name.clone(),
            name,
            is_guide: false,
            bake_uv: false,
            group_id: None,
            source: CurveSource::SplineCache(Box::new(source)),
        }
    }

    /// Item for a host-native curve node. Curve nodes are exported as
    /// guides by convention, with any `_guide` suffix dropped from the
    /// group name.
    pub fn host_curves(name: impl Into<String>, source: impl HostCurveSource + 'static) -> Self {
        let name = name.into();
        Self {
            group_name: trim_guide_suffix(&name).to_string(),
            name,
            is_guide: true,
            bake_uv: false,
            group_id: None,
            source: CurveSource::HostCurves(Box::new(source)),
        }
    }

    /// Override the group name.
    pub fn with_group_name(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = group_name.into();
        self
    }

    /// Override the guide flag.
    pub fn with_guide(mut self, is_guide: bool) -> Self {
        self.is_guide = is_guide;
        self
    }

    /// Request root-UV baking for this item.
    pub fn with_bake_uv(mut self, bake_uv: bool) -> Self {
        self.bake_uv = bake_uv;
        self
    }

    /// Attach a numeric group id.
    pub fn with_group_id(mut self, group_id: i32) -> Self {
        self.group_id = Some(group_id);
        self
    }
}

/// Result of one export run.
#[derive(Debug, Default)]
pub struct ExportStats {
    /// Curve sets written to the sink.
    pub curve_sets: usize,
    pub curves: usize,
    pub vertices: usize,
    /// Items that failed, with the error that stopped them. A failure
    /// aborts only its own item.
    pub failures: Vec<(String, Error)>,
}

impl ExportStats {
    /// Check if every item exported.
    pub fn all_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives queued items through their sources into a sink.
#[derive(Default)]
pub struct Exporter {
    items: Vec<ExportItem>,
    uv_sampler: Option<Box<dyn UvSampler>>,
    knot_style: KnotStyle,
}

impl Exporter {
    /// Create an empty exporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an item.
    pub fn add_item(&mut self, item: ExportItem) -> &mut Self {
        self.items.push(item);
        self
    }

    /// Install the UV sampler used for items that bake root UVs.
    pub fn set_uv_sampler(&mut self, sampler: impl UvSampler + 'static) -> &mut Self {
        self.uv_sampler = Some(Box::new(sampler));
        self
    }

    /// Select the knot synthesis style for spline-cache items.
    pub fn set_knot_style(&mut self, style: KnotStyle) -> &mut Self {
        self.knot_style = style;
        self
    }

    /// Queued items.
    pub fn items(&self) -> &[ExportItem] {
        &self.items
    }

    /// Check if anything is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Export every queued item into the sink.
    ///
    /// Items are processed in queue order, each with its own decode
    /// session. A failing item is recorded and skipped; the rest still
    /// export.
    pub fn export(&self, sink: &mut dyn GeometrySink) -> ExportStats {
        let started = Instant::now();
        let mut stats = ExportStats::default();

        for item in &self.items {
            match self.export_item(item, sink) {
                Ok((curves, vertices)) => {
                    stats.curve_sets += 1;
                    stats.curves += curves;
                    stats.vertices += vertices;
                }
                Err(e) => {
                    tracing::warn!(item = %item.name, error = %e, "export item failed");
                    stats.failures.push((item.name.clone(), e));
                }
            }
        }

        tracing::info!(
            curve_sets = stats.curve_sets,
            curves = stats.curves,
            vertices = stats.vertices,
            failures = stats.failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "export finished"
        );
        stats
    }

    fn export_item(&self, item: &ExportItem, sink: &mut dyn GeometrySink) -> Result<(usize, usize)> {
        let opts = ReassembleOptions {
            with_widths: item.source.is_spline_cache(),
            track_roots: item.bake_uv,
            knot_style: self.knot_style,
        };
        let batch = item.source.curve_batch(&opts)?;
        batch.validate()?;

        let root_uvs = if item.bake_uv {
            let sampler = self.uv_sampler.as_ref().ok_or_else(|| {
                Error::other("UV baking requested but no UV sampler is configured")
            })?;
            let mut uvs = Vec::with_capacity(batch.roots.len());
            for root in &batch.roots {
                uvs.push(sampler.uv_at(*root)?);
            }
            Some(uvs)
        } else {
            None
        };

        let meta = CurveSetMeta {
            group_name: item.group_name.clone(),
            is_guide: item.is_guide,
            group_id: item.group_id,
            root_uvs,
        };
        sink.write_curves(&item.name, &batch, &meta)?;
        tracing::debug!(
            item = %item.name,
            curves = batch.num_curves(),
            vertices = batch.total_vertices(),
            "exported curve set"
        );
        Ok((batch.num_curves(), batch.total_vertices()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::HostCurve;
    use crate::sink::MemorySink;
    use glam::vec3;

    #[test]
    fn test_trim_guide_suffix() {
        assert_eq!(trim_guide_suffix("fringe_guide"), "fringe");
        assert_eq!(trim_guide_suffix("fringe"), "fringe");
        assert_eq!(trim_guide_suffix("_guide"), "");
    }

    #[test]
    fn test_host_item_defaults() {
        let curves: Vec<HostCurve> = Vec::new();
        let item = ExportItem::host_curves("fringe_guide", curves);
        assert_eq!(item.name, "fringe_guide");
        assert_eq!(item.group_name, "fringe");
        assert!(item.is_guide);
    }

    #[test]
    fn test_export_host_curves() {
        let curves = vec![HostCurve {
            cvs: vec![vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)],
            knots: vec![0.0, 1.0],
            degree: 1,
        }];
        let mut exporter = Exporter::new();
        exporter.add_item(ExportItem::host_curves("fringe_guide", curves));

        let mut sink = MemorySink::new();
        let stats = exporter.export(&mut sink);
        assert!(stats.all_ok());
        assert_eq!(stats.curve_sets, 1);
        assert_eq!(stats.curves, 1);
        assert_eq!(stats.vertices, 2);
        assert_eq!(sink.sets[0].meta.group_name, "fringe");
    }

    #[test]
    fn test_bake_without_sampler_fails_item_only() {
        let good: Vec<HostCurve> = vec![HostCurve {
            cvs: vec![vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)],
            knots: vec![0.0, 1.0],
            degree: 1,
        }];
        let bad: Vec<HostCurve> = Vec::new();

        let mut exporter = Exporter::new();
        exporter.add_item(ExportItem::host_curves("bad", bad).with_bake_uv(true));
        exporter.add_item(ExportItem::host_curves("good", good));

        let mut sink = MemorySink::new();
        let stats = exporter.export(&mut sink);
        assert_eq!(stats.failures.len(), 1);
        assert_eq!(stats.failures[0].0, "bad");
        // The failing item did not stop the good one.
        assert_eq!(stats.curve_sets, 1);
        assert_eq!(sink.sets.len(), 1);
        assert_eq!(sink.sets[0].name, "good");
    }
}
