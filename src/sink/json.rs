//! JSON geometry sink.
//!
//! Writes one JSON document per curve set. Meant for inspection and for
//! driving the pipeline without an interchange library; the buffer layout
//! mirrors what an archive writer would receive.

use std::io::Write;

use serde_json::json;

use super::{CurveSetMeta, GeometrySink, PROP_GROUP_ID, PROP_GROUP_NAME, PROP_GUIDE, PROP_ROOT_UV};
use crate::geom::CurveBatch;
use crate::util::{Error, Result};

/// Sink that serializes each curve set as a JSON document.
pub struct JsonSink<W: Write> {
    out: W,
    pretty: bool,
}

impl<W: Write> JsonSink<W> {
    /// Create a sink writing compact JSON.
    pub fn new(out: W) -> Self {
        Self { out, pretty: false }
    }

    /// Create a sink writing human-readable JSON.
    pub fn pretty(out: W) -> Self {
        Self { out, pretty: true }
    }

    /// Finish writing and hand back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> GeometrySink for JsonSink<W> {
    fn write_curves(&mut self, name: &str, batch: &CurveBatch, meta: &CurveSetMeta) -> Result<()> {
        let mut doc = json!({
            "name": name,
            "numCurves": batch.num_curves(),
            "curveType": batch.curve_type.to_u8(),
            "wrap": batch.wrap.to_u8(),
            "basis": batch.basis.to_u8(),
            "vertexCounts": &batch.vertex_counts,
            "positions": batch.positions_flat(),
            "orders": &batch.orders,
            "knots": &batch.knots,
        });
        doc[PROP_GROUP_NAME] = json!(&meta.group_name);
        doc[PROP_GUIDE] = json!(if meta.is_guide { 1 } else { 0 });
        if batch.has_widths() {
            doc["widths"] = json!(&batch.widths);
        }
        if let Some(group_id) = meta.group_id {
            doc[PROP_GROUP_ID] = json!(group_id);
        }
        if let Some(ref uvs) = meta.root_uvs {
            let flat: Vec<f32> = uvs.iter().flat_map(|uv| [uv.x, uv.y]).collect();
            doc[PROP_ROOT_UV] = json!(flat);
        }

        let r = if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, &doc)
        } else {
            serde_json::to_writer(&mut self.out, &doc)
        };
        r.map_err(|e| Error::other(format!("JSON sink: {e}")))?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{vec2, vec3};

    #[test]
    fn test_json_sink_document() {
        let batch = CurveBatch {
            vertex_counts: vec![2],
            positions: vec![vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0)],
            widths: vec![0.1, 0.2],
            knots: vec![0.0, 0.0, 1.0, 1.0],
            orders: vec![2],
            ..Default::default()
        };
        let meta = CurveSetMeta {
            group_name: "fur".into(),
            is_guide: false,
            group_id: Some(3),
            root_uvs: Some(vec![vec2(0.25, 0.75)]),
        };

        let mut sink = JsonSink::new(Vec::new());
        sink.write_curves("scalp", &batch, &meta).unwrap();
        let out = sink.into_inner();

        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["name"], "scalp");
        assert_eq!(doc[PROP_GROUP_NAME], "fur");
        assert_eq!(doc[PROP_GUIDE], 0);
        assert_eq!(doc[PROP_GROUP_ID], 3);
        assert_eq!(doc["vertexCounts"], json!([2]));
        assert_eq!(doc["positions"], json!([0.0, 0.0, 0.0, 1.0, 0.0, 0.0]));
        assert_eq!(doc["widths"], json!([0.1, 0.2]));
        assert_eq!(doc[PROP_ROOT_UV], json!([0.25, 0.75]));
    }

    #[test]
    fn test_json_sink_omits_absent_fields() {
        let batch = CurveBatch::default();
        let meta = CurveSetMeta::default();
        let mut sink = JsonSink::new(Vec::new());
        sink.write_curves("bare", &batch, &meta).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert!(doc.get("widths").is_none());
        assert!(doc.get(PROP_GROUP_ID).is_none());
        assert!(doc.get(PROP_ROOT_UV).is_none());
    }
}
