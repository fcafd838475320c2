//! Document inspection.
//!
//! Summarizes an annotations document per layer: region counts by shape
//! kind, negative regions left at the top level and attached holes.

mod report;

pub use report::{InspectReport, LayerSummary};

use std::collections::BTreeMap;

use crate::model::{Annotations, Layer};

/// Inspect a document and produce a per-layer report.
///
/// `matched` records whether the caller ran hole matching first; it only
/// affects how the report is labelled.
pub fn inspect_annotations(doc: &Annotations, matched: bool) -> InspectReport {
    InspectReport {
        matched,
        layers: doc.layers.iter().map(summarize_layer).collect(),
    }
}

fn summarize_layer(layer: &Layer) -> LayerSummary {
    let mut kinds: BTreeMap<String, usize> = BTreeMap::new();
    for region in &layer.regions {
        *kinds.entry(region.kind().to_string()).or_insert(0) += 1;
    }

    LayerSummary {
        name: layer.name.clone(),
        color: layer.line_color.rgb(),
        visible: layer.visible,
        regions: layer.regions.len(),
        negative: layer.regions.iter().filter(|r| r.is_negative()).count(),
        holes: layer.regions.iter().map(|r| r.holes().len()).sum(),
        kinds,
    }
}
