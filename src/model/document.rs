//! A whole `.annotations` document.

use super::holes::MatchSummary;
use super::layer::Layer;
use crate::diagnostics::Diagnostics;
use crate::error::HaloError;

/// The contents of one Halo `.annotations` file: an ordered list of layers.
#[derive(Clone, Debug, Default)]
pub struct Annotations {
    pub layers: Vec<Layer>,
}

impl Annotations {
    /// Creates a document from layers.
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// Matches the negative regions of every layer to their positive region.
    ///
    /// Layers are independent. A layer that fails stops the run; layers
    /// processed before it keep their result.
    pub fn match_negative(&mut self, report: &mut Diagnostics) -> Result<MatchSummary, HaloError> {
        let mut total = MatchSummary::default();
        for layer in &mut self.layers {
            let summary = layer.match_negative(report)?;
            total.matched += summary.matched;
            total.discarded += summary.discarded;
        }
        Ok(total)
    }

    /// Returns true if any layer still has negative regions at the top level.
    pub fn contains_negative(&self) -> bool {
        self.layers.iter().any(Layer::contains_negative)
    }

    /// Reports every polygon ring in the document that had to be closed.
    pub fn audit_geometry(&self, report: &mut Diagnostics) {
        for layer in &self.layers {
            layer.audit_geometry(report);
        }
    }

    /// Total number of top-level regions over all layers.
    pub fn region_count(&self) -> usize {
        self.layers.iter().map(|l| l.regions.len()).sum()
    }
}
