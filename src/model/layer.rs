//! Layers: named groups of regions sharing a color and visibility.

use std::collections::BTreeMap;

use super::color::LineColor;
use super::holes::{self, MatchSummary};
use super::region::Region;
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticContext, Diagnostics};
use crate::error::HaloError;

/// A Halo `<Annotation>` element: a named layer of regions.
#[derive(Clone, Debug, Default)]
pub struct Layer {
    /// Layer name (`Name` attribute).
    pub name: String,

    /// Outline color (`LineColor` attribute).
    pub line_color: LineColor,

    /// Whether Halo shows the layer (`Visible` attribute).
    pub visible: bool,

    /// Any other `<Annotation>` attributes, kept for round trips.
    pub extra: BTreeMap<String, String>,

    /// Top-level regions in source order.
    pub regions: Vec<Region>,
}

impl Layer {
    /// Creates an empty visible layer.
    pub fn new(name: impl Into<String>, line_color: LineColor) -> Self {
        Self {
            name: name.into(),
            line_color,
            visible: true,
            extra: BTreeMap::new(),
            regions: Vec::new(),
        }
    }

    /// Sets the visibility flag.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Appends a region after checking it carries enough vertices for its kind.
    ///
    /// # Errors
    /// Returns [`HaloError::MalformedRegion`] naming this layer and the index
    /// the region would have had.
    pub fn push_region(&mut self, region: Region) -> Result<(), HaloError> {
        region
            .check_vertex_count()
            .map_err(|message| HaloError::MalformedRegion {
                layer: self.name.clone(),
                index: self.regions.len(),
                message,
            })?;
        self.regions.push(region);
        Ok(())
    }

    /// Are there any negative regions left at the top level?
    pub fn contains_negative(&self) -> bool {
        self.regions.iter().any(Region::is_negative)
    }

    /// Attaches every negative region to the positive region containing it
    /// and removes all negatives from the top level.
    ///
    /// See [`holes::match_holes`].
    pub fn match_negative(&mut self, report: &mut Diagnostics) -> Result<MatchSummary, HaloError> {
        holes::match_holes(self, report)
    }

    /// Reports every polygon ring (top-level or hole) that had to be closed.
    pub fn audit_geometry(&self, report: &mut Diagnostics) {
        for (index, region) in self.regions.iter().enumerate() {
            if region.was_auto_closed() {
                report.add(Diagnostic::warning(
                    DiagnosticCode::PolygonAutoClosed,
                    "Polygon does not close; closed it",
                    DiagnosticContext::Region {
                        layer: self.name.clone(),
                        index,
                    },
                ));
            }
            for (hole_index, hole) in region.holes().iter().enumerate() {
                if hole.was_auto_closed() {
                    report.add(Diagnostic::warning(
                        DiagnosticCode::PolygonAutoClosed,
                        "Polygon does not close; closed it",
                        DiagnosticContext::Hole {
                            layer: self.name.clone(),
                            region: index,
                            hole: hole_index,
                        },
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ShapeKind, Vertex};

    fn v(x: f64, y: f64) -> Vertex {
        Vertex::new(x, y)
    }

    #[test]
    fn push_region_rejects_missing_vertices() {
        let mut layer = Layer::new("Tumor", LineColor::default());
        layer
            .push_region(Region::new(ShapeKind::Pin, vec![v(1.0, 1.0)]))
            .expect("pin with one vertex");

        let err = layer
            .push_region(Region::new(ShapeKind::Ellipse, vec![v(1.0, 1.0)]))
            .unwrap_err();
        match err {
            HaloError::MalformedRegion { layer, index, .. } => {
                assert_eq!(layer, "Tumor");
                assert_eq!(index, 1);
            }
            other => panic!("expected MalformedRegion, got {other:?}"),
        }
        assert_eq!(layer.regions.len(), 1);
    }

    #[test]
    fn audit_reports_open_polygons_and_holes() {
        let mut outer = Region::new(
            ShapeKind::Polygon,
            vec![v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)],
        );
        outer
            .add_hole(
                Region::new(ShapeKind::Polygon, vec![v(2.0, 2.0), v(3.0, 2.0), v(3.0, 3.0)])
                    .negative(true),
            )
            .expect("polygon has area");

        let mut layer = Layer::new("Stroma", LineColor::default());
        layer.regions.push(outer);
        layer.regions.push(Region::new(
            ShapeKind::Rectangle,
            vec![v(20.0, 20.0), v(30.0, 30.0)],
        ));

        let mut report = Diagnostics::new();
        layer.audit_geometry(&mut report);

        let contexts: Vec<_> = report.issues.iter().map(|i| i.context.clone()).collect();
        assert_eq!(
            contexts,
            vec![
                DiagnosticContext::Region {
                    layer: "Stroma".into(),
                    index: 0
                },
                DiagnosticContext::Hole {
                    layer: "Stroma".into(),
                    region: 0,
                    hole: 0
                },
            ]
        );
    }

    #[test]
    fn contains_negative() {
        let mut layer = Layer::new("Tumor", LineColor::default());
        assert!(!layer.contains_negative());
        layer.regions.push(
            Region::new(ShapeKind::Rectangle, vec![v(0.0, 0.0), v(1.0, 1.0)]).negative(true),
        );
        assert!(layer.contains_negative());
    }
}
