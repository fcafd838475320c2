//! A single annotated shape and the holes it owns.

use std::cell::OnceCell;

use super::geometry::NormalizedRing;
use super::kind::ShapeKind;
use super::vertex::Vertex;
use crate::error::HaloError;

/// Opaque copy of the XML a region was read from.
///
/// The XML reader fills this in and the XML writer emits it again, so that
/// attributes and child elements this crate does not model (region
/// attributes, comments, ...) survive a round trip. Nothing else looks
/// inside it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceRecord {
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<String>,
}

impl SourceRecord {
    /// Attributes of the `<Region>` element, in document order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Verbatim XML of each child element other than `<Vertices>`.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// Returns true if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }
}

/// One declared shape in a layer.
///
/// Geometry is fixed at construction. The normalized vertex sequence is
/// computed on first use and cached for the lifetime of the region. The
/// only mutation after construction is [`Region::add_hole`], which moves
/// another region into this one's hole list.
#[derive(Clone, Debug)]
pub struct Region {
    kind: ShapeKind,
    is_negative: bool,
    has_endcaps: bool,
    raw_vertices: Vec<Vertex>,
    holes: Vec<Region>,
    source: SourceRecord,
    ring: OnceCell<NormalizedRing>,
}

impl Region {
    /// Creates a positive region without endcaps.
    pub fn new(kind: ShapeKind, raw_vertices: Vec<Vertex>) -> Self {
        Self {
            kind,
            is_negative: false,
            has_endcaps: false,
            raw_vertices,
            holes: Vec::new(),
            source: SourceRecord::default(),
            ring: OnceCell::new(),
        }
    }

    /// Sets the polarity (`NegativeROA` in Halo).
    pub fn negative(mut self, is_negative: bool) -> Self {
        self.is_negative = is_negative;
        self
    }

    /// Sets the `HasEndcaps` flag.
    pub fn with_endcaps(mut self, has_endcaps: bool) -> Self {
        self.has_endcaps = has_endcaps;
        self
    }

    /// Attaches the XML the region was read from.
    pub fn with_source(mut self, source: SourceRecord) -> Self {
        self.source = source;
        self
    }

    /// Builds a positive polygon from an outer ring followed by hole rings.
    ///
    /// Coordinates are floored to whole pixels, matching what Halo writes.
    /// Each hole becomes a negative polygon owned by the outer region.
    /// Returns `None` if `rings` is empty.
    pub fn from_rings(rings: &[Vec<Vertex>]) -> Option<Self> {
        let (outer, holes) = rings.split_first()?;
        let floored = |ring: &Vec<Vertex>| -> Vec<Vertex> {
            ring.iter()
                .map(|v| Vertex::new(v.x.floor(), v.y.floor()))
                .collect()
        };

        let mut region = Region::new(ShapeKind::Polygon, floored(outer));
        region.holes = holes
            .iter()
            .map(|ring| Region::new(ShapeKind::Polygon, floored(ring)).negative(true))
            .collect();
        Some(region)
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn is_negative(&self) -> bool {
        self.is_negative
    }

    pub fn has_endcaps(&self) -> bool {
        self.has_endcaps
    }

    /// Whether this region encloses an area and may own holes.
    pub fn has_area(&self) -> bool {
        self.kind.has_area()
    }

    /// Vertices exactly as read from the source.
    pub fn raw_vertices(&self) -> &[Vertex] {
        &self.raw_vertices
    }

    /// Holes attached to this region, in the order they were matched.
    pub fn holes(&self) -> &[Region] {
        &self.holes
    }

    pub fn source(&self) -> &SourceRecord {
        &self.source
    }

    /// The normalized vertex sequence: a closed ring for area shapes, the
    /// raw vertices for rulers and pins.
    pub fn vertices(&self) -> &[Vertex] {
        &self.normalized().vertices
    }

    /// True if this is a polygon whose raw vertices did not close.
    pub fn was_auto_closed(&self) -> bool {
        self.normalized().auto_closed
    }

    /// The probe point used to find this region's owner when it is a hole:
    /// the centre for ellipses, the first raw vertex for everything else.
    pub fn representative_point(&self) -> Option<Vertex> {
        (self.kind.rules().representative_point)(&self.raw_vertices)
    }

    /// Moves `hole` into this region's hole list.
    ///
    /// # Errors
    /// Returns [`HaloError::HoleOnRegionWithoutArea`] if this region is a
    /// ruler, pin or unknown shape.
    pub fn add_hole(&mut self, hole: Region) -> Result<(), HaloError> {
        if !self.has_area() {
            return Err(HaloError::HoleOnRegionWithoutArea { kind: self.kind });
        }
        self.holes.push(hole);
        Ok(())
    }

    /// Checks that the region carries enough raw vertices for its kind.
    pub(crate) fn check_vertex_count(&self) -> Result<(), String> {
        let rules = self.kind.rules();
        if self.raw_vertices.len() < rules.min_vertices {
            return Err(format!(
                "{} needs at least {} vertices, found {}",
                self.kind,
                rules.min_vertices,
                self.raw_vertices.len()
            ));
        }
        Ok(())
    }

    fn normalized(&self) -> &NormalizedRing {
        self.ring
            .get_or_init(|| (self.kind.rules().normalize)(&self.raw_vertices))
    }
}
