//! Shape kinds and the fixed per-kind rule table.

use std::fmt;

use super::geometry::{self, NormalizedRing};
use super::vertex::Vertex;

/// The `Type` attribute of a Halo `<Region>`.
///
/// - `Rectangle`: two opposite corners
/// - `Ellipse`: two corners of the enclosing rectangle
/// - `Ruler`: start and end point
/// - `Polygon`: any number of `<V>` vertices
/// - `Pin`: a single point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Ruler,
    Polygon,
    Pin,
    Unknown,
}

/// Which GeoJSON geometry a shape kind is written as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputGeometry {
    Polygon,
    LineString,
    Point,
}

/// Per-kind behavior used by the normalizer, the hole resolver and the
/// serializers.
#[derive(Clone, Copy)]
pub struct ShapeRules {
    /// Whether the shape encloses an area (may own holes, may be a candidate owner).
    pub has_area: bool,
    /// Minimum number of raw vertices a well-formed region of this kind carries.
    pub min_vertices: usize,
    /// Converts raw vertices into the canonical vertex sequence.
    pub normalize: fn(&[Vertex]) -> NormalizedRing,
    /// Picks the probe point used for hole matching.
    pub representative_point: fn(&[Vertex]) -> Option<Vertex>,
    /// GeoJSON geometry type, `None` if the kind cannot be exported.
    pub output: Option<OutputGeometry>,
}

impl fmt::Debug for ShapeRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRules")
            .field("has_area", &self.has_area)
            .field("min_vertices", &self.min_vertices)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

static RECTANGLE_RULES: ShapeRules = ShapeRules {
    has_area: true,
    min_vertices: 2,
    normalize: geometry::normalize_rectangle,
    representative_point: geometry::first_vertex,
    output: Some(OutputGeometry::Polygon),
};

static ELLIPSE_RULES: ShapeRules = ShapeRules {
    has_area: true,
    min_vertices: 2,
    normalize: geometry::normalize_ellipse,
    representative_point: geometry::corner_midpoint,
    output: Some(OutputGeometry::Polygon),
};

static RULER_RULES: ShapeRules = ShapeRules {
    has_area: false,
    min_vertices: 2,
    normalize: geometry::normalize_open,
    representative_point: geometry::first_vertex,
    output: Some(OutputGeometry::LineString),
};

static POLYGON_RULES: ShapeRules = ShapeRules {
    has_area: true,
    min_vertices: 1,
    normalize: geometry::normalize_polygon,
    representative_point: geometry::first_vertex,
    output: Some(OutputGeometry::Polygon),
};

static PIN_RULES: ShapeRules = ShapeRules {
    has_area: false,
    min_vertices: 1,
    normalize: geometry::normalize_open,
    representative_point: geometry::first_vertex,
    output: Some(OutputGeometry::Point),
};

static UNKNOWN_RULES: ShapeRules = ShapeRules {
    has_area: false,
    min_vertices: 0,
    normalize: geometry::normalize_open,
    representative_point: geometry::first_vertex,
    output: None,
};

impl ShapeKind {
    /// Maps a Halo `Type` attribute value to a kind. Unrecognized values map
    /// to [`ShapeKind::Unknown`].
    pub fn from_halo_type(raw: &str) -> Self {
        match raw {
            "Rectangle" => ShapeKind::Rectangle,
            "Ellipse" => ShapeKind::Ellipse,
            "Ruler" => ShapeKind::Ruler,
            "Polygon" => ShapeKind::Polygon,
            "Pin" => ShapeKind::Pin,
            _ => ShapeKind::Unknown,
        }
    }

    /// The `Type` attribute value Halo uses for this kind.
    pub fn as_halo_type(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Ruler => "Ruler",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Pin => "Pin",
            ShapeKind::Unknown => "Unknown",
        }
    }

    /// Looks up the rule table entry for this kind.
    pub fn rules(self) -> &'static ShapeRules {
        match self {
            ShapeKind::Rectangle => &RECTANGLE_RULES,
            ShapeKind::Ellipse => &ELLIPSE_RULES,
            ShapeKind::Ruler => &RULER_RULES,
            ShapeKind::Polygon => &POLYGON_RULES,
            ShapeKind::Pin => &PIN_RULES,
            ShapeKind::Unknown => &UNKNOWN_RULES,
        }
    }

    /// Whether regions of this kind enclose an area.
    pub fn has_area(self) -> bool {
        self.rules().has_area
    }

    /// All kinds, in Halo's declaration order.
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Rectangle,
            ShapeKind::Ellipse,
            ShapeKind::Ruler,
            ShapeKind::Polygon,
            ShapeKind::Pin,
            ShapeKind::Unknown,
        ]
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_halo_type())
    }
}
