//! Domain model for Halo annotations.
//!
//! A document is a list of [`Layer`]s; each layer holds [`Region`]s. A
//! region is one drawn shape ([`ShapeKind`]) with a polarity: negative
//! regions are holes that Halo stores next to, not inside, the region they
//! cut into. [`Layer::match_negative`] recovers that ownership.
//!
//! # Pipeline
//!
//! 1. [`io_halo_xml`] reads raw region records into layers.
//! 2. Each region's canonical vertex sequence is derived on demand by the
//!    per-kind rules in [`ShapeKind::rules`] and cached.
//! 3. The hole resolver moves every negative region into the hole list of
//!    the first positive region containing it.
//! 4. [`io_halo_xml`] or [`io_geojson`] write the result.
//!
//! # Example
//!
//! ```
//! use haloxml::diagnostics::Diagnostics;
//! use haloxml::model::{Layer, LineColor, Region, ShapeKind, Vertex};
//!
//! let mut layer = Layer::new("Tumor", LineColor::new(255, 0, 0));
//! layer.regions = vec![
//!     Region::new(ShapeKind::Rectangle, vec![Vertex::new(0.0, 0.0), Vertex::new(10.0, 10.0)]),
//!     Region::new(ShapeKind::Rectangle, vec![Vertex::new(2.0, 2.0), Vertex::new(4.0, 4.0)])
//!         .negative(true),
//! ];
//!
//! let mut report = Diagnostics::new();
//! layer.match_negative(&mut report).unwrap();
//! assert_eq!(layer.regions.len(), 1);
//! assert_eq!(layer.regions[0].holes().len(), 1);
//! ```

mod color;
mod document;
pub mod geometry;
pub mod holes;
pub mod io_geojson;
pub mod io_halo_xml;
mod kind;
mod layer;
pub mod pip;
mod region;
mod vertex;

use std::path::{Path, PathBuf};

// Re-export core types for convenient access
pub use color::LineColor;
pub use document::Annotations;
pub use holes::MatchSummary;
pub use kind::{OutputGeometry, ShapeKind, ShapeRules};
pub use layer::Layer;
pub use region::{Region, SourceRecord};
pub use vertex::Vertex;

/// Appends `.{extension}` to `path` if it has no extension.
pub(crate) fn with_default_extension(path: &Path, extension: &str) -> PathBuf {
    if path.extension().is_some() {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
