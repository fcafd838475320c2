use std::path::PathBuf;
use thiserror::Error;

use crate::diagnostics::Diagnostics;
use crate::model::ShapeKind;

/// The main error type for haloxml operations.
#[derive(Debug, Error)]
pub enum HaloError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse Halo XML from {path}: {message}")]
    XmlParse { path: PathBuf, message: String },

    #[error("Malformed region {index} in layer '{layer}': {message}")]
    MalformedRegion {
        layer: String,
        index: usize,
        message: String,
    },

    /// Only regions with area may own holes. Hitting this means the
    /// resolver picked an owner it should have excluded.
    #[error("Cannot attach a hole to a {kind} region: it has no area")]
    HoleOnRegionWithoutArea { kind: ShapeKind },

    #[error("Failed to write GeoJSON to {path}: {source}")]
    GeoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Processing produced {warning_count} warning(s) in strict mode")]
    DiagnosticsFailed {
        warning_count: usize,
        report: Diagnostics,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
