//! GeoJSON export.
//!
//! Produces a `FeatureCollection` that QuPath can import: one feature per
//! top-level region, classified by its layer name and color. Area shapes
//! become `Polygon`s carrying their holes, rulers `LineString`s and pins
//! `Point`s.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use uuid::Uuid;

use super::document::Annotations;
use super::geometry::close_ring;
use super::kind::{OutputGeometry, ShapeKind};
use super::layer::Layer;
use super::region::Region;
use super::vertex::Vertex;
use super::with_default_extension;
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticContext, Diagnostics};
use crate::error::HaloError;

const GEOJSON_EXTENSION: &str = "geojson";

/// How polygons flagged with `HasEndcaps` are exported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EndcapPolicy {
    /// Close every polygon into a ring, endcaps or not.
    #[default]
    AlwaysClose,
    /// Export endcapped polygons as open `LineString`s of their raw vertices,
    /// unless they own holes.
    OpenPolyline,
}

/// Options for GeoJSON export.
#[derive(Clone, Debug)]
pub struct GeoJsonOptions {
    /// Match negative regions to holes first if any layer still has them.
    pub match_negative: bool,
    /// Treatment of endcapped polygons.
    pub endcaps: EndcapPolicy,
}

impl Default for GeoJsonOptions {
    fn default() -> Self {
        Self {
            match_negative: true,
            endcaps: EndcapPolicy::AlwaysClose,
        }
    }
}

/// Build the GeoJSON `FeatureCollection` for a document.
///
/// If a layer still has negative regions and `opts.match_negative` is set,
/// matching runs on a copy of the document first; `doc` is not modified.
pub fn to_geojson_value(
    doc: &Annotations,
    opts: &GeoJsonOptions,
    report: &mut Diagnostics,
) -> Result<Value, HaloError> {
    let doc: Cow<'_, Annotations> = if opts.match_negative && doc.contains_negative() {
        log::warn!(
            "Document contains negative regions; matching them before converting to GeoJSON"
        );
        let mut matched = doc.clone();
        matched.match_negative(report)?;
        Cow::Owned(matched)
    } else {
        Cow::Borrowed(doc)
    };

    let mut features = Vec::with_capacity(doc.region_count());
    for layer in &doc.layers {
        layer_features(layer, opts, report, &mut features);
    }

    Ok(json!({
        "type": "FeatureCollection",
        "features": features,
    }))
}

/// Serialize a document to a GeoJSON string.
pub fn to_geojson_string(
    doc: &Annotations,
    opts: &GeoJsonOptions,
    report: &mut Diagnostics,
) -> Result<String, HaloError> {
    let value = to_geojson_value(doc, opts, report)?;
    serde_json::to_string(&value).map_err(|source| HaloError::GeoJsonWrite {
        path: PathBuf::from("<string>"),
        source,
    })
}

/// Write a document as a GeoJSON file.
///
/// If `path` has no extension, `.geojson` is appended. Returns the path that
/// was written.
pub fn write_geojson(
    path: &Path,
    doc: &Annotations,
    opts: &GeoJsonOptions,
    report: &mut Diagnostics,
) -> Result<PathBuf, HaloError> {
    let value = to_geojson_value(doc, opts, report)?;

    let out_file = with_default_extension(path, GEOJSON_EXTENSION);
    if let Some(parent) = out_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(HaloError::Io)?;
    }
    let file = File::create(&out_file).map_err(HaloError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer(writer, &value).map_err(|source| HaloError::GeoJsonWrite {
        path: out_file.clone(),
        source,
    })?;
    Ok(out_file)
}

fn layer_features(
    layer: &Layer,
    opts: &GeoJsonOptions,
    report: &mut Diagnostics,
    features: &mut Vec<Value>,
) {
    let properties = json!({
        "objectType": "annotation",
        "name": layer.name,
        "classification": {
            "name": layer.name,
            "color": layer.line_color.rgb(),
        },
        "isLocked": false,
    });

    for (index, region) in layer.regions.iter().enumerate() {
        let Some(geometry) = region_geometry(region, opts.endcaps) else {
            report.add(Diagnostic::error(
                DiagnosticCode::UnsupportedShape,
                format!("Cannot convert {} region to GeoJSON; skipped", region.kind()),
                DiagnosticContext::Region {
                    layer: layer.name.clone(),
                    index,
                },
            ));
            continue;
        };

        features.push(json!({
            "type": "Feature",
            "id": Uuid::new_v4().to_string(),
            "geometry": geometry,
            "properties": properties.clone(),
        }));
    }
}

fn region_geometry(region: &Region, endcaps: EndcapPolicy) -> Option<Value> {
    let output = region.kind().rules().output?;

    // A polygon that owns holes stays a ring so the holes are kept.
    let open_polyline = endcaps == EndcapPolicy::OpenPolyline
        && region.kind() == ShapeKind::Polygon
        && region.has_endcaps()
        && region.holes().is_empty();
    if open_polyline {
        return Some(line_string(region.raw_vertices()));
    }

    match output {
        OutputGeometry::Polygon => {
            let rings: Vec<Vec<[f64; 2]>> = std::iter::once(region)
                .chain(region.holes())
                .map(|r| closed_positions(r.vertices()))
                .collect();
            Some(json!({ "type": "Polygon", "coordinates": rings }))
        }
        OutputGeometry::LineString => Some(line_string(region.vertices())),
        OutputGeometry::Point => region
            .vertices()
            .first()
            .map(|v| json!({ "type": "Point", "coordinates": v.to_array() })),
    }
}

fn line_string(vertices: &[Vertex]) -> Value {
    let coordinates: Vec<[f64; 2]> = vertices.iter().map(|v| v.to_array()).collect();
    json!({ "type": "LineString", "coordinates": coordinates })
}

fn closed_positions(vertices: &[Vertex]) -> Vec<[f64; 2]> {
    let mut ring = vertices.to_vec();
    close_ring(&mut ring);
    ring.into_iter().map(Vertex::to_array).collect()
}
