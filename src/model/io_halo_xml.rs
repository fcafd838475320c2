//! Halo `.annotations` XML reader and writer.
//!
//! Layout of the format:
//! - root `<Annotations>` containing one `<Annotation>` per layer
//! - `<Annotation LineColor= Name= Visible=>` holding a `<Regions>` element
//! - `<Region Type= NegativeROA= HasEndcaps=>` holding `<Vertices>` with
//!   `<V X= Y=>` children, plus elements such as `<Attributes>` and
//!   `<Comments>` that are carried through untouched

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use super::color::LineColor;
use super::document::Annotations;
use super::kind::ShapeKind;
use super::layer::Layer;
use super::region::{Region, SourceRecord};
use super::vertex::Vertex;
use super::with_default_extension;
use crate::error::HaloError;

const HALO_EXTENSION: &str = "annotations";

const ATTR_TYPE: &str = "Type";
const ATTR_NEGATIVE: &str = "NegativeROA";
const ATTR_ENDCAPS: &str = "HasEndcaps";

/// Read a Halo `.annotations` file.
///
/// Negative regions are kept at the top level; call
/// [`Annotations::match_negative`] to turn them into holes.
pub fn read_halo_xml(path: &Path) -> Result<Annotations, HaloError> {
    let xml = fs::read_to_string(path).map_err(HaloError::Io)?;
    let doc = parse_halo_xml_str(&xml, path)?;
    log::info!(
        "Finished loading {} ({} layer(s), {} region(s))",
        path.display(),
        doc.layers.len(),
        doc.region_count()
    );
    Ok(doc)
}

/// Write a document as a Halo `.annotations` file.
///
/// If `path` has no extension, `.annotations` is appended. Returns the path
/// that was written.
pub fn write_halo_xml(path: &Path, doc: &Annotations) -> Result<PathBuf, HaloError> {
    let out_file = with_default_extension(path, HALO_EXTENSION);
    if let Some(parent) = out_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(HaloError::Io)?;
    }
    fs::write(&out_file, to_halo_xml_string(doc)).map_err(HaloError::Io)?;
    Ok(out_file)
}

/// Parse Halo XML from a string.
pub fn from_halo_xml_str(xml: &str) -> Result<Annotations, HaloError> {
    parse_halo_xml_str(xml, Path::new("<string>"))
}

/// Parse Halo XML from bytes (must be valid UTF-8).
pub fn from_halo_xml_slice(bytes: &[u8]) -> Result<Annotations, HaloError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| HaloError::XmlParse {
        path: PathBuf::from("<bytes>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    parse_halo_xml_str(xml, Path::new("<bytes>"))
}

/// Serialize a document to Halo XML.
///
/// Each region is followed by its holes, written as negative regions, which
/// is how Halo itself stores them.
pub fn to_halo_xml_string(doc: &Annotations) -> String {
    let mut xml = String::new();
    writeln!(xml, "<Annotations>").expect("write to string");

    for layer in &doc.layers {
        write!(
            xml,
            "  <Annotation LineColor=\"{}\" Name=\"{}\" Visible=\"{}\"",
            layer.line_color.to_halo_value(),
            xml_escape(&layer.name),
            if layer.visible { "True" } else { "False" },
        )
        .expect("write to string");
        for (key, value) in &layer.extra {
            write!(xml, " {}=\"{}\"", key, xml_escape(value)).expect("write to string");
        }
        writeln!(xml, ">").expect("write to string");

        writeln!(xml, "    <Regions>").expect("write to string");
        for region in &layer.regions {
            write_region(&mut xml, region, region.is_negative());
            for hole in region.holes() {
                write_region(&mut xml, hole, true);
            }
        }
        writeln!(xml, "    </Regions>").expect("write to string");
        writeln!(xml, "  </Annotation>").expect("write to string");
    }

    writeln!(xml, "</Annotations>").expect("write to string");
    xml
}

fn write_region(xml: &mut String, region: &Region, negative: bool) {
    write!(xml, "      <Region").expect("write to string");
    for (key, value) in region_attributes(region, negative) {
        write!(xml, " {}=\"{}\"", key, xml_escape(&value)).expect("write to string");
    }
    writeln!(xml, ">").expect("write to string");

    writeln!(xml, "        <Vertices>").expect("write to string");
    for v in region.raw_vertices() {
        writeln!(xml, "          <V X=\"{}\" Y=\"{}\"/>", v.x, v.y).expect("write to string");
    }
    writeln!(xml, "        </Vertices>").expect("write to string");

    for child in region.source().children() {
        writeln!(xml, "        {}", child).expect("write to string");
    }
    writeln!(xml, "      </Region>").expect("write to string");
}

/// Source attributes with `Type`, `HasEndcaps` and `NegativeROA` taken from
/// the model. Unknown shapes keep their original `Type`.
fn region_attributes(region: &Region, negative: bool) -> Vec<(String, String)> {
    let flag = |set: bool| (if set { "1" } else { "0" }).to_string();
    let modeled = [
        (ATTR_TYPE, region.kind().as_halo_type().to_string()),
        (ATTR_ENDCAPS, flag(region.has_endcaps())),
        (ATTR_NEGATIVE, flag(negative)),
    ];

    let mut attrs: Vec<(String, String)> = region.source().attributes().to_vec();
    for (key, value) in modeled {
        match attrs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => {
                let keep_source_type = key == ATTR_TYPE && region.kind() == ShapeKind::Unknown;
                if !keep_source_type {
                    slot.1 = value;
                }
            }
            None => attrs.push((key.to_string(), value)),
        }
    }
    attrs
}

fn parse_halo_xml_str(xml: &str, path: &Path) -> Result<Annotations, HaloError> {
    let document = Document::parse(xml).map_err(|source| HaloError::XmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;

    let root = document.root_element();
    if root.tag_name().name() != "Annotations" {
        return Err(HaloError::XmlParse {
            path: path.to_path_buf(),
            message: "missing <Annotations> root element".to_string(),
        });
    }

    let layers = root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "Annotation")
        .map(|node| parse_layer(node, xml, path))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Annotations::new(layers))
}

fn parse_layer(node: Node<'_, '_>, xml: &str, path: &Path) -> Result<Layer, HaloError> {
    let name = required_attr(node, "Name", path, "<Annotation>")?.to_string();

    let raw_color = required_attr(node, "LineColor", path, "<Annotation>")?;
    let line_color = raw_color
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(LineColor::from_halo_value)
        .ok_or_else(|| HaloError::XmlParse {
            path: path.to_path_buf(),
            message: format!(
                "layer '{name}' has invalid LineColor='{raw_color}'; expected an integer below 16777216"
            ),
        })?;

    let visible = match node.attribute("Visible").map(str::trim) {
        None => true,
        Some(raw) => parse_flag(raw).ok_or_else(|| HaloError::XmlParse {
            path: path.to_path_buf(),
            message: format!("layer '{name}' has invalid Visible='{raw}'; expected True or False"),
        })?,
    };

    let extra: BTreeMap<String, String> = node
        .attributes()
        .filter(|a| !matches!(a.name(), "Name" | "LineColor" | "Visible"))
        .map(|a| (a.name().to_string(), a.value().to_string()))
        .collect();

    let mut layer = Layer::new(name, line_color).with_visible(visible);
    layer.extra = extra;

    let Some(regions) = child_element(node, "Regions") else {
        return Ok(layer);
    };

    for region_node in regions
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "Region")
    {
        let region = parse_region(region_node, xml, path, &layer.name, layer.regions.len())?;
        layer.push_region(region)?;
    }

    Ok(layer)
}

fn parse_region(
    node: Node<'_, '_>,
    xml: &str,
    path: &Path,
    layer: &str,
    index: usize,
) -> Result<Region, HaloError> {
    let context = format!("region {index} of layer '{layer}'");
    let kind = ShapeKind::from_halo_type(required_attr(node, ATTR_TYPE, path, &context)?.trim());
    let is_negative = parse_optional_flag(node, ATTR_NEGATIVE, path, &context)?;
    let has_endcaps = parse_optional_flag(node, ATTR_ENDCAPS, path, &context)?;

    let mut vertices = Vec::new();
    let mut children = Vec::new();
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == "Vertices" {
            for v in child
                .children()
                .filter(|n| n.is_element() && n.tag_name().name() == "V")
            {
                let x = parse_coordinate(v, "X", path, &context)?;
                let y = parse_coordinate(v, "Y", path, &context)?;
                let vertex = Vertex::new(x, y);
                if !vertex.is_finite() {
                    return Err(HaloError::XmlParse {
                        path: path.to_path_buf(),
                        message: format!(
                            "<V> in {context} has non-finite coordinates ({x}, {y})"
                        ),
                    });
                }
                vertices.push(vertex);
            }
        } else {
            children.push(xml[child.range()].to_string());
        }
    }

    let source = SourceRecord {
        attributes: node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect(),
        children,
    };

    Ok(Region::new(kind, vertices)
        .negative(is_negative)
        .with_endcaps(has_endcaps)
        .with_source(source))
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn required_attr<'a>(
    node: Node<'a, '_>,
    attr: &str,
    path: &Path,
    context: &str,
) -> Result<&'a str, HaloError> {
    node.attribute(attr).ok_or_else(|| HaloError::XmlParse {
        path: path.to_path_buf(),
        message: format!("missing '{attr}' attribute in {context}"),
    })
}

fn parse_optional_flag(
    node: Node<'_, '_>,
    attr: &str,
    path: &Path,
    context: &str,
) -> Result<bool, HaloError> {
    node.attribute(attr)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|raw| {
            parse_flag(raw).ok_or_else(|| HaloError::XmlParse {
                path: path.to_path_buf(),
                message: format!("{context} has invalid {attr}='{raw}'; expected '0' or '1'"),
            })
        })
        .transpose()
        .map(|flag| flag.unwrap_or(false))
}

fn parse_coordinate(
    node: Node<'_, '_>,
    attr: &str,
    path: &Path,
    context: &str,
) -> Result<f64, HaloError> {
    let raw = required_attr(node, attr, path, context)?;
    raw.trim().parse::<f64>().map_err(|_| HaloError::XmlParse {
        path: path.to_path_buf(),
        message: format!("<V> in {context} has invalid {attr}='{raw}'; expected a number"),
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<Annotations>
  <Annotation LineColor="65280" Name="Tumor" Visible="True" Selected="1">
    <Attributes/>
    <Regions>
      <RegionAttributeHeaders/>
      <Region Type="Rectangle" HasEndcaps="0" NegativeROA="0" Zoom="0.5">
        <Attributes/>
        <Vertices><V X="0" Y="0"/><V X="10" Y="10"/></Vertices>
        <Comments><Comment Author="a" Body="big one" CreatedTime="2023-01-01T00:00:00.000000Z" ModifiedTime="2023-01-01T00:00:00.000000Z"/></Comments>
      </Region>
      <Region Type="Rectangle" HasEndcaps="0" NegativeROA="1">
        <Vertices><V X="2" Y="2"/><V X="4" Y="4"/></Vertices>
      </Region>
      <Region Type="Pin" HasEndcaps="0" NegativeROA="0">
        <Vertices><V X="20.5" Y="3.25"/></Vertices>
      </Region>
    </Regions>
  </Annotation>
  <Annotation LineColor="255" Name="Empty" Visible="False">
    <Regions/>
  </Annotation>
</Annotations>"#;

    #[test]
    fn parses_layers_and_regions() {
        let doc = from_halo_xml_str(SAMPLE).expect("parse");
        assert_eq!(doc.layers.len(), 2);

        let tumor = &doc.layers[0];
        assert_eq!(tumor.name, "Tumor");
        assert_eq!(tumor.line_color, LineColor::new(0, 255, 0));
        assert!(tumor.visible);
        assert_eq!(tumor.extra.get("Selected"), Some(&"1".to_string()));
        assert_eq!(tumor.regions.len(), 3);
        assert_eq!(tumor.regions[0].kind(), ShapeKind::Rectangle);
        assert!(tumor.regions[1].is_negative());
        assert_eq!(tumor.regions[2].raw_vertices(), &[Vertex::new(20.5, 3.25)]);

        let empty = &doc.layers[1];
        assert!(!empty.visible);
        assert_eq!(empty.line_color, LineColor::new(255, 0, 0));
        assert!(empty.regions.is_empty());
    }

    #[test]
    fn source_record_keeps_unmodeled_children() {
        let doc = from_halo_xml_str(SAMPLE).expect("parse");
        let source = doc.layers[0].regions[0].source();
        assert_eq!(source.children().len(), 2);
        assert!(source.children()[1].contains("big one"));
        assert!(source
            .attributes()
            .iter()
            .any(|(k, v)| k == "Zoom" && v == "0.5"));
    }

    #[test]
    fn parse_rejects_invalid_root() {
        let err = from_halo_xml_str("<Annotation/>").unwrap_err();
        match err {
            HaloError::XmlParse { message, .. } => assert!(message.contains("<Annotations>")),
            other => panic!("expected XmlParse, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_bad_coordinate() {
        let xml = r#"<Annotations><Annotation LineColor="0" Name="L" Visible="True"><Regions>
<Region Type="Pin" HasEndcaps="0" NegativeROA="0"><Vertices><V X="abc" Y="1"/></Vertices></Region>
</Regions></Annotation></Annotations>"#;
        let err = from_halo_xml_str(xml).unwrap_err();
        match err {
            HaloError::XmlParse { message, .. } => assert!(message.contains("X='abc'")),
            other => panic!("expected XmlParse, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_non_finite_coordinate() {
        let xml = r#"<Annotations><Annotation LineColor="0" Name="L" Visible="True"><Regions>
<Region Type="Pin" HasEndcaps="0" NegativeROA="0"><Vertices><V X="1" Y="inf"/></Vertices></Region>
</Regions></Annotation></Annotations>"#;
        match from_halo_xml_str(xml).unwrap_err() {
            HaloError::XmlParse { message, .. } => {
                assert!(message.contains("non-finite coordinates (1, inf)"))
            }
            other => panic!("expected XmlParse, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_oversized_color() {
        let xml = r#"<Annotations><Annotation LineColor="16777216" Name="L" Visible="True"/></Annotations>"#;
        assert!(matches!(
            from_halo_xml_str(xml),
            Err(HaloError::XmlParse { .. })
        ));
    }

    #[test]
    fn parse_reports_malformed_region_index() {
        let xml = r#"<Annotations><Annotation LineColor="0" Name="L" Visible="True"><Regions>
<Region Type="Pin" HasEndcaps="0" NegativeROA="0"><Vertices><V X="1" Y="1"/></Vertices></Region>
<Region Type="Rectangle" HasEndcaps="0" NegativeROA="0"><Vertices><V X="1" Y="1"/></Vertices></Region>
</Regions></Annotation></Annotations>"#;
        match from_halo_xml_str(xml).unwrap_err() {
            HaloError::MalformedRegion { layer, index, .. } => {
                assert_eq!(layer, "L");
                assert_eq!(index, 1);
            }
            other => panic!("expected MalformedRegion, got {other:?}"),
        }
    }

    #[test]
    fn write_then_read_preserves_structure() {
        let mut doc = from_halo_xml_str(SAMPLE).expect("parse");
        let mut report = crate::diagnostics::Diagnostics::new();
        doc.match_negative(&mut report).expect("match");

        let out = to_halo_xml_string(&doc);
        let mut restored = from_halo_xml_str(&out).expect("parse restored");

        // Holes are written back as negative regions right after their owner.
        assert_eq!(restored.layers[0].regions.len(), 3);
        assert!(restored.layers[0].regions[1].is_negative());

        restored.match_negative(&mut report).expect("match restored");
        assert_eq!(restored.layers[0].regions.len(), 2);
        assert_eq!(restored.layers[0].regions[0].holes().len(), 1);
        assert!(restored.layers[0].regions[0].source().children()[1].contains("big one"));
        assert_eq!(restored.layers[0].extra, doc.layers[0].extra);
        assert!(!restored.layers[1].visible);
    }

    #[test]
    fn unknown_type_is_written_back_unchanged() {
        let xml = r#"<Annotations><Annotation LineColor="0" Name="L" Visible="True"><Regions>
<Region Type="Freehand" HasEndcaps="0" NegativeROA="0"><Vertices/></Region>
</Regions></Annotation></Annotations>"#;
        let doc = from_halo_xml_str(xml).expect("parse");
        assert_eq!(doc.layers[0].regions[0].kind(), ShapeKind::Unknown);
        assert!(to_halo_xml_string(&doc).contains("Type=\"Freehand\""));
    }

    #[test]
    fn regions_without_source_get_modeled_attributes() {
        let region = Region::from_rings(&[vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(5.0, 0.0),
            Vertex::new(5.0, 5.0),
            Vertex::new(0.0, 0.0),
        ]])
        .expect("ring");
        let mut layer = Layer::new("New", LineColor::new(1, 2, 3));
        layer.regions.push(region);
        let out = to_halo_xml_string(&Annotations::new(vec![layer]));

        assert!(out.contains(r#"<Region Type="Polygon" HasEndcaps="0" NegativeROA="0">"#));
        assert!(out.contains(r#"LineColor="197121""#));
        assert!(out.contains(r#"<V X="5" Y="0"/>"#));
    }
}
