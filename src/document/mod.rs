//! Scene document (`main.xml`) parsing and writing.
//!
//! ## Layout
//!
//! ```text
//! <scene>
//!   <surfaces>  <surface id=".." sizePerVertex=".." inputs="POSITION,UV0" formats="float3,float2"/> ...
//!   <maps>      <map id=".." type=".." channel=".." source=".."/> ...
//!   <materials> <material id=".." name=".." twoSided="true" opacity=".."/> ...
//!   <nodes>     <node id=".." name=".." type="mesh|camera|.." .../> ...
//! </scene>
//! ```
//!
//! The root must hold exactly these four groups, in this order. Groups may
//! be empty. The root element's own name is not checked.

mod element;
mod records;

pub use element::{join_floats, join_list, split_list, RecordElement, LIST_SEPARATOR};
pub use records::Record;

use std::collections::BTreeSet;

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute as XmlAttribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use roxmltree::{Document, Node};

use crate::scene::SceneModel;
use crate::util::{ContainerError, ParseError, ParseResult, Result};

/// Root element name used when writing.
pub const ROOT_TAG: &str = "scene";

/// Group element names, in required order.
pub const GROUP_TAGS: [&str; 4] = ["surfaces", "maps", "materials", "nodes"];

/// Parse a scene document into a model with descriptors only (no buffers).
pub fn parse_document(bytes: &[u8]) -> ParseResult<SceneModel> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ParseError::MalformedDocument(format!("not UTF-8: {}", e)))?;
    let text = text.trim_start_matches('\u{feff}');

    let doc = Document::parse(text).map_err(|e| ParseError::MalformedDocument(e.to_string()))?;
    let root = doc.root_element();

    let groups: Vec<Node> = root.children().filter(Node::is_element).collect();
    let names: Vec<&str> = groups.iter().map(|g| g.tag_name().name()).collect();
    if names != GROUP_TAGS {
        return Err(ParseError::UnexpectedStructure(format!(
            "root <{}> must contain {:?}, found {:?}",
            root.tag_name().name(),
            GROUP_TAGS,
            names
        )));
    }

    let model = SceneModel {
        surfaces: read_group(groups[0])?,
        maps: read_group(groups[1])?,
        materials: read_group(groups[2])?,
        nodes: read_group(groups[3])?,
        ..SceneModel::default()
    };

    let mut seen = BTreeSet::new();
    for surface in &model.surfaces {
        if !seen.insert(surface.id.as_str()) {
            return Err(ParseError::DuplicateSurface(surface.id.clone()));
        }
    }

    tracing::debug!(
        surfaces = model.surfaces.len(),
        maps = model.maps.len(),
        materials = model.materials.len(),
        nodes = model.nodes.len(),
        "parsed scene document"
    );
    Ok(model)
}

fn read_group<R: Record>(group: Node) -> ParseResult<Vec<R>> {
    group
        .children()
        .filter(Node::is_element)
        .enumerate()
        .map(|(index, node)| R::from_element(&RecordElement::new(node, R::TAG, index)))
        .collect()
}

/// Serialize a model's descriptors into a scene document.
///
/// Buffers are not part of the document; see [`crate::container`].
pub fn write_document(model: &SceneModel) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(ContainerError::write_failed)?;
    writer
        .write_event(Event::Start(BytesStart::new(ROOT_TAG)))
        .map_err(ContainerError::write_failed)?;

    write_group(&mut writer, GROUP_TAGS[0], &model.surfaces)?;
    write_group(&mut writer, GROUP_TAGS[1], &model.maps)?;
    write_group(&mut writer, GROUP_TAGS[2], &model.materials)?;
    write_group(&mut writer, GROUP_TAGS[3], &model.nodes)?;

    writer
        .write_event(Event::End(BytesEnd::new(ROOT_TAG)))
        .map_err(ContainerError::write_failed)?;

    Ok(writer.into_inner())
}

fn write_group<R: Record>(writer: &mut Writer<Vec<u8>>, tag: &str, records: &[R]) -> Result<()> {
    if records.is_empty() {
        return writer
            .write_event(Event::Empty(BytesStart::new(tag)))
            .map_err(ContainerError::write_failed);
    }

    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(ContainerError::write_failed)?;
    for record in records {
        let attributes = record.attributes();
        let mut el = BytesStart::new(R::TAG);
        for (name, value) in &attributes {
            el.push_attribute(XmlAttribute {
                key: QName(name.as_bytes()),
                value: Cow::Owned(escape_attribute(value).into_bytes()),
            });
        }
        writer
            .write_event(Event::Empty(el))
            .map_err(ContainerError::write_failed)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(ContainerError::write_failed)
}

/// Escape an attribute value so it reads back unchanged.
///
/// Readers normalize literal tab, CR and LF in attribute values to spaces,
/// so those are written as character references.
fn escape_attribute(value: &str) -> String {
    let escaped = escape(value);
    if !escaped.contains(['\t', '\n', '\r']) {
        return escaped.into_owned();
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Attribute, MaterialDescriptor, NodeKind, SurfaceDescriptor};

    const SCENE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<scene>
  <surfaces>
    <surface id="s0" sizePerVertex="32" inputs="POSITION,NORMAL,UV0" formats="float3,float3,float2"/>
    <surface id="s1" inputs="POSITION" formats="float3"/>
  </surfaces>
  <maps>
    <map id="m0" type="diffuse" channel="0" source="tex0" uvRepeat="2,2"/>
  </maps>
  <materials/>
  <nodes>
    <!-- editor comment -->
    <node id="n0" name="Box" type="mesh" surfaces="s0,s1"/>
    <node id="n1" name="Cam" type="camera" fov="60" active="true"/>
  </nodes>
</scene>"#;

    #[test]
    fn test_parse_document() {
        let model = parse_document(SCENE.as_bytes()).unwrap();
        assert_eq!(model.surfaces.len(), 2);
        assert_eq!(model.maps.len(), 1);
        assert!(model.materials.is_empty());
        assert_eq!(model.nodes.len(), 2);
        assert!(model.buffers.is_empty());

        assert_eq!(model.surfaces[0].inputs, ["POSITION", "NORMAL", "UV0"]);
        assert_eq!(model.surfaces[1].size_per_vertex, None);
        assert_eq!(model.maps[0].channel, 0);
        assert!(matches!(model.nodes[1].kind, NodeKind::Camera(_)));
    }

    #[test]
    fn test_malformed_document() {
        let err = parse_document(b"<scene><surfaces></scene>").unwrap_err();
        assert!(matches!(err, ParseError::MalformedDocument(_)));

        let err = parse_document(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ParseError::MalformedDocument(_)));
    }

    #[test]
    fn test_wrong_group_count() {
        let err = parse_document(b"<scene><surfaces/><maps/><materials/></scene>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedStructure(_)));
    }

    #[test]
    fn test_wrong_group_order() {
        let err = parse_document(b"<scene><maps/><surfaces/><materials/><nodes/></scene>")
            .unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedStructure(_)));
    }

    #[test]
    fn test_empty_groups() {
        let model = parse_document(b"<zf3d><surfaces/><maps/><materials/><nodes/></zf3d>").unwrap();
        assert_eq!(model, SceneModel::default());
    }

    #[test]
    fn test_duplicate_surface_ids() {
        let xml = br#"<scene><surfaces>
            <surface id="a" inputs="POSITION" formats="float3"/>
            <surface id="a" inputs="NORMAL" formats="float3"/>
        </surfaces><maps/><materials/><nodes/></scene>"#;
        assert_eq!(
            parse_document(xml).unwrap_err(),
            ParseError::DuplicateSurface("a".into())
        );
    }

    #[test]
    fn test_missing_attribute_index() {
        let xml = br#"<scene><surfaces/><maps/><materials>
            <material id="0" name="a"/>
            <material id="1"/>
        </materials><nodes/></scene>"#;
        assert_eq!(
            parse_document(xml).unwrap_err(),
            ParseError::MissingAttribute { record: "material", attribute: "name", index: 1 }
        );
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(escape_attribute("plain"), "plain");
        assert_eq!(escape_attribute("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(escape_attribute("L1\r\nL2\tT"), "L1&#13;&#10;L2&#9;T");
    }

    #[test]
    fn test_whitespace_in_values_survives() {
        let mut model = SceneModel::new();
        model.materials.push(MaterialDescriptor {
            id: "m\t0".into(),
            name: "Line1\nLine2\tTab\r\n".into(),
            ..Default::default()
        });
        model.materials[0].extras.insert("notes", "  two\n\nlines  ");

        let back = parse_document(&write_document(&model).unwrap()).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn test_write_then_parse() {
        let mut model = parse_document(SCENE.as_bytes()).unwrap();
        model.surfaces.push(SurfaceDescriptor::new("s2", &[Attribute::Uv1]));
        model.materials.push(MaterialDescriptor {
            id: "mat".into(),
            name: "A & <B>".into(),
            two_sided: true,
            opacity: Some(50.0),
            diffuse: vec![0.1, 0.2, 0.3],
            ..Default::default()
        });
        model.materials[0].extras.insert("shader", "\"toon\"");

        let bytes = write_document(&model).unwrap();
        let back = parse_document(&bytes).unwrap();
        assert_eq!(back, model);
    }
}
