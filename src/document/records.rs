//! Record descriptors: one [`Record`] impl per group of the scene document.

use crate::scene::{
    CameraNode, Extras, MapDescriptor, MaterialDescriptor, MeshNode, NodeKind, SceneNode,
    SurfaceDescriptor,
};
use crate::util::{Bounds, ParseError, ParseResult};

use super::element::{join_floats, join_list, RecordElement};

/// A descriptor that maps to one element of the scene document.
pub trait Record: Sized {
    /// Element tag used when writing.
    const TAG: &'static str;

    /// Parse from an element's attributes.
    fn from_element(el: &RecordElement<'_, '_>) -> ParseResult<Self>;

    /// Attributes to write, interpreted fields first, then extras.
    fn attributes(&self) -> Vec<(&str, String)>;
}

const SURFACE_ATTRS: &[&str] = &["id", "sizePerVertex", "inputs", "formats"];
const MAP_ATTRS: &[&str] = &["id", "type", "channel", "source", "uvOffset", "uvRepeat"];
const MATERIAL_ATTRS: &[&str] = &["id", "name", "twoSided", "opacity", "diffuse", "specular"];
const NODE_ATTRS: &[&str] = &["id", "name", "type", "transform"];
const MESH_ATTRS: &[&str] = &["surfaces", "materials", "min", "max", "center", "radius"];
const CAMERA_ATTRS: &[&str] = &["fov", "near", "far", "active"];
const BOUNDS_ATTRS: [&str; 4] = ["min", "max", "center", "radius"];
const NO_ATTRS: &[&str] = &[];

fn push_extras<'a>(out: &mut Vec<(&'a str, String)>, extras: &'a Extras) {
    out.extend(extras.iter().map(|(n, v)| (n, v.to_string())));
}

impl Record for SurfaceDescriptor {
    const TAG: &'static str = "surface";

    fn from_element(el: &RecordElement<'_, '_>) -> ParseResult<Self> {
        let id = el.required("id")?.to_string();
        let inputs = el.list("inputs")?;
        let formats = el.list("formats")?;
        if inputs.len() != formats.len() {
            return Err(ParseError::UnexpectedStructure(format!(
                "surface '{}' declares {} inputs but {} formats",
                id,
                inputs.len(),
                formats.len()
            )));
        }
        Ok(Self {
            id,
            size_per_vertex: el.u32("sizePerVertex")?,
            inputs,
            formats,
            extras: el.extras(SURFACE_ATTRS),
        })
    }

    fn attributes(&self) -> Vec<(&str, String)> {
        let mut out = vec![("id", self.id.clone())];
        if let Some(size) = self.size_per_vertex {
            out.push(("sizePerVertex", size.to_string()));
        }
        out.push(("inputs", join_list(&self.inputs)));
        out.push(("formats", join_list(&self.formats)));
        push_extras(&mut out, &self.extras);
        out
    }
}

impl Record for MapDescriptor {
    const TAG: &'static str = "map";

    fn from_element(el: &RecordElement<'_, '_>) -> ParseResult<Self> {
        Ok(Self {
            id: el.required("id")?.to_string(),
            kind: el.required("type")?.to_string(),
            channel: el.u32("channel")?.ok_or_else(|| el.missing("channel"))?,
            source: el.required("source")?.to_string(),
            uv_offset: el.vec2("uvOffset")?,
            uv_repeat: el.vec2("uvRepeat")?,
            extras: el.extras(MAP_ATTRS),
        })
    }

    fn attributes(&self) -> Vec<(&str, String)> {
        let mut out = vec![
            ("id", self.id.clone()),
            ("type", self.kind.clone()),
            ("channel", self.channel.to_string()),
            ("source", self.source.clone()),
        ];
        if let Some(uv) = self.uv_offset {
            out.push(("uvOffset", join_floats(&uv.to_array())));
        }
        if let Some(uv) = self.uv_repeat {
            out.push(("uvRepeat", join_floats(&uv.to_array())));
        }
        push_extras(&mut out, &self.extras);
        out
    }
}

impl Record for MaterialDescriptor {
    const TAG: &'static str = "material";

    fn from_element(el: &RecordElement<'_, '_>) -> ParseResult<Self> {
        Ok(Self {
            id: el.required("id")?.to_string(),
            name: el.required("name")?.to_string(),
            two_sided: el.flag("twoSided"),
            opacity: el.f32("opacity")?,
            diffuse: el.floats("diffuse")?,
            specular: el.floats("specular")?,
            extras: el.extras(MATERIAL_ATTRS),
        })
    }

    fn attributes(&self) -> Vec<(&str, String)> {
        let mut out = vec![
            ("id", self.id.clone()),
            ("name", self.name.clone()),
            ("twoSided", self.two_sided.to_string()),
        ];
        if let Some(opacity) = self.opacity {
            out.push(("opacity", opacity.to_string()));
        }
        if !self.diffuse.is_empty() {
            out.push(("diffuse", join_floats(&self.diffuse)));
        }
        if !self.specular.is_empty() {
            out.push(("specular", join_floats(&self.specular)));
        }
        push_extras(&mut out, &self.extras);
        out
    }
}

/// Bounds are all-or-nothing: any one part requires the other three.
fn read_bounds(el: &RecordElement<'_, '_>) -> ParseResult<Option<Bounds>> {
    if !BOUNDS_ATTRS.iter().any(|a| el.optional(a).is_some()) {
        return Ok(None);
    }
    Ok(Some(Bounds::new(
        el.vec3("min")?.ok_or_else(|| el.missing("min"))?,
        el.vec3("max")?.ok_or_else(|| el.missing("max"))?,
        el.vec3("center")?.ok_or_else(|| el.missing("center"))?,
        el.f32("radius")?.ok_or_else(|| el.missing("radius"))?,
    )))
}

impl Record for SceneNode {
    const TAG: &'static str = "node";

    fn from_element(el: &RecordElement<'_, '_>) -> ParseResult<Self> {
        let id = el.required("id")?.to_string();
        let name = el.required("name")?.to_string();
        let tag = el.optional("type").unwrap_or_else(|| el.tag());

        let (kind, kind_attrs): (NodeKind, &[&str]) = match tag {
            NodeKind::MESH_TAG => (
                NodeKind::Mesh(MeshNode {
                    surfaces: el.optional_list("surfaces"),
                    materials: el.optional_list("materials"),
                    bounds: read_bounds(el)?,
                }),
                MESH_ATTRS,
            ),
            NodeKind::CAMERA_TAG => (
                NodeKind::Camera(CameraNode {
                    fov: el.f32("fov")?,
                    near: el.f32("near")?,
                    far: el.f32("far")?,
                    active: el.flag("active"),
                }),
                CAMERA_ATTRS,
            ),
            other => (NodeKind::Other(other.to_string()), NO_ATTRS),
        };

        let known: Vec<&str> = NODE_ATTRS.iter().chain(kind_attrs).copied().collect();
        Ok(Self {
            id,
            name,
            kind,
            transform: el.mat4("transform")?,
            extras: el.extras(&known),
        })
    }

    fn attributes(&self) -> Vec<(&str, String)> {
        let mut out = vec![
            ("id", self.id.clone()),
            ("name", self.name.clone()),
            ("type", self.kind.tag().to_string()),
        ];
        match &self.kind {
            NodeKind::Mesh(mesh) => {
                if !mesh.surfaces.is_empty() {
                    out.push(("surfaces", join_list(&mesh.surfaces)));
                }
                if !mesh.materials.is_empty() {
                    out.push(("materials", join_list(&mesh.materials)));
                }
                if let Some(b) = &mesh.bounds {
                    out.push(("min", join_floats(&b.min.to_array())));
                    out.push(("max", join_floats(&b.max.to_array())));
                    out.push(("center", join_floats(&b.center.to_array())));
                    out.push(("radius", b.radius.to_string()));
                }
            }
            NodeKind::Camera(camera) => {
                let fields = [("fov", camera.fov), ("near", camera.near), ("far", camera.far)];
                for (name, value) in fields {
                    if let Some(v) = value {
                        out.push((name, v.to_string()));
                    }
                }
                out.push(("active", camera.active.to_string()));
            }
            NodeKind::Other(_) => {}
        }
        if let Some(m) = &self.transform {
            out.push(("transform", join_floats(&m.to_cols_array())));
        }
        push_extras(&mut out, &self.extras);
        out
    }
}
