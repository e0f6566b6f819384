//! Scene model shared by the container reader and writer.
//!
//! Records refer to each other by id only. The codec never follows those
//! references; resolving them is left to the host.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{Attribute, Extras, VertexFormat};
use crate::util::{Bounds, Mat4, Vec2, Vec3};

/// Surface record: a named, interleaved vertex layout.
///
/// `inputs` and `formats` are kept as written in the document; they are
/// resolved against the closed attribute set when the stream is decoded.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SurfaceDescriptor {
    pub id: String,
    /// Declared record size, if the document carries one.
    pub size_per_vertex: Option<u32>,
    /// Attribute names in interleave order.
    pub inputs: Vec<String>,
    /// Format names, positionally aligned with `inputs`.
    pub formats: Vec<String>,
    pub extras: Extras,
}

impl SurfaceDescriptor {
    /// Build a descriptor from a list of attributes, in interleave order.
    pub fn new(id: impl Into<String>, attributes: &[Attribute]) -> Self {
        let stride: usize = attributes.iter().map(|a| a.num_bytes()).sum();
        Self {
            id: id.into(),
            size_per_vertex: u32::try_from(stride).ok(),
            inputs: attributes.iter().map(|a| a.name().to_string()).collect(),
            formats: attributes.iter().map(|a| a.format().name().to_string()).collect(),
            extras: Extras::new(),
        }
    }
}

/// Texture map record.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MapDescriptor {
    pub id: String,
    /// Map type tag (`type` attribute), e.g. diffuse or normal.
    pub kind: String,
    pub channel: u32,
    /// Id of the texture resource this map samples.
    pub source: String,
    pub uv_offset: Option<Vec2>,
    pub uv_repeat: Option<Vec2>,
    pub extras: Extras,
}

/// Material record.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MaterialDescriptor {
    pub id: String,
    pub name: String,
    pub two_sided: bool,
    /// Opacity in percent (0-100).
    pub opacity: Option<f32>,
    /// Diffuse color components as stored (RGB or RGBA).
    pub diffuse: Vec<f32>,
    /// Specular color components as stored.
    pub specular: Vec<f32>,
    pub extras: Extras,
}

/// Mesh-specific node data.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MeshNode {
    /// Surface ids drawn by this mesh.
    pub surfaces: Vec<String>,
    /// Material ids, one per surface when present.
    pub materials: Vec<String>,
    pub bounds: Option<Bounds>,
}

/// Camera-specific node data.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CameraNode {
    /// Field of view in degrees.
    pub fov: Option<f32>,
    pub near: Option<f32>,
    pub far: Option<f32>,
    pub active: bool,
}

/// Node kind and its kind-specific fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum NodeKind {
    Mesh(MeshNode),
    Camera(CameraNode),
    /// Any other node type, kept by its tag.
    Other(String),
}

impl NodeKind {
    /// Mesh kind tag in the document.
    pub const MESH_TAG: &'static str = "mesh";

    /// Camera kind tag in the document.
    pub const CAMERA_TAG: &'static str = "camera";

    /// Kind tag as written in the document.
    pub fn tag(&self) -> &str {
        match self {
            Self::Mesh(_) => Self::MESH_TAG,
            Self::Camera(_) => Self::CAMERA_TAG,
            Self::Other(tag) => tag,
        }
    }

    /// Mesh data, if this is a mesh.
    pub fn as_mesh(&self) -> Option<&MeshNode> {
        match self {
            Self::Mesh(m) => Some(m),
            _ => None,
        }
    }

    /// Camera data, if this is a camera.
    pub fn as_camera(&self) -> Option<&CameraNode> {
        match self {
            Self::Camera(c) => Some(c),
            _ => None,
        }
    }
}

/// Scene graph node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    /// Local transform, column-major.
    pub transform: Option<Mat4>,
    pub extras: Extras,
}

/// Decoded values of one attribute channel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum AttributeData {
    Float2(Vec<Vec2>),
    Float3(Vec<Vec3>),
}

impl AttributeData {
    /// Create an empty channel for a format.
    pub fn with_capacity(format: VertexFormat, capacity: usize) -> Self {
        match format {
            VertexFormat::Float2 => Self::Float2(Vec::with_capacity(capacity)),
            VertexFormat::Float3 => Self::Float3(Vec::with_capacity(capacity)),
        }
    }

    /// Format of the stored tuples.
    pub fn format(&self) -> VertexFormat {
        match self {
            Self::Float2(_) => VertexFormat::Float2,
            Self::Float3(_) => VertexFormat::Float3,
        }
    }

    /// Number of stored tuples.
    pub fn len(&self) -> usize {
        match self {
            Self::Float2(v) => v.len(),
            Self::Float3(v) => v.len(),
        }
    }

    /// Check if no tuples are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Components of tuple `index`, or `None` if out of range.
    pub fn components(&self, index: usize) -> Option<Vec<f32>> {
        match self {
            Self::Float2(v) => v.get(index).map(|t| t.to_array().to_vec()),
            Self::Float3(v) => v.get(index).map(|t| t.to_array().to_vec()),
        }
    }
}

impl From<Vec<Vec2>> for AttributeData {
    fn from(v: Vec<Vec2>) -> Self {
        Self::Float2(v)
    }
}

impl From<Vec<Vec3>> for AttributeData {
    fn from(v: Vec<Vec3>) -> Self {
        Self::Float3(v)
    }
}

/// Geometry of one surface: one channel per retained attribute.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VertexBuffer {
    vertex_count: usize,
    channels: BTreeMap<Attribute, AttributeData>,
}

impl VertexBuffer {
    /// Create an empty buffer for `vertex_count` vertices.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            channels: BTreeMap::new(),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, attribute: Attribute, data: impl Into<AttributeData>) -> Self {
        self.insert(attribute, data);
        self
    }

    /// Store a channel, replacing any previous data for that attribute.
    pub fn insert(&mut self, attribute: Attribute, data: impl Into<AttributeData>) {
        self.channels.insert(attribute, data.into());
    }

    /// Number of vertices in the surface stream.
    ///
    /// Valid even when no channel was retained.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Channel data for an attribute.
    pub fn get(&self, attribute: Attribute) -> Option<&AttributeData> {
        self.channels.get(&attribute)
    }

    /// Check if an attribute was retained.
    pub fn contains(&self, attribute: Attribute) -> bool {
        self.channels.contains_key(&attribute)
    }

    /// Retained attributes with their data.
    pub fn channels(&self) -> impl Iterator<Item = (Attribute, &AttributeData)> {
        self.channels.iter().map(|(a, d)| (*a, d))
    }

    /// Vertex positions.
    pub fn positions(&self) -> Option<&[Vec3]> {
        self.float3(Attribute::Position)
    }

    /// Vertex normals.
    pub fn normals(&self) -> Option<&[Vec3]> {
        self.float3(Attribute::Normal)
    }

    /// Texture coordinates for UV channel 0 or 1.
    pub fn uv(&self, channel: usize) -> Option<&[Vec2]> {
        let attribute = match channel {
            0 => Attribute::Uv0,
            1 => Attribute::Uv1,
            _ => return None,
        };
        match self.channels.get(&attribute)? {
            AttributeData::Float2(v) => Some(v),
            AttributeData::Float3(_) => None,
        }
    }

    fn float3(&self, attribute: Attribute) -> Option<&[Vec3]> {
        match self.channels.get(&attribute)? {
            AttributeData::Float3(v) => Some(v),
            AttributeData::Float2(_) => None,
        }
    }
}

/// Complete decoded scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SceneModel {
    pub surfaces: Vec<SurfaceDescriptor>,
    pub maps: Vec<MapDescriptor>,
    pub materials: Vec<MaterialDescriptor>,
    pub nodes: Vec<SceneNode>,
    /// Vertex buffers keyed by surface id.
    pub buffers: BTreeMap<String, VertexBuffer>,
}

impl SceneModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a surface by id.
    pub fn surface(&self, id: &str) -> Option<&SurfaceDescriptor> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    /// Find a map by id.
    pub fn map(&self, id: &str) -> Option<&MapDescriptor> {
        self.maps.iter().find(|m| m.id == id)
    }

    /// Find a material by id.
    pub fn material(&self, id: &str) -> Option<&MaterialDescriptor> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Find a node by id.
    pub fn node(&self, id: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Vertex buffer of a surface.
    pub fn buffer(&self, surface_id: &str) -> Option<&VertexBuffer> {
        self.buffers.get(surface_id)
    }

    /// Surface ids referenced by at least one mesh node.
    pub fn referenced_surfaces(&self) -> BTreeSet<&str> {
        self.nodes
            .iter()
            .filter_map(|n| n.kind.as_mesh())
            .flat_map(|m| m.surfaces.iter().map(String::as_str))
            .collect()
    }

    /// Total vertices across all decoded buffers.
    pub fn total_vertices(&self) -> usize {
        self.buffers.values().map(|b| b.vertex_count()).sum()
    }
}
