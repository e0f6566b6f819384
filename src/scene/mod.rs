//! Scene model for ZF3D containers.
//!
//! - [`SceneModel`] - surfaces, maps, materials, nodes and vertex buffers
//! - [`Attribute`] / [`VertexFormat`] - the closed vertex attribute table
//! - [`Extras`] - uninterpreted record attributes

mod attribute;
mod extras;
mod model;

pub use attribute::{Attribute, VertexFormat};
pub use extras::Extras;
pub use model::{
    AttributeData, CameraNode, MapDescriptor, MaterialDescriptor, MeshNode, NodeKind,
    SceneModel, SceneNode, SurfaceDescriptor, VertexBuffer,
};
