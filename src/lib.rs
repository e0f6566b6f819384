//! # ZF3D
//!
//! Reader and writer for ZF3D 3D model containers: a zip archive with an
//! XML scene description (`main.xml`) and one interleaved big-endian
//! vertex stream per surface (`0.vertex`, `1.vertex`, ...).
//!
//! ## Modules
//!
//! - [`util`] - Errors and math types
//! - [`scene`] - Scene model (surfaces, maps, materials, nodes, buffers)
//! - [`document`] - `main.xml` parsing and writing
//! - [`vertex`] - Vertex stream layout, decoding and encoding
//! - [`container`] - Zip container reading and writing
//!
//! ## Example
//!
//! ```ignore
//! use zf3d::prelude::*;
//!
//! let model = read_container("model.zf3d")?.into_complete()?;
//! for surface in &model.surfaces {
//!     let buffer = model.buffer(&surface.id).unwrap();
//!     println!("{}: {} vertices", surface.id, buffer.vertex_count());
//! }
//! ```

pub mod util;
pub mod scene;
pub mod document;
pub mod vertex;
pub mod container;

// Re-export commonly used types
pub use util::{ContainerError, DecodeError, EncodeError, ParseError, Result};
pub use scene::{Attribute, SceneModel, SurfaceDescriptor, VertexBuffer, VertexFormat};
pub use container::{read_container, write_container, ContainerRead, ReadOptions, WriteOptions};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Bounds, ContainerError, DecodeError, EncodeError, ParseError, Result};
    pub use crate::util::{Mat4, Vec2, Vec3};
    pub use crate::scene::*;
    pub use crate::document::{parse_document, write_document};
    pub use crate::vertex::{decode, decode_selected, encode};
    pub use crate::container::{
        read_container, read_container_bytes, read_container_opts, write_container,
        write_container_opts, write_container_to, ContainerRead, ReadOptions, SurfaceReport,
        WriteOptions,
    };
}
