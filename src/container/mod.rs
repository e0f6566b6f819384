//! ZF3D containers: a zip archive holding `main.xml` and one
//! `<index>.vertex` stream per surface.
//!
//! ## Reading
//!
//! ```ignore
//! use zf3d::container::{read_container, ReadOptions};
//!
//! let read = read_container("model.zf3d")?;
//! for report in read.failures() {
//!     eprintln!("{}: {:?}", report.id, report.outcome);
//! }
//! let model = read.into_complete()?;
//! ```
//!
//! Each surface's stream is decoded on its own: a bad stream fails that
//! surface only, while a missing or unreadable `main.xml` fails the whole
//! container.

mod format;
mod reader;
mod source;
mod writer;

pub use format::{
    vertex_entry_index, vertex_entry_name, CONTAINER_EXTENSION, SCENE_ENTRY, VERTEX_EXTENSION,
};
pub use reader::{
    is_container, read_container, read_container_bytes, read_container_from, read_container_opts,
    ContainerRead, ReadOptions, SurfaceError, SurfaceReport,
};
pub use source::ContainerSource;
pub use writer::{write_container, write_container_opts, write_container_to, WriteOptions};
