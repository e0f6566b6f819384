//! Interleaved vertex streams (`N.vertex`).
//!
//! ## Record Layout
//!
//! ```text
//! inputs="UV0,POSITION"  formats="float2,float3"
//!
//! +---------+---------+---------+---------+---------+
//! | UV0.u   | UV0.v   | POS.x   | POS.y   | POS.z   |  one record (stride 20)
//! +---------+---------+---------+---------+---------+
//!   f32 BE    f32 BE    f32 BE    f32 BE    f32 BE
//! ```
//!
//! Records repeat back to back with no header, so the vertex count is the
//! stream length divided by the stride.

mod decode;
mod encode;
mod layout;

pub use decode::{decode, decode_selected, decode_with_layout};
pub use encode::{encode, encode_with_layout};
pub use layout::{Field, VertexLayout, COMPONENT_SIZE};
