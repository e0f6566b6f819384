//! Utility types for the ZF3D codec.
//!
//! - [`ParseError`] / [`DecodeError`] / [`EncodeError`] / [`ContainerError`] - Error handling
//! - Math type re-exports from glam plus [`Bounds`]

mod error;
mod math;

pub use error::*;
pub use math::*;
