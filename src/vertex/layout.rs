//! Interleaved vertex record layout resolved from a surface descriptor.

use smallvec::SmallVec;

use crate::scene::{Attribute, SurfaceDescriptor, VertexFormat};
use crate::util::{DecodeError, DecodeResult};

/// Size of one stored float component.
pub const COMPONENT_SIZE: usize = 4;

/// One field of a vertex record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub attribute: Attribute,
    /// Byte offset within the record.
    pub offset: usize,
}

impl Field {
    /// Width of this field in bytes.
    #[inline]
    pub fn num_bytes(&self) -> usize {
        self.attribute.num_bytes()
    }
}

/// Resolved record layout: fields in interleave order plus total stride.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    fields: SmallVec<[Field; 4]>,
    stride: usize,
}

impl VertexLayout {
    /// Build a layout from attributes in interleave order.
    pub fn new(attributes: &[Attribute]) -> DecodeResult<Self> {
        if attributes.is_empty() {
            return Err(DecodeError::EmptyLayout);
        }
        let mut fields = SmallVec::new();
        let mut offset = 0;
        for &attribute in attributes {
            fields.push(Field { attribute, offset });
            offset += attribute.num_bytes();
        }
        Ok(Self { fields, stride: offset })
    }

    /// Resolve a surface's `inputs`/`formats` against the attribute table.
    ///
    /// Every input must be a known attribute stored in its own format. If the
    /// surface declares `sizePerVertex`, it must equal the stride counted
    /// either in bytes or in float components.
    pub fn from_surface(surface: &SurfaceDescriptor) -> DecodeResult<Self> {
        if surface.inputs.len() != surface.formats.len() {
            return Err(DecodeError::MisalignedFormats {
                inputs: surface.inputs.len(),
                formats: surface.formats.len(),
            });
        }

        let mut attributes: SmallVec<[Attribute; 4]> = SmallVec::new();
        for (input, format) in surface.inputs.iter().zip(&surface.formats) {
            let attribute = Attribute::from_name(input)
                .ok_or_else(|| DecodeError::UnknownAttribute(input.clone()))?;
            let format = VertexFormat::from_name(format)
                .ok_or_else(|| DecodeError::UnknownFormat(format.clone()))?;
            if attribute.format() != format {
                return Err(DecodeError::FormatMismatch {
                    attribute: attribute.name(),
                    format: format.name().to_string(),
                });
            }
            attributes.push(attribute);
        }

        let layout = Self::new(&attributes)?;
        if let Some(declared) = surface.size_per_vertex {
            let declared_size = declared as usize;
            if declared_size != layout.stride && declared_size != layout.stride / COMPONENT_SIZE {
                return Err(DecodeError::StrideMismatch {
                    declared,
                    stride: layout.stride,
                });
            }
        }
        Ok(layout)
    }

    /// Fields in interleave order.
    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Bytes per vertex record.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of whole records in a stream, or `TruncatedStream` if the
    /// stream does not end on a record boundary.
    pub fn vertex_count(&self, stream_len: usize) -> DecodeResult<usize> {
        if stream_len % self.stride != 0 {
            return Err(DecodeError::TruncatedStream {
                len: stream_len,
                stride: self.stride,
            });
        }
        Ok(stream_len / self.stride)
    }

    /// Check if the layout contains an attribute.
    pub fn contains(&self, attribute: Attribute) -> bool {
        self.fields.iter().any(|f| f.attribute == attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(inputs: &str, formats: &str, size: Option<u32>) -> SurfaceDescriptor {
        SurfaceDescriptor {
            id: "s".into(),
            size_per_vertex: size,
            inputs: crate::document::split_list(inputs),
            formats: crate::document::split_list(formats),
            ..Default::default()
        }
    }

    #[test]
    fn test_stride_and_offsets() {
        let layout = VertexLayout::from_surface(&surface(
            "POSITION,NORMAL,UV0,UV1",
            "float3,float3,float2,float2",
            None,
        ))
        .unwrap();
        assert_eq!(layout.stride(), 40);
        let offsets: Vec<usize> = layout.fields().iter().map(|f| f.offset).collect();
        assert_eq!(offsets, [0, 12, 24, 32]);
    }

    #[test]
    fn test_size_per_vertex_units() {
        let bytes = surface("POSITION,UV0", "float3,float2", Some(20));
        let floats = surface("POSITION,UV0", "float3,float2", Some(5));
        let wrong = surface("POSITION,UV0", "float3,float2", Some(24));

        assert!(VertexLayout::from_surface(&bytes).is_ok());
        assert!(VertexLayout::from_surface(&floats).is_ok());
        assert_eq!(
            VertexLayout::from_surface(&wrong),
            Err(DecodeError::StrideMismatch { declared: 24, stride: 20 })
        );
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(
            VertexLayout::from_surface(&surface("POSITION,TANGENT", "float3,float3", None)),
            Err(DecodeError::UnknownAttribute("TANGENT".into()))
        );
        assert_eq!(
            VertexLayout::from_surface(&surface("POSITION", "float4", None)),
            Err(DecodeError::UnknownFormat("float4".into()))
        );
    }

    #[test]
    fn test_format_mismatch() {
        assert!(matches!(
            VertexLayout::from_surface(&surface("UV0", "float3", None)),
            Err(DecodeError::FormatMismatch { attribute: "UV0", .. })
        ));
    }

    #[test]
    fn test_misaligned_formats() {
        let mut s = surface("POSITION", "float3", None);
        s.formats.push("float2".into());
        assert_eq!(
            VertexLayout::from_surface(&s),
            Err(DecodeError::MisalignedFormats { inputs: 1, formats: 2 })
        );
    }

    #[test]
    fn test_empty_layout() {
        assert_eq!(
            VertexLayout::from_surface(&surface("", "", None)),
            Err(DecodeError::EmptyLayout)
        );
    }

    #[test]
    fn test_vertex_count() {
        let layout = VertexLayout::new(&[Attribute::Position, Attribute::Uv0]).unwrap();
        assert_eq!(layout.vertex_count(60), Ok(3));
        assert_eq!(layout.vertex_count(0), Ok(0));
        assert_eq!(
            layout.vertex_count(61),
            Err(DecodeError::TruncatedStream { len: 61, stride: 20 })
        );
    }
}
