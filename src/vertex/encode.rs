//! Vertex stream encoding, the inverse of [`super::decode`].

use byteorder::{BigEndian, ByteOrder};

use super::layout::{VertexLayout, COMPONENT_SIZE};
use crate::scene::{AttributeData, SurfaceDescriptor, VertexBuffer};
use crate::util::{DecodeError, EncodeError, EncodeResult};

/// Interleave a buffer into a big-endian stream following the surface's
/// declared attribute order.
///
/// Every declared attribute must be present in the buffer with exactly
/// `vertex_count` elements.
pub fn encode(surface: &SurfaceDescriptor, buffer: &VertexBuffer) -> EncodeResult<Vec<u8>> {
    let layout = VertexLayout::from_surface(surface)?;
    encode_with_layout(&layout, buffer)
}

/// Encode a buffer against an already resolved layout.
pub fn encode_with_layout(layout: &VertexLayout, buffer: &VertexBuffer) -> EncodeResult<Vec<u8>> {
    let count = buffer.vertex_count();

    let mut sources = Vec::with_capacity(layout.fields().len());
    for field in layout.fields() {
        let name = field.attribute.name();
        let data = buffer
            .get(field.attribute)
            .ok_or(EncodeError::MissingAttribute(name))?;
        if data.len() != count {
            return Err(EncodeError::LengthMismatch {
                attribute: name,
                expected: count,
                actual: data.len(),
            });
        }
        if data.format() != field.attribute.format() {
            return Err(EncodeError::Layout(DecodeError::FormatMismatch {
                attribute: name,
                format: data.format().name().to_string(),
            }));
        }
        sources.push((field.offset, data));
    }

    let mut stream = vec![0u8; count * layout.stride()];
    for (index, record) in stream.chunks_exact_mut(layout.stride()).enumerate() {
        for (offset, data) in &sources {
            let field = &mut record[*offset..];
            match data {
                AttributeData::Float2(v) => write_floats(field, &v[index].to_array()),
                AttributeData::Float3(v) => write_floats(field, &v[index].to_array()),
            }
        }
    }

    tracing::trace!(vertices = count, bytes = stream.len(), "encoded vertex stream");
    Ok(stream)
}

#[inline]
fn write_floats(field: &mut [u8], values: &[f32]) {
    for (i, &v) in values.iter().enumerate() {
        BigEndian::write_f32(&mut field[i * COMPONENT_SIZE..], v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Attribute;
    use crate::util::{Vec2, Vec3};
    use crate::vertex::decode;

    #[test]
    fn test_encode_layout() {
        let s = SurfaceDescriptor::new("s", &[Attribute::Uv0, Attribute::Position]);
        let buf = VertexBuffer::new(1)
            .with(Attribute::Position, vec![Vec3::new(1.0, 2.0, 3.0)])
            .with(Attribute::Uv0, vec![Vec2::new(0.5, 0.25)]);

        let stream = encode(&s, &buf).unwrap();
        let expected: Vec<u8> = [0.5f32, 0.25, 1.0, 2.0, 3.0]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect();
        assert_eq!(stream, expected);
        assert_eq!(decode(&s, &stream).unwrap(), buf);
    }

    #[test]
    fn test_missing_attribute() {
        let s = SurfaceDescriptor::new("s", &[Attribute::Position, Attribute::Normal]);
        let buf = VertexBuffer::new(1).with(Attribute::Position, vec![Vec3::ZERO]);
        assert_eq!(encode(&s, &buf), Err(EncodeError::MissingAttribute("NORMAL")));
    }

    #[test]
    fn test_length_mismatch() {
        let s = SurfaceDescriptor::new("s", &[Attribute::Position, Attribute::Uv0]);
        let buf = VertexBuffer::new(2)
            .with(Attribute::Position, vec![Vec3::ZERO, Vec3::ONE])
            .with(Attribute::Uv0, vec![Vec2::ZERO]);
        assert_eq!(
            encode(&s, &buf),
            Err(EncodeError::LengthMismatch { attribute: "UV0", expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_wrong_channel_format() {
        let s = SurfaceDescriptor::new("s", &[Attribute::Uv0]);
        let buf = VertexBuffer::new(1).with(Attribute::Uv0, vec![Vec3::ZERO]);
        assert!(matches!(encode(&s, &buf), Err(EncodeError::Layout(_))));
    }

    #[test]
    fn test_extra_channels_ignored() {
        let s = SurfaceDescriptor::new("s", &[Attribute::Position]);
        let buf = VertexBuffer::new(1)
            .with(Attribute::Position, vec![Vec3::X])
            .with(Attribute::Normal, vec![Vec3::Y]);
        assert_eq!(encode(&s, &buf).unwrap().len(), 12);
    }
}
