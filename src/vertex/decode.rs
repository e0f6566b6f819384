//! Vertex stream decoding.

use byteorder::{BigEndian, ByteOrder};

use super::layout::{VertexLayout, COMPONENT_SIZE};
use crate::scene::{Attribute, AttributeData, SurfaceDescriptor, VertexBuffer};
use crate::util::{DecodeResult, Vec2, Vec3};

/// Decode a surface's stream, retaining every attribute it declares.
pub fn decode(surface: &SurfaceDescriptor, stream: &[u8]) -> DecodeResult<VertexBuffer> {
    decode_selected(surface, stream, &Attribute::ALL)
}

/// Decode a surface's stream, retaining only attributes in `retain`.
///
/// Attributes outside `retain` are still stepped over, so the remaining
/// fields stay aligned. Fails without a partial result if the layout is
/// invalid or the stream does not end on a record boundary.
pub fn decode_selected(
    surface: &SurfaceDescriptor,
    stream: &[u8],
    retain: &[Attribute],
) -> DecodeResult<VertexBuffer> {
    let layout = VertexLayout::from_surface(surface)?;
    decode_with_layout(&layout, stream, retain)
}

/// Decode a stream against an already resolved layout.
pub fn decode_with_layout(
    layout: &VertexLayout,
    stream: &[u8],
    retain: &[Attribute],
) -> DecodeResult<VertexBuffer> {
    let count = layout.vertex_count(stream.len())?;

    // (field offset, output channel) for each retained field, in record order.
    let mut outputs: Vec<(usize, Attribute, AttributeData)> = layout
        .fields()
        .iter()
        .filter(|f| retain.contains(&f.attribute))
        .map(|f| {
            (
                f.offset,
                f.attribute,
                AttributeData::with_capacity(f.attribute.format(), count),
            )
        })
        .collect();

    if !outputs.is_empty() {
        for record in stream.chunks_exact(layout.stride()) {
            for (offset, _, data) in &mut outputs {
                let field = &record[*offset..];
                match data {
                    AttributeData::Float2(v) => v.push(read_vec2(field)),
                    AttributeData::Float3(v) => v.push(read_vec3(field)),
                }
            }
        }
    }

    tracing::trace!(
        vertices = count,
        stride = layout.stride(),
        retained = outputs.len(),
        "decoded vertex stream"
    );

    let mut buffer = VertexBuffer::new(count);
    for (_, attribute, data) in outputs {
        buffer.insert(attribute, data);
    }
    Ok(buffer)
}

#[inline]
fn read_vec2(field: &[u8]) -> Vec2 {
    Vec2::new(
        BigEndian::read_f32(field),
        BigEndian::read_f32(&field[COMPONENT_SIZE..]),
    )
}

#[inline]
fn read_vec3(field: &[u8]) -> Vec3 {
    Vec3::new(
        BigEndian::read_f32(field),
        BigEndian::read_f32(&field[COMPONENT_SIZE..]),
        BigEndian::read_f32(&field[2 * COMPONENT_SIZE..]),
    )
}
