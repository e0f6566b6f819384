//! Vertex attribute kinds and their field formats.
//!
//! The attribute set is closed. Each kind maps to exactly one format, and
//! the format alone determines the field width in the interleaved stream.

use serde::Serialize;
use std::fmt;

/// Field format of one attribute in the vertex stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum VertexFormat {
    /// Two big-endian float32 values
    Float2,
    /// Three big-endian float32 values
    Float3,
}

impl VertexFormat {
    /// Number of float components.
    #[inline]
    pub const fn components(self) -> usize {
        match self {
            Self::Float2 => 2,
            Self::Float3 => 3,
        }
    }

    /// Width of the field in bytes.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        self.components() * 4
    }

    /// Name used in the `formats` list of a surface.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Float2 => "float2",
            Self::Float3 => "float3",
        }
    }

    /// Look up a format by its document name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "float2" => Some(Self::Float2),
            "float3" => Some(Self::Float3),
            _ => None,
        }
    }
}

impl fmt::Display for VertexFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-vertex data channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Attribute {
    Position,
    Normal,
    Uv0,
    Uv1,
}

/// Name and format of every attribute kind.
static ATTRIBUTE_TABLE: [(Attribute, &str, VertexFormat); 4] = [
    (Attribute::Position, "POSITION", VertexFormat::Float3),
    (Attribute::Normal, "NORMAL", VertexFormat::Float3),
    (Attribute::Uv0, "UV0", VertexFormat::Float2),
    (Attribute::Uv1, "UV1", VertexFormat::Float2),
];

impl Attribute {
    /// All attribute kinds, in table order.
    pub const ALL: [Attribute; 4] = [
        Attribute::Position,
        Attribute::Normal,
        Attribute::Uv0,
        Attribute::Uv1,
    ];

    #[inline]
    fn entry(self) -> &'static (Attribute, &'static str, VertexFormat) {
        &ATTRIBUTE_TABLE[self as usize]
    }

    /// Name used in the `inputs` list of a surface.
    #[inline]
    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// The only format this attribute is stored as.
    #[inline]
    pub fn format(self) -> VertexFormat {
        self.entry().2
    }

    /// Width of the field in bytes.
    #[inline]
    pub fn num_bytes(self) -> usize {
        self.format().num_bytes()
    }

    /// Look up an attribute by its document name.
    pub fn from_name(name: &str) -> Option<Self> {
        ATTRIBUTE_TABLE
            .iter()
            .find(|(_, n, _)| *n == name)
            .map(|(a, _, _)| *a)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_discriminants() {
        for (i, (attr, _, _)) in ATTRIBUTE_TABLE.iter().enumerate() {
            assert_eq!(*attr as usize, i);
            assert_eq!(Attribute::ALL[i], *attr);
        }
    }

    #[test]
    fn test_widths() {
        assert_eq!(Attribute::Position.num_bytes(), 12);
        assert_eq!(Attribute::Normal.num_bytes(), 12);
        assert_eq!(Attribute::Uv0.num_bytes(), 8);
        assert_eq!(Attribute::Uv1.num_bytes(), 8);
    }

    #[test]
    fn test_names() {
        for attr in Attribute::ALL {
            assert_eq!(Attribute::from_name(attr.name()), Some(attr));
        }
        assert_eq!(Attribute::from_name("TANGENT"), None);
        assert_eq!(Attribute::from_name("position"), None);
        assert_eq!(VertexFormat::from_name("float3"), Some(VertexFormat::Float3));
        assert_eq!(VertexFormat::from_name("float4"), None);
    }
}
