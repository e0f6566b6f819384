//! Error types for the ZF3D codec.
//!
//! Each stage has its own enum so a caller can tell "this is not a ZF3D
//! file" apart from "this ZF3D file references geometry that is missing".

use thiserror::Error;

/// Errors raised while parsing the scene document (`main.xml`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Document is not well-formed markup (or not UTF-8)
    #[error("Malformed scene document: {0}")]
    MalformedDocument(String),

    /// Root does not hold the expected groups, or a list is inconsistent
    #[error("Unexpected document structure: {0}")]
    UnexpectedStructure(String),

    /// A required attribute is absent on a record
    #[error("{record} #{index} is missing required attribute '{attribute}'")]
    MissingAttribute {
        record: &'static str,
        attribute: &'static str,
        index: usize,
    },

    /// An attribute is present but its value cannot be interpreted
    #[error("{record} attribute '{attribute}' has invalid value '{value}'")]
    InvalidValue {
        record: &'static str,
        attribute: &'static str,
        value: String,
    },

    /// Two surfaces declare the same id
    #[error("Duplicate surface id: {0}")]
    DuplicateSurface(String),
}

/// Errors raised while decoding a vertex stream (or resolving its layout).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Stream length is not a multiple of the vertex stride
    #[error("Truncated vertex stream: {len} bytes is not a multiple of stride {stride}")]
    TruncatedStream { len: usize, stride: usize },

    /// Attribute name outside POSITION/NORMAL/UV0/UV1
    #[error("Unknown vertex attribute: {0}")]
    UnknownAttribute(String),

    /// Format name outside float2/float3
    #[error("Unknown vertex format: {0}")]
    UnknownFormat(String),

    /// Declared format does not match the attribute's field width
    #[error("Attribute {attribute} cannot be stored as {format}")]
    FormatMismatch {
        attribute: &'static str,
        format: String,
    },

    /// Declared sizePerVertex disagrees with the stride derived from inputs
    #[error("Stride mismatch: sizePerVertex={declared}, inputs give {stride} bytes")]
    StrideMismatch { declared: u32, stride: usize },

    /// `inputs` and `formats` differ in length
    #[error("Surface declares {inputs} inputs but {formats} formats")]
    MisalignedFormats { inputs: usize, formats: usize },

    /// Surface declares no attributes at all
    #[error("Surface declares no vertex attributes")]
    EmptyLayout,
}

/// Errors raised while encoding a vertex buffer back into a stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// Surface layout itself is invalid
    #[error(transparent)]
    Layout(#[from] DecodeError),

    /// Buffer lacks an attribute the surface declares
    #[error("Vertex buffer has no data for {0}")]
    MissingAttribute(&'static str),

    /// Attribute sequences disagree on vertex count
    #[error("Attribute {attribute} has {actual} elements, expected {expected}")]
    LengthMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Model has no vertex buffer for a declared surface
    #[error("No vertex buffer for surface '{0}'")]
    MissingBuffer(String),
}

/// Errors raised by the container reader and writer.
#[derive(Error, Debug)]
pub enum ContainerError {
    /// Input is not a zip archive
    #[error("Not a ZF3D container: {0}")]
    NotAContainer(String),

    /// Archive has no `main.xml`
    #[error("Container has no main.xml scene document")]
    MissingScene,

    /// Surface referenced by a node has no vertex stream entry
    #[error("Surface '{surface}' has no vertex stream '{entry}'")]
    MissingVertexStream { surface: String, entry: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Scene document failed to parse
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Entry exists but cannot be extracted
    #[error("Corrupt entry '{entry}': {reason}")]
    CorruptEntry { entry: String, reason: String },

    /// Surface stream failed to decode
    #[error("Surface '{surface}': {source}")]
    Surface {
        surface: String,
        #[source]
        source: DecodeError,
    },

    /// Surface buffer failed to encode
    #[error("Surface '{surface}': {source}")]
    Encode {
        surface: String,
        #[source]
        source: EncodeError,
    },

    /// Archive or document could not be written
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

impl ContainerError {
    /// Create a write failure from any displayable error.
    pub fn write_failed(err: impl std::fmt::Display) -> Self {
        Self::WriteFailed(err.to_string())
    }

    /// Create a corrupt-entry error.
    pub fn corrupt(entry: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::CorruptEntry {
            entry: entry.into(),
            reason: err.to_string(),
        }
    }
}

/// Result alias for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;

/// Result alias for scene-document parsing.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result alias for vertex-stream decoding.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Result alias for vertex-stream encoding.
pub type EncodeResult<T> = std::result::Result<T, EncodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = DecodeError::TruncatedStream { len: 61, stride: 20 };
        assert!(e.to_string().contains("61"));
        assert!(e.to_string().contains("20"));

        let e = ParseError::MissingAttribute {
            record: "surface",
            attribute: "inputs",
            index: 2,
        };
        assert!(e.to_string().contains("inputs"));
        assert!(e.to_string().contains("#2"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: ContainerError = io_err.into();
        assert!(matches!(err, ContainerError::Io(_)));
    }

    #[test]
    fn test_encode_wraps_layout() {
        let err: EncodeError = DecodeError::EmptyLayout.into();
        assert!(matches!(err, EncodeError::Layout(DecodeError::EmptyLayout)));
    }
}
