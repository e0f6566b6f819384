//! Attribute access for one record element, plus the matching text
//! formatting used when records are written back.

use roxmltree::Node;

use crate::scene::Extras;
use crate::util::{Mat4, ParseError, ParseResult, Vec2, Vec3};

/// Separator of list-valued attributes.
pub const LIST_SEPARATOR: char = ',';

/// One record element being parsed.
pub struct RecordElement<'a, 'input> {
    node: Node<'a, 'input>,
    record: &'static str,
    index: usize,
}

impl<'a, 'input> RecordElement<'a, 'input> {
    /// Wrap the `index`-th element of a group.
    pub fn new(node: Node<'a, 'input>, record: &'static str, index: usize) -> Self {
        Self { node, record, index }
    }

    /// Element tag name.
    pub fn tag(&self) -> &'a str {
        self.node.tag_name().name()
    }

    /// Optional attribute value.
    pub fn optional(&self, name: &str) -> Option<&'a str> {
        self.node.attribute(name)
    }

    /// Required attribute value.
    pub fn required(&self, name: &'static str) -> ParseResult<&'a str> {
        self.node.attribute(name).ok_or(ParseError::MissingAttribute {
            record: self.record,
            attribute: name,
            index: self.index,
        })
    }

    /// Required comma-separated list, order preserved.
    pub fn list(&self, name: &'static str) -> ParseResult<Vec<String>> {
        self.required(name).map(split_list)
    }

    /// Optional comma-separated list; absent reads as empty.
    pub fn optional_list(&self, name: &str) -> Vec<String> {
        self.optional(name).map(split_list).unwrap_or_default()
    }

    /// Optional `"true"`/other flag; absent reads as false.
    pub fn flag(&self, name: &str) -> bool {
        self.optional(name) == Some("true")
    }

    /// Optional unsigned integer.
    pub fn u32(&self, name: &'static str) -> ParseResult<Option<u32>> {
        self.optional(name)
            .map(|v| v.trim().parse().map_err(|_| self.invalid(name, v)))
            .transpose()
    }

    /// Optional float.
    pub fn f32(&self, name: &'static str) -> ParseResult<Option<f32>> {
        self.optional(name)
            .map(|v| v.trim().parse().map_err(|_| self.invalid(name, v)))
            .transpose()
    }

    /// Optional comma-separated float list; absent reads as empty.
    pub fn floats(&self, name: &'static str) -> ParseResult<Vec<f32>> {
        match self.optional(name) {
            Some(v) => self.parse_floats(name, v),
            None => Ok(Vec::new()),
        }
    }

    /// Optional `"u,v"` pair.
    pub fn vec2(&self, name: &'static str) -> ParseResult<Option<Vec2>> {
        self.fixed::<2>(name).map(|v| v.map(Vec2::from_array))
    }

    /// Optional `"x,y,z"` triple.
    pub fn vec3(&self, name: &'static str) -> ParseResult<Option<Vec3>> {
        self.fixed::<3>(name).map(|v| v.map(Vec3::from_array))
    }

    /// Optional 16-float column-major matrix.
    pub fn mat4(&self, name: &'static str) -> ParseResult<Option<Mat4>> {
        self.fixed::<16>(name).map(|v| v.map(|a| Mat4::from_cols_array(&a)))
    }

    /// Attributes whose names are not in `known`, in document order.
    pub fn extras(&self, known: &[&str]) -> Extras {
        self.node
            .attributes()
            .filter(|a| !known.contains(&a.name()))
            .map(|a| (a.name(), a.value()))
            .collect()
    }

    /// Error for a required attribute missing from this element.
    pub fn missing(&self, name: &'static str) -> ParseError {
        ParseError::MissingAttribute {
            record: self.record,
            attribute: name,
            index: self.index,
        }
    }

    fn fixed<const N: usize>(&self, name: &'static str) -> ParseResult<Option<[f32; N]>> {
        let Some(raw) = self.optional(name) else {
            return Ok(None);
        };
        let values = self.parse_floats(name, raw)?;
        <[f32; N]>::try_from(values)
            .map(Some)
            .map_err(|_| self.invalid(name, raw))
    }

    fn parse_floats(&self, name: &'static str, raw: &str) -> ParseResult<Vec<f32>> {
        split_list(raw)
            .iter()
            .map(|p| p.parse::<f32>().map_err(|_| self.invalid(name, raw)))
            .collect()
    }

    fn invalid(&self, name: &'static str, value: &str) -> ParseError {
        ParseError::InvalidValue {
            record: self.record,
            attribute: name,
            value: value.to_string(),
        }
    }
}

/// Split a list attribute. An empty string is an empty list.
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(LIST_SEPARATOR).map(|p| p.trim().to_string()).collect()
}

/// Join a list attribute with the list separator.
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(LIST_SEPARATOR);
        }
        out.push_str(item.as_ref());
    }
    out
}

/// Join floats using the shortest text that parses back to the same bits.
pub fn join_floats(values: &[f32]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    join_list(&parts)
}
