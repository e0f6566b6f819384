//! ZF3D container entry names.

/// Scene document entry.
pub const SCENE_ENTRY: &str = "main.xml";

/// Extension of vertex stream entries.
pub const VERTEX_EXTENSION: &str = "vertex";

/// Usual file extension of a container.
pub const CONTAINER_EXTENSION: &str = "zf3d";

/// Entry holding the stream of the `index`-th surface in document order.
///
/// The surface's declared id plays no part in the name.
#[inline]
pub fn vertex_entry_name(index: usize) -> String {
    format!("{}.{}", index, VERTEX_EXTENSION)
}

/// Surface index encoded in a vertex entry name, if it is one.
pub fn vertex_entry_index(name: &str) -> Option<usize> {
    let stem = name.strip_suffix(VERTEX_EXTENSION)?.strip_suffix('.')?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_entry_names() {
        assert_eq!(vertex_entry_name(0), "0.vertex");
        assert_eq!(vertex_entry_name(12), "12.vertex");
        assert_eq!(vertex_entry_index("12.vertex"), Some(12));
        assert_eq!(vertex_entry_index("main.xml"), None);
        assert_eq!(vertex_entry_index(".vertex"), None);
        assert_eq!(vertex_entry_index("+1.vertex"), None);
    }
}
