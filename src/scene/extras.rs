//! Raw record attributes the codec does not interpret.
//!
//! Engine-specific metadata (scripting hooks, animation channels, editor
//! flags) is kept verbatim so the host can consume it and the writer can
//! emit it again.

use std::str::FromStr;

use serde::Serialize;
use smallvec::SmallVec;

/// Uninterpreted `name="value"` attributes of one record, in document order.
///
/// Names are unique: inserting an existing name replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Extras {
    entries: SmallVec<[(String, String); 4]>,
}

impl Extras {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.index_of(&name) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Raw attribute text.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index_of(name).map(|i| self.entries[i].1.as_str())
    }

    /// Attribute text parsed as `T`; `None` if absent.
    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(str::parse)
    }

    /// Remove an attribute; later attributes keep their order.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.index_of(name).map(|i| self.entries.remove(i).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attribute names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Extras {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Extras {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut extras = Self::new();
        extras.extend(iter);
        extras
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut e: Extras = [("script", "onClick"), ("layer", "2")].into_iter().collect();
        assert_eq!(e.insert("script", "onHover"), Some("onClick".to_string()));
        assert_eq!(e.insert("visible", "false"), None);

        let names: Vec<&str> = e.names().collect();
        assert_eq!(names, ["script", "layer", "visible"]);
        assert_eq!(e.get("script"), Some("onHover"));
    }

    #[test]
    fn test_parse_values() {
        let e: Extras = [("layer", "2"), ("alpha", "half")].into_iter().collect();
        assert_eq!(e.parse::<u32>("layer"), Some(Ok(2)));
        assert!(matches!(e.parse::<f32>("alpha"), Some(Err(_))));
        assert!(e.parse::<u32>("missing").is_none());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut e: Extras = [("b", "1"), ("a", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(e.remove("a"), Some("2".to_string()));
        assert_eq!(e.remove("a"), None);
        let pairs: Vec<(&str, &str)> = e.iter().collect();
        assert_eq!(pairs, [("b", "1"), ("c", "3")]);
        assert_eq!(e.len(), 2);
    }
}
