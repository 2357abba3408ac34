//! Captured path parameters as delivered to handlers.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// An ordered collection of `(name, value)` pairs captured while matching a
/// route pattern.
///
/// Names are the identifiers following `:` or `*` in the registered pattern
/// and are unique within one pattern. The router publishes a `PathParams`
/// value as a typed request extension before invoking the handler; handlers
/// read it back through [`Request::path_params`](crate::Request::path_params).
///
/// # Example
///
/// ```ignore
/// fn show_user(req: &mut Request) -> Response {
///     let id = req
///         .path_params()
///         .and_then(|p| p.get("id"))
///         .unwrap_or_default();
///     Response::ok().body_text(format!("user {id}"))
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    /// Creates an empty parameter collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collection with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Returns the value of the first entry named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Appends an entry.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Copies entries from `other` whose names are not already bound here.
    ///
    /// This is the merge rule applied when a request context already carries
    /// parameters from an outer router: freshly captured names win.
    pub fn merge_missing(&mut self, other: &PathParams) {
        for (name, value) in other.iter() {
            if self.get(name).is_none() {
                self.insert(name, value);
            }
        }
    }

    /// Iterates over all entries in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no parameters were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PathParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
