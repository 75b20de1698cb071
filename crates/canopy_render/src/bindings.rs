//! Variable binding sets for template rendering.

use std::collections::BTreeMap;
use std::fmt::Display;

/// An ordered set of template variable bindings.
///
/// Values are stored as their final textual form; [`Bindings::set`] accepts
/// anything implementing [`Display`] so callers can bind numbers and paths
/// directly.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    /// Creates an empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to the textual form of `value`, replacing any previous
    /// binding. Returns `self` for chaining.
    pub fn set(mut self, name: &str, value: impl Display) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }

    /// Looks up a binding.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}
