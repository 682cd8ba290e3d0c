//! Per-call serialization context.

use std::collections::HashMap;

/// Context key under which the column allow-list is looked up by default.
pub const DEFAULT_ALLOW_LIST_KEY: &str = "XlsxSerializableProperties";

/// Values supplied by the caller for a single serialization call.
///
/// Resolvers read optional settings from here, such as the list of member
/// names that should be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializationContext {
    allow_lists: HashMap<String, Vec<String>>,
}

impl SerializationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`SerializationContext::set_allow_list`].
    pub fn with_allow_list<I, S>(mut self, key: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_allow_list(key, names);
        self
    }

    /// Stores a list of member names under `key`, replacing any previous list.
    pub fn set_allow_list<I, S>(&mut self, key: impl Into<String>, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_lists
            .insert(key.into(), names.into_iter().map(Into::into).collect());
    }

    pub fn allow_list(&self, key: &str) -> Option<&[String]> {
        self.allow_lists.get(key).map(Vec::as_slice)
    }

    pub fn remove_allow_list(&mut self, key: &str) -> Option<Vec<String>> {
        self.allow_lists.remove(key)
    }
}
