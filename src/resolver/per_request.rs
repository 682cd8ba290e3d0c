use super::default::DefaultColumnResolver;
use super::ColumnResolver;
use crate::column::ColumnInfoCollection;
use crate::context::{SerializationContext, DEFAULT_ALLOW_LIST_KEY};
use crate::value::{TypeInfo, Value};

/// Restricts the columns to an allow-list supplied with each call.
///
/// The list is read from the [`SerializationContext`] under `context_key`. When
/// no list is present every serializable member is written. Names in the list
/// that are not serializable members are dropped.
#[derive(Debug, Clone)]
pub struct PerRequestColumnResolver {
    pub context_key: String,
    /// Write columns in allow-list order instead of introspected order.
    pub use_custom_order: bool,
    inner: DefaultColumnResolver,
}

impl Default for PerRequestColumnResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOW_LIST_KEY, false)
    }
}

impl PerRequestColumnResolver {
    pub fn new(context_key: impl Into<String>, use_custom_order: bool) -> Self {
        PerRequestColumnResolver {
            context_key: context_key.into(),
            use_custom_order,
            inner: DefaultColumnResolver::new(),
        }
    }

    /// Uses `inner` for introspection and metadata backfill.
    pub fn with_inner(mut self, inner: DefaultColumnResolver) -> Self {
        self.inner = inner;
        self
    }

    /// Member names to write for this call, in output order.
    pub fn serializable_member_names(
        &self,
        item_type: &TypeInfo,
        context: &SerializationContext,
    ) -> Vec<String> {
        let defaults = self.inner.serializable_member_names(item_type);
        let Some(requested) = context.allow_list(&self.context_key) else {
            return defaults;
        };

        if self.use_custom_order {
            requested
                .iter()
                .filter(|name| defaults.contains(name))
                .cloned()
                .collect()
        } else {
            defaults
                .into_iter()
                .filter(|name| requested.contains(name))
                .collect()
        }
    }
}

impl ColumnResolver for PerRequestColumnResolver {
    fn resolve_columns(
        &self,
        item_type: &TypeInfo,
        _data: &[Value],
        context: &SerializationContext,
    ) -> ColumnInfoCollection {
        let names = self.serializable_member_names(item_type, context);
        log::debug!(
            "resolved {} allowed column(s) for {item_type} using key {}",
            names.len(),
            self.context_key
        );
        self.inner.columns_for_members(item_type, &names)
    }
}
