use std::sync::Arc;

use super::metadata::{DisplayMetadataProvider, SchemaDisplayMetadata};
use super::ColumnResolver;
use crate::column::ColumnInfoCollection;
use crate::context::SerializationContext;
use crate::introspect::Introspector;
use crate::value::{TypeInfo, Value};

/// Resolves every non-ignored member of the item type, in introspected order,
/// and fills in headers and format strings from display metadata.
#[derive(Clone)]
pub struct DefaultColumnResolver {
    introspector: Arc<Introspector>,
    metadata: Arc<dyn DisplayMetadataProvider>,
}

impl std::fmt::Debug for DefaultColumnResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultColumnResolver")
            .field("introspector", &self.introspector)
            .finish_non_exhaustive()
    }
}

impl Default for DefaultColumnResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultColumnResolver {
    pub fn new() -> Self {
        DefaultColumnResolver {
            introspector: Arc::new(Introspector::new()),
            metadata: Arc::new(SchemaDisplayMetadata),
        }
    }

    /// Replaces the display metadata source.
    pub fn with_metadata(mut self, metadata: Arc<dyn DisplayMetadataProvider>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Shares an introspection cache with other resolvers.
    pub fn with_introspector(mut self, introspector: Arc<Introspector>) -> Self {
        self.introspector = introspector;
        self
    }

    pub fn introspector(&self) -> &Arc<Introspector> {
        &self.introspector
    }

    /// Names of all serializable members of `item_type`, in output order.
    pub fn serializable_member_names(&self, item_type: &TypeInfo) -> Vec<String> {
        self.introspector.member_names(item_type)
    }

    /// Builds the column set for the given member names, in the order given.
    ///
    /// Names that are not serializable members of `item_type` are dropped.
    pub fn columns_for_members(&self, item_type: &TypeInfo, names: &[String]) -> ColumnInfoCollection {
        let introspected = self.introspector.columns_for(item_type);
        let mut columns: ColumnInfoCollection = names
            .iter()
            .filter_map(|name| introspected.get(name).cloned())
            .collect();

        self.populate_from_metadata(&mut columns, item_type);
        columns
    }

    /// Fills in headers that were not set explicitly and, where requested,
    /// format strings taken from display metadata.
    pub fn populate_from_metadata(&self, columns: &mut ColumnInfoCollection, item_type: &TypeInfo) {
        let Some(schema) = item_type.schema() else {
            return;
        };

        for column in columns.iter_mut() {
            let Some(metadata) = self.metadata.metadata_for(schema, &column.member_name) else {
                continue;
            };

            if !column.header_defined {
                column.header = metadata
                    .display_name
                    .unwrap_or_else(|| column.member_name.clone());
            }
            if column.use_display_format_string {
                column.format_string = metadata.display_format_string;
            }
        }
    }
}

impl ColumnResolver for DefaultColumnResolver {
    fn resolve_columns(
        &self,
        item_type: &TypeInfo,
        _data: &[Value],
        _context: &SerializationContext,
    ) -> ColumnInfoCollection {
        let names = self.serializable_member_names(item_type);
        self.columns_for_members(item_type, &names)
    }
}
