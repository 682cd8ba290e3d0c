//! Member discovery and ordering for record types.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::column::{ColumnInfo, ColumnInfoCollection, UNORDERED};
use crate::schema::{Member, Schema};
use crate::value::TypeInfo;

/// Resolved order of a member.
///
/// An explicit column order wins; otherwise the general serialization order is
/// used; otherwise the member is [`UNORDERED`].
pub fn member_order(member: &Member) -> i32 {
    if let Some(order) = member.column.as_ref().and_then(|column| column.order) {
        return order;
    }
    member.data_member_order.unwrap_or(UNORDERED)
}

/// Whether a member is excluded from serialization.
pub fn is_member_ignored(member: &Member) -> bool {
    member.column.as_ref().is_some_and(|column| column.ignore)
}

/// Non-ignored members, stably sorted by [`member_order`].
pub fn ordered_members(schema: &Schema) -> Vec<&Member> {
    let mut members: Vec<&Member> = schema
        .members()
        .iter()
        .filter(|member| !is_member_ignored(member))
        .collect();
    members.sort_by_key(|member| member_order(member));
    members
}

/// Names of the non-ignored members, in output order.
pub fn member_names(schema: &Schema) -> Vec<String> {
    ordered_members(schema)
        .into_iter()
        .map(|member| member.name.clone())
        .collect()
}

/// Column descriptors for the non-ignored members, in output order.
pub fn column_descriptors(schema: &Schema) -> ColumnInfoCollection {
    ordered_members(schema)
        .into_iter()
        .map(|member| ColumnInfo::from_member(member, member_order(member)))
        .collect()
}

/// Caches introspection results per record type.
///
/// Results depend only on the schema, so they can be shared between calls and
/// threads. Entries are keyed by the address of the `'static` schema, so two
/// types whose schemas share a type name are cached separately.
#[derive(Debug, Default)]
pub struct Introspector {
    cache: RwLock<HashMap<usize, Arc<ColumnInfoCollection>>>,
}

fn schema_key(schema: &'static Schema) -> usize {
    schema as *const Schema as usize
}

impl Introspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column descriptors for a record schema.
    pub fn columns(&self, schema: &'static Schema) -> Arc<ColumnInfoCollection> {
        let key = schema_key(schema);
        if let Some(columns) = self.cache.read().get(&key) {
            return Arc::clone(columns);
        }

        let columns = Arc::new(column_descriptors(schema));
        log::debug!(
            "introspected {} column(s) for {}",
            columns.len(),
            schema.type_name()
        );
        self.cache
            .write()
            .entry(key)
            .or_insert(columns)
            .clone()
    }

    /// Column descriptors for any item type. Only record types have members.
    pub fn columns_for(&self, item_type: &TypeInfo) -> Arc<ColumnInfoCollection> {
        match item_type {
            TypeInfo::Record(schema) => self.columns(*schema),
            _ => Arc::new(ColumnInfoCollection::new()),
        }
    }

    /// Member names for any item type, in output order.
    pub fn member_names(&self, item_type: &TypeInfo) -> Vec<String> {
        self.columns_for(item_type)
            .iter()
            .map(|column| column.member_name.clone())
            .collect()
    }

    /// Number of cached types.
    pub fn cached_types(&self) -> usize {
        self.cache.read().len()
    }
}
