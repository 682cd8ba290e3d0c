use std::collections::HashMap;

use crate::schema::Schema;

/// Display information for a single member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayMetadata {
    pub display_name: Option<String>,
    pub display_format_string: Option<String>,
}

impl DisplayMetadata {
    pub fn new(display_name: Option<&str>, display_format_string: Option<&str>) -> Self {
        DisplayMetadata {
            display_name: display_name.map(str::to_string),
            display_format_string: display_format_string.map(str::to_string),
        }
    }
}

/// Source of display names and display format strings.
///
/// Returns `None` when the provider knows nothing about the member, in which
/// case the column keeps its current settings.
pub trait DisplayMetadataProvider: Send + Sync {
    fn metadata_for(&self, schema: &Schema, member_name: &str) -> Option<DisplayMetadata>;
}

/// Reads display metadata from the schema's [`DisplayAttribute`](crate::schema::DisplayAttribute)s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaDisplayMetadata;

impl DisplayMetadataProvider for SchemaDisplayMetadata {
    fn metadata_for(&self, schema: &Schema, member_name: &str) -> Option<DisplayMetadata> {
        let member = schema.get(member_name)?;
        Some(match &member.display {
            Some(display) => DisplayMetadata {
                display_name: display.name.clone(),
                display_format_string: display.format_string.clone(),
            },
            None => DisplayMetadata::default(),
        })
    }
}

/// Display metadata registered at runtime, keyed by type name and member name.
///
/// Members without an entry fall back to the schema's own display attributes.
#[derive(Debug, Clone, Default)]
pub struct DisplayMetadataMap {
    entries: HashMap<String, HashMap<String, DisplayMetadata>>,
}

impl DisplayMetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        type_name: impl Into<String>,
        member_name: impl Into<String>,
        metadata: DisplayMetadata,
    ) -> Option<DisplayMetadata> {
        self.entries
            .entry(type_name.into())
            .or_default()
            .insert(member_name.into(), metadata)
    }

    pub fn with(
        mut self,
        type_name: impl Into<String>,
        member_name: impl Into<String>,
        metadata: DisplayMetadata,
    ) -> Self {
        self.insert(type_name, member_name, metadata);
        self
    }
}

impl DisplayMetadataProvider for DisplayMetadataMap {
    fn metadata_for(&self, schema: &Schema, member_name: &str) -> Option<DisplayMetadata> {
        self.entries
            .get(schema.type_name())
            .and_then(|members| members.get(member_name))
            .cloned()
            .or_else(|| SchemaDisplayMetadata.metadata_for(schema, member_name))
    }
}
