//! Column resolution for one serialization call.
//!
//! A resolver combines the introspected columns of the item type with any
//! external metadata (per-call allow-lists, display names) into the final
//! ordered column set.

pub mod default;
pub mod metadata;
pub mod per_request;

pub use default::DefaultColumnResolver;
pub use metadata::{DisplayMetadata, DisplayMetadataMap, DisplayMetadataProvider, SchemaDisplayMetadata};
pub use per_request::PerRequestColumnResolver;

use crate::column::ColumnInfoCollection;
use crate::context::SerializationContext;
use crate::value::{TypeInfo, Value};

pub trait ColumnResolver: Send + Sync {
    /// Resolves the columns to write for items of `item_type`.
    ///
    /// `data` is the full set of items being written; the built-in resolvers
    /// do not inspect it.
    fn resolve_columns(
        &self,
        item_type: &TypeInfo,
        data: &[Value],
        context: &SerializationContext,
    ) -> ColumnInfoCollection;
}
