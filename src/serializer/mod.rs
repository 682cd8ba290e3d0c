//! Strategies that turn a sequence of items into worksheet rows.

pub mod default;
pub mod dynamic;
pub mod simple_type;

pub use default::DefaultXlsxSerializer;
pub use dynamic::DynamicSerializer;
pub use simple_type::SimpleTypeSerializer;

use anyhow::Result;

use crate::context::SerializationContext;
use crate::document::XlsxDocument;
use crate::value::{TypeInfo, Value};

pub trait XlsxSerializer: Send + Sync {
    /// When `true`, only auto-fit is applied after serialization; header
    /// styling, freezing and filtering are skipped.
    fn ignore_formatting(&self) -> bool;

    /// Whether this strategy handles a value of `value_type` whose items are of
    /// `item_type`.
    fn can_serialize_type(&self, value_type: &TypeInfo, item_type: &TypeInfo) -> bool;

    /// Writes `data`, whose items are of `item_type`, into `document`.
    fn serialize(
        &self,
        item_type: &TypeInfo,
        data: &[Value],
        document: &mut XlsxDocument,
        context: &SerializationContext,
    ) -> Result<()>;
}
