use anyhow::Result;

use super::XlsxSerializer;
use crate::cell::raw_cell;
use crate::context::SerializationContext;
use crate::document::XlsxDocument;
use crate::value::{TypeInfo, Value};

/// Writes scalar items one per row, without a header.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTypeSerializer;

impl XlsxSerializer for SimpleTypeSerializer {
    fn ignore_formatting(&self) -> bool {
        true
    }

    fn can_serialize_type(&self, _value_type: &TypeInfo, item_type: &TypeInfo) -> bool {
        item_type.is_simple()
    }

    fn serialize(
        &self,
        _item_type: &TypeInfo,
        data: &[Value],
        document: &mut XlsxDocument,
        _context: &SerializationContext,
    ) -> Result<()> {
        for value in data {
            document.append_row([raw_cell(value)]);
        }
        Ok(())
    }
}
