use anyhow::Result;

use super::XlsxSerializer;
use crate::cell::{raw_cell, CellValue};
use crate::context::SerializationContext;
use crate::document::XlsxDocument;
use crate::value::{TypeInfo, Value};

/// Writes property bags. The header comes from the member names of the first
/// item and every row reads the same names, in the same order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicSerializer;

impl XlsxSerializer for DynamicSerializer {
    fn ignore_formatting(&self) -> bool {
        false
    }

    fn can_serialize_type(&self, value_type: &TypeInfo, item_type: &TypeInfo) -> bool {
        value_type.is_dynamic() || item_type.is_dynamic()
    }

    fn serialize(
        &self,
        _item_type: &TypeInfo,
        data: &[Value],
        document: &mut XlsxDocument,
        _context: &SerializationContext,
    ) -> Result<()> {
        let Some(Value::Dynamic(first)) = data.first() else {
            return Ok(());
        };
        let members: Vec<String> = first.keys().map(str::to_string).collect();
        if members.is_empty() {
            return Ok(());
        }

        document.append_row(members.iter().map(|name| CellValue::from(name.as_str())));

        for item in data {
            let row = members.iter().map(|name| match item {
                Value::Dynamic(bag) => bag.get(name).map_or(CellValue::Empty, raw_cell),
                _ => CellValue::Empty,
            });
            document.append_row(row);
        }

        Ok(())
    }
}
