use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::XlsxSerializer;
use crate::cell::{format_cell, CellValue};
use crate::context::SerializationContext;
use crate::document::XlsxDocument;
use crate::resolver::{ColumnResolver, DefaultColumnResolver};
use crate::value::{TypeInfo, Value};

/// Writes record items one row per item, with a header row built from the
/// resolved columns.
#[derive(Clone)]
pub struct DefaultXlsxSerializer {
    resolver: Arc<dyn ColumnResolver>,
}

impl std::fmt::Debug for DefaultXlsxSerializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultXlsxSerializer").finish_non_exhaustive()
    }
}

impl Default for DefaultXlsxSerializer {
    fn default() -> Self {
        Self::new(Arc::new(DefaultColumnResolver::new()))
    }
}

impl DefaultXlsxSerializer {
    pub fn new(resolver: Arc<dyn ColumnResolver>) -> Self {
        DefaultXlsxSerializer { resolver }
    }

    pub fn resolver(&self) -> &Arc<dyn ColumnResolver> {
        &self.resolver
    }
}

impl XlsxSerializer for DefaultXlsxSerializer {
    fn ignore_formatting(&self) -> bool {
        false
    }

    fn can_serialize_type(&self, _value_type: &TypeInfo, _item_type: &TypeInfo) -> bool {
        true
    }

    fn serialize(
        &self,
        item_type: &TypeInfo,
        data: &[Value],
        document: &mut XlsxDocument,
        context: &SerializationContext,
    ) -> Result<()> {
        let columns = self.resolver.resolve_columns(item_type, data, context);
        if columns.is_empty() {
            log::debug!("no serializable columns for {item_type}");
            return Ok(());
        }

        document.append_row(columns.iter().map(|column| CellValue::from(column.header.as_str())));

        for item in data {
            let row = columns.iter().map(|column| {
                let value = match item {
                    Value::Record(record) => record.member_value(&column.member_name),
                    _ => Value::Null,
                };
                format_cell(&value, column)
            });
            document.append_row(row);
        }

        for (index, column) in columns.iter().enumerate() {
            if let Some(number_format) = column.excel_number_format() {
                let index = u16::try_from(index)
                    .with_context(|| format!("too many columns for {item_type}"))?;
                document.format_column(index, number_format, true);
            }
        }

        Ok(())
    }
}
