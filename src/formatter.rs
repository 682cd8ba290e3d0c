//! Top-level entry point: turns a [`Value`] into an xlsx document.

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::AsyncWrite;

use crate::context::SerializationContext;
use crate::document::{StyleHook, XlsxDocument};
use crate::resolver::ColumnResolver;
use crate::serializer::{DefaultXlsxSerializer, DynamicSerializer, SimpleTypeSerializer, XlsxSerializer};
use crate::value::{TypeInfo, Value};

/// Options that control the layout of generated documents.
#[derive(Debug, Clone)]
pub struct XlsxFormatterOptions {
    /// Fit column widths to their content.
    pub auto_fit: bool,
    /// Add an auto-filter over the written range.
    pub auto_filter: bool,
    /// Keep the header row visible while scrolling.
    pub freeze_header: bool,
    /// Height of the header row, in points.
    pub header_height: Option<f64>,
    /// Default height of every row, in points.
    pub cell_height: Option<f64>,
    /// Style applied to every cell.
    pub cell_style: Option<StyleHook>,
    /// Style applied to the header row, on top of `cell_style`.
    pub header_style: Option<StyleHook>,
}

impl Default for XlsxFormatterOptions {
    fn default() -> Self {
        XlsxFormatterOptions {
            auto_fit: true,
            auto_filter: false,
            freeze_header: false,
            header_height: None,
            cell_height: None,
            cell_style: None,
            header_style: None,
        }
    }
}

/// Serializes values into single-sheet xlsx documents.
///
/// The serializer is chosen by asking each entry of `serializers` in turn
/// whether it handles the value; `default_serializer` is used when none does.
///
/// # Examples
///
/// ```
/// use xlsx_formatter_rs::context::SerializationContext;
/// use xlsx_formatter_rs::formatter::XlsxFormatter;
/// use xlsx_formatter_rs::value::Value;
///
/// let formatter = XlsxFormatter::default();
/// let document = formatter
///     .build_document(&Value::scalars(vec![1, 2, 3]), &SerializationContext::new())
///     .unwrap();
///
/// assert_eq!(document.row_count(), 3);
/// ```
#[derive(Clone)]
pub struct XlsxFormatter {
    pub options: XlsxFormatterOptions,
    pub serializers: Vec<Arc<dyn XlsxSerializer>>,
    pub default_serializer: Arc<dyn XlsxSerializer>,
}

impl std::fmt::Debug for XlsxFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxFormatter")
            .field("options", &self.options)
            .field("serializers", &self.serializers.len())
            .finish_non_exhaustive()
    }
}

impl Default for XlsxFormatter {
    fn default() -> Self {
        Self::new(XlsxFormatterOptions::default())
    }
}

impl XlsxFormatter {
    pub fn new(options: XlsxFormatterOptions) -> Self {
        XlsxFormatter {
            options,
            serializers: vec![Arc::new(DynamicSerializer), Arc::new(SimpleTypeSerializer)],
            default_serializer: Arc::new(DefaultXlsxSerializer::default()),
        }
    }

    /// Replaces the fallback serializer.
    pub fn with_default_serializer(mut self, serializer: Arc<dyn XlsxSerializer>) -> Self {
        self.default_serializer = serializer;
        self
    }

    /// Uses a [`DefaultXlsxSerializer`] with `resolver` as the fallback serializer.
    pub fn with_column_resolver(self, resolver: Arc<dyn ColumnResolver>) -> Self {
        self.with_default_serializer(Arc::new(DefaultXlsxSerializer::new(resolver)))
    }

    /// Every type can be written.
    pub fn can_write_type(&self, _value_type: &TypeInfo) -> bool {
        true
    }

    /// Reading documents back is not supported.
    pub fn can_read_type(&self, _value_type: &TypeInfo) -> bool {
        false
    }

    pub fn select_serializer(&self, value_type: &TypeInfo, item_type: &TypeInfo) -> &Arc<dyn XlsxSerializer> {
        self.serializers
            .iter()
            .find(|serializer| serializer.can_serialize_type(value_type, item_type))
            .unwrap_or(&self.default_serializer)
    }

    /// Serializes `value` into a document without writing it anywhere.
    pub fn build_document(&self, value: &Value, context: &SerializationContext) -> Result<XlsxDocument> {
        let mut document = XlsxDocument::new();
        if value.is_null() {
            log::debug!("null value, writing an empty document");
            return Ok(document);
        }

        if let Some(style) = &self.options.cell_style {
            document.set_cell_style(style.clone());
        }
        if let Some(height) = self.options.cell_height {
            document.set_default_row_height(height);
        }

        let value_type = value.type_info();
        let (item_type, data) = item_type_and_data(value);
        let serializer = self.select_serializer(&value_type, &item_type);
        log::debug!("serializing {} item(s) of {item_type}", data.len());

        serializer.serialize(&item_type, &data, &mut document, context)?;

        if document.row_count() > 0 {
            if serializer.ignore_formatting() {
                if self.options.auto_fit {
                    document.auto_fit();
                }
            } else {
                self.format_document(&mut document);
            }
        }

        Ok(document)
    }

    fn format_document(&self, document: &mut XlsxDocument) {
        if let Some(style) = &self.options.header_style {
            document.set_header_style(style.clone());
        }
        if self.options.freeze_header {
            document.freeze_header();
        }
        if self.options.auto_filter {
            document.auto_filter();
        }
        if self.options.auto_fit {
            document.auto_fit();
        }
        if let Some(height) = self.options.header_height {
            document.set_header_height(height);
        }
    }

    /// Serializes `value` and writes the document to `writer`.
    pub fn write_to<W: Write>(&self, value: &Value, context: &SerializationContext, writer: W) -> Result<()> {
        let document = self.build_document(value, context)?;
        document.write_to(writer)?;
        Ok(())
    }

    /// Serializes `value` and saves the document to `path`.
    pub fn save(&self, value: &Value, context: &SerializationContext, path: impl AsRef<Path>) -> Result<()> {
        let document = self.build_document(value, context)?;
        document.save(path)?;
        Ok(())
    }

    /// Serializes `value`, then renders and writes the document without
    /// blocking the async runtime.
    pub async fn write_to_async<W>(
        &self,
        value: &Value,
        context: &SerializationContext,
        writer: &mut W,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let document = self.build_document(value, context)?;
        document.write_to_async(writer).await?;
        Ok(())
    }
}

/// Splits a value into its item type and the items to write.
///
/// Scalars, single records, property bags and untyped sequences become a
/// one-item sequence of their own type; typed sequences yield their items.
pub fn item_type_and_data(value: &Value) -> (TypeInfo, Cow<'_, [Value]>) {
    if let Value::List(sequence) = value {
        if let Some(item_type) = sequence.item_type() {
            return (item_type.clone(), Cow::Borrowed(sequence.items()));
        }
    }
    (value.type_info(), Cow::Owned(vec![value.clone()]))
}
