//! In-memory worksheet that is rendered to xlsx when saved.
//!
//! Rows are kept as [`CellValue`]s until the document is saved so that column
//! number formats and layout directives recorded after the rows were appended
//! can still be applied to them.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::cell::CellValue;
use crate::error::DocumentError;

/// Name of the single worksheet in every document.
pub const DEFAULT_SHEET_NAME: &str = "Data";

/// Number format given to date cells whose column has no number format.
pub const DEFAULT_DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Longest text a worksheet cell can hold, in characters. Longer text is cut
/// to this length when the document is rendered.
pub const MAX_CELL_TEXT_CHARS: usize = 32_767;

/// Callback that adjusts a cell format, used for cell and header styles.
#[derive(Clone)]
pub struct StyleHook(Arc<dyn Fn(Format) -> Format + Send + Sync>);

impl StyleHook {
    pub fn new(style: impl Fn(Format) -> Format + Send + Sync + 'static) -> Self {
        StyleHook(Arc::new(style))
    }

    pub fn apply(&self, format: Format) -> Format {
        (self.0)(format)
    }
}

impl fmt::Debug for StyleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StyleHook")
    }
}

/// A number format applied to a column over a fixed span of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFormat {
    pub column: u16,
    pub first_row: u32,
    pub last_row: u32,
    pub format: String,
}

/// Worksheet-wide layout directives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetLayout {
    pub auto_fit: bool,
    pub auto_filter: bool,
    pub freeze_header: bool,
    pub header_height: Option<f64>,
    pub default_row_height: Option<f64>,
}

/// Rows and formatting for a single worksheet.
///
/// Text cells longer than [`MAX_CELL_TEXT_CHARS`] are truncated, with a
/// warning, when the document is rendered.
#[derive(Debug, Clone)]
pub struct XlsxDocument {
    sheet_name: String,
    rows: Vec<Vec<CellValue>>,
    column_formats: Vec<ColumnFormat>,
    cell_style: Option<StyleHook>,
    header_style: Option<StyleHook>,
    layout: SheetLayout,
}

impl Default for XlsxDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl XlsxDocument {
    pub fn new() -> Self {
        XlsxDocument {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            rows: Vec::new(),
            column_formats: Vec::new(),
            cell_style: None,
            header_style: None,
            layout: SheetLayout::default(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Appends a row below the last one.
    pub fn append_row<I>(&mut self, row: I)
    where
        I: IntoIterator<Item = CellValue>,
    {
        self.rows.push(row.into_iter().collect());
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Applies `format` to the cells of a zero-based `column`, from the first
    /// data row (or the first row when `skip_header` is `false`) down to the
    /// last row appended so far. Does nothing when that span is empty.
    pub fn format_column(&mut self, column: u16, format: &str, skip_header: bool) {
        let first_row: u32 = if skip_header { 1 } else { 0 };
        let Some(last_row) = self.rows.len().checked_sub(1) else {
            return;
        };
        let last_row = u32::try_from(last_row).unwrap_or(u32::MAX);
        if first_row > last_row {
            return;
        }

        self.column_formats.push(ColumnFormat {
            column,
            first_row,
            last_row,
            format: format.to_string(),
        });
    }

    pub fn column_formats(&self) -> &[ColumnFormat] {
        &self.column_formats
    }

    /// Number format in effect for a cell; later spans win.
    pub fn column_format_at(&self, row: u32, column: u16) -> Option<&str> {
        self.column_formats
            .iter()
            .rev()
            .find(|span| span.column == column && (span.first_row..=span.last_row).contains(&row))
            .map(|span| span.format.as_str())
    }

    pub fn set_cell_style(&mut self, style: StyleHook) {
        self.cell_style = Some(style);
    }

    /// Style applied on top of the cell style for the first row.
    pub fn set_header_style(&mut self, style: StyleHook) {
        self.header_style = Some(style);
    }

    pub fn auto_fit(&mut self) {
        self.layout.auto_fit = true;
    }

    pub fn auto_filter(&mut self) {
        self.layout.auto_filter = true;
    }

    pub fn freeze_header(&mut self) {
        self.layout.freeze_header = true;
    }

    pub fn set_header_height(&mut self, height: f64) {
        self.layout.header_height = Some(height);
    }

    pub fn set_default_row_height(&mut self, height: f64) {
        self.layout.default_row_height = Some(height);
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Renders the document into a workbook with a single worksheet.
    pub fn to_workbook(&self) -> Result<Workbook, DocumentError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        if let Some(height) = self.layout.default_row_height {
            worksheet.set_default_row_height(height);
        }

        for (row_index, row) in self.rows.iter().enumerate() {
            let row_index = row_num(row_index)?;
            for (col_index, cell) in row.iter().enumerate() {
                let col_index = col_num(col_index)?;
                let format = self.cell_format(row_index, col_index, cell);
                write_cell_with_format(worksheet, row_index, col_index, cell, &format)?;
            }
        }

        if !self.rows.is_empty() {
            self.apply_layout(worksheet)?;
        }

        Ok(workbook)
    }

    fn cell_format(&self, row: u32, column: u16, cell: &CellValue) -> Format {
        let mut format = Format::new();
        if let Some(style) = &self.cell_style {
            format = style.apply(format);
        }
        if row == 0 {
            if let Some(style) = &self.header_style {
                format = style.apply(format);
            }
        }

        match self.column_format_at(row, column) {
            Some(num_format) => format.set_num_format(num_format),
            None if matches!(cell, CellValue::DateTime(_)) => {
                format.set_num_format(DEFAULT_DATETIME_FORMAT)
            }
            None => format,
        }
    }

    fn apply_layout(&self, worksheet: &mut Worksheet) -> Result<(), DocumentError> {
        let last_row = row_num(self.rows.len() - 1)?;
        let last_col = col_num(self.column_count().saturating_sub(1))?;

        if let Some(height) = self.layout.header_height {
            worksheet.set_row_height(0, height)?;
        }
        if self.layout.freeze_header {
            worksheet.set_freeze_panes(1, 0)?;
        }
        if self.layout.auto_filter {
            worksheet.autofilter(0, 0, last_row, last_col)?;
        }
        if self.layout.auto_fit {
            worksheet.autofit();
        }
        Ok(())
    }

    pub fn save_to_buffer(&self) -> Result<Vec<u8>, DocumentError> {
        let mut workbook = self.to_workbook()?;
        Ok(workbook.save_to_buffer()?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let mut workbook = self.to_workbook()?;
        workbook.save(path.as_ref())?;
        log::debug!("saved document to {}", path.as_ref().display());
        Ok(())
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), DocumentError> {
        let buffer = self.save_to_buffer()?;
        writer.write_all(&buffer)?;
        writer.flush()?;
        Ok(())
    }

    /// Renders the document on the blocking thread pool.
    pub async fn into_buffer_async(self) -> Result<Vec<u8>, DocumentError> {
        tokio::task::spawn_blocking(move || self.save_to_buffer()).await?
    }

    /// Renders the document in the background and writes it to `writer`.
    pub async fn write_to_async<W>(self, writer: &mut W) -> Result<(), DocumentError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let buffer = self.into_buffer_async().await?;
        writer.write_all(&buffer).await?;
        writer.flush().await?;
        log::debug!("flushed {} byte(s)", buffer.len());
        Ok(())
    }
}

fn row_num(index: usize) -> Result<u32, XlsxError> {
    u32::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_num(index: usize) -> Result<u16, XlsxError> {
    u16::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

fn clip_cell_text(text: &str, row: u32, col: u16) -> &str {
    match text.char_indices().nth(MAX_CELL_TEXT_CHARS) {
        Some((end, _)) => {
            log::warn!(
                "text in row {row}, column {col} exceeds {MAX_CELL_TEXT_CHARS} characters, truncating"
            );
            &text[..end]
        }
        None => text,
    }
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    format: &Format,
) -> Result<(), XlsxError> {
    match cell {
        CellValue::Empty => {
            worksheet.write_blank(row, col, format)?;
        }
        CellValue::String(text) => {
            let text = clip_cell_text(text, row, col);
            worksheet.write_string_with_format(row, col, text, format)?;
        }
        CellValue::Integer(value) => {
            worksheet.write_number_with_format(row, col, *value as f64, format)?;
        }
        CellValue::Number(value) => {
            worksheet.write_number_with_format(row, col, *value, format)?;
        }
        CellValue::Boolean(value) => {
            worksheet.write_boolean_with_format(row, col, *value, format)?;
        }
        CellValue::DateTime(value) => {
            worksheet.write_datetime_with_format(row, col, value, format)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::FormatAlign;
    use tempfile::NamedTempFile;
    use umya_spreadsheet::reader::xlsx::read as read_xlsx;

    fn sample_document() -> XlsxDocument {
        let mut document = XlsxDocument::new();
        document.append_row(vec![CellValue::from("Name"), CellValue::from("Amount")]);
        document.append_row(vec![CellValue::from("a"), CellValue::Number(1.5)]);
        document.append_row(vec![CellValue::from("b"), CellValue::Integer(2)]);
        document
    }

    #[test]
    fn test_format_column_skips_header() {
        let mut document = sample_document();
        document.format_column(1, "0.00", true);

        assert_eq!(
            document.column_formats(),
            &[ColumnFormat {
                column: 1,
                first_row: 1,
                last_row: 2,
                format: "0.00".to_string(),
            }]
        );
        assert_eq!(document.column_format_at(0, 1), None);
        assert_eq!(document.column_format_at(2, 1), Some("0.00"));
        assert_eq!(document.column_format_at(2, 0), None);
    }

    #[test]
    fn test_format_column_covers_rows_present_at_call_time() {
        let mut document = XlsxDocument::new();
        document.format_column(0, "0.0", true);
        assert!(document.column_formats().is_empty());

        document.append_row(vec![CellValue::from("Header")]);
        document.format_column(0, "0.0", true);
        assert!(document.column_formats().is_empty());

        document.format_column(0, "@", false);
        document.append_row(vec![CellValue::Number(1.0)]);
        assert_eq!(document.column_format_at(0, 0), Some("@"));
        assert_eq!(document.column_format_at(1, 0), None);
    }

    #[test]
    fn test_layout_directives() {
        let mut document = sample_document();
        document.auto_fit();
        document.freeze_header();
        document.set_header_height(30.0);

        assert_eq!(
            document.layout(),
            &SheetLayout {
                auto_fit: true,
                auto_filter: false,
                freeze_header: true,
                header_height: Some(30.0),
                default_row_height: None,
            }
        );
        assert_eq!(document.column_count(), 2);
    }

    #[test]
    fn test_save_and_read_back() {
        let mut document = sample_document();
        document.format_column(1, "0.000", true);
        document.set_header_style(StyleHook::new(|format| format.set_bold()));
        document.set_cell_style(StyleHook::new(|format| format.set_align(FormatAlign::Left)));
        document.auto_filter();
        document.auto_fit();

        let temp_file = NamedTempFile::with_suffix(".xlsx").unwrap();
        let temp_path = temp_file.path().to_path_buf();
        document.save(&temp_path).unwrap();

        let spreadsheet = read_xlsx(&temp_path).unwrap();
        let worksheet = spreadsheet.get_sheet(&0).unwrap();

        assert_eq!(worksheet.get_name(), "Data");
        assert_eq!(worksheet.get_value((1, 1)).as_str(), "Name");
        assert_eq!(worksheet.get_value((2, 1)).as_str(), "Amount");
        assert_eq!(worksheet.get_value((1, 2)).as_str(), "a");
        assert_eq!(worksheet.get_value((2, 2)).as_str(), "1.5");
        assert_eq!(worksheet.get_value((2, 3)).as_str(), "2");

        let number_format = worksheet.get_style((2, 2)).get_number_format().unwrap();
        assert_eq!(number_format.get_format_code(), "0.000");

        drop(temp_file);
    }

    #[test]
    fn test_long_text_is_truncated() {
        let mut document = XlsxDocument::new();
        document.append_row(vec![CellValue::from("x".repeat(MAX_CELL_TEXT_CHARS + 10))]);
        document.append_row(vec![CellValue::from("é".repeat(MAX_CELL_TEXT_CHARS))]);

        let temp_file = NamedTempFile::with_suffix(".xlsx").unwrap();
        let temp_path = temp_file.path().to_path_buf();
        document.save(&temp_path).unwrap();

        let spreadsheet = read_xlsx(&temp_path).unwrap();
        let worksheet = spreadsheet.get_sheet(&0).unwrap();
        assert_eq!(worksheet.get_value((1, 1)).chars().count(), MAX_CELL_TEXT_CHARS);
        assert_eq!(worksheet.get_value((1, 2)).chars().count(), MAX_CELL_TEXT_CHARS);

        drop(temp_file);
    }

    #[test]
    fn test_empty_document_still_saves() {
        let buffer = XlsxDocument::new().save_to_buffer().unwrap();
        assert!(buffer.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_write_to_async() {
        let mut output: Vec<u8> = Vec::new();
        sample_document().write_to_async(&mut output).await.unwrap();
        assert!(output.starts_with(b"PK"));
    }
}
