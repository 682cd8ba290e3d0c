//! Conversion of member values into worksheet cells.

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};

use crate::column::ColumnInfo;
use crate::format_string::format_value;
use crate::value::Value;

/// A single cell as it is written to the worksheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// A text cell; empty text is the same blank cell a null produces.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::String(text)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(text) => f.write_str(text),
            CellValue::Integer(v) => write!(f, "{v}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Boolean(true) => f.write_str("True"),
            CellValue::Boolean(false) => f.write_str("False"),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::text(text)
    }
}

impl From<String> for CellValue {
    fn from(text: String) -> Self {
        CellValue::text(text)
    }
}

/// Whether a value is written to the worksheet with its native type.
pub fn is_excel_supported_type(value: &Value) -> bool {
    matches!(
        value,
        Value::String(_)
            | Value::I16(_)
            | Value::I32(_)
            | Value::I64(_)
            | Value::Decimal(_)
            | Value::F32(_)
            | Value::F64(_)
            | Value::DateTime(_)
            | Value::DateTimeOffset(_)
    )
}

/// Converts a value into a cell: supported types keep their native type,
/// nulls and empty text become [`CellValue::Empty`] and everything else is
/// written as its canonical text.
pub fn coerce_value(value: &Value) -> CellValue {
    if value.is_null() {
        return CellValue::Empty;
    }
    if !is_excel_supported_type(value) {
        return CellValue::text(value.to_string());
    }

    match value {
        Value::I16(v) => CellValue::Integer((*v).into()),
        Value::I32(v) => CellValue::Integer((*v).into()),
        Value::I64(v) => CellValue::Integer(*v),
        Value::F32(v) => CellValue::Number((*v).into()),
        Value::F64(v) => CellValue::Number(*v),
        Value::Decimal(text) => match text.trim().parse::<f64>() {
            Ok(v) => CellValue::Number(v),
            Err(_) => CellValue::text(text.as_str()),
        },
        Value::DateTime(dt) => CellValue::DateTime(*dt),
        Value::DateTimeOffset(dt) => CellValue::DateTime(normalize_offset_datetime(dt)),
        other => CellValue::text(other.to_string()),
    }
}

/// Produces the cell for `value` in `column`.
///
/// Boolean text substitution is applied first, then the column's format string
/// when it has no number format, then native coercion.
pub fn format_cell(value: &Value, column: &ColumnInfo) -> CellValue {
    let text = value.to_string();
    match text.as_str() {
        "True" => {
            if let Some(true_text) = &column.true_text {
                return CellValue::text(true_text.as_str());
            }
        }
        "False" => {
            if let Some(false_text) = &column.false_text {
                return CellValue::text(false_text.as_str());
            }
        }
        _ => {}
    }

    if column.excel_number_format().is_none() {
        if let Some(format_string) = column.value_format_string() {
            return CellValue::text(format_value(format_string, value));
        }
    }

    coerce_value(value)
}

/// Converts a value without any column metadata, as used for property bags
/// and scalar sequences. Booleans and every numeric type stay native.
pub fn raw_cell(value: &Value) -> CellValue {
    match value {
        Value::Bool(v) => CellValue::Boolean(*v),
        Value::I8(v) => CellValue::Integer((*v).into()),
        Value::U8(v) => CellValue::Integer((*v).into()),
        Value::U16(v) => CellValue::Integer((*v).into()),
        Value::U32(v) => CellValue::Integer((*v).into()),
        Value::U64(v) => match i64::try_from(*v) {
            Ok(v) => CellValue::Integer(v),
            Err(_) => CellValue::Number(*v as f64),
        },
        other => coerce_value(other),
    }
}

/// Converts a timestamp with an offset into the clock time to write.
///
/// A zero offset yields the UTC instant, the local offset yields local time and
/// any other offset yields the clock time with the offset dropped.
pub fn normalize_offset_datetime(value: &DateTime<FixedOffset>) -> NaiveDateTime {
    if value.offset().local_minus_utc() == 0 {
        return value.naive_utc();
    }

    let local = value.with_timezone(&Local);
    if local.offset() == value.offset() {
        return local.naive_local();
    }

    value.naive_local()
}
