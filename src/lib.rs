pub mod cell;
pub mod column;
pub mod context;
pub mod document;
pub mod error;
pub mod format_string;
pub mod formatter;
pub mod introspect;
pub mod resolver;
pub mod schema;
pub mod serializer;
pub mod value;

#[cfg(test)]
mod test_data;

pub use context::SerializationContext;
pub use document::{StyleHook, XlsxDocument};
pub use error::DocumentError;
pub use formatter::{XlsxFormatter, XlsxFormatterOptions};
pub use schema::{ColumnAttribute, Member, Record, Schema};
pub use value::{PropertyBag, Value};
