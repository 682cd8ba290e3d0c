//! Runtime value model handed to the serializer.
//!
//! A [`Value`] is anything that can be turned into worksheet rows: a scalar, a
//! described record, a property bag, or a sequence of any of those. Every value
//! carries enough type information ([`TypeInfo`]) for the formatter to decide
//! how it is laid out.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use uguid::Guid;

use crate::schema::{AnyRecord, Record, Schema};

/// The scalar types a worksheet cell can hold without further decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    Char,
    String,
    DateTime,
    DateTimeOffset,
    Duration,
    Guid,
    Enum,
}

/// Runtime type of a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypeInfo {
    /// The type of a missing value.
    Null,
    /// A scalar type.
    Simple(SimpleKind),
    /// A statically described record type.
    Record(&'static Schema),
    /// A loosely typed property bag.
    Dynamic,
    /// A sequence, with its element type when one is known.
    Sequence(Option<Box<TypeInfo>>),
    /// Any other complex type, identified by name only.
    Object(String),
}

impl TypeInfo {
    /// Returns `true` for the scalar types listed in [`SimpleKind`].
    pub fn is_simple(&self) -> bool {
        matches!(self, TypeInfo::Simple(_))
    }

    /// Returns `true` for property-bag types.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, TypeInfo::Dynamic)
    }

    /// The element type of a typed sequence.
    pub fn element_type(&self) -> Option<&TypeInfo> {
        match self {
            TypeInfo::Sequence(Some(item_type)) => Some(item_type),
            _ => None,
        }
    }

    /// The record schema, if this is a record type.
    pub fn schema(&self) -> Option<&'static Schema> {
        match self {
            TypeInfo::Record(schema) => Some(schema),
            _ => None,
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeInfo::Null => write!(f, "null"),
            TypeInfo::Simple(kind) => write!(f, "{kind:?}"),
            TypeInfo::Record(schema) => write!(f, "{}", schema.type_name()),
            TypeInfo::Dynamic => write!(f, "PropertyBag"),
            TypeInfo::Sequence(Some(item_type)) => write!(f, "Sequence<{item_type}>"),
            TypeInfo::Sequence(None) => write!(f, "Sequence"),
            TypeInfo::Object(name) => write!(f, "{name}"),
        }
    }
}

/// A value of any shape the formatter accepts.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    /// Database null; treated like [`Value::Null`] when written.
    DbNull,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// Arbitrary-precision decimal, kept as its canonical text.
    Decimal(String),
    Char(char),
    String(String),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
    Duration(TimeDelta),
    Guid(Guid),
    /// Enumeration value, kept as its variant name.
    Enum(String),
    Record(Arc<dyn AnyRecord>),
    Dynamic(PropertyBag),
    List(Sequence),
    /// Opaque complex value with its type name and display text.
    Object { type_name: String, text: String },
}

impl Value {
    /// Wraps a single record.
    pub fn record<T: Record>(item: T) -> Value {
        Value::Record(Arc::new(item))
    }

    /// Builds a sequence of records whose element type is `T`, even when empty.
    pub fn records<T: Record>(items: impl IntoIterator<Item = T>) -> Value {
        Value::List(Sequence::new(
            TypeInfo::Record(T::schema()),
            items.into_iter().map(Value::record),
        ))
    }

    /// Builds a sequence of scalars whose element type is `T`.
    pub fn scalars<T: SimpleType + Into<Value>>(items: impl IntoIterator<Item = T>) -> Value {
        Value::List(Sequence::new(
            TypeInfo::Simple(T::simple_kind()),
            items.into_iter().map(Into::into),
        ))
    }

    /// Builds a sequence of property bags.
    pub fn dynamic_list(items: impl IntoIterator<Item = PropertyBag>) -> Value {
        Value::List(Sequence::new(
            TypeInfo::Dynamic,
            items.into_iter().map(Value::Dynamic),
        ))
    }

    /// Builds a sequence without a discoverable element type.
    pub fn untyped_list(items: impl IntoIterator<Item = Value>) -> Value {
        Value::List(Sequence::untyped(items))
    }

    /// Builds an enumeration value from its variant name.
    pub fn enumeration(variant: impl Into<String>) -> Value {
        Value::Enum(variant.into())
    }

    /// Builds a decimal value from its textual form.
    pub fn decimal(text: impl Into<String>) -> Value {
        Value::Decimal(text.into())
    }

    /// Builds an opaque complex value.
    pub fn object(type_name: impl Into<String>, text: impl Into<String>) -> Value {
        Value::Object {
            type_name: type_name.into(),
            text: text.into(),
        }
    }

    /// Returns `true` for [`Value::Null`] and [`Value::DbNull`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::DbNull)
    }

    /// Runtime type of this value.
    pub fn type_info(&self) -> TypeInfo {
        let kind = match self {
            Value::Null => return TypeInfo::Null,
            Value::DbNull => return TypeInfo::Object("DbNull".to_string()),
            Value::Record(record) => return TypeInfo::Record(record.record_schema()),
            Value::Dynamic(_) => return TypeInfo::Dynamic,
            Value::List(sequence) => {
                return TypeInfo::Sequence(sequence.item_type().cloned().map(Box::new))
            }
            Value::Object { type_name, .. } => return TypeInfo::Object(type_name.clone()),
            Value::Bool(_) => SimpleKind::Bool,
            Value::I8(_) => SimpleKind::I8,
            Value::I16(_) => SimpleKind::I16,
            Value::I32(_) => SimpleKind::I32,
            Value::I64(_) => SimpleKind::I64,
            Value::U8(_) => SimpleKind::U8,
            Value::U16(_) => SimpleKind::U16,
            Value::U32(_) => SimpleKind::U32,
            Value::U64(_) => SimpleKind::U64,
            Value::F32(_) => SimpleKind::F32,
            Value::F64(_) => SimpleKind::F64,
            Value::Decimal(_) => SimpleKind::Decimal,
            Value::Char(_) => SimpleKind::Char,
            Value::String(_) => SimpleKind::String,
            Value::DateTime(_) => SimpleKind::DateTime,
            Value::DateTimeOffset(_) => SimpleKind::DateTimeOffset,
            Value::Duration(_) => SimpleKind::Duration,
            Value::Guid(_) => SimpleKind::Guid,
            Value::Enum(_) => SimpleKind::Enum,
        };
        TypeInfo::Simple(kind)
    }
}

/// Canonical text form, used when a value has to be written as text.
///
/// Booleans render as `True`/`False`, which is what boolean substitution
/// compares against.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null | Value::DbNull => Ok(()),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Decimal(text) => f.write_str(text),
            Value::Char(c) => write!(f, "{c}"),
            Value::String(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::DateTimeOffset(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S %:z")),
            Value::Duration(delta) => write_duration(f, delta),
            Value::Guid(guid) => write!(f, "{guid}"),
            Value::Enum(variant) => f.write_str(variant),
            Value::Record(record) => f.write_str(record.record_schema().type_name()),
            Value::Dynamic(_) => f.write_str("PropertyBag"),
            Value::List(sequence) => match sequence.item_type() {
                Some(item_type) => write!(f, "Sequence<{item_type}>"),
                None => f.write_str("Sequence"),
            },
            Value::Object { text, .. } => f.write_str(text),
        }
    }
}

/// `[-][d.]hh:mm:ss[.fffffff]`
fn write_duration(f: &mut fmt::Formatter<'_>, delta: &TimeDelta) -> fmt::Result {
    if *delta < TimeDelta::zero() {
        f.write_str("-")?;
    }
    let delta = delta.abs();
    let total_seconds = delta.num_seconds();
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    let ticks = delta.subsec_nanos() / 100;

    if days > 0 {
        write!(f, "{days}.")?;
    }
    write!(f, "{hours:02}:{minutes:02}:{seconds:02}")?;
    if ticks > 0 {
        write!(f, ".{ticks:07}")?;
    }
    Ok(())
}

/// An ordered collection of values with an optional element type.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    item_type: Option<TypeInfo>,
    items: Vec<Value>,
}

impl Sequence {
    /// Creates a sequence whose element type is known.
    pub fn new(item_type: TypeInfo, items: impl IntoIterator<Item = Value>) -> Self {
        Sequence {
            item_type: Some(item_type),
            items: items.into_iter().collect(),
        }
    }

    /// Creates a sequence without element type information.
    pub fn untyped(items: impl IntoIterator<Item = Value>) -> Self {
        Sequence {
            item_type: None,
            items: items.into_iter().collect(),
        }
    }

    pub fn item_type(&self) -> Option<&TypeInfo> {
        self.item_type.as_ref()
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Insertion-ordered property bag.
///
/// Member names keep the order in which they were first inserted; replacing
/// the value of an existing member keeps its position.
#[derive(Debug, Clone, Default)]
pub struct PropertyBag {
    entries: Vec<(String, Value)>,
}

impl PropertyBag {
    /// Creates an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a member, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Builder form of [`PropertyBag::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Member names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = PropertyBag::new();
        for (name, value) in iter {
            bag.insert(name, value);
        }
        bag
    }
}

/// Rust types that map onto a [`SimpleKind`].
pub trait SimpleType {
    fn simple_kind() -> SimpleKind;
}

macro_rules! simple_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl SimpleType for $ty {
                fn simple_kind() -> SimpleKind {
                    SimpleKind::$variant
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

simple_value! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => DateTimeOffset,
    TimeDelta => Duration,
    Guid => Guid,
}

impl SimpleType for &str {
    fn simple_kind() -> SimpleKind {
        SimpleKind::String
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: SimpleType> SimpleType for Option<T> {
    fn simple_kind() -> SimpleKind {
        T::simple_kind()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<DateTime<chrono::Utc>> for Value {
    fn from(value: DateTime<chrono::Utc>) -> Self {
        Value::DateTimeOffset(value.fixed_offset())
    }
}

impl From<PropertyBag> for Value {
    fn from(value: PropertyBag) -> Self {
        Value::Dynamic(value)
    }
}

impl From<Sequence> for Value {
    fn from(value: Sequence) -> Self {
        Value::List(value)
    }
}
