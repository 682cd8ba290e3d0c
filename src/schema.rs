//! Static type descriptions that drive column layout.
//!
//! A [`Schema`] lists the serializable members of a record type in declaration
//! order, together with the annotations that control how each member becomes a
//! worksheet column.

use std::fmt;

use crate::value::Value;

/// Per-member column annotations.
///
/// Every setting is optional; a member without a `ColumnAttribute` is still
/// serialized with default settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAttribute {
    /// Column header to use for this member.
    pub header: Option<String>,
    /// Explicit column order. `None` means the member has no column-specific order.
    pub order: Option<i32>,
    /// Leave this member out of the worksheet.
    pub ignore: bool,
    /// Number format applied to the data cells of this column.
    pub number_format: Option<String>,
    /// Text written instead of `True`.
    pub true_value: Option<String>,
    /// Text written instead of `False`.
    pub false_value: Option<String>,
    /// Take the format string from the member's display metadata.
    pub use_display_format_string: bool,
}

impl ColumnAttribute {
    /// Creates an attribute with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an attribute that only sets the header.
    pub fn with_header(header: impl Into<String>) -> Self {
        Self::new().header(header)
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn ignore(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn number_format(mut self, number_format: impl Into<String>) -> Self {
        self.number_format = Some(number_format.into());
        self
    }

    pub fn true_value(mut self, text: impl Into<String>) -> Self {
        self.true_value = Some(text.into());
        self
    }

    pub fn false_value(mut self, text: impl Into<String>) -> Self {
        self.false_value = Some(text.into());
        self
    }

    pub fn use_display_format_string(mut self, enabled: bool) -> Self {
        self.use_display_format_string = enabled;
        self
    }
}

/// Display metadata declared on a member, outside of any column settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayAttribute {
    /// Human-readable name.
    pub name: Option<String>,
    /// Display format string, e.g. `{0:D}`.
    pub format_string: Option<String>,
}

/// A serializable member of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member name; also the identity of the resulting column.
    pub name: String,
    /// Column-specific annotations.
    pub column: Option<ColumnAttribute>,
    /// General-purpose serialization order, used when the column sets no order.
    pub data_member_order: Option<i32>,
    /// Display metadata.
    pub display: Option<DisplayAttribute>,
}

impl Member {
    /// Creates a member without annotations.
    pub fn new(name: impl Into<String>) -> Self {
        Member {
            name: name.into(),
            column: None,
            data_member_order: None,
            display: None,
        }
    }

    pub fn column(mut self, column: ColumnAttribute) -> Self {
        self.column = Some(column);
        self
    }

    pub fn data_member_order(mut self, order: i32) -> Self {
        self.data_member_order = Some(order);
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display.get_or_insert_with(DisplayAttribute::default).name = Some(name.into());
        self
    }

    pub fn display_format(mut self, format_string: impl Into<String>) -> Self {
        self.display
            .get_or_insert_with(DisplayAttribute::default)
            .format_string = Some(format_string.into());
        self
    }
}

/// Description of a record type: its name and its members in declaration order.
///
/// # Examples
///
/// ```
/// use xlsx_formatter_rs::schema::{ColumnAttribute, Member, Schema};
///
/// let schema = Schema::new("Order")
///     .member(Member::new("Id"))
///     .member(Member::new("Total").column(ColumnAttribute::with_header("Total (EUR)")));
///
/// assert_eq!(schema.members().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    type_name: String,
    members: Vec<Member>,
}

impl Schema {
    /// Creates a schema without members.
    pub fn new(type_name: impl Into<String>) -> Self {
        Schema {
            type_name: type_name.into(),
            members: Vec::new(),
        }
    }

    /// Appends a member. A member whose name is already declared is ignored.
    pub fn member(mut self, member: Member) -> Self {
        if self.get(&member.name).is_none() {
            self.members.push(member);
        }
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.name == name)
    }
}

/// A type whose members can be written as worksheet columns.
///
/// # Examples
///
/// ```
/// use once_cell::sync::Lazy;
/// use xlsx_formatter_rs::schema::{Member, Record, Schema};
/// use xlsx_formatter_rs::value::Value;
///
/// #[derive(Debug)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// static POINT: Lazy<Schema> =
///     Lazy::new(|| Schema::new("Point").member(Member::new("x")).member(Member::new("y")));
///
/// impl Record for Point {
///     fn schema() -> &'static Schema {
///         &POINT
///     }
///
///     fn member(&self, name: &str) -> Value {
///         match name {
///             "x" => self.x.into(),
///             "y" => self.y.into(),
///             _ => Value::Null,
///         }
///     }
/// }
/// ```
pub trait Record: fmt::Debug + Send + Sync + 'static {
    /// The static description of this type.
    fn schema() -> &'static Schema;

    /// Reads a member by name; unknown names yield [`Value::Null`].
    fn member(&self, name: &str) -> Value;
}

/// Object-safe view of a [`Record`], used inside [`Value::Record`].
pub trait AnyRecord: fmt::Debug + Send + Sync {
    fn record_schema(&self) -> &'static Schema;

    fn member_value(&self, name: &str) -> Value;
}

impl<T: Record> AnyRecord for T {
    fn record_schema(&self) -> &'static Schema {
        T::schema()
    }

    fn member_value(&self, name: &str) -> Value {
        self.member(name)
    }
}
