//! Resolved column metadata.

use std::ops::Index;

use crate::schema::Member;

/// Order assigned to members that declare no order at all.
pub const UNORDERED: i32 = -1;

/// Formatting information for one worksheet column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Name of the member this column reads from.
    pub member_name: String,
    /// Resolved sort key.
    pub order: i32,
    /// Header text.
    pub header: String,
    /// Excluded from output when `true`.
    pub ignore: bool,
    /// Number format applied to the data cells after the rows are written.
    pub number_format: Option<String>,
    /// Template applied to each value before it is written.
    pub format_string: Option<String>,
    /// Text substituted for `True`.
    pub true_text: Option<String>,
    /// Text substituted for `False`.
    pub false_text: Option<String>,
    /// Whether the header was set explicitly on the column.
    pub header_defined: bool,
    /// Whether the format string should come from display metadata.
    pub use_display_format_string: bool,
}

impl ColumnInfo {
    /// Creates a column with default settings for `member_name`.
    pub fn new(member_name: impl Into<String>) -> Self {
        let member_name = member_name.into();
        ColumnInfo {
            header: member_name.clone(),
            member_name,
            order: UNORDERED,
            ignore: false,
            number_format: None,
            format_string: None,
            true_text: None,
            false_text: None,
            header_defined: false,
            use_display_format_string: false,
        }
    }

    /// Builds a column from a member's annotations.
    pub fn from_member(member: &Member, order: i32) -> Self {
        let mut column = ColumnInfo::new(&member.name);
        column.order = order;

        if let Some(attribute) = &member.column {
            if let Some(header) = &attribute.header {
                column.header = header.clone();
                column.header_defined = true;
            }
            column.ignore = attribute.ignore;
            column.number_format = attribute.number_format.clone();
            column.true_text = attribute.true_value.clone();
            column.false_text = attribute.false_value.clone();
            column.use_display_format_string = attribute.use_display_format_string;
        }

        column
    }

    /// The number format, if one is set and not blank.
    pub fn excel_number_format(&self) -> Option<&str> {
        self.number_format.as_deref().filter(|format| !format.is_empty())
    }

    /// The format string, if one is set and not blank.
    pub fn value_format_string(&self) -> Option<&str> {
        self.format_string
            .as_deref()
            .filter(|format| !format.trim().is_empty())
    }
}

/// Columns keyed by member name, in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfoCollection {
    columns: Vec<ColumnInfo>,
}

impl ColumnInfoCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column. Returns `false` and leaves the collection unchanged if
    /// a column for the same member already exists.
    pub fn push(&mut self, column: ColumnInfo) -> bool {
        if self.contains(&column.member_name) {
            return false;
        }
        self.columns.push(column);
        true
    }

    pub fn contains(&self, member_name: &str) -> bool {
        self.get(member_name).is_some()
    }

    pub fn get(&self, member_name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|column| column.member_name == member_name)
    }

    pub fn get_mut(&mut self, member_name: &str) -> Option<&mut ColumnInfo> {
        self.columns
            .iter_mut()
            .find(|column| column.member_name == member_name)
    }

    /// Member names in output order.
    pub fn keys(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|column| column.member_name.as_str())
            .collect()
    }

    /// Header texts in output order.
    pub fn headers(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|column| column.header.as_str())
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnInfo> {
        self.columns.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ColumnInfo> {
        self.columns.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Index<usize> for ColumnInfoCollection {
    type Output = ColumnInfo;

    fn index(&self, index: usize) -> &Self::Output {
        &self.columns[index]
    }
}

impl<'a> IntoIterator for &'a ColumnInfoCollection {
    type Item = &'a ColumnInfo;
    type IntoIter = std::slice::Iter<'a, ColumnInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

impl FromIterator<ColumnInfo> for ColumnInfoCollection {
    fn from_iter<I: IntoIterator<Item = ColumnInfo>>(iter: I) -> Self {
        let mut collection = ColumnInfoCollection::new();
        for column in iter {
            collection.push(column);
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnAttribute;

    #[test]
    fn test_column_defaults_to_member_name() {
        let column = ColumnInfo::new("Value1");
        assert_eq!(column.header, "Value1");
        assert_eq!(column.order, UNORDERED);
        assert!(!column.header_defined);
        assert!(column.excel_number_format().is_none());
    }

    #[test]
    fn test_column_from_member() {
        let member = Member::new("Value4").column(
            ColumnAttribute::with_header("Header 4")
                .order(-2)
                .number_format("???.???")
                .true_value("Yes"),
        );
        let column = ColumnInfo::from_member(&member, -2);

        assert_eq!(column.header, "Header 4");
        assert!(column.header_defined);
        assert_eq!(column.order, -2);
        assert_eq!(column.excel_number_format(), Some("???.???"));
        assert_eq!(column.true_text.as_deref(), Some("Yes"));
        assert!(column.false_text.is_none());
    }

    #[test]
    fn test_blank_formats_count_as_missing() {
        let mut column = ColumnInfo::new("Value1");
        column.number_format = Some(String::new());
        column.format_string = Some("   ".to_string());

        assert!(column.excel_number_format().is_none());
        assert!(column.value_format_string().is_none());
    }

    #[test]
    fn test_collection_keys_are_unique() {
        let mut columns = ColumnInfoCollection::new();
        assert!(columns.push(ColumnInfo::new("A")));
        assert!(columns.push(ColumnInfo::new("B")));
        assert!(!columns.push(ColumnInfo::new("A")));

        assert_eq!(columns.keys(), vec!["A", "B"]);
        assert_eq!(columns[1].member_name, "B");

        columns.get_mut("B").unwrap().header = "Bee".to_string();
        assert_eq!(columns.headers(), vec!["A", "Bee"]);
    }
}
