//! Record types shared by the unit tests.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;

use crate::schema::{ColumnAttribute, Member, Record, Schema};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleTestItem {
    pub value1: String,
    pub value2: String,
}

impl SimpleTestItem {
    pub fn new(value1: &str, value2: &str) -> Self {
        SimpleTestItem {
            value1: value1.to_string(),
            value2: value2.to_string(),
        }
    }
}

static SIMPLE_TEST_ITEM: Lazy<Schema> = Lazy::new(|| {
    Schema::new("SimpleTestItem")
        .member(Member::new("Value1"))
        .member(Member::new("Value2"))
});

impl Record for SimpleTestItem {
    fn schema() -> &'static Schema {
        &SIMPLE_TEST_ITEM
    }

    fn member(&self, name: &str) -> Value {
        match name {
            "Value1" => self.value1.clone().into(),
            "Value2" => self.value2.clone().into(),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestEnum {
    First,
    Second,
}

impl TestEnum {
    pub fn name(self) -> &'static str {
        match self {
            TestEnum::First => "First",
            TestEnum::Second => "Second",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexTestItem {
    pub value1: String,
    pub value2: NaiveDateTime,
    pub value3: bool,
    pub value4: f64,
    pub value5: TestEnum,
    pub value6: String,
}

impl ComplexTestItem {
    /// An item dated 2024-01-15 with `value3 = true` and `value4 = 100.1`.
    pub fn sample(value1: &str) -> Self {
        ComplexTestItem {
            value1: value1.to_string(),
            value2: NaiveDate::from_ymd_opt(2024, 1, 15)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .unwrap(),
            value3: true,
            value4: 100.1,
            value5: TestEnum::First,
            value6: "Ignored".to_string(),
        }
    }
}

static COMPLEX_TEST_ITEM: Lazy<Schema> = Lazy::new(|| {
    Schema::new("ComplexTestItem")
        .member(Member::new("Value1"))
        .member(Member::new("Value2").column(ColumnAttribute::new().order(2)))
        .member(Member::new("Value3").column(ColumnAttribute::with_header("Header 3").order(1)))
        .member(
            Member::new("Value4").column(
                ColumnAttribute::with_header("Header 4")
                    .order(-2)
                    .number_format("???.???"),
            ),
        )
        .member(Member::new("Value5").column(ColumnAttribute::with_header("Header 5")))
        .member(Member::new("Value6").column(ColumnAttribute::new().ignore(true)))
});

impl Record for ComplexTestItem {
    fn schema() -> &'static Schema {
        &COMPLEX_TEST_ITEM
    }

    fn member(&self, name: &str) -> Value {
        match name {
            "Value1" => self.value1.clone().into(),
            "Value2" => self.value2.into(),
            "Value3" => self.value3.into(),
            "Value4" => self.value4.into(),
            "Value5" => Value::enumeration(self.value5.name()),
            "Value6" => self.value6.clone().into(),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanTestItem {
    pub value1: bool,
    pub value2: bool,
    pub value3: Option<bool>,
    pub value4: Option<bool>,
}

impl BooleanTestItem {
    pub fn new(value1: bool, value2: bool, value3: Option<bool>, value4: Option<bool>) -> Self {
        BooleanTestItem {
            value1,
            value2,
            value3,
            value4,
        }
    }
}

static BOOLEAN_TEST_ITEM: Lazy<Schema> = Lazy::new(|| {
    let yes_no = ColumnAttribute::new().true_value("Yes").false_value("No");
    Schema::new("BooleanTestItem")
        .member(Member::new("Value1"))
        .member(Member::new("Value2").column(yes_no.clone()))
        .member(Member::new("Value3"))
        .member(Member::new("Value4").column(yes_no))
});

impl Record for BooleanTestItem {
    fn schema() -> &'static Schema {
        &BOOLEAN_TEST_ITEM
    }

    fn member(&self, name: &str) -> Value {
        match name {
            "Value1" => self.value1.into(),
            "Value2" => self.value2.into(),
            "Value3" => self.value3.into(),
            "Value4" => self.value4.into(),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormatStringTestItem {
    pub value1: NaiveDateTime,
    pub value2: Option<NaiveDateTime>,
    pub value3: Option<NaiveDateTime>,
    pub value4: NaiveDateTime,
}

static FORMAT_STRING_TEST_ITEM: Lazy<Schema> = Lazy::new(|| {
    Schema::new("FormatStringTestItem")
        .member(Member::new("Value1").display_format("{0:D}"))
        .member(
            Member::new("Value2")
                .display_format("{0:D}")
                .column(ColumnAttribute::new().use_display_format_string(true)),
        )
        .member(
            Member::new("Value3")
                .display_format("{0:D}")
                .column(ColumnAttribute::new().use_display_format_string(false)),
        )
        .member(Member::new("Value4").column(ColumnAttribute::new().use_display_format_string(true)))
});

impl Record for FormatStringTestItem {
    fn schema() -> &'static Schema {
        &FORMAT_STRING_TEST_ITEM
    }

    fn member(&self, name: &str) -> Value {
        match name {
            "Value1" => self.value1.into(),
            "Value2" => self.value2.into(),
            "Value3" => self.value3.into(),
            "Value4" => self.value4.into(),
            _ => Value::Null,
        }
    }
}
