//! Composite format strings with a single positional argument.
//!
//! Supports `{0}`, `{0,alignment}`, `{0:spec}` and `{0,alignment:spec}`
//! placeholders plus `{{`/`}}` escapes. Numbers accept the standard
//! `C`/`D`/`E`/`F`/`G`/`N`/`P`/`X` specifiers and custom `0`/`#` patterns.
//! Dates accept the standard one-letter patterns, custom `yyyy-MM-dd` style
//! patterns and chrono `%` patterns. Other values ignore the spec.
//!
//! Formatting never fails: placeholders for other argument indices are kept
//! verbatim and a spec that cannot be applied falls back to the canonical text
//! of the value.

use std::fmt::Write;

use chrono::{Datelike, FixedOffset, Local, NaiveDateTime, TimeZone, Timelike};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::value::Value;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{|\}\}|\{(\d+)(?:\s*,\s*(-?\d+))?(?::([^{}]*))?\}").unwrap()
});

static STANDARD_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z])(\d{1,2})?$").unwrap());

/// Upper bound on fraction digits for custom numeric patterns, matching the
/// two-digit precision of the standard specifiers.
const MAX_FRACTION_DIGITS: usize = 99;

/// Applies `template` to `value`.
///
/// # Examples
///
/// ```
/// use xlsx_formatter_rs::format_string::format_value;
/// use xlsx_formatter_rs::value::Value;
///
/// assert_eq!(format_value("{0:F1} kg", &Value::F64(2.26)), "2.3 kg");
/// assert_eq!(format_value("[{0,4}]", &Value::I32(7)), "[   7]");
/// ```
pub fn format_value(template: &str, value: &Value) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let whole = &caps[0];
            match whole {
                "{{" => return "{".to_string(),
                "}}" => return "}".to_string(),
                _ => {}
            }
            if caps[1].parse::<usize>().ok() != Some(0) {
                return whole.to_string();
            }

            let text = format_argument(value, caps.get(3).map_or("", |m| m.as_str()));
            match caps.get(2).and_then(|m| m.as_str().parse::<i64>().ok()) {
                Some(width) => align(&text, width),
                None => text,
            }
        })
        .into_owned()
}

fn align(text: &str, alignment: i64) -> String {
    let width = usize::try_from(alignment.unsigned_abs()).unwrap_or(usize::MAX);
    if alignment < 0 {
        pad_end(text, width, ' ')
    } else {
        pad_start(text, width, ' ')
    }
}

/// Left-pads `text` with `fill` to `width` characters. Unlike `format!`
/// widths, `width` is not limited to `u16`.
fn pad_start(text: &str, width: usize, fill: char) -> String {
    let missing = width.saturating_sub(text.chars().count());
    let mut out = String::with_capacity(text.len() + missing);
    out.extend(std::iter::repeat(fill).take(missing));
    out.push_str(text);
    out
}

fn pad_end(text: &str, width: usize, fill: char) -> String {
    let missing = width.saturating_sub(text.chars().count());
    let mut out = String::with_capacity(text.len() + missing);
    out.push_str(text);
    out.extend(std::iter::repeat(fill).take(missing));
    out
}

/// Formats a single value with a format spec (the part after `:`).
pub fn format_argument(value: &Value, spec: &str) -> String {
    if value.is_null() {
        return String::new();
    }
    if spec.is_empty() {
        return value.to_string();
    }

    let formatted = match value {
        Value::DateTime(dt) => format_date(&DateParts::naive(*dt), spec),
        Value::DateTimeOffset(dt) => {
            format_date(&DateParts::with_offset(dt.naive_local(), *dt.offset()), spec)
        }
        _ => Number::from_value(value).and_then(|number| format_number(&number, spec)),
    };

    formatted.unwrap_or_else(|| {
        log::debug!("format spec {spec:?} does not apply to {value:?}");
        value.to_string()
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    fn from_value(value: &Value) -> Option<Number> {
        Some(match value {
            Value::I8(v) => Number::Int((*v).into()),
            Value::I16(v) => Number::Int((*v).into()),
            Value::I32(v) => Number::Int((*v).into()),
            Value::I64(v) => Number::Int((*v).into()),
            Value::U8(v) => Number::Int((*v).into()),
            Value::U16(v) => Number::Int((*v).into()),
            Value::U32(v) => Number::Int((*v).into()),
            Value::U64(v) => Number::Int((*v).into()),
            Value::F32(v) => Number::Float((*v).into()),
            Value::F64(v) => Number::Float(*v),
            Value::Decimal(text) => {
                let text = text.trim();
                match text.parse::<i128>() {
                    Ok(v) => Number::Int(v),
                    Err(_) => Number::Float(text.parse::<f64>().ok()?),
                }
            }
            _ => return None,
        })
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

fn format_number(number: &Number, spec: &str) -> Option<String> {
    if let Some(caps) = STANDARD_NUMERIC.captures(spec) {
        let precision = caps.get(2).and_then(|m| m.as_str().parse::<usize>().ok());
        return standard_number(number, &caps[1], precision);
    }
    if spec.contains(['0', '#']) {
        return Some(custom_number(number.as_f64(), spec));
    }
    None
}

fn standard_number(number: &Number, letter: &str, precision: Option<usize>) -> Option<String> {
    let text = match letter {
        "F" | "f" => fixed(number, precision.unwrap_or(2)),
        "N" | "n" => grouped(&fixed(number, precision.unwrap_or(2))),
        "C" | "c" => {
            let text = grouped(&fixed(number, precision.unwrap_or(2)));
            match text.strip_prefix('-') {
                Some(abs) => format!("-¤{abs}"),
                None => format!("¤{text}"),
            }
        }
        "P" | "p" => {
            let percent = Number::Float(number.as_f64() * 100.0);
            format!("{} %", grouped(&fixed(&percent, precision.unwrap_or(2))))
        }
        "E" | "e" => exponential(number.as_f64(), precision.unwrap_or(6), letter == "E"),
        "D" | "d" => match number {
            Number::Int(v) => {
                let width = precision.unwrap_or(0);
                let digits = format!("{:0width$}", v.unsigned_abs());
                if *v < 0 {
                    format!("-{digits}")
                } else {
                    digits
                }
            }
            Number::Float(_) => return None,
        },
        "X" | "x" => match number {
            Number::Int(v) => {
                let width = precision.unwrap_or(0);
                let bits = if *v < 0 { *v as i64 as u64 } else { *v as u64 };
                if letter == "X" {
                    format!("{bits:0width$X}")
                } else {
                    format!("{bits:0width$x}")
                }
            }
            Number::Float(_) => return None,
        },
        "G" | "g" | "R" | "r" => match number {
            Number::Int(v) => v.to_string(),
            Number::Float(v) => v.to_string(),
        },
        _ => return None,
    };
    Some(text)
}

fn fixed(number: &Number, precision: usize) -> String {
    match number {
        Number::Int(v) if precision == 0 => v.to_string(),
        Number::Int(v) => format!("{v}.{}", "0".repeat(precision)),
        Number::Float(v) => format!("{v:.precision$}"),
    }
}

/// Inserts thousands separators into the integer part of a plain number.
fn grouped(text: &str) -> String {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rest, None),
    };

    let mut out = String::from(sign);
    out.push_str(&group_digits(int_part));
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn exponential(value: f64, precision: usize, upper: bool) -> String {
    let text = format!("{value:.precision$e}");
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    let marker = if upper { 'E' } else { 'e' };
    format!("{mantissa}{marker}{sign}{:03}", exponent.unsigned_abs())
}

/// Custom numeric pattern such as `#,##0.00`, `0.###` or `0%`.
fn custom_number(value: f64, pattern: &str) -> String {
    let value = if pattern.contains('%') { value * 100.0 } else { value };

    let is_placeholder = |c: char| matches!(c, '0' | '#');
    let (Some(first), Some(last)) = (pattern.find(is_placeholder), pattern.rfind(is_placeholder))
    else {
        return pattern.to_string();
    };
    let prefix = &pattern[..first];
    let body = &pattern[first..=last];
    let suffix = &pattern[last + 1..];

    let (int_pattern, frac_pattern) = body.split_once('.').unwrap_or((body, ""));
    let min_int = int_pattern.chars().filter(|c| *c == '0').count();
    let use_grouping = int_pattern.contains(',');
    let required_frac = frac_pattern.chars().filter(|c| *c == '0').count();
    let total_frac = (required_frac + frac_pattern.chars().filter(|c| *c == '#').count())
        .min(MAX_FRACTION_DIGITS);

    let rounded = format!("{:.total_frac$}", value.abs());
    let (int_digits, frac_digits) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

    let mut frac_digits = frac_digits.to_string();
    while frac_digits.len() > required_frac && frac_digits.ends_with('0') {
        frac_digits.pop();
    }

    let int_digits = int_digits.trim_start_matches('0');
    let mut int_text = pad_start(int_digits, min_int, '0');
    if use_grouping {
        int_text = group_digits(&int_text);
    }

    let is_zero = int_digits.is_empty() && frac_digits.chars().all(|c| c == '0');
    let mut out = String::new();
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(prefix);
    out.push_str(&int_text);
    if !frac_digits.is_empty() {
        out.push('.');
        out.push_str(&frac_digits);
    }
    out.push_str(suffix);
    out
}

struct DateParts {
    local: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl DateParts {
    fn naive(local: NaiveDateTime) -> Self {
        DateParts {
            local,
            offset: None,
        }
    }

    fn with_offset(local: NaiveDateTime, offset: FixedOffset) -> Self {
        DateParts {
            local,
            offset: Some(offset),
        }
    }

    /// Offset used for `z` tokens; naive values report the local offset.
    fn effective_offset(&self) -> FixedOffset {
        self.offset.unwrap_or_else(|| {
            Local
                .offset_from_local_datetime(&self.local)
                .single()
                .unwrap_or_else(|| *Local::now().offset())
        })
    }
}

fn format_date(date: &DateParts, spec: &str) -> Option<String> {
    if spec.contains('%') {
        return strftime(date, spec);
    }

    let pattern = match spec {
        "d" => "MM/dd/yyyy",
        "D" => "dddd, dd MMMM yyyy",
        "f" => "dddd, dd MMMM yyyy HH:mm",
        "F" => "dddd, dd MMMM yyyy HH:mm:ss",
        "g" => "MM/dd/yyyy HH:mm",
        "G" => "MM/dd/yyyy HH:mm:ss",
        "m" | "M" => "MMMM dd",
        "y" | "Y" => "yyyy MMMM",
        "t" => "HH:mm",
        "T" => "HH:mm:ss",
        "s" => "yyyy'-'MM'-'dd'T'HH':'mm':'ss",
        "u" => "yyyy'-'MM'-'dd HH':'mm':'ss'Z'",
        "o" | "O" => "yyyy'-'MM'-'dd'T'HH':'mm':'ss'.'fffffffK",
        other => other,
    };
    Some(custom_date(date, pattern))
}

fn strftime(date: &DateParts, spec: &str) -> Option<String> {
    let mut out = String::new();
    let result = match date.offset {
        Some(offset) => {
            let dt = offset.from_local_datetime(&date.local).single()?;
            write!(out, "{}", dt.format(spec))
        }
        None => write!(out, "{}", date.local.format(spec)),
    };
    result.ok().map(|_| out)
}

/// Renders custom date patterns made of `y M d H h m s f F t z K` runs, with
/// quoted and backslash-escaped literals.
fn custom_date(date: &DateParts, pattern: &str) -> String {
    let dt = &date.local;
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' | '"' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&q| q == c)
                    .map_or(chars.len(), |p| i + 1 + p);
                out.extend(&chars[i + 1..end]);
                i = end + 1;
                continue;
            }
            '\\' => {
                if let Some(next) = chars.get(i + 1) {
                    out.push(*next);
                }
                i += 2;
                continue;
            }
            _ => {}
        }

        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        match c {
            'y' => {
                let year = dt.year();
                match run {
                    1 => out.push_str(&year.rem_euclid(100).to_string()),
                    2 => out.push_str(&format!("{:02}", year.rem_euclid(100))),
                    _ => {
                        if year < 0 {
                            out.push('-');
                        }
                        out.push_str(&pad_start(&year.unsigned_abs().to_string(), run, '0'));
                    }
                }
            }
            'M' => match run {
                1 => out.push_str(&dt.month().to_string()),
                2 => out.push_str(&format!("{:02}", dt.month())),
                3 => out.push_str(&dt.format("%b").to_string()),
                _ => out.push_str(&dt.format("%B").to_string()),
            },
            'd' => match run {
                1 => out.push_str(&dt.day().to_string()),
                2 => out.push_str(&format!("{:02}", dt.day())),
                3 => out.push_str(&dt.format("%a").to_string()),
                _ => out.push_str(&dt.format("%A").to_string()),
            },
            'H' => out.push_str(&pad(dt.hour(), run)),
            'h' => {
                let hour = match dt.hour() % 12 {
                    0 => 12,
                    h => h,
                };
                out.push_str(&pad(hour, run));
            }
            'm' => out.push_str(&pad(dt.minute(), run)),
            's' => out.push_str(&pad(dt.second(), run)),
            'f' | 'F' => {
                let digits = run.min(9);
                let fraction = format!("{:09}", dt.nanosecond() % 1_000_000_000);
                let fraction = &fraction[..digits];
                if c == 'F' {
                    let trimmed = fraction.trim_end_matches('0');
                    if trimmed.is_empty() && out.ends_with('.') {
                        out.pop();
                    }
                    out.push_str(trimmed);
                } else {
                    out.push_str(fraction);
                }
            }
            't' => {
                let designator = if dt.hour() < 12 { "AM" } else { "PM" };
                out.push_str(if run == 1 { &designator[..1] } else { designator });
            }
            'z' => {
                let seconds = date.effective_offset().local_minus_utc();
                let sign = if seconds < 0 { '-' } else { '+' };
                let hours = seconds.abs() / 3600;
                let minutes = (seconds.abs() % 3600) / 60;
                let _ = match run {
                    1 => write!(out, "{sign}{hours}"),
                    2 => write!(out, "{sign}{hours:02}"),
                    _ => write!(out, "{sign}{hours:02}:{minutes:02}"),
                };
            }
            'K' => {
                if let Some(offset) = date.offset {
                    let seconds = offset.local_minus_utc();
                    let sign = if seconds < 0 { '-' } else { '+' };
                    let _ = write!(
                        out,
                        "{sign}{:02}:{:02}",
                        seconds.abs() / 3600,
                        (seconds.abs() % 3600) / 60
                    );
                }
            }
            _ => out.extend(std::iter::repeat(c).take(run)),
        }
        i += run;
    }

    out
}

fn pad(value: u32, run: usize) -> String {
    if run == 1 {
        value.to_string()
    } else {
        format!("{value:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, s))
            .unwrap()
    }

    #[test]
    fn test_plain_placeholder_and_escapes() {
        assert_eq!(format_value("{0}", &Value::from("abc")), "abc");
        assert_eq!(format_value("<{0}>", &Value::I32(5)), "<5>");
        assert_eq!(format_value("{{{0}}}", &Value::I32(5)), "{5}");
        assert_eq!(format_value("{0} and {1}", &Value::I32(5)), "5 and {1}");
        assert_eq!(format_value("no placeholder", &Value::I32(5)), "no placeholder");
        assert_eq!(format_value("[{0}]", &Value::Null), "[]");
        assert_eq!(format_value("{0}", &Value::Bool(true)), "True");
    }

    #[test]
    fn test_alignment() {
        assert_eq!(format_value("{0,5}", &Value::from("ab")), "   ab");
        assert_eq!(format_value("{0,-5}|", &Value::from("ab")), "ab   |");
        assert_eq!(format_value("{0,8:F2}", &Value::F64(3.14159)), "    3.14");
    }

    #[test]
    fn test_widths_beyond_u16() {
        let padded = format_value("{0,70000}", &Value::I32(1));
        assert_eq!(padded.len(), 70000);
        assert!(padded.ends_with(" 1"));

        let padded = format_value("{0,-70000}|", &Value::from("ab"));
        assert_eq!(padded.len(), 70001);
        assert!(padded.starts_with("ab "));

        let zeros = "0".repeat(70000);
        let digits = format_argument(&Value::I32(7), &zeros);
        assert_eq!(digits.len(), 70000);
        assert!(digits.ends_with("07"));

        let fraction = format_argument(&Value::F64(0.5), &format!("0.{zeros}"));
        assert_eq!(fraction.len(), 2 + MAX_FRACTION_DIGITS);
        assert!(fraction.starts_with("0.50"));

        let year = Value::DateTime(date(2024, 3, 9, 0, 0, 0));
        assert_eq!(format_argument(&year, "yyyyy"), "02024");
        assert_eq!(format_argument(&year, &"y".repeat(70000)).len(), 70000);
    }

    #[test]
    fn test_standard_numeric() {
        assert_eq!(format_argument(&Value::F64(1234.5678), "F2"), "1234.57");
        assert_eq!(format_argument(&Value::F64(1234.5678), "N1"), "1,234.6");
        assert_eq!(format_argument(&Value::I32(1234567), "N0"), "1,234,567");
        assert_eq!(format_argument(&Value::I32(-1234567), "N"), "-1,234,567.00");
        assert_eq!(format_argument(&Value::I32(42), "D5"), "00042");
        assert_eq!(format_argument(&Value::I32(-42), "D4"), "-0042");
        assert_eq!(format_argument(&Value::I32(255), "X4"), "00FF");
        assert_eq!(format_argument(&Value::I32(255), "x"), "ff");
        assert_eq!(format_argument(&Value::F64(0.125), "P1"), "12.5 %");
        assert_eq!(format_argument(&Value::F64(1234.5), "E2"), "1.23E+003");
        assert_eq!(format_argument(&Value::F64(0.00012), "e1"), "1.2e-004");
        assert_eq!(format_argument(&Value::decimal("9.5"), "F3"), "9.500");
        assert_eq!(format_argument(&Value::I64(7), "F1"), "7.0");
        assert_eq!(format_argument(&Value::F64(1234.5), "C"), "¤1,234.50");
    }

    #[test]
    fn test_custom_numeric() {
        assert_eq!(format_argument(&Value::F64(1234.5), "#,##0.00"), "1,234.50");
        assert_eq!(format_argument(&Value::F64(0.5), "0.###"), "0.5");
        assert_eq!(format_argument(&Value::F64(0.5), "#.##"), ".5");
        assert_eq!(format_argument(&Value::I32(7), "000"), "007");
        assert_eq!(format_argument(&Value::F64(0.25), "0%"), "25%");
        assert_eq!(format_argument(&Value::F64(-3.5), "$0.0"), "-$3.5");
    }

    #[test]
    fn test_inapplicable_spec_falls_back_to_text() {
        assert_eq!(format_argument(&Value::F64(1.5), "D"), "1.5");
        assert_eq!(format_argument(&Value::from("text"), "F2"), "text");
        assert_eq!(format_argument(&Value::Bool(false), "0.00"), "False");
        assert_eq!(format_argument(&Value::I32(3), "Q"), "3");
    }

    #[test]
    fn test_standard_date_patterns() {
        let value = Value::DateTime(date(2024, 3, 9, 14, 5, 7));
        assert_eq!(format_argument(&value, "d"), "03/09/2024");
        assert_eq!(format_argument(&value, "D"), "Saturday, 09 March 2024");
        assert_eq!(format_argument(&value, "t"), "14:05");
        assert_eq!(format_argument(&value, "T"), "14:05:07");
        assert_eq!(format_argument(&value, "g"), "03/09/2024 14:05");
        assert_eq!(format_argument(&value, "s"), "2024-03-09T14:05:07");
        assert_eq!(format_argument(&value, "u"), "2024-03-09 14:05:07Z");
        assert_eq!(format_argument(&value, "o"), "2024-03-09T14:05:07.0000000");
    }

    #[test]
    fn test_custom_date_patterns() {
        let value = Value::DateTime(date(2024, 3, 9, 14, 5, 7));
        assert_eq!(format_argument(&value, "yyyy-MM-dd"), "2024-03-09");
        assert_eq!(format_argument(&value, "d/M/yy"), "9/3/24");
        assert_eq!(format_argument(&value, "ddd, MMM d"), "Sat, Mar 9");
        assert_eq!(format_argument(&value, "h:mm tt"), "2:05 PM");
        assert_eq!(format_argument(&value, "'Day' d"), "Day 9");
        assert_eq!(format_argument(&value, "\\y yyyy"), "y 2024");
        assert_eq!(format_value("Due {0:dd.MM.yyyy}", &value), "Due 09.03.2024");
    }

    #[test]
    fn test_strftime_date_patterns() {
        let value = Value::DateTime(date(2024, 3, 9, 14, 5, 7));
        assert_eq!(format_argument(&value, "%Y/%m/%d"), "2024/03/09");
        // %z needs an offset; naive values fall back to canonical text
        assert_eq!(format_argument(&value, "%z"), "2024-03-09 14:05:07");

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let value = Value::DateTimeOffset(
            offset
                .from_local_datetime(&date(2024, 3, 9, 14, 5, 7))
                .unwrap(),
        );
        assert_eq!(format_argument(&value, "%H:%M %:z"), "14:05 +02:00");
        assert_eq!(format_argument(&value, "HH:mm zzz"), "14:05 +02:00");
        assert_eq!(format_argument(&value, "o"), "2024-03-09T14:05:07.0000000+02:00");
    }
}
