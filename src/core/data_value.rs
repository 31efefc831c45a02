use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::schema::DataType;

/// Default timestamp rendering, matching pandas' default CSV output
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    /// Missing value
    Null,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    String(String),
    Timestamp(NaiveDateTime),
}

impl DataValue {
    /// Whether this is an explicit null
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Whether this value counts as missing: null or a NaN float
    pub fn is_na(&self) -> bool {
        match self {
            DataValue::Null => true,
            DataValue::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Type of the value, `None` for null
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            DataValue::Null => None,
            DataValue::Boolean(_) => Some(DataType::Boolean),
            DataValue::Int64(_) => Some(DataType::Int64),
            DataValue::Float64(_) => Some(DataType::Float64),
            DataValue::String(_) => Some(DataType::String),
            DataValue::Timestamp(_) => Some(DataType::Timestamp),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers widen to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Int64(v) => Some(*v as f64),
            DataValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            DataValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Converts the value to `target`. Returns `None` when the value cannot be
    /// represented in that type; nulls stay null.
    pub fn cast(&self, target: DataType) -> Option<DataValue> {
        if self.is_null() {
            return Some(DataValue::Null);
        }
        match (self, target) {
            (v, t) if v.data_type() == Some(t) => Some(v.clone()),
            (DataValue::Int64(v), DataType::Float64) => Some(DataValue::Float64(*v as f64)),
            (DataValue::Boolean(b), DataType::Int64) => Some(DataValue::Int64(*b as i64)),
            (DataValue::String(s), t) => parse_as(s, t),
            (v, DataType::String) => Some(DataValue::String(v.render(DEFAULT_TIMESTAMP_FORMAT))),
            _ => None,
        }
    }

    /// Text form used by CSV output. Missing values render as an empty string;
    /// callers substitute their null representation.
    pub fn render(&self, timestamp_format: &str) -> String {
        match self {
            DataValue::Null => String::new(),
            DataValue::Boolean(b) => if *b { "True" } else { "False" }.to_string(),
            DataValue::Int64(v) => v.to_string(),
            DataValue::Float64(v) if v.is_nan() => String::new(),
            DataValue::Float64(v) => format_float(*v),
            DataValue::String(s) => s.clone(),
            DataValue::Timestamp(ts) => ts.format(timestamp_format).to_string(),
        }
    }
}

/// Parses text into a value of the given type. Empty input and unparseable
/// input both produce `None`.
pub fn parse_as(text: &str, data_type: DataType) -> Option<DataValue> {
    if data_type == DataType::String {
        return Some(DataValue::String(text.to_string()));
    }
    let text = text.trim();
    match data_type {
        _ if text.is_empty() => None,
        DataType::String => Some(DataValue::String(text.to_string())),
        DataType::Int64 => text.parse::<i64>().ok().map(DataValue::Int64),
        DataType::Float64 => parse_float(text).map(DataValue::Float64),
        DataType::Boolean => parse_bool(text).map(DataValue::Boolean),
        DataType::Timestamp => crate::datetime::infer_datetime(text).map(DataValue::Timestamp),
    }
}

pub(crate) fn parse_float(text: &str) -> Option<f64> {
    match text {
        "NaN" | "nan" => Some(f64::NAN),
        "inf" | "Infinity" => Some(f64::INFINITY),
        "-inf" | "-Infinity" => Some(f64::NEG_INFINITY),
        _ => text.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Formats a float the way pandas writes it: integral values keep one
/// decimal place (`1.0`), magnitudes from `1e16` up or below `1e-4` use
/// exponent notation (`1e+16`, `2.5e-05`), everything else uses the shortest
/// round-trip form. The output always reads back as a float.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if v != 0.0 && (v.abs() >= 1e16 || v.abs() < 1e-4) {
        format_exponent(v)
    } else if v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// `1e16` -> `1e+16`, `2.5e-5` -> `2.5e-05`
fn format_exponent(v: f64) -> String {
    let raw = format!("{:e}", v);
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => raw,
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => write!(f, "None"),
            DataValue::Float64(v) if v.is_nan() => write!(f, "NaN"),
            other => write!(f, "{}", other.render(DEFAULT_TIMESTAMP_FORMAT)),
        }
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Int64(v)
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Float64(v)
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        DataValue::Boolean(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::String(v.to_string())
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::String(v)
    }
}

impl From<NaiveDateTime> for DataValue {
    fn from(v: NaiveDateTime) -> Self {
        DataValue::Timestamp(v)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => DataValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float_like_pandas() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-200.0), "-200.0");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(0.0), "0.0");
    }

    #[test]
    fn test_format_float_exponent() {
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(-1.5e17), "-1.5e+17");
        assert_eq!(format_float(1e100), "1e+100");
        assert_eq!(format_float(2.5e-5), "2.5e-05");
        assert_eq!(format_float(9999999999999998.0), "9999999999999998.0");
        assert_eq!(parse_float("1e+16"), Some(1e16));
        assert_eq!(parse_float("2.5e-05"), Some(2.5e-5));
    }

    #[test]
    fn test_cast_between_types() {
        assert_eq!(
            DataValue::Int64(3).cast(DataType::Float64),
            Some(DataValue::Float64(3.0))
        );
        assert_eq!(
            DataValue::from("42").cast(DataType::Int64),
            Some(DataValue::Int64(42))
        );
        assert_eq!(DataValue::from("x").cast(DataType::Int64), None);
        assert_eq!(DataValue::Null.cast(DataType::Int64), Some(DataValue::Null));
    }

    #[test]
    fn test_nan_is_na() {
        assert!(DataValue::Float64(f64::NAN).is_na());
        assert!(!DataValue::Float64(f64::NAN).is_null());
        assert!(DataValue::Null.is_na());
    }
}
