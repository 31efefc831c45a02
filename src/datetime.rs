//! Datetime parsing used by `to_datetime` and by timestamp-typed CSV columns

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::{Column, DataType, DataValue};
use crate::error::{Error, Result};

/// Formats tried, in order, when no explicit format is given
const INFERRED_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const INFERRED_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

/// What to do with values that cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateErrors {
    /// Fail the whole conversion
    #[default]
    Raise,
    /// Replace unparseable values with null
    Coerce,
    /// Return the input unchanged if anything fails to parse
    Ignore,
}

impl FromStr for DateErrors {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "raise" => Ok(DateErrors::Raise),
            "coerce" => Ok(DateErrors::Coerce),
            "ignore" => Ok(DateErrors::Ignore),
            other => Err(Error::InvalidArgument(format!(
                "errors must be one of 'ignore', 'raise', or 'coerce', got '{}'",
                other
            ))),
        }
    }
}

/// Parses a timestamp in any of the commonly used layouts, including RFC 3339
pub fn infer_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for fmt in INFERRED_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    INFERRED_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses one value with an explicit `format`, or by inference when absent
pub fn parse_datetime(text: &str, format: Option<&str>) -> Option<NaiveDateTime> {
    match format {
        Some(fmt) => NaiveDateTime::parse_from_str(text.trim(), fmt)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text.trim(), fmt)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            }),
        None => infer_datetime(text),
    }
}

/// Integers are read as nanoseconds since the epoch
fn from_epoch_nanos(nanos: i64) -> Option<NaiveDateTime> {
    let secs = nanos.div_euclid(1_000_000_000);
    let sub = nanos.rem_euclid(1_000_000_000) as u32;
    DateTime::from_timestamp(secs, sub).map(|dt| dt.naive_utc())
}

fn convert_value(value: &DataValue, format: Option<&str>) -> Option<DataValue> {
    match value {
        DataValue::Null => Some(DataValue::Null),
        DataValue::Timestamp(_) => Some(value.clone()),
        DataValue::String(s) => parse_datetime(s, format).map(DataValue::Timestamp),
        DataValue::Int64(n) => from_epoch_nanos(*n).map(DataValue::Timestamp),
        DataValue::Float64(v) if v.is_nan() => Some(DataValue::Null),
        DataValue::Float64(v) => from_epoch_nanos(*v as i64).map(DataValue::Timestamp),
        DataValue::Boolean(_) => None,
    }
}

/// Converts a column to timestamps following pandas' `to_datetime` rules
pub fn to_datetime_column(column: &Column, format: Option<&str>, errors: DateErrors) -> Result<Column> {
    let mut values = Vec::with_capacity(column.len());
    for value in column.values() {
        match convert_value(value, format) {
            Some(v) => values.push(v),
            None => match errors {
                DateErrors::Raise => {
                    return Err(Error::InvalidArgument(format!(
                        "Unable to parse '{}' in column '{}' as datetime",
                        value,
                        column.name()
                    )))
                }
                DateErrors::Coerce => values.push(DataValue::Null),
                DateErrors::Ignore => return Ok(column.clone()),
            },
        }
    }
    Column::new(column.name(), DataType::Timestamp, values)
}
