//! Engine-native CSV options
//!
//! The engine takes string key/value options the way distributed readers and
//! writers do (`header`, `sep`, `nullValue`, ...). The API layer translates
//! pandas-style arguments into this bag; callers may also pass options through
//! verbatim.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::DEFAULT_TIMESTAMP_FORMAT;
use crate::error::{Error, Result};

/// Keys the local engine understands
pub const KNOWN_KEYS: &[&str] = &[
    "header",
    "inferSchema",
    "sep",
    "delimiter",
    "comment",
    "nullValue",
    "quote",
    "escape",
    "timestampFormat",
    "dateFormat",
    "lineSep",
];

/// String key/value option bag for CSV sources and sinks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    entries: BTreeMap<String, String>,
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one option, replacing an existing value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set)
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Merges `other` over `self`
    pub fn extend(&mut self, other: &BTreeMap<String, String>) {
        for (k, v) in other {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Keys the engine will ignore
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|k| !KNOWN_KEYS.contains(k))
            .collect()
    }

    fn bool_option(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(v) => crate::core::data_value::parse_bool(v).ok_or_else(|| {
                Error::Engine(format!("Option '{}' expects true or false, got '{}'", key, v))
            }),
        }
    }

    fn single_byte(&self, key: &str) -> Result<Option<u8>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => {
                let bytes = v.as_bytes();
                if bytes.len() == 1 && bytes[0].is_ascii() {
                    Ok(Some(bytes[0]))
                } else if v == "\\t" {
                    Ok(Some(b'\t'))
                } else {
                    Err(Error::Engine(format!(
                        "Option '{}' must be a single ASCII character, got '{}'",
                        key, v
                    )))
                }
            }
        }
    }

    /// Whether the first line holds column names (default false)
    pub fn header(&self) -> Result<bool> {
        self.bool_option("header", false)
    }

    /// Whether column types are inferred from data (default false: all strings)
    pub fn infer_schema(&self) -> Result<bool> {
        self.bool_option("inferSchema", false)
    }

    /// Field separator; `sep` wins over `delimiter` (default `,`)
    pub fn separator(&self) -> Result<u8> {
        match self.single_byte("sep")? {
            Some(b) => Ok(b),
            None => Ok(self.single_byte("delimiter")?.unwrap_or(b',')),
        }
    }

    pub fn comment(&self) -> Result<Option<u8>> {
        self.single_byte("comment")
    }

    pub fn quote(&self) -> Result<u8> {
        Ok(self.single_byte("quote")?.unwrap_or(b'"'))
    }

    pub fn escape(&self) -> Result<Option<u8>> {
        self.single_byte("escape")
    }

    /// Text representing null (default empty)
    pub fn null_value(&self) -> &str {
        self.get("nullValue").unwrap_or("")
    }

    pub fn timestamp_format(&self) -> &str {
        self.get("timestampFormat")
            .or_else(|| self.get("dateFormat"))
            .unwrap_or(DEFAULT_TIMESTAMP_FORMAT)
    }

    pub fn line_separator(&self) -> &str {
        self.get("lineSep").unwrap_or("\n")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CsvOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = CsvOptions::new();
        for (k, v) in iter {
            options.set(k, v);
        }
        options
    }
}
