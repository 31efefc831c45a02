use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};

lazy_static! {
    /// One `name type` entry of a DDL string; the name may be backquoted
    static ref DDL_FIELD: Regex =
        Regex::new(r"^\s*(?:`([^`]+)`|([^\s:`]+))\s*:?\s+([A-Za-z]+)\s*$")
            .expect("DDL field pattern is valid");
}

/// Logical column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int64,
    Float64,
    String,
    Timestamp,
}

impl DataType {
    /// Engine-side (SQL) type name
    pub fn simple_name(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Int64 => "bigint",
            DataType::Float64 => "double",
            DataType::String => "string",
            DataType::Timestamp => "timestamp",
        }
    }

    /// pandas dtype name
    pub fn pandas_name(&self) -> &'static str {
        match self {
            DataType::Boolean => "bool",
            DataType::Int64 => "int64",
            DataType::Float64 => "float64",
            DataType::String => "object",
            DataType::Timestamp => "datetime64[ns]",
        }
    }

    /// Parses a DDL type name such as `long` or `string`
    pub fn from_ddl(name: &str) -> Option<DataType> {
        match name.to_ascii_lowercase().as_str() {
            "string" | "varchar" | "char" => Some(DataType::String),
            "long" | "bigint" | "int" | "integer" | "short" | "smallint" | "byte"
            | "tinyint" => Some(DataType::Int64),
            "double" | "float" | "real" | "decimal" => Some(DataType::Float64),
            "boolean" | "bool" => Some(DataType::Boolean),
            "timestamp" | "date" => Some(DataType::Timestamp),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float64)
    }

    /// Common type two columns can be unified to, if any
    pub fn unify(self, other: DataType) -> Option<DataType> {
        match (self, other) {
            (a, b) if a == b => Some(a),
            (a, b) if a.is_numeric() && b.is_numeric() => Some(DataType::Float64),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Named, typed column slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Field {
            name: name.into(),
            data_type,
            nullable: true,
        }
    }
}

/// Ordered list of fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Schema { fields }
    }

    pub fn empty() -> Self {
        Schema::default()
    }

    /// Parses a DDL schema string, e.g. `"A string, B string, C long"`.
    ///
    /// Field names must be unique.
    pub fn from_ddl(ddl: &str) -> Result<Self> {
        let mut fields = Vec::new();
        let mut seen = HashSet::new();
        for entry in ddl.split(',') {
            let caps = DDL_FIELD.captures(entry).ok_or_else(|| {
                Error::invalid_argument(format!("Cannot parse schema entry '{}'", entry.trim()))
            })?;
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let type_name = &caps[3];
            let data_type = DataType::from_ddl(type_name).ok_or_else(|| {
                Error::invalid_argument(format!(
                    "Unsupported data type '{}' for column '{}'",
                    type_name, name
                ))
            })?;
            if !seen.insert(name.clone()) {
                return Err(Error::invalid_argument("Found non-unique column index"));
            }
            fields.push(Field::new(name, data_type));
        }
        Ok(Schema { fields })
    }

    /// Renders the schema back to DDL form
    pub fn to_ddl(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("`{}` {}", f.name, f.data_type.simple_name()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, i: usize) -> Option<&Field> {
        self.fields.get(i)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}
