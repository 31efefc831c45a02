use serde::{Deserialize, Serialize};

use super::data_value::DataValue;
use super::schema::{DataType, Field};
use crate::error::{Error, Result};

/// A named, typed vector of values. Nulls are allowed in every type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    data_type: DataType,
    values: Vec<DataValue>,
}

impl Column {
    /// Creates a column, checking that every non-null value has `data_type`
    pub fn new(name: impl Into<String>, data_type: DataType, values: Vec<DataValue>) -> Result<Self> {
        let name = name.into();
        if let Some(bad) = values
            .iter()
            .find(|v| !v.is_null() && v.data_type() != Some(data_type))
        {
            return Err(Error::InvalidArgument(format!(
                "Column '{}' of type {} cannot hold value {:?}",
                name, data_type, bad
            )));
        }
        Ok(Column {
            name,
            data_type,
            values,
        })
    }

    /// Builds a column without type checking; callers guarantee consistency
    pub(crate) fn new_unchecked(name: impl Into<String>, data_type: DataType, values: Vec<DataValue>) -> Self {
        Column {
            name: name.into(),
            data_type,
            values,
        }
    }

    pub fn from_i64s(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new_unchecked(name, DataType::Int64, values.into_iter().map(DataValue::Int64).collect())
    }

    /// Floats; NaN entries are stored as nulls
    pub fn from_f64s(name: impl Into<String>, values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| if v.is_nan() { DataValue::Null } else { DataValue::Float64(v) })
            .collect();
        Self::new_unchecked(name, DataType::Float64, values)
    }

    pub fn from_bools(name: impl Into<String>, values: Vec<bool>) -> Self {
        Self::new_unchecked(name, DataType::Boolean, values.into_iter().map(DataValue::Boolean).collect())
    }

    pub fn from_strs(name: impl Into<String>, values: &[&str]) -> Self {
        Self::new_unchecked(name, DataType::String, values.iter().map(|s| DataValue::from(*s)).collect())
    }

    /// Nullable values of any supported primitive
    pub fn from_options<T: Into<DataValue>>(name: impl Into<String>, data_type: DataType, values: Vec<Option<T>>) -> Result<Self> {
        Self::new(name, data_type, values.into_iter().map(DataValue::from).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn field(&self) -> Field {
        Field::new(self.name.clone(), self.data_type)
    }

    pub fn values(&self) -> &[DataValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<DataValue> {
        self.values
    }

    pub fn get(&self, i: usize) -> Option<&DataValue> {
        self.values.get(i)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_na()).count()
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Converts every value to `target`; values that do not convert become null
    pub fn cast(&self, target: DataType) -> Column {
        let values = self
            .values
            .iter()
            .map(|v| v.cast(target).unwrap_or(DataValue::Null))
            .collect();
        Column::new_unchecked(self.name.clone(), target, values)
    }

    /// Rows `[offset, offset + len)`, clamped to the column length
    pub fn slice(&self, offset: usize, len: usize) -> Column {
        let start = offset.min(self.values.len());
        let end = offset.saturating_add(len).min(self.values.len());
        Column::new_unchecked(self.name.clone(), self.data_type, self.values[start..end].to_vec())
    }

    pub(crate) fn push(&mut self, value: DataValue) {
        self.values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_mixed_types() {
        let result = Column::new(
            "a",
            DataType::Int64,
            vec![DataValue::Int64(1), DataValue::from("x")],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_nullable_column() {
        let col = Column::from_options("b", DataType::String, vec![Some("one"), Some("two"), None]).unwrap();
        assert_eq!(col.len(), 3);
        assert_eq!(col.null_count(), 1);
        assert_eq!(col.get(2), Some(&DataValue::Null));
    }

    #[test]
    fn test_cast_and_slice() {
        let col = Column::from_i64s("n", vec![1, 2, 3]);
        let cast = col.cast(DataType::Float64);
        assert_eq!(cast.values()[0], DataValue::Float64(1.0));
        let sliced = col.slice(1, 10);
        assert_eq!(sliced.len(), 2);
    }
}
