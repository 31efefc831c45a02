use serde::{Deserialize, Serialize};

use super::column::Column;
use super::data_value::DataValue;
use super::schema::Schema;
use crate::error::{Error, Result};

/// Engine-native result: ordered columns of equal length, no row labels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Creates a table; all columns must have the same length
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(Error::InvalidArgument(format!(
                    "Length mismatch: column '{}' has {} rows, expected {}",
                    bad.name(),
                    bad.len(),
                    expected
                )));
            }
        }
        Ok(Table { columns })
    }

    /// A table with no columns and no rows
    pub fn empty() -> Self {
        Table::default()
    }

    /// A table with the given schema and no rows
    pub fn empty_with_schema(schema: &Schema) -> Self {
        let columns = schema
            .fields()
            .iter()
            .map(|f| Column::new_unchecked(f.name.clone(), f.data_type, Vec::new()))
            .collect();
        Table { columns }
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.iter().map(Column::field).collect())
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_at(&self, i: usize) -> Option<&Column> {
        self.columns.get(i)
    }

    /// Values of row `i` in column order
    pub fn row(&self, i: usize) -> Option<Vec<&DataValue>> {
        if i >= self.num_rows() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values()[i]).collect())
    }

    /// Columns in the order given by `names`
    pub fn select(&self, names: &[String]) -> Result<Table> {
        let columns = names
            .iter()
            .map(|n| {
                self.column(n)
                    .cloned()
                    .ok_or_else(|| Error::ColumnNotFound(n.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Table { columns })
    }

    /// Renames every column positionally
    pub fn rename_all(self, names: &[String]) -> Result<Table> {
        if names.len() != self.columns.len() {
            return Err(Error::InvalidArgument(format!(
                "Length mismatch: expected {} names, got {}",
                self.columns.len(),
                names.len()
            )));
        }
        let columns = self
            .columns
            .into_iter()
            .zip(names)
            .map(|(c, n)| c.rename(n.clone()))
            .collect();
        Ok(Table { columns })
    }

    /// Rows `[offset, offset + len)`
    pub fn slice(&self, offset: usize, len: usize) -> Table {
        Table {
            columns: self.columns.iter().map(|c| c.slice(offset, len)).collect(),
        }
    }

    /// Splits the rows into `n` contiguous chunks of near-equal size.
    /// Always returns at least one chunk.
    pub fn partition(&self, n: usize) -> Vec<Table> {
        let n = n.max(1);
        let rows = self.num_rows();
        let base = rows / n;
        let extra = rows % n;
        let mut offset = 0;
        (0..n)
            .map(|i| {
                let len = base + usize::from(i < extra);
                let part = self.slice(offset, len);
                offset += len;
                part
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            Column::from_strs("name", &["Alice", "Bob", "Charlie"]),
            Column::from_i64s("amount", vec![100, -200, 300]),
        ])
        .unwrap()
    }

    #[test]
    fn test_length_mismatch() {
        let result = Table::new(vec![
            Column::from_i64s("a", vec![1, 2]),
            Column::from_i64s("b", vec![1]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_select_and_rename() {
        let table = sample();
        let selected = table.select(&["amount".to_string()]).unwrap();
        assert_eq!(selected.column_names(), vec!["amount"]);
        assert!(table.select(&["missing".to_string()]).is_err());

        let renamed = table.rename_all(&["n".to_string(), "a".to_string()]).unwrap();
        assert_eq!(renamed.column_names(), vec!["n", "a"]);
    }

    #[test]
    fn test_partition_covers_all_rows() {
        let parts = sample().partition(2);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].num_rows(), 2);
        assert_eq!(parts[1].num_rows(), 1);
        assert_eq!(sample().partition(0).len(), 1);
    }
}
