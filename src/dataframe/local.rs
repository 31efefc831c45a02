use std::fmt;

use crate::core::{Column, DataType, DataValue, Table};
use crate::error::{Error, Result};
use crate::index::Index;
use crate::io::csv::ToCsvArgs;

/// Eager, single-machine frame: row labels plus materialized columns.
///
/// This is what [`DataFrame::to_local`](crate::DataFrame::to_local) returns and
/// what [`Session::from_local`](crate::Session::from_local) accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFrame {
    index: Index,
    columns: Vec<Column>,
}

impl LocalFrame {
    /// Frame with a `0..n` index
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let table = Table::new(columns)?;
        Ok(Self::from_table(table))
    }

    /// Frame with explicit row labels
    pub fn with_index(index: Index, columns: Vec<Column>) -> Result<Self> {
        let table = Table::new(columns)?;
        if table.num_columns() > 0 && index.len() != table.num_rows() {
            return Err(Error::InvalidArgument(format!(
                "Length of index ({}) does not match number of rows ({})",
                index.len(),
                table.num_rows()
            )));
        }
        Ok(LocalFrame {
            index,
            columns: table.into_columns(),
        })
    }

    /// Frame over an engine table with a `0..n` index
    pub fn from_table(table: Table) -> Self {
        LocalFrame {
            index: Index::range(table.num_rows()),
            columns: table.into_columns(),
        }
    }

    /// Converts an engine result. Integer columns holding nulls become
    /// doubles, matching how pandas represents missing integers.
    pub(crate) fn from_engine(table: Table, index: Index) -> Self {
        let columns = table
            .into_columns()
            .into_iter()
            .map(|c| {
                if c.data_type() == DataType::Int64 && c.null_count() > 0 {
                    c.cast(DataType::Float64)
                } else {
                    c
                }
            })
            .collect();
        LocalFrame { index, columns }
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn columns(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_values(&self) -> &[Column] {
        &self.columns
    }

    pub fn dtypes(&self) -> Vec<(String, DataType)> {
        self.columns
            .iter()
            .map(|c| (c.name().to_string(), c.data_type()))
            .collect()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_columns())
    }

    /// Value at row position `row` of column `name`
    pub fn value(&self, row: usize, name: &str) -> Option<&DataValue> {
        self.column(name).and_then(|c| c.get(row))
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> LocalFrame {
        LocalFrame {
            index: self.index.head(n),
            columns: self.columns.iter().map(|c| c.slice(0, n)).collect(),
        }
    }

    /// Columns only; the index is dropped
    pub fn to_table(&self) -> Table {
        Table::new(self.columns.clone()).unwrap_or_default()
    }

    /// Writes CSV the way pandas does: the index is included unless
    /// `args.index` is `Some(false)`. Without a path the text is returned;
    /// with a path a single file is written.
    pub fn to_csv(&self, path: Option<&str>, args: &ToCsvArgs) -> Result<Option<String>> {
        crate::io::csv::local_to_csv(self, path, args)
    }

    /// Tabular text rendering showing at most `max_rows` rows
    pub fn to_text(&self, max_rows: Option<usize>) -> String {
        if self.columns.is_empty() || self.num_rows() == 0 {
            return format!(
                "Empty DataFrame\nColumns: [{}]\nIndex: []",
                self.columns().join(", ")
            );
        }
        let rows = max_rows.map_or(self.num_rows(), |m| m.min(self.num_rows()));

        let labels: Vec<String> = self.index.values()[..rows]
            .iter()
            .map(|v| v.to_string())
            .collect();
        let label_width = labels
            .iter()
            .map(|l| l.chars().count())
            .chain(self.index.name().map(|n| n.chars().count()))
            .max()
            .unwrap_or(0);

        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| c.values()[..rows].iter().map(|v| display_cell(v, c.data_type())).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|(c, values)| {
                values
                    .iter()
                    .map(|v| v.chars().count())
                    .chain(std::iter::once(c.name().chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(rows + 2);
        let mut header = " ".repeat(label_width);
        for (c, width) in self.columns.iter().zip(&widths) {
            header.push_str(&format!("  {:>width$}", c.name(), width = width));
        }
        lines.push(header);
        if let Some(name) = self.index.name() {
            lines.push(format!("{:<width$}", name, width = label_width));
        }
        for (i, label) in labels.iter().enumerate() {
            let mut line = format!("{:<width$}", label, width = label_width);
            for (values, width) in cells.iter().zip(&widths) {
                line.push_str(&format!("  {:>width$}", values[i], width = width));
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

fn display_cell(value: &DataValue, data_type: DataType) -> String {
    match (value, data_type) {
        (DataValue::Null, DataType::Float64) => "NaN".to_string(),
        (DataValue::Null, DataType::Timestamp) => "NaT".to_string(),
        (v, _) => v.to_string(),
    }
}

impl fmt::Display for LocalFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text(None))
    }
}
