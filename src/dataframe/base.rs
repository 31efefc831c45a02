use std::fmt;

use super::local::LocalFrame;
use crate::core::{Column, DataType, Schema, Table};
use crate::engine::SaveMode;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::io::csv::{dataframe_to_csv, ToCsvArgs};
use crate::plan::{ExecutionPlan, Operation};
use crate::series::Series;
use crate::session::Session;

/// Lazy, engine-backed DataFrame.
///
/// Holds a [`Session`] and an [`ExecutionPlan`]. Transformations return new
/// frames with a longer plan; only actions (`count`, `to_local`, `to_csv`,
/// ...) run the plan on the session's engine.
#[derive(Debug, Clone)]
pub struct DataFrame {
    session: Session,
    plan: ExecutionPlan,
}

impl DataFrame {
    pub(crate) fn new(session: Session, plan: ExecutionPlan) -> Self {
        DataFrame { session, plan }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    fn with(&self, op: Operation) -> DataFrame {
        DataFrame::new(self.session.clone(), self.plan.with(op))
    }

    pub fn schema(&self) -> Result<Schema> {
        self.session.engine().schema(&self.plan)
    }

    /// Column names
    pub fn columns(&self) -> Result<Vec<String>> {
        Ok(self.schema()?.names())
    }

    /// Column names with their types
    pub fn dtypes(&self) -> Result<Vec<(String, DataType)>> {
        Ok(self
            .schema()?
            .fields()
            .iter()
            .map(|f| (f.name.clone(), f.data_type))
            .collect())
    }

    /// Number of rows
    pub fn count(&self) -> Result<usize> {
        self.session.track("DataFrame", "count", || {
            Ok(self.session.engine().execute(&self.plan)?.num_rows())
        })
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> Result<(usize, usize)> {
        let table = self.session.engine().execute(&self.plan)?;
        Ok((table.num_rows(), table.num_columns()))
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> DataFrame {
        self.with(Operation::Limit(n))
    }

    /// Columns in the given order
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<DataFrame> {
        let available = self.columns()?;
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        if let Some(missing) = names.iter().find(|n| !available.contains(n)) {
            return Err(Error::ColumnNotFound(missing.clone()));
        }
        Ok(self.with(Operation::Select(names)))
    }

    /// Renames every column positionally
    pub fn set_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<DataFrame> {
        let current = self.columns()?.len();
        if names.len() != current {
            return Err(Error::InvalidArgument(format!(
                "Length mismatch: Expected axis has {} elements, new values have {} elements",
                current,
                names.len()
            )));
        }
        Ok(self.with(Operation::Rename(
            names.iter().map(|n| n.as_ref().to_string()).collect(),
        )))
    }

    /// One column as a [`Series`]
    pub fn column(&self, name: &str) -> Result<Series> {
        let frame = self.select(&[name])?;
        Ok(Series::new(frame, name.to_string()))
    }

    /// Row labels, generated per `compute.default_index_type`
    pub fn index(&self) -> Result<Index> {
        let parts = self.session.engine().execute_partitioned(&self.plan)?;
        let sizes: Vec<usize> = parts.iter().map(Table::num_rows).collect();
        Ok(Index::default_for(self.session.options().default_index_type(), &sizes))
    }

    /// Runs the plan and collects the result into a [`LocalFrame`]
    pub fn to_local(&self) -> Result<LocalFrame> {
        self.session.track("DataFrame", "to_local", || {
            let parts = self.session.engine().execute_partitioned(&self.plan)?;
            let sizes: Vec<usize> = parts.iter().map(Table::num_rows).collect();
            let index = Index::default_for(self.session.options().default_index_type(), &sizes);
            Ok(LocalFrame::from_engine(merge_partitions(parts)?, index))
        })
    }

    /// Runs the plan and returns the engine's table
    pub fn to_table(&self) -> Result<Table> {
        self.session.track("DataFrame", "to_table", || {
            self.session.engine().execute(&self.plan)
        })
    }

    /// Writes the frame as CSV.
    ///
    /// Without a path the CSV text is returned. With a path the engine
    /// writes a directory of part files. The index is not written unless
    /// `args.index` is `Some(true)`.
    pub fn to_csv(&self, path: Option<&str>, args: &ToCsvArgs) -> Result<Option<String>> {
        self.session
            .track("DataFrame", "to_csv", || dataframe_to_csv(self, path, args))
    }

    /// Writes the frame as Parquet part files under the directory `path`
    pub fn to_parquet(&self, path: &str, mode: SaveMode, num_files: Option<usize>) -> Result<()> {
        crate::io::parquet::write_parquet(self, path, mode, num_files)
    }

    /// The plan as indented text
    pub fn explain(&self) -> String {
        self.plan.explain()
    }

    /// Text rendering limited to `display.max_rows` rows
    pub fn render(&self) -> Result<String> {
        let max_rows = match self.session.options().display_max_rows() {
            Some(max_rows) => max_rows,
            None => return Ok(self.to_local()?.to_text(None)),
        };
        let local = self.head(max_rows + 1).to_local()?;
        if local.num_rows() > max_rows {
            Ok(format!(
                "{}\n\n[Showing only the first {} rows x {} columns]",
                local.to_text(Some(max_rows)),
                max_rows,
                local.num_columns()
            ))
        } else {
            Ok(local.to_text(None))
        }
    }
}

/// Concatenates partitions that share one schema
fn merge_partitions(parts: Vec<Table>) -> Result<Table> {
    let mut parts = parts.into_iter();
    let first = match parts.next() {
        Some(first) => first,
        None => return Ok(Table::empty()),
    };
    let mut columns: Vec<(String, DataType, Vec<_>)> = first
        .into_columns()
        .into_iter()
        .map(|c| (c.name().to_string(), c.data_type(), c.into_values()))
        .collect();
    for part in parts {
        if part.num_columns() != columns.len() {
            return Err(Error::Engine(format!(
                "partition has {} columns, expected {}",
                part.num_columns(),
                columns.len()
            )));
        }
        for (target, column) in columns.iter_mut().zip(part.into_columns()) {
            target.2.extend(column.into_values());
        }
    }
    let columns = columns
        .into_iter()
        .map(|(name, data_type, values)| Column::new(name, data_type, values))
        .collect::<Result<Vec<_>>>()?;
    Table::new(columns)
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(text) => write!(f, "{}", text),
            Err(err) => write!(f, "<DataFrame: {}>", err),
        }
    }
}
