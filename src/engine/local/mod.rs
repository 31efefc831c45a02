//! # Local execution engine
//!
//! Evaluates plans in the current process. Rows are materialized eagerly; the
//! only parallelism is in writing output partitions.

mod csv_source;
pub(crate) mod csv_sink;
mod infer;
mod ops;
#[cfg(feature = "parquet")]
pub(crate) mod parquet;
pub(crate) mod paths;

use std::path::PathBuf;

use super::{ExecutionEngine, WriteRequest};
use crate::core::{Column, Table};
use crate::error::{Error, Result};
use crate::plan::{ExecutionPlan, Operation, Source};

pub use csv_sink::write_records;

/// In-process engine
#[derive(Debug, Clone)]
pub struct LocalEngine {
    parallelism: usize,
}

impl LocalEngine {
    /// Engine with one partition per CPU core
    pub fn new() -> Self {
        Self::with_parallelism(num_cpus::get())
    }

    pub fn with_parallelism(parallelism: usize) -> Self {
        LocalEngine {
            parallelism: parallelism.max(1),
        }
    }

    fn scan(&self, source: &Source) -> Result<Table> {
        match source {
            Source::Csv {
                paths,
                options,
                schema,
            } => csv_source::read_csv(paths, options, schema.as_ref()),
            Source::Parquet { paths, columns } => self.scan_parquet(paths, columns.as_deref()),
            Source::Memory(table) => Ok(Table::clone(table)),
            Source::Range { start, end, step } => range(*start, *end, *step),
            Source::Empty => Ok(Table::empty()),
        }
    }

    #[cfg(feature = "parquet")]
    fn scan_parquet(&self, paths: &[String], columns: Option<&[String]>) -> Result<Table> {
        parquet::read_parquet(paths, columns)
    }

    #[cfg(not(feature = "parquet"))]
    fn scan_parquet(&self, _paths: &[String], _columns: Option<&[String]>) -> Result<Table> {
        Err(Error::FeatureNotEnabled(
            "reading Parquet requires the 'parquet' feature".to_string(),
        ))
    }

    fn apply(&self, table: Table, op: &Operation) -> Result<Table> {
        match op {
            Operation::Select(names) => table.select(names),
            Operation::Rename(names) => table.rename_all(names),
            Operation::Limit(n) => Ok(table.slice(0, *n)),
            Operation::Union(others) => {
                let mut inputs = Vec::with_capacity(others.len() + 1);
                inputs.push(table);
                for other in others {
                    inputs.push(self.execute(other)?);
                }
                ops::union_all(inputs)
            }
            Operation::Melt {
                id_vars,
                value_vars,
                var_name,
                value_name,
            } => ops::melt(&table, id_vars, value_vars, var_name, value_name),
            Operation::GetDummies {
                columns,
                prefix_sep,
            } => ops::get_dummies(&table, columns, prefix_sep),
            Operation::ToTimestamp {
                column,
                format,
                errors,
            } => ops::to_timestamp(table, column, format.as_deref(), *errors),
        }
    }

    /// Partition count for a result of `rows` rows
    fn partitions_for(&self, rows: usize, requested: Option<usize>) -> usize {
        requested.unwrap_or_else(|| self.parallelism.min(rows)).max(1)
    }
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn range(start: i64, end: i64, step: i64) -> Result<Table> {
    if step == 0 {
        return Err(Error::InvalidArgument("range step must not be zero".to_string()));
    }
    let mut values = Vec::new();
    let mut current = start;
    while (step > 0 && current < end) || (step < 0 && current > end) {
        values.push(current);
        current = match current.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }
    Table::new(vec![Column::from_i64s("id", values)])
}

impl ExecutionEngine for LocalEngine {
    fn name(&self) -> &str {
        "local"
    }

    fn version(&self) -> Option<String> {
        Some(crate::VERSION.to_string())
    }

    fn default_parallelism(&self) -> usize {
        self.parallelism
    }

    fn execute(&self, plan: &ExecutionPlan) -> Result<Table> {
        let mut table = self.scan(plan.source())?;
        for op in plan.operations() {
            table = self.apply(table, op)?;
        }
        Ok(table)
    }

    fn execute_partitioned(&self, plan: &ExecutionPlan) -> Result<Vec<Table>> {
        let table = self.execute(plan)?;
        let n = self.partitions_for(table.num_rows(), None);
        Ok(table.partition(n))
    }

    fn write_csv(&self, plan: &ExecutionPlan, path: &str, request: &WriteRequest) -> Result<Vec<PathBuf>> {
        let table = self.execute(plan)?;
        let parts = table.partition(self.partitions_for(table.num_rows(), request.num_partitions));
        csv_sink::write_csv_partitions(path, request.mode, &parts, &request.options)
    }

    #[cfg(feature = "parquet")]
    fn write_parquet(&self, plan: &ExecutionPlan, path: &str, request: &WriteRequest) -> Result<Vec<PathBuf>> {
        let table = self.execute(plan)?;
        let parts = table.partition(self.partitions_for(table.num_rows(), request.num_partitions));
        parquet::write_parquet_partitions(path, request.mode, &parts)
    }
}
