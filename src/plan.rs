//! # Execution plans
//!
//! A [`DataFrame`](crate::DataFrame) never holds data. It holds an
//! [`ExecutionPlan`]: a source plus an ordered list of operations, which an
//! [`ExecutionEngine`](crate::engine::ExecutionEngine) evaluates on demand.

use std::fmt;
use std::sync::Arc;

use crate::core::{Schema, Table};
use crate::datetime::DateErrors;
use crate::engine::CsvOptions;

/// Where the rows of a plan come from
#[derive(Debug, Clone)]
pub enum Source {
    /// CSV files (or directories of part files)
    Csv {
        paths: Vec<String>,
        options: CsvOptions,
        /// Explicit schema; inferred or all-string when absent
        schema: Option<Schema>,
    },
    /// Parquet files (or directories of part files)
    Parquet {
        paths: Vec<String>,
        columns: Option<Vec<String>>,
    },
    /// Rows already materialized in memory
    Memory(Arc<Table>),
    /// Integer sequence in a single `id` column
    Range { start: i64, end: i64, step: i64 },
    /// No columns, no rows
    Empty,
}

/// Transformation applied to the rows produced so far
#[derive(Debug, Clone)]
pub enum Operation {
    /// Keep these columns, in this order
    Select(Vec<String>),
    /// Rename every column positionally
    Rename(Vec<String>),
    Limit(usize),
    /// Append the rows of other plans, aligning columns by name
    Union(Vec<ExecutionPlan>),
    /// Unpivot from wide to long format
    Melt {
        id_vars: Vec<String>,
        value_vars: Vec<String>,
        var_name: String,
        value_name: String,
    },
    /// Replace categorical columns by 0/1 indicator columns
    GetDummies {
        columns: Vec<String>,
        prefix_sep: String,
    },
    /// Convert a column to timestamps
    ToTimestamp {
        column: String,
        format: Option<String>,
        errors: DateErrors,
    },
}

impl Operation {
    fn name(&self) -> &'static str {
        match self {
            Operation::Select(_) => "Select",
            Operation::Rename(_) => "Rename",
            Operation::Limit(_) => "Limit",
            Operation::Union(_) => "Union",
            Operation::Melt { .. } => "Melt",
            Operation::GetDummies { .. } => "GetDummies",
            Operation::ToTimestamp { .. } => "ToTimestamp",
        }
    }
}

/// A source and the operations applied to it
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    source: Source,
    operations: Vec<Operation>,
}

impl ExecutionPlan {
    pub fn new(source: Source) -> Self {
        ExecutionPlan {
            source,
            operations: Vec::new(),
        }
    }

    /// Plan producing no columns and no rows
    pub fn empty() -> Self {
        Self::new(Source::Empty)
    }

    /// New plan with `op` appended
    pub fn with(&self, op: Operation) -> Self {
        let mut plan = self.clone();
        plan.operations.push(op);
        plan
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Indented, human-readable plan tree
    pub fn explain(&self) -> String {
        let mut out = String::new();
        self.explain_into(&mut out, 0);
        out
    }

    fn explain_into(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        for op in self.operations.iter().rev() {
            match op {
                Operation::Union(others) => {
                    out.push_str(&format!("{}Union ({} inputs)\n", pad, others.len() + 1));
                    for other in others {
                        other.explain_into(out, depth + 2);
                    }
                }
                other => out.push_str(&format!("{}{}\n", pad, describe_operation(other))),
            }
        }
        out.push_str(&format!("{}{}\n", pad, describe_source(&self.source)));
    }
}

fn describe_operation(op: &Operation) -> String {
    match op {
        Operation::Select(cols) => format!("{} [{}]", op.name(), cols.join(", ")),
        Operation::Rename(cols) => format!("{} [{}]", op.name(), cols.join(", ")),
        Operation::Limit(n) => format!("{} {}", op.name(), n),
        Operation::Melt {
            id_vars,
            value_vars,
            ..
        } => format!(
            "{} id=[{}] values=[{}]",
            op.name(),
            id_vars.join(", "),
            value_vars.join(", ")
        ),
        Operation::GetDummies { columns, .. } => format!("{} [{}]", op.name(), columns.join(", ")),
        Operation::ToTimestamp { column, .. } => format!("{} {}", op.name(), column),
        Operation::Union(_) => op.name().to_string(),
    }
}

fn describe_source(source: &Source) -> String {
    match source {
        Source::Csv {
            paths,
            options,
            schema,
        } => {
            let opts: Vec<String> = options
                .entries()
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            let mut line = format!("CsvScan [{}] options({})", paths.join(", "), opts.join(", "));
            if let Some(schema) = schema {
                line.push_str(&format!(" schema({})", schema.to_ddl()));
            }
            line
        }
        Source::Parquet { paths, columns } => match columns {
            Some(cols) => format!("ParquetScan [{}] columns [{}]", paths.join(", "), cols.join(", ")),
            None => format!("ParquetScan [{}]", paths.join(", ")),
        },
        Source::Memory(table) => format!(
            "MemoryScan {} rows [{}]",
            table.num_rows(),
            table.column_names().join(", ")
        ),
        Source::Range { start, end, step } => format!("Range {}..{} step {}", start, end, step),
        Source::Empty => "EmptyRelation".to_string(),
    }
}

impl fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.explain())
    }
}
