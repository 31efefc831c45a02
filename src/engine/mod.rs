//! # Execution engines
//!
//! The API layer only builds [`ExecutionPlan`]s; an [`ExecutionEngine`]
//! evaluates them. [`LocalEngine`] is the in-process reference engine used by
//! default. Other engines (cluster-backed ones in particular) plug in behind
//! the same trait.

pub mod local;
pub mod options;

pub use local::LocalEngine;
pub use options::CsvOptions;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::core::{Schema, Table};
use crate::error::{Error, Result};
use crate::plan::ExecutionPlan;

/// Behaviour when the output location already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveMode {
    /// Replace existing output
    #[default]
    Overwrite,
    /// Add part files next to existing ones
    Append,
    /// Leave existing output alone and write nothing
    Ignore,
    /// Fail if output exists
    ErrorIfExists,
}

impl FromStr for SaveMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "overwrite" => Ok(SaveMode::Overwrite),
            "a" | "append" => Ok(SaveMode::Append),
            "ignore" => Ok(SaveMode::Ignore),
            "error" | "errorifexists" => Ok(SaveMode::ErrorIfExists),
            other => Err(Error::InvalidArgument(format!(
                "Unknown save mode '{}'. Accepted modes are 'w', 'a', 'overwrite', 'append', 'ignore', 'error', 'errorifexists'.",
                other
            ))),
        }
    }
}

impl fmt::Display for SaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SaveMode::Overwrite => "overwrite",
            SaveMode::Append => "append",
            SaveMode::Ignore => "ignore",
            SaveMode::ErrorIfExists => "errorifexists",
        };
        write!(f, "{}", name)
    }
}

/// How a plan's result is written to a directory of part files
#[derive(Debug, Clone, Default)]
pub struct WriteRequest {
    pub mode: SaveMode,
    /// Number of part files; the engine chooses when absent
    pub num_partitions: Option<usize>,
    /// Format options (CSV options for CSV sinks, ignored otherwise)
    pub options: CsvOptions,
}

/// Shared engine handle held by sessions
pub type EngineRef = Arc<dyn ExecutionEngine>;

/// An engine that evaluates execution plans
pub trait ExecutionEngine: Send + Sync + Debug {
    /// Engine name
    fn name(&self) -> &str;

    /// Engine version, if the engine reports one
    fn version(&self) -> Option<String>;

    /// Number of partitions the engine uses when none is requested
    fn default_parallelism(&self) -> usize;

    /// Evaluates `plan` and returns all of its rows
    fn execute(&self, plan: &ExecutionPlan) -> Result<Table>;

    /// Evaluates `plan`, returning rows grouped by partition
    fn execute_partitioned(&self, plan: &ExecutionPlan) -> Result<Vec<Table>> {
        Ok(vec![self.execute(plan)?])
    }

    /// Result schema of `plan`
    fn schema(&self, plan: &ExecutionPlan) -> Result<Schema> {
        Ok(self.execute(plan)?.schema())
    }

    /// Writes the result of `plan` as CSV part files under directory `path`.
    /// Returns the written part files.
    fn write_csv(&self, plan: &ExecutionPlan, path: &str, request: &WriteRequest) -> Result<Vec<PathBuf>>;

    /// Writes the result of `plan` as Parquet part files under directory `path`
    fn write_parquet(&self, plan: &ExecutionPlan, path: &str, request: &WriteRequest) -> Result<Vec<PathBuf>> {
        let _ = (plan, path, request);
        Err(Error::FeatureNotEnabled(format!(
            "engine '{}' cannot write Parquet",
            self.name()
        )))
    }
}
