//! Parquet reading and writing, forwarded to the engine.
//!
//! The local engine only supports Parquet when built with the `parquet`
//! feature; otherwise both directions fail with
//! [`Error::FeatureNotEnabled`] and the call is reported to the usage logger
//! as missing.

use crate::dataframe::DataFrame;
use crate::engine::{SaveMode, WriteRequest};
use crate::error::{Error, Result};
use crate::plan::{ExecutionPlan, Operation, Source};
use crate::session::Session;

fn note_missing<T>(session: &Session, class_name: &str, name: &str, result: Result<T>) -> Result<T> {
    if let Err(Error::FeatureNotEnabled(_)) = &result {
        session.log_missing(class_name, name);
    }
    result
}

/// Reads Parquet files (or a directory of part files), optionally keeping
/// only `columns`
pub fn read_parquet(session: &Session, path: &str, columns: Option<&[&str]>) -> Result<DataFrame> {
    let result = session.track("namespace", "read_parquet", || {
        let columns: Option<Vec<String>> = columns.map(|c| c.iter().map(|s| s.to_string()).collect());
        let plan = ExecutionPlan::new(Source::Parquet {
            paths: vec![path.to_string()],
            columns: columns.clone(),
        });
        // Resolve the schema now so missing files and columns fail here
        session.engine().schema(&plan)?;
        let plan = match columns {
            Some(columns) => plan.with(Operation::Select(columns)),
            None => plan,
        };
        Ok(DataFrame::new(session.clone(), plan))
    });
    note_missing(session, "namespace", "read_parquet", result)
}

/// Writes `df` as Parquet part files under the directory `path`
pub(crate) fn write_parquet(df: &DataFrame, path: &str, mode: SaveMode, num_files: Option<usize>) -> Result<()> {
    let session = df.session();
    let result = session.track("DataFrame", "to_parquet", || {
        let request = WriteRequest {
            mode,
            num_partitions: num_files,
            ..WriteRequest::default()
        };
        let written = session.engine().write_parquet(df.plan(), path, &request)?;
        log::debug!("to_parquet wrote {} file(s) under {}", written.len(), path);
        Ok(())
    });
    note_missing(session, "DataFrame", "to_parquet", result)
}
