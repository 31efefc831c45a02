//! # Top-level functions
//!
//! pandas-style constructors and reshaping functions. Each validates its
//! arguments, builds a plan and leaves execution to the session's engine.

use crate::dataframe::{DataFrame, LocalFrame};
use crate::error::{Error, Result};
use crate::plan::{ExecutionPlan, Operation, Source};
use crate::series::Series;
use crate::session::Session;

pub use crate::datetime::{parse_datetime, DateErrors};
pub use crate::io::csv::read_csv;
pub use crate::io::parquet::read_parquet;

/// Frame with a single `id` column holding `start..end` by `step`
pub fn range(session: &Session, start: i64, end: i64, step: i64) -> Result<DataFrame> {
    session.track("namespace", "range", || {
        if step == 0 {
            return Err(Error::invalid_argument("range step must not be zero"));
        }
        Ok(DataFrame::new(
            session.clone(),
            ExecutionPlan::new(Source::Range { start, end, step }),
        ))
    })
}

/// Lazy frame over a local frame
pub fn from_local(session: &Session, frame: &LocalFrame) -> Result<DataFrame> {
    session.track("namespace", "from_local", || Ok(session.from_local(frame)))
}

/// Stacks frames vertically. Columns are matched by name; a column missing
/// from a frame is filled with nulls, and numeric columns of different types
/// widen to double.
pub fn concat(frames: &[DataFrame]) -> Result<DataFrame> {
    let (first, rest) = frames
        .split_first()
        .ok_or_else(|| Error::invalid_argument("No objects to concatenate"))?;
    let session = first.session();
    session.track("namespace", "concat", || {
        if rest.is_empty() {
            return Ok(first.clone());
        }
        let others = rest.iter().map(|df| df.plan().clone()).collect();
        let df = DataFrame::new(session.clone(), first.plan().with(Operation::Union(others)));
        // Type conflicts surface here rather than at the first action
        df.schema()?;
        Ok(df)
    })
}

/// Options for [`melt`]
#[derive(Debug, Clone)]
pub struct MeltOptions {
    /// Identifier columns kept as-is
    pub id_vars: Option<Vec<String>>,
    /// Columns to unpivot; all non-identifier columns when `None`
    pub value_vars: Option<Vec<String>>,
    pub var_name: Option<String>,
    pub value_name: Option<String>,
}

impl Default for MeltOptions {
    fn default() -> Self {
        Self {
            id_vars: None,
            value_vars: None,
            var_name: Some("variable".to_string()),
            value_name: Some("value".to_string()),
        }
    }
}

fn check_present(kind: &str, wanted: &[String], available: &[String]) -> Result<()> {
    let missing: Vec<&String> = wanted.iter().filter(|c| !available.contains(c)).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::ColumnNotFound(format!(
            "The following '{}' are not present in the DataFrame: {:?}",
            kind, missing
        )))
    }
}

/// Unpivots a frame from wide to long format
pub fn melt(frame: &DataFrame, options: &MeltOptions) -> Result<DataFrame> {
    frame.session().track("namespace", "melt", || {
        let available = frame.columns()?;
        let id_vars = options.id_vars.clone().unwrap_or_default();
        let value_vars = options.value_vars.clone().unwrap_or_default();
        check_present("id_vars", &id_vars, &available)?;
        check_present("value_vars", &value_vars, &available)?;
        Ok(DataFrame::new(
            frame.session().clone(),
            frame.plan().with(Operation::Melt {
                id_vars,
                value_vars,
                var_name: options.var_name.clone().unwrap_or_else(|| "variable".to_string()),
                value_name: options.value_name.clone().unwrap_or_else(|| "value".to_string()),
            }),
        ))
    })
}

/// Converts categorical columns into 0/1 indicator columns named
/// `{column}{prefix_sep}{value}`. Without `columns`, every string column is
/// converted.
pub fn get_dummies(frame: &DataFrame, columns: Option<&[&str]>, prefix_sep: &str) -> Result<DataFrame> {
    frame.session().track("namespace", "get_dummies", || {
        let columns: Vec<String> = columns
            .unwrap_or_default()
            .iter()
            .map(|c| c.to_string())
            .collect();
        check_present("columns", &columns, &frame.columns()?)?;
        Ok(DataFrame::new(
            frame.session().clone(),
            frame.plan().with(Operation::GetDummies {
                columns,
                prefix_sep: prefix_sep.to_string(),
            }),
        ))
    })
}

/// Converts a series to timestamps. With no `format`, common layouts are
/// tried in turn; integers are read as nanoseconds since the epoch.
pub fn to_datetime(series: &Series, format: Option<&str>, errors: DateErrors) -> Result<Series> {
    let frame = series.to_frame();
    frame.session().track("namespace", "to_datetime", || {
        let converted = DataFrame::new(
            frame.session().clone(),
            frame.plan().with(Operation::ToTimestamp {
                column: series.name().to_string(),
                format: format.map(str::to_string),
                errors,
            }),
        );
        converted.column(series.name())
    })
}
