//! # CSV reading and writing
//!
//! Maps pandas-style `read_csv` / `to_csv` arguments onto the engine's
//! native CSV options and validates argument combinations before anything is
//! handed to the engine.
//!
//! ```no_run
//! use distframe::io::csv::{read_csv, ReadCsvArgs, ToCsvArgs};
//! use distframe::Session;
//!
//! # fn main() -> distframe::Result<()> {
//! let session = Session::local();
//! let df = read_csv(&session, "people.csv", &ReadCsvArgs::new().usecols_names(&["name"]))?;
//! let text = df.to_csv(None, &ToCsvArgs::new().na_rep("null"))?;
//! # Ok(())
//! # }
//! ```

use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs::File;
use std::str::FromStr;
use std::sync::Arc;

use crate::core::{Column, DataType, Schema, Table};
use crate::dataframe::{DataFrame, LocalFrame};
use crate::engine::local::paths::resolve_path;
use crate::engine::local::write_records;
use crate::engine::{CsvOptions, SaveMode, WriteRequest};
use crate::error::{Error, Result};
use crate::index::Index;
use crate::plan::{ExecutionPlan, Operation, Source};
use crate::session::Session;

const USECOLS_TYPE_ERROR: &str =
    "'usecols' must either be list-like of all strings, all unicode, all integers or a callable.";
const COMMENT_ERROR: &str = "Only length-1 comment characters supported";
const COMMENT_ASCII_ERROR: &str = "Only ASCII comment characters supported";

/// Which row holds the column names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Header {
    /// Row 0 when no names are given, no header otherwise
    #[default]
    Infer,
    /// Names are on this row. Only row 0 is supported.
    Row(i64),
    /// The file has no header row
    None,
}

impl Header {
    /// Whether the engine should treat the first row as a header
    fn engine_header(self, has_names: bool) -> Result<bool> {
        match self {
            Header::Infer => Ok(!has_names),
            Header::Row(0) => Ok(true),
            Header::None => Ok(false),
            Header::Row(n) => Err(unknown_header(n)),
        }
    }
}

fn unknown_header(arg: impl fmt::Display) -> Error {
    Error::InvalidArgument(format!("Unknown header argument {}", arg))
}

impl FromStr for Header {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "infer" {
            Ok(Header::Infer)
        } else {
            Err(unknown_header(s))
        }
    }
}

impl From<i64> for Header {
    fn from(row: i64) -> Self {
        Header::Row(row)
    }
}

/// Column names to use instead of (or in absence of) a header row
#[derive(Debug, Clone, PartialEq)]
pub enum Names {
    List(Vec<String>),
    /// DDL schema string such as `"A string, B long"`; gives both names and
    /// types
    Schema(String),
}

/// Column selection applied after reading
#[derive(Clone)]
pub enum UseCols {
    /// Column positions; file order is kept, duplicates collapse
    Positions(Vec<usize>),
    /// Column names; file order is kept, duplicates collapse
    Names(Vec<String>),
    /// Keep the columns whose name satisfies the predicate
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl UseCols {
    fn is_empty_selection(&self) -> bool {
        match self {
            UseCols::Positions(p) => p.is_empty(),
            UseCols::Names(n) => n.is_empty(),
            UseCols::Predicate(_) => false,
        }
    }

    /// Names of the selected columns, in `columns` order
    fn resolve(&self, columns: &[String]) -> Result<Vec<String>> {
        match self {
            UseCols::Predicate(keep) => Ok(columns.iter().filter(|c| keep(c.as_str())).cloned().collect()),
            UseCols::Positions(positions) => {
                let missing: Vec<usize> = positions
                    .iter()
                    .copied()
                    .filter(|&p| p >= columns.len())
                    .collect();
                if !missing.is_empty() {
                    return Err(usecols_mismatch(missing.iter().map(|p| p.to_string())));
                }
                Ok(columns
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| positions.contains(i))
                    .map(|(_, c)| c.clone())
                    .collect())
            }
            UseCols::Names(names) => {
                let missing: Vec<&String> = names.iter().filter(|n| !columns.contains(n)).collect();
                if !missing.is_empty() {
                    return Err(usecols_mismatch(missing.iter().map(|n| format!("'{}'", n))));
                }
                Ok(columns
                    .iter()
                    .filter(|c| names.contains(c))
                    .cloned()
                    .collect())
            }
        }
    }
}

fn usecols_mismatch(missing: impl Iterator<Item = String>) -> Error {
    Error::InvalidArgument(format!(
        "Usecols do not match columns, columns expected but not found: [{}]",
        missing.collect::<Vec<_>>().join(", ")
    ))
}

impl fmt::Debug for UseCols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UseCols::Positions(p) => f.debug_tuple("Positions").field(p).finish(),
            UseCols::Names(n) => f.debug_tuple("Names").field(n).finish(),
            UseCols::Predicate(_) => f.write_str("Predicate(<fn>)"),
        }
    }
}

/// Arguments of [`read_csv`]
#[derive(Debug, Clone)]
pub struct ReadCsvArgs {
    pub header: Header,
    pub names: Option<Names>,
    pub usecols: Option<UseCols>,
    pub comment: Option<String>,
    pub sep: Option<String>,
    /// Must stay `true`; duplicate header names are always renamed
    pub mangle_dupe_cols: bool,
    /// Must stay `false`; use [`crate::namespace::to_datetime`] instead
    pub parse_dates: bool,
    /// Engine-native reader options, applied last
    pub options: BTreeMap<String, String>,
}

impl Default for ReadCsvArgs {
    fn default() -> Self {
        ReadCsvArgs {
            header: Header::Infer,
            names: None,
            usecols: None,
            comment: None,
            sep: None,
            mangle_dupe_cols: true,
            parse_dates: false,
            options: BTreeMap::new(),
        }
    }
}

impl ReadCsvArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    pub fn names<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.names = Some(Names::List(names.iter().map(|s| s.as_ref().to_string()).collect()));
        self
    }

    /// Names and types from a DDL schema string
    pub fn schema(mut self, ddl: impl Into<String>) -> Self {
        self.names = Some(Names::Schema(ddl.into()));
        self
    }

    pub fn usecols_positions(mut self, positions: &[usize]) -> Self {
        self.usecols = Some(UseCols::Positions(positions.to_vec()));
        self
    }

    pub fn usecols_names<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.usecols = Some(UseCols::Names(names.iter().map(|s| s.as_ref().to_string()).collect()));
        self
    }

    pub fn usecols_fn<F>(mut self, keep: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.usecols = Some(UseCols::Predicate(Arc::new(keep)));
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn sep(mut self, sep: impl Into<String>) -> Self {
        self.sep = Some(sep.into());
        self
    }

    pub fn mangle_dupe_cols(mut self, mangle: bool) -> Self {
        self.mangle_dupe_cols = mangle;
        self
    }

    pub fn parse_dates(mut self, parse: bool) -> Self {
        self.parse_dates = parse;
        self
    }

    /// Engine-native option passed through unchanged
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Builds arguments from loosely typed keyword arguments, e.g.
    /// `{"header": null, "usecols": [1, 0], "nullValue": "NA"}`.
    ///
    /// Keys other than the pandas arguments are passed to the engine as
    /// native options.
    pub fn from_kwargs(kwargs: &Value) -> Result<Self> {
        let map = kwargs
            .as_object()
            .ok_or_else(|| Error::invalid_argument("keyword arguments must be a JSON object"))?;
        let mut args = ReadCsvArgs::new();
        for (key, value) in map {
            match key.as_str() {
                "header" => {
                    args.header = match value {
                        Value::Null => Header::None,
                        Value::String(s) => s.parse()?,
                        Value::Number(n) => Header::Row(n.as_i64().ok_or_else(|| unknown_header(n))?),
                        other => return Err(unknown_header(other)),
                    }
                }
                "names" => {
                    args.names = match value {
                        Value::Null => None,
                        Value::String(ddl) => Some(Names::Schema(ddl.clone())),
                        Value::Array(items) => Some(Names::List(
                            items
                                .iter()
                                .map(|v| match v {
                                    Value::String(s) => Ok(s.clone()),
                                    Value::Number(n) => Ok(n.to_string()),
                                    other => Err(Error::InvalidArgument(format!(
                                        "names must be strings or numbers, got {}",
                                        other
                                    ))),
                                })
                                .collect::<Result<Vec<_>>>()?,
                        )),
                        other => {
                            return Err(Error::InvalidArgument(format!(
                                "names must be a list or a schema string, got {}",
                                other
                            )))
                        }
                    }
                }
                "usecols" => args.usecols = usecols_from_value(value)?,
                "comment" => {
                    args.comment = match value {
                        Value::Null => None,
                        Value::String(s) => Some(s.clone()),
                        _ => return Err(Error::invalid_argument(COMMENT_ERROR)),
                    }
                }
                "sep" | "delimiter" => args.sep = value.as_str().map(str::to_string),
                "mangle_dupe_cols" => match value {
                    Value::Bool(b) => args.mangle_dupe_cols = *b,
                    other => {
                        return Err(Error::InvalidArgument(format!(
                            "mangle_dupe_cols can only be `True`: {}",
                            other
                        )))
                    }
                },
                "parse_dates" => match value {
                    Value::Bool(b) => args.parse_dates = *b,
                    other => {
                        return Err(Error::InvalidArgument(format!(
                            "parse_dates can only be `False`: {}",
                            other
                        )))
                    }
                },
                _ => {
                    args.options.insert(key.clone(), option_text(key, value)?);
                }
            }
        }
        Ok(args)
    }
}

fn usecols_from_value(value: &Value) -> Result<Option<UseCols>> {
    let items = match value {
        Value::Null => return Ok(None),
        Value::Array(items) => items,
        _ => return Err(Error::invalid_argument(USECOLS_TYPE_ERROR)),
    };
    if items.iter().all(Value::is_u64) {
        let positions = items
            .iter()
            .filter_map(Value::as_u64)
            .map(|p| p as usize)
            .collect();
        Ok(Some(UseCols::Positions(positions)))
    } else if items.iter().all(Value::is_string) {
        let names = items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        Ok(Some(UseCols::Names(names)))
    } else {
        Err(Error::invalid_argument(USECOLS_TYPE_ERROR))
    }
}

/// Text form of a pass-through engine option
fn option_text(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::InvalidArgument(format!(
            "Unsupported value for option '{}': {}",
            key, other
        ))),
    }
}

/// Reads a CSV file, or a directory of part files, into a [`DataFrame`].
///
/// Arguments are validated first; the engine then infers column types (or
/// uses the DDL schema passed as `names`).
pub fn read_csv(session: &Session, path: &str, args: &ReadCsvArgs) -> Result<DataFrame> {
    session.track("namespace", "read_csv", || plan_read_csv(session, path, args))
}

fn plan_read_csv(session: &Session, path: &str, args: &ReadCsvArgs) -> Result<DataFrame> {
    if !args.mangle_dupe_cols {
        return Err(Error::InvalidArgument(format!(
            "mangle_dupe_cols can only be `True`: {}",
            args.mangle_dupe_cols
        )));
    }
    if args.parse_dates {
        return Err(Error::InvalidArgument(format!(
            "parse_dates can only be `False`: {}",
            args.parse_dates
        )));
    }
    if args.usecols.as_ref().map_or(false, UseCols::is_empty_selection) {
        return Ok(session.empty_frame());
    }

    let header = args.header.engine_header(args.names.is_some())?;
    let mut options = CsvOptions::new()
        .option("header", header.to_string())
        .option("inferSchema", "true");
    if let Some(sep) = &args.sep {
        options.set("sep", sep.clone());
    }
    if let Some(comment) = &args.comment {
        if comment.chars().count() != 1 {
            return Err(Error::invalid_argument(COMMENT_ERROR));
        }
        if !comment.is_ascii() {
            return Err(Error::invalid_argument(COMMENT_ASCII_ERROR));
        }
        options.set("comment", comment.clone());
    }
    options.extend(&args.options);

    let (schema, names) = match &args.names {
        Some(Names::Schema(ddl)) => {
            let schema = Schema::from_ddl(ddl)?;
            let names = schema.names();
            (Some(schema), Some(names))
        }
        Some(Names::List(names)) => (None, Some(names.clone())),
        None => (None, None),
    };

    let mut plan = ExecutionPlan::new(Source::Csv {
        paths: vec![path.to_string()],
        options,
        schema,
    });
    let mut columns = session.engine().schema(&plan)?.names();

    if !header {
        let positional: Vec<String> = (0..columns.len()).map(|i| i.to_string()).collect();
        plan = plan.with(Operation::Rename(positional.clone()));
        columns = positional;
    }

    if let Some(names) = names {
        let distinct: HashSet<&String> = names.iter().collect();
        if distinct.len() != names.len() {
            return Err(Error::invalid_argument("Found non-unique column index"));
        }
        if names.len() != columns.len() {
            return Err(Error::InvalidArgument(format!(
                "The number of names [{}] does not match the number of columns [{}]",
                names.len(),
                columns.len()
            )));
        }
        plan = plan.with(Operation::Rename(names.clone()));
        columns = names;
    }

    if let Some(usecols) = &args.usecols {
        let selected = usecols.resolve(&columns)?;
        if selected.is_empty() {
            return Ok(session.empty_frame());
        }
        plan = plan.with(Operation::Select(selected));
    }

    log::debug!("read_csv({}) planned:\n{}", path, plan.explain());
    Ok(DataFrame::new(session.clone(), plan))
}

/// The `header` argument of `to_csv`
#[derive(Debug, Clone, PartialEq)]
pub enum CsvHeader {
    /// Write (or omit) the column names
    Bool(bool),
    /// Write these names instead of the column names
    Aliases(Vec<String>),
}

impl Default for CsvHeader {
    fn default() -> Self {
        CsvHeader::Bool(true)
    }
}

/// Arguments of `to_csv`
#[derive(Debug, Clone)]
pub struct ToCsvArgs {
    pub sep: String,
    pub na_rep: String,
    pub columns: Option<Vec<String>>,
    pub header: CsvHeader,
    pub quotechar: char,
    pub date_format: Option<String>,
    pub escapechar: Option<char>,
    /// Write row labels as the first column; `None` uses the frame's default
    pub index: Option<bool>,
    /// Number of part files when writing to a directory
    pub num_files: Option<usize>,
    pub mode: SaveMode,
    /// Engine-native writer options; they override the pandas arguments
    pub options: BTreeMap<String, String>,
}

impl Default for ToCsvArgs {
    fn default() -> Self {
        ToCsvArgs {
            sep: ",".to_string(),
            na_rep: String::new(),
            columns: None,
            header: CsvHeader::default(),
            quotechar: '"',
            date_format: None,
            escapechar: None,
            index: None,
            num_files: None,
            mode: SaveMode::Overwrite,
            options: BTreeMap::new(),
        }
    }
}

impl ToCsvArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sep(mut self, sep: impl Into<String>) -> Self {
        self.sep = sep.into();
        self
    }

    pub fn na_rep(mut self, na_rep: impl Into<String>) -> Self {
        self.na_rep = na_rep.into();
        self
    }

    pub fn columns<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.columns = Some(columns.iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    pub fn header(mut self, header: bool) -> Self {
        self.header = CsvHeader::Bool(header);
        self
    }

    pub fn header_aliases<S: AsRef<str>>(mut self, aliases: &[S]) -> Self {
        self.header = CsvHeader::Aliases(aliases.iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    pub fn quotechar(mut self, quotechar: char) -> Self {
        self.quotechar = quotechar;
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    pub fn escapechar(mut self, escapechar: char) -> Self {
        self.escapechar = Some(escapechar);
        self
    }

    pub fn index(mut self, index: bool) -> Self {
        self.index = Some(index);
        self
    }

    pub fn num_files(mut self, num_files: usize) -> Self {
        self.num_files = Some(num_files);
        self
    }

    pub fn mode(mut self, mode: SaveMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Builds arguments from loosely typed keyword arguments. Unknown keys
    /// become engine-native options.
    pub fn from_kwargs(kwargs: &Value) -> Result<Self> {
        let map = kwargs
            .as_object()
            .ok_or_else(|| Error::invalid_argument("keyword arguments must be a JSON object"))?;
        let mut args = ToCsvArgs::new();
        for (key, value) in map {
            match key.as_str() {
                "sep" => args.sep = expect_str(key, value)?.to_string(),
                "na_rep" => args.na_rep = expect_str(key, value)?.to_string(),
                "columns" => {
                    args.columns = match value {
                        Value::Null => None,
                        other => Some(string_list(key, other)?),
                    }
                }
                "header" => {
                    args.header = match value {
                        Value::Bool(b) => CsvHeader::Bool(*b),
                        other => CsvHeader::Aliases(string_list(key, other)?),
                    }
                }
                "quotechar" => args.quotechar = single_char(key, value)?,
                "escapechar" => {
                    args.escapechar = match value {
                        Value::Null => None,
                        other => Some(single_char(key, other)?),
                    }
                }
                "date_format" => {
                    args.date_format = match value {
                        Value::Null => None,
                        other => Some(expect_str(key, other)?.to_string()),
                    }
                }
                "index" => args.index = value.as_bool(),
                "num_files" => {
                    args.num_files = match value {
                        Value::Null => None,
                        other => Some(other.as_u64().filter(|n| *n > 0).ok_or_else(|| {
                            Error::InvalidArgument(format!(
                                "num_files must be a positive integer, got {}",
                                other
                            ))
                        })? as usize),
                    }
                }
                "mode" => args.mode = expect_str(key, value)?.parse()?,
                _ => {
                    args.options.insert(key.clone(), option_text(key, value)?);
                }
            }
        }
        Ok(args)
    }

    /// Columns to write and the names to write them under
    fn output_columns(&self, available: &[String]) -> Result<(Vec<String>, Vec<String>)> {
        let selected = match &self.columns {
            Some(columns) => {
                if let Some(missing) = columns.iter().find(|c| !available.contains(c)) {
                    return Err(Error::ColumnNotFound(missing.clone()));
                }
                columns.clone()
            }
            None => available.to_vec(),
        };
        let names = match &self.header {
            CsvHeader::Aliases(aliases) => {
                if aliases.len() != selected.len() {
                    return Err(Error::InvalidArgument(format!(
                        "Writing {} cols but got {} aliases",
                        selected.len(),
                        aliases.len()
                    )));
                }
                aliases.clone()
            }
            CsvHeader::Bool(_) => selected.clone(),
        };
        Ok((selected, names))
    }

    /// Native writer options
    fn engine_options(&self) -> Result<CsvOptions> {
        if self.sep.chars().count() != 1 {
            return Err(Error::invalid_argument("\"delimiter\" must be a 1-character string"));
        }
        let mut options = CsvOptions::new()
            .option("sep", self.sep.clone())
            .option("nullValue", self.na_rep.clone())
            .option("header", (self.header != CsvHeader::Bool(false)).to_string())
            .option("quote", self.quotechar.to_string());
        if let Some(escape) = self.escapechar {
            options.set("escape", escape.to_string());
        }
        if let Some(format) = &self.date_format {
            options.set("timestampFormat", format.clone());
        }
        options.extend(&self.options);
        Ok(options)
    }
}

fn expect_str<'a>(key: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::InvalidArgument(format!("{} must be a string, got {}", key, value)))
}

fn single_char(key: &str, value: &Value) -> Result<char> {
    let text = expect_str(key, value)?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::InvalidArgument(format!("\"{}\" must be a 1-character string", key))),
    }
}

fn string_list(key: &str, value: &Value) -> Result<Vec<String>> {
    value
        .as_array()
        .and_then(|items| items.iter().map(|v| v.as_str().map(str::to_string)).collect())
        .ok_or_else(|| Error::InvalidArgument(format!("{} must be a list of strings, got {}", key, value)))
}

fn render_csv(table: &Table, options: &CsvOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_records(table, options, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::InvalidArgument(format!("CSV output is not valid UTF-8: {}", e)))
}

fn index_column(index: &Index) -> Column {
    let name = index.name().unwrap_or("").to_string();
    match index.data_type() {
        Some(data_type) => Column::new_unchecked(name, data_type, index.values().to_vec()),
        None => Column::new_unchecked(
            name,
            DataType::String,
            index.values().iter().map(|v| v.to_string().into()).collect(),
        ),
    }
}

/// Selected, renamed columns of `frame`, optionally preceded by its index
fn output_table(frame: &LocalFrame, args: &ToCsvArgs, write_index: bool) -> Result<Table> {
    let (selected, names) = args.output_columns(&frame.columns())?;
    let mut columns = Vec::with_capacity(selected.len() + 1);
    if write_index {
        columns.push(index_column(frame.index()));
    }
    for (source, name) in selected.iter().zip(names) {
        let column = frame
            .column(source)
            .ok_or_else(|| Error::ColumnNotFound(source.clone()))?;
        columns.push(column.clone().rename(name));
    }
    Table::new(columns)
}

pub(crate) fn local_to_csv(frame: &LocalFrame, path: Option<&str>, args: &ToCsvArgs) -> Result<Option<String>> {
    let table = output_table(frame, args, args.index.unwrap_or(true))?;
    let options = args.engine_options()?;
    match path {
        None => render_csv(&table, &options).map(Some),
        Some(path) => {
            let file = File::create(resolve_path(path)?)?;
            write_records(&table, &options, file)?;
            Ok(None)
        }
    }
}

pub(crate) fn dataframe_to_csv(df: &DataFrame, path: Option<&str>, args: &ToCsvArgs) -> Result<Option<String>> {
    let write_index = args.index.unwrap_or(false);
    let path = match path {
        Some(path) => path,
        None => {
            let args = ToCsvArgs {
                index: Some(write_index),
                ..args.clone()
            };
            return local_to_csv(&df.to_local()?, None, &args);
        }
    };

    let plan = if write_index {
        let table = output_table(&df.to_local()?, args, true)?;
        ExecutionPlan::new(Source::Memory(Arc::new(table)))
    } else {
        let (selected, names) = args.output_columns(&df.columns()?)?;
        df.plan()
            .with(Operation::Select(selected))
            .with(Operation::Rename(names))
    };
    let request = WriteRequest {
        mode: args.mode,
        num_partitions: args.num_files,
        options: args.engine_options()?,
    };
    let written = df.session().engine().write_csv(&plan, path, &request)?;
    log::debug!("to_csv wrote {} file(s) under {}", written.len(), path);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_resolution() {
        assert!(Header::Infer.engine_header(false).unwrap());
        assert!(!Header::Infer.engine_header(true).unwrap());
        assert!(Header::Row(0).engine_header(true).unwrap());
        assert!(!Header::None.engine_header(false).unwrap());
        let err = Header::Row(1).engine_header(false).unwrap_err();
        assert_eq!(err.to_string(), "Unknown header argument 1");
        let err = "1".parse::<Header>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown header argument 1");
    }

    #[test]
    fn test_usecols_resolution() {
        let columns = vec!["name".to_string(), "amount".to_string()];
        let by_pos = UseCols::Positions(vec![1, 0, 1]).resolve(&columns).unwrap();
        assert_eq!(by_pos, vec!["name", "amount"]);
        let by_name = UseCols::Names(vec!["amount".to_string(), "amount".to_string()])
            .resolve(&columns)
            .unwrap();
        assert_eq!(by_name, vec!["amount"]);

        let err = UseCols::Positions(vec![1, 3]).resolve(&columns).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Usecols do not match columns, columns expected but not found: [3]"
        );
        let err = UseCols::Names(vec!["amount".to_string(), "col".to_string()])
            .resolve(&columns)
            .unwrap_err();
        assert!(err.to_string().ends_with("['col']"));

        let pred = UseCols::Predicate(Arc::new(|c: &str| c.starts_with('a')));
        assert_eq!(pred.resolve(&columns).unwrap(), vec!["amount"]);
    }

    #[test]
    fn test_read_kwargs() {
        let args = ReadCsvArgs::from_kwargs(&json!({
            "header": null,
            "names": "A string, B long",
            "usecols": [1],
            "nullValue": "NA",
            "inferSchema": false
        }))
        .unwrap();
        assert_eq!(args.header, Header::None);
        assert_eq!(args.names, Some(Names::Schema("A string, B long".to_string())));
        assert!(matches!(args.usecols, Some(UseCols::Positions(ref p)) if p == &vec![1]));
        assert_eq!(args.options.get("nullValue").map(String::as_str), Some("NA"));
        assert_eq!(args.options.get("inferSchema").map(String::as_str), Some("false"));
    }

    #[test]
    fn test_read_kwargs_rejections() {
        let mixed = ReadCsvArgs::from_kwargs(&json!({"usecols": [1, "amount"]})).unwrap_err();
        assert_eq!(mixed.to_string(), USECOLS_TYPE_ERROR);
        for comment in [json!(1), json!([1])] {
            let err = ReadCsvArgs::from_kwargs(&json!({ "comment": comment })).unwrap_err();
            assert_eq!(err.to_string(), COMMENT_ERROR);
        }
        let err = ReadCsvArgs::from_kwargs(&json!({"header": "1"})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown header argument 1");
    }

    #[test]
    fn test_write_options_mapping() {
        let args = ToCsvArgs::new()
            .sep("|")
            .na_rep("-")
            .header(false)
            .date_format("%Y")
            .option("nullValue", "null");
        let options = args.engine_options().unwrap();
        assert_eq!(options.get("sep"), Some("|"));
        assert_eq!(options.get("header"), Some("false"));
        assert_eq!(options.get("timestampFormat"), Some("%Y"));
        assert_eq!(options.get("nullValue"), Some("null"));

        assert!(ToCsvArgs::new().sep("||").engine_options().is_err());
    }

    #[test]
    fn test_output_columns() {
        let available = vec!["a".to_string(), "b".to_string()];
        let (selected, names) = ToCsvArgs::new()
            .columns(&["b"])
            .header_aliases(&["B"])
            .output_columns(&available)
            .unwrap();
        assert_eq!(selected, vec!["b"]);
        assert_eq!(names, vec!["B"]);

        let err = ToCsvArgs::new()
            .header_aliases(&["x"])
            .output_columns(&available)
            .unwrap_err();
        assert_eq!(err.to_string(), "Writing 2 cols but got 1 aliases");

        let err = ToCsvArgs::new().columns(&["z"]).output_columns(&available).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(_)));
    }

    #[test]
    fn test_write_kwargs() {
        let args = ToCsvArgs::from_kwargs(&json!({
            "header": ["x", "y"],
            "num_files": 1,
            "mode": "append",
            "nullValue": "null"
        }))
        .unwrap();
        assert_eq!(args.header, CsvHeader::Aliases(vec!["x".to_string(), "y".to_string()]));
        assert_eq!(args.num_files, Some(1));
        assert_eq!(args.mode, SaveMode::Append);
        assert!(ToCsvArgs::from_kwargs(&json!({"num_files": 0})).is_err());
    }

    #[test]
    fn test_local_frame_writes_index_by_default() {
        let frame = LocalFrame::new(vec![Column::from_i64s("a", vec![1, 2])]).unwrap();
        let with_index = local_to_csv(&frame, None, &ToCsvArgs::new()).unwrap().unwrap();
        assert_eq!(with_index, ",a\n0,1\n1,2\n");
        let without = local_to_csv(&frame, None, &ToCsvArgs::new().index(false))
            .unwrap()
            .unwrap();
        assert_eq!(without, "a\n1\n2\n");
    }
}
