use csv::ReaderBuilder;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use super::infer::infer_type;
use super::paths::expand_locations;
use crate::core::data_value::parse_as;
use crate::core::{Column, DataType, DataValue, Schema, Table};
use crate::engine::CsvOptions;
use crate::error::{Error, Result};

/// Raw fields of one file; `None` marks a null field
struct RawFile {
    header: Option<Vec<String>>,
    rows: Vec<Vec<Option<String>>>,
}

fn read_raw(path: &Path, options: &CsvOptions, header: bool) -> Result<RawFile> {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .delimiter(options.separator()?)
        .quote(options.quote()?)
        .comment(options.comment()?);
    if let Some(escape) = options.escape()? {
        builder.escape(Some(escape)).double_quote(false);
    }
    let mut reader = builder.from_path(path)?;
    let null_value = options.null_value();

    let mut header_row = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if header && header_row.is_none() {
            header_row = Some(record.iter().map(|f| f.trim().to_string()).collect());
            continue;
        }
        let row = record
            .iter()
            .map(|f| {
                if f == null_value || f.is_empty() {
                    None
                } else {
                    Some(f.to_string())
                }
            })
            .collect();
        rows.push(row);
    }
    Ok(RawFile {
        header: header_row,
        rows,
    })
}

/// Column names from a header row: blanks become `_c{i}`, repeated names get
/// their position appended. A generated name that clashes with another
/// column gets a `_{n}` suffix until it is unique.
fn header_names(header: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for h in header {
        *counts.entry(h.as_str()).or_default() += 1;
    }
    let is_kept = |h: &str| !h.is_empty() && counts.get(h) == Some(&1);

    let mut taken: HashSet<String> = header.iter().filter(|h| is_kept(h)).cloned().collect();
    header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if is_kept(h) {
                return h.clone();
            }
            let base = if h.is_empty() {
                format!("_c{}", i)
            } else {
                format!("{}{}", h, i)
            };
            let mut name = base.clone();
            let mut n = 1;
            while taken.contains(&name) {
                name = format!("{}_{}", base, n);
                n += 1;
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

/// Reads CSV files into a table.
///
/// Column count comes from the schema when given, else from the header (or
/// first row) of the first file. Short rows are padded with nulls, long rows
/// are truncated. Fields that do not parse as the schema type become null.
pub fn read_csv(locations: &[String], options: &CsvOptions, schema: Option<&Schema>) -> Result<Table> {
    for key in options.unknown_keys() {
        log::debug!("Ignoring unknown CSV read option '{}'", key);
    }
    let header = options.header()?;
    let files = expand_locations(locations)?;
    if files.is_empty() {
        return Err(Error::Engine(format!(
            "No data files found under {}",
            locations.join(", ")
        )));
    }

    let mut first_header = None;
    let mut rows = Vec::new();
    for file in &files {
        let raw = read_raw(file, options, header)?;
        if first_header.is_none() {
            first_header = raw.header;
        }
        rows.extend(raw.rows);
    }

    let names: Vec<String> = match (schema, &first_header) {
        (Some(schema), _) => schema.names(),
        (None, Some(h)) => header_names(h),
        (None, None) => {
            let width = rows.first().map(Vec::len).unwrap_or(0);
            (0..width).map(|i| format!("_c{}", i)).collect()
        }
    };

    let raw_columns: Vec<Vec<Option<&str>>> = (0..names.len())
        .map(|i| {
            rows.iter()
                .map(|row| row.get(i).and_then(|f| f.as_deref()))
                .collect()
        })
        .collect();

    let infer = options.infer_schema()?;
    let columns = names
        .iter()
        .zip(raw_columns)
        .enumerate()
        .map(|(i, (name, raw))| {
            let data_type = match schema {
                Some(schema) => schema.fields()[i].data_type,
                None if infer => infer_type(raw.iter().flatten().copied().collect::<Vec<_>>()),
                None => DataType::String,
            };
            let values = raw
                .into_iter()
                .map(|f| match f {
                    None => DataValue::Null,
                    Some(text) => parse_as(text, data_type).unwrap_or(DataValue::Null),
                })
                .collect();
            Column::new(name.clone(), data_type, values)
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "Read {} rows x {} columns from {} file(s)",
        rows.len(),
        columns.len(),
        files.len()
    );
    if columns.is_empty() {
        return Ok(Table::empty());
    }
    Table::new(columns)
}
