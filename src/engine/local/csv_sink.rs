use csv::{QuoteStyle, Terminator, WriterBuilder};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::paths::{part_file_name, resolve_path};
use crate::core::Table;
use crate::engine::{CsvOptions, SaveMode};
use crate::error::{Error, Result};

fn terminator(line_sep: &str) -> Result<Terminator> {
    match line_sep.as_bytes() {
        b"\r\n" => Ok(Terminator::CRLF),
        [b] => Ok(Terminator::Any(*b)),
        _ => Err(Error::Engine(format!(
            "Option 'lineSep' must be a single character or \\r\\n, got {:?}",
            line_sep
        ))),
    }
}

/// Writes `table` as CSV records using the format options in `options`
/// (`header`, `sep`, `quote`, `escape`, `nullValue`, `timestampFormat`,
/// `lineSep`)
pub fn write_records<W: Write>(table: &Table, options: &CsvOptions, out: W) -> Result<()> {
    let mut builder = WriterBuilder::new();
    builder
        .delimiter(options.separator()?)
        .quote(options.quote()?)
        .quote_style(QuoteStyle::Necessary)
        .terminator(terminator(options.line_separator())?);
    if let Some(escape) = options.escape()? {
        builder.escape(escape).double_quote(false);
    }
    let mut writer = builder.from_writer(out);

    if options.header()? {
        writer.write_record(table.column_names())?;
    }

    let null_value = options.null_value();
    let timestamp_format = options.timestamp_format();
    let mut record = Vec::with_capacity(table.num_columns());
    for i in 0..table.num_rows() {
        record.clear();
        for column in table.columns() {
            let value = &column.values()[i];
            if value.is_na() {
                record.push(null_value.to_string());
            } else {
                record.push(value.render(timestamp_format));
            }
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Prepares `dir` according to `mode`. Returns `false` when nothing should be
/// written.
fn prepare_target(dir: &Path, mode: SaveMode) -> Result<bool> {
    if dir.exists() {
        match mode {
            SaveMode::ErrorIfExists => {
                return Err(Error::Engine(format!("Path {} already exists", dir.display())))
            }
            SaveMode::Ignore => {
                log::info!("Output {} exists; skipping write (mode=ignore)", dir.display());
                return Ok(false);
            }
            SaveMode::Overwrite => {
                if dir.is_dir() {
                    fs::remove_dir_all(dir)?;
                } else {
                    fs::remove_file(dir)?;
                }
            }
            SaveMode::Append => {
                if !dir.is_dir() {
                    return Err(Error::Engine(format!(
                        "Cannot append to {}: not a directory",
                        dir.display()
                    )));
                }
            }
        }
    }
    fs::create_dir_all(dir)?;
    Ok(true)
}

/// Writes each partition to its own part file under `location`.
///
/// Files are written in parallel into a staging directory inside the target,
/// then moved into place; a `_SUCCESS` marker is written last.
pub fn write_partitions<F>(
    location: &str,
    mode: SaveMode,
    partitions: &[Table],
    extension: &str,
    write_one: F,
) -> Result<Vec<PathBuf>>
where
    F: Fn(&Table, &Path) -> Result<()> + Sync,
{
    let dir = resolve_path(location)?;
    if !prepare_target(&dir, mode)? {
        return Ok(Vec::new());
    }

    let job_id = uuid::Uuid::new_v4().to_string();
    let staging = tempfile::Builder::new()
        .prefix("_temporary")
        .tempdir_in(&dir)?;

    let staged = partitions
        .par_iter()
        .enumerate()
        .map(|(i, part)| {
            let name = part_file_name(i, &job_id, extension);
            let path = staging.path().join(&name);
            write_one(part, &path)?;
            Ok(name)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut written = Vec::with_capacity(staged.len());
    for name in staged {
        let target = dir.join(&name);
        fs::rename(staging.path().join(&name), &target)?;
        written.push(target);
    }
    File::create(dir.join("_SUCCESS"))?;
    log::info!(
        "Wrote {} part file(s) to {} (mode={})",
        written.len(),
        dir.display(),
        mode
    );
    Ok(written)
}

/// Writes CSV part files for `partitions`
pub fn write_csv_partitions(
    location: &str,
    mode: SaveMode,
    partitions: &[Table],
    options: &CsvOptions,
) -> Result<Vec<PathBuf>> {
    for key in options.unknown_keys() {
        log::debug!("Ignoring unknown CSV write option '{}'", key);
    }
    write_partitions(location, mode, partitions, "csv", |part, path| {
        let file = File::create(path)?;
        write_records(part, options, file)
    })
}
