use std::fs::File;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int64Array, LargeStringArray, StringArray,
    TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType as ArrowType, Field as ArrowField, Schema as ArrowSchema, TimeUnit};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use chrono::DateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::{ArrowWriter, ProjectionMask};

use super::csv_sink::write_partitions;
use super::paths::expand_locations;
use super::ops::union_all;
use crate::core::{Column, DataType, DataValue, Table};
use crate::engine::SaveMode;
use crate::error::{Error, Result};

fn arrow_type(data_type: DataType) -> ArrowType {
    match data_type {
        DataType::Boolean => ArrowType::Boolean,
        DataType::Int64 => ArrowType::Int64,
        DataType::Float64 => ArrowType::Float64,
        DataType::String => ArrowType::Utf8,
        DataType::Timestamp => ArrowType::Timestamp(TimeUnit::Microsecond, None),
    }
}

fn to_array(column: &Column) -> ArrayRef {
    let values = column.values();
    match column.data_type() {
        DataType::Boolean => Arc::new(BooleanArray::from(
            values.iter().map(DataValue::as_bool).collect::<Vec<_>>(),
        )),
        DataType::Int64 => Arc::new(Int64Array::from(
            values.iter().map(DataValue::as_i64).collect::<Vec<_>>(),
        )),
        DataType::Float64 => Arc::new(Float64Array::from(
            values.iter().map(DataValue::as_f64).collect::<Vec<_>>(),
        )),
        DataType::String => Arc::new(StringArray::from(
            values.iter().map(DataValue::as_str).collect::<Vec<_>>(),
        )),
        DataType::Timestamp => Arc::new(TimestampMicrosecondArray::from(
            values
                .iter()
                .map(|v| v.as_timestamp().map(|ts| ts.and_utc().timestamp_micros()))
                .collect::<Vec<_>>(),
        )),
    }
}

fn to_batch(table: &Table) -> Result<RecordBatch> {
    let fields: Vec<ArrowField> = table
        .columns()
        .iter()
        .map(|c| ArrowField::new(c.name(), arrow_type(c.data_type()), true))
        .collect();
    let arrays: Vec<ArrayRef> = table.columns().iter().map(to_array).collect();
    let options = RecordBatchOptions::new().with_row_count(Some(table.num_rows()));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(ArrowSchema::new(fields)),
        arrays,
        &options,
    )?)
}

fn collect<A, T, F>(array: &ArrayRef, get: F) -> Result<Vec<DataValue>>
where
    A: Array + 'static,
    F: Fn(&A, usize) -> T,
    T: Into<DataValue>,
{
    let typed = array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| Error::Parquet(format!("unexpected array type {}", array.data_type())))?;
    Ok((0..typed.len())
        .map(|i| {
            if typed.is_null(i) {
                DataValue::Null
            } else {
                get(typed, i).into()
            }
        })
        .collect())
}

fn from_array(name: &str, array: &ArrayRef) -> Result<Column> {
    let (data_type, values) = match array.data_type() {
        ArrowType::Boolean => (DataType::Boolean, collect::<BooleanArray, _, _>(array, |a, i| a.value(i))?),
        ArrowType::Int64 => (DataType::Int64, collect::<Int64Array, _, _>(array, |a, i| a.value(i))?),
        ArrowType::Float64 => (DataType::Float64, collect::<Float64Array, _, _>(array, |a, i| a.value(i))?),
        ArrowType::Utf8 => (
            DataType::String,
            collect::<StringArray, _, _>(array, |a, i| a.value(i).to_string())?,
        ),
        ArrowType::LargeUtf8 => (
            DataType::String,
            collect::<LargeStringArray, _, _>(array, |a, i| a.value(i).to_string())?,
        ),
        ArrowType::Timestamp(TimeUnit::Microsecond, _) => (
            DataType::Timestamp,
            collect::<TimestampMicrosecondArray, _, _>(array, |a, i| {
                DateTime::from_timestamp_micros(a.value(i))
                    .map(|dt| DataValue::Timestamp(dt.naive_utc()))
                    .unwrap_or(DataValue::Null)
            })?,
        ),
        ArrowType::Int8 | ArrowType::Int16 | ArrowType::Int32 | ArrowType::UInt8 | ArrowType::UInt16 | ArrowType::UInt32 => {
            let widened = arrow::compute::cast(array, &ArrowType::Int64)?;
            return from_array(name, &widened);
        }
        ArrowType::Float16 | ArrowType::Float32 => {
            let widened = arrow::compute::cast(array, &ArrowType::Float64)?;
            return from_array(name, &widened);
        }
        ArrowType::Timestamp(_, _) | ArrowType::Date32 | ArrowType::Date64 => {
            let widened = arrow::compute::cast(array, &ArrowType::Timestamp(TimeUnit::Microsecond, None))?;
            return from_array(name, &widened);
        }
        other => {
            log::debug!("Reading Parquet column '{}' of type {} as string", name, other);
            let text = arrow::compute::cast(array, &ArrowType::Utf8)?;
            return from_array(name, &text);
        }
    };
    Ok(Column::new_unchecked(name, data_type, values))
}

fn read_file(file: File, columns: Option<&[String]>) -> Result<Table> {
    let mut builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let names: Vec<String> = match columns {
        Some(columns) => {
            let mut indices = Vec::with_capacity(columns.len());
            for name in columns {
                let idx = schema
                    .fields()
                    .iter()
                    .position(|f| f.name() == name)
                    .ok_or_else(|| Error::ColumnNotFound(name.clone()))?;
                indices.push(idx);
            }
            let mask = ProjectionMask::roots(builder.parquet_schema(), indices);
            builder = builder.with_projection(mask);
            columns.to_vec()
        }
        None => schema.fields().iter().map(|f| f.name().clone()).collect(),
    };

    let reader = builder.build()?;
    let mut parts = Vec::new();
    for batch in reader {
        let batch = batch?;
        let batch_schema = batch.schema();
        let columns = batch
            .columns()
            .iter()
            .zip(batch_schema.fields().iter())
            .map(|(array, field)| from_array(field.name(), array))
            .collect::<Result<Vec<_>>>()?;
        parts.push(Table::new(columns)?);
    }
    if parts.is_empty() {
        let columns = schema
            .fields()
            .iter()
            .filter(|f| names.iter().any(|n| n == f.name()))
            .map(|f| {
                let empty = arrow::array::new_empty_array(f.data_type());
                from_array(f.name(), &empty)
            })
            .collect::<Result<Vec<_>>>()?;
        return Table::new(columns)?.select(&names);
    }
    let table = union_all(parts)?;
    table.select(&names)
}

/// Reads Parquet files (or directories of part files) into one table
pub fn read_parquet(locations: &[String], columns: Option<&[String]>) -> Result<Table> {
    let files = expand_locations(locations)?;
    let mut tables = Vec::with_capacity(files.len());
    for path in &files {
        tables.push(read_file(File::open(path)?, columns)?);
    }
    log::debug!("Read {} Parquet file(s)", files.len());
    match tables.len() {
        0 => Ok(Table::empty()),
        1 => Ok(tables.remove(0)),
        _ => union_all(tables),
    }
}

/// Writes Parquet part files for `partitions`
pub fn write_parquet_partitions(location: &str, mode: SaveMode, partitions: &[Table]) -> Result<Vec<std::path::PathBuf>> {
    write_partitions(location, mode, partitions, "parquet", |part, path| {
        let batch = to_batch(part)?;
        let file = File::create(path)?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parquet_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("out").to_string_lossy().to_string();
        let table = Table::new(vec![
            Column::from_i64s("id", vec![1, 2, 3]),
            Column::from_options("name", DataType::String, vec![Some("a"), None, Some("c")]).unwrap(),
            Column::from_f64s("score", vec![0.5, 1.5, 2.5]),
        ])
        .unwrap();

        let written = write_parquet_partitions(&location, SaveMode::Overwrite, &table.partition(2)).unwrap();
        assert_eq!(written.len(), 2);

        let back = read_parquet(&[location.clone()], None).unwrap();
        assert_eq!(back, table);

        let projected = read_parquet(&[location], Some(&["score".to_string()])).unwrap();
        assert_eq!(projected.column_names(), vec!["score"]);
    }
}
