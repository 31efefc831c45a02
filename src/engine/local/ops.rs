use std::collections::{BTreeSet, HashMap};

use crate::core::{Column, DataType, DataValue, Table};
use crate::datetime::{to_datetime_column, DateErrors};
use crate::error::{Error, Result};

fn require<'a>(table: &'a Table, name: &str) -> Result<&'a Column> {
    table
        .column(name)
        .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
}

/// Stacks tables vertically, aligning columns by name. Columns missing from a
/// table are filled with nulls; numeric columns of different types widen to
/// double.
pub fn union_all(tables: Vec<Table>) -> Result<Table> {
    let mut order: Vec<String> = Vec::new();
    let mut types: HashMap<String, DataType> = HashMap::new();
    for table in &tables {
        for column in table.columns() {
            match types.get(column.name()) {
                None => {
                    order.push(column.name().to_string());
                    types.insert(column.name().to_string(), column.data_type());
                }
                Some(existing) => {
                    let unified = existing.unify(column.data_type()).ok_or_else(|| {
                        Error::InvalidOperation(format!(
                            "Cannot union column '{}' of types {} and {}",
                            column.name(),
                            existing,
                            column.data_type()
                        ))
                    })?;
                    types.insert(column.name().to_string(), unified);
                }
            }
        }
    }

    let mut columns = Vec::with_capacity(order.len());
    for name in &order {
        let data_type = types[name];
        let mut values = Vec::new();
        for table in &tables {
            match table.column(name) {
                Some(c) => values.extend(c.cast(data_type).into_values()),
                None => values.extend(std::iter::repeat(DataValue::Null).take(table.num_rows())),
            }
        }
        columns.push(Column::new(name.clone(), data_type, values)?);
    }
    Table::new(columns)
}

/// Unpivots `value_vars` into `var_name` / `value_name` pairs, repeating the
/// `id_vars` columns. Empty `value_vars` means every non-id column.
pub fn melt(
    table: &Table,
    id_vars: &[String],
    value_vars: &[String],
    var_name: &str,
    value_name: &str,
) -> Result<Table> {
    for id in id_vars {
        require(table, id)?;
    }
    let value_vars: Vec<String> = if value_vars.is_empty() {
        table
            .column_names()
            .into_iter()
            .filter(|n| !id_vars.contains(n))
            .collect()
    } else {
        value_vars.to_vec()
    };
    let value_columns = value_vars
        .iter()
        .map(|v| require(table, v))
        .collect::<Result<Vec<_>>>()?;

    let value_type = value_columns
        .iter()
        .map(|c| Some(c.data_type()))
        .reduce(|a, b| a.zip(b).and_then(|(a, b)| a.unify(b)))
        .flatten()
        .unwrap_or(DataType::String);

    let rows = table.num_rows();
    let mut out = Vec::with_capacity(id_vars.len() + 2);
    for id in id_vars {
        let source = require(table, id)?;
        let mut values = Vec::with_capacity(rows * value_columns.len());
        for _ in &value_columns {
            values.extend(source.values().iter().cloned());
        }
        out.push(Column::new(id.clone(), source.data_type(), values)?);
    }

    let mut variables = Vec::with_capacity(rows * value_columns.len());
    let mut values = Vec::with_capacity(rows * value_columns.len());
    for column in &value_columns {
        variables.extend(std::iter::repeat(DataValue::from(column.name())).take(rows));
        values.extend(column.cast(value_type).into_values());
    }
    out.push(Column::new(var_name, DataType::String, variables)?);
    out.push(Column::new(value_name, value_type, values)?);
    Table::new(out)
}

/// Replaces each column in `columns` with one 0/1 column per distinct value,
/// named `{column}{prefix_sep}{value}`. Empty `columns` selects every string
/// column. Untouched columns come first, indicator columns after them.
pub fn get_dummies(table: &Table, columns: &[String], prefix_sep: &str) -> Result<Table> {
    let targets: Vec<String> = if columns.is_empty() {
        table
            .columns()
            .iter()
            .filter(|c| c.data_type() == DataType::String)
            .map(|c| c.name().to_string())
            .collect()
    } else {
        for name in columns {
            require(table, name)?;
        }
        columns.to_vec()
    };

    let mut out: Vec<Column> = table
        .columns()
        .iter()
        .filter(|c| !targets.iter().any(|t| t == c.name()))
        .cloned()
        .collect();

    for target in &targets {
        let column = require(table, target)?;
        let levels: BTreeSet<String> = column
            .values()
            .iter()
            .filter(|v| !v.is_na())
            .map(|v| v.to_string())
            .collect();
        for level in levels {
            let values = column
                .values()
                .iter()
                .map(|v| DataValue::Int64((!v.is_na() && v.to_string() == level) as i64))
                .collect();
            out.push(Column::new(
                format!("{}{}{}", target, prefix_sep, level),
                DataType::Int64,
                values,
            )?);
        }
    }
    Table::new(out)
}

/// Replaces `column` with its timestamp conversion
pub fn to_timestamp(table: Table, column: &str, format: Option<&str>, errors: DateErrors) -> Result<Table> {
    require(&table, column)?;
    let columns = table
        .into_columns()
        .into_iter()
        .map(|c| {
            if c.name() == column {
                to_datetime_column(&c, format, errors)
            } else {
                Ok(c)
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Table::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Table {
        Table::new(vec![
            Column::from_strs("name", &["Alice", "Bob", "Alice"]),
            Column::from_i64s("x", vec![1, 2, 3]),
            Column::from_f64s("y", vec![0.5, 1.5, 2.5]),
        ])
        .unwrap()
    }

    #[test]
    fn test_union_aligns_by_name() {
        let other = Table::new(vec![
            Column::from_f64s("x", vec![9.5]),
            Column::from_strs("z", &["new"]),
        ])
        .unwrap();
        let out = union_all(vec![frame(), other]).unwrap();
        assert_eq!(out.column_names(), vec!["name", "x", "y", "z"]);
        assert_eq!(out.num_rows(), 4);
        assert_eq!(out.column("x").unwrap().data_type(), DataType::Float64);
        assert_eq!(out.column("name").unwrap().values()[3], DataValue::Null);
        assert_eq!(out.column("z").unwrap().values()[0], DataValue::Null);
    }

    #[test]
    fn test_union_rejects_incompatible_types() {
        let other = Table::new(vec![Column::from_strs("x", &["a"])]).unwrap();
        assert!(union_all(vec![frame(), other]).is_err());
    }

    #[test]
    fn test_melt() {
        let out = melt(
            &frame(),
            &["name".to_string()],
            &[],
            "variable",
            "value",
        )
        .unwrap();
        assert_eq!(out.column_names(), vec!["name", "variable", "value"]);
        assert_eq!(out.num_rows(), 6);
        assert_eq!(out.column("value").unwrap().data_type(), DataType::Float64);
        assert_eq!(out.column("variable").unwrap().values()[3], DataValue::from("y"));
        assert_eq!(out.column("value").unwrap().values()[0], DataValue::Float64(1.0));
    }

    #[test]
    fn test_get_dummies() {
        let out = get_dummies(&frame(), &[], "_").unwrap();
        assert_eq!(out.column_names(), vec!["x", "y", "name_Alice", "name_Bob"]);
        assert_eq!(
            out.column("name_Alice").unwrap().values(),
            &[DataValue::Int64(1), DataValue::Int64(0), DataValue::Int64(1)]
        );
        assert!(get_dummies(&frame(), &["nope".to_string()], "_").is_err());
    }
}
