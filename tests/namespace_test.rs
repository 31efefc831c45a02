use chrono::NaiveDate;
use distframe::namespace::{
    concat, from_local, get_dummies, melt, parse_datetime, range, read_parquet, to_datetime,
    DateErrors, MeltOptions,
};
use distframe::{Column, DataFrame, DataType, DataValue, Error, LocalFrame, Session, Table};

fn people(session: &Session) -> DataFrame {
    session.from_table(
        Table::new(vec![
            Column::from_strs("name", &["Alice", "Bob", "Alice"]),
            Column::from_i64s("x", vec![1, 2, 3]),
            Column::from_f64s("y", vec![0.5, 1.5, 2.5]),
        ])
        .unwrap(),
    )
}

#[test]
fn test_range_and_from_local() {
    let session = Session::local();
    let df = range(&session, 10, 0, -3).unwrap();
    let values = df.column("id").unwrap().to_values().unwrap();
    assert_eq!(
        values,
        vec![
            DataValue::Int64(10),
            DataValue::Int64(7),
            DataValue::Int64(4),
            DataValue::Int64(1)
        ]
    );

    let local = LocalFrame::new(vec![Column::from_strs("s", &["a", "b"])]).unwrap();
    let df = from_local(&session, &local).unwrap();
    assert_eq!(df.to_local().unwrap().column("s"), local.column("s"));
}

#[test]
fn test_concat_aligns_columns() {
    let session = Session::local();
    let first = people(&session);
    let second = session.from_table(
        Table::new(vec![
            Column::from_f64s("x", vec![9.5]),
            Column::from_strs("z", &["new"]),
        ])
        .unwrap(),
    );

    let df = concat(&[first, second]).unwrap();
    assert_eq!(df.columns().unwrap(), vec!["name", "x", "y", "z"]);
    assert_eq!(df.count().unwrap(), 4);
    let dtypes = df.dtypes().unwrap();
    assert_eq!(dtypes[1], ("x".to_string(), DataType::Float64));

    let table = df.to_table().unwrap();
    assert_eq!(table.column("z").unwrap().values()[0], DataValue::Null);
    assert_eq!(table.column("name").unwrap().values()[3], DataValue::Null);
}

#[test]
fn test_concat_type_conflict_fails_early() {
    let session = Session::local();
    let strings = session.from_table(Table::new(vec![Column::from_strs("x", &["a"])]).unwrap());
    let err = concat(&[people(&session), strings]).unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));

    let err = concat(&[]).unwrap_err();
    assert_eq!(err.to_string(), "No objects to concatenate");
}

#[test]
fn test_melt() {
    let session = Session::local();
    let df = people(&session);
    let options = MeltOptions {
        id_vars: Some(vec!["name".to_string()]),
        value_vars: Some(vec!["x".to_string(), "y".to_string()]),
        var_name: Some("field".to_string()),
        value_name: None,
    };
    let long = melt(&df, &options).unwrap();
    assert_eq!(long.columns().unwrap(), vec!["name", "field", "value"]);

    let table = long.to_table().unwrap();
    assert_eq!(table.num_rows(), 6);
    assert_eq!(table.column("field").unwrap().values()[0], DataValue::from("x"));
    assert_eq!(table.column("field").unwrap().values()[3], DataValue::from("y"));
    assert_eq!(table.column("value").unwrap().data_type(), DataType::Float64);
    assert_eq!(table.column("value").unwrap().values()[1], DataValue::Float64(2.0));

    let options = MeltOptions {
        value_vars: Some(vec!["nope".to_string()]),
        ..MeltOptions::default()
    };
    assert!(matches!(melt(&df, &options), Err(Error::ColumnNotFound(_))));
}

#[test]
fn test_get_dummies() {
    let session = Session::local();
    let df = people(&session);

    let dummies = get_dummies(&df, None, "_").unwrap();
    assert_eq!(
        dummies.columns().unwrap(),
        vec!["x", "y", "name_Alice", "name_Bob"]
    );
    let table = dummies.to_table().unwrap();
    assert_eq!(
        table.column("name_Alice").unwrap().values(),
        &[DataValue::Int64(1), DataValue::Int64(0), DataValue::Int64(1)]
    );

    let dummies = get_dummies(&df, Some(&["x"]), "=").unwrap();
    assert_eq!(
        dummies.columns().unwrap(),
        vec!["name", "y", "x=1", "x=2", "x=3"]
    );

    assert!(get_dummies(&df, Some(&["missing"]), "_").is_err());
}

#[test]
fn test_to_datetime() {
    let session = Session::local();
    let df = session.from_table(
        Table::new(vec![Column::from_strs("when", &["03/10/2019", "12/25/2020"])]).unwrap(),
    );
    let series = df.column("when").unwrap();
    let converted = to_datetime(&series, Some("%m/%d/%Y"), DateErrors::Raise).unwrap();
    assert_eq!(converted.dtype().unwrap(), DataType::Timestamp);
    let expected = NaiveDate::from_ymd_opt(2019, 3, 10)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(converted.to_values().unwrap()[0], DataValue::Timestamp(expected));

    assert_eq!(parse_datetime("2019-03-10", None), Some(expected));
    assert_eq!(parse_datetime("10 March", Some("%Y-%m-%d")), None);
}

#[cfg(not(feature = "parquet"))]
#[test]
fn test_read_parquet_without_feature() {
    let session = Session::local();
    let err = read_parquet(&session, "data.parquet", None).unwrap_err();
    assert!(matches!(err, Error::FeatureNotEnabled(_)));
}

#[cfg(feature = "parquet")]
#[test]
fn test_parquet_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").to_string_lossy().to_string();
    let session = Session::local();
    people(&session)
        .to_parquet(&path, distframe::SaveMode::Overwrite, Some(2))
        .unwrap();

    let back = read_parquet(&session, &path, Some(&["y", "name"])).unwrap();
    assert_eq!(back.columns().unwrap(), vec!["y", "name"]);
    assert_eq!(back.count().unwrap(), 3);

    let err = read_parquet(&session, &path, Some(&["nope"])).unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound(_)));
}
