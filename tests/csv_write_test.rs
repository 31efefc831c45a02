use std::fs;
use std::path::Path;

use distframe::io::csv::{read_csv, ReadCsvArgs, ToCsvArgs};
use distframe::{Column, DataFrame, DataType, DataValue, LocalFrame, SaveMode, Session, Table};
use serde_json::json;

mod common;
use common::{read_part_files, TempTestDir};

fn numbers(session: &Session) -> DataFrame {
    session.from_table(
        Table::new(vec![
            Column::from_i64s("a", vec![1, 2, 3]),
            Column::from_i64s("b", vec![4, 5, 6]),
        ])
        .unwrap(),
    )
}

fn out_dir(dir: &TempTestDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().to_string()
}

fn has_success_marker(path: &str) -> bool {
    Path::new(path).join("_SUCCESS").exists()
}

#[test]
fn test_to_csv_text() {
    let session = Session::local();
    let df = numbers(&session);

    let text = df.to_csv(None, &ToCsvArgs::new()).unwrap().unwrap();
    assert_eq!(text, "a,b\n1,4\n2,5\n3,6\n");

    let text = df.to_csv(None, &ToCsvArgs::new().header(false)).unwrap().unwrap();
    assert_eq!(text, "1,4\n2,5\n3,6\n");

    let text = df
        .to_csv(None, &ToCsvArgs::new().sep("|").header(false))
        .unwrap()
        .unwrap();
    assert_eq!(text, "1|4\n2|5\n3|6\n");

    let text = df
        .to_csv(None, &ToCsvArgs::new().columns(&["b"]).header_aliases(&["B"]))
        .unwrap()
        .unwrap();
    assert_eq!(text, "B\n4\n5\n6\n");
}

#[test]
fn test_to_csv_with_index() {
    let session = Session::local();
    let df = numbers(&session).head(2);
    let text = df.to_csv(None, &ToCsvArgs::new().index(true)).unwrap().unwrap();
    assert_eq!(text, ",a,b\n0,1,4\n1,2,5\n");
}

#[test]
fn test_to_csv_floats_and_nulls() {
    let session = Session::local();
    let df = session.from_table(
        Table::new(vec![
            Column::from_f64s("f", vec![1.0, 2.5]),
            Column::from_options("s", DataType::String, vec![Some("x"), None]).unwrap(),
        ])
        .unwrap(),
    );

    let text = df.to_csv(None, &ToCsvArgs::new()).unwrap().unwrap();
    assert_eq!(text, "f,s\n1.0,x\n2.5,\n");

    let text = df.to_csv(None, &ToCsvArgs::new().na_rep("null")).unwrap().unwrap();
    assert_eq!(text, "f,s\n1.0,x\n2.5,null\n");

    // Engine-native options win over the pandas arguments
    let text = df
        .to_csv(None, &ToCsvArgs::new().na_rep("-").option("nullValue", "null"))
        .unwrap()
        .unwrap();
    assert_eq!(text, "f,s\n1.0,x\n2.5,null\n");
}

#[test]
fn test_to_csv_argument_errors() {
    let session = Session::local();
    let df = numbers(&session);

    let err = df.to_csv(None, &ToCsvArgs::new().sep("||")).unwrap_err();
    assert_eq!(err.to_string(), "\"delimiter\" must be a 1-character string");

    let err = df
        .to_csv(None, &ToCsvArgs::new().header_aliases(&["x"]))
        .unwrap_err();
    assert_eq!(err.to_string(), "Writing 2 cols but got 1 aliases");

    let err = df.to_csv(None, &ToCsvArgs::new().columns(&["z"])).unwrap_err();
    assert!(matches!(err, distframe::Error::ColumnNotFound(_)));
}

#[test]
fn test_to_csv_directory_single_file() {
    let dir = TempTestDir::new("single_file").unwrap();
    let session = Session::local();
    let df = numbers(&session);
    let path = out_dir(&dir, "out");

    let result = df.to_csv(Some(&path), &ToCsvArgs::new().num_files(1)).unwrap();
    assert!(result.is_none());
    assert!(has_success_marker(&path));

    let parts = read_part_files(Path::new(&path));
    assert_eq!(parts, vec!["a,b\n1,4\n2,5\n3,6\n".to_string()]);
}

#[test]
fn test_to_csv_directory_options() {
    let dir = TempTestDir::new("directory_options").unwrap();
    let session = Session::local();
    let df = numbers(&session);
    let path = out_dir(&dir, "out");

    let args = ToCsvArgs::from_kwargs(&json!({
        "sep": "|",
        "header": false,
        "num_files": 1
    }))
    .unwrap();
    df.to_csv(Some(&path), &args).unwrap();

    let parts = read_part_files(Path::new(&path));
    assert_eq!(parts, vec!["1|4\n2|5\n3|6\n".to_string()]);
}

#[test]
fn test_to_csv_multiple_part_files_round_trip() {
    let dir = TempTestDir::new("round_trip").unwrap();
    let session = Session::local();
    let df = session.from_table(
        Table::new(vec![
            Column::from_i64s("i", vec![1, 2, 3, 4]),
            Column::from_f64s("f", vec![0.5, 1.0, 1.5, 2.0]),
            Column::from_options("s", DataType::String, vec![Some("a"), None, Some("c"), Some("d")])
                .unwrap(),
        ])
        .unwrap(),
    );
    let path = out_dir(&dir, "out");
    df.to_csv(Some(&path), &ToCsvArgs::new().num_files(2)).unwrap();

    let parts = read_part_files(Path::new(&path));
    assert_eq!(parts.len(), 2);
    assert!(parts.iter().all(|p| p.starts_with("i,f,s\n")));

    let back = read_csv(&session, &path, &ReadCsvArgs::new()).unwrap();
    assert_eq!(back.columns().unwrap(), vec!["i", "f", "s"]);
    assert_eq!(
        back.dtypes().unwrap().iter().map(|(_, t)| *t).collect::<Vec<_>>(),
        vec![DataType::Int64, DataType::Float64, DataType::String]
    );
    let table = back.to_table().unwrap();
    assert_eq!(table.num_rows(), 4);
    assert_eq!(table.column("f").unwrap().values()[1], DataValue::Float64(1.0));
    assert_eq!(table.column("s").unwrap().values()[1], DataValue::Null);
    assert_eq!(table.column("s").unwrap().values()[3], DataValue::from("d"));
}

#[test]
fn test_to_csv_large_floats_stay_floats() {
    let dir = TempTestDir::new("large_floats").unwrap();
    let session = Session::local();
    let df = session.from_table(
        Table::new(vec![Column::from_f64s("f", vec![1e16, 2e16, 2.5e-5])]).unwrap(),
    );

    let text = df.to_csv(None, &ToCsvArgs::new()).unwrap().unwrap();
    assert_eq!(text, "f\n1e+16\n2e+16\n2.5e-05\n");

    let path = out_dir(&dir, "out");
    df.to_csv(Some(&path), &ToCsvArgs::new().num_files(1)).unwrap();
    let back = read_csv(&session, &path, &ReadCsvArgs::new()).unwrap();
    assert_eq!(back.dtypes().unwrap(), vec![("f".to_string(), DataType::Float64)]);
    let table = back.to_table().unwrap();
    assert_eq!(table.column("f").unwrap().values()[0], DataValue::Float64(1e16));
    assert_eq!(table.column("f").unwrap().values()[2], DataValue::Float64(2.5e-5));
}

#[test]
fn test_to_csv_null_representation_round_trip() {
    let dir = TempTestDir::new("null_round_trip").unwrap();
    let session = Session::local();
    let df = session.from_table(
        Table::new(vec![
            Column::from_options("s", DataType::String, vec![Some("a"), None, Some("")]).unwrap(),
            Column::from_options("i", DataType::Int64, vec![Some(1i64), Some(2), None]).unwrap(),
        ])
        .unwrap(),
    );
    let path = out_dir(&dir, "out");
    df.to_csv(Some(&path), &ToCsvArgs::new().na_rep("null").num_files(1))
        .unwrap();
    assert_eq!(
        read_part_files(Path::new(&path)),
        vec!["s,i\na,1\nnull,2\n,null\n".to_string()]
    );

    let back = read_csv(&session, &path, &ReadCsvArgs::new().option("nullValue", "null")).unwrap();
    assert_eq!(
        back.dtypes().unwrap(),
        vec![("s".to_string(), DataType::String), ("i".to_string(), DataType::Int64)]
    );
    let table = back.to_table().unwrap();
    assert_eq!(table.column("s").unwrap().values()[0], DataValue::from("a"));
    assert_eq!(table.column("s").unwrap().values()[1], DataValue::Null);
    assert_eq!(table.column("i").unwrap().values()[1], DataValue::Int64(2));
    assert_eq!(table.column("i").unwrap().values()[2], DataValue::Null);
}

#[test]
fn test_to_csv_save_modes() {
    let dir = TempTestDir::new("save_modes").unwrap();
    let session = Session::local();
    let df = numbers(&session);
    let path = out_dir(&dir, "out");

    df.to_csv(Some(&path), &ToCsvArgs::new().num_files(1)).unwrap();

    let err = df
        .to_csv(
            Some(&path),
            &ToCsvArgs::new().num_files(1).mode(SaveMode::ErrorIfExists),
        )
        .unwrap_err();
    assert!(err.to_string().contains("already exists"));

    df.head(1)
        .to_csv(Some(&path), &ToCsvArgs::new().num_files(1).mode(SaveMode::Ignore))
        .unwrap();
    assert_eq!(read_part_files(Path::new(&path)), vec!["a,b\n1,4\n2,5\n3,6\n".to_string()]);

    df.head(1)
        .to_csv(Some(&path), &ToCsvArgs::new().num_files(1).mode(SaveMode::Append))
        .unwrap();
    assert_eq!(read_part_files(Path::new(&path)).len(), 2);
    let back = read_csv(&session, &path, &ReadCsvArgs::new()).unwrap();
    assert_eq!(back.count().unwrap(), 4);

    df.head(2)
        .to_csv(Some(&path), &ToCsvArgs::new().num_files(1))
        .unwrap();
    assert_eq!(read_part_files(Path::new(&path)), vec!["a,b\n1,4\n2,5\n".to_string()]);
}

#[test]
fn test_to_csv_directory_with_index() {
    let dir = TempTestDir::new("directory_index").unwrap();
    let session = Session::local();
    let df = numbers(&session);
    let path = out_dir(&dir, "out");

    df.to_csv(Some(&path), &ToCsvArgs::new().index(true).num_files(1))
        .unwrap();
    let parts = read_part_files(Path::new(&path));
    assert_eq!(parts, vec![",a,b\n0,1,4\n1,2,5\n2,3,6\n".to_string()]);
}

#[test]
fn test_local_frame_to_csv() {
    let dir = TempTestDir::new("local_frame").unwrap();
    let frame = LocalFrame::new(vec![
        Column::from_strs("name", &["Alice", "Bob"]),
        Column::from_i64s("amount", vec![100, -200]),
    ])
    .unwrap();

    let text = frame.to_csv(None, &ToCsvArgs::new()).unwrap().unwrap();
    assert_eq!(text, ",name,amount\n0,Alice,100\n1,Bob,-200\n");

    let file = dir.path().join("frame.csv");
    let file = file.to_string_lossy().to_string();
    let result = frame.to_csv(Some(&file), &ToCsvArgs::new().index(false)).unwrap();
    assert!(result.is_none());
    assert_eq!(fs::read_to_string(&file).unwrap(), "name,amount\nAlice,100\nBob,-200\n");
}
