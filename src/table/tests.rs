use super::*;

#[test]
fn test_column_index_case_insensitive() {
    let index = ColumnIndex::new(["Sample", " WELL ", "Mw"]);
    assert_eq!(index.get("sample"), Some(0));
    assert_eq!(index.get("SAMPLE"), Some(0));
    assert_eq!(index.get("well"), Some(1));
    assert_eq!(index.get("MW"), Some(2));
    assert_eq!(index.get("fw"), None);
    assert_eq!(index.len(), 3);
}

#[test]
fn test_column_index_first_duplicate_wins() {
    let index = ColumnIndex::new(["sample", "SAMPLE"]);
    assert_eq!(index.get("sample"), Some(0));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_table_from_reader() {
    let csv = "Sample,Well,MW\nA, A1 ,250.3\n\nB,A2,180.1\n";
    let table = Table::from_reader(FileRole::Registration, "regi.csv", csv.as_bytes()).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.headers(), &["Sample", "Well", "MW"]);

    let well = table.column("well").unwrap();
    let wells: Vec<&str> = table.rows().map(|r| r.get(well)).collect();
    assert_eq!(wells, vec!["A1", "A2"]);
}

#[test]
fn test_table_short_rows_read_as_blank() {
    let csv = "sample,well,mw\nA,A1\n";
    let table = Table::from_reader(FileRole::Registration, "regi.csv", csv.as_bytes()).unwrap();
    let mw = table.column("mw").unwrap();
    let row = table.rows().next().unwrap();
    assert_eq!(row.get(mw), "");
    assert_eq!(row.line(), 2);
}

#[test]
fn test_table_require_names_file_and_role() {
    let csv = "sample,well\nA,A1\n";
    let table = Table::from_reader(FileRole::Registration, "regi.csv", csv.as_bytes()).unwrap();

    let err = table.require(&["sample", "well", "MW"]).unwrap_err();
    match &err {
        TableError::MissingColumn { column, role, file } => {
            assert_eq!(column, "mw");
            assert_eq!(*role, FileRole::Registration);
            assert_eq!(file, "regi.csv");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        err.to_string(),
        "Expected column \"mw\" is missing in registration file regi.csv"
    );
}

#[test]
fn test_table_missing_file() {
    let err = Table::from_path(FileRole::Filter, "/nonexistent/filter.csv").unwrap_err();
    assert!(matches!(err, TableError::Io { role: FileRole::Filter, .. }));
}
