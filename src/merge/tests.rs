use super::*;
use crate::pka::{ConversionError, PkaStringError};
use crate::table::{FileRole, TableError};

fn table(role: FileRole, name: &str, csv: &str) -> Table {
    Table::from_reader(role, name, csv.as_bytes()).unwrap()
}

fn registration(csv: &str) -> Table {
    table(FileRole::Registration, "regi.csv", csv)
}

fn pkas(csv: &str) -> Table {
    table(FileRole::Pka, "pka.csv", csv)
}

const REGI_ABC: &str = "sample,well,mw\nA,A1,250.3\nB,A2,180.1\nC,A3,301\n";
const PKA_SHORT: &str = "sample,reformatted_pkas\nA,\"ACID,2.5,BASE,9.3\"\nB,\"ACID,3.1\"\n";

#[test]
fn test_merge_drops_samples_without_pka() {
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let outcome =
        build_experiment_table(&registration(REGI_ABC), &pkas(PKA_SHORT), None, &config).unwrap();

    assert_eq!(outcome.rows.len(), 2);
    assert_eq!(outcome.rows[0].sample, "A");
    assert_eq!(outcome.rows[0].well, "A1");
    assert_eq!(outcome.rows[0].mw, "250.3");
    assert_eq!(outcome.rows[0].fw, None);
    assert_eq!(outcome.rows[0].reformatted_pkas.to_string(), "ACID,2.5,BASE,9.3");
    assert_eq!(outcome.rows[1].sample, "B");
    assert_eq!(outcome.dropped, vec!["C".to_string()]);
    assert_eq!(outcome.filtered, None);
}

#[test]
fn test_merge_injects_run_parameters() {
    let config = MergeConfig::new(TrayFormat::UvMetric)
        .with_concentration(20.0)
        .with_volume(2.5);
    let outcome =
        build_experiment_table(&registration(REGI_ABC), &pkas(PKA_SHORT), None, &config).unwrap();
    assert!(outcome
        .rows
        .iter()
        .all(|r| r.concentration_mm == 20.0 && r.volume_ul == 2.5));

    let defaults = MergeConfig::new(TrayFormat::UvMetric);
    assert_eq!(defaults.concentration_mm, 10.0);
    assert_eq!(defaults.volume_ul, 5.0);
    assert_eq!(defaults.sample_col, "sample");
}

#[test]
fn test_merge_mixed_case_headers() {
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let lower =
        build_experiment_table(&registration(REGI_ABC), &pkas(PKA_SHORT), None, &config).unwrap();

    let regi = "SAMPLE,Well,MW\nA,A1,250.3\nB,A2,180.1\nC,A3,301\n";
    let pka = "Sample,Reformatted_PKAS\nA,\"ACID,2.5,BASE,9.3\"\nB,\"ACID,3.1\"\n";
    let mixed = build_experiment_table(&registration(regi), &pkas(pka), None, &config).unwrap();

    assert_eq!(lower, mixed);
}

#[test]
fn test_merge_custom_sample_column() {
    let regi = "ID,well,mw\nA,A1,250.3\n";
    let pka = "id,reformatted_pkas\nA,\"BASE,7.7\"\n";
    let config = MergeConfig::new(TrayFormat::FastUvPska).with_sample_col("Id");
    let outcome = build_experiment_table(&registration(regi), &pkas(pka), None, &config).unwrap();
    assert_eq!(outcome.rows.len(), 1);
}

#[test]
fn test_merge_missing_registration_column() {
    let regi = "sample,mw\nA,250.3\n";
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let err =
        build_experiment_table(&registration(regi), &pkas(PKA_SHORT), None, &config).unwrap_err();
    match err {
        MergeError::Table(TableError::MissingColumn { column, role, .. }) => {
            assert_eq!(column, "well");
            assert_eq!(role, FileRole::Registration);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_merge_solid_protocols_require_fw_and_mg() {
    let config = MergeConfig::new(TrayFormat::PhMetric);
    let err = build_experiment_table(&registration(REGI_ABC), &pkas(PKA_SHORT), None, &config)
        .unwrap_err();
    assert!(matches!(
        err,
        MergeError::Table(TableError::MissingColumn { ref column, .. }) if column == "fw"
    ));

    let regi = "sample,well,mw,FW,MG\nA,A1,250.3,286.7,1.2\nB,A2,180.1,180.1,0.9\n";
    let outcome = build_experiment_table(&registration(regi), &pkas(PKA_SHORT), None, &config)
        .unwrap();
    assert_eq!(outcome.rows[0].fw.as_deref(), Some("286.7"));
    assert_eq!(outcome.rows[0].mg.as_deref(), Some("1.2"));
}

#[test]
fn test_merge_required_weight_must_be_present() {
    let regi = "sample,well,mw,fw,mg\nA,A1,250.3,286.7,\n";
    let config = MergeConfig::new(TrayFormat::LogP);
    let err =
        build_experiment_table(&registration(regi), &pkas(PKA_SHORT), None, &config).unwrap_err();
    assert!(matches!(err, MergeError::InvalidValue { column: "mg", .. }));
}

#[test]
fn test_merge_invalid_mw() {
    let regi = "sample,well,mw\nA,A1,heavy\n";
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let err =
        build_experiment_table(&registration(regi), &pkas(PKA_SHORT), None, &config).unwrap_err();
    assert!(matches!(err, MergeError::InvalidValue { column: "mw", .. }));
}

#[test]
fn test_merge_filter_subset() {
    let filter = table(FileRole::Filter, "filter.csv", "Sample\nB\nZ\n");
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let outcome = build_experiment_table(
        &registration(REGI_ABC),
        &pkas(PKA_SHORT),
        Some(&filter),
        &config,
    )
    .unwrap();
    assert_eq!(outcome.filtered, Some(1));
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].sample, "B");
    assert!(outcome.dropped.is_empty());
}

#[test]
fn test_merge_filter_skips_invalid_excluded_rows() {
    let regi = "sample,well,mw\nA,A1,100\nD,A4,n/a\n,A5,\nA,A6,100\n";
    let filter = table(FileRole::Filter, "filter.csv", "sample\nA\n");
    let pka = "sample,reformatted_pkas\nA,\"ACID,2.5\"\n";
    let config = MergeConfig::new(TrayFormat::FastUvPska);

    // D and the blank row are filtered out; the duplicate A still counts
    let err = build_experiment_table(&registration(regi), &pkas(pka), Some(&filter), &config)
        .unwrap_err();
    assert!(matches!(err, MergeError::DuplicateSample { ref sample, .. } if sample == "A"));

    let regi = "sample,well,mw\nA,A1,100\nD,A4,n/a\n,A5,\n";
    let outcome = build_experiment_table(&registration(regi), &pkas(pka), Some(&filter), &config)
        .unwrap();
    assert_eq!(outcome.filtered, Some(1));
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].sample, "A");

    let err =
        build_experiment_table(&registration(regi), &pkas(pka), None, &config).unwrap_err();
    assert!(matches!(err, MergeError::InvalidValue { column: "mw", ref sample, .. } if sample == "D"));
}

#[test]
fn test_merge_unused_weights_are_not_checked() {
    let regi = "sample,well,mw,fw,mg\nA,A1,250.3,N/A,\n";
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let outcome =
        build_experiment_table(&registration(regi), &pkas(PKA_SHORT), None, &config).unwrap();
    assert_eq!(outcome.rows[0].fw.as_deref(), Some("N/A"));
    assert_eq!(outcome.rows[0].mg, None);

    let config = MergeConfig::new(TrayFormat::PhMetric);
    let err =
        build_experiment_table(&registration(regi), &pkas(PKA_SHORT), None, &config).unwrap_err();
    assert!(matches!(err, MergeError::InvalidValue { column: "fw", .. }));
}

#[test]
fn test_merge_keeps_number_text() {
    let regi = "sample,well,mw,fw,mg\nA,A1,301.20,286.70,1.50\n";
    let config = MergeConfig::new(TrayFormat::LogP);
    let outcome =
        build_experiment_table(&registration(regi), &pkas(PKA_SHORT), None, &config).unwrap();
    assert_eq!(outcome.rows[0].mw, "301.20");
    assert_eq!(outcome.rows[0].fw.as_deref(), Some("286.70"));
    assert_eq!(outcome.rows[0].mg.as_deref(), Some("1.50"));

    let mut buf = Vec::new();
    outcome.write_csv(&mut buf).unwrap();
    assert!(String::from_utf8(buf)
        .unwrap()
        .contains("A,A1,301.20,286.70,1.50,"));
}

#[test]
fn test_merge_filter_disjoint() {
    let filter = table(FileRole::Filter, "filter.csv", "sample\nX\nY\n");
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let err = build_experiment_table(
        &registration(REGI_ABC),
        &pkas(PKA_SHORT),
        Some(&filter),
        &config,
    )
    .unwrap_err();
    match err {
        MergeError::NoFilterMatch {
            filter,
            registration,
        } => {
            assert_eq!(filter, "filter.csv");
            assert_eq!(registration, "regi.csv");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_merge_long_form_pka() {
    let pka = "sample,pka_value,pka_type\nA,9.3,base\nA,2.5,acid\nB,3.1,Acid\n";
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let outcome =
        build_experiment_table(&registration(REGI_ABC), &pkas(pka), None, &config).unwrap();
    assert_eq!(outcome.rows.len(), 2);
    assert_eq!(outcome.rows[0].reformatted_pkas.to_string(), "ACID,2.5,BASE,9.3");
    assert_eq!(outcome.rows[1].reformatted_pkas.to_string(), "ACID,3.1");
}

#[test]
fn test_merge_long_form_missing_column() {
    let pka = "sample,pka_value\nA,9.3\n";
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let err =
        build_experiment_table(&registration(REGI_ABC), &pkas(pka), None, &config).unwrap_err();
    assert!(matches!(
        err,
        MergeError::Conversion(ConversionError::MissingColumn { ref column, role: FileRole::Pka, .. })
            if column == "pka_type"
    ));
}

#[test]
fn test_merge_blank_pka_string_is_dropped() {
    let pka = "sample,reformatted_pkas\nA,\"ACID,2.5\"\nB,\n";
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let outcome =
        build_experiment_table(&registration(REGI_ABC), &pkas(pka), None, &config).unwrap();
    assert_eq!(outcome.dropped, vec!["B".to_string(), "C".to_string()]);
}

#[test]
fn test_merge_invalid_pka_string() {
    let pka = "sample,reformatted_pkas\nA,\"ACID,9.3,BASE,2.5\"\n";
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let err =
        build_experiment_table(&registration(REGI_ABC), &pkas(pka), None, &config).unwrap_err();
    assert!(matches!(
        err,
        MergeError::InvalidPkaString {
            error: PkaStringError::Unsorted { .. },
            ..
        }
    ));
}

#[test]
fn test_merge_duplicate_samples() {
    let regi = "sample,well,mw\nA,A1,250.3\nA,A2,250.3\n";
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let err =
        build_experiment_table(&registration(regi), &pkas(PKA_SHORT), None, &config).unwrap_err();
    assert!(matches!(
        err,
        MergeError::DuplicateSample {
            role: FileRole::Registration,
            ..
        }
    ));

    let pka = "sample,reformatted_pkas\nA,\"ACID,2.5\"\nA,\"ACID,2.6\"\n";
    let err =
        build_experiment_table(&registration(REGI_ABC), &pkas(pka), None, &config).unwrap_err();
    assert!(matches!(
        err,
        MergeError::DuplicateSample {
            role: FileRole::Pka,
            ..
        }
    ));
}

#[test]
fn test_merge_blank_registration_sample() {
    let regi = "sample,well,mw\nA,A1,250.3\n,A2,100\n";
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let err =
        build_experiment_table(&registration(regi), &pkas(PKA_SHORT), None, &config).unwrap_err();
    assert!(matches!(err, MergeError::BlankSample { line: 3, .. }));
}

#[test]
fn test_merge_outcome_write_csv() {
    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let outcome =
        build_experiment_table(&registration(REGI_ABC), &pkas(PKA_SHORT), None, &config).unwrap();
    let mut buf = Vec::new();
    outcome.write_csv(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("sample,well,mw,fw,mg,reformatted_pkas,concentration_mm,volume_ul")
    );
    assert_eq!(lines.next(), Some("A,A1,250.3,,,\"ACID,2.5,BASE,9.3\",10.0,5.0"));
}
