//! Integration tests for t3-chomper
//!
//! These tests run the full pipelines on the result files in `tests/data`:
//! extraction from T3R files, and tray generation from extracted pKa values.

use std::fs;
use std::path::{Path, PathBuf};

use t3_chomper::extract::{Extractor, PkaTableLayout, FAILED_FILENAMES};
use t3_chomper::merge::{build_experiment_table, MergeConfig, MergeError};
use t3_chomper::t3r::{
    detect_category, AssayCategory, LogPParser, LogPSelection, MeasurementSourceKind, ParseError,
    PkaParser, ResultParser,
};
use t3_chomper::table::{FileRole, Table, TableError};
use t3_chomper::tray::{LogPSolvent, TrayError, TrayFormat, TrayLayout, TrayWriter};
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Copy the named fixtures into a fresh directory
fn results_dir(names: &[&str]) -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    for name in names {
        fs::copy(fixture(name), dir.path().join(name)).unwrap();
    }
    dir
}

fn table(role: FileRole, name: &str, content: &str) -> Table {
    Table::from_reader(role, name, content.as_bytes()).unwrap()
}

#[test]
fn test_parse_fast_uv_fixture() {
    let record = PkaParser::new()
        .parse_file(fixture("fast_uv_pka.t3r"))
        .unwrap();

    assert_eq!(record.summary.filename, "fast_uv_pka.t3r");
    assert_eq!(record.summary.sample_id, "OCNT-0000018-AQ-001");
    assert_eq!(record.summary.assay_quality.as_deref(), Some("Good"));

    let pka = record.as_pka().unwrap();
    assert_eq!(pka.source, MeasurementSourceKind::FastDpasMean);
    assert_eq!(pka.reformatted().to_string(), "ACID,2.86,BASE,9.64");
    assert_eq!(pka.results[1].std, Some(0.11));
    assert_eq!(pka.results[1].temperature, Some(25.1));

    let cosolvent = pka.cosolvent.as_ref().unwrap();
    assert_eq!(cosolvent.name.as_deref(), Some("Methanol"));
    assert_eq!(cosolvent.fractions, vec![0.3, 0.4]);
}

#[test]
fn test_parse_yasuda_fixture() {
    let record = PkaParser::new()
        .parse_file(fixture("pka_yasuda.t3r"))
        .unwrap();
    let pka = record.as_pka().unwrap();
    assert_eq!(pka.source, MeasurementSourceKind::YasudaShedlovsky);
    assert_eq!(pka.reformatted().to_string(), "BASE,7.82");
    assert_eq!(pka.results[0].std, Some(0.05));
    assert!(pka.cosolvent.is_none());
}

#[test]
fn test_parse_logp_fixture() {
    let path = fixture("logp_octanol.t3r");
    assert_eq!(detect_category(&path).unwrap(), AssayCategory::LogP);

    let record = LogPParser::new().parse_file(&path).unwrap();
    let logp = record.as_logp().unwrap();
    assert_eq!(logp.value, 2.87);
    assert_eq!(logp.candidates, vec![1.42, 2.87]);
    assert_eq!(logp.rmsd, Some(0.0516447));
    assert_eq!(logp.solvent.as_deref(), Some("Octanol"));

    let first = LogPParser::with_selection(LogPSelection::First)
        .parse_file(&path)
        .unwrap();
    assert_eq!(first.as_logp().unwrap().value, 1.42);
}

#[test]
fn test_fixture_failures() {
    assert!(matches!(
        PkaParser::new().parse_file(fixture("no_measurement.t3r")),
        Err(ParseError::NoMeasurementFound)
    ));
    assert!(matches!(
        LogPParser::new().parse_file(fixture("fast_uv_pka.t3r")),
        Err(ParseError::CategoryMismatch { .. })
    ));
    assert!(matches!(
        PkaParser::new().parse_file(fixture("does_not_exist.t3r")),
        Err(ParseError::IoError(_))
    ));
}

#[test]
fn test_batch_extraction_writes_results_and_failures() {
    let dir = results_dir(&[
        "fast_uv_pka.t3r",
        "pka_yasuda.t3r",
        "no_measurement.t3r",
        "logp_octanol.t3r",
    ]);
    let report = Extractor::new(dir.path())
        .unwrap()
        .extract(&PkaParser::new());

    assert_eq!(report.num_succeeded(), 2);
    assert_eq!(report.num_failed(), 2);

    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    report
        .write_records(fs::File::create(out.join("pkas.csv")).unwrap(), PkaTableLayout::PerRecord)
        .unwrap();
    report
        .write_failures(fs::File::create(out.join(FAILED_FILENAMES)).unwrap())
        .unwrap();

    let results = fs::read_to_string(out.join("pkas.csv")).unwrap();
    assert_eq!(results.lines().count(), 3);
    assert!(results.contains("\"ACID,2.86,BASE,9.64\""));
    assert!(results.contains(",Methanol,0.3;0.4,"));

    let failed = fs::read_to_string(out.join(FAILED_FILENAMES)).unwrap();
    assert!(failed.contains("logp_octanol.t3r"));
    assert!(failed.contains("no_measurement.t3r"));

    let run = report.to_run_report();
    assert!(run.has_failures());
    assert_eq!(run.success_count(), 2);
}

#[test]
fn test_extract_then_generate_fast_uv_trays() {
    let dir = results_dir(&["fast_uv_pka.t3r", "pka_yasuda.t3r"]);
    let report = Extractor::new(dir.path())
        .unwrap()
        .extract(&PkaParser::new());

    let mut long_form = Vec::new();
    report
        .write_records(&mut long_form, PkaTableLayout::PerPka)
        .unwrap();
    let pkas = Table::from_reader(FileRole::Pka, "pkas.csv", long_form.as_slice()).unwrap();

    let registration = table(
        FileRole::Registration,
        "regi.csv",
        "Sample,Well,MW\n\
         OCNT-0000018-AQ-001,A1,301.2\n\
         OCNT-0000042-AQ-001,A2,188.4\n\
         OCNT-0000099-AQ-001,A3,220.0\n",
    );

    let config = MergeConfig::new(TrayFormat::FastUvPska);
    let merged = build_experiment_table(&registration, &pkas, None, &config).unwrap();
    assert_eq!(merged.rows.len(), 2);
    assert_eq!(merged.dropped, vec!["OCNT-0000099-AQ-001".to_string()]);

    let layout = TrayLayout::new(config.protocol, None).unwrap();
    let trays = layout.lay_out(&merged.rows).unwrap();
    let out = dir.path().join("fast_uv");
    let written = TrayWriter::new(&layout, "fast_uv")
        .write_all(&trays, &out)
        .unwrap();
    assert_eq!(written, vec![out.join("tray_0.csv")]);

    let expected = "ScheduleImportCsv\n\
                    \n\
                    OCNT-0000018-AQ-001,ACID,2.86,BASE,9.64,SYM,A1,MW,301.2\n\
                    OCNT-0000042-AQ-001,BASE,7.82,SYM,A2,MW,188.4\n\
                    \n\
                    TRAY,fast_uv_0\n\
                    Fast UV Buffer Calib MeOH\n\
                    Fast UV psKa,title,pka of OCNT-0000018-AQ-001,OCNT-0000018-AQ-001,OCNT-0000018-AQ-001,1,volume,0.005,Concentration,10,DMSO,1\n\
                    Fast UV psKa,title,pka of OCNT-0000042-AQ-001,OCNT-0000042-AQ-001,OCNT-0000042-AQ-001,1,volume,0.005,Concentration,10,DMSO,1\n";
    assert_eq!(fs::read_to_string(&written[0]).unwrap(), expected);
}

#[test]
fn test_generate_logp_trays_from_short_form() {
    let dir = tempdir().unwrap();
    let mut regi = String::from("sample,well,mw,fw,mg\n");
    let mut pka = String::from("SAMPLE,reformatted_pkas\n");
    for i in 0..20 {
        regi.push_str(&format!("S{i},A{i},250.0,286.5,1.5\n"));
        pka.push_str(&format!("S{i},\"BASE,{}.5\"\n", 4 + i % 5));
    }
    let registration = table(FileRole::Registration, "regi.csv", &regi);
    let pkas = table(FileRole::Pka, "pka.csv", &pka);

    let config = MergeConfig::new(TrayFormat::LogP).with_volume(2.0);
    let merged = build_experiment_table(&registration, &pkas, None, &config).unwrap();

    let layout = TrayLayout::new(TrayFormat::LogP, Some(LogPSolvent::Octanol)).unwrap();
    let trays = layout.lay_out(&merged.rows).unwrap();
    assert_eq!(trays.len(), 2);
    assert_eq!(trays[0].num_samples(), 16);
    assert_eq!(trays[1].num_samples(), 4);

    let written = TrayWriter::new(&layout, "logp")
        .write_all(&trays, dir.path())
        .unwrap();
    let second = fs::read_to_string(&written[1]).unwrap();
    assert!(second.contains("TRAY,logp_1\n"));
    assert!(second.contains("pH-metric medium logP octanol,title,logP of S16,S16,S16,1,fw,286.5,mg,1.5\n"));
}

#[test]
fn test_filter_file_limits_samples() {
    let registration = table(
        FileRole::Registration,
        "regi.csv",
        "sample,well,mw\nA,A1,100\nB,A2,200\nC,A3,300\n",
    );
    let pkas = table(
        FileRole::Pka,
        "pka.csv",
        "sample,reformatted_pkas\nA,\"ACID,4.1\"\nB,\"BASE,8.0\"\nC,\"ACID,2.2\"\n",
    );
    let filter = table(FileRole::Filter, "filter.csv", "Sample\nC\nA\n");

    let config = MergeConfig::new(TrayFormat::UvMetric);
    let merged = build_experiment_table(&registration, &pkas, Some(&filter), &config).unwrap();
    let samples: Vec<&str> = merged.rows.iter().map(|r| r.sample.as_str()).collect();
    assert_eq!(samples, vec!["A", "C"]);
    assert_eq!(merged.filtered, Some(2));
}

#[test]
fn test_no_trays_written_on_error() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never");

    assert!(matches!(
        TrayLayout::new(TrayFormat::LogP, None),
        Err(TrayError::MissingRequiredParameter { .. })
    ));

    // pH-metric needs weights the registration table does not have
    let registration = table(FileRole::Registration, "regi.csv", "sample,well,mw\nA,A1,100\n");
    let pkas = table(FileRole::Pka, "pka.csv", "sample,reformatted_pkas\nA,\"ACID,4.1\"\n");
    let config = MergeConfig::new(TrayFormat::PhMetric);
    let err = build_experiment_table(&registration, &pkas, None, &config).unwrap_err();
    assert!(matches!(
        err,
        MergeError::Table(TableError::MissingColumn { .. })
    ));

    assert!(!out.exists());
}
