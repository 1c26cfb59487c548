use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::path::PathBuf;

use t3_chomper::merge::{build_experiment_table, MergeConfig};
use t3_chomper::report::{ReportEntry, RunReport};
use t3_chomper::table::{FileRole, Table};
use t3_chomper::tray::{LogPSolvent, TrayFormat, TrayLayout, TrayWriter};

pub struct GencsvArgs {
    pub regi: PathBuf,
    pub pka: PathBuf,
    pub filter_file: Option<PathBuf>,
    pub output: PathBuf,
    pub merged_output: Option<PathBuf>,
    pub protocol: TrayFormat,
    pub sample_col: Option<String>,
    pub concentration: Option<f64>,
    pub volume: Option<f64>,
    pub solvent: Option<LogPSolvent>,
}

/// Generate tray import files for the instrument
pub fn run(args: GencsvArgs) -> Result<()> {
    info!("Tray Import Generation");
    info!("======================");
    info!("Protocol: {}", args.protocol);
    info!("Registration: {}", args.regi.display());
    info!("pKa: {}", args.pka.display());
    info!("Output: {}", args.output.display());

    // Fails before any input is read if a logP run has no solvent
    let layout = TrayLayout::new(args.protocol, args.solvent)?;

    let mut config = MergeConfig::new(args.protocol);
    if let Some(sample_col) = args.sample_col {
        config = config.with_sample_col(sample_col);
    }
    if let Some(concentration) = args.concentration {
        config = config.with_concentration(concentration);
    }
    if let Some(volume) = args.volume {
        config = config.with_volume(volume);
    }

    let registration = Table::from_path(FileRole::Registration, &args.regi)?;
    let pkas = Table::from_path(FileRole::Pka, &args.pka)?;
    let filter = args
        .filter_file
        .as_ref()
        .map(|path| Table::from_path(FileRole::Filter, path))
        .transpose()?;

    let merged = build_experiment_table(&registration, &pkas, filter.as_ref(), &config)
        .context("Failed to merge registration and pKa tables")?;

    println!(
        "Found {} samples with estimated pKa values.",
        merged.rows.len()
    );

    let trays = layout.lay_out(&merged.rows)?;
    let tray_name = args
        .output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tray".to_string());
    let written = TrayWriter::new(&layout, tray_name)
        .write_all(&trays, &args.output)
        .with_context(|| format!("Failed to write trays to {}", args.output.display()))?;

    // After the trays, so a merged table inside the output directory is allowed
    if let Some(path) = &args.merged_output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create merged table: {}", path.display()))?;
        merged
            .write_csv(file)
            .with_context(|| format!("Failed to write merged table: {}", path.display()))?;
        info!("Wrote merged table to {}", path.display());
    }

    let mut report = RunReport::new(format!("{} tray generation", layout.format()));
    for path in &written {
        report.add(ReportEntry::ok(path.display().to_string()));
    }
    for sample in &merged.dropped {
        report.add(ReportEntry::warning(sample, "no pKa data, sample dropped"));
    }

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    Ok(())
}
