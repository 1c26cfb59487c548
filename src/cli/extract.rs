use anyhow::{Context, Result};
use log::{error, info};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use t3_chomper::extract::{ExtractionReport, Extractor, PkaTableLayout, FAILED_FILENAMES};
use t3_chomper::t3r::{detect_category, AssayCategory, LogPParser, LogPSelection, PkaParser};

pub struct ExtractArgs {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub category: Option<AssayCategory>,
    pub layout: PkaTableLayout,
    pub selection: LogPSelection,
    pub json: bool,
}

/// Extract results from one T3R file or a directory of them
pub fn run(args: ExtractArgs) -> Result<()> {
    info!("T3R Result Extraction");
    info!("=====================");
    info!("Input: {}", args.path.display());

    let extractor = Extractor::new(&args.path)
        .with_context(|| format!("Failed to collect input files from {}", args.path.display()))?;

    let category = match args.category {
        Some(category) => category,
        None => {
            let first = extractor
                .files()
                .first()
                .context("No input files to detect the result category from")?;
            let category = detect_category(first).with_context(|| {
                format!(
                    "Failed to detect result category from {} (pass --protocol)",
                    first.display()
                )
            })?;
            info!("Detected {} results from {}", category, first.display());
            category
        }
    };

    let report = match category {
        AssayCategory::Pka => extractor.extract(&PkaParser::new()),
        AssayCategory::LogP => extractor.extract(&LogPParser::with_selection(args.selection)),
    };

    if report.records.is_empty() {
        error!("No parsed results");
    }

    match &args.output {
        Some(output) => {
            info!("Finished parsing, writing to {}", output.display());
            write_output(&report, &args, File::create(output).with_context(|| {
                format!("Failed to create output file: {}", output.display())
            })?)?;

            let failed_path = output
                .parent()
                .map(|dir| dir.join(FAILED_FILENAMES))
                .unwrap_or_else(|| PathBuf::from(FAILED_FILENAMES));
            if report.failures.is_empty() {
                info!("No files failed to parse");
            }
            let failed = File::create(&failed_path).with_context(|| {
                format!("Failed to create failure list: {}", failed_path.display())
            })?;
            report
                .write_failures(failed)
                .context("Failed to write failure list")?;
        }
        None => {
            info!("No output file provided, writing to stdout");
            let stdout = io::stdout();
            write_output(&report, &args, stdout.lock())?;
        }
    }

    let summary = report.to_run_report();
    // stdout may carry the extracted table
    #[cfg(feature = "colorized_output")]
    {
        eprintln!("{}", summary.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        eprintln!("{}", summary);
    }

    if summary.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

fn write_output<W: Write>(report: &ExtractionReport, args: &ExtractArgs, mut writer: W) -> Result<()> {
    if args.json {
        let json = report.to_json().context("Failed to serialize results")?;
        writeln!(writer, "{}", json)?;
    } else {
        report
            .write_records(&mut writer, args.layout)
            .context("Failed to write results")?;
    }
    writer.flush()?;
    Ok(())
}
