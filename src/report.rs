//! End-of-run summary.
//!
//! Non-fatal anomalies (files that failed to parse, samples dropped for lack of
//! pKa data) are logged as they happen, and also collected into a [`RunReport`]
//! that the CLI prints once the run is over.

use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Outcome of one item of a run
#[derive(Debug, Clone, PartialEq)]
pub enum EntryStatus {
    /// Item processed
    Ok,
    /// Item processed or skipped with a non-fatal problem
    Warning(String),
    /// Item failed
    Failed(String),
}

impl EntryStatus {
    fn is_ok(&self) -> bool {
        matches!(self, EntryStatus::Ok)
    }

    fn is_warning(&self) -> bool {
        matches!(self, EntryStatus::Warning(_))
    }

    fn is_failed(&self) -> bool {
        matches!(self, EntryStatus::Failed(_))
    }
}

/// One line of a run report: a file, a sample or an output
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    /// What the entry is about
    pub subject: String,
    /// Its outcome
    pub status: EntryStatus,
}

impl ReportEntry {
    /// A successful entry
    pub fn ok(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            status: EntryStatus::Ok,
        }
    }

    /// A non-fatal anomaly
    pub fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            status: EntryStatus::Warning(message.into()),
        }
    }

    /// A failure
    pub fn failed(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            status: EntryStatus::Failed(message.into()),
        }
    }
}

/// Summary of one `extract` or `gencsv` run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Report heading, e.g. "pKa extraction"
    pub title: String,
    /// Entries in processing order
    pub entries: Vec<ReportEntry>,
}

impl RunReport {
    /// Create an empty report
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// Append an entry
    pub fn add(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    /// Whether any entry failed
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|e| e.status.is_failed())
    }

    /// Whether any entry carries a warning
    pub fn has_warnings(&self) -> bool {
        self.entries.iter().any(|e| e.status.is_warning())
    }

    /// Number of successful entries
    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.status.is_ok()).count()
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.entries.iter().filter(|e| e.status.is_warning()).count()
    }

    /// Number of failures
    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|e| e.status.is_failed()).count()
    }

    /// Only the entries that are not OK; successful ones are summarized as a count
    fn anomalies(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| !e.status.is_ok())
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();
            output.push_str(&format!("{}\n", style(&self.title).bold().cyan()));
            output.push_str(&format!(
                "{}\n",
                style("=".repeat(self.title.chars().count())).cyan()
            ));

            for entry in self.anomalies() {
                match &entry.status {
                    EntryStatus::Warning(msg) => output.push_str(&format!(
                        "[{}] {} - {}\n",
                        WARN,
                        style(&entry.subject).yellow(),
                        msg
                    )),
                    EntryStatus::Failed(msg) => output.push_str(&format!(
                        "[{}] {} - {}\n",
                        FAIL,
                        style(&entry.subject).red(),
                        msg
                    )),
                    EntryStatus::Ok => {}
                }
            }

            output.push_str(&format!(
                "{}: {} succeeded, {} warnings, {} failed\n",
                style("Summary").bold(),
                style(self.success_count()).green(),
                style(self.warning_count()).yellow(),
                style(self.failure_count()).red()
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;

        for entry in self.anomalies() {
            match &entry.status {
                EntryStatus::Warning(msg) => writeln!(f, "[⚠] {} - {}", entry.subject, msg)?,
                EntryStatus::Failed(msg) => writeln!(f, "[✗] {} - {}", entry.subject, msg)?,
                EntryStatus::Ok => {}
            }
        }

        writeln!(
            f,
            "Summary: {} succeeded, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_display() {
        let mut report = RunReport::new("pKa extraction");
        report.add(ReportEntry::ok("a.t3r"));
        report.add(ReportEntry::ok("b.t3r"));
        report.add(ReportEntry::failed(
            "c.t3r",
            "Could not find measured results in file",
        ));
        report.add(ReportEntry::warning("C", "no pKa data"));

        assert!(report.has_failures());
        assert!(report.has_warnings());
        assert_eq!(report.success_count(), 2);

        let text = report.to_string();
        assert!(text.starts_with("pKa extraction\n==============\n"));
        assert!(text.contains("[✗] c.t3r - Could not find measured results in file\n"));
        assert!(text.contains("[⚠] C - no pKa data\n"));
        assert!(!text.contains("a.t3r"));
        assert!(text.ends_with("Summary: 2 succeeded, 1 warnings, 1 failed\n"));
    }

    #[test]
    fn test_clean_run() {
        let mut report = RunReport::new("Tray generation");
        report.add(ReportEntry::ok("tray_0.csv"));
        assert!(!report.has_failures());
        assert!(!report.has_warnings());
        assert!(report.format_colored().contains("Tray generation"));
    }
}
