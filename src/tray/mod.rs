//! # Tray Layout Module
//!
//! Partitions merged samples into instrument trays and writes one
//! `ScheduleImportCsv` import file per tray.
//!
//! All four protocols share one layout function, parameterized by a
//! [`TrayVariant`]:
//!
//! | Protocol     | Capacity | Step pattern                          |
//! |--------------|---------:|---------------------------------------|
//! | `fastuvpska` | 47       | CALIBRATION, then SAMPLE*             |
//! | `uvmetric`   | 24       | (CALIBRATION, SAMPLE)*                |
//! | `phmetric`   | 24       | (SAMPLE, CLEANUP)*                    |
//! | `logp`       | 16       | (SAMPLE, CLEANUP, CLEANUP)*           |
//!
//! Trays are filled in input order; the last tray may be partial.

use log::{debug, info};

mod error;
mod variant;
mod writer;


pub use error::TrayError;
pub use variant::{
    Dosing, LogPSolvent, StepKind, TrayFormat, TrayVariant, CLEANUP_EXPERIMENT, FAST_UV_PSKA,
    LOGP, PH_METRIC, UV_METRIC,
};
pub use writer::{tray_file_name, TrayWriter, IMPORT_HEADER};

use crate::merge::MergedRow;
use crate::table::columns::{FW, MG};

/// One operation in a tray
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrayStep<'a> {
    /// Measure a sample
    Sample(&'a MergedRow),
    /// Calibrate the instrument
    Calibration,
    /// Clean up between samples
    Cleanup,
}

impl TrayStep<'_> {
    /// Kind of the step
    pub fn kind(&self) -> StepKind {
        match self {
            TrayStep::Sample(_) => StepKind::Sample,
            TrayStep::Calibration => StepKind::Calibration,
            TrayStep::Cleanup => StepKind::Cleanup,
        }
    }

    fn operation(kind: StepKind) -> Option<Self> {
        match kind {
            StepKind::Calibration => Some(TrayStep::Calibration),
            StepKind::Cleanup => Some(TrayStep::Cleanup),
            StepKind::Sample => None,
        }
    }
}

/// One instrument tray: an ordered list of steps
#[derive(Debug, Clone, PartialEq)]
pub struct Tray<'a> {
    /// 0-based tray index within the run
    pub index: usize,
    /// Steps in execution order
    pub steps: Vec<TrayStep<'a>>,
}

impl<'a> Tray<'a> {
    /// Samples in the tray, in order
    pub fn samples(&self) -> impl Iterator<Item = &'a MergedRow> + '_ {
        self.steps.iter().filter_map(|step| match step {
            TrayStep::Sample(row) => Some(*row),
            _ => None,
        })
    }

    /// Number of sample steps
    pub fn num_samples(&self) -> usize {
        self.count(StepKind::Sample)
    }

    /// Number of steps of the given kind
    pub fn count(&self, kind: StepKind) -> usize {
        self.steps.iter().filter(|s| s.kind() == kind).count()
    }
}

/// A protocol plus its run parameters, ready to lay out rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrayLayout {
    variant: &'static TrayVariant,
    solvent: Option<LogPSolvent>,
}

impl TrayLayout {
    /// Create a layout; fails when the protocol needs a solvent and none is given
    pub fn new(format: TrayFormat, solvent: Option<LogPSolvent>) -> Result<Self, TrayError> {
        let variant = format.variant();
        if variant.requires_solvent && solvent.is_none() {
            return Err(TrayError::MissingRequiredParameter {
                parameter: "logp_solvent",
                protocol: format,
            });
        }
        if !variant.requires_solvent {
            if let Some(solvent) = solvent {
                debug!("Ignoring solvent {} for protocol {}", solvent, format);
            }
        }
        Ok(Self {
            variant,
            solvent: solvent.filter(|_| variant.requires_solvent),
        })
    }

    /// The protocol
    pub fn format(&self) -> TrayFormat {
        self.variant.format
    }

    /// The variant description
    pub fn variant(&self) -> &'static TrayVariant {
        self.variant
    }

    /// Solvent, for protocols that use one
    pub fn solvent(&self) -> Option<LogPSolvent> {
        self.solvent
    }

    /// Experiment template name of sample rows
    pub fn experiment_name(&self) -> String {
        match self.solvent {
            Some(solvent) => format!("{} {}", self.variant.experiment, solvent),
            None => self.variant.experiment.to_string(),
        }
    }

    /// Number of trays needed for `n` samples
    pub fn tray_count(&self, n: usize) -> usize {
        n.div_ceil(self.variant.capacity)
    }

    /// Check that a row carries every column the protocol requires
    pub fn check_row(&self, row: &MergedRow) -> Result<(), TrayError> {
        for &column in self.variant.extra_columns {
            let present = match column {
                FW => row.fw.is_some(),
                MG => row.mg.is_some(),
                _ => {
                    return Err(TrayError::UnsupportedColumn {
                        column,
                        protocol: self.format(),
                    })
                }
            };
            if !present {
                return Err(TrayError::MissingColumn {
                    column,
                    sample: row.sample.clone(),
                    protocol: self.format(),
                });
            }
        }
        Ok(())
    }

    /// Partition rows into trays, in input order.
    ///
    /// Every row is validated before any tray is built. Empty input gives no trays.
    pub fn lay_out<'a>(&self, rows: &'a [MergedRow]) -> Result<Vec<Tray<'a>>, TrayError> {
        for row in rows {
            self.check_row(row)?;
        }

        let variant = self.variant;
        let trays: Vec<Tray<'a>> = rows
            .chunks(variant.capacity)
            .enumerate()
            .map(|(index, chunk)| {
                let mut steps = Vec::with_capacity(
                    variant.prologue.len()
                        + chunk.len()
                            * (1 + variant.before_sample.len() + variant.after_sample.len()),
                );
                steps.extend(variant.prologue.iter().filter_map(|&k| TrayStep::operation(k)));
                for row in chunk {
                    steps.extend(
                        variant
                            .before_sample
                            .iter()
                            .filter_map(|&k| TrayStep::operation(k)),
                    );
                    steps.push(TrayStep::Sample(row));
                    steps.extend(
                        variant
                            .after_sample
                            .iter()
                            .filter_map(|&k| TrayStep::operation(k)),
                    );
                }
                Tray { index, steps }
            })
            .collect();

        info!(
            "Laid out {} samples into {} {} trays",
            rows.len(),
            trays.len(),
            variant.format
        );
        Ok(trays)
    }
}
