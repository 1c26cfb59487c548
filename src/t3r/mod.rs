//! # T3R Result Parser Module
//!
//! This module decodes the XML result files ("T3R") written by the titration
//! instrument into typed [`MeasurementRecord`]s.
//!
//! ## Design Goals
//!
//! - **Strict**: every parser checks the declared assay category first
//! - **Tolerant of schema drift**: both historical measured-result shapes are read
//! - **Explicit**: unverified conventions (positional typing, logP selection) are
//!   named, isolated and overridable
//!
//! ## T3R Structure
//!
//! ```text
//! DirectControlAssayResultsFile
//! ├── Summary
//! │   ├── AssayName
//! │   ├── StartTime
//! │   └── SampleName
//! ├── AssayData
//! │   └── AssayTemplate
//! │       ├── Category                       (pKa | logP)
//! │       └── Settings/PartitionType/Value   (logP solvent)
//! └── ProcessedData
//!     ├── AssayQuality/Quality
//!     ├── PhMetricModel/Sample/Pka*          (predicted, typed)
//!     ├── FastDpasMeanResult                 (measured, newer schema)
//!     ├── YasudaShedlovskyResult             (measured, older schema)
//!     ├── Sweep*/FastDpasResult/CosolventRatio
//!     └── MultisweepPhMetricResult           (logP)
//!         ├── Rmsd
//!         └── MultisweepPhMetricLevelResult/SampleValues/Logp*
//! ```

mod document;
mod error;
mod matcher;
mod measurement;
mod models;
mod parser;


pub use document::{Element, T3rDocument, ROOT_ELEMENT};
pub use error::ParseError;
pub use matcher::match_positional;
pub use measurement::{find_measured, MeasurementSourceKind, SOURCE_PRIORITY};
pub use models::*;
pub use parser::{detect_category, LogPParser, PkaParser, ResultParser};
