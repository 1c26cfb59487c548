//! Column names as constants.
//!
//! All names are lowercase; lookups through [`ColumnIndex`](super::ColumnIndex)
//! lowercase the requested name as well, so the header case of the input file
//! never matters.

/// Default sample/compound id column used to join tables
pub const SAMPLE: &str = "sample";
/// Plate well position of the sample
pub const WELL: &str = "well";
/// Molecular weight
pub const MW: &str = "mw";
/// Formula weight (solid-sample protocols)
pub const FW: &str = "fw";
/// Weighed sample mass in mg (solid-sample protocols)
pub const MG: &str = "mg";

/// Short-form pKa string, e.g. `ACID,2.5,BASE,9.3`
pub const REFORMATTED_PKAS: &str = "reformatted_pkas";
/// Long-form pKa value
pub const PKA_VALUE: &str = "pka_value";
/// Long-form pKa type (acid / base)
pub const PKA_TYPE: &str = "pka_type";

/// Injected sample concentration in mM
pub const CONCENTRATION_MM: &str = "concentration_mm";
/// Injected sample volume in µL
pub const VOLUME_UL: &str = "volume_ul";
