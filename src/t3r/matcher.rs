use super::models::{MeasuredPka, PkaResult, PredictedPka};
use super::ParseError;

/// Assign acid/base types to measured values by position.
///
/// Neither measured-result shape labels its values, so `measured[i]` takes the
/// type of `predicted[i]`. Both lists must be the same length; nothing is
/// truncated or padded.
pub fn match_positional(
    predicted: &[PredictedPka],
    measured: Vec<MeasuredPka>,
) -> Result<Vec<PkaResult>, ParseError> {
    if predicted.len() != measured.len() {
        return Err(ParseError::PredictedMeasuredCountMismatch {
            predicted: predicted.len(),
            measured: measured.len(),
        });
    }

    Ok(predicted
        .iter()
        .zip(measured)
        .map(|(prediction, m)| PkaResult {
            pka_type: prediction.pka_type,
            value: m.value,
            std: m.std,
            ionic_strength: m.ionic_strength,
            temperature: m.temperature,
        })
        .collect())
}
