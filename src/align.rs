use crate::error::{Result, SnrError};

/// Truncate both signals to the shorter of the two lengths.
///
/// Only the leading samples are kept; trailing excess is dropped. No resampling
/// happens here, so two signals at different sample rates stay misaligned in
/// time even though their lengths match.
///
/// Both inputs must be non-empty, otherwise a [`SnrError::DegenerateSignal`]
/// is returned.
pub fn align<'a>(reference: &'a [f32], test: &'a [f32]) -> Result<(&'a [f32], &'a [f32])> {
    if reference.is_empty() {
        return Err(SnrError::DegenerateSignal(
            "reference signal has no samples".to_string(),
        ));
    }
    if test.is_empty() {
        return Err(SnrError::DegenerateSignal(
            "test signal has no samples".to_string(),
        ));
    }

    let len = reference.len().min(test.len());
    Ok((&reference[..len], &test[..len]))
}
