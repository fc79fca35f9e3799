// VitalMon — Respiration Estimator
//
// Placeholder: there is no breathing-rate algorithm yet. The piezo reading is
// mapped linearly onto a plausible breaths/min range so the rest of the
// pipeline (snapshot, logging) has a value to carry. A real estimator slots in
// behind `RespirationEstimator` without touching the evaluator.

use crate::config::*;

pub trait RespirationEstimator {
    /// Breaths per minute for one raw piezo reading on the 0..=1023 scale.
    fn breaths_per_minute(&mut self, raw: u16) -> u16;
}

/// Linear map of [0, PIEZO_FULL_SCALE] onto [BREATH_RATE_MIN, BREATH_RATE_MAX],
/// truncating integer arithmetic. Readings above full scale saturate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearPlaceholder;

impl RespirationEstimator for LinearPlaceholder {
    fn breaths_per_minute(&mut self, raw: u16) -> u16 {
        let raw = u32::from(raw.min(PIEZO_FULL_SCALE));
        let span = u32::from(BREATH_RATE_MAX - BREATH_RATE_MIN);
        (raw * span / u32::from(PIEZO_FULL_SCALE)) as u16 + BREATH_RATE_MIN
    }
}
