// VitalMon — Vital Evaluator
//
// Combines the latest SpO2 estimate, heart rate and piezo reading into an
// alarm decision. The only state carried between cycles is the critical
// streak counter; the decision itself is delegated to an `AlarmPolicy`.

use crate::config::*;
use crate::readings::{Alarm, SampleReading, VitalSnapshot};

/// SpO2 from the red/IR ratio using the fixed linear calibration
/// `104 - 17 * (red / ir)`.
///
/// Only meaningful with a finger on the sensor; callers gate on
/// [`SampleReading::finger_present`], which guarantees a non-zero IR.
pub fn spo2_percent(sample: SampleReading) -> f32 {
    let ratio = sample.red as f32 / sample.ir as f32;
    SPO2_INTERCEPT - SPO2_SLOPE * ratio
}

/// Decides whether a snapshot warrants sounding the alarm.
pub trait AlarmPolicy {
    fn assess(&self, snapshot: &VitalSnapshot) -> Alarm;
}

/// Static clinical thresholds: low SpO2, tachycardia, or a sustained run of
/// critical respiration readings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdPolicy;

impl AlarmPolicy for ThresholdPolicy {
    fn assess(&self, snapshot: &VitalSnapshot) -> Alarm {
        Alarm::from(
            snapshot.spo2 < ALARM_SPO2_BELOW
                || snapshot.heart_rate > ALARM_HR_ABOVE
                || snapshot.critical_streak > ALARM_STREAK_ABOVE,
        )
    }
}

pub struct VitalEvaluator<P = ThresholdPolicy> {
    policy: P,
    critical_streak: u32,
}

impl<P: AlarmPolicy> VitalEvaluator<P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            critical_streak: 0,
        }
    }

    /// Fold one piezo reading into the streak: +1 while above
    /// `PIEZO_CRITICAL_LEVEL`, back to 0 otherwise.
    pub fn record_piezo(&mut self, raw: u16) -> u32 {
        self.critical_streak = if raw > PIEZO_CRITICAL_LEVEL {
            self.critical_streak.saturating_add(1)
        } else {
            0
        };
        self.critical_streak
    }

    pub fn evaluate(
        &mut self,
        spo2: f32,
        heart_rate: u16,
        breath_rate: u16,
        piezo_raw: u16,
    ) -> (VitalSnapshot, Alarm) {
        let critical_streak = self.record_piezo(piezo_raw);
        let snapshot = VitalSnapshot {
            spo2,
            heart_rate,
            breath_rate,
            critical_streak,
        };
        (snapshot, self.policy.assess(&snapshot))
    }

    pub fn critical_streak(&self) -> u32 {
        self.critical_streak
    }
}

impl Default for VitalEvaluator<ThresholdPolicy> {
    fn default() -> Self {
        Self::new(ThresholdPolicy)
    }
}
