// VitalMon — Sensor Readings & Vital Data Types

use crate::config::FINGER_PRESENT_IR;

// ---------------------------------------------------------------------------
// Optical sample (one red/IR photodiode pair from the MAX30102)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleReading {
    pub red: u32,
    pub ir: u32,
}

impl SampleReading {
    pub fn new(red: u32, ir: u32) -> Self {
        Self { red, ir }
    }

    /// True when enough IR is reflected back to indicate tissue on the sensor.
    pub fn finger_present(&self) -> bool {
        self.ir >= FINGER_PRESENT_IR
    }
}

// ---------------------------------------------------------------------------
// Vital snapshot — recomputed every monitoring cycle
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VitalSnapshot {
    /// Blood oxygen saturation, percent.
    pub spo2: f32,
    /// Smoothed heart rate, bpm.
    pub heart_rate: u16,
    /// Breaths per minute (placeholder mapping).
    pub breath_rate: u16,
    /// Consecutive cycles with a critical piezo reading.
    pub critical_streak: u32,
}

// ---------------------------------------------------------------------------
// Alarm decision
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alarm {
    #[default]
    Off,
    On,
}

impl Alarm {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl From<bool> for Alarm {
    fn from(on: bool) -> Self {
        if on {
            Self::On
        } else {
            Self::Off
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finger_threshold_is_inclusive() {
        assert!(!SampleReading::new(0, 49_999).finger_present());
        assert!(SampleReading::new(0, 50_000).finger_present());
        assert!(SampleReading::new(0, 60_000).finger_present());
    }

    #[test]
    fn alarm_from_bool() {
        assert_eq!(Alarm::from(true), Alarm::On);
        assert_eq!(Alarm::from(false), Alarm::Off);
        assert!(Alarm::On.is_on());
        assert!(!Alarm::default().is_on());
    }
}
