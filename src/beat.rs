// VitalMon — Pulse Beat Detector
//
// Peak-based beat detection over the raw IR photoplethysmogram:
//   1. An exponential DC estimator tracks the baseline (alpha = 1/16).
//   2. The AC component is smoothed by a 23-tap symmetric low-pass FIR.
//   3. A beat is reported on every rising zero crossing of the filtered AC
//      signal, provided the previous cycle's peak-to-peak swing looks like a
//      pulse (strictly between MIN_SWING and MAX_SWING).

/// Source of the "new heartbeat" edge signal.
///
/// Called once per sample; must return `true` exactly on the sample where a
/// new beat is recognised.
pub trait BeatDetector {
    fn check_for_beat(&mut self, ir: u32) -> bool;
}

// Half of a symmetric 23-tap window, Q15; the last entry is the centre tap.
const FIR_COEFFS: [i64; 12] = [
    172, 321, 579, 927, 1360, 1858, 2390, 2916, 3391, 3768, 4012, 4096,
];
const FIR_CENTER: usize = FIR_COEFFS.len() - 1;
const FIR_SPAN: usize = 2 * FIR_CENTER;
const HISTORY_LEN: usize = 32; // power of two ≥ FIR_SPAN + 1

const DC_SHIFT: u32 = 4;
const Q15: u32 = 15;

const MIN_SWING: i64 = 20;
const MAX_SWING: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HalfCycle {
    Unknown,
    Rising,
    Falling,
}

pub struct PeakBeatDetector {
    dc_register: i64,
    history: [i64; HISTORY_LEN],
    offset: usize,

    ac_current: i64,
    ac_previous: i64,
    half: HalfCycle,
    half_max: i64,
    half_min: i64,
}

impl PeakBeatDetector {
    pub fn new() -> Self {
        Self {
            dc_register: 0,
            history: [0; HISTORY_LEN],
            offset: 0,
            ac_current: 0,
            ac_previous: 0,
            half: HalfCycle::Unknown,
            half_max: 0,
            half_min: 0,
        }
    }

    /// Update the running baseline and return the current DC estimate.
    fn track_dc(&mut self, sample: i64) -> i64 {
        self.dc_register += ((sample << Q15) - self.dc_register) >> DC_SHIFT;
        self.dc_register >> Q15
    }

    fn tap(&self, back: usize) -> i64 {
        self.history[(self.offset + HISTORY_LEN - back) % HISTORY_LEN]
    }

    fn low_pass(&mut self, ac: i64) -> i64 {
        self.history[self.offset] = ac;

        let mut acc = FIR_COEFFS[FIR_CENTER] * self.tap(FIR_CENTER);
        for (i, coeff) in FIR_COEFFS[..FIR_CENTER].iter().enumerate() {
            acc += coeff * (self.tap(i) + self.tap(FIR_SPAN - i));
        }

        self.offset = (self.offset + 1) % HISTORY_LEN;
        acc >> Q15
    }
}

impl Default for PeakBeatDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BeatDetector for PeakBeatDetector {
    fn check_for_beat(&mut self, ir: u32) -> bool {
        let sample = i64::from(ir);
        let baseline = self.track_dc(sample);

        self.ac_previous = self.ac_current;
        self.ac_current = self.low_pass(sample - baseline);

        let mut beat = false;

        // Rising zero crossing: close out the previous cycle.
        if self.ac_previous < 0 && self.ac_current >= 0 {
            let swing = self.half_max - self.half_min;
            self.half = HalfCycle::Rising;
            self.half_max = 0;
            beat = swing > MIN_SWING && swing < MAX_SWING;
        }

        // Falling zero crossing.
        if self.ac_previous > 0 && self.ac_current <= 0 {
            self.half = HalfCycle::Falling;
            self.half_min = 0;
        }

        match self.half {
            HalfCycle::Rising if self.ac_current > self.ac_previous => {
                self.half_max = self.ac_current;
            }
            HalfCycle::Falling if self.ac_current < self.ac_previous => {
                self.half_min = self.ac_current;
            }
            _ => {}
        }

        beat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASELINE: f64 = 100_000.0;

    fn pulse_wave(amplitude: f64, period: usize, len: usize) -> Vec<u32> {
        (0..len)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * i as f64 / period as f64;
                (BASELINE + amplitude * phase.sin()).round() as u32
            })
            .collect()
    }

    fn beat_indices(samples: &[u32]) -> Vec<usize> {
        let mut detector = PeakBeatDetector::new();
        samples
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| detector.check_for_beat(s).then_some(i))
            .collect()
    }

    #[test]
    fn flat_signal_has_no_beats() {
        let samples = vec![100_000u32; 1000];
        assert!(beat_indices(&samples).is_empty());
    }

    #[test]
    fn periodic_pulse_yields_one_beat_per_cycle() {
        let beats = beat_indices(&pulse_wave(200.0, 25, 1000));

        // Baseline settles within the first few hundred samples.
        assert!(beats.len() >= 30 && beats.len() <= 40, "beats = {}", beats.len());
        for pair in beats.windows(2) {
            let gap = pair[1] - pair[0];
            assert!((24..=26).contains(&gap), "gap = {gap}");
        }
    }

    #[test]
    fn oversized_swing_is_rejected() {
        assert!(beat_indices(&pulse_wave(5000.0, 25, 1000)).is_empty());
    }

    #[test]
    fn noise_level_swing_is_rejected() {
        assert!(beat_indices(&pulse_wave(3.0, 25, 1000)).is_empty());
    }
}
