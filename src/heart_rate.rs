// VitalMon — Heart-Rate Estimator
//
// Turns beat edges into a smoothed bpm value: each accepted beat-to-beat
// interval is converted to an instantaneous rate, clamped to a plausible
// physiological range, and averaged over the last HR_AVERAGE_SLOTS beats.

use crate::beat::{BeatDetector, PeakBeatDetector};
use crate::config::*;

const MS_PER_MINUTE: u32 = 60_000;

/// Convert a beat-to-beat interval to bpm, clamped to
/// [`HR_MIN_BPM`, `HR_MAX_BPM`]. A zero interval clamps to the maximum.
pub fn instantaneous_bpm(delta_ms: u32) -> u16 {
    let raw = MS_PER_MINUTE.checked_div(delta_ms).unwrap_or(u32::MAX);
    raw.clamp(u32::from(HR_MIN_BPM), u32::from(HR_MAX_BPM)) as u16
}

pub struct HeartRateEstimator<B = PeakBeatDetector> {
    detector: B,
    rates: [u16; HR_AVERAGE_SLOTS],
    write_index: usize,
    last_beat_ms: u32,
    current_bpm: u16,
}

impl<B: BeatDetector> HeartRateEstimator<B> {
    pub fn new(detector: B) -> Self {
        Self {
            detector,
            rates: [0; HR_AVERAGE_SLOTS],
            write_index: 0,
            last_beat_ms: 0,
            current_bpm: 0,
        }
    }

    /// Feed one IR sample taken at `now_ms`. Returns the smoothed rate,
    /// unchanged from the previous call when no new beat was detected.
    pub fn estimate(&mut self, ir: u32, now_ms: u32) -> u16 {
        if self.detector.check_for_beat(ir) {
            self.record_beat(now_ms)
        } else {
            self.current_bpm
        }
    }

    /// Account for a beat at `now_ms` and return the new smoothed rate.
    ///
    /// Empty slots count as zero until the buffer has seen
    /// `HR_AVERAGE_SLOTS` beats, so the first few results read low.
    pub fn record_beat(&mut self, now_ms: u32) -> u16 {
        let delta = now_ms.wrapping_sub(self.last_beat_ms);
        self.last_beat_ms = now_ms;

        self.rates[self.write_index] = instantaneous_bpm(delta);
        self.write_index = (self.write_index + 1) % HR_AVERAGE_SLOTS;

        let sum: u32 = self.rates.iter().map(|&r| u32::from(r)).sum();
        self.current_bpm = (sum / HR_AVERAGE_SLOTS as u32) as u16;
        self.current_bpm
    }

    pub fn current_bpm(&self) -> u16 {
        self.current_bpm
    }

}

#[cfg(test)]
impl<B> HeartRateEstimator<B> {
    pub(crate) fn last_beat_ms(&self) -> u32 {
        self.last_beat_ms
    }

    pub(crate) fn rates(&self) -> &[u16; HR_AVERAGE_SLOTS] {
        &self.rates
    }

    pub(crate) fn detector(&self) -> &B {
        &self.detector
    }
}

impl Default for HeartRateEstimator<PeakBeatDetector> {
    fn default() -> Self {
        Self::new(PeakBeatDetector::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a fixed beat pattern; reports no beat once exhausted.
    struct Scripted(VecDeque<bool>);

    impl BeatDetector for Scripted {
        fn check_for_beat(&mut self, _ir: u32) -> bool {
            self.0.pop_front().unwrap_or(false)
        }
    }

    fn never() -> HeartRateEstimator<Scripted> {
        HeartRateEstimator::new(Scripted(VecDeque::new()))
    }

    /// Warm the buffer so the averages below only see the beats under test.
    fn warmed(start_ms: u32) -> HeartRateEstimator<Scripted> {
        let mut est = never();
        est.record_beat(start_ms);
        est
    }

    #[test]
    fn interval_of_500ms_is_120_bpm() {
        assert_eq!(instantaneous_bpm(500), 120);
    }

    #[test]
    fn out_of_range_intervals_are_clamped() {
        assert_eq!(instantaneous_bpm(100), HR_MAX_BPM); // 600 bpm
        assert_eq!(instantaneous_bpm(0), HR_MAX_BPM);
        assert_eq!(instantaneous_bpm(5000), HR_MIN_BPM); // 12 bpm
        assert_eq!(instantaneous_bpm(u32::MAX), HR_MIN_BPM);
        assert_eq!(instantaneous_bpm(2000), 30);
        assert_eq!(instantaneous_bpm(334), 179);
    }

    #[test]
    fn no_beat_keeps_previous_rate() {
        let mut est = never();
        assert_eq!(est.estimate(80_000, 1000), 0);

        est.record_beat(0);
        let before = est.current_bpm();
        assert_eq!(est.estimate(80_000, 5000), before);
        assert_eq!(est.last_beat_ms(), 0);
    }

    #[test]
    fn cold_start_clamps_to_minimum() {
        let mut est = never();
        // Measured against a last beat of 0 ms; 60000/10000 = 6 bpm → 30.
        assert_eq!(est.record_beat(10_000), HR_MIN_BPM / 4);
        assert_eq!(est.rates(), &[HR_MIN_BPM, 0, 0, 0]);
    }

    #[test]
    fn warm_up_averages_over_empty_slots() {
        let mut est = never();
        est.record_beat(500); // 120
        assert_eq!(est.current_bpm(), 30);
        est.record_beat(1000); // 120
        assert_eq!(est.current_bpm(), 60);
        est.record_beat(1500); // 120
        assert_eq!(est.current_bpm(), 90);
        est.record_beat(2000); // 120
        assert_eq!(est.current_bpm(), 120);
    }

    #[test]
    fn four_accepted_beats_average_truncated() {
        let intervals = [
            [500, 600, 700, 800],
            [1000, 1000, 1000, 1000],
            [400, 450, 900, 1900],
            [333, 1999, 857, 512],
        ];

        for gaps in intervals {
            let mut est = warmed(10_000);
            let mut now = 10_000;
            let mut expected_sum = 0u32;
            for gap in gaps {
                now += gap;
                expected_sum += u32::from(instantaneous_bpm(gap));
                est.record_beat(now);
            }
            assert_eq!(u32::from(est.current_bpm()), expected_sum / 4, "gaps {gaps:?}");
        }
    }

    #[test]
    fn clamped_values_are_stored_before_averaging() {
        let mut est = warmed(10_000);
        est.record_beat(10_100); // 600 → 180
        est.record_beat(20_100); // 6 → 30
        est.record_beat(20_600); // 120
        est.record_beat(21_100); // 120
        assert_eq!(est.current_bpm(), (180 + 30 + 120 + 120) / 4);
    }

    #[test]
    fn oldest_slot_is_overwritten_first() {
        let mut est = warmed(0);
        let mut now = 0;
        for _ in 0..4 {
            now += 1000; // 60
            est.record_beat(now);
        }
        assert_eq!(est.current_bpm(), 60);

        // Slot 1 holds the oldest of the four 60s.
        now += 500; // 120
        est.record_beat(now);
        assert_eq!(est.current_bpm(), (120 + 60 * 3) / 4);
        assert_eq!(est.rates(), &[60, 120, 60, 60]);
    }

    #[test]
    fn beat_timing_survives_clock_wrap() {
        let mut est = warmed(u32::MAX - 199);
        // 200 ms across the wrap → 300 bpm → 180.
        est.record_beat(0);
        assert_eq!(est.rates()[1], HR_MAX_BPM);
    }

    #[test]
    fn estimate_consults_detector() {
        let beats = Scripted(VecDeque::from([false, true, false, true]));
        let mut est = HeartRateEstimator::new(beats);

        assert_eq!(est.estimate(70_000, 500), 0);
        assert_eq!(est.last_beat_ms(), 0);

        assert_eq!(est.estimate(70_000, 1000), 60 / 4);
        assert_eq!(est.estimate(70_000, 1200), 60 / 4);

        assert_eq!(est.estimate(70_000, 1500), (60 + 120) / 4);
        assert_eq!(est.last_beat_ms(), 1500);
    }
}
