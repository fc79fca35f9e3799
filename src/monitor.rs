// VitalMon — Monitor Loop
//
// One cycle: read the optical sensor; with no finger present show the
// placeholder and return straight away. Otherwise compute SpO2, update the
// heart-rate estimate, read the piezo, map respiration, evaluate, drive the
// buzzer and render, in that order, then wait out MONITOR_INTERVAL_MS.
//
// While there is no finger every piece of vital state (beat timing, rate
// history, critical streak) is left exactly as it was and the buzzer is not
// touched.

use std::thread;
use std::time::Duration;

use embedded_hal::digital::OutputPin;

use crate::beat::{BeatDetector, PeakBeatDetector};
use crate::config::*;
use crate::drivers::buzzer::Buzzer;
use crate::drivers::{AnalogInput, Clock, OpticalSensor, Panel};
use crate::evaluator::{spo2_percent, AlarmPolicy, ThresholdPolicy, VitalEvaluator};
use crate::heart_rate::HeartRateEstimator;
use crate::readings::Alarm;
use crate::respiration::{LinearPlaceholder, RespirationEstimator};
use crate::ui::Readout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    NoFinger,
    Monitoring,
}

/// All state that survives between cycles.
pub struct Vitals<B = PeakBeatDetector, R = LinearPlaceholder, P = ThresholdPolicy> {
    pub heart_rate: HeartRateEstimator<B>,
    pub respiration: R,
    pub evaluator: VitalEvaluator<P>,
}

impl<B, R, P> Vitals<B, R, P>
where
    B: BeatDetector,
    R: RespirationEstimator,
    P: AlarmPolicy,
{
    pub fn new(heart_rate: HeartRateEstimator<B>, respiration: R, evaluator: VitalEvaluator<P>) -> Self {
        Self {
            heart_rate,
            respiration,
            evaluator,
        }
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self::new(
            HeartRateEstimator::default(),
            LinearPlaceholder,
            VitalEvaluator::default(),
        )
    }
}

/// Delay before the next cycle: one interval after a monitoring cycle or a
/// failed one, none while waiting for a finger.
pub fn pause_after(outcome: &anyhow::Result<MonitorState>) -> Option<Duration> {
    match outcome {
        Ok(MonitorState::NoFinger) => None,
        Ok(MonitorState::Monitoring) | Err(_) => Some(Duration::from_millis(MONITOR_INTERVAL_MS)),
    }
}

pub struct Monitor<O, A, Z, D, C> {
    optical: O,
    piezo: A,
    buzzer: Buzzer<Z>,
    panel: D,
    clock: C,
    state: Option<MonitorState>,
}

impl<O, A, Z, D, C> Monitor<O, A, Z, D, C>
where
    O: OpticalSensor,
    A: AnalogInput,
    Z: OutputPin,
    D: Panel,
    C: Clock,
{
    pub fn new(optical: O, piezo: A, buzzer: Buzzer<Z>, panel: D, clock: C) -> Self {
        Self {
            optical,
            piezo,
            buzzer,
            panel,
            clock,
            state: None,
        }
    }

    /// Run one cycle without the trailing delay.
    pub fn tick<B, R, P>(&mut self, vitals: &mut Vitals<B, R, P>) -> anyhow::Result<MonitorState>
    where
        B: BeatDetector,
        R: RespirationEstimator,
        P: AlarmPolicy,
    {
        let sample = self.optical.read_sample()?;

        if !sample.finger_present() {
            self.transition(MonitorState::NoFinger);
            self.panel.show(&Readout::no_finger())?;
            return Ok(MonitorState::NoFinger);
        }
        self.transition(MonitorState::Monitoring);

        let spo2 = spo2_percent(sample);
        let heart_rate = vitals.heart_rate.estimate(sample.ir, self.clock.now_ms());
        let piezo = self.piezo.read_raw()?;
        let breath_rate = vitals.respiration.breaths_per_minute(piezo);
        let (snapshot, alarm) = vitals.evaluator.evaluate(spo2, heart_rate, breath_rate, piezo);

        log::debug!(
            "SpO2 {:.1}% HR {} bpm RR {}/min piezo {} streak {}",
            snapshot.spo2,
            snapshot.heart_rate,
            snapshot.breath_rate,
            piezo,
            snapshot.critical_streak
        );

        if alarm.is_on() {
            log::warn!(
                "CRITICAL PARAMETERS! SpO2 {:.1}% HR {} bpm streak {}",
                snapshot.spo2,
                snapshot.heart_rate,
                snapshot.critical_streak
            );
        }
        self.buzzer.set(alarm)?;

        self.panel.show(&Readout::vitals(&snapshot))?;
        Ok(MonitorState::Monitoring)
    }

    /// Cycle forever. Only monitoring cycles are paced; a missing finger is
    /// re-checked immediately.
    pub fn run<B, R, P>(&mut self, vitals: &mut Vitals<B, R, P>) -> !
    where
        B: BeatDetector,
        R: RespirationEstimator,
        P: AlarmPolicy,
    {
        loop {
            let outcome = self.tick(vitals);
            if let Err(e) = &outcome {
                log::warn!("Monitor cycle failed: {:#}", e);
            }
            if let Some(pause) = pause_after(&outcome) {
                thread::sleep(pause);
            }
        }
    }

    pub fn alarm(&self) -> Alarm {
        self.buzzer.state()
    }

    fn transition(&mut self, next: MonitorState) {
        if self.state == Some(next) {
            return;
        }
        match next {
            MonitorState::NoFinger => log::info!("No finger on sensor — vitals paused"),
            MonitorState::Monitoring => log::info!("Finger detected — monitoring"),
        }
        self.state = Some(next);
    }
}
