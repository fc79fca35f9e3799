// VitalMon — Vital-Signs Monitor Core
//
// Pulse oximetry (SpO2, heart rate) plus a piezo respiration proxy, checked
// against fixed clinical thresholds once per second. The hardware-facing
// drivers only build for ESP-IDF; everything else runs and tests on the host.

pub mod beat;
pub mod config;
pub mod drivers;
pub mod evaluator;
pub mod heart_rate;
pub mod monitor;
pub mod readings;
pub mod respiration;
pub mod ui;

pub use monitor::{Monitor, MonitorState, Vitals};
pub use readings::{Alarm, SampleReading, VitalSnapshot};
