// VitalMon — Hardware Collaborators
//
// The monitor loop only sees these traits; the ESP-IDF implementations below
// are compiled for the device, tests substitute fakes.

pub mod buzzer;
pub mod framebuffer;

#[cfg(target_os = "espidf")]
pub mod clock;
#[cfg(target_os = "espidf")]
pub mod max30102;
#[cfg(target_os = "espidf")]
pub mod oled;
#[cfg(target_os = "espidf")]
pub mod piezo;

#[cfg(target_os = "espidf")]
pub use bus::SharedBus;

use crate::readings::SampleReading;
use crate::ui::Readout;

/// Pulse-oximetry front end: one red/IR sample pair per call.
pub trait OpticalSensor {
    fn read_sample(&mut self) -> anyhow::Result<SampleReading>;
}

/// Single-channel analog input on the 0..=1023 scale.
pub trait AnalogInput {
    fn read_raw(&mut self) -> anyhow::Result<u16>;
}

/// Monotonic millisecond counter (wraps at ~49 days).
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Anything that can present the two-line readout.
pub trait Panel {
    fn show(&mut self, readout: &Readout) -> anyhow::Result<()>;
}

#[cfg(target_os = "espidf")]
mod bus {
    use std::sync::{Mutex, MutexGuard};

    use esp_idf_hal::i2c::I2cDriver;

    /// Handle to the I2C bus shared by the optical sensor and the display.
    pub type SharedBus = &'static Mutex<I2cDriver<'static>>;

    pub(crate) fn lock(bus: SharedBus) -> anyhow::Result<MutexGuard<'static, I2cDriver<'static>>> {
        bus.lock().map_err(|_| anyhow::anyhow!("I2C bus mutex poisoned"))
    }
}
