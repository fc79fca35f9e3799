// VitalMon — System Clock

use super::Clock;

/// Milliseconds since boot from the ESP high-resolution timer
/// (wraps at ~49 days; the heart-rate maths uses wrapping deltas).
#[derive(Debug, Clone, Copy, Default)]
pub struct EspClock;

impl Clock for EspClock {
    fn now_ms(&self) -> u32 {
        unsafe { (esp_idf_sys::esp_timer_get_time() / 1000) as u32 }
    }
}
