// VitalMon — Piezo Respiration Sensor (ADC)
//
// One-shot reads on ADC1 channel 2 (GPIO2) via raw ESP-IDF calls. The ESP32-C3
// ADC is 12-bit; readings are scaled down to the 10-bit range the respiration
// thresholds are defined on.

use esp_idf_sys::{self as sys, esp};

use super::AnalogInput;
use crate::config::*;

const ADC_CHANNEL: sys::adc_channel_t = sys::adc_channel_t_ADC_CHANNEL_2; // GPIO2
const ADC_12_TO_10_SHIFT: u32 = 2;

pub struct PiezoSensor {
    handle: sys::adc_oneshot_unit_handle_t,
}

impl PiezoSensor {
    pub fn new() -> anyhow::Result<Self> {
        let mut handle: sys::adc_oneshot_unit_handle_t = core::ptr::null_mut();

        // 11 dB attenuation → 0–3.3 V input range.
        unsafe {
            let unit_cfg = sys::adc_oneshot_unit_init_cfg_t {
                unit_id: sys::adc_unit_t_ADC_UNIT_1,
                ulp_mode: sys::adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
                ..core::mem::zeroed()
            };
            esp!(sys::adc_oneshot_new_unit(&unit_cfg, &mut handle))?;

            let chan_cfg = sys::adc_oneshot_chan_cfg_t {
                atten: sys::adc_atten_t_ADC_ATTEN_DB_11,
                bitwidth: sys::adc_bitwidth_t_ADC_BITWIDTH_12,
            };
            esp!(sys::adc_oneshot_config_channel(handle, ADC_CHANNEL, &chan_cfg))?;
        }

        log::info!("Piezo ADC ready on GPIO{}", PIN_PIEZO_ADC);
        Ok(Self { handle })
    }
}

impl AnalogInput for PiezoSensor {
    fn read_raw(&mut self) -> anyhow::Result<u16> {
        let mut raw: i32 = 0;
        unsafe {
            esp!(sys::adc_oneshot_read(self.handle, ADC_CHANNEL, &mut raw))?;
        }
        let scaled = (raw.max(0) as u32) >> ADC_12_TO_10_SHIFT;
        Ok((scaled as u16).min(PIEZO_FULL_SCALE))
    }
}

impl Drop for PiezoSensor {
    fn drop(&mut self) {
        unsafe {
            sys::adc_oneshot_del_unit(self.handle);
        }
    }
}
