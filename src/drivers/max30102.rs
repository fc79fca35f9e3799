// VitalMon — MAX30102 Pulse-Oximetry Driver
//
// Register-level driver over the shared I2C bus. Runs the sensor in SpO2
// mode (red + IR), lets the internal FIFO average 4 samples, and hands the
// newest red/IR pair to the monitor loop.

use std::thread;
use std::time::{Duration, Instant};

use super::bus::{self, SharedBus};
use super::OpticalSensor;
use crate::config::*;
use crate::readings::SampleReading;

// MAX30102 register addresses
const REG_FIFO_WR_PTR: u8 = 0x04;
const REG_FIFO_OVF_COUNTER: u8 = 0x05;
const REG_FIFO_RD_PTR: u8 = 0x06;
const REG_FIFO_DATA: u8 = 0x07;
const REG_FIFO_CONFIG: u8 = 0x08;
const REG_MODE_CONFIG: u8 = 0x09;
const REG_SPO2_CONFIG: u8 = 0x0A;
const REG_LED1_PA: u8 = 0x0C; // red
const REG_LED2_PA: u8 = 0x0D; // IR
const REG_PART_ID: u8 = 0xFF;
const PART_ID_EXPECTED: u8 = 0x15;

const MODE_RESET: u8 = 0x40;
const MODE_SPO2: u8 = 0x03;
const FIFO_SMP_AVE_4: u8 = 0b010 << 5;
const FIFO_ROLLOVER_EN: u8 = 0x10;
const SPO2_ADC_RGE_4096: u8 = 0b01 << 5;
const SPO2_SR_400: u8 = 0b011 << 2;
const SPO2_PW_411: u8 = 0b11;

const FIFO_DEPTH: u8 = 32;
const BYTES_PER_CHANNEL: usize = 3;
const BYTES_PER_SAMPLE: usize = 2 * BYTES_PER_CHANNEL; // red, IR
const SAMPLE_MASK: u32 = 0x3_FFFF; // 18-bit ADC

pub struct Max30102 {
    bus: SharedBus,
}

impl Max30102 {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    /// Check the part ID, reset, and configure for SpO2 acquisition.
    pub fn init(&self) -> anyhow::Result<()> {
        let part_id = self.read_reg(REG_PART_ID)?;
        if part_id != PART_ID_EXPECTED {
            anyhow::bail!("unexpected MAX30102 part id 0x{:02X}", part_id);
        }

        self.write_reg(REG_MODE_CONFIG, MODE_RESET)?;
        let deadline = Instant::now() + Duration::from_millis(SENSOR_RESET_TIMEOUT_MS);
        while self.read_reg(REG_MODE_CONFIG)? & MODE_RESET != 0 {
            if Instant::now() > deadline {
                anyhow::bail!("MAX30102 did not come out of reset");
            }
            thread::sleep(Duration::from_millis(SENSOR_RESET_MS));
        }

        self.write_reg(REG_FIFO_CONFIG, FIFO_SMP_AVE_4 | FIFO_ROLLOVER_EN)?;
        self.write_reg(REG_MODE_CONFIG, MODE_SPO2)?;
        self.write_reg(REG_SPO2_CONFIG, SPO2_ADC_RGE_4096 | SPO2_SR_400 | SPO2_PW_411)?;
        self.write_reg(REG_LED1_PA, LED_AMPLITUDE_RED)?;
        self.write_reg(REG_LED2_PA, LED_AMPLITUDE_IR)?;

        // Start from an empty FIFO.
        self.write_reg(REG_FIFO_WR_PTR, 0)?;
        self.write_reg(REG_FIFO_OVF_COUNTER, 0)?;
        self.write_reg(REG_FIFO_RD_PTR, 0)?;

        log::info!(
            "MAX30102 initialised (SpO2 mode, 400 Hz, avg 4, red 0x{:02X}, IR 0x{:02X})",
            LED_AMPLITUDE_RED,
            LED_AMPLITUDE_IR
        );
        Ok(())
    }

    /// Number of unread samples in the FIFO.
    fn pending(&self) -> anyhow::Result<usize> {
        let write = self.read_reg(REG_FIFO_WR_PTR)?;
        let read = self.read_reg(REG_FIFO_RD_PTR)?;
        Ok(usize::from(write.wrapping_sub(read) % FIFO_DEPTH))
    }

    /// Drain `count` samples and return the newest one.
    fn drain(&self, count: usize) -> anyhow::Result<SampleReading> {
        let mut raw = [0u8; BYTES_PER_SAMPLE];
        let mut bus = bus::lock(self.bus)?;
        for _ in 0..count {
            bus.write_read(I2C_ADDR_MAX30102, &[REG_FIFO_DATA], &mut raw, I2C_TIMEOUT_TICKS)?;
        }
        Ok(SampleReading {
            red: channel(&raw[..BYTES_PER_CHANNEL]),
            ir: channel(&raw[BYTES_PER_CHANNEL..]),
        })
    }

    fn read_reg(&self, reg: u8) -> anyhow::Result<u8> {
        let mut bus = bus::lock(self.bus)?;
        let mut buf = [0u8; 1];
        bus.write_read(I2C_ADDR_MAX30102, &[reg], &mut buf, I2C_TIMEOUT_TICKS)?;
        Ok(buf[0])
    }

    fn write_reg(&self, reg: u8, value: u8) -> anyhow::Result<()> {
        let mut bus = bus::lock(self.bus)?;
        bus.write(I2C_ADDR_MAX30102, &[reg, value], I2C_TIMEOUT_TICKS)?;
        Ok(())
    }
}

impl OpticalSensor for Max30102 {
    /// Wait (bounded) for fresh data, then return the newest red/IR pair.
    fn read_sample(&mut self) -> anyhow::Result<SampleReading> {
        let deadline = Instant::now() + Duration::from_millis(SENSOR_DATA_TIMEOUT_MS);
        loop {
            let pending = self.pending()?;
            if pending > 0 {
                return self.drain(pending);
            }
            if Instant::now() > deadline {
                anyhow::bail!("MAX30102 FIFO timeout");
            }
            thread::sleep(Duration::from_millis(SENSOR_POLL_MS));
        }
    }
}

fn channel(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]) & SAMPLE_MASK
}
