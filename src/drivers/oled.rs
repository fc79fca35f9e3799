// VitalMon — SSD1306 OLED Driver
//
// 128x64 panel on the shared I2C bus. Drawing happens in the local
// framebuffer; `flush` pushes the whole frame in horizontal addressing mode.

use super::bus::{self, SharedBus};
use super::framebuffer::FrameBuffer;
use super::Panel;
use crate::config::*;
use crate::ui::{self, Readout};

const CONTROL_CMD: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;
const DATA_CHUNK: usize = 16;

const CMD_DISPLAY_OFF: u8 = 0xAE;
const CMD_DISPLAY_ON: u8 = 0xAF;
const CMD_COLUMN_ADDR: u8 = 0x21;
const CMD_PAGE_ADDR: u8 = 0x22;

#[rustfmt::skip]
const INIT_SEQUENCE: &[u8] = &[
    CMD_DISPLAY_OFF,
    0xD5, 0x80,                     // clock divide / oscillator
    0xA8, (SCREEN_HEIGHT - 1) as u8, // multiplex ratio
    0xD3, 0x00,                     // display offset
    0x40,                           // start line 0
    0x8D, 0x14,                     // charge pump on
    0x20, 0x00,                     // horizontal addressing
    0xA1,                           // segment remap
    0xC8,                           // COM scan descending
    0xDA, 0x12,                     // COM pins (128x64)
    0x81, 0xCF,                     // contrast
    0xD9, 0xF1,                     // pre-charge
    0xDB, 0x40,                     // VCOMH deselect
    0xA4,                           // resume from RAM
    0xA6,                           // normal (not inverted)
    CMD_DISPLAY_ON,
];

pub struct OledDisplay {
    bus: SharedBus,
    frame: FrameBuffer,
}

impl OledDisplay {
    pub fn new(bus: SharedBus) -> Self {
        Self {
            bus,
            frame: FrameBuffer::new(),
        }
    }

    /// Send the power-up sequence and blank the panel. Fails if the
    /// controller does not acknowledge on `I2C_ADDR_OLED`.
    pub fn init(&mut self) -> anyhow::Result<()> {
        for &cmd in INIT_SEQUENCE {
            self.command(&[cmd])?;
        }
        self.frame.clear_all();
        self.flush()?;
        log::info!("SSD1306 initialised at 0x{:02X}", I2C_ADDR_OLED);
        Ok(())
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.command(&[CMD_COLUMN_ADDR, 0, (SCREEN_WIDTH - 1) as u8])?;
        self.command(&[CMD_PAGE_ADDR, 0, (SCREEN_HEIGHT / 8 - 1) as u8])?;

        let mut bus = bus::lock(self.bus)?;
        let mut packet = [0u8; DATA_CHUNK + 1];
        packet[0] = CONTROL_DATA;
        for chunk in self.frame.as_bytes().chunks(DATA_CHUNK) {
            packet[1..=chunk.len()].copy_from_slice(chunk);
            bus.write(I2C_ADDR_OLED, &packet[..=chunk.len()], I2C_TIMEOUT_TICKS)?;
        }
        Ok(())
    }

    fn command(&self, bytes: &[u8]) -> anyhow::Result<()> {
        let mut bus = bus::lock(self.bus)?;
        let mut packet = [0u8; 4];
        packet[0] = CONTROL_CMD;
        packet[1..=bytes.len()].copy_from_slice(bytes);
        bus.write(I2C_ADDR_OLED, &packet[..=bytes.len()], I2C_TIMEOUT_TICKS)?;
        Ok(())
    }
}

impl Panel for OledDisplay {
    fn show(&mut self, readout: &Readout) -> anyhow::Result<()> {
        ui::draw_readout(&mut self.frame, readout)?;
        self.flush()
    }
}
