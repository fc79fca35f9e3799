// VitalMon — Monochrome Framebuffer
//
// SSD1306 page layout: each byte is an 8-pixel vertical strip, pages of
// SCREEN_WIDTH bytes stacked top to bottom, LSB = top pixel. The OLED driver
// streams `as_bytes()` to the panel as-is.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::config::*;

pub struct FrameBuffer {
    buf: [u8; DISPLAY_BUFFER_SIZE],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            buf: [0; DISPLAY_BUFFER_SIZE],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn clear_all(&mut self) {
        self.buf.fill(0);
    }

    fn locate(x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return None;
        }
        let idx = x as usize + (y as usize / 8) * SCREEN_WIDTH as usize;
        Some((idx, 1 << (y % 8)))
    }
}

#[cfg(test)]
impl FrameBuffer {
    pub(crate) fn pixel(&self, x: u32, y: u32) -> bool {
        match Self::locate(x, y) {
            Some((idx, bit)) => self.buf[idx] & bit != 0,
            None => false,
        }
    }

    /// Count of lit pixels inside the half-open row range.
    pub(crate) fn lit_in_rows(&self, rows: core::ops::Range<u32>) -> usize {
        rows.flat_map(|y| (0..SCREEN_WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| self.pixel(x, y))
            .count()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if let Some((idx, bit)) = Self::locate(x, y) {
                match color {
                    BinaryColor::On => self.buf[idx] |= bit,
                    BinaryColor::Off => self.buf[idx] &= !bit,
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(match color {
            BinaryColor::On => 0xFF,
            BinaryColor::Off => 0x00,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_maps_to_page_byte() {
        let mut fb = FrameBuffer::new();
        Pixel(Point::new(3, 9), BinaryColor::On).draw(&mut fb).unwrap();
        assert_eq!(fb.as_bytes()[128 + 3], 0b0000_0010);
        assert!(fb.pixel(3, 9));
        assert!(!fb.pixel(3, 8));
    }

    #[test]
    fn out_of_bounds_pixels_are_ignored() {
        let mut fb = FrameBuffer::new();
        Pixel(Point::new(-1, 0), BinaryColor::On).draw(&mut fb).unwrap();
        Pixel(Point::new(128, 0), BinaryColor::On).draw(&mut fb).unwrap();
        Pixel(Point::new(0, 64), BinaryColor::On).draw(&mut fb).unwrap();
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn clear_fills_every_byte() {
        let mut fb = FrameBuffer::new();
        fb.clear(BinaryColor::On).unwrap();
        assert!(fb.pixel(127, 63));
        assert_eq!(fb.lit_in_rows(0..64), 128 * 64);
        fb.clear_all();
        assert_eq!(fb.lit_in_rows(0..64), 0);
    }
}
