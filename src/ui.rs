// VitalMon — Status Readout
//
// Two rows of label/value text on the 128x64 OLED:
//
//   SpO2:      97.3%
//   HR:        72 bpm
//
// With no finger on the sensor only the placeholder label is shown.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::config::*;
use crate::readings::VitalSnapshot;

pub const NO_FINGER_LABEL: &str = "No finger";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadoutLine {
    pub label: String,
    pub value: String,
}

impl ReadoutLine {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_owned(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readout {
    pub lines: [ReadoutLine; 2],
}

impl Readout {
    pub fn no_finger() -> Self {
        Self {
            lines: [ReadoutLine::new(NO_FINGER_LABEL, ""), ReadoutLine::default()],
        }
    }

    pub fn vitals(snapshot: &VitalSnapshot) -> Self {
        Self {
            lines: [
                ReadoutLine::new("SpO2:", format!("{:.1}%", snapshot.spo2)),
                ReadoutLine::new("HR:", format!("{} bpm", snapshot.heart_rate)),
            ],
        }
    }
}

/// Clear the target and lay out the readout, labels left, values from the
/// middle column.
pub fn draw_readout<D>(target: &mut D, readout: &Readout) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    for (row, line) in readout.lines.iter().enumerate() {
        let y = row as i32 * READOUT_ROW_PITCH;
        Text::with_baseline(&line.label, Point::new(READOUT_LABEL_X, y), style, Baseline::Top)
            .draw(target)?;
        Text::with_baseline(&line.value, Point::new(READOUT_VALUE_X, y), style, Baseline::Top)
            .draw(target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::framebuffer::FrameBuffer;

    fn snapshot(spo2: f32, heart_rate: u16) -> VitalSnapshot {
        VitalSnapshot {
            spo2,
            heart_rate,
            ..Default::default()
        }
    }

    #[test]
    fn vitals_text() {
        let readout = Readout::vitals(&snapshot(95.5, 72));
        assert_eq!(readout.lines[0].label, "SpO2:");
        assert_eq!(readout.lines[0].value, "95.5%");
        assert_eq!(readout.lines[1].label, "HR:");
        assert_eq!(readout.lines[1].value, "72 bpm");
    }

    #[test]
    fn spo2_is_rounded_to_one_decimal() {
        let readout = Readout::vitals(&snapshot(97.26, 0));
        assert_eq!(readout.lines[0].value, "97.3%");
    }

    #[test]
    fn no_finger_has_only_the_placeholder() {
        let readout = Readout::no_finger();
        assert_eq!(readout.lines[0].label, NO_FINGER_LABEL);
        assert!(readout.lines[0].value.is_empty());
        assert_eq!(readout.lines[1], ReadoutLine::default());
    }

    #[test]
    fn draws_two_rows_in_both_columns() {
        let mut fb = FrameBuffer::new();
        draw_readout(&mut fb, &Readout::vitals(&snapshot(98.0, 64))).unwrap();

        let lit = |xs: core::ops::Range<u32>, ys: core::ops::Range<u32>| {
            xs.flat_map(|x| ys.clone().map(move |y| (x, y)))
                .filter(|&(x, y)| fb.pixel(x, y))
                .count()
        };
        assert!(lit(0..64, 0..10) > 0, "label row 0");
        assert!(lit(64..128, 0..10) > 0, "value row 0");
        assert!(lit(0..64, 16..26) > 0, "label row 1");
        assert!(lit(64..128, 16..26) > 0, "value row 1");
        assert_eq!(fb.lit_in_rows(32..64), 0);
    }

    #[test]
    fn redraw_clears_previous_frame() {
        let mut fb = FrameBuffer::new();
        draw_readout(&mut fb, &Readout::vitals(&snapshot(98.0, 64))).unwrap();
        draw_readout(&mut fb, &Readout::no_finger()).unwrap();

        assert!(fb.lit_in_rows(0..10) > 0);
        assert_eq!(fb.lit_in_rows(10..64), 0);
    }
}
