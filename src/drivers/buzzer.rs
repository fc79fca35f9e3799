// VitalMon — Alarm Buzzer Driver
//
// Active buzzer on a plain GPIO: high = sounding.

use embedded_hal::digital::OutputPin;

use crate::readings::Alarm;

pub struct Buzzer<P> {
    pin: P,
    state: Alarm,
}

impl<P: OutputPin> Buzzer<P> {
    /// Takes ownership of the pin and drives it low.
    pub fn new(mut pin: P) -> anyhow::Result<Self> {
        pin.set_low()
            .map_err(|e| anyhow::anyhow!("buzzer pin: {:?}", e))?;
        Ok(Self {
            pin,
            state: Alarm::Off,
        })
    }

    pub fn set(&mut self, alarm: Alarm) -> anyhow::Result<()> {
        match alarm {
            Alarm::On => self.pin.set_high(),
            Alarm::Off => self.pin.set_low(),
        }
        .map_err(|e| anyhow::anyhow!("buzzer pin: {:?}", e))?;
        self.state = alarm;
        Ok(())
    }

    pub fn state(&self) -> Alarm {
        self.state
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every level written to it.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingPin(pub(crate) Rc<RefCell<Vec<bool>>>);

    impl RecordingPin {
        pub(crate) fn writes(&self) -> Vec<bool> {
            self.0.borrow().clone()
        }
    }

    impl ErrorType for RecordingPin {
        type Error = Infallible;
    }

    impl OutputPin for RecordingPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().push(true);
            Ok(())
        }
    }

    #[test]
    fn starts_silent() {
        let pin = RecordingPin::default();
        let buzzer = Buzzer::new(pin.clone()).unwrap();
        assert_eq!(pin.writes(), vec![false]);
        assert_eq!(buzzer.state(), Alarm::Off);
    }

    #[test]
    fn follows_alarm_state() {
        let pin = RecordingPin::default();
        let mut buzzer = Buzzer::new(pin.clone()).unwrap();
        buzzer.set(Alarm::On).unwrap();
        assert_eq!(buzzer.state(), Alarm::On);
        buzzer.set(Alarm::Off).unwrap();
        assert_eq!(pin.writes(), vec![false, true, false]);
    }
}
