// VitalMon — Firmware Entry Point
//
// Boot sequence:
//   1. Buzzer pin driven low.
//   2. I2C bus up, MAX30102 pulse-oximetry sensor configured.
//   3. SSD1306 OLED initialised and blanked.
//   4. Piezo ADC channel configured.
//   5. Monitor loop runs until power-off.
//
// A missing sensor or display is fatal: the error is logged and the firmware
// parks forever.

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("vitalmon targets ESP-IDF; on the host run `cargo test --lib`");
}

#[cfg(target_os = "espidf")]
mod firmware {
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::PinDriver;
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;

    use vitalmon::config::*;
    use vitalmon::drivers::buzzer::Buzzer;
    use vitalmon::drivers::clock::EspClock;
    use vitalmon::drivers::max30102::Max30102;
    use vitalmon::drivers::oled::OledDisplay;
    use vitalmon::drivers::piezo::PiezoSensor;
    use vitalmon::drivers::SharedBus;
    use vitalmon::{Monitor, Vitals};

    pub fn run() -> anyhow::Result<()> {
        // Link esp-idf-sys runtime patches and initialise logging.
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
        log::info!("Initializing...");

        let peripherals = Peripherals::take()?;

        // ---- Buzzer (silent until the first evaluation) -------------------
        let buzzer = Buzzer::new(PinDriver::output(peripherals.pins.gpio4)?)?; // PIN_BUZZER
        log::info!("Buzzer on GPIO{}", PIN_BUZZER);

        // ---- I2C bus (shared between MAX30102 and OLED) -------------------
        let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
        let i2c: I2cDriver<'static> = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio6, // SDA
            peripherals.pins.gpio7, // SCL
            &i2c_config,
        )?;
        // Lives for the rest of the programme (firmware never exits).
        let i2c_bus: SharedBus = Box::leak(Box::new(Mutex::new(i2c)));

        // ---- Optical sensor ------------------------------------------------
        let sensor = Max30102::new(i2c_bus);
        if let Err(e) = sensor.init() {
            halt("MAX30102 not found. Check the connection!", e);
        }

        // ---- Display -------------------------------------------------------
        let mut display = OledDisplay::new(i2c_bus);
        if let Err(e) = display.init() {
            halt("Failed to initialize the display!", e);
        }

        // ---- Piezo ---------------------------------------------------------
        let piezo = match PiezoSensor::new() {
            Ok(piezo) => piezo,
            Err(e) => halt("Failed to configure the piezo ADC!", e),
        };

        log::info!("Boot complete — entering monitor loop");
        let mut monitor = Monitor::new(sensor, piezo, buzzer, display, EspClock);
        let mut vitals = Vitals::default();
        monitor.run(&mut vitals)
    }

    /// Log a fatal init failure and idle forever. No retry.
    fn halt(message: &str, cause: anyhow::Error) -> ! {
        log::error!("{} ({:#})", message, cause);
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }
}
