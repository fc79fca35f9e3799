// VitalMon — Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V)

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_PIEZO_ADC: i32 = 2;   // D0/A0 — Piezo respiration sensor (ADC1_CH2)
pub const PIN_BUZZER: i32 = 4;      // D2/A2 — Alarm buzzer
// I2C: SDA on GPIO6 (D4), SCL on GPIO7 (D5), wired directly in main.rs.

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_MAX30102: u8 = 0x57;
pub const I2C_ADDR_OLED: u8 = 0x3C;
pub const I2C_BAUDRATE_KHZ: u32 = 400;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Display (SSD1306 OLED)
// ---------------------------------------------------------------------------
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const DISPLAY_BUFFER_SIZE: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8; // 1024

// Two-line readout: label column, value column, row pitch.
pub const READOUT_LABEL_X: i32 = 0;
pub const READOUT_VALUE_X: i32 = 64;
pub const READOUT_ROW_PITCH: i32 = 16;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const MONITOR_INTERVAL_MS: u64 = 1000;             // One vitals cycle per second
pub const SENSOR_DATA_TIMEOUT_MS: u64 = 250;           // Max wait for a fresh FIFO sample
pub const SENSOR_POLL_MS: u64 = 1;
pub const SENSOR_RESET_MS: u64 = 10;                   // Reset-bit poll interval
pub const SENSOR_RESET_TIMEOUT_MS: u64 = 100;          // Max wait for soft reset to clear

// ---------------------------------------------------------------------------
// MAX30102 Optical Sensor Setup
// ---------------------------------------------------------------------------
pub const LED_AMPLITUDE_RED: u8 = 0x0A;   // Low power for red LED (~2 mA)
pub const LED_AMPLITUDE_IR: u8 = 0x1F;    // ~6.4 mA
pub const FINGER_PRESENT_IR: u32 = 50_000; // Below this the sensor sees no tissue

// ---------------------------------------------------------------------------
// SpO2 (empirical linear fit over the red/IR ratio)
// ---------------------------------------------------------------------------
pub const SPO2_INTERCEPT: f32 = 104.0;
pub const SPO2_SLOPE: f32 = 17.0;

// ---------------------------------------------------------------------------
// Heart Rate
// ---------------------------------------------------------------------------
pub const HR_AVERAGE_SLOTS: usize = 4;
pub const HR_MIN_BPM: u16 = 30;
pub const HR_MAX_BPM: u16 = 180;

// ---------------------------------------------------------------------------
// Piezo / Respiration (10-bit scale)
// ---------------------------------------------------------------------------
pub const PIEZO_FULL_SCALE: u16 = 1023;
pub const PIEZO_CRITICAL_LEVEL: u16 = 1000;
pub const BREATH_RATE_MIN: u16 = 10;
pub const BREATH_RATE_MAX: u16 = 30;

// ---------------------------------------------------------------------------
// Alarm Thresholds
// ---------------------------------------------------------------------------
pub const ALARM_SPO2_BELOW: f32 = 95.0;
pub const ALARM_HR_ABOVE: u16 = 150;
pub const ALARM_STREAK_ABOVE: u32 = 300;
