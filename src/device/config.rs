//! # Device Configuration
//!
//! Hardware specifications of the MicroView plus the settings a session and
//! its serial link are created with.
//!
//! ## Supported Devices
//!
//! | Model | Panel | Controller | Glyph cell | Link |
//! |-------|-------|------------|------------|------|
//! | MicroView | 64x48 OLED | SSD1306 | 6x8 | USB serial, 115200 baud |
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//! use microview::device::{DeviceConfig, SessionConfig};
//!
//! let device = DeviceConfig::MICROVIEW;
//! println!("Panel: {}x{}", device.width, device.height);
//!
//! let session = SessionConfig::default().with_delay(Duration::from_millis(90));
//! assert_eq!(session.delay, Duration::from_millis(90));
//! ```

use std::time::Duration;

use crate::protocol::{HEIGHT, WIDTH};

/// Default pause after each command.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

/// Shortest delay the firmware reliably keeps up with. Lower values are
/// accepted but commands may be dropped by the device.
pub const MIN_RECOMMENDED_DELAY: Duration = Duration::from_millis(25);

/// Pause taken by [`crate::session::Session::set`] when a black pixel is
/// skipped instead of written.
pub const BLANK_PIXEL_DELAY: Duration = Duration::from_millis(5);

/// # Device Configuration
///
/// Defines the physical characteristics of a MicroView module.
///
/// ## Properties
///
/// - **width / height**: Panel size in pixels
/// - **glyph_width**: Horizontal advance of one character of the built-in font
/// - **baud_rate**: Speed of the firmware's serial console
/// - **greeting**: Text the firmware prints when the port is opened
#[derive(Debug, Clone, Copy)]
pub struct DeviceConfig {
    /// Device model name
    pub name: &'static str,

    /// Panel width in pixels
    pub width: u8,

    /// Panel height in pixels
    pub height: u8,

    /// Character advance in pixels
    pub glyph_width: u8,

    /// Serial speed
    pub baud_rate: u32,

    /// Greeting emitted on connect
    pub greeting: &'static str,
}

impl DeviceConfig {
    /// # SparkFun MicroView
    ///
    /// Arduino-compatible module with a 64x48 OLED running the serial
    /// remote-control sketch.
    ///
    /// ```text
    /// ┌────────── 64 px ──────────┐
    /// │                           │ 48 px
    /// │  10 glyphs per text line  │
    /// └───────────────────────────┘
    /// ```
    pub const MICROVIEW: Self = Self {
        name: "SparkFun MicroView",
        width: WIDTH,
        height: HEIGHT,
        glyph_width: 6,
        baud_rate: 115_200,
        greeting: "MicroView",
    };

    /// Characters that fit on one line.
    #[inline]
    pub fn chars_per_line(&self) -> u8 {
        self.width / self.glyph_width
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::MICROVIEW
    }
}

// ============================================================================
// SESSION SETTINGS
// ============================================================================

/// # Session Configuration
///
/// Applied once when a [`crate::session::Session`] is created.
///
/// | Field | Default | Meaning |
/// |-------|---------|---------|
/// | `delay` | 50 ms | Pause after every command write |
/// | `write_black_pixels` | `false` | Whether [`crate::session::Session::set`] sends black pixels |
///
/// With `write_black_pixels` off, `set` only ever lights pixels; existing
/// wire logs recorded against the device stay byte-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Settling delay after each command
    pub delay: Duration,

    /// Send BLACK pixel commands instead of skipping them
    pub write_black_pixels: bool,
}

impl SessionConfig {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn write_black_pixels(mut self, enabled: bool) -> Self {
        self.write_black_pixels = enabled;
        self
    }

    /// Whether the delay is below what the firmware keeps up with.
    pub fn is_delay_too_short(&self) -> bool {
        self.delay < MIN_RECOMMENDED_DELAY
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            write_black_pixels: false,
        }
    }
}

/// Serial link settings used by [`crate::transport::SerialTransport::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    /// Line speed in baud
    pub baud_rate: u32,

    /// How long to wait for the greeting after opening the port
    pub greeting_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DeviceConfig::MICROVIEW.baud_rate,
            greeting_timeout: Duration::from_secs(1),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_microview_dimensions() {
        let config = DeviceConfig::MICROVIEW;
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 48);
        assert_eq!(config.chars_per_line(), 10);
    }

    #[test]
    fn test_default_is_microview() {
        assert_eq!(DeviceConfig::default().name, DeviceConfig::MICROVIEW.name);
    }

    #[test]
    fn test_session_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.delay, Duration::from_millis(50));
        assert!(!config.write_black_pixels);
        assert!(!config.is_delay_too_short());
    }

    #[test]
    fn test_session_builders() {
        let config = SessionConfig::default()
            .with_delay(Duration::from_millis(10))
            .write_black_pixels(true);
        assert_eq!(config.delay, Duration::from_millis(10));
        assert!(config.write_black_pixels);
        assert!(config.is_delay_too_short());
    }

    #[test]
    fn test_min_delay_boundary() {
        let config = SessionConfig::default().with_delay(MIN_RECOMMENDED_DELAY);
        assert!(!config.is_delay_too_short());
    }

    #[test]
    fn test_serial_defaults() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.greeting_timeout, Duration::from_secs(1));
    }
}
