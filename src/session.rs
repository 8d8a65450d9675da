//! # Device Session
//!
//! A [`Session`] owns the link to one MicroView and paces commands so the
//! firmware keeps up: every write is followed by the configured settling
//! delay, on the calling thread.
//!
//! ```text
//! run(a, b, c)
//!   write a ── sleep delay ── write b ── sleep delay ── write c ── sleep delay
//! ```
//!
//! The device never replies, so nothing is read after the connection
//! greeting.
//!
//! ## Lifecycle
//!
//! A session is open from construction until [`Session::close`]. After that
//! every sending operation returns [`MicroViewError::InvalidState`]. Dropping
//! an open session closes the transport.
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use microview::protocol::commands;
//! use microview::{Session, SessionConfig};
//!
//! let config = SessionConfig::default().with_delay(Duration::from_millis(90));
//! let mut mv = Session::open("/dev/ttyUSB0", config)?;
//!
//! mv.run([
//!     commands::rect_fill(5, 5, 5, 15),
//!     commands::rect(1, 1, 20, 40),
//! ])?;
//! mv.draw_string(0, 30, "Hello")?;
//! mv.close()?;
//! # Ok::<(), microview::error::MicroViewError>(())
//! ```

use std::path::Path;
use std::thread;

use image::{ColorType, GenericImageView, Luma, Pixel};

use crate::device::config::BLANK_PIXEL_DELAY;
use crate::device::{DeviceConfig, SerialConfig, SessionConfig};
use crate::error::MicroViewError;
use crate::protocol::{Color, Command, DrawMode, commands};
use crate::transport::{SerialTransport, Transport};

/// Axis-aligned rectangle, `min` inclusive and `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: (u32, u32),
    pub max: (u32, u32),
}

impl Bounds {
    pub fn width(&self) -> u32 {
        self.max.0 - self.min.0
    }

    pub fn height(&self) -> u32 {
        self.max.1 - self.min.1
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.min.0 && x < self.max.0 && y >= self.min.1 && y < self.max.1
    }
}

/// # MicroView Session
///
/// Generic over the [`Transport`] so tests can substitute an in-memory
/// buffer for the serial port.
pub struct Session<T: Transport> {
    transport: Option<T>,
    config: SessionConfig,
}

impl Session<SerialTransport> {
    /// Open a serial port at 115200 baud and wait briefly for the greeting.
    ///
    /// The greeting read is best effort: a silent or garbled device still
    /// yields a usable session. Only failing to open or configure the port
    /// is an error.
    pub fn open<P: AsRef<Path>>(device: P, config: SessionConfig) -> Result<Self, MicroViewError> {
        Self::open_with(device, SerialConfig::default(), config)
    }

    /// Like [`Session::open`] with explicit serial settings.
    pub fn open_with<P: AsRef<Path>>(
        device: P,
        serial: SerialConfig,
        config: SessionConfig,
    ) -> Result<Self, MicroViewError> {
        let mut transport = SerialTransport::open(device, serial)?;
        read_greeting(&mut transport, DeviceConfig::MICROVIEW.greeting);
        Ok(Self::with_config(transport, config))
    }
}

impl<T: Transport> Session<T> {
    /// Wrap a transport with the default 50 ms delay.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, SessionConfig::default())
    }

    pub fn with_config(transport: T, config: SessionConfig) -> Self {
        // Zero means deliberately unpaced (preview, tests).
        if !config.delay.is_zero() && config.is_delay_too_short() {
            log::warn!(
                "command delay of {:?} is below the recommended minimum; the device may drop commands",
                config.delay
            );
        }
        Self {
            transport: Some(transport),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Borrow the transport, e.g. to inspect a [`crate::transport::MemoryTransport`].
    pub fn transport(&self) -> Result<&T, MicroViewError> {
        self.transport.as_ref().ok_or_else(closed)
    }

    /// Take the transport back without closing it.
    pub fn into_transport(mut self) -> Option<T> {
        self.transport.take()
    }

    /// Write each command in order, pausing after every one.
    ///
    /// Stops at the first failed write and returns its error; commands
    /// already written stay written.
    pub fn run<I>(&mut self, commands: I) -> Result<(), MicroViewError>
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            self.send(&command)?;
        }
        Ok(())
    }

    /// Draw `text` one character at a time, advancing 6 px per character.
    ///
    /// Coordinates wrap at 256 like every other byte parameter.
    pub fn draw_string(&mut self, x: u8, y: u8, text: &str) -> Result<(), MicroViewError> {
        let advance = DeviceConfig::MICROVIEW.glyph_width;
        for (i, c) in text.chars().enumerate() {
            let offset = (i as u8).wrapping_mul(advance);
            self.send(&commands::draw_char(x.wrapping_add(offset), y, c))?;
        }
        Ok(())
    }

    /// Set one pixel from any `image` pixel type.
    ///
    /// A pixel with a nonzero color channel and nonzero alpha is drawn
    /// WHITE in NORMAL mode. Anything else is skipped (only a 5 ms pause)
    /// unless [`SessionConfig::write_black_pixels`] is enabled, in which
    /// case it is drawn BLACK.
    pub fn set<P>(&mut self, x: u32, y: u32, pixel: P) -> Result<(), MicroViewError>
    where
        P: Pixel<Subpixel = u8>,
    {
        self.ensure_open()?;

        let color = if is_lit(&pixel) {
            Color::White
        } else if self.config.write_black_pixels {
            Color::Black
        } else {
            thread::sleep(BLANK_PIXEL_DELAY);
            return Ok(());
        };

        let command = commands::pixel_with_color_and_mode(x as u8, y as u8, color, DrawMode::Normal);
        self.send(&command)
    }

    /// Copy every pixel of `image` that lands on the panel.
    pub fn draw_image<I>(&mut self, image: &I) -> Result<(), MicroViewError>
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        self.ensure_open()?;
        let bounds = self.bounds();
        for (x, y, pixel) in image.pixels() {
            if bounds.contains(x, y) {
                self.set(x, y, pixel)?;
            }
        }
        Ok(())
    }

    /// Panel rectangle, (0,0)-(64,48). Independent of anything drawn.
    pub fn bounds(&self) -> Bounds {
        let device = DeviceConfig::MICROVIEW;
        Bounds {
            min: (0, 0),
            max: (device.width as u32, device.height as u32),
        }
    }

    /// The panel is monochrome; reported as 8-bit grayscale.
    pub fn color_type(&self) -> ColorType {
        ColorType::L8
    }

    /// Always black: the firmware has no way to read pixels back.
    pub fn at(&self, _x: u32, _y: u32) -> Luma<u8> {
        Luma([0])
    }

    /// Close the transport. A second close is an [`MicroViewError::InvalidState`].
    pub fn close(&mut self) -> Result<(), MicroViewError> {
        let mut transport = self.transport.take().ok_or_else(closed)?;
        transport.close()
    }

    fn ensure_open(&self) -> Result<(), MicroViewError> {
        self.transport.as_ref().map(|_| ()).ok_or_else(closed)
    }

    fn send(&mut self, command: &Command) -> Result<(), MicroViewError> {
        let transport = self.transport.as_mut().ok_or_else(closed)?;
        log::debug!("-> {}", command);
        transport.write(command.as_bytes())?;
        thread::sleep(self.config.delay);
        Ok(())
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.close() {
                log::warn!("failed to close transport: {}", e);
            }
        }
    }
}

fn closed() -> MicroViewError {
    MicroViewError::InvalidState("session is closed".to_string())
}

fn is_lit<P: Pixel<Subpixel = u8>>(pixel: &P) -> bool {
    let [r, g, b, a] = pixel.to_rgba().0;
    a > 0 && (r > 0 || g > 0 || b > 0)
}

/// Consume the greeting the firmware prints on connect. Failures are logged
/// and otherwise ignored.
fn read_greeting<T: Transport>(transport: &mut T, greeting: &str) {
    let mut buf = vec![0u8; greeting.len()];
    match transport.read(&mut buf) {
        Ok(n) if &buf[..n] == greeting.as_bytes() => log::debug!("device greeted: {}", greeting),
        Ok(0) => log::warn!("no greeting from device"),
        Ok(n) => log::warn!(
            "unexpected greeting: {:?}",
            String::from_utf8_lossy(&buf[..n])
        ),
        Err(e) => log::warn!("greeting read failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;
    use image::{Rgb, Rgba};
    use std::time::{Duration, Instant};

    fn session() -> Session<MemoryTransport> {
        Session::with_config(
            MemoryTransport::new(),
            SessionConfig::default().with_delay(Duration::ZERO),
        )
    }

    fn writes(mv: &Session<MemoryTransport>) -> Vec<String> {
        mv.transport()
            .unwrap()
            .writes()
            .iter()
            .map(|w| String::from_utf8(w.clone()).unwrap())
            .collect()
    }

    #[test]
    fn test_default_delay() {
        let mv = Session::new(MemoryTransport::new());
        assert_eq!(mv.config().delay, Duration::from_millis(50));
    }

    #[test]
    fn test_run_writes_in_order() {
        let mut mv = session();
        mv.run([commands::clear(crate::protocol::ClearMode::Page), commands::rect(5, 10, 15, 20)])
            .unwrap();
        assert_eq!(writes(&mv), vec!["0,0", "9,5,10,15,20"]);
        assert_eq!(mv.transport().unwrap().contents(), b"0,09,5,10,15,20");
    }

    #[test]
    fn test_run_sleeps_after_each_command() {
        let delay = Duration::from_millis(10);
        let mut mv = Session::with_config(MemoryTransport::new(), SessionConfig::default().with_delay(delay));
        let start = Instant::now();
        mv.run([commands::display(), commands::display(), commands::display()])
            .unwrap();
        assert!(start.elapsed() >= delay * 3);
    }

    #[test]
    fn test_run_empty_batch() {
        let mut mv = session();
        mv.run(Vec::new()).unwrap();
        assert!(writes(&mv).is_empty());
    }

    #[test]
    fn test_draw_string_advances_six_pixels() {
        let mut mv = session();
        mv.draw_string(0, 0, "AB").unwrap();
        assert_eq!(writes(&mv), vec!["13,0,0,65", "13,6,0,66"]);
    }

    #[test]
    fn test_draw_string_counts_characters_not_bytes() {
        let mut mv = session();
        mv.draw_string(10, 8, "éa").unwrap();
        assert_eq!(writes(&mv), vec!["13,10,8,233", "13,16,8,97"]);
    }

    #[test]
    fn test_draw_string_wraps_x() {
        let mut mv = session();
        mv.draw_string(250, 0, "ab").unwrap();
        assert_eq!(writes(&mv), vec!["13,250,0,97", "13,0,0,98"]);
    }

    #[test]
    fn test_set_lit_pixel_writes_white() {
        let mut mv = session();
        mv.set(3, 4, Rgb([0, 0, 1])).unwrap();
        assert_eq!(writes(&mv), vec!["5,3,4,1,0"]);
    }

    #[test]
    fn test_set_black_pixel_skips_write() {
        let mut mv = session();
        let start = Instant::now();
        mv.set(3, 4, Luma([0u8])).unwrap();
        assert!(start.elapsed() >= BLANK_PIXEL_DELAY);
        assert!(writes(&mv).is_empty());
    }

    #[test]
    fn test_set_transparent_pixel_is_black() {
        let mut mv = session();
        mv.set(3, 4, Rgba([255, 255, 255, 0])).unwrap();
        assert!(writes(&mv).is_empty());
    }

    #[test]
    fn test_set_black_pixel_when_enabled() {
        let mut mv = Session::with_config(
            MemoryTransport::new(),
            SessionConfig::default()
                .with_delay(Duration::ZERO)
                .write_black_pixels(true),
        );
        mv.set(3, 4, Luma([0u8])).unwrap();
        assert_eq!(writes(&mv), vec!["5,3,4,0,0"]);
    }

    #[test]
    fn test_read_as_image_stub() {
        let mut mv = session();
        mv.run([commands::fill()]).unwrap();
        let bounds = mv.bounds();
        assert_eq!(bounds.min, (0, 0));
        assert_eq!(bounds.max, (64, 48));
        assert_eq!(mv.color_type(), ColorType::L8);
        assert_eq!(mv.at(10, 10), Luma([0]));
    }

    #[test]
    fn test_operations_after_close_are_invalid() {
        let mut mv = session();
        mv.close().unwrap();
        assert!(!mv.is_open());
        assert!(matches!(mv.run([commands::display()]), Err(MicroViewError::InvalidState(_))));
        assert!(matches!(mv.draw_string(0, 0, "A"), Err(MicroViewError::InvalidState(_))));
        assert!(matches!(mv.set(0, 0, Luma([255u8])), Err(MicroViewError::InvalidState(_))));
        assert!(matches!(mv.close(), Err(MicroViewError::InvalidState(_))));
        assert_eq!(mv.bounds().max, (64, 48));
    }

    #[test]
    fn test_write_failure_stops_batch() {
        let mut mv = Session::with_config(
            MemoryTransport::failing(),
            SessionConfig::default().with_delay(Duration::ZERO),
        );
        let result = mv.run([commands::display(), commands::display()]);
        assert!(matches!(result, Err(MicroViewError::Transport(_))));
    }

    #[test]
    fn test_read_greeting_consumes_bytes() {
        let mut t = MemoryTransport::with_incoming(b"MicroView");
        read_greeting(&mut t, "MicroView");
        let mut buf = [0u8; 4];
        assert_eq!(t.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_read_greeting_ignores_silence() {
        let mut t = MemoryTransport::new();
        read_greeting(&mut t, "MicroView");
        assert!(!t.is_closed());
    }
}
