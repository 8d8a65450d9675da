//! # Serial TTY Transport
//!
//! This module talks to the MicroView through the USB serial adapter it
//! enumerates as (`/dev/ttyUSB0` on Linux, `/dev/cu.usbserial-*` on macOS).
//!
//! ## TTY Configuration
//!
//! The device is opened in raw mode so command text is transmitted without
//! modification:
//!
//! - **No input processing**: Disable IGNBRK, BRKINT, PARMRK, ISTRIP, etc.
//! - **No output processing**: Disable OPOST (no CR/LF translation)
//! - **8-bit characters**: CS8 (8 data bits, no parity)
//! - **No echo**: Disable ECHO, ECHONL
//! - **Non-canonical mode**: Disable ICANON (no line buffering)
//! - **Line speed**: Input and output set to the configured baud (115200)
//! - **Bounded reads**: VMIN=0 and VTIME from the greeting timeout, so a
//!   silent device makes `read` return 0 instead of blocking forever
//!
//! ## Permissions
//!
//! On Linux the user usually needs to be in the `dialout` group:
//!
//! ```bash
//! $ sudo usermod -aG dialout $USER
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::Transport;
use crate::device::SerialConfig;
use crate::error::MicroViewError;

/// Default serial device path
pub const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";

/// # Serial Transport
///
/// ## Example
///
/// ```no_run
/// use microview::device::SerialConfig;
/// use microview::protocol::commands;
/// use microview::transport::{SerialTransport, Transport};
///
/// let mut transport = SerialTransport::open("/dev/ttyUSB0", SerialConfig::default())?;
/// transport.write(commands::fill().as_bytes())?;
/// transport.close()?;
///
/// # Ok::<(), microview::error::MicroViewError>(())
/// ```
pub struct SerialTransport {
    file: Option<File>,
    path: PathBuf,
}

impl SerialTransport {
    /// Open and configure a serial device.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The device doesn't exist
    /// - Permission denied (may need the dialout group)
    /// - The baud rate is not a standard rate
    /// - TTY configuration fails
    pub fn open<P: AsRef<Path>>(device: P, config: SerialConfig) -> Result<Self, MicroViewError> {
        let path = device.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                MicroViewError::Transport(format!("Failed to open {}: {}", path.display(), e))
            })?;

        configure_tty(file.as_raw_fd(), config.baud_rate, config.greeting_timeout)?;

        log::info!(
            "opened {} at {} baud",
            path.display(),
            config.baud_rate
        );

        Ok(Self {
            file: Some(file),
            path: path.to_path_buf(),
        })
    }

    /// Open the default device path (/dev/ttyUSB0) at 115200 baud
    pub fn open_default() -> Result<Self, MicroViewError> {
        Self::open(DEFAULT_DEVICE, SerialConfig::default())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file(&mut self) -> Result<&mut File, MicroViewError> {
        self.file.as_mut().ok_or_else(|| {
            MicroViewError::InvalidState(format!("{} is closed", self.path.display()))
        })
    }
}

impl Transport for SerialTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, MicroViewError> {
        match self.file()?.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(0),
            Err(e) => Err(MicroViewError::Transport(format!("Read failed: {}", e))),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<(), MicroViewError> {
        let file = self.file()?;
        file.write_all(data)
            .map_err(|e| MicroViewError::Transport(format!("Write failed: {}", e)))?;
        file.flush()
            .map_err(|e| MicroViewError::Transport(format!("Flush failed: {}", e)))?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), MicroViewError> {
        let mut file = self.file.take().ok_or_else(|| {
            MicroViewError::InvalidState(format!("{} is already closed", self.path.display()))
        })?;
        file.flush()
            .map_err(|e| MicroViewError::Transport(format!("Flush failed: {}", e)))?;
        log::info!("closed {}", self.path.display());
        Ok(())
    }
}

/// Map a numeric baud rate onto the termios speed constant.
#[cfg(unix)]
fn baud_to_speed(baud: u32) -> Option<libc::speed_t> {
    Some(match baud {
        9_600 => libc::B9600,
        19_200 => libc::B19200,
        38_400 => libc::B38400,
        57_600 => libc::B57600,
        115_200 => libc::B115200,
        230_400 => libc::B230400,
        _ => return None,
    })
}

/// VTIME is measured in tenths of a second and capped at 255.
fn read_timeout_deciseconds(timeout: Duration) -> u8 {
    (timeout.as_millis() / 100).min(u8::MAX as u128) as u8
}

/// Configure a file descriptor for raw TTY mode at the given speed.
///
/// ## What Gets Disabled
///
/// - **Input flags**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR, ICRNL, IXON, IXOFF, IXANY
/// - **Output flags**: OPOST
/// - **Local flags**: ECHO, ECHONL, ICANON, ISIG, IEXTEN
/// - **Control flags**: CSIZE, PARENB (then CS8 | CREAD | CLOCAL is set)
#[cfg(unix)]
fn configure_tty(fd: i32, baud: u32, read_timeout: Duration) -> Result<(), MicroViewError> {
    use std::mem::MaybeUninit;

    let speed = baud_to_speed(baud)
        .ok_or_else(|| MicroViewError::Transport(format!("Unsupported baud rate: {}", baud)))?;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(MicroViewError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    termios.c_oflag &= !libc::OPOST;

    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8 | libc::CREAD | libc::CLOCAL;

    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = read_timeout_deciseconds(read_timeout);

    let speed_set = unsafe {
        libc::cfsetispeed(&mut termios, speed) == 0 && libc::cfsetospeed(&mut termios, speed) == 0
    };
    if !speed_set {
        return Err(MicroViewError::Transport(format!(
            "cfsetspeed failed: {}",
            io::Error::last_os_error()
        )));
    }

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(MicroViewError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

#[cfg(not(unix))]
fn configure_tty(_fd: i32, _baud: u32, _read_timeout: Duration) -> Result<(), MicroViewError> {
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_device_path() {
        assert_eq!(DEFAULT_DEVICE, "/dev/ttyUSB0");
    }

    #[test]
    fn test_standard_baud_rates() {
        assert_eq!(baud_to_speed(115_200), Some(libc::B115200));
        assert_eq!(baud_to_speed(9_600), Some(libc::B9600));
    }

    #[test]
    fn test_nonstandard_baud_rate_rejected() {
        assert_eq!(baud_to_speed(12_345), None);
    }

    #[test]
    fn test_read_timeout_conversion() {
        assert_eq!(read_timeout_deciseconds(Duration::from_secs(1)), 10);
        assert_eq!(read_timeout_deciseconds(Duration::from_millis(50)), 0);
        assert_eq!(read_timeout_deciseconds(Duration::from_secs(60)), 255);
    }

    #[test]
    fn test_open_missing_device_fails() {
        let result = SerialTransport::open("/dev/does-not-exist-microview", SerialConfig::default());
        assert!(matches!(result, Err(MicroViewError::Transport(_))));
    }

    #[test]
    fn test_open_non_tty_fails_configuration() {
        // /dev/null opens fine but is not a terminal, so tcgetattr fails.
        let result = SerialTransport::open("/dev/null", SerialConfig::default());
        assert!(matches!(result, Err(MicroViewError::Transport(_))));
    }
}
