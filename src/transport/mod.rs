//! # Device Transport Layer
//!
//! A session only needs three things from the link to the MicroView: read,
//! write and close. The [`Transport`] trait captures exactly that so the
//! session can drive a real serial port, an in-memory buffer or the preview
//! renderer interchangeably.
//!
//! ## Available Transports
//!
//! - [`serial`]: Raw TTY serial port (USB serial adapter on the MicroView)
//! - [`memory`]: In-memory buffer for tests and wire logs
//! - [`crate::preview::PreviewTransport`]: Renders commands to an image

pub mod memory;
pub mod serial;

pub use memory::MemoryTransport;
pub use serial::SerialTransport;

use crate::error::MicroViewError;

/// A byte-oriented duplex link to the device.
///
/// Implementations are driven from one thread at a time and need no
/// internal synchronization.
pub trait Transport {
    /// Read whatever the device has sent, up to `buf.len()` bytes.
    ///
    /// Returns the number of bytes read; `0` means nothing arrived.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, MicroViewError>;

    /// Write one whole command.
    fn write(&mut self, data: &[u8]) -> Result<(), MicroViewError>;

    /// Release the link. Closing twice is an error.
    fn close(&mut self) -> Result<(), MicroViewError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, MicroViewError> {
        (**self).read(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), MicroViewError> {
        (**self).write(data)
    }

    fn close(&mut self) -> Result<(), MicroViewError> {
        (**self).close()
    }
}
