//! # In-Memory Transport
//!
//! Records every write and serves reads from a preloaded buffer. Used by the
//! test suite and handy for capturing a wire log without hardware.

use std::collections::VecDeque;

use super::Transport;
use crate::error::MicroViewError;

/// # Memory Transport
///
/// ## Example
///
/// ```
/// use microview::transport::{MemoryTransport, Transport};
///
/// let mut transport = MemoryTransport::with_incoming(b"MicroView");
/// transport.write(b"9,5,10,15,20")?;
///
/// assert_eq!(transport.contents(), b"9,5,10,15,20");
///
/// let mut buf = [0u8; 9];
/// assert_eq!(transport.read(&mut buf)?, 9);
/// # Ok::<(), microview::error::MicroViewError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryTransport {
    writes: Vec<Vec<u8>>,
    incoming: VecDeque<u8>,
    closed: bool,
    fail_writes: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload bytes the "device" will send.
    pub fn with_incoming(data: &[u8]) -> Self {
        Self {
            incoming: data.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// A transport whose writes always fail, for exercising error paths.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Every write, in order, each kept separate.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// Concatenation of all writes, exactly as a serial line would carry them.
    pub fn contents(&self) -> Vec<u8> {
        self.writes.concat()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<(), MicroViewError> {
        if self.closed {
            return Err(MicroViewError::InvalidState(
                "memory transport is closed".to_string(),
            ));
        }
        Ok(())
    }
}

impl Transport for MemoryTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, MicroViewError> {
        self.ensure_open()?;
        let n = buf.len().min(self.incoming.len());
        for (slot, byte) in buf.iter_mut().zip(self.incoming.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), MicroViewError> {
        self.ensure_open()?;
        if self.fail_writes {
            return Err(MicroViewError::Transport("Write failed: simulated".to_string()));
        }
        self.writes.push(data.to_vec());
        Ok(())
    }

    fn close(&mut self) -> Result<(), MicroViewError> {
        self.ensure_open()?;
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_are_kept_separate() {
        let mut t = MemoryTransport::new();
        t.write(b"0,1").unwrap();
        t.write(b"3").unwrap();
        assert_eq!(t.writes(), &[b"0,1".to_vec(), b"3".to_vec()]);
        assert_eq!(t.contents(), b"0,13");
    }

    #[test]
    fn test_read_drains_incoming() {
        let mut t = MemoryTransport::with_incoming(b"Micro");
        let mut buf = [0u8; 3];
        assert_eq!(t.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"Mic");
        assert_eq!(t.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ro");
        assert_eq!(t.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_close_twice_is_invalid_state() {
        let mut t = MemoryTransport::new();
        t.close().unwrap();
        assert!(t.is_closed());
        assert!(matches!(t.close(), Err(MicroViewError::InvalidState(_))));
        assert!(matches!(t.write(b"3"), Err(MicroViewError::InvalidState(_))));
    }

    #[test]
    fn test_failing_transport() {
        let mut t = MemoryTransport::failing();
        assert!(matches!(t.write(b"3"), Err(MicroViewError::Transport(_))));
        assert!(t.writes().is_empty());
    }
}
