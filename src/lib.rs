//! # MicroView - OLED Module Remote Control Library
//!
//! MicroView is a Rust library for drawing on a SparkFun MicroView (64x48
//! OLED, Arduino-compatible) over its USB serial link. It provides:
//!
//! - **Protocol implementation**: Builders for every drawing/control command
//! - **Session**: Sequenced transmission with a settling delay per command
//! - **Transport**: Serial TTY, in-memory, and preview backends
//! - **Preview**: Host-side frame buffer simulation exported as PNG
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use microview::{
//!     protocol::{commands, ClearMode},
//!     Session, SessionConfig,
//! };
//!
//! // Open connection to the device (115200 baud)
//! let config = SessionConfig::default().with_delay(Duration::from_millis(90));
//! let mut mv = Session::open("/dev/ttyUSB0", config)?;
//!
//! // Draw
//! mv.run([
//!     commands::clear(ClearMode::Page),
//!     commands::rect_fill(5, 5, 5, 15),
//!     commands::circle(40, 20, 10),
//! ])?;
//! mv.draw_string(0, 38, "MicroView")?;
//!
//! mv.close()?;
//! # Ok::<(), microview::error::MicroViewError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Command builders and decoder |
//! | [`session`] | Paced command transmission |
//! | [`transport`] | Communication backends |
//! | [`preview`] | Frame buffer simulation |
//! | [`device`] | Device and session configuration |
//! | [`demos`] | Demonstration drawings |
//! | [`error`] | Error types |
//!
//! ## Supported Devices
//!
//! - SparkFun MicroView running the serial remote-control sketch

pub mod demos;
pub mod device;
pub mod error;
pub mod preview;
pub mod protocol;
pub mod session;
pub mod transport;

// Re-exports for convenience
pub use device::{DeviceConfig, SessionConfig};
pub use error::MicroViewError;
pub use session::Session;
pub use transport::SerialTransport;
