//! # Device Module
//!
//! Hardware profile of the MicroView and the knobs that control how a
//! session talks to it.
//!
//! ## Modules
//!
//! - [`config`]: Device specifications, session and serial settings

pub mod config;

pub use config::{DeviceConfig, SerialConfig, SessionConfig};
