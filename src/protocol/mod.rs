//! # MicroView Serial Protocol
//!
//! The MicroView firmware accepts one instruction per serial write. Each
//! instruction is plain ASCII: a command identifier followed by its
//! parameters, all as decimal integers joined by commas.
//!
//! ```text
//! 9,5,10,15,20
//! │ └────┬────┘
//! │      └── x, y, width, height
//! └── CMD_RECT
//! ```
//!
//! There is no terminator, length prefix or checksum. The device is given a
//! settling delay after each write instead (see [`crate::session`]).
//!
//! ## Module Structure
//!
//! - [`commands`]: Command builders, one per drawing/control operation
//! - [`decode`]: Parse wire text back into a typed [`decode::Op`]
//!
//! ## Usage Example
//!
//! ```
//! use microview::protocol::{commands, ClearMode};
//!
//! let cmds = [
//!     commands::clear(ClearMode::Page),
//!     commands::rect(5, 10, 15, 20),
//!     commands::display(),
//! ];
//!
//! assert_eq!(cmds[1].as_bytes(), b"9,5,10,15,20");
//! ```

use std::fmt;

pub mod commands;
pub mod decode;

/// Display width in pixels
pub const WIDTH: u8 = 64;

/// Display height in pixels
pub const HEIGHT: u8 = 48;

/// # Command Identifier
///
/// First field of every instruction. Values match the firmware's
/// `CMD_*` table exactly.
///
/// `DrawBitmap`, `GetLcdWidth` and `GetLcdHeight` are part of the firmware
/// table but have no builder in [`commands`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandId {
    Clear = 0,
    Invert = 1,
    Contrast = 2,
    Display = 3,
    SetCursor = 4,
    Pixel = 5,
    Line = 6,
    LineH = 7,
    LineV = 8,
    Rect = 9,
    RectFill = 10,
    Circle = 11,
    CircleFill = 12,
    DrawChar = 13,
    /// Reserved, not implemented by the firmware
    DrawBitmap = 14,
    /// Reserved query
    GetLcdWidth = 15,
    /// Reserved query
    GetLcdHeight = 16,
    SetColor = 17,
    SetDrawMode = 18,
}

impl CommandId {
    /// Wire value of this identifier.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CommandId {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Clear,
            1 => Self::Invert,
            2 => Self::Contrast,
            3 => Self::Display,
            4 => Self::SetCursor,
            5 => Self::Pixel,
            6 => Self::Line,
            7 => Self::LineH,
            8 => Self::LineV,
            9 => Self::Rect,
            10 => Self::RectFill,
            11 => Self::Circle,
            12 => Self::CircleFill,
            13 => Self::DrawChar,
            14 => Self::DrawBitmap,
            15 => Self::GetLcdWidth,
            16 => Self::GetLcdHeight,
            17 => Self::SetColor,
            18 => Self::SetDrawMode,
            other => return Err(other),
        })
    }
}

/// Pixel color. The panel is monochrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Color {
    #[default]
    Black = 0,
    White = 1,
}

/// Pixel compositing rule applied by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DrawMode {
    /// Overwrite the target pixel
    #[default]
    Normal = 0,
    /// Toggle the target pixel
    Xor = 1,
}

/// What a clear command wipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClearMode {
    /// Screen page buffer only
    Page = 0,
    /// GDRAM inside the SSD1306 controller as well
    All = 1,
}

macro_rules! wire_enum {
    ($ty:ident { $($value:literal => $variant:ident),+ $(,)? }) => {
        impl TryFrom<u8> for $ty {
            type Error = u8;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    other => Err(other),
                }
            }
        }
    };
}

wire_enum!(Color { 0 => Black, 1 => White });
wire_enum!(DrawMode { 0 => Normal, 1 => Xor });
wire_enum!(ClearMode { 0 => Page, 1 => All });

/// # Command
///
/// One encoded instruction, ready to be written to a transport.
///
/// Built by the functions in [`commands`]; the bytes are never modified
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command(Vec<u8>);

impl Command {
    /// Encode an identifier and its fields as comma-separated decimals.
    pub(crate) fn encode(id: CommandId, fields: &[u32]) -> Self {
        let mut text = id.as_u8().to_string();
        for field in fields {
            text.push(',');
            text.push_str(&field.to_string());
        }
        Self(text.into_bytes())
    }

    /// Identifier this command was built with.
    pub fn id(&self) -> Option<CommandId> {
        let head = self.0.split(|&b| b == b',').next()?;
        std::str::from_utf8(head)
            .ok()?
            .parse::<u8>()
            .ok()
            .and_then(|v| CommandId::try_from(v).ok())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Command {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Always ASCII: built from digits and commas only.
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}
