//! # Command Decoding
//!
//! Parses wire text back into a typed [`Op`]. The session never needs this
//! (the device sends no replies); it exists for the preview renderer and for
//! validating hand-written commands before they are sent.
//!
//! Decoding is strict: field counts must match one of the forms produced by
//! [`super::commands`], every field must fit in a byte, and colors/modes
//! must be 0 or 1. Reserved identifiers (bitmap, width/height queries) are
//! rejected.

use super::{ClearMode, Color, Command, CommandId, DrawMode};
use crate::error::MicroViewError;

/// Explicit color and mode carried by a long-form command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub color: Color,
    pub mode: DrawMode,
}

/// A decoded instruction.
///
/// `style` is `None` for short-form commands, which use whatever color and
/// draw mode the device currently has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Clear(ClearMode),
    Invert(bool),
    Contrast(u8),
    Display,
    SetCursor { x: u8, y: u8 },
    Pixel { x: u8, y: u8, style: Option<Style> },
    Line { x0: u8, y0: u8, x1: u8, y1: u8, style: Option<Style> },
    LineH { x: u8, y: u8, width: u8, style: Option<Style> },
    LineV { x: u8, y: u8, height: u8, style: Option<Style> },
    Rect { x: u8, y: u8, width: u8, height: u8, style: Option<Style> },
    RectFill { x: u8, y: u8, width: u8, height: u8, style: Option<Style> },
    Circle { x: u8, y: u8, radius: u8 },
    CircleFill { x: u8, y: u8, radius: u8 },
    DrawChar { x: u8, y: u8, c: char },
    SetColor(Color),
    SetDrawMode(DrawMode),
}

impl Op {
    /// Identifier this op is sent with.
    pub fn id(&self) -> CommandId {
        match self {
            Op::Clear(_) => CommandId::Clear,
            Op::Invert(_) => CommandId::Invert,
            Op::Contrast(_) => CommandId::Contrast,
            Op::Display => CommandId::Display,
            Op::SetCursor { .. } => CommandId::SetCursor,
            Op::Pixel { .. } => CommandId::Pixel,
            Op::Line { .. } => CommandId::Line,
            Op::LineH { .. } => CommandId::LineH,
            Op::LineV { .. } => CommandId::LineV,
            Op::Rect { .. } => CommandId::Rect,
            Op::RectFill { .. } => CommandId::RectFill,
            Op::Circle { .. } => CommandId::Circle,
            Op::CircleFill { .. } => CommandId::CircleFill,
            Op::DrawChar { .. } => CommandId::DrawChar,
            Op::SetColor(_) => CommandId::SetColor,
            Op::SetDrawMode(_) => CommandId::SetDrawMode,
        }
    }
}

/// Decode a [`Command`].
pub fn decode(command: &Command) -> Result<Op, MicroViewError> {
    decode_bytes(command.as_bytes())
}

/// Decode raw wire bytes such as `b"9,5,10,15,20"`.
pub fn decode_bytes(data: &[u8]) -> Result<Op, MicroViewError> {
    let text = std::str::from_utf8(data)
        .map_err(|_| MicroViewError::InvalidCommand("command is not ASCII text".to_string()))?;
    decode_str(text)
}

/// Decode wire text such as `"9,5,10,15,20"`.
pub fn decode_str(text: &str) -> Result<Op, MicroViewError> {
    let fields = Fields::parse(text)?;
    let id = fields.id;

    let op = match (id, fields.args.len()) {
        (CommandId::Clear, 1) => Op::Clear(fields.wire(0, "clear mode")?),
        (CommandId::Invert, 1) => Op::Invert(match fields.byte(0)? {
            0 => false,
            1 => true,
            other => return Err(invalid(text, format!("invert flag {} is not 0 or 1", other))),
        }),
        (CommandId::Contrast, 1) => Op::Contrast(fields.byte(0)?),
        (CommandId::Display, 0) => Op::Display,
        (CommandId::SetCursor, 2) => Op::SetCursor {
            x: fields.byte(0)?,
            y: fields.byte(1)?,
        },
        (CommandId::Pixel, 2 | 4) => Op::Pixel {
            x: fields.byte(0)?,
            y: fields.byte(1)?,
            style: fields.style(2)?,
        },
        (CommandId::Line, 4 | 6) => Op::Line {
            x0: fields.byte(0)?,
            y0: fields.byte(1)?,
            x1: fields.byte(2)?,
            y1: fields.byte(3)?,
            style: fields.style(4)?,
        },
        (CommandId::LineH, 3 | 5) => Op::LineH {
            x: fields.byte(0)?,
            y: fields.byte(1)?,
            width: fields.byte(2)?,
            style: fields.style(3)?,
        },
        (CommandId::LineV, 3 | 5) => Op::LineV {
            x: fields.byte(0)?,
            y: fields.byte(1)?,
            height: fields.byte(2)?,
            style: fields.style(3)?,
        },
        (CommandId::Rect, 4 | 6) => Op::Rect {
            x: fields.byte(0)?,
            y: fields.byte(1)?,
            width: fields.byte(2)?,
            height: fields.byte(3)?,
            style: fields.style(4)?,
        },
        (CommandId::RectFill, 4 | 6) => Op::RectFill {
            x: fields.byte(0)?,
            y: fields.byte(1)?,
            width: fields.byte(2)?,
            height: fields.byte(3)?,
            style: fields.style(4)?,
        },
        (CommandId::Circle, 3) => Op::Circle {
            x: fields.byte(0)?,
            y: fields.byte(1)?,
            radius: fields.byte(2)?,
        },
        (CommandId::CircleFill, 3) => Op::CircleFill {
            x: fields.byte(0)?,
            y: fields.byte(1)?,
            radius: fields.byte(2)?,
        },
        (CommandId::DrawChar, 3) => Op::DrawChar {
            x: fields.byte(0)?,
            y: fields.byte(1)?,
            c: char::from_u32(fields.args[2])
                .ok_or_else(|| invalid(text, format!("{} is not a character", fields.args[2])))?,
        },
        (CommandId::SetColor, 1) => Op::SetColor(fields.wire(0, "color")?),
        (CommandId::SetDrawMode, 1) => Op::SetDrawMode(fields.wire(0, "draw mode")?),
        (CommandId::DrawBitmap | CommandId::GetLcdWidth | CommandId::GetLcdHeight, _) => {
            return Err(invalid(text, format!("{:?} is reserved", id)));
        }
        (_, n) => {
            return Err(invalid(text, format!("{:?} does not take {} fields", id, n)));
        }
    };

    Ok(op)
}

/// Turn hand-written wire text into a [`Command`], rejecting anything the
/// firmware would not understand.
///
/// ```
/// use microview::protocol::{commands, decode};
///
/// assert_eq!(decode::parse_command("9,5,10,15,20")?, commands::rect(5, 10, 15, 20));
/// assert!(decode::parse_command("9,5,10").is_err());
/// # Ok::<(), microview::error::MicroViewError>(())
/// ```
pub fn parse_command(text: &str) -> Result<Command, MicroViewError> {
    decode_str(text)?;
    Ok(Command(text.as_bytes().to_vec()))
}

fn invalid(text: &str, reason: String) -> MicroViewError {
    MicroViewError::InvalidCommand(format!("{:?}: {}", text, reason))
}

/// Split wire text into identifier and numeric arguments.
struct Fields<'a> {
    text: &'a str,
    id: CommandId,
    args: Vec<u32>,
}

impl<'a> Fields<'a> {
    fn parse(text: &'a str) -> Result<Self, MicroViewError> {
        let mut values = Vec::new();
        for field in text.split(',') {
            if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid(text, format!("field {:?} is not a decimal integer", field)));
            }
            let value = field
                .parse::<u32>()
                .map_err(|_| invalid(text, format!("field {} is out of range", field)))?;
            values.push(value);
        }

        // split() always yields at least one field, so this cannot be empty
        let raw_id = values.remove(0);
        let id = u8::try_from(raw_id)
            .ok()
            .and_then(|v| CommandId::try_from(v).ok())
            .ok_or_else(|| invalid(text, format!("unknown command identifier {}", raw_id)))?;

        Ok(Self {
            text,
            id,
            args: values,
        })
    }

    fn byte(&self, index: usize) -> Result<u8, MicroViewError> {
        let value = self.args[index];
        u8::try_from(value)
            .map_err(|_| invalid(self.text, format!("field {} does not fit in a byte", value)))
    }

    fn wire<T: TryFrom<u8, Error = u8>>(
        &self,
        index: usize,
        what: &str,
    ) -> Result<T, MicroViewError> {
        T::try_from(self.byte(index)?)
            .map_err(|v| invalid(self.text, format!("{} is not a valid {}", v, what)))
    }

    /// Color and mode at `index`, if the long form was used.
    fn style(&self, index: usize) -> Result<Option<Style>, MicroViewError> {
        if self.args.len() <= index {
            return Ok(None);
        }
        Ok(Some(Style {
            color: self.wire(index, "color")?,
            mode: self.wire(index + 1, "draw mode")?,
        }))
    }
}
