//! # MicroView Command Builders
//!
//! One builder per firmware instruction. Every builder is a pure function
//! returning a [`Command`]; nothing is sent until the command is handed to a
//! [`crate::session::Session`].
//!
//! ## Current vs Explicit Style
//!
//! Shapes come in two forms:
//!
//! - **Short form** (`rect`, `line`, ...): drawn with the color and draw mode
//!   currently configured on the device (see [`set_color`], [`set_draw_mode`])
//! - **Long form** (`rect_with_color_and_mode`, ...): color and mode travel
//!   with the command
//!
//! ## Parameter Ranges
//!
//! All parameters are bytes. Nothing is range checked: coordinates outside
//! the 64x48 panel are passed through and the firmware decides what to do
//! with them.

use super::{ClearMode, Color, Command, CommandId, DrawMode, HEIGHT, WIDTH};

// ============================================================================
// DISPLAY CONTROL
// ============================================================================

/// # Clear (CMD_CLEAR, 0)
///
/// Wipe the screen.
///
/// | Mode | Effect |
/// |------|--------|
/// | [`ClearMode::Page`] | Clear the screen page buffer |
/// | [`ClearMode::All`] | Clear GDRAM inside the controller too |
///
/// ## Example
///
/// ```
/// use microview::protocol::{commands, ClearMode};
///
/// assert_eq!(commands::clear(ClearMode::All).as_bytes(), b"0,1");
/// assert_eq!(commands::clear(ClearMode::Page).as_bytes(), b"0,0");
/// ```
#[inline]
pub fn clear(mode: ClearMode) -> Command {
    Command::encode(CommandId::Clear, &[mode as u32])
}

/// # Invert (CMD_INVERT, 1)
///
/// Swap WHITE and BLACK across the whole display.
///
/// ```
/// use microview::protocol::commands;
///
/// assert_eq!(commands::invert(true).as_bytes(), b"1,1");
/// ```
#[inline]
pub fn invert(inverted: bool) -> Command {
    Command::encode(CommandId::Invert, &[inverted as u32])
}

/// # Contrast (CMD_CONTRAST, 2)
///
/// OLED contrast from 0 to 255. The visible difference between levels is
/// small on this panel.
#[inline]
pub fn contrast(level: u8) -> Command {
    Command::encode(CommandId::Contrast, &[level as u32])
}

/// # Display (CMD_DISPLAY, 3)
///
/// Bulk move the screen buffer into the SSD1306 controller's memory so
/// whatever was drawn becomes visible.
#[inline]
pub fn display() -> Command {
    Command::encode(CommandId::Display, &[])
}

/// # Set Cursor (CMD_SETCURSOR, 4)
///
/// Move the text cursor to x,y.
#[inline]
pub fn set_cursor(x: u8, y: u8) -> Command {
    Command::encode(CommandId::SetCursor, &[x as u32, y as u32])
}

// ============================================================================
// PIXELS AND LINES
// ============================================================================

/// # Pixel (CMD_PIXEL, 5)
///
/// Plot x,y with the current color and draw mode.
#[inline]
pub fn pixel(x: u8, y: u8) -> Command {
    Command::encode(CommandId::Pixel, &[x as u32, y as u32])
}

/// # Pixel with Color and Mode (CMD_PIXEL, 5)
///
/// Plot x,y with an explicit color, in NORMAL or XOR mode.
#[inline]
pub fn pixel_with_color_and_mode(x: u8, y: u8, color: Color, mode: DrawMode) -> Command {
    Command::encode(
        CommandId::Pixel,
        &[x as u32, y as u32, color as u32, mode as u32],
    )
}

/// # Line (CMD_LINE, 6)
///
/// Line from x0,y0 to x1,y1 with the current color and draw mode.
#[inline]
pub fn line(x0: u8, y0: u8, x1: u8, y1: u8) -> Command {
    Command::encode(
        CommandId::Line,
        &[x0 as u32, y0 as u32, x1 as u32, y1 as u32],
    )
}

/// # Line with Color and Mode (CMD_LINE, 6)
#[inline]
pub fn line_with_color_and_mode(
    x0: u8,
    y0: u8,
    x1: u8,
    y1: u8,
    color: Color,
    mode: DrawMode,
) -> Command {
    Command::encode(
        CommandId::Line,
        &[
            x0 as u32,
            y0 as u32,
            x1 as u32,
            y1 as u32,
            color as u32,
            mode as u32,
        ],
    )
}

/// # Horizontal Line (CMD_LINEH, 7)
///
/// From x,y to x+width,y.
#[inline]
pub fn line_h(x: u8, y: u8, width: u8) -> Command {
    Command::encode(CommandId::LineH, &[x as u32, y as u32, width as u32])
}

/// # Horizontal Line with Color and Mode (CMD_LINEH, 7)
#[inline]
pub fn line_h_with_color_and_mode(
    x: u8,
    y: u8,
    width: u8,
    color: Color,
    mode: DrawMode,
) -> Command {
    Command::encode(
        CommandId::LineH,
        &[x as u32, y as u32, width as u32, color as u32, mode as u32],
    )
}

/// # Vertical Line (CMD_LINEV, 8)
///
/// From x,y to x,y+height.
#[inline]
pub fn line_v(x: u8, y: u8, height: u8) -> Command {
    Command::encode(CommandId::LineV, &[x as u32, y as u32, height as u32])
}

/// # Vertical Line with Color and Mode (CMD_LINEV, 8)
#[inline]
pub fn line_v_with_color_and_mode(
    x: u8,
    y: u8,
    height: u8,
    color: Color,
    mode: DrawMode,
) -> Command {
    Command::encode(
        CommandId::LineV,
        &[x as u32, y as u32, height as u32, color as u32, mode as u32],
    )
}

// ============================================================================
// RECTANGLES
// ============================================================================

/// # Rectangle (CMD_RECT, 9)
///
/// Outline from x,y to x+width,y+height with the current color and mode.
///
/// ## Example
///
/// ```
/// use microview::protocol::commands;
///
/// assert_eq!(commands::rect(5, 10, 15, 20).as_bytes(), b"9,5,10,15,20");
/// ```
#[inline]
pub fn rect(x: u8, y: u8, width: u8, height: u8) -> Command {
    Command::encode(
        CommandId::Rect,
        &[x as u32, y as u32, width as u32, height as u32],
    )
}

/// # Rectangle with Color and Mode (CMD_RECT, 9)
#[inline]
pub fn rect_with_color_and_mode(
    x: u8,
    y: u8,
    width: u8,
    height: u8,
    color: Color,
    mode: DrawMode,
) -> Command {
    Command::encode(
        CommandId::Rect,
        &[
            x as u32,
            y as u32,
            width as u32,
            height as u32,
            color as u32,
            mode as u32,
        ],
    )
}

/// # Filled Rectangle (CMD_RECTFILL, 10)
#[inline]
pub fn rect_fill(x: u8, y: u8, width: u8, height: u8) -> Command {
    Command::encode(
        CommandId::RectFill,
        &[x as u32, y as u32, width as u32, height as u32],
    )
}

/// # Fill Screen (CMD_RECTFILL, 10)
///
/// A filled rectangle covering the whole 64x48 panel in the current color.
///
/// ```
/// use microview::protocol::commands;
///
/// assert_eq!(commands::fill(), commands::rect_fill(0, 0, 64, 48));
/// ```
#[inline]
pub fn fill() -> Command {
    rect_fill(0, 0, WIDTH, HEIGHT)
}

/// # Filled Rectangle with Color and Mode (CMD_RECTFILL, 10)
#[inline]
pub fn rect_fill_with_color_and_mode(
    x: u8,
    y: u8,
    width: u8,
    height: u8,
    color: Color,
    mode: DrawMode,
) -> Command {
    Command::encode(
        CommandId::RectFill,
        &[
            x as u32,
            y as u32,
            width as u32,
            height as u32,
            color as u32,
            mode as u32,
        ],
    )
}

// ============================================================================
// CIRCLES
// ============================================================================

/// # Circle (CMD_CIRCLE, 11)
///
/// Outline centred on x,y. The firmware has no explicit-color form.
#[inline]
pub fn circle(x: u8, y: u8, radius: u8) -> Command {
    Command::encode(CommandId::Circle, &[x as u32, y as u32, radius as u32])
}

/// # Filled Circle (CMD_CIRCLEFILL, 12)
#[inline]
pub fn circle_fill(x: u8, y: u8, radius: u8) -> Command {
    Command::encode(CommandId::CircleFill, &[x as u32, y as u32, radius as u32])
}

// ============================================================================
// TEXT AND STATE
// ============================================================================

/// # Draw Character (CMD_DRAWCHAR, 13)
///
/// Draw `c` at x,y with the current color and draw mode. The character is
/// sent as its numeric code point.
///
/// ```
/// use microview::protocol::commands;
///
/// assert_eq!(commands::draw_char(0, 0, 'A').as_bytes(), b"13,0,0,65");
/// ```
#[inline]
pub fn draw_char(x: u8, y: u8, c: char) -> Command {
    Command::encode(CommandId::DrawChar, &[x as u32, y as u32, c as u32])
}

/// # Set Color (CMD_SETCOLOR, 17)
///
/// Set the color used by short-form drawing commands.
#[inline]
pub fn set_color(color: Color) -> Command {
    Command::encode(CommandId::SetColor, &[color as u32])
}

/// # Set Draw Mode (CMD_SETDRAWMODE, 18)
#[inline]
pub fn set_draw_mode(mode: DrawMode) -> Command {
    Command::encode(CommandId::SetDrawMode, &[mode as u32])
}

// ============================================================================
// TESTS
// ============================================================================
