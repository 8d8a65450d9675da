//! # Host-Side Preview
//!
//! Simulates the MicroView's frame buffer so drawings can be checked without
//! hardware. [`PreviewTransport`] plugs into a [`crate::session::Session`]
//! like any other transport: each written command is decoded and applied to
//! a 64x48 [`Frame`], which can then be exported as a grayscale PNG.
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//! use microview::preview::PreviewTransport;
//! use microview::protocol::commands;
//! use microview::{Session, SessionConfig};
//!
//! let config = SessionConfig::default().with_delay(Duration::ZERO);
//! let mut mv = Session::with_config(PreviewTransport::new(), config);
//! mv.run([commands::rect_fill(0, 0, 4, 4)])?;
//!
//! let frame = mv.transport()?.frame();
//! assert!(frame.is_lit(3, 3));
//! assert!(!frame.is_lit(4, 4));
//! # Ok::<(), microview::error::MicroViewError>(())
//! ```
//!
//! ## Fidelity
//!
//! Shapes follow the firmware's rasterization: lines exclude their end point
//! on the major axis, `line_h`/`line_v` cover exactly `width`/`height`
//! pixels, rectangles cover `width x height`. Text uses an approximation of
//! the firmware font (see [`font`]). The firmware shows every command
//! immediately, so [`Op::Display`] changes nothing here.

pub mod font;

use std::collections::BTreeSet;
use std::path::Path;

use image::{GrayImage, Luma};

use crate::error::MicroViewError;
use crate::protocol::decode::{self, Op, Style};
use crate::protocol::{Color, DrawMode, HEIGHT, WIDTH};
use crate::transport::Transport;

const W: usize = WIDTH as usize;
const H: usize = HEIGHT as usize;

/// # Frame Buffer
///
/// Panel contents plus the drawing state the firmware keeps between
/// commands.
#[derive(Debug, Clone)]
pub struct Frame {
    pixels: Vec<bool>,
    color: Color,
    mode: DrawMode,
    inverted: bool,
    contrast: u8,
    cursor: (u8, u8),
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            pixels: vec![false; W * H],
            color: Color::White,
            mode: DrawMode::Normal,
            inverted: false,
            contrast: 0xCF,
            cursor: (0, 0),
        }
    }
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the buffer holds WHITE at x,y (before inversion).
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        x < W && y < H && self.pixels[y * W + x]
    }

    /// Number of WHITE pixels in the buffer.
    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&on| on).count()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn contrast(&self) -> u8 {
        self.contrast
    }

    pub fn cursor(&self) -> (u8, u8) {
        self.cursor
    }

    /// Apply one decoded instruction.
    pub fn apply(&mut self, op: &Op) {
        match *op {
            Op::Clear(_) => self.pixels.fill(false),
            Op::Invert(inverted) => self.inverted = inverted,
            Op::Contrast(level) => self.contrast = level,
            Op::Display => {}
            Op::SetCursor { x, y } => self.cursor = (x, y),
            Op::Pixel { x, y, style } => {
                let (color, mode) = self.resolve(style);
                self.plot(x as i32, y as i32, color, mode);
            }
            Op::Line { x0, y0, x1, y1, style } => {
                let (color, mode) = self.resolve(style);
                let points = line_points(x0 as i32, y0 as i32, x1 as i32, y1 as i32);
                self.plot_all(points, color, mode);
            }
            Op::LineH { x, y, width, style } => {
                let (color, mode) = self.resolve(style);
                let points = (0..width as i32).map(|dx| (x as i32 + dx, y as i32)).collect();
                self.plot_all(points, color, mode);
            }
            Op::LineV { x, y, height, style } => {
                let (color, mode) = self.resolve(style);
                let points = (0..height as i32).map(|dy| (x as i32, y as i32 + dy)).collect();
                self.plot_all(points, color, mode);
            }
            Op::Rect { x, y, width, height, style } => {
                let (color, mode) = self.resolve(style);
                let points = rect_outline(x as i32, y as i32, width as i32, height as i32);
                self.plot_all(points, color, mode);
            }
            Op::RectFill { x, y, width, height, style } => {
                let (color, mode) = self.resolve(style);
                let points = (0..height as i32)
                    .flat_map(|dy| (0..width as i32).map(move |dx| (x as i32 + dx, y as i32 + dy)))
                    .collect();
                self.plot_all(points, color, mode);
            }
            Op::Circle { x, y, radius } => {
                let points = circle_outline(x as i32, y as i32, radius as i32);
                self.plot_all(points, self.color, self.mode);
            }
            Op::CircleFill { x, y, radius } => {
                let points = circle_filled(x as i32, y as i32, radius as i32);
                self.plot_all(points, self.color, self.mode);
            }
            Op::DrawChar { x, y, c } => self.draw_char(x as i32, y as i32, c),
            Op::SetColor(color) => self.color = color,
            Op::SetDrawMode(mode) => self.mode = mode,
        }
    }

    /// Render to an 8-bit grayscale image, each device pixel becoming a
    /// `scale x scale` block. WHITE is 255.
    pub fn to_image(&self, scale: u32) -> GrayImage {
        let scale = scale.max(1);
        let mut img = GrayImage::new(W as u32 * scale, H as u32 * scale);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let lit = self.is_lit((x / scale) as usize, (y / scale) as usize) != self.inverted;
            *px = Luma([if lit { 255 } else { 0 }]);
        }
        img
    }

    fn resolve(&self, style: Option<Style>) -> (Color, DrawMode) {
        match style {
            Some(Style { color, mode }) => (color, mode),
            None => (self.color, self.mode),
        }
    }

    fn plot_all(&mut self, points: BTreeSet<(i32, i32)>, color: Color, mode: DrawMode) {
        for (x, y) in points {
            self.plot(x, y, color, mode);
        }
    }

    fn plot(&mut self, x: i32, y: i32, color: Color, mode: DrawMode) {
        if x < 0 || y < 0 || x as usize >= W || y as usize >= H {
            return;
        }
        let idx = y as usize * W + x as usize;
        match (mode, color) {
            (DrawMode::Xor, Color::White) => self.pixels[idx] = !self.pixels[idx],
            (DrawMode::Xor, Color::Black) => {}
            (DrawMode::Normal, Color::White) => self.pixels[idx] = true,
            (DrawMode::Normal, Color::Black) => self.pixels[idx] = false,
        }
    }

    /// The firmware paints the whole cell: ink in the current color, the
    /// rest in the opposite color.
    fn draw_char(&mut self, x: i32, y: i32, c: char) {
        let background = match self.color {
            Color::White => Color::Black,
            Color::Black => Color::White,
        };
        let glyph = font::glyph(c);
        for (dy, row) in glyph.iter().enumerate() {
            for (dx, &on) in row.iter().enumerate() {
                let color = if on { self.color } else { background };
                self.plot(x + dx as i32, y + dy as i32, color, self.mode);
            }
        }
    }
}

/// Bresenham, end point excluded on the major axis.
fn line_points(x0: i32, y0: i32, x1: i32, y1: i32) -> BTreeSet<(i32, i32)> {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let (mut x0, mut y0, mut x1, mut y1) = if steep {
        (y0, x0, y1, x1)
    } else {
        (x0, y0, x1, y1)
    };
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let dy = (y1 - y0).abs();
    let ystep = if y0 < y1 { 1 } else { -1 };
    let mut err = dx / 2;
    let mut y = y0;

    let mut points = BTreeSet::new();
    for x in x0..x1 {
        points.insert(if steep { (y, x) } else { (x, y) });
        err -= dy;
        if err < 0 {
            y += ystep;
            err += dx;
        }
    }
    points
}

fn rect_outline(x: i32, y: i32, w: i32, h: i32) -> BTreeSet<(i32, i32)> {
    let mut points = BTreeSet::new();
    if w <= 0 || h <= 0 {
        return points;
    }
    for dx in 0..w {
        points.insert((x + dx, y));
        points.insert((x + dx, y + h - 1));
    }
    for dy in 0..h {
        points.insert((x, y + dy));
        points.insert((x + w - 1, y + dy));
    }
    points
}

/// Midpoint circle, each point once so XOR stays consistent.
fn circle_outline(cx: i32, cy: i32, r: i32) -> BTreeSet<(i32, i32)> {
    let mut points = BTreeSet::new();
    let mut x = r;
    let mut y = 0;
    let mut err = 1 - r;
    while x >= y {
        for (px, py) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            points.insert((cx + px, cy + py));
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
    points
}

fn circle_filled(cx: i32, cy: i32, r: i32) -> BTreeSet<(i32, i32)> {
    let mut points = circle_outline(cx, cy, r);
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                points.insert((cx + dx, cy + dy));
            }
        }
    }
    points
}

// ============================================================================
// PREVIEW TRANSPORT
// ============================================================================

/// # Preview Transport
///
/// A [`Transport`] that renders instead of transmitting. Writes must be
/// valid commands; anything the decoder rejects is returned as
/// [`MicroViewError::InvalidCommand`].
#[derive(Debug, Default)]
pub struct PreviewTransport {
    frame: Frame,
    commands: usize,
    closed: bool,
}

impl PreviewTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Number of commands applied so far.
    pub fn command_count(&self) -> usize {
        self.commands
    }

    /// Save the frame as PNG, scaled up by `scale`.
    pub fn save_png<P: AsRef<Path>>(&self, path: P, scale: u32) -> Result<(), MicroViewError> {
        let path = path.as_ref();
        self.frame
            .to_image(scale)
            .save(path)
            .map_err(|e| MicroViewError::Image(format!("Failed to save {}: {}", path.display(), e)))
    }

    fn ensure_open(&self) -> Result<(), MicroViewError> {
        if self.closed {
            return Err(MicroViewError::InvalidState(
                "preview transport is closed".to_string(),
            ));
        }
        Ok(())
    }
}

impl Transport for PreviewTransport {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, MicroViewError> {
        self.ensure_open()?;
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), MicroViewError> {
        self.ensure_open()?;
        let op = decode::decode_bytes(data)?;
        self.frame.apply(&op);
        self.commands += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), MicroViewError> {
        self.ensure_open()?;
        self.closed = true;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ClearMode, commands};

    fn frame_after(cmds: &[crate::protocol::Command]) -> Frame {
        let mut t = PreviewTransport::new();
        for cmd in cmds {
            t.write(cmd.as_bytes()).unwrap();
        }
        t.frame().clone()
    }

    #[test]
    fn test_fill_lights_every_pixel() {
        let frame = frame_after(&[commands::fill()]);
        assert_eq!(frame.lit_count(), 64 * 48);
    }

    #[test]
    fn test_clear_wipes_buffer() {
        let frame = frame_after(&[commands::fill(), commands::clear(ClearMode::Page)]);
        assert_eq!(frame.lit_count(), 0);
    }

    #[test]
    fn test_rect_outline_size() {
        let frame = frame_after(&[commands::rect(1, 1, 4, 3)]);
        // 4x3 outline: 2*4 + 2*(3-2) = 10 pixels
        assert_eq!(frame.lit_count(), 10);
        assert!(frame.is_lit(1, 1));
        assert!(frame.is_lit(4, 3));
        assert!(!frame.is_lit(2, 2));
    }

    #[test]
    fn test_line_h_and_v_lengths() {
        let frame = frame_after(&[commands::line_h(0, 0, 5)]);
        assert_eq!(frame.lit_count(), 5);
        let frame = frame_after(&[commands::line_v(0, 0, 7)]);
        assert_eq!(frame.lit_count(), 7);
    }

    #[test]
    fn test_diagonal_line_excludes_end() {
        let frame = frame_after(&[commands::line(0, 0, 4, 4)]);
        assert_eq!(frame.lit_count(), 4);
        assert!(frame.is_lit(3, 3));
        assert!(!frame.is_lit(4, 4));
    }

    #[test]
    fn test_xor_toggles() {
        let frame = frame_after(&[
            commands::fill(),
            commands::rect_fill_with_color_and_mode(0, 0, 2, 2, Color::White, DrawMode::Xor),
        ]);
        assert_eq!(frame.lit_count(), 64 * 48 - 4);
        assert!(!frame.is_lit(0, 0));
    }

    #[test]
    fn test_black_pixel_clears() {
        let frame = frame_after(&[
            commands::fill(),
            commands::pixel_with_color_and_mode(5, 5, Color::Black, DrawMode::Normal),
        ]);
        assert!(!frame.is_lit(5, 5));
    }

    #[test]
    fn test_set_color_affects_short_form() {
        let frame = frame_after(&[
            commands::fill(),
            commands::set_color(Color::Black),
            commands::pixel(2, 2),
        ]);
        assert!(!frame.is_lit(2, 2));
        assert_eq!(frame.color(), Color::Black);
    }

    #[test]
    fn test_circle_is_symmetric() {
        let frame = frame_after(&[commands::circle(20, 20, 5)]);
        assert!(frame.is_lit(25, 20));
        assert!(frame.is_lit(15, 20));
        assert!(frame.is_lit(20, 25));
        assert!(frame.is_lit(20, 15));
        assert!(!frame.is_lit(20, 20));
    }

    #[test]
    fn test_circle_fill_covers_center() {
        let frame = frame_after(&[commands::circle_fill(20, 20, 3)]);
        assert!(frame.is_lit(20, 20));
        assert!(frame.is_lit(23, 20));
        assert!(!frame.is_lit(23, 23));
    }

    #[test]
    fn test_offscreen_is_clipped() {
        let frame = frame_after(&[commands::rect_fill(60, 44, 20, 20)]);
        assert_eq!(frame.lit_count(), 4 * 4);
    }

    #[test]
    fn test_draw_char_inks_cell_only() {
        let frame = frame_after(&[commands::draw_char(0, 0, 'A')]);
        assert!(frame.lit_count() > 0);
        for y in 0..48 {
            for x in 0..64 {
                if x >= 6 || y >= 8 {
                    assert!(!frame.is_lit(x, y), "{},{} outside glyph cell", x, y);
                }
            }
        }
    }

    #[test]
    fn test_state_commands_recorded() {
        let frame = frame_after(&[
            commands::invert(true),
            commands::contrast(12),
            commands::set_cursor(3, 4),
            commands::set_draw_mode(DrawMode::Xor),
            commands::display(),
        ]);
        assert!(frame.is_inverted());
        assert_eq!(frame.contrast(), 12);
        assert_eq!(frame.cursor(), (3, 4));
        assert_eq!(frame.mode(), DrawMode::Xor);
        assert_eq!(frame.lit_count(), 0);
    }

    #[test]
    fn test_to_image_scales_and_inverts() {
        let frame = frame_after(&[commands::pixel(0, 0), commands::invert(true)]);
        let img = frame.to_image(2);
        assert_eq!(img.dimensions(), (128, 96));
        assert_eq!(img.get_pixel(1, 1), &Luma([0]));
        assert_eq!(img.get_pixel(2, 0), &Luma([255]));
    }

    #[test]
    fn test_rejects_invalid_command() {
        let mut t = PreviewTransport::new();
        assert!(matches!(t.write(b"14,0,0"), Err(MicroViewError::InvalidCommand(_))));
        assert_eq!(t.command_count(), 0);
    }

    #[test]
    fn test_close_twice() {
        let mut t = PreviewTransport::new();
        t.close().unwrap();
        assert!(matches!(t.close(), Err(MicroViewError::InvalidState(_))));
    }
}
