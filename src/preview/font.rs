//! Glyph generation for preview rendering.
//!
//! The firmware's own font is a 5x7 face in a 6x8 cell. The preview
//! approximates it with Spleen 6x12 squeezed to 6x8.

use spleen_font::{FONT_6X12, PSF2Font};

/// Cell width, matching the firmware's 6 px advance.
pub const GLYPH_WIDTH: usize = 6;

/// Cell height.
pub const GLYPH_HEIGHT: usize = 8;

const SOURCE_WIDTH: usize = 6;
const SOURCE_HEIGHT: usize = 12;

/// Row-major 6x8 bitmap, `true` where the glyph is inked.
pub type Glyph = [[bool; GLYPH_WIDTH]; GLYPH_HEIGHT];

/// Render `c` into a 6x8 cell. Characters missing from the font become a
/// box outline.
pub fn glyph(c: char) -> Glyph {
    if c == ' ' {
        return [[false; GLYPH_WIDTH]; GLYPH_HEIGHT];
    }

    let mut source = [[false; SOURCE_WIDTH]; SOURCE_HEIGHT];
    let found = match PSF2Font::new(FONT_6X12) {
        Ok(mut spleen) => {
            let utf8 = c.to_string();
            match spleen.glyph_for_utf8(utf8.as_bytes()) {
                Some(rows) => {
                    for (row_y, row) in rows.enumerate().take(SOURCE_HEIGHT) {
                        for (col_x, on) in row.enumerate().take(SOURCE_WIDTH) {
                            source[row_y][col_x] = on;
                        }
                    }
                    true
                }
                None => false,
            }
        }
        Err(_) => false,
    };

    if !found {
        return boxed();
    }

    scale(&source)
}

/// Nearest-neighbor squeeze from 6x12 to 6x8.
fn scale(source: &[[bool; SOURCE_WIDTH]; SOURCE_HEIGHT]) -> Glyph {
    let mut out = [[false; GLYPH_WIDTH]; GLYPH_HEIGHT];
    for (dy, row) in out.iter_mut().enumerate() {
        let sy = dy * SOURCE_HEIGHT / GLYPH_HEIGHT;
        for (dx, cell) in row.iter_mut().enumerate() {
            let sx = dx * SOURCE_WIDTH / GLYPH_WIDTH;
            *cell = source[sy][sx];
        }
    }
    out
}

fn boxed() -> Glyph {
    let mut g = [[false; GLYPH_WIDTH]; GLYPH_HEIGHT];
    for (y, row) in g.iter_mut().enumerate().take(GLYPH_HEIGHT - 1) {
        for (x, cell) in row.iter_mut().enumerate().take(GLYPH_WIDTH - 1) {
            *cell = y == 0 || y == GLYPH_HEIGHT - 2 || x == 0 || x == GLYPH_WIDTH - 2;
        }
    }
    g
}
