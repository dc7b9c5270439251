//! 16-segment text overlay
//!
//! Stats and labels drawn straight into the frame buffer with line strokes,
//! no font rasterization. The glyph table is process-wide immutable data
//! consumed by pure functions.
//!
//! Segment layout on a unit cell (y down):
//! ```text
//!  -0- -1-
//! |\  |  /|
//! 2 3 4 5 6
//! |  \|/  |
//!  -7- -8-
//! |  /|\  |
//! 9 A B C D
//! |/  |  \|
//!  -E- -F-
//! ```

use super::line::draw_line;
use super::{Color, FrameBuffer};
use nalgebra_glm as glm;

/// Segment endpoints on the unit cell, indexed as in the diagram above
const SEGMENT_ENDPOINTS: [((f32, f32), (f32, f32)); 16] = [
    ((0.0, 0.0), (0.5, 0.0)), // 0: top left
    ((0.5, 0.0), (1.0, 0.0)), // 1: top right
    ((0.0, 0.0), (0.0, 0.5)), // 2: upper left
    ((0.0, 0.0), (0.5, 0.5)), // 3: upper left diagonal
    ((0.5, 0.0), (0.5, 0.5)), // 4: upper middle
    ((1.0, 0.0), (0.5, 0.5)), // 5: upper right diagonal
    ((1.0, 0.0), (1.0, 0.5)), // 6: upper right
    ((0.0, 0.5), (0.5, 0.5)), // 7: middle left
    ((0.5, 0.5), (1.0, 0.5)), // 8: middle right
    ((0.0, 0.5), (0.0, 1.0)), // 9: lower left
    ((0.5, 0.5), (0.0, 1.0)), // 10: lower left diagonal
    ((0.5, 0.5), (0.5, 1.0)), // 11: lower middle
    ((0.5, 0.5), (1.0, 1.0)), // 12: lower right diagonal
    ((1.0, 0.5), (1.0, 1.0)), // 13: lower right
    ((0.0, 1.0), (0.5, 1.0)), // 14: bottom left
    ((0.5, 1.0), (1.0, 1.0)), // 15: bottom right
];

const fn segs(bits: &[u8]) -> u16 {
    let mut mask = 0u16;
    let mut i = 0;
    while i < bits.len() {
        mask |= 1 << bits[i];
        i += 1;
    }
    mask
}

/// Glyphs 0-9, A-Z, dash
const GLYPHS: [u16; 37] = [
    segs(&[0, 1, 2, 6, 9, 13, 14, 15]),       // 0
    segs(&[6, 13]),                            // 1
    segs(&[0, 1, 6, 7, 8, 9, 14, 15]),         // 2
    segs(&[0, 1, 6, 8, 13, 14, 15]),           // 3
    segs(&[2, 6, 7, 8, 13]),                   // 4
    segs(&[0, 1, 2, 7, 8, 13, 14, 15]),        // 5
    segs(&[0, 1, 2, 7, 8, 9, 13, 14, 15]),     // 6
    segs(&[0, 1, 6, 13]),                      // 7
    segs(&[0, 1, 2, 6, 7, 8, 9, 13, 14, 15]),  // 8
    segs(&[0, 1, 2, 6, 7, 8, 13, 14, 15]),     // 9
    segs(&[0, 1, 2, 6, 7, 8, 9, 13]),          // A
    segs(&[0, 1, 4, 6, 8, 11, 13, 14, 15]),    // B
    segs(&[0, 1, 2, 9, 14, 15]),               // C
    segs(&[0, 1, 4, 6, 11, 13, 14, 15]),       // D
    segs(&[0, 1, 2, 7, 9, 14, 15]),            // E
    segs(&[0, 1, 2, 7, 9]),                    // F
    segs(&[0, 1, 2, 8, 9, 13, 14, 15]),        // G
    segs(&[2, 6, 7, 8, 9, 13]),                // H
    segs(&[0, 1, 4, 11, 14, 15]),              // I
    segs(&[6, 9, 13, 14, 15]),                 // J
    segs(&[2, 5, 7, 9, 12]),                   // K
    segs(&[2, 9, 14, 15]),                     // L
    segs(&[2, 3, 5, 6, 9, 13]),                // M
    segs(&[2, 3, 6, 9, 12, 13]),               // N
    segs(&[0, 1, 2, 6, 9, 13, 14, 15]),        // O
    segs(&[0, 1, 2, 6, 7, 8, 9]),              // P
    segs(&[0, 1, 2, 6, 9, 12, 13, 14, 15]),    // Q
    segs(&[0, 1, 2, 6, 7, 8, 9, 12]),          // R
    segs(&[0, 1, 2, 7, 8, 13, 14, 15]),        // S
    segs(&[0, 1, 4, 11]),                      // T
    segs(&[2, 6, 9, 13, 14, 15]),              // U
    segs(&[2, 5, 9, 10]),                      // V
    segs(&[2, 6, 9, 10, 12, 13]),              // W
    segs(&[3, 5, 10, 12]),                     // X
    segs(&[3, 5, 11]),                         // Y
    segs(&[0, 1, 5, 10, 14, 15]),              // Z
    segs(&[7, 8]),                             // dash
];

const GLYPH_DASH: usize = 36;

/// Glyph table index for a drawable character, if it has one
pub fn glyph_index(c: char) -> Option<usize> {
    match c {
        '0'..='9' => Some(c as usize - '0' as usize),
        'a'..='z' => Some(10 + c as usize - 'a' as usize),
        'A'..='Z' => Some(10 + c as usize - 'A' as usize),
        '-' => Some(GLYPH_DASH),
        _ => None,
    }
}

/// Stroke one glyph with its top-left corner at `(x, y)`.
///
/// `size` is the cell width in pixels; the cell is `size * ratio` tall.
/// The whole cell must fit inside the target (line endpoints assert).
pub fn draw_digit(
    fb: &mut FrameBuffer,
    x: f32,
    y: f32,
    glyph: usize,
    size: f32,
    color: Color,
    ratio: f32,
) {
    assert!(glyph < GLYPHS.len());
    let mask = GLYPHS[glyph];
    for (i, ((ux1, vy1), (ux2, vy2))) in SEGMENT_ENDPOINTS.iter().enumerate() {
        if mask & (1 << i) != 0 {
            draw_line(
                fb,
                glm::vec2(x + ux1 * size, y + vy1 * size * ratio),
                glm::vec2(x + ux2 * size, y + vy2 * size * ratio),
                color,
            );
        }
    }
}

/// Draw a decimal integer, sign included, advancing left to right
pub fn draw_integer(fb: &mut FrameBuffer, x: f32, y: f32, value: i64, size: f32, color: Color) {
    const GAP: f32 = 0.5;
    const RATIO: f32 = 1.5;

    let mut digits = Vec::new();
    let mut rest = value.unsigned_abs();
    if rest == 0 {
        digits.push(0);
    }
    while rest > 0 {
        digits.push((rest % 10) as usize);
        rest /= 10;
    }

    let mut offset = x;
    if value < 0 {
        draw_digit(fb, offset, y, GLYPH_DASH, size, color, RATIO);
        offset += size * (1.0 + GAP);
    }
    for &d in digits.iter().rev() {
        draw_digit(fb, offset, y, d, size, color, RATIO);
        offset += size * (1.0 + GAP);
    }
}

/// Draw a text label; characters without a glyph advance silently
pub fn draw_text(fb: &mut FrameBuffer, x: f32, y: f32, text: &str, size: f32, color: Color) {
    const GAP: f32 = 0.5;
    const RATIO: f32 = 1.5;

    let mut offset = x;
    for c in text.chars() {
        if let Some(glyph) = glyph_index(c) {
            draw_digit(fb, offset, y, glyph, size, color, RATIO);
        }
        offset += size * (1.0 + GAP);
    }
}
