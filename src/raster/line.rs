//! Bresenham line drawing
//!
//! Integer error-accumulator stepping over all octants. No clipping is
//! performed here: endpoints outside the closed target bounds assert.

use super::{to_pixel, Color, FrameBuffer};
use nalgebra_glm as glm;

fn assert_endpoint(fb: &FrameBuffer, x: i32, y: i32) {
    assert!(
        x >= 0 && x as usize <= fb.width() && y >= 0 && y as usize <= fb.height(),
        "line endpoint ({}, {}) outside {}x{} target",
        x,
        y,
        fb.width(),
        fb.height()
    );
}

#[inline]
fn put(fb: &mut FrameBuffer, x: i32, y: i32, color: Color) {
    // Closed-boundary vertices are valid but own no pixel
    if (x as usize) < fb.width() && (y as usize) < fb.height() {
        fb.set_pixel(x, y, color);
    }
}

/// Draw a line between two screen-space points.
///
/// Visits every pixel the ideal line passes through exactly once, choosing
/// the stepping direction from the sign of the endpoint deltas, so
/// `draw_line(a, b)` and `draw_line(b, a)` color the same pixel set.
pub fn draw_line(fb: &mut FrameBuffer, p1: glm::Vec2, p2: glm::Vec2, color: Color) {
    let (mut x, mut y) = (to_pixel(p1.x), to_pixel(p1.y));
    let (x2, y2) = (to_pixel(p2.x), to_pixel(p2.y));
    assert_endpoint(fb, x, y);
    assert_endpoint(fb, x2, y2);

    let dx = (x2 - x).abs();
    let dy = -(y2 - y).abs();
    let sx = if x < x2 { 1 } else { -1 };
    let sy = if y < y2 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(fb, x, y, color);

        if x == x2 && y == y2 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Line draw with linear color and depth interpolation along the major axis.
/// Writes are depth-tested.
pub fn draw_line_shaded(
    fb: &mut FrameBuffer,
    p1: glm::Vec2,
    p2: glm::Vec2,
    c1: Color,
    c2: Color,
    z1: f32,
    z2: f32,
) {
    let (mut x, mut y) = (to_pixel(p1.x), to_pixel(p1.y));
    let (x2, y2) = (to_pixel(p2.x), to_pixel(p2.y));
    assert_endpoint(fb, x, y);
    assert_endpoint(fb, x2, y2);

    let dx = (x2 - x).abs();
    let dy = -(y2 - y).abs();
    let sx = if x < x2 { 1 } else { -1 };
    let sy = if y < y2 { 1 } else { -1 };
    let mut err = dx + dy;

    let steps = dx.max(-dy).max(1) as f32;
    let mut step = 0;

    loop {
        let t = step as f32 / steps;
        if (x as usize) < fb.width() && (y as usize) < fb.height() {
            fb.set_pixel_with_depth(x, y, z1 + (z2 - z1) * t, c1.lerp(c2, t));
        }

        if x == x2 && y == y2 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        step += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn drawn_pixels(fb: &FrameBuffer) -> HashSet<(i32, i32)> {
        let mut set = HashSet::new();
        for y in 0..fb.height() as i32 {
            for x in 0..fb.width() as i32 {
                if fb.pixel(x, y) != Color::BLACK {
                    set.insert((x, y));
                }
            }
        }
        set
    }

    #[test]
    fn line_is_direction_independent() {
        let a = glm::vec2(2.0, 3.0);
        let b = glm::vec2(17.0, 11.0);
        let mut fb1 = FrameBuffer::new(20, 20);
        let mut fb2 = FrameBuffer::new(20, 20);
        draw_line(&mut fb1, a, b, Color::WHITE);
        draw_line(&mut fb2, b, a, Color::WHITE);
        assert_eq!(drawn_pixels(&fb1), drawn_pixels(&fb2));
    }

    #[test]
    fn diagonal_visits_major_axis_count() {
        let mut fb = FrameBuffer::new(32, 32);
        draw_line(&mut fb, glm::vec2(0.0, 0.0), glm::vec2(10.0, 4.0), Color::WHITE);
        // one pixel per major-axis step, endpoints included
        assert_eq!(drawn_pixels(&fb).len(), 11);
    }

    #[test]
    fn single_point_line() {
        let mut fb = FrameBuffer::new(8, 8);
        draw_line(&mut fb, glm::vec2(3.0, 3.0), glm::vec2(3.0, 3.0), Color::WHITE);
        assert_eq!(drawn_pixels(&fb), HashSet::from([(3, 3)]));
    }

    #[test]
    fn boundary_endpoint_is_valid() {
        let mut fb = FrameBuffer::new(10, 10);
        // endpoint exactly on the closed corner; must not panic
        draw_line(&mut fb, glm::vec2(0.0, 0.0), glm::vec2(10.0, 10.0), Color::WHITE);
        assert!(drawn_pixels(&fb).contains(&(9, 9)));
    }

    #[test]
    #[should_panic]
    fn outside_endpoint_asserts() {
        let mut fb = FrameBuffer::new(10, 10);
        draw_line(&mut fb, glm::vec2(0.0, 0.0), glm::vec2(11.0, 4.0), Color::WHITE);
    }

    #[test]
    fn shaded_line_interpolates_color_and_depth() {
        let mut fb = FrameBuffer::new(12, 4);
        fb.clear_depth(1.0);
        draw_line_shaded(
            &mut fb,
            glm::vec2(0.0, 1.0),
            glm::vec2(10.0, 1.0),
            Color::BLACK,
            Color::WHITE,
            0.0,
            0.5,
        );
        assert_eq!(fb.pixel(0, 1), Color::BLACK);
        assert_eq!(fb.pixel(10, 1), Color::WHITE);
        assert_eq!(fb.depth_at(0, 1), 0.0);
        assert!((fb.depth_at(10, 1) - 0.5).abs() < 1e-6);
    }
}
