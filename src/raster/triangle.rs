//! Triangle fill strategies
//!
//! Four interchangeable algorithms share one contract: color exactly the
//! pixels whose rounded centers lie inside or on the triangle (closed fill,
//! see the module docs in `raster`). They differ in numeric approach and in
//! the one-pixel boundary halo that falls out of it:
//!
//! - `Standard`: flat-top/flat-bottom split, float `x += dx` edge stepping
//! - `Barycentric`: bounding-box walk with cross-product weights, the
//!   slowest but simplest to reason about; the reference the others are
//!   tested against
//! - `Bresenham`: two integer edge walkers share one loop, span bounds read
//!   straight off the stepping state, no float division
//! - `EdgeTable`: all three edges rasterized into a span table, then one
//!   fill pass; gives fill + wireframe overlay from a single edge walk

use super::line::draw_line;
use super::table::SpanTable;
use super::{to_pixel, Color, FrameBuffer};
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

/// Selects the fill algorithm for solid triangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillStrategy {
    Standard,
    Barycentric,
    Bresenham,
    #[default]
    EdgeTable,
}

impl FillStrategy {
    pub const ALL: [FillStrategy; 4] = [
        FillStrategy::Standard,
        FillStrategy::Barycentric,
        FillStrategy::Bresenham,
        FillStrategy::EdgeTable,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FillStrategy::Standard => "standard",
            FillStrategy::Barycentric => "barycentric",
            FillStrategy::Bresenham => "bresenham",
            FillStrategy::EdgeTable => "edge-table",
        }
    }
}

/// Fill a solid triangle with the chosen strategy.
///
/// Vertices must lie inside the closed target bounds (asserted); degenerate
/// triangles produce at most the degenerate line's pixels.
pub fn fill_triangle(
    fb: &mut FrameBuffer,
    strategy: FillStrategy,
    v1: glm::Vec2,
    v2: glm::Vec2,
    v3: glm::Vec2,
    color: Color,
) {
    match strategy {
        FillStrategy::Standard => standard_fill(fb, v1, v2, v3, color),
        FillStrategy::Barycentric => barycentric_fill(fb, v1, v2, v3, color),
        FillStrategy::Bresenham => bresenham_fill(fb, v1, v2, v3, color),
        FillStrategy::EdgeTable => edge_table_fill(fb, v1, v2, v3, color, color),
    }
}

/// Filled triangle with a distinct outline, from one shared edge walk
pub fn draw_triangle_outlined(
    fb: &mut FrameBuffer,
    v1: glm::Vec2,
    v2: glm::Vec2,
    v3: glm::Vec2,
    fill: Color,
    outline: Color,
) {
    edge_table_fill(fb, v1, v2, v3, fill, outline);
}

fn to_grid(fb: &FrameBuffer, v: glm::Vec2) -> (i32, i32) {
    let (x, y) = (to_pixel(v.x), to_pixel(v.y));
    assert!(
        x >= 0 && x as usize <= fb.width() && y >= 0 && y as usize <= fb.height(),
        "vertex ({}, {}) outside {}x{} target",
        v.x,
        v.y,
        fb.width(),
        fb.height()
    );
    (x, y)
}

fn sort_by_y(p: &mut [(i32, i32); 3]) {
    if p[0].1 > p[1].1 {
        p.swap(0, 1);
    }
    if p[1].1 > p[2].1 {
        p.swap(1, 2);
        if p[0].1 > p[1].1 {
            p.swap(0, 1);
        }
    }
}

// -- Standard: flat-top/flat-bottom split with float edge stepping --------

fn standard_fill(fb: &mut FrameBuffer, v1: glm::Vec2, v2: glm::Vec2, v3: glm::Vec2, color: Color) {
    let mut p = [to_grid(fb, v1), to_grid(fb, v2), to_grid(fb, v3)];
    sort_by_y(&mut p);
    let [(x1, y1), (x2, y2), (x3, y3)] = p;

    if y1 == y3 {
        // fully horizontal
        fb.fill_scanline(y1, x1.min(x2).min(x3), x1.max(x2).max(x3), color);
    } else if y1 == y2 {
        flat_fill(fb, y1, y3, x1 as f32, x2 as f32, x3, color);
    } else if y2 == y3 {
        flat_fill(fb, y2, y1, x2 as f32, x3 as f32, x1, color);
    } else {
        // split at the long edge's crossing of y2
        let x4 = x1 as f32 + (x3 - x1) as f32 * (y2 - y1) as f32 / (y3 - y1) as f32;
        flat_fill(fb, y2, y3, x2 as f32, x4, x3, color);
        flat_fill(fb, y2, y1, x2 as f32, x4, x1, color);
    }
}

/// Fill a flat triangle: horizontal edge `xa..xb` on row `y_flat`, apex at
/// `(x_apex, y_apex)`.
fn flat_fill(
    fb: &mut FrameBuffer,
    y_flat: i32,
    y_apex: i32,
    mut xa: f32,
    mut xb: f32,
    x_apex: i32,
    color: Color,
) {
    if xa > xb {
        std::mem::swap(&mut xa, &mut xb);
    }
    let rows = (y_apex - y_flat).abs();
    if rows == 0 {
        fb.fill_scanline(y_flat, to_pixel(xa).min(x_apex), to_pixel(xb).max(x_apex), color);
        return;
    }
    let dy = if y_apex > y_flat { 1 } else { -1 };
    let dxa = (x_apex as f32 - xa) / rows as f32;
    let dxb = (x_apex as f32 - xb) / rows as f32;
    let mut y = y_flat;
    loop {
        fb.fill_scanline(y, to_pixel(xa), to_pixel(xb), color);
        if y == y_apex {
            break;
        }
        xa += dxa;
        xb += dxb;
        y += dy;
    }
}

// -- Barycentric: bounding-box reference implementation -------------------

fn barycentric_fill(
    fb: &mut FrameBuffer,
    v1: glm::Vec2,
    v2: glm::Vec2,
    v3: glm::Vec2,
    color: Color,
) {
    let p1 = to_grid(fb, v1);
    let p2 = to_grid(fb, v2);
    let p3 = to_grid(fb, v3);

    let vs1 = ((p2.0 - p1.0) as f32, (p2.1 - p1.1) as f32);
    let vs2 = ((p3.0 - p1.0) as f32, (p3.1 - p1.1) as f32);
    let denom = vs1.0 * vs2.1 - vs1.1 * vs2.0;
    if denom == 0.0 {
        // collinear: at most the degenerate line between the extreme points
        draw_line(fb, v1, v2, color);
        draw_line(fb, v2, v3, color);
        draw_line(fb, v1, v3, color);
        return;
    }

    let x_min = p1.0.min(p2.0).min(p3.0);
    let x_max = p1.0.max(p2.0).max(p3.0);
    let y_min = p1.1.min(p2.1).min(p3.1);
    let y_max = p1.1.max(p2.1).max(p3.1);

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let q = ((x - p1.0) as f32, (y - p1.1) as f32);
            let s = (q.0 * vs2.1 - q.1 * vs2.0) / denom;
            let t = (vs1.0 * q.1 - vs1.1 * q.0) / denom;
            if s >= 0.0 && t >= 0.0 && s + t <= 1.0 {
                if (x as usize) < fb.width() && (y as usize) < fb.height() {
                    fb.set_pixel(x, y, color);
                }
            }
        }
    }
}

// -- Bresenham: dual integer edge walk ------------------------------------

fn bresenham_fill(
    fb: &mut FrameBuffer,
    v1: glm::Vec2,
    v2: glm::Vec2,
    v3: glm::Vec2,
    color: Color,
) {
    let mut p = [to_grid(fb, v1), to_grid(fb, v2), to_grid(fb, v3)];
    sort_by_y(&mut p);
    let [(x1, y1), (x2, y2), (x3, y3)] = p;

    if y1 == y3 {
        fb.fill_scanline(y1, x1.min(x2).min(x3), x1.max(x2).max(x3), color);
    } else if y1 == y2 {
        bresenham_flat_fill(fb, y1, y3, x1, x2, x3, color);
    } else if y2 == y3 {
        bresenham_flat_fill(fb, y2, y1, x2, x3, x1, color);
    } else {
        let x4 = to_pixel(x1 as f32 + (x3 - x1) as f32 * (y2 - y1) as f32 / (y3 - y1) as f32);
        bresenham_flat_fill(fb, y2, y3, x2, x4, x3, color);
        bresenham_flat_fill(fb, y2, y1, x2, x4, x1, color);
    }
}

/// Two Bresenham walkers advance in lock-step from the flat edge to the
/// apex; the span is read off their positions on entry into each row.
fn bresenham_flat_fill(
    fb: &mut FrameBuffer,
    y_flat: i32,
    y_apex: i32,
    xa: i32,
    xb: i32,
    x_apex: i32,
    color: Color,
) {
    let (mut x1, mut x2) = if xa <= xb { (xa, xb) } else { (xb, xa) };
    let mut y = y_flat;

    let dx1 = (x_apex - x1).abs();
    let dx2 = (x_apex - x2).abs();
    let dy = -(y_apex - y_flat).abs();
    let sx1 = if x1 < x_apex { 1 } else { -1 };
    let sx2 = if x2 < x_apex { 1 } else { -1 };
    let sy = if y_flat < y_apex { 1 } else { -1 };
    let mut err1 = dx1 + dy;
    let mut err2 = dx2 + dy;
    let mut draw = true;

    loop {
        if draw {
            fb.fill_scanline(y, x1, x2, color);
            draw = false;
        }

        if x1 == x_apex && x2 == x_apex && y == y_apex {
            break;
        }

        let e21 = 2 * err1;
        let e22 = 2 * err2;
        if e21 >= dy {
            err1 += dy;
            if x1 != x_apex {
                x1 += sx1;
            }
        }
        if e22 >= dy {
            err2 += dy;
            if x2 != x_apex {
                x2 += sx2;
            }
        }
        if e21 <= dx1 && e22 <= dx2 {
            err1 += dx1;
            err2 += dx2;
            y += sy;
            draw = true;
        }
    }
}

// -- Edge table: decoupled edge walk and span fill ------------------------

fn edge_table_fill(
    fb: &mut FrameBuffer,
    v1: glm::Vec2,
    v2: glm::Vec2,
    v3: glm::Vec2,
    fill: Color,
    outline: Color,
) {
    let mut p = [to_grid(fb, v1), to_grid(fb, v2), to_grid(fb, v3)];
    sort_by_y(&mut p);
    let [(x1, y1), (x2, y2), (x3, y3)] = p;

    let mut table = SpanTable::new(y1, y3);
    table.rasterize_edge((x1, y1), (x2, y2));
    table.rasterize_edge((x1, y1), (x3, y3));
    table.rasterize_edge((x2, y2), (x3, y3));

    for row in 0..table.rows() {
        if let Some((l, r)) = table.span(row) {
            fb.fill_scanline(y1 + row as i32, l, r, fill);
        }
    }

    // outline last so it stays visible over the spans
    draw_line(fb, v1, v2, outline);
    draw_line(fb, v1, v3, outline);
    draw_line(fb, v2, v3, outline);
}

// -- Gouraud fill (standard strategy carrying per-vertex colors) ----------

/// Fill with per-vertex colors, interpolated along both edges and then
/// across each span.
pub fn fill_triangle_shaded(
    fb: &mut FrameBuffer,
    v1: glm::Vec2,
    v2: glm::Vec2,
    v3: glm::Vec2,
    c1: Color,
    c2: Color,
    c3: Color,
) {
    let mut p = [
        (to_grid(fb, v1), c1),
        (to_grid(fb, v2), c2),
        (to_grid(fb, v3), c3),
    ];
    if p[0].0 .1 > p[1].0 .1 {
        p.swap(0, 1);
    }
    if p[1].0 .1 > p[2].0 .1 {
        p.swap(1, 2);
        if p[0].0 .1 > p[1].0 .1 {
            p.swap(0, 1);
        }
    }
    let [((x1, y1), c1), ((x2, y2), c2), ((x3, y3), c3)] = p;

    if y1 == y3 {
        fb.fill_scanline_shaded(y1, x1.min(x2).min(x3), x1.max(x2).max(x3), c1, c3);
    } else if y1 == y2 {
        flat_fill_shaded(fb, y1, y3, x1 as f32, x2 as f32, c1, c2, x3, c3);
    } else if y2 == y3 {
        flat_fill_shaded(fb, y2, y1, x2 as f32, x3 as f32, c2, c3, x1, c1);
    } else {
        let t = (y2 - y1) as f32 / (y3 - y1) as f32;
        let x4 = x1 as f32 + (x3 - x1) as f32 * t;
        let c4 = c1.lerp(c3, t);
        flat_fill_shaded(fb, y2, y3, x2 as f32, x4, c2, c4, x3, c3);
        flat_fill_shaded(fb, y2, y1, x2 as f32, x4, c2, c4, x1, c1);
    }
}

#[allow(clippy::too_many_arguments)]
fn flat_fill_shaded(
    fb: &mut FrameBuffer,
    y_flat: i32,
    y_apex: i32,
    mut xa: f32,
    mut xb: f32,
    mut ca: Color,
    mut cb: Color,
    x_apex: i32,
    c_apex: Color,
) {
    if xa > xb {
        std::mem::swap(&mut xa, &mut xb);
        std::mem::swap(&mut ca, &mut cb);
    }
    let rows = (y_apex - y_flat).abs();
    if rows == 0 {
        fb.fill_scanline_shaded(y_flat, to_pixel(xa), to_pixel(xb), ca, cb);
        return;
    }
    let dy = if y_apex > y_flat { 1 } else { -1 };
    let dxa = (x_apex as f32 - xa) / rows as f32;
    let dxb = (x_apex as f32 - xb) / rows as f32;
    let mut y = y_flat;
    let mut row = 0;
    loop {
        let t = row as f32 / rows as f32;
        fb.fill_scanline_shaded(y, to_pixel(xa), to_pixel(xb), ca.lerp(c_apex, t), cb.lerp(c_apex, t));
        if y == y_apex {
            break;
        }
        xa += dxa;
        xb += dxb;
        y += dy;
        row += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn filled(fb: &FrameBuffer) -> HashSet<(i32, i32)> {
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

    fn tri(
        strategy: FillStrategy,
        size: usize,
        a: (f32, f32),
        b: (f32, f32),
        c: (f32, f32),
    ) -> HashSet<(i32, i32)> {
        let mut fb = FrameBuffer::new(size, size);
        fill_triangle(
            &mut fb,
            strategy,
            glm::vec2(a.0, a.1),
            glm::vec2(b.0, b.1),
            glm::vec2(c.0, c.1),
            Color::WHITE,
        );
        filled(&fb)
    }

    /// Shared-edge quad fixture: the closed convention pins 11x11 pixels.
    #[test]
    fn quad_split_fills_exactly_121_pixels() {
        for strategy in FillStrategy::ALL {
            let mut fb = FrameBuffer::new(16, 16);
            fill_triangle(
                &mut fb,
                strategy,
                glm::vec2(0.0, 0.0),
                glm::vec2(10.0, 0.0),
                glm::vec2(0.0, 10.0),
                Color::WHITE,
            );
            fill_triangle(
                &mut fb,
                strategy,
                glm::vec2(10.0, 0.0),
                glm::vec2(10.0, 10.0),
                glm::vec2(0.0, 10.0),
                Color::WHITE,
            );
            let set = filled(&fb);
            let mut expected = HashSet::new();
            for y in 0..=10 {
                for x in 0..=10 {
                    expected.insert((x, y));
                }
            }
            assert_eq!(set, expected, "strategy {:?}", strategy);
        }
    }

    #[test]
    fn strategies_agree_within_a_boundary_halo() {
        let (a, b, c) = ((7.0, 3.0), (29.0, 11.0), (13.0, 27.0));
        let reference = tri(FillStrategy::Barycentric, 40, a, b, c);
        // halo bound: one pixel per boundary step
        let edge = |p: (f32, f32), q: (f32, f32)| {
            ((p.0 - q.0).abs().max((p.1 - q.1).abs()) as usize) + 1
        };
        let perimeter = 2 * (edge(a, b) + edge(b, c) + edge(a, c));
        for strategy in [FillStrategy::Standard, FillStrategy::Bresenham, FillStrategy::EdgeTable] {
            let set = tri(strategy, 40, a, b, c);
            let diff = set.symmetric_difference(&reference).count();
            assert!(
                diff <= perimeter,
                "strategy {:?} differs by {} pixels (allowed {})",
                strategy,
                diff,
                perimeter
            );
        }
    }

    #[test]
    fn duplicate_vertex_degenerates_to_line() {
        let mut line_px = HashSet::new();
        for i in 0..=15 {
            line_px.insert((5 + i, 5 + i));
        }
        for strategy in FillStrategy::ALL {
            let set = tri(strategy, 32, (5.0, 5.0), (5.0, 5.0), (20.0, 20.0));
            assert!(
                set.is_subset(&line_px),
                "strategy {:?} drew outside the degenerate line",
                strategy
            );
        }
    }

    #[test]
    fn collinear_vertices_never_panic() {
        for strategy in FillStrategy::ALL {
            let set = tri(strategy, 32, (0.0, 0.0), (5.0, 5.0), (10.0, 10.0));
            for (x, y) in set {
                assert_eq!(x, y, "strategy {:?} left the diagonal", strategy);
            }
        }
    }

    #[test]
    fn zero_area_horizontal_is_a_span() {
        for strategy in FillStrategy::ALL {
            let set = tri(strategy, 32, (2.0, 4.0), (9.0, 4.0), (6.0, 4.0));
            assert!(!set.is_empty());
            for (_, y) in &set {
                assert_eq!(*y, 4);
            }
        }
    }

    #[test]
    fn vertices_on_closed_boundary_are_valid() {
        // touches x == width and y == height; must not panic
        let set = tri(FillStrategy::EdgeTable, 16, (0.0, 0.0), (16.0, 0.0), (16.0, 16.0));
        assert!(!set.is_empty());
    }

    #[test]
    fn gouraud_corners_keep_vertex_colors() {
        let mut fb = FrameBuffer::new(12, 12);
        fill_triangle_shaded(
            &mut fb,
            glm::vec2(0.0, 0.0),
            glm::vec2(10.0, 0.0),
            glm::vec2(0.0, 10.0),
            Color::RED,
            Color::GREEN,
            Color::BLUE,
        );
        assert_eq!(fb.pixel(0, 0), Color::RED);
        assert_eq!(fb.pixel(10, 0), Color::GREEN);
        assert_eq!(fb.pixel(0, 10), Color::BLUE);
    }

    #[test]
    fn outlined_triangle_separates_edge_and_interior() {
        let mut fb = FrameBuffer::new(16, 16);
        draw_triangle_outlined(
            &mut fb,
            glm::vec2(0.0, 0.0),
            glm::vec2(10.0, 0.0),
            glm::vec2(0.0, 10.0),
            Color::RED,
            Color::WHITE,
        );
        assert_eq!(fb.pixel(2, 2), Color::RED);
        assert_eq!(fb.pixel(0, 5), Color::WHITE);
        assert_eq!(fb.pixel(10, 0), Color::WHITE);
    }
}
