//! Per-scanline span table
//!
//! Left/right x-extent arrays built by Bresenham-walking a triangle's three
//! edges, then consumed by a single span-fill pass. Decouples edge walking
//! from span filling so one edge walk can serve both the fill and the
//! wireframe overlay.

/// Triangle-scoped table of per-row x extents.
///
/// Rows cover `[y_min, y_max)` of the triangle's vertical extent. Both slots
/// start at the sentinel -1 ("unset"); the first edge pixel written into a
/// row seeds the right slot, later pixels re-sort into left/right. Once both
/// slots are set, `left <= right` holds for the row.
pub struct SpanTable {
    y_min: i32,
    left: Vec<i32>,
    right: Vec<i32>,
}

impl SpanTable {
    pub fn new(y_min: i32, y_max: i32) -> Self {
        let rows = (y_max - y_min).max(0) as usize;
        Self {
            y_min,
            left: vec![-1; rows],
            right: vec![-1; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.left.len()
    }

    pub fn y_min(&self) -> i32 {
        self.y_min
    }

    /// The `[left, right]` extent for a row, if any edge touched it
    pub fn span(&self, row: usize) -> Option<(i32, i32)> {
        let (l, r) = (self.left[row], self.right[row]);
        if r < 0 {
            return None;
        }
        // A row touched by a single edge pixel spans just that pixel
        if l < 0 {
            return Some((r, r));
        }
        Some((l, r))
    }

    fn insert(&mut self, row: i32, x: i32) {
        if row < 0 || row as usize >= self.left.len() {
            return;
        }
        let row = row as usize;
        if x > self.right[row] {
            self.left[row] = self.right[row];
            self.right[row] = x;
        } else if self.left[row] < 0 || x < self.left[row] {
            self.left[row] = x;
        }
    }

    /// Walk one edge with Bresenham, recording the first pixel the edge
    /// produces on each row it crosses.
    pub fn rasterize_edge(&mut self, p1: (i32, i32), p2: (i32, i32)) {
        let (mut x1, mut y1) = (p1.0, p1.1 - self.y_min);
        let (mut x2, mut y2) = (p2.0, p2.1 - self.y_min);
        if x1 > x2 {
            std::mem::swap(&mut x1, &mut x2);
            std::mem::swap(&mut y1, &mut y2);
        }

        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut record = true;

        loop {
            if record {
                self.insert(y1, x1);
                record = false;
            }

            if x1 == x2 && y1 == y2 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x1 += 1;
            }
            if e2 <= dx {
                err += dx;
                y1 += sy;
                record = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_edges_keep_left_right_ordered() {
        // triangle (2,0) (12,4) (0,9)
        let mut table = SpanTable::new(0, 9);
        table.rasterize_edge((2, 0), (12, 4));
        table.rasterize_edge((2, 0), (0, 9));
        table.rasterize_edge((12, 4), (0, 9));
        for row in 0..table.rows() {
            let (l, r) = table.span(row).expect("every row crossed by two edges");
            assert!(l <= r, "row {}: left {} > right {}", row, l, r);
            assert!(l >= 0);
        }
    }

    #[test]
    fn untouched_rows_stay_sentinel() {
        let mut table = SpanTable::new(0, 10);
        table.rasterize_edge((0, 0), (5, 3));
        assert!(table.span(8).is_none());
    }

    #[test]
    fn single_insert_spans_one_pixel() {
        let mut table = SpanTable::new(0, 2);
        table.rasterize_edge((4, 1), (4, 1));
        assert_eq!(table.span(1), Some((4, 4)));
    }

    #[test]
    fn horizontal_edge_records_leftmost() {
        let mut table = SpanTable::new(0, 1);
        table.rasterize_edge((7, 0), (2, 0));
        // a single horizontal edge contributes its entry pixel
        let (l, r) = table.span(0).unwrap();
        assert!(l <= r);
        assert!(l >= 2 && r <= 7);
    }

    #[test]
    fn empty_extent_has_no_rows() {
        let table = SpanTable::new(5, 5);
        assert_eq!(table.rows(), 0);
    }
}
