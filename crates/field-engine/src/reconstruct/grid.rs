//! Uniform-grid accelerator for purely spatial masks.
//!
//! Control points are bucketed into roughly `sqrt(n) x sqrt(n)` cells.
//! A query scans rings of cells outward from its own cell and stops once
//! the closest possible point of the next ring is strictly farther than
//! the best candidate. Equal distances keep being scanned, so the lowest
//! index still wins ties exactly as in [`BruteForce`](super::BruteForce).
//!
//! Only valid when both spatial dimensions are enabled and no color
//! dimension is: the ring bound relies on the position difference along
//! one axis growing with the ring index.

use crate::metric::{Feature, WeightedMetric};

use super::NearestSearch;

#[derive(Debug)]
pub struct SpatialGrid<'a> {
    metric: WeightedMetric,
    points: &'a [Feature],
    cell_height: usize,
    cell_width: usize,
    grid_rows: usize,
    grid_cols: usize,
    /// Point indices per cell, ascending.
    cells: Vec<Vec<usize>>,
}

impl<'a> SpatialGrid<'a> {
    /// Bucket `points` for a `width x height` canvas. `points` must be non-empty.
    pub fn new(metric: WeightedMetric, points: &'a [Feature], width: usize, height: usize) -> Self {
        debug_assert!(!points.is_empty(), "grid search needs at least one point");

        let per_side = (points.len() as f64).sqrt().ceil().max(1.0) as usize;
        let height = height.max(1);
        let width = width.max(1);
        let cell_height = height.div_ceil(per_side).max(1);
        let cell_width = width.div_ceil(per_side).max(1);
        let grid_rows = height.div_ceil(cell_height);
        let grid_cols = width.div_ceil(cell_width);

        let mut cells = vec![Vec::new(); grid_rows * grid_cols];
        for (i, point) in points.iter().enumerate() {
            // Points outside the canvas land in the border cells, which only
            // makes them farther than the ring bound assumes
            let r = (point.position.row / cell_height).min(grid_rows - 1);
            let c = (point.position.col / cell_width).min(grid_cols - 1);
            cells[r * grid_cols + c].push(i);
        }

        Self {
            metric,
            points,
            cell_height,
            cell_width,
            grid_rows,
            grid_cols,
            cells,
        }
    }

    /// Smallest squared distance any point in ring `ring` can have.
    fn ring_bound(&self, ring: usize) -> f64 {
        if ring == 0 {
            return 0.0;
        }
        let row = self.metric.row_term((ring - 1) * self.cell_height + 1);
        let col = self.metric.col_term((ring - 1) * self.cell_width + 1);
        let d = row.min(col);
        d * d
    }

    fn scan_cell(&self, r: usize, c: usize, query: &Feature, best: &mut (f64, usize)) {
        for &i in &self.cells[r * self.grid_cols + c] {
            let d = self.metric.squared(query, &self.points[i]);
            if d < best.0 || (d == best.0 && i < best.1) {
                *best = (d, i);
            }
        }
    }
}

impl NearestSearch for SpatialGrid<'_> {
    fn nearest(&self, query: &Feature) -> usize {
        let qr = (query.position.row / self.cell_height).min(self.grid_rows - 1) as isize;
        let qc = (query.position.col / self.cell_width).min(self.grid_cols - 1) as isize;
        let rows = self.grid_rows as isize;
        let cols = self.grid_cols as isize;
        let max_ring = qr.max(rows - 1 - qr).max(qc).max(cols - 1 - qc) as usize;

        let mut best = (f64::INFINITY, usize::MAX);

        for ring in 0..=max_ring {
            if best.0 < self.ring_bound(ring) {
                break;
            }
            let k = ring as isize;
            for r in (qr - k)..=(qr + k) {
                if r < 0 || r >= rows {
                    continue;
                }
                let on_edge = r == qr - k || r == qr + k;
                if on_edge {
                    for c in (qc - k)..=(qc + k) {
                        if c >= 0 && c < cols {
                            self.scan_cell(r as usize, c as usize, query, &mut best);
                        }
                    }
                } else {
                    for c in [qc - k, qc + k] {
                        if c >= 0 && c < cols {
                            self.scan_cell(r as usize, c as usize, query, &mut best);
                        }
                    }
                }
            }
        }

        best.1
    }
}
