//! Turning tool gestures into sets of grid coordinates
//!
//! Every shape is clipped to the grid bounds and returned as a
//! `BTreeSet`, so results carry no duplicates and iterate row-major.

use map_tiler_core::{Coordinate, Grid, GridConfig, MaterialId};
use std::collections::{BTreeSet, VecDeque};

/// Stateless rasterizer bound to one grid's dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRasterizer {
    config: GridConfig,
}

impl ShapeRasterizer {
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(*grid.config())
    }

    /// All cells of the axis-aligned box spanned by `a` and `b`, inclusive.
    /// Corner order does not matter.
    pub fn rectangle(&self, a: Coordinate, b: Coordinate) -> BTreeSet<Coordinate> {
        let min_x = a.x.min(b.x).max(0);
        let max_x = a.x.max(b.x).min(self.config.width as i32 - 1);
        let min_y = a.y.min(b.y).max(0);
        let max_y = a.y.max(b.y).min(self.config.height as i32 - 1);

        let mut cells = BTreeSet::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                cells.insert(Coordinate::new(x, y));
            }
        }
        cells
    }

    /// Cells whose Euclidean distance from `center` is at most the rounded
    /// radius. The distance itself is not rounded.
    ///
    /// Only the part of the bounding box that overlaps the grid is scanned,
    /// so the cost is bounded by the grid size whatever the radius.
    pub fn circle(&self, center: Coordinate, radius: f32) -> BTreeSet<Coordinate> {
        let mut cells = BTreeSet::new();
        let r = i64::from(radius.round() as i32);
        if r < 0 {
            return cells;
        }

        let (cx, cy) = (i64::from(center.x), i64::from(center.y));
        let min_x = (cx - r).max(0);
        let max_x = (cx + r).min(i64::from(self.config.width) - 1);
        let min_y = (cy - r).max(0);
        let max_y = (cy + r).min(i64::from(self.config.height) - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let (dx, dy) = ((x - cx) as f64, (y - cy) as f64);
                if dx.hypot(dy) <= r as f64 {
                    // Clipped to the grid above
                    cells.insert(Coordinate::new(x as i32, y as i32));
                }
            }
        }
        cells
    }

    /// Bresenham line from `from` to `to`, both ends included
    pub fn line(&self, from: Coordinate, to: Coordinate) -> BTreeSet<Coordinate> {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;

        let (mut x, mut y) = (from.x, from.y);
        let mut cells = BTreeSet::new();
        loop {
            let coord = Coordinate::new(x, y);
            if self.config.contains(coord) {
                cells.insert(coord);
            }
            if x == to.x && y == to.y {
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
        cells
    }

    /// 4-connected breadth-first fill from `start`.
    ///
    /// The target is whatever `start` holds, including "unpainted"; a cell
    /// joins the region when it holds exactly the same value. Returns an
    /// empty set when `start` is outside the grid.
    pub fn flood_fill(&self, grid: &Grid, start: Coordinate) -> BTreeSet<Coordinate> {
        let mut region = BTreeSet::new();
        if !self.config.contains(start) {
            return region;
        }

        let target: Option<&MaterialId> = grid.material_at(start);
        let mut queue = VecDeque::from([start]);
        region.insert(start);

        while let Some(coord) = queue.pop_front() {
            for next in coord.orthogonal_neighbors() {
                if !self.config.contains(next) || region.contains(&next) {
                    continue;
                }
                if grid.material_at(next) == target {
                    region.insert(next);
                    queue.push_back(next);
                }
            }
        }
        region
    }
}
