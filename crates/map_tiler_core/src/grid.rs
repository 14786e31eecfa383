//! The sparse grid of painted cells

use crate::coord::Coordinate;
use crate::tables::{BorderRuleId, MaterialId, NoiseRuleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pixel size of one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSize {
    pub width: u32,
    pub height: u32,
}

impl TileSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self::square(32)
    }
}

/// Dimensions of a grid in cells plus the pixel size of each cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: u32,
    pub height: u32,
    pub tile_size: TileSize,
}

impl GridConfig {
    pub const fn new(width: u32, height: u32, tile_size: TileSize) -> Self {
        Self {
            width,
            height,
            tile_size,
        }
    }

    /// Check if a coordinate lies inside `[0, width) x [0, height)`
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as i64) < self.width as i64
            && (coord.y as i64) < self.height as i64
    }

    /// A copy with every zero dimension raised to 1
    pub fn normalized(self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
            tile_size: TileSize::new(self.tile_size.width.max(1), self.tile_size.height.max(1)),
        }
    }

    /// Number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Every in-bounds coordinate in row-major order
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..height).flat_map(move |y| (0..width).map(move |x| Coordinate::new(x, y)))
    }
}

/// A single painted cell.
///
/// `border_rule_id` is owned by the border resolver and is never set by a
/// paint action. `noise_rule_id` is rolled once when the cell is painted and
/// then carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaintedCell {
    pub material_id: MaterialId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_rule_id: Option<BorderRuleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_rule_id: Option<NoiseRuleId>,
}

impl PaintedCell {
    pub fn new(material_id: MaterialId) -> Self {
        Self {
            material_id,
            border_rule_id: None,
            noise_rule_id: None,
        }
    }

    pub fn with_noise(mut self, noise_rule_id: Option<NoiseRuleId>) -> Self {
        self.noise_rule_id = noise_rule_id;
        self
    }
}

/// Sparse mapping from coordinates to painted cells.
///
/// An absent coordinate is empty background. No cell is ever stored outside
/// the grid bounds: `insert` refuses such coordinates and `resize` drops them.
/// Grid and tile dimensions are never zero, so every grid can be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    config: GridConfig,
    cells: BTreeMap<Coordinate, PaintedCell>,
}

impl Grid {
    /// Create an empty grid. Zero dimensions in `config` are raised to 1.
    pub fn new(config: GridConfig) -> Self {
        Self {
            config: config.normalized(),
            cells: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.config.contains(coord)
    }

    /// Get the cell at a coordinate, `None` for empty or out of bounds
    pub fn get(&self, coord: Coordinate) -> Option<&PaintedCell> {
        self.cells.get(&coord)
    }

    /// Material at a coordinate, `None` for empty background
    pub fn material_at(&self, coord: Coordinate) -> Option<&MaterialId> {
        self.cells.get(&coord).map(|c| &c.material_id)
    }

    /// Insert a cell. Returns `false` (and stores nothing) if `coord` is out
    /// of bounds.
    pub fn insert(&mut self, coord: Coordinate, cell: PaintedCell) -> bool {
        if !self.config.contains(coord) {
            return false;
        }
        self.cells.insert(coord, cell);
        true
    }

    /// Remove a cell, returning it if one was painted there
    pub fn remove(&mut self, coord: Coordinate) -> Option<PaintedCell> {
        self.cells.remove(&coord)
    }

    /// Remove every cell
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Change the grid dimensions, dropping cells that fall outside.
    /// A zero width or height is refused and leaves the grid untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        let config = self.config;
        self.cells.retain(|coord, _| config.contains(*coord));
        true
    }

    /// Set the border of an existing cell. Returns `false` if the coordinate
    /// is not painted.
    pub fn set_border_rule(&mut self, coord: Coordinate, rule: Option<BorderRuleId>) -> bool {
        match self.cells.get_mut(&coord) {
            Some(cell) => {
                cell.border_rule_id = rule;
                true
            }
            None => false,
        }
    }

    /// Painted cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Coordinate, &PaintedCell)> {
        self.cells.iter().map(|(coord, cell)| (*coord, cell))
    }

    /// Coordinates of painted cells in row-major order
    pub fn painted_coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cells.keys().copied()
    }

    /// Number of painted cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
