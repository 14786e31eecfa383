//! The authoritative grid and every mutation of it
//!
//! `TileGridStore` is the only place a [`Grid`] is changed while editing.
//! Each mutation rolls noise for newly written cells, then re-resolves
//! borders before returning, so the grid a caller sees is always settled.
//!
//! # Out-of-bounds and unknown materials
//!
//! Painting or erasing outside `[0, width) x [0, height)` is a silent no-op
//! for that coordinate; the rest of a batch still applies. Painting with a
//! material id that is not in the tables is a no-op for the whole call.
//! Resizing to a zero width or height is a no-op too, and a zero grid or
//! tile size given to [`TileGridStore::new`] is raised to 1, so every grid
//! the store holds can be saved and loaded back. None of these is an error.

use map_tiler_autotile::{resolve_borders, resolve_borders_around, NoiseSampler};
use map_tiler_core::{Coordinate, Grid, GridConfig, MaterialId, PaintedCell, RuleTables};
use tracing::debug;

pub struct TileGridStore {
    grid: Grid,
    tables: RuleTables,
    sampler: NoiseSampler,
    /// Bumped on every call that changed the grid
    revision: u64,
}

impl TileGridStore {
    pub fn new(config: GridConfig, tables: RuleTables, sampler: NoiseSampler) -> Self {
        Self {
            grid: Grid::new(config),
            tables,
            sampler,
            revision: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    /// Changes whenever the grid does. Two equal revisions mean the grid was
    /// not touched in between.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Paint one cell
    pub fn paint(&mut self, coord: Coordinate, material_id: &MaterialId) -> &Grid {
        self.paint_many([coord], material_id)
    }

    /// Paint a batch of cells with one border pass at the end.
    ///
    /// Noise is rolled independently for each cell actually written. A cell
    /// that already holds `material_id` is left as it is, noise included.
    pub fn paint_many<I>(&mut self, coords: I, material_id: &MaterialId) -> &Grid
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let Some(material) = self.tables.material(material_id) else {
            debug!("Ignoring paint with unknown material '{}'", material_id);
            return &self.grid;
        };

        let mut written = Vec::new();
        for coord in coords {
            if !self.grid.contains(coord) {
                debug!("Ignoring paint outside the grid at {}", coord);
                continue;
            }
            if self.grid.material_at(coord) == Some(material_id) {
                continue;
            }
            let noise = self.sampler.sample(material, &self.tables);
            self.grid
                .insert(coord, PaintedCell::new(material_id.clone()).with_noise(noise));
            written.push(coord);
        }

        if !written.is_empty() {
            resolve_borders_around(&mut self.grid, &self.tables, written.iter().copied());
            self.revision += 1;
            debug!("Painted {} cells with '{}'", written.len(), material_id);
        }
        &self.grid
    }

    /// Erase one cell
    pub fn erase(&mut self, coord: Coordinate) -> &Grid {
        self.erase_many([coord])
    }

    /// Erase a batch of cells with one border pass at the end
    pub fn erase_many<I>(&mut self, coords: I) -> &Grid
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let removed: Vec<Coordinate> = coords
            .into_iter()
            .filter(|&coord| self.grid.remove(coord).is_some())
            .collect();

        if !removed.is_empty() {
            resolve_borders_around(&mut self.grid, &self.tables, removed.iter().copied());
            self.revision += 1;
            debug!("Erased {} cells", removed.len());
        }
        &self.grid
    }

    /// Remove every painted cell
    pub fn clear(&mut self) -> &Grid {
        if !self.grid.is_empty() {
            self.grid.clear();
            self.revision += 1;
            debug!("Cleared grid");
        }
        &self.grid
    }

    /// Change the grid dimensions. Cells that fall outside are dropped.
    /// Zero dimensions are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> &Grid {
        if self.grid.width() == width && self.grid.height() == height {
            return &self.grid;
        }
        let before = self.grid.len();
        if !self.grid.resize(width, height) {
            debug!("Ignoring resize to {}x{}", width, height);
            return &self.grid;
        }
        resolve_borders(&mut self.grid, &self.tables);
        self.revision += 1;
        debug!(
            "Resized grid to {}x{}, dropped {} cells",
            width,
            height,
            before - self.grid.len()
        );
        &self.grid
    }

    /// Put a previously committed grid back in place
    pub fn restore(&mut self, grid: &Grid) -> &Grid {
        self.install(grid.clone());
        &self.grid
    }

    /// Install a grid from outside the session, e.g. a loaded document.
    /// Stored borders are recomputed against the current tables.
    pub fn load(&mut self, grid: Grid) -> &Grid {
        self.install(grid);
        debug!("Loaded {}x{} grid", self.grid.width(), self.grid.height());
        &self.grid
    }

    /// Swap the rule tables. Borders are recomputed; rolled noise is kept.
    pub fn set_tables(&mut self, tables: RuleTables) -> &Grid {
        self.tables = tables;
        resolve_borders(&mut self.grid, &self.tables);
        self.revision += 1;
        &self.grid
    }

    fn install(&mut self, grid: Grid) {
        self.grid = grid;
        resolve_borders(&mut self.grid, &self.tables);
        self.revision += 1;
    }
}

impl std::fmt::Debug for TileGridStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileGridStore")
            .field("width", &self.grid.width())
            .field("height", &self.grid.height())
            .field("cells", &self.grid.len())
            .field("revision", &self.revision)
            .finish()
    }
}
