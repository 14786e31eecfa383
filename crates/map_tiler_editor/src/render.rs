//! Resolving a grid into the sprites a renderer draws

use map_tiler_core::{
    BorderRuleId, Coordinate, Grid, MaterialId, NoiseRuleId, RuleTables, SpriteRect, TileSize,
};

/// Sprites stacked on one cell, bottom to top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellSprites {
    pub base: Option<SpriteRect>,
    pub border: Option<SpriteRect>,
    pub noise: Option<SpriteRect>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell {
    pub coord: Coordinate,
    /// Top-left pixel of the cell in the output image
    pub origin: (u32, u32),
    pub sprites: CellSprites,
}

/// A cell points at an id the current tables do not contain.
/// The affected layer is simply not drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingReference {
    Material { coord: Coordinate, id: MaterialId },
    BorderRule { coord: Coordinate, id: BorderRuleId },
    NoiseRule { coord: Coordinate, id: NoiseRuleId },
}

impl DanglingReference {
    pub fn coord(&self) -> Coordinate {
        match self {
            DanglingReference::Material { coord, .. }
            | DanglingReference::BorderRule { coord, .. }
            | DanglingReference::NoiseRule { coord, .. } => *coord,
        }
    }
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DanglingReference::Material { coord, id } => {
                write!(f, "cell {} references unknown material '{}'", coord, id)
            }
            DanglingReference::BorderRule { coord, id } => {
                write!(f, "cell {} references unknown border rule '{}'", coord, id)
            }
            DanglingReference::NoiseRule { coord, id } => {
                write!(f, "cell {} references unknown noise rule '{}'", coord, id)
            }
        }
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pub width: u32,
    pub height: u32,
    pub tile_size: TileSize,
    /// Painted cells in row-major order
    pub cells: Vec<RenderedCell>,
    pub dangling: Vec<DanglingReference>,
}

impl RenderFrame {
    /// Output image size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.width * self.tile_size.width,
            self.height * self.tile_size.height,
        )
    }
}

/// Look up the sprites of every painted cell.
///
/// Never fails: ids missing from `tables` are reported in
/// [`RenderFrame::dangling`] and their sprite is left out.
pub fn render_frame(grid: &Grid, tables: &RuleTables) -> RenderFrame {
    let tile_size = grid.config().tile_size;
    let mut cells = Vec::with_capacity(grid.len());
    let mut dangling = Vec::new();

    for (coord, cell) in grid.cells() {
        let base = match tables.material(&cell.material_id) {
            Some(material) => Some(material.sprite),
            None => {
                dangling.push(DanglingReference::Material {
                    coord,
                    id: cell.material_id.clone(),
                });
                None
            }
        };

        let border = cell.border_rule_id.as_ref().and_then(|id| {
            let rule = tables.border_rule(id);
            if rule.is_none() {
                dangling.push(DanglingReference::BorderRule {
                    coord,
                    id: id.clone(),
                });
            }
            rule.map(|r| r.sprite)
        });

        let noise = cell.noise_rule_id.as_ref().and_then(|id| {
            let rule = tables.noise_rule(id);
            if rule.is_none() {
                dangling.push(DanglingReference::NoiseRule {
                    coord,
                    id: id.clone(),
                });
            }
            rule.map(|r| r.sprite)
        });

        cells.push(RenderedCell {
            coord,
            origin: (
                coord.x as u32 * tile_size.width,
                coord.y as u32 * tile_size.height,
            ),
            sprites: CellSprites {
                base,
                border,
                noise,
            },
        });
    }

    RenderFrame {
        width: grid.width(),
        height: grid.height(),
        tile_size,
        cells,
        dangling,
    }
}
