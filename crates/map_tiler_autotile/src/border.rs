//! Border resolution
//!
//! Every painted cell looks at its 8 neighbours and picks at most one
//! [`BorderRule`] whose `material_a` is its own material. North is `y - 1`.

use map_tiler_core::{BorderDirection, BorderRule, Coordinate, Grid, MaterialId, RuleTables};
use std::collections::{BTreeSet, HashMap};

/// Neighbour slots, clockwise from north
pub mod neighbors {
    pub const N: usize = 0;
    pub const NE: usize = 1; // corner
    pub const E: usize = 2;
    pub const SE: usize = 3; // corner
    pub const S: usize = 4;
    pub const SW: usize = 5; // corner
    pub const W: usize = 6;
    pub const NW: usize = 7; // corner

    /// Offsets for each slot, indexed by the constants above
    pub const OFFSETS: [(i32, i32); 8] = [
        (0, -1),  // N
        (1, -1),  // NE
        (1, 0),   // E
        (1, 1),   // SE
        (0, 1),   // S
        (-1, 1),  // SW
        (-1, 0),  // W
        (-1, -1), // NW
    ];
}

/// Materials of the 8 cells surrounding a coordinate.
///
/// `None` is empty background, which includes anything past the grid edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighborhood<'a> {
    pub slots: [Option<&'a MaterialId>; 8],
}

impl<'a> Neighborhood<'a> {
    /// Gather the neighbours of `coord` from the grid
    pub fn of(grid: &'a Grid, coord: Coordinate) -> Self {
        let mut slots = [None; 8];
        for (slot, (dx, dy)) in slots.iter_mut().zip(neighbors::OFFSETS) {
            *slot = grid.material_at(coord.offset(dx, dy));
        }
        Self { slots }
    }

    fn is(&self, slot: usize, material: &MaterialId) -> bool {
        self.slots[slot] == Some(material)
    }

    /// How many of N, E, S, W hold `material`
    pub fn orthogonal_count(&self, material: &MaterialId) -> usize {
        [neighbors::N, neighbors::E, neighbors::S, neighbors::W]
            .into_iter()
            .filter(|&slot| self.is(slot, material))
            .count()
    }

    /// Test whether the neighbourhood shows `direction` against `partner`
    pub fn matches(&self, direction: BorderDirection, partner: &MaterialId) -> bool {
        use neighbors::*;
        use BorderDirection::*;

        let orthogonal = self.orthogonal_count(partner);
        let cardinal = |slot| orthogonal == 1 && self.is(slot, partner);
        // Outer corners match with zero or one orthogonal partner
        let diagonal = |slot| orthogonal <= 1 && self.is(slot, partner);
        let inward = |a, b, corner| {
            orthogonal >= 2 && self.is(a, partner) && self.is(b, partner) && self.is(corner, partner)
        };

        match direction {
            North => cardinal(N),
            East => cardinal(E),
            South => cardinal(S),
            West => cardinal(W),
            NorthEast => diagonal(NE),
            SouthEast => diagonal(SE),
            SouthWest => diagonal(SW),
            NorthWest => diagonal(NW),
            InwardNorthEast => inward(N, E, NE),
            InwardSouthEast => inward(S, E, SE),
            // West corners pair N with NW and S with SW, as the rule table does
            InwardSouthWest => inward(N, W, NW),
            InwardNorthWest => inward(S, W, SW),
        }
    }
}

/// Picks border rules for cells of a grid.
///
/// Holds the rule tables pre-grouped by `material_a`; build one per pass.
pub struct BorderResolver<'a> {
    rules_by_material: HashMap<&'a MaterialId, Vec<&'a BorderRule>>,
}

impl<'a> BorderResolver<'a> {
    pub fn new(tables: &'a RuleTables) -> Self {
        let mut rules_by_material: HashMap<&'a MaterialId, Vec<&'a BorderRule>> = HashMap::new();
        for rule in &tables.border_rules {
            rules_by_material
                .entry(&rule.material_a)
                .or_default()
                .push(rule);
        }
        Self { rules_by_material }
    }

    /// The winning rule for the cell at `coord`, if any.
    ///
    /// Highest priority wins (cardinal 4, inward corner 3, diagonal corner 2);
    /// among equals the rule listed first in the tables wins.
    pub fn resolve_cell(&self, grid: &Grid, coord: Coordinate) -> Option<&'a BorderRule> {
        let material = grid.material_at(coord)?;
        let rules = self.rules_by_material.get(material)?;
        let neighborhood = Neighborhood::of(grid, coord);

        let mut best: Option<&'a BorderRule> = None;
        for &rule in rules {
            if !neighborhood.matches(rule.directions, &rule.material_b) {
                continue;
            }
            match best {
                Some(current) if current.directions.priority() >= rule.directions.priority() => {}
                _ => best = Some(rule),
            }
        }
        best
    }

    /// Recompute the border of every painted cell. Returns how many cells
    /// changed.
    pub fn resolve_all(&self, grid: &mut Grid) -> usize {
        let targets: Vec<Coordinate> = grid.painted_coordinates().collect();
        self.apply(grid, targets)
    }

    /// Recompute only the cells in `changed` and their 8-neighbourhoods.
    ///
    /// Gives the same result as [`resolve_all`](Self::resolve_all) provided
    /// the grid was fully resolved before the cells in `changed` were
    /// mutated. Returns how many cells changed.
    pub fn resolve_region<I>(&self, grid: &mut Grid, changed: I) -> usize
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut targets = BTreeSet::new();
        for coord in changed {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let c = coord.offset(dx, dy);
                    if grid.get(c).is_some() {
                        targets.insert(c);
                    }
                }
            }
        }
        self.apply(grid, targets)
    }

    fn apply<I>(&self, grid: &mut Grid, targets: I) -> usize
    where
        I: IntoIterator<Item = Coordinate>,
    {
        // Read every assignment before writing any; borders never feed back
        // into matching, but the grid is borrowed immutably while reading.
        let updates: Vec<_> = targets
            .into_iter()
            .filter_map(|coord| {
                let current = grid.get(coord)?.border_rule_id.as_ref();
                let resolved = self.resolve_cell(grid, coord).map(|r| &r.id);
                (current != resolved).then(|| (coord, resolved.cloned()))
            })
            .collect();

        let changed = updates.len();
        for (coord, rule) in updates {
            grid.set_border_rule(coord, rule);
        }
        changed
    }
}

/// Run a full border pass over `grid`
pub fn resolve_borders(grid: &mut Grid, tables: &RuleTables) -> usize {
    let changed = BorderResolver::new(tables).resolve_all(grid);
    tracing::debug!(
        "Border pass over {} cells, {} changed",
        grid.len(),
        changed
    );
    changed
}

/// Run an incremental border pass around the mutated coordinates
pub fn resolve_borders_around<I>(grid: &mut Grid, tables: &RuleTables, changed: I) -> usize
where
    I: IntoIterator<Item = Coordinate>,
{
    BorderResolver::new(tables).resolve_region(grid, changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_tiler_core::{GridConfig, PaintedCell, SpriteRect, TileSize};

    fn grid(width: u32, height: u32) -> Grid {
        Grid::new(GridConfig::new(width, height, TileSize::default()))
    }

    fn paint(grid: &mut Grid, x: i32, y: i32, material: &str) {
        grid.insert(Coordinate::new(x, y), PaintedCell::new(material.into()));
    }

    fn rule(id: &str, directions: BorderDirection) -> BorderRule {
        BorderRule::new(id, directions, "grass", "water", SpriteRect::default())
    }

    fn border_at(grid: &Grid, x: i32, y: i32) -> Option<&str> {
        grid.get(Coordinate::new(x, y))?
            .border_rule_id
            .as_ref()
            .map(|id| id.as_str())
    }

    /// 3x3 grid of grass with the given cells set to water
    fn grass_with_water(water: &[(i32, i32)]) -> Grid {
        let mut grid = grid(3, 3);
        for coord in grid.config().coordinates().collect::<Vec<_>>() {
            let material = if water.contains(&(coord.x, coord.y)) {
                "water"
            } else {
                "grass"
            };
            paint(&mut grid, coord.x, coord.y, material);
        }
        grid
    }

    #[test]
    fn test_east_edge_two_by_one() {
        let tables = RuleTables::new().with_border_rule(rule("E1", BorderDirection::East));
        let mut grid = grid(2, 1);
        paint(&mut grid, 0, 0, "grass");
        paint(&mut grid, 1, 0, "water");

        resolve_borders(&mut grid, &tables);

        assert_eq!(border_at(&grid, 0, 0), Some("E1"));
        assert_eq!(border_at(&grid, 1, 0), None);
    }

    #[test]
    fn test_cardinal_requires_single_orthogonal_partner() {
        let tables = RuleTables::new().with_border_rule(rule("N1", BorderDirection::North));
        // water to the north and east of the centre
        let mut grid = grass_with_water(&[(1, 0), (2, 1)]);
        resolve_borders(&mut grid, &tables);
        assert_eq!(border_at(&grid, 1, 1), None);

        let mut grid = grass_with_water(&[(1, 0)]);
        resolve_borders(&mut grid, &tables);
        assert_eq!(border_at(&grid, 1, 1), Some("N1"));
    }

    #[test]
    fn test_cardinal_beats_diagonal() {
        let tables = RuleTables::new()
            .with_border_rule(rule("NE-corner", BorderDirection::NorthEast))
            .with_border_rule(rule("N-edge", BorderDirection::North));
        // north and north-east are water: one orthogonal partner
        let mut grid = grass_with_water(&[(1, 0), (2, 0)]);
        resolve_borders(&mut grid, &tables);
        assert_eq!(border_at(&grid, 1, 1), Some("N-edge"));
    }

    #[test]
    fn test_diagonal_with_no_orthogonal_partner() {
        let tables = RuleTables::new().with_border_rule(rule("SE", BorderDirection::SouthEast));
        let mut grid = grass_with_water(&[(2, 2)]);
        resolve_borders(&mut grid, &tables);
        assert_eq!(border_at(&grid, 1, 1), Some("SE"));
    }

    #[test]
    fn test_diagonal_blocked_by_two_orthogonal_partners() {
        let tables = RuleTables::new().with_border_rule(rule("SE", BorderDirection::SouthEast));
        let mut grid = grass_with_water(&[(2, 2), (1, 2), (2, 1)]);
        resolve_borders(&mut grid, &tables);
        assert_eq!(border_at(&grid, 1, 1), None);
    }

    #[test]
    fn test_inward_corner_needs_full_triple() {
        let tables = RuleTables::new()
            .with_border_rule(rule("IN-NE", BorderDirection::InwardNorthEast));

        let mut grid = grass_with_water(&[(1, 0), (2, 1), (2, 0)]);
        resolve_borders(&mut grid, &tables);
        assert_eq!(border_at(&grid, 1, 1), Some("IN-NE"));

        // missing the NE diagonal
        let mut grid = grass_with_water(&[(1, 0), (2, 1)]);
        resolve_borders(&mut grid, &tables);
        assert_eq!(border_at(&grid, 1, 1), None);
    }

    #[test]
    fn test_inward_corner_beats_outer_corner_of_other_partner() {
        let tables = RuleTables::new()
            .with_border_rule(BorderRule::new(
                "SW-sand",
                BorderDirection::SouthWest,
                "grass",
                "sand",
                SpriteRect::default(),
            ))
            .with_border_rule(rule("IN-NE", BorderDirection::InwardNorthEast));
        let mut grid = grass_with_water(&[(1, 0), (2, 1), (2, 0)]);
        paint(&mut grid, 0, 2, "sand");
        resolve_borders(&mut grid, &tables);
        assert_eq!(border_at(&grid, 1, 1), Some("IN-NE"));

        // without the water corner only the sand corner is left
        paint(&mut grid, 2, 0, "grass");
        resolve_borders(&mut grid, &tables);
        assert_eq!(border_at(&grid, 1, 1), Some("SW-sand"));
    }

    #[test]
    fn test_west_inward_corners_keep_table_pairing() {
        let tables = RuleTables::new()
            .with_border_rule(rule("IN-SW", BorderDirection::InwardSouthWest))
            .with_border_rule(rule("IN-NW", BorderDirection::InwardNorthWest));

        // N, W and NW water -> inward-sw
        let mut grid = grass_with_water(&[(1, 0), (0, 1), (0, 0)]);
        resolve_borders(&mut grid, &tables);
        assert_eq!(border_at(&grid, 1, 1), Some("IN-SW"));

        // S, W and SW water -> inward-nw
        let mut grid = grass_with_water(&[(1, 2), (0, 1), (0, 2)]);
        resolve_borders(&mut grid, &tables);
        assert_eq!(border_at(&grid, 1, 1), Some("IN-NW"));
    }

    #[test]
    fn test_tie_broken_by_table_order() {
        let tables = RuleTables::new()
            .with_border_rule(rule("first", BorderDirection::South))
            .with_border_rule(rule("second", BorderDirection::South));
        let mut grid = grass_with_water(&[(1, 2)]);
        resolve_borders(&mut grid, &tables);
        assert_eq!(border_at(&grid, 1, 1), Some("first"));
    }

    #[test]
    fn test_empty_neighbour_is_not_a_partner() {
        let tables = RuleTables::new().with_border_rule(rule("E1", BorderDirection::East));
        let mut grid = grid(2, 1);
        paint(&mut grid, 0, 0, "grass");
        resolve_borders(&mut grid, &tables);
        assert_eq!(border_at(&grid, 0, 0), None);
    }

    #[test]
    fn test_stale_border_cleared() {
        let tables = RuleTables::new().with_border_rule(rule("E1", BorderDirection::East));
        let mut grid = grid(2, 1);
        paint(&mut grid, 0, 0, "grass");
        paint(&mut grid, 1, 0, "water");
        resolve_borders(&mut grid, &tables);

        grid.remove(Coordinate::new(1, 0));
        let changed = resolve_borders_around(&mut grid, &tables, [Coordinate::new(1, 0)]);
        assert_eq!(changed, 1);
        assert_eq!(border_at(&grid, 0, 0), None);
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let tables = RuleTables::new()
            .with_border_rule(rule("N", BorderDirection::North))
            .with_border_rule(rule("SE", BorderDirection::SouthEast));
        let mut grid = grass_with_water(&[(1, 0), (2, 2)]);
        assert!(resolve_borders(&mut grid, &tables) > 0);
        assert_eq!(resolve_borders(&mut grid, &tables), 0);
    }
}
