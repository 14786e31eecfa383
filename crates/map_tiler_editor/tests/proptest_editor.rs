//! Property tests for shapes, the grid store and history.

use map_tiler_autotile::{resolve_borders, NoiseSampler};
use map_tiler_core::{
    BorderDirection, BorderRule, Coordinate, GridConfig, Material, MaterialId, NoiseRule,
    RuleTables, SpriteRect, TileSize,
};
use map_tiler_editor::{HistoryManager, ShapeRasterizer, TileGridStore};
use proptest::prelude::*;

const MATERIALS: [&str; 3] = ["grass", "water", "sand"];

fn tables() -> RuleTables {
    let mut tables = RuleTables::new()
        .with_material(Material::new("grass", SpriteRect::default()).with_noise_probability(0.0))
        .with_material(Material::new("water", SpriteRect::default()).with_noise_probability(60.0))
        .with_material(Material::new("sand", SpriteRect::default()).with_noise_probability(100.0))
        .with_material(Material::new("stone", SpriteRect::default()));
    for direction in BorderDirection::ALL {
        tables = tables.with_border_rule(BorderRule::new(
            format!("grass-water-{}", direction.symbol()),
            direction,
            "grass",
            "water",
            SpriteRect::default(),
        ));
    }
    tables
        .with_noise_rule(NoiseRule::new("flowers", "grass", SpriteRect::default()))
        .with_noise_rule(NoiseRule::new("lily", "water", SpriteRect::default()))
        .with_noise_rule(NoiseRule::new("shell", "sand", SpriteRect::default()))
}

#[derive(Debug, Clone)]
enum Edit {
    Paint(Vec<(i32, i32)>, usize),
    Erase(Vec<(i32, i32)>),
    Clear,
    Resize(u32, u32),
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    let coords = proptest::collection::vec((-1i32..9, -1i32..9), 1..6);
    prop_oneof![
        4 => (coords.clone(), 0..MATERIALS.len()).prop_map(|(c, m)| Edit::Paint(c, m)),
        2 => coords.prop_map(Edit::Erase),
        1 => Just(Edit::Clear),
        1 => (1u32..9, 1u32..9).prop_map(|(w, h)| Edit::Resize(w, h)),
    ]
}

fn to_coords(c: &[(i32, i32)]) -> Vec<Coordinate> {
    c.iter().map(|&(x, y)| Coordinate::new(x, y)).collect()
}

fn apply(store: &mut TileGridStore, edit: &Edit) {
    match edit {
        Edit::Paint(c, m) => {
            store.paint_many(to_coords(c), &MaterialId::from(MATERIALS[*m]));
        }
        Edit::Erase(c) => {
            store.erase_many(to_coords(c));
        }
        Edit::Clear => {
            store.clear();
        }
        Edit::Resize(w, h) => {
            store.resize(*w, *h);
        }
    }
}

fn store(seed: u64) -> TileGridStore {
    TileGridStore::new(
        GridConfig::new(8, 8, TileSize::default()),
        tables(),
        NoiseSampler::seeded(seed),
    )
}

proptest! {
    #[test]
    fn rectangle_is_symmetric(
        ax in 0i32..12, ay in 0i32..12, bx in 0i32..12, by in 0i32..12,
    ) {
        let r = ShapeRasterizer::new(GridConfig::new(12, 12, TileSize::default()));
        let (a, b) = (Coordinate::new(ax, ay), Coordinate::new(bx, by));
        let cells = r.rectangle(a, b);
        prop_assert_eq!(&cells, &r.rectangle(b, a));
        let expected = ((ax - bx).abs() + 1) * ((ay - by).abs() + 1);
        prop_assert_eq!(cells.len(), expected as usize);
    }

    #[test]
    fn flood_fill_is_a_fixed_point(
        edits in proptest::collection::vec(arb_edit(), 0..8),
        start in (0i32..8, 0i32..8),
        seed in any::<u64>(),
    ) {
        let mut store = store(seed);
        for edit in &edits {
            apply(&mut store, edit);
        }
        let start = Coordinate::new(start.0, start.1);
        let rasterizer = ShapeRasterizer::for_grid(store.grid());
        let region = rasterizer.flood_fill(store.grid(), start);

        // A material no other cell holds, so the refill cannot leak
        store.paint_many(region.iter().copied(), &MaterialId::from("stone"));
        let refill = ShapeRasterizer::for_grid(store.grid()).flood_fill(store.grid(), start);

        if store.grid().contains(start) {
            prop_assert_eq!(refill, region);
        } else {
            prop_assert!(region.is_empty() && refill.is_empty());
        }
    }

    #[test]
    fn undo_then_redo_restores_state(
        edits in proptest::collection::vec(arb_edit(), 1..12),
        undos in 1usize..6,
        seed in any::<u64>(),
    ) {
        let mut store = store(seed);
        let mut history = HistoryManager::new(store.grid());
        for edit in &edits {
            let revision = store.revision();
            apply(&mut store, edit);
            if store.revision() != revision {
                history.commit(store.grid());
            }
        }

        let newest = store.grid().clone();
        let mut undone = 0;
        for _ in 0..undos {
            let before = store.grid().clone();
            if !history.undo(&mut store) {
                break;
            }
            undone += 1;
            prop_assert!(history.redo(&mut store));
            prop_assert_eq!(store.grid(), &before);
            prop_assert!(history.undo(&mut store));
        }
        for _ in 0..undone {
            prop_assert!(history.redo(&mut store));
        }
        prop_assert_eq!(store.grid(), &newest);
    }

    #[test]
    fn zero_probability_material_is_never_decorated(
        edits in proptest::collection::vec(arb_edit(), 1..12),
        seed in any::<u64>(),
    ) {
        let mut store = store(seed);
        for edit in &edits {
            apply(&mut store, edit);
        }
        for (_, cell) in store.grid().cells() {
            if cell.material_id.as_str() == "grass" {
                prop_assert_eq!(&cell.noise_rule_id, &None);
            }
            if cell.material_id.as_str() == "sand" {
                prop_assert_eq!(cell.noise_rule_id.as_ref().map(|id| id.as_str()), Some("shell"));
            }
        }
    }

    #[test]
    fn store_borders_match_a_full_pass(
        edits in proptest::collection::vec(arb_edit(), 1..12),
        seed in any::<u64>(),
    ) {
        let mut store = store(seed);
        for edit in &edits {
            apply(&mut store, edit);
        }
        let mut recomputed = store.grid().clone();
        prop_assert_eq!(resolve_borders(&mut recomputed, store.tables()), 0);
        prop_assert_eq!(&recomputed, store.grid());
    }
}
