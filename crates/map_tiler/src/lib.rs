//! Tile-map authoring core
//!
//! Paint materials onto a bounded grid and get border transition sprites
//! and random decorations picked automatically, with gesture-level undo.
//!
//! The workspace is split into:
//! - [`map_tiler_core`] - coordinates, rule tables, the grid, tileset config and the
//!   persisted document format
//! - [`map_tiler_autotile`] - border resolution and noise rolls
//! - [`map_tiler_editor`] - shapes, the grid store, history and the gesture session
//!
//! # Example
//!
//! ```rust,ignore
//! use map_tiler::prelude::*;
//!
//! let config = TilesetConfig::load(Path::new("overworld.toml"))?;
//! let grid_config = GridConfig::new(32, 32, config.tile_size);
//! let store = TileGridStore::new(grid_config, config.tables(), NoiseSampler::seeded(7));
//!
//! let mut session = EditorSession::new(store);
//! session.select_material(Some("grass".into()));
//! session.set_shape(ToolShape::Rectangle);
//! session.press(Coordinate::new(2, 2));
//! session.release(Some(Coordinate::new(6, 5)));
//!
//! let document = serialize(session.grid(), &config.id);
//! ```

pub use map_tiler_autotile;
pub use map_tiler_core;
pub use map_tiler_editor;

pub mod prelude {
    pub use map_tiler_autotile::{resolve_borders, BorderResolver, NoiseSampler};
    pub use map_tiler_core::{
        deserialize, deserialize_str, serialize, BorderDirection, BorderRule, ConfigError,
        Coordinate, DocumentError, Grid, GridConfig, MapDocument, Material, MaterialId, NoiseRule,
        PaintedCell, RuleTables, SpriteRect, TileSize, TilesetConfig,
    };
    pub use map_tiler_editor::{
        render_frame, DanglingReference, EditorSession, EditorSettings, EditorTool,
        HistoryManager, RenderFrame, ShapeRasterizer, TileGridStore, ToolShape,
    };
}
