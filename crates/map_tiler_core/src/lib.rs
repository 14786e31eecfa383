//! Core data structures for map_tiler
//!
//! This crate provides the plain-data types for an autotiled tile map:
//! - `Coordinate` - A structured cell key with row-major ordering
//! - `Material`, `BorderRule`, `NoiseRule` - Tileset rule tables
//! - `Grid` / `PaintedCell` - The sparse grid of painted cells
//! - `TilesetConfig` - Rule tables loaded from TOML or JSON
//! - `MapDocument` - The persisted map format with `serialize` / `deserialize`
//!
//! Nothing here depends on a game engine or a renderer.

mod config;
mod coord;
mod document;
mod grid;
mod tables;

pub use config::{ConfigError, TilesetConfig};
pub use coord::Coordinate;
pub use document::{
    deserialize, deserialize_str, serialize, serialize_at, DocumentError, DocumentGridConfig,
    DocumentTile, DocumentTileEntry, MapDocument,
};
pub use grid::{Grid, GridConfig, PaintedCell, TileSize};
pub use tables::{
    BorderDirection, BorderRule, BorderRuleId, DirectionClass, Material, MaterialId, NoiseRule,
    NoiseRuleId, RuleTables, SpriteRect,
};
