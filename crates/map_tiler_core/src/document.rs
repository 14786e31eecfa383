//! Persisted map documents
//!
//! The on-disk shape of a map is a JSON document:
//!
//! ```json
//! {
//!   "configId": "overworld",
//!   "gridConfig": { "width": 10, "height": 8, "tileSize": { "width": 16, "height": 16 } },
//!   "tiles": [
//!     { "key": "3,4", "tile": { "x": 3, "y": 4, "materialId": "grass",
//!                               "borderTileId": "grass-water-e", "noiseIds": ["flowers"] } }
//!   ],
//!   "timestamp": "2026-01-01T12:00:00.000Z"
//! }
//! ```
//!
//! Reading and writing files is left to the caller; this module only converts
//! between [`Grid`] and the document and validates what it is given.

use crate::coord::Coordinate;
use crate::grid::{Grid, GridConfig, PaintedCell, TileSize};
use crate::tables::{BorderRuleId, MaterialId, NoiseRuleId};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Reasons a map document is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Required fields are absent or malformed
    #[error("Invalid map document: {0}")]
    Validation(String),
    /// The document belongs to a different tileset
    #[error("Map belongs to tileset '{found}' but the active tileset is '{expected}'")]
    Mismatch { expected: String, found: String },
}

/// Grid dimensions as persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentGridConfig {
    pub width: u32,
    pub height: u32,
    pub tile_size: TileSize,
}

impl From<GridConfig> for DocumentGridConfig {
    fn from(config: GridConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            tile_size: config.tile_size,
        }
    }
}

impl From<DocumentGridConfig> for GridConfig {
    fn from(config: DocumentGridConfig) -> Self {
        GridConfig::new(config.width, config.height, config.tile_size)
    }
}

/// One painted cell as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTile {
    pub x: i32,
    pub y: i32,
    pub material_id: MaterialId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_tile_id: Option<BorderRuleId>,
    /// Older maps could stack several overlays; only the first is honoured
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub noise_ids: Vec<NoiseRuleId>,
}

/// A keyed entry of the `tiles` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTileEntry {
    pub key: String,
    pub tile: DocumentTile,
}

/// A complete persisted map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub config_id: String,
    pub grid_config: DocumentGridConfig,
    pub tiles: Vec<DocumentTileEntry>,
    /// ISO-8601 / RFC 3339 save time
    pub timestamp: String,
}

impl MapDocument {
    /// Build a document from a grid, stamped with the given time
    pub fn from_grid(grid: &Grid, config_id: &str, timestamp: DateTime<Utc>) -> Self {
        let tiles = grid
            .cells()
            .map(|(coord, cell)| DocumentTileEntry {
                key: coord.to_key(),
                tile: DocumentTile {
                    x: coord.x,
                    y: coord.y,
                    material_id: cell.material_id.clone(),
                    border_tile_id: cell.border_rule_id.clone(),
                    noise_ids: cell.noise_rule_id.iter().cloned().collect(),
                },
            })
            .collect();

        Self {
            config_id: config_id.to_string(),
            grid_config: (*grid.config()).into(),
            tiles,
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Validate the document contents and build the grid they describe.
    ///
    /// Does not look at `config_id`; see [`deserialize`] for the full check.
    pub fn to_grid(&self) -> Result<Grid, DocumentError> {
        DateTime::parse_from_rfc3339(&self.timestamp).map_err(|e| {
            DocumentError::Validation(format!("timestamp '{}': {}", self.timestamp, e))
        })?;

        let config: GridConfig = self.grid_config.into();
        if config.width == 0 || config.height == 0 {
            return Err(DocumentError::Validation(format!(
                "grid size {}x{} must be non-zero",
                config.width, config.height
            )));
        }
        if config.tile_size.width == 0 || config.tile_size.height == 0 {
            return Err(DocumentError::Validation(format!(
                "tile size {}x{} must be non-zero",
                config.tile_size.width, config.tile_size.height
            )));
        }

        let mut grid = Grid::new(config);
        let mut seen = HashSet::new();

        for entry in &self.tiles {
            let tile = &entry.tile;
            let coord = Coordinate::new(tile.x, tile.y);

            if Coordinate::parse_key(&entry.key) != Some(coord) {
                return Err(DocumentError::Validation(format!(
                    "tile key '{}' does not match tile position {}",
                    entry.key, coord
                )));
            }
            if !seen.insert(coord) {
                return Err(DocumentError::Validation(format!(
                    "tile {} appears more than once",
                    coord
                )));
            }
            if tile.material_id.as_str().is_empty() {
                return Err(DocumentError::Validation(format!(
                    "tile {} has an empty materialId",
                    coord
                )));
            }

            let cell = PaintedCell {
                material_id: tile.material_id.clone(),
                border_rule_id: tile.border_tile_id.clone(),
                noise_rule_id: tile.noise_ids.first().cloned(),
            };
            if !grid.insert(coord, cell) {
                return Err(DocumentError::Validation(format!(
                    "tile {} lies outside the {}x{} grid",
                    coord, config.width, config.height
                )));
            }
        }

        Ok(grid)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Convert a grid into a document stamped with the current time
pub fn serialize(grid: &Grid, config_id: &str) -> MapDocument {
    MapDocument::from_grid(grid, config_id, Utc::now())
}

/// Convert a grid into a document stamped with `timestamp`
pub fn serialize_at(grid: &Grid, config_id: &str, timestamp: DateTime<Utc>) -> MapDocument {
    MapDocument::from_grid(grid, config_id, timestamp)
}

/// Validate an untyped document and rebuild its grid.
///
/// The `configId` is checked first: a document for another tileset is a
/// [`DocumentError::Mismatch`] whatever the rest of it looks like. Any other
/// missing or malformed field is a [`DocumentError::Validation`].
pub fn deserialize(
    document: &serde_json::Value,
    expected_config_id: &str,
) -> Result<Grid, DocumentError> {
    let result = deserialize_inner(document, expected_config_id);
    if let Err(err) = &result {
        tracing::warn!("Rejected map document: {}", err);
    }
    result
}

fn deserialize_inner(
    document: &serde_json::Value,
    expected_config_id: &str,
) -> Result<Grid, DocumentError> {
    let config_id = document
        .get("configId")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DocumentError::Validation("missing string field 'configId'".to_string()))?;

    if config_id != expected_config_id {
        return Err(DocumentError::Mismatch {
            expected: expected_config_id.to_string(),
            found: config_id.to_string(),
        });
    }

    let parsed = MapDocument::deserialize(document)
        .map_err(|e| DocumentError::Validation(e.to_string()))?;
    parsed.to_grid()
}

/// Parse JSON text and [`deserialize`] it
pub fn deserialize_str(json: &str, expected_config_id: &str) -> Result<Grid, DocumentError> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        let err = DocumentError::Validation(format!("not valid JSON: {}", e));
        tracing::warn!("Rejected map document: {}", err);
        err
    })?;
    deserialize(&value, expected_config_id)
}
