//! Tileset configuration loading
//!
//! A tileset configuration bundles the rule tables with the id that persisted
//! maps are checked against. It can be written by hand in TOML:
//!
//! ```toml
//! id = "overworld"
//! name = "Overworld"
//! tile_size = { width = 16, height = 16 }
//!
//! [[materials]]
//! id = "grass"
//! sprite = { x = 0, y = 0, width = 16, height = 16 }
//! noise_probability = 20.0
//!
//! [[border_rules]]
//! id = "grass-water-e"
//! directions = "e"
//! material_a = "grass"
//! material_b = "water"
//! sprite = { x = 16, y = 0, width = 16, height = 16 }
//! ```

use crate::grid::TileSize;
use crate::tables::{BorderRule, Material, NoiseRule, RuleTables};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a tileset configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(String),
    #[error("Invalid tileset config: {0}")]
    Invalid(String),
}

/// Rule tables of one tileset plus its identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetConfig {
    /// Identity checked against the `configId` of loaded maps
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tile_size: TileSize,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub border_rules: Vec<BorderRule>,
    #[serde(default)]
    pub noise_rules: Vec<NoiseRule>,
}

impl TilesetConfig {
    pub fn new(id: impl Into<String>, tile_size: TileSize, tables: RuleTables) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            tile_size,
            materials: tables.materials,
            border_rules: tables.border_rules,
            noise_rules: tables.noise_rules,
        }
    }

    /// Parse and validate a TOML tileset configuration
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON tileset configuration
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, choosing the format from the extension
    /// (`.json` is JSON, anything else is TOML)
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Write the configuration as TOML
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// A copy of the rule tables in file order
    pub fn tables(&self) -> RuleTables {
        RuleTables {
            materials: self.materials.clone(),
            border_rules: self.border_rules.clone(),
            noise_rules: self.noise_rules.clone(),
        }
    }

    /// Check that the configuration is internally consistent
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::Invalid("tileset id is empty".to_string()));
        }
        if self.tile_size.width == 0 || self.tile_size.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "tile size {}x{} must be non-zero",
                self.tile_size.width, self.tile_size.height
            )));
        }

        check_ids("material", self.materials.iter().map(|m| m.id.as_str()))?;
        check_ids("border rule", self.border_rules.iter().map(|r| r.id.as_str()))?;
        check_ids("noise rule", self.noise_rules.iter().map(|r| r.id.as_str()))?;

        for material in &self.materials {
            let p = material.noise_probability;
            if !(0.0..=100.0).contains(&p) {
                return Err(ConfigError::Invalid(format!(
                    "material '{}' has noise probability {} outside [0, 100]",
                    material.id, p
                )));
            }
        }

        let known: HashSet<&str> = self.materials.iter().map(|m| m.id.as_str()).collect();
        for rule in &self.border_rules {
            for material in [&rule.material_a, &rule.material_b] {
                if !known.contains(material.as_str()) {
                    return Err(ConfigError::Invalid(format!(
                        "border rule '{}' references unknown material '{}'",
                        rule.id, material
                    )));
                }
            }
        }
        for rule in &self.noise_rules {
            if !known.contains(rule.base_material.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "noise rule '{}' references unknown material '{}'",
                    rule.id, rule.base_material
                )));
            }
        }

        Ok(())
    }
}

fn check_ids<'a, I>(kind: &str, ids: I) -> Result<(), ConfigError>
where
    I: Iterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{} with empty id", kind)));
        }
        if !seen.insert(id) {
            return Err(ConfigError::Invalid(format!(
                "duplicate {} id '{}'",
                kind, id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{BorderDirection, SpriteRect};

    const OVERWORLD: &str = r#"
id = "overworld"
name = "Overworld"
tile_size = { width = 16, height = 16 }

[[materials]]
id = "grass"
sprite = { x = 0, y = 0, width = 16, height = 16 }
noise_probability = 20.0

[[materials]]
id = "water"
sprite = { x = 0, y = 16, width = 16, height = 16 }

[[border_rules]]
id = "grass-water-e"
directions = "e"
material_a = "grass"
material_b = "water"
sprite = { x = 16, y = 0, width = 16, height = 16 }

[[border_rules]]
id = "grass-water-inner-ne"
directions = "inward-ne"
material_a = "grass"
material_b = "water"
sprite = { x = 32, y = 0, width = 16, height = 16 }

[[noise_rules]]
id = "flowers"
base_material = "grass"
sprite = { x = 48, y = 0, width = 16, height = 16 }
"#;

    #[test]
    fn test_parse_toml_config() {
        let config = TilesetConfig::from_toml_str(OVERWORLD).unwrap();
        assert_eq!(config.id, "overworld");
        assert_eq!(config.tile_size, TileSize::square(16));
        assert_eq!(config.materials.len(), 2);
        assert_eq!(config.materials[0].noise_probability, 20.0);
        assert_eq!(config.materials[1].noise_probability, 0.0);
        assert_eq!(
            config.border_rules[1].directions,
            BorderDirection::InwardNorthEast
        );
        assert_eq!(config.tables().noise_rules.len(), 1);
    }

    #[test]
    fn test_unknown_direction_rejected() {
        let bad = OVERWORLD.replace("\"inward-ne\"", "\"up\"");
        assert!(matches!(
            TilesetConfig::from_toml_str(&bad),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_duplicate_material_rejected() {
        let tables = RuleTables::new()
            .with_material(Material::new("grass", SpriteRect::default()))
            .with_material(Material::new("grass", SpriteRect::default()));
        let config = TilesetConfig::new("t", TileSize::default(), tables);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let mut config = TilesetConfig::from_toml_str(OVERWORLD).unwrap();
        config.materials[0].noise_probability = 140.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rule_with_unknown_material_rejected() {
        let mut config = TilesetConfig::from_toml_str(OVERWORLD).unwrap();
        config.noise_rules[0].base_material = "lava".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lava"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overworld.toml");
        let config = TilesetConfig::from_toml_str(OVERWORLD).unwrap();
        config.save(&path).unwrap();
        let loaded = TilesetConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overworld.json");
        let config = TilesetConfig::from_toml_str(OVERWORLD).unwrap();
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(TilesetConfig::load(&path).unwrap(), config);
    }
}
