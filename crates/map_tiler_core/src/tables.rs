//! Materials, border rules and noise rules
//!
//! These make up the rule tables of a tileset. Table order matters: border
//! rules that tie on priority are broken by their position in
//! [`RuleTables::border_rules`].

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random id
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a [`Material`]
    MaterialId
);
string_id!(
    /// Identifier of a [`BorderRule`]
    BorderRuleId
);
string_id!(
    /// Identifier of a [`NoiseRule`]
    NoiseRuleId
);

/// A rectangle on the tileset image, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SpriteRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SpriteRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A paintable base material (e.g., "Grass", "Water")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    #[serde(default)]
    pub name: String,
    /// Reference sprite drawn for every cell of this material
    pub sprite: SpriteRect,
    /// Chance in percent (0-100) that a freshly painted cell gets a noise overlay
    #[serde(default)]
    pub noise_probability: f32,
}

impl Material {
    pub fn new(id: impl Into<MaterialId>, sprite: SpriteRect) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            sprite,
            noise_probability: 0.0,
        }
    }

    /// Set the noise probability, clamped to `[0, 100]`
    pub fn with_noise_probability(mut self, probability: f32) -> Self {
        self.noise_probability = probability.clamp(0.0, 100.0);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// The neighbour pattern a border rule reacts to.
///
/// North is toward `y - 1`. The inward corners describe concave junctions
/// where the partner material wraps around a corner of the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorderDirection {
    #[serde(rename = "n")]
    North,
    #[serde(rename = "e")]
    East,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "w")]
    West,
    #[serde(rename = "ne")]
    NorthEast,
    #[serde(rename = "se")]
    SouthEast,
    #[serde(rename = "sw")]
    SouthWest,
    #[serde(rename = "nw")]
    NorthWest,
    #[serde(rename = "inward-ne")]
    InwardNorthEast,
    #[serde(rename = "inward-se")]
    InwardSouthEast,
    #[serde(rename = "inward-sw")]
    InwardSouthWest,
    #[serde(rename = "inward-nw")]
    InwardNorthWest,
}

/// Broad category of a [`BorderDirection`], which fixes its priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionClass {
    Cardinal,
    InwardCorner,
    DiagonalCorner,
}

impl DirectionClass {
    /// Priority used when several rules match the same cell (higher wins)
    pub fn priority(self) -> u8 {
        match self {
            DirectionClass::Cardinal => 4,
            DirectionClass::InwardCorner => 3,
            DirectionClass::DiagonalCorner => 2,
        }
    }
}

impl BorderDirection {
    pub const ALL: [BorderDirection; 12] = [
        BorderDirection::North,
        BorderDirection::East,
        BorderDirection::South,
        BorderDirection::West,
        BorderDirection::NorthEast,
        BorderDirection::SouthEast,
        BorderDirection::SouthWest,
        BorderDirection::NorthWest,
        BorderDirection::InwardNorthEast,
        BorderDirection::InwardSouthEast,
        BorderDirection::InwardSouthWest,
        BorderDirection::InwardNorthWest,
    ];

    pub fn class(self) -> DirectionClass {
        use BorderDirection::*;
        match self {
            North | East | South | West => DirectionClass::Cardinal,
            NorthEast | SouthEast | SouthWest | NorthWest => DirectionClass::DiagonalCorner,
            InwardNorthEast | InwardSouthEast | InwardSouthWest | InwardNorthWest => {
                DirectionClass::InwardCorner
            }
        }
    }

    pub fn priority(self) -> u8 {
        self.class().priority()
    }

    /// Symbolic name as written in tileset files
    pub fn symbol(self) -> &'static str {
        use BorderDirection::*;
        match self {
            North => "n",
            East => "e",
            South => "s",
            West => "w",
            NorthEast => "ne",
            SouthEast => "se",
            SouthWest => "sw",
            NorthWest => "nw",
            InwardNorthEast => "inward-ne",
            InwardSouthEast => "inward-se",
            InwardSouthWest => "inward-sw",
            InwardNorthWest => "inward-nw",
        }
    }
}

/// A transition sprite drawn on `material_a` cells that touch `material_b`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderRule {
    pub id: BorderRuleId,
    #[serde(alias = "direction")]
    pub directions: BorderDirection,
    /// The painted material this rule applies to
    pub material_a: MaterialId,
    /// The neighbouring material that triggers it
    pub material_b: MaterialId,
    pub sprite: SpriteRect,
}

impl BorderRule {
    pub fn new(
        id: impl Into<BorderRuleId>,
        directions: BorderDirection,
        material_a: impl Into<MaterialId>,
        material_b: impl Into<MaterialId>,
        sprite: SpriteRect,
    ) -> Self {
        Self {
            id: id.into(),
            directions,
            material_a: material_a.into(),
            material_b: material_b.into(),
            sprite,
        }
    }
}

/// A decoration that may be rolled onto freshly painted `base_material` cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseRule {
    pub id: NoiseRuleId,
    pub base_material: MaterialId,
    pub sprite: SpriteRect,
}

impl NoiseRule {
    pub fn new(
        id: impl Into<NoiseRuleId>,
        base_material: impl Into<MaterialId>,
        sprite: SpriteRect,
    ) -> Self {
        Self {
            id: id.into(),
            base_material: base_material.into(),
            sprite,
        }
    }
}

/// The ordered rule tables of the active tileset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleTables {
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub border_rules: Vec<BorderRule>,
    #[serde(default)]
    pub noise_rules: Vec<NoiseRule>,
}

impl RuleTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.push(material);
        self
    }

    pub fn with_border_rule(mut self, rule: BorderRule) -> Self {
        self.border_rules.push(rule);
        self
    }

    pub fn with_noise_rule(mut self, rule: NoiseRule) -> Self {
        self.noise_rules.push(rule);
        self
    }

    /// Get material by ID
    pub fn material(&self, id: &MaterialId) -> Option<&Material> {
        self.materials.iter().find(|m| &m.id == id)
    }

    /// Get border rule by ID
    pub fn border_rule(&self, id: &BorderRuleId) -> Option<&BorderRule> {
        self.border_rules.iter().find(|r| &r.id == id)
    }

    /// Get noise rule by ID
    pub fn noise_rule(&self, id: &NoiseRuleId) -> Option<&NoiseRule> {
        self.noise_rules.iter().find(|r| &r.id == id)
    }

    pub fn has_material(&self, id: &MaterialId) -> bool {
        self.material(id).is_some()
    }

    /// Border rules whose `material_a` is `material`, in table order
    pub fn border_rules_for<'a>(
        &'a self,
        material: &'a MaterialId,
    ) -> impl Iterator<Item = &'a BorderRule> + 'a {
        self.border_rules
            .iter()
            .filter(move |r| &r.material_a == material)
    }

    /// Noise rules whose `base_material` is `material`, in table order
    pub fn noise_rules_for<'a>(
        &'a self,
        material: &'a MaterialId,
    ) -> impl Iterator<Item = &'a NoiseRule> + 'a {
        self.noise_rules
            .iter()
            .filter(move |r| &r.base_material == material)
    }

    /// Remove material by ID. Rules referencing it are left in place and
    /// simply stop matching.
    pub fn remove_material(&mut self, id: &MaterialId) -> Option<Material> {
        let pos = self.materials.iter().position(|m| &m.id == id)?;
        Some(self.materials.remove(pos))
    }
}
