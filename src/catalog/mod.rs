//! Level catalog.
//!
//! Static mission table consumed at raid launch. The catalog is read-only
//! for the lifetime of a raid; the built-in table ships the three original
//! missions and a replacement table can be loaded from RON.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::MIN_MAP_EDGE;

mod color;

pub use color::Rgba;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid color tag: {0}")]
    InvalidColor(String),
    #[error("Invalid level '{id}': {reason}")]
    InvalidLevel { id: String, reason: String },
    #[error("Duplicate level id: {0}")]
    DuplicateLevel(String),
    #[error("Unknown level id: {0}")]
    UnknownLevel(String),
    #[error("Catalog parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Mission definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Difficulty tier 1-3
    pub difficulty: u32,
    pub map_width: u32,
    pub map_height: u32,
    pub enemy_count_min: u32,
    pub enemy_count_max: u32,
    pub loot_count_min: u32,
    pub loot_count_max: u32,
    pub wall_color: Rgba,
    pub floor_color: Rgba,
}

impl LevelConfig {
    /// Reject definitions the generator cannot honor.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let fail = |reason: String| {
            Err(CatalogError::InvalidLevel {
                id: self.id.clone(),
                reason,
            })
        };

        if !(1..=3).contains(&self.difficulty) {
            return fail(format!("difficulty {} outside 1..=3", self.difficulty));
        }
        if self.map_width < MIN_MAP_EDGE || self.map_height < MIN_MAP_EDGE {
            return fail(format!(
                "map {}x{} smaller than {MIN_MAP_EDGE}x{MIN_MAP_EDGE}",
                self.map_width, self.map_height
            ));
        }
        if self.enemy_count_min > self.enemy_count_max {
            return fail(format!(
                "enemy range {}..{} is inverted",
                self.enemy_count_min, self.enemy_count_max
            ));
        }
        if self.loot_count_min > self.loot_count_max {
            return fail(format!(
                "loot range {}..{} is inverted",
                self.loot_count_min, self.loot_count_max
            ));
        }
        Ok(())
    }

    /// Tiles in the grid
    pub fn area(&self) -> usize {
        self.map_width as usize * self.map_height as usize
    }
}

impl fmt::Display for LevelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}x{}, difficulty {})",
            self.name, self.id, self.map_width, self.map_height, self.difficulty
        )
    }
}

/// Ordered mission list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub levels: Vec<LevelConfig>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    /// The three shipped missions
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                LevelConfig {
                    id: "level_1".into(),
                    name: "Bamboo Outskirts".into(),
                    description: "The edge of the forest. Light enemy presence.".into(),
                    difficulty: 1,
                    map_width: 30,
                    map_height: 30,
                    enemy_count_min: 5,
                    enemy_count_max: 8,
                    loot_count_min: 10,
                    loot_count_max: 15,
                    wall_color: Rgba::rgb(0x4a, 0xde, 0x80),
                    floor_color: Rgba::rgb(0x06, 0x4e, 0x3b),
                },
                LevelConfig {
                    id: "level_2".into(),
                    name: "Duck City Park".into(),
                    description: "Urban combat zone. Moderate resistance.".into(),
                    difficulty: 2,
                    map_width: 45,
                    map_height: 45,
                    enemy_count_min: 12,
                    enemy_count_max: 18,
                    loot_count_min: 15,
                    loot_count_max: 25,
                    wall_color: Rgba::rgb(0x94, 0xa3, 0xb8),
                    floor_color: Rgba::rgb(0x1e, 0x29, 0x3b),
                },
                LevelConfig {
                    id: "level_3".into(),
                    name: "The Mothership".into(),
                    description: "Elite Duck Guards. High risk, high reward.".into(),
                    difficulty: 3,
                    map_width: 60,
                    map_height: 60,
                    enemy_count_min: 25,
                    enemy_count_max: 35,
                    loot_count_min: 20,
                    loot_count_max: 40,
                    wall_color: Rgba::rgb(0x64, 0x74, 0x8b),
                    floor_color: Rgba::rgb(0x0f, 0x17, 0x2a),
                },
            ],
        }
    }

    /// Parse and validate a catalog written in RON
    pub fn from_ron(text: &str) -> Result<Self, CatalogError> {
        let catalog: LevelCatalog = ron::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        for (i, level) in self.levels.iter().enumerate() {
            level.validate()?;
            if self.levels[..i].iter().any(|other| other.id == level.id) {
                return Err(CatalogError::DuplicateLevel(level.id.clone()));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&LevelConfig, CatalogError> {
        self.levels
            .iter()
            .find(|level| level.id == id)
            .ok_or_else(|| CatalogError::UnknownLevel(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
