//! Loot table and item values.
//!
//! Items are immutable value objects. A loot drop on the map wraps a copy of
//! a catalog template carrying a freshly drawn id, so two drops of the same
//! template are still distinct items once they reach the backpack.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::catalog::Rgba;

#[derive(Debug, thiserror::Error)]
pub enum LootTableError {
    #[error("Loot table is empty")]
    Empty,
    #[error("Item '{0}' has a non-positive weight")]
    BadWeight(String),
    #[error("Loot table parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Item categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCategory {
    WeaponMod,
    Valuable,
    Junk,
    Medkit,
    Ammo,
}

/// Unique item id. Catalog templates carry their template key instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: ItemCategory,
    /// kg
    pub weight: f32,
    pub value: u32,
    pub color: Rgba,
}

impl Item {
    /// Copy of this template under a new id
    pub fn instance(&self, id: ItemId) -> Item {
        Item { id, ..self.clone() }
    }
}

/// Catalog of item templates sampled uniformly during map generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootTable {
    pub items: Vec<Item>,
}

impl Default for LootTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn template(
    key: &str,
    name: &str,
    category: ItemCategory,
    weight: f32,
    value: u32,
    color: Rgba,
) -> Item {
    Item {
        id: ItemId(key.to_string()),
        name: name.to_string(),
        category,
        weight,
        value,
        color,
    }
}

impl LootTable {
    pub fn builtin() -> Self {
        use ItemCategory::*;
        Self {
            items: vec![
                template("bamboo", "Chewed Bamboo", Junk, 0.5, 15, Rgba::rgb(0x86, 0xEF, 0xAC)),
                template("bread", "Stale Bread", Junk, 0.2, 10, Rgba::rgb(0xA8, 0xA2, 0x9E)),
                template("duck_feather", "Golden Feather", Valuable, 0.1, 200, Rgba::rgb(0xFC, 0xD3, 0x4D)),
                template("tech_scrap", "Duck Tech", WeaponMod, 1.0, 450, Rgba::rgb(0x81, 0x8C, 0xF8)),
                template("bandage", "Bandage", Medkit, 0.5, 60, Rgba::rgb(0xF8, 0x71, 0x71)),
                template("energy_cell", "Energy Cell", Ammo, 0.2, 30, Rgba::rgb(0x4A, 0xDE, 0x80)),
                template("fusion_core", "Fusion Core", Valuable, 2.5, 1000, Rgba::rgb(0xFB, 0xBF, 0x24)),
            ],
        }
    }

    pub fn from_ron(text: &str) -> Result<Self, LootTableError> {
        let table: LootTable = ron::from_str(text)?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), LootTableError> {
        if self.items.is_empty() {
            return Err(LootTableError::Empty);
        }
        if let Some(bad) = self.items.iter().find(|item| item.weight <= 0.0) {
            return Err(LootTableError::BadWeight(bad.name.clone()));
        }
        Ok(())
    }

    /// Uniformly pick a template
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Item> {
        self.items.choose(rng)
    }
}

/// Draws item ids that are unique within one generated map
#[derive(Debug, Default)]
pub struct ItemIdMint {
    issued: HashSet<u64>,
}

impl ItemIdMint {
    pub fn mint<R: Rng + ?Sized>(&mut self, rng: &mut R) -> ItemId {
        loop {
            let raw: u64 = rng.gen();
            if self.issued.insert(raw) {
                return ItemId(format!("item-{raw:016x}"));
            }
        }
    }
}
