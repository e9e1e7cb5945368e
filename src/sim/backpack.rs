//! Raid backpack.
//!
//! Items collected during the raid. A weight budget caps what can be
//! carried; a rejected pickup leaves the item in the world.

use serde::{Deserialize, Serialize};

use crate::loot::Item;

/// Float slack when comparing summed weights against the budget
const WEIGHT_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backpack {
    pub items: Vec<Item>,
    /// kg
    pub capacity: f32,
}

impl Backpack {
    pub fn new(capacity: f32) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn total_weight(&self) -> f32 {
        self.items.iter().map(|i| i.weight).sum()
    }

    pub fn total_value(&self) -> u32 {
        self.items.iter().map(|i| i.value).sum()
    }

    pub fn can_carry(&self, item: &Item) -> bool {
        self.total_weight() + item.weight <= self.capacity + WEIGHT_EPSILON
    }

    /// Add `item` if it fits; hand it back otherwise
    pub fn try_add(&mut self, item: Item) -> Result<(), Item> {
        if self.can_carry(&item) {
            self.items.push(item);
            Ok(())
        } else {
            Err(item)
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
