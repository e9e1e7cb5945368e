//! Raid state, result and notices.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use super::backpack::Backpack;
use super::entity::*;
use crate::catalog::LevelConfig;
use crate::constants::{XP_PER_DIFFICULTY, XP_PER_REMAINING_ENEMY};
use crate::generation::{GeneratedMap, TileGrid};
use crate::loot::Item;

/// Terminal outcome of one raid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidResult {
    pub survived: bool,
    pub loot_obtained: Vec<Item>,
    pub xp_gained: u32,
}

impl RaidResult {
    pub fn died() -> Self {
        Self {
            survived: false,
            loot_obtained: Vec::new(),
            xp_gained: 0,
        }
    }

    pub fn extracted(loot: Vec<Item>, difficulty: u32, remaining_enemies: usize) -> Self {
        Self {
            survived: true,
            loot_obtained: loot,
            xp_gained: XP_PER_DIFFICULTY * difficulty
                + XP_PER_REMAINING_ENEMY * remaining_enemies as u32,
        }
    }

    pub fn total_value(&self) -> u32 {
        self.loot_obtained.iter().map(|i| i.value).sum()
    }

    pub fn total_weight(&self) -> f32 {
        self.loot_obtained.iter().map(|i| i.weight).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Discrete notifications for the HUD and the host
#[derive(Debug, Clone, PartialEq)]
pub enum RaidNotice {
    /// First tick of a raid
    Started { level_id: String },
    /// Displayed hp (floored, clamped at zero) changed
    HpChanged { hp: u32 },
    InventoryChanged { count: usize },
    PickedUp { name: String },
    PickupRejected { name: String, carried: f32, capacity: f32 },
    OverlayToggled { open: bool },
    EnemiesDown { count: usize, remaining: usize },
}

impl RaidNotice {
    /// Toast text, for notices that warrant one
    pub fn toast(&self) -> Option<String> {
        match self {
            RaidNotice::Started { .. } => Some("Locate the Green Zone to Extract!".to_string()),
            RaidNotice::PickedUp { name } => Some(format!("Picked up {name}!")),
            RaidNotice::PickupRejected { name, .. } => Some(format!("Too heavy: {name}")),
            _ => None,
        }
    }
}

/// Values the HUD shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudSummary {
    pub hp: u32,
    pub items: usize,
}

/// Emits HUD notices only when a displayed value changes
#[derive(Debug, Default, Clone)]
pub struct HudTracker {
    last: Option<HudSummary>,
}

impl HudTracker {
    pub fn observe(&mut self, state: &RaidState, out: &mut Vec<RaidNotice>) {
        let now = state.hud();
        let last = self.last.replace(now);
        if last.map(|l| l.hp) != Some(now.hp) {
            out.push(RaidNotice::HpChanged { hp: now.hp });
        }
        if last.map(|l| l.items) != Some(now.items) {
            out.push(RaidNotice::InventoryChanged { count: now.items });
        }
    }
}

/// The mutable world of one raid, owned by its session
#[derive(Debug, Clone)]
pub struct RaidState {
    pub level: LevelConfig,
    pub grid: TileGrid,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub loot: Vec<LootDrop>,
    pub projectiles: Vec<Projectile>,
    pub exit: ExitZone,
    pub backpack: Backpack,
    pub overlay_open: bool,
    pub(crate) notices: Vec<RaidNotice>,
}

impl RaidState {
    pub fn new(level: LevelConfig, map: GeneratedMap, carry_capacity: f32) -> Self {
        Self {
            level,
            grid: map.grid,
            player: Player::spawn(map.spawn),
            enemies: map.enemies,
            loot: map.loot,
            projectiles: Vec::new(),
            exit: ExitZone::new(map.exit),
            backpack: Backpack::new(carry_capacity),
            overlay_open: false,
            notices: Vec::new(),
        }
    }

    pub fn hud(&self) -> HudSummary {
        HudSummary {
            hp: self.player.vitals.hp.max(0.0).floor() as u32,
            items: self.backpack.len(),
        }
    }

    /// Notices raised since the last drain
    pub fn drain_notices(&mut self) -> Vec<RaidNotice> {
        std::mem::take(&mut self.notices)
    }

    pub fn player_pos(&self) -> Vec2 {
        self.player.body.pos
    }

    /// Every live entity, in no particular order
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        std::iter::once(EntityRef::Player(&self.player))
            .chain(self.enemies.iter().map(EntityRef::Enemy))
            .chain(self.loot.iter().map(EntityRef::Loot))
            .chain(self.projectiles.iter().map(EntityRef::Projectile))
            .chain(std::iter::once(EntityRef::Exit(&self.exit)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::{ItemId, LootTable};

    #[test]
    fn test_xp_formula() {
        let result = RaidResult::extracted(Vec::new(), 2, 3);
        assert_eq!(result.xp_gained, 1030);
        assert!(result.survived);
    }

    #[test]
    fn test_died_result_is_empty() {
        let result = RaidResult::died();
        assert!(!result.survived);
        assert!(result.loot_obtained.is_empty());
        assert_eq!(result.xp_gained, 0);
    }

    #[test]
    fn test_result_json_field_names() {
        let table = LootTable::builtin();
        let loot = vec![table.items[0].instance(ItemId("item-1".into()))];
        let result = RaidResult::extracted(loot, 1, 0);
        let json = result.to_json().unwrap();
        assert!(json.contains("\"lootObtained\""));
        assert!(json.contains("\"xpGained\":500"));
        assert_eq!(RaidResult::from_json(&json).unwrap(), result);
        assert_eq!(result.total_value(), 15);
    }

    #[test]
    fn test_toast_text() {
        let notice = RaidNotice::PickedUp {
            name: "Bandage".into(),
        };
        assert_eq!(notice.toast().as_deref(), Some("Picked up Bandage!"));
        assert!(RaidNotice::HpChanged { hp: 3 }.toast().is_none());
    }
}
