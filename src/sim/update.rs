//! Update engine.
//!
//! [`RaidState::advance`] consumes the state and either hands it back for the
//! next tick or yields the terminal [`RaidResult`]. A finished raid has no
//! state left to tick, so a result can only ever be produced once.

use tracing::debug;

use super::ai;
use super::combat;
use super::entity::{LootDrop, Projectile};
use super::movement;
use super::state::{RaidNotice, RaidResult, RaidState};
use crate::constants::*;
use crate::input::InputSnapshot;

#[derive(Debug)]
pub enum TickOutcome {
    Running(RaidState),
    Finished(RaidResult),
}

/// What an interact action did
#[derive(Debug, Clone, PartialEq)]
pub enum PickupOutcome {
    Collected { name: String },
    TooHeavy { name: String },
    NothingInReach,
}

impl RaidState {
    /// Advance one tick. `step` is the tick scale: 1.0 at the nominal rate.
    pub fn advance(mut self, input: &InputSnapshot, step: f32) -> TickOutcome {
        if input.toggle_overlay {
            self.toggle_overlay();
        }
        if self.overlay_open {
            return TickOutcome::Running(self);
        }

        let delta = movement::intent(&input.held) * self.player.vitals.speed * step;
        self.player.body.pos = movement::slide(&self.grid, self.player.body.pos, delta);

        let aim = input.aim();
        self.player.vitals.facing = aim.y.atan2(aim.x);

        let kills = combat::advance_projectiles(
            &self.grid,
            &mut self.projectiles,
            &mut self.enemies,
            step,
        );
        if kills > 0 {
            self.notices.push(RaidNotice::EnemiesDown {
                count: kills,
                remaining: self.enemies.len(),
            });
        }

        ai::pursue(&self.grid, &mut self.enemies, &mut self.player, step);

        if let Some(result) = self.terminal_result() {
            return TickOutcome::Finished(result);
        }

        if input.interact {
            self.pickup();
        }
        if input.fire {
            self.fire();
        }
        TickOutcome::Running(self)
    }

    fn terminal_result(&mut self) -> Option<RaidResult> {
        if self.player.vitals.is_depleted() {
            return Some(RaidResult::died());
        }
        if self.player.body.pos.distance(self.exit.body.pos) < TILE_SIZE {
            let loot = std::mem::take(&mut self.backpack.items);
            return Some(RaidResult::extracted(
                loot,
                self.level.difficulty,
                self.enemies.len(),
            ));
        }
        None
    }

    pub fn toggle_overlay(&mut self) {
        self.overlay_open = !self.overlay_open;
        self.notices.push(RaidNotice::OverlayToggled {
            open: self.overlay_open,
        });
    }

    /// Collect the nearest loot within reach, if the backpack can take it
    pub fn pickup(&mut self) -> PickupOutcome {
        let player = self.player.body;
        let nearest = self
            .loot
            .iter()
            .enumerate()
            .map(|(i, drop)| (i, drop.body.pos.distance(player.pos), drop))
            .filter(|(_, dist, drop)| *dist < player.radius + drop.body.radius + PICKUP_REACH)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _, _)| i);

        let Some(index) = nearest else {
            return PickupOutcome::NothingInReach;
        };

        let drop = self.loot.remove(index);
        let name = drop.item.name.clone();
        match self.backpack.try_add(drop.item) {
            Ok(()) => {
                debug!("Picked up {} ({} carried)", name, self.backpack.len());
                self.notices.push(RaidNotice::PickedUp { name: name.clone() });
                PickupOutcome::Collected { name }
            }
            Err(item) => {
                self.notices.push(RaidNotice::PickupRejected {
                    name: name.clone(),
                    carried: self.backpack.total_weight(),
                    capacity: self.backpack.capacity,
                });
                self.loot.insert(index, LootDrop { body: drop.body, item });
                PickupOutcome::TooHeavy { name }
            }
        }
    }

    /// Shoot from the player toward the pointer
    pub fn fire(&mut self) {
        let angle = self.player.vitals.facing;
        self.projectiles.push(Projectile::fired(self.player.body.pos, angle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LevelCatalog;
    use crate::generation::{GeneratedMap, TileGrid};
    use crate::input::{InputSnapshot, MoveKey};
    use crate::loot::{ItemId, LootTable};
    use crate::sim::entity::Enemy;
    use bevy::math::Vec2;

    const VIEW: Vec2 = Vec2::new(800.0, 600.0);

    fn room() -> TileGrid {
        TileGrid::from_ascii(&[
            "############",
            "#..........#",
            "#..........#",
            "#..........#",
            "#..........#",
            "############",
        ])
    }

    fn tile(x: f32, y: f32) -> Vec2 {
        Vec2::new(x * TILE_SIZE, y * TILE_SIZE)
    }

    fn state_with(exit: Vec2, enemies: Vec<Enemy>, loot: Vec<LootDrop>) -> RaidState {
        let level = LevelCatalog::builtin().levels[0].clone();
        let map = GeneratedMap {
            grid: room(),
            spawn: tile(2.5, 2.5),
            exit,
            enemies,
            loot,
        };
        RaidState::new(level, map, DEFAULT_CARRY_CAPACITY)
    }

    fn item(index: usize) -> crate::loot::Item {
        LootTable::builtin().items[index].instance(ItemId(format!("item-{index}")))
    }

    fn running(outcome: TickOutcome) -> RaidState {
        match outcome {
            TickOutcome::Running(state) => state,
            TickOutcome::Finished(result) => panic!("raid ended early: {result:?}"),
        }
    }

    #[test]
    fn test_walk_right() {
        let state = state_with(tile(10.5, 4.5), vec![], vec![]);
        let start = state.player_pos();
        let input = InputSnapshot::idle(VIEW).with_held(&[MoveKey::Right]);
        let state = running(state.advance(&input, 1.0));
        assert_eq!(state.player_pos(), start + Vec2::X * PLAYER_SPEED);
    }

    #[test]
    fn test_step_scales_movement() {
        let state = state_with(tile(10.5, 4.5), vec![], vec![]);
        let start = state.player_pos();
        let input = InputSnapshot::idle(VIEW).with_held(&[MoveKey::Down]);
        let state = running(state.advance(&input, 2.0));
        assert!((state.player_pos().y - start.y - 2.0 * PLAYER_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_facing_follows_pointer() {
        let state = state_with(tile(10.5, 4.5), vec![], vec![]);
        let input = InputSnapshot::idle(VIEW).with_pointer(Vec2::new(400.0, 700.0));
        let state = running(state.advance(&input, 1.0));
        assert!((state.player.vitals.facing - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_fire_spawns_projectile_toward_pointer() {
        let state = state_with(tile(10.5, 4.5), vec![], vec![]);
        let input = InputSnapshot::idle(VIEW)
            .with_pointer(Vec2::new(500.0, 300.0))
            .firing();
        let state = running(state.advance(&input, 1.0));
        assert_eq!(state.projectiles.len(), 1);
        let v = state.projectiles[0].velocity;
        assert!((v.x - PROJECTILE_SPEED).abs() < 1e-4 && v.y.abs() < 1e-4);
    }

    #[test]
    fn test_pickup_moves_item_to_backpack() {
        let near = LootDrop::new(tile(2.5, 2.5) + Vec2::X * 20.0, item(0));
        let far = LootDrop::new(tile(8.5, 2.5), item(1));
        let state = state_with(tile(10.5, 4.5), vec![], vec![near, far]);
        let state = running(state.advance(&InputSnapshot::idle(VIEW).interacting(), 1.0));
        assert_eq!(state.backpack.len(), 1);
        assert_eq!(state.loot.len(), 1);
        assert_eq!(state.backpack.items[0].name, "Chewed Bamboo");
    }

    #[test]
    fn test_pickup_prefers_nearest() {
        let a = LootDrop::new(tile(2.5, 2.5) + Vec2::X * 30.0, item(0));
        let b = LootDrop::new(tile(2.5, 2.5) - Vec2::X * 10.0, item(2));
        let mut state = state_with(tile(10.5, 4.5), vec![], vec![a, b]);
        assert_eq!(
            state.pickup(),
            PickupOutcome::Collected {
                name: "Golden Feather".into()
            }
        );
    }

    #[test]
    fn test_pickup_over_capacity_keeps_loot() {
        let heavy = LootDrop::new(tile(2.5, 2.5), item(6));
        let mut state = state_with(tile(10.5, 4.5), vec![], vec![heavy]);
        state.backpack.capacity = 2.0;
        assert!(matches!(state.pickup(), PickupOutcome::TooHeavy { .. }));
        assert_eq!(state.loot.len(), 1);
        assert!(state.backpack.is_empty());
        assert!(state
            .drain_notices()
            .iter()
            .any(|n| matches!(n, RaidNotice::PickupRejected { .. })));
    }

    #[test]
    fn test_nothing_in_reach() {
        let far = LootDrop::new(tile(8.5, 2.5), item(1));
        let mut state = state_with(tile(10.5, 4.5), vec![], vec![far]);
        assert_eq!(state.pickup(), PickupOutcome::NothingInReach);
    }

    #[test]
    fn test_overlay_pauses_simulation() {
        let enemy = Enemy::spawn(tile(5.5, 2.5), 1, 0.0);
        let state = state_with(tile(10.5, 4.5), vec![enemy], vec![]);
        let start = state.player_pos();
        let enemy_start = state.enemies[0].body.pos;

        let toggle = InputSnapshot::idle(VIEW).toggling_overlay();
        let state = running(state.advance(&toggle, 1.0));
        assert!(state.overlay_open);

        let busy = InputSnapshot::idle(VIEW)
            .with_held(&[MoveKey::Left])
            .firing()
            .interacting();
        let state = running(state.advance(&busy, 1.0));
        assert_eq!(state.player_pos(), start);
        assert_eq!(state.enemies[0].body.pos, enemy_start);
        assert!(state.projectiles.is_empty());

        let state = running(state.advance(&toggle, 1.0));
        assert!(!state.overlay_open);
        let state = running(state.advance(&InputSnapshot::idle(VIEW), 1.0));
        assert_ne!(state.enemies[0].body.pos, enemy_start);
    }

    #[test]
    fn test_reaching_exit_extracts() {
        let exit = tile(2.5, 2.5) + Vec2::X * 40.0;
        let mut state = state_with(exit, vec![], vec![]);
        state.backpack.items.push(item(3));
        match state.advance(&InputSnapshot::idle(VIEW), 1.0) {
            TickOutcome::Finished(result) => {
                assert!(result.survived);
                assert_eq!(result.loot_obtained.len(), 1);
                assert_eq!(result.xp_gained, 500);
            }
            TickOutcome::Running(_) => panic!("expected extraction"),
        }
    }

    #[test]
    fn test_death_wins_over_extraction() {
        let exit = tile(2.5, 2.5);
        let enemy = Enemy::spawn(tile(2.5, 2.5) + Vec2::X * 20.0, 1, 0.0);
        let mut state = state_with(exit, vec![enemy], vec![]);
        state.player.vitals.hp = 0.4;
        match state.advance(&InputSnapshot::idle(VIEW), 1.0) {
            TickOutcome::Finished(result) => assert_eq!(result, RaidResult::died()),
            TickOutcome::Running(_) => panic!("expected death"),
        }
    }
}
