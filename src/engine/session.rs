//! One raid from launch to result.

use bevy::math::Vec2;
use bevy::prelude::Resource;
use tracing::info;

use crate::catalog::LevelConfig;
use crate::config::RaidConfig;
use crate::generation::{self, GenerationError, RaidSeed};
use crate::input::{InputEvent, InputState};
use crate::loot::LootTable;
use crate::sim::{HudTracker, RaidNotice, RaidResult, RaidState, TickOutcome};

/// Owns the simulation state and the input scope of a running raid.
///
/// Dropping the session releases both; a finished raid hands back only its
/// [`RaidResult`], so nothing can tick it again.
#[derive(Resource, Debug)]
pub struct RaidSession {
    state: RaidState,
    input: InputState,
    hud: HudTracker,
    seed: RaidSeed,
    config: RaidConfig,
    elapsed: f32,
    ticks: u64,
}

/// Result of driving one frame
#[derive(Debug)]
pub enum SessionFrame {
    Running {
        session: RaidSession,
        notices: Vec<RaidNotice>,
    },
    Ended(RaidResult),
}

impl RaidSession {
    /// Generate the map for `level` and start a raid on it
    pub fn launch(
        level: &LevelConfig,
        table: &LootTable,
        config: &RaidConfig,
        viewport: Vec2,
    ) -> Result<Self, GenerationError> {
        let seed = config
            .seed
            .map(RaidSeed::new)
            .unwrap_or_else(RaidSeed::from_entropy);
        let mut rng = seed.rng_for(&level.id);
        let map = generation::generate(level, table, &mut rng)?;

        info!(
            "Raid launched: {} seed={} map={}x{} enemies={} loot={}",
            level.id,
            seed.seed,
            level.map_width,
            level.map_height,
            map.enemies.len(),
            map.loot.len()
        );

        let state = RaidState::new(level.clone(), map, config.carry_capacity);
        Ok(Self::from_state(state, seed, config, viewport))
    }

    /// Wrap an already built state
    pub fn from_state(state: RaidState, seed: RaidSeed, config: &RaidConfig, viewport: Vec2) -> Self {
        Self {
            state,
            input: InputState::new(viewport),
            hud: HudTracker::default(),
            seed,
            config: config.clone(),
            elapsed: 0.0,
            ticks: 0,
        }
    }

    pub fn state(&self) -> &RaidState {
        &self.state
    }

    pub fn seed(&self) -> RaidSeed {
        self.seed
    }

    /// Seconds of wall time driven so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn viewport(&self) -> Vec2 {
        self.input.viewport()
    }

    /// Deliver a host input signal; it is consumed at the next frame
    pub fn feed(&mut self, event: InputEvent) {
        self.input.apply(event);
    }

    /// Sample input, advance one tick and collect the notices it raised
    pub fn frame(mut self, dt: f32) -> SessionFrame {
        let snapshot = self.input.sample();
        let step = self.config.step_for(dt);
        match self.state.advance(&snapshot, step) {
            TickOutcome::Running(state) => {
                self.state = state;
                self.elapsed += dt.max(0.0);
                self.ticks += 1;
                let mut notices = Vec::new();
                if self.ticks == 1 {
                    notices.push(RaidNotice::Started {
                        level_id: self.state.level.id.clone(),
                    });
                }
                notices.append(&mut self.state.drain_notices());
                self.hud.observe(&self.state, &mut notices);
                SessionFrame::Running {
                    session: self,
                    notices,
                }
            }
            TickOutcome::Finished(result) => {
                info!(
                    "Raid over after {} ticks: survived={} items={} xp={}",
                    self.ticks + 1,
                    result.survived,
                    result.loot_obtained.len(),
                    result.xp_gained
                );
                SessionFrame::Ended(result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LevelCatalog;
    use crate::constants::{PLAYER_SPEED, TILE_SIZE};
    use crate::generation::{GeneratedMap, TileGrid};
    use crate::input::MoveKey;

    const VIEW: Vec2 = Vec2::new(800.0, 600.0);

    fn corridor() -> RaidSession {
        let grid = TileGrid::from_ascii(&["##########", "#........#", "##########"]);
        let map = GeneratedMap {
            grid,
            spawn: Vec2::new(1.5, 1.5) * TILE_SIZE,
            exit: Vec2::new(8.5, 1.5) * TILE_SIZE,
            enemies: Vec::new(),
            loot: Vec::new(),
        };
        let level = LevelCatalog::builtin().levels[0].clone();
        let config = RaidConfig::default();
        let state = RaidState::new(level, map, config.carry_capacity);
        RaidSession::from_state(state, RaidSeed::new(1), &config, VIEW)
    }

    fn run(session: RaidSession, dt: f32) -> (RaidSession, Vec<RaidNotice>) {
        match session.frame(dt) {
            SessionFrame::Running { session, notices } => (session, notices),
            SessionFrame::Ended(result) => panic!("raid ended early: {result:?}"),
        }
    }

    #[test]
    fn test_launch_is_reproducible() {
        let level = &LevelCatalog::builtin().levels[0];
        let config = RaidConfig {
            seed: Some(42),
            ..Default::default()
        };
        let table = LootTable::builtin();
        let a = RaidSession::launch(level, &table, &config, VIEW).unwrap();
        let b = RaidSession::launch(level, &table, &config, VIEW).unwrap();
        assert_eq!(a.state().grid, b.state().grid);
        assert_eq!(a.state().exit.body.pos, b.state().exit.body.pos);
        assert_eq!(a.seed(), RaidSeed::new(42));
    }

    #[test]
    fn test_first_frame_reports_hud() {
        let (_, notices) = run(corridor(), 1.0 / 60.0);
        assert!(matches!(&notices[0], RaidNotice::Started { level_id } if level_id == "level_1"));
        assert!(notices.contains(&RaidNotice::HpChanged { hp: 100 }));
        assert!(notices.contains(&RaidNotice::InventoryChanged { count: 0 }));
    }

    #[test]
    fn test_unchanged_hud_is_quiet() {
        let (session, _) = run(corridor(), 1.0 / 60.0);
        let (_, notices) = run(session, 1.0 / 60.0);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_held_key_persists_across_frames() {
        let mut session = corridor();
        let start = session.state().player_pos();
        session.feed(InputEvent::KeyDown(MoveKey::Right));
        let (session, _) = run(session, 1.0 / 60.0);
        let (session, _) = run(session, 1.0 / 60.0);
        let moved = session.state().player_pos().x - start.x;
        assert!((moved - 7.0).abs() < 1e-3, "moved {moved}");
        assert_eq!(session.ticks(), 2);
    }

    #[test]
    fn test_hitch_is_clamped() {
        let mut session = corridor();
        let start = session.state().player_pos();
        session.feed(InputEvent::KeyDown(MoveKey::Right));
        // A one-second stall advances at most three nominal ticks
        let (session, _) = run(session, 1.0);
        let moved = session.state().player_pos().x - start.x;
        assert!((moved - 3.0 * PLAYER_SPEED).abs() < 1e-3, "moved {moved}");
    }

    #[test]
    fn test_walk_to_exit_ends_once() {
        let mut session = corridor();
        session.feed(InputEvent::KeyDown(MoveKey::Right));
        for _ in 0..200 {
            match session.frame(1.0 / 60.0) {
                SessionFrame::Running { session: next, .. } => session = next,
                SessionFrame::Ended(result) => {
                    assert!(result.survived);
                    assert_eq!(result.xp_gained, 500);
                    return;
                }
            }
        }
        panic!("never reached the exit");
    }
}
