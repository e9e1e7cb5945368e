//! Game loop driver.
//!
//! Bevy's schedule supplies the per-frame callback. A raid is running exactly
//! while a [`RaidSession`] resource exists: every system that touches it is
//! gated on that resource, and the frame system removes it before stepping.
//! A finished raid is never re-inserted, which stops scheduling and drops the
//! session's input scope in one move.

pub mod present;
pub mod session;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::catalog::{LevelCatalog, LevelConfig};
use crate::config::RaidConfig;
use crate::input::keyboard::capture_input;
use crate::loot::LootTable;
use crate::sim::{RaidNotice, RaidResult};

pub use present::ScenePresentPlugin;
pub use session::{RaidSession, SessionFrame};

/// Surface size assumed when no window is available
pub const HEADLESS_VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

/// Read-only catalogs handed to every launch
#[derive(Resource, Debug, Clone, Default)]
pub struct RaidCatalogs {
    pub levels: LevelCatalog,
    pub loot: LootTable,
}

/// Start a raid on the given level
#[derive(Event, Debug, Clone)]
pub struct LaunchRaid(pub LevelConfig);

/// Sent exactly once per raid that reaches a terminal state
#[derive(Event, Debug, Clone)]
pub struct RaidEnded(pub RaidResult);

/// Tear down the running raid without a result
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct AbortRaid;

#[derive(Event, Debug, Clone)]
pub struct RaidNoticeEvent(pub RaidNotice);

#[derive(Default)]
pub struct RaidPlugin {
    pub config: RaidConfig,
}

impl Plugin for RaidPlugin {
    fn build(&self, app: &mut App) {
        let config = match self.config.validate() {
            Ok(()) => self.config.clone(),
            Err(e) => {
                warn!("Raid config rejected ({}), using defaults", e);
                RaidConfig::default()
            }
        };
        app.insert_resource(config)
            .init_resource::<RaidCatalogs>()
            .add_event::<LaunchRaid>()
            .add_event::<RaidEnded>()
            .add_event::<AbortRaid>()
            .add_event::<RaidNoticeEvent>()
            .add_systems(
                Update,
                (
                    abort_raid,
                    launch_raid,
                    capture_input.run_if(resource_exists::<RaidSession>),
                    run_raid_frame.run_if(resource_exists::<RaidSession>),
                )
                    .chain(),
            );
    }
}

fn launch_raid(
    mut commands: Commands,
    mut launches: EventReader<LaunchRaid>,
    catalogs: Res<RaidCatalogs>,
    config: Res<RaidConfig>,
    running: Option<Res<RaidSession>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let mut busy = running.is_some();
    for LaunchRaid(level) in launches.read() {
        if busy {
            warn!("Launch of {} ignored: a raid is already running", level.id);
            continue;
        }
        let viewport = windows
            .get_single()
            .map(|w| Vec2::new(w.width(), w.height()))
            .unwrap_or(HEADLESS_VIEWPORT);
        match RaidSession::launch(level, &catalogs.loot, &config, viewport) {
            Ok(session) => {
                commands.insert_resource(session);
                busy = true;
            }
            Err(e) => warn!("Launch of {} rejected: {}", level.id, e),
        }
    }
}

fn abort_raid(
    mut commands: Commands,
    mut aborts: EventReader<AbortRaid>,
    running: Option<Res<RaidSession>>,
) {
    if aborts.read().count() == 0 {
        return;
    }
    if let Some(session) = running {
        warn!(
            "Raid on {} aborted after {} ticks",
            session.state().level.id,
            session.ticks()
        );
        commands.remove_resource::<RaidSession>();
    }
}

/// Advance the running raid by one tick.
///
/// Exclusive so the session can be taken out of the world by value; it goes
/// back in only while the raid is still running.
pub fn run_raid_frame(world: &mut World) {
    let Some(session) = world.remove_resource::<RaidSession>() else {
        return;
    };
    let dt = world
        .get_resource::<Time>()
        .map(|time| time.delta_secs())
        .unwrap_or(0.0);

    match session.frame(dt) {
        SessionFrame::Running { session, notices } => {
            world.insert_resource(session);
            for notice in notices {
                world.send_event(RaidNoticeEvent(notice));
            }
        }
        SessionFrame::Ended(result) => {
            world.send_event(RaidEnded(result));
        }
    }
}
