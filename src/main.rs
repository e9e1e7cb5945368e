use anyhow::{Context, Result};
use bevy::prelude::*;
use std::path::PathBuf;

use raid_core::config::RaidConfig;
use raid_core::engine::{LaunchRaid, RaidCatalogs, RaidEnded, RaidPlugin, ScenePresentPlugin};
use raid_core::logging::{self, LoggingPlugin};

/// Level id to play, chosen on the command line
#[derive(Resource)]
struct PendingLaunch(String);

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let level_id = args.next().unwrap_or_else(|| "level_1".to_string());
    let config = match args.next().map(PathBuf::from) {
        Some(path) => RaidConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RaidConfig::default(),
    };

    logging::init_tracing(&config.tracing);

    let catalogs = RaidCatalogs::default();
    catalogs
        .levels
        .get(&level_id)
        .with_context(|| format!("choosing level '{level_id}'"))?;

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Panda Extraction - Raid".into(),
                        resolution: (1280., 720.).into(),
                        ..default()
                    }),
                    ..default()
                })
                // Our own subscriber is already installed
                .disable::<bevy::log::LogPlugin>(),
        )
        .add_plugins(LoggingPlugin {
            config: config.tracing.clone(),
        })
        .add_plugins(RaidPlugin { config })
        .add_plugins(ScenePresentPlugin)
        .insert_resource(catalogs)
        .insert_resource(PendingLaunch(level_id))
        .add_systems(Startup, launch_pending)
        .add_systems(Update, exit_on_result)
        .run();

    Ok(())
}

fn launch_pending(
    pending: Res<PendingLaunch>,
    catalogs: Res<RaidCatalogs>,
    mut launches: EventWriter<LaunchRaid>,
) {
    match catalogs.levels.get(&pending.0) {
        Ok(level) => {
            launches.send(LaunchRaid(level.clone()));
        }
        Err(e) => error!("{}", e),
    }
}

fn exit_on_result(mut results: EventReader<RaidEnded>, mut exit: EventWriter<AppExit>) {
    for RaidEnded(result) in results.read() {
        match result.to_json() {
            Ok(json) => info!("Raid result: {}", json),
            Err(e) => error!("Could not serialise raid result: {}", e),
        }
        info!(
            "Loot value ${} weight {:.1} kg",
            result.total_value(),
            result.total_weight()
        );
        exit.send(AppExit::Success);
    }
}
