//! Connectivity survey.
//!
//! The cave walk makes no promise that the exit can be reached from spawn.
//! This module measures how often it can: it generates many maps for one
//! level in parallel (rayon) and flood-fills each from the spawn tile.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::collections::VecDeque;

use super::{generate, GenerationError, TileGrid, TilePos};
use crate::catalog::LevelConfig;
use crate::loot::LootTable;

/// Per-map measurements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapSample {
    pub exit_reachable: bool,
    /// Fraction of floor tiles reachable from spawn
    pub reachable_share: f32,
    /// Fraction of the grid that is floor
    pub floor_share: f32,
    pub enemies: usize,
    pub loot: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityReport {
    pub level_id: String,
    pub samples: usize,
    /// Maps the generator refused (no exit tile)
    pub failures: usize,
    pub exit_reachable_rate: f32,
    pub mean_reachable_share: f32,
    pub mean_floor_share: f32,
    pub mean_enemies: f32,
    pub mean_loot: f32,
}

impl ConnectivityReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Tiles reachable from `start` through 4-connected floor
pub fn reachable_from(grid: &TileGrid, start: TilePos) -> Vec<bool> {
    let mut seen = vec![false; grid.width() * grid.height()];
    if !grid.is_floor(start) {
        return seen;
    }
    let index = |p: TilePos| p.y * grid.width() + p.x;
    let mut queue = VecDeque::from([start]);
    seen[index(start)] = true;
    while let Some(pos) = queue.pop_front() {
        for next in grid.neighbours(pos) {
            if grid.is_floor(next) && !seen[index(next)] {
                seen[index(next)] = true;
                queue.push_back(next);
            }
        }
    }
    seen
}

fn sample_seed(base_seed: u64, index: u64) -> u64 {
    let mut hasher = Sha3_256::new();
    hasher.update(base_seed.to_le_bytes());
    hasher.update(index.to_le_bytes());
    let result = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&result[..8]);
    u64::from_le_bytes(head)
}

fn measure(
    level: &LevelConfig,
    table: &LootTable,
    seed: u64,
) -> Result<MapSample, GenerationError> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let map = generate(level, table, &mut rng)?;
    let grid = &map.grid;

    let reach = reachable_from(grid, grid.center());
    let reachable = reach.iter().filter(|r| **r).count();
    let floor = grid.floor_count();
    let exit_reachable = grid
        .tile_at(map.exit)
        .map(|t| reach[t.y * grid.width() + t.x])
        .unwrap_or(false);

    Ok(MapSample {
        exit_reachable,
        reachable_share: reachable as f32 / floor.max(1) as f32,
        floor_share: floor as f32 / (grid.width() * grid.height()).max(1) as f32,
        enemies: map.enemies.len(),
        loot: map.loot.len(),
    })
}

/// Generate `samples` maps for `level` in parallel and summarise them
pub fn survey_connectivity(
    level: &LevelConfig,
    table: &LootTable,
    base_seed: u64,
    samples: usize,
) -> Result<ConnectivityReport, GenerationError> {
    level.validate()?;

    let results: Vec<Option<MapSample>> = (0..samples as u64)
        .into_par_iter()
        .map(|i| measure(level, table, sample_seed(base_seed, i)).ok())
        .collect();

    let ok: Vec<MapSample> = results.iter().flatten().copied().collect();
    let n = ok.len().max(1) as f32;
    let mean = |f: fn(&MapSample) -> f32| ok.iter().map(f).sum::<f32>() / n;

    let report = ConnectivityReport {
        level_id: level.id.clone(),
        samples,
        failures: samples - ok.len(),
        exit_reachable_rate: mean(|s| if s.exit_reachable { 1.0 } else { 0.0 }),
        mean_reachable_share: mean(|s| s.reachable_share),
        mean_floor_share: mean(|s| s.floor_share),
        mean_enemies: mean(|s| s.enemies as f32),
        mean_loot: mean(|s| s.loot as f32),
    };
    tracing::info!(
        "Connectivity survey '{}': {} maps, exit reachable {:.1}%, failures {}",
        report.level_id,
        samples,
        report.exit_reachable_rate * 100.0,
        report.failures
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LevelCatalog;

    #[test]
    fn test_flood_fill_stops_at_walls() {
        let grid = TileGrid::from_ascii(&[
            "#######", //
            "#..#..#", //
            "#..#..#", //
            "#######",
        ]);
        let reach = reachable_from(&grid, TilePos::new(1, 1));
        assert_eq!(reach.iter().filter(|r| **r).count(), 4);
        assert!(!reach[grid.width() + 4]);
    }

    #[test]
    fn test_flood_fill_from_wall_is_empty() {
        let grid = TileGrid::from_ascii(&["#.", ".."]);
        assert!(reachable_from(&grid, TilePos::new(0, 0)).iter().all(|r| !r));
    }

    #[test]
    fn test_survey_is_deterministic() {
        let level = LevelCatalog::builtin().levels[0].clone();
        let table = LootTable::builtin();
        let a = survey_connectivity(&level, &table, 42, 32).unwrap();
        let b = survey_connectivity(&level, &table, 42, 32).unwrap();
        assert_eq!(a.exit_reachable_rate, b.exit_reachable_rate);
        assert_eq!(a.mean_floor_share, b.mean_floor_share);
    }

    #[test]
    fn test_walk_mostly_connects_spawn_and_exit() {
        let level = LevelCatalog::builtin().levels[0].clone();
        let table = LootTable::builtin();
        let report = survey_connectivity(&level, &table, 7, 64).unwrap();
        assert_eq!(report.failures, 0);
        assert!(
            report.exit_reachable_rate > 0.8,
            "exit reachable in only {:.2} of maps",
            report.exit_reachable_rate
        );
        assert!(report.mean_enemies >= 5.0 && report.mean_enemies <= 8.0);
    }
}
