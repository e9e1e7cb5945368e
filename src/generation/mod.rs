//! Map generation.
//!
//! A level definition plus an injected random source produce a
//! [`GeneratedMap`]: the carved tile grid, the spawn and exit points and the
//! initial enemy and loot placements. Production code seeds the source from
//! [`RaidSeed`], tests hand in a fixed-seed `Xoshiro256PlusPlus`.

pub mod cave;
pub mod survey;

use bevy::math::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::f32::consts::TAU;
use tracing::debug;

use crate::catalog::{CatalogError, LevelConfig};
use crate::constants::TILE_SIZE;
use crate::loot::{ItemIdMint, LootTable, LootTableError};
use crate::sim::entity::{Enemy, LootDrop};

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    InvalidLevel(#[from] CatalogError),
    #[error(transparent)]
    InvalidLootTable(#[from] LootTableError),
    #[error("Level '{level_id}' carved no floor tile outside the spawn area for the exit")]
    NoExitTile { level_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Floor,
    Wall,
}

/// Integer tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: usize,
    pub y: usize,
}

impl TilePos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// World-space center of this tile
    pub fn center(self) -> Vec2 {
        Vec2::new(
            self.x as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            self.y as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        )
    }
}

/// Row-major tile grid. Immutable once generation hands it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl TileGrid {
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Self {
            width,
            height,
            cells: vec![tile; width * height],
        }
    }

    /// Build from rows of `#` (wall) and `.` (floor). Handy for fixtures.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut grid = Self::filled(width, height, Tile::Wall);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '.' {
                    grid.set(TilePos::new(x, y), Tile::Floor);
                }
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn center(&self) -> TilePos {
        TilePos::new(self.width / 2, self.height / 2)
    }

    pub fn get(&self, pos: TilePos) -> Option<Tile> {
        if pos.x < self.width && pos.y < self.height {
            Some(self.cells[pos.y * self.width + pos.x])
        } else {
            None
        }
    }

    /// Set a cell. Returns true if the cell changed.
    pub fn set(&mut self, pos: TilePos, tile: Tile) -> bool {
        if pos.x >= self.width || pos.y >= self.height {
            return false;
        }
        let cell = &mut self.cells[pos.y * self.width + pos.x];
        let changed = *cell != tile;
        *cell = tile;
        changed
    }

    pub fn is_floor(&self, pos: TilePos) -> bool {
        self.get(pos) == Some(Tile::Floor)
    }

    /// Tile under a world-space point, if it lies on the grid
    pub fn tile_at(&self, world: Vec2) -> Option<TilePos> {
        let tx = (world.x / TILE_SIZE).floor();
        let ty = (world.y / TILE_SIZE).floor();
        if tx < 0.0 || ty < 0.0 || tx >= self.width as f32 || ty >= self.height as f32 {
            return None;
        }
        Some(TilePos::new(tx as usize, ty as usize))
    }

    /// Collision query. Anything off the grid counts as solid.
    pub fn blocks(&self, world: Vec2) -> bool {
        match self.tile_at(world) {
            Some(pos) => !self.is_floor(pos),
            None => true,
        }
    }

    pub fn floor_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Tile::Floor).count()
    }

    /// Floor tiles in row-major order
    pub fn floor_tiles(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Tile::Floor)
            .map(|(i, _)| TilePos::new(i % self.width, i / self.width))
    }

    /// 4-neighbours that lie on the grid
    pub fn neighbours(&self, pos: TilePos) -> impl Iterator<Item = TilePos> + '_ {
        let TilePos { x, y } = pos;
        [
            (x.checked_sub(1), Some(y)),
            (Some(x + 1), Some(y)),
            (Some(x), y.checked_sub(1)),
            (Some(x), Some(y + 1)),
        ]
        .into_iter()
        .filter_map(|(nx, ny)| Some(TilePos::new(nx?, ny?)))
        .filter(|p| p.x < self.width && p.y < self.height)
    }
}

/// Everything the raid session needs to start
#[derive(Debug, Clone)]
pub struct GeneratedMap {
    pub grid: TileGrid,
    pub spawn: Vec2,
    pub exit: Vec2,
    pub enemies: Vec<Enemy>,
    pub loot: Vec<LootDrop>,
}

/// Master seed. Each level derives its own stream from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidSeed {
    pub seed: u64,
}

impl RaidSeed {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self {
            seed: rand::thread_rng().gen(),
        }
    }

    /// Deterministic per-level hash from master seed and level id
    pub fn level_hash(&self, level_id: &str) -> u64 {
        let mut hasher = Sha3_256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(level_id.as_bytes());
        let result = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&result[..8]);
        u64::from_le_bytes(head)
    }

    pub fn rng_for(&self, level_id: &str) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(self.level_hash(level_id))
    }
}

/// Carve a map for `level` and place exit, enemies and loot on it.
pub fn generate<R: Rng + ?Sized>(
    level: &LevelConfig,
    table: &LootTable,
    rng: &mut R,
) -> Result<GeneratedMap, GenerationError> {
    level.validate()?;
    table.validate()?;

    let width = level.map_width as usize;
    let height = level.map_height as usize;
    let required = 1 + level.enemy_count_min as usize + level.loot_count_min as usize;

    let carved = cave::carve(width, height, required, rng);
    let grid = carved.grid;
    let spawn = grid.center().center();

    let keep_clear = cave::spawn_clear_radius(width, height);
    let mut pool: Vec<TilePos> = grid
        .floor_tiles()
        .filter(|pos| cave::outside_spawn_area(*pos, width, height, keep_clear))
        .collect();
    pool.shuffle(rng);

    let exit = pool
        .pop()
        .ok_or_else(|| GenerationError::NoExitTile {
            level_id: level.id.clone(),
        })?
        .center();

    let enemy_target = rng.gen_range(level.enemy_count_min..=level.enemy_count_max) as usize;
    let mut enemies = Vec::with_capacity(enemy_target);
    for _ in 0..enemy_target {
        let Some(tile) = pool.pop() else { break };
        let facing = rng.gen_range(0.0..TAU);
        enemies.push(Enemy::spawn(tile.center(), level.difficulty, facing));
    }

    let loot_target = rng.gen_range(level.loot_count_min..=level.loot_count_max) as usize;
    let mut mint = ItemIdMint::default();
    let mut loot = Vec::with_capacity(loot_target);
    for _ in 0..loot_target {
        let Some(tile) = pool.pop() else { break };
        let Some(template) = table.sample(rng) else { break };
        let item = template.instance(mint.mint(rng));
        loot.push(LootDrop::new(tile.center(), item));
    }

    debug!(
        "Generated '{}': {}x{} floor={} steps={} enemies={}/{} loot={}/{} pool_left={}",
        level.id,
        width,
        height,
        grid.floor_count(),
        carved.steps,
        enemies.len(),
        enemy_target,
        loot.len(),
        loot_target,
        pool.len()
    );

    Ok(GeneratedMap {
        grid,
        spawn,
        exit,
        enemies,
        loot,
    })
}
