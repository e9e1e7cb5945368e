//! Drunkard's-walk cave carver.
//!
//! The walker starts on the center tile and takes `0.6 * w * h` (rounded up) random
//! cardinal steps, staying two tiles off the border. After each step it may
//! also open the cells below and right of itself, which widens corridors.
//! When a small map has not opened enough tiles outside the spawn area for
//! the requested placements, the walk keeps going (same rules) up to a hard
//! cap. Connectivity between spawn and any given tile is likely but not
//! guaranteed; see [`super::survey`].

use rand::Rng;

use super::{Tile, TileGrid, TilePos};
use crate::constants::*;

#[derive(Debug, Clone)]
pub struct CarvedCave {
    pub grid: TileGrid,
    /// Walk iterations actually taken
    pub steps: usize,
}

/// Nominal walk length for a grid
pub fn nominal_steps(width: usize, height: usize) -> usize {
    (width * height * WALK_STEP_PERCENT).div_ceil(100)
}

/// Half-width of the keep-clear square around spawn, shrunk on small maps so
/// some of the walkable area is always eligible for placement. Never below 1:
/// the spawn tile and its neighbours are always excluded.
pub fn spawn_clear_radius(width: usize, height: usize) -> usize {
    SPAWN_CLEAR_RADIUS
        .min((width.min(height) / 2).saturating_sub(3))
        .max(1)
}

/// Whether `pos` lies outside the keep-clear square. The square is centered
/// on the grid's geometric midpoint, so it is symmetric on odd and even maps.
pub fn outside_spawn_area(pos: TilePos, width: usize, height: usize, radius: usize) -> bool {
    let dx = (2 * pos.x).abs_diff(width);
    let dy = (2 * pos.y).abs_diff(height);
    dx > 2 * radius || dy > 2 * radius
}

/// Run the walk. `min_candidates` is the pool size (tiles outside the spawn
/// area) the caller needs; it only matters once the nominal steps run out.
pub fn carve<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    min_candidates: usize,
    rng: &mut R,
) -> CarvedCave {
    let mut grid = TileGrid::filled(width, height, Tile::Wall);
    let keep_clear = spawn_clear_radius(width, height);
    let nominal = nominal_steps(width, height);
    let cap = nominal * WALK_EXTENSION_CAP;

    let lo = WALK_BORDER_MARGIN;
    let hi_x = width.saturating_sub(WALK_BORDER_MARGIN + 1);
    let hi_y = height.saturating_sub(WALK_BORDER_MARGIN + 1);

    let open = |grid: &mut TileGrid, pos: TilePos, pool: &mut usize| {
        if grid.set(pos, Tile::Floor) && outside_spawn_area(pos, width, height, keep_clear) {
            *pool += 1;
        }
    };

    let mut walker = grid.center();
    let mut pool = 0usize;
    let mut steps = 0;
    while steps < cap && (steps < nominal || pool < min_candidates) {
        open(&mut grid, walker, &mut pool);

        match rng.gen_range(0..4) {
            0 if walker.y > lo => walker.y -= 1,
            1 if walker.y < hi_y => walker.y += 1,
            2 if walker.x > lo => walker.x -= 1,
            3 if walker.x < hi_x => walker.x += 1,
            _ => {}
        }

        if rng.gen_bool(CORRIDOR_WIDEN_CHANCE) {
            if walker.y + 1 < height - 1 {
                open(&mut grid, TilePos::new(walker.x, walker.y + 1), &mut pool);
            }
            if walker.x + 1 < width - 1 {
                open(&mut grid, TilePos::new(walker.x + 1, walker.y), &mut pool);
            }
        }
        steps += 1;
    }

    CarvedCave { grid, steps }
}
