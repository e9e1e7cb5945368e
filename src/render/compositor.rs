//! Camera-relative scene building.
//!
//! The camera centers the player. Only tiles inside the viewport plus a
//! two-tile margin are emitted. Walls, characters, loot and the exit share
//! one layer sorted by the world y of their visual base (stable, so equal
//! keys keep walls first); projectiles always draw above it.

use bevy::math::Vec2;

use super::sprites;
use super::{DepthItem, DepthKind, DrawOp, Scene, Shape, SurfaceSize, Vignette};
use crate::catalog::Rgba;
use crate::constants::*;
use crate::generation::{Tile, TilePos};
use crate::sim::{EntityRef, RaidState};

/// Inclusive-exclusive tile window to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileWindow {
    pub cols: (usize, usize),
    pub rows: (usize, usize),
}

/// Tiles overlapping the viewport around `focus`, padded by the margin and
/// clipped to the grid
pub fn visible_tiles(focus: Vec2, size: SurfaceSize, grid_w: usize, grid_h: usize) -> TileWindow {
    let span = |focus: f32, extent: u32, limit: usize| {
        let extent = extent as f32;
        let start = ((focus - extent / 2.0) / TILE_SIZE).floor() as i64 - VIEWPORT_MARGIN_TILES as i64;
        let end = start + (extent / TILE_SIZE).ceil() as i64 + 2 * VIEWPORT_MARGIN_TILES as i64;
        let clip = |v: i64| v.clamp(0, limit as i64) as usize;
        (clip(start), clip(end))
    };
    TileWindow {
        cols: span(focus.x, size.width, grid_w),
        rows: span(focus.y, size.height, grid_h),
    }
}

/// Build the frame for `state` on a surface of `size`.
/// `elapsed` (seconds) drives the exit pulse.
pub fn compose(state: &RaidState, size: SurfaceSize, elapsed: f32, view_distance: f32) -> Scene {
    let focus = state.player_pos();
    let offset = size.center() - focus;
    let to_screen = |world: Vec2| world + offset;

    let grid = &state.grid;
    let window = visible_tiles(focus, size, grid.width(), grid.height());
    let texture = Rgba::WHITE.with_alpha(0.02);

    let mut floor = Vec::new();
    let mut layer = Vec::new();
    for y in window.rows.0..window.rows.1 {
        for x in window.cols.0..window.cols.1 {
            let corner = to_screen(Vec2::new(x as f32, y as f32) * TILE_SIZE);
            match grid.get(TilePos::new(x, y)) {
                Some(Tile::Floor) => {
                    floor.push(DrawOp::fill(
                        Shape::Rect {
                            min: corner,
                            size: Vec2::splat(TILE_SIZE + 1.0),
                        },
                        state.level.floor_color,
                    ));
                    if (x + y) % 2 == 0 {
                        floor.push(DrawOp::fill(
                            Shape::Rect {
                                min: corner,
                                size: Vec2::splat(TILE_SIZE),
                            },
                            texture,
                        ));
                    }
                }
                Some(Tile::Wall) => layer.push(DepthItem {
                    depth: (y + 1) as f32 * TILE_SIZE,
                    kind: DepthKind::Wall,
                    ops: sprites::wall_block(corner, state.level.wall_color),
                }),
                None => {}
            }
        }
    }

    let mut projectiles = Vec::new();
    for entity in state.entities() {
        let body = entity.body();
        let screen = to_screen(body.pos);
        let (kind, ops) = match entity {
            EntityRef::Player(p) => (
                DepthKind::Player,
                sprites::panda(screen, body.radius, p.vitals.facing),
            ),
            EntityRef::Enemy(e) => (
                DepthKind::Enemy,
                sprites::duck(screen, body.radius, e.vitals.facing, e.vitals.fraction()),
            ),
            EntityRef::Loot(l) => {
                let near = focus.distance(body.pos) < LOOT_LABEL_DISTANCE;
                let name = near.then_some(l.item.name.as_str());
                (DepthKind::Loot, sprites::loot_marker(screen, body.color, name))
            }
            EntityRef::Exit(_) => (
                DepthKind::Exit,
                sprites::exit_beacon(screen, body.radius, elapsed),
            ),
            EntityRef::Projectile(_) => {
                projectiles.push(DrawOp::fill(
                    Shape::Circle {
                        center: screen,
                        radius: body.radius,
                    },
                    body.color,
                ));
                continue;
            }
        };
        layer.push(DepthItem {
            depth: entity.depth(),
            kind,
            ops,
        });
    }

    layer.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    Scene {
        size,
        clear: Rgba::BLACK,
        floor,
        layer,
        projectiles,
        vignette: Vignette::fog(size.center(), FOG_INNER_RADIUS, view_distance),
    }
}
