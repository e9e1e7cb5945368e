//! Intent resolution and wall sliding.

use bevy::math::Vec2;

use crate::constants::DIAGONAL_SCALE;
use crate::generation::TileGrid;
use crate::input::HeldKeys;

/// Unit-speed movement intent from held keys. Diagonals are scaled by
/// 1/sqrt(2) on both axes; opposing keys cancel. Screen y grows downward.
pub fn intent(held: &HeldKeys) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if held.up {
        dir.y -= 1.0;
    }
    if held.down {
        dir.y += 1.0;
    }
    if held.left {
        dir.x -= 1.0;
    }
    if held.right {
        dir.x += 1.0;
    }
    if dir.x != 0.0 && dir.y != 0.0 {
        dir *= DIAGONAL_SCALE;
    }
    dir
}

/// Apply `delta` one axis at a time, each only if its destination is open.
/// Blocked on one axis still lets the other axis through.
pub fn slide(grid: &TileGrid, pos: Vec2, delta: Vec2) -> Vec2 {
    let mut out = pos;
    if !grid.blocks(Vec2::new(out.x + delta.x, out.y)) {
        out.x += delta.x;
    }
    if !grid.blocks(Vec2::new(out.x, out.y + delta.y)) {
        out.y += delta.y;
    }
    out
}
