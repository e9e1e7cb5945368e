//! Duck AI: face the player, close in while in range, peck on contact.

use bevy::math::Vec2;

use super::entity::{Enemy, Player};
use super::movement::slide;
use crate::constants::*;
use crate::generation::TileGrid;

/// Run one tick of pursuit for every enemy. Returns the total chip damage
/// dealt to the player.
pub fn pursue(grid: &TileGrid, enemies: &mut [Enemy], player: &mut Player, step: f32) -> f32 {
    let mut dealt = 0.0;
    for enemy in enemies.iter_mut() {
        let to_player = player.body.pos - enemy.body.pos;
        let dist = to_player.length();
        enemy.vitals.facing = to_player.y.atan2(to_player.x);

        if dist > CHASE_MIN_DISTANCE && dist < CHASE_MAX_DISTANCE {
            let delta = Vec2::from_angle(enemy.vitals.facing) * enemy.vitals.speed * step;
            enemy.body.pos = slide(grid, enemy.body.pos, delta);
        }

        // Distance is measured before this tick's advance
        if dist < player.body.radius + enemy.body.radius + CONTACT_MARGIN {
            dealt += player.vitals.take_damage(CONTACT_DAMAGE * step);
        }
    }
    dealt
}
