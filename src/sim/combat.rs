//! Projectile flight and hits.

use tracing::debug;

use super::entity::{Enemy, Projectile};
use crate::constants::{KNOCKBACK_FACTOR, PROJECTILE_DAMAGE};
use crate::generation::TileGrid;

/// Move every projectile by `velocity * step`. A projectile that ends up in
/// a wall (or off the grid) is removed. One that overlaps a live enemy
/// deals its damage, shoves the enemy along its velocity and is removed.
/// Enemies brought to 0 hp are removed at the end. Returns the kill count.
pub fn advance_projectiles(
    grid: &TileGrid,
    projectiles: &mut Vec<Projectile>,
    enemies: &mut Vec<Enemy>,
    step: f32,
) -> usize {
    let mut kills = 0;

    projectiles.retain_mut(|shot| {
        shot.body.pos += shot.velocity * step;
        if grid.blocks(shot.body.pos) {
            return false;
        }

        let Some(enemy) = enemies
            .iter_mut()
            .find(|e| !e.dead && e.body.touches(&shot.body, 0.0))
        else {
            return true;
        };

        enemy.vitals.take_damage(PROJECTILE_DAMAGE);
        enemy.body.pos += shot.velocity * KNOCKBACK_FACTOR;
        if enemy.vitals.is_depleted() {
            enemy.dead = true;
            kills += 1;
        }
        false
    });

    if kills > 0 {
        enemies.retain(|e| !e.dead);
        debug!("{} enemies down, {} remaining", kills, enemies.len());
    }
    kills
}
