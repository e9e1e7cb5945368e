//! Centralized raid constants.
//!
//! Speeds, damage and impulses are expressed per nominal tick (60 Hz). The
//! update engine multiplies them by the frame's step scale, so a 60 Hz host
//! sees exactly these values each tick.
//! Per-module tables (levels, loot) stay in their own modules.

use crate::catalog::Rgba;

// =====================================================
// World
// =====================================================

/// Edge length of one grid tile in world pixels
pub const TILE_SIZE: f32 = 48.0;

/// Wall extrusion height used by the compositor (fraction of a tile)
pub const WALL_HEIGHT: f32 = TILE_SIZE * 0.6;

// =====================================================
// Map Generation
// =====================================================

/// Random-walk length as a percentage of the grid area
pub const WALK_STEP_PERCENT: usize = 60;

/// Hard cap on the extended walk, as a multiple of the nominal step count
pub const WALK_EXTENSION_CAP: usize = 8;

/// The walker never moves closer than this to the grid border
pub const WALK_BORDER_MARGIN: usize = 2;

/// Chance per step to also clear the cells below and right of the walker
pub const CORRIDOR_WIDEN_CHANCE: f64 = 0.3;

/// Half-width (in tiles) of the spawn keep-clear square on full-size maps
pub const SPAWN_CLEAR_RADIUS: usize = 3;

/// Smallest accepted map edge in tiles
pub const MIN_MAP_EDGE: u32 = 7;

/// Enemy hp = ENEMY_BASE_HP + ENEMY_HP_PER_DIFFICULTY * difficulty
pub const ENEMY_BASE_HP: f32 = 30.0;
pub const ENEMY_HP_PER_DIFFICULTY: f32 = 10.0;

// =====================================================
// Player
// =====================================================

pub const PLAYER_MAX_HP: f32 = 100.0;
pub const PLAYER_RADIUS: f32 = 14.0;
pub const PLAYER_SPEED: f32 = 3.5;

/// Diagonal input is scaled by this on both axes (1/sqrt 2)
pub const DIAGONAL_SCALE: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Default backpack weight budget in kg
pub const DEFAULT_CARRY_CAPACITY: f32 = 20.0;

/// Extra reach added to player + loot radii when picking up
pub const PICKUP_REACH: f32 = 20.0;

// =====================================================
// Enemies
// =====================================================

pub const ENEMY_RADIUS: f32 = 16.0;
pub const ENEMY_SPEED: f32 = 2.0;

/// Enemies stop advancing once this close to the player
pub const CHASE_MIN_DISTANCE: f32 = 25.0;

/// Enemies ignore players farther than this
pub const CHASE_MAX_DISTANCE: f32 = 300.0;

/// Contact range margin on top of the two radii
pub const CONTACT_MARGIN: f32 = 5.0;

/// Chip damage dealt to the player per tick of contact
pub const CONTACT_DAMAGE: f32 = 0.5;

// =====================================================
// Projectiles
// =====================================================

pub const PROJECTILE_SPEED: f32 = 12.0;
pub const PROJECTILE_RADIUS: f32 = 3.0;
pub const PROJECTILE_DAMAGE: f32 = 10.0;

/// Knockback = projectile velocity * KNOCKBACK_FACTOR, added to the enemy position
pub const KNOCKBACK_FACTOR: f32 = 0.5;

// =====================================================
// Loot & Exit
// =====================================================

pub const LOOT_RADIUS: f32 = 12.0;
pub const EXIT_RADIUS: f32 = 20.0;

/// Loot labels appear when the player is closer than this
pub const LOOT_LABEL_DISTANCE: f32 = 60.0;

// =====================================================
// Rewards
// =====================================================

pub const XP_PER_DIFFICULTY: u32 = 500;
pub const XP_PER_REMAINING_ENEMY: u32 = 10;

// =====================================================
// Rendering
// =====================================================

/// Fog of war is fully transparent inside this screen radius
pub const FOG_INNER_RADIUS: f32 = 50.0;

/// Default fog radius at which the screen turns opaque black
pub const VIEW_DISTANCE: f32 = 350.0;

/// Extra tiles drawn around the viewport
pub const VIEWPORT_MARGIN_TILES: i32 = 2;

pub const COLOR_PLAYER_BODY: Rgba = Rgba::rgb(0xFF, 0xFF, 0xFF);
pub const COLOR_PLAYER_ACCENT: Rgba = Rgba::rgb(0x1F, 0x29, 0x37);
pub const COLOR_ENEMY_BODY: Rgba = Rgba::rgb(0xFC, 0xD3, 0x4D);
pub const COLOR_ENEMY_BEAK: Rgba = Rgba::rgb(0xF9, 0x73, 0x16);
pub const COLOR_ENEMY_WING: Rgba = Rgba::rgb(0xF5, 0x9E, 0x0B);
pub const COLOR_WALL_TOP: Rgba = Rgba::rgb(0x47, 0x55, 0x69);
pub const COLOR_EXIT: Rgba = Rgba::rgb(0x22, 0xC5, 0x5E);
pub const COLOR_PROJECTILE: Rgba = Rgba::rgb(0xF5, 0x9E, 0x0B);
pub const COLOR_HEALTH_BACK: Rgba = Rgba::rgb(0xFF, 0x00, 0x00);
pub const COLOR_HEALTH_FILL: Rgba = Rgba::rgb(0x00, 0x80, 0x00);
