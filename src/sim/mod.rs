//! Raid simulation.
//!
//! Pure state and tick logic, no ECS. One tick runs, in order: input
//! resolution, player movement with wall sliding, facing, projectiles,
//! enemy pursuit, terminal checks, then the interact and fire actions.
//! Everything here is per nominal tick and scaled by the caller's step.

pub mod ai;
pub mod backpack;
pub mod combat;
pub mod entity;
pub mod movement;
pub mod state;
pub mod update;

pub use backpack::Backpack;
pub use entity::{Body, Enemy, EntityRef, ExitZone, LootDrop, Player, Projectile, Vitals};
pub use state::{HudSummary, HudTracker, RaidNotice, RaidResult, RaidState};
pub use update::{PickupOutcome, TickOutcome};
