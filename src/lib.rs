//! Panda Extraction - Raid Core Library
//!
//! The in-raid half of an extraction shooter:
//! - Level catalog and loot table (static, read-only inputs)
//! - Cave generation (random walk, seeded per level, connectivity survey)
//! - Tick simulation (movement with wall sliding, projectiles, enemy pursuit,
//!   pickup under a weight budget, extraction and death)
//! - Input sampling (held keys, pointer, latched actions)
//! - Scene compositing (depth-sorted draw list, software canvas, fog of war)
//! - Bevy game loop driver and presentation

pub mod catalog;
pub mod config;
pub mod constants;
pub mod engine;
pub mod generation;
pub mod input;
pub mod logging;
pub mod loot;
pub mod render;
pub mod sim;
