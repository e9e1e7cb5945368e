//! Input sampler.
//!
//! Host events are folded into an [`InputState`] as they arrive ("last
//! observed state wins"); the update engine reads one [`InputSnapshot`] at the
//! start of each tick. Held movement keys persist between samples, discrete
//! actions (fire, interact, overlay toggle) are latched until the next sample.

pub mod keyboard;

use bevy::math::Vec2;

/// One of the four movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Up,
    Down,
    Left,
    Right,
}

/// Logical input signals delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(MoveKey),
    KeyUp(MoveKey),
    /// Pointer position in surface pixels, origin top-left
    PointerMoved(Vec2),
    /// Surface size changed
    Resized(Vec2),
    Fire,
    Interact,
    ToggleOverlay,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    pub fn set(&mut self, key: MoveKey, held: bool) {
        match key {
            MoveKey::Up => self.up = held,
            MoveKey::Down => self.down = held,
            MoveKey::Left => self.left = held,
            MoveKey::Right => self.right = held,
        }
    }
}

/// What the update engine sees for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    pub held: HeldKeys,
    pub pointer: Vec2,
    pub viewport: Vec2,
    pub fire: bool,
    pub interact: bool,
    pub toggle_overlay: bool,
}

impl InputSnapshot {
    /// No keys, no actions, pointer resting on the screen center
    pub fn idle(viewport: Vec2) -> Self {
        Self {
            held: HeldKeys::default(),
            pointer: viewport / 2.0,
            viewport,
            fire: false,
            interact: false,
            toggle_overlay: false,
        }
    }

    /// Pointer offset from the screen center. The camera always centers the
    /// player, so this is also the aim direction in world space.
    pub fn aim(&self) -> Vec2 {
        self.pointer - self.viewport / 2.0
    }

    pub fn with_held(mut self, keys: &[MoveKey]) -> Self {
        for key in keys {
            self.held.set(*key, true);
        }
        self
    }

    pub fn with_pointer(mut self, pointer: Vec2) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn firing(mut self) -> Self {
        self.fire = true;
        self
    }

    pub fn interacting(mut self) -> Self {
        self.interact = true;
        self
    }

    pub fn toggling_overlay(mut self) -> Self {
        self.toggle_overlay = true;
        self
    }
}

/// Accumulated host input between ticks
#[derive(Debug, Clone)]
pub struct InputState {
    held: HeldKeys,
    pointer: Vec2,
    viewport: Vec2,
    fire: bool,
    interact: bool,
    toggle_overlay: bool,
}

impl InputState {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            held: HeldKeys::default(),
            pointer: viewport / 2.0,
            viewport,
            fire: false,
            interact: false,
            toggle_overlay: false,
        }
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.held.set(key, true),
            InputEvent::KeyUp(key) => self.held.set(key, false),
            InputEvent::PointerMoved(pos) => self.pointer = pos,
            InputEvent::Resized(size) => self.viewport = size,
            InputEvent::Fire => self.fire = true,
            InputEvent::Interact => self.interact = true,
            // Two toggles between samples cancel out
            InputEvent::ToggleOverlay => self.toggle_overlay = !self.toggle_overlay,
        }
    }

    /// Snapshot for this tick; clears the latched actions
    pub fn sample(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            held: self.held,
            pointer: self.pointer,
            viewport: self.viewport,
            fire: self.fire,
            interact: self.interact,
            toggle_overlay: self.toggle_overlay,
        };
        self.fire = false;
        self.interact = false;
        self.toggle_overlay = false;
        snapshot
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_persist_across_samples() {
        let mut input = InputState::new(Vec2::new(800.0, 600.0));
        input.apply(InputEvent::KeyDown(MoveKey::Left));
        assert!(input.sample().held.left);
        assert!(input.sample().held.left);
        input.apply(InputEvent::KeyUp(MoveKey::Left));
        assert!(!input.sample().held.left);
    }

    #[test]
    fn test_actions_latch_once() {
        let mut input = InputState::new(Vec2::new(800.0, 600.0));
        input.apply(InputEvent::Fire);
        input.apply(InputEvent::Interact);
        let first = input.sample();
        assert!(first.fire && first.interact);
        let second = input.sample();
        assert!(!second.fire && !second.interact);
    }

    #[test]
    fn test_double_toggle_cancels() {
        let mut input = InputState::new(Vec2::new(800.0, 600.0));
        input.apply(InputEvent::ToggleOverlay);
        input.apply(InputEvent::ToggleOverlay);
        assert!(!input.sample().toggle_overlay);
    }

    #[test]
    fn test_last_pointer_wins() {
        let mut input = InputState::new(Vec2::new(800.0, 600.0));
        input.apply(InputEvent::PointerMoved(Vec2::new(10.0, 10.0)));
        input.apply(InputEvent::PointerMoved(Vec2::new(500.0, 300.0)));
        let snap = input.sample();
        assert_eq!(snap.aim(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_idle_aims_nowhere() {
        assert_eq!(InputSnapshot::idle(Vec2::new(640.0, 480.0)).aim(), Vec2::ZERO);
    }
}
