//! Bevy input bindings.
//!
//! WASD moves, Tab or B toggles the loadout overlay, E picks up, left mouse
//! fires. Only runs while a raid session exists, so a finished raid stops
//! receiving input the moment its session is dropped.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::{InputEvent, MoveKey};
use crate::engine::RaidSession;

pub const MOVE_BINDINGS: [(KeyCode, MoveKey); 4] = [
    (KeyCode::KeyW, MoveKey::Up),
    (KeyCode::KeyS, MoveKey::Down),
    (KeyCode::KeyA, MoveKey::Left),
    (KeyCode::KeyD, MoveKey::Right),
];

pub const OVERLAY_KEYS: [KeyCode; 2] = [KeyCode::Tab, KeyCode::KeyB];
pub const INTERACT_KEY: KeyCode = KeyCode::KeyE;
pub const FIRE_BUTTON: MouseButton = MouseButton::Left;

/// Translate this frame's device state into logical input events
pub fn translate(
    keys: Option<&ButtonInput<KeyCode>>,
    mouse: Option<&ButtonInput<MouseButton>>,
    window: Option<&Window>,
) -> Vec<InputEvent> {
    let mut events = Vec::new();

    if let Some(window) = window {
        events.push(InputEvent::Resized(Vec2::new(window.width(), window.height())));
        if let Some(cursor) = window.cursor_position() {
            events.push(InputEvent::PointerMoved(cursor));
        }
    }

    if let Some(keys) = keys {
        for (code, key) in MOVE_BINDINGS {
            events.push(if keys.pressed(code) {
                InputEvent::KeyDown(key)
            } else {
                InputEvent::KeyUp(key)
            });
        }
        if keys.any_just_pressed(OVERLAY_KEYS) {
            events.push(InputEvent::ToggleOverlay);
        }
        if keys.just_pressed(INTERACT_KEY) {
            events.push(InputEvent::Interact);
        }
    }

    if mouse.is_some_and(|m| m.just_pressed(FIRE_BUTTON)) {
        events.push(InputEvent::Fire);
    }

    events
}

pub fn capture_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut session: ResMut<RaidSession>,
) {
    let events = translate(keys.as_deref(), mouse.as_deref(), windows.get_single().ok());
    for event in events {
        session.feed(event);
    }
}
