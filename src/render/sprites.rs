//! Vector sprites: panda, duck, wall block, loot marker, exit beacon.
//!
//! Sprites are authored in local coordinates (+x = facing) and placed on
//! screen by a [`Pen`] that rotates and translates each part.

use bevy::math::Vec2;
use std::f32::consts::FRAC_PI_4;

use super::{DrawOp, Label, Shape};
use crate::catalog::Rgba;
use crate::constants::*;

const SHADOW: Rgba = Rgba::rgba(0, 0, 0, 77);
const EYE_BLACK: Rgba = Rgba::BLACK;

/// Places local-space parts at a screen position and rotation
pub struct Pen {
    origin: Vec2,
    rotation: Vec2,
    angle: f32,
    ops: Vec<DrawOp>,
}

impl Pen {
    pub fn new(origin: Vec2, angle: f32) -> Self {
        Self {
            origin,
            rotation: Vec2::from_angle(angle),
            angle,
            ops: Vec::new(),
        }
    }

    fn place(&self, local: Vec2) -> Vec2 {
        self.origin + self.rotation.rotate(local)
    }

    pub fn circle(&mut self, local: Vec2, radius: f32, color: Rgba) -> &mut Self {
        let center = self.place(local);
        self.ops.push(DrawOp::fill(Shape::Circle { center, radius }, color));
        self
    }

    pub fn ellipse(&mut self, local: Vec2, radii: Vec2, rotation: f32, color: Rgba) -> &mut Self {
        let center = self.place(local);
        self.ops.push(DrawOp::fill(
            Shape::Ellipse {
                center,
                radii,
                rotation: rotation + self.angle,
            },
            color,
        ));
        self
    }

    pub fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Rgba) -> &mut Self {
        let shape = Shape::Triangle {
            a: self.place(a),
            b: self.place(b),
            c: self.place(c),
        };
        self.ops.push(DrawOp::fill(shape, color));
        self
    }

    /// Axis-aligned rect relative to the origin, ignoring rotation
    pub fn upright_rect(&mut self, offset: Vec2, size: Vec2, color: Rgba) -> &mut Self {
        let min = self.origin + offset;
        self.ops.push(DrawOp::fill(Shape::Rect { min, size }, color));
        self
    }

    pub fn finish(self) -> Vec<DrawOp> {
        self.ops
    }
}

/// The player
pub fn panda(screen: Vec2, radius: f32, facing: f32) -> Vec<DrawOp> {
    let mut pen = Pen::new(screen, facing);
    pen.ellipse(Vec2::ZERO, Vec2::new(radius, radius * 0.8), 0.0, SHADOW)
        .circle(Vec2::new(10.0, -8.0), 6.0, COLOR_PLAYER_ACCENT)
        .circle(Vec2::new(10.0, 8.0), 6.0, COLOR_PLAYER_ACCENT)
        .circle(Vec2::ZERO, radius, COLOR_PLAYER_BODY)
        .ellipse(Vec2::new(6.0, -5.0), Vec2::new(4.0, 5.0), FRAC_PI_4, COLOR_PLAYER_ACCENT)
        .ellipse(Vec2::new(6.0, 5.0), Vec2::new(4.0, 5.0), -FRAC_PI_4, COLOR_PLAYER_ACCENT)
        .circle(Vec2::new(7.0, -5.0), 1.5, Rgba::WHITE)
        .circle(Vec2::new(7.0, 5.0), 1.5, Rgba::WHITE)
        .ellipse(Vec2::new(8.0, 12.0), Vec2::new(5.0, 3.0), FRAC_PI_4, COLOR_PLAYER_ACCENT);
    pen.finish()
}

/// An enemy, with its screen-aligned health bar
pub fn duck(screen: Vec2, radius: f32, facing: f32, health: f32) -> Vec<DrawOp> {
    let mut pen = Pen::new(screen, facing);
    pen.ellipse(Vec2::ZERO, Vec2::new(radius, radius * 0.7), 0.0, SHADOW)
        .ellipse(Vec2::new(-5.0, 0.0), Vec2::new(14.0, 10.0), 0.0, COLOR_ENEMY_BODY)
        .circle(Vec2::new(5.0, 0.0), 9.0, COLOR_ENEMY_BODY)
        .triangle(
            Vec2::new(10.0, -3.0),
            Vec2::new(18.0, 0.0),
            Vec2::new(10.0, 3.0),
            COLOR_ENEMY_BEAK,
        )
        .ellipse(Vec2::new(-5.0, 5.0), Vec2::new(8.0, 4.0), 0.5, COLOR_ENEMY_WING)
        .ellipse(Vec2::new(-5.0, -5.0), Vec2::new(8.0, 4.0), -0.5, COLOR_ENEMY_WING)
        .circle(Vec2::new(8.0, -3.0), 1.5, EYE_BLACK)
        .circle(Vec2::new(8.0, 3.0), 1.5, EYE_BLACK)
        .upright_rect(Vec2::new(-12.0, -25.0), Vec2::new(24.0, 4.0), COLOR_HEALTH_BACK)
        .upright_rect(
            Vec2::new(-12.0, -25.0),
            Vec2::new(24.0 * health.clamp(0.0, 1.0), 4.0),
            COLOR_HEALTH_FILL,
        );
    pen.finish()
}

/// Extruded wall block whose tile's top-left corner is at `corner`
pub fn wall_block(corner: Vec2, face: Rgba) -> Vec<DrawOp> {
    vec![
        DrawOp::fill(
            Shape::Rect {
                min: corner + Vec2::new(0.0, TILE_SIZE - WALL_HEIGHT),
                size: Vec2::new(TILE_SIZE, WALL_HEIGHT),
            },
            face,
        ),
        DrawOp::fill(
            Shape::Rect {
                min: corner - Vec2::new(0.0, WALL_HEIGHT),
                size: Vec2::splat(TILE_SIZE),
            },
            COLOR_WALL_TOP,
        ),
        DrawOp::fill(
            Shape::Rect {
                min: corner - Vec2::new(0.0, WALL_HEIGHT),
                size: Vec2::new(TILE_SIZE, 4.0),
            },
            Rgba::WHITE.with_alpha(0.1),
        ),
    ]
}

/// Glowing loot disc, labelled when the player is close
pub fn loot_marker(screen: Vec2, color: Rgba, name: Option<&str>) -> Vec<DrawOp> {
    let mut ops = vec![
        DrawOp::fill(
            Shape::Circle {
                center: screen,
                radius: 10.0,
            },
            color.with_alpha(0.25),
        ),
        DrawOp::fill(
            Shape::Circle {
                center: screen,
                radius: 6.0,
            },
            color,
        ),
    ];
    if let Some(name) = name {
        ops.push(DrawOp::Text(Label {
            text: name.to_string(),
            pos: screen - Vec2::new(0.0, 15.0),
            size: 10.0,
            bold: false,
            color: Rgba::WHITE,
        }));
    }
    ops
}

/// Exit pad with a ring pulsing at 5 rad/s
pub fn exit_beacon(screen: Vec2, radius: f32, elapsed: f32) -> Vec<DrawOp> {
    vec![
        DrawOp::fill(
            Shape::Circle {
                center: screen,
                radius,
            },
            COLOR_EXIT,
        ),
        DrawOp::fill(
            Shape::Ring {
                center: screen,
                radius: 15.0 + (elapsed * 5.0).sin() * 5.0,
                width: 1.0,
            },
            Rgba::WHITE,
        ),
        DrawOp::Text(Label {
            text: "EVAC".to_string(),
            pos: screen + Vec2::new(0.0, 4.0),
            size: 12.0,
            bold: true,
            color: Rgba::WHITE,
        }),
    ]
}
