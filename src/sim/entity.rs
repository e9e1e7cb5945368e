//! World entities.
//!
//! Every variant shares a [`Body`] (position, collision radius, color tag);
//! variant payloads live on the concrete structs. [`EntityRef`] is the
//! borrowed sum type the compositor and tests match on.

use bevy::math::Vec2;

use crate::catalog::Rgba;
use crate::constants::*;
use crate::loot::Item;

/// Fields common to every entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgba,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32, color: Rgba) -> Self {
        Self { pos, radius, color }
    }

    /// True when the two circles, grown by `margin`, overlap
    pub fn touches(&self, other: &Body, margin: f32) -> bool {
        self.pos.distance(other.pos) < self.radius + other.radius + margin
    }
}

/// Health, heading and pace of a character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    pub hp: f32,
    pub max_hp: f32,
    /// radians, 0 = +x
    pub facing: f32,
    /// world px per nominal tick
    pub speed: f32,
}

impl Vitals {
    pub fn full(max_hp: f32, speed: f32, facing: f32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            facing,
            speed,
        }
    }

    /// Subtract `amount`, never going below zero. Returns the hp actually lost.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let before = self.hp;
        self.hp = (self.hp - amount).max(0.0);
        before - self.hp
    }

    pub fn is_depleted(&self) -> bool {
        self.hp <= 0.0
    }

    /// hp / max_hp in 0..=1
    pub fn fraction(&self) -> f32 {
        if self.max_hp <= 0.0 {
            0.0
        } else {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: Body,
    pub vitals: Vitals,
}

impl Player {
    pub fn spawn(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, PLAYER_RADIUS, COLOR_PLAYER_BODY),
            vitals: Vitals::full(PLAYER_MAX_HP, PLAYER_SPEED, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub body: Body,
    pub vitals: Vitals,
    pub dead: bool,
}

impl Enemy {
    /// Full-health duck scaled to the level's difficulty tier
    pub fn spawn(pos: Vec2, difficulty: u32, facing: f32) -> Self {
        let hp = ENEMY_BASE_HP + ENEMY_HP_PER_DIFFICULTY * difficulty as f32;
        Self {
            body: Body::new(pos, ENEMY_RADIUS, COLOR_ENEMY_BODY),
            vitals: Vitals::full(hp, ENEMY_SPEED, facing),
            dead: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LootDrop {
    pub body: Body,
    pub item: Item,
}

impl LootDrop {
    pub fn new(pos: Vec2, item: Item) -> Self {
        Self {
            body: Body::new(pos, LOOT_RADIUS, item.color),
            item,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub body: Body,
    /// world px per nominal tick
    pub velocity: Vec2,
}

impl Projectile {
    /// Bullet leaving `origin` along `angle`
    pub fn fired(origin: Vec2, angle: f32) -> Self {
        Self {
            body: Body::new(origin, PROJECTILE_RADIUS, COLOR_PROJECTILE),
            velocity: Vec2::from_angle(angle) * PROJECTILE_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExitZone {
    pub body: Body,
}

impl ExitZone {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, EXIT_RADIUS, COLOR_EXIT),
        }
    }
}

/// Borrowed view over any entity variant
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Player(&'a Player),
    Enemy(&'a Enemy),
    Loot(&'a LootDrop),
    Projectile(&'a Projectile),
    Exit(&'a ExitZone),
}

impl<'a> EntityRef<'a> {
    pub fn body(&self) -> &'a Body {
        match *self {
            EntityRef::Player(p) => &p.body,
            EntityRef::Enemy(e) => &e.body,
            EntityRef::Loot(l) => &l.body,
            EntityRef::Projectile(p) => &p.body,
            EntityRef::Exit(x) => &x.body,
        }
    }

    /// Vertical coordinate of the visual base, used as depth key
    pub fn depth(&self) -> f32 {
        let body = self.body();
        match self {
            EntityRef::Player(_) | EntityRef::Enemy(_) => body.pos.y + body.radius,
            EntityRef::Loot(_) | EntityRef::Projectile(_) | EntityRef::Exit(_) => body.pos.y,
        }
    }
}
