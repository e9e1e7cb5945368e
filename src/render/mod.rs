//! Scene compositor and drawing surface.
//!
//! [`compositor::compose`] turns a [`RaidState`](crate::sim::RaidState) into
//! a [`Scene`]: floor tiles, one depth-sorted layer (walls, characters, loot,
//! exit), projectiles on top and a screen-space fog vignette. A scene is
//! replayed onto any [`Surface`]; [`canvas::PixelCanvas`] is the software
//! rasterizer the bevy presenter uploads every frame.

pub mod canvas;
pub mod compositor;
pub mod sprites;

use bevy::math::Vec2;

use crate::catalog::Rgba;

pub use canvas::PixelCanvas;
pub use compositor::compose;

/// Host-reported surface size in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn from_vec2(size: Vec2) -> Self {
        Self {
            width: size.x.max(0.0).round() as u32,
            height: size.y.max(0.0).round() as u32,
        }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn center(&self) -> Vec2 {
        self.as_vec2() / 2.0
    }
}

/// Filled geometry in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect { min: Vec2, size: Vec2 },
    Circle { center: Vec2, radius: f32 },
    Ellipse { center: Vec2, radii: Vec2, rotation: f32 },
    /// Stroked circle outline
    Ring { center: Vec2, radius: f32, width: f32 },
    Triangle { a: Vec2, b: Vec2, c: Vec2 },
}

impl Shape {
    pub fn scaled(&self, s: f32) -> Shape {
        match *self {
            Shape::Rect { min, size } => Shape::Rect {
                min: min * s,
                size: size * s,
            },
            Shape::Circle { center, radius } => Shape::Circle {
                center: center * s,
                radius: radius * s,
            },
            Shape::Ellipse {
                center,
                radii,
                rotation,
            } => Shape::Ellipse {
                center: center * s,
                radii: radii * s,
                rotation,
            },
            Shape::Ring {
                center,
                radius,
                width,
            } => Shape::Ring {
                center: center * s,
                radius: radius * s,
                width: width * s,
            },
            Shape::Triangle { a, b, c } => Shape::Triangle {
                a: a * s,
                b: b * s,
                c: c * s,
            },
        }
    }
}

/// Centered text anchored on its baseline
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub pos: Vec2,
    pub size: f32,
    pub bold: bool,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill { shape: Shape, color: Rgba },
    Text(Label),
}

impl DrawOp {
    pub fn fill(shape: Shape, color: Rgba) -> Self {
        DrawOp::Fill { shape, color }
    }
}

/// What a depth-sorted item depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthKind {
    Wall,
    Player,
    Enemy,
    Loot,
    Exit,
}

/// One object in the sorted layer. `depth` is the world y of its visual base.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthItem {
    pub depth: f32,
    pub kind: DepthKind,
    pub ops: Vec<DrawOp>,
}

/// Radial fog: transparent inside `inner`, opaque black from `outer` on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vignette {
    pub center: Vec2,
    pub inner: f32,
    pub outer: f32,
    /// (offset in 0..=1, alpha) gradient stops, ascending offsets
    pub stops: [(f32, f32); 3],
}

impl Vignette {
    pub fn fog(center: Vec2, inner: f32, outer: f32) -> Self {
        Self {
            center,
            inner,
            outer,
            stops: [(0.0, 0.0), (0.8, 0.6), (1.0, 1.0)],
        }
    }

    /// Fog alpha at `dist` screen pixels from the center
    pub fn alpha_at(&self, dist: f32) -> f32 {
        let span = (self.outer - self.inner).max(f32::EPSILON);
        let t = ((dist - self.inner) / span).clamp(0.0, 1.0);
        let mut prev = self.stops[0];
        if t <= prev.0 {
            return prev.1;
        }
        for stop in &self.stops[1..] {
            if t <= stop.0 {
                let k = (t - prev.0) / (stop.0 - prev.0).max(f32::EPSILON);
                return prev.1 + (stop.1 - prev.1) * k;
            }
            prev = *stop;
        }
        prev.1
    }
}

/// One frame, ready to replay
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub size: SurfaceSize,
    pub clear: Rgba,
    pub floor: Vec<DrawOp>,
    /// Ascending depth
    pub layer: Vec<DepthItem>,
    pub projectiles: Vec<DrawOp>,
    pub vignette: Vignette,
}

impl Scene {
    /// Every draw op in paint order, vignette excluded
    pub fn ops(&self) -> impl Iterator<Item = &DrawOp> {
        self.floor
            .iter()
            .chain(self.layer.iter().flat_map(|item| item.ops.iter()))
            .chain(self.projectiles.iter())
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear(self.clear);
        for op in self.ops() {
            match op {
                DrawOp::Fill { shape, color } => surface.fill(shape, *color),
                DrawOp::Text(label) => surface.label(label),
            }
        }
        surface.vignette(&self.vignette);
    }
}

/// Drawable 2D target. The whole surface is redrawn every frame.
pub trait Surface {
    fn size(&self) -> SurfaceSize;
    fn clear(&mut self, color: Rgba);
    fn fill(&mut self, shape: &Shape, color: Rgba);
    fn label(&mut self, label: &Label);
    fn vignette(&mut self, vignette: &Vignette);
}
