//! Software RGBA canvas.
//!
//! Shapes are sampled at pixel centers and composited source-over with
//! straight alpha. Text is not rasterized here: labels are collected in
//! screen space for the host to draw with its own font stack.

use bevy::math::Vec2;

use super::{Label, Shape, Surface, SurfaceSize, Vignette};
use crate::catalog::Rgba;

pub struct PixelCanvas {
    width: u32,
    height: u32,
    /// Logical surface size; the pixel buffer is this times `scale`
    logical: SurfaceSize,
    scale: f32,
    pixels: Vec<u8>,
    labels: Vec<Label>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self::scaled(SurfaceSize::new(width, height), 1.0)
    }

    /// Canvas for a `logical` surface rendered at `scale` resolution
    pub fn scaled(logical: SurfaceSize, scale: f32) -> Self {
        let scale = scale.clamp(0.05, 1.0);
        let width = ((logical.width as f32 * scale).round() as u32).max(1);
        let height = ((logical.height as f32 * scale).round() as u32).max(1);
        Self {
            width,
            height,
            logical,
            scale,
            pixels: vec![0; (width * height * 4) as usize],
            labels: Vec::new(),
        }
    }

    pub fn pixel_width(&self) -> u32 {
        self.width
    }

    pub fn pixel_height(&self) -> u32 {
        self.height
    }

    /// RGBA8 pixel data, row-major, top row first
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let p = &self.pixels[i..i + 4];
        Some(Rgba::rgba(p[0], p[1], p[2], p[3]))
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba) {
        let a = color.alpha_f32();
        if a <= 0.0 {
            return;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let dst = &mut self.pixels[i..i + 4];
        let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
        dst[0] = mix(color.r, dst[0]);
        dst[1] = mix(color.g, dst[1]);
        dst[2] = mix(color.b, dst[2]);
        dst[3] = (255.0 * a + dst[3] as f32 * (1.0 - a)).round() as u8;
    }

    /// Visit the pixels whose centers fall inside `min..max` (buffer space)
    fn scan(&mut self, min: Vec2, max: Vec2, mut inside: impl FnMut(Vec2) -> bool, color: Rgba) {
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as u32).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if inside(p) {
                    self.blend(x, y, color);
                }
            }
        }
    }
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

impl Surface for PixelCanvas {
    fn size(&self) -> SurfaceSize {
        self.logical
    }

    fn clear(&mut self, color: Rgba) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        self.labels.clear();
    }

    fn fill(&mut self, shape: &Shape, color: Rgba) {
        match shape.scaled(self.scale) {
            Shape::Rect { min, size } => {
                let max = min + size;
                self.scan(min, max, |p| p.cmpge(min).all() && p.cmplt(max).all(), color);
            }
            Shape::Circle { center, radius } => {
                let r2 = radius * radius;
                self.scan(
                    center - radius,
                    center + radius,
                    |p| p.distance_squared(center) <= r2,
                    color,
                );
            }
            Shape::Ellipse {
                center,
                radii,
                rotation,
            } => {
                if radii.x <= 0.0 || radii.y <= 0.0 {
                    return;
                }
                let unrotate = Vec2::from_angle(-rotation);
                let reach = radii.x.max(radii.y);
                self.scan(
                    center - reach,
                    center + reach,
                    |p| {
                        let local = unrotate.rotate(p - center) / radii;
                        local.length_squared() <= 1.0
                    },
                    color,
                );
            }
            Shape::Ring {
                center,
                radius,
                width,
            } => {
                let half = (width / 2.0).max(0.5);
                let reach = radius + half;
                self.scan(
                    center - reach,
                    center + reach,
                    |p| (p.distance(center) - radius).abs() <= half,
                    color,
                );
            }
            Shape::Triangle { a, b, c } => {
                let min = a.min(b).min(c);
                let max = a.max(b).max(c);
                self.scan(
                    min,
                    max,
                    |p| {
                        let (e0, e1, e2) = (edge(a, b, p), edge(b, c, p), edge(c, a, p));
                        (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0) || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0)
                    },
                    color,
                );
            }
        }
    }

    fn label(&mut self, label: &Label) {
        self.labels.push(label.clone());
    }

    fn vignette(&mut self, vignette: &Vignette) {
        let center = vignette.center * self.scale;
        for y in 0..self.height {
            for x in 0..self.width {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let dist = p.distance(center) / self.scale;
                let alpha = vignette.alpha_at(dist);
                if alpha > 0.0 {
                    self.blend(x, y, Rgba::BLACK.with_alpha(alpha));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_and_rect() {
        let mut canvas = PixelCanvas::new(8, 8);
        canvas.clear(Rgba::BLACK);
        canvas.fill(
            &Shape::Rect {
                min: Vec2::new(2.0, 2.0),
                size: Vec2::new(3.0, 3.0),
            },
            Rgba::WHITE,
        );
        assert_eq!(canvas.pixel(2, 2), Some(Rgba::WHITE));
        assert_eq!(canvas.pixel(4, 4), Some(Rgba::WHITE));
        assert_eq!(canvas.pixel(5, 5), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(1, 2), Some(Rgba::BLACK));
    }

    #[test]
    fn test_alpha_blend() {
        let mut canvas = PixelCanvas::new(2, 2);
        canvas.clear(Rgba::BLACK);
        canvas.fill(
            &Shape::Rect {
                min: Vec2::ZERO,
                size: Vec2::splat(2.0),
            },
            Rgba::WHITE.with_alpha(0.5),
        );
        let p = canvas.pixel(0, 0).unwrap();
        assert_eq!(p.r, 128);
        assert_eq!(p.a, 255);
    }

    #[test]
    fn test_circle_coverage() {
        let mut canvas = PixelCanvas::new(21, 21);
        canvas.clear(Rgba::BLACK);
        canvas.fill(
            &Shape::Circle {
                center: Vec2::splat(10.5),
                radius: 5.0,
            },
            Rgba::WHITE,
        );
        assert_eq!(canvas.pixel(10, 10), Some(Rgba::WHITE));
        assert_eq!(canvas.pixel(10, 15), Some(Rgba::WHITE));
        assert_eq!(canvas.pixel(10, 16), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(15, 15), Some(Rgba::BLACK));
    }

    #[test]
    fn test_rotated_ellipse() {
        let mut canvas = PixelCanvas::new(40, 40);
        canvas.clear(Rgba::BLACK);
        canvas.fill(
            &Shape::Ellipse {
                center: Vec2::splat(20.0),
                radii: Vec2::new(15.0, 3.0),
                rotation: std::f32::consts::FRAC_PI_2,
            },
            Rgba::WHITE,
        );
        // Long axis now vertical
        assert_eq!(canvas.pixel(19, 32), Some(Rgba::WHITE));
        assert_eq!(canvas.pixel(32, 19), Some(Rgba::BLACK));
    }

    #[test]
    fn test_triangle_either_winding() {
        for (a, c) in [(Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0)), (Vec2::new(0.0, 10.0), Vec2::new(0.0, 0.0))] {
            let mut canvas = PixelCanvas::new(12, 12);
            canvas.clear(Rgba::BLACK);
            canvas.fill(&Shape::Triangle { a, b: Vec2::new(10.0, 5.0), c }, Rgba::WHITE);
            assert_eq!(canvas.pixel(2, 5), Some(Rgba::WHITE));
            assert_eq!(canvas.pixel(9, 1), Some(Rgba::BLACK));
        }
    }

    #[test]
    fn test_vignette_darkens_edges() {
        let mut canvas = PixelCanvas::new(200, 200);
        canvas.clear(Rgba::WHITE);
        canvas.vignette(&Vignette::fog(Vec2::splat(100.0), 10.0, 90.0));
        assert_eq!(canvas.pixel(100, 100), Some(Rgba::WHITE));
        assert_eq!(canvas.pixel(0, 0), Some(Rgba::rgb(0, 0, 0)));
    }

    #[test]
    fn test_scaled_canvas_maps_logical_coords() {
        let mut canvas = PixelCanvas::scaled(SurfaceSize::new(100, 100), 0.5);
        assert_eq!(canvas.pixel_width(), 50);
        assert_eq!(canvas.size(), SurfaceSize::new(100, 100));
        canvas.clear(Rgba::BLACK);
        canvas.fill(
            &Shape::Rect {
                min: Vec2::new(40.0, 40.0),
                size: Vec2::new(20.0, 20.0),
            },
            Rgba::WHITE,
        );
        assert_eq!(canvas.pixel(25, 25), Some(Rgba::WHITE));
        assert_eq!(canvas.pixel(15, 15), Some(Rgba::BLACK));
    }

    #[test]
    fn test_labels_reset_on_clear() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.label(&Label {
            text: "EVAC".into(),
            pos: Vec2::ZERO,
            size: 12.0,
            bold: true,
            color: Rgba::WHITE,
        });
        assert_eq!(canvas.labels().len(), 1);
        canvas.clear(Rgba::BLACK);
        assert!(canvas.labels().is_empty());
    }
}
