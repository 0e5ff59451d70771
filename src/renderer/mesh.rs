//! Tessellating surface
//!
//! `MeshSurface` implements [`Surface`] by turning every fill into colored
//! triangles, grouped into batches by blend mode in draw order. Gradients are
//! evaluated per vertex over a few concentric bands, which is plenty for the
//! soft radial falloffs the fire uses.

use glam::{Affine2, Vec2};
use std::f32::consts::TAU;

use super::surface::{Blend, Paint, Path, Rgba, Shadow, Surface};
use super::vertex::Vertex;

/// Segments per curve when flattening paths
const CURVE_STEPS: u32 = 8;
/// Concentric bands used to approximate a radial gradient
const GRADIENT_BANDS: usize = 4;

/// Circle segment count scaled by radius
fn circle_segments(radius: f32) -> usize {
    ((radius * 2.0) as usize).clamp(12, 64)
}

/// Consecutive triangles sharing one blend mode
#[derive(Debug, Clone)]
pub struct Batch {
    pub blend: Blend,
    pub vertices: Vec<Vertex>,
}

#[derive(Debug, Clone, Copy)]
struct DrawState {
    transform: Affine2,
    alpha: f32,
    blend: Blend,
    shadow: Option<Shadow>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            blend: Blend::SourceOver,
            shadow: None,
        }
    }
}

/// CPU tessellator recording one frame of draw calls
#[derive(Debug, Clone)]
pub struct MeshSurface {
    size: Vec2,
    state: DrawState,
    stack: Vec<DrawState>,
    batches: Vec<Batch>,
}

impl MeshSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            state: DrawState::default(),
            stack: Vec::new(),
            batches: Vec::new(),
        }
    }

    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Batches recorded since the last `clear`
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }

    /// Drop recorded geometry and reset the state stack (call once per frame)
    pub fn clear(&mut self) {
        self.batches.clear();
        self.stack.clear();
        self.state = DrawState::default();
    }

    fn target(&mut self) -> &mut Vec<Vertex> {
        let blend = self.state.blend;
        let reuse = self.batches.last().is_some_and(|b| b.blend == blend);
        if !reuse {
            self.batches.push(Batch {
                blend,
                vertices: Vec::new(),
            });
        }
        // Just ensured a batch exists
        let last = self.batches.len() - 1;
        &mut self.batches[last].vertices
    }

    /// Emit one triangle given in local coordinates
    fn triangle(&mut self, points: [(Vec2, Rgba); 3]) {
        let transform = self.state.transform;
        let alpha = self.state.alpha;
        let target = self.target();
        for (p, color) in points {
            let color = color.with_alpha(color.a * alpha);
            target.push(Vertex::new(transform.transform_point2(p), color.to_array()));
        }
    }

    /// Fill a star-shaped polygon by fanning out from `center`
    fn fill_polygon(&mut self, center: Vec2, ring: &[Vec2], paint: &Paint) {
        if ring.len() < 3 {
            return;
        }

        if let Some(shadow) = self.state.shadow {
            if shadow.color.a > 0.0 && shadow.blur > 0.0 {
                self.fill_shadow(center, ring, shadow);
            }
        }

        let bands = match paint {
            Paint::Solid(_) => 1,
            Paint::Radial(_) => GRADIENT_BANDS,
        };
        let shade = |p: Vec2| (p, paint.color_at(p));

        for i in 0..ring.len() {
            let a = ring[i];
            let b = ring[(i + 1) % ring.len()];

            for band in 0..bands {
                let t0 = band as f32 / bands as f32;
                let t1 = (band + 1) as f32 / bands as f32;
                let a1 = center.lerp(a, t1);
                let b1 = center.lerp(b, t1);

                if band == 0 {
                    self.triangle([shade(center), shade(a1), shade(b1)]);
                } else {
                    let a0 = center.lerp(a, t0);
                    let b0 = center.lerp(b, t0);
                    self.triangle([shade(a0), shade(a1), shade(b1)]);
                    self.triangle([shade(a0), shade(b1), shade(b0)]);
                }
            }
        }
    }

    /// Shadow: the shape in the shadow color plus a feathered rim `blur` wide
    fn fill_shadow(&mut self, center: Vec2, ring: &[Vec2], shadow: Shadow) {
        let solid = shadow.color;
        let faded = solid.with_alpha(0.0);
        let expand = |p: Vec2| p + (p - center).normalize_or_zero() * shadow.blur;

        for i in 0..ring.len() {
            let a = ring[i];
            let b = ring[(i + 1) % ring.len()];
            let (ea, eb) = (expand(a), expand(b));

            self.triangle([(center, solid), (a, solid), (b, solid)]);
            self.triangle([(a, solid), (ea, faded), (eb, faded)]);
            self.triangle([(a, solid), (eb, faded), (b, solid)]);
        }
    }
}

impl Surface for MeshSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        // Unbalanced restore is a no-op, as on a canvas
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.transform = self.state.transform * Affine2::from_translation(offset);
    }

    fn rotate(&mut self, angle: f32) {
        self.state.transform = self.state.transform * Affine2::from_angle(angle);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_blend(&mut self, blend: Blend) {
        self.state.blend = blend;
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.shadow = shadow;
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, paint: &Paint) {
        let max = min + size;
        let ring = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
        self.fill_polygon(min + size * 0.5, &ring, paint);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        if radius <= 0.0 {
            return;
        }
        let segments = circle_segments(radius);
        let ring: Vec<Vec2> = (0..segments)
            .map(|i| {
                let theta = i as f32 / segments as f32 * TAU;
                center + Vec2::new(theta.cos(), theta.sin()) * radius
            })
            .collect();
        self.fill_polygon(center, &ring, paint);
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        let ring = path.flatten(CURVE_STEPS);
        if ring.len() < 3 {
            return;
        }
        let centroid = ring.iter().copied().sum::<Vec2>() / ring.len() as f32;
        self.fill_polygon(centroid, &ring, paint);
    }
}
