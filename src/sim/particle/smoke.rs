//! Smoke puffs
//!
//! Large, faint, slowly rotating blobs that rise, swell and disperse above
//! the flames.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::{Particle, life_ratio};
use crate::renderer::{Paint, Path, Rgba, Shadow, Surface};
use crate::sim::SimRng;
use crate::sim::palette::{self, Rgb8};
use crate::{rand_centered, rand_range};

pub const LIFE_MIN: f32 = 180.0;
pub const LIFE_MAX: f32 = 380.0;
const LIFE_DECAY: f32 = 0.5;
const SPAWN_JITTER_X: f32 = 10.0;

/// Peak opacity of a fresh puff
pub const MAX_ALPHA: f32 = 0.15;
/// Puffs swell to this multiple of their spawn size
const GROWTH: f32 = 3.0;
const BUOYANCY: f32 = 0.001;
const DISPERSION: f32 = 0.02;

const LOBES: usize = 8;
const SHADOW_BLUR: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct SmokeParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub max_size: f32,
    pub life: f32,
    pub initial_life: f32,
    pub alpha: f32,
    pub rotation: f32,
    rotation_speed: f32,
    expansion_rate: f32,
    color: Rgb8,
}

impl SmokeParticle {
    /// Irregular lobed outline in local (rotated) space
    fn outline(&self) -> Path {
        let mut path = Path::new();
        for i in 0..LOBES {
            let angle = i as f32 / LOBES as f32 * TAU;
            let radius = self.size * (0.6 + (angle * 3.0).sin() * 0.4);
            let point = Vec2::new(angle.cos(), angle.sin()) * radius;

            if i == 0 {
                path.move_to(point);
            } else {
                let control_angle = angle - PI / LOBES as f32;
                let control =
                    Vec2::new(control_angle.cos(), control_angle.sin()) * self.size * 1.5;
                path.quad_to(control, point);
            }
        }
        path.close();
        path
    }
}

impl Particle for SmokeParticle {
    fn spawn(origin: Vec2, rng: &mut SimRng) -> Self {
        let size = rand_range(rng, 10.0, 25.0);
        let life = rand_range(rng, LIFE_MIN, LIFE_MAX);
        Self {
            pos: origin + Vec2::new(rand_range(rng, -SPAWN_JITTER_X, SPAWN_JITTER_X), 0.0),
            vel: Vec2::new(rand_centered(rng, 0.4), rand_range(rng, -1.5, -0.5)),
            size,
            max_size: size * GROWTH,
            life,
            initial_life: life,
            alpha: rand_range(rng, 0.02, 0.12),
            rotation: rand_range(rng, 0.0, TAU),
            rotation_speed: rand_centered(rng, 0.001),
            expansion_rate: rand_range(rng, 0.05, 0.15),
            color: palette::smoke_at(rand_range(rng, 0.0, 1.0)),
        }
    }

    fn advance(&mut self, dt: f32, rng: &mut SimRng) {
        self.pos += self.vel * dt;
        self.life -= LIFE_DECAY * dt;

        self.alpha = life_ratio(self.life, self.initial_life) * MAX_ALPHA;
        if self.size < self.max_size {
            self.size = (self.size + self.expansion_rate * dt).min(self.max_size);
        }
        self.rotation += self.rotation_speed * dt;

        // Scatter sideways and keep accelerating upward
        self.vel.x += rand_centered(rng, DISPERSION) * dt;
        self.vel.y -= BUOYANCY * dt;
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.translate(self.pos);
        surface.rotate(self.rotation);
        surface.set_global_alpha(self.alpha);
        surface.set_shadow(Some(Shadow {
            color: Rgba::BLACK.with_alpha(self.alpha),
            blur: SHADOW_BLUR,
        }));
        surface.fill_path(&self.outline(), &Paint::Solid(self.color.alpha(self.alpha)));
        surface.restore();
    }

    fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    fn position(&self) -> Vec2 {
        self.pos
    }
}
