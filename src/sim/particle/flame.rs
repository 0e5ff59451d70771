//! Flame tongues
//!
//! Elongated teardrops that rise, sway, flicker and cool from white to dark
//! red as they burn out. Height collapses first, then width, so a tongue
//! reads as a shrinking ember near the end of its life.

use glam::Vec2;
use std::f32::consts::TAU;

use super::{Particle, life_ratio};
use crate::consts::{GRAVITY, TURBULENCE, WIND_FORCE};
use crate::renderer::{Blend, Paint, Path, RadialGradient, Surface};
use crate::sim::SimRng;
use crate::sim::palette::{self, Rgb8};
use crate::{rand_centered, rand_range};

/// Per-particle jitter around the spawn origin
const SPAWN_JITTER_X: f32 = 5.0;
const SPAWN_JITTER_Y: f32 = 5.0;

/// Lifetime range in ticks
pub const LIFE_MIN: f32 = 80.0;
pub const LIFE_MAX: f32 = 180.0;

/// Height never shrinks below this fraction of the base size
const HEIGHT_FLOOR: f32 = 0.5;
const WIDTH_FLOOR: f32 = 0.1;
const WIDTH_SHRINK: f32 = 0.02;

/// Glow opacity relative to the flame
const GLOW_ALPHA: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct FlameParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub base_size: f32,
    pub height: f32,
    pub width: f32,
    pub life: f32,
    pub initial_life: f32,
    pub alpha: f32,
    pub display_alpha: f32,
    /// Sideways sway oscillator
    flame_angle: f32,
    angle_speed: f32,
    flame_swing: f32,
    flicker_speed: f32,
    flicker_intensity: f32,
    /// Internal clock driving wind and flicker
    time: f32,
    color_index: usize,
    color: Rgb8,
}

impl FlameParticle {
    pub fn color_index(&self) -> usize {
        self.color_index
    }

    fn update_display_alpha(&mut self) {
        let flicker = (self.time * self.flicker_speed).sin() * self.flicker_intensity;
        self.display_alpha = (self.alpha + flicker).clamp(0.0, 1.0);
    }

    /// Teardrop with its rounded base at the origin and the point facing up
    fn outline(&self) -> Path {
        let (w, h) = (self.width, self.height);
        let mut path = Path::new();
        path.move_to(Vec2::ZERO)
            .cubic_to(
                Vec2::new(w * 1.5, -h / 3.0),
                Vec2::new(w, -h / 2.0),
                Vec2::new(0.0, -h),
            )
            .cubic_to(
                Vec2::new(-w, -h / 2.0),
                Vec2::new(-w * 1.5, -h / 3.0),
                Vec2::ZERO,
            )
            .close();
        path
    }
}

impl Particle for FlameParticle {
    fn spawn(origin: Vec2, rng: &mut SimRng) -> Self {
        let base_size = rand_range(rng, 2.0, 7.0);
        let life = rand_range(rng, LIFE_MIN, LIFE_MAX);
        let (color_index, color) = palette::flame_at(rand_range(rng, 0.0, 1.0));

        let mut flame = Self {
            pos: origin
                + Vec2::new(
                    rand_range(rng, -SPAWN_JITTER_X, SPAWN_JITTER_X),
                    rand_range(rng, 0.0, SPAWN_JITTER_Y),
                ),
            vel: Vec2::new(rand_range(rng, -0.4, 0.4), rand_range(rng, -4.0, -1.5)),
            base_size,
            height: base_size * rand_range(rng, 3.0, 5.0),
            width: base_size * rand_range(rng, 0.5, 1.0),
            life,
            initial_life: life,
            alpha: 1.0,
            display_alpha: 1.0,
            flame_angle: rand_range(rng, 0.0, TAU),
            angle_speed: rand_range(rng, 0.03, 0.1),
            flame_swing: rand_range(rng, 0.1, 0.3),
            flicker_speed: rand_range(rng, 0.1, 0.3),
            flicker_intensity: rand_range(rng, 0.3, 0.8),
            time: rand_range(rng, 0.0, 100.0),
            color_index,
            color,
        };
        flame.update_display_alpha();
        flame
    }

    fn advance(&mut self, dt: f32, rng: &mut SimRng) {
        // Gravity, turbulence, then a slow sinusoidal wind
        self.vel.y += GRAVITY * dt;
        self.vel.x += rand_centered(rng, TURBULENCE) * dt;
        self.vel.x += (self.time * 0.1).sin() * WIND_FORCE * dt;

        self.pos.x += (self.vel.x + self.flame_angle.sin() * self.flame_swing) * dt;
        self.pos.y += self.vel.y * dt;
        self.flame_angle += self.angle_speed * dt;
        self.time += dt;

        self.life -= (1.0 + rand_range(rng, 0.0, 0.5)) * dt;
        let ratio = life_ratio(self.life, self.initial_life);
        self.alpha = ratio;

        // Height collapses first, faster as the flame ages
        let height_floor = self.base_size * HEIGHT_FLOOR;
        if self.height > height_floor {
            let shrink = 0.1 + (1.0 - ratio) * 0.2;
            self.height = (self.height - shrink * dt).max(height_floor);
        }
        if self.width > WIDTH_FLOOR {
            self.width = (self.width - WIDTH_SHRINK * dt).max(WIDTH_FLOOR);
        }

        let (index, color) = palette::flame_at(1.0 - ratio);
        self.color_index = index;
        self.color = color;

        self.update_display_alpha();
    }

    fn render(&self, surface: &mut dyn Surface) {
        if self.display_alpha <= 0.0 {
            return;
        }

        let gradient = RadialGradient {
            start: Vec2::ZERO,
            start_radius: 0.0,
            end: Vec2::new(0.0, -self.height / 2.0),
            end_radius: self.height,
            inner: self.color.alpha(self.display_alpha),
            outer: self.color.alpha(0.0),
        };

        surface.save();
        surface.translate(self.pos);
        surface.fill_path(&self.outline(), &Paint::Radial(gradient));
        surface.restore();

        surface.save();
        surface.set_blend(Blend::Lighter);
        surface.set_global_alpha(self.display_alpha * GLOW_ALPHA);
        surface.fill_circle(
            self.pos - Vec2::new(0.0, self.height / 2.0),
            self.height * 0.7,
            &Paint::Solid(self.color.alpha(GLOW_ALPHA)),
        );
        surface.restore();
    }

    fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    fn position(&self) -> Vec2 {
        self.pos
    }
}
