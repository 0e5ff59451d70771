//! Sparks
//!
//! Short-lived bright specks thrown out in bursts. Unlike the other kinds
//! they are not respawned: a dead spark is removed from its pool.

use glam::Vec2;

use super::{Particle, life_ratio};
use crate::consts::{SPARK_DRAG, SPARK_GRAVITY};
use crate::rand_range;
use crate::renderer::{Blend, Paint, Surface};
use crate::sim::SimRng;
use crate::sim::palette::{self, Rgb8};

pub const LIFE_MIN: f32 = 10.0;
pub const LIFE_MAX: f32 = 40.0;
/// Launch speed range per axis
const SPEED: f32 = 4.0;
const SHRINK: f32 = 0.05;
/// Sparks at or below this size are dead
pub const MIN_SIZE: f32 = 0.1;
const HALO_ALPHA: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct SparkParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub life: f32,
    pub initial_life: f32,
    pub alpha: f32,
    pub gravity: f32,
    pub drag: f32,
    color: Rgb8,
}

impl SparkParticle {
    /// Spark with explicit kinematics and the default gravity/drag
    pub fn new(pos: Vec2, vel: Vec2, size: f32, life: f32, color: Rgb8) -> Self {
        Self {
            pos,
            vel,
            size,
            life,
            initial_life: life,
            alpha: 1.0,
            gravity: SPARK_GRAVITY,
            drag: SPARK_DRAG,
            color,
        }
    }
}

impl Particle for SparkParticle {
    fn spawn(origin: Vec2, rng: &mut SimRng) -> Self {
        let size = rand_range(rng, 0.5, 2.5);
        let vel = Vec2::new(rand_range(rng, -SPEED, SPEED), rand_range(rng, -SPEED, SPEED));
        let index = palette::index_for(rand_range(rng, 0.0, 1.0), palette::SPARK_SPAN);
        let life = rand_range(rng, LIFE_MIN, LIFE_MAX);
        Self::new(origin, vel, size, life, palette::FLAME[index])
    }

    fn advance(&mut self, dt: f32, _rng: &mut SimRng) {
        // Gravity, integrate, then air resistance
        self.vel.y += self.gravity * dt;
        self.pos += self.vel * dt;
        self.vel *= self.drag.powf(dt);

        self.life -= dt;
        self.alpha = life_ratio(self.life, self.initial_life);

        if self.size > MIN_SIZE {
            self.size = (self.size - SHRINK * dt).max(MIN_SIZE);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.fill_circle(self.pos, self.size, &Paint::Solid(self.color.alpha(self.alpha)));

        surface.save();
        surface.set_blend(Blend::Lighter);
        surface.fill_circle(
            self.pos,
            self.size * 2.0,
            &Paint::Solid(self.color.alpha(self.alpha * HALO_ALPHA)),
        );
        surface.restore();
    }

    fn is_alive(&self) -> bool {
        self.life > 0.0 && self.size > MIN_SIZE
    }

    fn position(&self) -> Vec2 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_single_tick_kinematics() {
        let mut rng = SimRng::seed_from_u64(0);
        let mut spark = SparkParticle::new(
            Vec2::ZERO,
            Vec2::new(4.0, -4.0),
            2.0,
            30.0,
            palette::FLAME[0],
        );
        spark.advance(1.0, &mut rng);

        assert!(approx(spark.pos.x, 4.0));
        assert!(approx(spark.pos.y, -3.94));
        assert!(approx(spark.vel.x, 3.84));
        assert!(approx(spark.vel.y, -3.7824));
        assert!(approx(spark.size, 1.95));
        assert!(approx(spark.alpha, 29.0 / 30.0));
    }

    #[test]
    fn test_dies_by_life_or_size() {
        let mut rng = SimRng::seed_from_u64(0);
        let color = palette::FLAME[1];

        let mut short = SparkParticle::new(Vec2::ZERO, Vec2::ZERO, 2.0, 1.0, color);
        short.advance(1.0, &mut rng);
        assert!(!short.is_alive());

        let mut tiny = SparkParticle::new(Vec2::ZERO, Vec2::ZERO, 0.12, 30.0, color);
        tiny.advance(1.0, &mut rng);
        assert_eq!(tiny.size, MIN_SIZE);
        assert!(!tiny.is_alive());
    }

    #[test]
    fn test_spawn_uses_bright_colors() {
        let mut rng = SimRng::seed_from_u64(21);
        for _ in 0..100 {
            let spark = SparkParticle::spawn(Vec2::new(5.0, 5.0), &mut rng);
            assert_eq!(spark.pos, Vec2::new(5.0, 5.0));
            assert!(palette::FLAME[..palette::SPARK_SPAN].contains(&spark.color));
            assert!(spark.vel.x.abs() <= SPEED && spark.vel.y.abs() <= SPEED);
        }
    }

    proptest! {
        #[test]
        fn prop_alpha_in_unit_range(seed in any::<u64>()) {
            let mut rng = SimRng::seed_from_u64(seed);
            let mut spark = SparkParticle::spawn(Vec2::ZERO, &mut rng);
            let spawn_size = spark.size;
            while spark.is_alive() {
                spark.advance(1.0, &mut rng);
                prop_assert!((0.0..=1.0).contains(&spark.alpha));
                prop_assert!(spark.size < spawn_size);
            }
        }
    }
}
