//! Particle kinds
//!
//! Each kind owns its motion, aging and drawing rules. Pools only need the
//! shared [`Particle`] shape: spawn at an origin, advance, render, and report
//! whether it is still alive.

pub mod ember;
pub mod flame;
pub mod smoke;
pub mod spark;

pub use ember::EmberParticle;
pub use flame::FlameParticle;
pub use smoke::SmokeParticle;
pub use spark::SparkParticle;

use glam::Vec2;

use super::SimRng;
use crate::renderer::Surface;

/// Shared capability of every particle kind
pub trait Particle {
    /// Fresh particle anchored at `origin`
    fn spawn(origin: Vec2, rng: &mut SimRng) -> Self
    where
        Self: Sized;

    /// Advance by `dt` nominal ticks (1.0 = one 60 Hz frame)
    fn advance(&mut self, dt: f32, rng: &mut SimRng);

    fn render(&self, surface: &mut dyn Surface);

    fn is_alive(&self) -> bool;

    fn position(&self) -> Vec2;
}

/// Remaining life as a fraction of the initial life, in `[0, 1]`
#[inline]
pub(crate) fn life_ratio(life: f32, initial_life: f32) -> f32 {
    if initial_life > 0.0 {
        (life / initial_life).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
