//! Particle pools
//!
//! - [`FixedPool`]: constant population; a dead particle's slot is
//!   overwritten in place with a fresh one (flames, embers, smoke).
//! - [`TransientPool`]: grows on bursts; dead particles are compacted away
//!   once per step (sparks).

use glam::Vec2;

use super::SimRng;
use super::particle::Particle;
use crate::renderer::Surface;

/// Fixed-size arena with respawn-in-place
#[derive(Debug, Clone)]
pub struct FixedPool<P> {
    slots: Vec<P>,
}

impl<P: Particle> FixedPool<P> {
    /// Fill `count` slots from `spawn`
    pub fn filled(count: usize, rng: &mut SimRng, mut spawn: impl FnMut(&mut SimRng) -> P) -> Self {
        let slots = (0..count).map(|_| spawn(rng)).collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.slots.iter()
    }

    /// Advance and render every slot in order, then replace the dead.
    ///
    /// `respawn` sees the particle that just died and returns its
    /// replacement; the slot keeps its index.
    pub fn step(
        &mut self,
        surface: &mut dyn Surface,
        dt: f32,
        rng: &mut SimRng,
        mut respawn: impl FnMut(&P, &mut SimRng) -> P,
    ) {
        for slot in &mut self.slots {
            slot.advance(dt, rng);
            slot.render(surface);
            if !slot.is_alive() {
                *slot = respawn(slot, rng);
            }
        }
    }
}

/// Variable-size pool whose dead members are removed
#[derive(Debug, Clone, Default)]
pub struct TransientPool<P> {
    live: Vec<P>,
}

impl<P: Particle> TransientPool<P> {
    pub fn new() -> Self {
        Self { live: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.live.iter()
    }

    /// Append `count` fresh particles at `origin`
    pub fn burst(&mut self, origin: Vec2, count: usize, rng: &mut SimRng) {
        self.live.reserve(count);
        self.live.extend((0..count).map(|_| P::spawn(origin, rng)));
    }

    /// Advance and render every member, then compact out the dead
    pub fn step(&mut self, surface: &mut dyn Surface, dt: f32, rng: &mut SimRng) {
        for particle in &mut self.live {
            particle.advance(dt, rng);
            particle.render(surface);
        }
        self.live.retain(|p| p.is_alive());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::MeshSurface;
    use crate::sim::particle::{EmberParticle, SparkParticle};
    use rand::SeedableRng;

    fn surface() -> MeshSurface {
        MeshSurface::new(Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_fixed_pool_keeps_population() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut pool = FixedPool::filled(20, &mut rng, |rng| EmberParticle::spawn(Vec2::ZERO, rng));
        let mut mesh = surface();
        let mut respawns = 0;

        // Long enough for every ember to die at least once
        for _ in 0..1300 {
            mesh.clear();
            pool.step(&mut mesh, 1.0, &mut rng, |_, rng| {
                respawns += 1;
                EmberParticle::spawn(Vec2::new(10.0, 10.0), rng)
            });
            assert_eq!(pool.len(), 20);
        }
        assert!(respawns >= 20);
        assert!(pool.iter().all(|e| e.is_alive()));
    }

    #[test]
    fn test_respawn_sees_the_dead_particle() {
        let mut rng = SimRng::seed_from_u64(2);
        let mut pool = FixedPool::filled(1, &mut rng, |_| {
            SparkParticle::new(Vec2::new(7.0, 7.0), Vec2::ZERO, 2.0, 1.0, crate::sim::palette::FLAME[0])
        });
        let mut seen = None;
        pool.step(&mut surface(), 1.0, &mut rng, |dead, rng| {
            seen = Some(dead.life);
            SparkParticle::spawn(Vec2::ZERO, rng)
        });
        assert_eq!(seen, Some(0.0));
        assert_eq!(pool.iter().next().map(|s| s.pos), Some(Vec2::ZERO));
    }

    #[test]
    fn test_burst_grows_by_exactly_count() {
        let mut rng = SimRng::seed_from_u64(3);
        let mut sparks: TransientPool<SparkParticle> = TransientPool::new();
        sparks.burst(Vec2::ZERO, 50, &mut rng);
        assert_eq!(sparks.len(), 50);
        sparks.burst(Vec2::ZERO, 7, &mut rng);
        assert_eq!(sparks.len(), 57);
    }

    #[test]
    fn test_transient_pool_only_shrinks_when_stepped() {
        let mut rng = SimRng::seed_from_u64(4);
        let mut sparks: TransientPool<SparkParticle> = TransientPool::new();
        sparks.burst(Vec2::new(400.0, 300.0), 50, &mut rng);
        let mut mesh = surface();

        let mut previous = sparks.len();
        while !sparks.is_empty() {
            mesh.clear();
            sparks.step(&mut mesh, 1.0, &mut rng);
            assert!(sparks.len() <= previous);
            previous = sparks.len();
        }
    }
}
