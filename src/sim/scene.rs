//! Fire scene / emitter
//!
//! Owns every pool, the source point the fire follows, the viewport and the
//! seeded RNG. One `tick` advances and paints all pools in a fixed order
//! (embers, smoke, flames, sparks) and finishes with the ambient light glow.

use glam::Vec2;
use rand::{Rng, SeedableRng};

use super::SimRng;
use super::input::InputEvent;
use super::particle::{EmberParticle, FlameParticle, Particle, SmokeParticle, SparkParticle};
use super::pool::{FixedPool, TransientPool};
use crate::consts::*;
use crate::rand_range;
use crate::renderer::{Blend, Paint, RadialGradient, Rgba, Surface};
use crate::settings::{PoolSizes, Settings};

/// Respawn spread around the source point for flames and embers
const CORE_SPREAD_X: f32 = 20.0;
const CORE_SPREAD_Y: f32 = 10.0;
/// Smoke starts wider and slightly above the source
const SMOKE_SPREAD_X: f32 = 30.0;
const SMOKE_LIFT: f32 = 10.0;

/// Scene construction parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneConfig {
    pub pools: PoolSizes,
    pub light_glow: bool,
}

impl From<&Settings> for SceneConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            pools: settings.pool_sizes(),
            light_glow: settings.light_glow,
        }
    }
}

fn core_origin(source: Vec2, rng: &mut SimRng) -> Vec2 {
    source
        + Vec2::new(
            rand_range(rng, -CORE_SPREAD_X, CORE_SPREAD_X),
            rand_range(rng, 0.0, CORE_SPREAD_Y),
        )
}

fn smoke_origin(source: Vec2, rng: &mut SimRng) -> Vec2 {
    Vec2::new(
        source.x + rand_range(rng, -SMOKE_SPREAD_X, SMOKE_SPREAD_X),
        source.y - SMOKE_LIFT,
    )
}

/// Sparks thrown off by a flame as it burns out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlameDeathBurst {
    /// Tip of the dying flame
    pub at: Vec2,
    pub count: usize,
}

/// Roll for a death burst from a flame that just burned out
pub fn flame_death_burst(dead: &FlameParticle, rng: &mut SimRng) -> Option<FlameDeathBurst> {
    if rng.random::<f32>() >= FLAME_DEATH_SPARK_CHANCE {
        return None;
    }
    Some(FlameDeathBurst {
        at: dead.pos - Vec2::new(0.0, dead.height / 2.0),
        count: rng.random_range(FLAME_DEATH_SPARKS_MIN..=FLAME_DEATH_SPARKS_MAX),
    })
}

/// Default source point: horizontally centered, near the bottom
pub fn default_source(viewport: Vec2) -> Vec2 {
    Vec2::new(viewport.x / 2.0, viewport.y - SOURCE_BOTTOM_OFFSET)
}

/// The whole fire
#[derive(Debug, Clone)]
pub struct Scene {
    /// Spawn anchor for every pool and the light glow
    pub source: Vec2,
    pressed: bool,
    viewport: Vec2,
    light_glow: bool,
    rng: SimRng,
    ticks: u64,
    embers: FixedPool<EmberParticle>,
    smoke: FixedPool<SmokeParticle>,
    flames: FixedPool<FlameParticle>,
    sparks: TransientPool<SparkParticle>,
    death_bursts: Vec<FlameDeathBurst>,
}

impl Scene {
    /// Create a scene for `viewport` using the configured pool sizes
    pub fn new(viewport: Vec2, settings: &Settings, seed: u64) -> Self {
        Self::with_config(viewport, SceneConfig::from(settings), seed)
    }

    pub fn with_config(viewport: Vec2, config: SceneConfig, seed: u64) -> Self {
        let mut rng = SimRng::seed_from_u64(seed);
        let source = default_source(viewport);
        let PoolSizes {
            flames,
            embers,
            smoke,
        } = config.pools;

        let embers = FixedPool::filled(embers, &mut rng, |rng| {
            EmberParticle::spawn(core_origin(source, rng), rng)
        });
        let flames = FixedPool::filled(flames, &mut rng, |rng| {
            FlameParticle::spawn(core_origin(source, rng), rng)
        });
        let smoke = FixedPool::filled(smoke, &mut rng, |rng| {
            SmokeParticle::spawn(smoke_origin(source, rng), rng)
        });

        log::info!(
            "Fire lit at ({:.0}, {:.0}): {} flames, {} embers, {} smoke (seed {})",
            source.x,
            source.y,
            flames.len(),
            embers.len(),
            smoke.len(),
            seed
        );

        Self {
            source,
            pressed: false,
            viewport,
            light_glow: config.light_glow,
            rng,
            ticks: 0,
            embers,
            smoke,
            flames,
            sparks: TransientPool::new(),
            death_bursts: Vec::new(),
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn flames(&self) -> &FixedPool<FlameParticle> {
        &self.flames
    }

    pub fn embers(&self) -> &FixedPool<EmberParticle> {
        &self.embers
    }

    pub fn smoke(&self) -> &FixedPool<SmokeParticle> {
        &self.smoke
    }

    pub fn sparks(&self) -> &TransientPool<SparkParticle> {
        &self.sparks
    }

    /// Flame-death bursts fired during the last tick
    pub fn last_death_bursts(&self) -> &[FlameDeathBurst] {
        &self.death_bursts
    }

    /// Total live particles across all pools
    pub fn particle_count(&self) -> usize {
        self.flames.len() + self.embers.len() + self.smoke.len() + self.sparks.len()
    }

    pub fn set_light_glow(&mut self, enabled: bool) {
        self.light_glow = enabled;
    }

    /// Advance every pool by `dt` ticks and paint it onto `surface`
    pub fn tick(&mut self, surface: &mut dyn Surface, dt: f32) {
        let source = self.source;

        self.embers.step(surface, dt, &mut self.rng, |_, rng| {
            EmberParticle::spawn(core_origin(source, rng), rng)
        });

        self.smoke.step(surface, dt, &mut self.rng, |_, rng| {
            SmokeParticle::spawn(smoke_origin(source, rng), rng)
        });

        // A few dying flames throw sparks from where they burned out
        let mut death_bursts = std::mem::take(&mut self.death_bursts);
        death_bursts.clear();
        self.flames.step(surface, dt, &mut self.rng, |dead, rng| {
            death_bursts.extend(flame_death_burst(dead, rng));
            FlameParticle::spawn(core_origin(source, rng), rng)
        });
        for burst in &death_bursts {
            self.sparks.burst(burst.at, burst.count, &mut self.rng);
        }
        self.death_bursts = death_bursts;

        self.sparks.step(surface, dt, &mut self.rng);

        if self.light_glow {
            self.render_light(surface);
        }

        self.ticks += 1;
    }

    /// Append `count` sparks at `at`
    pub fn trigger_burst(&mut self, at: Vec2, count: usize) {
        log::debug!("Burst of {} sparks at ({:.0}, {:.0})", count, at.x, at.y);
        self.sparks.burst(at, count, &mut self.rng);
    }

    /// Apply one input event between ticks
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove(p) | InputEvent::TouchMove(p) => {
                self.source = p;
            }
            InputEvent::PointerDown(p) | InputEvent::TouchStart(p) => {
                self.source = p;
                self.pressed = true;
                self.trigger_burst(p, BURST_SPARKS);
            }
            InputEvent::PointerUp | InputEvent::TouchEnd => {
                self.pressed = false;
            }
            InputEvent::Resize(size) => {
                // Live particles stay where they are; only future layout changes
                log::info!("Viewport resized to {:.0}x{:.0}", size.x, size.y);
                self.viewport = size;
            }
        }
    }

    /// Move the source point to the intro position and return it
    pub fn recenter(&mut self) -> Vec2 {
        self.source = Vec2::new(self.viewport.x / 2.0, self.viewport.y - INTRO_BOTTOM_OFFSET);
        self.source
    }

    /// Warm additive glow under the fire
    fn render_light(&self, surface: &mut dyn Surface) {
        let gradient = RadialGradient::centered(
            self.source,
            LIGHT_RADIUS,
            Rgba::from_rgb8(255, 120, 20, 0.3),
            Rgba::from_rgb8(255, 80, 0, 0.0),
        );

        surface.save();
        surface.set_blend(Blend::Lighter);
        surface.fill_circle(self.source, LIGHT_RADIUS, &Paint::Radial(gradient));
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::MeshSurface;
    use proptest::prelude::*;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn sparks_only() -> SceneConfig {
        SceneConfig {
            pools: PoolSizes {
                flames: 0,
                embers: 0,
                smoke: 0,
            },
            light_glow: false,
        }
    }

    fn run(scene: &mut Scene, ticks: usize) {
        let mut mesh = MeshSurface::new(scene.viewport());
        for _ in 0..ticks {
            mesh.clear();
            scene.tick(&mut mesh, 1.0);
        }
    }

    #[test]
    fn test_initial_layout() {
        let scene = Scene::new(VIEWPORT, &Settings::default(), 1);
        assert_eq!(scene.source, Vec2::new(400.0, 550.0));
        assert_eq!(scene.flames().len(), 250);
        assert_eq!(scene.embers().len(), 20);
        assert_eq!(scene.smoke().len(), 30);
        assert!(scene.sparks().is_empty());
    }

    #[test]
    fn test_fixed_pools_never_change_size() {
        let mut scene = Scene::new(VIEWPORT, &Settings::default(), 2);
        run(&mut scene, 400);
        assert_eq!(scene.flames().len(), 250);
        assert_eq!(scene.embers().len(), 20);
        assert_eq!(scene.smoke().len(), 30);
        assert_eq!(scene.ticks(), 400);
    }

    #[test]
    fn test_burst_then_burn_out() {
        use std::collections::HashMap;

        let mut scene = Scene::with_config(VIEWPORT, sparks_only(), 3);
        assert!(scene.flames().is_empty());
        scene.trigger_burst(Vec2::new(100.0, 100.0), 50);
        assert_eq!(scene.sparks().len(), 50);

        // Initial life is a per-spark random draw, good enough as an identity
        let spawn_sizes: HashMap<u32, f32> = scene
            .sparks()
            .iter()
            .map(|s| (s.initial_life.to_bits(), s.size))
            .collect();
        assert_eq!(spawn_sizes.len(), 50);

        // Shorter than the minimum spark life, so only size can have killed any
        run(&mut scene, 9);
        assert!(!scene.sparks().is_empty());
        assert!(scene.sparks().len() <= 50);
        for spark in scene.sparks().iter() {
            let spawn_size = spawn_sizes[&spark.initial_life.to_bits()];
            assert!(spark.size < spawn_size);
            assert!((spark.size - (spawn_size - 9.0 * 0.05)).abs() < 1e-4);
        }

        run(&mut scene, 31);
        assert!(scene.sparks().is_empty());
    }

    #[test]
    fn test_sparks_never_grow_without_a_trigger() {
        let mut scene = Scene::with_config(VIEWPORT, sparks_only(), 4);
        scene.trigger_burst(Vec2::new(100.0, 100.0), 30);
        let mut mesh = MeshSurface::new(VIEWPORT);
        let mut previous = scene.sparks().len();
        for _ in 0..50 {
            mesh.clear();
            scene.tick(&mut mesh, 1.0);
            assert!(scene.sparks().len() <= previous);
            previous = scene.sparks().len();
        }
        assert!(scene.sparks().is_empty());
    }

    #[test]
    fn test_death_burst_comes_from_the_dying_flame_tip() {
        let mut rng = SimRng::seed_from_u64(50);
        let mut flame = FlameParticle::spawn(Vec2::new(100.0, 100.0), &mut rng);
        flame.pos = Vec2::new(120.0, 40.0);
        flame.height = 16.0;
        flame.life = 0.0;

        let bursts: Vec<FlameDeathBurst> = (0..4000)
            .filter_map(|_| flame_death_burst(&flame, &mut rng))
            .collect();

        // 5% of 4000
        assert!((120..=280).contains(&bursts.len()), "{} bursts", bursts.len());
        for burst in &bursts {
            assert_eq!(burst.at, Vec2::new(120.0, 32.0));
            assert!((FLAME_DEATH_SPARKS_MIN..=FLAME_DEATH_SPARKS_MAX).contains(&burst.count));
        }
        assert!(bursts.iter().any(|b| b.count == FLAME_DEATH_SPARKS_MIN));
        assert!(bursts.iter().any(|b| b.count == FLAME_DEATH_SPARKS_MAX));
    }

    #[test]
    fn test_flame_deaths_seed_sparks_at_their_tips() {
        let mut scene = Scene::new(VIEWPORT, &Settings::default(), 5);
        let mut mesh = MeshSurface::new(VIEWPORT);
        let mut bursts_seen = 0;

        for _ in 0..2000 {
            mesh.clear();
            scene.tick(&mut mesh, 1.0);

            let bursts = scene.last_death_bursts();
            bursts_seen += bursts.len();
            for burst in bursts {
                assert!((FLAME_DEATH_SPARKS_MIN..=FLAME_DEATH_SPARKS_MAX).contains(&burst.count));
                // The replacement flame respawns at the source, not at the tip
                assert!(scene.flames().iter().all(|f| f.pos != burst.at));
            }

            // Sparks born this tick have advanced exactly once
            let newborn: Vec<&SparkParticle> = scene
                .sparks()
                .iter()
                .filter(|s| s.life == s.initial_life - 1.0)
                .collect();
            let expected: usize = bursts.iter().map(|b| b.count).sum();
            assert_eq!(newborn.len(), expected);

            // Undo one step of gravity/integrate/drag to recover the origin
            for spark in newborn {
                let origin = spark.pos - spark.vel / SPARK_DRAG;
                assert!(
                    bursts.iter().any(|b| b.at.distance(origin) < 1e-2),
                    "spark born at {origin:?} away from every dying flame"
                );
            }
        }
        assert!(bursts_seen > 50);
    }

    #[test]
    fn test_pointer_events() {
        let mut scene = Scene::with_config(VIEWPORT, sparks_only(), 6);

        scene.handle_input(InputEvent::PointerMove(Vec2::new(10.0, 20.0)));
        assert_eq!(scene.source, Vec2::new(10.0, 20.0));
        assert!(!scene.is_pressed());

        scene.handle_input(InputEvent::PointerDown(Vec2::new(30.0, 40.0)));
        assert!(scene.is_pressed());
        assert_eq!(scene.sparks().len(), BURST_SPARKS);
        assert!(scene.sparks().iter().all(|s| s.pos == Vec2::new(30.0, 40.0)));

        scene.handle_input(InputEvent::PointerUp);
        assert!(!scene.is_pressed());

        scene.handle_input(InputEvent::TouchStart(Vec2::new(1.0, 2.0)));
        assert_eq!(scene.sparks().len(), 2 * BURST_SPARKS);
        scene.handle_input(InputEvent::TouchMove(Vec2::new(-50.0, 9000.0)));
        assert_eq!(scene.source, Vec2::new(-50.0, 9000.0));
        scene.handle_input(InputEvent::TouchEnd);
        assert!(!scene.is_pressed());
    }

    #[test]
    fn test_resize_does_not_move_particles() {
        let mut scene = Scene::new(VIEWPORT, &Settings::default(), 7);
        run(&mut scene, 10);
        let before: Vec<Vec2> = scene.flames().iter().map(|f| f.position()).collect();
        let source = scene.source;

        scene.handle_input(InputEvent::Resize(Vec2::new(320.0, 240.0)));

        let after: Vec<Vec2> = scene.flames().iter().map(|f| f.position()).collect();
        assert_eq!(before, after);
        assert_eq!(scene.source, source);
        assert_eq!(scene.viewport(), Vec2::new(320.0, 240.0));
        assert_eq!(scene.recenter(), Vec2::new(160.0, 140.0));
    }

    #[test]
    fn test_light_glow_is_drawn_last() {
        let mut scene = Scene::with_config(VIEWPORT, sparks_only(), 8);
        scene.set_light_glow(true);
        let mut mesh = MeshSurface::new(VIEWPORT);
        scene.tick(&mut mesh, 1.0);
        let batches = mesh.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].blend, Blend::Lighter);
        // Glow center is the source point at 0.3 alpha
        let center = batches[0].vertices[0];
        assert_eq!(center.position, scene.source.to_array());
        assert!((center.color[3] - 0.3).abs() < 1e-5);
    }

    /// Records where each fill lands, in call order
    #[derive(Default)]
    struct FillLog {
        offset: Vec2,
        stack: Vec<Vec2>,
        fills: Vec<(Vec2, f32)>,
    }

    impl FillLog {
        fn first_fill_at(&self, p: Vec2) -> usize {
            self.fills
                .iter()
                .position(|(at, _)| *at == p)
                .unwrap_or_else(|| panic!("nothing drawn at {p:?}"))
        }
    }

    impl Surface for FillLog {
        fn size(&self) -> Vec2 {
            VIEWPORT
        }
        fn save(&mut self) {
            self.stack.push(self.offset);
        }
        fn restore(&mut self) {
            if let Some(offset) = self.stack.pop() {
                self.offset = offset;
            }
        }
        fn translate(&mut self, offset: Vec2) {
            self.offset += offset;
        }
        fn rotate(&mut self, _angle: f32) {}
        fn set_global_alpha(&mut self, _alpha: f32) {}
        fn set_blend(&mut self, _blend: Blend) {}
        fn set_shadow(&mut self, _shadow: Option<crate::renderer::Shadow>) {}
        fn fill_rect(&mut self, min: Vec2, _size: Vec2, _paint: &Paint) {
            self.fills.push((self.offset + min, 0.0));
        }
        fn fill_circle(&mut self, center: Vec2, radius: f32, _paint: &Paint) {
            self.fills.push((self.offset + center, radius));
        }
        fn fill_path(&mut self, _path: &crate::renderer::Path, _paint: &Paint) {
            self.fills.push((self.offset, 0.0));
        }
    }

    #[test]
    fn test_pools_paint_in_fixed_order() {
        let config = SceneConfig {
            pools: PoolSizes {
                flames: 1,
                embers: 1,
                smoke: 1,
            },
            light_glow: true,
        };
        let mut scene = Scene::with_config(VIEWPORT, config, 12);
        scene.trigger_burst(Vec2::new(700.0, 100.0), 1);

        let mut log = FillLog::default();
        scene.tick(&mut log, 1.0);

        let one = |p: Option<Vec2>| p.unwrap_or_else(|| panic!("empty pool"));
        let ember = log.first_fill_at(one(scene.embers().iter().next().map(|p| p.position())));
        let smoke = log.first_fill_at(one(scene.smoke().iter().next().map(|p| p.position())));
        let flame = log.first_fill_at(one(scene.flames().iter().next().map(|p| p.position())));
        let spark = log.first_fill_at(one(scene.sparks().iter().next().map(|p| p.position())));
        let glow = log.first_fill_at(scene.source);

        assert!(ember < smoke, "ember {ember} smoke {smoke}");
        assert!(smoke < flame, "smoke {smoke} flame {flame}");
        assert!(flame < spark, "flame {flame} spark {spark}");
        assert!(spark < glow, "spark {spark} glow {glow}");
        assert_eq!(glow, log.fills.len() - 1);
        assert_eq!(log.fills[glow].1, LIGHT_RADIUS);
    }

    #[test]
    fn test_same_seed_same_fire() {
        let mut a = Scene::new(VIEWPORT, &Settings::default(), 99999);
        let mut b = Scene::new(VIEWPORT, &Settings::default(), 99999);
        a.trigger_burst(Vec2::new(400.0, 300.0), 50);
        b.trigger_burst(Vec2::new(400.0, 300.0), 50);
        run(&mut a, 60);
        run(&mut b, 60);

        assert_eq!(a.sparks().len(), b.sparks().len());
        let pa: Vec<Vec2> = a.flames().iter().map(|f| f.position()).collect();
        let pb: Vec<Vec2> = b.flames().iter().map(|f| f.position()).collect();
        assert_eq!(pa, pb);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_burst_adds_exactly_n(seed in any::<u64>(), n in 0usize..200) {
            let mut scene = Scene::with_config(VIEWPORT, sparks_only(), seed);
            scene.trigger_burst(Vec2::ZERO, 5);
            let before = scene.sparks().len();
            scene.trigger_burst(Vec2::new(1.0, 1.0), n);
            prop_assert_eq!(scene.sparks().len(), before + n);
        }
    }
}
