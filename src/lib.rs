//! Hearth - An interactive particle fire
//!
//! Core modules:
//! - `sim`: Particle simulation (palettes, particle kinds, pools, scene, driver)
//! - `renderer`: Drawing surface abstraction, tessellation and WebGPU presentation
//! - `platform`: Browser glue (canvas, input events, frame scheduling)
//! - `settings`: Quality presets and toggles
//! - `error`: Setup failures

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::SetupError;
pub use settings::{QualityPreset, Settings};

/// Simulation tuning constants
///
/// Values are per nominal 60 Hz tick; they were tuned by eye, not derived.
pub mod consts {
    /// Nominal frame duration the per-tick constants are tuned for (ms)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest frame scale a single tick may advance (tab switches, hitches)
    pub const MAX_FRAME_SCALE: f32 = 3.0;

    /// Downward acceleration applied to flames
    pub const GRAVITY: f32 = 0.03;
    /// Amplitude of the sinusoidal sideways wind on flames
    pub const WIND_FORCE: f32 = 0.015;
    /// Amplitude of random sideways jitter on flames
    pub const TURBULENCE: f32 = 0.02;

    /// Spark gravity and air resistance
    pub const SPARK_GRAVITY: f32 = 0.06;
    pub const SPARK_DRAG: f32 = 0.96;

    /// Chance that a dying flame throws off a few sparks
    pub const FLAME_DEATH_SPARK_CHANCE: f32 = 0.05;
    /// Spark count range for a flame-death burst (inclusive)
    pub const FLAME_DEATH_SPARKS_MIN: usize = 3;
    pub const FLAME_DEATH_SPARKS_MAX: usize = 7;
    /// Sparks fired on click/tap and by the startup schedule
    pub const BURST_SPARKS: usize = 50;

    /// Ambient light glow under the source point
    pub const LIGHT_RADIUS: f32 = 150.0;

    /// Alpha of the black overlay that produces motion trails
    pub const TRAIL_FADE_ALPHA: f32 = 0.1;

    /// Default source point distance from the bottom edge
    pub const SOURCE_BOTTOM_OFFSET: f32 = 50.0;
    /// Source point distance from the bottom edge after the intro recenter
    pub const INTRO_BOTTOM_OFFSET: f32 = 100.0;
    /// Intro burst height above the recentered source point
    pub const INTRO_BURST_LIFT: f32 = 30.0;
    /// Delay between the first frame and the intro recenter (ms)
    pub const INTRO_DELAY_MS: f64 = 500.0;
}

/// Uniform random value in `[lo, hi)`
#[inline]
pub fn rand_range(rng: &mut sim::SimRng, lo: f32, hi: f32) -> f32 {
    use rand::Rng;
    lo + rng.random::<f32>() * (hi - lo)
}

/// Random value centered on zero: `(r - 0.5) * scale`
#[inline]
pub fn rand_centered(rng: &mut sim::SimRng, scale: f32) -> f32 {
    use rand::Rng;
    (rng.random::<f32>() - 0.5) * scale
}
