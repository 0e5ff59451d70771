//! Fire simulation
//!
//! Everything here is deterministic for a given seed and frame-time
//! sequence, and draws only through the [`Surface`](crate::renderer::Surface)
//! trait:
//! - Seeded RNG only
//! - Pools iterate in stable slot order
//! - No platform dependencies

pub mod driver;
pub mod input;
pub mod palette;
pub mod particle;
pub mod pool;
pub mod scene;

/// Simulation RNG
pub type SimRng = rand_pcg::Pcg32;

pub use driver::{Driver, frame_scale};
pub use input::InputEvent;
pub use particle::{EmberParticle, FlameParticle, Particle, SmokeParticle, SparkParticle};
pub use pool::{FixedPool, TransientPool};
pub use scene::{Scene, SceneConfig, default_source};
