//! Platform abstraction layer
//!
//! Browser glue lives in [`web`]: canvas lookup and sizing, DOM input
//! translated into [`InputEvent`](crate::sim::InputEvent)s, and frame
//! scheduling. Native builds only run the simulation headless.

#[cfg(target_arch = "wasm32")]
pub mod web;
