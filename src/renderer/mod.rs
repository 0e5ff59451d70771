//! Rendering
//!
//! The simulation draws through the canvas-like [`Surface`] trait.
//! [`MeshSurface`] tessellates those calls into blend-mode batches and
//! [`GpuRenderer`] composites them with WebGPU.

pub mod mesh;
pub mod pipeline;
pub mod surface;
pub mod vertex;

pub use mesh::{Batch, MeshSurface};
pub use pipeline::GpuRenderer;
pub use surface::{Blend, Paint, Path, RadialGradient, Rgba, Shadow, Surface};
pub use vertex::Vertex;
