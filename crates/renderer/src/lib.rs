//! GPU compositing for the orb and lens.
//!
//! Structure:
//! - [`gpu::program`]: one reusable shader program over a static screen quad.
//! - [`gpu::bridge`]: view-to-texture streaming behind a mutex-guarded
//!   staging frame.
//! - [`gpu::metaball`] / [`gpu::lens`]: the two concrete renderers, both thin
//!   state-to-uniform pumps around [`gpu::program::ShaderProgram`].
//! - [`gpu::context`]: wgpu instance/surface/device bring-up for one window.
//!
//! Shader source is supplied by the caller as UTF-8 GLSL strings at
//! construction time; compile or link failure is fatal to construction
//! ([`types::ShaderError`]), never a degraded runtime mode.

mod compile;
pub mod gpu;
pub mod types;

pub use gpu::bridge::{FrameCanvas, TextureSource, ViewToTextureBridge};
pub use gpu::context::GpuContext;
pub use gpu::lens::LensRenderer;
pub use gpu::metaball::{field_weight, MetaballRenderer};
pub use gpu::program::{ProgramDescriptor, ShaderProgram};
pub use gpu::uniforms::{surface_mvp, BlitUniforms, LensUniforms, MetaballUniforms};
pub use types::{IconInstance, LensParams, MetaballFieldState, ShaderError};
