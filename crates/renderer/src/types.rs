//! Shared renderer-facing types.
//!
//! Types:
//! - [`MetaballFieldState`]: position/radius/colour of one circular field.
//! - [`LensParams`]: everything the lens fragment shader is driven by.
//! - [`ShaderError`]: fatal shader build failures.

use glam::{Vec2, Vec3};
use thiserror::Error;

/// One circular metaball field. Two of these (slot and orb) feed the
/// metaball fragment shader; a radius of zero contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetaballFieldState {
    /// Centre in surface pixels, origin top-left.
    pub position: Vec2,
    /// Field radius in pixels, never negative.
    pub radius: f32,
    /// Linear RGB in `[0, 1]`.
    pub color: Vec3,
}

impl MetaballFieldState {
    pub fn new(position: Vec2, radius: f32, color: Vec3) -> Self {
        Self {
            position,
            radius: radius.max(0.0),
            color,
        }
    }
}

/// One procedurally drawn glyph layer at a field centre. `kind` selects the
/// glyph in the fragment shader (0 draws nothing); alpha and scale carry the
/// crossfade the host computes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IconInstance {
    pub kind: f32,
    pub alpha: f32,
    pub scale: f32,
}

impl IconInstance {
    pub fn new(kind: f32, alpha: f32, scale: f32) -> Self {
        Self { kind, alpha, scale }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.kind, self.alpha, self.scale, 0.0]
    }
}

/// Lens appearance parameters, uploaded verbatim as uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensParams {
    /// Lens centre in surface pixels.
    pub position: Vec2,
    /// Lens radius as a fraction of the surface width.
    pub radius_fraction: f32,
    /// Output alpha in `[0, 1]`.
    pub alpha: f32,
    /// Magnification strength.
    pub zoom: f32,
    /// Distortion falloff towards the rim.
    pub bend: f32,
    /// Dark rim width in pixels.
    pub border_width: f32,
}

impl Default for LensParams {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            radius_fraction: 0.0,
            alpha: 0.0,
            zoom: 0.4,
            bend: 0.8,
            border_width: 3.0,
        }
    }
}

/// Fatal shader build failures. Construction-time only; a renderer that
/// failed to build its program is never handed out in a degraded state.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to compile {stage} shader `{label}`: {message}")]
    Compile {
        label: String,
        stage: &'static str,
        message: String,
    },
    #[error("failed to link program `{label}`: {message}")]
    Link { label: String, message: String },
}
