//! Two-field metaball renderer.
//!
//! A pure state-to-uniform pump: the merging-blob visual is produced entirely
//! by the fragment shader from the two field states plus the surface
//! resolution. [`field_weight`] is the CPU port of the shader's field
//! function, kept bit-for-bit equivalent so the zero-radius invariant can be
//! property-tested without a GPU.

use glam::{Mat4, Vec2, Vec3};

use crate::gpu::program::{ProgramDescriptor, ShaderProgram};
use crate::gpu::uniforms::{surface_mvp, MetaballUniforms};
use crate::types::{IconInstance, MetaballFieldState, ShaderError};

/// Field contribution of one ball at `sample`. Matches the fragment shader:
/// `radius^2 / max(|sample - center|^2, epsilon)`, so weight 1.0 lies exactly
/// on the circle of `radius` and a radius of zero contributes nothing.
pub fn field_weight(sample: Vec2, center: Vec2, radius: f32) -> f32 {
    let d = sample - center;
    (radius * radius) / d.length_squared().max(1e-6)
}

pub struct MetaballRenderer {
    program: ShaderProgram,
    slot: MetaballFieldState,
    orb: MetaballFieldState,
    orb_icon_in: IconInstance,
    orb_icon_out: IconInstance,
    slot_icon: IconInstance,
    resolution: [f32; 2],
    mvp: Mat4,
}

impl MetaballRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        vertex_source: &str,
        fragment_source: &str,
        width: u32,
        height: u32,
    ) -> Result<Self, ShaderError> {
        let program = ShaderProgram::new(
            device,
            surface_format,
            &ProgramDescriptor {
                label: "metaball",
                vertex_source,
                fragment_source,
                uniform_size: std::mem::size_of::<MetaballUniforms>() as u64,
                texture_view: None,
            },
        )?;
        let dormant = MetaballFieldState::new(Vec2::ZERO, 0.0, Vec3::ONE);
        Ok(Self {
            program,
            slot: dormant,
            orb: dormant,
            orb_icon_in: IconInstance::default(),
            orb_icon_out: IconInstance::default(),
            slot_icon: IconInstance::default(),
            resolution: [width.max(1) as f32, height.max(1) as f32],
            mvp: surface_mvp(width as f32, height as f32),
        })
    }

    /// Projection and resolution follow the surface; zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.resolution = [width as f32, height as f32];
        self.mvp = surface_mvp(width as f32, height as f32);
    }

    pub fn set_slot(&mut self, state: MetaballFieldState) {
        self.slot = state;
    }

    pub fn set_orb(&mut self, state: MetaballFieldState) {
        self.orb = state;
    }

    pub fn orb(&self) -> &MetaballFieldState {
        &self.orb
    }

    /// Glyph layers drawn over the two field centres: the orb carries a
    /// crossfading pair, the slot a single layer.
    pub fn set_icons(&mut self, orb_in: IconInstance, orb_out: IconInstance, slot: IconInstance) {
        self.orb_icon_in = orb_in;
        self.orb_icon_out = orb_out;
        self.slot_icon = slot;
    }

    pub fn render(&self, queue: &wgpu::Queue, pass: &mut wgpu::RenderPass<'_>) {
        let uniforms = MetaballUniforms::new(
            self.mvp,
            self.resolution,
            &self.slot,
            &self.orb,
            self.orb_icon_in,
            self.orb_icon_out,
            self.slot_icon,
        );
        self.program.draw(queue, pass, &uniforms);
    }
}
