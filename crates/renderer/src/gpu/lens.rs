//! Magnifying-lens renderer over the bridged view texture.

use glam::Mat4;

use crate::gpu::bridge::TextureSource;
use crate::gpu::program::{ProgramDescriptor, ShaderProgram};
use crate::gpu::uniforms::{surface_mvp, LensUniforms};
use crate::types::{LensParams, ShaderError};

pub struct LensRenderer {
    program: ShaderProgram,
    params: LensParams,
    resolution: [f32; 2],
    mvp: Mat4,
}

impl LensRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        vertex_source: &str,
        fragment_source: &str,
        source: &dyn TextureSource,
        width: u32,
        height: u32,
    ) -> Result<Self, ShaderError> {
        let program = ShaderProgram::new(
            device,
            surface_format,
            &ProgramDescriptor {
                label: "lens",
                vertex_source,
                fragment_source,
                uniform_size: std::mem::size_of::<LensUniforms>() as u64,
                texture_view: Some(source.texture_view()),
            },
        )?;
        Ok(Self {
            program,
            params: LensParams::default(),
            resolution: [width.max(1) as f32, height.max(1) as f32],
            mvp: surface_mvp(width as f32, height as f32),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.resolution = [width as f32, height as f32];
        self.mvp = surface_mvp(width as f32, height as f32);
    }

    /// Re-points the program at the source's (re)allocated texture.
    pub fn rebind(&mut self, device: &wgpu::Device, source: &dyn TextureSource) {
        self.program.rebind_texture(device, source.texture_view());
    }

    pub fn set_params(&mut self, params: LensParams) {
        self.params = params;
    }

    pub fn params(&self) -> &LensParams {
        &self.params
    }

    /// Pulls the latest bridged content and draws the lens. Until the source
    /// has committed a frame the texture holds garbage, so the output alpha
    /// is forced to zero instead of sampling it visibly.
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        pass: &mut wgpu::RenderPass<'_>,
        source: &dyn TextureSource,
    ) {
        source.sample_update(queue);
        let params = effective_params(&self.params, source.has_frame());
        let uniforms = LensUniforms::new(self.mvp, self.resolution, &params);
        self.program.draw(queue, pass, &uniforms);
    }
}

fn effective_params(params: &LensParams, source_has_frame: bool) -> LensParams {
    let mut params = *params;
    if !source_has_frame {
        params.alpha = 0.0;
    }
    params
}
