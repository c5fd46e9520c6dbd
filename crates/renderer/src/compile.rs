//! GLSL module creation with fatal error detection.
//!
//! `wgpu` reports shader build problems through its error scope machinery
//! rather than a `Result`, so each build step runs inside a validation scope
//! and the popped error (if any) becomes a [`ShaderError`]. A failed build
//! aborts renderer construction; there is no degraded mode.

use std::borrow::Cow;

use wgpu::naga::ShaderStage;

use crate::types::ShaderError;

pub(crate) fn build_shader_module(
    device: &wgpu::Device,
    label: &str,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let stage_name = match stage {
        ShaderStage::Vertex => "vertex",
        ShaderStage::Fragment => "fragment",
        _ => "compute",
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage,
            defines: &[],
        },
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(ShaderError::Compile {
            label: label.to_string(),
            stage: stage_name,
            message: error.to_string(),
        });
    }
    Ok(module)
}

/// Runs `build` (pipeline creation) inside a validation scope and maps any
/// reported error to [`ShaderError::Link`].
pub(crate) fn checked_pipeline_build<F>(
    device: &wgpu::Device,
    label: &str,
    build: F,
) -> Result<wgpu::RenderPipeline, ShaderError>
where
    F: FnOnce() -> wgpu::RenderPipeline,
{
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = build();
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(ShaderError::Link {
            label: label.to_string(),
            message: error.to_string(),
        });
    }
    Ok(pipeline)
}
