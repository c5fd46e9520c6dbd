//! std140 uniform blocks for the three programs.
//!
//! Field order and padding must match the GLSL block declarations exactly;
//! the layout tests below pin the byte sizes. All blocks start with the MVP
//! so the shared vertex shader can declare a 64-byte prefix of any of them.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::types::{IconInstance, LensParams, MetaballFieldState};

/// Orthographic projection for a `width` x `height` surface with the origin
/// at the top-left, composed with a scale that maps the unit quad over the
/// full surface. Recomputed only when the surface size changes.
pub fn surface_mvp(width: f32, height: f32) -> Mat4 {
    let projection = Mat4::orthographic_rh(0.0, width.max(1.0), height.max(1.0), 0.0, -1.0, 1.0);
    projection * Mat4::from_scale(Vec3::new(width.max(1.0), height.max(1.0), 1.0))
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct MetaballUniforms {
    pub mvp: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub slot_position: [f32; 2],
    pub orb_position: [f32; 2],
    pub slot_radius: f32,
    pub orb_radius: f32,
    pub slot_color: [f32; 3],
    pub _pad0: f32,
    pub orb_color: [f32; 3],
    pub _pad1: f32,
    pub orb_icon_in: [f32; 4],
    pub orb_icon_out: [f32; 4],
    pub slot_icon: [f32; 4],
}

impl MetaballUniforms {
    pub fn new(
        mvp: Mat4,
        resolution: [f32; 2],
        slot: &MetaballFieldState,
        orb: &MetaballFieldState,
        orb_icon_in: IconInstance,
        orb_icon_out: IconInstance,
        slot_icon: IconInstance,
    ) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            resolution,
            slot_position: slot.position.to_array(),
            orb_position: orb.position.to_array(),
            slot_radius: slot.radius,
            orb_radius: orb.radius,
            slot_color: slot.color.to_array(),
            _pad0: 0.0,
            orb_color: orb.color.to_array(),
            _pad1: 0.0,
            orb_icon_in: orb_icon_in.to_array(),
            orb_icon_out: orb_icon_out.to_array(),
            slot_icon: slot_icon.to_array(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct LensUniforms {
    pub mvp: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub lens_position: [f32; 2],
    pub lens_radius: f32,
    pub lens_alpha: f32,
    pub lens_zoom: f32,
    pub lens_bend: f32,
    pub lens_border_width: f32,
    pub _pad: [f32; 3],
}

impl LensUniforms {
    pub fn new(mvp: Mat4, resolution: [f32; 2], params: &LensParams) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            resolution,
            lens_position: params.position.to_array(),
            lens_radius: params.radius_fraction,
            lens_alpha: params.alpha,
            lens_zoom: params.zoom,
            lens_bend: params.bend,
            lens_border_width: params.border_width,
            _pad: [0.0; 3],
        }
    }
}

/// Uniforms for the plain textured-quad program used as the page backdrop.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct BlitUniforms {
    pub mvp: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub _pad: [f32; 2],
}

impl BlitUniforms {
    pub fn new(mvp: Mat4, resolution: [f32; 2]) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            resolution,
            _pad: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn uniform_blocks_match_std140_sizes() {
        assert_eq!(std::mem::size_of::<MetaballUniforms>(), 176);
        assert_eq!(std::mem::size_of::<LensUniforms>(), 112);
        assert_eq!(std::mem::size_of::<BlitUniforms>(), 80);
    }

    #[test]
    fn mvp_maps_unit_quad_corners_to_clip_corners() {
        let mvp = surface_mvp(800.0, 600.0);
        let top_left = mvp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let bottom_right = mvp * Vec4::new(1.0, 1.0, 0.0, 1.0);
        assert!((top_left.x - -1.0).abs() < 1e-5);
        assert!((top_left.y - 1.0).abs() < 1e-5);
        assert!((bottom_right.x - 1.0).abs() < 1e-5);
        assert!((bottom_right.y - -1.0).abs() < 1e-5);
    }
}
