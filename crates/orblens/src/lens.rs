//! The lens widget: expansion easing from the orb centre.
//!
//! `update_lens` turns the coordinator's expand fraction into lens uniforms.
//! Radius, position, and alpha ease at different powers of the fraction
//! (f^2, f^3, f^4) so the lens grows first, then slides into place, and
//! fades in last. The lens centre is pushed away from the orb towards the
//! middle of the surface, with the vertical push strongest when the orb sits
//! horizontally centred.

use glam::Vec2;

use renderer::LensParams;

/// Fully expanded lens radius as a fraction of the surface width.
const RADIUS_FRACTION_DEFAULT: f32 = 0.3;
/// Scale applied to the positional offset relative to the full radius.
const OFFSET_SCALE: f32 = 0.85;
/// Extra vertical push when the orb is horizontally centred.
const MID_VERTICAL_FACTOR: f32 = 1.25;

pub struct LensWidget {
    params: LensParams,
    attached: bool,
}

impl LensWidget {
    pub fn new() -> Self {
        Self {
            params: LensParams::default(),
            attached: false,
        }
    }

    pub fn params(&self) -> LensParams {
        self.params
    }

    /// Whether the lens participates in rendering this frame.
    pub fn attached(&self) -> bool {
        self.attached
    }

    pub fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    /// Recomputes the lens placement from the orb centre and the normalized
    /// expansion progress.
    pub fn update_lens(&mut self, orb_center: Vec2, expand_fraction: f32, surface_width: f32) {
        let expand_fraction = expand_fraction.clamp(0.0, 1.0);
        let radius_fraction = expand_fraction.powi(2);
        let position_fraction = expand_fraction.powi(3);
        let alpha_fraction = expand_fraction.powi(4);

        let t = if surface_width > 0.0 {
            (orb_center.x / surface_width).clamp(0.0, 1.0)
        } else {
            0.5
        };

        let reach = position_fraction * (RADIUS_FRACTION_DEFAULT * surface_width) * OFFSET_SCALE;
        let offset_x = lerp(-reach, reach, t);
        let offset_y = lerp3(reach, reach * MID_VERTICAL_FACTOR, reach, t);

        self.params.position = Vec2::new(orb_center.x - offset_x, orb_center.y - offset_y);
        self.params.radius_fraction = RADIUS_FRACTION_DEFAULT * radius_fraction;
        self.params.alpha = alpha_fraction;
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Piecewise linear interpolation through three values at t = 0, 0.5, 1.
fn lerp3(a: f32, b: f32, c: f32, t: f32) -> f32 {
    if t <= 0.5 {
        lerp(a, b, t / 0.5)
    } else {
        lerp(b, c, (t - 0.5) / 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_lens_is_invisible() {
        let mut lens = LensWidget::new();
        lens.update_lens(Vec2::new(210.0, 400.0), 0.0, 420.0);
        assert_eq!(lens.params().radius_fraction, 0.0);
        assert_eq!(lens.params().alpha, 0.0);
    }

    #[test]
    fn full_expansion_reaches_default_radius_and_full_alpha() {
        let mut lens = LensWidget::new();
        lens.update_lens(Vec2::new(210.0, 400.0), 1.0, 420.0);
        let params = lens.params();
        assert!((params.radius_fraction - RADIUS_FRACTION_DEFAULT).abs() < 1e-6);
        assert!((params.alpha - 1.0).abs() < 1e-6);
    }

    #[test]
    fn centred_orb_pushes_the_lens_straight_up() {
        let mut lens = LensWidget::new();
        let center = Vec2::new(210.0, 400.0);
        lens.update_lens(center, 1.0, 420.0);
        let params = lens.params();
        // Horizontally centred: no sideways offset, strongest upward push.
        assert!((params.position.x - center.x).abs() < 1e-3);
        let reach = RADIUS_FRACTION_DEFAULT * 420.0 * OFFSET_SCALE;
        assert!((params.position.y - (center.y - reach * MID_VERTICAL_FACTOR)).abs() < 1e-3);
    }

    #[test]
    fn edge_orb_pulls_the_lens_inward() {
        let mut lens = LensWidget::new();
        lens.update_lens(Vec2::new(0.0, 400.0), 1.0, 420.0);
        // At the left edge the offset is -reach, pushing the lens right.
        assert!(lens.params().position.x > 0.0);
    }

    #[test]
    fn lerp3_hits_its_three_anchors() {
        assert_eq!(lerp3(1.0, 5.0, 2.0, 0.0), 1.0);
        assert_eq!(lerp3(1.0, 5.0, 2.0, 0.5), 5.0);
        assert_eq!(lerp3(1.0, 5.0, 2.0, 1.0), 2.0);
    }

    #[test]
    fn alpha_lags_behind_radius_mid_expansion() {
        let mut lens = LensWidget::new();
        lens.update_lens(Vec2::new(210.0, 400.0), 0.5, 420.0);
        let params = lens.params();
        assert!(params.alpha < params.radius_fraction / RADIUS_FRACTION_DEFAULT);
    }
}
