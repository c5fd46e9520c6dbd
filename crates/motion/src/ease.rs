//! Time-curve interpolators for scripted (non-spring) motion.

use std::f32::consts::PI;

/// Slow start, slow end; drives the scripted fake-drag displacement.
pub fn accelerate_decelerate(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    (f32::cos((t + 1.0) * PI) / 2.0) + 0.5
}

/// Fast start, linear end; drives icon crossfades.
pub fn fast_out_linear_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Fast start, slow end; drives onboarding hint reveals.
pub fn decelerate(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_hit_endpoints() {
        for ease in [accelerate_decelerate, fast_out_linear_in, decelerate] {
            assert!(ease(0.0).abs() < 1e-6);
            assert!((ease(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn accelerate_decelerate_is_symmetric() {
        let early = accelerate_decelerate(0.25);
        let late = accelerate_decelerate(0.75);
        assert!((early + late - 1.0).abs() < 1e-5);
    }
}
