//! Translates the orb's live offset into paging, icon, and lens decisions.

use std::time::{Duration, Instant};

use glam::Vec2;
use tracing::debug;

use crate::icon::OrbIcon;

/// Distances (logical pixels) and timings steering the interaction model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    /// Horizontal offset needed to change the page.
    pub min_x_change_page: f32,
    /// Vertical band within which a page change is still allowed.
    pub max_y_change_page: f32,
    /// Upward drag distance at which the lens starts expanding.
    pub lens_start_distance: f32,
    /// Further distance over which the lens expansion runs 0 → 1.
    pub lens_expand_range: f32,
    /// Minimum interval between two page changes.
    pub page_change_cooldown: Duration,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            min_x_change_page: 60.0,
            max_y_change_page: 40.0,
            lens_start_distance: 60.0,
            lens_expand_range: 60.0,
            page_change_cooldown: Duration::from_millis(600),
        }
    }
}

impl GestureThresholds {
    /// Upward distance at which the lens counts as actively used.
    pub fn lens_active_distance(&self) -> f32 {
        self.lens_start_distance + self.lens_expand_range * 0.5
    }
}

/// Lens portion of a frame's decisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensDecision {
    /// Normalized expansion progress, exactly 0 below the start threshold.
    pub expand_fraction: f32,
    /// Whether the lens widget should be attached to the render surface this
    /// frame. Includes one frame of hysteresis so the widget is not detached
    /// on the very frame the fraction returns to zero.
    pub attached: bool,
}

/// Everything the coordinator decided for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDecisions {
    pub orb_icon: OrbIcon,
    pub slot_icon: OrbIcon,
    /// `Some(±1)` when the carousel should advance this frame.
    pub page_advance: Option<i32>,
    /// Number of haptic pulses to emit this frame.
    pub haptic_pulses: u32,
    pub lens: LensDecision,
    /// False while the lens has fully replaced the orb's blob.
    pub orb_field_visible: bool,
    pub dismiss_hint_left: bool,
    pub dismiss_hint_up: bool,
    pub dismiss_hint_right: bool,
}

/// Per-orb gesture interpreter.
///
/// Stateless apart from the page-change cooldown deadline, the lens attach
/// hysteresis, and the "lens is active" toggle; every other output is derived
/// fresh from the offset each frame.
#[derive(Debug)]
pub struct GestureCoordinator {
    thresholds: GestureThresholds,
    cooldown_until: Option<Instant>,
    lens_expanding: bool,
    lens_active: bool,
}

impl GestureCoordinator {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self {
            thresholds,
            cooldown_until: None,
            lens_expanding: false,
            lens_active: false,
        }
    }

    pub fn lens_is_active(&self) -> bool {
        self.lens_active
    }

    /// Evaluates one frame. `offset` is the orb centre relative to its rest
    /// position (y grows downwards); `drag_active` reports whether a touch
    /// session currently exists.
    pub fn update(&mut self, offset: Vec2, drag_active: bool, now: Instant) -> FrameDecisions {
        let t = &self.thresholds;
        let mut pulses = 0;
        let mut dismiss_left = false;
        let mut dismiss_up = false;
        let mut dismiss_right = false;

        // Icon: 4-way priority, first match wins.
        let orb_icon = if offset.y < -t.lens_active_distance() {
            OrbIcon::Empty
        } else if offset.y < -(t.min_x_change_page / 2.0) {
            OrbIcon::ArrowUp
        } else if offset.x.abs() > t.min_x_change_page / 2.0
            && offset.y.abs() < t.max_y_change_page
        {
            if offset.x > 0.0 {
                OrbIcon::ArrowRight
            } else {
                OrbIcon::ArrowLeft
            }
        } else {
            OrbIcon::Default
        };

        // Page change: only during an active drag and outside the cooldown.
        let cooldown_over = self.cooldown_until.is_none_or(|until| now >= until);
        let mut page_advance = None;
        if drag_active
            && cooldown_over
            && offset.x.abs() > t.min_x_change_page
            && offset.y.abs() < t.max_y_change_page
        {
            let direction = if offset.x > 0.0 { 1 } else { -1 };
            self.cooldown_until = Some(now + t.page_change_cooldown);
            page_advance = Some(direction);
            pulses += 1;
            dismiss_right = direction > 0;
            dismiss_left = direction < 0;
            debug!(direction, "page change triggered");
        }

        // Lens expansion from the upward pull.
        let up_offset = (-offset.y).max(0.0);
        let can_expand = up_offset > t.lens_start_distance;
        let expand_fraction = if can_expand {
            ((up_offset - t.lens_start_distance) / t.lens_expand_range).min(1.0)
        } else {
            0.0
        };
        let attached = can_expand || self.lens_expanding;
        self.lens_expanding = can_expand;

        let active = up_offset > t.lens_active_distance();
        if active != self.lens_active {
            self.lens_active = active;
            pulses += 1;
            dismiss_up = true;
            debug!(active, "lens active state changed");
        }

        FrameDecisions {
            orb_icon,
            slot_icon: if self.lens_active {
                OrbIcon::Close
            } else {
                OrbIcon::Empty
            },
            page_advance,
            haptic_pulses: pulses,
            lens: LensDecision {
                expand_fraction,
                attached,
            },
            orb_field_visible: !self.lens_active,
            dismiss_hint_left: dismiss_left,
            dismiss_hint_up: dismiss_up,
            dismiss_hint_right: dismiss_right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> GestureCoordinator {
        GestureCoordinator::new(GestureThresholds::default())
    }

    #[test]
    fn expand_fraction_is_monotone_and_clamped() {
        let mut c = coordinator();
        let now = Instant::now();
        let mut previous = -1.0_f32;
        for up in 0..200 {
            let offset = Vec2::new(0.0, -(up as f32));
            let fraction = c.update(offset, true, now).lens.expand_fraction;
            assert!(
                fraction >= previous,
                "fraction decreased at up={up}: {previous} -> {fraction}"
            );
            previous = fraction;
        }
        // Exactly 0 at and below the start threshold.
        assert_eq!(c.update(Vec2::new(0.0, -60.0), true, now).lens.expand_fraction, 0.0);
        // Exactly 1 at and above start + range.
        assert_eq!(c.update(Vec2::new(0.0, -120.0), true, now).lens.expand_fraction, 1.0);
        assert_eq!(c.update(Vec2::new(0.0, -300.0), true, now).lens.expand_fraction, 1.0);
    }

    #[test]
    fn strong_upward_offset_selects_neutral_icon() {
        // Top-to-bottom priority: far above both upward thresholds the icon
        // must be the neutral one, never an arrow.
        let mut c = coordinator();
        let decisions = c.update(Vec2::new(0.0, -200.0), true, Instant::now());
        assert_eq!(decisions.orb_icon, OrbIcon::Empty);
    }

    #[test]
    fn weak_upward_offset_selects_up_arrow() {
        let mut c = coordinator();
        let decisions = c.update(Vec2::new(0.0, -40.0), true, Instant::now());
        assert_eq!(decisions.orb_icon, OrbIcon::ArrowUp);
    }

    #[test]
    fn horizontal_offset_selects_directional_arrow() {
        let mut c = coordinator();
        let now = Instant::now();
        assert_eq!(
            c.update(Vec2::new(35.0, 0.0), false, now).orb_icon,
            OrbIcon::ArrowRight
        );
        assert_eq!(
            c.update(Vec2::new(-35.0, 0.0), false, now).orb_icon,
            OrbIcon::ArrowLeft
        );
        // Outside the vertical band the arrow is suppressed.
        assert_eq!(
            c.update(Vec2::new(35.0, 45.0), false, now).orb_icon,
            OrbIcon::Default
        );
    }

    #[test]
    fn drag_to_the_right_advances_one_page_with_one_pulse() {
        let mut c = coordinator();
        let decisions = c.update(Vec2::new(70.0, 5.0), true, Instant::now());
        assert_eq!(decisions.page_advance, Some(1));
        assert_eq!(decisions.haptic_pulses, 1);
        assert!(decisions.dismiss_hint_right);
        assert!(!decisions.dismiss_hint_left);
    }

    #[test]
    fn cooldown_swallows_the_second_swipe() {
        let mut c = coordinator();
        let t0 = Instant::now();
        let first = c.update(Vec2::new(70.0, 5.0), true, t0);
        assert_eq!(first.page_advance, Some(1));
        let second = c.update(Vec2::new(70.0, 5.0), true, t0 + Duration::from_millis(100));
        assert_eq!(second.page_advance, None);
        let third = c.update(Vec2::new(70.0, 5.0), true, t0 + Duration::from_millis(700));
        assert_eq!(third.page_advance, Some(1));
    }

    #[test]
    fn no_page_change_without_active_drag() {
        let mut c = coordinator();
        let decisions = c.update(Vec2::new(70.0, 5.0), false, Instant::now());
        assert_eq!(decisions.page_advance, None);
    }

    #[test]
    fn lens_activation_toggles_orb_field_and_slot_icon() {
        let mut c = coordinator();
        let now = Instant::now();

        let below = c.update(Vec2::new(0.0, -80.0), true, now);
        assert!(below.orb_field_visible);
        assert_eq!(below.slot_icon, OrbIcon::Empty);

        let active = c.update(Vec2::new(0.0, -150.0), true, now);
        assert!(!active.orb_field_visible);
        assert_eq!(active.slot_icon, OrbIcon::Close);
        assert_eq!(active.haptic_pulses, 1);
        assert!(active.dismiss_hint_up);

        // Crossing back emits another pulse and restores the orb field.
        let released = c.update(Vec2::new(0.0, -20.0), true, now);
        assert!(released.orb_field_visible);
        assert_eq!(released.slot_icon, OrbIcon::Empty);
        assert_eq!(released.haptic_pulses, 1);
    }

    #[test]
    fn lens_stays_attached_one_frame_past_collapse() {
        let mut c = coordinator();
        let now = Instant::now();
        assert!(c.update(Vec2::new(0.0, -100.0), true, now).lens.attached);
        // First frame back below the threshold: still attached (hysteresis).
        let first = c.update(Vec2::new(0.0, -10.0), true, now);
        assert!(first.lens.attached);
        assert_eq!(first.lens.expand_fraction, 0.0);
        // Second frame: detached.
        assert!(!c.update(Vec2::new(0.0, -10.0), true, now).lens.attached);
    }
}
