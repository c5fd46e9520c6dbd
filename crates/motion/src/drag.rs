//! Drag state machine for the orb: reveal, scripted fake drag, touch drag.
//!
//! Three mutually exclusive channel groups animate the orb, mirroring the
//! gestures it supports:
//!
//! * **Reveal** slides the orb in from off-screen once, on a soft bouncy
//!   spring, and reports when the render surface may become visible.
//! * **Fake drag** is a scripted, time-driven displacement used for
//!   onboarding; real touch input is ignored while it runs.
//! * **Touch drag** chases the pointer through a firmer spring and applies a
//!   nonlinear distance clamp so the orb resists leaving its slot, except
//!   upwards where an escape threshold lets it detach.

use glam::Vec2;
use tracing::debug;

use crate::ease;
use crate::spring::{
    SpringChannel, SpringForce, DAMPING_RATIO_MEDIUM_BOUNCY, STIFFNESS_LOW, STIFFNESS_MEDIUM,
};

/// Scripted displacement length of a fake drag, in seconds.
const FAKE_DRAG_DURATION: f32 = 1.0;
/// Pause at the far point of a fake drag before the spring return starts.
const FAKE_DRAG_HOLD: f32 = 0.36;

/// Distance limits for the touch-drag soft clamp, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragLimits {
    /// Radial limit the clamp eases the orb towards in every direction.
    pub distance: f32,
    /// Vertical pull beyond which the limit starts to open upwards.
    pub upward_escape: f32,
}

impl Default for DragLimits {
    fn default() -> Self {
        Self {
            distance: 56.0,
            upward_escape: 80.0,
        }
    }
}

/// Applies the nonlinear distance clamp to a desired orb centre.
///
/// Offsets inside the limit pass through unchanged. Beyond it the offset is
/// scaled by `min(1, limit/distance)^0.8`, so the resolved distance keeps
/// growing but approaches the limit instead of stopping at it. Once the
/// upward pull exceeds `upward_escape` the limit itself widens with a
/// power-6 falloff; the exponent is a tuned calibration constant.
pub fn soft_clamp(rest: Vec2, desired: Vec2, limits: &DragLimits) -> Vec2 {
    let upward = rest.y - desired.y;
    let extra = if upward > limits.upward_escape {
        let ramp = ((upward - limits.upward_escape) / limits.upward_escape).min(1.0);
        upward * ramp.powi(6)
    } else {
        0.0
    };

    let distance = rest.distance(desired);
    if distance <= f32::EPSILON {
        return desired;
    }

    let limit = limits.distance + extra.abs();
    let scale = (limit / distance).min(1.0).powf(0.8);
    rest + (desired - rest) * scale
}

/// Notifications surfaced by [`DragPhysicsController::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    /// The reveal spring settled; the render surface may be shown now.
    SurfaceRevealed,
    /// A scripted fake drag completed on both axes.
    FakeDragEnded,
}

/// Result of advancing the controller by one frame.
#[derive(Debug, Clone)]
pub struct DragUpdate {
    /// Resolved orb centre after this tick.
    pub position: Vec2,
    /// State transitions that completed during this tick.
    pub events: Vec<DragEvent>,
    /// True while any channel is still in motion; the owner should keep
    /// requesting redraws until this goes false.
    pub animating: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Hidden,
    Revealing,
    Rest,
    TouchDragging { grab_offset: Vec2 },
    TouchReturning,
    FakeDragScript { from: Vec2, delta: Vec2, elapsed: f32 },
    FakeDragHold { remaining: f32 },
    FakeDragReturn,
}

/// Owns the spring channels and gesture mode for one orb.
///
/// At most one drag session exists at a time by construction: a touch-down is
/// ignored while a fake drag runs, while user input is disabled, or while a
/// previous touch session is still active.
#[derive(Debug)]
pub struct DragPhysicsController {
    rest: Vec2,
    position: Vec2,
    mode: Mode,
    limits: DragLimits,
    user_input_enabled: bool,
    reveal_y: SpringChannel,
    fake_x: SpringChannel,
    fake_y: SpringChannel,
    drag_x: SpringChannel,
    drag_y: SpringChannel,
}

impl DragPhysicsController {
    pub fn new(limits: DragLimits) -> Self {
        let reveal = SpringForce::new(STIFFNESS_LOW, DAMPING_RATIO_MEDIUM_BOUNCY);
        let fake_return = SpringForce::new(500.0, 0.4);
        let drag_return = SpringForce::new(
            (STIFFNESS_MEDIUM + STIFFNESS_LOW) / 2.0,
            DAMPING_RATIO_MEDIUM_BOUNCY,
        );
        Self {
            rest: Vec2::ZERO,
            position: Vec2::ZERO,
            mode: Mode::Hidden,
            limits,
            user_input_enabled: true,
            reveal_y: SpringChannel::new(reveal),
            fake_x: SpringChannel::new(fake_return),
            fake_y: SpringChannel::new(fake_return),
            drag_x: SpringChannel::new(drag_return),
            drag_y: SpringChannel::new(drag_return),
        }
    }

    /// Rest position, i.e. the slot centre the orb returns to.
    pub fn rest(&self) -> Vec2 {
        self.rest
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Offset of the orb from its rest position.
    pub fn offset(&self) -> Vec2 {
        self.position - self.rest
    }

    pub fn set_rest(&mut self, rest: Vec2) {
        self.rest = rest;
        if matches!(self.mode, Mode::Hidden | Mode::Rest) {
            self.position = rest;
        }
    }

    pub fn set_user_input_enabled(&mut self, enabled: bool) {
        self.user_input_enabled = enabled;
    }

    pub fn is_fake_dragging(&self) -> bool {
        matches!(
            self.mode,
            Mode::FakeDragScript { .. } | Mode::FakeDragHold { .. } | Mode::FakeDragReturn
        )
    }

    pub fn is_touch_dragging(&self) -> bool {
        matches!(self.mode, Mode::TouchDragging { .. })
    }

    /// Starts the one-time slide-in. `offset_below_rest` is how far beneath
    /// the rest position the slide begins; zero reveals in place.
    pub fn show(&mut self, offset_below_rest: f32) {
        let start_y = self.rest.y + offset_below_rest;
        self.position = Vec2::new(self.rest.x, start_y);
        self.reveal_y.jump_to(start_y);
        self.reveal_y.set_target(self.rest.y);
        self.mode = Mode::Revealing;
    }

    /// Starts a scripted onboarding displacement. No-op while one is already
    /// in flight or the orb has not been revealed yet.
    pub fn fake_drag_by(&mut self, delta: Vec2) -> bool {
        if self.is_fake_dragging() || matches!(self.mode, Mode::Hidden | Mode::Revealing) {
            return false;
        }
        debug!(dx = delta.x, dy = delta.y, "starting fake drag");
        self.mode = Mode::FakeDragScript {
            from: self.position,
            delta,
            elapsed: 0.0,
        };
        true
    }

    /// Handles a press. Returns false when the event is ignored, which the
    /// caller must treat as "no drag session exists".
    pub fn touch_down(&mut self, pointer: Vec2) -> bool {
        if !self.user_input_enabled || self.is_fake_dragging() || self.is_touch_dragging() {
            return false;
        }
        if matches!(self.mode, Mode::Hidden | Mode::Revealing) {
            return false;
        }
        self.drag_x.jump_to(self.position.x);
        self.drag_y.jump_to(self.position.y);
        self.mode = Mode::TouchDragging {
            grab_offset: self.position - pointer,
        };
        true
    }

    /// Handles pointer motion during an active drag session.
    pub fn touch_move(&mut self, pointer: Vec2) {
        let Mode::TouchDragging { grab_offset } = self.mode else {
            return;
        };
        let desired = pointer + grab_offset;
        let resolved = soft_clamp(self.rest, desired, &self.limits);
        self.drag_x.set_target(resolved.x);
        self.drag_y.set_target(resolved.y);
    }

    /// Handles a release: the orb springs back to its slot.
    pub fn touch_up(&mut self) {
        if !self.is_touch_dragging() {
            return;
        }
        self.drag_x.set_target(self.rest.x);
        self.drag_y.set_target(self.rest.y);
        self.mode = Mode::TouchReturning;
    }

    /// Advances whichever channel group is active by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> DragUpdate {
        let mut events = Vec::new();
        let mut animating = false;

        match self.mode {
            Mode::Hidden | Mode::Rest => {}
            Mode::Revealing => {
                let (y, settled) = self.reveal_y.tick(dt);
                self.position.y = y;
                if settled {
                    self.mode = Mode::Rest;
                    events.push(DragEvent::SurfaceRevealed);
                } else {
                    animating = true;
                }
            }
            Mode::TouchDragging { .. } | Mode::TouchReturning => {
                let (x, x_settled) = self.drag_x.tick(dt);
                let (y, y_settled) = self.drag_y.tick(dt);
                self.position = Vec2::new(x, y);
                let settled = x_settled && y_settled;
                if settled && matches!(self.mode, Mode::TouchReturning) {
                    self.mode = Mode::Rest;
                }
                animating = !settled;
            }
            Mode::FakeDragScript {
                from,
                delta,
                elapsed,
            } => {
                let elapsed = elapsed + dt;
                if elapsed >= FAKE_DRAG_DURATION {
                    self.position = from + delta;
                    self.fake_x.jump_to(self.position.x);
                    self.fake_y.jump_to(self.position.y);
                    self.mode = Mode::FakeDragHold {
                        remaining: FAKE_DRAG_HOLD,
                    };
                } else {
                    let fraction = ease::accelerate_decelerate(elapsed / FAKE_DRAG_DURATION);
                    self.position = from + delta * fraction;
                    self.mode = Mode::FakeDragScript {
                        from,
                        delta,
                        elapsed,
                    };
                }
                animating = true;
            }
            Mode::FakeDragHold { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.fake_x.set_target(self.rest.x);
                    self.fake_y.set_target(self.rest.y);
                    self.mode = Mode::FakeDragReturn;
                } else {
                    self.mode = Mode::FakeDragHold { remaining };
                }
                animating = true;
            }
            Mode::FakeDragReturn => {
                let (x, x_settled) = self.fake_x.tick(dt);
                let (y, y_settled) = self.fake_y.tick(dt);
                self.position = Vec2::new(x, y);
                if x_settled && y_settled {
                    self.mode = Mode::Rest;
                    events.push(DragEvent::FakeDragEnded);
                } else {
                    animating = true;
                }
            }
        }

        DragUpdate {
            position: self.position,
            events,
            animating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn controller_at_rest() -> DragPhysicsController {
        let mut controller = DragPhysicsController::new(DragLimits::default());
        controller.set_rest(Vec2::new(200.0, 400.0));
        controller.show(600.0);
        run_until(&mut controller, |events| {
            events.contains(&DragEvent::SurfaceRevealed)
        });
        controller
    }

    fn run_until(
        controller: &mut DragPhysicsController,
        mut done: impl FnMut(&[DragEvent]) -> bool,
    ) {
        for _ in 0..2000 {
            let update = controller.tick(DT);
            if done(&update.events) {
                return;
            }
        }
        panic!("controller never reached the expected state");
    }

    #[test]
    fn soft_clamp_passes_small_offsets_through() {
        let limits = DragLimits::default();
        let rest = Vec2::new(100.0, 100.0);
        let desired = Vec2::new(130.0, 100.0);
        assert_eq!(soft_clamp(rest, desired, &limits), desired);
    }

    #[test]
    fn soft_clamp_stays_between_limit_and_desired() {
        let limits = DragLimits::default();
        let rest = Vec2::new(100.0, 100.0);
        for magnitude in [60.0_f32, 90.0, 150.0, 400.0] {
            let desired = rest + Vec2::new(magnitude, 0.0);
            let resolved = soft_clamp(rest, desired, &limits);
            let resolved_distance = rest.distance(resolved);
            assert!(
                resolved_distance > limits.distance,
                "soft clamp must not hard-stop at the limit (magnitude {magnitude})"
            );
            assert!(
                resolved_distance < magnitude,
                "soft clamp must not exceed the desired distance (magnitude {magnitude})"
            );
        }
    }

    #[test]
    fn upward_escape_extends_the_limit() {
        let limits = DragLimits::default();
        let rest = Vec2::new(100.0, 500.0);
        let sideways = soft_clamp(rest, rest + Vec2::new(200.0, 0.0), &limits);
        let upward = soft_clamp(rest, rest + Vec2::new(0.0, -200.0), &limits);
        assert!(
            rest.distance(upward) > rest.distance(sideways),
            "the orb must travel further upwards than sideways"
        );
        // Far beyond the escape threshold the clamp releases entirely.
        assert_eq!(upward, rest + Vec2::new(0.0, -200.0));
    }

    #[test]
    fn touch_ignored_while_fake_dragging() {
        let mut controller = controller_at_rest();
        assert!(controller.fake_drag_by(Vec2::new(0.0, -60.0)));
        assert!(!controller.touch_down(Vec2::new(200.0, 400.0)));
        run_until(&mut controller, |events| {
            events.contains(&DragEvent::FakeDragEnded)
        });
        assert!(controller.touch_down(Vec2::new(200.0, 400.0)));
    }

    #[test]
    fn second_touch_down_is_ignored() {
        let mut controller = controller_at_rest();
        assert!(controller.touch_down(Vec2::new(200.0, 400.0)));
        assert!(!controller.touch_down(Vec2::new(210.0, 410.0)));
    }

    #[test]
    fn touch_down_ignored_while_input_disabled() {
        let mut controller = controller_at_rest();
        controller.set_user_input_enabled(false);
        assert!(!controller.touch_down(Vec2::new(200.0, 400.0)));
        controller.set_user_input_enabled(true);
        assert!(controller.touch_down(Vec2::new(200.0, 400.0)));
    }

    #[test]
    fn release_springs_back_to_rest() {
        let mut controller = controller_at_rest();
        let rest = controller.rest();
        controller.touch_down(rest);
        controller.touch_move(rest + Vec2::new(40.0, 10.0));
        for _ in 0..30 {
            controller.tick(DT);
        }
        assert!(controller.offset().length() > 1.0);

        controller.touch_up();
        for _ in 0..2000 {
            if !controller.tick(DT).animating {
                break;
            }
        }
        assert_eq!(controller.position(), rest);
        assert!(!controller.is_touch_dragging());
    }

    #[test]
    fn fake_drag_reports_end_once() {
        let mut controller = controller_at_rest();
        controller.fake_drag_by(Vec2::new(0.0, -60.0));
        let mut ends = 0;
        for _ in 0..2000 {
            let update = controller.tick(DT);
            ends += update
                .events
                .iter()
                .filter(|event| **event == DragEvent::FakeDragEnded)
                .count();
            if !update.animating && ends > 0 {
                break;
            }
        }
        assert_eq!(ends, 1);
    }

    #[test]
    fn reveal_hides_surface_until_settled() {
        let mut controller = DragPhysicsController::new(DragLimits::default());
        controller.set_rest(Vec2::new(200.0, 400.0));
        controller.show(600.0);
        let update = controller.tick(DT);
        assert!(update.animating);
        assert!(update.events.is_empty());
        assert!(update.position.y > 400.0);
    }
}
