//! The orb widget: drag physics plus the crossfading icon display.
//!
//! Composes [`DragPhysicsController`] with a [`CrossfadeIcon`] pair and a
//! pointer hit test. Per tick it reports the resolved orb centre and the
//! completed transitions; the host turns those into metaball uniforms and
//! redraw requests.

use std::time::Instant;

use glam::Vec2;
use tracing::debug;

use gesture::icon::IconLayer;
use gesture::{CrossfadeIcon, OrbIcon};
use motion::drag::{DragEvent, DragLimits, DragUpdate};
use motion::DragPhysicsController;

use crate::defaults;

/// One tick's worth of orb state for the host.
#[derive(Debug, Clone)]
pub struct OrbFrame {
    /// Orb centre in surface pixels.
    pub center: Vec2,
    /// Offset from the rest position.
    pub offset: Vec2,
    /// The reveal finished this tick; the blob may be drawn from now on.
    pub surface_revealed: bool,
    /// The scripted onboarding drag finished this tick.
    pub fake_drag_ended: bool,
    /// Physics still in motion.
    pub animating: bool,
}

pub struct OrbWidget {
    physics: DragPhysicsController,
    icon: CrossfadeIcon,
    surface_visible: bool,
}

impl OrbWidget {
    pub fn new() -> Self {
        Self {
            physics: DragPhysicsController::new(DragLimits::default()),
            icon: CrossfadeIcon::new(OrbIcon::Default),
            surface_visible: false,
        }
    }

    pub fn set_rest(&mut self, rest: Vec2) {
        self.physics.set_rest(rest);
    }

    /// Starts the reveal slide from below the rest position.
    pub fn show(&mut self) {
        self.physics.show(defaults::REVEAL_OFFSCREEN_Y);
    }

    /// Reveals the orb instantly with no slide (onboarding skipped).
    pub fn show_immediately(&mut self) {
        self.physics.show(0.0);
        self.surface_visible = true;
    }

    pub fn set_user_input_enabled(&mut self, enabled: bool) {
        self.physics.set_user_input_enabled(enabled);
    }

    /// Kicks off the scripted onboarding displacement.
    pub fn begin_onboarding_drag(&mut self, delta: Vec2) -> bool {
        self.physics.fake_drag_by(delta)
    }

    /// Hit-tests the pointer against the orb and starts a drag session on a
    /// hit. Misses and input-suppressed states are ignored.
    pub fn pointer_down(&mut self, pointer: Vec2) -> bool {
        let center = self.physics.position();
        if pointer.distance(center) > defaults::GRAB_RADIUS {
            return false;
        }
        let started = self.physics.touch_down(pointer);
        if started {
            debug!(x = pointer.x, y = pointer.y, "drag session started");
        }
        started
    }

    pub fn pointer_moved(&mut self, pointer: Vec2) {
        self.physics.touch_move(pointer);
    }

    pub fn pointer_up(&mut self) {
        self.physics.touch_up();
    }

    pub fn is_dragging(&self) -> bool {
        self.physics.is_touch_dragging()
    }

    pub fn surface_visible(&self) -> bool {
        self.surface_visible
    }

    pub fn set_icon(&mut self, icon: OrbIcon, now: Instant) {
        self.icon.set_icon(icon, now);
    }

    /// (incoming, outgoing) icon layers for drawing.
    pub fn icon_layers(&self, now: Instant) -> (IconLayer, IconLayer) {
        self.icon.sample(now)
    }

    pub fn icon_fading(&self, now: Instant) -> bool {
        self.icon.is_fading(now)
    }

    pub fn tick(&mut self, dt: f32) -> OrbFrame {
        let DragUpdate {
            position,
            events,
            animating,
        } = self.physics.tick(dt);

        let surface_revealed = events.contains(&DragEvent::SurfaceRevealed);
        if surface_revealed {
            self.surface_visible = true;
        }

        OrbFrame {
            center: position,
            offset: position - self.physics.rest(),
            surface_revealed,
            fake_drag_ended: events.contains(&DragEvent::FakeDragEnded),
            animating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled_orb() -> OrbWidget {
        let mut orb = OrbWidget::new();
        orb.set_rest(Vec2::new(210.0, 660.0));
        orb.show_immediately();
        orb.tick(0.016);
        orb
    }

    #[test]
    fn pointer_outside_grab_radius_is_a_miss() {
        let mut orb = settled_orb();
        assert!(!orb.pointer_down(Vec2::new(0.0, 0.0)));
        assert!(!orb.is_dragging());
    }

    #[test]
    fn pointer_on_the_orb_starts_a_drag() {
        let mut orb = settled_orb();
        assert!(orb.pointer_down(Vec2::new(212.0, 658.0)));
        assert!(orb.is_dragging());
    }

    #[test]
    fn surface_stays_hidden_until_reveal_settles() {
        let mut orb = OrbWidget::new();
        orb.set_rest(Vec2::new(210.0, 660.0));
        orb.show();
        assert!(!orb.surface_visible());
        let mut revealed = false;
        for _ in 0..600 {
            revealed |= orb.tick(0.016).surface_revealed;
            if revealed {
                break;
            }
        }
        assert!(revealed);
        assert!(orb.surface_visible());
    }
}
