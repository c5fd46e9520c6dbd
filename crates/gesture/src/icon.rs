//! Icon crossfade model and onboarding hint visibility.
//!
//! The orb and its slot each display one icon at a time; switching icons
//! crossfades between two alternating layers (a front and a back slot) with a
//! short fade and a slight scale-up of the incoming icon. The model is pure
//! state: the host samples it per frame and draws whatever it reports.

use std::time::{Duration, Instant};

use motion::ease;

/// Crossfade length.
const FADE_DURATION: Duration = Duration::from_millis(180);
/// Scale the outgoing icon shrinks to and the incoming icon grows from.
const MIN_SCALE: f32 = 0.666;

/// Icons the orb (and slot) can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrbIcon {
    /// No icon drawn; used while the lens owns the interaction.
    Empty,
    /// The resting brand icon.
    #[default]
    Default,
    ArrowUp,
    ArrowLeft,
    ArrowRight,
    /// Close affordance shown in the slot while the lens is active.
    Close,
}

/// One sampled icon layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconLayer {
    pub icon: OrbIcon,
    pub alpha: f32,
    pub scale: f32,
}

/// Two-layer crossfading icon display.
#[derive(Debug)]
pub struct CrossfadeIcon {
    front: OrbIcon,
    back: OrbIcon,
    back_visible: bool,
    switched_at: Option<Instant>,
}

impl CrossfadeIcon {
    pub fn new(initial: OrbIcon) -> Self {
        Self {
            front: initial,
            back: OrbIcon::Empty,
            back_visible: false,
            switched_at: None,
        }
    }

    /// Icon currently fading in (or fully shown).
    pub fn current(&self) -> OrbIcon {
        if self.back_visible {
            self.back
        } else {
            self.front
        }
    }

    /// Switches to `icon`, crossfading from whatever is shown. Setting the
    /// icon that is already current is a no-op so repeated coordinator
    /// decisions do not restart the fade every frame.
    pub fn set_icon(&mut self, icon: OrbIcon, now: Instant) {
        if icon == self.current() {
            return;
        }
        self.back_visible = !self.back_visible;
        if self.back_visible {
            self.back = icon;
        } else {
            self.front = icon;
        }
        self.switched_at = Some(now);
    }

    /// Samples both layers for drawing. The incoming layer fades in and grows
    /// from [`MIN_SCALE`]; the outgoing layer does the reverse.
    pub fn sample(&self, now: Instant) -> (IconLayer, IconLayer) {
        let progress = match self.switched_at {
            Some(at) => {
                let elapsed = now.saturating_duration_since(at);
                (elapsed.as_secs_f32() / FADE_DURATION.as_secs_f32()).clamp(0.0, 1.0)
            }
            None => 1.0,
        };
        let eased = ease::fast_out_linear_in(progress);

        let incoming = IconLayer {
            icon: self.current(),
            alpha: eased,
            scale: MIN_SCALE + (1.0 - MIN_SCALE) * eased,
        };
        let outgoing = IconLayer {
            icon: if self.back_visible {
                self.front
            } else {
                self.back
            },
            alpha: 1.0 - eased,
            scale: 1.0 - (1.0 - MIN_SCALE) * eased,
        };
        (incoming, outgoing)
    }

    pub fn is_fading(&self, now: Instant) -> bool {
        self.switched_at
            .map(|at| now.saturating_duration_since(at) < FADE_DURATION)
            .unwrap_or(false)
    }
}

/// Which onboarding hints are still visible around the orb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HintVisibility {
    pub left: bool,
    pub up: bool,
    pub right: bool,
}

impl HintVisibility {
    pub fn reveal_all(&mut self) {
        *self = Self {
            left: true,
            up: true,
            right: true,
        };
    }

    /// Dismisses the hints whose direction the user has now discovered.
    pub fn dismiss(&mut self, left: bool, up: bool, right: bool) {
        self.left &= !left;
        self.up &= !up;
        self.right &= !right;
    }

    pub fn any_visible(&self) -> bool {
        self.left || self.up || self.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_icon_alternates_layers() {
        let now = Instant::now();
        let mut icon = CrossfadeIcon::new(OrbIcon::Default);
        icon.set_icon(OrbIcon::ArrowUp, now);
        assert_eq!(icon.current(), OrbIcon::ArrowUp);
        icon.set_icon(OrbIcon::Empty, now);
        assert_eq!(icon.current(), OrbIcon::Empty);
        let (incoming, outgoing) = icon.sample(now);
        assert_eq!(incoming.icon, OrbIcon::Empty);
        assert_eq!(outgoing.icon, OrbIcon::ArrowUp);
    }

    #[test]
    fn same_icon_does_not_restart_fade() {
        let now = Instant::now();
        let mut icon = CrossfadeIcon::new(OrbIcon::Default);
        icon.set_icon(OrbIcon::ArrowUp, now);
        let later = now + FADE_DURATION;
        icon.set_icon(OrbIcon::ArrowUp, later);
        assert!(!icon.is_fading(later));
    }

    #[test]
    fn fade_completes_after_duration() {
        let now = Instant::now();
        let mut icon = CrossfadeIcon::new(OrbIcon::Default);
        icon.set_icon(OrbIcon::Close, now);
        let (incoming, outgoing) = icon.sample(now + FADE_DURATION);
        assert_eq!(incoming.alpha, 1.0);
        assert_eq!(incoming.scale, 1.0);
        assert_eq!(outgoing.alpha, 0.0);
    }

    #[test]
    fn hints_dismiss_independently() {
        let mut hints = HintVisibility::default();
        hints.reveal_all();
        hints.dismiss(false, true, false);
        assert!(hints.left && !hints.up && hints.right);
        hints.dismiss(true, false, true);
        assert!(!hints.any_visible());
    }
}
