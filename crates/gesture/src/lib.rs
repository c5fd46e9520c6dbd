//! Gesture interpretation for the orb: paging, icon states, lens expansion.
//!
//! Everything here is a pure function of the orb's live offset plus the small
//! amount of state the interaction model genuinely requires (the page-change
//! cooldown deadline, the single-frame lens attach hysteresis, and the icon
//! crossfade slots). No GPU or windowing types appear in this crate, which is
//! what keeps the whole decision layer unit-testable.

pub mod carousel;
pub mod coordinator;
pub mod icon;

pub use carousel::{PageCarousel, ScrollState};
pub use coordinator::{FrameDecisions, GestureCoordinator, GestureThresholds, LensDecision};
pub use icon::{CrossfadeIcon, HintVisibility, OrbIcon};
