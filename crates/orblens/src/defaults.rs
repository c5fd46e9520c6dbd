//! Tuning constants for the orb, the slot, and the launch choreography.

use std::time::Duration;

use glam::{Vec2, Vec3};

/// Orb field radius in pixels.
pub const ORB_RADIUS: f32 = 26.0;
/// Slot field radius in pixels.
pub const SLOT_RADIUS: f32 = 30.0;
/// Vertical distance of the slot centre from the bottom edge.
pub const SLOT_BOTTOM_MARGIN: f32 = 96.0;
/// Pointer hits within this radius of the orb centre start a drag.
pub const GRAB_RADIUS: f32 = ORB_RADIUS * 1.6;
/// How far below its rest position the orb starts its reveal slide.
pub const REVEAL_OFFSCREEN_Y: f32 = 160.0;

pub const SLOT_COLOR: Vec3 = Vec3::new(0.13, 0.12, 0.18);
pub const ORB_COLOR: Vec3 = Vec3::new(0.95, 0.30, 0.42);
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.04,
    g: 0.04,
    b: 0.06,
    a: 1.0,
};

/// Launch choreography offsets from startup.
pub const LAUNCH_ORB_REVEAL: Duration = Duration::from_secs(1);
pub const LAUNCH_HINTS_REVEAL: Duration = Duration::from_secs(2);
pub const LAUNCH_FAKE_DRAG: Duration = Duration::from_secs(3);
/// Scripted onboarding displacement: straight up, short of the lens zone.
pub const FAKE_DRAG_DELTA: Vec2 = Vec2::new(0.0, -60.0);

/// How long an animated page selection takes to settle.
pub const CAROUSEL_SETTLE: Duration = Duration::from_millis(300);
