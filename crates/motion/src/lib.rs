//! Spring physics and drag handling for the floating orb.
//!
//! The crate is deliberately free of GPU and windowing dependencies: the
//! [`DragPhysicsController`] turns pointer deltas and scripted onboarding
//! motions into a resolved orb position, and the owning widget pushes that
//! position into the renderer. Springs are advanced by an explicit
//! `tick(dt)` rather than hidden end-listener callbacks, so the host event
//! loop stays in control of when motion happens.

pub mod drag;
pub mod ease;
pub mod spring;

pub use drag::{DragEvent, DragLimits, DragPhysicsController, DragUpdate};
pub use spring::{SpringChannel, SpringForce};
