//! Damped spring integration for single scalar channels.

/// Stiffness of a gentle spring; used for the reveal slide-in.
pub const STIFFNESS_LOW: f32 = 200.0;
/// Stiffness of a firm spring; averaged with [`STIFFNESS_LOW`] for drag return.
pub const STIFFNESS_MEDIUM: f32 = 1500.0;
/// Damping ratio that lets the orb overshoot once or twice before settling.
pub const DAMPING_RATIO_MEDIUM_BOUNCY: f32 = 0.5;

/// A spring is considered settled once both value and velocity are inside
/// these windows around the target.
const SETTLE_DISTANCE: f32 = 0.1;
const SETTLE_VELOCITY: f32 = 0.5;

/// Largest integration step; longer frames are split into substeps so the
/// stiffest spring stays stable.
const MAX_SUBSTEP: f32 = 0.004;

/// Spring parameters expressed as stiffness plus a dimensionless damping ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringForce {
    pub stiffness: f32,
    pub damping_ratio: f32,
}

impl SpringForce {
    pub fn new(stiffness: f32, damping_ratio: f32) -> Self {
        Self {
            stiffness,
            damping_ratio,
        }
    }

    /// Damping coefficient for the equation of motion.
    fn damping(&self) -> f32 {
        2.0 * self.damping_ratio * self.stiffness.sqrt()
    }
}

/// One animated scalar. Lives for the widget lifetime and is re-targeted on
/// each gesture; `tick` advances it and reports whether it has settled.
#[derive(Debug, Clone)]
pub struct SpringChannel {
    force: SpringForce,
    value: f32,
    velocity: f32,
    target: f32,
    settled: bool,
}

impl SpringChannel {
    pub fn new(force: SpringForce) -> Self {
        Self {
            force,
            value: 0.0,
            velocity: 0.0,
            target: 0.0,
            settled: true,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Moves the channel instantly, dropping any in-flight motion.
    pub fn jump_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
        self.settled = true;
    }

    /// Re-targets the spring; motion continues from the current value and
    /// velocity, which is what makes successive pointer moves feel fluid.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
        if (self.value - target).abs() > SETTLE_DISTANCE {
            self.settled = false;
        }
    }

    /// Advances the spring by `dt` seconds and returns the new value together
    /// with a settled flag. Settling snaps the value onto the target so the
    /// renderer never sees a lingering sub-pixel offset.
    pub fn tick(&mut self, dt: f32) -> (f32, bool) {
        if self.settled {
            return (self.value, true);
        }

        let damping = self.force.damping();
        let mut remaining = dt.clamp(0.0, 0.064);
        while remaining > 0.0 {
            let step = remaining.min(MAX_SUBSTEP);
            remaining -= step;

            let displacement = self.value - self.target;
            let acceleration = -self.force.stiffness * displacement - damping * self.velocity;
            self.velocity += acceleration * step;
            self.value += self.velocity * step;
        }

        if (self.value - self.target).abs() < SETTLE_DISTANCE
            && self.velocity.abs() < SETTLE_VELOCITY
        {
            self.value = self.target;
            self.velocity = 0.0;
            self.settled = true;
        }

        (self.value, self.settled)
    }
}
