//! Vehicle physics integrator.
//!
//! Pure functions over [`VehicleState`], usable from both the Bevy
//! `FixedUpdate` system and the headless `drive-sim` binary.
//!
//! All rates are expressed per reference tick (`tick_seconds`). A step of
//! `dt` seconds scales them by `dt / tick_seconds`, so hosts that run the
//! integrator once per rendered frame stay frame-rate independent.

use std::f32::consts::TAU;

use campus_layout::WorldBounds;
use glam::{Vec2, Vec3};

use crate::{
    error::{DriveConfigResult, ensure},
    input::{DriveIntent, Throttle},
};

/// Tuning for the vehicle motion model.
#[derive(Clone, Debug)]
pub struct VehicleParams {
    /// Length of one reference tick in seconds.
    pub tick_seconds: f32,
    /// Speed gained per tick while throttle is held.
    pub acceleration: f32,
    /// Forward speed cap (world units per tick).
    pub max_forward_speed: f32,
    /// Reverse speed cap. Negative, smaller magnitude than forward.
    pub max_reverse_speed: f32,
    /// Multiplicative speed decay per tick with no throttle, in `(0, 1)`.
    pub friction: f32,
    /// Coasting speeds below this magnitude snap to zero.
    pub stop_threshold: f32,
    /// Minimum speed magnitude for steering to have any effect.
    pub turn_threshold: f32,
    /// Heading change per tick at low speed (radians).
    pub turn_rate: f32,
    /// Heading change per tick above `fast_speed_threshold` (radians).
    pub fast_turn_rate: f32,
    /// Speed magnitude above which `fast_turn_rate` applies.
    pub fast_speed_threshold: f32,
    /// Distance kept from the world edge.
    pub boundary_margin: f32,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            tick_seconds: 1.0 / 60.0,
            acceleration: 0.01,
            max_forward_speed: 0.35,
            max_reverse_speed: -0.15,
            friction: 0.92,
            stop_threshold: 0.01,
            turn_threshold: 0.02,
            turn_rate: 0.03,
            fast_turn_rate: 0.045,
            fast_speed_threshold: 0.2,
            boundary_margin: 5.0,
        }
    }
}

impl VehicleParams {
    pub fn validate(&self) -> DriveConfigResult<()> {
        let tick = self.tick_seconds;
        ensure("tick_seconds", tick.is_finite() && tick > 0.0, || {
            format!("must be positive, got {tick}")
        })?;
        let accel = self.acceleration;
        ensure("acceleration", accel.is_finite() && accel > 0.0, || {
            format!("must be positive, got {accel}")
        })?;
        let (fwd, rev) = (self.max_forward_speed, self.max_reverse_speed);
        ensure("max_forward_speed", fwd.is_finite() && fwd > 0.0, || {
            format!("must be positive, got {fwd}")
        })?;
        ensure(
            "max_reverse_speed",
            rev.is_finite() && rev < 0.0 && -rev <= fwd,
            || format!("must be negative with magnitude at most {fwd}, got {rev}"),
        )?;
        let friction = self.friction;
        ensure("friction", friction > 0.0 && friction < 1.0, || {
            format!("must lie in (0, 1), got {friction}")
        })?;
        for (field, value) in [
            ("stop_threshold", self.stop_threshold),
            ("turn_threshold", self.turn_threshold),
            ("turn_rate", self.turn_rate),
            ("fast_turn_rate", self.fast_turn_rate),
            ("fast_speed_threshold", self.fast_speed_threshold),
            ("boundary_margin", self.boundary_margin),
        ] {
            ensure(field, value.is_finite() && value >= 0.0, || {
                format!("must be non-negative, got {value}")
            })?;
        }
        Ok(())
    }

    /// Worst-case number of coasting ticks from `speed` to a full stop.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn coast_ticks_to_stop(&self, speed: f32) -> u32 {
        let speed = speed.abs();
        if speed < self.stop_threshold {
            return 0;
        }
        let ticks = (self.stop_threshold / speed).ln() / self.friction.ln();
        ticks.ceil().max(1.0) as u32
    }
}

/// Pose and speed of the vehicle.
///
/// `heading` is measured from +Z towards +X and always lies in `[0, 2π)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleState {
    pub position: Vec2,
    pub heading: f32,
    pub speed: f32,
}

impl VehicleState {
    /// At rest at the given pose.
    pub fn spawn(position: Vec2, heading: f32) -> Self {
        Self {
            position,
            heading: wrap_heading(heading),
            speed: 0.0,
        }
    }

    /// Unit vector along the heading in the ground plane (x, z).
    pub fn forward(&self) -> Vec2 {
        let (sin, cos) = self.heading.sin_cos();
        Vec2::new(sin, cos)
    }

    /// World position at ground level.
    pub fn position3(&self) -> Vec3 {
        Vec3::new(self.position.x, 0.0, self.position.y)
    }
}

/// Reduce an angle into `[0, 2π)`.
///
/// `rem_euclid` of a tiny negative angle rounds up to exactly `TAU` in f32.
pub fn wrap_heading(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Advance the vehicle by one reference tick.
pub fn tick(
    params: &VehicleParams,
    state: &mut VehicleState,
    intent: DriveIntent,
    bounds: &WorldBounds,
) {
    step(params, state, intent, bounds, params.tick_seconds);
}

/// Advance the vehicle by `dt` seconds.
pub fn step(
    params: &VehicleParams,
    state: &mut VehicleState,
    intent: DriveIntent,
    bounds: &WorldBounds,
    dt: f32,
) {
    if !(dt.is_finite() && dt > 0.0) {
        return;
    }
    let k = dt / params.tick_seconds;

    state.speed = match intent.throttle() {
        Throttle::Forward => (state.speed + params.acceleration * k).min(params.max_forward_speed),
        Throttle::Reverse => (state.speed - params.acceleration * k).max(params.max_reverse_speed),
        Throttle::Coast => {
            let decay = if (k - 1.0).abs() < f32::EPSILON {
                params.friction
            } else {
                params.friction.powf(k)
            };
            let speed = state.speed * decay;
            if speed.abs() < params.stop_threshold {
                0.0
            } else {
                speed
            }
        }
    };
    // Coasting can start above a cap if params changed mid-session.
    state.speed = state
        .speed
        .clamp(params.max_reverse_speed, params.max_forward_speed);

    let steer = intent.steer();
    let magnitude = state.speed.abs();
    if steer != 0.0 && magnitude > params.turn_threshold {
        let rate = if magnitude > params.fast_speed_threshold {
            params.fast_turn_rate
        } else {
            params.turn_rate
        };
        state.heading = wrap_heading(state.heading + rate * steer * k);
    }

    let travelled = state.position + state.forward() * state.speed * k;
    state.position = bounds.shrink(params.boundary_margin).clamp(travelled);

    debug_assert!(state.heading >= 0.0 && state.heading < TAU);
}
