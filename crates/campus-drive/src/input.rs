//! Device-agnostic drive input.
//!
//! Hosts fill an [`InputState`] from whatever devices they have (keyboard,
//! gamepad, on-screen joystick). The integrator only ever sees the
//! [`DriveIntent`] sampled from it.

use glam::Vec2;

/// Joystick components at or below this magnitude count as released.
pub const JOYSTICK_DEAD_ZONE: f32 = 0.2;

/// Discrete directional keys currently held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Snapshot of all drive input for one tick.
///
/// `joystick` uses +y for forward and +x for right, with magnitude up to 1.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    pub keys: DriveKeys,
    pub joystick: Vec2,
}

impl InputState {
    pub fn new(keys: DriveKeys, joystick: Vec2) -> Self {
        Self { keys, joystick }
    }

    pub fn from_keys(keys: DriveKeys) -> Self {
        Self::new(keys, Vec2::ZERO)
    }

    /// Merge keys and joystick into effective direction flags.
    ///
    /// A non-finite joystick is ignored; an oversized one is clamped to unit
    /// length before the dead zone applies.
    pub fn sample(&self) -> DriveIntent {
        let stick = if self.joystick.is_finite() {
            self.joystick.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };

        DriveIntent {
            forward: self.keys.forward || stick.y > JOYSTICK_DEAD_ZONE,
            backward: self.keys.backward || stick.y < -JOYSTICK_DEAD_ZONE,
            left: self.keys.left || stick.x < -JOYSTICK_DEAD_ZONE,
            right: self.keys.right || stick.x > JOYSTICK_DEAD_ZONE,
        }
    }
}

/// Longitudinal command resolved from the intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Throttle {
    Forward,
    Reverse,
    Coast,
}

/// Effective direction flags for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl DriveIntent {
    pub const IDLE: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
    };

    /// Forward wins when both forward and backward are asserted.
    pub fn throttle(&self) -> Throttle {
        if self.forward {
            Throttle::Forward
        } else if self.backward {
            Throttle::Reverse
        } else {
            Throttle::Coast
        }
    }

    /// +1 for left, -1 for right, 0 when neither or both are held.
    pub fn steer(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_pass_through() {
        let input = InputState::from_keys(DriveKeys {
            forward: true,
            left: true,
            ..DriveKeys::default()
        });
        let intent = input.sample();
        assert!(intent.forward && intent.left);
        assert!(!intent.backward && !intent.right);
    }

    #[test]
    fn test_joystick_dead_zone() {
        let input = InputState::new(DriveKeys::default(), Vec2::new(0.15, -0.19));
        assert_eq!(input.sample(), DriveIntent::IDLE);

        let input = InputState::new(DriveKeys::default(), Vec2::new(0.5, -0.9));
        let intent = input.sample();
        assert!(intent.right && intent.backward);
    }

    #[test]
    fn test_keys_and_joystick_union() {
        let input = InputState::new(
            DriveKeys {
                left: true,
                ..DriveKeys::default()
            },
            Vec2::new(0.0, 1.0),
        );
        let intent = input.sample();
        assert!(intent.left && intent.forward);
    }

    #[test]
    fn test_oversized_and_invalid_joystick() {
        let input = InputState::new(DriveKeys::default(), Vec2::new(0.0, 50.0));
        assert!(input.sample().forward);

        let input = InputState::new(DriveKeys::default(), Vec2::new(f32::NAN, 1.0));
        assert_eq!(input.sample(), DriveIntent::IDLE);
    }

    #[test]
    fn test_forward_takes_precedence() {
        let intent = DriveIntent {
            forward: true,
            backward: true,
            ..DriveIntent::IDLE
        };
        assert_eq!(intent.throttle(), Throttle::Forward);
    }

    #[test]
    fn test_opposing_steer_cancels() {
        let intent = DriveIntent {
            left: true,
            right: true,
            ..DriveIntent::IDLE
        };
        assert!(intent.steer().abs() < f32::EPSILON);
    }
}
