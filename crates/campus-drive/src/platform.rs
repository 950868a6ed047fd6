//! Per-platform camera and control presets.
//!
//! Selected once at startup and passed to the camera rig, which never
//! inspects the device itself.

use glam::Vec3;

/// How the player steers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlScheme {
    /// Keyboard keys plus an optional gamepad stick.
    #[default]
    KeyboardAndPad,
    /// On-screen joystick.
    Touch,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlatformProfile {
    /// Vertical field of view in the driver view, in degrees.
    pub fov_degrees: f32,
    /// Cockpit eye point in vehicle space (+z is ahead, +y is up).
    pub driver_offset: Vec3,
    /// How far ahead of the vehicle the camera looks.
    pub look_ahead: f32,
    /// Height of the look-at point above ground.
    pub eye_height: f32,
    pub control_scheme: ControlScheme,
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

impl PlatformProfile {
    pub fn desktop() -> Self {
        Self {
            fov_degrees: 60.0,
            driver_offset: Vec3::new(0.0, 1.3, 0.5),
            look_ahead: 10.0,
            eye_height: 1.2,
            control_scheme: ControlScheme::KeyboardAndPad,
        }
    }

    /// Wider field of view and a tighter offset for small screens.
    pub fn mobile() -> Self {
        Self {
            fov_degrees: 75.0,
            driver_offset: Vec3::new(0.0, 1.1, 0.3),
            look_ahead: 8.0,
            eye_height: 1.0,
            control_scheme: ControlScheme::Touch,
        }
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}
