//! Camera rig controller.
//!
//! Produces a camera pose every frame from the vehicle pose and the active
//! [`ViewMode`].
//!
//! ## Modes
//!
//! - **Overview**: fixed high vantage point looking at the world center.
//!   Snapped, never smoothed.
//! - **Driver**: cockpit pose just ahead of the vehicle center,
//!   exponentially smoothed towards the desired pose by a fixed factor per
//!   frame and clamped to a safe sub-region of the world.
//!
//! Switching modes is an instantaneous flag flip. Entering driver mode
//! re-seeds the smoothed pose from the desired pose on the next update so
//! the camera does not glide in from a stale position.

use std::{fmt, str::FromStr};

use campus_layout::WorldBounds;
use glam::{Quat, Vec3};

use crate::{
    error::{DriveConfigResult, ensure},
    platform::PlatformProfile,
    vehicle::VehicleState,
};

// ============================================================================
// View mode
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    #[default]
    Overview,
    Driver,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Overview => Self::Driver,
            Self::Driver => Self::Overview,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Driver => "driver",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overview" => Ok(Self::Overview),
            "driver" => Ok(Self::Driver),
            other => Err(format!(
                "unknown view mode '{other}', expected 'overview' or 'driver'"
            )),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct CameraRigConfig {
    /// Overview camera position relative to the world center (x, height, z).
    pub overview_offset: Vec3,
    /// Vertical field of view in overview mode, in degrees.
    pub overview_fov_degrees: f32,
    /// Fraction of the remaining distance covered per frame in driver mode.
    pub smoothing: f32,
    /// Inset from the world edge for the driver camera position.
    pub safe_margin: f32,
}

impl Default for CameraRigConfig {
    fn default() -> Self {
        Self {
            overview_offset: Vec3::new(0.0, 220.0, 160.0),
            overview_fov_degrees: 50.0,
            smoothing: 0.2,
            safe_margin: 8.0,
        }
    }
}

impl CameraRigConfig {
    pub fn validate(&self) -> DriveConfigResult<()> {
        let smoothing = self.smoothing;
        ensure("smoothing", smoothing > 0.0 && smoothing <= 1.0, || {
            format!("must lie in (0, 1], got {smoothing}")
        })?;
        let margin = self.safe_margin;
        ensure("safe_margin", margin.is_finite() && margin >= 0.0, || {
            format!("must be non-negative, got {margin}")
        })?;
        let fov = self.overview_fov_degrees;
        ensure("overview_fov_degrees", fov > 0.0 && fov < 180.0, || {
            format!("must lie in (0, 180), got {fov}")
        })?;
        let offset = self.overview_offset;
        ensure("overview_offset", offset.is_finite() && offset.y > 0.0, || {
            format!("must be finite and above ground, got {offset}")
        })
    }
}

fn validate_profile(profile: &PlatformProfile) -> DriveConfigResult<()> {
    let fov = profile.fov_degrees;
    ensure("fov_degrees", fov > 0.0 && fov < 180.0, || {
        format!("must lie in (0, 180), got {fov}")
    })?;
    ensure(
        "driver_offset",
        profile.driver_offset.is_finite(),
        || format!("must be finite, got {}", profile.driver_offset),
    )?;
    let look_ahead = profile.look_ahead;
    ensure("look_ahead", look_ahead.is_finite() && look_ahead > 0.0, || {
        format!("must be positive, got {look_ahead}")
    })?;
    let eye = profile.eye_height;
    ensure("eye_height", eye.is_finite(), || {
        format!("must be finite, got {eye}")
    })
}

// ============================================================================
// State
// ============================================================================

/// A camera pose: where it is and what it looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTarget {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Smoothed camera pose plus projection, owned by the rig.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
    position: Vec3,
    look_at: Vec3,
    /// Vertical field of view in radians.
    fov: f32,
    view_mode: ViewMode,
    reseed: bool,
}

impl CameraState {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Vertical field of view in radians.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Entering driver mode schedules a re-seed.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == ViewMode::Driver && self.view_mode != ViewMode::Driver {
            self.reseed = true;
        }
        self.view_mode = mode;
    }

    pub fn toggle_view_mode(&mut self) {
        self.set_view_mode(self.view_mode.toggled());
    }

    /// Snap to the desired pose on the next update.
    pub fn request_reseed(&mut self) {
        self.reseed = true;
    }

    pub fn reseed_pending(&self) -> bool {
        self.reseed
    }

    pub fn target(&self) -> CameraTarget {
        CameraTarget {
            position: self.position,
            look_at: self.look_at,
        }
    }
}

// ============================================================================
// Rig
// ============================================================================

#[derive(Clone, Debug)]
pub struct CameraRig {
    config: CameraRigConfig,
    profile: PlatformProfile,
    bounds: WorldBounds,
}

impl CameraRig {
    pub fn new(
        config: CameraRigConfig,
        profile: PlatformProfile,
        bounds: WorldBounds,
    ) -> DriveConfigResult<Self> {
        config.validate()?;
        validate_profile(&profile)?;
        Ok(Self {
            config,
            profile,
            bounds,
        })
    }

    pub fn config(&self) -> &CameraRigConfig {
        &self.config
    }

    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    /// State showing the overview, ready for the first update.
    pub fn initial_state(&self, view_mode: ViewMode) -> CameraState {
        let overview = self.overview_target();
        CameraState {
            position: overview.position,
            look_at: overview.look_at,
            fov: self.config.overview_fov_degrees.to_radians(),
            view_mode,
            reseed: true,
        }
    }

    pub fn overview_target(&self) -> CameraTarget {
        let center = self.bounds.center();
        let look_at = Vec3::new(center.x, 0.0, center.y);
        CameraTarget {
            position: look_at + self.config.overview_offset,
            look_at,
        }
    }

    /// Desired cockpit pose for a vehicle, before smoothing and clamping.
    pub fn driver_target(&self, vehicle: &VehicleState) -> CameraTarget {
        let base = vehicle.position3();
        let rotation = Quat::from_rotation_y(vehicle.heading);
        let forward = rotation * Vec3::Z;
        CameraTarget {
            position: base + rotation * self.profile.driver_offset,
            look_at: base + forward * self.profile.look_ahead + Vec3::Y * self.profile.eye_height,
        }
    }

    /// Advance the camera by one frame.
    pub fn update(&self, state: &mut CameraState, vehicle: &VehicleState) {
        match state.view_mode {
            ViewMode::Overview => {
                let target = self.overview_target();
                state.position = target.position;
                state.look_at = target.look_at;
                state.fov = self.config.overview_fov_degrees.to_radians();
            }
            ViewMode::Driver => {
                let target = self.driver_target(vehicle);
                if state.reseed {
                    state.position = target.position;
                    state.look_at = target.look_at;
                    state.reseed = false;
                } else {
                    let t = self.config.smoothing;
                    state.position = state.position.lerp(target.position, t);
                    state.look_at = state.look_at.lerp(target.look_at, t);
                }

                let safe = self.bounds.shrink(self.config.safe_margin);
                state.position.x = state.position.x.clamp(safe.min.x, safe.max.x);
                state.position.z = state.position.z.clamp(safe.min.y, safe.max.y);
                state.fov = self.profile.fov_radians();
            }
        }
    }
}
