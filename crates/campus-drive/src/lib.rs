//! Driving core for the campus viewer.
//!
//! A device-agnostic input adapter, a fixed-tick vehicle integrator and a
//! two-mode camera rig. No Bevy dependency: the viewer and the `drive-sim`
//! binary drive the same code.

pub mod camera;
pub mod error;
pub mod input;
pub mod platform;
pub mod session;
pub mod ticker;
pub mod vehicle;

pub use camera::{CameraRig, CameraRigConfig, CameraState, CameraTarget, ViewMode};
pub use error::{DriveConfigError, DriveConfigResult};
pub use input::{DriveIntent, DriveKeys, InputState, JOYSTICK_DEAD_ZONE, Throttle};
pub use platform::{ControlScheme, PlatformProfile};
pub use session::{DriveSession, SpawnPose};
pub use ticker::FixedTicker;
pub use vehicle::{VehicleParams, VehicleState};
