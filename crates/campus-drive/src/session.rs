//! Driving mode lifecycle.
//!
//! A [`DriveSession`] owns the vehicle, the fixed-step accumulator and the
//! smoothed camera. Hosts feed it one frame at a time.

use campus_layout::WorldBounds;
use glam::Vec2;

use crate::{
    camera::{CameraRig, CameraRigConfig, CameraState, ViewMode},
    error::DriveConfigResult,
    input::InputState,
    platform::PlatformProfile,
    ticker::FixedTicker,
    vehicle::{self, VehicleParams, VehicleState},
};

/// Where the vehicle appears when driving starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPose {
    pub position: Vec2,
    pub heading: f32,
}

impl Default for SpawnPose {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            heading: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DriveSession {
    params: VehicleParams,
    bounds: WorldBounds,
    spawn: SpawnPose,
    rig: CameraRig,
    ticker: FixedTicker,
    vehicle: VehicleState,
    camera: CameraState,
    active: bool,
    ticks: u64,
}

impl DriveSession {
    pub fn new(
        params: VehicleParams,
        rig_config: CameraRigConfig,
        profile: PlatformProfile,
        bounds: WorldBounds,
        spawn: SpawnPose,
    ) -> DriveConfigResult<Self> {
        params.validate()?;
        let rig = CameraRig::new(rig_config, profile, bounds)?;
        let camera = rig.initial_state(ViewMode::Overview);
        Ok(Self {
            ticker: FixedTicker::new(params.tick_seconds),
            vehicle: VehicleState::spawn(spawn.position, spawn.heading),
            params,
            bounds,
            spawn,
            rig,
            camera,
            active: false,
            ticks: 0,
        })
    }

    /// Start driving from the spawn pose at rest.
    pub fn enter(&mut self) {
        self.vehicle = VehicleState::spawn(self.spawn.position, self.spawn.heading);
        self.ticker.reset();
        self.ticks = 0;
        self.active = true;
        self.camera.request_reseed();
        tracing::info!(
            x = self.spawn.position.x,
            z = self.spawn.position.y,
            heading = self.spawn.heading,
            "Entered driving mode"
        );
    }

    /// Stop driving. The vehicle stays where it is but no longer ticks.
    pub fn exit(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        tracing::info!(ticks = self.ticks, "Left driving mode");
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run the ticks due for `dt` seconds, then update the camera once.
    ///
    /// Returns the number of ticks run. Zero while inactive.
    pub fn frame(&mut self, dt: f32, input: &InputState) -> u32 {
        let due = if self.active {
            self.ticker.advance(dt)
        } else {
            0
        };
        for _ in 0..due {
            self.tick(input);
        }
        self.update_camera();
        due
    }

    /// Advance the vehicle by exactly one fixed tick.
    ///
    /// `input` is sampled once and held for the whole tick.
    pub fn tick(&mut self, input: &InputState) {
        if !self.active {
            return;
        }
        let intent = input.sample();
        vehicle::tick(&self.params, &mut self.vehicle, intent, &self.bounds);
        self.ticks += 1;
    }

    pub fn update_camera(&mut self) {
        self.rig.update(&mut self.camera, &self.vehicle);
    }

    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    /// Ticks run since the last `enter`.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn view_mode(&self) -> ViewMode {
        self.camera.view_mode()
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.camera.set_view_mode(mode);
    }

    pub fn toggle_view_mode(&mut self) {
        self.camera.toggle_view_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::DriveKeys;

    fn session() -> DriveSession {
        DriveSession::new(
            VehicleParams::default(),
            CameraRigConfig::default(),
            PlatformProfile::desktop(),
            WorldBounds::square(150.0).unwrap(),
            SpawnPose {
                position: Vec2::new(10.0, -20.0),
                heading: 0.0,
            },
        )
        .unwrap()
    }

    fn throttle() -> InputState {
        InputState::from_keys(DriveKeys {
            forward: true,
            ..DriveKeys::default()
        })
    }

    #[test]
    fn test_inactive_session_does_not_move() {
        let mut session = session();
        assert_eq!(session.frame(1.0, &throttle()), 0);
        assert_eq!(session.vehicle().position, Vec2::new(10.0, -20.0));
    }

    #[test]
    fn test_enter_spawns_at_rest() {
        let mut session = session();
        session.enter();
        for _ in 0..30 {
            session.tick(&throttle());
        }
        assert!(session.vehicle().speed > 0.0);

        session.exit();
        session.enter();
        assert_eq!(session.vehicle().speed, 0.0);
        assert_eq!(session.vehicle().position, Vec2::new(10.0, -20.0));
        assert_eq!(session.tick_count(), 0);
    }

    #[test]
    fn test_exit_freezes_state() {
        let mut session = session();
        session.enter();
        for _ in 0..10 {
            session.tick(&throttle());
        }
        session.exit();
        let frozen = *session.vehicle();
        session.frame(0.5, &throttle());
        session.tick(&throttle());
        assert_eq!(*session.vehicle(), frozen);
    }

    #[test]
    fn test_frame_runs_due_ticks() {
        let mut session = session();
        session.enter();
        let tick = session.params().tick_seconds;
        assert_eq!(session.frame(tick * 3.5, &throttle()), 3);
        assert_eq!(session.tick_count(), 3);
    }

    #[test]
    fn test_driver_view_follows_after_enter() {
        let mut session = session();
        session.set_view_mode(ViewMode::Driver);
        session.enter();
        session.frame(0.0, &InputState::default());
        let target = session.rig().driver_target(session.vehicle());
        assert!(session.camera().position().distance(target.position) < 1e-4);

        session.toggle_view_mode();
        assert_eq!(session.view_mode(), ViewMode::Overview);
    }
}
