//! Input action definitions and the device adapter.
//!
//! Keyboard and gamepad bindings go through `leafwing-input-manager`; touch
//! screens get an on-screen joystick. Both are merged into one
//! [`CurrentInput`] snapshot per frame so the driving core never sees a
//! device.

use bevy::{input::touch::Touches, prelude::*};
use bevy_egui::EguiContexts;
use campus_drive::{ControlScheme, DriveKeys, InputState};
use leafwing_input_manager::{plugin::InputManagerSystem, prelude::*};

use crate::vehicle::{Driving, DrivingRequest, DrivingRequests};

/// Screen-space radius of the touch joystick at full deflection.
const JOYSTICK_RADIUS: f32 = 80.0;

// ============================================================================
// Actions
// ============================================================================

#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum DriveAction {
    Forward,
    Backward,
    Left,
    Right,
    /// Analog stick (gamepad left stick).
    #[actionlike(DualAxis)]
    Stick,
    /// Switch between overview and driver views (C).
    ToggleView,
    /// Enter or leave driving mode (E).
    ToggleDriving,
}

pub fn default_drive_input_map() -> InputMap<DriveAction> {
    InputMap::default()
        .with(DriveAction::Forward, KeyCode::KeyW)
        .with(DriveAction::Forward, KeyCode::ArrowUp)
        .with(DriveAction::Backward, KeyCode::KeyS)
        .with(DriveAction::Backward, KeyCode::ArrowDown)
        .with(DriveAction::Left, KeyCode::KeyA)
        .with(DriveAction::Left, KeyCode::ArrowLeft)
        .with(DriveAction::Right, KeyCode::KeyD)
        .with(DriveAction::Right, KeyCode::ArrowRight)
        .with_dual_axis(DriveAction::Stick, GamepadStick::LEFT)
        .with(DriveAction::ToggleView, KeyCode::KeyC)
        .with(DriveAction::ToggleView, GamepadButton::North)
        .with(DriveAction::ToggleDriving, KeyCode::KeyE)
        .with(DriveAction::ToggleDriving, GamepadButton::Start)
}

// ============================================================================
// Resources
// ============================================================================

/// Merged input for the current frame.
#[derive(Resource, Default, Debug)]
pub struct CurrentInput(pub InputState);

/// On-screen joystick driven by the first touch on the left half of the
/// screen.
#[derive(Resource, Default, Debug)]
pub struct TouchJoystick {
    touch: Option<u64>,
    origin: Vec2,
    vector: Vec2,
}

impl TouchJoystick {
    /// Where the active touch started, in logical pixels.
    pub fn origin(&self) -> Option<Vec2> {
        self.touch.map(|_| self.origin)
    }

    pub fn vector(&self) -> Vec2 {
        self.vector
    }

    pub fn radius(&self) -> f32 {
        JOYSTICK_RADIUS
    }

    fn begin(&mut self, id: u64, origin: Vec2) {
        self.touch = Some(id);
        self.origin = origin;
        self.vector = Vec2::ZERO;
    }

    fn release(&mut self) {
        self.touch = None;
        self.vector = Vec2::ZERO;
    }
}

/// Joystick vector for a drag from `origin` to `current`.
///
/// Screen y grows downwards; the result uses +y for forward.
pub fn joystick_vector(origin: Vec2, current: Vec2, radius: f32) -> Vec2 {
    let delta = current - origin;
    Vec2::new(delta.x, -delta.y) / radius
}

// ============================================================================
// Plugin
// ============================================================================

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<DriveAction>::default())
            .init_resource::<CurrentInput>()
            .init_resource::<TouchJoystick>()
            .add_systems(Startup, spawn_input_controller)
            .add_systems(
                PreUpdate,
                (
                    update_touch_joystick.run_if(uses_touch),
                    (sample_input, dispatch_toggles),
                )
                    .chain()
                    .after(InputManagerSystem::Update),
            );
    }
}

/// Run condition: the session's platform steers with the on-screen joystick.
fn uses_touch(driving: Res<Driving>) -> bool {
    driving.0.rig().profile().control_scheme == ControlScheme::Touch
}

fn spawn_input_controller(mut commands: Commands) {
    commands.spawn((
        Name::new("Drive input"),
        default_drive_input_map(),
        ActionState::<DriveAction>::default(),
    ));
}

fn update_touch_joystick(
    touches: Res<Touches>,
    window: Single<&Window>,
    mut joystick: ResMut<TouchJoystick>,
) {
    if let Some(id) = joystick.touch {
        match touches.get_pressed(id) {
            Some(touch) => {
                joystick.vector = joystick_vector(joystick.origin, touch.position(), JOYSTICK_RADIUS);
            }
            None => joystick.release(),
        }
        return;
    }

    let half_width = window.width() * 0.5;
    if let Some(touch) = touches
        .iter_just_pressed()
        .find(|touch| touch.position().x < half_width)
    {
        joystick.begin(touch.id(), touch.position());
    }
}

/// Merge keys, gamepad stick and touch joystick into [`CurrentInput`].
fn sample_input(
    action_query: Query<&ActionState<DriveAction>>,
    joystick: Res<TouchJoystick>,
    mut contexts: EguiContexts,
    mut current: ResMut<CurrentInput>,
) {
    let egui_wants_kb = contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.wants_keyboard_input());

    let Ok(action_state) = action_query.single() else {
        current.0 = InputState::default();
        return;
    };

    let keys = if egui_wants_kb {
        DriveKeys::default()
    } else {
        DriveKeys {
            forward: action_state.pressed(&DriveAction::Forward),
            backward: action_state.pressed(&DriveAction::Backward),
            left: action_state.pressed(&DriveAction::Left),
            right: action_state.pressed(&DriveAction::Right),
        }
    };

    // Touch takes over while a finger is on the joystick.
    let stick = if joystick.touch.is_some() {
        joystick.vector
    } else {
        action_state.axis_pair(&DriveAction::Stick)
    };

    current.0 = InputState::new(keys, stick);
}

fn dispatch_toggles(
    action_query: Query<&ActionState<DriveAction>>,
    mut contexts: EguiContexts,
    mut requests: ResMut<DrivingRequests>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };
    if contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.wants_keyboard_input())
    {
        return;
    }

    if action_state.just_pressed(&DriveAction::ToggleView) {
        requests.push(DrivingRequest::ToggleView);
    }
    if action_state.just_pressed(&DriveAction::ToggleDriving) {
        requests.push(DrivingRequest::ToggleDriving);
    }
}

#[cfg(test)]
mod tests {
    use campus_drive::{CameraRigConfig, DriveSession, PlatformProfile, SpawnPose, VehicleParams};
    use campus_layout::WorldBounds;

    use super::*;

    #[derive(Resource, Default)]
    struct JoystickRuns(u32);

    fn count_runs(mut runs: ResMut<JoystickRuns>) {
        runs.0 += 1;
    }

    fn touch_runs(profile: PlatformProfile) -> u32 {
        let session = DriveSession::new(
            VehicleParams::default(),
            CameraRigConfig::default(),
            profile,
            WorldBounds::square(50.0).unwrap(),
            SpawnPose::default(),
        )
        .unwrap();

        let mut app = App::new();
        app.insert_resource(Driving(session))
            .init_resource::<JoystickRuns>()
            .add_systems(Update, count_runs.run_if(uses_touch));
        app.update();
        app.world().resource::<JoystickRuns>().0
    }

    #[test]
    fn test_touch_follows_session_profile() {
        assert_eq!(touch_runs(PlatformProfile::mobile()), 1);
        assert_eq!(touch_runs(PlatformProfile::desktop()), 0);
    }

    #[test]
    fn test_joystick_vector_flips_screen_y() {
        let v = joystick_vector(Vec2::new(100.0, 100.0), Vec2::new(140.0, 20.0), 80.0);
        assert!((v.x - 0.5).abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_joystick_release_zeroes_vector() {
        let mut joystick = TouchJoystick::default();
        joystick.begin(3, Vec2::new(10.0, 10.0));
        joystick.vector = Vec2::ONE;
        assert_eq!(joystick.origin(), Some(Vec2::new(10.0, 10.0)));
        joystick.release();
        assert_eq!(joystick.vector(), Vec2::ZERO);
        assert!(joystick.origin().is_none());
    }

    #[test]
    fn test_default_map_binds_every_action() {
        let map = default_drive_input_map();
        for action in [
            DriveAction::Forward,
            DriveAction::Backward,
            DriveAction::Left,
            DriveAction::Right,
            DriveAction::ToggleView,
            DriveAction::ToggleDriving,
        ] {
            assert!(map.get_buttonlike(&action).is_some(), "{action:?}");
        }
        assert!(map.get_dual_axislike(&DriveAction::Stick).is_some());
    }
}
