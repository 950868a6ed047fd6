//! Driving mode integration.
//!
//! The [`Driving`] resource owns the headless [`DriveSession`]. The vehicle
//! integrator runs in `FixedUpdate` at the session's tick rate; the visible
//! body follows it every frame. Mode changes are queued as
//! [`DrivingRequest`]s and applied in one place.

use bevy::prelude::*;
use campus_drive::{DriveSession, ViewMode};

use crate::{input::CurrentInput, launch_params::LaunchParams};

/// Ride height of the body's center above the ground.
const BODY_HEIGHT: f32 = 0.5;

// ============================================================================
// Resources
// ============================================================================

#[derive(Resource)]
pub struct Driving(pub DriveSession);

/// A requested change to driving or view mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrivingRequest {
    Enter,
    Exit,
    ToggleDriving,
    ToggleView,
    SetView(ViewMode),
}

/// Requests queued this frame, applied by [`apply_driving_requests`].
#[derive(Resource, Default, Debug)]
pub struct DrivingRequests(Vec<DrivingRequest>);

impl DrivingRequests {
    pub fn push(&mut self, request: DrivingRequest) {
        self.0.push(request);
    }
}

/// Marker for the visible vehicle body.
#[derive(Component)]
pub struct VehicleBody;

// ============================================================================
// Plugin
// ============================================================================

pub struct VehiclePlugin;

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DrivingRequests>()
            .add_systems(
                Startup,
                (configure_fixed_time, spawn_vehicle_body, queue_launch_requests),
            )
            .add_systems(FixedUpdate, vehicle_tick_system)
            .add_systems(Update, (apply_driving_requests, sync_vehicle_body).chain());
    }
}

fn configure_fixed_time(mut commands: Commands, driving: Res<Driving>) {
    let tick = f64::from(driving.0.params().tick_seconds);
    commands.insert_resource(Time::<Fixed>::from_seconds(tick));
}

/// `--drive` starts in the driver view regardless of `--view-mode`.
fn queue_launch_requests(params: Res<LaunchParams>, mut requests: ResMut<DrivingRequests>) {
    if params.drive {
        requests.push(DrivingRequest::Enter);
    } else {
        requests.push(DrivingRequest::SetView(params.view_mode));
    }
}

fn spawn_vehicle_body(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let paint = materials.add(StandardMaterial {
        base_color: Color::srgb(0.85, 0.15, 0.12),
        perceptual_roughness: 0.4,
        ..default()
    });
    let glass = materials.add(StandardMaterial {
        base_color: Color::srgb(0.15, 0.2, 0.25),
        perceptual_roughness: 0.1,
        ..default()
    });

    commands
        .spawn((
            VehicleBody,
            Name::new("Vehicle"),
            Transform::default(),
            Visibility::Hidden,
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(2.0, 0.8, 4.0))),
                MeshMaterial3d(paint),
            ));
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(1.6, 0.6, 2.0))),
                MeshMaterial3d(glass),
                Transform::from_xyz(0.0, 0.7, -0.3),
            ));
        });
}

/// Advance the vehicle by one fixed tick using this frame's input snapshot.
fn vehicle_tick_system(mut driving: ResMut<Driving>, input: Res<CurrentInput>) {
    if driving.0.is_active() {
        driving.0.tick(&input.0);
    }
}

/// Apply queued mode changes.
///
/// Entering driving mode also switches to the driver view; leaving it
/// returns to the overview.
pub fn apply_driving_requests(
    mut requests: ResMut<DrivingRequests>,
    mut driving: ResMut<Driving>,
) {
    if requests.0.is_empty() {
        return;
    }

    for request in std::mem::take(&mut requests.0) {
        let session = &mut driving.0;
        match request {
            DrivingRequest::Enter => enter(session),
            DrivingRequest::Exit => exit(session),
            DrivingRequest::ToggleDriving => {
                if session.is_active() {
                    exit(session);
                } else {
                    enter(session);
                }
            }
            DrivingRequest::ToggleView => session.toggle_view_mode(),
            DrivingRequest::SetView(mode) => session.set_view_mode(mode),
        }
    }
}

fn enter(session: &mut DriveSession) {
    session.enter();
    session.set_view_mode(ViewMode::Driver);
}

fn exit(session: &mut DriveSession) {
    session.exit();
    session.set_view_mode(ViewMode::Overview);
}

fn sync_vehicle_body(
    driving: Res<Driving>,
    body: Single<(&mut Transform, &mut Visibility), With<VehicleBody>>,
) {
    let session = &driving.0;
    let vehicle = session.vehicle();
    let (mut transform, mut visibility) = body.into_inner();

    transform.translation = vehicle.position3() + Vec3::Y * BODY_HEIGHT;
    transform.rotation = Quat::from_rotation_y(vehicle.heading);
    *visibility = if session.is_active() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
}

#[cfg(test)]
mod tests {
    use campus_drive::{CameraRigConfig, PlatformProfile, SpawnPose, VehicleParams};
    use campus_layout::WorldBounds;

    use super::*;

    fn app() -> App {
        let session = DriveSession::new(
            VehicleParams::default(),
            CameraRigConfig::default(),
            PlatformProfile::desktop(),
            WorldBounds::square(50.0).unwrap(),
            SpawnPose::default(),
        )
        .unwrap();

        let mut app = App::new();
        app.insert_resource(Driving(session))
            .init_resource::<DrivingRequests>()
            .add_systems(Update, apply_driving_requests);
        app
    }

    #[test]
    fn test_toggle_driving_switches_view() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<DrivingRequests>()
            .push(DrivingRequest::ToggleDriving);
        app.update();

        let driving = app.world().resource::<Driving>();
        assert!(driving.0.is_active());
        assert_eq!(driving.0.view_mode(), ViewMode::Driver);

        app.world_mut()
            .resource_mut::<DrivingRequests>()
            .push(DrivingRequest::ToggleDriving);
        app.update();

        let driving = app.world().resource::<Driving>();
        assert!(!driving.0.is_active());
        assert_eq!(driving.0.view_mode(), ViewMode::Overview);
    }

    #[test]
    fn test_requests_applied_in_order() {
        let mut app = app();
        {
            let mut requests = app.world_mut().resource_mut::<DrivingRequests>();
            requests.push(DrivingRequest::Enter);
            requests.push(DrivingRequest::SetView(ViewMode::Overview));
        }
        app.update();

        let driving = app.world().resource::<Driving>();
        assert!(driving.0.is_active());
        assert_eq!(driving.0.view_mode(), ViewMode::Overview);
        assert!(app.world().resource::<DrivingRequests>().0.is_empty());
    }
}
