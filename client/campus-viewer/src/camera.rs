//! Campus camera.
//!
//! The rig itself lives in the driving session; this module only spawns the
//! Bevy camera and copies the smoothed pose onto it once per frame, after
//! the frame's vehicle ticks and before transforms propagate.

use bevy::{prelude::*, transform::TransformSystems};

use crate::vehicle::Driving;

/// Near clip plane in meters.
const NEAR: f32 = 0.1;
/// Far clip plane in meters.
const FAR: f32 = 2_000.0;

/// Marker for the campus camera.
#[derive(Component)]
pub struct CampusCamera;

pub struct CampusCameraPlugin;

impl Plugin for CampusCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera).add_systems(
            PostUpdate,
            camera_rig_system.before(TransformSystems::Propagate),
        );
    }
}

fn spawn_camera(mut commands: Commands, driving: Res<Driving>) {
    let camera = driving.0.camera();
    commands.spawn((
        CampusCamera,
        Camera3d::default(),
        Transform::from_translation(camera.position()).looking_at(camera.look_at(), Vec3::Y),
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov(),
            near: NEAR,
            far: FAR,
            ..Default::default()
        }),
    ));
}

/// Advance the rig by one frame and apply it to the camera.
fn camera_rig_system(
    mut driving: ResMut<Driving>,
    camera: Single<(&mut Transform, &mut Projection), With<CampusCamera>>,
) {
    driving.0.update_camera();
    let state = driving.0.camera();
    let (mut transform, mut projection) = camera.into_inner();

    *transform =
        Transform::from_translation(state.position()).looking_at(state.look_at(), Vec3::Y);
    if let Projection::Perspective(perspective) = &mut *projection
        && (perspective.fov - state.fov()).abs() > f32::EPSILON
    {
        perspective.fov = state.fov();
    }
}
