//! Explorable 3D campus with a drivable vehicle.
//!
//! Renders the built-in campus layout (buildings, roads and scattered trees)
//! and lets the user drive through it with keyboard, gamepad or an
//! on-screen joystick, switching between an overview and a cockpit camera.

mod camera;
mod input;
mod interaction;
mod launch_params;
mod scene;
mod ui;
mod vehicle;

use bevy::prelude::*;
use campus_drive::{CameraRigConfig, DriveSession, VehicleParams};
use campus_viewer::campus;

use camera::CampusCameraPlugin;
use input::InputPlugin;
use interaction::InteractionPlugin;
use launch_params::LaunchParams;
use scene::{CampusLayout, PlacementSettings, ScenePlugin};
use ui::HudPlugin;
use vehicle::{Driving, VehiclePlugin};

/// Plugin for the main application.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.62, 0.76, 0.90)))
            .add_plugins((
                InputPlugin,
                ScenePlugin,
                VehiclePlugin,
                CampusCameraPlugin,
                InteractionPlugin,
                HudPlugin,
            ));
    }
}

/// Build the campus resources, or report why they cannot be built.
fn campus_resources(
    params: &LaunchParams,
) -> Result<(CampusLayout, PlacementSettings, Driving), Box<dyn std::error::Error>> {
    let layout = campus::default_layout()?;
    let session = DriveSession::new(
        VehicleParams::default(),
        CameraRigConfig::default(),
        params.platform.profile(),
        *layout.bounds(),
        campus::SPAWN_POSE,
    )?;
    Ok((
        CampusLayout::new(layout),
        PlacementSettings(campus::placement_params(params.seed)),
        Driving(session),
    ))
}

fn main() {
    // Initialize tracing for native platforms.
    #[cfg(not(target_family = "wasm"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Initialize tracing for WASM (logs to browser console).
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let params = launch_params::parse();
    tracing::info!(?params, "Starting campus viewer");

    let (layout, settings, driving) = match campus_resources(&params) {
        Ok(resources) => resources,
        Err(err) => {
            tracing::error!("Invalid campus configuration: {err}");
            std::process::exit(1);
        }
    };

    let mut app = App::new();

    #[allow(unused_mut)]
    let mut window = Window {
        title: "campus-viewer".to_string(),
        resolution: (1600, 900).into(),
        position: WindowPosition::Centered(MonitorSelection::Primary),
        ..Default::default()
    };

    // WASM: Fit canvas to parent element and prevent browser event handling.
    #[cfg(target_family = "wasm")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(window),
        ..Default::default()
    }));

    app.insert_resource(params)
        .insert_resource(layout)
        .insert_resource(settings)
        .insert_resource(driving)
        .add_plugins(AppPlugin)
        .run();
}
