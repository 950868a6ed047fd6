//! HUD overlay.
//!
//! Shows the speed readout and history plot, the view and driving toggles,
//! the hovered building and the scene controls. On touch platforms it also
//! draws the on-screen joystick.

use std::collections::VecDeque;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use campus_drive::ViewMode;
use campus_viewer::campus;
use egui_plot::{Line, Plot, PlotPoints};

use crate::{
    input::TouchJoystick,
    interaction::InteractionTable,
    scene::{CampusLayout, CurrentScene, PlacementSettings},
    vehicle::{Driving, DrivingRequest, DrivingRequests},
};

/// Number of samples to keep in the speed history.
const SPEED_HISTORY_SIZE: usize = 240;

/// Recent vehicle speeds in km/h, newest last.
#[derive(Resource, Default)]
pub struct SpeedHistory(VecDeque<f32>);

impl SpeedHistory {
    fn push_sample(&mut self, speed: f32) {
        self.0.push_back(speed);
        if self.0.len() > SPEED_HISTORY_SIZE {
            self.0.pop_front();
        }
    }
}

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .init_resource::<SpeedHistory>()
            .add_systems(Update, record_speed_history)
            .add_systems(EguiPrimaryContextPass, (hud_system, joystick_overlay_system));
    }
}

/// Convert a per-tick speed to km/h.
pub fn speed_kmh(speed_per_tick: f32, tick_seconds: f32) -> f32 {
    speed_per_tick / tick_seconds * 3.6
}

fn record_speed_history(driving: Res<Driving>, mut history: ResMut<SpeedHistory>) {
    let session = &driving.0;
    if session.is_active() {
        let speed = speed_kmh(session.vehicle().speed, session.params().tick_seconds);
        history.push_sample(speed);
    } else if !history.0.is_empty() {
        history.0.clear();
    }
}

#[allow(clippy::too_many_arguments)]
fn hud_system(
    mut contexts: EguiContexts,
    driving: Res<Driving>,
    history: Res<SpeedHistory>,
    mut layout: ResMut<CampusLayout>,
    current: Res<CurrentScene>,
    table: Res<InteractionTable>,
    mut settings: ResMut<PlacementSettings>,
    mut requests: ResMut<DrivingRequests>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let session = &driving.0;
    let vehicle = session.vehicle();

    egui::Window::new("Campus")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let label = if session.is_active() {
                    "Leave driving (E)"
                } else {
                    "Start driving (E)"
                };
                if ui.button(label).clicked() {
                    requests.push(DrivingRequest::ToggleDriving);
                }
            });

            ui.horizontal(|ui| {
                ui.label("View (C):");
                for mode in [ViewMode::Overview, ViewMode::Driver] {
                    if ui
                        .selectable_label(session.view_mode() == mode, mode.label())
                        .clicked()
                    {
                        requests.push(DrivingRequest::SetView(mode));
                    }
                }
            });

            ui.separator();

            let speed = speed_kmh(vehicle.speed, session.params().tick_seconds);
            ui.heading(format!("{speed:.0} km/h"));
            ui.label(format!(
                "Heading: {:.0}°  Position: ({:.1}, {:.1})",
                vehicle.heading.to_degrees(),
                vehicle.position.x,
                vehicle.position.y
            ));

            if session.is_active() {
                let points: PlotPoints = history
                    .0
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| [i as f64, f64::from(v)])
                    .collect();
                Plot::new("speed_plot")
                    .height(60.0)
                    .show_axes(false)
                    .allow_drag(false)
                    .allow_zoom(false)
                    .allow_scroll(false)
                    .include_y(0.0)
                    .show(ui, |plot_ui| {
                        plot_ui.line(Line::new("speed", points).color(egui::Color32::LIGHT_BLUE));
                    });
            }

            ui.separator();

            let hovered = table
                .hovered()
                .and_then(|id| layout.layout().building(id))
                .map_or("-", |building| building.name.as_str());
            ui.label(format!("Building: {hovered}"));

            ui.separator();

            if let Some(scene) = current.scene() {
                ui.label(format!(
                    "Scene v{}: {} buildings, {} trees",
                    scene.version,
                    scene.solids.len(),
                    scene.trees.len()
                ));
            }
            ui.horizontal(|ui| {
                ui.label(format!("Tree seed: {:#x}", settings.0.seed));
                if ui.button("Reseed").clicked() {
                    settings.0.seed = settings.0.seed.wrapping_add(1);
                }
                if ui.button("Reload layout").clicked() {
                    match campus::default_layout() {
                        Ok(reloaded) => layout.replace(reloaded),
                        Err(err) => tracing::warn!("Keeping current layout: {err}"),
                    }
                }
            });
        });

    Ok(())
}

fn joystick_overlay_system(mut contexts: EguiContexts, joystick: Res<TouchJoystick>) -> Result {
    let Some(origin) = joystick.origin() else {
        return Ok(());
    };
    let ctx = contexts.ctx_mut()?;

    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("touch_joystick"),
    ));
    let center = egui::pos2(origin.x, origin.y);
    let radius = joystick.radius();
    let knob = joystick.vector().clamp_length_max(1.0) * radius;

    painter.circle_stroke(
        center,
        radius,
        egui::Stroke::new(2.0, egui::Color32::from_white_alpha(160)),
    );
    painter.circle_filled(
        egui::pos2(center.x + knob.x, center.y - knob.y),
        radius * 0.35,
        egui::Color32::from_white_alpha(120),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_kmh() {
        // 0.35 m per tick at 60 Hz is 21 m/s.
        assert!((speed_kmh(0.35, 1.0 / 60.0) - 75.6).abs() < 1e-3);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = SpeedHistory::default();
        for i in 0..(SPEED_HISTORY_SIZE + 10) {
            #[allow(clippy::cast_precision_loss)]
            history.push_sample(i as f32);
        }
        assert_eq!(history.0.len(), SPEED_HISTORY_SIZE);
        assert!((history.0[0] - 10.0).abs() < f32::EPSILON);
    }
}
