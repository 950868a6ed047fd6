//! Hover interaction over buildings.
//!
//! Hover state lives in a side table keyed by building id. The scene's
//! solids stay untouched; the highlight is applied to the materials only.

use std::collections::HashMap;

use bevy::{prelude::*, window::PrimaryWindow};
use bevy_egui::EguiContexts;

use crate::{
    camera::CampusCamera,
    scene::{BuildingSolid, CurrentScene},
};

/// Emissive tint added to a hovered building.
const HOVER_EMISSIVE: LinearRgba = LinearRgba::rgb(0.18, 0.16, 0.08);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    Idle,
    Hovered,
}

/// Per-building hover state. At most one building is hovered at a time.
#[derive(Resource, Default, Debug)]
pub struct InteractionTable {
    states: HashMap<String, HoverState>,
    hovered: Option<String>,
}

impl InteractionTable {
    /// Forget all state and track the given buildings, all idle.
    pub fn reset<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.states = ids.into_iter().map(|id| (id, HoverState::Idle)).collect();
        self.hovered = None;
    }

    /// Mark `id` as the hovered building, or clear the hover.
    ///
    /// Unknown ids clear the hover. Returns whether anything changed.
    pub fn set_hovered(&mut self, id: Option<&str>) -> bool {
        let id = id.filter(|id| self.states.contains_key(*id));
        if self.hovered.as_deref() == id {
            return false;
        }

        if let Some(previous) = self.hovered.take()
            && let Some(state) = self.states.get_mut(&previous)
        {
            *state = HoverState::Idle;
        }
        if let Some(id) = id {
            if let Some(state) = self.states.get_mut(id) {
                *state = HoverState::Hovered;
            }
            self.hovered = Some(id.to_owned());
        }
        true
    }

    pub fn state(&self, id: &str) -> HoverState {
        self.states.get(id).copied().unwrap_or_default()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InteractionTable>().add_systems(
            Update,
            (
                update_hover,
                apply_highlight.run_if(resource_changed::<InteractionTable>),
            )
                .chain(),
        );
    }
}

/// Pick the building under the cursor.
fn update_hover(
    window: Single<&Window, With<PrimaryWindow>>,
    camera: Single<(&Camera, &GlobalTransform), With<CampusCamera>>,
    current: Res<CurrentScene>,
    mut contexts: EguiContexts,
    mut table: ResMut<InteractionTable>,
) {
    let over_ui = contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area());

    let (camera, camera_transform) = *camera;
    let hit = window
        .cursor_position()
        .filter(|_| !over_ui)
        .and_then(|cursor| camera.viewport_to_world(camera_transform, cursor).ok())
        .and_then(|ray| {
            current
                .scene()
                .and_then(|scene| scene.pick(ray.origin, *ray.direction))
        })
        .map(|(solid, _)| solid.building_id.as_str());

    // Only write when the hover moves so change detection stays quiet.
    if table.hovered() != hit {
        table.set_hovered(hit);
    }
}

fn apply_highlight(
    table: Res<InteractionTable>,
    buildings: Query<&BuildingSolid>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for building in &buildings {
        let emissive = match table.state(&building.id) {
            HoverState::Hovered => HOVER_EMISSIVE,
            HoverState::Idle => LinearRgba::BLACK,
        };
        if let Some(material) = materials.get_mut(&building.material) {
            material.emissive = emissive;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> InteractionTable {
        let mut table = InteractionTable::default();
        table.reset(["library".to_owned(), "admin".to_owned()]);
        table
    }

    #[test]
    fn test_single_hover() {
        let mut table = table();
        assert!(table.set_hovered(Some("library")));
        assert_eq!(table.state("library"), HoverState::Hovered);

        assert!(table.set_hovered(Some("admin")));
        assert_eq!(table.state("library"), HoverState::Idle);
        assert_eq!(table.state("admin"), HoverState::Hovered);
        assert_eq!(table.hovered(), Some("admin"));
    }

    #[test]
    fn test_repeat_hover_is_not_a_change() {
        let mut table = table();
        assert!(table.set_hovered(Some("admin")));
        assert!(!table.set_hovered(Some("admin")));
        assert!(table.set_hovered(None));
        assert!(!table.set_hovered(None));
        assert_eq!(table.state("admin"), HoverState::Idle);
    }

    #[test]
    fn test_unknown_id_clears_hover() {
        let mut table = table();
        table.set_hovered(Some("library"));
        assert!(table.set_hovered(Some("stadium")));
        assert!(table.hovered().is_none());
        assert_eq!(table.state("stadium"), HoverState::Idle);
    }

    #[test]
    fn test_reset_drops_old_ids() {
        let mut table = table();
        table.set_hovered(Some("library"));
        table.reset(["canteen".to_owned()]);
        assert_eq!(table.len(), 1);
        assert!(table.hovered().is_none());
        assert_eq!(table.state("library"), HoverState::Idle);
    }
}
