//! Campus scene spawning.
//!
//! Generates a [`CampusScene`] from the [`CampusLayout`] resource and spawns
//! it under a single root entity. Any change to the layout or placement
//! settings regenerates the whole scene; a failed regeneration keeps the
//! previous one on screen.

use bevy::{light::light_consts::lux, prelude::*};
use campus_layout::{CampusScene, Layout, PlacementParams, RoadSegment, Solid, TreePlacement};

use crate::interaction::InteractionTable;

/// Road surface thickness, raised slightly above the ground to avoid z-fighting.
const ROAD_THICKNESS: f32 = 0.06;

const TRUNK_RADIUS: f32 = 0.25;
const TRUNK_HEIGHT: f32 = 2.4;
const CANOPY_RADIUS: f32 = 1.4;

// ============================================================================
// Resources
// ============================================================================

/// The layout currently shown, tagged with the version passed to scene
/// generation.
#[derive(Resource, Debug)]
pub struct CampusLayout {
    layout: Layout,
    version: u64,
}

impl CampusLayout {
    pub fn new(layout: Layout) -> Self {
        Self { layout, version: 0 }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Swap in a new layout under the next version.
    pub fn replace(&mut self, layout: Layout) {
        self.layout = layout;
        self.version += 1;
    }
}

/// Tree placement settings.
#[derive(Resource, Debug)]
pub struct PlacementSettings(pub PlacementParams);

/// The generated scene and the entity it was spawned under.
#[derive(Resource, Default)]
pub struct CurrentScene {
    scene: Option<CampusScene>,
    root: Option<Entity>,
}

impl CurrentScene {
    pub fn scene(&self) -> Option<&CampusScene> {
        self.scene.as_ref()
    }
}

// ============================================================================
// Components
// ============================================================================

/// Root of all spawned scene content.
#[derive(Component)]
pub struct CampusRoot;

/// A spawned building. All of its blocks share `material`.
#[derive(Component, Debug)]
pub struct BuildingSolid {
    pub id: String,
    pub material: Handle<StandardMaterial>,
}

#[derive(Component)]
pub struct Tree;

#[derive(Component)]
pub struct Road;

// ============================================================================
// Plugin
// ============================================================================

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentScene>()
            .add_systems(Startup, spawn_lighting)
            .add_systems(
                Update,
                regenerate_scene.run_if(
                    resource_changed::<CampusLayout>.or(resource_changed::<PlacementSettings>),
                ),
            );
    }
}

fn spawn_lighting(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            illuminance: lux::OVERCAST_DAY,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(80.0, 200.0, -60.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Shared meshes and materials for one scene build.
struct ScenePalette {
    trunk_mesh: Handle<Mesh>,
    canopy_mesh: Handle<Mesh>,
    trunk_material: Handle<StandardMaterial>,
    canopy_material: Handle<StandardMaterial>,
    road_material: Handle<StandardMaterial>,
}

impl ScenePalette {
    fn new(meshes: &mut Assets<Mesh>, materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            trunk_mesh: meshes.add(Cylinder::new(TRUNK_RADIUS, TRUNK_HEIGHT)),
            canopy_mesh: meshes.add(Sphere::new(CANOPY_RADIUS)),
            trunk_material: materials.add(StandardMaterial {
                base_color: Color::srgb(0.40, 0.27, 0.16),
                perceptual_roughness: 0.9,
                ..default()
            }),
            canopy_material: materials.add(StandardMaterial {
                base_color: Color::srgb(0.22, 0.50, 0.22),
                perceptual_roughness: 0.8,
                ..default()
            }),
            road_material: materials.add(StandardMaterial {
                base_color: Color::srgb(0.22, 0.22, 0.24),
                perceptual_roughness: 0.95,
                ..default()
            }),
        }
    }
}

/// Rebuild the scene from the current layout and settings.
fn regenerate_scene(
    mut commands: Commands,
    layout: Res<CampusLayout>,
    settings: Res<PlacementSettings>,
    mut current: ResMut<CurrentScene>,
    mut table: ResMut<InteractionTable>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let scene = match CampusScene::generate(layout.layout(), &settings.0, layout.version()) {
        Ok(scene) => scene,
        Err(err) => {
            tracing::warn!(
                version = layout.version(),
                "Keeping previous campus scene, regeneration failed: {err}"
            );
            return;
        }
    };

    if let Some(root) = current.root.take() {
        commands.entity(root).despawn();
    }

    let palette = ScenePalette::new(&mut meshes, &mut materials);
    let bounds = layout.layout().bounds();
    let ground_size = bounds.size();
    let ground_center = bounds.center();
    let ground_mesh = meshes.add(Plane3d::default().mesh().size(ground_size.x, ground_size.y));
    let ground_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.42, 0.58, 0.32),
        perceptual_roughness: 1.0,
        ..default()
    });

    let root = commands
        .spawn((
            CampusRoot,
            Name::new(format!("Campus v{}", scene.version)),
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent.spawn((
                Name::new("Ground"),
                Mesh3d(ground_mesh),
                MeshMaterial3d(ground_material),
                Transform::from_xyz(ground_center.x, 0.0, ground_center.y),
            ));

            for road in layout.layout().roads() {
                parent.spawn(road_bundle(road, &palette, &mut meshes));
            }

            for solid in &scene.solids {
                spawn_solid(parent, solid, &mut meshes, &mut materials);
            }

            for tree in &scene.trees {
                spawn_tree(parent, tree, &palette);
            }
        })
        .id();

    table.reset(scene.solids.iter().map(|solid| solid.building_id.clone()));
    current.scene = Some(scene);
    current.root = Some(root);
}

fn road_bundle(
    road: &RoadSegment,
    palette: &ScenePalette,
    meshes: &mut Assets<Mesh>,
) -> impl Bundle {
    let midpoint = road.midpoint();
    (
        Road,
        Mesh3d(meshes.add(Cuboid::new(road.width, ROAD_THICKNESS, road.length()))),
        MeshMaterial3d(palette.road_material.clone()),
        Transform::from_xyz(midpoint.x, ROAD_THICKNESS * 0.5, midpoint.y)
            .with_rotation(Quat::from_rotation_y(road.heading())),
    )
}

fn spawn_solid(
    parent: &mut ChildSpawnerCommands<'_>,
    solid: &Solid,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let [r, g, b] = solid.color;
    let material = materials.add(StandardMaterial {
        base_color: Color::linear_rgb(r, g, b),
        perceptual_roughness: 0.85,
        ..default()
    });

    parent
        .spawn((
            BuildingSolid {
                id: solid.building_id.clone(),
                material: material.clone(),
            },
            Name::new(solid.building_id.clone()),
            Transform::from_translation(solid.origin).with_rotation(solid.rotation()),
            Visibility::default(),
        ))
        .with_children(|building| {
            for block in &solid.blocks {
                building.spawn((
                    Mesh3d(meshes.add(Cuboid::from_size(block.size()))),
                    MeshMaterial3d(material.clone()),
                    Transform::from_translation(block.center()),
                ));
            }
        });

    tracing::debug!(
        id = %solid.building_id,
        kind = %solid.kind,
        blocks = solid.blocks.len(),
        "Spawned building"
    );
}

fn spawn_tree(parent: &mut ChildSpawnerCommands<'_>, tree: &TreePlacement, palette: &ScenePalette) {
    parent
        .spawn((
            Tree,
            Transform::from_translation(tree.position)
                .with_rotation(Quat::from_rotation_y(tree.yaw))
                .with_scale(Vec3::splat(tree.scale)),
            Visibility::default(),
        ))
        .with_children(|tree| {
            tree.spawn((
                Mesh3d(palette.trunk_mesh.clone()),
                MeshMaterial3d(palette.trunk_material.clone()),
                Transform::from_xyz(0.0, TRUNK_HEIGHT * 0.5, 0.0),
            ));
            tree.spawn((
                Mesh3d(palette.canopy_mesh.clone()),
                MeshMaterial3d(palette.canopy_material.clone()),
                Transform::from_xyz(0.0, TRUNK_HEIGHT + CANOPY_RADIUS * 0.6, 0.0),
            ));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_viewer::campus;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_resource::<InteractionTable>()
            .init_resource::<CurrentScene>()
            .insert_resource(CampusLayout::new(campus::default_layout().unwrap()))
            .insert_resource(PlacementSettings(campus::placement_params(1)))
            .add_systems(
                Update,
                regenerate_scene.run_if(
                    resource_changed::<CampusLayout>.or(resource_changed::<PlacementSettings>),
                ),
            );
        app
    }

    #[test]
    fn test_initial_scene_spawned() {
        let mut app = app();
        app.update();

        let world = app.world_mut();
        let buildings = world.query::<&BuildingSolid>().iter(world).count();
        assert_eq!(buildings, campus::buildings().len());
        assert!(world.query::<&Tree>().iter(world).count() > 0);
        assert_eq!(
            world.query::<&Road>().iter(world).count(),
            campus::roads().len()
        );
        assert_eq!(world.resource::<InteractionTable>().len(), buildings);
    }

    #[test]
    fn test_settings_change_regenerates() {
        let mut app = app();
        app.update();
        let first = app.world().resource::<CurrentScene>().root;

        app.world_mut().resource_mut::<PlacementSettings>().0.seed = 99;
        app.update();

        let world = app.world_mut();
        let second = world.resource::<CurrentScene>().root;
        assert_ne!(first, second);
        assert_eq!(world.query::<&CampusRoot>().iter(world).count(), 1);
    }

    #[test]
    fn test_replaced_layout_regenerates_with_next_version() {
        let mut app = app();
        app.update();
        let first = app.world().resource::<CurrentScene>().root;

        let buildings: Vec<_> = campus::buildings().into_iter().take(3).collect();
        let layout = Layout::new(
            buildings,
            campus::roads(),
            campus_layout::WorldBounds::square(campus::WORLD_HALF_EXTENT).unwrap(),
        )
        .unwrap();
        app.world_mut().resource_mut::<CampusLayout>().replace(layout);
        app.update();

        let current = app.world().resource::<CurrentScene>();
        assert_ne!(current.root, first);
        let scene = current.scene().unwrap();
        assert_eq!(scene.version, 1);
        assert_eq!(scene.solids.len(), 3);

        let world = app.world_mut();
        assert_eq!(world.query::<&BuildingSolid>().iter(world).count(), 3);
        assert_eq!(world.resource::<InteractionTable>().len(), 3);
    }

    #[test]
    fn test_failed_regeneration_keeps_scene() {
        let mut app = app();
        app.update();
        let first = app.world().resource::<CurrentScene>().root;

        app.world_mut().resource_mut::<PlacementSettings>().0.step = -1.0;
        app.update();

        let current = app.world().resource::<CurrentScene>();
        assert_eq!(current.root, first);
        assert!(current.scene().is_some());
    }
}
