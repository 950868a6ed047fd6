//! The built-in campus: buildings, roads, landmark pockets and spawn pose.
//!
//! Coordinates are in meters on the ground plane, with x to the east and the
//! second component (world z) to the north. The main gate sits on the
//! southern end of the central avenue and the vehicle spawns just outside it.

use std::f32::consts::FRAC_PI_2;

use campus_drive::SpawnPose;
use campus_layout::{
    BuildingDescriptor, BuildingKind, ExclusionPocket, Layout, LayoutResult, PlacementParams,
    RoadSegment, WorldBounds,
};
use glam::Vec2;

/// Half the side length of the square campus.
pub const WORLD_HALF_EXTENT: f32 = 150.0;

/// Dead zones kept free of trees for landmark props.
pub const LANDMARK_POCKETS: [ExclusionPocket; 2] = [
    ExclusionPocket::new("statue", Vec2::new(10.0, 12.0), Vec2::new(22.0, 24.0)),
    ExclusionPocket::new("fountain", Vec2::new(-30.0, -36.0), Vec2::new(-14.0, -20.0)),
];

/// Just south of the main gate, facing up the avenue.
pub const SPAWN_POSE: SpawnPose = SpawnPose {
    position: Vec2::new(0.0, -138.0),
    heading: 0.0,
};

pub fn buildings() -> Vec<BuildingDescriptor> {
    vec![
        BuildingDescriptor::new(
            "main-gate",
            "Main Gate",
            BuildingKind::Gate,
            Vec2::new(0.0, -130.0),
            Vec2::new(24.0, 4.0),
            12.0,
        ),
        BuildingDescriptor::new(
            "admin",
            "Administration Block",
            BuildingKind::Plain,
            Vec2::new(-45.0, -60.0),
            Vec2::new(30.0, 20.0),
            18.0,
        ),
        BuildingDescriptor::new(
            "library",
            "Central Library",
            BuildingKind::Hollow,
            Vec2::new(45.0, -60.0),
            Vec2::new(36.0, 36.0),
            14.0,
        ),
        BuildingDescriptor::new(
            "hostel-east",
            "East Hostel",
            BuildingKind::Hostel,
            Vec2::new(75.0, 45.0),
            Vec2::new(40.0, 30.0),
            16.0,
        )
        .with_rotation(-FRAC_PI_2),
        BuildingDescriptor::new(
            "hostel-west",
            "West Hostel",
            BuildingKind::Hostel,
            Vec2::new(-75.0, 45.0),
            Vec2::new(40.0, 30.0),
            16.0,
        )
        .with_rotation(FRAC_PI_2),
        BuildingDescriptor::new(
            "research-park",
            "Research Park",
            BuildingKind::TowerCluster,
            Vec2::new(0.0, 100.0),
            Vec2::new(30.0, 30.0),
            40.0,
        ),
        BuildingDescriptor::new(
            "sports-ground",
            "Sports Ground",
            BuildingKind::FlatPad,
            Vec2::new(-95.0, -110.0),
            Vec2::new(50.0, 30.0),
            0.0,
        ),
        BuildingDescriptor::new(
            "canteen",
            "Canteen",
            BuildingKind::Plain,
            Vec2::new(95.0, -112.0),
            Vec2::new(24.0, 18.0),
            8.0,
        )
        .with_rotation(-0.4)
        .with_color([0.82, 0.58, 0.38]),
    ]
}

pub fn roads() -> Vec<RoadSegment> {
    vec![
        // Central avenue through the main gate.
        RoadSegment::new(Vec2::new(0.0, -150.0), Vec2::new(0.0, 80.0), 10.0),
        RoadSegment::new(Vec2::new(-140.0, 0.0), Vec2::new(140.0, 0.0), 8.0),
        RoadSegment::new(Vec2::new(-140.0, -88.0), Vec2::new(140.0, -88.0), 6.0),
        RoadSegment::new(Vec2::new(20.0, 10.0), Vec2::new(60.0, 70.0), 6.0),
    ]
}

pub fn default_layout() -> LayoutResult<Layout> {
    Layout::new(
        buildings(),
        roads(),
        WorldBounds::square(WORLD_HALF_EXTENT)?,
    )
}

pub fn placement_params(seed: u64) -> PlacementParams {
    PlacementParams {
        seed,
        pockets: LANDMARK_POCKETS.to_vec(),
        ..PlacementParams::default()
    }
}
