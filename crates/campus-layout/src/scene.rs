//! One-shot scene generation from a validated layout.

use glam::Vec3;

use crate::{
    descriptor::Layout,
    error::LayoutResult,
    geometry::{Solid, synthesize},
    obstacles::ObstacleIndex,
    placement::{PlacementParams, TreePlacement, scatter_trees},
};

/// Immutable render list for one layout version.
///
/// Regenerated wholesale whenever the layout changes; never patched.
#[derive(Clone, Debug, PartialEq)]
pub struct CampusScene {
    pub version: u64,
    pub solids: Vec<Solid>,
    pub trees: Vec<TreePlacement>,
}

impl CampusScene {
    /// Synthesize every building and scatter trees.
    ///
    /// Any failure aborts the whole generation.
    pub fn generate(layout: &Layout, params: &PlacementParams, version: u64) -> LayoutResult<Self> {
        let solids = layout
            .buildings()
            .iter()
            .map(synthesize)
            .collect::<LayoutResult<Vec<_>>>()?;

        let obstacles = ObstacleIndex::new(layout);
        let trees = scatter_trees(layout.bounds(), &obstacles, params)?;

        tracing::info!(
            version,
            solids = solids.len(),
            trees = trees.len(),
            "Generated campus scene"
        );

        Ok(Self {
            version,
            solids,
            trees,
        })
    }

    pub fn solid(&self, building_id: &str) -> Option<&Solid> {
        self.solids
            .iter()
            .find(|solid| solid.building_id == building_id)
    }

    /// Nearest solid hit by a world-space ray, with its distance.
    pub fn pick(&self, origin: Vec3, dir: Vec3) -> Option<(&Solid, f32)> {
        self.solids
            .iter()
            .filter_map(|solid| solid.ray_hit(origin, dir).map(|t| (solid, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::{
        bounds::WorldBounds,
        descriptor::{BuildingDescriptor, BuildingKind, RoadSegment},
        error::LayoutError,
    };

    fn layout(buildings: Vec<BuildingDescriptor>) -> Layout {
        Layout::new(
            buildings,
            vec![RoadSegment::new(
                Vec2::new(0.0, -40.0),
                Vec2::new(0.0, 40.0),
                6.0,
            )],
            WorldBounds::square(40.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_generate_builds_every_solid() {
        let layout = layout(vec![
            BuildingDescriptor::new(
                "a",
                "A",
                BuildingKind::Plain,
                Vec2::new(-20.0, 0.0),
                Vec2::new(6.0, 6.0),
                10.0,
            ),
            BuildingDescriptor::new(
                "b",
                "B",
                BuildingKind::Hostel,
                Vec2::new(20.0, 0.0),
                Vec2::new(10.0, 10.0),
                12.0,
            ),
        ]);
        let scene = CampusScene::generate(&layout, &PlacementParams::default(), 3).unwrap();
        assert_eq!(scene.version, 3);
        assert_eq!(scene.solids.len(), 2);
        assert!(scene.solid("b").is_some());
        assert!(!scene.trees.is_empty());
    }

    #[test]
    fn test_one_bad_building_aborts_generation() {
        let layout = layout(vec![
            BuildingDescriptor::new(
                "ok",
                "Ok",
                BuildingKind::Plain,
                Vec2::ZERO,
                Vec2::new(4.0, 4.0),
                4.0,
            ),
            BuildingDescriptor::new(
                "thin",
                "Thin courtyard",
                BuildingKind::Hollow,
                Vec2::new(20.0, 20.0),
                Vec2::new(1.5, 10.0),
                4.0,
            ),
        ]);
        let err = CampusScene::generate(&layout, &PlacementParams::default(), 0).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidBuilding { ref id, .. } if id == "thin"));
    }

    #[test]
    fn test_pick_returns_nearest() {
        let layout = layout(vec![
            BuildingDescriptor::new(
                "near",
                "Near",
                BuildingKind::Plain,
                Vec2::new(0.0, 10.0),
                Vec2::new(4.0, 4.0),
                6.0,
            ),
            BuildingDescriptor::new(
                "far",
                "Far",
                BuildingKind::Plain,
                Vec2::new(0.0, 30.0),
                Vec2::new(4.0, 4.0),
                6.0,
            ),
        ]);
        let scene = CampusScene::generate(&layout, &PlacementParams::default(), 0).unwrap();
        let (solid, distance) = scene.pick(Vec3::new(0.0, 2.0, 0.0), Vec3::Z).unwrap();
        assert_eq!(solid.building_id, "near");
        assert!((distance - 8.0).abs() < 1e-4);
        assert!(scene.pick(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Z).is_none());
    }
}
