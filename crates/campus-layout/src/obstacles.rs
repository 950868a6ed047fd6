//! Exclusion geometry derived from layout descriptors.
//!
//! Both tests are conservative axis-aligned approximations: a building is
//! represented by the bounding rectangle of its rotated footprint, and a
//! road by the bounding box of its endpoints grown by half its width. A
//! diagonal road therefore excludes a whole rectangle rather than a
//! corridor.

use glam::Vec2;

use crate::{
    bounds::Rect,
    descriptor::{BuildingDescriptor, Layout, RoadSegment},
};

/// Immutable exclusion queries over buildings and roads.
#[derive(Clone, Debug, Default)]
pub struct ObstacleIndex {
    /// Bounding rectangles of the rotated building footprints.
    buildings: Vec<Rect>,
    /// Road endpoint boxes already grown by half the road width.
    roads: Vec<Rect>,
}

impl ObstacleIndex {
    pub fn new(layout: &Layout) -> Self {
        Self::from_parts(layout.buildings(), layout.roads())
    }

    pub fn from_parts(buildings: &[BuildingDescriptor], roads: &[RoadSegment]) -> Self {
        Self {
            buildings: buildings.iter().map(BuildingDescriptor::footprint).collect(),
            roads: roads
                .iter()
                .map(|road| Rect::from_corners(road.start, road.end).expand(road.width * 0.5))
                .collect(),
        }
    }

    /// True if `point` lies within `buffer` of any building footprint.
    pub fn building_exclusion(&self, point: Vec2, buffer: f32) -> bool {
        self.buildings
            .iter()
            .any(|rect| rect.expand(buffer).contains(point))
    }

    /// True if `point` lies inside any road's box grown by `buffer`.
    pub fn road_exclusion(&self, point: Vec2, buffer: f32) -> bool {
        self.roads
            .iter()
            .any(|rect| rect.expand(buffer).contains(point))
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::BuildingKind;

    fn index() -> ObstacleIndex {
        let hall = BuildingDescriptor::new(
            "hall",
            "Hall",
            BuildingKind::Plain,
            Vec2::new(10.0, 0.0),
            Vec2::new(4.0, 6.0),
            5.0,
        );
        let road = RoadSegment::new(Vec2::new(-20.0, -20.0), Vec2::new(-20.0, 20.0), 6.0);
        ObstacleIndex::from_parts(&[hall], &[road])
    }

    #[test]
    fn test_building_exclusion_respects_buffer() {
        let index = index();
        assert!(index.building_exclusion(Vec2::new(10.0, 0.0), 0.0));
        assert!(!index.building_exclusion(Vec2::new(13.0, 0.0), 0.0));
        assert!(index.building_exclusion(Vec2::new(13.0, 0.0), 1.0));
        // Edge of the buffered box is still excluded.
        assert!(index.building_exclusion(Vec2::new(14.0, 5.0), 2.0));
        assert!(!index.building_exclusion(Vec2::new(14.1, 0.0), 2.0));
    }

    #[test]
    fn test_building_exclusion_covers_rotation() {
        let rotated = BuildingDescriptor::new(
            "block",
            "Block",
            BuildingKind::Plain,
            Vec2::ZERO,
            Vec2::new(10.0, 2.0),
            5.0,
        )
        .with_rotation(std::f32::consts::FRAC_PI_2);
        let index = ObstacleIndex::from_parts(&[rotated], &[]);
        assert!(index.building_exclusion(Vec2::new(0.0, 4.5), 0.0));
        assert!(!index.building_exclusion(Vec2::new(4.5, 0.0), 0.0));
    }

    #[test]
    fn test_building_exclusion_contains_diagonal_corners() {
        let building = BuildingDescriptor::new(
            "canteen",
            "Canteen",
            BuildingKind::Plain,
            Vec2::new(5.0, -3.0),
            Vec2::new(12.0, 6.0),
            4.0,
        )
        .with_rotation(-0.4);
        let index = ObstacleIndex::from_parts(std::slice::from_ref(&building), &[]);
        let rotation = glam::Mat2::from_angle(building.rotation);
        for corner in [
            Vec2::new(6.0, 3.0),
            Vec2::new(-6.0, 3.0),
            Vec2::new(6.0, -3.0),
            Vec2::new(-6.0, -3.0),
        ] {
            // Pulled in slightly so rounding cannot land on the edge.
            let point = building.center + rotation * (corner * 0.999);
            assert!(index.building_exclusion(point, 0.0), "{point}");
        }
    }

    #[test]
    fn test_road_exclusion_includes_half_width() {
        let index = index();
        assert!(index.road_exclusion(Vec2::new(-17.0, 0.0), 0.0));
        assert!(!index.road_exclusion(Vec2::new(-16.5, 0.0), 0.0));
        assert!(index.road_exclusion(Vec2::new(-16.5, 0.0), 1.0));
        // Endpoints are grown too.
        assert!(index.road_exclusion(Vec2::new(-20.0, 22.0), 0.0));
    }

    #[test]
    fn test_diagonal_road_excludes_its_bounding_box() {
        let diagonal = RoadSegment::new(Vec2::ZERO, Vec2::new(20.0, 20.0), 2.0);
        let index = ObstacleIndex::from_parts(&[], &[diagonal]);
        // Far from the corridor, but inside the endpoint box.
        assert!(index.road_exclusion(Vec2::new(19.0, 1.0), 0.0));
        assert!(!index.road_exclusion(Vec2::new(22.0, 1.0), 0.0));
    }

    #[test]
    fn test_empty_index_excludes_nothing() {
        let index = ObstacleIndex::default();
        assert!(!index.building_exclusion(Vec2::ZERO, 100.0));
        assert!(!index.road_exclusion(Vec2::ZERO, 100.0));
    }
}
