//! Static layout descriptors supplied by the host application.
//!
//! Descriptors are plain data. [`Layout::new`] validates a full set of them
//! up front so that everything downstream can assume well-formed input.

use std::{collections::HashSet, fmt, str::FromStr};

use glam::Vec2;
use serde::Deserialize;

use crate::{
    bounds::{Rect, WorldBounds},
    error::{LayoutError, LayoutResult},
};

/// Minimum road segment length; shorter segments are treated as degenerate.
const MIN_ROAD_LENGTH: f32 = 1e-4;

/// Structural profile of a building, selected by its `type` tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum BuildingKind {
    /// Rectangular prism.
    Plain,
    /// Courtyard: walls around a rectangular cavity.
    Hollow,
    /// U-shaped footprint: two wings joined by a spine.
    Hostel,
    /// Archway frame a vehicle can pass through.
    Gate,
    /// Base pad with slender decorative towers.
    TowerCluster,
    /// Thin ground slab (sports grounds, courts).
    FlatPad,
}

impl BuildingKind {
    pub const ALL: [Self; 6] = [
        Self::Plain,
        Self::Hollow,
        Self::Hostel,
        Self::Gate,
        Self::TowerCluster,
        Self::FlatPad,
    ];

    /// The tag used in descriptor data.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Hollow => "hollow",
            Self::Hostel => "hostel",
            Self::Gate => "gate",
            Self::TowerCluster => "tower-cluster",
            Self::FlatPad => "flat-pad",
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BuildingKind {
    type Err = LayoutError;

    fn from_str(tag: &str) -> LayoutResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| LayoutError::UnknownBuildingKind {
                tag: tag.to_string(),
            })
    }
}

impl TryFrom<String> for BuildingKind {
    type Error = LayoutError;

    fn try_from(tag: String) -> LayoutResult<Self> {
        tag.parse()
    }
}

/// A building footprint with its extrusion parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BuildingDescriptor {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Footprint center on the ground plane (x, z).
    pub center: Vec2,
    /// Footprint width (x) and depth (z).
    pub size: Vec2,
    /// Extrusion height. Flat pads use roughly zero.
    pub height: f32,
    #[serde(rename = "type")]
    pub kind: BuildingKind,
    /// Rotation about the vertical axis in radians.
    #[serde(default)]
    pub rotation: f32,
    /// Fixed linear RGB color overriding the per-kind default.
    #[serde(default)]
    pub color: Option<[f32; 3]>,
}

impl BuildingDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: BuildingKind,
        center: Vec2,
        size: Vec2,
        height: f32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            center,
            size,
            height,
            kind,
            rotation: 0.0,
            color: None,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = Some(color);
        self
    }

    pub fn validate(&self) -> LayoutResult<()> {
        let invalid = |detail: String| LayoutError::InvalidBuilding {
            id: self.id.clone(),
            detail,
        };

        if self.id.is_empty() {
            return Err(invalid("identifier is empty".to_string()));
        }
        if !self.center.is_finite() {
            return Err(invalid(format!("non-finite center {}", self.center)));
        }
        if !self.size.is_finite() || self.size.x <= 0.0 || self.size.y <= 0.0 {
            return Err(invalid(format!(
                "footprint {} x {} must be strictly positive",
                self.size.x, self.size.y
            )));
        }
        if !self.height.is_finite() || self.height < 0.0 {
            return Err(invalid(format!("height {} must be non-negative", self.height)));
        }
        if !self.rotation.is_finite() {
            return Err(invalid(format!("non-finite rotation {}", self.rotation)));
        }
        Ok(())
    }

    /// Axis-aligned bounding rectangle of the rotated footprint.
    ///
    /// Equal to the plain footprint when `rotation` is zero.
    pub fn footprint(&self) -> Rect {
        let (sin, cos) = self.rotation.sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        let extent = Vec2::new(
            self.size.x * cos + self.size.y * sin,
            self.size.x * sin + self.size.y * cos,
        );
        Rect::from_center_size(self.center, extent)
    }
}

/// A straight road between two endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct RoadSegment {
    pub start: Vec2,
    pub end: Vec2,
    pub width: f32,
}

impl RoadSegment {
    pub fn new(start: Vec2, end: Vec2, width: f32) -> Self {
        Self { start, end, width }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Heading of the segment about the vertical axis, measured from +z.
    pub fn heading(&self) -> f32 {
        let delta = self.end - self.start;
        delta.x.atan2(delta.y)
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    fn validate(&self, index: usize) -> LayoutResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(LayoutError::DegenerateRoad {
                index,
                detail: "non-finite endpoint".to_string(),
            });
        }
        if self.length() < MIN_ROAD_LENGTH {
            return Err(LayoutError::DegenerateRoad {
                index,
                detail: format!("endpoints {} and {} coincide", self.start, self.end),
            });
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(LayoutError::DegenerateRoad {
                index,
                detail: format!("width {} must be positive", self.width),
            });
        }
        Ok(())
    }
}

/// A validated set of layout descriptors.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "LayoutData")]
pub struct Layout {
    buildings: Vec<BuildingDescriptor>,
    roads: Vec<RoadSegment>,
    bounds: WorldBounds,
}

/// Unvalidated wire shape of [`Layout`].
#[derive(Deserialize)]
struct LayoutData {
    #[serde(default)]
    buildings: Vec<BuildingDescriptor>,
    #[serde(default)]
    roads: Vec<RoadSegment>,
    bounds: WorldBounds,
}

impl TryFrom<LayoutData> for Layout {
    type Error = LayoutError;

    fn try_from(data: LayoutData) -> LayoutResult<Self> {
        Self::new(data.buildings, data.roads, data.bounds)
    }
}

impl Layout {
    /// Validate and bundle descriptors.
    ///
    /// Fails on the first malformed building, duplicate id, degenerate road,
    /// or invalid bounds.
    pub fn new(
        buildings: Vec<BuildingDescriptor>,
        roads: Vec<RoadSegment>,
        bounds: WorldBounds,
    ) -> LayoutResult<Self> {
        bounds.validate()?;

        let mut seen = HashSet::with_capacity(buildings.len());
        for building in &buildings {
            building.validate()?;
            if !seen.insert(building.id.as_str()) {
                return Err(LayoutError::DuplicateBuildingId {
                    id: building.id.clone(),
                });
            }
        }

        for (index, road) in roads.iter().enumerate() {
            road.validate(index)?;
        }

        Ok(Self {
            buildings,
            roads,
            bounds,
        })
    }

    pub fn buildings(&self) -> &[BuildingDescriptor] {
        &self.buildings
    }

    pub fn roads(&self) -> &[RoadSegment] {
        &self.roads
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    pub fn building(&self, id: &str) -> Option<&BuildingDescriptor> {
        self.buildings.iter().find(|building| building.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> WorldBounds {
        WorldBounds::square(50.0).unwrap()
    }

    fn library() -> BuildingDescriptor {
        BuildingDescriptor::new(
            "library",
            "Library",
            BuildingKind::Plain,
            Vec2::new(10.0, 5.0),
            Vec2::new(8.0, 6.0),
            12.0,
        )
    }

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in BuildingKind::ALL {
            assert_eq!(kind.tag().parse::<BuildingKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert_eq!(
            "pagoda".parse::<BuildingKind>(),
            Err(LayoutError::UnknownBuildingKind {
                tag: "pagoda".to_string()
            })
        );
    }

    #[test]
    fn test_zero_width_footprint_is_rejected() {
        let mut building = library();
        building.size.x = 0.0;
        let err = Layout::new(vec![building], vec![], bounds()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidBuilding { ref id, .. } if id == "library"));
    }

    #[test]
    fn test_negative_height_is_rejected() {
        let mut building = library();
        building.height = -1.0;
        assert!(Layout::new(vec![building], vec![], bounds()).is_err());
    }

    #[test]
    fn test_flat_pad_allows_zero_height() {
        let pad = BuildingDescriptor::new(
            "court",
            "Court",
            BuildingKind::FlatPad,
            Vec2::ZERO,
            Vec2::new(20.0, 10.0),
            0.0,
        );
        assert!(Layout::new(vec![pad], vec![], bounds()).is_ok());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let err = Layout::new(vec![library(), library()], vec![], bounds()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::DuplicateBuildingId {
                id: "library".to_string()
            }
        );
    }

    #[test]
    fn test_degenerate_road_is_rejected() {
        let road = RoadSegment::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0), 4.0);
        let err = Layout::new(vec![], vec![road], bounds()).unwrap_err();
        assert!(matches!(err, LayoutError::DegenerateRoad { index: 0, .. }));

        let road = RoadSegment::new(Vec2::ZERO, Vec2::new(0.0, 10.0), 0.0);
        assert!(Layout::new(vec![], vec![road], bounds()).is_err());
    }

    #[test]
    fn test_road_heading_is_measured_from_z() {
        let road = RoadSegment::new(Vec2::ZERO, Vec2::new(0.0, 10.0), 4.0);
        assert!(road.heading().abs() < 1e-6);
        let road = RoadSegment::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0);
        assert!((road.heading() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_layout_deserializes_and_validates() {
        let json = r#"{
            "buildings": [{
                "id": "gate",
                "name": "Main Gate",
                "center": [0.0, -40.0],
                "size": [12.0, 2.0],
                "height": 8.0,
                "type": "gate"
            }],
            "roads": [{ "start": [0.0, -50.0], "end": [0.0, 50.0], "width": 8.0 }],
            "bounds": { "min": [-50.0, -50.0], "max": [50.0, 50.0] }
        }"#;
        let layout: Layout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.buildings().len(), 1);
        assert_eq!(layout.buildings()[0].kind, BuildingKind::Gate);
        assert_eq!(layout.buildings()[0].rotation, 0.0);
        assert!(layout.building("gate").is_some());
        assert_eq!(layout.roads().len(), 1);
    }

    #[test]
    fn test_layout_deserialization_rejects_unknown_kind() {
        let json = r#"{
            "buildings": [{
                "id": "x",
                "name": "X",
                "center": [0.0, 0.0],
                "size": [1.0, 1.0],
                "height": 1.0,
                "type": "dome"
            }],
            "bounds": { "min": [-5.0, -5.0], "max": [5.0, 5.0] }
        }"#;
        let err = serde_json::from_str::<Layout>(json).unwrap_err();
        assert!(err.to_string().contains("unknown building type 'dome'"));
    }
}
