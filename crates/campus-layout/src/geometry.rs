//! Building geometry synthesis.
//!
//! Each building kind maps to a union of axis-aligned blocks in the
//! building's local frame: origin at the footprint center on the ground,
//! +x across the width, +y up, +z along the depth. The descriptor rotation
//! is carried on the [`Solid`] and applied by the renderer.

use glam::{Quat, Vec2, Vec3};

use crate::{
    descriptor::{BuildingDescriptor, BuildingKind},
    error::{LayoutError, LayoutResult},
};

/// Wall thickness for courtyard buildings.
pub const WALL_THICKNESS: f32 = 1.0;

/// Thickness of flat pads and tower-cluster bases.
pub const PAD_THICKNESS: f32 = 0.05;

/// Fraction of a hostel's width taken by each wing.
const HOSTEL_WING_FRACTION: f32 = 0.3;

/// Fraction of a hostel's depth taken by the connecting spine.
const HOSTEL_SPINE_FRACTION: f32 = 0.35;

/// Fraction of a gate's width taken by each pillar.
const GATE_PILLAR_FRACTION: f32 = 0.2;

/// Height of the gate opening as a fraction of the gate height.
const GATE_OPENING_FRACTION: f32 = 0.75;

/// Tower positions as fractions of the cluster footprint.
const TOWER_OFFSETS: [Vec2; 4] = [
    Vec2::new(-0.25, -0.25),
    Vec2::new(0.25, -0.25),
    Vec2::new(-0.25, 0.25),
    Vec2::new(0.25, 0.25),
];

/// Tower side length as a fraction of the smaller footprint dimension.
const TOWER_WIDTH_FRACTION: f32 = 0.12;

/// What part of a building a block represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockRole {
    Body,
    Wall,
    Wing,
    Spine,
    Pillar,
    Lintel,
    Pad,
    Tower,
}

/// Axis-aligned box in a building's local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Block {
    pub min: Vec3,
    pub max: Vec3,
    pub role: BlockRole,
}

impl Block {
    pub fn new(min: Vec3, max: Vec3, role: BlockRole) -> Self {
        debug_assert!(min.cmplt(max).all(), "empty block {min} .. {max}");
        Self { min, max, role }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Distance along `dir` to the first intersection, if any.
    ///
    /// A ray starting inside the block hits at distance zero.
    pub fn ray_hit(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let mut near = 0.0_f32;
        let mut far = f32::INFINITY;

        for axis in 0..3 {
            let (o, d) = (origin[axis], dir[axis]);
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let t0 = (lo - o) / d;
            let t1 = (hi - o) / d;
            near = near.max(t0.min(t1));
            far = far.min(t0.max(t1));
            if near > far {
                return None;
            }
        }

        Some(near)
    }
}

/// Renderable geometry for one building.
#[derive(Clone, Debug, PartialEq)]
pub struct Solid {
    pub building_id: String,
    pub kind: BuildingKind,
    /// Footprint center on the ground.
    pub origin: Vec3,
    /// Rotation about the vertical axis in radians.
    pub yaw: f32,
    /// Linear RGB.
    pub color: [f32; 3],
    /// Whether the solid should block movement. Decorative towers do not.
    pub collidable: bool,
    pub blocks: Vec<Block>,
}

impl Solid {
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Transform a world-space point into the local frame.
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        self.rotation().inverse() * (point - self.origin)
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let local = self.to_local(point);
        self.blocks.iter().any(|block| block.contains(local))
    }

    /// Nearest hit distance of a world-space ray against any block.
    pub fn ray_hit(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let inverse = self.rotation().inverse();
        let local_origin = inverse * (origin - self.origin);
        let local_dir = inverse * dir;
        self.blocks
            .iter()
            .filter_map(|block| block.ray_hit(local_origin, local_dir))
            .min_by(f32::total_cmp)
    }
}

/// Default color per kind, used when the descriptor has no override.
pub fn default_color(kind: BuildingKind) -> [f32; 3] {
    match kind {
        BuildingKind::Plain => [0.80, 0.76, 0.70],
        BuildingKind::Hollow => [0.72, 0.52, 0.42],
        BuildingKind::Hostel => [0.85, 0.80, 0.62],
        BuildingKind::Gate => [0.60, 0.55, 0.50],
        BuildingKind::TowerCluster => [0.75, 0.75, 0.80],
        BuildingKind::FlatPad => [0.35, 0.55, 0.35],
    }
}

/// Build the solid for one building descriptor.
pub fn synthesize(descriptor: &BuildingDescriptor) -> LayoutResult<Solid> {
    descriptor.validate()?;

    let blocks = match descriptor.kind {
        BuildingKind::Plain => plain(descriptor)?,
        BuildingKind::Hollow => hollow(descriptor)?,
        BuildingKind::Hostel => hostel(descriptor)?,
        BuildingKind::Gate => gate(descriptor)?,
        BuildingKind::TowerCluster => tower_cluster(descriptor)?,
        BuildingKind::FlatPad => vec![pad(descriptor.size)],
    };

    tracing::trace!(
        id = %descriptor.id,
        kind = %descriptor.kind,
        blocks = blocks.len(),
        "Synthesized building"
    );

    Ok(Solid {
        building_id: descriptor.id.clone(),
        kind: descriptor.kind,
        origin: Vec3::new(descriptor.center.x, 0.0, descriptor.center.y),
        yaw: descriptor.rotation,
        color: descriptor.color.unwrap_or_else(|| default_color(descriptor.kind)),
        collidable: !matches!(
            descriptor.kind,
            BuildingKind::TowerCluster | BuildingKind::FlatPad
        ),
        blocks,
    })
}

fn require_height(descriptor: &BuildingDescriptor) -> LayoutResult<f32> {
    if descriptor.height > 0.0 {
        Ok(descriptor.height)
    } else {
        Err(LayoutError::InvalidBuilding {
            id: descriptor.id.clone(),
            detail: format!("{} buildings need a positive height", descriptor.kind),
        })
    }
}

/// Block spanning `x0..x1` by `z0..z1`, from the ground to `height`.
fn column(x0: f32, x1: f32, z0: f32, z1: f32, height: f32, role: BlockRole) -> Block {
    Block::new(Vec3::new(x0, 0.0, z0), Vec3::new(x1, height, z1), role)
}

fn pad(size: Vec2) -> Block {
    let half = size * 0.5;
    column(-half.x, half.x, -half.y, half.y, PAD_THICKNESS, BlockRole::Pad)
}

fn plain(descriptor: &BuildingDescriptor) -> LayoutResult<Vec<Block>> {
    let height = require_height(descriptor)?;
    let half = descriptor.size * 0.5;
    Ok(vec![column(
        -half.x,
        half.x,
        -half.y,
        half.y,
        height,
        BlockRole::Body,
    )])
}

/// Four walls around an open courtyard.
fn hollow(descriptor: &BuildingDescriptor) -> LayoutResult<Vec<Block>> {
    let height = require_height(descriptor)?;
    if descriptor.size.min_element() <= 2.0 * WALL_THICKNESS {
        return Err(LayoutError::InvalidBuilding {
            id: descriptor.id.clone(),
            detail: format!(
                "footprint {} x {} leaves no courtyard inside {WALL_THICKNESS} walls",
                descriptor.size.x, descriptor.size.y
            ),
        });
    }

    let half = descriptor.size * 0.5;
    let t = WALL_THICKNESS;
    Ok(vec![
        // Front and back walls span the full width.
        column(-half.x, half.x, -half.y, -half.y + t, height, BlockRole::Wall),
        column(-half.x, half.x, half.y - t, half.y, height, BlockRole::Wall),
        // Side walls fill the gap between them.
        column(-half.x, -half.x + t, -half.y + t, half.y - t, height, BlockRole::Wall),
        column(half.x - t, half.x, -half.y + t, half.y - t, height, BlockRole::Wall),
    ])
}

/// Spine along the back edge with two wings reaching to the front edge.
fn hostel(descriptor: &BuildingDescriptor) -> LayoutResult<Vec<Block>> {
    let height = require_height(descriptor)?;
    let half = descriptor.size * 0.5;
    let wing = descriptor.size.x * HOSTEL_WING_FRACTION;
    let spine_front = -half.y + descriptor.size.y * HOSTEL_SPINE_FRACTION;

    Ok(vec![
        column(-half.x, half.x, -half.y, spine_front, height, BlockRole::Spine),
        column(-half.x, -half.x + wing, spine_front, half.y, height, BlockRole::Wing),
        column(half.x - wing, half.x, spine_front, half.y, height, BlockRole::Wing),
    ])
}

/// Two pillars and a lintel. The frame profile lies in the width/height
/// plane and is extruded through the depth, so the opening runs along z.
fn gate(descriptor: &BuildingDescriptor) -> LayoutResult<Vec<Block>> {
    let height = require_height(descriptor)?;
    let half = descriptor.size * 0.5;
    let pillar = descriptor.size.x * GATE_PILLAR_FRACTION;
    let opening_top = height * GATE_OPENING_FRACTION;
    let inner = half.x - pillar;

    Ok(vec![
        column(-half.x, -inner, -half.y, half.y, height, BlockRole::Pillar),
        column(inner, half.x, -half.y, half.y, height, BlockRole::Pillar),
        Block::new(
            Vec3::new(-inner, opening_top, -half.y),
            Vec3::new(inner, height, half.y),
            BlockRole::Lintel,
        ),
    ])
}

/// Flat base with slender towers at fixed relative offsets.
fn tower_cluster(descriptor: &BuildingDescriptor) -> LayoutResult<Vec<Block>> {
    let height = require_height(descriptor)?;
    let half_width = descriptor.size.min_element() * TOWER_WIDTH_FRACTION * 0.5;

    let mut blocks = vec![pad(descriptor.size)];
    blocks.extend(TOWER_OFFSETS.iter().map(|offset| {
        let center = *offset * descriptor.size;
        column(
            center.x - half_width,
            center.x + half_width,
            center.y - half_width,
            center.y + half_width,
            height,
            BlockRole::Tower,
        )
    }));
    Ok(blocks)
}
