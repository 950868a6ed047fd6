//! Procedural tree placement.
//!
//! Scans a regular grid over the world bounds and plants one tree per
//! surviving grid point. The grid shape is fixed by the bounds and pitch;
//! only jitter, scale and yaw are random, drawn from a seeded RNG so the
//! output is reproducible.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    bounds::{Rect, WorldBounds},
    error::{LayoutError, LayoutResult},
    obstacles::ObstacleIndex,
};

/// A named dead zone reserved for a landmark prop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExclusionPocket {
    pub name: &'static str,
    pub area: Rect,
}

impl ExclusionPocket {
    pub const fn new(name: &'static str, min: Vec2, max: Vec2) -> Self {
        Self {
            name,
            area: Rect::new(min, max),
        }
    }
}

/// Parameters for the placement scan.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementParams {
    /// Grid pitch in world units.
    pub step: f32,
    /// Clearance kept around building footprints.
    pub building_buffer: f32,
    /// Clearance kept around road boxes.
    pub road_buffer: f32,
    /// Maximum offset applied to each grid point on both axes.
    pub jitter: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Height of the ground plane trees are planted on.
    pub ground_height: f32,
    pub seed: u64,
    /// Hard-coded landmark pockets that never receive trees.
    pub pockets: Vec<ExclusionPocket>,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            step: 6.0,
            building_buffer: 4.0,
            road_buffer: 3.0,
            jitter: 1.5,
            min_scale: 0.8,
            max_scale: 1.4,
            ground_height: 0.0,
            seed: 0x5eed,
            pockets: Vec::new(),
        }
    }
}

impl PlacementParams {
    pub fn validate(&self) -> LayoutResult<()> {
        fn check(field: &'static str, ok: bool, detail: impl FnOnce() -> String) -> LayoutResult<()> {
            if ok {
                Ok(())
            } else {
                Err(LayoutError::InvalidPlacement {
                    field,
                    detail: detail(),
                })
            }
        }

        check("step", self.step.is_finite() && self.step > 0.0, || {
            format!("{} must be positive", self.step)
        })?;
        check(
            "building_buffer",
            self.building_buffer.is_finite() && self.building_buffer >= 0.0,
            || format!("{} must be non-negative", self.building_buffer),
        )?;
        check(
            "road_buffer",
            self.road_buffer.is_finite() && self.road_buffer >= 0.0,
            || format!("{} must be non-negative", self.road_buffer),
        )?;
        check("jitter", self.jitter.is_finite() && self.jitter >= 0.0, || {
            format!("{} must be non-negative", self.jitter)
        })?;
        check(
            "min_scale",
            self.min_scale.is_finite() && self.min_scale > 0.0,
            || format!("{} must be positive", self.min_scale),
        )?;
        check(
            "max_scale",
            self.max_scale.is_finite() && self.max_scale >= self.min_scale,
            || format!("{} must be at least min_scale {}", self.max_scale, self.min_scale),
        )?;
        check("ground_height", self.ground_height.is_finite(), || {
            format!("{} must be finite", self.ground_height)
        })
    }

    fn in_pocket(&self, point: Vec2) -> bool {
        self.pockets.iter().any(|pocket| pocket.area.contains(point))
    }
}

/// One decorative tree instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreePlacement {
    /// Grid point the tree was planted from, before jitter.
    pub anchor: Vec2,
    /// Final position, on the ground plane.
    pub position: Vec3,
    pub scale: f32,
    /// Rotation about the vertical axis in radians.
    pub yaw: f32,
}

/// Why grid points were skipped, for logging.
#[derive(Debug, Default)]
struct RejectTally {
    outside: usize,
    building: usize,
    road: usize,
    pocket: usize,
}

/// Upper limit on grid points scanned in one call.
pub const MAX_GRID_POINTS: usize = 4_000_000;

/// Number of grid lines from `min` to `max` inclusive at the given pitch.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn grid_lines(min: f32, max: f32, step: f32) -> LayoutResult<usize> {
    let lines = ((f64::from(max) - f64::from(min)) / f64::from(step)).floor() + 1.0;
    if !lines.is_finite() || lines > MAX_GRID_POINTS as f64 {
        return Err(LayoutError::InvalidPlacement {
            field: "step",
            detail: format!("{step} over a span of {min} .. {max} yields too many grid lines"),
        });
    }
    Ok(lines as usize)
}

/// Grid dimensions for the scan, rejecting grids above [`MAX_GRID_POINTS`].
fn grid_shape(bounds: &WorldBounds, step: f32) -> LayoutResult<(usize, usize)> {
    let columns = grid_lines(bounds.min.x, bounds.max.x, step)?;
    let rows = grid_lines(bounds.min.y, bounds.max.y, step)?;
    match columns.checked_mul(rows) {
        Some(points) if points <= MAX_GRID_POINTS => Ok((columns, rows)),
        _ => Err(LayoutError::InvalidPlacement {
            field: "step",
            detail: format!(
                "{columns} x {rows} grid exceeds {MAX_GRID_POINTS} points at pitch {step}"
            ),
        }),
    }
}

/// Plant trees on every grid point that is clear of obstacles and pockets.
///
/// Returns an empty list (not an error) when nothing survives the buffers.
/// Jittered positions are clamped back into the bounds.
#[allow(clippy::cast_precision_loss)]
pub fn scatter_trees(
    bounds: &WorldBounds,
    obstacles: &ObstacleIndex,
    params: &PlacementParams,
) -> LayoutResult<Vec<TreePlacement>> {
    bounds.validate()?;
    params.validate()?;

    let (columns, rows) = grid_shape(bounds, params.step)?;
    let mut rng = StdRng::seed_from_u64(params.seed);

    let mut trees = Vec::new();
    let mut rejected = RejectTally::default();

    for column in 0..columns {
        for row in 0..rows {
            let anchor = bounds.min + Vec2::new(column as f32, row as f32) * params.step;

            if !bounds.contains(anchor) {
                rejected.outside += 1;
                continue;
            }
            if obstacles.building_exclusion(anchor, params.building_buffer) {
                rejected.building += 1;
                continue;
            }
            if obstacles.road_exclusion(anchor, params.road_buffer) {
                rejected.road += 1;
                continue;
            }
            if params.in_pocket(anchor) {
                rejected.pocket += 1;
                continue;
            }

            let offset = if params.jitter > 0.0 {
                Vec2::new(
                    rng.random_range(-params.jitter..=params.jitter),
                    rng.random_range(-params.jitter..=params.jitter),
                )
            } else {
                Vec2::ZERO
            };
            let ground = bounds.clamp(anchor + offset);
            let scale = rng.random_range(params.min_scale..=params.max_scale);
            let yaw = rng.random_range(0.0..TAU);

            trees.push(TreePlacement {
                anchor,
                position: Vec3::new(ground.x, params.ground_height, ground.y),
                scale,
                yaw,
            });
        }
    }

    tracing::debug!(
        grid = columns * rows,
        planted = trees.len(),
        outside = rejected.outside,
        building = rejected.building,
        road = rejected.road,
        pocket = rejected.pocket,
        "Scattered trees"
    );

    Ok(trees)
}
