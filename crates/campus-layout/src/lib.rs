//! Campus scene layout.
//!
//! Turns static building and road descriptors into renderable content:
//! building solids via geometry synthesis, and decorative trees scattered
//! around buildings and roads by a seeded grid scan.
//!
//! Everything here runs once per layout version and produces immutable
//! output. No Bevy dependency, so it can be tested and reused headless.

pub mod bounds;
pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod obstacles;
pub mod placement;
pub mod scene;

pub use bounds::{Rect, WorldBounds};
pub use descriptor::{BuildingDescriptor, BuildingKind, Layout, RoadSegment};
pub use error::{LayoutError, LayoutResult};
pub use geometry::{Block, BlockRole, Solid, synthesize};
pub use obstacles::ObstacleIndex;
pub use placement::{ExclusionPocket, PlacementParams, TreePlacement, scatter_trees};
pub use scene::CampusScene;
