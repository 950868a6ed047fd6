//! Error types for layout validation and scene generation.

use std::fmt;

/// Errors raised while validating descriptors or generating scene content.
///
/// All of these are construction-time failures: a scene is either generated
/// in full or not at all.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A building descriptor has an unusable footprint or height.
    InvalidBuilding {
        /// Identifier of the offending building.
        id: String,
        /// Description of what was invalid.
        detail: String,
    },
    /// A building type tag is not one of the known kinds.
    UnknownBuildingKind {
        /// The tag as supplied.
        tag: String,
    },
    /// Two buildings share an identifier.
    DuplicateBuildingId {
        /// The repeated identifier.
        id: String,
    },
    /// A road segment has zero length or a non-positive width.
    DegenerateRoad {
        /// Position of the segment in the road list.
        index: usize,
        /// Description of what was invalid.
        detail: String,
    },
    /// World bounds are empty, inverted, or not finite.
    InvalidBounds {
        /// Description of what was invalid.
        detail: String,
    },
    /// Placement parameters are out of range.
    InvalidPlacement {
        /// Name of the offending parameter.
        field: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBuilding { id, detail } => {
                write!(f, "invalid building '{id}': {detail}")
            }
            Self::UnknownBuildingKind { tag } => {
                write!(f, "unknown building type '{tag}'")
            }
            Self::DuplicateBuildingId { id } => {
                write!(f, "duplicate building id '{id}'")
            }
            Self::DegenerateRoad { index, detail } => {
                write!(f, "degenerate road segment #{index}: {detail}")
            }
            Self::InvalidBounds { detail } => write!(f, "invalid world bounds: {detail}"),
            Self::InvalidPlacement { field, detail } => {
                write!(f, "invalid placement parameter {field}: {detail}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
