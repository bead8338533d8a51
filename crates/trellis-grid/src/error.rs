#![forbid(unsafe_code)]

//! Error taxonomy for grid edits.

use std::fmt;

use crate::model::ComponentId;
use crate::track::Axis;

/// Structured reasons a grid mutation was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Two assignments would cover the same cell.
    Overlap {
        component: ComponentId,
        other: ComponentId,
    },
    /// A track index is out of range, or beyond what auto-expansion may reach.
    InvalidIndex {
        axis: Axis,
        index: usize,
        limit: usize,
    },
    /// An assignment spans zero tracks.
    InvalidSpan { component: ComponentId },
    UnknownComponent { component: ComponentId },
    DuplicateComponent { component: ComponentId },
    /// A weight is negative or not finite.
    InvalidWeight {
        axis: Axis,
        index: usize,
        weight: f64,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlap { component, other } => {
                write!(f, "component {component} would overlap component {other}")
            }
            Self::InvalidIndex { axis, index, limit } => {
                write!(f, "{axis} index {index} is out of range (limit {limit})")
            }
            Self::InvalidSpan { component } => {
                write!(f, "component {component} must span at least one track")
            }
            Self::UnknownComponent { component } => {
                write!(f, "component {component} is not in the grid")
            }
            Self::DuplicateComponent { component } => {
                write!(f, "component {component} is already in the grid")
            }
            Self::InvalidWeight {
                axis,
                index,
                weight,
            } => write!(f, "{axis} {index} has invalid weight {weight}"),
        }
    }
}

impl std::error::Error for GridError {}
