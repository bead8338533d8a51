#![forbid(unsafe_code)]

//! Component type hints.

use serde::{Deserialize, Serialize};

/// Growth and labeling conventions for a component, as classified by the
/// host toolkit.
///
/// Hints drive automatic alignment: growing components get weight on their
/// origin track and `Fill` alignment, labels are pushed toward the
/// component they describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeHint {
    pub grow_horizontal: bool,
    pub grow_vertical: bool,
    pub label: bool,
}

impl TypeHint {
    /// No conventions.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            grow_horizontal: false,
            grow_vertical: false,
            label: false,
        }
    }

    /// A caption describing its neighbour.
    #[must_use]
    pub const fn label() -> Self {
        Self {
            label: true,
            ..Self::plain()
        }
    }

    /// A single-line input that stretches horizontally.
    #[must_use]
    pub const fn text_input() -> Self {
        Self {
            grow_horizontal: true,
            ..Self::plain()
        }
    }

    /// A scrolling area or table that stretches both ways.
    #[must_use]
    pub const fn area() -> Self {
        Self {
            grow_horizontal: true,
            grow_vertical: true,
            label: false,
        }
    }

    #[must_use]
    pub const fn grows(self) -> bool {
        self.grow_horizontal || self.grow_vertical
    }
}
