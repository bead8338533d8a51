#![forbid(unsafe_code)]

//! Cell alignment and its encoding as anchor / fill flags.
//!
//! Hosts persist alignment the way constraint-based grid containers do: an
//! [`Anchor`] (compass point or baseline variant) plus a [`FillMode`].
//! [`CellAlignment::from_flags`] and [`CellAlignment::to_flags`] translate
//! through one fixed table; combinations outside it decode to the
//! `Unknown` variants and `Unknown` never encodes.

use serde::{Deserialize, Serialize};

/// Horizontal placement of a component within its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    /// The flag combination has no horizontal meaning.
    Unknown,
    Leading,
    #[default]
    Center,
    Trailing,
    Fill,
}

/// Vertical placement of a component within its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlignment {
    /// The flag combination has no vertical meaning.
    Unknown,
    Top,
    #[default]
    Center,
    Bottom,
    Fill,
    Baseline,
    BaselineAbove,
    BaselineBelow,
}

impl HorizontalAlignment {
    #[must_use]
    pub const fn is_fill(self) -> bool {
        matches!(self, Self::Fill)
    }
}

impl VerticalAlignment {
    #[must_use]
    pub const fn is_fill(self) -> bool {
        matches!(self, Self::Fill)
    }
}

/// Where a component sits inside its cell when it does not fill it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Center,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Baseline,
    BaselineLeading,
    BaselineTrailing,
    AboveBaseline,
    AboveBaselineLeading,
    AboveBaselineTrailing,
    BelowBaseline,
    BelowBaselineLeading,
    BelowBaselineTrailing,
}

/// Which axes a component is stretched along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    None,
    Horizontal,
    Vertical,
    Both,
}

/// Horizontal and vertical alignment of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellAlignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
}

use HorizontalAlignment as H;
use VerticalAlignment as V;

const FLAG_TABLE: [(H, V, Anchor, FillMode); 28] = [
    (H::Leading, V::Top, Anchor::NorthWest, FillMode::None),
    (H::Leading, V::Center, Anchor::West, FillMode::None),
    (H::Leading, V::Bottom, Anchor::SouthWest, FillMode::None),
    (H::Leading, V::Fill, Anchor::West, FillMode::Vertical),
    (H::Leading, V::Baseline, Anchor::BaselineLeading, FillMode::None),
    (H::Leading, V::BaselineAbove, Anchor::AboveBaselineLeading, FillMode::None),
    (H::Leading, V::BaselineBelow, Anchor::BelowBaselineLeading, FillMode::None),
    (H::Center, V::Top, Anchor::North, FillMode::None),
    (H::Center, V::Center, Anchor::Center, FillMode::None),
    (H::Center, V::Bottom, Anchor::South, FillMode::None),
    (H::Center, V::Fill, Anchor::Center, FillMode::Vertical),
    (H::Center, V::Baseline, Anchor::Baseline, FillMode::None),
    (H::Center, V::BaselineAbove, Anchor::AboveBaseline, FillMode::None),
    (H::Center, V::BaselineBelow, Anchor::BelowBaseline, FillMode::None),
    (H::Trailing, V::Top, Anchor::NorthEast, FillMode::None),
    (H::Trailing, V::Center, Anchor::East, FillMode::None),
    (H::Trailing, V::Bottom, Anchor::SouthEast, FillMode::None),
    (H::Trailing, V::Fill, Anchor::East, FillMode::Vertical),
    (H::Trailing, V::Baseline, Anchor::BaselineTrailing, FillMode::None),
    (H::Trailing, V::BaselineAbove, Anchor::AboveBaselineTrailing, FillMode::None),
    (H::Trailing, V::BaselineBelow, Anchor::BelowBaselineTrailing, FillMode::None),
    (H::Fill, V::Top, Anchor::North, FillMode::Horizontal),
    (H::Fill, V::Center, Anchor::Center, FillMode::Horizontal),
    (H::Fill, V::Bottom, Anchor::South, FillMode::Horizontal),
    (H::Fill, V::Fill, Anchor::Center, FillMode::Both),
    (H::Fill, V::Baseline, Anchor::Baseline, FillMode::Horizontal),
    (H::Fill, V::BaselineAbove, Anchor::AboveBaseline, FillMode::Horizontal),
    (H::Fill, V::BaselineBelow, Anchor::BelowBaseline, FillMode::Horizontal),
];

impl CellAlignment {
    /// Stretch along both axes.
    pub const FILL: Self = Self::new(H::Fill, V::Fill);

    /// Both halves undefined.
    pub const UNKNOWN: Self = Self::new(H::Unknown, V::Unknown);

    #[must_use]
    pub const fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Decode persisted flags. Unmapped combinations yield [`CellAlignment::UNKNOWN`].
    #[must_use]
    pub fn from_flags(anchor: Anchor, fill: FillMode) -> Self {
        FLAG_TABLE
            .iter()
            .find(|(_, _, a, f)| *a == anchor && *f == fill)
            .map_or(Self::UNKNOWN, |(h, v, _, _)| Self::new(*h, *v))
    }

    /// Encode to flags; `None` when either half is `Unknown`.
    #[must_use]
    pub fn to_flags(self) -> Option<(Anchor, FillMode)> {
        FLAG_TABLE
            .iter()
            .find(|(h, v, _, _)| *h == self.horizontal && *v == self.vertical)
            .map(|(_, _, anchor, fill)| (*anchor, *fill))
    }

    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self.horizontal, H::Unknown) && !matches!(self.vertical, V::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_centered() {
        assert_eq!(
            CellAlignment::default().to_flags(),
            Some((Anchor::Center, FillMode::None))
        );
    }

    #[test]
    fn every_known_pair_encodes_and_decodes() {
        for (h, v, anchor, fill) in FLAG_TABLE {
            let alignment = CellAlignment::new(h, v);
            assert_eq!(alignment.to_flags(), Some((anchor, fill)));
            assert_eq!(CellAlignment::from_flags(anchor, fill), alignment);
        }
    }

    #[test]
    fn unmapped_flags_are_unknown() {
        let decoded = CellAlignment::from_flags(Anchor::North, FillMode::Vertical);
        assert_eq!(decoded, CellAlignment::UNKNOWN);
        assert!(!decoded.is_known());
        assert_eq!(decoded.to_flags(), None);
        assert_eq!(
            CellAlignment::new(H::Unknown, V::Top).to_flags(),
            None,
            "a half-unknown alignment never encodes"
        );
    }

    #[test]
    fn fill_and_leading_vertical_fill() {
        assert_eq!(
            CellAlignment::from_flags(Anchor::Center, FillMode::Both),
            CellAlignment::FILL
        );
        assert_eq!(
            CellAlignment::from_flags(Anchor::West, FillMode::Vertical),
            CellAlignment::new(H::Leading, V::Fill)
        );
    }
}
