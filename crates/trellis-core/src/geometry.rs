#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All integer types use pixel coordinates with the origin at the top-left
//! of the container. Coordinates may be negative; sizes never are once a
//! value has been validated.

use serde::{Deserialize, Serialize};

/// An integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if `other` lies entirely inside this rectangle.
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check whether the two rectangles share any pixel.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection_opt(other).is_some()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Create a new rectangle that is the union of this rectangle and another.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect {
            x,
            y,
            width: right.saturating_sub(x),
            height: bottom.saturating_sub(y),
        }
    }

    /// Create a new rectangle inside the current one with the given insets.
    ///
    /// Width and height are clamped at zero.
    pub fn inner(&self, insets: Insets) -> Rect {
        Rect {
            x: self.x.saturating_add(insets.left),
            y: self.y.saturating_add(insets.top),
            width: self
                .width
                .saturating_sub(insets.horizontal_sum())
                .max(0),
            height: self.height.saturating_sub(insets.vertical_sum()).max(0),
        }
    }

    /// Build a rectangle from a horizontal and a vertical interval.
    #[inline]
    pub const fn from_intervals(columns: Interval, rows: Interval) -> Self {
        Self::new(columns.begin, rows.begin, columns.length, rows.length)
    }
}

/// A floating-point rectangle as reported by a host toolkit.
///
/// Values are untrusted: use [`RectF::to_rect`] to validate and round them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Why a [`RectF`] could not be converted into a pixel [`Rect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectDefect {
    /// A coordinate or dimension is NaN or infinite.
    NonFinite,
    /// Width or height is negative.
    NegativeSize,
    /// Width or height rounds to zero pixels.
    Degenerate,
}

impl std::fmt::Display for RectDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite => write!(f, "non-finite coordinates"),
            Self::NegativeSize => write!(f, "negative size"),
            Self::Degenerate => write!(f, "zero-area rectangle"),
        }
    }
}

impl std::error::Error for RectDefect {}

impl RectF {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Round to the nearest pixel rectangle.
    ///
    /// Rejects NaN/infinite values, negative sizes and rectangles that round
    /// to zero width or height. Values beyond the `i32` range are treated as
    /// non-finite.
    pub fn to_rect(&self) -> Result<Rect, RectDefect> {
        let values = [self.x, self.y, self.width, self.height];
        if values.iter().any(|value| !value.is_finite()) {
            return Err(RectDefect::NonFinite);
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(RectDefect::NegativeSize);
        }
        let limit = f64::from(i32::MAX);
        if values.iter().any(|value| value.abs() >= limit) {
            return Err(RectDefect::NonFinite);
        }
        let x = self.x.round() as i32;
        let y = self.y.round() as i32;
        let width = self.width.round() as i32;
        let height = self.height.round() as i32;
        if width == 0 || height == 0 {
            return Err(RectDefect::Degenerate);
        }
        Ok(Rect::new(x, y, width, height))
    }
}

impl From<Rect> for RectF {
    fn from(rect: Rect) -> Self {
        Self::new(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.width),
            f64::from(rect.height),
        )
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Per-side spacing around a component inside its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Insets {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Insets {
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create insets with specific values (top, left, bottom, right).
    pub const fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Create insets with equal values.
    pub const fn all(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Sum of left and right.
    #[inline]
    pub const fn horizontal_sum(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// Sum of top and bottom.
    #[inline]
    pub const fn vertical_sum(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }
}

impl From<i32> for Insets {
    fn from(value: i32) -> Self {
        Self::all(value)
    }
}

/// A half-open pixel span `[begin, begin + length)` along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Interval {
    pub begin: i32,
    pub length: i32,
}

impl Interval {
    #[inline]
    pub const fn new(begin: i32, length: i32) -> Self {
        Self { begin, length }
    }

    /// End position (exclusive).
    #[inline]
    pub const fn end(&self) -> i32 {
        self.begin.saturating_add(self.length)
    }

    #[inline]
    pub const fn contains(&self, value: i32) -> bool {
        value >= self.begin && value < self.end()
    }

    /// Shrink the interval by `leading` at the start and `trailing` at the end.
    ///
    /// The length never goes below zero.
    pub fn shrink(&self, leading: i32, trailing: i32) -> Interval {
        let length = self
            .length
            .saturating_sub(leading)
            .saturating_sub(trailing)
            .max(0);
        Interval::new(self.begin.saturating_add(leading), length)
    }

    /// The smallest interval covering both.
    pub fn union(&self, other: &Interval) -> Interval {
        let begin = self.begin.min(other.begin);
        let end = self.end().max(other.end());
        Interval::new(begin, end.saturating_sub(begin))
    }
}

#[cfg(test)]
mod tests {
    use super::{Insets, Interval, Rect, RectDefect, RectF};

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2, 3, 4, 5);
        assert!(rect.contains(2, 3));
        assert!(rect.contains(5, 7));
        assert!(!rect.contains(6, 3));
        assert!(!rect.contains(2, 8));
    }

    #[test]
    fn rect_intersection_and_union() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 2, 4, 4);
        assert_eq!(a.intersection_opt(&b), Some(Rect::new(2, 2, 2, 2)));
        assert_eq!(a.union(&b), Rect::new(0, 0, 6, 6));
        assert!(!a.intersects(&Rect::new(4, 0, 2, 2)));
    }

    #[test]
    fn rect_inner_clamps_at_zero() {
        let rect = Rect::new(0, 0, 10, 10);
        assert_eq!(rect.inner(Insets::new(1, 4, 3, 2)), Rect::new(4, 1, 4, 6));
        assert_eq!(rect.inner(Insets::all(8)).width, 0);
    }

    #[test]
    fn rectf_rejects_bad_geometry() {
        assert_eq!(
            RectF::new(f64::NAN, 0.0, 1.0, 1.0).to_rect(),
            Err(RectDefect::NonFinite)
        );
        assert_eq!(
            RectF::new(0.0, 0.0, -3.0, 1.0).to_rect(),
            Err(RectDefect::NegativeSize)
        );
        assert_eq!(
            RectF::new(0.0, 0.0, 0.2, 10.0).to_rect(),
            Err(RectDefect::Degenerate)
        );
        assert_eq!(
            RectF::new(1.4, 2.6, 99.6, 30.0).to_rect(),
            Ok(Rect::new(1, 3, 100, 30))
        );
    }

    #[test]
    fn interval_shrink_never_negative() {
        let interval = Interval::new(10, 20);
        assert_eq!(interval.shrink(2, 5), Interval::new(12, 13));
        assert_eq!(interval.shrink(15, 15).length, 0);
        assert_eq!(interval.end(), 30);
        assert!(interval.contains(29));
        assert!(!interval.contains(30));
    }

    #[test]
    fn rectf_deserializes_from_host_json() {
        let rect: RectF =
            serde_json::from_str(r#"{"x":4.0,"y":10.0,"width":100.0,"height":30.0}"#)
                .expect("host rect");
        assert_eq!(rect.to_rect(), Ok(Rect::new(4, 10, 100, 30)));
    }

    mod property {
        use super::super::{Interval, Rect, RectF};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn shrink_stays_inside(
                begin in -1000i32..1000,
                length in 0i32..500,
                leading in 0i32..600,
                trailing in 0i32..600,
            ) {
                let interval = Interval::new(begin, length);
                let shrunk = interval.shrink(leading, trailing);
                prop_assert!(shrunk.length >= 0);
                prop_assert!(shrunk.length <= interval.length);
                prop_assert!(shrunk.begin >= interval.begin);
            }

            #[test]
            fn union_covers_both(
                a in (-500i32..500, 0i32..200),
                b in (-500i32..500, 0i32..200),
            ) {
                let (a, b) = (Interval::new(a.0, a.1), Interval::new(b.0, b.1));
                let union = a.union(&b);
                prop_assert!(union.begin <= a.begin && union.begin <= b.begin);
                prop_assert!(union.end() >= a.end() && union.end() >= b.end());
            }

            #[test]
            fn integral_rects_survive_conversion(
                x in -10_000i32..10_000,
                y in -10_000i32..10_000,
                width in 1i32..5_000,
                height in 1i32..5_000,
            ) {
                let rect = Rect::new(x, y, width, height);
                prop_assert_eq!(RectF::from(rect).to_rect(), Ok(rect));
            }
        }
    }
}
