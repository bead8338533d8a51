#![forbid(unsafe_code)]

//! Pixel geometry of a grid laid out in a container.
//!
//! [`GridQuery`] resolves every track to a pixel interval once and then
//! answers hit tests and rectangle lookups from cached tables. Track lengths
//! come from declared sizes and component preferred sizes plus insets; free
//! space goes to weighted tracks, or centers the grid when nothing grows.
//! Empty tracks with no declared size get a virtual length so they remain
//! visible and hittable while editing.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use trellis_core::geometry::{Insets, Interval, Rect, Size};

use crate::model::{CellRect, ComponentId, GridModel};
use crate::track::{Axis, Track};

/// Source of component preferred sizes.
pub trait PreferredSizes {
    fn preferred_size(&self, component: ComponentId) -> Option<Size>;
}

impl<S: BuildHasher> PreferredSizes for HashMap<ComponentId, Size, S> {
    fn preferred_size(&self, component: ComponentId) -> Option<Size> {
        self.get(&component).copied()
    }
}

impl PreferredSizes for BTreeMap<ComponentId, Size> {
    fn preferred_size(&self, component: ComponentId) -> Option<Size> {
        self.get(&component).copied()
    }
}

impl PreferredSizes for [(ComponentId, Size)] {
    fn preferred_size(&self, component: ComponentId) -> Option<Size> {
        self.iter()
            .find(|(id, _)| *id == component)
            .map(|(_, size)| *size)
    }
}

/// Every component reports a zero preferred size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoPreferredSizes;

impl PreferredSizes for NoPreferredSizes {
    fn preferred_size(&self, _component: ComponentId) -> Option<Size> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Length given to empty tracks that declare no size.
    pub virtual_track_size: i32,
    /// Spacing reported for drawing empty-track feedback.
    pub virtual_gap: i32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            virtual_track_size: 25,
            virtual_gap: 5,
        }
    }
}

/// The area a grid is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub container: Rect,
    /// Margins inside the container.
    #[serde(default)]
    pub insets: Insets,
}

impl LayoutMetrics {
    #[must_use]
    pub const fn new(container: Rect) -> Self {
        Self {
            container,
            insets: Insets::ZERO,
        }
    }

    #[must_use]
    pub const fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    fn content(&self, axis: Axis) -> Interval {
        let inner = self.container.inner(self.insets);
        match axis {
            Axis::Column => Interval::new(inner.x, inner.width),
            Axis::Row => Interval::new(inner.y, inner.height),
        }
    }
}

/// Resolved intervals for one axis.
#[derive(Debug, Clone, Default)]
struct AxisLayout {
    /// Full track extents, used for hit testing.
    cells: Vec<Interval>,
    /// Extents with the shared leading / trailing insets removed.
    content: Vec<Interval>,
}

/// Per-track constraints collected from the assignments.
#[derive(Debug, Clone, Copy, Default)]
struct TrackDemand {
    occupied: bool,
    leading: Option<i32>,
    trailing: Option<i32>,
}

/// Cached pixel geometry for one grid model.
#[derive(Debug, Clone)]
pub struct GridQuery {
    columns: AxisLayout,
    rows: AxisLayout,
    cells: FxHashMap<ComponentId, CellRect>,
    occupancy: FxHashMap<(usize, usize), ComponentId>,
    origins: FxHashMap<(usize, usize), ComponentId>,
    config: QueryConfig,
}

impl GridQuery {
    #[must_use]
    pub fn new<P: PreferredSizes + ?Sized>(
        model: &GridModel,
        metrics: &LayoutMetrics,
        sizes: &P,
        config: QueryConfig,
    ) -> Self {
        let columns = solve_axis(model, Axis::Column, metrics.content(Axis::Column), sizes, &config);
        let rows = solve_axis(model, Axis::Row, metrics.content(Axis::Row), sizes, &config);

        let mut cells = FxHashMap::default();
        let mut occupancy = FxHashMap::default();
        let mut origins = FxHashMap::default();
        for assignment in model.assignments() {
            let block = assignment.cells;
            cells.insert(assignment.component, block);
            origins.insert((block.column, block.row), assignment.component);
            for column in block.column..block.right() {
                for row in block.row..block.bottom() {
                    occupancy.insert((column, row), assignment.component);
                }
            }
        }

        #[cfg(feature = "tracing")]
        trellis_core::trace!(
            message = "grid.query.resolved",
            columns = columns.cells.len(),
            rows = rows.cells.len(),
            components = cells.len(),
        );

        Self {
            columns,
            rows,
            cells,
            occupancy,
            origins,
            config,
        }
    }

    fn layout(&self, axis: Axis) -> &AxisLayout {
        match axis {
            Axis::Column => &self.columns,
            Axis::Row => &self.rows,
        }
    }

    /// Gap-adjusted pixel interval of every track on `axis`.
    #[must_use]
    pub fn intervals(&self, axis: Axis) -> &[Interval] {
        &self.layout(axis).content
    }

    #[must_use]
    pub fn column_intervals(&self) -> &[Interval] {
        self.intervals(Axis::Column)
    }

    #[must_use]
    pub fn row_intervals(&self) -> &[Interval] {
        self.intervals(Axis::Row)
    }

    /// Full track extents on `axis`, gaps included.
    #[must_use]
    pub fn track_extents(&self, axis: Axis) -> &[Interval] {
        &self.layout(axis).cells
    }

    #[must_use]
    pub fn cells_of(&self, component: ComponentId) -> Option<CellRect> {
        self.cells.get(&component).copied()
    }

    /// Pixel rectangle covering a cell block, or `None` if the block lies
    /// outside the grid.
    #[must_use]
    pub fn cells_rect(&self, cells: CellRect) -> Option<Rect> {
        let span = |axis: Axis| -> Option<Interval> {
            let content = self.intervals(axis);
            let first = content.get(cells.origin(axis))?;
            let last = content.get(cells.last(axis))?;
            Some(first.union(last))
        };
        if !cells.has_valid_span() {
            return None;
        }
        Some(Rect::from_intervals(span(Axis::Column)?, span(Axis::Row)?))
    }

    /// Pixel rectangle of a component's cells.
    #[must_use]
    pub fn component_rect(&self, component: ComponentId) -> Option<Rect> {
        self.cells_of(component)
            .and_then(|cells| self.cells_rect(cells))
    }

    /// Component covering the cell, if any.
    #[must_use]
    pub fn occupant_at(&self, column: usize, row: usize) -> Option<ComponentId> {
        self.occupancy.get(&(column, row)).copied()
    }

    /// Component whose origin is this cell.
    #[must_use]
    pub fn primary_occupant_at(&self, column: usize, row: usize) -> Option<ComponentId> {
        self.origins.get(&(column, row)).copied()
    }

    /// Track whose extent contains `pixel`.
    #[must_use]
    pub fn track_at(&self, axis: Axis, pixel: i32) -> Option<usize> {
        self.layout(axis)
            .cells
            .iter()
            .position(|interval| interval.contains(pixel))
    }

    /// Cell under a pixel position.
    #[must_use]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        Some((self.track_at(Axis::Column, x)?, self.track_at(Axis::Row, y)?))
    }

    #[must_use]
    pub fn component_at(&self, x: i32, y: i32) -> Option<ComponentId> {
        let (column, row) = self.cell_at(x, y)?;
        self.occupant_at(column, row)
    }

    #[must_use]
    pub const fn virtual_track_size(&self) -> i32 {
        self.config.virtual_track_size
    }

    #[must_use]
    pub const fn virtual_gap(&self) -> i32 {
        self.config.virtual_gap
    }
}

const fn axis_length(size: Size, axis: Axis) -> i32 {
    match axis {
        Axis::Column => size.width,
        Axis::Row => size.height,
    }
}

/// Spread `amount` pixels over the growing tracks by weight. The last
/// growing track absorbs rounding. Returns `false` if nothing grows.
/// Sum of track lengths, pinned at `i32::MAX`.
fn total_length(lengths: &[i32]) -> i32 {
    lengths
        .iter()
        .fold(0i32, |total, length| total.saturating_add(*length))
}

fn distribute(lengths: &mut [i32], tracks: &[Track], amount: i32) -> bool {
    let total: f64 = tracks
        .iter()
        .filter(|track| track.grows())
        .map(|track| track.weight)
        .sum();
    let Some(last) = tracks.iter().rposition(Track::grows) else {
        return false;
    };
    if total <= 0.0 {
        return false;
    }
    let mut given = 0;
    for (index, track) in tracks.iter().enumerate() {
        if !track.grows() {
            continue;
        }
        let share = if index == last {
            amount - given
        } else {
            #[allow(clippy::cast_possible_truncation)]
            let share = (f64::from(amount) * track.weight / total).floor() as i32;
            share
        };
        lengths[index] = lengths[index].saturating_add(share);
        given += share;
    }
    true
}

fn solve_axis<P: PreferredSizes + ?Sized>(
    model: &GridModel,
    axis: Axis,
    available: Interval,
    sizes: &P,
    config: &QueryConfig,
) -> AxisLayout {
    let tracks = model.tracks(axis).tracks();
    let count = tracks.len();
    if count == 0 {
        return AxisLayout::default();
    }

    let mut lengths: Vec<i32> = tracks
        .iter()
        .map(|track| i32::try_from(track.size).unwrap_or(i32::MAX))
        .collect();
    let mut demand = vec![TrackDemand::default(); count];
    let mut spanning = Vec::new();

    for assignment in model.assignments() {
        let first = assignment.cells.origin(axis);
        let last = assignment.cells.last(axis);
        if last >= count {
            continue;
        }
        let leading = assignment.leading_inset(axis).max(0);
        let trailing = assignment.trailing_inset(axis).max(0);
        for slot in &mut demand[first..=last] {
            slot.occupied = true;
        }
        let head = &mut demand[first].leading;
        *head = Some(head.map_or(leading, |value| value.min(leading)));
        let tail = &mut demand[last].trailing;
        *tail = Some(tail.map_or(trailing, |value| value.min(trailing)));

        let preferred = sizes
            .preferred_size(assignment.component)
            .map_or(0, |size| axis_length(size, axis).max(0));
        let required = preferred.saturating_add(leading).saturating_add(trailing);
        if first == last {
            lengths[first] = lengths[first].max(required);
        } else {
            spanning.push((first, last, required));
        }
    }

    // Narrow spans first so wide ones see the tracks already grown.
    spanning.sort_by_key(|(first, last, _)| last - first);
    for (first, last, required) in spanning {
        let current = total_length(&lengths[first..=last]);
        if required > current {
            let deficit = required - current;
            if !distribute(&mut lengths[first..=last], &tracks[first..=last], deficit) {
                lengths[last] = lengths[last].saturating_add(deficit);
            }
        }
    }

    for (length, (track, slot)) in lengths.iter_mut().zip(tracks.iter().zip(&demand)) {
        if !slot.occupied && *length == 0 && !track.has_size {
            *length = config.virtual_track_size;
        }
    }

    let used = total_length(&lengths);
    let mut position = available.begin;
    let leftover = available.length.saturating_sub(used);
    if leftover > 0 && !distribute(&mut lengths, tracks, leftover) {
        position = position.saturating_add(leftover / 2);
    }

    let mut layout = AxisLayout {
        cells: Vec::with_capacity(count),
        content: Vec::with_capacity(count),
    };
    for (length, slot) in lengths.into_iter().zip(demand) {
        let cell = Interval::new(position, length);
        position = position.saturating_add(length);
        layout.cells.push(cell);
        layout.content.push(cell.shrink(
            slot.leading.unwrap_or(0),
            slot.trailing.unwrap_or(0),
        ));
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditConfig, GridOperation};
    use crate::model::CellAssignment;
    use crate::track::TrackSet;

    fn id(raw: u64) -> ComponentId {
        ComponentId::new(raw)
    }

    fn declared(sizes: &[u32], weights: &[f64]) -> TrackSet {
        TrackSet::with_tracks(
            sizes
                .iter()
                .zip(weights)
                .map(|(size, weight)| Track::declared(*size, *weight))
                .collect(),
            false,
        )
    }

    #[test]
    fn leftover_space_goes_to_weighted_tracks() {
        let model = GridModel::from_parts(
            declared(&[50, 50, 50], &[0.0, 1.0, 3.0]),
            declared(&[20], &[0.0]),
            Vec::new(),
        )
        .unwrap();
        let metrics = LayoutMetrics::new(Rect::new(0, 0, 250, 20));
        let query = GridQuery::new(&model, &metrics, &NoPreferredSizes, QueryConfig::default());
        let lengths: Vec<i32> = query.column_intervals().iter().map(|i| i.length).collect();
        assert_eq!(lengths, vec![50, 75, 125]);
    }

    #[test]
    fn grid_is_centered_without_weights() {
        let model = GridModel::from_parts(declared(&[100], &[0.0]), declared(&[10], &[0.0]), Vec::new())
            .unwrap();
        let metrics = LayoutMetrics::new(Rect::new(10, 0, 200, 10));
        let query = GridQuery::new(&model, &metrics, &NoPreferredSizes, QueryConfig::default());
        assert_eq!(query.column_intervals(), &[Interval::new(60, 100)]);
    }

    #[test]
    fn preferred_size_and_insets_widen_tracks() {
        let assignment = CellAssignment::new(id(1), CellRect::cell(0, 0))
            .with_insets(Insets::new(0, 3, 0, 5));
        let model = GridModel::from_parts(
            declared(&[10], &[0.0]),
            declared(&[10], &[0.0]),
            vec![assignment],
        )
        .unwrap();
        let sizes: BTreeMap<ComponentId, Size> = [(id(1), Size::new(40, 8))].into_iter().collect();
        let query = GridQuery::new(
            &model,
            &LayoutMetrics::new(Rect::new(0, 0, 48, 10)),
            &sizes,
            QueryConfig::default(),
        );
        assert_eq!(query.track_extents(Axis::Column), &[Interval::new(0, 48)]);
        assert_eq!(query.column_intervals(), &[Interval::new(3, 40)]);
        assert_eq!(query.component_rect(id(1)), Some(Rect::new(3, 0, 40, 10)));
    }

    #[test]
    fn spanning_deficit_lands_on_last_track() {
        let wide = CellAssignment::new(id(1), CellRect::new(0, 0, 2, 1));
        let model = GridModel::from_parts(
            declared(&[10, 10], &[0.0, 0.0]),
            declared(&[10], &[0.0]),
            vec![wide],
        )
        .unwrap();
        let sizes = [(id(1), Size::new(50, 10))];
        let query = GridQuery::new(
            &model,
            &LayoutMetrics::new(Rect::new(0, 0, 50, 10)),
            &sizes[..],
            QueryConfig::default(),
        );
        let lengths: Vec<i32> = query.column_intervals().iter().map(|i| i.length).collect();
        assert_eq!(lengths, vec![10, 40]);
    }

    #[test]
    fn empty_undeclared_tracks_get_virtual_size() {
        let mut model = GridModel::new();
        model
            .add_assignment(CellAssignment::new(id(1), CellRect::cell(1, 0)))
            .unwrap();
        let query = GridQuery::new(
            &model,
            &LayoutMetrics::new(Rect::new(0, 0, 25, 25)),
            &NoPreferredSizes,
            QueryConfig::default(),
        );
        assert_eq!(query.column_intervals()[0], Interval::new(0, 25));
        assert_eq!(query.column_intervals()[1], Interval::new(25, 0));
        assert_eq!(query.virtual_gap(), 5);
    }

    #[test]
    fn huge_track_sizes_saturate_instead_of_overflowing() {
        let config = EditConfig::default();
        let mut model = GridModel::new();
        model
            .add_assignment(CellAssignment::new(id(1), CellRect::new(0, 0, 2, 1)))
            .unwrap();
        for index in 0..2 {
            model
                .apply_operation(
                    index as u64 + 1,
                    GridOperation::SetTrackSize {
                        axis: Axis::Column,
                        index,
                        size: u32::MAX,
                    },
                    &config,
                )
                .unwrap();
        }
        let sizes = [(id(1), Size::new(i32::MAX, 10))];
        let query = GridQuery::new(
            &model,
            &LayoutMetrics::new(Rect::new(0, 0, 100, 10)),
            &sizes[..],
            QueryConfig::default(),
        );
        assert_eq!(
            query.column_intervals(),
            &[Interval::new(0, i32::MAX), Interval::new(i32::MAX, i32::MAX)]
        );
        assert_eq!(
            query.component_rect(id(1)),
            Some(Rect::new(0, 0, i32::MAX, 10))
        );
        assert_eq!(query.track_at(Axis::Column, i32::MAX - 1), Some(0));
    }

    #[test]
    fn hit_testing_uses_full_extents() {
        let assignment = CellAssignment::new(id(7), CellRect::new(0, 0, 2, 1))
            .with_insets(Insets::new(0, 0, 0, 5));
        let model = GridModel::from_parts(
            declared(&[30, 30], &[0.0, 0.0]),
            declared(&[20], &[0.0]),
            vec![assignment],
        )
        .unwrap();
        let query = GridQuery::new(
            &model,
            &LayoutMetrics::new(Rect::new(0, 0, 60, 20)),
            &NoPreferredSizes,
            QueryConfig::default(),
        );
        assert_eq!(query.track_at(Axis::Column, 59), Some(1));
        assert_eq!(query.track_at(Axis::Column, 60), None);
        assert_eq!(query.component_at(45, 10), Some(id(7)));
        assert_eq!(query.primary_occupant_at(1, 0), None);
        assert_eq!(query.occupant_at(1, 0), Some(id(7)));
        assert_eq!(query.component_rect(id(7)), Some(Rect::new(0, 0, 55, 20)));
    }
}
