#![forbid(unsafe_code)]

//! Grid model: column/row track sets plus component cell assignments.
//!
//! # Invariants
//!
//! Every committed [`GridModel`] satisfies:
//!
//! 1. every assignment spans at least one track on each axis and ends
//!    within [`TRACK_LIMIT`];
//! 2. no two assignments share a cell;
//! 3. each axis has exactly `max(declared length, used extent)` tracks, so
//!    declared-but-empty tracks survive while undeclared trailing tracks
//!    nobody uses are dropped;
//! 4. sizes and weights stay parallel (one [`Track`] per index holds both).
//!
//! Mutations that could break (1) or (2) return [`GridError`]; (3) and (4)
//! are maintained by construction and asserted after each committed edit.

use std::fmt;

use serde::{Deserialize, Serialize};
use trellis_core::geometry::Insets;

use crate::alignment::{CellAlignment, HorizontalAlignment, VerticalAlignment};
use crate::error::GridError;
use crate::hint::TypeHint;
use crate::track::{Axis, Track, TrackDeclaration, TrackSet};

/// Stable identifier for a component placed in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(u64);

impl ComponentId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Most tracks either axis of a [`GridModel`] may cover.
pub const TRACK_LIMIT: usize = 1024;

/// A rectangular block of cells: origin plus span on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    pub column: usize,
    pub row: usize,
    pub column_span: usize,
    pub row_span: usize,
}

impl CellRect {
    #[must_use]
    pub const fn new(column: usize, row: usize, column_span: usize, row_span: usize) -> Self {
        Self {
            column,
            row,
            column_span,
            row_span,
        }
    }

    /// A single cell.
    #[must_use]
    pub const fn cell(column: usize, row: usize) -> Self {
        Self::new(column, row, 1, 1)
    }

    #[must_use]
    pub const fn origin(&self, axis: Axis) -> usize {
        match axis {
            Axis::Column => self.column,
            Axis::Row => self.row,
        }
    }

    #[must_use]
    pub const fn span(&self, axis: Axis) -> usize {
        match axis {
            Axis::Column => self.column_span,
            Axis::Row => self.row_span,
        }
    }

    /// One past the last covered track.
    #[must_use]
    pub const fn end(&self, axis: Axis) -> usize {
        self.origin(axis).saturating_add(self.span(axis))
    }

    /// Reject a block that reaches past track `limit` on either axis.
    pub fn check_within(&self, limit: usize) -> Result<(), GridError> {
        for axis in Axis::ALL {
            let end = self.origin(axis).checked_add(self.span(axis));
            if end.is_none_or(|end| end > limit) {
                return Err(GridError::InvalidIndex {
                    axis,
                    index: self.last(axis),
                    limit,
                });
            }
        }
        Ok(())
    }

    /// Last covered track.
    #[must_use]
    pub const fn last(&self, axis: Axis) -> usize {
        self.end(axis).saturating_sub(1)
    }

    #[must_use]
    pub const fn right(&self) -> usize {
        self.end(Axis::Column)
    }

    #[must_use]
    pub const fn bottom(&self) -> usize {
        self.end(Axis::Row)
    }

    #[must_use]
    pub const fn has_valid_span(&self) -> bool {
        self.column_span >= 1 && self.row_span >= 1
    }

    /// Whether track `index` of `axis` lies inside the span.
    #[must_use]
    pub const fn covers(&self, axis: Axis, index: usize) -> bool {
        index >= self.origin(axis) && index < self.end(axis)
    }

    /// Whether the span passes through `index` without starting there.
    #[must_use]
    pub const fn spans_through(&self, axis: Axis, index: usize) -> bool {
        index > self.origin(axis) && index < self.end(axis)
    }

    #[must_use]
    pub const fn contains(&self, column: usize, row: usize) -> bool {
        self.covers(Axis::Column, column) && self.covers(Axis::Row, row)
    }

    #[must_use]
    pub const fn intersects(&self, other: &CellRect) -> bool {
        self.column < other.right()
            && other.column < self.right()
            && self.row < other.bottom()
            && other.row < self.bottom()
    }

    pub(crate) fn set_origin(&mut self, axis: Axis, origin: usize) {
        match axis {
            Axis::Column => self.column = origin,
            Axis::Row => self.row = origin,
        }
    }

    pub(crate) fn set_span(&mut self, axis: Axis, span: usize) {
        match axis {
            Axis::Column => self.column_span = span,
            Axis::Row => self.row_span = span,
        }
    }
}

/// Placement of one component: its cells, alignment and insets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAssignment {
    pub component: ComponentId,
    pub cells: CellRect,
    #[serde(default)]
    pub alignment: CellAlignment,
    #[serde(default)]
    pub insets: Insets,
    #[serde(default)]
    pub hint: TypeHint,
}

impl CellAssignment {
    /// Centered, no insets, no hint.
    #[must_use]
    pub fn new(component: ComponentId, cells: CellRect) -> Self {
        Self {
            component,
            cells,
            alignment: CellAlignment::default(),
            insets: Insets::ZERO,
            hint: TypeHint::plain(),
        }
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: CellAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    #[must_use]
    pub fn with_hint(mut self, hint: TypeHint) -> Self {
        self.hint = hint;
        self
    }

    /// Left inset for columns, top inset for rows.
    #[must_use]
    pub const fn leading_inset(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Column => self.insets.left,
            Axis::Row => self.insets.top,
        }
    }

    /// Right inset for columns, bottom inset for rows.
    #[must_use]
    pub const fn trailing_inset(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Column => self.insets.right,
            Axis::Row => self.insets.bottom,
        }
    }

    pub(crate) fn set_trailing_inset(&mut self, axis: Axis, value: i32) {
        match axis {
            Axis::Column => self.insets.right = value,
            Axis::Row => self.insets.bottom = value,
        }
    }

    pub(crate) fn set_axis_fill(&mut self, axis: Axis) {
        match axis {
            Axis::Column => self.alignment.horizontal = HorizontalAlignment::Fill,
            Axis::Row => self.alignment.vertical = VerticalAlignment::Fill,
        }
    }
}

/// Serializable view of a grid, as handed to a code generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub column_count: usize,
    pub row_count: usize,
    pub columns: TrackDeclaration,
    pub rows: TrackDeclaration,
    pub assignments: Vec<CellAssignment>,
}

impl GridSnapshot {
    /// Rebuild and validate a model from this snapshot.
    pub fn restore(&self) -> Result<GridModel, GridError> {
        let model = GridModel::from_declaration(&self.columns, &self.rows, self.assignments.clone())?;
        if model.column_count() < self.column_count {
            return Err(GridError::InvalidIndex {
                axis: Axis::Column,
                index: self.column_count - 1,
                limit: model.column_count(),
            });
        }
        if model.row_count() < self.row_count {
            return Err(GridError::InvalidIndex {
                axis: Axis::Row,
                index: self.row_count - 1,
                limit: model.row_count(),
            });
        }
        Ok(model)
    }
}

/// A grid of column and row tracks with disjoint component assignments.
///
/// Assignments are kept in reference order: row-major by origin at the time
/// each component was placed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GridModel {
    columns: TrackSet,
    rows: TrackSet,
    assignments: Vec<CellAssignment>,
}

impl GridModel {
    /// An empty grid with no tracks and no declared arrays.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble and validate a model.
    ///
    /// Axes are grown to cover every assignment and undeclared trailing
    /// tracks are dropped.
    pub fn from_parts(
        columns: TrackSet,
        rows: TrackSet,
        assignments: Vec<CellAssignment>,
    ) -> Result<Self, GridError> {
        let mut model = Self {
            columns,
            rows,
            assignments,
        };
        model.check_assignments()?;
        model.normalize_extent();
        Ok(model)
    }

    /// Build from persisted size / weight arrays.
    pub fn from_declaration(
        columns: &TrackDeclaration,
        rows: &TrackDeclaration,
        assignments: Vec<CellAssignment>,
    ) -> Result<Self, GridError> {
        for assignment in &assignments {
            assignment.cells.check_within(TRACK_LIMIT)?;
        }
        let used_columns = used_extent(&assignments, Axis::Column);
        let used_rows = used_extent(&assignments, Axis::Row);
        Self::from_parts(
            TrackSet::from_declaration(columns, used_columns),
            TrackSet::from_declaration(rows, used_rows),
            assignments,
        )
    }

    #[must_use]
    pub fn columns(&self) -> &TrackSet {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &TrackSet {
        &self.rows
    }

    #[must_use]
    pub fn tracks(&self, axis: Axis) -> &TrackSet {
        match axis {
            Axis::Column => &self.columns,
            Axis::Row => &self.rows,
        }
    }

    #[must_use]
    pub fn track(&self, axis: Axis, index: usize) -> Option<&Track> {
        self.tracks(axis).get(index)
    }

    #[must_use]
    pub fn track_count(&self, axis: Axis) -> usize {
        self.tracks(axis).len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Assignments in reference order.
    #[must_use]
    pub fn assignments(&self) -> &[CellAssignment] {
        &self.assignments
    }

    pub fn components(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.assignments.iter().map(|assignment| assignment.component)
    }

    #[must_use]
    pub fn assignment(&self, component: ComponentId) -> Option<&CellAssignment> {
        self.assignments
            .iter()
            .find(|assignment| assignment.component == component)
    }

    #[must_use]
    pub fn cells_of(&self, component: ComponentId) -> Option<CellRect> {
        self.assignment(component).map(|assignment| assignment.cells)
    }

    #[must_use]
    pub fn contains_component(&self, component: ComponentId) -> bool {
        self.assignment(component).is_some()
    }

    /// One past the highest track index any assignment reaches.
    #[must_use]
    pub fn used_extent(&self, axis: Axis) -> usize {
        used_extent(&self.assignments, axis)
    }

    /// The component covering a cell, if any.
    #[must_use]
    pub fn occupant_at(&self, column: usize, row: usize) -> Option<ComponentId> {
        self.assignments
            .iter()
            .find(|assignment| assignment.cells.contains(column, row))
            .map(|assignment| assignment.component)
    }

    /// The component whose origin is exactly this cell, if any.
    #[must_use]
    pub fn primary_occupant_at(&self, column: usize, row: usize) -> Option<ComponentId> {
        self.assignments
            .iter()
            .find(|assignment| assignment.cells.column == column && assignment.cells.row == row)
            .map(|assignment| assignment.component)
    }

    /// Assignments whose origin on `axis` is `index`.
    pub fn primary_occupants(
        &self,
        axis: Axis,
        index: usize,
    ) -> impl Iterator<Item = &CellAssignment> + '_ {
        self.assignments
            .iter()
            .filter(move |assignment| assignment.cells.origin(axis) == index)
    }

    /// No assignment covers the track.
    #[must_use]
    pub fn is_track_empty(&self, axis: Axis, index: usize) -> bool {
        !self
            .assignments
            .iter()
            .any(|assignment| assignment.cells.covers(axis, index))
    }

    /// Common horizontal alignment of the components starting in `column`.
    #[must_use]
    pub fn column_alignment(&self, column: usize) -> HorizontalAlignment {
        common(
            self.primary_occupants(Axis::Column, column)
                .map(|assignment| assignment.alignment.horizontal),
        )
        .unwrap_or(HorizontalAlignment::Unknown)
    }

    /// Common vertical alignment of the components starting in `row`.
    #[must_use]
    pub fn row_alignment(&self, row: usize) -> VerticalAlignment {
        common(
            self.primary_occupants(Axis::Row, row)
                .map(|assignment| assignment.alignment.vertical),
        )
        .unwrap_or(VerticalAlignment::Unknown)
    }

    /// First free cell after the last component of the last row, or the
    /// start of a new row when that row is full.
    #[must_use]
    pub fn first_empty_cell_at_end(&self) -> (usize, usize) {
        let Some(last_row) = self.row_count().checked_sub(1) else {
            return (0, 0);
        };
        let column = self
            .assignments
            .iter()
            .filter(|assignment| assignment.cells.covers(Axis::Row, last_row))
            .map(|assignment| assignment.cells.right())
            .max()
            .unwrap_or(0);
        if column < self.column_count() {
            (column, last_row)
        } else {
            (0, self.row_count())
        }
    }

    /// Change the cells of an existing component atomically.
    ///
    /// Tracks are added when the new block reaches past the current extent.
    pub fn set_cells(&mut self, component: ComponentId, cells: CellRect) -> Result<(), GridError> {
        if !cells.has_valid_span() {
            return Err(GridError::InvalidSpan { component });
        }
        cells.check_within(TRACK_LIMIT)?;
        let Some(position) = self.position_of(component) else {
            return Err(GridError::UnknownComponent { component });
        };
        if let Some(other) = self.overlapping(&cells, Some(component)) {
            return Err(GridError::Overlap { component, other });
        }
        let mut assignment = self.assignments.remove(position);
        assignment.cells = cells;
        self.place_in_reference_order(assignment);
        self.normalize_extent();
        Ok(())
    }

    /// Add a new assignment.
    pub fn add_assignment(&mut self, assignment: CellAssignment) -> Result<(), GridError> {
        let component = assignment.component;
        if self.contains_component(component) {
            return Err(GridError::DuplicateComponent { component });
        }
        if !assignment.cells.has_valid_span() {
            return Err(GridError::InvalidSpan { component });
        }
        assignment.cells.check_within(TRACK_LIMIT)?;
        if let Some(other) = self.overlapping(&assignment.cells, None) {
            return Err(GridError::Overlap { component, other });
        }
        self.place_in_reference_order(assignment);
        self.normalize_extent();
        Ok(())
    }

    /// Check spans, disjointness and track coverage.
    pub fn validate(&self) -> Result<(), GridError> {
        self.check_assignments()?;
        for assignment in &self.assignments {
            for axis in Axis::ALL {
                let count = self.track_count(axis);
                if assignment.cells.end(axis) > count {
                    return Err(GridError::InvalidIndex {
                        axis,
                        index: assignment.cells.last(axis),
                        limit: count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Deterministic structural hash of the current grid state.
    ///
    /// This is intended for operation logs and replay diagnostics.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix(hash: &mut u64, byte: u8) {
            *hash ^= u64::from(byte);
            *hash = hash.wrapping_mul(PRIME);
        }

        fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
            for byte in bytes {
                mix(hash, *byte);
            }
        }

        fn mix_u32(hash: &mut u64, value: u32) {
            mix_bytes(hash, &value.to_le_bytes());
        }

        fn mix_i32(hash: &mut u64, value: i32) {
            mix_bytes(hash, &value.to_le_bytes());
        }

        fn mix_u64(hash: &mut u64, value: u64) {
            mix_bytes(hash, &value.to_le_bytes());
        }

        fn mix_bool(hash: &mut u64, value: bool) {
            mix(hash, u8::from(value));
        }

        fn mix_tracks(hash: &mut u64, tracks: &TrackSet) {
            mix_bool(hash, tracks.sizes_declared());
            mix_bool(hash, tracks.weights_declared());
            match tracks.filler() {
                Some(filler) => {
                    mix(hash, 1);
                    match filler.size {
                        Some(size) => {
                            mix(hash, 1);
                            mix_u32(hash, size);
                        }
                        None => mix(hash, 0),
                    }
                }
                None => mix(hash, 0),
            }
            mix_u64(hash, tracks.len() as u64);
            for track in tracks.iter() {
                mix_u32(hash, track.size);
                mix_u64(hash, track.weight.to_bits());
                mix_bool(hash, track.has_size);
                mix_bool(hash, track.has_weight);
            }
        }

        let mut hash = OFFSET_BASIS;
        mix_tracks(&mut hash, &self.columns);
        mix_tracks(&mut hash, &self.rows);
        mix_u64(&mut hash, self.assignments.len() as u64);
        for assignment in &self.assignments {
            mix_u64(&mut hash, assignment.component.get());
            let cells = assignment.cells;
            for value in [cells.column, cells.row, cells.column_span, cells.row_span] {
                mix_u64(&mut hash, value as u64);
            }
            mix(&mut hash, assignment.alignment.horizontal as u8);
            mix(&mut hash, assignment.alignment.vertical as u8);
            let insets = assignment.insets;
            for value in [insets.top, insets.left, insets.bottom, insets.right] {
                mix_i32(&mut hash, value);
            }
            mix_bool(&mut hash, assignment.hint.grow_horizontal);
            mix_bool(&mut hash, assignment.hint.grow_vertical);
            mix_bool(&mut hash, assignment.hint.label);
        }

        hash
    }

    /// Serializable snapshot for persistence and code generation.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            column_count: self.column_count(),
            row_count: self.row_count(),
            columns: self.columns.declaration(),
            rows: self.rows.declaration(),
            assignments: self.assignments.clone(),
        }
    }

    pub(crate) fn tracks_mut(&mut self, axis: Axis) -> &mut TrackSet {
        match axis {
            Axis::Column => &mut self.columns,
            Axis::Row => &mut self.rows,
        }
    }

    pub(crate) fn assignments_mut(&mut self) -> &mut Vec<CellAssignment> {
        &mut self.assignments
    }

    pub(crate) fn assignment_mut(&mut self, component: ComponentId) -> Option<&mut CellAssignment> {
        self.assignments
            .iter_mut()
            .find(|assignment| assignment.component == component)
    }

    pub(crate) fn remove_assignment(&mut self, component: ComponentId) -> Option<CellAssignment> {
        self.position_of(component)
            .map(|position| self.assignments.remove(position))
    }

    /// Grow each axis to cover its assignments and drop undeclared trailing tracks.
    pub(crate) fn normalize_extent(&mut self) {
        for axis in Axis::ALL {
            let used = self.used_extent(axis);
            let tracks = self.tracks_mut(axis);
            tracks.ensure_len(used);
            tracks.trim_unused(used);
        }
    }

    /// Panic if a committed edit left the model structurally broken.
    pub(crate) fn assert_structure(&self) {
        for axis in Axis::ALL {
            let used = self.used_extent(axis);
            let tracks = self.tracks(axis);
            assert!(
                tracks.len() == used.max(tracks.declared_len()),
                "{axis} count {} does not match used extent {used} / declared {}",
                tracks.len(),
                tracks.declared_len()
            );
        }
    }

    fn position_of(&self, component: ComponentId) -> Option<usize> {
        self.assignments
            .iter()
            .position(|assignment| assignment.component == component)
    }

    fn overlapping(&self, cells: &CellRect, exclude: Option<ComponentId>) -> Option<ComponentId> {
        self.assignments
            .iter()
            .filter(|assignment| Some(assignment.component) != exclude)
            .find(|assignment| assignment.cells.intersects(cells))
            .map(|assignment| assignment.component)
    }

    fn place_in_reference_order(&mut self, assignment: CellAssignment) {
        let key = (assignment.cells.row, assignment.cells.column);
        let position = self
            .assignments
            .iter()
            .position(|other| (other.cells.row, other.cells.column) > key)
            .unwrap_or(self.assignments.len());
        self.assignments.insert(position, assignment);
    }

    fn check_assignments(&self) -> Result<(), GridError> {
        for (index, assignment) in self.assignments.iter().enumerate() {
            let component = assignment.component;
            if !assignment.cells.has_valid_span() {
                return Err(GridError::InvalidSpan { component });
            }
            assignment.cells.check_within(TRACK_LIMIT)?;
            for other in &self.assignments[index + 1..] {
                if other.component == component {
                    return Err(GridError::DuplicateComponent { component });
                }
                if other.cells.intersects(&assignment.cells) {
                    return Err(GridError::Overlap {
                        component: other.component,
                        other: component,
                    });
                }
            }
        }
        Ok(())
    }
}

fn used_extent(assignments: &[CellAssignment], axis: Axis) -> usize {
    assignments
        .iter()
        .map(|assignment| assignment.cells.end(axis))
        .max()
        .unwrap_or(0)
}

fn common<T: PartialEq>(mut values: impl Iterator<Item = T>) -> Option<T> {
    let first = values.next()?;
    values.all(|value| value == first).then_some(first)
}
