#![forbid(unsafe_code)]

//! Structural edits on a [`GridModel`].
//!
//! These are the raw mutations behind [`GridOperation`](crate::GridOperation).
//! They may leave a model temporarily overlapping; callers go through
//! [`GridModel::apply_operation`], which runs each edit on a clone and only
//! commits it once the result validates.

use crate::alignment::{HorizontalAlignment, VerticalAlignment};
use crate::editor::{EditConfig, SplitWeight};
use crate::error::GridError;
use crate::hint::TypeHint;
use crate::model::{CellAssignment, CellRect, ComponentId, GridModel};
use crate::track::{Axis, Track};

impl GridModel {
    /// Insert an auto track before `index`, padding the axis when `index`
    /// is past the end.
    ///
    /// Assignments at or after `index` shift forward; assignments spanning
    /// across `index` grow by one.
    pub(crate) fn insert_track(
        &mut self,
        axis: Axis,
        index: usize,
        config: &EditConfig,
    ) -> Result<(), GridError> {
        self.check_growth(axis, index, config)?;
        self.insert_track_unchecked(axis, index);
        Ok(())
    }

    /// Remove track `index` together with the components whose origin is
    /// there. Spans crossing it shrink, later origins shift back.
    pub(crate) fn delete_track(&mut self, axis: Axis, index: usize) -> Result<(), GridError> {
        self.check_existing(axis, index)?;
        self.delete_track_unchecked(axis, index);
        Ok(())
    }

    /// Move track `from` to insertion point `to` (`0..=count`, in pre-move
    /// indices). Every assignment is remapped and widened to the contiguous
    /// block covering its remapped tracks.
    pub(crate) fn move_track(&mut self, axis: Axis, from: usize, to: usize) -> Result<(), GridError> {
        let count = self.track_count(axis);
        self.check_existing(axis, from)?;
        if to > count {
            return Err(GridError::InvalidIndex {
                axis,
                index: to,
                limit: count + 1,
            });
        }
        let dest = if to > from { to - 1 } else { to };
        if dest == from {
            return Ok(());
        }

        let remap = |index: usize| -> usize {
            if index == from {
                dest
            } else if from < dest && index > from && index <= dest {
                index - 1
            } else if dest < from && index >= dest && index < from {
                index + 1
            } else {
                index
            }
        };

        self.tracks_mut(axis).move_track(from, dest);
        for assignment in self.assignments_mut() {
            let cells = assignment.cells;
            let (low, high) = (cells.origin(axis)..cells.end(axis))
                .map(remap)
                .fold((usize::MAX, 0), |(low, high), index| {
                    (low.min(index), high.max(index))
                });
            assignment.cells.set_origin(axis, low);
            assignment.cells.set_span(axis, high - low + 1);
        }
        Ok(())
    }

    /// Split track `index` into two adjacent tracks.
    ///
    /// The size is halved with the remainder on the second track; `weight`
    /// picks which half keeps the growth weight. Every assignment covering
    /// the track now covers both halves.
    pub(crate) fn split_track(
        &mut self,
        axis: Axis,
        index: usize,
        weight: SplitWeight,
        config: &EditConfig,
    ) -> Result<(), GridError> {
        self.check_existing(axis, index)?;
        self.check_growth(axis, self.track_count(axis), config)?;

        let tracks = self.tracks_mut(axis);
        let Some(original) = tracks.get(index).copied() else {
            return Err(GridError::InvalidIndex {
                axis,
                index,
                limit: tracks.len(),
            });
        };
        let first_size = original.size / 2;
        let (first_weight, second_weight) = match weight {
            SplitWeight::First => (original.weight, 0.0),
            SplitWeight::Second => (0.0, original.weight),
            SplitWeight::Both => (original.weight, original.weight),
        };
        if let Some(first) = tracks.get_mut(index) {
            first.size = first_size;
            first.weight = first_weight;
        }
        tracks.insert_track(
            index + 1,
            Track {
                size: original.size - first_size,
                weight: second_weight,
                ..original
            },
        );

        for assignment in self.assignments_mut() {
            let cells = assignment.cells;
            if cells.origin(axis) > index {
                assignment.cells.set_origin(axis, cells.origin(axis) + 1);
            } else if cells.covers(axis, index) {
                assignment.cells.set_span(axis, cells.span(axis) + 1);
            }
        }
        Ok(())
    }

    /// Remove the components whose origin is in track `index`.
    pub(crate) fn clear_track(&mut self, axis: Axis, index: usize) -> Result<(), GridError> {
        self.check_existing(axis, index)?;
        self.assignments_mut()
            .retain(|assignment| assignment.cells.origin(axis) != index);
        Ok(())
    }

    /// Delete every track that only exists because some span runs through
    /// it: no component starts there but at least one crosses it.
    pub(crate) fn normalize_spanning(&mut self, axis: Axis) {
        for index in (0..self.track_count(axis)).rev() {
            let has_primary = self
                .assignments()
                .iter()
                .any(|assignment| assignment.cells.origin(axis) == index);
            let spanned = self
                .assignments()
                .iter()
                .any(|assignment| assignment.cells.spans_through(axis, index));
            if !has_primary && spanned {
                self.delete_track_unchecked(axis, index);
            }
        }
    }

    pub(crate) fn set_track_size(
        &mut self,
        axis: Axis,
        index: usize,
        size: u32,
        config: &EditConfig,
    ) -> Result<(), GridError> {
        self.check_growth(axis, index, config)?;
        self.tracks_mut(axis).set_size(index, size);
        Ok(())
    }

    pub(crate) fn set_track_weight(
        &mut self,
        axis: Axis,
        index: usize,
        weight: f64,
        config: &EditConfig,
    ) -> Result<(), GridError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(GridError::InvalidWeight {
                axis,
                index,
                weight,
            });
        }
        self.check_growth(axis, index, config)?;
        self.tracks_mut(axis).set_weight(index, weight);
        Ok(())
    }

    /// Set the horizontal alignment of every component starting in `column`.
    pub(crate) fn set_column_alignment(
        &mut self,
        column: usize,
        alignment: HorizontalAlignment,
    ) -> Result<(), GridError> {
        self.check_existing(Axis::Column, column)?;
        if alignment == HorizontalAlignment::Unknown {
            return Ok(());
        }
        for assignment in self.assignments_mut() {
            if assignment.cells.column == column {
                assignment.alignment.horizontal = alignment;
            }
        }
        Ok(())
    }

    /// Set the vertical alignment of every component starting in `row`.
    pub(crate) fn set_row_alignment(
        &mut self,
        row: usize,
        alignment: VerticalAlignment,
    ) -> Result<(), GridError> {
        self.check_existing(Axis::Row, row)?;
        if alignment == VerticalAlignment::Unknown {
            return Ok(());
        }
        for assignment in self.assignments_mut() {
            if assignment.cells.row == row {
                assignment.alignment.vertical = alignment;
            }
        }
        Ok(())
    }

    /// Give the origin track of `component` weight `1.0`, or clear it.
    pub(crate) fn set_grow(
        &mut self,
        component: ComponentId,
        axis: Axis,
        grow: bool,
    ) -> Result<(), GridError> {
        let Some(cells) = self.cells_of(component) else {
            return Err(GridError::UnknownComponent { component });
        };
        let weight = if grow { 1.0 } else { 0.0 };
        self.tracks_mut(axis).set_weight(cells.origin(axis), weight);
        Ok(())
    }

    /// Place a new component in one cell, optionally inserting a fresh
    /// column and/or row at that position first.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn add_component(
        &mut self,
        component: ComponentId,
        column: usize,
        insert_column: bool,
        row: usize,
        insert_row: bool,
        hint: TypeHint,
        config: &EditConfig,
    ) -> Result<(), GridError> {
        if self.contains_component(component) {
            return Err(GridError::DuplicateComponent { component });
        }
        self.prepare_cell(Axis::Column, column, insert_column, config)?;
        self.prepare_cell(Axis::Row, row, insert_row, config)?;
        self.add_assignment(CellAssignment::new(component, CellRect::cell(column, row)).with_hint(hint))?;
        if config.auto_alignment {
            self.apply_automatic_alignment(component, config);
        }
        Ok(())
    }

    /// Place a new component in the first free cell at the end of the grid.
    pub(crate) fn add_component_last(
        &mut self,
        component: ComponentId,
        hint: TypeHint,
        config: &EditConfig,
    ) -> Result<(), GridError> {
        let (column, row) = self.first_empty_cell_at_end();
        self.add_component(component, column, false, row, false, hint, config)
    }

    /// Move an existing component to a new origin, keeping its spans.
    pub(crate) fn move_component(
        &mut self,
        component: ComponentId,
        column: usize,
        insert_column: bool,
        row: usize,
        insert_row: bool,
        config: &EditConfig,
    ) -> Result<(), GridError> {
        if !self.contains_component(component) {
            return Err(GridError::UnknownComponent { component });
        }
        self.prepare_cell(Axis::Column, column, insert_column, config)?;
        self.prepare_cell(Axis::Row, row, insert_row, config)?;
        let Some(current) = self.cells_of(component) else {
            return Err(GridError::UnknownComponent { component });
        };
        let target = CellRect::new(column, row, current.column_span, current.row_span);
        target.check_within(config.max_track_index)?;
        self.set_cells(component, target)
    }

    pub(crate) fn remove_component(&mut self, component: ComponentId) -> Result<(), GridError> {
        self.remove_assignment(component)
            .map(|_| ())
            .ok_or(GridError::UnknownComponent { component })
    }

    /// Keep gaps between neighbouring components as trailing insets.
    ///
    /// A component that does not end on the last track gets at least the
    /// configured gap on its trailing side; one that does end there loses
    /// an inset equal to the gap.
    pub(crate) fn ensure_gap_insets(&mut self, config: &EditConfig) {
        if !config.change_insets_for_gaps {
            return;
        }
        for axis in Axis::ALL {
            let count = self.track_count(axis);
            let gap = config.gap(axis);
            for assignment in self.assignments_mut() {
                let trailing = assignment.trailing_inset(axis);
                if assignment.cells.end(axis) < count {
                    if trailing < gap {
                        assignment.set_trailing_inset(axis, gap);
                    }
                } else if trailing == gap {
                    assignment.set_trailing_inset(axis, 0);
                }
            }
        }
    }

    fn apply_automatic_alignment(&mut self, component: ComponentId, config: &EditConfig) {
        let Some(assignment) = self.assignment(component).copied() else {
            return;
        };
        let cells = assignment.cells;

        if config.grab_enabled {
            for (axis, grows) in [
                (Axis::Column, assignment.hint.grow_horizontal),
                (Axis::Row, assignment.hint.grow_vertical),
            ] {
                if grows {
                    self.tracks_mut(axis).set_weight(cells.origin(axis), 1.0);
                    if let Some(placed) = self.assignment_mut(component) {
                        placed.set_axis_fill(axis);
                    }
                }
            }
        }

        if config.right_alignment_enabled {
            if assignment.hint.label {
                let has_neighbour = self
                    .occupant_at(cells.right(), cells.row)
                    .and_then(|neighbour| self.assignment(neighbour))
                    .is_some_and(|neighbour| !neighbour.hint.label);
                if has_neighbour && let Some(placed) = self.assignment_mut(component) {
                    placed.alignment.horizontal = HorizontalAlignment::Trailing;
                }
            } else if let Some(left) = cells
                .column
                .checked_sub(1)
                .and_then(|column| self.occupant_at(column, cells.row))
                && let Some(label) = self.assignment_mut(left)
                && label.hint.label
                && label.cells.right() == cells.column
            {
                label.alignment.horizontal = HorizontalAlignment::Trailing;
            }
        }
    }

    fn prepare_cell(
        &mut self,
        axis: Axis,
        index: usize,
        insert: bool,
        config: &EditConfig,
    ) -> Result<(), GridError> {
        if insert {
            self.check_growth(axis, index, config)?;
            self.insert_track_unchecked(axis, index);
        } else {
            if index >= config.max_track_index {
                return Err(GridError::InvalidIndex {
                    axis,
                    index,
                    limit: config.max_track_index,
                });
            }
            self.tracks_mut(axis).ensure_len(index + 1);
        }
        Ok(())
    }

    fn insert_track_unchecked(&mut self, axis: Axis, index: usize) {
        let tracks = self.tracks_mut(axis);
        tracks.ensure_len(index);
        let track = tracks.new_track();
        tracks.insert_track(index, track);
        for assignment in self.assignments_mut() {
            let cells = assignment.cells;
            if cells.origin(axis) >= index {
                assignment.cells.set_origin(axis, cells.origin(axis) + 1);
            } else if cells.end(axis) > index {
                assignment.cells.set_span(axis, cells.span(axis) + 1);
            }
        }
    }

    fn delete_track_unchecked(&mut self, axis: Axis, index: usize) {
        self.assignments_mut()
            .retain(|assignment| assignment.cells.origin(axis) != index);
        for assignment in self.assignments_mut() {
            let cells = assignment.cells;
            if cells.origin(axis) > index {
                assignment.cells.set_origin(axis, cells.origin(axis) - 1);
            } else if cells.end(axis) > index {
                assignment.cells.set_span(axis, cells.span(axis) - 1);
            }
        }
        let _ = self.tracks_mut(axis).remove_track(index);
    }

    fn check_existing(&self, axis: Axis, index: usize) -> Result<(), GridError> {
        let count = self.track_count(axis);
        if index >= count {
            return Err(GridError::InvalidIndex {
                axis,
                index,
                limit: count,
            });
        }
        Ok(())
    }

    /// Reject edits that would make the axis reach `max_track_index`.
    fn check_growth(&self, axis: Axis, index: usize, config: &EditConfig) -> Result<(), GridError> {
        let grown = self.track_count(axis).max(index) + 1;
        if grown > config.max_track_index {
            return Err(GridError::InvalidIndex {
                axis,
                index,
                limit: config.max_track_index,
            });
        }
        Ok(())
    }
}
