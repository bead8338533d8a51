#![forbid(unsafe_code)]

//! Transactional grid editing.
//!
//! Every edit is a [`GridOperation`]. [`GridModel::apply_operation`] runs it
//! on a cloned working model, fits the track counts to the assignments, maintains gap insets,
//! validates, and only then replaces the model. On failure the model is
//! unchanged and a [`GridOperationError`] describes why.
//!
//! [`GridTransaction`] stages several operations with a deterministic
//! journal; [`GridEditor`] owns a model, hands out operation ids and tells
//! registered listeners about each committed change exactly once.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use trellis_core::geometry::Insets;

use crate::alignment::{CellAlignment, HorizontalAlignment, VerticalAlignment};
use crate::error::GridError;
use crate::hint::TypeHint;
use crate::model::{CellRect, ComponentId, GridModel};
use crate::track::Axis;

/// Editing behavior knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Maintain trailing gap insets after every edit.
    pub change_insets_for_gaps: bool,
    pub column_gap: i32,
    pub row_gap: i32,
    /// Apply hint-driven alignment to newly added components.
    pub auto_alignment: bool,
    /// Growing hints give their origin track weight and `Fill`.
    pub grab_enabled: bool,
    /// Labels left of another component align trailing.
    pub right_alignment_enabled: bool,
    /// Exclusive bound on track indices reachable through auto-expansion.
    pub max_track_index: usize,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            change_insets_for_gaps: true,
            column_gap: 5,
            row_gap: 5,
            auto_alignment: true,
            grab_enabled: true,
            right_alignment_enabled: true,
            max_track_index: 100,
        }
    }
}

impl EditConfig {
    #[must_use]
    pub const fn gap(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Column => self.column_gap,
            Axis::Row => self.row_gap,
        }
    }
}

/// Which half of a split track keeps the original weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitWeight {
    #[default]
    First,
    Second,
    /// Both halves keep it.
    Both,
}

/// Supported grid edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GridOperation {
    /// Insert an empty track before `index`.
    InsertTrack { axis: Axis, index: usize },
    /// Delete a track and the components starting in it.
    DeleteTrack { axis: Axis, index: usize },
    /// Move track `from` to insertion point `to`.
    MoveTrack { axis: Axis, from: usize, to: usize },
    /// Split one track into two.
    SplitTrack {
        axis: Axis,
        index: usize,
        #[serde(default)]
        weight: SplitWeight,
    },
    /// Remove the components starting in a track; the track stays.
    ClearTrack { axis: Axis, index: usize },
    /// Drop tracks that exist only to be spanned. `None` does both axes.
    NormalizeSpanning {
        #[serde(default)]
        axis: Option<Axis>,
    },
    SetTrackSize {
        axis: Axis,
        index: usize,
        size: u32,
    },
    SetTrackWeight {
        axis: Axis,
        index: usize,
        weight: f64,
    },
    SetColumnAlignment {
        column: usize,
        alignment: HorizontalAlignment,
    },
    SetRowAlignment {
        row: usize,
        alignment: VerticalAlignment,
    },
    SetCells {
        component: ComponentId,
        cells: CellRect,
    },
    SetAlignment {
        component: ComponentId,
        alignment: CellAlignment,
    },
    SetInsets {
        component: ComponentId,
        insets: Insets,
    },
    SetGrow {
        component: ComponentId,
        axis: Axis,
        grow: bool,
    },
    AddComponent {
        component: ComponentId,
        column: usize,
        row: usize,
        #[serde(default)]
        insert_column: bool,
        #[serde(default)]
        insert_row: bool,
        #[serde(default)]
        hint: TypeHint,
    },
    AddComponentLast {
        component: ComponentId,
        #[serde(default)]
        hint: TypeHint,
    },
    MoveComponent {
        component: ComponentId,
        column: usize,
        row: usize,
        #[serde(default)]
        insert_column: bool,
        #[serde(default)]
        insert_row: bool,
    },
    RemoveComponent { component: ComponentId },
}

impl GridOperation {
    #[must_use]
    pub const fn kind(&self) -> GridOperationKind {
        match self {
            Self::InsertTrack { .. } => GridOperationKind::InsertTrack,
            Self::DeleteTrack { .. } => GridOperationKind::DeleteTrack,
            Self::MoveTrack { .. } => GridOperationKind::MoveTrack,
            Self::SplitTrack { .. } => GridOperationKind::SplitTrack,
            Self::ClearTrack { .. } => GridOperationKind::ClearTrack,
            Self::NormalizeSpanning { .. } => GridOperationKind::NormalizeSpanning,
            Self::SetTrackSize { .. } => GridOperationKind::SetTrackSize,
            Self::SetTrackWeight { .. } => GridOperationKind::SetTrackWeight,
            Self::SetColumnAlignment { .. } => GridOperationKind::SetColumnAlignment,
            Self::SetRowAlignment { .. } => GridOperationKind::SetRowAlignment,
            Self::SetCells { .. } => GridOperationKind::SetCells,
            Self::SetAlignment { .. } => GridOperationKind::SetAlignment,
            Self::SetInsets { .. } => GridOperationKind::SetInsets,
            Self::SetGrow { .. } => GridOperationKind::SetGrow,
            Self::AddComponent { .. } => GridOperationKind::AddComponent,
            Self::AddComponentLast { .. } => GridOperationKind::AddComponentLast,
            Self::MoveComponent { .. } => GridOperationKind::MoveComponent,
            Self::RemoveComponent { .. } => GridOperationKind::RemoveComponent,
        }
    }
}

/// Stable operation discriminator for logs and journals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridOperationKind {
    InsertTrack,
    DeleteTrack,
    MoveTrack,
    SplitTrack,
    ClearTrack,
    NormalizeSpanning,
    SetTrackSize,
    SetTrackWeight,
    SetColumnAlignment,
    SetRowAlignment,
    SetCells,
    SetAlignment,
    SetInsets,
    SetGrow,
    AddComponent,
    AddComponentLast,
    MoveComponent,
    RemoveComponent,
}

impl GridOperationKind {
    /// Whether gap insets are refreshed after this kind of edit.
    ///
    /// Edits that only restyle components leave explicit insets alone.
    #[must_use]
    pub const fn maintains_gap_insets(self) -> bool {
        !matches!(
            self,
            Self::SetInsets
                | Self::SetAlignment
                | Self::SetColumnAlignment
                | Self::SetRowAlignment
                | Self::SetGrow
        )
    }
}

/// Track count of one axis before and after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackCountChange {
    pub before: usize,
    pub after: usize,
}

impl TrackCountChange {
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// What produced a [`GridChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum ChangeOrigin {
    Operation {
        operation_id: u64,
        kind: GridOperationKind,
    },
    Transaction {
        transaction_id: u64,
        applied: usize,
    },
}

/// Change notification for one committed operation or transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridChange {
    pub origin: ChangeOrigin,
    pub columns: TrackCountChange,
    pub rows: TrackCountChange,
    /// Components added, removed, or whose assignment changed, sorted.
    pub affected: Vec<ComponentId>,
    /// Components no longer in the grid, sorted.
    pub removed: Vec<ComponentId>,
    pub before_hash: u64,
    pub after_hash: u64,
}

impl GridChange {
    fn between(origin: ChangeOrigin, before: &GridModel, after: &GridModel) -> Self {
        let mut affected = BTreeSet::new();
        let mut removed = Vec::new();
        for assignment in after.assignments() {
            if before.assignment(assignment.component) != Some(assignment) {
                affected.insert(assignment.component);
            }
        }
        for assignment in before.assignments() {
            if !after.contains_component(assignment.component) {
                affected.insert(assignment.component);
                removed.push(assignment.component);
            }
        }
        removed.sort_unstable();
        Self {
            origin,
            columns: TrackCountChange {
                before: before.column_count(),
                after: after.column_count(),
            },
            rows: TrackCountChange {
                before: before.row_count(),
                after: after.row_count(),
            },
            affected: affected.into_iter().collect(),
            removed,
            before_hash: before.state_hash(),
            after_hash: after.state_hash(),
        }
    }

    /// Whether the change altered anything at all.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.before_hash == self.after_hash
    }
}

/// Failure payload for transactional operation APIs.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOperationError {
    pub operation_id: u64,
    pub kind: GridOperationKind,
    pub before_hash: u64,
    pub after_hash: u64,
    pub reason: GridError,
}

impl fmt::Display for GridOperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grid op {} ({:?}) failed: {} [before_hash={:#x}, after_hash={:#x}]",
            self.operation_id, self.kind, self.reason, self.before_hash, self.after_hash
        )
    }
}

impl std::error::Error for GridOperationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}

impl GridModel {
    /// Apply one operation atomically.
    ///
    /// The operation is executed on a cloned working model. On success, the
    /// mutated clone replaces `self`; on failure, `self` is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if a successful edit leaves track counts inconsistent with
    /// the assignments, which indicates a bug in the edit itself.
    pub fn apply_operation(
        &mut self,
        operation_id: u64,
        operation: GridOperation,
        config: &EditConfig,
    ) -> Result<GridChange, GridOperationError> {
        let kind = operation.kind();
        let before_hash = self.state_hash();
        let mut working = self.clone();

        let result = working
            .apply_operation_inner(operation, config)
            .and_then(|()| {
                working.normalize_extent();
                if kind.maintains_gap_insets() {
                    working.ensure_gap_insets(config);
                }
                working.validate()
            });

        if let Err(reason) = result {
            #[cfg(feature = "tracing")]
            trellis_core::debug!(
                message = "grid.operation.rejected",
                operation_id,
                kind = ?kind,
                reason = %reason,
            );
            return Err(GridOperationError {
                operation_id,
                kind,
                before_hash,
                after_hash: working.state_hash(),
                reason,
            });
        }

        working.assert_structure();
        let change = GridChange::between(
            ChangeOrigin::Operation { operation_id, kind },
            self,
            &working,
        );
        *self = working;

        #[cfg(feature = "tracing")]
        trellis_core::debug!(
            message = "grid.operation.applied",
            operation_id,
            kind = ?kind,
            columns = change.columns.after,
            rows = change.rows.after,
            affected = change.affected.len(),
            after_hash = change.after_hash,
        );

        Ok(change)
    }

    /// Start a transaction for one or more operations.
    #[must_use]
    pub fn begin_transaction(&self, transaction_id: u64, config: EditConfig) -> GridTransaction {
        GridTransaction::new(transaction_id, self.clone(), config)
    }

    fn apply_operation_inner(
        &mut self,
        operation: GridOperation,
        config: &EditConfig,
    ) -> Result<(), GridError> {
        match operation {
            GridOperation::InsertTrack { axis, index } => self.insert_track(axis, index, config),
            GridOperation::DeleteTrack { axis, index } => self.delete_track(axis, index),
            GridOperation::MoveTrack { axis, from, to } => self.move_track(axis, from, to),
            GridOperation::SplitTrack {
                axis,
                index,
                weight,
            } => self.split_track(axis, index, weight, config),
            GridOperation::ClearTrack { axis, index } => self.clear_track(axis, index),
            GridOperation::NormalizeSpanning { axis } => {
                match axis {
                    Some(axis) => self.normalize_spanning(axis),
                    None => {
                        for axis in Axis::ALL {
                            self.normalize_spanning(axis);
                        }
                    }
                }
                Ok(())
            }
            GridOperation::SetTrackSize { axis, index, size } => {
                self.set_track_size(axis, index, size, config)
            }
            GridOperation::SetTrackWeight {
                axis,
                index,
                weight,
            } => self.set_track_weight(axis, index, weight, config),
            GridOperation::SetColumnAlignment { column, alignment } => {
                self.set_column_alignment(column, alignment)
            }
            GridOperation::SetRowAlignment { row, alignment } => {
                self.set_row_alignment(row, alignment)
            }
            GridOperation::SetCells { component, cells } => {
                cells.check_within(config.max_track_index)?;
                self.set_cells(component, cells)
            }
            GridOperation::SetAlignment {
                component,
                alignment,
            } => {
                let assignment = self
                    .assignment_mut(component)
                    .ok_or(GridError::UnknownComponent { component })?;
                assignment.alignment = alignment;
                Ok(())
            }
            GridOperation::SetInsets { component, insets } => {
                let assignment = self
                    .assignment_mut(component)
                    .ok_or(GridError::UnknownComponent { component })?;
                assignment.insets = insets;
                Ok(())
            }
            GridOperation::SetGrow {
                component,
                axis,
                grow,
            } => self.set_grow(component, axis, grow),
            GridOperation::AddComponent {
                component,
                column,
                row,
                insert_column,
                insert_row,
                hint,
            } => self.add_component(
                component,
                column,
                insert_column,
                row,
                insert_row,
                hint,
                config,
            ),
            GridOperation::AddComponentLast { component, hint } => {
                self.add_component_last(component, hint, config)
            }
            GridOperation::MoveComponent {
                component,
                column,
                row,
                insert_column,
                insert_row,
            } => self.move_component(component, column, insert_column, row, insert_row, config),
            GridOperation::RemoveComponent { component } => self.remove_component(component),
        }
    }
}

/// One deterministic operation journal row emitted by a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridOperationJournalEntry {
    pub transaction_id: u64,
    pub sequence: u64,
    pub operation_id: u64,
    pub operation: GridOperation,
    pub kind: GridOperationKind,
    pub before_hash: u64,
    pub after_hash: u64,
    pub result: GridOperationJournalResult,
}

/// Journal result state for one attempted operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GridOperationJournalResult {
    Applied,
    Rejected { reason: String },
}

/// Finalized transaction payload emitted by commit/rollback.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTransactionOutcome {
    pub transaction_id: u64,
    pub committed: bool,
    pub model: GridModel,
    pub journal: Vec<GridOperationJournalEntry>,
    /// Net change from the transaction's base model to `model`.
    pub change: GridChange,
}

/// Transaction boundary wrapper for grid mutations.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTransaction {
    transaction_id: u64,
    sequence: u64,
    config: EditConfig,
    base_model: GridModel,
    working_model: GridModel,
    journal: Vec<GridOperationJournalEntry>,
}

impl GridTransaction {
    fn new(transaction_id: u64, base_model: GridModel, config: EditConfig) -> Self {
        Self {
            transaction_id,
            sequence: 1,
            config,
            base_model: base_model.clone(),
            working_model: base_model,
            journal: Vec::new(),
        }
    }

    /// Transaction identifier supplied by the caller.
    #[must_use]
    pub const fn transaction_id(&self) -> u64 {
        self.transaction_id
    }

    /// Current working model for read-only inspection.
    #[must_use]
    pub fn model(&self) -> &GridModel {
        &self.working_model
    }

    /// Journal entries in deterministic insertion order.
    #[must_use]
    pub fn journal(&self) -> &[GridOperationJournalEntry] {
        &self.journal
    }

    /// Hash of the model the transaction started from.
    #[must_use]
    pub fn base_hash(&self) -> u64 {
        self.base_model.state_hash()
    }

    /// Attempt one operation against the working model.
    ///
    /// Every attempt is journaled, including rejected operations.
    pub fn apply_operation(
        &mut self,
        operation_id: u64,
        operation: GridOperation,
    ) -> Result<GridChange, GridOperationError> {
        let operation_for_journal = operation.clone();
        let kind = operation_for_journal.kind();
        let sequence = self.next_sequence();

        match self
            .working_model
            .apply_operation(operation_id, operation, &self.config)
        {
            Ok(change) => {
                self.journal.push(GridOperationJournalEntry {
                    transaction_id: self.transaction_id,
                    sequence,
                    operation_id,
                    operation: operation_for_journal,
                    kind,
                    before_hash: change.before_hash,
                    after_hash: change.after_hash,
                    result: GridOperationJournalResult::Applied,
                });
                Ok(change)
            }
            Err(err) => {
                self.journal.push(GridOperationJournalEntry {
                    transaction_id: self.transaction_id,
                    sequence,
                    operation_id,
                    operation: operation_for_journal,
                    kind,
                    before_hash: err.before_hash,
                    after_hash: err.after_hash,
                    result: GridOperationJournalResult::Rejected {
                        reason: err.reason.to_string(),
                    },
                });
                Err(err)
            }
        }
    }

    /// Finalize and keep all successful mutations.
    #[must_use]
    pub fn commit(self) -> GridTransactionOutcome {
        let change = GridChange::between(self.origin(), &self.base_model, &self.working_model);
        GridTransactionOutcome {
            transaction_id: self.transaction_id,
            committed: true,
            model: self.working_model,
            journal: self.journal,
            change,
        }
    }

    /// Finalize and discard all mutations.
    #[must_use]
    pub fn rollback(self) -> GridTransactionOutcome {
        let change = GridChange::between(self.origin(), &self.base_model, &self.base_model);
        GridTransactionOutcome {
            transaction_id: self.transaction_id,
            committed: false,
            model: self.base_model,
            journal: self.journal,
            change,
        }
    }

    fn origin(&self) -> ChangeOrigin {
        ChangeOrigin::Transaction {
            transaction_id: self.transaction_id,
            applied: self
                .journal
                .iter()
                .filter(|entry| entry.result == GridOperationJournalResult::Applied)
                .count(),
        }
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.sequence;
        self.sequence = self.sequence.saturating_add(1);
        sequence
    }
}

/// A transaction could not be committed because the editor's model moved on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleTransaction {
    pub transaction_id: u64,
    pub base_hash: u64,
    pub current_hash: u64,
}

impl fmt::Display for StaleTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transaction {} started from {:#x} but the grid is now {:#x}",
            self.transaction_id, self.base_hash, self.current_hash
        )
    }
}

impl std::error::Error for StaleTransaction {}

/// Handle returned by [`GridEditor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&GridChange)>;

/// Owns a grid model and is the single entry point for editing it.
///
/// Commands ask [`GridEditor::can_apply`] before offering an edit, apply it
/// with [`GridEditor::apply`], and listeners registered with
/// [`GridEditor::subscribe`] hear about every committed change once.
pub struct GridEditor {
    model: GridModel,
    config: EditConfig,
    next_operation_id: u64,
    next_transaction_id: u64,
    next_listener_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl fmt::Debug for GridEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridEditor")
            .field("model", &self.model)
            .field("config", &self.config)
            .field("next_operation_id", &self.next_operation_id)
            .field("next_transaction_id", &self.next_transaction_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl GridEditor {
    #[must_use]
    pub fn new(model: GridModel, config: EditConfig) -> Self {
        Self {
            model,
            config,
            next_operation_id: 1,
            next_transaction_id: 1,
            next_listener_id: 1,
            listeners: Vec::new(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &GridModel {
        &self.model
    }

    #[must_use]
    pub fn config(&self) -> &EditConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditConfig) {
        self.config = config;
    }

    #[must_use]
    pub fn into_model(self) -> GridModel {
        self.model
    }

    /// Register a change listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&GridChange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id = self.next_listener_id.saturating_add(1);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Dry-run an operation without changing anything.
    pub fn can_apply(&self, operation: &GridOperation) -> Result<(), GridOperationError> {
        let mut probe = self.model.clone();
        probe
            .apply_operation(self.next_operation_id, operation.clone(), &self.config)
            .map(|_| ())
    }

    /// Apply one operation and notify listeners if it commits.
    pub fn apply(&mut self, operation: GridOperation) -> Result<GridChange, GridOperationError> {
        let operation_id = self.next_operation_id;
        self.next_operation_id = self.next_operation_id.saturating_add(1);
        let change = self
            .model
            .apply_operation(operation_id, operation, &self.config)?;
        self.notify(&change);
        Ok(change)
    }

    /// Start a transaction against the current model.
    #[must_use]
    pub fn begin_transaction(&mut self) -> GridTransaction {
        let transaction_id = self.next_transaction_id;
        self.next_transaction_id = self.next_transaction_id.saturating_add(1);
        self.model
            .begin_transaction(transaction_id, self.config.clone())
    }

    /// Adopt a transaction's working model and notify listeners once.
    ///
    /// Fails without touching the model if another edit landed after the
    /// transaction began.
    pub fn commit(&mut self, transaction: GridTransaction) -> Result<GridChange, StaleTransaction> {
        let current_hash = self.model.state_hash();
        let base_hash = transaction.base_hash();
        if base_hash != current_hash {
            return Err(StaleTransaction {
                transaction_id: transaction.transaction_id(),
                base_hash,
                current_hash,
            });
        }
        let outcome = transaction.commit();
        self.model = outcome.model;

        #[cfg(feature = "tracing")]
        trellis_core::debug!(
            message = "grid.transaction.committed",
            transaction_id = outcome.transaction_id,
            operations = outcome.journal.len(),
            affected = outcome.change.affected.len(),
            after_hash = outcome.change.after_hash,
        );

        self.notify(&outcome.change);
        Ok(outcome.change)
    }

    pub fn insert_track(&mut self, axis: Axis, index: usize) -> Result<GridChange, GridOperationError> {
        self.apply(GridOperation::InsertTrack { axis, index })
    }

    pub fn delete_track(&mut self, axis: Axis, index: usize) -> Result<GridChange, GridOperationError> {
        self.apply(GridOperation::DeleteTrack { axis, index })
    }

    pub fn move_track(
        &mut self,
        axis: Axis,
        from: usize,
        to: usize,
    ) -> Result<GridChange, GridOperationError> {
        self.apply(GridOperation::MoveTrack { axis, from, to })
    }

    pub fn split_track(
        &mut self,
        axis: Axis,
        index: usize,
        weight: SplitWeight,
    ) -> Result<GridChange, GridOperationError> {
        self.apply(GridOperation::SplitTrack {
            axis,
            index,
            weight,
        })
    }

    pub fn clear_track(&mut self, axis: Axis, index: usize) -> Result<GridChange, GridOperationError> {
        self.apply(GridOperation::ClearTrack { axis, index })
    }

    pub fn normalize_spanning(&mut self) -> Result<GridChange, GridOperationError> {
        self.apply(GridOperation::NormalizeSpanning { axis: None })
    }

    pub fn set_cells(
        &mut self,
        component: ComponentId,
        cells: CellRect,
    ) -> Result<GridChange, GridOperationError> {
        self.apply(GridOperation::SetCells { component, cells })
    }

    fn notify(&mut self, change: &GridChange) {
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }
}
