#![forbid(unsafe_code)]

//! Grid layout model and editing engine.
//!
//! # Role in Trellis
//! `trellis-grid` owns the grid a visual form designer edits: column and row
//! [`track`]s, per-component cell [`model`] assignments with alignment and
//! insets, and the structural [`editor`] operations (insert, delete, move,
//! split, clear) applied atomically with change notifications.
//!
//! [`synth`] infers a grid from absolute component rectangles, and [`query`]
//! resolves a model to pixel intervals for hit testing and drawing.
//!
//! # Feature flags
//! - `tracing`: structured debug events for committed and rejected edits,
//!   synthesis rejections and query construction.

pub mod alignment;
pub mod editor;
pub mod error;
pub mod hint;
pub mod model;
pub mod query;
mod structural;
pub mod synth;
pub mod track;

pub use alignment::{Anchor, CellAlignment, FillMode, HorizontalAlignment, VerticalAlignment};
pub use editor::{
    ChangeOrigin, EditConfig, GridChange, GridEditor, GridOperation, GridOperationError,
    GridOperationJournalEntry, GridOperationJournalResult, GridOperationKind, GridTransaction,
    GridTransactionOutcome, ListenerId, SplitWeight, StaleTransaction, TrackCountChange,
};
pub use error::GridError;
pub use hint::TypeHint;
pub use model::{CellAssignment, CellRect, ComponentId, GridModel, GridSnapshot, TRACK_LIMIT};
pub use query::{GridQuery, LayoutMetrics, NoPreferredSizes, PreferredSizes, QueryConfig};
pub use synth::{
    ComponentGeometry, GapPolicy, GeometryDefect, GridSynthesizer, InvalidGeometry, Synthesis,
    SynthesisConfig,
};
pub use track::{Axis, Filler, Track, TrackDeclaration, TrackSet, WEIGHT_SENTINEL};
pub use trellis_core::geometry::{Insets, Interval, Rect, RectF, Size};
