#![forbid(unsafe_code)]

//! Core primitives for the Trellis grid layout engine.
//!
//! # Role in Trellis
//! `trellis-core` holds the pixel geometry shared by every layer
//! ([`geometry::Rect`], [`geometry::Insets`], [`geometry::Interval`]) and the
//! optional logging facade used by `trellis-grid`.

pub mod geometry;
pub mod logging;

pub use geometry::{Insets, Interval, Rect, RectDefect, RectF, Size};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
