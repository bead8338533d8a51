#![forbid(unsafe_code)]

//! Grid synthesis from absolute component geometry.
//!
//! Given components placed at arbitrary pixel rectangles, [`GridSynthesizer`]
//! infers columns and rows, assigns each component a cell block, derives
//! alignment from where the component sits inside its tracks, and encodes
//! the gaps between tracks as trailing insets.
//!
//! # Clustering
//!
//! Each axis is clustered independently. Extents are visited shortest
//! first; an extent that overlaps exactly one cluster (or starts within
//! `snap_tolerance` of it) joins it, one that touches none starts a new
//! cluster, and one that touches several is treated as spanning and left
//! out. Overlapping clusters are then merged and ordered. Every extent maps
//! to the contiguous range of clusters it touches.
//!
//! Bad input never aborts synthesis: components with unusable geometry, or
//! whose inferred cells collide with an earlier component, are left out and
//! reported in [`Synthesis::rejected`].

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use trellis_core::geometry::{Rect, RectDefect, RectF, Size};

use crate::alignment::{CellAlignment, HorizontalAlignment, VerticalAlignment};
use crate::error::GridError;
use crate::hint::TypeHint;
use crate::model::{CellAssignment, CellRect, ComponentId, GridModel};
use crate::track::{Axis, Track, TrackSet};

/// How gaps between tracks become insets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// The configured column/row gap after every non-last track.
    #[default]
    Standard,
    /// The measured distance to the next track, falling back to the
    /// configured gap when tracks touch.
    Measured,
}

/// Synthesis tolerances and conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Extents starting this close to a cluster join it.
    pub snap_tolerance: i32,
    /// Offsets this small count as touching a track edge.
    pub alignment_tolerance: i32,
    /// Fraction of a track an unaligned component must cover to be `Fill`.
    pub fill_ratio: f64,
    pub column_gap: i32,
    pub row_gap: i32,
    pub gap_policy: GapPolicy,
    /// Infer alignment from geometry; otherwise every cell is centered.
    pub infer_alignment: bool,
    /// Honor growth hints with track weight and `Fill`.
    pub grow_enabled: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            snap_tolerance: 5,
            alignment_tolerance: 2,
            fill_ratio: 0.75,
            column_gap: 5,
            row_gap: 5,
            gap_policy: GapPolicy::Standard,
            infer_alignment: true,
            grow_enabled: true,
        }
    }
}

impl SynthesisConfig {
    const fn gap(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Column => self.column_gap,
            Axis::Row => self.row_gap,
        }
    }
}

/// One component as currently laid out by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentGeometry {
    pub component: ComponentId,
    pub bounds: RectF,
    /// Natural size; a component stretched well past it is `Fill`.
    #[serde(default)]
    pub preferred: Option<Size>,
    #[serde(default)]
    pub hint: TypeHint,
}

impl ComponentGeometry {
    #[must_use]
    pub fn new(component: ComponentId, bounds: impl Into<RectF>) -> Self {
        Self {
            component,
            bounds: bounds.into(),
            preferred: None,
            hint: TypeHint::plain(),
        }
    }

    #[must_use]
    pub fn with_preferred(mut self, preferred: Size) -> Self {
        self.preferred = Some(preferred);
        self
    }

    #[must_use]
    pub fn with_hint(mut self, hint: TypeHint) -> Self {
        self.hint = hint;
        self
    }
}

/// Why a component was left out of a synthesized grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "defect", rename_all = "snake_case")]
pub enum GeometryDefect {
    NonFinite,
    NegativeSize,
    Degenerate,
    /// The rectangle does not touch the container.
    OutsideContainer,
    /// The component appeared earlier in the input.
    DuplicateComponent,
    /// The inferred cells collide with an already placed component.
    CellConflict { other: ComponentId },
    /// The inferred cells lie beyond [`TRACK_LIMIT`](crate::model::TRACK_LIMIT) tracks.
    TrackLimit,
}

impl From<RectDefect> for GeometryDefect {
    fn from(defect: RectDefect) -> Self {
        match defect {
            RectDefect::NonFinite => Self::NonFinite,
            RectDefect::NegativeSize => Self::NegativeSize,
            RectDefect::Degenerate => Self::Degenerate,
        }
    }
}

/// A component excluded from synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvalidGeometry {
    pub component: ComponentId,
    pub defect: GeometryDefect,
}

impl fmt::Display for InvalidGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.defect {
            GeometryDefect::NonFinite => {
                write!(f, "component {} has non-finite bounds", self.component)
            }
            GeometryDefect::NegativeSize => {
                write!(f, "component {} has a negative size", self.component)
            }
            GeometryDefect::Degenerate => {
                write!(f, "component {} has zero area", self.component)
            }
            GeometryDefect::OutsideContainer => {
                write!(f, "component {} lies outside the container", self.component)
            }
            GeometryDefect::DuplicateComponent => {
                write!(f, "component {} appears more than once", self.component)
            }
            GeometryDefect::CellConflict { other } => write!(
                f,
                "component {} would share cells with component {other}",
                self.component
            ),
            GeometryDefect::TrackLimit => {
                write!(f, "component {} lies past the track limit", self.component)
            }
        }
    }
}

impl std::error::Error for InvalidGeometry {}

/// Result of [`GridSynthesizer::synthesize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub model: GridModel,
    /// Components left out, in input order.
    pub rejected: Vec<InvalidGeometry>,
}

/// Builds grid models from absolute layouts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridSynthesizer {
    config: SynthesisConfig,
}

/// Pixel span along one axis, widened so distances between any two
/// `i32` edges fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Extent {
    start: i64,
    end: i64,
}

impl Extent {
    fn of(rect: &Rect, axis: Axis) -> Self {
        match axis {
            Axis::Column => Self {
                start: i64::from(rect.x),
                end: i64::from(rect.right()),
            },
            Axis::Row => Self {
                start: i64::from(rect.y),
                end: i64::from(rect.bottom()),
            },
        }
    }

    const fn len(self) -> i64 {
        self.end - self.start
    }

    const fn overlaps(self, other: Extent) -> bool {
        self.start < other.end && other.start < self.end
    }

    fn union(self, other: Extent) -> Extent {
        Extent {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    fn touches(self, cluster: Extent, tolerance: i32) -> bool {
        self.overlaps(cluster) || (self.start - cluster.start).abs() <= i64::from(tolerance)
    }
}

/// Where a component sits along one axis of its track block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Leading,
    Center,
    Trailing,
    Fill,
}

/// Inferred layout of one axis.
#[derive(Debug)]
struct AxisSolution {
    clusters: Vec<Extent>,
    /// `(first, last)` cluster per accepted component.
    spans: Vec<(usize, usize)>,
}

impl AxisSolution {
    fn solve(extents: &[Extent], tolerance: i32) -> Self {
        let clusters = cluster(extents, tolerance);
        let spans = extents
            .iter()
            .map(|extent| span_of(*extent, &clusters, tolerance))
            .collect();
        Self { clusters, spans }
    }

    /// Track sizes: the widest single-track member, else the cluster extent.
    fn sizes(&self, extents: &[Extent]) -> Vec<u32> {
        let mut widest: Vec<Option<i64>> = vec![None; self.clusters.len()];
        for (extent, (first, last)) in extents.iter().zip(&self.spans) {
            if first == last {
                let slot = &mut widest[*first];
                *slot = Some(slot.map_or(extent.len(), |width| width.max(extent.len())));
            }
        }
        widest
            .iter()
            .zip(&self.clusters)
            .map(|(width, cluster)| {
                u32::try_from(width.unwrap_or(cluster.len()).max(0)).unwrap_or(0)
            })
            .collect()
    }

    fn bound(&self, (first, last): (usize, usize)) -> Extent {
        self.clusters[first].union(self.clusters[last])
    }

    /// Distance from track `index` to the next one.
    fn gap_after(&self, index: usize, config: &SynthesisConfig, axis: Axis) -> i32 {
        if index + 1 >= self.clusters.len() {
            return 0;
        }
        let gap = config.gap(axis);
        match config.gap_policy {
            GapPolicy::Standard => gap,
            GapPolicy::Measured => {
                let measured = self.clusters[index + 1].start - self.clusters[index].end;
                if measured > 0 {
                    i32::try_from(measured).unwrap_or(i32::MAX)
                } else {
                    gap
                }
            }
        }
    }
}

fn cluster(extents: &[Extent], tolerance: i32) -> Vec<Extent> {
    let mut order: Vec<usize> = (0..extents.len()).collect();
    order.sort_by_key(|&index| (extents[index].len(), extents[index].start));

    let mut clusters: Vec<Extent> = Vec::new();
    for index in order {
        let extent = extents[index];
        let mut hits = clusters
            .iter()
            .enumerate()
            .filter(|(_, cluster)| extent.touches(**cluster, tolerance))
            .map(|(position, _)| position);
        match (hits.next(), hits.next()) {
            (None, _) => clusters.push(extent),
            (Some(position), None) => clusters[position] = clusters[position].union(extent),
            (Some(_), Some(_)) => {}
        }
    }

    clusters.sort_by_key(|cluster| (cluster.start, cluster.end));
    let mut merged: Vec<Extent> = Vec::with_capacity(clusters.len());
    for cluster in clusters {
        match merged.last_mut() {
            Some(last) if cluster.start < last.end => *last = last.union(cluster),
            _ => merged.push(cluster),
        }
    }
    merged
}

fn span_of(extent: Extent, clusters: &[Extent], tolerance: i32) -> (usize, usize) {
    let mut touched = clusters
        .iter()
        .enumerate()
        .filter(|(_, cluster)| extent.touches(**cluster, tolerance))
        .map(|(position, _)| position);
    match touched.next() {
        Some(first) => (first, touched.last().unwrap_or(first)),
        None => {
            let nearest = clusters
                .iter()
                .enumerate()
                .min_by_key(|(_, cluster)| (cluster.start - extent.start).abs())
                .map_or(0, |(position, _)| position);
            (nearest, nearest)
        }
    }
}

fn classify(
    extent: Extent,
    bound: Extent,
    preferred: Option<i32>,
    config: &SynthesisConfig,
) -> Placement {
    let tolerance = i64::from(config.alignment_tolerance);
    if preferred.is_some_and(|preferred| extent.len() > i64::from(preferred) + tolerance) {
        return Placement::Fill;
    }
    let leading = (extent.start - bound.start).abs() <= tolerance;
    let trailing = (bound.end - extent.end).abs() <= tolerance;
    match (leading, trailing) {
        (true, true) => Placement::Fill,
        (true, false) => Placement::Leading,
        (false, true) => Placement::Trailing,
        (false, false) => {
            #[allow(clippy::cast_precision_loss)]
            let coverage = extent.len() as f64 / bound.len().max(1) as f64;
            if coverage >= config.fill_ratio {
                Placement::Fill
            } else {
                Placement::Center
            }
        }
    }
}

const fn horizontal(placement: Placement) -> HorizontalAlignment {
    match placement {
        Placement::Leading => HorizontalAlignment::Leading,
        Placement::Center => HorizontalAlignment::Center,
        Placement::Trailing => HorizontalAlignment::Trailing,
        Placement::Fill => HorizontalAlignment::Fill,
    }
}

const fn vertical(placement: Placement) -> VerticalAlignment {
    match placement {
        Placement::Leading => VerticalAlignment::Top,
        Placement::Center => VerticalAlignment::Center,
        Placement::Trailing => VerticalAlignment::Bottom,
        Placement::Fill => VerticalAlignment::Fill,
    }
}

impl GridSynthesizer {
    #[must_use]
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Infer a grid for `components` laid out in a container of `container`
    /// size (a zero dimension disables the containment check).
    #[must_use]
    pub fn synthesize(&self, components: &[ComponentGeometry], container: Size) -> Synthesis {
        #[cfg(feature = "tracing")]
        let _span =
            trellis_core::debug_span!("grid.synthesize", components = components.len()).entered();

        let config = &self.config;
        let mut rejected = Vec::new();
        let mut accepted: Vec<(ComponentGeometry, Rect)> = Vec::with_capacity(components.len());
        let mut seen = FxHashSet::default();
        let area = Rect::from_size(container.width, container.height);

        for geometry in components {
            let defect = match geometry.bounds.to_rect() {
                Err(defect) => Some(GeometryDefect::from(defect)),
                Ok(_) if !seen.insert(geometry.component) => {
                    Some(GeometryDefect::DuplicateComponent)
                }
                Ok(rect) if !area.is_empty() && !area.intersects(&rect) => {
                    Some(GeometryDefect::OutsideContainer)
                }
                Ok(rect) => {
                    accepted.push((*geometry, rect));
                    None
                }
            };
            if let Some(defect) = defect {
                rejected.push(InvalidGeometry {
                    component: geometry.component,
                    defect,
                });
            }
        }

        let column_extents: Vec<Extent> = accepted
            .iter()
            .map(|(_, rect)| Extent::of(rect, Axis::Column))
            .collect();
        let row_extents: Vec<Extent> = accepted
            .iter()
            .map(|(_, rect)| Extent::of(rect, Axis::Row))
            .collect();
        let columns = AxisSolution::solve(&column_extents, config.snap_tolerance);
        let rows = AxisSolution::solve(&row_extents, config.snap_tolerance);

        let to_tracks = |sizes: Vec<u32>| -> Vec<Track> {
            sizes
                .into_iter()
                .map(|size| Track::declared(size, 0.0))
                .collect()
        };
        let mut model = match GridModel::from_parts(
            TrackSet::with_tracks(to_tracks(columns.sizes(&column_extents)), true),
            TrackSet::with_tracks(to_tracks(rows.sizes(&row_extents)), true),
            Vec::new(),
        ) {
            Ok(model) => model,
            Err(_) => GridModel::new(),
        };

        let mut placed: Vec<(CellAssignment, usize)> = accepted
            .iter()
            .enumerate()
            .map(|(index, (geometry, _))| {
                let (first_column, last_column) = columns.spans[index];
                let (first_row, last_row) = rows.spans[index];
                let cells = CellRect::new(
                    first_column,
                    first_row,
                    last_column - first_column + 1,
                    last_row - first_row + 1,
                );
                let alignment = if config.infer_alignment {
                    let preferred = geometry.preferred;
                    CellAlignment::new(
                        horizontal(classify(
                            column_extents[index],
                            columns.bound(columns.spans[index]),
                            preferred.map(|size| size.width),
                            config,
                        )),
                        vertical(classify(
                            row_extents[index],
                            rows.bound(rows.spans[index]),
                            preferred.map(|size| size.height),
                            config,
                        )),
                    )
                } else {
                    CellAlignment::default()
                };
                let assignment = CellAssignment::new(geometry.component, cells)
                    .with_alignment(alignment)
                    .with_hint(geometry.hint);
                (assignment, index)
            })
            .collect();
        placed.sort_by_key(|(assignment, index)| {
            (assignment.cells.row, assignment.cells.column, *index)
        });

        for (mut assignment, _) in placed {
            if config.grow_enabled {
                for (axis, grows) in [
                    (Axis::Column, assignment.hint.grow_horizontal),
                    (Axis::Row, assignment.hint.grow_vertical),
                ] {
                    if grows {
                        assignment.set_axis_fill(axis);
                    }
                }
            }
            for (axis, solution) in [(Axis::Column, &columns), (Axis::Row, &rows)] {
                let gap = solution.gap_after(assignment.cells.last(axis), config, axis);
                assignment.set_trailing_inset(axis, gap);
            }

            let component = assignment.component;
            match model.add_assignment(assignment) {
                Ok(()) => {
                    if config.grow_enabled {
                        if assignment.hint.grow_horizontal {
                            model
                                .tracks_mut(Axis::Column)
                                .set_weight(assignment.cells.column, 1.0);
                        }
                        if assignment.hint.grow_vertical {
                            model
                                .tracks_mut(Axis::Row)
                                .set_weight(assignment.cells.row, 1.0);
                        }
                    }
                }
                Err(GridError::Overlap { other, .. }) => rejected.push(InvalidGeometry {
                    component,
                    defect: GeometryDefect::CellConflict { other },
                }),
                Err(GridError::InvalidIndex { .. }) => rejected.push(InvalidGeometry {
                    component,
                    defect: GeometryDefect::TrackLimit,
                }),
                Err(_) => rejected.push(InvalidGeometry {
                    component,
                    defect: GeometryDefect::DuplicateComponent,
                }),
            }
        }

        #[cfg(feature = "tracing")]
        {
            for issue in &rejected {
                trellis_core::warn!(
                    message = "grid.synthesize.rejected",
                    component = issue.component.get(),
                    defect = ?issue.defect,
                );
            }
            trellis_core::debug!(
                message = "grid.synthesize.done",
                columns = model.column_count(),
                rows = model.row_count(),
                placed = model.assignments().len(),
                rejected = rejected.len(),
            );
        }

        Synthesis { model, rejected }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(start: i64, end: i64) -> Extent {
        Extent { start, end }
    }

    #[test]
    fn spanning_extent_does_not_merge_clusters() {
        let extents = [extent(0, 40), extent(60, 100), extent(0, 100)];
        let clusters = cluster(&extents, 5);
        assert_eq!(clusters, vec![extent(0, 40), extent(60, 100)]);
        assert_eq!(span_of(extents[2], &clusters, 5), (0, 1));
    }

    #[test]
    fn nested_extents_share_a_cluster() {
        let clusters = cluster(&[extent(4, 104), extent(10, 90)], 5);
        assert_eq!(clusters, vec![extent(4, 104)]);
    }

    #[test]
    fn snap_tolerance_joins_close_starts() {
        let clusters = cluster(&[extent(0, 3), extent(4, 50)], 5);
        assert_eq!(clusters.len(), 1);
        let clusters = cluster(&[extent(0, 3), extent(4, 50)], 2);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn classification_rules() {
        let config = SynthesisConfig::default();
        let bound = extent(0, 100);
        assert_eq!(classify(extent(1, 99), bound, None, &config), Placement::Fill);
        assert_eq!(classify(extent(1, 60), bound, None, &config), Placement::Leading);
        assert_eq!(classify(extent(40, 100), bound, None, &config), Placement::Trailing);
        assert_eq!(classify(extent(30, 60), bound, None, &config), Placement::Center);
        assert_eq!(classify(extent(10, 90), bound, None, &config), Placement::Fill);
        assert_eq!(
            classify(extent(1, 60), bound, Some(20), &config),
            Placement::Fill,
            "stretched past its preferred size"
        );
    }

    #[test]
    fn extreme_edges_compare_without_overflow() {
        let low = extent(i64::from(i32::MIN), i64::from(i32::MIN) + 10);
        let high = extent(i64::from(i32::MAX) - 10, i64::from(i32::MAX));
        assert!(!high.touches(low, i32::MAX));
        assert_eq!(cluster(&[low, high], 5), vec![low, high]);
        assert_eq!(span_of(high, &[low], 5), (0, 0));

        let config = SynthesisConfig {
            alignment_tolerance: i32::MAX,
            ..SynthesisConfig::default()
        };
        assert_eq!(
            classify(extent(1, 60), extent(0, 100), Some(i32::MAX), &config),
            Placement::Fill
        );
        assert_eq!(
            classify(low, low.union(high), Some(10), &SynthesisConfig::default()),
            Placement::Leading
        );
    }

    #[test]
    fn measured_gaps_use_cluster_distance() {
        let solution = AxisSolution::solve(&[extent(0, 10), extent(18, 30), extent(30, 40)], 2);
        let config = SynthesisConfig {
            gap_policy: GapPolicy::Measured,
            ..SynthesisConfig::default()
        };
        assert_eq!(solution.gap_after(0, &config, Axis::Column), 8);
        assert_eq!(solution.gap_after(1, &config, Axis::Column), 5);
        assert_eq!(solution.gap_after(2, &config, Axis::Column), 0);
    }

    #[test]
    fn empty_input_yields_only_fillers() {
        let synthesis = GridSynthesizer::default().synthesize(&[], Size::new(450, 300));
        assert!(synthesis.rejected.is_empty());
        let snapshot = synthesis.model.snapshot();
        assert_eq!(snapshot.column_count, 0);
        assert_eq!(snapshot.columns.sizes, Some(vec![0]));
        assert_eq!(
            snapshot.columns.weights,
            Some(vec![crate::track::WEIGHT_SENTINEL])
        );
    }
}
