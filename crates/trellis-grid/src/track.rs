#![forbid(unsafe_code)]

//! Track sequences for one grid axis.
//!
//! A [`TrackSet`] is the ordered list of columns (or rows) of a grid. Each
//! [`Track`] carries a preferred size (`0` = auto) and a growth weight, plus
//! two flags recording whether those values are part of the persisted
//! size / weight arrays. The arrays may be absent, or shorter than the
//! number of tracks in use; [`TrackSet::declaration`] reproduces exactly
//! what was declared.
//!
//! # Filler entry
//!
//! Generated declarations end with one extra entry whose weight is
//! [`WEIGHT_SENTINEL`] (the smallest positive `f64`). It soaks up leftover
//! container space without behaving as a real track: it is never a track
//! index, never occupied, and is re-emitted untouched on export.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Weight of the trailing filler entry.
pub const WEIGHT_SENTINEL: f64 = f64::from_bits(1);

/// Whether `weight` is the filler sentinel.
#[inline]
#[must_use]
pub fn is_sentinel_weight(weight: f64) -> bool {
    weight.to_bits() == WEIGHT_SENTINEL.to_bits()
}

/// One of the two grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Columns (horizontal positions).
    Column,
    /// Rows (vertical positions).
    Row,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Column, Axis::Row];

    /// The other axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Column => Self::Row,
            Self::Row => Self::Column,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Column => "column",
            Self::Row => "row",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single column or row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Preferred size in pixels; `0` means auto-sized.
    pub size: u32,
    /// Growth weight; `0.0` means the track does not grow.
    pub weight: f64,
    /// The size is part of the declared size array.
    pub has_size: bool,
    /// The weight is part of the declared weight array.
    pub has_weight: bool,
}

impl Track {
    /// An auto-sized, non-growing track with no declared entries.
    pub const AUTO: Self = Self {
        size: 0,
        weight: 0.0,
        has_size: false,
        has_weight: false,
    };

    /// A track whose size and weight are both declared.
    #[must_use]
    pub const fn declared(size: u32, weight: f64) -> Self {
        Self {
            size,
            weight,
            has_size: true,
            has_weight: true,
        }
    }

    #[must_use]
    pub const fn is_auto(&self) -> bool {
        self.size == 0
    }

    /// Whether the track participates in leftover-space distribution.
    #[must_use]
    pub fn grows(&self) -> bool {
        self.weight > 0.0 && !is_sentinel_weight(self.weight)
    }

    const fn is_persisted(&self) -> bool {
        self.has_size || self.has_weight
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::AUTO
    }
}

/// The trailing filler entry of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filler {
    /// Size entry of the filler, if the size array reached it.
    pub size: Option<u32>,
}

/// Persisted size / weight arrays of one axis.
///
/// `None` means the array is not declared at all, which is different from an
/// empty array.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackDeclaration {
    pub sizes: Option<Vec<u32>>,
    pub weights: Option<Vec<f64>>,
}

impl TrackDeclaration {
    #[must_use]
    pub fn new(sizes: Option<Vec<u32>>, weights: Option<Vec<f64>>) -> Self {
        Self { sizes, weights }
    }

    /// Both arrays absent.
    #[must_use]
    pub fn undeclared() -> Self {
        Self::default()
    }

    /// Longest declared array.
    #[must_use]
    pub fn len(&self) -> usize {
        let sizes = self.sizes.as_ref().map_or(0, Vec::len);
        let weights = self.weights.as_ref().map_or(0, Vec::len);
        sizes.max(weights)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered tracks of one axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackSet {
    tracks: Vec<Track>,
    sizes_declared: bool,
    weights_declared: bool,
    filler: Option<Filler>,
}

impl TrackSet {
    /// An empty axis with no declared arrays.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks with both arrays declared, optionally followed by a filler.
    #[must_use]
    pub fn with_tracks(tracks: Vec<Track>, with_filler: bool) -> Self {
        let tracks = tracks
            .into_iter()
            .map(|track| Track {
                has_size: true,
                has_weight: true,
                ..track
            })
            .collect();
        Self {
            tracks,
            sizes_declared: true,
            weights_declared: true,
            filler: with_filler.then_some(Filler { size: Some(0) }),
        }
    }

    /// Build an axis from persisted arrays.
    ///
    /// `used` is one past the highest track index referenced by any
    /// assignment. The track count is the larger of `used` and the longest
    /// array, except that a trailing entry beyond `used` whose weight is
    /// [`WEIGHT_SENTINEL`] becomes the filler instead of a track.
    #[must_use]
    pub fn from_declaration(declaration: &TrackDeclaration, used: usize) -> Self {
        let sizes = declaration.sizes.as_deref().unwrap_or(&[]);
        let weights = declaration.weights.as_deref().unwrap_or(&[]);
        let declared_len = declaration.len();
        let mut count = declared_len.max(used);
        let mut filler = None;

        if declared_len > used
            && weights.len() == declared_len
            && weights
                .last()
                .is_some_and(|weight| is_sentinel_weight(*weight))
        {
            filler = Some(Filler {
                size: sizes.get(declared_len - 1).copied(),
            });
            count -= 1;
        }

        let tracks = (0..count)
            .map(|index| Track {
                size: sizes.get(index).copied().unwrap_or(0),
                weight: weights.get(index).copied().unwrap_or(0.0),
                has_size: index < sizes.len(),
                has_weight: index < weights.len(),
            })
            .collect();

        Self {
            tracks,
            sizes_declared: declaration.sizes.is_some(),
            weights_declared: declaration.weights.is_some(),
            filler,
        }
    }

    /// Persisted arrays for this axis, including the filler entry.
    #[must_use]
    pub fn declaration(&self) -> TrackDeclaration {
        let sizes = self.sizes_declared.then(|| {
            let mut sizes: Vec<u32> = self
                .tracks
                .iter()
                .take_while(|track| track.has_size)
                .map(|track| track.size)
                .collect();
            if sizes.len() == self.tracks.len() {
                sizes.extend(self.filler.and_then(|filler| filler.size));
            }
            sizes
        });
        let weights = self.weights_declared.then(|| {
            let mut weights: Vec<f64> = self
                .tracks
                .iter()
                .take_while(|track| track.has_weight)
                .map(|track| track.weight)
                .collect();
            if weights.len() == self.tracks.len() && self.filler.is_some() {
                weights.push(WEIGHT_SENTINEL);
            }
            weights
        });
        TrackDeclaration { sizes, weights }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Preferred sizes, one per track.
    #[must_use]
    pub fn sizes(&self) -> Vec<u32> {
        self.tracks.iter().map(|track| track.size).collect()
    }

    /// Weights, one per track.
    #[must_use]
    pub fn weights(&self) -> Vec<f64> {
        self.tracks.iter().map(|track| track.weight).collect()
    }

    #[must_use]
    pub const fn filler(&self) -> Option<Filler> {
        self.filler
    }

    #[must_use]
    pub const fn sizes_declared(&self) -> bool {
        self.sizes_declared
    }

    #[must_use]
    pub const fn weights_declared(&self) -> bool {
        self.weights_declared
    }

    /// Number of leading tracks kept alive by the declared arrays.
    #[must_use]
    pub fn declared_len(&self) -> usize {
        self.tracks
            .iter()
            .rposition(Track::is_persisted)
            .map_or(0, |index| index + 1)
    }

    /// Sum of the weights of growing tracks.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.tracks
            .iter()
            .filter(|track| track.grows())
            .map(|track| track.weight)
            .sum()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    /// A fresh auto track, declared in whichever arrays exist.
    pub(crate) fn new_track(&self) -> Track {
        Track {
            has_size: self.sizes_declared,
            has_weight: self.weights_declared,
            ..Track::AUTO
        }
    }

    /// Insert at `index` (clamped to the end), padding declared arrays so the
    /// new entry is persisted.
    pub(crate) fn insert_track(&mut self, index: usize, mut track: Track) {
        let index = index.min(self.tracks.len());
        if self.sizes_declared {
            for before in &mut self.tracks[..index] {
                before.has_size = true;
            }
        }
        if self.weights_declared {
            for before in &mut self.tracks[..index] {
                before.has_weight = true;
            }
        }
        track.has_size = self.sizes_declared;
        track.has_weight = self.weights_declared;
        self.tracks.insert(index, track);
    }

    /// Append auto tracks until the axis has at least `len` tracks.
    pub(crate) fn ensure_len(&mut self, len: usize) {
        while self.tracks.len() < len {
            let track = self.new_track();
            self.insert_track(self.tracks.len(), track);
        }
    }

    pub(crate) fn remove_track(&mut self, index: usize) -> Option<Track> {
        (index < self.tracks.len()).then(|| self.tracks.remove(index))
    }

    /// Move the track at `from` so that it ends up at index `dest`.
    pub(crate) fn move_track(&mut self, from: usize, dest: usize) {
        if from >= self.tracks.len() || from == dest {
            return;
        }
        let track = self.tracks.remove(from);
        let dest = dest.min(self.tracks.len());
        self.tracks.insert(dest, track);
        self.normalize_declared_prefix();
    }

    pub(crate) fn set_size(&mut self, index: usize, size: u32) {
        self.ensure_len(index + 1);
        let pad = if self.sizes_declared {
            index + 1
        } else {
            self.tracks.len()
        };
        self.sizes_declared = true;
        for track in &mut self.tracks[..pad] {
            track.has_size = true;
        }
        self.tracks[index].size = size;
    }

    pub(crate) fn set_weight(&mut self, index: usize, weight: f64) {
        self.ensure_len(index + 1);
        let pad = if self.weights_declared {
            index + 1
        } else {
            self.tracks.len()
        };
        self.weights_declared = true;
        for track in &mut self.tracks[..pad] {
            track.has_weight = true;
        }
        self.tracks[index].weight = weight;
    }

    /// Drop trailing tracks beyond `used` that no array declares.
    pub(crate) fn trim_unused(&mut self, used: usize) {
        while self.tracks.len() > used
            && self
                .tracks
                .last()
                .is_some_and(|track| !track.is_persisted())
        {
            self.tracks.pop();
        }
    }

    /// Restore the "declared entries form a prefix" property after tracks
    /// have been reordered.
    fn normalize_declared_prefix(&mut self) {
        if let Some(last) = self.tracks.iter().rposition(|track| track.has_size) {
            for track in &mut self.tracks[..=last] {
                track.has_size = true;
            }
        }
        if let Some(last) = self.tracks.iter().rposition(|track| track.has_weight) {
            for track in &mut self.tracks[..=last] {
                track.has_weight = true;
            }
        }
    }
}
