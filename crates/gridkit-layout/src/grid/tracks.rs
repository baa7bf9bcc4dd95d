//! Track list building and gutter expansion.
//!
//! A track list (`grid-template-columns` / `grid-template-rows`) is unrolled
//! into one [`GridTrack`] per track, auto-fill/auto-fit repetitions are
//! counted against the available space, and the implicit grid is padded with
//! `grid-auto-*` tracks. [`AxisTracks`] then interleaves gutters so the
//! sizing algorithm can treat them as fixed tracks addressed by index.

use gridkit_css::{GridTemplate, RepeatCount, TrackListEntry, TrackRepeat, TrackSize};
use tracing::{trace, warn};

use super::GridLayoutConfig;
use crate::{AvailableSize, GridDimension, LayoutError};

// ==================== Tracks ====================

/// A track (or gutter) during one sizing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTrack {
    /// Min track sizing function.
    pub min_sizing: TrackSize,
    /// Max track sizing function.
    pub max_sizing: TrackSize,
    pub base_size: f32,
    /// May be infinite until intrinsic sizes are resolved.
    pub growth_limit: f32,
    /// Synthetic gutter track.
    pub is_gap: bool,
    /// Produced by a `repeat(auto-fit, ...)`.
    pub is_auto_fit: bool,
    pub frozen: bool,
    pub planned_increase: f32,
    pub item_incurred_increase: f32,
    /// Largest leading border (left or top) of single-span items in this track.
    pub border_before: f32,
    /// Largest trailing border (right or bottom) of single-span items in this track.
    pub border_after: f32,
    pub has_definite_base_size: bool,
}

impl GridTrack {
    /// Create a track from its sizing function.
    pub fn new(size: &TrackSize) -> Self {
        Self {
            min_sizing: size.min_function().clone(),
            max_sizing: size.max_function().clone(),
            base_size: 0.0,
            growth_limit: 0.0,
            is_gap: false,
            is_auto_fit: false,
            frozen: false,
            planned_increase: 0.0,
            item_incurred_increase: 0.0,
            border_before: 0.0,
            border_after: 0.0,
            has_definite_base_size: false,
        }
    }

    /// Create a gutter of the given size.
    pub fn gap(size: f32) -> Self {
        Self {
            base_size: size,
            growth_limit: size,
            is_gap: true,
            has_definite_base_size: true,
            ..Self::new(&TrackSize::Px(size))
        }
    }

    fn auto_fit(size: &TrackSize) -> Self {
        Self {
            is_auto_fit: true,
            ..Self::new(size)
        }
    }

    /// Either sizing function is in fr units.
    pub fn crosses_flexible(&self) -> bool {
        self.min_sizing.is_fr() || self.max_sizing.is_fr()
    }

    /// Max sizing function is in fr units.
    pub fn is_flexible(&self) -> bool {
        self.max_sizing.is_fr()
    }

    pub fn flex_factor(&self) -> f32 {
        self.max_sizing.flex_factor()
    }

    /// Base size plus the borders accumulated from items.
    pub fn full_size(&self) -> f32 {
        self.base_size + self.border_before + self.border_after
    }

    /// Turn into a fixed 0px track.
    pub fn collapse(&mut self) {
        self.min_sizing = TrackSize::Px(0.0);
        self.max_sizing = TrackSize::Px(0.0);
        self.base_size = 0.0;
        self.growth_limit = 0.0;
    }
}

/// Resolve a fixed sizing function to pixels.
///
/// Percentages resolve against the definite available size, or zero.
pub fn resolve_definite_size(size: &TrackSize, available: AvailableSize) -> Result<f32, LayoutError> {
    match size {
        TrackSize::Px(px) => Ok(*px),
        TrackSize::Percent(pct) => Ok(pct / 100.0 * available.to_px_or_zero()),
        other => Err(LayoutError::IndefiniteTrackSize(format!("{:?}", other))),
    }
}

// ==================== Track List Builder ====================

/// Size of one repeated track when counting repetitions.
///
/// The max function is used if it alone is definite, the min if it alone is
/// definite, the smaller of the two if both are; otherwise the track counts
/// as zero.
fn repeated_track_size(size: &TrackSize, available: AvailableSize) -> Result<f32, LayoutError> {
    let min = size.min_function();
    let max = size.max_function();
    let px = match (min.is_definite(), max.is_definite()) {
        (false, true) => resolve_definite_size(max, available)?,
        (true, false) => resolve_definite_size(min, available)?,
        (true, true) => resolve_definite_size(min, available)?.min(resolve_definite_size(max, available)?),
        (false, false) => 0.0,
    };
    Ok(px)
}

fn first_auto_repeat(template: &GridTemplate) -> Option<&TrackRepeat> {
    template.entries.iter().find_map(|entry| match entry {
        TrackListEntry::Repeat(repeat) if repeat.count.is_auto() => Some(repeat),
        _ => None,
    })
}

/// Number of repetitions produced by the template's auto-fill/auto-fit entry.
///
/// Free space is the definite available size minus the non-repeated tracks
/// and their gutters. An indefinite axis yields a single repetition.
pub fn auto_repeat_count(
    template: &GridTemplate,
    available: AvailableSize,
    gap: f32,
    config: &GridLayoutConfig,
) -> Result<usize, LayoutError> {
    let Some(repeat) = first_auto_repeat(template) else {
        return Ok(0);
    };
    let Some(available_px) = available.definite() else {
        return Ok(1);
    };
    if repeat.tracks.is_empty() {
        return Ok(1);
    }

    let mut fixed_sum = 0.0;
    let mut fixed_count = 0usize;
    for entry in &template.entries {
        match entry {
            TrackListEntry::Track(track) => {
                fixed_sum += repeated_track_size(&track.size, available)?;
                fixed_count += 1;
            }
            TrackListEntry::Repeat(TrackRepeat {
                count: RepeatCount::Count(n),
                tracks,
            }) => {
                for track in tracks {
                    fixed_sum += *n as f32 * repeated_track_size(&track.size, available)?;
                }
                fixed_count += *n as usize * tracks.len();
            }
            TrackListEntry::Repeat(_) => {}
        }
    }

    let mut repeat_sum = 0.0;
    for track in &repeat.tracks {
        repeat_sum += repeated_track_size(&track.size, available)?;
    }

    let free_space = available_px - fixed_sum - gap * fixed_count as f32;
    let per_repetition = (repeat_sum + gap * repeat.tracks.len() as f32).max(config.auto_repeat_track_floor);
    let mut count = ((free_space + gap) / per_repetition).floor().max(1.0) as usize;

    let limit = (config.max_tracks_per_axis / repeat.tracks.len()).max(1);
    if count > limit {
        warn!(count, limit, "auto repetition count clamped");
        count = limit;
    }

    trace!(free_space, per_repetition, count, "auto repeat count");
    Ok(count)
}

/// Number of tracks the template produces.
pub fn count_of_tracks(
    template: &GridTemplate,
    available: AvailableSize,
    gap: f32,
    config: &GridLayoutConfig,
) -> Result<usize, LayoutError> {
    let repetitions = auto_repeat_count(template, available, gap, config)?;
    let count = template
        .entries
        .iter()
        .map(|entry| match entry {
            TrackListEntry::Track(_) => 1,
            TrackListEntry::Repeat(repeat) => match repeat.count {
                RepeatCount::Count(n) => n as usize * repeat.tracks.len(),
                RepeatCount::AutoFill | RepeatCount::AutoFit => repetitions * repeat.tracks.len(),
            },
        })
        .sum();
    Ok(count)
}

/// Unroll the template into explicit tracks.
pub fn build_explicit_tracks(
    template: &GridTemplate,
    dimension: GridDimension,
    available: AvailableSize,
    gap: f32,
    config: &GridLayoutConfig,
) -> Result<Vec<GridTrack>, LayoutError> {
    let count = count_of_tracks(template, available, gap, config)?;
    if count > config.max_tracks_per_axis {
        return Err(LayoutError::GridTooLarge {
            axis: dimension,
            requested: count,
            limit: config.max_tracks_per_axis,
        });
    }

    let repetitions = auto_repeat_count(template, available, gap, config)?;
    let mut tracks = Vec::with_capacity(count);
    for entry in &template.entries {
        match entry {
            TrackListEntry::Track(track) => tracks.push(GridTrack::new(&track.size)),
            TrackListEntry::Repeat(repeat) => {
                let times = match repeat.count {
                    RepeatCount::Count(n) => n as usize,
                    RepeatCount::AutoFill | RepeatCount::AutoFit => repetitions,
                };
                for _ in 0..times {
                    for track in &repeat.tracks {
                        if repeat.count == RepeatCount::AutoFit {
                            tracks.push(GridTrack::auto_fit(&track.size));
                        } else {
                            tracks.push(GridTrack::new(&track.size));
                        }
                    }
                }
            }
        }
    }

    trace!(%dimension, count = tracks.len(), "explicit tracks");
    Ok(tracks)
}

/// Pad with implicit tracks up to `count`.
pub fn pad_implicit_tracks(tracks: &mut Vec<GridTrack>, count: usize, auto_size: &TrackSize) {
    while tracks.len() < count {
        tracks.push(GridTrack::new(auto_size));
    }
}

// ==================== Gap Expansion ====================

/// The tracks of one axis with gutters interleaved.
///
/// Real track `i` lives at arena index `2 * i` when the axis has a gutter,
/// `i` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTracks {
    pub dimension: GridDimension,
    arena: Vec<GridTrack>,
    gap: Option<f32>,
}

impl AxisTracks {
    pub fn new(dimension: GridDimension, tracks: Vec<GridTrack>, gap: Option<f32>) -> Self {
        let arena = match gap {
            Some(size) => {
                let count = tracks.len();
                let mut arena = Vec::with_capacity(count * 2);
                for (index, track) in tracks.into_iter().enumerate() {
                    arena.push(track);
                    if index + 1 != count {
                        arena.push(GridTrack::gap(size));
                    }
                }
                arena
            }
            None => tracks,
        };
        Self {
            dimension,
            arena,
            gap,
        }
    }

    pub fn has_gap(&self) -> bool {
        self.gap.is_some()
    }

    pub fn gap(&self) -> f32 {
        self.gap.unwrap_or(0.0)
    }

    pub fn arena(&self) -> &[GridTrack] {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut [GridTrack] {
        &mut self.arena
    }

    /// Number of real tracks.
    pub fn track_count(&self) -> usize {
        if self.has_gap() {
            self.arena.len().div_ceil(2)
        } else {
            self.arena.len()
        }
    }

    /// Gap-adjusted index of a real track.
    pub fn arena_index(&self, track: usize) -> usize {
        if self.has_gap() {
            track * 2
        } else {
            track
        }
    }

    /// Exclusive arena end of a span starting at real track `track`.
    ///
    /// Covers the spanned tracks and the gutters between them.
    pub fn span_end(&self, track: usize, span: usize) -> usize {
        let start = self.arena_index(track);
        let extent = if self.has_gap() { span * 2 - 1 } else { span };
        (start + extent.max(1)).min(self.arena.len())
    }

    pub fn track(&self, track: usize) -> &GridTrack {
        &self.arena[self.arena_index(track)]
    }

    pub fn track_mut(&mut self, track: usize) -> &mut GridTrack {
        let index = self.arena_index(track);
        &mut self.arena[index]
    }

    /// Arena indices of real tracks.
    pub fn real_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.arena
            .iter()
            .enumerate()
            .filter(|(_, track)| !track.is_gap)
            .map(|(index, _)| index)
    }

    pub fn sum_base_sizes(&self, start: usize, end: usize) -> f32 {
        self.arena[start..end].iter().map(|t| t.base_size).sum()
    }

    pub fn sum_full_sizes(&self, start: usize, end: usize) -> f32 {
        self.arena[start..end].iter().map(GridTrack::full_size).sum()
    }

    /// Collapse an empty auto-fit track and one adjacent gutter.
    pub fn collapse_track(&mut self, track: usize) {
        let index = self.arena_index(track);
        self.arena[index].collapse();
        if self.has_gap() {
            if index + 1 < self.arena.len() {
                self.arena[index + 1].collapse();
            } else if index > 0 {
                self.arena[index - 1].collapse();
            }
        }
    }

    /// Real tracks, gutters dropped.
    pub fn into_tracks(self) -> Vec<GridTrack> {
        self.arena.into_iter().filter(|track| !track.is_gap).collect()
    }
}
