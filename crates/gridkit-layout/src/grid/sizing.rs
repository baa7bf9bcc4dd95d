//! Track sizing algorithm.
//!
//! Runs once per axis over an [`AxisTracks`] arena, in five stages:
//!
//! 1. initialize base sizes and growth limits from the sizing functions
//! 2. resolve intrinsic track sizes from item contributions
//! 3. maximize tracks up to their growth limits
//! 4. expand flexible tracks
//! 5. stretch `auto` tracks
//!
//! Gutters live in the arena as fixed tracks, so every sum over a span of
//! arena indices already includes them. Items that start before the first
//! grid line are left out of sizing.

use std::ops::Range;

use gridkit_css::{ComputedStyle, Length, TrackSize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::placement::GridItem;
use super::tracks::{resolve_definite_size, AxisTracks};
use super::GridLayoutConfig;
use crate::intrinsic_cache::{CacheKey, IntrinsicCache, IntrinsicSizingMode};
use crate::{AvailableSize, AvailableSpace, ChildLayout, GridDimension, LayoutBox, LayoutError};

type TrackIndices = SmallVec<[usize; 8]>;

/// Everything a sizing pass reads besides the tracks themselves.
pub(crate) struct SizingContext<'a, L: ChildLayout + ?Sized> {
    pub container: &'a LayoutBox,
    pub items: &'a [GridItem],
    pub child_layout: &'a mut L,
    pub cache: &'a mut IntrinsicCache,
    pub available: AvailableSpace,
    pub config: &'a GridLayoutConfig,
    /// Sized columns, present while sizing rows.
    pub columns: Option<&'a AxisTracks>,
}

fn preferred_size(style: &ComputedStyle, dimension: GridDimension) -> &Length {
    match dimension {
        GridDimension::Column => &style.width,
        GridDimension::Row => &style.height,
    }
}

fn min_size(style: &ComputedStyle, dimension: GridDimension) -> &Length {
    match dimension {
        GridDimension::Column => &style.min_width,
        GridDimension::Row => &style.min_height,
    }
}

fn max_size(style: &ComputedStyle, dimension: GridDimension) -> &Length {
    match dimension {
        GridDimension::Column => &style.max_width,
        GridDimension::Row => &style.max_height,
    }
}

/// Clamp a content size by a definite `max-width` / `max-height`.
fn clamp_by_max_size(style: &ComputedStyle, dimension: GridDimension, size: f32) -> f32 {
    let max = max_size(style, dimension);
    if max.is_absolute() {
        size.min(style.resolve_length(max, 0.0))
    } else {
        size
    }
}

impl<'a, L: ChildLayout + ?Sized> SizingContext<'a, L> {
    fn style(&self, item: &GridItem) -> &'a ComputedStyle {
        let container: &'a LayoutBox = self.container;
        &container.children[item.box_index].style
    }

    /// Border added to the outer size along `dimension`.
    fn outer_border(&self, item: &GridItem, dimension: GridDimension) -> f32 {
        match dimension {
            GridDimension::Column => self.container.children[item.box_index]
                .border_widths()
                .horizontal(),
            GridDimension::Row => 0.0,
        }
    }

    /// Width that row measurements are taken against.
    fn measure_width(&self, item: &GridItem) -> AvailableSize {
        if self.config.measure_rows_against_columns {
            if let Some(columns) = self.columns {
                if item.column_start >= 0 {
                    let first = item.column_start as usize;
                    let start = columns.arena_index(first);
                    let end = columns.span_end(first, item.column_span as usize);
                    return AvailableSize::Definite(columns.sum_base_sizes(start, end));
                }
            }
        }
        self.available.width
    }

    fn content_size(&mut self, item: &GridItem, dimension: GridDimension, mode: IntrinsicSizingMode) -> f32 {
        let container = self.container;
        let child = &container.children[item.box_index];
        match dimension {
            GridDimension::Column => {
                let layout = &mut *self.child_layout;
                self.cache
                    .get_or_measure(CacheKey::width(item.box_index, mode), || match mode {
                        IntrinsicSizingMode::MinContent => layout.min_content_width(child),
                        IntrinsicSizingMode::MaxContent => layout.max_content_width(child),
                    })
            }
            GridDimension::Row => {
                let available_width = self.measure_width(item);
                let layout = &mut *self.child_layout;
                let key = CacheKey::height(item.box_index, mode, available_width);
                self.cache.get_or_measure(key, || match mode {
                    IntrinsicSizingMode::MinContent => layout.min_content_height(child, available_width),
                    IntrinsicSizingMode::MaxContent => layout.max_content_height(child, available_width),
                })
            }
        }
    }

    /// Min-content or max-content contribution (outer size).
    fn content_contribution(&mut self, item: &GridItem, dimension: GridDimension, mode: IntrinsicSizingMode) -> f32 {
        let style = self.style(item);
        let preferred = preferred_size(style, dimension);
        let size = if preferred.is_absolute() {
            style.resolve_length(preferred, 0.0)
        } else {
            self.content_size(item, dimension, mode)
        };
        clamp_by_max_size(style, dimension, size) + self.outer_border(item, dimension)
    }

    /// Content-based minimum size, applied when `min-width`/`min-height` is auto.
    fn automatic_minimum_size(&mut self, item: &GridItem, tracks: &AxisTracks) -> f32 {
        let dimension = tracks.dimension;
        let style = self.style(item);
        let start = item.start(dimension) as usize;
        let spans_auto_minimum = (start..start + item.span(dimension))
            .filter(|&track| track < tracks.track_count())
            .any(|track| tracks.track(track).min_sizing.is_auto());
        if !spans_auto_minimum || style.is_scroll_container() {
            return 0.0;
        }
        let size = self.content_size(item, dimension, IntrinsicSizingMode::MinContent);
        clamp_by_max_size(style, dimension, size)
    }

    /// Outer size the item needs at minimum.
    fn minimum_contribution(&mut self, item: &GridItem, tracks: &AxisTracks) -> f32 {
        let dimension = tracks.dimension;
        let style = self.style(item);
        if preferred_size(style, dimension).is_absolute() {
            return self.content_contribution(item, dimension, IntrinsicSizingMode::MinContent);
        }

        let min = min_size(style, dimension);
        let size = if min.is_auto() {
            self.automatic_minimum_size(item, tracks)
        } else {
            let start = item.start(dimension) as usize;
            let basis = if start < tracks.track_count() {
                tracks.track(start).base_size
            } else {
                0.0
            };
            style.resolve_length(min, basis)
        };
        size + self.outer_border(item, dimension)
    }

    /// Content contribution limited by a fixed max sizing function, floored
    /// by the minimum contribution.
    fn limited_contribution(&mut self, item: &GridItem, tracks: &AxisTracks, mode: IntrinsicSizingMode) -> f32 {
        let dimension = tracks.dimension;
        let mut contribution = self.content_contribution(item, dimension, mode);
        if item.span(dimension) == 1 {
            let max_sizing = &tracks.track(item.start(dimension) as usize).max_sizing;
            if max_sizing.is_definite() {
                if let Ok(limit) = resolve_definite_size(max_sizing, self.available.get(dimension)) {
                    contribution = contribution.min(limit);
                }
            }
        }
        contribution.max(self.minimum_contribution(item, tracks))
    }

    fn stretches_auto_tracks(&self, dimension: GridDimension) -> bool {
        let style = &self.container.style;
        match dimension {
            GridDimension::Column => style.justify_content.stretches_auto_tracks(),
            GridDimension::Row => style.align_content.stretches_auto_tracks(),
        }
    }
}

fn max_over(items: &[GridItem], mut contribution: impl FnMut(&GridItem) -> f32) -> f32 {
    items.iter().map(|item| contribution(item)).fold(0.0, f32::max)
}

fn check_growth_limits(tracks: &AxisTracks, stage: &str) {
    for (index, track) in tracks.arena().iter().enumerate() {
        debug_assert!(
            track.growth_limit >= track.base_size,
            "{stage}: track {index} has growth limit {} below base size {}",
            track.growth_limit,
            track.base_size
        );
    }
}

/// Size one axis.
pub(crate) fn run_track_sizing<L: ChildLayout + ?Sized>(
    ctx: &mut SizingContext<'_, L>,
    tracks: &mut AxisTracks,
) -> Result<(), LayoutError> {
    let dimension = tracks.dimension;
    let available = ctx.available.get(dimension);

    initialize_track_sizes(tracks, available)?;
    check_growth_limits(tracks, "initialize");

    resolve_intrinsic_track_sizes(ctx, tracks);
    check_growth_limits(tracks, "intrinsic");

    maximize_tracks(tracks, available, ctx.config);
    check_growth_limits(tracks, "maximize");

    expand_flexible_tracks(tracks, available);
    check_growth_limits(tracks, "flexible");

    if ctx.stretches_auto_tracks(dimension) {
        stretch_auto_tracks(tracks, available);
        check_growth_limits(tracks, "stretch");
    }

    debug!(
        %dimension,
        ?available,
        sizes = ?tracks.arena().iter().map(|t| t.base_size).collect::<Vec<_>>(),
        "sized grid tracks"
    );
    Ok(())
}

// ==================== Stage 1: Initialize ====================

fn initialize_track_sizes(tracks: &mut AxisTracks, available: AvailableSize) -> Result<(), LayoutError> {
    for track in tracks.arena_mut().iter_mut().filter(|t| !t.is_gap) {
        track.base_size = if track.min_sizing.is_definite() {
            resolve_definite_size(&track.min_sizing, available)?
        } else {
            0.0
        };
        track.growth_limit = if track.max_sizing.is_definite() {
            resolve_definite_size(&track.max_sizing, available)?
        } else {
            f32::INFINITY
        };
        if track.growth_limit < track.base_size {
            track.growth_limit = track.base_size;
        }
        track.frozen = false;
        track.planned_increase = 0.0;
        track.item_incurred_increase = 0.0;
        track.border_before = 0.0;
        track.border_after = 0.0;
        track.has_definite_base_size = false;
    }
    Ok(())
}

// ==================== Stage 2: Intrinsic Sizes ====================

fn spanned_tracks(tracks: &AxisTracks, item: &GridItem) -> TrackIndices {
    let dimension = tracks.dimension;
    let start = item.start(dimension) as usize;
    (start..start + item.span(dimension))
        .filter(|&track| track < tracks.track_count())
        .map(|track| tracks.arena_index(track))
        .collect()
}

fn spanned_range(tracks: &AxisTracks, item: &GridItem) -> Range<usize> {
    let dimension = tracks.dimension;
    let start = item.start(dimension) as usize;
    tracks.arena_index(start)..tracks.span_end(start, item.span(dimension))
}

fn resolve_intrinsic_track_sizes<L: ChildLayout + ?Sized>(ctx: &mut SizingContext<'_, L>, tracks: &mut AxisTracks) {
    let dimension = tracks.dimension;
    let available = ctx.available.get(dimension);
    let items: Vec<GridItem> = ctx.items.iter().copied().filter(|item| !item.is_clipped()).collect();

    size_single_span_items(ctx, tracks, &items, available);
    collapse_empty_auto_fit_tracks(tracks, ctx.items);

    let max_span = items.iter().map(|item| item.span(dimension)).max().unwrap_or(1);
    for span in 2..=max_span {
        reset_planned_increases(tracks);
        for item in items.iter().filter(|item| item.span(dimension) == span) {
            let spanned = spanned_tracks(tracks, item);
            if spanned.iter().any(|&index| tracks.arena()[index].crosses_flexible()) {
                continue;
            }
            let affected: TrackIndices = spanned
                .iter()
                .copied()
                .filter(|&index| tracks.arena()[index].min_sizing.is_intrinsic())
                .collect();
            if affected.is_empty() {
                continue;
            }
            let contribution = ctx.minimum_contribution(item, tracks);
            let range = spanned_range(tracks, item);
            distribute_extra_space(tracks, &affected, range, contribution, ctx.config);
        }
        apply_planned_increases(tracks);
    }

    reset_planned_increases(tracks);
    for item in &items {
        let spanned = spanned_tracks(tracks, item);
        if !spanned.iter().any(|&index| tracks.arena()[index].crosses_flexible()) {
            continue;
        }
        let affected: TrackIndices = spanned
            .iter()
            .copied()
            .filter(|&index| tracks.arena()[index].is_flexible())
            .collect();
        if affected.is_empty() {
            continue;
        }
        let contribution = ctx.limited_contribution(item, tracks, IntrinsicSizingMode::MinContent);
        let range = spanned_range(tracks, item);
        distribute_extra_space(tracks, &affected, range, contribution, ctx.config);
    }
    apply_planned_increases(tracks);

    for track in tracks.arena_mut() {
        if track.growth_limit.is_infinite() {
            track.growth_limit = track.base_size;
        }
        track.has_definite_base_size = true;
    }
}

fn size_single_span_items<L: ChildLayout + ?Sized>(
    ctx: &mut SizingContext<'_, L>,
    tracks: &mut AxisTracks,
    items: &[GridItem],
    available: AvailableSize,
) {
    let dimension = tracks.dimension;
    for track_index in 0..tracks.track_count() {
        let members: SmallVec<[GridItem; 4]> = items
            .iter()
            .copied()
            .filter(|item| item.span(dimension) == 1 && item.start(dimension) as usize == track_index)
            .collect();
        if members.is_empty() {
            continue;
        }

        let (mut border_before, mut border_after) = (0.0f32, 0.0f32);
        for item in &members {
            let borders = ctx.container.children[item.box_index].border_widths();
            let (before, after) = match dimension {
                GridDimension::Column => (borders.left, borders.right),
                GridDimension::Row => (borders.top, borders.bottom),
            };
            border_before = border_before.max(before);
            border_after = border_after.max(after);
        }

        if tracks.track(track_index).crosses_flexible() {
            let track = tracks.track_mut(track_index);
            track.border_before = border_before;
            track.border_after = border_after;
            continue;
        }
        let min_sizing = tracks.track(track_index).min_sizing.clone();
        let max_sizing = tracks.track(track_index).max_sizing.clone();
        let axis: &AxisTracks = tracks;

        let base_size = match min_sizing {
            TrackSize::MinContent => Some(max_over(&members, |item| {
                ctx.content_contribution(item, dimension, IntrinsicSizingMode::MinContent)
            })),
            TrackSize::MaxContent => Some(max_over(&members, |item| {
                ctx.content_contribution(item, dimension, IntrinsicSizingMode::MaxContent)
            })),
            TrackSize::Auto => Some(match available {
                AvailableSize::MinContent => max_over(&members, |item| {
                    ctx.limited_contribution(item, axis, IntrinsicSizingMode::MinContent)
                }),
                AvailableSize::MaxContent => max_over(&members, |item| {
                    ctx.limited_contribution(item, axis, IntrinsicSizingMode::MaxContent)
                }),
                AvailableSize::Definite(_) => {
                    max_over(&members, |item| ctx.minimum_contribution(item, axis))
                }
            }),
            _ => None,
        };

        let growth_limit = match max_sizing {
            TrackSize::MinContent => Some(max_over(&members, |item| {
                ctx.content_contribution(item, dimension, IntrinsicSizingMode::MinContent)
            })),
            TrackSize::MaxContent | TrackSize::Auto => Some(max_over(&members, |item| {
                ctx.content_contribution(item, dimension, IntrinsicSizingMode::MaxContent)
            })),
            _ => None,
        };

        let track = tracks.track_mut(track_index);
        track.border_before = border_before;
        track.border_after = border_after;
        if let Some(size) = base_size {
            track.base_size = size;
        }
        if let Some(limit) = growth_limit {
            track.growth_limit = limit;
        }
        if track.growth_limit < track.base_size {
            track.growth_limit = track.base_size;
        }
        trace!(
            %dimension,
            track = track_index,
            base_size = track.base_size,
            growth_limit = track.growth_limit,
            "sized track for single-span items"
        );
    }
}

fn collapse_empty_auto_fit_tracks(tracks: &mut AxisTracks, items: &[GridItem]) {
    let dimension = tracks.dimension;
    for track_index in 0..tracks.track_count() {
        if !tracks.track(track_index).is_auto_fit {
            continue;
        }
        if items.iter().any(|item| item.covers(dimension, track_index)) {
            continue;
        }
        tracks.collapse_track(track_index);
        trace!(%dimension, track = track_index, "collapsed empty auto-fit track");
    }
}

fn reset_planned_increases(tracks: &mut AxisTracks) {
    for track in tracks.arena_mut() {
        track.planned_increase = 0.0;
    }
}

fn apply_planned_increases(tracks: &mut AxisTracks) {
    for track in tracks.arena_mut().iter_mut().filter(|t| !t.is_gap) {
        track.base_size += track.planned_increase;
        track.planned_increase = 0.0;
        if track.growth_limit < track.base_size {
            track.growth_limit = track.base_size;
        }
    }
}

/// Spread what `size` needs beyond the spanned base sizes over `affected`.
///
/// Shares are split equally among unfrozen tracks; a track freezes once its
/// share reaches its growth limit. Space left once every track is frozen is
/// dropped.
fn distribute_extra_space(
    tracks: &mut AxisTracks,
    affected: &[usize],
    spanned: Range<usize>,
    size: f32,
    config: &GridLayoutConfig,
) {
    let used = tracks.sum_base_sizes(spanned.start, spanned.end);
    let mut extra = size - used;
    if extra <= config.distribution_epsilon {
        return;
    }

    let arena = tracks.arena_mut();
    for &index in affected {
        arena[index].item_incurred_increase = 0.0;
        arena[index].frozen = false;
    }

    let mut iterations = 0;
    while extra > config.distribution_epsilon {
        if iterations >= config.max_distribution_iterations {
            warn!(extra, "stopped distributing extra space at iteration cap");
            break;
        }
        iterations += 1;

        let unfrozen: TrackIndices = affected.iter().copied().filter(|&index| !arena[index].frozen).collect();
        if unfrozen.is_empty() {
            break;
        }
        let share = extra / unfrozen.len() as f32;
        for index in unfrozen {
            let track = &mut arena[index];
            let room = track.growth_limit - track.base_size - track.item_incurred_increase;
            if share >= room {
                let room = room.max(0.0);
                track.item_incurred_increase += room;
                track.frozen = true;
                extra -= room;
            } else {
                track.item_incurred_increase += share;
                extra -= share;
            }
        }
    }

    if extra > config.distribution_epsilon {
        trace!(extra, "spanned tracks frozen at their growth limits");
    }

    for &index in affected {
        let track = &mut arena[index];
        track.planned_increase = track.planned_increase.max(track.item_incurred_increase);
        track.item_incurred_increase = 0.0;
        track.frozen = false;
    }
}

// ==================== Stage 3: Maximize ====================

fn free_space(tracks: &AxisTracks, available: AvailableSize) -> f32 {
    match available {
        AvailableSize::Definite(size) => (size - tracks.sum_base_sizes(0, tracks.arena().len())).max(0.0),
        AvailableSize::MaxContent => f32::INFINITY,
        AvailableSize::MinContent => 0.0,
    }
}

fn maximize_tracks(tracks: &mut AxisTracks, available: AvailableSize, config: &GridLayoutConfig) {
    let epsilon = config.distribution_epsilon;
    let mut free = free_space(tracks, available);
    let mut iterations = 0;

    while free > epsilon {
        if iterations >= config.max_distribution_iterations {
            warn!(free, "stopped maximizing tracks at iteration cap");
            break;
        }
        iterations += 1;

        let growable: TrackIndices = tracks
            .real_indices()
            .filter(|&index| {
                let track = &tracks.arena()[index];
                track.growth_limit - track.base_size > epsilon
            })
            .collect();
        if growable.is_empty() {
            break;
        }

        let share = free / growable.len() as f32;
        let arena = tracks.arena_mut();
        for index in growable {
            let track = &mut arena[index];
            track.base_size = (track.base_size + share).min(track.growth_limit);
        }

        if free.is_infinite() {
            break;
        }
        let remaining = free_space(tracks, available);
        if remaining >= free {
            break;
        }
        free = remaining;
    }
}

// ==================== Stage 4: Flexible Tracks ====================

/// Size of one fr unit for a definite axis.
///
/// Leftover space after the non-flexible tracks and gutters, split by the
/// number of flexible tracks (at least one). Flex factors scale the result
/// per track but do not weight the split.
fn find_fr_size(tracks: &AxisTracks, space: f32) -> f32 {
    let (leftover, flexible_count) = tracks
        .arena()
        .iter()
        .fold((space, 0usize), |(leftover, count), track| {
            if !track.is_gap && track.is_flexible() {
                (leftover, count + 1)
            } else {
                (leftover - track.base_size, count)
            }
        });
    leftover / flexible_count.max(1) as f32
}

fn expand_flexible_tracks(tracks: &mut AxisTracks, available: AvailableSize) {
    if !tracks.arena().iter().any(|t| !t.is_gap && t.is_flexible()) {
        return;
    }

    let fraction = match available {
        AvailableSize::Definite(size) if free_space(tracks, available) > 0.0 => find_fr_size(tracks, size),
        _ => 0.0,
    };
    trace!(dimension = %tracks.dimension, fraction, "flex fraction");

    for track in tracks.arena_mut().iter_mut().filter(|t| !t.is_gap && t.is_flexible()) {
        let size = track.flex_factor() * fraction;
        if size > track.base_size {
            track.base_size = size;
            track.growth_limit = track.growth_limit.max(size);
        }
    }
}

// ==================== Stage 5: Stretch Auto Tracks ====================

fn stretch_auto_tracks(tracks: &mut AxisTracks, available: AvailableSize) {
    let Some(size) = available.definite() else {
        return;
    };
    let auto_tracks: TrackIndices = tracks
        .real_indices()
        .filter(|&index| tracks.arena()[index].max_sizing.is_auto())
        .collect();
    if auto_tracks.is_empty() {
        return;
    }

    let used: f32 = tracks
        .arena()
        .iter()
        .enumerate()
        .filter(|(index, _)| !auto_tracks.contains(index))
        .map(|(_, track)| track.base_size)
        .sum();
    let share = (size - used) / auto_tracks.len() as f32;
    if share <= 0.0 {
        return;
    }

    let arena = tracks.arena_mut();
    for index in auto_tracks {
        let track = &mut arena[index];
        track.base_size = track.base_size.max(share);
        track.growth_limit = track.growth_limit.max(track.base_size);
    }
}
