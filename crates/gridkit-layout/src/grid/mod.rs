//! # CSS Grid Layout
//!
//! Grid formatting context for a single container.
//!
//! ## Pipeline
//!
//! 1. **Placement**: every in-flow child gets a grid area; the occupation grid
//!    grows to hold implicit tracks.
//! 2. **Track lists**: templates are unrolled, auto repetitions counted, the
//!    implicit grid padded with `grid-auto-*` tracks and gutters interleaved.
//! 3. **Track sizing**: columns first, then rows.
//! 4. **Compositing**: children get their content boxes and are laid out.
//!
//! All state lives for one call to [`layout_grid_container`]; nothing is kept
//! between passes.

mod areas;
mod compositor;
mod occupation;
mod placement;
mod sizing;
mod tracks;

pub use areas::{build_named_areas, find_area, NamedGridArea};
pub use occupation::OccupationGrid;
pub use placement::GridItem;
pub use tracks::{auto_repeat_count, count_of_tracks, AxisTracks, GridTrack};

use gridkit_css::{ComputedStyle, Length};
use tracing::debug;

use crate::intrinsic_cache::IntrinsicCache;
use crate::{AvailableSize, AvailableSpace, ChildLayout, GridDimension, LayoutBox, LayoutError, Rect};
use compositor::composite_grid_items;
use placement::place_grid_items;
use sizing::{run_track_sizing, SizingContext};
use tracks::{build_explicit_tracks, pad_implicit_tracks};

// ==================== Configuration ====================

/// Limits and switches for a grid layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayoutConfig {
    /// Hard cap on tracks per axis, explicit and implicit.
    pub max_tracks_per_axis: usize,
    /// Iteration cap for every equal-share distribution loop.
    pub max_distribution_iterations: usize,
    /// Remaining space below this is treated as distributed.
    pub distribution_epsilon: f32,
    /// Floor on the per-repetition size when counting auto repetitions.
    pub auto_repeat_track_floor: f32,
    /// Measure row contributions against the item's resolved column span
    /// instead of the container's available width.
    pub measure_rows_against_columns: bool,
}

impl Default for GridLayoutConfig {
    fn default() -> Self {
        Self {
            max_tracks_per_axis: 10_000,
            max_distribution_iterations: 1_000,
            distribution_epsilon: 0.001,
            auto_repeat_track_floor: 1.0,
            measure_rows_against_columns: false,
        }
    }
}

impl GridLayoutConfig {
    pub fn with_max_tracks_per_axis(mut self, limit: usize) -> Self {
        self.max_tracks_per_axis = limit;
        self
    }

    pub fn with_max_distribution_iterations(mut self, limit: usize) -> Self {
        self.max_distribution_iterations = limit;
        self
    }

    pub fn with_distribution_epsilon(mut self, epsilon: f32) -> Self {
        self.distribution_epsilon = epsilon;
        self
    }

    pub fn with_auto_repeat_track_floor(mut self, floor: f32) -> Self {
        self.auto_repeat_track_floor = floor;
        self
    }

    pub fn with_measure_rows_against_columns(mut self, enabled: bool) -> Self {
        self.measure_rows_against_columns = enabled;
        self
    }
}

// ==================== Grid Layout ====================

/// Result of laying out one grid container.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Sized column tracks, gutters excluded.
    pub columns: Vec<GridTrack>,
    /// Sized row tracks, gutters excluded.
    pub rows: Vec<GridTrack>,
    pub column_gap: f32,
    pub row_gap: f32,
    /// Placed items, in placement order.
    pub items: Vec<GridItem>,
    /// Grid area of each entry in `items`, relative to the container's content box.
    pub item_areas: Vec<Option<Rect>>,
    pub explicit_columns: usize,
    pub explicit_rows: usize,
    pub occupation: OccupationGrid,
    pub named_areas: Vec<NamedGridArea>,
    /// Content width: the definite available width, or the sum of column extents.
    pub content_width: f32,
    /// Content height: the definite available height, or the sum of row extents.
    pub content_height: f32,
    /// Sum of row extents regardless of the available height.
    pub automatic_content_height: f32,
}

impl GridLayout {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_sizes(&self) -> Vec<f32> {
        self.columns.iter().map(|t| t.base_size).collect()
    }

    pub fn row_sizes(&self) -> Vec<f32> {
        self.rows.iter().map(|t| t.base_size).collect()
    }

    /// The placed item for a child index.
    pub fn item_for_box(&self, box_index: usize) -> Option<&GridItem> {
        self.items.iter().find(|item| item.box_index == box_index)
    }

    /// Grid area of a child, if it was placed and not skipped.
    pub fn area_for_box(&self, box_index: usize) -> Option<Rect> {
        let position = self.items.iter().position(|item| item.box_index == box_index)?;
        self.item_areas[position]
    }
}

// ==================== Layout Algorithm ====================

/// `None` for `auto` (no gutter).
fn resolve_gap(style: &ComputedStyle, gap: &Length, available: AvailableSize) -> Option<f32> {
    if gap.is_auto() {
        return None;
    }
    Some(style.resolve_length(gap, available.to_px_or_zero()).max(0.0))
}

/// Lay out a grid container and its items with the default configuration.
pub fn layout_grid_container<L: ChildLayout + ?Sized>(
    container: &mut LayoutBox,
    available_space: AvailableSpace,
    child_layout: &mut L,
) -> Result<GridLayout, LayoutError> {
    layout_grid_container_with_config(container, available_space, child_layout, &GridLayoutConfig::default())
}

/// Lay out a grid container and its items.
pub fn layout_grid_container_with_config<L: ChildLayout + ?Sized>(
    container: &mut LayoutBox,
    available_space: AvailableSpace,
    child_layout: &mut L,
    config: &GridLayoutConfig,
) -> Result<GridLayout, LayoutError> {
    if !container.style.display.is_grid() {
        return Err(LayoutError::LayoutFailed(format!(
            "{:?} box is not a grid container",
            container.style.display
        )));
    }

    debug!(
        width = ?available_space.width,
        height = ?available_space.height,
        children = container.children.len(),
        "Grid layout"
    );

    let style = &container.style;
    let column_gap = resolve_gap(style, &style.column_gap, available_space.width);
    let row_gap = resolve_gap(style, &style.row_gap, available_space.height);

    let (area_columns, area_rows) = style
        .grid_template_areas
        .as_ref()
        .map_or((0, 0), |areas| (areas.column_count(), areas.row_count()));
    let explicit_columns = count_of_tracks(
        &style.grid_template_columns,
        available_space.width,
        column_gap.unwrap_or(0.0),
        config,
    )?
    .max(area_columns);
    let explicit_rows = count_of_tracks(
        &style.grid_template_rows,
        available_space.height,
        row_gap.unwrap_or(0.0),
        config,
    )?
    .max(area_rows);

    let placement = place_grid_items(container, explicit_columns, explicit_rows, config)?;

    let mut column_tracks = build_explicit_tracks(
        &style.grid_template_columns,
        GridDimension::Column,
        available_space.width,
        column_gap.unwrap_or(0.0),
        config,
    )?;
    pad_implicit_tracks(&mut column_tracks, placement.occupation.column_count(), &style.grid_auto_columns);
    let mut row_tracks = build_explicit_tracks(
        &style.grid_template_rows,
        GridDimension::Row,
        available_space.height,
        row_gap.unwrap_or(0.0),
        config,
    )?;
    pad_implicit_tracks(&mut row_tracks, placement.occupation.row_count(), &style.grid_auto_rows);

    let mut columns = AxisTracks::new(GridDimension::Column, column_tracks, column_gap);
    let mut rows = AxisTracks::new(GridDimension::Row, row_tracks, row_gap);

    let mut cache = IntrinsicCache::new();
    run_track_sizing(
        &mut SizingContext {
            container,
            items: &placement.items,
            child_layout: &mut *child_layout,
            cache: &mut cache,
            available: available_space,
            config,
            columns: None,
        },
        &mut columns,
    )?;
    run_track_sizing(
        &mut SizingContext {
            container,
            items: &placement.items,
            child_layout: &mut *child_layout,
            cache: &mut cache,
            available: available_space,
            config,
            columns: Some(&columns),
        },
        &mut rows,
    )?;

    let composition = composite_grid_items(
        container,
        &placement.items,
        &columns,
        &rows,
        available_space,
        child_layout,
    )?;
    container.dimensions.content.width = composition.content_width;
    container.dimensions.content.height = composition.content_height;

    let stats = cache.stats();
    debug!(
        columns = columns.track_count(),
        rows = rows.track_count(),
        items = placement.items.len(),
        cache_lookups = stats.lookups,
        cache_hits = stats.hits,
        "Grid layout complete"
    );

    Ok(GridLayout {
        columns: columns.into_tracks(),
        rows: rows.into_tracks(),
        column_gap: column_gap.unwrap_or(0.0),
        row_gap: row_gap.unwrap_or(0.0),
        items: placement.items,
        item_areas: composition.item_areas,
        explicit_columns,
        explicit_rows,
        occupation: placement.occupation,
        named_areas: placement.named_areas,
        content_width: composition.content_width,
        content_height: composition.content_height,
        automatic_content_height: composition.automatic_content_height,
    })
}
