//! Grid item placement.
//!
//! Items are placed in four passes, each one only seeing the occupancy left
//! by the passes before it:
//!
//! 1. items with a definite position in both axes
//! 2. items with a definite row position
//! 3. items with a definite column position (cursor based)
//! 4. fully automatic items (row-major scan from the cursor)
//!
//! Line numbers are resolved to 0-based line indices. Spans are at least 1.

use gridkit_css::{ComputedStyle, GridLine, GridTemplate};
use tracing::{trace, warn};

use super::areas::{build_named_areas, NamedGridArea};
use super::occupation::OccupationGrid;
use super::GridLayoutConfig;
use crate::{GridDimension, LayoutBox, LayoutError};

/// A placed grid item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridItem {
    /// Index of the box in the container's child list.
    pub box_index: usize,
    /// 0-based start line. Negative only when an explicitly placed item
    /// starts before the first line.
    pub row_start: i32,
    pub row_span: u32,
    /// 0-based start line, see `row_start`.
    pub column_start: i32,
    pub column_span: u32,
}

impl GridItem {
    pub fn start(&self, dimension: GridDimension) -> i32 {
        match dimension {
            GridDimension::Column => self.column_start,
            GridDimension::Row => self.row_start,
        }
    }

    pub fn span(&self, dimension: GridDimension) -> usize {
        match dimension {
            GridDimension::Column => self.column_span as usize,
            GridDimension::Row => self.row_span as usize,
        }
    }

    /// Exclusive end line.
    pub fn end(&self, dimension: GridDimension) -> i32 {
        self.start(dimension) + self.span(dimension) as i32
    }

    /// 1-based column start line, as written in `grid-column-start`.
    pub fn column_start_line(&self) -> i32 {
        self.column_start + 1
    }

    /// 1-based row start line.
    pub fn row_start_line(&self) -> i32 {
        self.row_start + 1
    }

    /// Starts before the first grid line in either axis.
    pub fn is_clipped(&self) -> bool {
        self.row_start < 0 || self.column_start < 0
    }

    /// Whether the item's span covers `track`.
    pub fn covers(&self, dimension: GridDimension, track: usize) -> bool {
        let track = track as i32;
        self.start(dimension) <= track && track < self.end(dimension)
    }
}

/// Output of the placement passes.
#[derive(Debug, Clone)]
pub(crate) struct Placement {
    pub items: Vec<GridItem>,
    pub occupation: OccupationGrid,
    pub named_areas: Vec<NamedGridArea>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisPlacement {
    start: i32,
    span: u32,
}

fn definite_position(start: &GridLine, end: &GridLine) -> bool {
    !(start.is_auto_positioned() && end.is_auto_positioned())
}

fn span_of(start: &GridLine, end: &GridLine) -> u32 {
    start.span().or_else(|| end.span()).unwrap_or(1).max(1)
}

fn lines(style: &ComputedStyle, dimension: GridDimension) -> (&GridLine, &GridLine) {
    match dimension {
        GridDimension::Column => (&style.grid_column_start, &style.grid_column_end),
        GridDimension::Row => (&style.grid_row_start, &style.grid_row_end),
    }
}

// ==================== Placer ====================

struct Placer<'a> {
    style: &'a ComputedStyle,
    areas: Vec<NamedGridArea>,
    grid: OccupationGrid,
    items: Vec<GridItem>,
    cursor_x: usize,
    cursor_y: usize,
    config: &'a GridLayoutConfig,
}

impl<'a> Placer<'a> {
    fn template(&self, dimension: GridDimension) -> &GridTemplate {
        match dimension {
            GridDimension::Column => &self.style.grid_template_columns,
            GridDimension::Row => &self.style.grid_template_rows,
        }
    }

    fn track_count(&self, dimension: GridDimension) -> usize {
        match dimension {
            GridDimension::Column => self.grid.column_count(),
            GridDimension::Row => self.grid.row_count(),
        }
    }

    fn grow(&mut self, dimension: GridDimension, needed: usize) -> Result<(), LayoutError> {
        let limit = self.config.max_tracks_per_axis;
        if needed > limit {
            return Err(LayoutError::GridTooLarge {
                axis: dimension,
                requested: needed,
                limit,
            });
        }
        match dimension {
            GridDimension::Column => self.grid.ensure_columns(needed),
            GridDimension::Row => self.grid.ensure_rows(needed),
        }
        Ok(())
    }

    fn area_edge(&self, dimension: GridDimension, name: &str, suffix: &str, end: bool) -> Option<usize> {
        let area = self
            .areas
            .iter()
            .find(|area| area.name == name)
            .or_else(|| {
                let stripped = name.strip_suffix(suffix)?;
                self.areas.iter().find(|area| area.name == stripped)
            })?;
        let edge = match (dimension, end) {
            (GridDimension::Column, false) => area.column_start,
            (GridDimension::Column, true) => area.column_end,
            (GridDimension::Row, false) => area.row_start,
            (GridDimension::Row, true) => area.row_end,
        };
        Some(edge)
    }

    /// 0-based index of a line given by position.
    fn resolve_line(&self, dimension: GridDimension, line: &GridLine, end: bool) -> i32 {
        match line {
            GridLine::Number(n) if *n < 0 => self.track_count(dimension) as i32 + n + 1,
            GridLine::Number(n) => n - 1,
            _ => {
                let Some(name) = line.line_name() else {
                    return 0;
                };
                let suffix = if end { "-end" } else { "-start" };
                let fallback = if end { 1 } else { 0 };
                self.area_edge(dimension, name, suffix, end)
                    .or_else(|| self.template(dimension).line_index(name))
                    .map_or(fallback, |index| index as i32)
            }
        }
    }

    fn resolve_axis(&self, dimension: GridDimension, start: &GridLine, end: &GridLine) -> AxisPlacement {
        let placement = match (start.is_position(), end.is_position()) {
            (true, true) => {
                let mut from = self.resolve_line(dimension, start, false);
                let mut to = self.resolve_line(dimension, end, true);
                if from > to {
                    std::mem::swap(&mut from, &mut to);
                }
                AxisPlacement {
                    start: from,
                    span: (to - from).max(1) as u32,
                }
            }
            (true, false) => AxisPlacement {
                start: self.resolve_line(dimension, start, false),
                span: end.span().unwrap_or(1),
            },
            (false, true) => {
                let span = start.span().unwrap_or(1);
                AxisPlacement {
                    start: self.resolve_line(dimension, end, true) - span as i32,
                    span,
                }
            }
            (false, false) => AxisPlacement {
                start: 0,
                span: span_of(start, end),
            },
        };
        AxisPlacement {
            span: placement.span.max(1),
            ..placement
        }
    }

    fn claim(&mut self, box_index: usize, column: AxisPlacement, row: AxisPlacement) {
        let column_start = column.start.max(0) as usize;
        let column_end = (column.start + column.span as i32).max(0) as usize;
        let row_start = row.start.max(0) as usize;
        let row_end = (row.start + row.span as i32).max(0) as usize;
        self.grid.set_occupied(column_start, column_end, row_start, row_end);

        trace!(
            box_index,
            column = column.start,
            column_span = column.span,
            row = row.start,
            row_span = row.span,
            "placed grid item"
        );
        self.items.push(GridItem {
            box_index,
            row_start: row.start,
            row_span: row.span,
            column_start: column.start,
            column_span: column.span,
        });
    }

    fn place_explicit(&mut self, box_index: usize, style: &ComputedStyle) -> Result<(), LayoutError> {
        let (row_start, row_end) = lines(style, GridDimension::Row);
        let (column_start, column_end) = lines(style, GridDimension::Column);
        let row = self.resolve_axis(GridDimension::Row, row_start, row_end);
        let column = self.resolve_axis(GridDimension::Column, column_start, column_end);

        if row.start < 0 || column.start < 0 {
            warn!(box_index, column = column.start, row = row.start, "grid item starts before the first grid line");
        }
        self.grow(GridDimension::Row, (row.start + row.span as i32).max(0) as usize)?;
        self.grow(GridDimension::Column, (column.start + column.span as i32).max(0) as usize)?;
        self.claim(box_index, column, row);
        Ok(())
    }

    fn place_row_locked(&mut self, box_index: usize, style: &ComputedStyle) -> Result<(), LayoutError> {
        let (row_start, row_end) = lines(style, GridDimension::Row);
        let (column_start, column_end) = lines(style, GridDimension::Column);
        let mut row = self.resolve_axis(GridDimension::Row, row_start, row_end);
        row.start = row.start.max(0);
        let row_index = row.start as usize;
        self.grow(GridDimension::Row, row_index + row.span as usize)?;

        let column_span = span_of(column_start, column_end) as usize;
        self.grow(GridDimension::Column, column_span)?;
        let columns = self.grid.column_count();

        let found = (0..=columns - column_span)
            .find(|&column| self.grid.is_area_free(column, row_index, column_span, row.span as usize));
        let column = match found {
            Some(column) => column,
            None => {
                self.grow(GridDimension::Column, columns + column_span)?;
                columns
            }
        };

        let column = AxisPlacement {
            start: column as i32,
            span: column_span as u32,
        };
        self.claim(box_index, column, row);
        Ok(())
    }

    fn place_column_locked(&mut self, box_index: usize, style: &ComputedStyle) -> Result<(), LayoutError> {
        let (row_start, row_end) = lines(style, GridDimension::Row);
        let (column_start, column_end) = lines(style, GridDimension::Column);
        let mut column = self.resolve_axis(GridDimension::Column, column_start, column_end);
        column.start = column.start.max(0);
        let column_index = column.start as usize;
        let column_span = column.span as usize;
        let row_span = span_of(row_start, row_end) as usize;
        self.grow(GridDimension::Column, column_index + column_span)?;

        if column_index < self.cursor_x {
            self.cursor_y += 1;
        }
        self.cursor_x = column_index;

        self.grow(GridDimension::Row, self.cursor_y + row_span)?;
        while !self.grid.is_area_free(column_index, self.cursor_y, column_span, row_span) {
            self.cursor_y += 1;
            self.grow(GridDimension::Row, self.cursor_y + row_span)?;
        }

        let row = AxisPlacement {
            start: self.cursor_y as i32,
            span: row_span as u32,
        };
        self.claim(box_index, column, row);
        Ok(())
    }

    fn place_automatic(&mut self, box_index: usize, style: &ComputedStyle) -> Result<(), LayoutError> {
        let (row_start, row_end) = lines(style, GridDimension::Row);
        let (column_start, column_end) = lines(style, GridDimension::Column);
        let column_span = span_of(column_start, column_end) as usize;
        let row_span = span_of(row_start, row_end) as usize;
        self.grow(GridDimension::Column, column_span)?;
        let columns = self.grid.column_count();

        let mut found = None;
        'scan: for row in self.cursor_y..self.grid.row_count() {
            let first_column = if row == self.cursor_y { self.cursor_x } else { 0 };
            for column in first_column..columns {
                if column + column_span > columns {
                    break;
                }
                if self.grid.is_area_free(column, row, column_span, row_span) {
                    found = Some((column, row));
                    break 'scan;
                }
            }
        }

        // The cursor only moves by rows; its column resets when a row is passed.
        let (column, row) = match found {
            Some(position) => position,
            None => (0, self.grid.row_count()),
        };
        if row > self.cursor_y {
            self.cursor_x = 0;
            self.cursor_y = row;
        }
        self.grow(GridDimension::Row, row + row_span)?;

        let column = AxisPlacement {
            start: column as i32,
            span: column_span as u32,
        };
        let row = AxisPlacement {
            start: row as i32,
            span: row_span as u32,
        };
        self.claim(box_index, column, row);
        Ok(())
    }
}

/// Place every grid item candidate among the container's children.
///
/// The occupation grid starts at the explicit size and grows as needed. A
/// rejected `grid-template-areas` matrix degrades to no named areas.
pub(crate) fn place_grid_items(
    container: &LayoutBox,
    explicit_columns: usize,
    explicit_rows: usize,
    config: &GridLayoutConfig,
) -> Result<Placement, LayoutError> {
    let style = &container.style;
    let areas = match &style.grid_template_areas {
        Some(template) => build_named_areas(template).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring grid-template-areas");
            Vec::new()
        }),
        None => Vec::new(),
    };

    let mut placer = Placer {
        style,
        areas,
        grid: OccupationGrid::new(explicit_columns, explicit_rows),
        items: Vec::new(),
        cursor_x: 0,
        cursor_y: 0,
        config,
    };

    let candidates: Vec<(usize, &LayoutBox)> = container
        .children
        .iter()
        .enumerate()
        .filter(|(_, child)| child.is_grid_item_candidate())
        .collect();

    let row_definite = |child: &LayoutBox| {
        let (start, end) = lines(&child.style, GridDimension::Row);
        definite_position(start, end)
    };
    let column_definite = |child: &LayoutBox| {
        let (start, end) = lines(&child.style, GridDimension::Column);
        definite_position(start, end)
    };

    for (index, child) in &candidates {
        if row_definite(child) && column_definite(child) {
            placer.place_explicit(*index, &child.style)?;
        }
    }
    for (index, child) in &candidates {
        if row_definite(child) && !column_definite(child) {
            placer.place_row_locked(*index, &child.style)?;
        }
    }
    for (index, child) in &candidates {
        if !row_definite(child) && column_definite(child) {
            placer.place_column_locked(*index, &child.style)?;
        }
    }
    for (index, child) in &candidates {
        if !row_definite(child) && !column_definite(child) {
            placer.place_automatic(*index, &child.style)?;
        }
    }

    trace!(
        items = placer.items.len(),
        columns = placer.grid.column_count(),
        rows = placer.grid.row_count(),
        "placement complete"
    );
    Ok(Placement {
        items: placer.items,
        occupation: placer.grid,
        named_areas: placer.areas,
    })
}
