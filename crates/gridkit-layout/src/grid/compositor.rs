//! Final positioning of grid items.
//!
//! Column offsets are sums of base sizes, since column contributions already
//! include item borders. Row offsets are sums of full extents (base size plus
//! the borders accumulated on each row).

use gridkit_css::{AlignSelf, JustifySelf, Length};
use tracing::{trace, warn};

use super::placement::GridItem;
use super::tracks::AxisTracks;
use crate::{AvailableSpace, ChildLayout, GridDimension, LayoutBox, LayoutError, Rect};

/// Container sizes and item areas produced by compositing.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Composition {
    /// Grid area of each item, relative to the container's content box.
    /// `None` for items skipped because they start before the first line.
    pub item_areas: Vec<Option<Rect>>,
    pub content_width: f32,
    pub content_height: f32,
    pub automatic_content_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AreaAlignment {
    Start,
    End,
    Center,
    Stretch,
}

impl From<JustifySelf> for AreaAlignment {
    fn from(value: JustifySelf) -> Self {
        match value {
            JustifySelf::Start => AreaAlignment::Start,
            JustifySelf::End => AreaAlignment::End,
            JustifySelf::Center => AreaAlignment::Center,
            JustifySelf::Stretch | JustifySelf::Auto => AreaAlignment::Stretch,
        }
    }
}

impl From<AlignSelf> for AreaAlignment {
    fn from(value: AlignSelf) -> Self {
        match value {
            AlignSelf::Start => AreaAlignment::Start,
            AlignSelf::End => AreaAlignment::End,
            AlignSelf::Center => AreaAlignment::Center,
            AlignSelf::Stretch | AlignSelf::Auto => AreaAlignment::Stretch,
        }
    }
}

/// Used size and offset of a box inside its grid area along one axis.
///
/// An auto preferred size fills the area. A definite size is placed by the
/// alignment, with stretch behaving as start.
fn place_in_area(
    preferred: &Length,
    resolve: impl Fn(&Length, f32) -> f32,
    area_size: f32,
    alignment: AreaAlignment,
) -> (f32, f32) {
    if preferred.is_auto() {
        return (area_size, 0.0);
    }
    let size = resolve(preferred, area_size);
    let offset = match alignment {
        AreaAlignment::Start | AreaAlignment::Stretch => 0.0,
        AreaAlignment::End => area_size - size,
        AreaAlignment::Center => (area_size - size) / 2.0,
    };
    (size, offset)
}

/// Position every placed item and lay out its contents.
pub(crate) fn composite_grid_items<L: ChildLayout + ?Sized>(
    container: &mut LayoutBox,
    items: &[GridItem],
    columns: &AxisTracks,
    rows: &AxisTracks,
    available: AvailableSpace,
    child_layout: &mut L,
) -> Result<Composition, LayoutError> {
    let origin = container.dimensions.content;
    let justify_items = container.style.justify_items;
    let align_items = container.style.align_items;
    let mut item_areas = Vec::with_capacity(items.len());

    for item in items {
        if item.is_clipped() {
            warn!(
                box_index = item.box_index,
                column = item.column_start,
                row = item.row_start,
                "skipping grid item that starts before the first grid line"
            );
            item_areas.push(None);
            continue;
        }

        let column = item.column_start as usize;
        let column_index = columns.arena_index(column);
        let column_end = columns.span_end(column, item.span(GridDimension::Column));
        let first_column = &columns.arena()[column_index];
        let x_start = columns.sum_base_sizes(0, column_index);
        let x_end = columns.sum_base_sizes(0, column_end);
        let area_width = (x_end - x_start - first_column.border_before - first_column.border_after).max(0.0);

        let row = item.row_start as usize;
        let row_index = rows.arena_index(row);
        let row_end = rows.span_end(row, item.span(GridDimension::Row));
        let first_row = &rows.arena()[row_index];
        let y_start = rows.sum_full_sizes(0, row_index);
        let area_height = rows.sum_base_sizes(row_index, row_end).max(0.0);

        let area = Rect::new(
            x_start + first_column.border_before,
            y_start + first_row.border_before,
            area_width,
            area_height,
        );

        let child = &mut container.children[item.box_index];
        let style = &child.style;
        let resolve = |length: &Length, basis: f32| style.resolve_length(length, basis);
        let (width, x_offset) = place_in_area(
            &style.width,
            resolve,
            area.width,
            style.justify_self.resolve(justify_items).into(),
        );
        let (height, y_offset) = place_in_area(
            &style.height,
            resolve,
            area.height,
            style.align_self.resolve(align_items).into(),
        );

        child.dimensions.border = child.border_widths();
        child.dimensions.content = Rect::new(
            origin.x + area.x + x_offset,
            origin.y + area.y + y_offset,
            width,
            height,
        );
        trace!(
            box_index = item.box_index,
            x = child.dimensions.content.x,
            y = child.dimensions.content.y,
            width,
            height,
            "positioned grid item"
        );

        child_layout.layout_inside(child, AvailableSpace::definite(width, height))?;
        item_areas.push(Some(area));
    }

    let column_extent = columns.sum_base_sizes(0, columns.arena().len());
    let row_extent = rows.sum_full_sizes(0, rows.arena().len());
    let content_width = available.width.definite().unwrap_or(column_extent);
    let content_height = available.height.definite().unwrap_or(row_extent);

    Ok(Composition {
        item_areas,
        content_width,
        content_height,
        automatic_content_height: row_extent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(length: &Length, basis: f32) -> f32 {
        length.to_px(16.0, 16.0, basis)
    }

    #[test]
    fn test_auto_size_fills_area() {
        let placed = place_in_area(&Length::Auto, resolve, 120.0, AreaAlignment::Center);
        assert_eq!(placed, (120.0, 0.0));
    }

    #[test]
    fn test_definite_size_alignment() {
        let size = Length::Px(40.0);
        assert_eq!(place_in_area(&size, resolve, 100.0, AreaAlignment::Start), (40.0, 0.0));
        assert_eq!(place_in_area(&size, resolve, 100.0, AreaAlignment::Stretch), (40.0, 0.0));
        assert_eq!(place_in_area(&size, resolve, 100.0, AreaAlignment::End), (40.0, 60.0));
        assert_eq!(place_in_area(&size, resolve, 100.0, AreaAlignment::Center), (40.0, 30.0));
    }

    #[test]
    fn test_percentage_size_resolves_against_area() {
        let placed = place_in_area(&Length::Percent(50.0), resolve, 200.0, AreaAlignment::End);
        assert_eq!(placed, (100.0, 100.0));
    }

    #[test]
    fn test_alignment_from_self_keywords() {
        assert_eq!(AreaAlignment::from(JustifySelf::Auto), AreaAlignment::Stretch);
        assert_eq!(AreaAlignment::from(AlignSelf::Center), AreaAlignment::Center);
    }
}
