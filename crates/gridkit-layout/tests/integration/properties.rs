//! Property tests
//!
//! Invariants checked over generated grids:
//! - Occupation cells only ever become occupied
//! - Auto-placed items never overlap and every candidate is placed once
//! - Sized tracks keep growth limits at or above base sizes
//! - Re-running layout on the same tree gives the same result
//! - Area matrices resolve to exact rectangles or are rejected

use gridkit_css::{GridLine, GridPlacement, GridTemplateAreas, TrackSize};
use gridkit_layout::grid::build_named_areas;
use gridkit_layout::{AvailableSize, AvailableSpace, LayoutBox, OccupationGrid};
use proptest::prelude::*;

use crate::support::{assert_items_occupied, find_overlap, leaf, TestGrid};

/// An auto-placed child: fully automatic, row-locked or column-locked.
fn auto_placed_child() -> impl Strategy<Value = LayoutBox> {
    let kind = 0..3u8;
    let line = 1..5i32;
    let span = 1..3u32;
    let size = (0.0..80.0f32, 0.0..40.0f32);
    (kind, line, span.clone(), span, size).prop_map(|(kind, line, span, cross_span, (w, h))| {
        let mut child = leaf(w, h);
        let definite = (GridLine::Number(line), GridLine::Span(span));
        let automatic = (GridLine::Auto, GridLine::Span(cross_span));
        let placement = match kind {
            0 => GridPlacement::from_pairs(automatic.clone(), (GridLine::Auto, GridLine::Auto)),
            1 => GridPlacement::from_pairs(automatic, definite),
            _ => GridPlacement::from_pairs(definite, automatic),
        };
        child.style.set_placement(placement);
        child
    })
}

fn track_size() -> impl Strategy<Value = TrackSize> {
    prop_oneof![
        (0.0..120.0f32).prop_map(TrackSize::px),
        (0.5..3.0f32).prop_map(TrackSize::fr),
        Just(TrackSize::Auto),
        Just(TrackSize::MinContent),
        Just(TrackSize::MaxContent),
        (0.0..60.0f32).prop_map(|min| TrackSize::minmax(TrackSize::px(min), TrackSize::fr(1.0))),
    ]
}

fn available_width() -> impl Strategy<Value = AvailableSize> {
    prop_oneof![
        (0.0..800.0f32).prop_map(AvailableSize::Definite),
        Just(AvailableSize::MinContent),
        Just(AvailableSize::MaxContent),
    ]
}

fn area_rows() -> impl Strategy<Value = Vec<String>> {
    (1..4usize, 1..4usize).prop_flat_map(|(rows, columns)| {
        prop::collection::vec(
            prop::collection::vec(prop::sample::select(vec!["a", "b", "."]), columns)
                .prop_map(|cells| cells.join(" ")),
            rows,
        )
    })
}

proptest! {
    #[test]
    fn test_occupation_is_monotonic(
        rects in prop::collection::vec((0..6usize, 1..3usize, 0..6usize, 1..3usize), 1..12)
    ) {
        let mut grid = OccupationGrid::new(2, 2);
        for (column, column_span, row, row_span) in rects {
            let before = grid.clone();
            grid.ensure_columns(column + column_span);
            grid.ensure_rows(row + row_span);
            grid.set_occupied(column, column + column_span, row, row + row_span);

            prop_assert!(grid.column_count() >= before.column_count());
            prop_assert!(grid.row_count() >= before.row_count());
            for r in 0..before.row_count() {
                for c in 0..before.column_count() {
                    if before.is_occupied(c, r) {
                        prop_assert!(grid.is_occupied(c, r));
                    }
                }
            }
            prop_assert!(!grid.is_area_free(column, row, column_span, row_span));
        }
    }

    #[test]
    fn test_auto_placement_has_no_overlap(
        children in prop::collection::vec(auto_placed_child(), 1..16)
    ) {
        let count = children.len();
        let mut grid = TestGrid::new()
            .column_sizes(vec![TrackSize::px(40.0); 3])
            .children(children);
        let layout = grid.layout(AvailableSpace::new(AvailableSize::Definite(120.0), AvailableSize::MaxContent));

        prop_assert_eq!(find_overlap(&layout), None);
        assert_items_occupied(&layout);

        let mut placed: Vec<usize> = layout.items.iter().map(|item| item.box_index).collect();
        placed.sort_unstable();
        prop_assert_eq!(placed, (0..count).collect::<Vec<_>>());
    }

    #[test]
    fn test_growth_limits_cover_base_sizes(
        columns in prop::collection::vec(track_size(), 1..5),
        rows in prop::collection::vec(track_size(), 1..4),
        children in prop::collection::vec(auto_placed_child(), 0..10),
        width in available_width(),
    ) {
        let mut grid = TestGrid::new()
            .column_sizes(columns)
            .row_sizes(rows)
            .gap(8.0, 4.0)
            .children(children);
        let layout = grid.layout(AvailableSpace::new(width, AvailableSize::MaxContent));

        for track in layout.columns.iter().chain(&layout.rows) {
            prop_assert!(track.base_size.is_finite());
            prop_assert!(track.base_size >= 0.0);
            prop_assert!(track.growth_limit >= track.base_size);
        }
    }

    #[test]
    fn test_layout_is_idempotent(
        columns in prop::collection::vec(track_size(), 1..4),
        children in prop::collection::vec(auto_placed_child(), 0..8),
        width in available_width(),
    ) {
        let mut grid = TestGrid::new().column_sizes(columns).gap(5.0, 5.0).children(children);
        let space = AvailableSpace::new(width, AvailableSize::MaxContent);
        let first = grid.layout(space);
        let second = grid.layout(space);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_area_matrix_resolves_or_rejects(rows in area_rows()) {
        let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let template = GridTemplateAreas::from_rows(&row_refs);

        if let Ok(areas) = build_named_areas(&template) {
            for area in &areas {
                let mut cells = 0;
                for (y, row) in template.rows.iter().enumerate() {
                    for (x, cell) in row.iter().enumerate() {
                        let inside = (area.row_start..area.row_end).contains(&y)
                            && (area.column_start..area.column_end).contains(&x);
                        let named = cell.as_deref() == Some(area.name.as_str());
                        prop_assert_eq!(inside, named);
                        if named {
                            cells += 1;
                        }
                    }
                }
                prop_assert_eq!(
                    cells,
                    (area.row_end - area.row_start) * (area.column_end - area.column_start)
                );
            }
        }

        let mut grid = TestGrid::new()
            .areas(&row_refs)
            .child(leaf(10.0, 10.0))
            .child({
                let mut child = leaf(10.0, 10.0);
                child.style.set_placement(GridPlacement::from_area("a"));
                child
            });
        let layout = grid.try_layout(AvailableSpace::definite(300.0, 300.0));
        prop_assert!(layout.is_ok());
    }
}
