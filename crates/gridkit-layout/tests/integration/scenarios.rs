//! Scenario tests
//!
//! Fixed grids with exact expected results:
//! - Track sizes for fixed, flexible and intrinsic columns
//! - Auto-fill repetition counts
//! - Line resolution for spans and named areas
//! - Auto-placement order

use gridkit_css::{
    GridLine, GridPlacement, GridTemplate, TrackDefinition, TrackListEntry, TrackRepeat, TrackSize,
};
use gridkit_layout::grid::auto_repeat_count;
use gridkit_layout::{AvailableSize, AvailableSpace, GridDimension, GridLayoutConfig, LayoutError, Rect};

use crate::support::{assert_items_occupied, assert_sizes_near, find_overlap, leaf, placed, TestGrid};

fn width_only(width: f32) -> AvailableSpace {
    AvailableSpace::new(AvailableSize::Definite(width), AvailableSize::MaxContent)
}

#[test]
fn test_fixed_then_flexible_columns() {
    let mut grid = TestGrid::new()
        .column_sizes(vec![TrackSize::px(100.0), TrackSize::fr(1.0), TrackSize::fr(1.0)])
        .children((0..3).map(|_| leaf(0.0, 0.0)));
    let layout = grid.layout(width_only(500.0));
    assert_sizes_near(&layout.column_sizes(), &[100.0, 200.0, 200.0], 0.01);
}

#[test]
fn test_auto_fill_repetitions() {
    let template = GridTemplate::repeat(TrackRepeat::auto_fill(vec![TrackDefinition::simple(
        TrackSize::px(50.0),
    )]));
    let count = auto_repeat_count(
        &template,
        AvailableSize::Definite(320.0),
        0.0,
        &GridLayoutConfig::default(),
    );
    assert_eq!(count, Ok(6));

    let mut grid = TestGrid::new().columns(template);
    let layout = grid.layout(width_only(320.0));
    assert_eq!(layout.column_count(), 6);
    assert_eq!(layout.explicit_columns, 6);
}

#[test]
fn test_span_before_end_line() {
    let mut grid = TestGrid::new()
        .column_sizes(vec![TrackSize::px(20.0); 4])
        .child(placed(GridPlacement::from_pairs(
            (GridLine::Span(2), GridLine::Number(5)),
            (GridLine::Auto, GridLine::Auto),
        )));
    let layout = grid.layout(width_only(80.0));
    let item = layout.item_for_box(0).unwrap();
    assert_eq!(item.column_start_line(), 3);
    assert_eq!(item.column_start, 2);
    assert_eq!(item.column_span, 2);
    assert_eq!(layout.area_for_box(0), Some(Rect::new(40.0, 0.0, 40.0, 0.0)));
}

#[test]
fn test_two_auto_items_in_row_major_order() {
    let mut grid = TestGrid::new()
        .column_sizes(vec![TrackSize::px(50.0), TrackSize::px(50.0)])
        .child(leaf(0.0, 0.0))
        .child(leaf(0.0, 0.0));
    let layout = grid.layout(width_only(100.0));
    let first = layout.item_for_box(0).unwrap();
    let second = layout.item_for_box(1).unwrap();
    assert_eq!((first.column_start, first.row_start), (0, 0));
    assert_eq!((second.column_start, second.row_start), (1, 0));
}

#[test]
fn test_holy_grail() {
    let mut grid = TestGrid::new()
        .column_sizes(vec![TrackSize::px(120.0), TrackSize::fr(1.0), TrackSize::px(80.0)])
        .row_sizes(vec![TrackSize::px(60.0), TrackSize::fr(1.0), TrackSize::px(40.0)])
        .areas(&["header header header", "nav main aside", "footer footer footer"])
        .gap(10.0, 10.0)
        .children(
            ["header", "nav", "main", "aside", "footer"]
                .into_iter()
                .map(|name| placed(GridPlacement::from_area(name))),
        );
    let layout = grid.layout(AvailableSpace::definite(620.0, 420.0));

    assert_sizes_near(&layout.column_sizes(), &[120.0, 400.0, 80.0], 0.01);
    assert_sizes_near(&layout.row_sizes(), &[60.0, 300.0, 40.0], 0.01);
    assert_eq!(layout.area_for_box(0), Some(Rect::new(0.0, 0.0, 620.0, 60.0)));
    assert_eq!(layout.area_for_box(2), Some(Rect::new(130.0, 70.0, 400.0, 300.0)));
    assert_eq!(layout.area_for_box(3), Some(Rect::new(540.0, 70.0, 80.0, 300.0)));
    assert_eq!(layout.area_for_box(4), Some(Rect::new(0.0, 380.0, 620.0, 40.0)));
    assert!(find_overlap(&layout).is_none());
}

#[test]
fn test_named_lines_place_items() {
    let columns = GridTemplate::from_entries(vec![
        TrackListEntry::Track(TrackDefinition::named(TrackSize::px(40.0), "sidebar-start")),
        TrackListEntry::Track(TrackDefinition::named(TrackSize::px(100.0), "content-start")),
    ])
    .with_final_line_name("content-end");
    let mut grid = TestGrid::new().columns(columns).child(placed(GridPlacement::from_pairs(
        (GridLine::Name("content-start".into()), GridLine::Name("content-end".into())),
        (GridLine::Number(1), GridLine::Auto),
    )));
    let layout = grid.layout(width_only(140.0));
    let item = layout.item_for_box(0).unwrap();
    assert_eq!((item.column_start, item.column_span), (1, 1));
    assert_eq!(grid.container().children[0].dimensions.content.x, 40.0);
}

#[test]
fn test_spanning_content_distributed_over_auto_tracks() {
    let mut grid = TestGrid::new()
        .column_sizes(vec![TrackSize::Auto, TrackSize::Auto])
        .child(leaf(30.0, 10.0))
        .child(placed(GridPlacement::from_pairs(
            (GridLine::Number(1), GridLine::Span(2)),
            (GridLine::Number(2), GridLine::Auto),
        )));
    grid = grid.child({
        let mut wide = leaf(150.0, 10.0);
        wide.style.set_placement(GridPlacement::from_pairs(
            (GridLine::Number(1), GridLine::Span(2)),
            (GridLine::Number(3), GridLine::Auto),
        ));
        wide
    });
    let layout = grid.layout(AvailableSpace::new(AvailableSize::MinContent, AvailableSize::MaxContent));
    assert_sizes_near(&layout.column_sizes(), &[30.0, 120.0], 0.01);
    assert_eq!(layout.content_width, 150.0);
}

#[test]
fn test_malformed_areas_degrade_to_line_fallback() {
    let mut grid = TestGrid::new()
        .column_sizes(vec![TrackSize::px(50.0), TrackSize::px(50.0)])
        .areas(&["a b", "b a"])
        .child(placed(GridPlacement::from_area("a")))
        .child(leaf(0.0, 0.0));
    let layout = grid.layout(width_only(100.0));
    assert!(layout.named_areas.is_empty());
    assert_eq!(layout.items.len(), 2);
    let named = layout.item_for_box(0).unwrap();
    assert_eq!((named.column_start, named.row_start), (0, 0));
    assert!(find_overlap(&layout).is_none());
    assert_items_occupied(&layout);
}

#[test]
fn test_gutters_collapse_with_auto_fit_tracks() {
    let template = GridTemplate::repeat(TrackRepeat::auto_fit(vec![TrackDefinition::simple(
        TrackSize::px(100.0),
    )]));
    let mut grid = TestGrid::new().columns(template).gap(20.0, 0.0).child(leaf(0.0, 0.0));
    let layout = grid.layout(width_only(460.0));
    // (460 + 20) / 120 = 4 repetitions, three of them empty.
    assert_eq!(layout.column_count(), 4);
    assert_sizes_near(&layout.column_sizes(), &[100.0, 0.0, 0.0, 0.0], 0.01);
}

#[test]
fn test_explicit_placement_beyond_limit_fails() {
    let mut grid = TestGrid::new()
        .config(GridLayoutConfig::default().with_max_tracks_per_axis(8))
        .child(placed(GridPlacement::from_lines(1, 20, 1, 2)));
    let result = grid.try_layout(width_only(100.0));
    assert!(matches!(
        result,
        Err(LayoutError::GridTooLarge {
            axis: GridDimension::Column,
            requested: 19,
            limit: 8,
        })
    ));
}

#[test]
fn test_min_content_rows_under_definite_height() {
    let mut grid = TestGrid::new()
        .column_sizes(vec![TrackSize::px(100.0)])
        .row_sizes(vec![TrackSize::MinContent, TrackSize::fr(1.0)])
        .child(leaf(10.0, 35.0))
        .child(leaf(10.0, 5.0));
    let layout = grid.layout(AvailableSpace::definite(100.0, 200.0));
    assert_sizes_near(&layout.row_sizes(), &[35.0, 165.0], 0.01);
    assert_eq!(layout.content_height, 200.0);
    assert_eq!(layout.automatic_content_height, 200.0);
}
