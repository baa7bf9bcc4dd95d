//! Custom assertions for grid layout tests.

use gridkit_layout::{GridItem, GridLayout};

/// Assert that two size lists match within tolerance.
#[track_caller]
pub fn assert_sizes_near(actual: &[f32], expected: &[f32], tolerance: f32) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Track count mismatch: expected {:?}, got {:?}",
        expected,
        actual
    );
    for (index, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tolerance,
            "Track {} differs: expected {}, got {} (all: expected {:?}, got {:?})",
            index,
            e,
            a,
            expected,
            actual
        );
    }
}

fn intersects(a: &GridItem, b: &GridItem) -> bool {
    a.column_start < b.column_start + b.column_span as i32
        && b.column_start < a.column_start + a.column_span as i32
        && a.row_start < b.row_start + b.row_span as i32
        && b.row_start < a.row_start + a.row_span as i32
}

/// First pair of placed items whose grid areas intersect.
pub fn find_overlap(layout: &GridLayout) -> Option<(GridItem, GridItem)> {
    for (index, a) in layout.items.iter().enumerate() {
        for b in &layout.items[index + 1..] {
            if intersects(a, b) {
                return Some((*a, *b));
            }
        }
    }
    None
}

/// Assert that every placed item's cells are marked in the occupation grid.
#[track_caller]
pub fn assert_items_occupied(layout: &GridLayout) {
    for item in &layout.items {
        for row in item.row_start.max(0)..item.row_start + item.row_span as i32 {
            for column in item.column_start.max(0)..item.column_start + item.column_span as i32 {
                assert!(
                    layout.occupation.is_occupied(column as usize, row as usize),
                    "Cell ({}, {}) of item {:?} is not occupied",
                    column,
                    row,
                    item
                );
            }
        }
    }
}
