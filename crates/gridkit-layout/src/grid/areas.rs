//! Named grid areas from `grid-template-areas`.

use gridkit_css::{CssError, GridTemplateAreas};
use tracing::trace;

/// A named rectangle of grid cells. Edges are 0-based line indices, end-exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedGridArea {
    pub name: String,
    pub row_start: usize,
    pub row_end: usize,
    pub column_start: usize,
    pub column_end: usize,
}

impl NamedGridArea {
    fn cell(name: &str, row: usize, column: usize) -> Self {
        Self {
            name: name.to_string(),
            row_start: row,
            row_end: row + 1,
            column_start: column,
            column_end: column + 1,
        }
    }
}

/// Resolve the area matrix into one rectangle per name.
///
/// The matrix is scanned row-major. A name seen again must either extend its
/// rectangle to the right on its first row, or start a new row exactly at the
/// rectangle's first column and continue contiguously. Any other occurrence
/// rejects the whole matrix.
pub fn build_named_areas(template: &GridTemplateAreas) -> Result<Vec<NamedGridArea>, CssError> {
    let mut areas: Vec<NamedGridArea> = Vec::new();

    for (y, row) in template.rows.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let Some(name) = cell else { continue };
            let reject = || CssError::NonRectangularArea {
                name: name.clone(),
                row: y,
                column: x,
            };

            let Some(index) = areas.iter().position(|area| &area.name == name) else {
                areas.push(NamedGridArea::cell(name, y, x));
                continue;
            };
            let area = &mut areas[index];

            if area.row_start == y {
                if area.column_end != x {
                    return Err(reject());
                }
                area.column_end += 1;
            } else if area.row_end == y {
                if area.column_start != x {
                    return Err(reject());
                }
                area.row_end += 1;
            } else if area.row_end == y + 1 {
                let continues_run = x > area.column_start
                    && x < area.column_end
                    && row.get(x - 1).and_then(Option::as_ref) == Some(name);
                if !continues_run {
                    return Err(reject());
                }
            } else {
                return Err(reject());
            }
        }
    }

    // Rows that stop short of an area's width are only visible once the whole
    // matrix has been seen.
    for area in &areas {
        for y in area.row_start..area.row_end {
            for x in area.column_start..area.column_end {
                let matches = template
                    .rows
                    .get(y)
                    .and_then(|row| row.get(x))
                    .and_then(Option::as_ref)
                    == Some(&area.name);
                if !matches {
                    return Err(CssError::NonRectangularArea {
                        name: area.name.clone(),
                        row: y,
                        column: x,
                    });
                }
            }
        }
    }

    trace!(count = areas.len(), "resolved named grid areas");
    Ok(areas)
}

/// Find an area by exact name.
pub fn find_area<'a>(areas: &'a [NamedGridArea], name: &str) -> Option<&'a NamedGridArea> {
    areas.iter().find(|area| area.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holy_grail_layout() {
        let template = GridTemplateAreas::from_rows(&[
            "header header header",
            "nav main aside",
            "footer footer footer",
        ]);
        let areas = build_named_areas(&template).unwrap();
        assert_eq!(areas.len(), 5);

        let header = find_area(&areas, "header").unwrap();
        assert_eq!((header.column_start, header.column_end), (0, 3));
        assert_eq!((header.row_start, header.row_end), (0, 1));

        let main = find_area(&areas, "main").unwrap();
        assert_eq!((main.column_start, main.column_end), (1, 2));
        assert_eq!((main.row_start, main.row_end), (1, 2));
    }

    #[test]
    fn test_multi_row_area() {
        let template = GridTemplateAreas::from_rows(&["side top top", "side body body"]);
        let areas = build_named_areas(&template).unwrap();
        let side = find_area(&areas, "side").unwrap();
        assert_eq!((side.row_start, side.row_end), (0, 2));
        let body = find_area(&areas, "body").unwrap();
        assert_eq!((body.column_start, body.column_end), (1, 3));
    }

    #[test]
    fn test_block_area_spanning_rows_and_columns() {
        let template = GridTemplateAreas::from_rows(&["a a b", "a a c", "d d c"]);
        let areas = build_named_areas(&template).unwrap();
        let a = find_area(&areas, "a").unwrap();
        assert_eq!((a.column_start, a.column_end, a.row_start, a.row_end), (0, 2, 0, 2));
        let c = find_area(&areas, "c").unwrap();
        assert_eq!((c.row_start, c.row_end), (1, 3));
    }

    #[test]
    fn test_null_cells_are_skipped() {
        let template = GridTemplateAreas::from_rows(&["a .", ". b"]);
        let areas = build_named_areas(&template).unwrap();
        assert_eq!(areas.len(), 2);
    }

    #[test]
    fn test_l_shape_rejected() {
        let template = GridTemplateAreas::from_rows(&["a a", "a b"]);
        let err = build_named_areas(&template).unwrap_err();
        assert!(matches!(err, CssError::NonRectangularArea { ref name, .. } if name == "a"));
    }

    #[test]
    fn test_disjoint_cells_rejected() {
        let template = GridTemplateAreas::from_rows(&["a b a"]);
        assert!(build_named_areas(&template).is_err());
    }

    #[test]
    fn test_shifted_row_rejected() {
        let template = GridTemplateAreas::from_rows(&["a a .", ". a a"]);
        assert!(build_named_areas(&template).is_err());
    }

    #[test]
    fn test_gap_between_rows_rejected() {
        let template = GridTemplateAreas::from_rows(&["a", "b", "a"]);
        assert!(build_named_areas(&template).is_err());
    }
}
