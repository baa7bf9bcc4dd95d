//! Occupation grid: which (column, row) cells are claimed by placed items.

/// A growable boolean matrix, rows × columns.
///
/// Dimensions only ever grow. Cells outside the current bounds read as free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupationGrid {
    cells: Vec<Vec<bool>>,
    column_count: usize,
}

impl OccupationGrid {
    /// Create a grid of the explicit size, at least one cell in each axis.
    pub fn new(column_count: usize, row_count: usize) -> Self {
        let column_count = column_count.max(1);
        let row_count = row_count.max(1);
        Self {
            cells: vec![vec![false; column_count]; row_count],
            column_count,
        }
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Grow to at least `needed` columns.
    pub fn ensure_columns(&mut self, needed: usize) {
        if needed <= self.column_count {
            return;
        }
        for row in &mut self.cells {
            row.resize(needed, false);
        }
        self.column_count = needed;
    }

    /// Grow to at least `needed` rows.
    pub fn ensure_rows(&mut self, needed: usize) {
        if needed <= self.cells.len() {
            return;
        }
        let column_count = self.column_count;
        self.cells.resize_with(needed, || vec![false; column_count]);
    }

    /// Mark the half-open rectangle as occupied, clipped to the current bounds.
    pub fn set_occupied(
        &mut self,
        column_start: usize,
        column_end: usize,
        row_start: usize,
        row_end: usize,
    ) {
        let column_end = column_end.min(self.column_count);
        let row_end = row_end.min(self.cells.len());
        for row in self.cells.iter_mut().take(row_end).skip(row_start) {
            for cell in row.iter_mut().take(column_end).skip(column_start) {
                *cell = true;
            }
        }
    }

    pub fn is_occupied(&self, column: usize, row: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(column))
            .copied()
            .unwrap_or(false)
    }

    /// Whether every cell of the rectangle at (column, row) is free.
    pub fn is_area_free(&self, column: usize, row: usize, column_span: usize, row_span: usize) -> bool {
        (row..row + row_span)
            .all(|r| (column..column + column_span).all(|c| !self.is_occupied(c, r)))
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|cell| **cell).count())
            .sum()
    }
}
