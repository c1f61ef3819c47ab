//! Raw 2-D cell grids as decoded from a worksheet

use super::cell::Cell;

/// One grid row. Rows may be shorter than the header; missing cells read as empty.
pub type Row = Vec<Cell>;

/// Ordered rows of cells, row 0 being the header row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn new(rows: Vec<Row>) -> Self {
        Grid { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Header labels, stringified and trimmed
    pub fn header_labels(&self) -> Vec<String> {
        self.header()
            .map(|row| row.iter().map(Cell::to_trimmed_text).collect())
            .unwrap_or_default()
    }

    /// Data rows (everything after the header)
    pub fn data_rows(&self) -> &[Row] {
        if self.rows.len() > 1 { &self.rows[1..] } else { &[] }
    }

    /// Cell at (row, col); out-of-range positions read as empty
    #[cfg(test)]
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&super::cell::EMPTY_CELL)
    }

    pub(crate) fn remove_row(&mut self, index: usize) -> Row {
        self.rows.remove(index)
    }
}

/// Build a grid from literal rows in tests
#[cfg(test)]
#[macro_export]
macro_rules! grid {
    ($([$($cell:expr),* $(,)?]),* $(,)?) => {
        $crate::reconcile::Grid::new(vec![
            $(vec![$($crate::reconcile::Cell::from($cell)),*]),*
        ])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_rows_read_as_empty() {
        let grid = Grid::new(vec![
            vec![Cell::from("a"), Cell::from("b"), Cell::from("c")],
            vec![Cell::from("x")],
        ]);
        assert_eq!(grid.cell(1, 0), &Cell::from("x"));
        assert_eq!(grid.cell(1, 2), &Cell::Empty);
        assert_eq!(grid.cell(5, 0), &Cell::Empty);
    }

    #[test]
    fn test_header_labels_are_trimmed() {
        let grid = Grid::new(vec![vec![Cell::from(" Key "), Cell::Empty, Cell::Number(3.0)]]);
        assert_eq!(grid.header_labels(), vec!["Key", "", "3"]);
        assert!(grid.data_rows().is_empty());
    }
}
