/// A single horizontal line of cell values.
///
/// `0` is an empty cell; a nonzero value is the
/// [`color_id`](super::BlockKind::color_id) of the locked block that painted
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<u8>,
}

impl Row {
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            cells: vec![0; width],
        }
    }

    /// Rebuilds a row from a snapshot of cell values (used when a cleared
    /// row is reinserted during rewind).
    #[must_use]
    pub fn from_cells(cells: Vec<u8>) -> Self {
        Self { cells }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// A row is full when every cell is nonzero.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != 0)
    }
}

/// The playfield grid: an ordered stack of [`Row`]s, indexed bottom-up.
///
/// Row 0 is the floor. The top [`HIDDEN_ROWS`](super::HIDDEN_ROWS) rows are
/// the hidden buffer where pieces spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    rows: Vec<Row>,
}

impl Grid {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: (0..height).map(|_| Row::new(width)).collect(),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell value at `(x, y)`: `-1` out of bounds, `0` empty, otherwise the
    /// color id of the locked block.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> i32 {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return -1;
        };
        if x >= self.width || y >= self.rows.len() {
            return -1;
        }
        i32::from(self.rows[y].cells[x])
    }

    pub(crate) fn set_cell(&mut self, x: usize, y: usize, value: u8) {
        self.rows[y].cells[x] = value;
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &Row {
        &self.rows[y]
    }

    /// Removes the row at `y`, shifting everything above it down and
    /// refilling the top with an empty row, keeping the height constant.
    pub(crate) fn remove_row(&mut self, y: usize) -> Row {
        let removed = self.rows.remove(y);
        self.rows.push(Row::new(self.width));
        removed
    }

    /// Reinserts a row snapshot at `y`, shifting everything above it up and
    /// dropping the (empty) top row, keeping the height constant.
    pub(crate) fn insert_row(&mut self, y: usize, row: Row) {
        assert_eq!(row.width(), self.width);
        self.rows.pop();
        self.rows.insert(y, row);
    }

    /// Builds a grid from ASCII art for tests: `#` is an occupied cell, `.`
    /// is empty. Rows are given top to bottom and padded with empty rows up
    /// to `height`.
    #[must_use]
    pub fn from_ascii(art: &str, height: usize) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(!lines.is_empty(), "ASCII art must contain at least one row");
        assert!(lines.len() <= height);
        let width = lines[0].trim().len();

        let mut grid = Self::new(width, height);
        for (i, line) in lines.iter().enumerate() {
            let y = lines.len() - 1 - i;
            let line = line.trim();
            assert_eq!(line.len(), width, "ragged ASCII art at row {i}");
            for (x, ch) in line.chars().enumerate() {
                if ch == '#' {
                    grid.set_cell(x, y, 1);
                }
            }
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_minus_one() {
        let grid = Grid::new(10, 22);
        assert_eq!(grid.cell(-1, 0), -1);
        assert_eq!(grid.cell(0, -1), -1);
        assert_eq!(grid.cell(10, 0), -1);
        assert_eq!(grid.cell(0, 22), -1);
        assert_eq!(grid.cell(0, 0), 0);
    }

    #[test]
    fn row_fullness() {
        let mut grid = Grid::new(4, 4);
        for x in 0..3 {
            grid.set_cell(x, 0, 1);
        }
        assert!(!grid.row(0).is_full());
        grid.set_cell(3, 0, 5);
        assert!(grid.row(0).is_full());
    }

    #[test]
    fn remove_then_insert_restores_grid() {
        let mut grid = Grid::from_ascii(
            "\
            ..#.
            ##.#
            ####",
            6,
        );
        let before = grid.clone();

        let removed = grid.remove_row(0);
        assert!(removed.is_full());
        assert_eq!(grid.height(), 6);
        // The row above shifted down.
        assert_eq!(grid.cell(0, 0), 1);
        assert_eq!(grid.cell(2, 0), 0);

        grid.insert_row(0, removed);
        assert_eq!(grid, before);
    }

    #[test]
    fn from_ascii_bottom_up() {
        let grid = Grid::from_ascii(
            "\
            #..
            .#.",
            4,
        );
        assert_eq!(grid.cell(1, 0), 1);
        assert_eq!(grid.cell(0, 1), 1);
        assert_eq!(grid.cell(0, 0), 0);
        assert_eq!(grid.cell(2, 3), 0);
    }
}
