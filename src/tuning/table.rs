use log::debug;
use serde::{Deserialize, Serialize};

use crate::tuning::error::TuneError;

/// Quadrant of cells bracketing a live `(x, y)` reading.
///
/// The base indices follow the "count of breakpoints the reading is >=,
/// minus one" convention, so a reading left of the first breakpoint has a
/// base of -1 and a reading past the last breakpoint points one row/column
/// beyond the grid. `cells` keeps only the pairs that actually land inside
/// the table; off-grid corners are dropped rather than clamped, so a
/// reading outside the outer breakpoints produces a partial set (1 or 2
/// cells instead of 4).
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightSet {
    pub x_base: isize,
    pub y_base: isize,
    cells: Vec<(usize, usize)>,
}

impl HighlightSet {
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.cells.contains(&(row, col))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Serialized form of a table. Round-trips axes and cells exactly.
#[derive(Serialize, Deserialize)]
struct TableSnapshot {
    x_axis: Vec<f64>,
    y_axis: Vec<f64>,
    cells: Vec<Vec<f64>>,
}

/// 2-D calibration map addressed by two strictly increasing breakpoint axes.
///
/// The shape is fixed at construction; only cell contents mutate. Cells are
/// stored as `f64` uniformly regardless of whether the map is conventionally
/// integer-valued (VE) or decimal-valued (SA); display formatting decides
/// precision.
#[derive(Clone, Debug)]
pub struct CalibrationTable {
    x_axis: Vec<f64>,
    y_axis: Vec<f64>,
    cells: Vec<Vec<f64>>,
    dirty: bool,
}

/// Explicit validation gate for grid editor input: a cell edit is accepted
/// only if the raw text parses as an integer.
pub fn parse_cell_input(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

fn strictly_increasing(axis: &[f64]) -> bool {
    axis.windows(2).all(|w| w[0] < w[1])
}

impl CalibrationTable {
    pub fn from_parts(
        x_axis: Vec<f64>,
        y_axis: Vec<f64>,
        cells: Vec<Vec<f64>>,
    ) -> Result<Self, TuneError> {
        if x_axis.is_empty() || y_axis.is_empty() {
            return Err(TuneError::MalformedGrid {
                expected_rows: y_axis.len(),
                expected_cols: x_axis.len(),
            });
        }
        if !strictly_increasing(&x_axis) || !strictly_increasing(&y_axis) {
            return Err(TuneError::AxisNotIncreasing);
        }
        if cells.len() != y_axis.len() || cells.iter().any(|row| row.len() != x_axis.len()) {
            return Err(TuneError::MalformedGrid {
                expected_rows: y_axis.len(),
                expected_cols: x_axis.len(),
            });
        }
        Ok(Self {
            x_axis,
            y_axis,
            cells,
            dirty: false,
        })
    }

    /// Row and column counts are derived from the axes, never stored.
    pub fn row_count(&self) -> usize {
        self.y_axis.len()
    }

    pub fn col_count(&self) -> usize {
        self.x_axis.len()
    }

    pub fn x_header(&self, col: usize) -> Result<f64, TuneError> {
        self.x_axis
            .get(col)
            .copied()
            .ok_or_else(|| self.out_of_range(0, col))
    }

    pub fn y_header(&self, row: usize) -> Result<f64, TuneError> {
        self.y_axis
            .get(row)
            .copied()
            .ok_or_else(|| self.out_of_range(row, 0))
    }

    pub fn value_at(&self, row: usize, col: usize) -> Result<f64, TuneError> {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .ok_or_else(|| self.out_of_range(row, col))
    }

    /// Validated cell write. The raw editor text must parse as an integer;
    /// anything else leaves the cell untouched and reports
    /// `InvalidCellInput`, which callers treat as a recoverable no-op.
    pub fn set_value(&mut self, row: usize, col: usize, raw: &str) -> Result<(), TuneError> {
        let parsed = parse_cell_input(raw)
            .ok_or_else(|| TuneError::InvalidCellInput(raw.to_string()))?;
        let cell = self
            .cells
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or_else(|| {
                TuneError::CellOutOfRange {
                    row,
                    col,
                    rows: self.y_axis.len(),
                    cols: self.x_axis.len(),
                }
            })?;
        *cell = parsed as f64;
        self.dirty = true;
        debug!("cell ({row}, {col}) set to {parsed}");
        Ok(())
    }

    /// Whether any cell changed since construction or the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Locates the 2x2 neighborhood of cells bracketing a live reading.
    /// Boundary inclusive: a reading exactly on a breakpoint counts it.
    pub fn locate_quadrant(&self, x: f64, y: f64) -> HighlightSet {
        let x_base = base_index(&self.x_axis, x);
        let y_base = base_index(&self.y_axis, y);
        let rows = self.y_axis.len() as isize;
        let cols = self.x_axis.len() as isize;
        let mut cells = Vec::with_capacity(4);
        for (r, c) in [
            (y_base, x_base),
            (y_base + 1, x_base),
            (y_base, x_base + 1),
            (y_base + 1, x_base + 1),
        ] {
            if (0..rows).contains(&r) && (0..cols).contains(&c) {
                cells.push((r as usize, c as usize));
            }
        }
        HighlightSet {
            x_base,
            y_base,
            cells,
        }
    }

    /// Bilinear interpolation over the quadrant bracketing `(x, y)`.
    /// The reading must be bracketed by adjacent breakpoints on both axes.
    pub fn interpolate(&self, x: f64, y: f64) -> Result<f64, TuneError> {
        let xi = base_index(&self.x_axis, x);
        let yi = base_index(&self.y_axis, y);
        if xi < 0
            || yi < 0
            || (xi + 1) as usize >= self.x_axis.len()
            || (yi + 1) as usize >= self.y_axis.len()
        {
            return Err(TuneError::ReadingOutOfRange { x, y });
        }
        let (xi, yi) = (xi as usize, yi as usize);
        let x1 = self.x_axis[xi];
        let x2 = self.x_axis[xi + 1];
        let y1 = self.y_axis[yi];
        let y2 = self.y_axis[yi + 1];
        let q11 = self.cells[yi][xi];
        let q21 = self.cells[yi][xi + 1];
        let q12 = self.cells[yi + 1][xi];
        let q22 = self.cells[yi + 1][xi + 1];
        Ok(1.0 / ((x2 - x1) * (y2 - y1))
            * (q11 * (x2 - x) * (y2 - y)
                + q21 * (x - x1) * (y2 - y)
                + q12 * (x2 - x) * (y - y1)
                + q22 * (x - x1) * (y - y1)))
    }

    pub fn to_json(&self) -> Result<String, TuneError> {
        let snapshot = TableSnapshot {
            x_axis: self.x_axis.clone(),
            y_axis: self.y_axis.clone(),
            cells: self.cells.clone(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    pub fn from_json(blob: &str) -> Result<Self, TuneError> {
        let snapshot: TableSnapshot = serde_json::from_str(blob)?;
        Self::from_parts(snapshot.x_axis, snapshot.y_axis, snapshot.cells)
    }

    fn out_of_range(&self, row: usize, col: usize) -> TuneError {
        TuneError::CellOutOfRange {
            row,
            col,
            rows: self.y_axis.len(),
            cols: self.x_axis.len(),
        }
    }
}

/// Count of breakpoints the reading is >=, minus one. Returns -1 for a
/// reading left of the first breakpoint and `len - 1` past the last.
fn base_index(axis: &[f64], reading: f64) -> isize {
    axis.iter().filter(|&&bp| reading >= bp).count() as isize - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> CalibrationTable {
        CalibrationTable::from_parts(
            vec![1000.0, 2000.0, 3000.0],
            vec![10.0, 20.0, 30.0],
            vec![
                vec![1.0, 2.0, 3.0],
                vec![4.0, 5.0, 6.0],
                vec![7.0, 8.0, 9.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn set_then_read_back() {
        let mut table = small_table();
        table.set_value(1, 2, "42").unwrap();
        assert_eq!(table.value_at(1, 2).unwrap(), 42.0);
        assert!(table.is_dirty());
    }

    #[test]
    fn invalid_input_leaves_cell_unchanged() {
        let mut table = small_table();
        let before = table.value_at(0, 0).unwrap();
        let result = table.set_value(0, 0, "12.5.bogus");
        assert!(matches!(result, Err(TuneError::InvalidCellInput(_))));
        assert_eq!(table.value_at(0, 0).unwrap(), before);
        assert!(!table.is_dirty());
    }

    #[test]
    fn decimal_input_is_rejected() {
        let mut table = small_table();
        assert!(matches!(
            table.set_value(0, 0, "12.5"),
            Err(TuneError::InvalidCellInput(_))
        ));
    }

    #[test]
    fn out_of_bounds_read_and_write() {
        let mut table = small_table();
        assert!(matches!(
            table.value_at(3, 0),
            Err(TuneError::CellOutOfRange { .. })
        ));
        assert!(matches!(
            table.set_value(0, 3, "1"),
            Err(TuneError::CellOutOfRange { .. })
        ));
    }

    #[test]
    fn quadrant_on_exact_breakpoints() {
        let table = small_table();
        let hs = table.locate_quadrant(2000.0, 20.0);
        assert_eq!(hs.x_base, 1);
        assert_eq!(hs.y_base, 1);
        let mut cells = hs.cells().to_vec();
        cells.sort_unstable();
        assert_eq!(cells, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn quadrant_between_breakpoints() {
        let table = small_table();
        let hs = table.locate_quadrant(1500.0, 15.0);
        assert_eq!((hs.y_base, hs.x_base), (0, 0));
        assert_eq!(hs.cells().len(), 4);
        assert!(hs.contains(0, 0) && hs.contains(1, 1));
    }

    #[test]
    fn quadrant_below_range_is_partial() {
        let table = small_table();
        let hs = table.locate_quadrant(500.0, 5.0);
        assert_eq!((hs.y_base, hs.x_base), (-1, -1));
        // only the (0, 0) corner of the neighborhood is on the grid
        assert_eq!(hs.cells(), &[(0, 0)]);
    }

    #[test]
    fn quadrant_past_range_is_partial() {
        let table = small_table();
        let hs = table.locate_quadrant(9000.0, 90.0);
        assert_eq!((hs.y_base, hs.x_base), (2, 2));
        assert_eq!(hs.cells(), &[(2, 2)]);
        // below on y, past on x: only the top-right edge pair survives
        let hs = table.locate_quadrant(9000.0, -5.0);
        assert_eq!((hs.y_base, hs.x_base), (-1, 2));
        assert_eq!(hs.cells(), &[(0, 2)]);
        assert!(!hs.is_empty());
    }

    #[test]
    fn interpolation_matches_corners_and_midpoint() {
        let table = small_table();
        // dead center of the lower-left quadrant
        let mid = table.interpolate(1500.0, 15.0).unwrap();
        assert!((mid - 3.0).abs() < 1e-9); // mean of 1, 2, 4, 5
        let corner = table.interpolate(1000.0, 10.0).unwrap();
        assert!((corner - 1.0).abs() < 1e-9);
    }

    #[test]
    fn interpolation_rejects_unbracketed_reading() {
        let table = small_table();
        assert!(matches!(
            table.interpolate(500.0, 15.0),
            Err(TuneError::ReadingOutOfRange { .. })
        ));
        assert!(matches!(
            table.interpolate(1500.0, 35.0),
            Err(TuneError::ReadingOutOfRange { .. })
        ));
    }

    #[test]
    fn snapshot_round_trips_exactly() {
        let mut table = small_table();
        table.set_value(2, 2, "99").unwrap();
        let blob = table.to_json().unwrap();
        let restored = CalibrationTable::from_json(&blob).unwrap();
        for row in 0..table.row_count() {
            assert_eq!(
                restored.y_header(row).unwrap(),
                table.y_header(row).unwrap()
            );
            for col in 0..table.col_count() {
                assert_eq!(
                    restored.value_at(row, col).unwrap(),
                    table.value_at(row, col).unwrap()
                );
            }
        }
        for col in 0..table.col_count() {
            assert_eq!(
                restored.x_header(col).unwrap(),
                table.x_header(col).unwrap()
            );
        }
        assert!(!restored.is_dirty());
    }

    #[test]
    fn construction_rejects_bad_shapes() {
        assert!(matches!(
            CalibrationTable::from_parts(
                vec![1.0, 2.0],
                vec![1.0, 2.0],
                vec![vec![0.0, 0.0]],
            ),
            Err(TuneError::MalformedGrid { .. })
        ));
        assert!(matches!(
            CalibrationTable::from_parts(
                vec![2.0, 1.0],
                vec![1.0, 2.0],
                vec![vec![0.0, 0.0], vec![0.0, 0.0]],
            ),
            Err(TuneError::AxisNotIncreasing)
        ));
    }
}
