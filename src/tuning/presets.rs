//! Built-in starting maps for a fresh tuning session. Axis breakpoints are
//! RPM (columns) by engine load percent (rows).

use crate::tuning::table::CalibrationTable;

/// Volumetric Efficiency starting map, 16 x 16.
pub fn volumetric_efficiency() -> CalibrationTable {
    let x_axis = vec![
        1000.0, 1050.0, 1101.0, 1401.0, 2001.0, 2601.0, 3101.0, 3700.0, 4300.0, 4900.0, 5400.0,
        6000.0, 6500.0, 7000.0, 7200.0, 7500.0,
    ];
    let y_axis = vec![
        30.1, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0, 80.0, 85.0, 90.0, 95.0, 98.0,
        100.0,
    ];
    let rows: [[f64; 16]; 16] = [
        [28.0, 30.0, 30.0, 37.0, 36.0, 36.0, 36.0, 36.0, 35.0, 35.0, 35.0, 35.0, 34.0, 34.0, 34.0, 34.0],
        [31.0, 31.0, 31.0, 38.0, 38.0, 38.0, 38.0, 38.0, 38.0, 38.0, 38.0, 38.0, 38.0, 38.0, 38.0, 38.0],
        [31.0, 31.0, 31.0, 39.0, 39.0, 39.0, 40.0, 40.0, 40.0, 41.0, 41.0, 41.0, 41.0, 42.0, 42.0, 42.0],
        [32.0, 32.0, 32.0, 40.0, 40.0, 41.0, 41.0, 42.0, 43.0, 43.0, 44.0, 44.0, 45.0, 45.0, 46.0, 46.0],
        [32.0, 33.0, 33.0, 41.0, 42.0, 42.0, 43.0, 44.0, 45.0, 46.0, 47.0, 48.0, 48.0, 49.0, 49.0, 50.0],
        [33.0, 33.0, 34.0, 39.0, 40.0, 41.0, 45.0, 46.0, 48.0, 49.0, 50.0, 51.0, 52.0, 53.0, 53.0, 54.0],
        [33.0, 34.0, 35.0, 31.0, 32.0, 34.0, 47.0, 48.0, 50.0, 51.0, 53.0, 54.0, 55.0, 57.0, 57.0, 58.0],
        [34.0, 35.0, 36.0, 32.0, 33.0, 35.0, 49.0, 51.0, 52.0, 54.0, 56.0, 57.0, 59.0, 60.0, 61.0, 62.0],
        [35.0, 36.0, 37.0, 33.0, 35.0, 37.0, 51.0, 53.0, 55.0, 57.0, 59.0, 61.0, 62.0, 64.0, 65.0, 66.0],
        [35.0, 36.0, 38.0, 34.0, 36.0, 38.0, 52.0, 55.0, 57.0, 60.0, 62.0, 64.0, 66.0, 68.0, 69.0, 70.0],
        [36.0, 37.0, 38.0, 35.0, 37.0, 40.0, 54.0, 57.0, 60.0, 62.0, 65.0, 67.0, 70.0, 72.0, 73.0, 74.0],
        [36.0, 38.0, 37.0, 38.0, 43.0, 46.0, 48.0, 51.0, 54.0, 57.0, 68.0, 71.0, 73.0, 76.0, 76.0, 78.0],
        [68.0, 69.0, 68.0, 74.0, 82.0, 85.0, 86.0, 86.0, 89.0, 92.0, 91.0, 92.0, 89.0, 87.0, 91.0, 93.0],
        [68.0, 70.0, 69.0, 75.0, 81.0, 83.0, 84.0, 84.0, 87.0, 91.0, 90.0, 91.0, 88.0, 87.0, 91.0, 93.0],
        [69.0, 72.0, 75.0, 79.0, 82.0, 84.0, 86.0, 86.0, 88.0, 92.0, 91.0, 93.0, 90.0, 89.0, 94.0, 95.0],
        [69.0, 72.0, 76.0, 80.0, 83.0, 85.0, 86.0, 87.0, 90.0, 93.0, 92.0, 94.0, 92.0, 91.0, 95.0, 97.0],
    ];
    build(x_axis, y_axis, &rows)
}

/// Spark Advance starting map, 12 x 12. Values are degrees before top dead
/// center.
pub fn spark_advance() -> CalibrationTable {
    let x_axis = vec![
        1000.0, 1001.0, 1200.0, 1500.0, 2000.0, 2600.0, 3100.0, 3700.0, 4300.0, 4900.0, 5400.0,
        6000.0,
    ];
    let y_axis = vec![
        20.1, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0,
    ];
    let rows: [[f64; 12]; 12] = [
        [18.6, 19.2, 20.0, 20.8, 22.4, 24.3, 25.3, 27.0, 28.7, 29.5, 30.2, 31.0],
        [18.5, 19.0, 19.9, 20.7, 22.3, 24.2, 25.2, 26.9, 28.6, 29.3, 30.0, 37.0],
        [18.3, 18.9, 19.7, 20.6, 22.2, 24.1, 25.1, 26.8, 28.5, 29.2, 29.8, 30.5],
        [18.2, 18.7, 19.6, 20.4, 22.0, 23.9, 24.9, 26.6, 28.3, 29.0, 29.5, 30.2],
        [18.0, 18.6, 19.4, 20.3, 21.9, 23.8, 24.8, 26.5, 28.2, 28.8, 29.3, 29.9],
        [17.9, 18.4, 19.3, 20.1, 21.7, 23.6, 24.7, 26.4, 28.1, 28.6, 29.1, 29.7],
        [17.7, 18.3, 19.1, 20.0, 21.6, 23.5, 24.5, 26.2, 28.0, 28.5, 28.9, 29.4],
        [17.4, 18.0, 18.8, 19.7, 21.3, 23.2, 24.3, 26.0, 27.7, 28.1, 28.4, 28.9],
        [17.8, 18.4, 19.2, 20.1, 21.7, 23.7, 24.7, 26.4, 28.8, 28.5, 28.7, 29.0],
        [17.8, 18.4, 19.2, 20.1, 21.8, 23.7, 24.7, 26.5, 28.8, 29.0, 29.2, 29.4],
        [17.5, 18.1, 18.9, 19.8, 21.5, 23.4, 24.5, 26.2, 28.6, 28.7, 28.7, 28.8],
        [17.2, 17.8, 18.7, 19.5, 21.2, 23.1, 24.2, 25.9, 28.3, 28.3, 28.3, 28.3],
    ];
    build(x_axis, y_axis, &rows)
}

fn build<const W: usize>(
    x_axis: Vec<f64>,
    y_axis: Vec<f64>,
    rows: &[[f64; W]],
) -> CalibrationTable {
    let cells = rows.iter().map(|row| row.to_vec()).collect();
    // Preset data is static and shape-checked by the tests below.
    match CalibrationTable::from_parts(x_axis, y_axis, cells) {
        Ok(table) => table,
        Err(err) => unreachable!("built-in preset is malformed: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ve_preset_shape() {
        let ve = volumetric_efficiency();
        assert_eq!(ve.row_count(), 16);
        assert_eq!(ve.col_count(), 16);
        assert_eq!(ve.value_at(0, 0).unwrap(), 28.0);
        assert_eq!(ve.value_at(15, 15).unwrap(), 97.0);
    }

    #[test]
    fn sa_preset_shape() {
        let sa = spark_advance();
        assert_eq!(sa.row_count(), 12);
        assert_eq!(sa.col_count(), 12);
        assert_eq!(sa.value_at(0, 0).unwrap(), 18.6);
        assert_eq!(sa.x_header(0).unwrap(), 1000.0);
        assert_eq!(sa.y_header(0).unwrap(), 20.1);
    }
}
