use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuneError {
    #[error("cell ({row}, {col}) is outside a {rows}x{cols} table")]
    CellOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("cell input {0:?} does not parse as an integer")]
    InvalidCellInput(String),
    #[error("reading ({x}, {y}) is not bracketed by the table axes")]
    ReadingOutOfRange { x: f64, y: f64 },
    #[error("axis values must be strictly increasing")]
    AxisNotIncreasing,
    #[error("cell grid does not match axis lengths: expected {expected_rows}x{expected_cols}")]
    MalformedGrid {
        expected_rows: usize,
        expected_cols: usize,
    },
    #[error("table snapshot encoding failed: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
}
