pub mod error;
pub mod presets;
pub mod session;
pub mod table;
pub mod telemetry;

pub use error::TuneError;
pub use session::{SerialConfig, TuningSession};
pub use table::{parse_cell_input, CalibrationTable, HighlightSet};
pub use telemetry::{ManualTelemetry, SerialTelemetry, TelemetryReading, TelemetrySource};
