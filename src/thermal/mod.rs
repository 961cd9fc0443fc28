pub mod curve;
pub mod error;
pub mod plot;
pub mod series;
pub mod source;

pub use curve::{calibrate, calibrate_with_reference, AnchorPoint, CalibrationCurve};
pub use error::ThermalError;
pub use plot::{render_curve_png, render_series_png, PlotStyle};
pub use series::{average, celsius_to_fahrenheit, convert_stream};
pub use source::{FileSamples, ManualSamples, SampleSource, SerialSamples};
