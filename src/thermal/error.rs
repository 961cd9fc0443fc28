use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThermalError {
    #[error("calibration anchors are degenerate: {0}")]
    DegenerateAnchors(&'static str),
    #[error("ADC sample {0} has no divider solution (expected 0..1024)")]
    SampleOutOfDomain(i64),
    #[error("cannot compute statistics over an empty series")]
    EmptySeries,
    #[error("failed to render plot: {0}")]
    Plot(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ThermalError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ThermalError::Plot(format!("{value:?}"))
    }
}

impl From<image::ImageError> for ThermalError {
    fn from(value: image::ImageError) -> Self {
        ThermalError::Plot(value.to_string())
    }
}
