use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::*;

use crate::thermal::curve::CalibrationCurve;
use crate::thermal::error::ThermalError;

/// Seconds between consecutive ADC samples in the firmware dump.
pub const SAMPLE_PERIOD_SECONDS: f64 = 0.5;

#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub trace: RGBColor,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            background: WHITE,
            trace: BLUE,
        }
    }
}

/// Renders the converted temperature series against elapsed seconds.
pub fn render_series_png(readings: &[f64], style: PlotStyle) -> Result<Vec<u8>, ThermalError> {
    if readings.is_empty() {
        return Err(ThermalError::Plot("temperature series is empty".into()));
    }
    let y_min = readings.iter().copied().fold(f64::INFINITY, f64::min);
    let y_max = readings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (y_min, y_max) = if (y_max - y_min).abs() < f64::EPSILON {
        (y_min - 1.0, y_max + 1.0)
    } else {
        (y_min, y_max)
    };
    let x_max = readings.len() as f64 * SAMPLE_PERIOD_SECONDS;

    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption("Thermistor Temperature", ("sans-serif", 20).into_font())
            .set_label_area_size(LabelAreaPosition::Left, 45)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(0f64..x_max, y_min..y_max)?;
        chart.configure_mesh().draw()?;
        let series = readings
            .iter()
            .enumerate()
            .map(|(i, t)| (i as f64 * SAMPLE_PERIOD_SECONDS, *t));
        chart.draw_series(LineSeries::new(series, &style.trace))?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}

/// Renders the inverse transfer function: temperature over the valid ADC
/// domain between the two anchor temperatures.
pub fn render_curve_png(
    curve: &CalibrationCurve,
    temp_range: (f64, f64),
    style: PlotStyle,
) -> Result<Vec<u8>, ThermalError> {
    let (t_lo, t_hi) = temp_range;
    if t_lo >= t_hi {
        return Err(ThermalError::Plot("empty temperature range".into()));
    }
    let adc_lo = curve.expected_adc(t_hi).min(curve.expected_adc(t_lo));
    let adc_hi = curve.expected_adc(t_hi).max(curve.expected_adc(t_lo));

    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption("Calibration Curve", ("sans-serif", 20).into_font())
            .set_label_area_size(LabelAreaPosition::Left, 45)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(adc_lo..adc_hi, t_lo..t_hi)?;
        chart.configure_mesh().draw()?;
        let points: Vec<(f64, f64)> = (0..=256)
            .map(|i| {
                let adc = adc_lo + (adc_hi - adc_lo) * i as f64 / 256.0;
                let temp = curve.convert(adc.round() as i64).unwrap_or(t_lo);
                (adc, temp)
            })
            .collect();
        chart.draw_series(LineSeries::new(points, &style.trace))?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ThermalError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| ThermalError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    DynamicImage::ImageRgb8(image).write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermal::curve::{calibrate, AnchorPoint};

    #[test]
    fn series_plot_returns_png() {
        let png = render_series_png(&[68.0, 70.5, 73.0, 71.2], PlotStyle::default()).unwrap();
        assert!(!png.is_empty());
        // PNG magic
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn empty_series_is_rejected() {
        assert!(matches!(
            render_series_png(&[], PlotStyle::default()),
            Err(ThermalError::Plot(_))
        ));
    }

    #[test]
    fn curve_plot_returns_png() {
        let curve =
            calibrate(AnchorPoint::new(2.46, 20.0), AnchorPoint::new(0.318, 80.0)).unwrap();
        let png = render_curve_png(&curve, (20.0, 80.0), PlotStyle::default()).unwrap();
        assert!(!png.is_empty());
    }
}
