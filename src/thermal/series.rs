use log::debug;

use crate::thermal::curve::CalibrationCurve;
use crate::thermal::error::ThermalError;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Converts a batch of raw line tokens into Fahrenheit readings.
///
/// Deliberately lenient, unlike `CalibrationCurve::convert`: tokens that do
/// not parse as an integer (the firmware interleaves `start`/`end` markers
/// with the counts) and samples the curve rejects are skipped, so one bad
/// line never discards the batch.
pub fn convert_stream<I, T>(curve: &CalibrationCurve, tokens: I) -> Vec<f64>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut readings = Vec::new();
    for token in tokens {
        let token = token.as_ref().trim();
        let Ok(raw) = token.parse::<i64>() else {
            debug!("skipping non-numeric sample token {token:?}");
            continue;
        };
        match curve.convert(raw) {
            Ok(celsius) => readings.push(celsius_to_fahrenheit(celsius)),
            Err(err) => debug!("skipping sample {raw}: {err}"),
        }
    }
    readings
}

/// Arithmetic mean of a series. Strict: an empty series is an error, not a
/// NaN.
pub fn average(samples: &[f64]) -> Result<f64, ThermalError> {
    if samples.is_empty() {
        return Err(ThermalError::EmptySeries);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermal::curve::{calibrate, AnchorPoint};

    fn known_curve() -> CalibrationCurve {
        calibrate(AnchorPoint::new(2.46, 20.0), AnchorPoint::new(0.318, 80.0)).unwrap()
    }

    #[test]
    fn stream_skips_marker_tokens() {
        let curve = known_curve();
        let readings = convert_stream(&curve, ["123", "start", "456", "end", "789"]);
        assert_eq!(readings.len(), 3);
    }

    #[test]
    fn stream_skips_out_of_domain_samples() {
        let curve = known_curve();
        let readings = convert_stream(&curve, ["500", "1024", "-3", "501"]);
        assert_eq!(readings.len(), 2);
    }

    #[test]
    fn stream_output_is_fahrenheit() {
        let curve = known_curve();
        let adc = 500;
        let celsius = curve.convert(adc).unwrap();
        let readings = convert_stream(&curve, [adc.to_string()]);
        assert_eq!(readings, vec![celsius * 9.0 / 5.0 + 32.0]);
    }

    #[test]
    fn unit_conversion() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
    }

    #[test]
    fn average_of_series() {
        assert_eq!(average(&[10.0, 20.0, 30.0]).unwrap(), 20.0);
        assert!(matches!(average(&[]), Err(ThermalError::EmptySeries)));
    }
}
