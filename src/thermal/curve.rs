use crate::thermal::error::ThermalError;

/// ADC full-scale count of the sensing hardware (10-bit converter).
pub const ADC_FULL_SCALE: f64 = 1024.0;

/// Reference resistor of the known-good divider, in kOhms.
pub const DEFAULT_REFERENCE_KOHMS: f64 = 2.49;

/// One calibration anchor: measured thermistor resistance (kOhms) at a
/// known temperature (Celsius).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorPoint {
    pub resistance: f64,
    pub temperature: f64,
}

impl AnchorPoint {
    pub fn new(resistance: f64, temperature: f64) -> Self {
        Self {
            resistance,
            temperature,
        }
    }
}

/// Inverse transfer function from raw ADC counts to Celsius.
///
/// Built once per calibration session and reused for every sample; immutable
/// and freely shareable across threads.
///
/// The thermistor sits in a divider against `reference_kohms`, so
/// `adc = 1024 * R / (R + reference)`. With the two-point linear model
/// `R = intercept + slope * t`, the inverse has a closed form: recover
/// `R(adc) = reference * adc / (1024 - adc)`, then `t = (R - intercept) / slope`.
#[derive(Clone, Copy, Debug)]
pub struct CalibrationCurve {
    slope: f64,
    intercept: f64,
    reference_kohms: f64,
}

/// Fits the resistance-over-temperature line through two anchors and
/// derives the divider inverse. Ordinary least squares over exactly two
/// points reduces to the secant line, so the fit is exact.
pub fn calibrate(p1: AnchorPoint, p2: AnchorPoint) -> Result<CalibrationCurve, ThermalError> {
    calibrate_with_reference(p1, p2, DEFAULT_REFERENCE_KOHMS)
}

pub fn calibrate_with_reference(
    p1: AnchorPoint,
    p2: AnchorPoint,
    reference_kohms: f64,
) -> Result<CalibrationCurve, ThermalError> {
    if p1.temperature == p2.temperature {
        return Err(ThermalError::DegenerateAnchors(
            "anchor temperatures are equal",
        ));
    }
    if p1.resistance == p2.resistance {
        return Err(ThermalError::DegenerateAnchors(
            "anchor resistances are equal",
        ));
    }
    if reference_kohms <= 0.0 {
        return Err(ThermalError::DegenerateAnchors(
            "reference resistance must be positive",
        ));
    }
    let slope = (p2.resistance - p1.resistance) / (p2.temperature - p1.temperature);
    let intercept = p1.resistance - slope * p1.temperature;
    Ok(CalibrationCurve {
        slope,
        intercept,
        reference_kohms,
    })
}

impl CalibrationCurve {
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Strict single-sample conversion to Celsius. Counts outside
    /// `[0, 1024)` leave the divider equation without a physical solution
    /// and are rejected.
    pub fn convert(&self, raw_adc: i64) -> Result<f64, ThermalError> {
        if raw_adc < 0 || raw_adc as f64 >= ADC_FULL_SCALE {
            return Err(ThermalError::SampleOutOfDomain(raw_adc));
        }
        let adc = raw_adc as f64;
        let resistance = self.reference_kohms * adc / (ADC_FULL_SCALE - adc);
        Ok((resistance - self.intercept) / self.slope)
    }

    /// The ADC count the divider would produce at a given temperature.
    /// Forward direction of `convert`, used for plotting and sanity checks.
    pub fn expected_adc(&self, temperature: f64) -> f64 {
        let resistance = self.intercept + self.slope * temperature;
        ADC_FULL_SCALE * resistance / (resistance + self.reference_kohms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Known-good thermistor anchors: 2.46 kOhm at 20 C, 0.318 kOhm at 80 C.
    fn known_curve() -> CalibrationCurve {
        calibrate(AnchorPoint::new(2.46, 20.0), AnchorPoint::new(0.318, 80.0)).unwrap()
    }

    #[test]
    fn secant_fit_through_both_anchors() {
        let curve = known_curve();
        assert!((curve.slope() - (-0.0357)).abs() < 1e-4);
        assert!((curve.intercept() - 3.174).abs() < 1e-3);
    }

    #[test]
    fn convert_recovers_anchor_temperatures() {
        let curve = known_curve();
        // ADC counts the divider would produce at the two anchors
        let adc_cold = curve.expected_adc(20.0).round() as i64;
        let adc_hot = curve.expected_adc(80.0).round() as i64;
        let cold = curve.convert(adc_cold).unwrap();
        let hot = curve.convert(adc_hot).unwrap();
        // rounding the count to an integer costs a little accuracy
        assert!((cold - 20.0).abs() < 1.0, "got {cold}");
        assert!((hot - 80.0).abs() < 1.0, "got {hot}");
    }

    #[test]
    fn conversion_is_monotonic_for_ntc() {
        let curve = known_curve();
        // thermistor resistance falls with temperature, so a lower count
        // means a hotter sensor
        let t_low = curve.convert(200).unwrap();
        let t_high = curve.convert(600).unwrap();
        assert!(t_low > t_high);
    }

    #[test]
    fn degenerate_anchors_are_rejected() {
        assert!(matches!(
            calibrate(AnchorPoint::new(1.0, 20.0), AnchorPoint::new(1.0, 80.0)),
            Err(ThermalError::DegenerateAnchors(_))
        ));
        assert!(matches!(
            calibrate(AnchorPoint::new(2.4, 50.0), AnchorPoint::new(0.3, 50.0)),
            Err(ThermalError::DegenerateAnchors(_))
        ));
    }

    #[test]
    fn out_of_domain_samples_are_rejected() {
        let curve = known_curve();
        assert!(matches!(
            curve.convert(1024),
            Err(ThermalError::SampleOutOfDomain(1024))
        ));
        assert!(matches!(
            curve.convert(-1),
            Err(ThermalError::SampleOutOfDomain(-1))
        ));
        assert!(curve.convert(0).is_ok());
        assert!(curve.convert(1023).is_ok());
    }
}
