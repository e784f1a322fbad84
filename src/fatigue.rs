/// Fatigue curve - position-dependent pace multiplier
///
/// Two opposed logistic steps centred on the one-third and two-thirds marks of
/// the course:
///
///   s(d) = a / (1 + exp(-b * (d1 - d))) - a / (1 + exp(-b * (d - d2)))
///   multiplier(d) = 1 + s(d)
///
/// With d1 = total/3 and d2 = 2*total/3 the deviation is point-symmetric about
/// the midpoint: s(total - d) = -s(d) and s(total / 2) = 0. A positive
/// amplitude slows the opening third and quickens the closing third.
use crate::errors::{PacingError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FatigueCurve {
    /// Amplitude as a percentage, e.g. 2.5 for 2.5%
    pub amplitude_percent: f64,
    pub steepness: f64,
}

impl FatigueCurve {
    pub fn new(amplitude_percent: f64, steepness: f64) -> Result<Self> {
        if !amplitude_percent.is_finite() {
            return Err(PacingError::InvalidInput(format!(
                "fatigue amplitude must be finite, got {}",
                amplitude_percent
            )));
        }
        if !steepness.is_finite() || steepness <= 0.0 {
            return Err(PacingError::InvalidInput(format!(
                "fatigue steepness must be positive, got {}",
                steepness
            )));
        }
        Ok(FatigueCurve { amplitude_percent, steepness })
    }

    pub fn multiplier(&self, distance_km: f64, total_distance_km: f64) -> f64 {
        1.0 + self.deviation(distance_km, total_distance_km)
    }

    fn deviation(&self, distance_km: f64, total_distance_km: f64) -> f64 {
        let a = self.amplitude_percent / 100.0;
        if a == 0.0 {
            return 0.0;
        }
        let b = self.steepness;
        let dist1 = total_distance_km / 3.0;
        let dist2 = 2.0 * dist1;

        a * logistic(b * (dist1 - distance_km)) - a * logistic(b * (distance_km - dist2))
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amplitude_is_neutral() {
        for &b in &[0.01, 0.5, 1.0, 10.0] {
            let curve = FatigueCurve::new(0.0, b).unwrap();
            for i in 0..=42 {
                assert_eq!(curve.multiplier(i as f64, 42.195), 1.0);
            }
        }
    }

    #[test]
    fn test_midpoint_symmetry() {
        let curve = FatigueCurve::new(4.0, 0.8).unwrap();
        let total = 21.095;

        assert!((curve.multiplier(total / 2.0, total) - 1.0).abs() < 1e-12);

        for i in 0..=20 {
            let d = i as f64;
            let early = curve.multiplier(d, total) - 1.0;
            let late = curve.multiplier(total - d, total) - 1.0;
            assert!((early + late).abs() < 1e-12, "asymmetric at {}km", d);
        }
    }

    #[test]
    fn test_positive_amplitude_shape() {
        let curve = FatigueCurve::new(5.0, 2.0).unwrap();
        let total = 30.0;

        let start = curve.multiplier(0.0, total);
        let finish = curve.multiplier(total, total);
        assert!(start > 1.04 && start <= 1.05);
        assert!(finish < 0.96 && finish >= 0.95);

        // Monotonically decreasing along the course for a > 0
        let mut previous = f64::INFINITY;
        for i in 0..=30 {
            let m = curve.multiplier(i as f64, total);
            assert!(m < previous);
            previous = m;
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(FatigueCurve::new(1.0, 0.0).is_err());
        assert!(FatigueCurve::new(1.0, -2.0).is_err());
        assert!(FatigueCurve::new(f64::NAN, 1.0).is_err());
    }
}
