/// Pacing model coefficients
///
/// The calibration constants of the pace model are tunable: earlier versions of
/// the model shipped different values (notably the grade sensitivity), so they
/// are configuration rather than hard-coded constants.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::Result;

/// Pace cost of racing 1000m higher than training altitude.
pub const DEFAULT_ALTITUDE_PER_KM: f64 = 0.02 / 0.3;
/// Pace cost per degree Celsius warmer than training.
pub const DEFAULT_TEMPERATURE_PER_DEGREE: f64 = 0.01 / 5.0;
/// Pace multiplier slope per unit of grade.
pub const DEFAULT_GRADE_SENSITIVITY: f64 = 18.0 / 60.0;
pub const SIMPLIFIED_GRADE_SENSITIVITY: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingCoefficients {
    pub altitude_per_km: f64,
    pub temperature_per_degree: f64,
    pub grade_sensitivity: f64,
}

impl Default for PacingCoefficients {
    fn default() -> Self {
        PacingCoefficients {
            altitude_per_km: DEFAULT_ALTITUDE_PER_KM,
            temperature_per_degree: DEFAULT_TEMPERATURE_PER_DEGREE,
            grade_sensitivity: DEFAULT_GRADE_SENSITIVITY,
        }
    }
}

impl PacingCoefficients {
    pub fn from_preset(preset: CoefficientPreset) -> Self {
        match preset {
            CoefficientPreset::Standard => PacingCoefficients::default(),
            CoefficientPreset::Simplified => PacingCoefficients {
                grade_sensitivity: SIMPLIFIED_GRADE_SENSITIVITY,
                ..PacingCoefficients::default()
            },
        }
    }

    /// Load coefficients from a JSON file. Fields missing from the file keep
    /// their standard values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let coefficients: PacingCoefficients = serde_json::from_reader(BufReader::new(file))?;
        info!(
            "📄 Loaded coefficients from {}: altitude {:.4}, temperature {:.4}, grade {:.3}",
            path.display(),
            coefficients.altitude_per_km,
            coefficients.temperature_per_degree,
            coefficients.grade_sensitivity
        );
        Ok(coefficients)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CoefficientPreset {
    /// Grade sensitivity 18/60
    Standard,
    /// Flat grade sensitivity of 0.03
    Simplified,
}

/// Settings shared by every plan computed in one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    pub step_km: f64,
    pub coefficients: PacingCoefficients,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            step_km: 1.0,
            coefficients: PacingCoefficients::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_presets() {
        let standard = PacingCoefficients::from_preset(CoefficientPreset::Standard);
        assert_eq!(standard, PacingCoefficients::default());
        assert!((standard.grade_sensitivity - 0.3).abs() < 1e-12);

        let simplified = PacingCoefficients::from_preset(CoefficientPreset::Simplified);
        assert_eq!(simplified.grade_sensitivity, 0.03);
        assert_eq!(simplified.altitude_per_km, standard.altitude_per_km);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coefficients.json");
        let mut file = File::create(&path).unwrap();
        write!(file, "{{\"grade_sensitivity\": 0.5}}").unwrap();
        drop(file);

        let coefficients = PacingCoefficients::from_json_file(&path).unwrap();
        assert_eq!(coefficients.grade_sensitivity, 0.5);
        assert_eq!(coefficients.altitude_per_km, DEFAULT_ALTITUDE_PER_KM);
        assert_eq!(coefficients.temperature_per_degree, DEFAULT_TEMPERATURE_PER_DEGREE);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "grade = 3").unwrap();

        assert!(PacingCoefficients::from_json_file(&path).is_err());
    }
}
