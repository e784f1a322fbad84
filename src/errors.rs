/// Error taxonomy for the pacing planner
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PacingError {
    #[error("Invalid elevation profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Could not read profile {path}: {reason}")]
    ProfileSource { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Coefficient file error: {0}")]
    Coefficients(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PacingError>;

/// Non-fatal: a resample distance fell outside the raw profile and was clamped
/// to the nearest boundary elevation.
#[derive(Debug, Clone, PartialEq)]
pub struct OutOfRangeWarning {
    pub requested_km: f64,
    pub covered_start_km: f64,
    pub covered_end_km: f64,
    pub clamped_elevation_m: f64,
}

impl fmt::Display for OutOfRangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "distance {:.3}km outside profile range [{:.3}, {:.3}]km, elevation clamped to {:.1}m",
            self.requested_km, self.covered_start_km, self.covered_end_km, self.clamped_elevation_m
        )
    }
}
