/// Resample a raw course profile and run the pace pipeline over it
use std::path::Path;

use tracing::warn;

use crate::coefficients::PlannerConfig;
use crate::elevation_resampler::{resample, RawProfile};
use crate::errors::Result;
use crate::pace_pipeline::{compute_strategy, CorrectionInputs, PacingStrategy, RaceAltitude};
use crate::profile_reader::load_profile;
use crate::race::{BasePace, RaceDistance};

/// Everything the runner enters, apart from the course profile itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanRequest {
    pub base_pace: BasePace,
    /// `None` plans over the full extent of the profile
    pub distance: Option<RaceDistance>,
    pub training_altitude_m: f64,
    pub race_altitude: RaceAltitude,
    pub training_temp_c: f64,
    pub race_temp_c: f64,
    pub fatigue_a: f64,
    pub fatigue_b: f64,
}

impl PlanRequest {
    pub fn total_distance_km(&self, raw: &RawProfile) -> f64 {
        self.distance.map(|d| d.km()).unwrap_or_else(|| raw.end_km())
    }

    pub fn correction_inputs(&self, total_distance_km: f64) -> CorrectionInputs {
        CorrectionInputs {
            base_pace_sec_per_km: self.base_pace.sec_per_km,
            training_altitude_m: self.training_altitude_m,
            race_altitude: self.race_altitude,
            training_temp_c: self.training_temp_c,
            race_temp_c: self.race_temp_c,
            fatigue_a: self.fatigue_a,
            fatigue_b: self.fatigue_b,
            total_distance_km,
        }
    }

    /// Log entries outside the ranges the pace model was calibrated on.
    pub fn warn_unusual_inputs(&self) {
        if !(-10.0..=10.0).contains(&self.fatigue_a) {
            warn!("⚠️  Fatigue amplitude {}% is outside the usual -10..10% range", self.fatigue_a);
        }
        if !(0.01..=10.0).contains(&self.fatigue_b) {
            warn!("⚠️  Fatigue steepness {} is outside the usual 0.01..10 range", self.fatigue_b);
        }
        for (label, temp) in [("Training", self.training_temp_c), ("Race", self.race_temp_c)] {
            if !(12.0..=40.0).contains(&temp) {
                warn!("⚠️  {} temperature {}C is outside the calibrated 12..40C range", label, temp);
            }
        }
        if self.base_pace.sec_per_km > 20.0 * 60.0 {
            warn!("⚠️  Base pace slower than 20:00/km");
        }
    }
}

pub fn plan_course(raw: &RawProfile, request: &PlanRequest, config: &PlannerConfig) -> Result<PacingStrategy> {
    let total_distance_km = request.total_distance_km(raw);
    let profile = resample(raw, total_distance_km, config.step_km)?;
    compute_strategy(profile, request.correction_inputs(total_distance_km), &config.coefficients)
}

pub fn plan_file(path: &Path, request: &PlanRequest, config: &PlannerConfig) -> Result<PacingStrategy> {
    let raw = load_profile(path)?;
    plan_course(&raw, request, config)
}
