/// Pace Adjustment Pipeline
///
/// Turns a resampled course profile and the runner's inputs into per-checkpoint
/// paces and cumulative times:
///
/// 1. Base pace corrected once for the altitude and temperature deltas between
///    training and race conditions
/// 2. Per-checkpoint grade correction (uphill slower, downhill faster, unclamped,
///    so very steep descents can produce very fast or even negative paces)
/// 3. Position-dependent fatigue multiplier
/// 4. Segment time integration into cumulative time and a race summary
use tracing::{debug, info};

use crate::coefficients::PacingCoefficients;
use crate::elevation_resampler::{Checkpoint, ResampledProfile};
use crate::errors::{OutOfRangeWarning, PacingError, Result};
use crate::fatigue::FatigueCurve;

/// Finish distance tolerance between the inputs and the resampled profile.
const DISTANCE_TOLERANCE_KM: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaceAltitude {
    Fixed(f64),
    /// Mean elevation of the raw course profile
    ProfileMean,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionInputs {
    pub base_pace_sec_per_km: f64,
    pub training_altitude_m: f64,
    pub race_altitude: RaceAltitude,
    pub training_temp_c: f64,
    pub race_temp_c: f64,
    /// Fatigue amplitude in percent
    pub fatigue_a: f64,
    /// Fatigue curve steepness
    pub fatigue_b: f64,
    pub total_distance_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitResult {
    pub checkpoint: Checkpoint,
    pub adjusted_pace_sec_per_km: f64,
    pub fatigue_multiplier: f64,
    pub segment_time_sec: f64,
    pub cumulative_time_sec: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaceSummary {
    pub total_distance_km: f64,
    pub total_time_sec: f64,
    pub average_pace_sec_per_km: f64,
    /// Finish time at the uncorrected base pace
    pub base_time_sec: f64,
    pub race_altitude_m: f64,
    pub altitude_factor: f64,
    pub temperature_factor: f64,
    pub corrected_base_pace_sec_per_km: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PacingStrategy {
    pub splits: Vec<SplitResult>,
    pub summary: RaceSummary,
    pub warnings: Vec<OutOfRangeWarning>,
}

/// Base pace after the altitude and temperature corrections, plus the two
/// factors that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectedBase {
    pub pace_sec_per_km: f64,
    pub altitude_factor: f64,
    pub temperature_factor: f64,
}

pub fn corrected_base_pace(
    base_pace_sec_per_km: f64,
    training_altitude_m: f64,
    race_altitude_m: f64,
    training_temp_c: f64,
    race_temp_c: f64,
    coefficients: &PacingCoefficients,
) -> CorrectedBase {
    let altitude_factor = (race_altitude_m - training_altitude_m) / 1000.0 * coefficients.altitude_per_km;
    let temperature_factor = (race_temp_c - training_temp_c) * coefficients.temperature_per_degree;

    CorrectedBase {
        pace_sec_per_km: base_pace_sec_per_km * (1.0 + altitude_factor + temperature_factor),
        altitude_factor,
        temperature_factor,
    }
}

pub fn graded_pace(corrected_base_sec_per_km: f64, grade_percent: f64, grade_sensitivity: f64) -> f64 {
    corrected_base_sec_per_km * (1.0 + grade_percent / 100.0 * grade_sensitivity)
}

fn validate_inputs(inputs: &CorrectionInputs, profile: &ResampledProfile) -> Result<()> {
    if !inputs.base_pace_sec_per_km.is_finite() || inputs.base_pace_sec_per_km <= 0.0 {
        return Err(PacingError::InvalidInput(format!(
            "base pace must be positive, got {}s/km",
            inputs.base_pace_sec_per_km
        )));
    }
    if !inputs.total_distance_km.is_finite() || inputs.total_distance_km <= 0.0 {
        return Err(PacingError::InvalidInput(format!(
            "total distance must be positive, got {}km",
            inputs.total_distance_km
        )));
    }
    if !inputs.fatigue_b.is_finite() || inputs.fatigue_b <= 0.0 {
        return Err(PacingError::InvalidInput(format!(
            "fatigue steepness b must be positive, got {}",
            inputs.fatigue_b
        )));
    }

    let scalars = [
        ("training altitude", inputs.training_altitude_m),
        ("training temperature", inputs.training_temp_c),
        ("race temperature", inputs.race_temp_c),
        ("fatigue amplitude a", inputs.fatigue_a),
    ];
    if let Some((name, value)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
        return Err(PacingError::InvalidInput(format!("{} must be finite, got {}", name, value)));
    }
    if let RaceAltitude::Fixed(altitude) = inputs.race_altitude {
        if !altitude.is_finite() {
            return Err(PacingError::InvalidInput(format!(
                "race altitude must be finite, got {}",
                altitude
            )));
        }
    }

    if profile.checkpoints.len() < 2 {
        return Err(PacingError::InvalidProfile(format!(
            "need at least 2 checkpoints, got {}",
            profile.checkpoints.len()
        )));
    }
    let profile_end = profile.total_distance_km();
    if (profile_end - inputs.total_distance_km).abs() > DISTANCE_TOLERANCE_KM * inputs.total_distance_km.max(1.0) {
        return Err(PacingError::InvalidInput(format!(
            "profile ends at {}km but the race distance is {}km",
            profile_end, inputs.total_distance_km
        )));
    }

    Ok(())
}

pub fn compute_strategy(
    profile: ResampledProfile,
    inputs: CorrectionInputs,
    coefficients: &PacingCoefficients,
) -> Result<PacingStrategy> {
    validate_inputs(&inputs, &profile)?;

    let fatigue = FatigueCurve::new(inputs.fatigue_a, inputs.fatigue_b)?;
    let race_altitude_m = match inputs.race_altitude {
        RaceAltitude::Fixed(altitude) => altitude,
        RaceAltitude::ProfileMean => profile.source_mean_elevation_m,
    };

    let base = corrected_base_pace(
        inputs.base_pace_sec_per_km,
        inputs.training_altitude_m,
        race_altitude_m,
        inputs.training_temp_c,
        inputs.race_temp_c,
        coefficients,
    );
    debug!(
        "Corrected base pace {:.1}s/km (altitude {:+.4}, temperature {:+.4})",
        base.pace_sec_per_km, base.altitude_factor, base.temperature_factor
    );

    let mut splits = Vec::with_capacity(profile.checkpoints.len());
    let mut cumulative_time_sec = 0.0;

    for checkpoint in &profile.checkpoints {
        let graded = graded_pace(base.pace_sec_per_km, checkpoint.grade_percent, coefficients.grade_sensitivity);
        let fatigue_multiplier = fatigue.multiplier(checkpoint.distance_km, inputs.total_distance_km);
        let adjusted_pace_sec_per_km = graded * fatigue_multiplier;

        let segment_time_sec = adjusted_pace_sec_per_km * checkpoint.segment_length_km;
        cumulative_time_sec += segment_time_sec;

        splits.push(SplitResult {
            checkpoint: *checkpoint,
            adjusted_pace_sec_per_km,
            fatigue_multiplier,
            segment_time_sec,
            cumulative_time_sec,
        });
    }

    let total_time_sec = splits.last().map(|s| s.cumulative_time_sec).unwrap_or(0.0);
    let summary = RaceSummary {
        total_distance_km: inputs.total_distance_km,
        total_time_sec,
        average_pace_sec_per_km: total_time_sec / inputs.total_distance_km,
        base_time_sec: inputs.base_pace_sec_per_km * inputs.total_distance_km,
        race_altitude_m,
        altitude_factor: base.altitude_factor,
        temperature_factor: base.temperature_factor,
        corrected_base_pace_sec_per_km: base.pace_sec_per_km,
    };

    info!(
        "🏁 {:.3}km plan: {} splits, {:.0}s total, {:.1}s/km average",
        summary.total_distance_km,
        splits.len(),
        summary.total_time_sec,
        summary.average_pace_sec_per_km
    );

    Ok(PacingStrategy {
        splits,
        summary,
        warnings: profile.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevation_resampler::{resample, RawProfile};

    fn equal_conditions(total_distance_km: f64) -> CorrectionInputs {
        CorrectionInputs {
            base_pace_sec_per_km: 300.0,
            training_altitude_m: 500.0,
            race_altitude: RaceAltitude::Fixed(500.0),
            training_temp_c: 20.0,
            race_temp_c: 20.0,
            fatigue_a: 0.0,
            fatigue_b: 1.0,
            total_distance_km,
        }
    }

    fn flat_10k() -> ResampledProfile {
        let raw = RawProfile::from_pairs(&[(0.0, 500.0), (3.7, 500.0), (10.0, 500.0)]).unwrap();
        resample(&raw, 10.0, 1.0).unwrap()
    }

    #[test]
    fn test_flat_10k_at_five_minute_pace() {
        let strategy = compute_strategy(flat_10k(), equal_conditions(10.0), &PacingCoefficients::default()).unwrap();

        assert_eq!(strategy.splits.len(), 11);
        for split in &strategy.splits {
            assert_eq!(split.checkpoint.grade_percent, 0.0);
            assert_eq!(split.fatigue_multiplier, 1.0);
            assert!((split.adjusted_pace_sec_per_km - 300.0).abs() < 1e-9);
        }
        assert_eq!(strategy.splits[0].cumulative_time_sec, 0.0);
        assert!((strategy.summary.total_time_sec - 3000.0).abs() < 1e-6);
        assert!((strategy.summary.average_pace_sec_per_km - 300.0).abs() < 1e-6);
        assert_eq!(strategy.summary.base_time_sec, 3000.0);
        assert!(strategy.warnings.is_empty());
    }

    #[test]
    fn test_grade_only_deviation() {
        // 30m climb over the first km, then flat
        let raw = RawProfile::from_pairs(&[(0.0, 100.0), (1.0, 130.0), (3.0, 130.0)]).unwrap();
        let profile = resample(&raw, 3.0, 1.0).unwrap();
        let coefficients = PacingCoefficients::default();
        let strategy = compute_strategy(profile, equal_conditions(3.0), &coefficients).unwrap();

        // 300 * (1 + 30/100 * 0.3) = 327
        let climb = &strategy.splits[1];
        assert!((climb.checkpoint.grade_percent - 30.0).abs() < 1e-9);
        assert!((climb.adjusted_pace_sec_per_km - 327.0).abs() < 1e-9);
        assert!((strategy.splits[2].adjusted_pace_sec_per_km - 300.0).abs() < 1e-9);
        assert!((strategy.summary.total_time_sec - (300.0 + 327.0 + 300.0)).abs() < 1e-6);
    }

    #[test]
    fn test_altitude_and_temperature_correction() {
        let coefficients = PacingCoefficients::default();
        let base = corrected_base_pace(300.0, 500.0, 2000.0, 15.0, 25.0, &coefficients);

        // 1.5km higher: 1.5 * 0.02/0.3 = 0.1; 10C warmer: 10 * 0.01/5 = 0.02
        assert!((base.altitude_factor - 0.1).abs() < 1e-12);
        assert!((base.temperature_factor - 0.02).abs() < 1e-12);
        assert!((base.pace_sec_per_km - 336.0).abs() < 1e-9);
    }

    #[test]
    fn test_profile_mean_race_altitude() {
        let raw = RawProfile::from_pairs(&[(0.0, 500.0), (5.0, 500.0), (10.0, 2000.0)]).unwrap();
        let profile = resample(&raw, 10.0, 1.0).unwrap();
        let inputs = CorrectionInputs {
            race_altitude: RaceAltitude::ProfileMean,
            ..equal_conditions(10.0)
        };
        let strategy = compute_strategy(profile, inputs, &PacingCoefficients::default()).unwrap();

        assert!((strategy.summary.race_altitude_m - 1000.0).abs() < 1e-9);
        assert!((strategy.summary.altitude_factor - 0.5 * 0.02 / 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_cumulative_time_monotonic_with_fatigue() {
        let raw = RawProfile::from_pairs(&[(0.0, 10.0), (8.0, 90.0), (15.0, 20.0), (21.095, 40.0)]).unwrap();
        let profile = resample(&raw, 21.095, 1.0).unwrap();
        let inputs = CorrectionInputs {
            fatigue_a: 3.0,
            fatigue_b: 0.7,
            ..equal_conditions(21.095)
        };
        let strategy = compute_strategy(profile, inputs, &PacingCoefficients::default()).unwrap();

        for w in strategy.splits.windows(2) {
            assert!(w[1].cumulative_time_sec >= w[0].cumulative_time_sec);
        }
        let summary = strategy.summary;
        assert!((summary.average_pace_sec_per_km - summary.total_time_sec / summary.total_distance_km).abs() < 1e-6);
        let summed: f64 = strategy.splits.iter().map(|s| s.segment_time_sec).sum();
        assert!((summed - summary.total_time_sec).abs() < 1e-6);
    }

    #[test]
    fn test_fatigue_multiplies_graded_pace() {
        let raw = RawProfile::from_pairs(&[(0.0, 100.0), (2.0, 160.0), (4.0, 120.0), (6.0, 130.0)]).unwrap();
        let profile = resample(&raw, 6.0, 1.0).unwrap();
        let inputs = CorrectionInputs {
            fatigue_a: 4.0,
            fatigue_b: 1.5,
            ..equal_conditions(6.0)
        };
        let coefficients = PacingCoefficients::default();
        let strategy = compute_strategy(profile, inputs, &coefficients).unwrap();
        let curve = FatigueCurve::new(4.0, 1.5).unwrap();

        for split in &strategy.splits {
            let d = split.checkpoint.distance_km;
            let expected = graded_pace(300.0, split.checkpoint.grade_percent, coefficients.grade_sensitivity)
                * curve.multiplier(d, 6.0);
            assert!((split.adjusted_pace_sec_per_km - expected).abs() < 1e-9, "pace at {}km", d);
        }

        // At 1km: thirds at 2km and 4km, so 1 + 0.04/(1+e^-1.5) - 0.04/(1+e^4.5)
        let expected_multiplier = 1.0 + 0.04 / (1.0 + (-1.5f64).exp()) - 0.04 / (1.0 + 4.5f64.exp());
        let first_km = &strategy.splits[1];
        assert!((first_km.fatigue_multiplier - expected_multiplier).abs() < 1e-12);
        assert!(first_km.fatigue_multiplier > 1.0);
        // 30m/km climb: 300 * 1.09 before fatigue
        assert!((first_km.adjusted_pace_sec_per_km - 327.0 * expected_multiplier).abs() < 1e-9);
    }

    #[test]
    fn test_simplified_grade_sensitivity() {
        let raw = RawProfile::from_pairs(&[(0.0, 0.0), (1.0, 50.0)]).unwrap();
        let profile = resample(&raw, 1.0, 1.0).unwrap();
        let coefficients = PacingCoefficients { grade_sensitivity: 0.03, ..PacingCoefficients::default() };
        let strategy = compute_strategy(profile, equal_conditions(1.0), &coefficients).unwrap();

        // 300 * (1 + 50/100 * 0.03) = 304.5
        assert!((strategy.splits[1].adjusted_pace_sec_per_km - 304.5).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_inputs() {
        let coefficients = PacingCoefficients::default();

        let inputs = CorrectionInputs { base_pace_sec_per_km: 0.0, ..equal_conditions(10.0) };
        assert!(matches!(compute_strategy(flat_10k(), inputs, &coefficients), Err(PacingError::InvalidInput(_))));

        let inputs = CorrectionInputs { fatigue_b: 0.0, ..equal_conditions(10.0) };
        assert!(matches!(compute_strategy(flat_10k(), inputs, &coefficients), Err(PacingError::InvalidInput(_))));

        let inputs = CorrectionInputs { total_distance_km: -1.0, ..equal_conditions(10.0) };
        assert!(matches!(compute_strategy(flat_10k(), inputs, &coefficients), Err(PacingError::InvalidInput(_))));

        // Profile resampled for a different race
        let inputs = equal_conditions(21.095);
        assert!(matches!(compute_strategy(flat_10k(), inputs, &coefficients), Err(PacingError::InvalidInput(_))));
    }

    #[test]
    fn test_clamp_warnings_carried_to_strategy() {
        let raw = RawProfile::from_pairs(&[(0.0, 100.0), (9.0, 100.0)]).unwrap();
        let profile = resample(&raw, 10.0, 1.0).unwrap();
        let strategy = compute_strategy(profile, equal_conditions(10.0), &PacingCoefficients::default()).unwrap();

        assert_eq!(strategy.warnings.len(), 1);
        assert_eq!(strategy.warnings[0].requested_km, 10.0);
    }
}
