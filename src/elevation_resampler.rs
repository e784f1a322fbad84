/// Elevation Resampler
///
/// Converts an irregular (distance, elevation) table into checkpoints at a fixed
/// distance step, with a final partial segment when the race distance is not a
/// multiple of the step.
///
/// Distances outside the raw profile are clamped to the nearest boundary
/// elevation rather than extrapolated. Every clamp is reported as an
/// `OutOfRangeWarning` on the resampled profile.
use tracing::{debug, warn};

use crate::errors::{OutOfRangeWarning, PacingError, Result};

/// Relative tolerance when deciding whether the last full step already lands
/// on the race distance.
const STEP_TOLERANCE: f64 = 1e-9;

/// Upper bound on checkpoints per profile.
pub const MAX_CHECKPOINTS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationSample {
    pub distance_km: f64,
    pub elevation_m: f64,
}

/// Elevation samples as supplied by the caller, at irregular distances.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProfile {
    samples: Vec<ElevationSample>,
}

impl RawProfile {
    /// Validates that there are at least two finite samples with strictly
    /// increasing distances.
    pub fn new(samples: Vec<ElevationSample>) -> Result<Self> {
        if samples.len() < 2 {
            return Err(PacingError::InvalidProfile(format!(
                "need at least 2 elevation samples, got {}",
                samples.len()
            )));
        }

        if let Some((i, s)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| !s.distance_km.is_finite() || !s.elevation_m.is_finite())
        {
            return Err(PacingError::InvalidProfile(format!(
                "sample {} is not finite ({}km, {}m)",
                i, s.distance_km, s.elevation_m
            )));
        }

        for (i, w) in samples.windows(2).enumerate() {
            if w[1].distance_km <= w[0].distance_km {
                return Err(PacingError::InvalidProfile(format!(
                    "distances must be strictly increasing: sample {} at {}km follows {}km",
                    i + 1,
                    w[1].distance_km,
                    w[0].distance_km
                )));
            }
        }

        Ok(RawProfile { samples })
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        RawProfile::new(
            pairs
                .iter()
                .map(|&(distance_km, elevation_m)| ElevationSample { distance_km, elevation_m })
                .collect(),
        )
    }

    pub fn samples(&self) -> &[ElevationSample] {
        &self.samples
    }

    pub fn start_km(&self) -> f64 {
        self.samples[0].distance_km
    }

    pub fn end_km(&self) -> f64 {
        self.samples[self.samples.len() - 1].distance_km
    }

    /// Mean of the raw sample elevations.
    pub fn mean_elevation_m(&self) -> f64 {
        self.samples.iter().map(|s| s.elevation_m).sum::<f64>() / self.samples.len() as f64
    }

    /// Linear interpolation at `distance_km`. The flag is set when the distance
    /// is outside the sampled range and the boundary elevation was used.
    fn elevation_at(&self, distance_km: f64) -> (f64, bool) {
        let first = &self.samples[0];
        let last = &self.samples[self.samples.len() - 1];

        if distance_km < first.distance_km {
            return (first.elevation_m, true);
        }
        if distance_km > last.distance_km {
            return (last.elevation_m, true);
        }

        // First sample at or beyond the target
        let upper = self.samples.partition_point(|s| s.distance_km < distance_km);
        if upper == 0 {
            return (first.elevation_m, false);
        }

        let a = &self.samples[upper - 1];
        let b = &self.samples[upper];
        let t = (distance_km - a.distance_km) / (b.distance_km - a.distance_km);
        (a.elevation_m + t * (b.elevation_m - a.elevation_m), false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkpoint {
    pub distance_km: f64,
    pub elevation_m: f64,
    /// Elevation change in metres per kilometre of the preceding segment,
    /// the unit the grade correction is calibrated against. 0 at the start.
    pub grade_percent: f64,
    pub segment_length_km: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResampledProfile {
    pub checkpoints: Vec<Checkpoint>,
    /// Mean elevation of the raw samples the profile was built from.
    pub source_mean_elevation_m: f64,
    pub warnings: Vec<OutOfRangeWarning>,
}

impl ResampledProfile {
    pub fn total_distance_km(&self) -> f64 {
        self.checkpoints.last().map(|c| c.distance_km).unwrap_or(0.0)
    }
}

/// Checkpoint distances: 0, step, 2*step, ... up to `total_km`, plus `total_km`
/// itself when it is not a whole number of steps.
pub fn target_distances(total_km: f64, step_km: f64) -> Vec<f64> {
    let full_steps = (total_km / step_km + STEP_TOLERANCE).floor() as usize;
    let mut distances: Vec<f64> = (0..=full_steps)
        .map(|i| i as f64 * step_km)
        .filter(|&d| d <= total_km)
        .collect();

    match distances.last().copied() {
        Some(last) if total_km - last <= step_km * STEP_TOLERANCE => {
            // Land exactly on the finish instead of a hair short of it
            if last > 0.0 {
                if let Some(end) = distances.last_mut() {
                    *end = total_km;
                }
            } else {
                distances.push(total_km);
            }
        }
        _ => distances.push(total_km),
    }

    distances
}

pub fn resample(raw: &RawProfile, total_distance_km: f64, step_km: f64) -> Result<ResampledProfile> {
    if !total_distance_km.is_finite() || total_distance_km <= 0.0 {
        return Err(PacingError::InvalidProfile(format!(
            "total distance must be positive, got {}",
            total_distance_km
        )));
    }
    if !step_km.is_finite() || step_km <= 0.0 {
        return Err(PacingError::InvalidInput(format!(
            "resample step must be positive, got {}",
            step_km
        )));
    }

    if total_distance_km / step_km > MAX_CHECKPOINTS as f64 {
        return Err(PacingError::InvalidInput(format!(
            "step {}km over {}km exceeds {} checkpoints",
            step_km, total_distance_km, MAX_CHECKPOINTS
        )));
    }

    let distances = target_distances(total_distance_km, step_km);
    let mut checkpoints: Vec<Checkpoint> = Vec::with_capacity(distances.len());
    let mut warnings = Vec::new();

    for &distance_km in &distances {
        let (elevation_m, clamped) = raw.elevation_at(distance_km);
        if clamped {
            let warning = OutOfRangeWarning {
                requested_km: distance_km,
                covered_start_km: raw.start_km(),
                covered_end_km: raw.end_km(),
                clamped_elevation_m: elevation_m,
            };
            warn!("⚠️  {}", warning);
            warnings.push(warning);
        }

        let (grade_percent, segment_length_km) = match checkpoints.last() {
            Some(prev) => {
                let length = distance_km - prev.distance_km;
                ((elevation_m - prev.elevation_m) / length, length)
            }
            None => (0.0, 0.0),
        };

        checkpoints.push(Checkpoint {
            distance_km,
            elevation_m,
            grade_percent,
            segment_length_km,
        });
    }

    debug!(
        "Resampled {} raw samples into {} checkpoints ({:.3}km step, {:.3}km total)",
        raw.samples().len(),
        checkpoints.len(),
        step_km,
        total_distance_km
    );

    Ok(ResampledProfile {
        checkpoints,
        source_mean_elevation_m: raw.mean_elevation_m(),
        warnings,
    })
}
