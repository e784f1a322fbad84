/// Course profile loading from CSV elevation tables and GPX tracks
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use geo::{point, HaversineDistance};
use gpx::read;
use serde::Deserialize;
use tracing::{debug, info};

use crate::elevation_resampler::{ElevationSample, RawProfile};
use crate::errors::{PacingError, Result};

#[derive(Debug, Deserialize)]
struct ProfileRecord {
    #[serde(alias = "distancia_km", alias = "distance (km)", alias = "distance")]
    distance_km: f64,
    #[serde(alias = "altitud_m", alias = "elevation (m)", alias = "elevation", alias = "altitude_m")]
    elevation_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    Csv,
    Gpx,
}

impl ProfileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "csv" => Some(ProfileFormat::Csv),
            "gpx" => Some(ProfileFormat::Gpx),
            _ => None,
        }
    }
}

pub fn load_profile(path: &Path) -> Result<RawProfile> {
    let format = ProfileFormat::from_path(path).ok_or_else(|| PacingError::ProfileSource {
        path: path.to_path_buf(),
        reason: "expected a .csv or .gpx file".to_string(),
    })?;

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let profile = match format {
        ProfileFormat::Csv => read_csv_profile(reader),
        ProfileFormat::Gpx => read_gpx_profile(reader),
    }
    .map_err(|e| match e {
        PacingError::ProfileSource { reason, .. } => PacingError::ProfileSource {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })?;

    info!(
        "📄 Loaded {} elevation samples from {} ({:.3}km)",
        profile.samples().len(),
        path.display(),
        profile.end_km()
    );
    Ok(profile)
}

/// Elevation table with "distance (km)" and "elevation (m)" columns. Other
/// columns are ignored.
pub fn read_csv_profile<R: Read>(reader: R) -> Result<RawProfile> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut samples = Vec::new();
    for result in rdr.deserialize::<ProfileRecord>() {
        let record = result?;
        samples.push(ElevationSample {
            distance_km: record.distance_km,
            elevation_m: record.elevation_m,
        });
    }

    RawProfile::new(samples)
}

/// Track points with elevation, at cumulative haversine distance from the
/// first point. Points without elevation and stationary points are skipped.
pub fn read_gpx_profile<R: Read>(reader: R) -> Result<RawProfile> {
    let gpx = read(reader).map_err(|e| PacingError::ProfileSource {
        path: Default::default(),
        reason: e.to_string(),
    })?;

    let mut samples: Vec<ElevationSample> = Vec::new();
    let mut previous: Option<geo::Point<f64>> = None;
    let mut distance_m = 0.0;
    let mut skipped = 0;

    for track in gpx.tracks {
        for segment in track.segments {
            for pt in segment.points {
                let Some(elevation) = pt.elevation else {
                    skipped += 1;
                    continue;
                };
                let here = point!(x: pt.point().x(), y: pt.point().y());

                if let Some(prev) = previous {
                    let step = prev.haversine_distance(&here);
                    if step <= 0.0 {
                        skipped += 1;
                        continue;
                    }
                    distance_m += step;
                }
                previous = Some(here);

                samples.push(ElevationSample {
                    distance_km: distance_m / 1000.0,
                    elevation_m: elevation,
                });
            }
        }
    }

    if samples.is_empty() {
        return Err(PacingError::ProfileSource {
            path: Default::default(),
            reason: "no track points with elevation".to_string(),
        });
    }
    if skipped > 0 {
        debug!("Skipped {} GPX points without elevation or movement", skipped);
    }

    RawProfile::new(samples)
}
