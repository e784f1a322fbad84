/// CSV export of a computed pacing strategy
use std::io::Write;
use std::path::Path;

use csv::Writer;
use serde::Serialize;
use tracing::info;

use crate::errors::Result;
use crate::formatting::{format_hms, format_pace};
use crate::pace_pipeline::{PacingStrategy, SplitResult};

#[derive(Debug, Serialize)]
struct SplitRecord {
    distance_km: f64,
    elevation_m: f64,
    grade_percent: f64,
    segment_length_km: f64,
    fatigue_multiplier: f64,
    pace_sec_per_km: f64,
    segment_time_sec: f64,
    cumulative_time_sec: f64,
    pace: String,
    cumulative_time: String,
}

impl From<&SplitResult> for SplitRecord {
    fn from(split: &SplitResult) -> Self {
        SplitRecord {
            distance_km: split.checkpoint.distance_km,
            elevation_m: split.checkpoint.elevation_m,
            grade_percent: split.checkpoint.grade_percent,
            segment_length_km: split.checkpoint.segment_length_km,
            fatigue_multiplier: split.fatigue_multiplier,
            pace_sec_per_km: split.adjusted_pace_sec_per_km,
            segment_time_sec: split.segment_time_sec,
            cumulative_time_sec: split.cumulative_time_sec,
            pace: format_pace(split.adjusted_pace_sec_per_km),
            cumulative_time: format_hms(split.cumulative_time_sec),
        }
    }
}

pub fn write_splits<W: Write>(strategy: &PacingStrategy, writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for split in &strategy.splits {
        wtr.serialize(SplitRecord::from(split))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_splits_csv(strategy: &PacingStrategy, output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    write_splits(strategy, file)?;
    info!("📁 Splits saved to: {}", output_path.display());
    Ok(())
}
