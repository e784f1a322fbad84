/// Batch planning - one pacing plan per course profile in a folder
///
/// Every .csv/.gpx file under the folder is planned with the same runner
/// inputs. Courses that fail to load or plan are reported and skipped.
use std::path::{Path, PathBuf};

use csv::Writer;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::coefficients::PlannerConfig;
use crate::errors::Result;
use crate::formatting::{format_hms, format_pace};
use crate::planner::{plan_file, PlanRequest};
use crate::profile_reader::ProfileFormat;

pub const SUMMARY_FILE_NAME: &str = "pacing_batch_summary.csv";

#[derive(Debug, Serialize, Clone)]
pub struct CourseSummary {
    pub filename: String,
    pub distance_km: f64,
    pub finish_time_sec: f64,
    pub average_pace_sec_per_km: f64,
    pub race_altitude_m: f64,
    pub max_grade_percent: f64,
    pub clamped_checkpoints: usize,
    pub finish_time: String,
    pub average_pace: String,
}

pub fn find_profiles(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(folder) {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        if entry.file_type().is_file() && ProfileFormat::from_path(entry.path()).is_some() {
            paths.push(entry.into_path());
        }
    }
    // Keep our own summary out of the inputs on re-runs
    paths.retain(|p| p.file_name().and_then(|n| n.to_str()) != Some(SUMMARY_FILE_NAME));
    paths.sort();
    Ok(paths)
}

pub fn plan_folder(folder: &Path, request: &PlanRequest, config: &PlannerConfig) -> Result<Vec<CourseSummary>> {
    let paths = find_profiles(folder)?;
    info!(
        "⚡ Planning {} course profiles in parallel on {} cores",
        paths.len(),
        num_cpus::get()
    );

    let results: Vec<(PathBuf, Result<CourseSummary>)> = paths
        .par_iter()
        .map(|path| (path.clone(), summarize_course(path, request, config)))
        .collect();

    let mut summaries = Vec::new();
    for (path, result) in results {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => warn!("⚠️  Skipping {}: {}", path.display(), e),
        }
    }

    info!("✅ Planned {} out of {} courses", summaries.len(), paths.len());
    Ok(summaries)
}

fn summarize_course(path: &Path, request: &PlanRequest, config: &PlannerConfig) -> Result<CourseSummary> {
    let strategy = plan_file(path, request, config)?;
    let summary = strategy.summary;

    let max_grade_percent = strategy
        .splits
        .iter()
        .skip(1)
        .map(|s| s.checkpoint.grade_percent)
        .fold(f64::NEG_INFINITY, f64::max);

    Ok(CourseSummary {
        filename: path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string(),
        distance_km: summary.total_distance_km,
        finish_time_sec: summary.total_time_sec,
        average_pace_sec_per_km: summary.average_pace_sec_per_km,
        race_altitude_m: summary.race_altitude_m,
        max_grade_percent,
        clamped_checkpoints: strategy.warnings.len(),
        finish_time: format_hms(summary.total_time_sec),
        average_pace: format_pace(summary.average_pace_sec_per_km),
    })
}

pub fn write_batch_csv(summaries: &[CourseSummary], output_path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(output_path)?;
    for summary in summaries {
        wtr.serialize(summary)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_batch_summary(summaries: &[CourseSummary]) {
    let mut ranked: Vec<&CourseSummary> = summaries.iter().collect();
    ranked.sort_by(|a, b| a.average_pace_sec_per_km.total_cmp(&b.average_pace_sec_per_km));

    println!("\n📊 BATCH PACING SUMMARY (fastest average pace first)");
    println!("====================================================");
    for (i, s) in ranked.iter().enumerate() {
        println!(
            "{:>3}. {:<32} {:>8.3}km  finish {}  avg {}/km  max grade {:.1}{}",
            i + 1,
            s.filename,
            s.distance_km,
            s.finish_time,
            s.average_pace,
            s.max_grade_percent,
            if s.clamped_checkpoints > 0 { "  ⚠️ clamped" } else { "" }
        );
    }
}
