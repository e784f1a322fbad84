/// Display formatting for paces and times. Values are truncated to whole
/// seconds, not rounded.
use crate::pace_pipeline::{RaceSummary, SplitResult};

/// "hh:mm:ss"
pub fn format_hms(total_seconds: f64) -> String {
    if !total_seconds.is_finite() {
        return "--:--:--".to_string();
    }
    let sign = if total_seconds < 0.0 { "-" } else { "" };
    let secs = total_seconds.abs().trunc() as u64;
    format!("{}{:02}:{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// "mm:ss" per km
pub fn format_pace(sec_per_km: f64) -> String {
    if !sec_per_km.is_finite() {
        return "--:--".to_string();
    }
    let sign = if sec_per_km < 0.0 { "-" } else { "" };
    let secs = sec_per_km.abs().trunc() as u64;
    format!("{}{:02}:{:02}", sign, secs / 60, secs % 60)
}

/// One display row of the splits table.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRow {
    pub distance: String,
    pub elevation: String,
    pub grade: String,
    pub pace: String,
    pub cumulative_time: String,
}

impl From<&SplitResult> for SplitRow {
    fn from(split: &SplitResult) -> Self {
        SplitRow {
            distance: format!("{:.1}", split.checkpoint.distance_km),
            elevation: format!("{:.1}", split.checkpoint.elevation_m),
            grade: format!("{:.1}", split.checkpoint.grade_percent),
            pace: format_pace(split.adjusted_pace_sec_per_km),
            cumulative_time: format_hms(split.cumulative_time_sec),
        }
    }
}

pub fn finish_time(summary: &RaceSummary) -> String {
    format_hms(summary.total_time_sec)
}

pub fn average_pace(summary: &RaceSummary) -> String {
    format_pace(summary.average_pace_sec_per_km)
}

pub fn print_splits_table(splits: &[SplitResult]) {
    println!("\n📋 SPLITS");
    println!("{:>8} {:>10} {:>8} {:>7} {:>10}", "km", "elev (m)", "grade", "pace", "time");
    println!("{}", "-".repeat(47));
    for split in splits {
        let row = SplitRow::from(split);
        println!(
            "{:>8} {:>10} {:>8} {:>7} {:>10}",
            row.distance, row.elevation, row.grade, row.pace, row.cumulative_time
        );
    }
}
