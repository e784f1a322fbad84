use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueHint};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod batch_planner;
mod coefficients;
mod elevation_resampler;
mod errors;
mod fatigue;
mod formatting;
mod pace_pipeline;
mod planner;
mod profile_reader;
mod race;
mod split_report;

use coefficients::{CoefficientPreset, PacingCoefficients, PlannerConfig};
use formatting::{average_pace, finish_time, format_hms, format_pace, print_splits_table};
use pace_pipeline::RaceAltitude;
use planner::{plan_course, PlanRequest};
use profile_reader::load_profile;
use race::{BasePace, RaceDistance};

#[derive(Parser, Debug)]
#[command(author, version, about = "Race pacing planner: grade, altitude, temperature and fatigue adjusted splits", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan splits for one course profile (CSV or GPX)
    Plan(PlanArgs),
    /// Plan every CSV/GPX course profile in a folder
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Elevation profile: CSV with distance (km) and elevation (m) columns, or a GPX track
    #[arg(value_hint = ValueHint::FilePath)]
    profile: PathBuf,

    #[command(flatten)]
    runner: RunnerArgs,

    /// Write the splits table to this CSV file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Folder searched recursively for course profiles
    #[arg(value_hint = ValueHint::DirPath)]
    folder: PathBuf,

    #[command(flatten)]
    runner: RunnerArgs,

    /// Summary CSV path (defaults to pacing_batch_summary.csv inside the folder)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunnerArgs {
    /// Base pace as m:ss per km (overrides --pace-min/--pace-sec)
    #[arg(long)]
    pace: Option<String>,

    #[arg(long, default_value_t = 5)]
    pace_min: u32,

    #[arg(long, default_value_t = 0)]
    pace_sec: u32,

    /// 10k, half, marathon, a distance in km, or "profile" for the whole profile
    #[arg(short, long, default_value = "marathon")]
    distance: String,

    /// Training altitude (m above sea level)
    #[arg(long, default_value_t = 500.0, allow_negative_numbers = true)]
    training_altitude: f64,

    /// Race altitude (m); defaults to the mean elevation of the course profile
    #[arg(long, allow_negative_numbers = true)]
    race_altitude: Option<f64>,

    /// Training temperature (C)
    #[arg(long, default_value_t = 25.0, allow_negative_numbers = true)]
    training_temp: f64,

    /// Race temperature (C)
    #[arg(long, default_value_t = 25.0, allow_negative_numbers = true)]
    race_temp: f64,

    /// Fatigue amplitude a (%)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    fatigue_a: f64,

    /// Fatigue curve steepness b
    #[arg(long, default_value_t = 1.0)]
    fatigue_b: f64,

    /// Checkpoint spacing (km)
    #[arg(long, default_value_t = 1.0)]
    step: f64,

    #[arg(long, value_enum, default_value_t = CoefficientPreset::Standard)]
    preset: CoefficientPreset,

    /// JSON file overriding the model coefficients
    #[arg(long, value_hint = ValueHint::FilePath)]
    coefficients: Option<PathBuf>,
}

impl RunnerArgs {
    fn plan_request(&self) -> Result<PlanRequest> {
        let base_pace = match &self.pace {
            Some(pace) => BasePace::parse(pace)?,
            None => BasePace::from_min_sec(self.pace_min, self.pace_sec)?,
        };
        let distance = match self.distance.trim().to_lowercase().as_str() {
            "profile" => None,
            other => Some(other.parse::<RaceDistance>()?),
        };
        let race_altitude = self
            .race_altitude
            .map(RaceAltitude::Fixed)
            .unwrap_or(RaceAltitude::ProfileMean);

        let request = PlanRequest {
            base_pace,
            distance,
            training_altitude_m: self.training_altitude,
            race_altitude,
            training_temp_c: self.training_temp,
            race_temp_c: self.race_temp,
            fatigue_a: self.fatigue_a,
            fatigue_b: self.fatigue_b,
        };
        request.warn_unusual_inputs();
        Ok(request)
    }

    fn planner_config(&self) -> Result<PlannerConfig> {
        let coefficients = match &self.coefficients {
            Some(path) => PacingCoefficients::from_json_file(path)
                .with_context(|| format!("loading coefficients from {}", path.display()))?,
            None => PacingCoefficients::from_preset(self.preset),
        };
        Ok(PlannerConfig {
            step_km: self.step,
            coefficients,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Plan(args) => handle_plan(args),
        Command::Batch(args) => handle_batch(args),
    }
}

fn handle_plan(args: PlanArgs) -> Result<()> {
    let request = args.runner.plan_request()?;
    let config = args.runner.planner_config()?;

    let raw = load_profile(&args.profile)
        .with_context(|| format!("reading course profile {}", args.profile.display()))?;
    let total_distance_km = request.total_distance_km(&raw);
    let race_label = request
        .distance
        .map(|d| d.to_string())
        .unwrap_or_else(|| format!("{:.3} Km", total_distance_km));

    println!("\n🏃 RACE PACING PLAN");
    println!("===================");
    println!(
        "➡️  Base pace: {}/km over {}",
        format_pace(request.base_pace.sec_per_km),
        race_label
    );
    println!(
        "ℹ️  Base time estimate: {}",
        format_hms(request.base_pace.base_time_sec(total_distance_km))
    );

    let strategy = plan_course(&raw, &request, &config)?;
    let summary = &strategy.summary;

    println!("ℹ️  Race altitude: {:.0} m", summary.race_altitude_m);
    println!(
        "ℹ️  Corrected base pace: {}/km (altitude {:+.2}%, temperature {:+.2}%)",
        format_pace(summary.corrected_base_pace_sec_per_km),
        summary.altitude_factor * 100.0,
        summary.temperature_factor * 100.0
    );

    print_splits_table(&strategy.splits);

    if !strategy.warnings.is_empty() {
        warn!(
            "⚠️  {} checkpoints fall outside the elevation profile and use its boundary elevation",
            strategy.warnings.len()
        );
    }

    println!("\n⏱️  Estimated finish time for {}: {}", race_label, finish_time(summary));
    println!("⚡ Average pace for {}: {} min/km", race_label, average_pace(summary));
    let delta_sec = summary.total_time_sec - summary.base_time_sec;
    println!(
        "📈 Versus base time estimate: {}{}",
        if delta_sec < 0.0 { "-" } else { "+" },
        format_hms(delta_sec.abs())
    );

    if let Some(output) = &args.output {
        split_report::write_splits_csv(&strategy, output)
            .with_context(|| format!("writing splits to {}", output.display()))?;
    }

    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<()> {
    let request = args.runner.plan_request()?;
    let config = args.runner.planner_config()?;

    let summaries = batch_planner::plan_folder(&args.folder, &request, &config)
        .with_context(|| format!("scanning {}", args.folder.display()))?;

    if summaries.is_empty() {
        println!("⚠️  No course profiles could be planned");
        return Ok(());
    }

    batch_planner::print_batch_summary(&summaries);

    let output = args
        .output
        .unwrap_or_else(|| args.folder.join(batch_planner::SUMMARY_FILE_NAME));
    batch_planner::write_batch_csv(&summaries, &output)
        .with_context(|| format!("writing batch summary to {}", output.display()))?;
    info!("📁 Results saved to: {}", output.display());

    Ok(())
}
