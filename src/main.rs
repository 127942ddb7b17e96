//! fitcommit - body-fat progress and daily calorie needs

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fitcommit::body::{Gender, calculate_bmi, format_bmi, try_calculate_mifflin_st_jeor};
use fitcommit::config::Config;
use fitcommit::profile::Profile;
use fitcommit::progress::{HistoryReport, MilestoneKind, Period, ProgressPoint, latest_body_fat};
use fitcommit::scan::{AfterPhotoRequest, AnalyzeImagesRequest, extract_body_fat_percentage, parse_analysis_response};
use fitcommit::tdee::{self, ActivityLevel, ExerciseFrequency, TdeeBreakdown, TdeeInputs};
use fitcommit::Database;

#[derive(Parser)]
#[command(name = "fitcommit")]
#[command(author, version, about = "Body-fat progress tracking and TDEE estimates")]
struct Cli {
    /// Config file (defaults to ./fitcommit.toml if present)
    #[arg(long, global = true, env = "FITCOMMIT_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, global = true)]
    db: Option<String>,

    /// Profile id
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate daily calorie needs
    Tdee {
        /// Body weight in kg
        #[arg(short, long)]
        weight: f64,

        /// Body fat percentage (defaults to the configured value, 15%)
        #[arg(short, long)]
        body_fat: Option<f64>,

        /// Activity level, either vocabulary (e.g. "sedentary", "Athlete (2x per day)")
        #[arg(short, long, default_value = "sedentary")]
        activity: String,

        /// Exercise frequency: none, 1-2, 3-4, 5-6, daily
        #[arg(short, long)]
        frequency: Option<String>,

        /// Reject out-of-range numbers and unrecognized labels
        #[arg(long)]
        strict: bool,

        /// Print the full breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// Basal metabolic rate (Katch-McArdle with body fat, else Mifflin-St Jeor)
    Bmr {
        #[arg(short, long)]
        weight: f64,

        #[arg(short, long)]
        body_fat: Option<f64>,

        /// Height in cm (Mifflin-St Jeor)
        #[arg(long)]
        height: Option<f64>,

        #[arg(long)]
        age: Option<u32>,

        #[arg(long)]
        gender: Option<Gender>,
    },

    /// Body mass index
    Bmi {
        #[arg(short, long)]
        weight: f64,

        /// Height in cm
        #[arg(long)]
        height: f64,
    },

    /// List activity levels and exercise-frequency bonuses
    Levels,

    /// Manage the stored profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// Record a body scan result and refresh the stored TDEE
    Scan {
        /// Body fat percentage
        body_fat: Option<f64>,

        /// Free-text estimate, e.g. "around 18.5%"
        #[arg(long, conflicts_with = "body_fat")]
        text: Option<String>,

        /// Saved JSON response from the analysis service
        #[arg(long, conflicts_with_all = ["body_fat", "text"])]
        response: Option<PathBuf>,

        /// Analysis rationale to keep with the measurement
        #[arg(long)]
        analysis: Option<String>,

        /// Front, side and back photo URLs of this check-in
        #[arg(long, num_args = 3, value_names = ["FRONT", "SIDE", "BACK"])]
        images: Vec<String>,
    },

    /// Show body-fat history with chart range and milestones
    History {
        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Window: week, month, 3months, 6months, year, all
        #[arg(short, long, default_value = "all")]
        period: Period,

        /// Print points, chart range and milestones as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored check-ins with their BMI/TDEE snapshots
    Scans {
        /// Window: week, month, 3months, 6months, year, all
        #[arg(short, long, default_value = "all")]
        period: Period,

        #[arg(long)]
        json: bool,
    },

    /// Print the analysis-service request for three photo URLs
    AnalyzeRequest {
        front: String,
        side: String,
        back: String,
    },

    /// Print the after-photo generation request
    AfterPhoto {
        image_url: String,

        /// Program duration in weeks
        #[arg(short = 'n', long, default_value = "12")]
        weeks: u32,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Create or update profile fields
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<Gender>,
        /// Height in cm
        #[arg(long)]
        height: Option<f64>,
        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        activity: Option<String>,
        #[arg(long)]
        frequency: Option<ExerciseFrequency>,
    },

    /// Show the profile and stored metrics
    Show,

    /// Change activity level (either vocabulary)
    Activity { level: String },

    /// Change exercise frequency
    Frequency { frequency: ExerciseFrequency },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    if let Some(user) = cli.user {
        config.user_id = user;
    }

    match cli.command {
        Commands::Tdee { weight, body_fat, activity, frequency, strict, json } => {
            let mut inputs = TdeeInputs::new(
                weight,
                body_fat.unwrap_or(config.default_body_fat_percentage),
                activity,
            );
            inputs.exercise_frequency =
                Some(frequency.unwrap_or_else(|| config.default_exercise_frequency.label().to_string()));

            let breakdown = if strict {
                tdee::try_estimate(&inputs)?
            } else {
                tdee::estimate(&inputs)
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else {
                print_breakdown(&breakdown);
            }
        }

        Commands::Bmr { weight, body_fat, height, age, gender } => {
            match (body_fat, height, age, gender) {
                (Some(bf), _, _, _) => {
                    let bmr = tdee::try_calculate_bmr(weight, bf)?;
                    println!("BMR (Katch-McArdle): {:.1} kcal/day", bmr);
                }
                (None, Some(h), Some(a), Some(g)) => {
                    let bmr = try_calculate_mifflin_st_jeor(weight, h, a, g)?;
                    println!("BMR (Mifflin-St Jeor): {:.1} kcal/day", bmr);
                }
                _ => bail!("Need --body-fat, or --height, --age and --gender"),
            }
        }

        Commands::Bmi { weight, height } => {
            println!("BMI: {}", format_bmi(calculate_bmi(weight, height)?));
        }

        Commands::Levels => {
            println!("Activity levels");
            println!("{:-<60}", "");
            for level in ActivityLevel::all() {
                println!(
                    "{:18} | {:34} | x{}",
                    level.canonical_label(),
                    level.display_label(),
                    level.multiplier()
                );
            }
            println!();
            println!("Exercise frequency (days/week)");
            println!("{:-<60}", "");
            for freq in ExerciseFrequency::all() {
                println!("{:6} | +{:.2}", freq.label(), freq.bonus());
            }
        }

        Commands::Profile { command } => {
            let db = Database::open(&config.database_path)?;
            run_profile_command(&db, &config, command)?;
        }

        Commands::Scan { body_fat, text, response, analysis, images } => {
            let (body_fat, rationale) = match (body_fat, text, response) {
                (Some(bf), _, _) => (bf, None),
                (None, Some(text), _) => {
                    let bf = extract_body_fat_percentage(&text)
                        .with_context(|| format!("No body fat percentage found in {:?}", text))?;
                    (bf, None)
                }
                (None, None, Some(path)) => {
                    let raw = fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    let parsed = parse_analysis_response(&raw)?;
                    (parsed.body_fat_percentage()?, parsed.rationale)
                }
                (None, None, None) => bail!("Give a body fat value, --text or --response"),
            };

            let point = ProgressPoint {
                body_fat,
                timestamp: Utc::now(),
                analysis: analysis.or(rationale),
            };
            let db = Database::open(&config.database_path)?;
            let outcome = db.record_scan(&config.user_id, &point, &images, &config)?;

            println!("Recorded: {:.1}% body fat (id: {})", outcome.body_fat, outcome.point_id);
            match &outcome.breakdown {
                Some(breakdown) => print_breakdown(breakdown),
                None => println!("No weight on profile - TDEE not updated"),
            }
        }

        Commands::History { limit, period, json } => {
            let db = Database::open(&config.database_path)?;
            let history = db.get_progress_history(&config.user_id)?;
            let report = HistoryReport::new(&history, period, config.target_body_fat, Utc::now());

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("Body fat history ({})", period);
            println!("{:-<60}", "");
            let skip = report.points.len().saturating_sub(limit);
            for point in report.points.iter().skip(skip) {
                println!(
                    "{} | {:5.1}% | {}",
                    point.timestamp.format("%Y-%m-%d %H:%M"),
                    point.body_fat,
                    point.analysis.as_deref().unwrap_or("-")
                );
            }

            let ticks: Vec<String> = report.axis.ticks().iter().map(|t| format!("{:.1}", t)).collect();
            println!();
            println!(
                "Chart range: {:.0}% - {:.0}% (ticks: {})",
                report.axis.min,
                report.axis.max,
                ticks.join(", ")
            );

            for milestone in &report.milestones {
                let date = report.points[milestone.index].timestamp.format("%Y-%m-%d");
                match milestone.kind {
                    MilestoneKind::Reduction => {
                        println!("{} | -{:.1} points since first scan", date, milestone.value)
                    }
                    MilestoneKind::Goal => {
                        println!("{} | goal reached: {:.1}%", date, milestone.value)
                    }
                }
            }
        }

        Commands::Scans { period, json } => {
            let db = Database::open(&config.database_path)?;
            let cutoff = period.cutoff(Utc::now());
            let scans: Vec<_> = db
                .get_body_scans(&config.user_id)?
                .into_iter()
                .filter(|scan| cutoff.is_none_or(|c| scan.scanned_at >= c))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&scans)?);
                return Ok(());
            }

            println!("Check-ins ({})", period);
            println!("{:-<60}", "");
            for scan in &scans {
                println!(
                    "{} | {:5.1}% | BMI {} | TDEE {} | {}",
                    scan.scanned_at.format("%Y-%m-%d"),
                    scan.analysis_body_fat,
                    scan.bmi.as_deref().unwrap_or("--"),
                    scan.tdee.as_deref().unwrap_or("--"),
                    if scan.front_image_url.is_some() { "photos" } else { "no photos" }
                );
            }
        }

        Commands::AnalyzeRequest { front, side, back } => {
            let db = Database::open(&config.database_path)?;
            let mut request = AnalyzeImagesRequest::new(front, side, back);
            if let Some(profile) = db.get_profile(&config.user_id)? {
                request.age = profile.age;
                request.height_cms = profile.height_cm;
                request.weight_kgs = profile.weight_kg;
            }
            println!("{}", serde_json::to_string_pretty(&request)?);
        }

        Commands::AfterPhoto { image_url, weeks } => {
            let db = Database::open(&config.database_path)?;
            let history = db.get_progress_history(&config.user_id)?;
            let mut request = AfterPhotoRequest::new(image_url, latest_body_fat(&history), weeks);
            if let Some(profile) = db.get_profile(&config.user_id)? {
                request.weight = profile.weight_kg;
                request.gender = profile.gender;
            }
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }

    Ok(())
}

fn run_profile_command(db: &Database, config: &Config, command: ProfileCommand) -> Result<()> {
    let user_id = config.user_id.as_str();

    match command {
        ProfileCommand::Set { name, age, gender, height, weight, activity, frequency } => {
            let mut profile = db.get_profile(user_id)?.unwrap_or_else(|| Profile::new(user_id));
            profile.name = name.or(profile.name);
            profile.age = age.or(profile.age);
            profile.gender = gender.or(profile.gender);
            profile.height_cm = height.or(profile.height_cm);
            profile.weight_kg = weight.or(profile.weight_kg);
            if let Some(label) = activity {
                profile.activity_level = Some(ActivityLevel::resolve(&label)?.canonical_label().to_string());
            }
            if let Some(freq) = frequency {
                profile.exercise_frequency = Some(freq.label().to_string());
            }
            save_with_metrics(db, config, profile)?;
        }

        ProfileCommand::Show => {
            let profile = db
                .get_profile(user_id)?
                .with_context(|| format!("Profile not found: {}", user_id))?;
            println!("Profile: {}", profile.id);
            println!("{:-<40}", "");
            println!("Name:      {}", profile.name.as_deref().unwrap_or("-"));
            println!("Age:       {}", profile.age.map(|a| a.to_string()).unwrap_or_else(|| "-".into()));
            println!("Gender:    {}", profile.gender.map(|g| g.to_string()).unwrap_or_else(|| "-".into()));
            println!("Height:    {}", profile.height_cm.map(|h| format!("{} cm", h)).unwrap_or_else(|| "-".into()));
            println!("Weight:    {}", profile.weight_kg.map(|w| format!("{} kg", w)).unwrap_or_else(|| "-".into()));
            println!(
                "Activity:  {}",
                profile.activity().map(|l| l.display_label()).unwrap_or("-")
            );
            println!("Exercise:  {}", profile.exercise_frequency.as_deref().unwrap_or("-"));
            println!("BMI:       {}", profile.bmi_bmi.as_deref().unwrap_or("--"));
            println!(
                "TDEE:      {}",
                profile.tdee_kcal().map(|t| format!("{} kcal", t)).unwrap_or_else(|| "--".into())
            );
        }

        ProfileCommand::Activity { level } => {
            let level = ActivityLevel::resolve(&level)?;
            db.update_activity_level(user_id, level.canonical_label())?;
            let profile = db
                .get_profile(user_id)?
                .with_context(|| format!("Profile not found: {}", user_id))?;
            save_with_metrics(db, config, profile)?;
        }

        ProfileCommand::Frequency { frequency } => {
            db.update_exercise_frequency(user_id, frequency.label())?;
            let profile = db
                .get_profile(user_id)?
                .with_context(|| format!("Profile not found: {}", user_id))?;
            save_with_metrics(db, config, profile)?;
        }
    }

    Ok(())
}

/// Recompute BMI/TDEE from the latest scan and persist the profile
fn save_with_metrics(db: &Database, config: &Config, mut profile: Profile) -> Result<()> {
    let history = db.get_progress_history(&profile.id)?;
    let breakdown = profile.refresh_metrics(latest_body_fat(&history), config);
    db.upsert_profile(&profile)?;

    println!("Saved profile: {}", profile.id);
    if let Some(breakdown) = breakdown {
        print_breakdown(&breakdown);
    }
    Ok(())
}

fn print_breakdown(b: &TdeeBreakdown) {
    println!("TDEE Calculation");
    println!("{:-<40}", "");
    println!("Weight:       {:.1} kg ({:.1}% body fat)", b.weight_kg, b.body_fat_percentage);
    println!("Lean mass:    {:.1} kg", b.lean_mass_kg);
    println!("BMR:          {:.0} kcal/day", b.bmr);
    println!("Activity:     {} (x{})", b.activity_level.display_label(), b.base_multiplier);
    match b.exercise_frequency {
        Some(freq) => println!("Exercise:     {} (+{:.2})", freq, b.exercise_bonus),
        None => println!("Exercise:     unrecognized (+0.00)"),
    }
    println!("Multiplier:   {:.2}", b.total_multiplier);
    println!("TDEE:         {} kcal/day", b.rounded());
}
