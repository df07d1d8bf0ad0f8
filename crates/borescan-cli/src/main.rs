//! borescan CLI — offline hole-inference utilities.
//!
//! The service consumes models through a CAD kernel; this binary exercises
//! the pipeline stages on their serialized inputs instead: point samples,
//! candidate-circle dumps, and ranked-hole dumps.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use borescan::{aggregate, build_export, fit_circle3, CandidateCircle, DetectConfig, Hole};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "borescan")]
#[command(about = "Infer circular/cylindrical holes from candidate-circle evidence")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a 3D circle to a JSON array of [x, y, z] points.
    FitCircle(FitCircleArgs),

    /// Fuse a candidate-circle dump into ranked holes.
    Aggregate(AggregateArgs),

    /// Build the reposition-point export document from a holes dump.
    Export(ExportArgs),
}

#[derive(Debug, Clone, Args)]
struct FitCircleArgs {
    /// Path to the input points (JSON array of [x, y, z]).
    #[arg(long)]
    points: PathBuf,

    /// Minimum number of distinct points required for a fit.
    #[arg(long, default_value = "4")]
    min_points: usize,
}

#[derive(Debug, Clone, Args)]
struct AggregateArgs {
    /// Path to the candidate circles (JSON).
    #[arg(long)]
    candidates: PathBuf,

    /// Path to write the ranked holes (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Minimum accepted hole radius.
    #[arg(long)]
    radius_min: Option<f64>,

    /// Maximum accepted hole radius.
    #[arg(long)]
    radius_max: Option<f64>,

    /// XY radius within which observations merge into one hole.
    #[arg(long)]
    grouping_distance: Option<f64>,

    /// Allowed vertical spread of centers within one hole.
    #[arg(long)]
    z_tolerance: Option<f64>,

    /// Minimum |axis_z| for a reported hole.
    #[arg(long)]
    min_vertical_alignment: Option<f64>,

    /// Minimum reported score.
    #[arg(long)]
    min_score: Option<f64>,

    /// Maximum number of reported holes.
    #[arg(long)]
    max_candidates: Option<usize>,
}

#[derive(Debug, Clone, Args)]
struct ExportArgs {
    /// Path to a holes dump (JSON, as written by `aggregate`).
    #[arg(long)]
    holes: PathBuf,

    /// Hole ids to export, comma separated (defaults to every hole).
    #[arg(long, value_delimiter = ',')]
    ids: Vec<u32>,

    /// Path to write the export document (JSON).
    #[arg(long)]
    out: PathBuf,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::FitCircle(args) => run_fit_circle(&args),
        Commands::Aggregate(args) => run_aggregate(&args),
        Commands::Export(args) => run_export(&args),
    }
}

// ── fit-circle ─────────────────────────────────────────────────────────

fn run_fit_circle(args: &FitCircleArgs) -> CliResult<()> {
    let points: Vec<[f64; 3]> = serde_json::from_slice(&fs::read(&args.points)?)?;
    tracing::info!("Loaded {} points from {}", points.len(), args.points.display());

    let Some(fit) = fit_circle3(&points, args.min_points) else {
        return Err("no circle fit (too few distinct points, degenerate geometry, \
                    or residual too large)"
            .into());
    };

    println!("{}", serde_json::to_string_pretty(&fit)?);
    Ok(())
}

// ── aggregate ──────────────────────────────────────────────────────────

fn build_config(args: &AggregateArgs) -> DetectConfig {
    let mut config = DetectConfig::default();
    if let Some(v) = args.radius_min {
        config.radius_min = v;
    }
    if let Some(v) = args.radius_max {
        config.radius_max = v;
    }
    if let Some(v) = args.grouping_distance {
        config.grouping_distance = v;
    }
    if let Some(v) = args.z_tolerance {
        config.z_tolerance = v;
    }
    if let Some(v) = args.min_vertical_alignment {
        config.min_vertical_alignment = v;
    }
    if let Some(v) = args.min_score {
        config.min_score = v;
    }
    if let Some(v) = args.max_candidates {
        config.max_candidates = v;
    }
    config
}

fn run_aggregate(args: &AggregateArgs) -> CliResult<()> {
    let candidates: Vec<CandidateCircle> = serde_json::from_slice(&fs::read(&args.candidates)?)?;
    tracing::info!(
        "Loaded {} candidate circles from {}",
        candidates.len(),
        args.candidates.display()
    );

    let config = build_config(args);
    let holes = aggregate(&candidates, &config);
    tracing::info!("Fused into {} holes", holes.len());

    fs::write(&args.out, serde_json::to_vec_pretty(&holes)?)?;
    tracing::info!("Results written to {}", args.out.display());
    Ok(())
}

// ── export ─────────────────────────────────────────────────────────────

fn run_export(args: &ExportArgs) -> CliResult<()> {
    let holes: Vec<Hole> = serde_json::from_slice(&fs::read(&args.holes)?)?;

    let selected: BTreeSet<u32> = if args.ids.is_empty() {
        holes.iter().map(|h| h.id).collect()
    } else {
        args.ids.iter().copied().collect()
    };

    let document = build_export(&holes, &selected);
    let count = document.reposition_point_data_array.len();
    fs::write(&args.out, serde_json::to_vec_pretty(&document)?)?;
    tracing::info!("Exported {} holes to {}", count, args.out.display());
    Ok(())
}
