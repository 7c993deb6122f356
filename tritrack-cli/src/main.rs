//! Tritrack CLI
//!
//! Replays recorded boundary-crossing notifications through a run session
//! and writes the middle-plane prediction and uncertainty reports.
#![allow(clippy::uninlined_format_args)]

use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tritrack_algorithms::{containment_factor, ScatteringUncertainty};
use tritrack_core::{highland_theta0, AnalysisConfig, LayerId, RadiationBudget, Vec3};
use tritrack_io::{replay, NotificationReader, ReportFiles, RunSession};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    TritrackIo(#[from] tritrack_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] tritrack_core::Error),
}

/// Middle-plane track prediction for three-layer detector stacks.
#[derive(Parser)]
#[command(name = "tritrack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines notification log and write both reports
    Analyze {
        /// Notification log (one JSON object per line)
        input: PathBuf,

        /// Analysis configuration (JSON); defaults are used if omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output path of the geometry/prediction table
        #[arg(long, default_value = ReportFiles::DEFLECTION_FILE)]
        deflection_out: PathBuf,

        /// Output path of the uncertainty table
        #[arg(long, default_value = ReportFiles::UNCERTAINTY_FILE)]
        uncertainty_out: PathBuf,
    },

    /// Show layer placement, material budgets and scattering for a configuration
    Geometry {
        /// Analysis configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the default configuration as JSON
    DefaultConfig,
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            Ok(AnalysisConfig::from_file(path)?)
        }
        None => Ok(AnalysisConfig::default()),
    }
}

fn print_geometry(config: &AnalysisConfig) {
    println!(
        "Beam: p = {} MeV/c, beta = {} (nominal, applied to every track)",
        config.beam.momentum_mev, config.beam.beta
    );
    println!(
        "Grid: {} x {} pixels over {} x {} mm (pitch {:.4} x {:.4} mm)",
        config.grid.nx(),
        config.grid.ny(),
        config.grid.extent_x(),
        config.grid.extent_y(),
        config.grid.pitch_x(),
        config.grid.pitch_y()
    );
    println!();
    println!(
        "{:<8} | {:>10} | {:>12} | {:>12} | {:>12} | {:>12}",
        "Layer", "center mm", "entry z mm", "t off strip", "t on strip", "films mm"
    );
    println!("{:-<80}", "");

    for layer in LayerId::ALL {
        let fs = config.stack.layer(layer);
        let placement = config.stack.placement(layer);
        let corner = 0.5 * fs.chip_xy_mm;
        let off = RadiationBudget::compute(fs, Vec3::new(corner, corner, 0.0));
        let on = RadiationBudget::compute(fs, Vec3::default());
        println!(
            "{:<8} | {:>10.4} | {:>12.6} | {:>12.4e} | {:>12.4e} | {:>12.6}",
            layer,
            placement.center_z,
            placement.entry_z,
            off.t,
            on.t,
            fs.films_thickness()
        );
    }

    let z1 = config.stack.placement(LayerId::Layer1).entry_z;
    let z2 = config.stack.placement(LayerId::Layer2).entry_z;
    let lever = (z2 - z1).abs();
    let fs1 = config.stack.layer(LayerId::Layer1);
    let corner = 0.5 * fs1.chip_xy_mm;
    println!();
    println!("Lever arm Layer1 -> Layer2 entry: {:.6} mm", lever);
    for (label, hit) in [
        ("off strip", Vec3::new(corner, corner, z1)),
        ("on strip", Vec3::new(0.0, 0.0, z1)),
    ] {
        let budget = RadiationBudget::compute(fs1, hit);
        let theta0 = highland_theta0(config.beam.momentum_mev, config.beam.beta, budget.t);
        let sigma = ScatteringUncertainty::compute(theta0, lever);
        println!(
            "  {:<9}: theta0 = {:.4e} rad, sigma_x = {:.4e} mm ({:.4} px), r95 = {:.4e} mm",
            label,
            theta0,
            sigma.sigma_x,
            sigma.in_pixels(config.grid.pitch_x()).sigma_x,
            sigma.r95
        );
    }
    println!("  r95 / sigma = {:.4}", containment_factor());
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            deflection_out,
            uncertainty_out,
        } => {
            let config = load_config(config.as_deref())?;
            let start = Instant::now();

            let reader = NotificationReader::open(&input)?;
            let mut session = RunSession::new(
                config,
                ReportFiles::new(&deflection_out, &uncertainty_out),
            );
            let summary = replay(&mut session, reader)?;

            println!(
                "Processed {} in {:.2}s",
                input.display(),
                start.elapsed().as_secs_f64()
            );
            println!("Events recorded: {}", summary.events_recorded);
            println!("Events reported: {}", summary.events_reported);
            println!("  with middle-plane hit: {}", summary.events_with_middle_hit);
            println!("Total energy deposited: {:.6} MeV", summary.total_edep_mev);
            println!(
                "Wrote {} and {}",
                deflection_out.display(),
                uncertainty_out.display()
            );
        }

        Commands::Geometry { config } => {
            let config = load_config(config.as_deref())?;
            print_geometry(&config);
        }

        Commands::DefaultConfig => {
            println!("{}", AnalysisConfig::default().to_json()?);
        }
    }

    Ok(())
}
