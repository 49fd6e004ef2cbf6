//! Fireworks CLI - Command-line interface for the fireworks engine

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{describe, run, validate};

#[derive(Parser)]
#[command(name = "fireworks")]
#[command(about = "Real-time fireworks particle simulation", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a show headless with fixed time steps
    Run {
        /// Path to a show file (defaults to the built-in show)
        #[arg(long)]
        show: Option<String>,

        /// Simulated seconds to run
        #[arg(long, default_value = "10")]
        seconds: f64,

        /// Frames per simulated second
        #[arg(long, default_value = "60")]
        fps: f64,

        /// Maximum number of particles (capped at the vertex buffer size)
        #[arg(short, long)]
        particles: Option<usize>,

        /// Particle generation rate knob
        #[arg(short, long)]
        rate: Option<f64>,

        /// Seed for explosion and launcher randomness
        #[arg(long)]
        seed: Option<u32>,

        /// Fire a launcher by hand at a given time, as TIME:INDEX (repeatable)
        #[arg(long = "fire", value_parser = run::parse_scheduled_fire)]
        fire: Vec<run::ScheduledFire>,

        /// Seconds between status lines (0 disables them)
        #[arg(long, default_value = "1")]
        report_every: f64,
    },

    /// Load and validate a show file
    Validate {
        /// Path to the show file
        show: String,
    },

    /// List a show's templates and launchers
    Describe {
        /// Path to a show file (defaults to the built-in show)
        show: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if cli.quiet {
        log::set_max_level(log::LevelFilter::Error);
    }

    match cli.command {
        Commands::Run {
            show,
            seconds,
            fps,
            particles,
            rate,
            seed,
            fire,
            report_every,
        } => run::run(run::RunArgs {
            show,
            seconds,
            fps,
            particles,
            rate,
            seed,
            fire,
            report_every,
        }),
        Commands::Validate { show } => validate::run(&show),
        Commands::Describe { show } => describe::run(show.as_deref()),
    }
}
