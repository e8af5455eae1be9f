use std::path::PathBuf;

use capture::CaptureConfig;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tools::{Script, SurfaceKind, area_report, parse_points, replay};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay geometry capture scripts against a headless scene")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a JSON step script and print what was captured.
    Replay {
        script: PathBuf,

        /// Capture settings file; falls back to defaults plus environment overrides.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Overrides the surface named in the script.
        #[arg(long, value_enum)]
        surface: Option<SurfaceKind>,
    },
    /// Planar area and centroid of a ring given as "x,y x,y ...".
    Area { points: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match args.command {
        Command::Replay {
            script,
            config,
            surface,
        } => {
            let config = match config {
                Some(path) => CaptureConfig::load(&path)?,
                None => CaptureConfig::from_env()?,
            };
            let parsed = Script::load(&script)?;
            let surface = surface.or(parsed.surface).unwrap_or_default();
            info!(script = %script.display(), ?surface, steps = parsed.steps.len(), "replaying");
            print_json(&replay(&parsed, config, surface))?;
        }
        Command::Area { points } => {
            let points = parse_points(&points)?;
            print_json(&area_report(&points))?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
