// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, load config, spin, print the result.
// - Returns `anyhow::Result` so any failure exits non-zero with context.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wheel_of_food::api::{SearchClient, DEFAULT_RADIUS_METERS};
use wheel_of_food::config::{self, Config};
use wheel_of_food::ui::Printer;
use wheel_of_food::wheel::{SpinOutcome, Wheel};

#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Hungry and can't decide what to eat? Give the Wheel of Food a spin!")]
struct Cli {
    /// The ZIP code (or city name) where you want to search.
    #[arg(long, short = 'z')]
    zipcode: String,

    /// Specify this option if you feel like you know what you want to eat.
    #[arg(long, short = 'c')]
    category: Option<String>,

    /// Search radius in meters.
    #[arg(long, short = 'd', default_value_t = DEFAULT_RADIUS_METERS,
          value_parser = clap::value_parser!(u32).range(1..=40_000))]
    distance: u32,

    /// Path to the config file. Defaults to ./config.json.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, hide = true)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("wheel_of_food=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let path = config::resolve_path(cli.config.as_deref());
    let config = Config::load(&path).context("Failed to load configuration")?;
    let client = SearchClient::from_config(&config).context("Failed to build search client")?;

    let mut wheel = Wheel::new(&config, client, rand::thread_rng());
    let mut printer = Printer::stdout();
    let outcome = wheel.spin(
        &mut printer,
        &cli.zipcode,
        cli.category.as_deref(),
        cli.distance,
    )?;
    tracing::debug!(?outcome, "spin finished");

    if let SpinOutcome::Chosen { category, business } = &outcome {
        printer.choice(category, business)?;
    }
    Ok(())
}
