//! Telematics CLI - command-line tool for remote vehicle control
//!
//! Lists enrolled vehicles, polls status, and issues remote commands
//! against a telematics service account.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use telematics_client::{TelematicsClient, VehicleId};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::Switch;
use crate::config::{ArgOverrides, Config};
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "telematics-cli")]
#[command(author, version, about = "Remote vehicle telematics CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Service base URL
    #[arg(short, long, env = "TELEMATICS_SERVER")]
    server: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "TELEMATICS_CONFIG")]
    config: Option<PathBuf>,

    /// Account email
    #[arg(long, env = "TELEMATICS_EMAIL")]
    email: Option<String>,

    /// Account password
    #[arg(long, env = "TELEMATICS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Account region: MNAO, MME, MJO
    #[arg(long, env = "TELEMATICS_REGION")]
    region: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List enrolled vehicles
    Vehicles,

    /// Show the latest vehicle status
    Status {
        /// Vehicle ID exactly as listed by `vehicles` (quote a numeric-looking
        /// text ID, e.g. '"3"', to keep it text)
        vehicle: VehicleId,
    },

    /// Lock all doors
    Lock {
        /// Vehicle ID
        vehicle: VehicleId,
    },

    /// Unlock all doors
    Unlock {
        /// Vehicle ID
        vehicle: VehicleId,
    },

    /// Turn hazard lights on or off
    Hazards {
        /// Vehicle ID
        vehicle: VehicleId,

        #[arg(value_enum)]
        state: Switch,
    },

    /// Start or stop the engine
    Engine {
        /// Vehicle ID
        vehicle: VehicleId,

        #[arg(value_enum)]
        action: Switch,
    },

    /// Start or stop charging
    Charge {
        /// Vehicle ID
        vehicle: VehicleId,

        #[arg(value_enum)]
        action: Switch,
    },

    /// Send a destination to the navigation system
    Poi {
        /// Vehicle ID
        vehicle: VehicleId,

        /// Destination name
        #[arg(long)]
        name: String,

        /// Latitude in decimal degrees (negative for south)
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees (negative for west)
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// Rename a vehicle
    Nickname {
        /// 17-character VIN
        vin: String,

        /// New nickname (at most 20 characters)
        nickname: String,
    },

    /// Show the raw vehicle health report
    Health {
        /// Vehicle ID
        vehicle: VehicleId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring config file: {:#}", e);
            Config::default()
        })
    };

    let merged = config.merge_with_args(&ArgOverrides {
        server: cli.server.as_deref(),
        email: cli.email.as_deref(),
        password: cli.password.as_deref(),
        region: cli.region.as_deref(),
        no_color: cli.no_color,
    })?;

    let format = cli
        .output
        .or_else(|| config.output.as_deref().and_then(OutputFormat::from_config))
        .unwrap_or_default();
    let ctx = OutputContext::new(format, merged.no_color, cli.quiet);

    let client = TelematicsClient::with_http(&merged.server, merged.client)
        .context("Failed to create telematics client")?;

    let result = run(&client, &cli.command, &ctx).await;
    client.close().await;
    result
}

async fn run(client: &TelematicsClient, command: &Commands, ctx: &OutputContext) -> Result<()> {
    match command {
        Commands::Vehicles => commands::vehicles(client, ctx).await?,
        Commands::Status { vehicle } => commands::status(client, vehicle, ctx).await?,
        Commands::Lock { vehicle } => commands::lock(client, vehicle, ctx).await?,
        Commands::Unlock { vehicle } => commands::unlock(client, vehicle, ctx).await?,
        Commands::Hazards { vehicle, state } => {
            commands::hazards(client, vehicle, *state, ctx).await?
        }
        Commands::Engine { vehicle, action } => {
            commands::engine(client, vehicle, *action, ctx).await?
        }
        Commands::Charge { vehicle, action } => {
            commands::charge(client, vehicle, *action, ctx).await?
        }
        Commands::Poi {
            vehicle,
            name,
            lat,
            lon,
        } => commands::poi(client, vehicle, name, *lat, *lon, ctx).await?,
        Commands::Nickname { vin, nickname } => {
            commands::nickname(client, vin, nickname, ctx).await?
        }
        Commands::Health { vehicle } => commands::health(client, vehicle, ctx).await?,
    }

    Ok(())
}
