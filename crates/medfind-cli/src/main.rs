mod opener;

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use medfind_core::{load_app_config, AppConfig, Category, Coordinate, SOUTH_AFRICA_ANCHORS};
use medfind_discovery::{
    DirectionsOutcome, DirectionsResolver, DiscoveryConfig, DiscoveryState,
    FacilityDiscoveryController, FixedLocation, Platform,
};
use medfind_places::PlacesClient;
use tracing_subscriber::EnvFilter;

use crate::opener::ConsoleOpener;

#[derive(Debug, Parser)]
#[command(name = "medfind")]
#[command(about = "Find nearby hospitals and clinics and resolve directions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Discover facilities around a position and print them as JSON.
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
    /// Search every regional anchor and print the merged facilities as JSON.
    Sweep {
        /// Restrict the sweep to these anchor names (repeatable).
        #[arg(long = "anchor")]
        anchors: Vec<String>,
    },
    /// Discover around a position, then open directions to one facility.
    Directions {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Facility id from a previous `nearby` run.
        #[arg(long)]
        facility: String,
        #[arg(long, value_enum, default_value_t = PlatformArg::Android)]
        platform: PlatformArg,
        /// Pretend a native map handler is installed.
        #[arg(long)]
        native_handler: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlatformArg {
    Ios,
    Android,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Ios => Platform::Ios,
            PlatformArg::Android => Platform::Android,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = load_app_config().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    let client = Arc::new(PlacesClient::from_config(&config)?);

    match cli.command {
        Commands::Nearby { lat, lng } => {
            let controller = discover(&config, client, Coordinate::new(lat, lng)).await?;
            print_facilities(&controller)?;
        }
        Commands::Sweep { anchors } => run_sweep(&config, &client, &anchors).await?,
        Commands::Directions {
            lat,
            lng,
            facility,
            platform,
            native_handler,
        } => {
            let mut controller = discover(&config, client, Coordinate::new(lat, lng)).await?;
            if !controller.select(&facility) {
                bail!("facility '{facility}' not found near {lat},{lng}");
            }
            let Some(selected) = controller.selected() else {
                bail!("facility '{facility}' is no longer selected");
            };
            let resolver =
                DirectionsResolver::new(ConsoleOpener::new(native_handler), platform.into());
            match resolver
                .open_directions(selected, controller.user_location())
                .await?
            {
                DirectionsOutcome::OpenedNative(_) | DirectionsOutcome::OpenedWeb(_) => {}
                DirectionsOutcome::Advised(advisory) => {
                    eprintln!("{}: {}", advisory.title, advisory.message);
                }
            }
        }
    }

    Ok(())
}

type CliController = FacilityDiscoveryController<FixedLocation, PlacesClient>;

async fn discover(
    config: &AppConfig,
    client: Arc<PlacesClient>,
    position: Coordinate,
) -> anyhow::Result<CliController> {
    let mut controller = FacilityDiscoveryController::new(
        FixedLocation::new(position),
        client,
        DiscoveryConfig::from_app_config(config),
    );
    controller.mount().await;
    match controller.state() {
        DiscoveryState::Ready(_) => Ok(controller),
        DiscoveryState::Failed(failure) => bail!("discovery failed: {failure}"),
        other => bail!("discovery ended in unexpected state '{}'", other.name()),
    }
}

fn print_facilities(controller: &CliController) -> anyhow::Result<()> {
    let facilities = controller.facilities().unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(facilities.as_ref())?);
    Ok(())
}

async fn run_sweep(
    config: &AppConfig,
    client: &PlacesClient,
    names: &[String],
) -> anyhow::Result<()> {
    let anchors: Vec<_> = if names.is_empty() {
        SOUTH_AFRICA_ANCHORS.to_vec()
    } else {
        let selected: Vec<_> = SOUTH_AFRICA_ANCHORS
            .iter()
            .filter(|a| names.iter().any(|n| n.eq_ignore_ascii_case(a.name)))
            .copied()
            .collect();
        if selected.len() != names.len() {
            bail!("unknown anchor in {names:?}");
        }
        selected
    };

    let facilities = medfind_places::sweep(
        client,
        &anchors,
        config.sweep_radius_meters,
        &Category::ALL,
    )
    .await?;
    println!("{}", serde_json::to_string_pretty(&facilities)?);
    Ok(())
}
