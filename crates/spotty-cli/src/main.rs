mod commands;
mod display;
mod interactive;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "spotty")]
#[command(about = "Find public restrooms nearby and add new ones")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check that the facility service is reachable.
    Health,
    /// List facilities near a point (defaults to your location).
    Near {
        #[arg(long, allow_negative_numbers = true, requires = "lng")]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lng: Option<f64>,
        /// Search radius; defaults to SPOTTY_SEARCH_RADIUS_KM.
        #[arg(long)]
        radius_km: Option<f64>,
    },
    /// Show one facility.
    Show { id: String },
    /// Add a facility at a point.
    Add {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        not_free: bool,
        #[arg(long)]
        no_running_water: bool,
        #[arg(long)]
        closed_in_winter: bool,
        #[arg(long)]
        not_gender_neutral: bool,
    },
    /// Rate a facility's cleanliness from 1 to 5.
    Rate {
        id: String,
        #[arg(long)]
        cleanliness: u8,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Interactive map session (the default).
    Map,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = spotty_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    let repo = spotty_client::HttpFacilityRepository::new(
        &config.api_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;

    match cli.command {
        Some(Commands::Health) => commands::health(&repo).await,
        Some(Commands::Near {
            lat,
            lng,
            radius_km,
        }) => commands::near(&repo, &config, lat.zip(lng), radius_km).await,
        Some(Commands::Show { id }) => commands::show(&repo, &id).await,
        Some(Commands::Add {
            lat,
            lng,
            name,
            not_free,
            no_running_water,
            closed_in_winter,
            not_gender_neutral,
        }) => {
            let draft = commands::AddArgs {
                lat,
                lng,
                name,
                is_free: !not_free,
                running_water: !no_running_water,
                open_in_winter: !closed_in_winter,
                gender_neutral: !not_gender_neutral,
            };
            commands::add(&repo, draft).await
        }
        Some(Commands::Rate {
            id,
            cleanliness,
            comment,
        }) => commands::rate(&repo, &id, cleanliness, comment).await,
        Some(Commands::Map) | None => interactive::run(repo, &config).await,
    }
}
