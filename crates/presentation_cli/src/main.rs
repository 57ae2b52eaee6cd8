//! Tour guide CLI
//!
//! Command-line front end for nearby search, route planning and simulated
//! turn-by-turn navigation against the configured OpenStreetMap services.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use application::{PumpOutcome, TourPorts, TourSession, infer_place_intent};
use clap::{Parser, Subcommand};
use domain::{Coordinate, TravelMode};
use infrastructure::{
    AppConfig, PlaceFinderAdapter, RoutePlannerAdapter, SimulatedLocationProvider,
    TracingMapRenderer, init_logging,
};
use tracing::{debug, info};

/// Tour guide CLI
#[derive(Parser)]
#[command(name = "tourguide")]
#[command(author, version, about = "Nearby places and live walking guidance", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./tourguide.toml if present)
    #[arg(short, long, env = "TOURGUIDE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List places of a category around a coordinate, nearest first
    ///
    /// Example: tourguide nearby --at 48.8584,2.2945 --category cafe
    Nearby {
        /// Search center as "lat,lon"
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        at: Coordinate,

        /// POI category (default from configuration)
        #[arg(short = 'k', long)]
        category: Option<String>,

        /// Search radius in meters (default from configuration)
        #[arg(short, long)]
        radius: Option<u32>,
    },

    /// Plan a route and print its steps
    Route {
        /// Start as "lat,lon"
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Coordinate,

        /// Destination as "lat,lon"
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        to: Coordinate,

        /// Travel mode: walking, driving or cycling
        #[arg(short, long)]
        mode: Option<TravelMode>,
    },

    /// Plan a route and replay it through live guidance
    Navigate {
        /// Start as "lat,lon"
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Coordinate,

        /// Destination as "lat,lon"
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        to: Coordinate,

        /// Travel mode: walking, driving or cycling
        #[arg(short, long)]
        mode: Option<TravelMode>,

        /// Milliseconds between simulated position fixes
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Detect which kind of place a message asks for, optionally searching it
    ///
    /// Example: tourguide intent "where can I get a coffee?" --at 40.0,-75.0
    Intent {
        /// Free-text message
        text: String,

        /// Search around "lat,lon" when a place kind is detected
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        at: Option<Coordinate>,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Parse "lat,lon" into a validated coordinate
fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got \"{value}\""))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude \"{lat}\": {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude \"{lon}\": {e}"))?;
    Coordinate::validated(lat, lon).map_err(|e| e.to_string())
}

/// Session wired to the configured services and a simulated position
struct Wiring {
    session: TourSession,
    location: Arc<SimulatedLocationProvider>,
    map: Arc<TracingMapRenderer>,
}

fn wire(config: &AppConfig, start: Coordinate, interval: Duration) -> anyhow::Result<Wiring> {
    let location = Arc::new(SimulatedLocationProvider::fixed(start, interval));
    let map = Arc::new(TracingMapRenderer::new());
    let ports = TourPorts {
        places: Arc::new(PlaceFinderAdapter::new(&config.overpass)?),
        routes: Arc::new(RoutePlannerAdapter::new(&config.osrm)?),
        location: location.clone(),
        map: map.clone(),
    };

    Ok(Wiring {
        session: TourSession::new(ports, config.tour.to_settings()),
        location,
        map,
    })
}

async fn print_nearby(session: &mut TourSession) -> anyhow::Result<()> {
    let category = session.state().category().to_string();
    let places = session.find_nearby().await?;

    if places.is_empty() {
        println!("No {category} found nearby.");
        return Ok(());
    }

    println!("📍 {} {category} place(s) nearby:", places.len());
    for (index, place) in places.iter().enumerate() {
        println!("{:>3}. {}", index + 1, place.format_summary());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let verbosity = (cli.verbose > 0).then(|| log_filter_from_verbosity(cli.verbose));
    init_logging(&config.logging, verbosity)?;
    debug!(?config, "Configuration ready");

    let interval = Duration::from_millis(config.tour.simulation_interval_ms);

    match cli.command {
        Commands::Nearby {
            at,
            category,
            radius,
        } => {
            let mut config = config;
            if let Some(radius) = radius {
                config.tour.search_radius_meters = radius;
            }
            let mut wiring = wire(&config, at, interval)?;
            if let Some(category) = category {
                wiring.session.set_category(category);
            }
            print_nearby(&mut wiring.session).await?;
        },

        Commands::Route { from, to, mode } => {
            let mut wiring = wire(&config, from, interval)?;
            if let Some(mode) = mode {
                wiring.session.set_travel_mode(mode);
            }
            let route = wiring.session.route_to_coordinate(to).await?;

            println!("🧭 {}", route.format_summary());
            for (index, step) in route.steps.iter().enumerate() {
                println!("{:>3}. {step}", index + 1);
            }
            wiring.session.clear_route();
        },

        Commands::Navigate {
            from,
            to,
            mode,
            interval_ms,
        } => {
            let interval = interval_ms.map_or(interval, Duration::from_millis);
            let Wiring {
                mut session,
                location,
                map,
            } = wire(&config, from, interval)?;
            if let Some(mode) = mode {
                session.set_travel_mode(mode);
            }

            let route = session.route_to_coordinate(to).await?;
            println!("🧭 {}", route.format_summary());
            location.set_track(route.geometry.clone());

            if let Some(guidance) = session.state().guidance() {
                println!("➡️  {guidance}");
            }
            let mut last_step = session.state().guidance().and_then(|g| g.next_step_index);
            let mut skipped = 0_usize;
            loop {
                match session.pump().await {
                    PumpOutcome::Guidance(guidance) => {
                        if guidance.next_step_index != last_step {
                            println!("➡️  {guidance}");
                            last_step = guidance.next_step_index;
                        }
                    },
                    PumpOutcome::Ignored => skipped += 1,
                    PumpOutcome::Ended => break,
                }
            }
            if skipped > 0 {
                info!(skipped, "Position updates skipped during replay");
            }

            println!("🏁 Track finished ({} route points drawn)", map.snapshot().route.len());
            session.clear_route();
        },

        Commands::Intent { text, at } => {
            let Some(intent) = infer_place_intent(&text) else {
                println!("No place request recognized.");
                return Ok(());
            };
            println!("🔎 Looks like a request for: {}", intent.category());

            if let Some(at) = at {
                let mut wiring = wire(&config, at, interval)?;
                wiring.session.set_category(intent.category());
                print_nearby(&mut wiring.session).await?;
            }
        },
    }

    Ok(())
}
