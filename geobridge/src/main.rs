use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geobridge_core::{Direction, LonLat, MapView};
use geobridge_utils::{RequestClient, Verb};

mod settings;

use settings::Settings;

/// Send requests to the geobridge endpoint or inspect a map view
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
enum Args {
    Request(RequestArgs),
    Map(MapArgs),
}

/// Send one request to the configured endpoint and print the response body
#[derive(clap::Args, Debug)]
#[command(version, about)]
struct RequestArgs {
    /// GET, POST, UPDATE or DELETE
    verb: Verb,

    /// Text sent as request body
    #[arg(short, long)]
    payload: Option<String>,
}

/// Initialize a map view, navigate it and print the result as JSON
#[derive(clap::Args, Debug)]
#[command(version, about)]
struct MapArgs {
    /// Re-center on `lon,lat`
    #[arg(long, allow_hyphen_values = true)]
    pan: Option<LonLat>,

    /// Zoom in this many levels
    #[arg(short, long, default_value_t = 0)]
    zoom_in: u8,

    /// Navigation steps (north, east, south, west), applied in order
    #[arg(short, long)]
    step: Vec<Direction>,
}

#[derive(Serialize)]
struct MapReport {
    view: MapView,
    tile_requests: Vec<String>,
}

fn build_map(settings: &Settings, args: &MapArgs) -> Result<MapReport> {
    let mut view = MapView::init(&settings.map)?;

    for _ in 0..args.zoom_in {
        view.zoom_in();
    }
    if let Some(center) = args.pan {
        view.pan_to(center)?;
    }
    for direction in &args.step {
        view.step(*direction);
    }

    let tile_requests = view.tile_requests();
    Ok(MapReport {
        view,
        tile_requests,
    })
}

async fn send_request(settings: &Settings, args: RequestArgs) -> Result<String> {
    let client = RequestClient::new(settings.request.clone());
    let response = client.dispatch(args.verb, args.payload)?.await?;
    Ok(response.text().into_owned())
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    subscriber.init();

    let settings = Settings::new()?;
    tracing::debug!("Settings are:\n{:#?}", settings);

    match Args::parse() {
        Args::Request(args) => {
            println!("{}", send_request(&settings, args).await?);
        }
        Args::Map(args) => {
            let report = build_map(&settings, &args)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    };

    Ok(())
}

#[cfg(test)]
mod tests;
