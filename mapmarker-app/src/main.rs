use anyhow::Context;
use clap::{Parser, Subcommand};
use mapmarker::{
    FormSurface, GeocodeStatus, GoogleGeocoder, LatLng, MapSurface, MapSyncControllerBuilder,
    MarkerConfig, MarkerRecord, MarkerState,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Geocode addresses and drive a marker widget from the command line
#[derive(Debug, Parser)]
#[command(name = "mapmarker-app", version)]
struct Cli {
    /// Provider API key
    #[arg(long, env = "MAPMARKER_API_KEY", global = true)]
    api_key: Option<String>,

    /// JSON config file (see `MarkerConfig`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Give up on a lookup after this many milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Geocode an address the way a form save does and print the record
    Geocode { address: String },
    /// Drop the marker at a coordinate and resolve its address
    Drag {
        #[arg(allow_hyphen_values = true)]
        lat: String,
        #[arg(allow_hyphen_values = true)]
        lng: String,
    },
}

/// Prints every write the controller makes to the map
struct ConsoleMap;

impl MapSurface for ConsoleMap {
    fn place_marker(&mut self, position: LatLng) {
        println!("map    marker -> {position}");
    }

    fn set_zoom(&mut self, zoom: u32) {
        println!("map    zoom   -> {zoom}");
    }

    fn refresh_viewport(&mut self, center: Option<LatLng>) {
        println!("map    refresh around {center:?}");
    }
}

/// Prints every write the controller makes to the form fields
struct ConsoleForm;

impl FormSurface for ConsoleForm {
    fn set_coordinates(&mut self, position: Option<LatLng>) {
        match position {
            Some(position) => println!("fields lat/lng -> {position}"),
            None => println!("fields lat/lng -> (blank)"),
        }
    }

    fn set_zoom(&mut self, zoom: u32) {
        println!("fields zoom    -> {zoom}");
    }

    fn set_address(&mut self, address: &str) {
        println!("fields address -> {address:?}");
    }

    fn set_status(&mut self, status: GeocodeStatus) {
        println!("fields status  -> {} ({})", status.label(), status.code());
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<MarkerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            MarkerConfig::from_json_str(&json)?
        }
        None => MarkerConfig::default(),
    };
    if let Some(key) = &cli.api_key {
        config = config.with_api_key(key.clone());
    }
    if let Some(ms) = cli.timeout_ms {
        config.lookup_timeout_ms = Some(ms);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mapmarker::init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let geocoder = Arc::new(GoogleGeocoder::new(&config.geocoder)?);

    match cli.command {
        Command::Geocode { address } => {
            let mut state = MarkerState::new(&config);
            state.set_address(&address);
            let status = state.geocode(&*geocoder).await;
            if status.is_failure() {
                log::warn!("geocoding '{}' failed: {}", address, status.label());
            }
            println!("{state}");
            println!("{}", serde_json::to_string_pretty(&state.to_record())?);
        }
        Command::Drag { lat, lng } => {
            let position = LatLng::parse_pair(&lat, &lng)?;

            let mut controller = MapSyncControllerBuilder::new()
                .with_config(config)
                .with_record(MarkerRecord::default())
                .with_map_surface(ConsoleMap)
                .with_form_surface(ConsoleForm)
                .with_geocoder(geocoder)
                .build()?;

            controller.on_marker_dragged(position);
            controller.settle().await;

            for event in controller.process_events() {
                println!("event  {}", serde_json::to_string(&event)?);
            }
            println!("{}", controller.state());
        }
    }

    Ok(())
}
