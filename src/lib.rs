//! # mapmarker
//!
//! Marker placement and geocode reconciliation for map input fields.
//!
//! A [`MarkerState`] holds the coordinate, zoom, address and geocode status of
//! one map widget. A [`MapSyncController`] sits between the rendered map, the
//! form fields and a [`Geocoder`], applies every user event to the state and
//! pushes the result to every surface except the one the event came from.

pub mod core;
pub mod geocode;
pub mod marker;
pub mod prelude;
pub mod runtime;
pub mod sync;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{GeocoderConfig, MapStyle, MarkerConfig},
    geo::LatLng,
};

pub use crate::marker::{record::MarkerRecord, state::MarkerState, status::GeocodeStatus};

pub use crate::geocode::{GeocodeOutcome, GeocodeResponse, Geocoder};

#[cfg(feature = "google")]
pub use crate::geocode::google::GoogleGeocoder;

pub use crate::sync::{
    builder::MapSyncControllerBuilder,
    controller::MapSyncController,
    events::{EventManager, MarkerEvent, SyncEvent},
    surface::{FormSurface, MapSurface},
};

/// Install `env_logger` as the `log` backend, honouring `RUST_LOG`
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MarkerError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MarkerError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Geocode error: {0}")]
    Geocode(String),

    #[error("Lookup timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MarkerError;
