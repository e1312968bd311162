//! Prelude module for common mapmarker types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapmarker::prelude::*;`

pub use crate::core::{
    config::{GeocoderConfig, MapStyle, MarkerConfig},
    geo::LatLng,
};

pub use crate::marker::{MarkerRecord, MarkerState, GeocodeStatus};

pub use crate::geocode::{GeocodeOutcome, GeocodeResponse, Geocoder};

#[cfg(feature = "google")]
pub use crate::geocode::google::GoogleGeocoder;

pub use crate::sync::{
    FormSurface, LookupKind, MapSurface, MapSyncController, MapSyncControllerBuilder,
    MarkerEvent, SyncEvent,
};

pub use crate::runtime::{default_spawner, AsyncSpawner};

pub use crate::{Error as MarkerError, Result};

pub use std::sync::Arc;
