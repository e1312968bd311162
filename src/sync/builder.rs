//! Builder for fluent controller configuration

use crate::{
    core::config::MarkerConfig,
    geocode::Geocoder,
    marker::{record::MarkerRecord, state::MarkerState},
    runtime::{self, AsyncSpawner},
    sync::{
        controller::MapSyncController,
        surface::{FormSurface, MapSurface},
    },
    MarkerError, Result,
};
use std::sync::Arc;

/// Builder for creating and wiring a [`MapSyncController`]
pub struct MapSyncControllerBuilder {
    config: MarkerConfig,
    /// Persisted field values the widget starts from
    record: MarkerRecord,
    map: Option<Box<dyn MapSurface>>,
    form: Option<Box<dyn FormSurface>>,
    geocoder: Option<Arc<dyn Geocoder>>,
    spawner: Option<Arc<dyn AsyncSpawner>>,
}

impl MapSyncControllerBuilder {
    pub fn new() -> Self {
        Self {
            config: MarkerConfig::default(),
            record: MarkerRecord::default(),
            map: None,
            form: None,
            geocoder: None,
            spawner: None,
        }
    }

    pub fn with_config(mut self, config: MarkerConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from persisted values; coordinates are normalized on the way in
    pub fn with_record(mut self, record: MarkerRecord) -> Self {
        self.record = record.normalized();
        self
    }

    pub fn with_map_surface<M: MapSurface + 'static>(mut self, map: M) -> Self {
        self.map = Some(Box::new(map));
        self
    }

    pub fn with_form_surface<F: FormSurface + 'static>(mut self, form: F) -> Self {
        self.form = Some(Box::new(form));
        self
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn with_spawner(mut self, spawner: Arc<dyn AsyncSpawner>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Build the controller and push the initial state to both surfaces
    pub fn build(self) -> Result<MapSyncController> {
        self.config.validate()?;

        let map = self
            .map
            .ok_or_else(|| MarkerError::Config("map surface is required".into()))?;
        let form = self
            .form
            .ok_or_else(|| MarkerError::Config("form surface is required".into()))?;
        let geocoder = match self.geocoder {
            Some(geocoder) => geocoder,
            None => default_geocoder(&self.config)?,
        };
        let spawner = self
            .spawner
            .or_else(runtime::default_spawner)
            .ok_or_else(|| MarkerError::Runtime("no async spawner available".into()))?;

        let state = MarkerState::from_record(&self.record, &self.config);
        Ok(MapSyncController::new(
            self.config,
            state,
            map,
            form,
            geocoder,
            spawner,
        ))
    }
}

impl Default for MapSyncControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "google")]
fn default_geocoder(config: &MarkerConfig) -> Result<Arc<dyn Geocoder>> {
    let geocoder = crate::geocode::google::GoogleGeocoder::new(&config.geocoder)?;
    Ok(Arc::new(geocoder))
}

#[cfg(not(feature = "google"))]
fn default_geocoder(_config: &MarkerConfig) -> Result<Arc<dyn Geocoder>> {
    Err(MarkerError::Config("a geocoder is required".into()))
}
