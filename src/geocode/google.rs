use super::{GeocodeResponse, Geocoder};
use crate::{core::config::GeocoderConfig, core::geo::LatLng, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Geocoder backed by the Google Maps geocoding HTTP API.
///
/// The client is built once per geocoder so TLS and connection pool setup are
/// not repeated for every lookup.
pub struct GoogleGeocoder {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder().user_agent(config.user_agent.clone()).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
        })
    }

    async fn fetch(&self, param: &str, value: &str) -> Result<GeocodeResponse> {
        let mut query = vec![(param, value)];
        if let Some(key) = self.api_key.as_deref() {
            query.push(("key", key));
        }

        log::debug!("geocode request {}={}", param, value);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        let body: GeocodeResponse = response.json().await?;

        if let Some(message) = body.error_message.as_deref() {
            log::warn!("geocode {} for '{}': {}", body.status, value, message);
        } else {
            log::info!(
                "geocode {} for '{}' ({} results)",
                body.status,
                value,
                body.results.len()
            );
        }
        Ok(body)
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse> {
        self.fetch("address", address).await
    }

    async fn reverse_geocode(&self, position: LatLng) -> Result<GeocodeResponse> {
        self.fetch("latlng", &position.to_query()).await
    }
}
