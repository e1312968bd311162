//! Geocoding provider boundary
//!
//! The provider is an opaque async service: given an address (or a coordinate)
//! it returns the best match, or a status explaining why there is none.

#[cfg(feature = "google")]
pub mod google;

use crate::{
    constants::PROVIDER_STATUS_OK, core::geo::LatLng, marker::status::GeocodeStatus, MarkerError,
    Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Anything that can resolve addresses to coordinates and back
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Forward lookup, address → coordinate
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse>;

    /// Reverse lookup, coordinate → address
    async fn reverse_geocode(&self, position: LatLng) -> Result<GeocodeResponse>;
}

/// Provider response body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    #[serde(default)]
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
    #[serde(default)]
    pub location_type: Option<String>,
}

impl GeocodeResponse {
    /// A successful response carrying a single match
    pub fn found(position: LatLng, location_type: &str, formatted_address: &str) -> Self {
        Self {
            status: PROVIDER_STATUS_OK.to_string(),
            results: vec![GeocodeMatch {
                formatted_address: formatted_address.to_string(),
                geometry: Geometry {
                    location: position,
                    location_type: Some(location_type.to_string()),
                },
            }],
            error_message: None,
        }
    }

    /// A response with no match and the given provider status
    pub fn failed(status: &str) -> Self {
        Self {
            status: status.to_string(),
            ..Self::default()
        }
    }
}

/// Result of one lookup after it has been mapped onto the status taxonomy
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Found {
        position: LatLng,
        status: GeocodeStatus,
        formatted_address: String,
    },
    Failed {
        status: GeocodeStatus,
    },
}

impl GeocodeOutcome {
    pub fn from_response(response: &GeocodeResponse) -> Self {
        let first = response.results.first();
        match first {
            Some(best) if response.status == PROVIDER_STATUS_OK => {
                let position = best.geometry.location;
                if LatLng::try_new(position.lat, position.lng).is_none() {
                    return Self::Failed {
                        status: GeocodeStatus::Unknown,
                    };
                }
                Self::Found {
                    position,
                    status: GeocodeStatus::from_provider(
                        &response.status,
                        best.geometry.location_type.as_deref(),
                    ),
                    formatted_address: best.formatted_address.clone(),
                }
            }
            None if response.status == PROVIDER_STATUS_OK => Self::Failed {
                status: GeocodeStatus::ZeroResults,
            },
            _ => Self::Failed {
                status: GeocodeStatus::from_provider(&response.status, None),
            },
        }
    }

    /// Transport and decoding errors are indistinguishable from an unknown
    /// provider failure
    pub fn from_error(_error: &MarkerError) -> Self {
        Self::Failed {
            status: GeocodeStatus::Unknown,
        }
    }

    pub fn from_result(result: &Result<GeocodeResponse>) -> Self {
        match result {
            Ok(response) => Self::from_response(response),
            Err(error) => Self::from_error(error),
        }
    }

    pub fn status(&self) -> GeocodeStatus {
        match self {
            Self::Found { status, .. } | Self::Failed { status } => *status,
        }
    }

    pub fn position(&self) -> Option<LatLng> {
        match self {
            Self::Found { position, .. } => Some(*position),
            Self::Failed { .. } => None,
        }
    }
}
