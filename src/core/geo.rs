use crate::MarkerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a coordinate only when both components are finite numbers
    pub fn try_new(lat: f64, lng: f64) -> Option<Self> {
        if lat.is_finite() && lng.is_finite() {
            Some(Self::new(lat, lng))
        } else {
            None
        }
    }

    /// Parses a pair of form field values. Either side failing rejects the
    /// whole pair, never a half-valid one.
    pub fn parse_pair(lat: &str, lng: &str) -> crate::Result<Self> {
        match (parse_coordinate(lat), parse_coordinate(lng)) {
            (Some(lat), Some(lng)) => Ok(Self::new(lat, lng)),
            _ => Err(MarkerError::InvalidCoordinates(format!("'{lat}', '{lng}'"))),
        }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// The `lat,lng` form the provider expects for reverse lookups
    pub fn to_query(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

/// Parses a single coordinate as typed into a form field.
///
/// A comma decimal separator is accepted (`"48,8566"` reads as `48.8566`).
/// Empty, non-numeric and non-finite input yields `None`.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let normalized = raw.replace(',', ".");
    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Formats a coordinate for a hidden form field; an unset coordinate is blank.
pub fn format_coordinate(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
