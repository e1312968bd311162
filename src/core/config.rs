//! Per-instance configuration for marker widgets
//!
//! Every controller owns its own `MarkerConfig`. Nothing here is shared between
//! widget instances, so changing one map's options never leaks into another.

use crate::{
    constants::{DEFAULT_ZOOM, GOOGLE_GEOCODE_URL, MIN_ZOOM, USER_AGENT},
    MarkerError, Result,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Base map style of the input widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    #[default]
    #[serde(alias = "default")]
    Hybrid,
    Roadmap,
    Satellite,
    Terrain,
}

impl MapStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hybrid => "hybrid",
            Self::Roadmap => "roadmap",
            Self::Satellite => "satellite",
            Self::Terrain => "terrain",
        }
    }
}

impl FromStr for MapStyle {
    type Err = MarkerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" | "hybrid" => Ok(Self::Hybrid),
            "roadmap" => Ok(Self::Roadmap),
            "satellite" => Ok(Self::Satellite),
            "terrain" => Ok(Self::Terrain),
            other => Err(MarkerError::Config(format!("unknown map style '{other}'"))),
        }
    }
}

/// Connection settings for the HTTP geocoding provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: GOOGLE_GEOCODE_URL.to_string(),
            api_key: None,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Options for one marker widget and its controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Zoom applied when the stored or typed zoom is missing or below 1
    pub default_zoom: u32,
    pub draggable: bool,
    pub scroll_wheel: bool,
    pub map_style: MapStyle,
    /// Client-side limit for one lookup. `None` waits for the provider indefinitely.
    pub lookup_timeout_ms: Option<u64>,
    pub geocoder: GeocoderConfig,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            default_zoom: DEFAULT_ZOOM,
            draggable: true,
            scroll_wheel: false,
            map_style: MapStyle::default(),
            lookup_timeout_ms: None,
            geocoder: GeocoderConfig::default(),
        }
    }
}

impl MarkerConfig {
    /// Load a config document; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_zoom < MIN_ZOOM {
            return Err(MarkerError::Config(format!(
                "default_zoom must be at least {MIN_ZOOM}, got {}",
                self.default_zoom
            )));
        }
        if self.geocoder.endpoint.trim().is_empty() {
            return Err(MarkerError::Config("geocoder endpoint is empty".into()));
        }
        Ok(())
    }

    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout_ms.map(Duration::from_millis)
    }

    pub fn with_default_zoom(mut self, zoom: u32) -> Self {
        self.default_zoom = zoom;
        self
    }

    pub fn with_map_style(mut self, style: MapStyle) -> Self {
        self.map_style = style;
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.geocoder.api_key = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MarkerConfig::default();
        assert_eq!(config.default_zoom, 12);
        assert!(config.draggable);
        assert!(!config.scroll_wheel);
        assert_eq!(config.map_style, MapStyle::Hybrid);
        assert_eq!(config.lookup_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MarkerConfig::from_json_str(
            r#"{ "default_zoom": 9, "map_style": "satellite", "geocoder": { "api_key": "k" } }"#,
        )
        .unwrap();
        assert_eq!(config.default_zoom, 9);
        assert_eq!(config.map_style, MapStyle::Satellite);
        assert_eq!(config.geocoder.api_key.as_deref(), Some("k"));
        assert_eq!(config.geocoder.endpoint, GOOGLE_GEOCODE_URL);
    }

    #[test]
    fn test_default_style_alias() {
        let config = MarkerConfig::from_json_str(r#"{ "map_style": "default" }"#).unwrap();
        assert_eq!(config.map_style, MapStyle::Hybrid);
        assert_eq!("Roadmap".parse::<MapStyle>().unwrap(), MapStyle::Roadmap);
        assert!("globe".parse::<MapStyle>().is_err());
    }

    #[test]
    fn test_rejects_zero_default_zoom() {
        let err = MarkerConfig::from_json_str(r#"{ "default_zoom": 0 }"#).unwrap_err();
        assert!(matches!(err, MarkerError::Config(_)));
    }

    #[test]
    fn test_timeout_builder() {
        let config = MarkerConfig::default().with_lookup_timeout(Duration::from_secs(2));
        assert_eq!(config.lookup_timeout(), Some(Duration::from_secs(2)));

        let saturated = MarkerConfig::default().with_lookup_timeout(Duration::MAX);
        assert_eq!(saturated.lookup_timeout_ms, Some(u64::MAX));
    }
}
