//! Authoritative in-memory record of one marker widget

use crate::{
    constants::MIN_ZOOM,
    core::{
        config::{MapStyle, MarkerConfig},
        geo::{format_coordinate, parse_coordinate, LatLng},
    },
    geocode::{GeocodeOutcome, Geocoder},
    marker::{record::MarkerRecord, status::GeocodeStatus},
};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerState {
    position: Option<LatLng>,
    zoom: u32,
    default_zoom: u32,
    address: String,
    geocode_enabled: bool,
    status: GeocodeStatus,
    map_style: MapStyle,
    /// Address the most recent lookup was issued for
    last_geocoded_address: String,
    /// Outcome of that lookup, restored when the same address is asked for again
    last_lookup_status: GeocodeStatus,
}

impl MarkerState {
    /// Empty state: no position, default zoom, geocoding on
    pub fn new(config: &MarkerConfig) -> Self {
        Self {
            position: None,
            zoom: config.default_zoom.max(MIN_ZOOM),
            default_zoom: config.default_zoom.max(MIN_ZOOM),
            address: String::new(),
            geocode_enabled: true,
            status: GeocodeStatus::NotApplicable,
            map_style: config.map_style,
            last_geocoded_address: String::new(),
            last_lookup_status: GeocodeStatus::NotApplicable,
        }
    }

    /// Rebuild the state from persisted field values.
    ///
    /// A record with a real lookup status counts as already geocoded for its
    /// address, so reopening the form does not repeat the lookup.
    pub fn from_record(record: &MarkerRecord, config: &MarkerConfig) -> Self {
        let mut state = Self::new(config);
        state.set_position_str(&record.lat, &record.lng);
        state.set_zoom(record.zoom as f64);
        state.set_address(&record.address);
        state.map_style = record.map_style;
        state.geocode_enabled = record.geocode_enabled;

        let status = GeocodeStatus::from_code(record.status);
        if status != GeocodeStatus::NotApplicable && status != GeocodeStatus::Disabled {
            state.last_geocoded_address = record.address.clone();
            state.last_lookup_status = status;
        }
        state.status = if record.geocode_enabled {
            status
        } else {
            GeocodeStatus::Disabled
        };
        state
    }

    pub fn to_record(&self) -> MarkerRecord {
        MarkerRecord {
            lat: format_coordinate(self.latitude()),
            lng: format_coordinate(self.longitude()),
            address: self.address.clone(),
            zoom: i64::from(self.zoom),
            status: self.status.code(),
            geocode_enabled: self.geocode_enabled,
            map_style: self.map_style,
        }
    }

    pub fn position(&self) -> Option<LatLng> {
        self.position
    }

    pub fn latitude(&self) -> Option<f64> {
        self.position.map(|p| p.lat)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.position.map(|p| p.lng)
    }

    /// Store a coordinate pair. If either component is not a finite number
    /// both are cleared.
    pub fn set_position(&mut self, lat: f64, lng: f64) {
        self.position = LatLng::try_new(lat, lng);
    }

    /// Same as [`set_position`](Self::set_position) for raw field text
    pub fn set_position_str(&mut self, lat: &str, lng: &str) {
        self.position = match (parse_coordinate(lat), parse_coordinate(lng)) {
            (Some(lat), Some(lng)) => LatLng::try_new(lat, lng),
            _ => None,
        };
    }

    pub fn clear_position(&mut self) {
        self.position = None;
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn default_zoom(&self) -> u32 {
        self.default_zoom
    }

    /// Fractional zooms are floored; anything below 1 (or not a number)
    /// becomes the configured default.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom.is_finite() && zoom >= f64::from(MIN_ZOOM) {
            zoom.floor().min(f64::from(u32::MAX)) as u32
        } else {
            self.default_zoom
        };
    }

    pub fn set_zoom_str(&mut self, raw: &str) {
        let zoom = raw.trim().parse::<f64>().unwrap_or(0.0);
        self.set_zoom(zoom);
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Stored verbatim. Never starts a lookup on its own.
    pub fn set_address(&mut self, address: &str) {
        self.address = address.to_string();
    }

    pub fn geocode_enabled(&self) -> bool {
        self.geocode_enabled
    }

    pub fn set_geocode_enabled(&mut self, enabled: bool) {
        self.geocode_enabled = enabled;
    }

    pub fn status(&self) -> GeocodeStatus {
        self.status
    }

    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }

    pub fn map_style(&self) -> MapStyle {
        self.map_style
    }

    pub fn last_geocoded_address(&self) -> &str {
        &self.last_geocoded_address
    }

    /// True when the current address has not been looked up yet and
    /// geocoding is enabled
    pub fn needs_lookup(&self) -> bool {
        self.geocode_enabled && self.address != self.last_geocoded_address
    }

    /// Mark the current address as geocoded and return it for the request
    pub fn begin_lookup(&mut self) -> String {
        self.last_geocoded_address = self.address.clone();
        self.address.clone()
    }

    /// Drop the record of a lookup whose answer will never be applied
    pub fn forget_lookup(&mut self) {
        self.last_geocoded_address.clear();
        self.last_lookup_status = GeocodeStatus::NotApplicable;
    }

    /// Reapply the status of the last lookup for an unchanged address.
    /// Returns whether the visible status changed.
    pub fn restore_cached_status(&mut self) -> bool {
        let changed = self.status != self.last_lookup_status;
        self.status = self.last_lookup_status;
        changed
    }

    /// Record the outcome of a lookup.
    ///
    /// A match moves the marker; a failure clears the coordinates so a stale
    /// position is never presented as the geocoded one.
    pub fn apply_geocode_result(&mut self, outcome: &GeocodeOutcome) -> GeocodeStatus {
        match outcome {
            GeocodeOutcome::Found {
                position, status, ..
            } => {
                self.set_position(position.lat, position.lng);
                self.record_lookup_status(*status);
            }
            GeocodeOutcome::Failed { status } => {
                self.clear_position();
                self.record_lookup_status(*status);
            }
        }
        self.status
    }

    /// Record a lookup status without touching the coordinates
    pub fn record_lookup_status(&mut self, status: GeocodeStatus) {
        self.status = status;
        self.last_lookup_status = status;
    }

    /// Record that the current address came back from a reverse lookup with
    /// `status`, so a later blur on it does not look it up again
    pub fn mark_address_geocoded(&mut self, status: GeocodeStatus) {
        self.last_geocoded_address = self.address.clone();
        self.record_lookup_status(status);
    }

    /// Change the visible status only; the lookup cache is left alone
    pub fn set_status(&mut self, status: GeocodeStatus) {
        self.status = status;
    }

    /// Save-time lookup: one awaited request for the current address.
    ///
    /// Disabled geocoding answers `Disabled` and an unchanged address answers
    /// the cached status, neither touching the provider.
    pub async fn geocode(&mut self, geocoder: &dyn Geocoder) -> GeocodeStatus {
        if !self.geocode_enabled {
            self.set_status(GeocodeStatus::Disabled);
            return self.status;
        }
        if !self.needs_lookup() {
            self.restore_cached_status();
            return self.status;
        }

        let address = self.begin_lookup();
        let result = geocoder.geocode(&address).await;
        if let Err(e) = &result {
            log::warn!("error geocoding address '{}': {}", address, e);
        }
        let outcome = GeocodeOutcome::from_result(&result);
        let status = self.apply_geocode_result(&outcome);
        log::info!("geocode {}: '{}'", status.label(), address);
        status
    }
}

impl fmt::Display for MarkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {}) [{}]",
            self.address,
            format_coordinate(self.latitude()),
            format_coordinate(self.longitude()),
            self.zoom,
            self.status_label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> MarkerState {
        MarkerState::new(&MarkerConfig::default())
    }

    #[test]
    fn test_position_round_trip() {
        let mut s = state();
        for (lat, lng) in [(40.7128, -74.006), (-33.8688, 151.2093), (0.0, 0.0)] {
            s.set_position(lat, lng);
            assert_eq!(s.latitude(), Some(lat));
            assert_eq!(s.longitude(), Some(lng));
        }
    }

    #[test]
    fn test_invalid_component_clears_both() {
        let mut s = state();
        s.set_position(1.0, 2.0);
        s.set_position(f64::NAN, 2.0);
        assert_eq!(s.position(), None);

        s.set_position(1.0, 2.0);
        s.set_position_str("1.0", "east");
        assert_eq!(s.latitude(), None);
        assert_eq!(s.longitude(), None);
    }

    #[test]
    fn test_comma_decimal_input() {
        let mut s = state();
        s.set_position_str("52,52", "13,405");
        assert_eq!(s.position(), Some(LatLng::new(52.52, 13.405)));
    }

    #[test]
    fn test_zoom_floor_and_default() {
        let mut s = MarkerState::new(&MarkerConfig::default().with_default_zoom(7));
        s.set_zoom(14.9);
        assert_eq!(s.zoom(), 14);
        s.set_zoom(1.0);
        assert_eq!(s.zoom(), 1);
        s.set_zoom(0.5);
        assert_eq!(s.zoom(), 7);
        s.set_zoom(-3.0);
        assert_eq!(s.zoom(), 7);
        s.set_zoom_str("abc");
        assert_eq!(s.zoom(), 7);
        s.set_zoom_str(" 9 ");
        assert_eq!(s.zoom(), 9);
    }

    #[test]
    fn test_apply_found_moves_marker() {
        let mut s = state();
        let outcome = GeocodeOutcome::Found {
            position: LatLng::new(37.42, -122.08),
            status: GeocodeStatus::OkRooftop,
            formatted_address: String::new(),
        };
        assert_eq!(s.apply_geocode_result(&outcome), GeocodeStatus::OkRooftop);
        assert_eq!(s.position(), Some(LatLng::new(37.42, -122.08)));
        assert_eq!(s.status_label(), "OK ROOFTOP");
    }

    #[test]
    fn test_apply_failure_clears_position() {
        let mut s = state();
        s.set_position(10.0, 20.0);
        let outcome = GeocodeOutcome::Failed {
            status: GeocodeStatus::OverQueryLimit,
        };
        s.apply_geocode_result(&outcome);
        assert_eq!(s.position(), None);
        assert_eq!(s.status().code(), -3);
    }

    #[test]
    fn test_lookup_bookkeeping() {
        let mut s = state();
        assert!(!s.needs_lookup());
        s.set_address("Main St 1");
        assert!(s.needs_lookup());
        assert_eq!(s.begin_lookup(), "Main St 1");
        assert!(!s.needs_lookup());
        s.set_geocode_enabled(false);
        s.set_address("Main St 2");
        assert!(!s.needs_lookup());
    }

    #[test]
    fn test_restore_cached_status_after_disable() {
        let mut s = state();
        s.record_lookup_status(GeocodeStatus::OkApproximate);
        s.set_status(GeocodeStatus::Disabled);
        assert_eq!(s.status(), GeocodeStatus::Disabled);
        assert!(s.restore_cached_status());
        assert_eq!(s.status(), GeocodeStatus::OkApproximate);
        assert!(!s.restore_cached_status());
    }

    #[test]
    fn test_mark_address_geocoded() {
        let mut s = state();
        s.set_address("10 Downing St, London");
        s.mark_address_geocoded(GeocodeStatus::OkRooftop);
        assert!(!s.needs_lookup());
        assert_eq!(s.status(), GeocodeStatus::OkRooftop);
    }

    #[test]
    fn test_record_round_trip_and_display() {
        let record = MarkerRecord {
            lat: "40,7128".into(),
            lng: "-74.006".into(),
            address: "New York".into(),
            zoom: 0,
            status: 5,
            geocode_enabled: true,
            map_style: MapStyle::Roadmap,
        };
        let s = MarkerState::from_record(&record, &MarkerConfig::default());
        assert_eq!(s.zoom(), 12);
        assert_eq!(s.status(), GeocodeStatus::OkApproximate);
        assert_eq!(s.last_geocoded_address(), "New York");
        assert!(!s.needs_lookup());
        assert_eq!(s.to_string(), "New York (40.7128, -74.006, 12) [OK APPROXIMATE]");

        let back = s.to_record();
        assert_eq!(back.lat, "40.7128");
        assert_eq!(back.zoom, 12);
        assert_eq!(back.map_style, MapStyle::Roadmap);
    }

    #[test]
    fn test_disabled_record_loads_geocode_off() {
        let record = MarkerRecord {
            status: 1,
            geocode_enabled: false,
            ..MarkerRecord::default()
        };
        let s = MarkerState::from_record(&record, &MarkerConfig::default());
        assert_eq!(s.status(), GeocodeStatus::Disabled);
        assert_eq!(s.status_label(), "Geocode OFF");
    }
}
