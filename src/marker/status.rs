//! Geocode status taxonomy
//!
//! Every status has a fixed integer code (the persisted form), a provider key
//! (the string the geocoding service reports) and a display label. The lookup
//! tables are built once and indexed in both directions.

use crate::constants::{PROVIDER_STATUS_OK, STATUS_NO_GEOCODE, STATUS_UNKNOWN};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i32", from = "i32")]
pub enum GeocodeStatus {
    /// No lookup performed yet
    #[default]
    NotApplicable,
    Ok,
    OkRooftop,
    OkRangeInterpolated,
    OkGeometricCenter,
    OkApproximate,
    Unknown,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    /// Automatic geocoding switched off
    Disabled,
}

struct StatusEntry {
    status: GeocodeStatus,
    code: i32,
    key: &'static str,
    label: String,
}

struct StatusTable {
    entries: Vec<StatusEntry>,
    by_code: HashMap<i32, usize>,
    by_key: HashMap<&'static str, usize>,
    by_status: HashMap<GeocodeStatus, usize>,
}

impl StatusTable {
    fn build() -> Self {
        let rows: [(GeocodeStatus, i32, &'static str); 12] = [
            (GeocodeStatus::NotApplicable, 0, "N/A"),
            (GeocodeStatus::Ok, 1, "OK"),
            (GeocodeStatus::OkRooftop, 2, "OK_ROOFTOP"),
            (GeocodeStatus::OkRangeInterpolated, 3, "OK_RANGE_INTERPOLATED"),
            (GeocodeStatus::OkGeometricCenter, 4, "OK_GEOMETRIC_CENTER"),
            (GeocodeStatus::OkApproximate, 5, "OK_APPROXIMATE"),
            (GeocodeStatus::Unknown, STATUS_UNKNOWN, "UNKNOWN"),
            (GeocodeStatus::ZeroResults, -2, "ZERO_RESULTS"),
            (GeocodeStatus::OverQueryLimit, -3, "OVER_QUERY_LIMIT"),
            (GeocodeStatus::RequestDenied, -4, "REQUEST_DENIED"),
            (GeocodeStatus::InvalidRequest, -5, "INVALID_REQUEST"),
            (GeocodeStatus::Disabled, STATUS_NO_GEOCODE, "Geocode OFF"),
        ];

        let mut table = Self {
            entries: Vec::with_capacity(rows.len()),
            by_code: HashMap::new(),
            by_key: HashMap::new(),
            by_status: HashMap::new(),
        };
        for (index, (status, code, key)) in rows.into_iter().enumerate() {
            table.by_code.insert(code, index);
            table.by_key.insert(key, index);
            table.by_status.insert(status, index);
            table.entries.push(StatusEntry {
                status,
                code,
                key,
                label: key.replace('_', " "),
            });
        }
        table
    }

    fn entry(&self, status: GeocodeStatus) -> &StatusEntry {
        // every variant has a row
        &self.entries[self.by_status[&status]]
    }
}

static STATUS_TABLE: Lazy<StatusTable> = Lazy::new(StatusTable::build);

impl GeocodeStatus {
    /// Persisted integer code
    pub fn code(self) -> i32 {
        STATUS_TABLE.entry(self).code
    }

    /// Provider key, e.g. `OK_ROOFTOP`
    pub fn key(self) -> &'static str {
        STATUS_TABLE.entry(self).key
    }

    /// Human-readable label, e.g. `OK ROOFTOP`
    pub fn label(self) -> &'static str {
        STATUS_TABLE.entry(self).label.as_str()
    }

    /// Unrecognized codes read back as `Unknown`
    pub fn from_code(code: i32) -> Self {
        STATUS_TABLE
            .by_code
            .get(&code)
            .map(|&index| STATUS_TABLE.entries[index].status)
            .unwrap_or(Self::Unknown)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        STATUS_TABLE
            .by_key
            .get(key)
            .map(|&index| STATUS_TABLE.entries[index].status)
    }

    /// Maps a provider response status to the taxonomy.
    ///
    /// A successful response combines the overall status with the match's
    /// location type (`OK` + `ROOFTOP` → `OK_ROOFTOP`). Combinations outside
    /// the table fall back to `Ok` when the provider reported success and to
    /// `Unknown` otherwise.
    pub fn from_provider(provider_status: &str, location_type: Option<&str>) -> Self {
        let succeeded = provider_status == PROVIDER_STATUS_OK;
        if succeeded {
            let combined = match location_type {
                Some(location_type) if !location_type.is_empty() => {
                    format!("{provider_status}_{location_type}")
                }
                _ => provider_status.to_string(),
            };
            return Self::from_key(&combined).unwrap_or(Self::Ok);
        }

        match Self::from_key(provider_status) {
            // the provider never reports these; they only arise locally
            Some(Self::NotApplicable) | Some(Self::Disabled) | None => Self::Unknown,
            Some(status) => status,
        }
    }

    pub fn is_success(self) -> bool {
        self.code() > 0
    }

    pub fn is_failure(self) -> bool {
        self.code() < 0 && self != Self::Disabled
    }
}

impl From<GeocodeStatus> for i32 {
    fn from(status: GeocodeStatus) -> Self {
        status.code()
    }
}

impl From<i32> for GeocodeStatus {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl fmt::Display for GeocodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_codes_come_from_constants() {
        assert_eq!(GeocodeStatus::Unknown.code(), STATUS_UNKNOWN);
        assert_eq!(GeocodeStatus::Disabled.code(), STATUS_NO_GEOCODE);
        assert_eq!(GeocodeStatus::from_code(STATUS_NO_GEOCODE), GeocodeStatus::Disabled);
    }

    #[test]
    fn test_code_label_table() {
        let expected = [
            (0, "N/A"),
            (1, "OK"),
            (2, "OK ROOFTOP"),
            (3, "OK RANGE INTERPOLATED"),
            (4, "OK GEOMETRIC CENTER"),
            (5, "OK APPROXIMATE"),
            (-1, "UNKNOWN"),
            (-2, "ZERO RESULTS"),
            (-3, "OVER QUERY LIMIT"),
            (-4, "REQUEST DENIED"),
            (-5, "INVALID REQUEST"),
            (-100, "Geocode OFF"),
        ];
        for (code, label) in expected {
            let status = GeocodeStatus::from_code(code);
            assert_eq!(status.code(), code);
            assert_eq!(status.label(), label);
        }
    }

    #[test]
    fn test_unrecognized_code_is_unknown() {
        assert_eq!(GeocodeStatus::from_code(42), GeocodeStatus::Unknown);
        assert_eq!(GeocodeStatus::from_code(-6), GeocodeStatus::Unknown);
    }

    #[test]
    fn test_provider_success_with_location_type() {
        assert_eq!(
            GeocodeStatus::from_provider("OK", Some("ROOFTOP")),
            GeocodeStatus::OkRooftop
        );
        assert_eq!(
            GeocodeStatus::from_provider("OK", Some("APPROXIMATE")),
            GeocodeStatus::OkApproximate
        );
    }

    #[test]
    fn test_provider_success_unlisted_location_type_falls_back_to_ok() {
        assert_eq!(
            GeocodeStatus::from_provider("OK", Some("SOMEWHERE")),
            GeocodeStatus::Ok
        );
        assert_eq!(GeocodeStatus::from_provider("OK", None), GeocodeStatus::Ok);
    }

    #[test]
    fn test_provider_failures() {
        assert_eq!(
            GeocodeStatus::from_provider("ZERO_RESULTS", None),
            GeocodeStatus::ZeroResults
        );
        assert_eq!(
            GeocodeStatus::from_provider("OVER_QUERY_LIMIT", None),
            GeocodeStatus::OverQueryLimit
        );
        assert_eq!(
            GeocodeStatus::from_provider("UNKNOWN_ERROR", None),
            GeocodeStatus::Unknown
        );
        assert_eq!(
            GeocodeStatus::from_provider("Geocode OFF", None),
            GeocodeStatus::Unknown
        );
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&GeocodeStatus::ZeroResults).unwrap();
        assert_eq!(json, "-2");
        let back: GeocodeStatus = serde_json::from_str("3").unwrap();
        assert_eq!(back, GeocodeStatus::OkRangeInterpolated);
        let unknown: GeocodeStatus = serde_json::from_str("77").unwrap();
        assert_eq!(unknown, GeocodeStatus::Unknown);
    }

    #[test]
    fn test_success_and_failure_classes() {
        assert!(GeocodeStatus::OkRooftop.is_success());
        assert!(!GeocodeStatus::NotApplicable.is_success());
        assert!(GeocodeStatus::ZeroResults.is_failure());
        assert!(!GeocodeStatus::Disabled.is_failure());
    }
}
