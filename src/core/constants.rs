//! Engine-wide defaults for marker fields and the geocoding provider.
//! Keeping them in a single place makes it easier to tweak magic numbers.

/// Zoom used when the persisted or typed zoom is absent or below 1.
pub const DEFAULT_ZOOM: u32 = 12;

/// Smallest zoom a marker field accepts.
pub const MIN_ZOOM: u32 = 1;

/// Status code recorded while automatic geocoding is switched off.
pub const STATUS_NO_GEOCODE: i32 = -100;

/// Status code for responses the provider taxonomy does not know.
pub const STATUS_UNKNOWN: i32 = -1;

/// Forward and reverse lookups share this endpoint.
pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Provider status string that marks a successful lookup.
pub const PROVIDER_STATUS_OK: &str = "OK";

/// User agent sent with provider requests.
pub const USER_AGENT: &str = concat!("mapmarker/", env!("CARGO_PKG_VERSION"));
