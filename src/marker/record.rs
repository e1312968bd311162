use crate::{
    core::{
        config::MapStyle,
        geo::{format_coordinate, parse_coordinate},
    },
    Result,
};
use serde::{Deserialize, Serialize};

/// Field values as the form layer persists them.
///
/// Coordinates stay strings because that is how the hidden form fields carry
/// them; [`MarkerRecord::normalized`] cleans them up on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerRecord {
    pub lat: String,
    pub lng: String,
    pub address: String,
    pub zoom: i64,
    pub status: i32,
    pub geocode_enabled: bool,
    pub map_style: MapStyle,
}

impl Default for MarkerRecord {
    fn default() -> Self {
        Self {
            lat: String::new(),
            lng: String::new(),
            address: String::new(),
            zoom: 0,
            status: 0,
            geocode_enabled: true,
            map_style: MapStyle::default(),
        }
    }
}

impl MarkerRecord {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let record: Self = serde_json::from_str(json)?;
        Ok(record.normalized())
    }

    /// Comma decimals become dots and unparseable coordinates become blank.
    /// A pair with one blank side is blanked entirely.
    pub fn normalized(mut self) -> Self {
        let lat = parse_coordinate(&self.lat);
        let lng = parse_coordinate(&self.lng);
        let (lat, lng) = match (lat, lng) {
            (Some(lat), Some(lng)) => (Some(lat), Some(lng)),
            _ => (None, None),
        };
        self.lat = format_coordinate(lat);
        self.lng = format_coordinate(lng);
        self
    }
}
