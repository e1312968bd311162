//! Surfaces the controller keeps in step with the marker state
//!
//! The map widget and the form fields are external collaborators. The
//! controller only ever writes to them; their own events come back in as
//! [`SyncEvent`](crate::sync::events::SyncEvent)s.

use crate::{
    core::{config::MapStyle, geo::LatLng},
    marker::status::GeocodeStatus,
};

/// The rendered map widget
pub trait MapSurface: Send {
    /// Move the marker (and map center) to `position`
    fn place_marker(&mut self, position: LatLng);

    /// Hide the marker when the state has no position
    fn clear_marker(&mut self) {}

    fn set_zoom(&mut self, zoom: u32);

    fn set_style(&mut self, _style: MapStyle) {}

    /// Recompute the rendered viewport after a size change and re-center
    fn refresh_viewport(&mut self, center: Option<LatLng>);
}

/// The form fields bound to the marker
pub trait FormSurface: Send {
    /// Hidden latitude/longitude fields; `None` blanks both
    fn set_coordinates(&mut self, position: Option<LatLng>);

    fn set_zoom(&mut self, zoom: u32);

    fn set_address(&mut self, address: &str);

    fn set_geocode_enabled(&mut self, _enabled: bool) {}

    /// Status / notes display
    fn set_status(&mut self, status: GeocodeStatus);
}
