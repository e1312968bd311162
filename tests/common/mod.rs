//! Fakes shared by the integration tests: recording surfaces and a scripted
//! geocoder whose replies can be held back until the test releases them.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::channel::oneshot;
use mapmarker::{
    core::geo::format_coordinate, FormSurface, GeocodeResponse, GeocodeStatus, Geocoder, LatLng,
    MapStyle, MapSurface, MapSyncController, MapSyncControllerBuilder, MarkerConfig, MarkerError,
    MarkerRecord,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Everything the controller wrote to the map and the form
#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub map_marker: Option<LatLng>,
    pub map_marker_moves: usize,
    pub map_zoom: Option<u32>,
    pub map_style: Option<MapStyle>,
    pub map_refreshes: Vec<Option<LatLng>>,

    pub field_lat: String,
    pub field_lng: String,
    pub field_coordinates: Option<LatLng>,
    pub field_zoom: Option<u32>,
    pub field_address: Option<String>,
    pub field_toggle: Option<bool>,
    pub field_status: Option<GeocodeStatus>,
}

pub type SharedLog = Arc<Mutex<SurfaceLog>>;

pub struct RecordingMap(pub SharedLog);

impl MapSurface for RecordingMap {
    fn place_marker(&mut self, position: LatLng) {
        let mut log = self.0.lock().unwrap();
        log.map_marker = Some(position);
        log.map_marker_moves += 1;
    }

    fn clear_marker(&mut self) {
        self.0.lock().unwrap().map_marker = None;
    }

    fn set_zoom(&mut self, zoom: u32) {
        self.0.lock().unwrap().map_zoom = Some(zoom);
    }

    fn set_style(&mut self, style: MapStyle) {
        self.0.lock().unwrap().map_style = Some(style);
    }

    fn refresh_viewport(&mut self, center: Option<LatLng>) {
        self.0.lock().unwrap().map_refreshes.push(center);
    }
}

pub struct RecordingForm(pub SharedLog);

impl FormSurface for RecordingForm {
    fn set_coordinates(&mut self, position: Option<LatLng>) {
        let mut log = self.0.lock().unwrap();
        log.field_lat = format_coordinate(position.map(|p| p.lat));
        log.field_lng = format_coordinate(position.map(|p| p.lng));
        log.field_coordinates = position;
    }

    fn set_zoom(&mut self, zoom: u32) {
        self.0.lock().unwrap().field_zoom = Some(zoom);
    }

    fn set_address(&mut self, address: &str) {
        self.0.lock().unwrap().field_address = Some(address.to_string());
    }

    fn set_geocode_enabled(&mut self, enabled: bool) {
        self.0.lock().unwrap().field_toggle = Some(enabled);
    }

    fn set_status(&mut self, status: GeocodeStatus) {
        self.0.lock().unwrap().field_status = Some(status);
    }
}

enum Reply {
    Ready(GeocodeResponse),
    Error(String),
    Gated(oneshot::Receiver<GeocodeResponse>),
}

/// Geocoder answering from a script. Unscripted lookups answer ZERO_RESULTS.
#[derive(Default)]
pub struct ScriptedGeocoder {
    forward: Mutex<HashMap<String, VecDeque<Reply>>>,
    reverse: Mutex<VecDeque<Reply>>,
    forward_calls: AtomicUsize,
    reverse_calls: AtomicUsize,
}

impl ScriptedGeocoder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push_forward(&self, address: &str, reply: Reply) {
        self.forward
            .lock()
            .unwrap()
            .entry(address.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn reply_forward(&self, address: &str, response: GeocodeResponse) {
        self.push_forward(address, Reply::Ready(response));
    }

    pub fn fail_forward(&self, address: &str, message: &str) {
        self.push_forward(address, Reply::Error(message.to_string()));
    }

    /// Hold the reply for `address` until the returned sender fires
    pub fn gate_forward(&self, address: &str) -> oneshot::Sender<GeocodeResponse> {
        let (tx, rx) = oneshot::channel();
        self.push_forward(address, Reply::Gated(rx));
        tx
    }

    pub fn reply_reverse(&self, response: GeocodeResponse) {
        self.reverse.lock().unwrap().push_back(Reply::Ready(response));
    }

    pub fn gate_reverse(&self) -> oneshot::Sender<GeocodeResponse> {
        let (tx, rx) = oneshot::channel();
        self.reverse.lock().unwrap().push_back(Reply::Gated(rx));
        tx
    }

    pub fn forward_calls(&self) -> usize {
        self.forward_calls.load(Ordering::SeqCst)
    }

    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.forward_calls() + self.reverse_calls()
    }

    async fn answer(reply: Option<Reply>) -> mapmarker::Result<GeocodeResponse> {
        match reply {
            None => Ok(GeocodeResponse::failed("ZERO_RESULTS")),
            Some(Reply::Ready(response)) => Ok(response),
            Some(Reply::Error(message)) => Err(MarkerError::Geocode(message)),
            Some(Reply::Gated(rx)) => rx
                .await
                .map_err(|_| MarkerError::Geocode("gate dropped".into())),
        }
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn geocode(&self, address: &str) -> mapmarker::Result<GeocodeResponse> {
        self.forward_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .forward
            .lock()
            .unwrap()
            .get_mut(address)
            .and_then(|replies| replies.pop_front());
        Self::answer(reply).await
    }

    async fn reverse_geocode(&self, _position: LatLng) -> mapmarker::Result<GeocodeResponse> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reverse.lock().unwrap().pop_front();
        Self::answer(reply).await
    }
}

/// Record with geocoding on and no position
pub fn blank_record() -> MarkerRecord {
    MarkerRecord::default()
}

/// Build a controller over recording surfaces. Must run inside a tokio runtime.
pub fn controller_with(
    config: MarkerConfig,
    record: MarkerRecord,
    geocoder: &Arc<ScriptedGeocoder>,
) -> (MapSyncController, SharedLog) {
    let log = SharedLog::default();
    let controller = MapSyncControllerBuilder::new()
        .with_config(config)
        .with_record(record)
        .with_map_surface(RecordingMap(Arc::clone(&log)))
        .with_form_surface(RecordingForm(Arc::clone(&log)))
        .with_geocoder(geocoder.clone())
        .build()
        .expect("controller builds");
    (controller, log)
}

pub fn controller(
    record: MarkerRecord,
    geocoder: &Arc<ScriptedGeocoder>,
) -> (MapSyncController, SharedLog) {
    controller_with(MarkerConfig::default(), record, geocoder)
}
