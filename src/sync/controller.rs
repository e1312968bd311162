//! Reconciliation between the map widget, the form fields and the geocoder
//!
//! Every handler applies one event to the [`MarkerState`] and then pushes the
//! result to the surfaces that did not originate it. Lookups run on the
//! spawner; their completions come back over a channel and are applied by
//! [`MapSyncController::pump`] (or awaited with [`MapSyncController::settle`]).
//! Each lookup carries a sequence number and only the most recently issued one
//! is applied.

use crate::{
    core::{config::MarkerConfig, geo::LatLng},
    geocode::{GeocodeOutcome, Geocoder},
    marker::{state::MarkerState, status::GeocodeStatus},
    runtime::{self, AsyncSpawner},
    sync::{
        events::{EventManager, MarkerEvent, SyncEvent},
        surface::{FormSurface, MapSurface},
    },
};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use std::sync::Arc;

/// Direction of a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Address → coordinate
    Forward,
    /// Coordinate → address
    Reverse,
}

#[derive(Debug, Clone)]
enum LookupRequest {
    Forward(String),
    Reverse(LatLng),
}

impl LookupRequest {
    fn kind(&self) -> LookupKind {
        match self {
            LookupRequest::Forward(_) => LookupKind::Forward,
            LookupRequest::Reverse(_) => LookupKind::Reverse,
        }
    }
}

#[derive(Debug)]
struct LookupCompletion {
    seq: u64,
    kind: LookupKind,
    outcome: GeocodeOutcome,
}

#[derive(Debug, Clone, Copy)]
struct PendingLookup {
    seq: u64,
    kind: LookupKind,
}

pub struct MapSyncController {
    state: MarkerState,
    config: MarkerConfig,
    map: Box<dyn MapSurface>,
    form: Box<dyn FormSurface>,
    geocoder: Arc<dyn Geocoder>,
    spawner: Arc<dyn AsyncSpawner>,
    events: EventManager,
    next_seq: u64,
    /// The one lookup whose completion will be applied
    pending: Option<PendingLookup>,
    completion_tx: UnboundedSender<LookupCompletion>,
    completion_rx: UnboundedReceiver<LookupCompletion>,
}

impl MapSyncController {
    /// Wire a controller around `state` and push the state to both surfaces.
    /// Use [`MapSyncControllerBuilder`](crate::sync::builder::MapSyncControllerBuilder)
    /// rather than calling this directly.
    pub(crate) fn new(
        config: MarkerConfig,
        state: MarkerState,
        map: Box<dyn MapSurface>,
        form: Box<dyn FormSurface>,
        geocoder: Arc<dyn Geocoder>,
        spawner: Arc<dyn AsyncSpawner>,
    ) -> Self {
        let (completion_tx, completion_rx) = unbounded();
        let mut controller = Self {
            state,
            config,
            map,
            form,
            geocoder,
            spawner,
            events: EventManager::new(),
            next_seq: 0,
            pending: None,
            completion_tx,
            completion_rx,
        };
        controller.push_initial_state();
        controller
    }

    fn push_initial_state(&mut self) {
        let position = self.state.position();
        let zoom = self.state.zoom();

        self.map.set_style(self.state.map_style());
        self.map.set_zoom(zoom);
        match position {
            Some(position) => self.map.place_marker(position),
            None => self.map.clear_marker(),
        }

        self.form.set_coordinates(position);
        self.form.set_zoom(zoom);
        self.form.set_address(self.state.address());
        self.form.set_geocode_enabled(self.state.geocode_enabled());
        self.form.set_status(self.state.status());

        log::debug!("marker widget initialized: {}", self.state);
    }

    pub fn state(&self) -> &MarkerState {
        &self.state
    }

    pub fn config(&self) -> &MarkerConfig {
        &self.config
    }

    pub fn map_surface(&self) -> &dyn MapSurface {
        self.map.as_ref()
    }

    pub fn form_surface(&self) -> &dyn FormSurface {
        self.form.as_ref()
    }

    /// Register a listener for outgoing [`MarkerEvent`]s by name
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MarkerEvent) + Send + Sync + 'static,
    {
        self.events.on(event_type, callback);
    }

    /// Deliver queued marker events to listeners and return them
    pub fn process_events(&mut self) -> Vec<MarkerEvent> {
        self.events.process_events()
    }

    /// Whether a lookup is in flight and still authoritative
    pub fn is_lookup_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Dispatch one surface event
    pub fn handle(&mut self, event: SyncEvent) {
        log::debug!("sync event {}", event.name());
        match event {
            SyncEvent::MarkerDragged { position } => self.on_marker_dragged(position),
            SyncEvent::MapZoomChanged { zoom } => self.on_map_zoom_changed(zoom),
            SyncEvent::ZoomFieldEdited { value } => self.on_zoom_field_edited(&value),
            SyncEvent::AddressEdited { text } => self.on_address_edited(&text),
            SyncEvent::AddressBlurred => self.on_address_blurred(),
            SyncEvent::GeocodeToggled { enabled } => self.on_geocode_toggled(enabled),
            SyncEvent::ContainerShown => self.on_container_shown(),
        }
    }

    /// The drag position is authoritative; a reverse lookup may follow but
    /// never moves the marker.
    pub fn on_marker_dragged(&mut self, position: LatLng) {
        self.state.set_position(position.lat, position.lng);
        let position = self.state.position();
        self.form.set_coordinates(position);
        self.events.emit(MarkerEvent::PositionChanged { position });

        if let Some(position) = position {
            if self.state.geocode_enabled() {
                self.issue_lookup(LookupRequest::Reverse(position));
            }
        }
    }

    pub fn on_map_zoom_changed(&mut self, zoom: u32) {
        self.state.set_zoom(f64::from(zoom));
        let zoom = self.state.zoom();
        self.form.set_zoom(zoom);
        self.events.emit(MarkerEvent::ZoomChanged { zoom });
    }

    /// Values below 1 or not numeric are ignored until the user types a valid one
    pub fn on_zoom_field_edited(&mut self, raw: &str) {
        let zoom = match raw.trim().parse::<f64>() {
            Ok(zoom) if zoom.is_finite() && zoom >= 1.0 => zoom,
            _ => {
                log::debug!("ignoring zoom field value '{}'", raw);
                return;
            }
        };
        self.state.set_zoom(zoom);
        let zoom = self.state.zoom();
        self.map.set_zoom(zoom);
        self.events.emit(MarkerEvent::ZoomChanged { zoom });
    }

    pub fn on_address_edited(&mut self, text: &str) {
        self.state.set_address(text);
    }

    pub fn on_address_blurred(&mut self) {
        if !self.state.geocode_enabled() {
            self.show_status(GeocodeStatus::Disabled);
            return;
        }

        if !self.state.needs_lookup() {
            // a lookup for this very address may still be running
            let forward_pending =
                matches!(self.pending, Some(p) if p.kind == LookupKind::Forward);
            if !forward_pending && self.state.restore_cached_status() {
                self.push_status();
            }
            log::debug!(
                "address '{}' unchanged since last lookup",
                self.state.address()
            );
            return;
        }

        let address = self.state.begin_lookup();
        self.issue_lookup(LookupRequest::Forward(address));
    }

    pub fn on_geocode_toggled(&mut self, enabled: bool) {
        self.state.set_geocode_enabled(enabled);
        if enabled {
            self.on_address_blurred();
            return;
        }

        if let Some(superseded) = self.pending.take() {
            log::debug!("lookup #{} dropped: geocoding switched off", superseded.seq);
            if superseded.kind == LookupKind::Forward {
                self.state.forget_lookup();
            }
        }
        self.show_status(GeocodeStatus::Disabled);
    }

    /// Rendering fix only: the state is not touched and nothing is looked up.
    pub fn on_container_shown(&mut self) {
        self.map.refresh_viewport(self.state.position());
    }

    /// Apply every completion that has already arrived. Returns how many were
    /// applied (stale ones are dropped and not counted).
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(Some(completion)) = self.completion_rx.try_next() {
            if self.apply_completion(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next completion and apply it. Returns `false` when it was
    /// stale. Only call this while a lookup is outstanding.
    pub async fn process_next(&mut self) -> bool {
        match self.completion_rx.next().await {
            Some(completion) => self.apply_completion(completion),
            None => false,
        }
    }

    /// Wait until the authoritative lookup (if any) has been applied
    pub async fn settle(&mut self) {
        while self.pending.is_some() {
            match self.completion_rx.next().await {
                Some(completion) => {
                    self.apply_completion(completion);
                }
                None => break,
            }
        }
    }

    fn issue_lookup(&mut self, request: LookupRequest) {
        self.next_seq += 1;
        let seq = self.next_seq;
        let kind = request.kind();
        if let Some(superseded) = self.pending.replace(PendingLookup { seq, kind }) {
            log::debug!("lookup #{} superseded by #{}", superseded.seq, seq);
            // a superseding forward lookup has already claimed the address cache
            if superseded.kind == LookupKind::Forward && kind != LookupKind::Forward {
                self.state.forget_lookup();
            }
        }
        log::debug!("issuing {:?} lookup #{}: {:?}", kind, seq, request);

        let geocoder = Arc::clone(&self.geocoder);
        let tx = self.completion_tx.clone();
        let timeout = self.config.lookup_timeout();
        self.spawner.spawn_boxed(Box::pin(async move {
            let result = runtime::with_timeout(timeout, async {
                match &request {
                    LookupRequest::Forward(address) => geocoder.geocode(address).await,
                    LookupRequest::Reverse(position) => geocoder.reverse_geocode(*position).await,
                }
            })
            .await;
            if let Err(e) = &result {
                log::warn!("lookup #{} failed: {}", seq, e);
            }
            let outcome = GeocodeOutcome::from_result(&result);
            // the receiver is gone once the widget is torn down
            let _ = tx.unbounded_send(LookupCompletion { seq, kind, outcome });
        }));
    }

    fn apply_completion(&mut self, completion: LookupCompletion) -> bool {
        match self.pending {
            Some(pending) if pending.seq == completion.seq => self.pending = None,
            _ => {
                log::debug!("discarding stale lookup #{}", completion.seq);
                return false;
            }
        }

        match (completion.kind, completion.outcome) {
            (LookupKind::Forward, outcome @ GeocodeOutcome::Found { .. }) => {
                self.state.apply_geocode_result(&outcome);
                let position = self.state.position();
                if let Some(position) = position {
                    self.map.place_marker(position);
                }
                self.form.set_coordinates(position);
                self.events.emit(MarkerEvent::PositionChanged { position });
                self.push_status();
            }
            (LookupKind::Forward, GeocodeOutcome::Failed { status }) => {
                self.state.record_lookup_status(status);
                self.push_status();
            }
            (
                LookupKind::Reverse,
                GeocodeOutcome::Found {
                    status,
                    formatted_address,
                    ..
                },
            ) => {
                if !formatted_address.is_empty() {
                    self.state.set_address(&formatted_address);
                    self.state.mark_address_geocoded(status);
                    self.form.set_address(&formatted_address);
                    self.events.emit(MarkerEvent::AddressResolved {
                        address: formatted_address,
                    });
                } else {
                    self.state.set_status(status);
                }
                self.push_status();
            }
            (LookupKind::Reverse, GeocodeOutcome::Failed { status }) => {
                self.state.set_status(status);
                self.push_status();
            }
        }

        log::info!(
            "lookup #{} applied: {}",
            completion.seq,
            self.state.status_label()
        );
        true
    }

    fn show_status(&mut self, status: GeocodeStatus) {
        if self.state.status() != status {
            self.state.set_status(status);
            self.push_status();
        }
    }

    fn push_status(&mut self) {
        let status = self.state.status();
        self.form.set_status(status);
        self.events.emit(MarkerEvent::StatusChanged {
            code: status.code(),
            label: status.label().to_string(),
        });
    }
}
