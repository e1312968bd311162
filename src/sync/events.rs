use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Events arriving from the map widget or the form fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncEvent {
    /// Marker drag finished at a new position
    MarkerDragged { position: LatLng },
    /// Map zoom changed by the user or the widget
    MapZoomChanged { zoom: u32 },
    /// Raw text typed into the zoom field
    ZoomFieldEdited { value: String },
    /// Address field text changed (no lookup yet)
    AddressEdited { text: String },
    /// Address field lost focus
    AddressBlurred,
    /// Automatic geocoding switched on or off
    GeocodeToggled { enabled: bool },
    /// The container holding the map became visible after being hidden
    ContainerShown,
}

impl SyncEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SyncEvent::MarkerDragged { .. } => "markerdragged",
            SyncEvent::MapZoomChanged { .. } => "mapzoomchanged",
            SyncEvent::ZoomFieldEdited { .. } => "zoomfieldedited",
            SyncEvent::AddressEdited { .. } => "addressedited",
            SyncEvent::AddressBlurred => "addressblurred",
            SyncEvent::GeocodeToggled { .. } => "geocodetoggled",
            SyncEvent::ContainerShown => "containershown",
        }
    }
}

/// Events emitted for the form layer after a reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarkerEvent {
    PositionChanged { position: Option<LatLng> },
    ZoomChanged { zoom: u32 },
    StatusChanged { code: i32, label: String },
    AddressResolved { address: String },
}

impl MarkerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            MarkerEvent::PositionChanged { .. } => "positionchanged",
            MarkerEvent::ZoomChanged { .. } => "zoomchanged",
            MarkerEvent::StatusChanged { .. } => "statuschanged",
            MarkerEvent::AddressResolved { .. } => "addressresolved",
        }
    }
}

/// Event callback type
pub type EventCallback = Box<dyn Fn(&MarkerEvent) + Send + Sync>;

/// Queue of outgoing marker events with named listeners
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event name
    listeners: HashMap<String, Vec<EventCallback>>,
    event_queue: VecDeque<MarkerEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for events named `event_type` (see [`MarkerEvent::name`])
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MarkerEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    pub fn emit(&mut self, event: MarkerEvent) {
        self.event_queue.push_back(event);
    }

    /// Deliver queued events to listeners and hand them back in emit order
    pub fn process_events(&mut self) -> Vec<MarkerEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.name()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    pub fn clear_events(&mut self) {
        self.event_queue.clear();
    }

    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}
