pub mod builder;
pub mod controller;
pub mod events;
pub mod surface;

// Re-export the essential types
pub use builder::MapSyncControllerBuilder;
pub use controller::{LookupKind, MapSyncController};
pub use events::{EventManager, MarkerEvent, SyncEvent};
pub use surface::{FormSurface, MapSurface};
