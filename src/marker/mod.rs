pub mod record;
pub mod state;
pub mod status;

pub use record::MarkerRecord;
pub use state::MarkerState;
pub use status::GeocodeStatus;
