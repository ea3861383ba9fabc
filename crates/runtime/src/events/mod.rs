//! Topic-based event routing for encounter observers.
mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{SessionEvent, TextEvent};
