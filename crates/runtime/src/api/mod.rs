//! Public API surface for runtime consumers.
mod errors;
mod handle;

pub use errors::{Result, RuntimeError};
pub use handle::{EncounterSummary, RuntimeHandle};
