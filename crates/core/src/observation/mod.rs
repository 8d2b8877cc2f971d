//! One free-text note per person and month.

pub mod error;
pub mod service;
pub mod types;

pub use error::ObservationError;
pub use service::ObservationBook;
pub use types::{Observation, ObservationPatch};
