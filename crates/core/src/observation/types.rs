//! Observation types.

use parcela_shared::types::{ObservationId, YearMonth};
use serde::{Deserialize, Serialize};

use crate::store::Entity;

/// A note attached to `(person, month)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Unique identifier.
    pub id: ObservationId,
    /// Whose month.
    pub person: String,
    /// Which month.
    pub month: YearMonth,
    /// Non-empty note text.
    pub text: String,
}

impl Entity for Observation {
    type Id = ObservationId;
    type Patch = ObservationPatch;

    const KIND: &'static str = "observations";

    fn id(&self) -> ObservationId {
        self.id
    }
}

/// Replacement text.
#[derive(Debug, Clone, Serialize)]
pub struct ObservationPatch {
    /// New note text.
    pub text: String,
}
