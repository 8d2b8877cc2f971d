//! Observation book service.

use std::sync::Arc;

use parcela_shared::types::{ObservationId, YearMonth};
use tracing::{debug, info};

use super::error::ObservationError;
use super::types::{Observation, ObservationPatch};
use crate::store::Collection;

/// Monthly notes.
pub struct ObservationBook {
    collection: Arc<dyn Collection<Observation>>,
    notes: Vec<Observation>,
}

impl ObservationBook {
    /// Loads every note from `collection`.
    pub async fn load(collection: Arc<dyn Collection<Observation>>) -> Result<Self, ObservationError> {
        let notes = collection.get_all().await?;
        Ok(Self { collection, notes })
    }

    /// Re-fetches the snapshot.
    pub async fn refresh(&mut self) -> Result<(), ObservationError> {
        self.notes = self.collection.get_all().await?;
        debug!(count = self.notes.len(), "Observations refreshed");
        Ok(())
    }

    /// The note for `(person, month)`, if any.
    #[must_use]
    pub fn get(&self, person: &str, month: YearMonth) -> Option<&Observation> {
        self.notes
            .iter()
            .find(|n| n.person == person && n.month == month)
    }

    /// Writes the note for `(person, month)`.
    ///
    /// Non-empty text creates or replaces the note; empty text deletes it.
    /// Returns the stored note, or `None` when nothing remains.
    pub async fn set(
        &mut self,
        person: &str,
        month: YearMonth,
        text: &str,
    ) -> Result<Option<Observation>, ObservationError> {
        let person = person.trim();
        if person.is_empty() {
            return Err(ObservationError::MissingPerson);
        }
        let text = text.trim();
        let existing = self
            .notes
            .iter()
            .position(|n| n.person == person && n.month == month);

        match (existing, text.is_empty()) {
            (None, true) => Ok(None),
            (Some(slot), true) => {
                let id = self.notes[slot].id;
                self.collection.delete(id).await?;
                self.notes.remove(slot);
                info!(person = %person, month = %month, "Observation cleared");
                Ok(None)
            }
            (Some(slot), false) => {
                let id = self.notes[slot].id;
                let patch = ObservationPatch {
                    text: text.to_string(),
                };
                self.collection.update(id, &patch).await?;
                self.notes[slot].text = patch.text;
                info!(person = %person, month = %month, "Observation updated");
                Ok(Some(self.notes[slot].clone()))
            }
            (None, false) => {
                let note = Observation {
                    id: ObservationId::new(),
                    person: person.to_string(),
                    month,
                    text: text.to_string(),
                };
                let note = self.collection.create(note).await?;
                info!(person = %person, month = %month, "Observation created");
                self.notes.push(note.clone());
                Ok(Some(note))
            }
        }
    }
}
