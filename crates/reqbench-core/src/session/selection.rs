//! Selection state for the entry open in the editor.
//!
//! ```text
//! Idle ──open──▶ LoadingDetails ──▶ DetailsLoaded | DetailsFailed
//! Idle ──new/import──▶ NewEntryDraft
//! NewEntryDraft | DetailsLoaded ──save──▶ Saving ──▶ Selected | SaveFailed
//! ```
//!
//! Every transition that starts new work bumps a generation counter. Async
//! completions carry the generation they were started with and are dropped
//! when a newer transition has happened since.

use crate::entry::Entry;
use crate::error::Result;
use crate::record::{ApiRecord, Record};
use serde::{Deserialize, Serialize};

/// Monotonic token identifying one selection transition.
pub type Generation = u64;

/// Phase of the selection state machine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SelectionPhase {
    #[default]
    Idle,
    LoadingDetails {
        record_id: String,
    },
    DetailsLoaded,
    DetailsFailed {
        record_id: String,
        reason: String,
    },
    NewEntryDraft,
    Saving,
    /// Saved and persisted; the selection points at this record
    Selected {
        record_id: String,
    },
    SaveFailed {
        reason: String,
    },
}

/// The "selected entry" slot plus the persisted record backing it.
#[derive(Debug, Clone, Default)]
pub struct EntrySelection {
    phase: SelectionPhase,
    entry: Option<Entry>,
    details: Option<ApiRecord>,
    generation: Generation,
}

impl EntrySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SelectionPhase {
        &self.phase
    }

    /// The entry being edited, possibly unsaved.
    pub fn entry(&self) -> Option<&Entry> {
        self.entry.as_ref()
    }

    /// The persisted record backing the selection, once loaded or saved.
    pub fn details(&self) -> Option<&ApiRecord> {
        self.details.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// ID a save should update instead of creating a new record.
    pub fn persisted_record_id(&self) -> Option<String> {
        self.details.as_ref().map(|d| d.id.clone())
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    /// A persisted record was navigated to; its details are being fetched.
    pub fn begin_loading(&mut self, record_id: impl Into<String>) -> Generation {
        self.entry = None;
        self.phase = SelectionPhase::LoadingDetails {
            record_id: record_id.into(),
        };
        self.bump()
    }

    /// Applies the fetched record. Returns `false` if the result is stale.
    pub fn complete_loading(&mut self, generation: Generation, result: Result<Record>) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        let record_id = match &self.phase {
            SelectionPhase::LoadingDetails { record_id } => record_id.clone(),
            _ => String::new(),
        };

        match result {
            Ok(Record::Api(record)) => {
                self.details = Some(record);
                self.phase = SelectionPhase::DetailsLoaded;
            }
            Ok(Record::Collection(_)) => {
                self.details = None;
                self.phase = SelectionPhase::DetailsFailed {
                    record_id,
                    reason: "record is a collection".to_string(),
                };
            }
            Err(e) => {
                self.details = None;
                self.phase = SelectionPhase::DetailsFailed {
                    record_id,
                    reason: e.to_string(),
                };
            }
        }
        true
    }

    /// Opens an unsaved entry (new request, import, history pick).
    pub fn start_draft(&mut self, entry: Entry) -> Generation {
        self.entry = Some(entry);
        self.details = None;
        self.phase = SelectionPhase::NewEntryDraft;
        self.bump()
    }

    /// Replaces the entry in the slot without starting new work.
    pub fn set_entry(&mut self, entry: Entry) {
        self.entry = Some(entry);
        if self.phase == SelectionPhase::Idle {
            self.phase = SelectionPhase::NewEntryDraft;
        }
    }

    /// `entry` is being persisted.
    pub fn begin_save(&mut self, entry: Entry) -> Generation {
        self.entry = Some(entry);
        self.phase = SelectionPhase::Saving;
        self.bump()
    }

    /// Applies the save result. Returns `false` if the result is stale.
    ///
    /// On failure the entry stays selected so the user can retry.
    pub fn complete_save(&mut self, generation: Generation, result: Result<ApiRecord>) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        match result {
            Ok(record) => {
                self.phase = SelectionPhase::Selected {
                    record_id: record.id.clone(),
                };
                self.details = Some(record);
            }
            Err(e) => {
                self.phase = SelectionPhase::SaveFailed {
                    reason: e.to_string(),
                };
            }
        }
        true
    }

    /// Back to `Idle`, invalidating anything in flight.
    pub fn reset(&mut self) {
        self.entry = None;
        self.details = None;
        self.phase = SelectionPhase::Idle;
        self.bump();
    }

    fn bump(&mut self) -> Generation {
        self.generation += 1;
        self.generation
    }
}
