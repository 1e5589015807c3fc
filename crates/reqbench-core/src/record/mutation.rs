//! Per-record tracking of optimistic mutations.
//!
//! A local change is applied to the [`RecordStore`](super::RecordStore)
//! before the backend confirms it. The record is `Pending` until the backend
//! answers, then `Committed` or `Failed`; on failure the caller restores the
//! snapshot returned by [`PendingMutations::fail`].

use super::model::Record;
use super::store::RemovedRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Observable state of the last mutation on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MutationStatus {
    Pending,
    Committed,
    Failed { reason: String },
}

/// What must be put back if a pending mutation fails.
#[derive(Debug, Clone, PartialEq)]
pub enum Rollback {
    /// The record existed with this content before an update
    Restore(Record),
    /// The record was removed from these positions
    Reinsert(Vec<RemovedRecord>),
    /// Nothing to undo locally
    Nothing,
}

#[derive(Debug, Clone)]
struct Tracked {
    status: MutationStatus,
    token: u64,
    rollback: Option<Rollback>,
}

/// Tracks pending/committed/failed state for each mutated record ID.
#[derive(Debug, Default)]
pub struct PendingMutations {
    entries: HashMap<String, Tracked>,
    next_token: u64,
}

impl PendingMutations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as pending and remembers how to undo the change.
    ///
    /// Returns a token; only the latest token for an ID may settle it.
    pub fn begin(&mut self, id: impl Into<String>, rollback: Rollback) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        self.entries.insert(
            id.into(),
            Tracked {
                status: MutationStatus::Pending,
                token,
                rollback: Some(rollback),
            },
        );
        token
    }

    /// Marks the mutation as committed. Returns `false` for stale tokens.
    pub fn commit(&mut self, id: &str, token: u64) -> bool {
        match self.entries.get_mut(id) {
            Some(tracked) if tracked.token == token => {
                tracked.status = MutationStatus::Committed;
                tracked.rollback = None;
                true
            }
            _ => false,
        }
    }

    /// Marks the mutation as failed and hands back its rollback.
    ///
    /// Returns `None` for stale tokens: a newer mutation owns the record.
    pub fn fail(&mut self, id: &str, token: u64, reason: impl Into<String>) -> Option<Rollback> {
        match self.entries.get_mut(id) {
            Some(tracked) if tracked.token == token => {
                tracked.status = MutationStatus::Failed {
                    reason: reason.into(),
                };
                tracked.rollback.take()
            }
            _ => None,
        }
    }

    pub fn status(&self, id: &str) -> Option<&MutationStatus> {
        self.entries.get(id).map(|t| &t.status)
    }

    /// IDs whose mutation is still in flight.
    pub fn pending_ids(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, t)| t.status == MutationStatus::Pending)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
