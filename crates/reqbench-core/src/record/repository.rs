//! Record repository trait.
//!
//! Defines the interface to the persistence service that owns the canonical
//! copy of every record.

use super::draft::RecordDraft;
use super::model::Record;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for API records.
///
/// Decouples the session from the storage mechanism (remote document store,
/// local file, in-memory fake).
///
/// # Errors
///
/// Implementations report a missing record as
/// [`ClientError::NotFound`](crate::error::ClientError::NotFound) and
/// transport failures as
/// [`ClientError::Network`](crate::error::ClientError::Network).
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Fetches a single record by ID.
    async fn fetch_record(&self, record_id: &str) -> Result<Record>;

    /// Fetches every record visible to `uid` in `workspace_id`.
    ///
    /// `workspace_id == None` selects the user's private workspace.
    async fn fetch_records(&self, uid: &str, workspace_id: Option<&str>) -> Result<Vec<Record>>;

    /// Creates or updates a record.
    ///
    /// # Returns
    ///
    /// The canonical stored record, with an assigned ID when `draft.id` was
    /// `None`.
    async fn upsert_record(
        &self,
        uid: &str,
        draft: RecordDraft,
        workspace_id: Option<&str>,
    ) -> Result<Record>;

    /// Deletes the records with the given IDs. Unknown IDs are ignored.
    async fn delete_records(&self, record_ids: &[String]) -> Result<()>;
}
