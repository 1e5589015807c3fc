//! History store trait.

use crate::entry::Entry;
use crate::error::Result;
use async_trait::async_trait;

/// Local durable side-store mirroring the request history.
///
/// Best-effort and session-scoped: callers never revert in-memory state
/// because of a store failure.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends one entry to the persisted history.
    async fn append_history(&self, entry: &Entry) -> Result<()>;

    /// Removes every persisted entry.
    async fn clear_history(&self) -> Result<()>;

    /// Reads the persisted history in append order.
    async fn read_history(&self) -> Result<Vec<Entry>>;
}
