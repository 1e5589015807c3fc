//! Navigation collaborator.

/// Changes the address shown by the presentation layer.
pub trait Navigator: Send + Sync {
    /// Navigates to the canonical location of a saved record.
    fn redirect_to_record(&self, record_id: &str);
}

/// Navigator that does nothing, for headless use.
#[derive(Debug, Clone, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect_to_record(&self, record_id: &str) {
        tracing::trace!(record_id, "Ignoring redirect");
    }
}
