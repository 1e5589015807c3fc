//! Session application services.
//!
//! [`ApiClientSession`] owns the state of one identity/workspace pair;
//! [`SessionManager`] swaps sessions as the identity changes.

mod context;
mod manager;

pub use context::{ApiClientSession, NEW_RECORD_ID, SaveOutcome, SessionSnapshot};
pub use manager::SessionManager;
