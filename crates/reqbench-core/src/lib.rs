//! Domain layer for reqbench.
//!
//! Records (requests and collections), the hierarchy builder that renders
//! them as a tree, the request history, the selected-entry state machine, and
//! the traits of the external collaborators (persistence service, history
//! side-store, navigation).

pub mod config;
pub mod entry;
pub mod error;
pub mod hierarchy;
pub mod history;
pub mod record;
pub mod session;

// Re-export common error type
pub use error::{ClientError, Result};
