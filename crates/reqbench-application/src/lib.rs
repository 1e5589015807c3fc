//! Application layer for reqbench.
//!
//! Coordinates the record and history domain with the repository and
//! navigation collaborators on behalf of one authenticated identity.

pub mod logging;
pub mod session;

pub use logging::init_logging;
pub use session::{ApiClientSession, SaveOutcome, SessionManager, SessionSnapshot};
