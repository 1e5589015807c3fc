//! Session domain module.
//!
//! Domain pieces the application-layer session is built from.
//!
//! # Module Structure
//!
//! - `auth`: authenticated identity (`UserAuth`)
//! - `navigation`: `Navigator` collaborator trait
//! - `selection`: selected-entry state machine (`EntrySelection`)

mod auth;
mod navigation;
mod selection;

pub use auth::UserAuth;
pub use navigation::{Navigator, NoopNavigator};
pub use selection::{EntrySelection, Generation, SelectionPhase};
