//! Authenticated identity as seen by the session.

use serde::{Deserialize, Serialize};

/// Authentication details of the current user.
///
/// Only `uid` of a logged-in user is ever handed to the record repository;
/// a logged-out session renders an empty record set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserAuth {
    pub logged_in: bool,
    #[serde(default)]
    pub uid: Option<String>,
}

impl UserAuth {
    /// A logged-out user.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A logged-in user with the given uid.
    pub fn signed_in(uid: impl Into<String>) -> Self {
        Self {
            logged_in: true,
            uid: Some(uid.into()),
        }
    }

    /// The uid to act as, `None` unless logged in.
    pub fn active_uid(&self) -> Option<&str> {
        if self.logged_in {
            self.uid.as_deref()
        } else {
            None
        }
    }
}
