//! Authenticated caller identity

use serde::{Deserialize, Serialize};

/// The caller of a quote operation, as established by the authentication layer.
///
/// Never persisted; used only for access decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    pub id: String,
    pub is_admin: bool,
}

impl Requester {
    /// A regular (non-admin) user
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_admin: false,
        }
    }

    /// An administrator
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_admin: true,
        }
    }
}
