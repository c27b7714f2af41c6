//! Quote access policy

use greenquote_common::Requester;

/// Ownership-based read access with an admin override.
pub struct AccessPolicy;

impl AccessPolicy {
    /// True iff the requester owns the quote or is an admin
    pub fn can_read(requester: &Requester, owner_id: &str) -> bool {
        requester.id == owner_id || requester.is_admin
    }

    /// Listing every user's quotes is reserved to admins
    pub fn can_list_all(requester: &Requester) -> bool {
        requester.is_admin
    }
}
