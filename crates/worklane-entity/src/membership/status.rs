//! Membership status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a workspace membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "membership_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    /// The member is active and access checks apply normally.
    Active,
    /// An invitation has been sent but not yet accepted.
    Pending,
    /// The member has been suspended; treated as no access.
    Suspended,
}

impl MembershipStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
