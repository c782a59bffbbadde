//! Typed claim sets, one per token class.
//!
//! Each class is signed with its own secret, so a token of one class can
//! never validate as another even though the claim shapes overlap.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use worklane_entity::membership::WorkspaceRole;

/// Claims carried by a short-lived access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// The authenticated user.
    pub sub: Uuid,
    /// The user's email at issuance time.
    pub email: String,
    /// Unique token id. Timestamps are second-granular, so two tokens
    /// issued in the same second would otherwise be identical strings.
    pub jti: Uuid,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiration (unix seconds).
    pub exp: i64,
}

/// Claims carried by a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// The authenticated user.
    pub sub: Uuid,
    /// The user's email at issuance time.
    pub email: String,
    /// Primary key of the backing database record. Rotation resolves the
    /// record by token string, not by this id; the claim exists so the
    /// signed token and its row can be correlated.
    pub token_id: Uuid,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiration (unix seconds).
    pub exp: i64,
}

/// Claims carried by a workspace invitation token.
///
/// Self-contained: everything needed to verify and accept the invitation
/// travels in the token, no invitation table exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationClaims {
    /// The invited email address.
    pub email: String,
    /// The workspace being joined.
    pub workspace_id: Uuid,
    /// The user who issued the invitation.
    pub invited_by: Uuid,
    /// The role granted on acceptance.
    pub role: WorkspaceRole,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiration (unix seconds).
    pub exp: i64,
}
