//! Workspace invitation flow.
//!
//! Invitations are self-contained signed tokens; nothing is persisted
//! when one is created. Cryptographic validity is necessary but not
//! sufficient: redemption re-resolves the workspace and the inviter
//! against live storage and fails closed if either is gone.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use worklane_core::error::AppError;
use worklane_core::result::AppResult;
use worklane_core::time::Clock;
use worklane_entity::membership::{Membership, WorkspaceRole};
use worklane_entity::permission::Permission;

use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::permission::PermissionResolver;
use crate::store::{DirectoryStore, MembershipStore};

/// Parameters for a new workspace invitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInvitation {
    /// The invited email address.
    pub email: String,
    /// The workspace to join.
    pub workspace_id: Uuid,
    /// The role granted on acceptance.
    pub role: WorkspaceRole,
    /// Optional personal note, carried alongside the token by the
    /// delivery channel. Not part of the signed claims.
    pub message: Option<String>,
}

/// A freshly created invitation token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedInvitation {
    /// The signed invitation token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

/// A verified invitation, enriched with live workspace and inviter data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationInfo {
    /// The invited email address.
    pub email: String,
    /// The workspace to join.
    pub workspace_id: Uuid,
    /// The workspace's current name.
    pub workspace_name: String,
    /// Who issued the invitation.
    pub invited_by: Uuid,
    /// The inviter's display name.
    pub inviter_name: String,
    /// The role granted on acceptance.
    pub role: WorkspaceRole,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

/// Creates, verifies, and redeems workspace invitations.
#[derive(Clone)]
pub struct InvitationService {
    /// JWT encoder for invitation signing.
    encoder: Arc<JwtEncoder>,
    /// JWT decoder for invitation validation.
    decoder: Arc<JwtDecoder>,
    /// Permission resolution for the inviter gate.
    resolver: PermissionResolver,
    /// Membership persistence.
    memberships: Arc<dyn MembershipStore>,
    /// User and workspace lookup.
    directory: Arc<dyn DirectoryStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for InvitationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvitationService").finish()
    }
}

impl InvitationService {
    /// Creates a new invitation service.
    pub fn new(
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        resolver: PermissionResolver,
        memberships: Arc<dyn MembershipStore>,
        directory: Arc<dyn DirectoryStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            encoder,
            decoder,
            resolver,
            memberships,
            directory,
            clock,
        }
    }

    /// Issues a signed invitation token.
    ///
    /// The inviter must hold `member:invite_members` in the workspace.
    /// If the invited email already belongs to a user with a membership
    /// there, creation fails early rather than handing out a token that
    /// can never be accepted.
    pub async fn create(
        &self,
        inviter_id: Uuid,
        invitation: &NewInvitation,
    ) -> AppResult<SignedInvitation> {
        self.directory
            .find_workspace(invitation.workspace_id)
            .await?
            .ok_or_else(|| AppError::not_found("Workspace not found"))?;

        if !self
            .resolver
            .has_permission(inviter_id, invitation.workspace_id, Permission::InviteMembers)
            .await?
        {
            return Err(AppError::forbidden("Missing permission to invite members"));
        }

        if let Some(existing) = self.directory.find_user_by_email(&invitation.email).await? {
            if self
                .memberships
                .exists(existing.id, invitation.workspace_id)
                .await?
            {
                return Err(AppError::conflict(
                    "User is already a member of this workspace",
                ));
            }
        }

        let (token, expires_at) = self.encoder.sign_invitation(
            &invitation.email,
            invitation.workspace_id,
            inviter_id,
            invitation.role,
        )?;

        info!(
            inviter_id = %inviter_id,
            workspace_id = %invitation.workspace_id,
            role = %invitation.role,
            "Invitation created"
        );

        Ok(SignedInvitation { token, expires_at })
    }

    /// Verifies an invitation token against live storage.
    ///
    /// A token whose workspace or inviter has since been deleted is
    /// rejected even though its signature still checks out.
    pub async fn verify(&self, token: &str) -> AppResult<InvitationInfo> {
        let claims = self.decoder.decode_invitation(token)?;

        let workspace = self
            .directory
            .find_workspace(claims.workspace_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation workspace no longer exists"))?;

        let inviter = self
            .directory
            .find_user(claims.invited_by)
            .await?
            .ok_or_else(|| AppError::not_found("Inviting user no longer exists"))?;

        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AppError::internal("Invitation carries an unrepresentable expiry"))?;

        Ok(InvitationInfo {
            email: claims.email,
            workspace_id: claims.workspace_id,
            workspace_name: workspace.name,
            invited_by: claims.invited_by,
            inviter_name: inviter.display_name.unwrap_or(inviter.email),
            role: claims.role,
            expires_at,
        })
    }

    /// Redeems an invitation, creating an active membership.
    ///
    /// The accepting user's email must match the invited address, and an
    /// existing membership of any status blocks acceptance. The token is
    /// not consumed; re-acceptance fails on the membership conflict.
    pub async fn accept(&self, token: &str, user_id: Uuid) -> AppResult<Membership> {
        let info = self.verify(token).await?;

        let user = self
            .directory
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !user.email.eq_ignore_ascii_case(&info.email) {
            return Err(AppError::forbidden(
                "Invitation was issued to a different email address",
            ));
        }

        if self.memberships.exists(user_id, info.workspace_id).await? {
            return Err(AppError::conflict(
                "Already a member of this workspace",
            ));
        }

        let membership =
            Membership::new_active(user_id, info.workspace_id, info.role, self.clock.now());
        self.memberships.insert(&membership).await?;

        info!(
            user_id = %user_id,
            workspace_id = %info.workspace_id,
            role = %info.role,
            "Invitation accepted"
        );

        Ok(membership)
    }
}
