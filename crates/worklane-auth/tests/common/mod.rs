//! Shared test harness for integration tests.
//!
//! All flows run against the in-memory store backends with a manually
//! advanced clock, so expiry can be driven without sleeping.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use worklane_core::config::{AuthConfig, SessionConfig};
use worklane_core::time::{Clock, ManualClock};
use worklane_entity::membership::{Membership, PermissionOverrides, WorkspaceRole};
use worklane_entity::user::User;
use worklane_entity::workspace::Workspace;

use worklane_auth::guard::AccessGuard;
use worklane_auth::invitation::InvitationService;
use worklane_auth::jwt::{JwtDecoder, JwtEncoder};
use worklane_auth::permission::PermissionResolver;
use worklane_auth::session::{DeviceSessionTracker, SessionCleanup};
use worklane_auth::store::{
    MembershipStore, MemoryDeviceSessionStore, MemoryDirectory, MemoryMembershipStore,
    MemoryTokenStore,
};
use worklane_auth::token::{CredentialIssuer, RotationAuthority, TokenReaper};

/// Fully wired auth core over in-memory backends.
pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub tokens: Arc<MemoryTokenStore>,
    pub sessions: Arc<MemoryDeviceSessionStore>,
    pub memberships: Arc<MemoryMembershipStore>,
    pub directory: Arc<MemoryDirectory>,
    pub issuer: CredentialIssuer,
    pub rotation: RotationAuthority,
    pub resolver: PermissionResolver,
    pub guard: AccessGuard,
    pub invitations: InvitationService,
    pub tracker: DeviceSessionTracker,
    pub reaper: TokenReaper,
    pub cleanup: SessionCleanup,
}

impl Harness {
    /// Builds the harness with default configuration.
    ///
    /// The clock starts at the real current time so jsonwebtoken's own
    /// exp validation agrees with the manual clock at issuance.
    pub fn new() -> Self {
        let config = AuthConfig::default();
        let session_config = SessionConfig::default();

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let encoder = Arc::new(JwtEncoder::new(&config, clock.clone()));
        let decoder = Arc::new(JwtDecoder::new(&config));

        let tokens = Arc::new(MemoryTokenStore::new());
        let sessions = Arc::new(MemoryDeviceSessionStore::new());
        let memberships = Arc::new(MemoryMembershipStore::new());
        let directory = Arc::new(MemoryDirectory::new());

        let issuer = CredentialIssuer::new(encoder.clone(), tokens.clone(), clock.clone());
        let rotation = RotationAuthority::new(
            issuer.clone(),
            decoder.clone(),
            tokens.clone(),
            directory.clone(),
            clock.clone(),
        );
        let resolver = PermissionResolver::new(memberships.clone());
        let guard = AccessGuard::new(resolver.clone());
        let invitations = InvitationService::new(
            encoder,
            decoder,
            resolver.clone(),
            memberships.clone(),
            directory.clone(),
            clock.clone(),
        );
        let tracker =
            DeviceSessionTracker::new(sessions.clone(), clock.clone(), session_config);
        let reaper = TokenReaper::new(tokens.clone(), clock.clone());
        let cleanup = SessionCleanup::new(sessions.clone(), clock.clone());

        Self {
            clock,
            tokens,
            sessions,
            memberships,
            directory,
            issuer,
            rotation,
            resolver,
            guard,
            invitations,
            tracker,
            reaper,
            cleanup,
        }
    }

    /// Registers a user in the directory.
    pub async fn user(&self, email: &str) -> User {
        let now = self.clock.now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: String::new(),
            display_name: Some(email.split('@').next().unwrap_or(email).to_string()),
            email_verified: true,
            created_at: now,
            updated_at: now,
        };
        self.directory.add_user(user.clone()).await;
        user
    }

    /// Registers a workspace in the directory.
    pub async fn workspace(&self, name: &str, created_by: Uuid) -> Workspace {
        let workspace = Workspace {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_by,
            created_at: self.clock.now(),
        };
        self.directory.add_workspace(workspace.clone()).await;
        workspace
    }

    /// Creates an active membership without overrides.
    pub async fn member(&self, user_id: Uuid, workspace_id: Uuid, role: WorkspaceRole) -> Membership {
        let membership = Membership::new_active(user_id, workspace_id, role, self.clock.now());
        self.memberships.insert(&membership).await.unwrap();
        membership
    }

    /// Creates an active membership with the given overrides.
    pub async fn member_with_overrides(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        role: WorkspaceRole,
        overrides: PermissionOverrides,
    ) -> Membership {
        let mut membership = Membership::new_active(user_id, workspace_id, role, self.clock.now());
        membership.permissions_override = Some(overrides);
        self.memberships.insert(&membership).await.unwrap();
        membership
    }
}
