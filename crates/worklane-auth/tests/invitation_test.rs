//! Invitation token flow: creation gating, live-state verification, and
//! acceptance.

mod common;

use chrono::Duration;
use worklane_core::error::ErrorKind;
use worklane_entity::membership::WorkspaceRole;

use worklane_auth::invitation::NewInvitation;

use common::Harness;

fn invite(email: &str, workspace_id: uuid::Uuid, role: WorkspaceRole) -> NewInvitation {
    NewInvitation {
        email: email.to_string(),
        workspace_id,
        role,
        message: None,
    }
}

#[tokio::test]
async fn full_invitation_lifecycle() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let ws = h.workspace("Acme", admin.id).await;
    h.member(admin.id, ws.id, WorkspaceRole::Admin).await;

    let signed = h
        .invitations
        .create(admin.id, &invite("new@example.com", ws.id, WorkspaceRole::Member))
        .await
        .unwrap();

    let info = h.invitations.verify(&signed.token).await.unwrap();
    assert_eq!(info.email, "new@example.com");
    assert_eq!(info.workspace_id, ws.id);
    assert_eq!(info.workspace_name, "Acme");
    assert_eq!(info.invited_by, admin.id);
    assert_eq!(info.role, WorkspaceRole::Member);

    // The invitee signs up and accepts.
    let invitee = h.user("new@example.com").await;
    let membership = h.invitations.accept(&signed.token, invitee.id).await.unwrap();
    assert_eq!(membership.role, WorkspaceRole::Member);
    assert!(membership.is_active());

    // Acceptance granted real access.
    assert!(h
        .resolver
        .has_minimum_role(invitee.id, ws.id, WorkspaceRole::Member)
        .await
        .unwrap());

    // Accepting again conflicts on the existing membership.
    let err = h.invitations.accept(&signed.token, invitee.id).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::Conflict));
}

#[tokio::test]
async fn creation_requires_invite_members() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let member = h.user("mem@example.com").await;
    let ws = h.workspace("Acme", admin.id).await;
    h.member(admin.id, ws.id, WorkspaceRole::Admin).await;
    h.member(member.id, ws.id, WorkspaceRole::Member).await;

    let err = h
        .invitations
        .create(member.id, &invite("x@example.com", ws.id, WorkspaceRole::Guest))
        .await
        .unwrap_err();
    assert!(err.is_kind(ErrorKind::Authorization));
}

#[tokio::test]
async fn creation_rejects_existing_members_early() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let member = h.user("mem@example.com").await;
    let ws = h.workspace("Acme", admin.id).await;
    h.member(admin.id, ws.id, WorkspaceRole::Admin).await;
    h.member(member.id, ws.id, WorkspaceRole::Member).await;

    let err = h
        .invitations
        .create(admin.id, &invite("mem@example.com", ws.id, WorkspaceRole::Guest))
        .await
        .unwrap_err();
    assert!(err.is_kind(ErrorKind::Conflict));
}

#[tokio::test]
async fn verify_fails_closed_when_the_workspace_is_gone() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let ws = h.workspace("Doomed", admin.id).await;
    h.member(admin.id, ws.id, WorkspaceRole::Admin).await;

    let signed = h
        .invitations
        .create(admin.id, &invite("new@example.com", ws.id, WorkspaceRole::Member))
        .await
        .unwrap();

    // The workspace is deleted while the invitation is in flight. The
    // signature still checks out; verification must fail anyway.
    h.directory.remove_workspace(ws.id).await;

    let err = h.invitations.verify(&signed.token).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::NotFound));

    let invitee = h.user("new@example.com").await;
    let err = h.invitations.accept(&signed.token, invitee.id).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::NotFound));
}

#[tokio::test]
async fn acceptance_requires_the_invited_email() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let ws = h.workspace("Acme", admin.id).await;
    h.member(admin.id, ws.id, WorkspaceRole::Admin).await;

    let signed = h
        .invitations
        .create(admin.id, &invite("right@example.com", ws.id, WorkspaceRole::Member))
        .await
        .unwrap();

    let wrong = h.user("wrong@example.com").await;
    let err = h.invitations.accept(&signed.token, wrong.id).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::Authorization));

    // Email comparison is case-insensitive.
    let right = h.user("Right@Example.COM").await;
    assert!(h.invitations.accept(&signed.token, right.id).await.is_ok());
}

#[tokio::test]
async fn invitations_to_nonexistent_workspaces_are_rejected() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;

    let err = h
        .invitations
        .create(
            admin.id,
            &invite("x@example.com", uuid::Uuid::new_v4(), WorkspaceRole::Guest),
        )
        .await
        .unwrap_err();
    assert!(err.is_kind(ErrorKind::NotFound));
}

#[tokio::test]
async fn access_tokens_do_not_verify_as_invitations() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let ws = h.workspace("Acme", admin.id).await;
    h.member(admin.id, ws.id, WorkspaceRole::Admin).await;

    // Dedicated invitation secret: an access token, however valid, is
    // not an invitation.
    let pair = h.issuer.issue(&admin).await.unwrap();
    let err = h.invitations.verify(&pair.access_token).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::Authentication));
}

#[tokio::test]
async fn expired_invitations_are_rejected() {
    use std::sync::Arc;

    use worklane_core::config::AuthConfig;
    use worklane_core::time::{Clock, ManualClock};
    use worklane_auth::jwt::JwtEncoder;

    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let ws = h.workspace("Acme", admin.id).await;
    h.member(admin.id, ws.id, WorkspaceRole::Admin).await;

    // Sign with the same keys but a clock eight days in the past, so
    // the token's exp already lies behind the real current time.
    let stale_clock = Arc::new(ManualClock::new(chrono::Utc::now() - Duration::days(8)));
    let stale_encoder = JwtEncoder::new(&AuthConfig::default(), stale_clock.clone());
    let (token, expires_at) = stale_encoder
        .sign_invitation("new@example.com", ws.id, admin.id, WorkspaceRole::Member)
        .unwrap();
    assert_eq!(expires_at, stale_clock.now() + Duration::days(7));

    let err = h.invitations.verify(&token).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::Authentication));
}
