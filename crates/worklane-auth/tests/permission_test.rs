//! Permission resolution: role defaults, overrides, derived queries, and
//! the self-escalation guard.

mod common;

use worklane_core::error::ErrorKind;
use worklane_entity::membership::{MembershipStatus, PermissionOverrides, WorkspaceRole};
use worklane_entity::permission::Permission;

use worklane_auth::permission::RolePolicies;
use worklane_auth::store::MembershipStore;

use common::Harness;

#[tokio::test]
async fn no_active_membership_resolves_to_none() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let outsider = h.user("outsider@example.com").await;
    let ws = h.workspace("Acme", admin.id).await;
    h.member(admin.id, ws.id, WorkspaceRole::Admin).await;

    // Never invited.
    assert!(h
        .resolver
        .get_user_permissions(outsider.id, ws.id)
        .await
        .unwrap()
        .is_none());

    // Suspended resolves identically to absent.
    let suspended = h.user("susp@example.com").await;
    let mut membership = h.member(suspended.id, ws.id, WorkspaceRole::Member).await;
    membership.status = MembershipStatus::Suspended;
    h.memberships.insert(&membership).await.unwrap();

    assert!(h
        .resolver
        .get_user_permissions(suspended.id, ws.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn defaults_match_the_policy_table_exactly() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let ws = h.workspace("Acme", admin.id).await;

    let policies = RolePolicies::new();

    for role in [WorkspaceRole::Admin, WorkspaceRole::Member, WorkspaceRole::Guest] {
        let user = h.user(&format!("{role}@example.com")).await;
        h.member(user.id, ws.id, role).await;

        let resolved = h
            .resolver
            .get_user_permissions(user.id, ws.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resolved.role, role);
        assert_eq!(resolved.permissions, policies.permissions_for_role(role));
        assert!(!resolved.has_overrides);
    }
}

#[tokio::test]
async fn duplicate_grant_changes_nothing() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let ws = h.workspace("Acme", admin.id).await;

    let user = h.user("mem@example.com").await;
    // CreateIssue is already in member defaults.
    h.member_with_overrides(
        user.id,
        ws.id,
        WorkspaceRole::Member,
        PermissionOverrides::grant(Permission::CreateIssue),
    )
    .await;

    let resolved = h
        .resolver
        .get_user_permissions(user.id, ws.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        resolved.permissions,
        RolePolicies::new().permissions_for_role(WorkspaceRole::Member)
    );
    assert!(resolved.has_overrides);
}

#[tokio::test]
async fn revocation_wins_even_over_an_explicit_grant() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let ws = h.workspace("Acme", admin.id).await;

    let user = h.user("mem@example.com").await;
    h.member_with_overrides(
        user.id,
        ws.id,
        WorkspaceRole::Member,
        PermissionOverrides {
            granted: vec![Permission::DeleteWorkspace],
            revoked: vec![Permission::DeleteWorkspace, Permission::CreateIssue],
        },
    )
    .await;

    let resolved = h
        .resolver
        .get_user_permissions(user.id, ws.id)
        .await
        .unwrap()
        .unwrap();

    assert!(!resolved.contains(Permission::DeleteWorkspace));
    assert!(!resolved.contains(Permission::CreateIssue));
    // Untouched defaults survive.
    assert!(resolved.contains(Permission::UpdateIssue));
}

#[tokio::test]
async fn derived_queries_follow_the_effective_set() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let ws = h.workspace("Acme", admin.id).await;

    let guest = h.user("guest@example.com").await;
    h.member(guest.id, ws.id, WorkspaceRole::Guest).await;

    assert!(h
        .resolver
        .has_permission(guest.id, ws.id, Permission::ViewIssues)
        .await
        .unwrap());
    assert!(!h
        .resolver
        .has_permission(guest.id, ws.id, Permission::CreateIssue)
        .await
        .unwrap());

    assert!(h
        .resolver
        .has_any_permission(guest.id, ws.id, &[Permission::CreateIssue, Permission::ViewIssues])
        .await
        .unwrap());
    assert!(!h
        .resolver
        .has_all_permissions(guest.id, ws.id, &[Permission::CreateIssue, Permission::ViewIssues])
        .await
        .unwrap());

    assert!(h
        .resolver
        .has_role(guest.id, ws.id, WorkspaceRole::Guest)
        .await
        .unwrap());
    assert!(h
        .resolver
        .has_any_role(guest.id, ws.id, &[WorkspaceRole::Guest, WorkspaceRole::Admin])
        .await
        .unwrap());
    assert!(h
        .resolver
        .has_minimum_role(guest.id, ws.id, WorkspaceRole::Guest)
        .await
        .unwrap());
    assert!(!h
        .resolver
        .has_minimum_role(guest.id, ws.id, WorkspaceRole::Member)
        .await
        .unwrap());
}

#[tokio::test]
async fn admin_count_reflects_active_admins_only() {
    let h = Harness::new();
    let a1 = h.user("a1@example.com").await;
    let a2 = h.user("a2@example.com").await;
    let m = h.user("m@example.com").await;
    let ws = h.workspace("Acme", a1.id).await;

    h.member(a1.id, ws.id, WorkspaceRole::Admin).await;
    h.member(m.id, ws.id, WorkspaceRole::Member).await;

    let mut suspended_admin = h.member(a2.id, ws.id, WorkspaceRole::Admin).await;
    suspended_admin.status = MembershipStatus::Suspended;
    h.memberships.insert(&suspended_admin).await.unwrap();

    assert_eq!(h.resolver.count_active_admins(ws.id).await.unwrap(), 1);
}

#[tokio::test]
async fn self_escalation_is_always_forbidden() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let ws = h.workspace("Acme", admin.id).await;
    h.member(admin.id, ws.id, WorkspaceRole::Admin).await;

    // Even a full admin may not touch their own overrides.
    let err = h
        .resolver
        .update_overrides(
            admin.id,
            admin.id,
            ws.id,
            PermissionOverrides::grant(Permission::DeleteWorkspace),
        )
        .await
        .unwrap_err();
    assert!(err.is_kind(ErrorKind::Authorization));
}

#[tokio::test]
async fn override_mutation_requires_update_members() {
    let h = Harness::new();
    let admin = h.user("admin@example.com").await;
    let member = h.user("mem@example.com").await;
    let target = h.user("target@example.com").await;
    let ws = h.workspace("Acme", admin.id).await;

    h.member(admin.id, ws.id, WorkspaceRole::Admin).await;
    h.member(member.id, ws.id, WorkspaceRole::Member).await;
    h.member(target.id, ws.id, WorkspaceRole::Guest).await;

    // Plain member lacks member:update_members.
    let err = h
        .resolver
        .update_overrides(
            member.id,
            target.id,
            ws.id,
            PermissionOverrides::grant(Permission::CreateIssue),
        )
        .await
        .unwrap_err();
    assert!(err.is_kind(ErrorKind::Authorization));

    // Admin succeeds and the grant takes effect.
    h.resolver
        .update_overrides(
            admin.id,
            target.id,
            ws.id,
            PermissionOverrides::grant(Permission::CreateIssue),
        )
        .await
        .unwrap();

    assert!(h
        .resolver
        .has_permission(target.id, ws.id, Permission::CreateIssue)
        .await
        .unwrap());

    // Clearing restores role defaults.
    h.resolver
        .clear_overrides(admin.id, target.id, ws.id)
        .await
        .unwrap();

    let resolved = h
        .resolver
        .get_user_permissions(target.id, ws.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!resolved.has_overrides);
    assert!(!resolved.contains(Permission::CreateIssue));
}
