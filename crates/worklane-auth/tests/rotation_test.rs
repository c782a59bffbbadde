//! Refresh token rotation flows: chain integrity, replay rejection,
//! double-spend, revocation, and expiry.

mod common;

use chrono::Duration;
use futures::join;
use worklane_core::error::ErrorKind;
use worklane_core::time::Clock;

use worklane_auth::store::TokenStore;

use common::Harness;

#[tokio::test]
async fn rotation_retires_the_presented_token() {
    let h = Harness::new();
    let user = h.user("ana@example.com").await;

    // Login: T1 = (A1, R1).
    let t1 = h.issuer.issue(&user).await.unwrap();

    // refresh(R1) succeeds with a fresh pair.
    let t2 = h.rotation.rotate(&t1.refresh_token).await.unwrap();
    assert_ne!(t1.refresh_token, t2.refresh_token);
    assert_ne!(t1.access_token, t2.access_token);

    // The old record is revoked and linked to its replacement.
    let old = h
        .tokens
        .find_by_token(&t1.refresh_token)
        .await
        .unwrap()
        .unwrap();
    assert!(old.revoked_at.is_some());
    assert_eq!(old.replaced_by.as_deref(), Some(t2.refresh_token.as_str()));

    // refresh(R1) again fails generically unauthorized.
    let err = h.rotation.rotate(&t1.refresh_token).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::Authentication));

    // The replacement still works.
    assert!(h.rotation.rotate(&t2.refresh_token).await.is_ok());
}

#[tokio::test]
async fn rotation_chain_stays_walkable() {
    let h = Harness::new();
    let user = h.user("bo@example.com").await;

    let t1 = h.issuer.issue(&user).await.unwrap();
    let t2 = h.rotation.rotate(&t1.refresh_token).await.unwrap();
    let t3 = h.rotation.rotate(&t2.refresh_token).await.unwrap();

    // Follow replaced_by pointers from the root to the live token.
    let r1 = h
        .tokens
        .find_by_token(&t1.refresh_token)
        .await
        .unwrap()
        .unwrap();
    let r2 = h
        .tokens
        .find_by_token(r1.replaced_by.as_deref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(r2.token, t2.refresh_token);
    assert_eq!(r2.replaced_by.as_deref(), Some(t3.refresh_token.as_str()));

    let r3 = h
        .tokens
        .find_by_token(&t3.refresh_token)
        .await
        .unwrap()
        .unwrap();
    assert!(r3.revoked_at.is_none());
    assert!(r3.replaced_by.is_none());
}

#[tokio::test]
async fn concurrent_rotations_yield_exactly_one_success() {
    let h = Harness::new();
    let user = h.user("cal@example.com").await;
    let t1 = h.issuer.issue(&user).await.unwrap();

    let (a, b) = join!(
        h.rotation.rotate(&t1.refresh_token),
        h.rotation.rotate(&t1.refresh_token),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one rotation may win");

    let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert!(loser.is_kind(ErrorKind::Authentication));
}

#[tokio::test]
async fn revoke_all_kills_every_outstanding_token() {
    let h = Harness::new();
    let user = h.user("dia@example.com").await;

    let t1 = h.issuer.issue(&user).await.unwrap();
    let t2 = h.issuer.issue(&user).await.unwrap();

    let revoked = h.rotation.revoke_all(user.id).await.unwrap();
    assert_eq!(revoked, 2);

    for token in [&t1.refresh_token, &t2.refresh_token] {
        let err = h.rotation.rotate(token).await.unwrap_err();
        assert!(err.is_kind(ErrorKind::Authentication));
    }
}

#[tokio::test]
async fn revoke_single_token_is_idempotent() {
    let h = Harness::new();
    let user = h.user("eli@example.com").await;
    let t1 = h.issuer.issue(&user).await.unwrap();

    assert!(h.rotation.revoke(&t1.refresh_token).await.unwrap());
    // Second revoke finds the row already revoked.
    assert!(!h.rotation.revoke(&t1.refresh_token).await.unwrap());
    // Unknown tokens are a quiet no-op.
    assert!(!h.rotation.revoke("unknown-token").await.unwrap());

    let err = h.rotation.rotate(&t1.refresh_token).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::Authentication));
}

#[tokio::test]
async fn revoke_by_record_id_retires_the_token() {
    let h = Harness::new();
    let user = h.user("gia@example.com").await;
    let t1 = h.issuer.issue(&user).await.unwrap();

    let record = h
        .tokens
        .find_by_token(&t1.refresh_token)
        .await
        .unwrap()
        .unwrap();

    assert!(h.rotation.revoke_by_id(record.id).await.unwrap());
    assert!(!h.rotation.revoke_by_id(record.id).await.unwrap());
    // Unknown ids are a quiet no-op.
    assert!(!h.rotation.revoke_by_id(uuid::Uuid::new_v4()).await.unwrap());

    let err = h.rotation.rotate(&t1.refresh_token).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::Authentication));
}

#[tokio::test]
async fn expiry_boundary_is_inclusive_and_deletes_the_row() {
    let h = Harness::new();
    let user = h.user("fay@example.com").await;
    let t1 = h.issuer.issue(&user).await.unwrap();

    // Advance exactly to expires_at: already expired.
    h.clock.set(t1.refresh_expires_at);

    let err = h.rotation.rotate(&t1.refresh_token).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::Authentication));

    // The dead row was deleted on sight.
    assert!(h
        .tokens
        .find_by_token(&t1.refresh_token)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn tampered_and_garbage_tokens_are_rejected() {
    let h = Harness::new();
    let user = h.user("gus@example.com").await;
    let t1 = h.issuer.issue(&user).await.unwrap();

    // Flip the signature segment.
    let mut forged = t1.refresh_token.clone();
    forged.pop();
    forged.push(if forged.ends_with('A') { 'B' } else { 'A' });

    for token in [forged.as_str(), "", "not.a.jwt"] {
        let err = h.rotation.rotate(token).await.unwrap_err();
        assert!(err.is_kind(ErrorKind::Authentication));
    }
}

#[tokio::test]
async fn rotation_fails_when_the_user_is_gone() {
    let h = Harness::new();
    let user = h.user("hal@example.com").await;
    let t1 = h.issuer.issue(&user).await.unwrap();

    // A pair issued for a user the directory has never seen stands in
    // for an account deleted after login.
    let ghost = worklane_entity::user::User {
        id: uuid::Uuid::new_v4(),
        email: "ghost@example.com".to_string(),
        password_hash: String::new(),
        display_name: None,
        email_verified: false,
        created_at: h.clock.now(),
        updated_at: h.clock.now(),
    };
    let ghost_pair = h.issuer.issue(&ghost).await.unwrap();

    let err = h.rotation.rotate(&ghost_pair.refresh_token).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::Authentication));

    // The registered user's token still rotates.
    assert!(h.rotation.rotate(&t1.refresh_token).await.is_ok());
}

#[tokio::test]
async fn reaper_removes_expired_and_revoked_rows_only() {
    let h = Harness::new();
    let user = h.user("ida@example.com").await;

    let spent = h.issuer.issue(&user).await.unwrap();
    let live = h.rotation.rotate(&spent.refresh_token).await.unwrap();

    // One revoked row (the rotated-away parent), one live row.
    let removed = h.reaper.reap().await.unwrap();
    assert_eq!(removed, 1);

    assert!(h
        .tokens
        .find_by_token(&live.refresh_token)
        .await
        .unwrap()
        .is_some());

    // Advance past expiry; the live row now reaps too.
    h.clock.advance(Duration::days(8));
    let removed = h.reaper.reap().await.unwrap();
    assert_eq!(removed, 1);
}
