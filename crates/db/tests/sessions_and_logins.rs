//! Repository tests for session liveness and login throttling.

use careerdesk_core::hashing::hash_token;
use careerdesk_db::models::session::CreateSession;
use careerdesk_db::models::user::{CreateUser, User};
use careerdesk_db::repositories::{SessionRepo, UserRepo};
use chrono::{Duration, Utc};
use sqlx::PgPool;

async fn create_user(pool: &PgPool, username: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: "not-a-real-hash".to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap()
}

async fn open_session(pool: &PgPool, user_id: i64, token: &str, ttl: Duration) {
    let input = CreateSession {
        user_id,
        refresh_token_hash: hash_token(token),
        expires_at: Utc::now() + ttl,
        user_agent: Some("tests".into()),
        ip_address: None,
    };
    SessionRepo::create(pool, &input).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_is_consumed_once(pool: PgPool) {
    let user = create_user(&pool, "rotator").await;
    open_session(&pool, user.id, "tok-1", Duration::days(1)).await;

    let live = SessionRepo::find_live(&pool, &hash_token("tok-1")).await.unwrap();
    assert_eq!(live.unwrap().user_id, user.id);

    assert_eq!(
        SessionRepo::consume(&pool, &hash_token("tok-1")).await.unwrap(),
        Some(user.id)
    );
    assert_eq!(SessionRepo::consume(&pool, &hash_token("tok-1")).await.unwrap(), None);
    assert!(SessionRepo::find_live(&pool, &hash_token("tok-1"))
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_session_is_not_live(pool: PgPool) {
    let user = create_user(&pool, "stale").await;
    open_session(&pool, user.id, "old", -Duration::minutes(1)).await;

    assert!(SessionRepo::find_live(&pool, &hash_token("old")).await.unwrap().is_none());
    assert_eq!(SessionRepo::consume(&pool, &hash_token("old")).await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivation_ends_sessions(pool: PgPool) {
    let user = create_user(&pool, "leaving").await;
    open_session(&pool, user.id, "mine", Duration::days(1)).await;

    UserRepo::deactivate(&pool, user.id).await.unwrap();

    assert!(SessionRepo::find_live(&pool, &hash_token("mine")).await.unwrap().is_none());
    assert_eq!(SessionRepo::consume(&pool, &hash_token("mine")).await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revoke_all_only_touches_one_user(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    open_session(&pool, alice.id, "a1", Duration::days(1)).await;
    open_session(&pool, alice.id, "a2", Duration::days(1)).await;
    open_session(&pool, bob.id, "b1", Duration::days(1)).await;

    assert_eq!(SessionRepo::revoke_all_for_user(&pool, alice.id).await.unwrap(), 2);
    assert_eq!(SessionRepo::revoke_all_for_user(&pool, alice.id).await.unwrap(), 0);
    assert!(SessionRepo::find_live(&pool, &hash_token("b1")).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_logins_lock_at_threshold(pool: PgPool) {
    let user = create_user(&pool, "guesser").await;

    for expected in 1..3 {
        let (count, locked) = UserRepo::register_failed_login(&pool, user.id, 3, 15)
            .await
            .unwrap();
        assert_eq!(count, expected);
        assert!(locked.is_none());
    }

    let (count, locked) = UserRepo::register_failed_login(&pool, user.id, 3, 15)
        .await
        .unwrap();
    assert_eq!(count, 3);
    let until = locked.expect("third failure locks");
    assert!(until > Utc::now() + Duration::minutes(14));

    UserRepo::mark_login_succeeded(&pool, user.id).await.unwrap();
    let user = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(user.failed_login_count, 0);
    assert!(user.locked_until.is_none());
    assert!(user.last_login_at.is_some());
}
