//! Integration tests for the admin credential repository.

use biblio_db::repositories::AdminCredentialRepo;
use chrono::{Duration, Utc};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_returns_none_until_seeded(pool: PgPool) {
    assert!(AdminCredentialRepo::get(&pool).await.unwrap().is_none());

    let created = AdminCredentialRepo::create(&pool, "hash").await.unwrap();
    assert_eq!(created.failed_attempts, 0);
    assert_eq!(created.token_version, 1);
    assert!(created.locked_until.is_none());

    let fetched = AdminCredentialRepo::get(&pool).await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failures_lock_and_success_resets(pool: PgPool) {
    let cred = AdminCredentialRepo::create(&pool, "hash").await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let row = AdminCredentialRepo::lock_for_update(&mut tx)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.id, cred.id);
    assert_eq!(
        AdminCredentialRepo::increment_failed_attempts(&mut tx, cred.id)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        AdminCredentialRepo::increment_failed_attempts(&mut tx, cred.id)
            .await
            .unwrap(),
        2
    );

    let until = Utc::now() + Duration::minutes(15);
    AdminCredentialRepo::lock(&mut tx, cred.id, until)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let locked = AdminCredentialRepo::get(&pool).await.unwrap().unwrap();
    assert_eq!(locked.failed_attempts, 0);
    assert!(locked.locked_until.is_some());

    let mut tx = pool.begin().await.unwrap();
    AdminCredentialRepo::record_success(&mut tx, cred.id)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let cleared = AdminCredentialRepo::get(&pool).await.unwrap().unwrap();
    assert!(cleared.locked_until.is_none());
    assert!(cleared.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rolled_back_failure_is_not_counted(pool: PgPool) {
    let cred = AdminCredentialRepo::create(&pool, "hash").await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    AdminCredentialRepo::increment_failed_attempts(&mut tx, cred.id)
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    let stored = AdminCredentialRepo::get(&pool).await.unwrap().unwrap();
    assert_eq!(stored.failed_attempts, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lock_for_update_is_none_until_seeded(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    assert!(AdminCredentialRepo::lock_for_update(&mut tx)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pin_rotation_bumps_token_version(pool: PgPool) {
    let cred = AdminCredentialRepo::create(&pool, "old").await.unwrap();

    let rotated = AdminCredentialRepo::update_pin(&pool, cred.id, "new")
        .await
        .unwrap();
    assert_eq!(rotated.pin_hash, "new");
    assert_eq!(rotated.token_version, 2);
    assert!(rotated.pin_rotated_at >= cred.pin_rotated_at);

    let version = AdminCredentialRepo::bump_token_version(&pool, cred.id)
        .await
        .unwrap();
    assert_eq!(version, 3);
}
