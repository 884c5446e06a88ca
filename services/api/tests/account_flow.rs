//! Integration tests for the user repository against live PostgreSQL
//!
//! These tests need a running database and are therefore ignored by
//! default. Run them with:
//!
//! ```text
//! DATABASE_URL=... cargo test -p api -- --ignored
//! ```
//!
//! Each test isolates itself with per-run unique usernames, emails, and
//! country markers, so suites can run against a shared database.

use chrono::{Datelike, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use api::error::ApiError;
use api::models::{NewUser, ProfileUpdate, Role, SearchCriteria};
use api::repositories::{PlayerProfileRepository, UserRepository};
use common::database::{DatabaseConfig, init_pool};

async fn setup() -> (PgPool, UserRepository) {
    let config = DatabaseConfig::from_env().expect("DATABASE_URL must be set");
    let pool = init_pool(&config).await.expect("failed to open pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");
    let users = UserRepository::new(pool.clone());
    (pool, users)
}

fn unique(prefix: &str) -> String {
    let tag = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &tag[..12])
}

fn new_account(role: Role) -> NewUser {
    let username = unique("acct");
    NewUser {
        email: format!("{username}@example.com"),
        username,
        password: "correct-horse-battery".to_string(),
        role,
        full_name: "Test Account".to_string(),
        phone: None,
        country: None,
        date_of_birth: None,
        position: None,
        current_club: None,
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL"]
async fn create_then_find_matches_and_hash_is_never_raw() {
    let (_pool, users) = setup().await;

    let new_user = new_account(Role::Scout);
    let created = users.create(&new_user).await.unwrap();

    let found = users
        .find_by_username(&new_user.username)
        .await
        .unwrap()
        .expect("created account must be findable");

    assert_eq!(found.id, created.id);
    assert_eq!(found.username, new_user.username);
    assert_eq!(found.email, new_user.email);
    assert_eq!(found.role, Role::Scout);
    assert_eq!(found.full_name, new_user.full_name);
    assert_ne!(found.password_hash, new_user.password);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL"]
async fn authenticate_success_invalid_and_not_found() {
    let (_pool, users) = setup().await;

    let new_user = new_account(Role::Club);
    users.create(&new_user).await.unwrap();

    // by username and by email, hash stripped from the result
    let principal = users
        .authenticate(&new_user.username, &new_user.password)
        .await
        .unwrap();
    assert_eq!(principal.username, new_user.username);

    let by_email = users
        .authenticate(&new_user.email, &new_user.password)
        .await
        .unwrap();
    assert_eq!(by_email.id, principal.id);

    let err = users
        .authenticate(&new_user.username, "wrong-password-42")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredentials));

    let err = users
        .authenticate(&unique("ghost"), "whatever-password")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
#[ignore = "requires running PostgreSQL"]
async fn duplicate_username_and_email_are_rejected() {
    let (_pool, users) = setup().await;

    let first = new_account(Role::Player);
    users.create(&first).await.unwrap();

    let mut same_username = new_account(Role::Player);
    same_username.username = first.username.clone();
    let err = users.create(&same_username).await.unwrap_err();
    assert!(matches!(err, ApiError::DuplicateUsername));

    let mut same_email = new_account(Role::Player);
    same_email.email = first.email.clone();
    let err = users.create(&same_email).await.unwrap_err();
    assert!(matches!(err, ApiError::DuplicateEmail));
}

#[tokio::test]
#[ignore = "requires running PostgreSQL"]
async fn country_filter_returns_only_matching_entities_newest_first() {
    let (_pool, users) = setup().await;

    let country = unique("Testland");
    let other_country = unique("Elsewhere");

    for _ in 0..2 {
        let mut new_user = new_account(Role::Player);
        new_user.country = Some(country.clone());
        users.create(&new_user).await.unwrap();
    }
    let mut outsider = new_account(Role::Player);
    outsider.country = Some(other_country);
    users.create(&outsider).await.unwrap();

    let criteria = SearchCriteria {
        country: Some(country.clone()),
        ..SearchCriteria::none()
    };
    let (items, total) = users.search(Some(Role::Player), &criteria).await.unwrap();

    assert_eq!(total, 2);
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|u| u.country.as_deref() == Some(country.as_str())));
    assert!(items[0].created_at >= items[1].created_at);

    // no filters: the base predicate alone decides membership
    let (all_players, all_total) = users
        .search(Some(Role::Player), &SearchCriteria::none())
        .await
        .unwrap();
    assert!(all_total >= 3);
    assert!(all_players.iter().all(|u| u.role == Role::Player));
}

#[tokio::test]
#[ignore = "requires running PostgreSQL"]
async fn age_window_filters_by_birth_year() {
    let (_pool, users) = setup().await;

    let country = unique("Ageland");
    let year = Utc::now().year();

    let mut in_window = new_account(Role::Player);
    in_window.country = Some(country.clone());
    in_window.date_of_birth = NaiveDate::from_ymd_opt(year - 19, 6, 15);
    let in_window_created = users.create(&in_window).await.unwrap();

    let mut too_old = new_account(Role::Player);
    too_old.country = Some(country.clone());
    too_old.date_of_birth = NaiveDate::from_ymd_opt(year - 25, 6, 15);
    users.create(&too_old).await.unwrap();

    let mut too_young = new_account(Role::Player);
    too_young.country = Some(country.clone());
    too_young.date_of_birth = NaiveDate::from_ymd_opt(year - 16, 6, 15);
    users.create(&too_young).await.unwrap();

    let criteria = SearchCriteria {
        country: Some(country),
        min_age: Some(18),
        max_age: Some(21),
        ..SearchCriteria::none()
    };
    let (items, total) = users.search(Some(Role::Player), &criteria).await.unwrap();

    assert_eq!(total, 1);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, in_window_created.id);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL"]
async fn players_get_exactly_one_profile_and_others_none() {
    let (pool, users) = setup().await;
    let profiles = PlayerProfileRepository::new(pool.clone());

    let player = users.create(&new_account(Role::Player)).await.unwrap();
    let scout = users.create(&new_account(Role::Scout)).await.unwrap();
    let club = users.create(&new_account(Role::Club)).await.unwrap();

    let profile = profiles
        .find_by_user(player.id)
        .await
        .unwrap()
        .expect("player must have a profile");
    assert_eq!(profile.user_id, player.id);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM player_profiles WHERE user_id = $1")
            .bind(player.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);

    assert!(profiles.find_by_user(scout.id).await.unwrap().is_none());
    assert!(profiles.find_by_user(club.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL"]
async fn count_by_role_matches_unfiltered_search_total() {
    let (_pool, users) = setup().await;

    users.create(&new_account(Role::Player)).await.unwrap();

    // other suites may insert players concurrently; bracket the search
    // between two counts instead of demanding exact equality
    let before = users.count_by_role(Role::Player).await.unwrap();
    let (_, total) = users
        .search(Some(Role::Player), &SearchCriteria::none())
        .await
        .unwrap();
    let after = users.count_by_role(Role::Player).await.unwrap();

    assert!(before >= 1);
    assert!(before <= total && total <= after);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL"]
async fn update_distinguishes_not_found_and_replaces_fields() {
    let (_pool, users) = setup().await;

    let update = ProfileUpdate {
        full_name: "Updated Name".to_string(),
        phone: Some("+23276000000".to_string()),
        country: Some("Sierra Leone".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(2004, 2, 29),
        position: Some("goalkeeper".to_string()),
        current_club: None,
    };

    let err = users.update(Uuid::new_v4(), &update).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    let mut new_user = new_account(Role::Player);
    new_user.current_club = Some("FC Example".to_string());
    let created = users.create(&new_user).await.unwrap();

    let updated = users.update(created.id, &update).await.unwrap();
    assert_eq!(updated.full_name, "Updated Name");
    assert_eq!(updated.country.as_deref(), Some("Sierra Leone"));
    assert_eq!(updated.position.as_deref(), Some("goalkeeper"));
    // full replace: an absent field clears the stored value
    assert_eq!(updated.current_club, None);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL"]
async fn delete_cascades_to_the_player_profile() {
    let (pool, users) = setup().await;
    let profiles = PlayerProfileRepository::new(pool);

    let player = users.create(&new_account(Role::Player)).await.unwrap();
    assert!(profiles.find_by_user(player.id).await.unwrap().is_some());

    assert!(users.delete(player.id).await.unwrap());
    assert!(users.find_by_id(player.id).await.unwrap().is_none());
    assert!(profiles.find_by_user(player.id).await.unwrap().is_none());

    // a second delete removes nothing
    assert!(!users.delete(player.id).await.unwrap());
}
