use axum::http::StatusCode;
use chrono::Duration;
use chrono::Utc;

use crate::database::ChangePlanValues;
use crate::tests::helper;
use crate::users::Plan;

#[tokio::test]
async fn test_register() {
    let mut app = helper::setup_test_app().await;

    let user = helper::register(&mut app, "alice").await;
    assert_eq!("alice", user.username);
    assert_eq!("free", user.plan);
    assert_eq!(0, user.link_count);
    assert_eq!(100, user.max_links);

    // same username
    let (status_code, _, error) =
        helper::maybe_register(&mut app, "alice", "other@example.com", "verysecret").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(
        "Email or username already exists".to_string(),
        error.unwrap().message
    );

    // same email, different casing
    let (status_code, _, error) =
        helper::maybe_register(&mut app, "bob", "ALICE@example.com", "verysecret").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(
        "Email or username already exists".to_string(),
        error.unwrap().message
    );
}

#[tokio::test]
async fn test_register_with_invalid_values() {
    let mut app = helper::setup_test_app().await;

    let (status_code, _, error) =
        helper::maybe_register(&mut app, "al", "al@example.com", "verysecret").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(
        "Username must be 3 to 20 characters".to_string(),
        error.unwrap().message
    );

    let (status_code, _, error) =
        helper::maybe_register(&mut app, "alice", "not-an-email", "verysecret").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Invalid email address".to_string(), error.unwrap().message);

    let (status_code, _, error) =
        helper::maybe_register(&mut app, "alice", "alice@example.com", "short").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(
        "Password must be at least 6 characters".to_string(),
        error.unwrap().message
    );
}

#[tokio::test]
async fn test_login() {
    let mut app = helper::setup_test_app().await;

    helper::register(&mut app, "alice").await;

    let (status_code, access_token, _) =
        helper::maybe_login(&mut app, "alice", helper::PASSWORD).await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(access_token.is_some());

    // login with email works as well
    let (status_code, _, _) =
        helper::maybe_login(&mut app, "Alice@Example.com", helper::PASSWORD).await;
    assert_eq!(StatusCode::OK, status_code);

    let (status_code, access_token, error) =
        helper::maybe_login(&mut app, "alice", "wrongpassword").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(access_token.is_none());
    assert_eq!(
        "Invalid username or password".to_string(),
        error.unwrap().message
    );

    let (status_code, _, error) = helper::maybe_login(&mut app, "nobody", helper::PASSWORD).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(
        "Invalid username or password".to_string(),
        error.unwrap().message
    );
}

#[tokio::test]
async fn test_current_user() {
    let mut app = helper::setup_test_app().await;

    helper::register(&mut app, "alice").await;
    let access_token = helper::login(&mut app, "alice").await;

    let (status_code, user) = helper::current_user(&mut app, &access_token).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("alice", user.unwrap().username);

    let (status_code, user) = helper::current_user(&mut app, "Bearer invalid").await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);
    assert!(user.is_none());
}

#[tokio::test]
async fn test_upgrade_premium() {
    let mut app = helper::setup_test_app().await;

    helper::register(&mut app, "alice").await;
    let access_token = helper::login(&mut app, "alice").await;

    let user = helper::upgrade_premium(&mut app, &access_token).await;
    assert_eq!("premium", user.plan);
    assert_eq!(10_000, user.max_links);

    let (status_code, link, _) =
        helper::maybe_shorten(&mut app, &access_token, "https://example.com", None, false).await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(link.is_some());
}

#[tokio::test]
async fn test_expired_premium_is_downgraded() {
    let (mut app, database) = helper::setup_test_app_with_database().await;

    let access_token = helper::premium_user(&mut app, "alice").await;

    let user = database
        .find_single_user_by_login("alice")
        .await
        .unwrap()
        .unwrap();
    let values = ChangePlanValues {
        plan: Plan::Premium,
        max_links: Plan::Premium.max_links(),
        premium_expiry: Some(Utc::now() - Duration::days(1)),
    };
    database.change_plan(&user, &values).await.unwrap();

    let (status_code, link, error) =
        helper::maybe_shorten(&mut app, &access_token, "https://example.com", None, false).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);
    assert!(link.is_none());
    assert_eq!(Some("plan_required".to_string()), error.unwrap().kind);

    let (status_code, user) = helper::current_user(&mut app, &access_token).await;
    assert_eq!(StatusCode::OK, status_code);
    let user = user.unwrap();
    assert_eq!("free", user.plan);
    assert_eq!(100, user.max_links);
}

#[tokio::test]
async fn test_register_with_at_in_username() {
    let mut app = helper::setup_test_app().await;

    let (status_code, user, error) =
        helper::maybe_register(&mut app, "Bob@Home", "bob@example.com", helper::PASSWORD).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(user.is_none());
    assert_eq!(
        "Username can not contain `@`".to_string(),
        error.unwrap().message
    );

    // mixed case usernames log in as registered
    helper::register(&mut app, "BobHome").await;
    let (status_code, _, _) = helper::maybe_login(&mut app, "BobHome", helper::PASSWORD).await;
    assert_eq!(StatusCode::OK, status_code);
}
