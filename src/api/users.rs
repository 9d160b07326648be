//! User API endpoints
//!
//! Registration, login and plan management

use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::database;
use crate::database::ChangePlanValues;
use crate::database::CreateUserValues;
use crate::database::Database;
use crate::password::MIN_PASSWORD_LENGTH;
use crate::password::hash;
use crate::password::verify;
use crate::users::Plan;
use crate::users::User;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::JwtKeys;
use super::Success;
use super::current_user::Token;
use super::current_user::generate_token;

/// The user response information
///
/// A subset of all the information, ready to be serialized for the outside world
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// The user ID
    pub id: Uuid,

    /// The username
    pub username: String,

    /// The email address
    pub email: String,

    /// The full name
    pub full_name: String,

    /// The current plan
    pub plan: Plan,

    /// When premium ends, if ever
    pub premium_expiry: Option<DateTime<Utc>>,

    /// Amount of links the user has
    pub link_count: i64,

    /// Amount of links the plan permits
    pub max_links: i64,

    /// Registration date
    pub created_at: DateTime<Utc>,

    /// Last change of the account
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    /// Create a user response from a [`User`](User)
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            plan: user.plan,
            premium_expiry: user.premium_expiry,
            link_count: user.link_count,
            max_links: user.max_links,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Register form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    /// Unique username, 3 to 20 characters without `@`
    username: String,

    /// Unique email address
    email: String,

    /// Password, at least 6 characters
    password: String,

    /// Full name
    full_name: String,
}

/// Register a new user on the free plan
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "username": "alice", "email": "alice@example.com", \
///           "password": "verysecret", "fullName": "Alice" }' \
///     http://localhost:3000/api/register
/// ```
///
/// Response:
/// ```json
/// { "success": true, "data": { "id": "<uuid>", "username": "alice", "plan": "free" ... } }
/// ```
pub async fn register(
    Extension(database): Extension<Database>,
    Form(form): Form<RegisterForm>,
) -> Result<Success<UserResponse>, Error> {
    let username = form.username.trim();
    let email = form.email.trim().to_lowercase();
    let full_name = form.full_name.trim();

    if !(3..=20).contains(&username.chars().count()) {
        return Err(Error::bad_request("Username must be 3 to 20 characters"));
    }

    if username.contains('@') {
        return Err(Error::bad_request("Username can not contain `@`"));
    }

    if !email.contains('@') {
        return Err(Error::bad_request("Invalid email address"));
    }

    if full_name.is_empty() {
        return Err(Error::bad_request("Full name is required"));
    }

    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let hashed_password = hash(&form.password).map_err(Error::internal_server_error)?;

    let values = CreateUserValues {
        session_id: &Uuid::new_v4(),
        username,
        email: &email,
        full_name,
        hashed_password: &hashed_password,
        plan: Plan::Free,
        max_links: Plan::Free.max_links(),
    };

    let user = database.create_user(&values).await.map_err(|err| match err {
        database::Error::DuplicateKey(_) => Error::bad_request("Email or username already exists"),
        err => Error::internal_server_error(err),
    })?;

    tracing::debug!("User {} registered as {}", user.id, user.username);

    Ok(Success::created(UserResponse::from_user(&user)))
}

/// Login form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    /// Username or email address of the user
    username: String,

    /// Password of the user
    password: String,
}

/// Get a token for a user
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "username": "alice", "password": "verysecret" }' \
///     http://localhost:3000/api/login
/// ```
///
/// Response:
/// ```json
/// { "success": true, "data": { "tokenType": "Bearer", "expiresIn": 604800, "accessToken": "" } }
/// ```
pub async fn login(
    Extension(database): Extension<Database>,
    Extension(jwt_keys): Extension<JwtKeys>,
    Form(form): Form<LoginForm>,
) -> Result<Success<Token>, Error> {
    let login = form.username.trim().to_string();
    let login = if login.contains('@') {
        login.to_lowercase()
    } else {
        login
    };

    let user = database
        .find_single_user_by_login(&login)
        .await
        .map_err(Error::internal_server_error)?
        .filter(|user| user.active && verify(&user.hashed_password, &form.password))
        .ok_or_else(|| Error::bad_request("Invalid username or password"))?;

    generate_token(&jwt_keys, &user).map(Success::ok)
}

/// Get the current user
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:3000/api/me
/// ```
pub async fn me(current_user: CurrentUser) -> Success<UserResponse> {
    Success::ok(UserResponse::from_user(&current_user))
}

/// Upgrade the current user to premium
///
/// Request:
/// ```sh
/// curl -v -XPOST -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:3000/api/upgrade-premium
/// ```
pub async fn upgrade_premium(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
) -> Result<Success<UserResponse>, Error> {
    let values = ChangePlanValues {
        plan: Plan::Premium,
        max_links: Plan::Premium.max_links(),
        premium_expiry: None,
    };

    let user = database
        .change_plan(&current_user, &values)
        .await
        .map_err(Error::internal_server_error)?;

    tracing::info!("User {} upgraded to premium", user.id);

    Ok(Success::ok(UserResponse::from_user(&user)))
}
