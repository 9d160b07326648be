//! Postgres storage

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::links::Link;
use crate::users::User;

use super::ChangePlanValues;
use super::CreateLinkValues;
use super::CreateUserValues;
use super::Error;
use super::Page;
use super::Result;
use super::Storage;
use super::UpdateLinkValues;
use super::types::MIGRATOR;
use super::types::SqlxLink;
use super::types::SqlxUser;
use super::types::UserPlanType;

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable
    ///
    /// Migrations will be run
    pub async fn new() -> Result<Self> {
        let database_connection_string = std::env::var("DATABASE_URL")
            .map_err(|_| Error::Connection("Missing DATABASE_URL".to_string()))?;

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .map_err(connection_error)?;

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> Result<Self> {
        MIGRATOR
            .run(&connection_pool)
            .await
            .map_err(|err| Error::Connection(format!("Migrations could not run: {err}")))?;

        Ok(Self { connection_pool })
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, SqlxUser>(
            r"
            SELECT *
            FROM users
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map(User::from_sqlx_user_optional)
        .map_err(connection_error)
    }

    async fn find_single_user_by_login(&self, login: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, SqlxUser>(
            r"
            SELECT *
            FROM users
            WHERE username = $1 OR email = $1
            LIMIT 1
            ",
        )
        .bind(login)
        .fetch_optional(&self.connection_pool)
        .await
        .map(User::from_sqlx_user_optional)
        .map_err(connection_error)
    }

    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User> {
        sqlx::query_as::<_, SqlxUser>(
            r"
            INSERT INTO users
                (id, session_id, username, email, full_name, hashed_password, plan, max_links)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.session_id)
        .bind(values.username)
        .bind(values.email)
        .bind(values.full_name)
        .bind(values.hashed_password)
        .bind(UserPlanType::from_plan(values.plan))
        .bind(values.max_links)
        .fetch_one(&self.connection_pool)
        .await
        .map(User::from_sqlx_user)
        .map_err(write_error)
    }

    async fn change_plan(&self, user: &User, values: &ChangePlanValues) -> Result<User> {
        sqlx::query_as::<_, SqlxUser>(
            r"
            UPDATE users
            SET plan = $1, max_links = $2, premium_expiry = $3, updated_at = CURRENT_TIMESTAMP
            WHERE id = $4
            RETURNING *
            ",
        )
        .bind(UserPlanType::from_plan(values.plan))
        .bind(values.max_links)
        .bind(values.premium_expiry)
        .bind(user.id)
        .fetch_one(&self.connection_pool)
        .await
        .map(User::from_sqlx_user)
        .map_err(connection_error)
    }

    async fn adjust_link_count(&self, user_id: &Uuid, delta: i64) -> Result<()> {
        sqlx::query(
            r"
            UPDATE users
            SET link_count = link_count + $1
            WHERE id = $2
            ",
        )
        .bind(delta)
        .bind(user_id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }

    async fn find_single_link_by_identifier(&self, identifier: &str) -> Result<Option<Link>> {
        sqlx::query_as::<_, SqlxLink>(
            r"
            SELECT *
            FROM links
            WHERE identifier = $1
            LIMIT 1
            ",
        )
        .bind(identifier)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Link::from_sqlx_link_optional)
        .map_err(connection_error)
    }

    async fn find_links_by_owner(&self, owner_id: &Uuid, page: Page) -> Result<Vec<Link>> {
        sqlx::query_as::<_, SqlxLink>(
            r"
            SELECT *
            FROM links
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(owner_id)
        .bind(i64::from(page.size))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.connection_pool)
        .await
        .map(Link::from_sqlx_link_multiple)
        .map_err(connection_error)
    }

    async fn count_links_by_owner(&self, owner_id: &Uuid) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM links
            WHERE owner_id = $1
            ",
        )
        .bind(owner_id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(count.unsigned_abs())
    }

    async fn create_link(&self, values: &CreateLinkValues<'_>) -> Result<Link> {
        sqlx::query_as::<_, SqlxLink>(
            r"
            INSERT INTO links (id, identifier, destination_url, owner_id, custom_slug)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.identifier)
        .bind(values.destination_url)
        .bind(values.owner_id)
        .bind(values.custom_slug)
        .fetch_one(&self.connection_pool)
        .await
        .map(Link::from_sqlx_link)
        .map_err(write_error)
    }

    async fn update_link(&self, link: &Link, values: &UpdateLinkValues<'_>) -> Result<Link> {
        sqlx::query_as::<_, SqlxLink>(
            r"
            UPDATE links
            SET identifier = $1, custom_slug = $2, active = $3, updated_at = CURRENT_TIMESTAMP
            WHERE id = $4
            RETURNING *
            ",
        )
        .bind(values.identifier.unwrap_or(&link.identifier))
        .bind(values.identifier.or(link.custom_slug.as_deref()))
        .bind(values.active.unwrap_or(link.active))
        .bind(link.id)
        .fetch_one(&self.connection_pool)
        .await
        .map(Link::from_sqlx_link)
        .map_err(write_error)
    }

    async fn delete_link(&self, link: &Link) -> Result<()> {
        sqlx::query(
            r"
            DELETE FROM links
            WHERE id = $1
            ",
        )
        .bind(link.id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }

    async fn record_click(&self, identifier: &str, at: DateTime<Utc>) -> Result<Option<Link>> {
        sqlx::query_as::<_, SqlxLink>(
            r"
            UPDATE links
            SET click_count = click_count + 1,
                last_accessed_at = GREATEST(last_accessed_at, $2)
            WHERE identifier = $1 AND active
            RETURNING *
            ",
        )
        .bind(identifier)
        .bind(at)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Link::from_sqlx_link_optional)
        .map_err(connection_error)
    }
}

/// Convert `SQLx` to storage connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}

/// Convert `SQLx` errors of inserts and updates, unique violations become duplicate keys
fn write_error(err: sqlx::Error) -> Error {
    if let Some(database_error) = err.as_database_error() {
        if database_error.is_unique_violation() {
            return Error::DuplicateKey(match database_error.constraint() {
                Some("links_custom_slug_key") => "custom_slug",
                Some("users_username_key") => "username",
                Some("users_email_key") => "email",
                _ => "identifier",
            });
        }
    }

    connection_error(err)
}
