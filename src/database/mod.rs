//! All things related to the storage of links and users

use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

pub use Config as DatabaseConfig;
pub use form_types::*;

use crate::links::Link;
use crate::users::User;
use memory::Memory;
#[cfg(feature = "postgres")]
use postgres::Postgres;

mod form_types;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "postgres")]
mod types;

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// A unique index rejected the write, holds the name of the field
    #[error("Duplicate key: {0}")]
    DuplicateKey(&'static str),

    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Database configuration
pub enum Config {
    /// Detect configuration from environment
    ///
    /// Uses Postgres when compiled with the `postgres` feature, memory otherwise
    DetectConfig,

    /// Keep everything in memory, gone on shutdown
    InMemory,

    /// Use existing connection
    #[cfg(feature = "postgres")]
    ExistingConnection(sqlx::PgPool),
}

/// Handle to the configured storage
#[derive(Clone)]
pub struct Database {
    /// The actual storage backend
    storage: Arc<dyn Storage>,
}

impl Database {
    /// Create the storage described by the config
    pub async fn from_config(config: Config) -> Result<Self> {
        let storage: Arc<dyn Storage> = match config {
            #[cfg(feature = "postgres")]
            Config::DetectConfig => Arc::new(Postgres::new().await?),
            #[cfg(not(feature = "postgres"))]
            Config::DetectConfig => Arc::new(Memory::new()),
            Config::InMemory => Arc::new(Memory::new()),
            #[cfg(feature = "postgres")]
            Config::ExistingConnection(pool) => Arc::new(Postgres::new_with_pool(pool).await?),
        };

        Ok(Self { storage })
    }
}

impl Deref for Database {
    type Target = dyn Storage;

    fn deref(&self) -> &Self::Target {
        self.storage.as_ref()
    }
}

/// Storage with all supported operations
///
/// Unique indexes:
/// - `Link::identifier`
/// - `Link::custom_slug`, ignoring links without one
/// - `User::username` and `User::email`
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Finds a single user by its ID
    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>>;

    /// Finds a single user by username or email
    async fn find_single_user_by_login(&self, login: &str) -> Result<Option<User>>;

    /// Create a single user
    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User>;

    /// Change the plan of a user
    async fn change_plan(&self, user: &User, values: &ChangePlanValues) -> Result<User>;

    /// Atomically add `delta` to the link counter of a user
    async fn adjust_link_count(&self, user_id: &Uuid, delta: i64) -> Result<()>;

    /// Find a single link by its identifier
    ///
    /// DOES NOT respect the active flag, handle with care
    async fn find_single_link_by_identifier(&self, identifier: &str) -> Result<Option<Link>>;

    /// Find all links of an owner, newest first
    async fn find_links_by_owner(&self, owner_id: &Uuid, page: Page) -> Result<Vec<Link>>;

    /// Count all links of an owner
    async fn count_links_by_owner(&self, owner_id: &Uuid) -> Result<u64>;

    /// Insert a link
    ///
    /// Fails with [`Error::DuplicateKey`] when the identifier or custom slug is taken
    async fn create_link(&self, values: &CreateLinkValues<'_>) -> Result<Link>;

    /// Update a single link
    ///
    /// Fails with [`Error::DuplicateKey`] when the new identifier is taken
    async fn update_link(&self, link: &Link, values: &UpdateLinkValues<'_>) -> Result<Link>;

    /// Delete a link for good
    async fn delete_link(&self, link: &Link) -> Result<()>;

    /// Count a click on an active link
    ///
    /// The counter increment and `last_accessed_at` are applied atomically, unknown or inactive
    /// links are not touched and give `None`
    async fn record_click(&self, identifier: &str, at: DateTime<Utc>) -> Result<Option<Link>>;
}
