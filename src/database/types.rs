//! Database storage types and functions

use chrono::DateTime;
use chrono::Utc;
use sqlx::migrate::Migrator;
use uuid::Uuid;

use crate::links::Link;
use crate::users::Plan;
use crate::users::User;

/// Migrator to run migrations on startup
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// `SQLx` type for user plan
#[derive(PartialEq, Debug, sqlx::Type)]
#[sqlx(type_name = "user_plan_type")]
#[sqlx(rename_all = "kebab-case")]
pub enum UserPlanType {
    /// Free
    Free,

    /// Premium
    Premium,
}

impl UserPlanType {
    /// Create user plan type from plan
    pub fn from_plan(plan: Plan) -> Self {
        match plan {
            Plan::Free => UserPlanType::Free,
            Plan::Premium => UserPlanType::Premium,
        }
    }

    /// Create plan from user plan type
    pub fn to_plan(&self) -> Plan {
        match self {
            UserPlanType::Free => Plan::Free,
            UserPlanType::Premium => Plan::Premium,
        }
    }
}

/// `SQLx` version of user
#[derive(sqlx::FromRow)]
pub struct SqlxUser {
    pub id: Uuid,
    pub session_id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub hashed_password: String,
    pub active: bool,
    pub plan: UserPlanType,
    pub premium_expiry: Option<DateTime<Utc>>,
    pub link_count: i64,
    pub max_links: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create user from `SQLx` version
    pub fn from_sqlx_user(user: SqlxUser) -> Self {
        Self {
            id: user.id,
            session_id: user.session_id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            hashed_password: user.hashed_password,
            active: user.active,
            plan: user.plan.to_plan(),
            premium_expiry: user.premium_expiry,
            link_count: user.link_count,
            max_links: user.max_links,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    /// Maybe create user from `SQLx` version
    pub fn from_sqlx_user_optional(user: Option<SqlxUser>) -> Option<Self> {
        user.map(Self::from_sqlx_user)
    }
}

/// `SQLx` version of link
#[derive(sqlx::FromRow)]
pub struct SqlxLink {
    pub id: Uuid,
    pub identifier: String,
    pub destination_url: String,
    pub owner_id: Option<Uuid>,
    pub custom_slug: Option<String>,
    pub click_count: i64,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Create link from `SQLx` version
    pub fn from_sqlx_link(link: SqlxLink) -> Self {
        Self {
            id: link.id,
            identifier: link.identifier,
            destination_url: link.destination_url,
            owner_id: link.owner_id,
            custom_slug: link.custom_slug,
            click_count: link.click_count,
            last_accessed_at: link.last_accessed_at,
            active: link.active,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }

    /// Maybe create link from `SQLx` version
    pub fn from_sqlx_link_optional(link: Option<SqlxLink>) -> Option<Self> {
        link.map(Self::from_sqlx_link)
    }

    /// Create multiple links from `SQLx` version
    pub fn from_sqlx_link_multiple(links: Vec<SqlxLink>) -> Vec<Self> {
        links.into_iter().map(Self::from_sqlx_link).collect()
    }
}
