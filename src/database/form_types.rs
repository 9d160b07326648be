//! Form types

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::users::Plan;

/// Values to create a User
pub struct CreateUserValues<'a> {
    /// The initial session ID for the user
    pub session_id: &'a Uuid,

    /// The username
    pub username: &'a str,

    /// The email address, already lower-cased
    pub email: &'a str,

    /// The full name
    pub full_name: &'a str,

    /// The hashed password
    pub hashed_password: &'a str,

    /// The initial plan
    pub plan: Plan,

    /// The link quota
    pub max_links: i64,
}

/// Values to change the plan of a user
pub struct ChangePlanValues {
    /// The new plan
    pub plan: Plan,

    /// The link quota matching the plan
    pub max_links: i64,

    /// When the plan falls back to free, if ever
    pub premium_expiry: Option<DateTime<Utc>>,
}

/// Values to create a Link
pub struct CreateLinkValues<'a> {
    /// The owner, `None` for links that are not user-owned
    pub owner_id: Option<&'a Uuid>,

    /// The routable slug
    pub identifier: &'a str,

    /// The URL the link redirects to, exactly as supplied
    pub destination_url: &'a str,

    /// Only set for user-chosen identifiers
    pub custom_slug: Option<&'a str>,
}

/// Values to update a Link
///
/// Fields that are `None` are not touched
#[derive(Default)]
pub struct UpdateLinkValues<'a> {
    /// New identifier, also becomes the custom slug
    pub identifier: Option<&'a str>,

    /// New active state
    pub active: Option<bool>,
}

/// A page of results
#[derive(Clone, Copy, Debug)]
pub struct Page {
    /// 1-indexed page number
    pub number: u32,

    /// Amount of items on a page
    pub size: u32,
}

impl Page {
    /// Amount of items to skip to reach this page
    pub fn offset(&self) -> usize {
        (self.number.saturating_sub(1) as usize) * self.size as usize
    }
}
