//! Links

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

/// A shortened URL
#[derive(Clone, Debug)]
pub struct Link {
    /// Link ID
    pub id: Uuid,

    /// The routable slug, unique and case-sensitive
    pub identifier: String,

    /// Location the link redirects to
    pub destination_url: String,

    /// The ID of the owning user, `None` for links that are not user-owned
    pub owner_id: Option<Uuid>,

    /// Set only when the identifier was chosen by the user
    ///
    /// Absence means "no custom slug", it is never stored as an empty string
    pub custom_slug: Option<String>,

    /// Amount of successful redirects
    pub click_count: i64,

    /// Last successful redirect
    pub last_accessed_at: Option<DateTime<Utc>>,

    /// Disabled links are not redirected
    pub active: bool,

    /// Creation date
    pub created_at: DateTime<Utc>,

    /// Last updated at
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Does the given user own this link?
    pub fn is_owned_by(&self, user_id: &Uuid) -> bool {
        self.owner_id.as_ref() == Some(user_id)
    }
}
