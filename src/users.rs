use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Link quota of the free plan
pub const FREE_MAX_LINKS: i64 = 100;

/// Link quota of the premium plan
pub const PREMIUM_MAX_LINKS: i64 = 10_000;

/// Subscription plans
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Plan {
    /// Can manage existing links, can not shorten
    Free,
    /// Can shorten links
    Premium,
}

impl Plan {
    /// The maximum amount of links a plan permits
    pub fn max_links(self) -> i64 {
        match self {
            Plan::Free => FREE_MAX_LINKS,
            Plan::Premium => PREMIUM_MAX_LINKS,
        }
    }

    /// Is this plan allowed to shorten URLs?
    pub fn can_shorten(self) -> bool {
        matches!(self, Plan::Premium)
    }
}

#[derive(Clone, Debug)]
pub struct User {
    pub id: Uuid,
    pub session_id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub hashed_password: String,
    pub active: bool,
    pub plan: Plan,
    pub premium_expiry: Option<DateTime<Utc>>,
    pub link_count: i64,
    pub max_links: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Has the user used up their link quota?
    pub fn has_reached_quota(&self) -> bool {
        self.link_count >= self.max_links
    }

    /// Is the premium plan of this user past its expiry date?
    pub fn is_premium_expired(&self, now: DateTime<Utc>) -> bool {
        self.plan == Plan::Premium && self.premium_expiry.is_some_and(|expiry| expiry < now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn user(plan: Plan, link_count: i64) -> User {
        let now = Utc::now();

        User {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            username: "someone".to_string(),
            email: "someone@example.com".to_string(),
            full_name: "Some One".to_string(),
            hashed_password: String::new(),
            active: true,
            plan,
            premium_expiry: None,
            link_count,
            max_links: plan.max_links(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_quota() {
        assert!(!user(Plan::Free, 99).has_reached_quota());
        assert!(user(Plan::Free, 100).has_reached_quota());
        assert!(!user(Plan::Premium, 100).has_reached_quota());
    }

    #[test]
    fn test_premium_expiry() {
        let now = Utc::now();

        let mut premium = user(Plan::Premium, 0);
        assert!(!premium.is_premium_expired(now));

        premium.premium_expiry = Some(now + Duration::days(1));
        assert!(!premium.is_premium_expired(now));

        premium.premium_expiry = Some(now - Duration::days(1));
        assert!(premium.is_premium_expired(now));

        let mut free = user(Plan::Free, 0);
        free.premium_expiry = Some(now - Duration::days(1));
        assert!(!free.is_premium_expired(now));
    }
}
