//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::Mutex;
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

/// An in-memory storage
///
/// Every operation holds the lock of its collection for its whole duration, which makes each
/// of them atomic per collection
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All users in storage
    users: Arc<Mutex<HashMap<Uuid, User>>>,

    /// All links in storage
    links: Arc<Mutex<HashMap<Uuid, Link>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

/// Check the unique indexes of links, ignoring the link with `except` as ID
fn check_link_uniqueness(
    links: &HashMap<Uuid, Link>,
    identifier: &str,
    custom_slug: Option<&str>,
    except: Option<&Uuid>,
) -> Result<()> {
    for link in links.values() {
        if Some(&link.id) == except {
            continue;
        }

        if link.identifier == identifier {
            return Err(Error::DuplicateKey("identifier"));
        }

        if custom_slug.is_some() && link.custom_slug.as_deref() == custom_slug {
            return Err(Error::DuplicateKey("custom_slug"));
        }
    }

    Ok(())
}

#[async_trait]
impl Storage for Memory {
    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(id).cloned())
    }

    async fn find_single_user_by_login(&self, login: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.username == login || user.email == login)
            .cloned())
    }

    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User> {
        let mut users = self.users.lock().await;

        for user in users.values() {
            if user.username == values.username {
                return Err(Error::DuplicateKey("username"));
            }

            if user.email == values.email {
                return Err(Error::DuplicateKey("email"));
            }
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            session_id: *values.session_id,
            username: values.username.to_string(),
            email: values.email.to_string(),
            full_name: values.full_name.to_string(),
            hashed_password: values.hashed_password.to_string(),
            active: true,
            plan: values.plan,
            premium_expiry: None,
            link_count: 0,
            max_links: values.max_links,
            created_at: now,
            updated_at: now,
        };

        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn change_plan(&self, user: &User, values: &ChangePlanValues) -> Result<User> {
        self.users
            .lock()
            .await
            .get_mut(&user.id)
            .map(|user| {
                user.plan = values.plan;
                user.max_links = values.max_links;
                user.premium_expiry = values.premium_expiry;
                user.updated_at = Utc::now();

                user.clone()
            })
            .ok_or_else(|| Error::Connection(format!("User {} vanished", user.id)))
    }

    async fn adjust_link_count(&self, user_id: &Uuid, delta: i64) -> Result<()> {
        if let Some(user) = self.users.lock().await.get_mut(user_id) {
            user.link_count += delta;
        }

        Ok(())
    }

    async fn find_single_link_by_identifier(&self, identifier: &str) -> Result<Option<Link>> {
        Ok(self
            .links
            .lock()
            .await
            .values()
            .find(|link| link.identifier == identifier)
            .cloned())
    }

    async fn find_links_by_owner(&self, owner_id: &Uuid, page: Page) -> Result<Vec<Link>> {
        let mut links = self
            .links
            .lock()
            .await
            .values()
            .filter(|link| link.is_owned_by(owner_id))
            .cloned()
            .collect::<Vec<Link>>();

        links.sort_by_key(|link| Reverse(link.created_at));

        Ok(links
            .into_iter()
            .skip(page.offset())
            .take(page.size as usize)
            .collect())
    }

    async fn count_links_by_owner(&self, owner_id: &Uuid) -> Result<u64> {
        Ok(self
            .links
            .lock()
            .await
            .values()
            .filter(|link| link.is_owned_by(owner_id))
            .count() as u64)
    }

    async fn create_link(&self, values: &CreateLinkValues<'_>) -> Result<Link> {
        let mut links = self.links.lock().await;

        check_link_uniqueness(&links, values.identifier, values.custom_slug, None)?;

        let now = Utc::now();
        let link = Link {
            id: Uuid::new_v4(),
            identifier: values.identifier.to_string(),
            destination_url: values.destination_url.to_string(),
            owner_id: values.owner_id.copied(),
            custom_slug: values.custom_slug.map(ToString::to_string),
            click_count: 0,
            last_accessed_at: None,
            active: true,
            created_at: now,
            updated_at: now,
        };

        links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn update_link(&self, link: &Link, values: &UpdateLinkValues<'_>) -> Result<Link> {
        let mut links = self.links.lock().await;

        if let Some(identifier) = values.identifier {
            check_link_uniqueness(&links, identifier, Some(identifier), Some(&link.id))?;
        }

        let stored = links
            .get_mut(&link.id)
            .ok_or_else(|| Error::Connection(format!("Link {} vanished", link.id)))?;

        if let Some(identifier) = values.identifier {
            stored.identifier = identifier.to_string();
            stored.custom_slug = Some(identifier.to_string());
        }

        if let Some(active) = values.active {
            stored.active = active;
        }

        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete_link(&self, link: &Link) -> Result<()> {
        self.links.lock().await.remove(&link.id);

        Ok(())
    }

    async fn record_click(&self, identifier: &str, at: DateTime<Utc>) -> Result<Option<Link>> {
        Ok(self
            .links
            .lock()
            .await
            .values_mut()
            .find(|link| link.identifier == identifier && link.active)
            .map(|link| {
                link.click_count += 1;
                link.last_accessed_at = Some(link.last_accessed_at.map_or(at, |last| last.max(at)));

                link.clone()
            }))
    }
}
