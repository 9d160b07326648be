//! Link lifecycle: creation, slug updates, status changes and deletion
//!
//! Every operation is a straight sequence of storage calls, the storage's per-record atomicity
//! and unique indexes are the only synchronization.

use url::Url;
use uuid::Uuid;

pub use error::LinkError;
pub use redirect::resolve;

use crate::database;
use crate::database::CreateLinkValues;
use crate::database::Page;
use crate::database::Storage;
use crate::database::UpdateLinkValues;
use crate::links::Link;
use crate::slugs;
use crate::slugs::Strategy;
use crate::users::User;

mod error;
mod redirect;

/// Everything needed to create a link
#[derive(Debug, Default)]
pub struct CreateLink<'a> {
    /// Where the link should go
    pub destination_url: &'a str,

    /// User chosen identifier, ignored when empty
    pub custom_slug: Option<&'a str>,

    /// Generate a random 8 character identifier, takes precedence over `custom_slug`
    pub use_random_slug: bool,
}

/// Create a link for a user
///
/// Steps, in order: plan check, URL validation, quota check, identifier resolution, insert and
/// finally the best-effort increment of the owner's link counter
pub async fn create_link(
    storage: &dyn Storage,
    user: &User,
    request: &CreateLink<'_>,
) -> Result<Link, LinkError> {
    if !user.plan.can_shorten() {
        return Err(LinkError::PlanRequired);
    }

    parse_destination_url(request.destination_url)?;
    let destination_url = request.destination_url;

    if user.has_reached_quota() {
        return Err(LinkError::QuotaExceeded);
    }

    let custom_slug = request.custom_slug.filter(|slug| !slug.is_empty());

    let link = match (request.use_random_slug, custom_slug) {
        (true, _) => {
            insert_generated(storage, &user.id, destination_url, || {
                Strategy::Random.generate()
            })
            .await?
        }
        (false, Some(custom_slug)) => {
            insert_custom(storage, &user.id, destination_url, custom_slug).await?
        }
        (false, None) => {
            insert_generated(storage, &user.id, destination_url, || {
                Strategy::Default.generate()
            })
            .await?
        }
    };

    adjust_owner_link_count(storage, &user.id, 1).await;

    tracing::debug!(
        r#"Link "{}" created for user {}: {}"#,
        link.identifier,
        user.id,
        link.destination_url
    );

    Ok(link)
}

/// Change the identifier of a link owned by the user
///
/// The new identifier becomes the custom slug of the link
pub async fn update_slug(
    storage: &dyn Storage,
    user: &User,
    identifier: &str,
    new_slug: &str,
) -> Result<Link, LinkError> {
    if !slugs::validate_custom(new_slug) {
        return Err(LinkError::InvalidSlugFormat);
    }

    if new_slug != identifier && slugs::is_taken(storage, new_slug).await? {
        return Err(LinkError::SlugConflict);
    }

    let link = find_owned_link(storage, user, identifier).await?;

    let values = UpdateLinkValues {
        identifier: Some(new_slug),
        ..UpdateLinkValues::default()
    };

    let updated_link = storage
        .update_link(&link, &values)
        .await
        .map_err(slug_conflict_on_duplicate)?;

    tracing::debug!(r#"Link "{identifier}" renamed to "{new_slug}""#);

    Ok(updated_link)
}

/// Flip the active flag of a link owned by the user
pub async fn toggle_status(
    storage: &dyn Storage,
    user: &User,
    identifier: &str,
) -> Result<Link, LinkError> {
    let link = find_owned_link(storage, user, identifier).await?;

    let values = UpdateLinkValues {
        active: Some(!link.active),
        ..UpdateLinkValues::default()
    };

    Ok(storage.update_link(&link, &values).await?)
}

/// Delete a link owned by the user, giving back one link of quota
pub async fn delete_link(
    storage: &dyn Storage,
    user: &User,
    identifier: &str,
) -> Result<(), LinkError> {
    let link = find_owned_link(storage, user, identifier).await?;

    storage.delete_link(&link).await?;

    if let Some(owner_id) = &link.owner_id {
        adjust_owner_link_count(storage, owner_id, -1).await;
    }

    tracing::debug!(r#"Link "{identifier}" deleted"#);

    Ok(())
}

/// A page of links of the user, with the total amount of links
pub async fn list_links(
    storage: &dyn Storage,
    user: &User,
    page: Page,
) -> Result<(Vec<Link>, u64), LinkError> {
    let links = storage.find_links_by_owner(&user.id, page).await?;
    let total = storage.count_links_by_owner(&user.id).await?;

    Ok((links, total))
}

/// Find a link by identifier, scoped to its owner
///
/// "Does not exist" and "not yours" are indistinguishable on purpose, so non-owners can not
/// probe for existing slugs
pub async fn find_owned_link(
    storage: &dyn Storage,
    user: &User,
    identifier: &str,
) -> Result<Link, LinkError> {
    storage
        .find_single_link_by_identifier(identifier)
        .await?
        .filter(|link| link.is_owned_by(&user.id))
        .ok_or(LinkError::NotFoundOrForbidden)
}

/// Parse and validate a destination URL
///
/// Links store the supplied string, the parsed form only proves it is well-formed
pub fn parse_destination_url(url: &str) -> Result<Url, LinkError> {
    Url::parse(url).map_err(|err| LinkError::InvalidUrl(err.to_string()))
}

/// Insert a link with a user chosen identifier
///
/// The lookup is only a fast path, a duplicate key from the insert closes the race between two
/// requests claiming the same slug
async fn insert_custom(
    storage: &dyn Storage,
    owner_id: &Uuid,
    destination_url: &str,
    custom_slug: &str,
) -> Result<Link, LinkError> {
    if !slugs::validate_custom(custom_slug) {
        return Err(LinkError::InvalidSlugFormat);
    }

    if slugs::is_taken(storage, custom_slug).await? {
        return Err(LinkError::SlugConflict);
    }

    let values = CreateLinkValues {
        owner_id: Some(owner_id),
        identifier: custom_slug,
        destination_url,
        custom_slug: Some(custom_slug),
    };

    storage
        .create_link(&values)
        .await
        .map_err(slug_conflict_on_duplicate)
}

/// Insert a link with a generated identifier, trying at most [`slugs::MAX_ATTEMPTS`] candidates
///
/// Generated identifiers never get a custom slug
async fn insert_generated<G>(
    storage: &dyn Storage,
    owner_id: &Uuid,
    destination_url: &str,
    mut generate: G,
) -> Result<Link, LinkError>
where
    G: FnMut() -> String + Send,
{
    for _ in 0..slugs::MAX_ATTEMPTS {
        let candidate = generate();

        if slugs::is_taken(storage, &candidate).await? {
            tracing::debug!(r#"Generated slug "{candidate}" is taken, retrying"#);
            continue;
        }

        let values = CreateLinkValues {
            owner_id: Some(owner_id),
            identifier: &candidate,
            destination_url,
            custom_slug: None,
        };

        match storage.create_link(&values).await {
            Ok(link) => return Ok(link),
            Err(database::Error::DuplicateKey(_)) => {
                tracing::debug!(r#"Generated slug "{candidate}" got claimed, retrying"#);
            }
            Err(err) => return Err(err.into()),
        }
    }

    tracing::warn!("No free slug found in {} attempts", slugs::MAX_ATTEMPTS);

    Err(LinkError::SlugExhausted(slugs::MAX_ATTEMPTS))
}

/// Adjust the link counter of the owner, failures are logged and otherwise ignored
async fn adjust_owner_link_count(storage: &dyn Storage, owner_id: &Uuid, delta: i64) {
    if let Err(err) = storage.adjust_link_count(owner_id, delta).await {
        tracing::error!("Could not adjust link count of user {owner_id} by {delta}: {err}");
    }
}

/// Turn a storage duplicate key into a slug conflict
fn slug_conflict_on_duplicate(err: database::Error) -> LinkError {
    match err {
        database::Error::DuplicateKey(_) => LinkError::SlugConflict,
        err => err.into(),
    }
}
