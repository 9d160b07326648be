//! Links API endpoints
//!
//! Everything related to shortening and managing links of the current user

use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::config::Settings;
use crate::database::Database;
use crate::database::Page;
use crate::links::Link;
use crate::shortener;
use crate::shortener::CreateLink;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::QueryParameters;
use super::Success;

/// Default amount of links on a page
const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum amount of links on a page
const MAX_PAGE_SIZE: u32 = 100;

/// Link response going to the user
///
/// Basically filtering which fields are shown to the user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    /// Where the link redirects to
    pub original_url: String,

    /// Full short URL
    pub short_url: String,

    /// The identifier
    pub url_id: String,

    /// The custom slug, only for user chosen identifiers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_slug: Option<String>,

    /// Amount of redirects
    pub clicks: i64,

    /// Is the link redirecting?
    pub active: bool,

    /// Creation date
    pub created_at: DateTime<Utc>,

    /// Last redirect
    pub last_accessed: Option<DateTime<Utc>>,
}

impl LinkResponse {
    /// Create a response from a [`Link`](Link)
    fn from_link(settings: &Settings, link: Link) -> Self {
        Self {
            short_url: settings.short_url(&link.identifier),
            original_url: link.destination_url,
            url_id: link.identifier,
            custom_slug: link.custom_slug,
            clicks: link.click_count,
            active: link.active,
            created_at: link.created_at,
            last_accessed: link.last_accessed_at,
        }
    }
}

/// Click statistics of a single link
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub original_url: String,
    pub short_url: String,
    pub clicks: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_accessed: Option<DateTime<Utc>>,
}

/// Pagination details of a listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_links: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    fn new(page: Page, total_links: u64) -> Self {
        let total_pages = total_links.div_ceil(u64::from(page.size));

        Self {
            page: page.number,
            page_size: page.size,
            total_links,
            total_pages,
            has_next: u64::from(page.number) < total_pages,
            has_prev: page.number > 1,
        }
    }
}

/// A page of links
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkResponse>,
    pub pagination: Pagination,
}

/// Query parameters for listing links
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// 1-indexed page number
    page: Option<u32>,

    /// Amount of links on a page, at most 100
    page_size: Option<u32>,
}

impl ListQuery {
    fn page(&self) -> Page {
        Page {
            number: self.page.unwrap_or(1).max(1),
            size: self
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }
}

/// Shorten form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenForm {
    /// URL to shorten
    original_url: String,

    /// Identifier chosen by the user
    custom_slug: Option<String>,

    /// Generate a random identifier, even when a custom slug is given
    use_random_slug: Option<bool>,
}

/// Shorten a URL, premium only
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "originalUrl": "https://www.example.com/", "customSlug": "example" }' \
///     http://localhost:3000/api/shorten
/// ```
///
/// Response:
/// ```json
/// { "success": true, "data": { "originalUrl": "https://www.example.com/", "urlId": "example" } }
/// ```
pub async fn shorten(
    Extension(database): Extension<Database>,
    Extension(settings): Extension<Settings>,
    current_user: CurrentUser,
    Form(form): Form<ShortenForm>,
) -> Result<Success<LinkResponse>, Error> {
    let request = CreateLink {
        destination_url: &form.original_url,
        custom_slug: form.custom_slug.as_deref(),
        use_random_slug: form.use_random_slug.unwrap_or(false),
    };

    let link = shortener::create_link(&*database, &current_user, &request).await?;

    Ok(Success::ok(LinkResponse::from_link(&settings, link)))
}

/// Update slug form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlugForm {
    /// The new identifier
    new_slug: Option<String>,
}

/// Change the identifier of a link
///
/// Request:
/// ```sh
/// curl -v -XPUT -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "newSlug": "better-name" }' \
///     http://localhost:3000/api/update-slug/<urlId>
/// ```
pub async fn update_slug(
    Extension(database): Extension<Database>,
    Extension(settings): Extension<Settings>,
    current_user: CurrentUser,
    PathParameters(url_id): PathParameters<String>,
    Form(form): Form<UpdateSlugForm>,
) -> Result<Success<LinkResponse>, Error> {
    let new_slug = form
        .new_slug
        .filter(|new_slug| !new_slug.is_empty())
        .ok_or_else(|| Error::bad_request("New slug is required"))?;

    let link = shortener::update_slug(&*database, &current_user, &url_id, &new_slug).await?;

    Ok(Success::ok(LinkResponse::from_link(&settings, link)))
}

/// List the links of the current user, newest first
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     'http://localhost:3000/api/urls?page=1&pageSize=20'
/// ```
pub async fn list(
    Extension(database): Extension<Database>,
    Extension(settings): Extension<Settings>,
    current_user: CurrentUser,
    QueryParameters(query): QueryParameters<ListQuery>,
) -> Result<Success<LinkListResponse>, Error> {
    let page = query.page();

    let (links, total_links) = shortener::list_links(&*database, &current_user, page).await?;

    Ok(Success::ok(LinkListResponse {
        links: links
            .into_iter()
            .map(|link| LinkResponse::from_link(&settings, link))
            .collect(),
        pagination: Pagination::new(page, total_links),
    }))
}

/// Click statistics of a link
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:3000/api/stats/<urlId>
/// ```
pub async fn stats(
    Extension(database): Extension<Database>,
    Extension(settings): Extension<Settings>,
    current_user: CurrentUser,
    PathParameters(url_id): PathParameters<String>,
) -> Result<Success<StatsResponse>, Error> {
    let link = shortener::find_owned_link(&*database, &current_user, &url_id).await?;

    Ok(Success::ok(StatsResponse {
        short_url: settings.short_url(&link.identifier),
        original_url: link.destination_url,
        clicks: link.click_count,
        active: link.active,
        created_at: link.created_at,
        last_accessed: link.last_accessed_at,
    }))
}

/// Enable or disable a link
///
/// Request:
/// ```sh
/// curl -v -XPUT -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:3000/api/urls/<urlId>/toggle-status
/// ```
pub async fn toggle_status(
    Extension(database): Extension<Database>,
    Extension(settings): Extension<Settings>,
    current_user: CurrentUser,
    PathParameters(url_id): PathParameters<String>,
) -> Result<Success<LinkResponse>, Error> {
    let link = shortener::toggle_status(&*database, &current_user, &url_id).await?;

    Ok(Success::ok(LinkResponse::from_link(&settings, link)))
}

/// Response of a deleted link
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub url_id: String,
}

/// Delete a link
///
/// Request:
/// ```sh
/// curl -v -XDELETE -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:3000/api/urls/<urlId>
/// ```
pub async fn delete(
    Extension(database): Extension<Database>,
    current_user: CurrentUser,
    PathParameters(url_id): PathParameters<String>,
) -> Result<Success<DeletedResponse>, Error> {
    shortener::delete_link(&*database, &current_user, &url_id).await?;

    Ok(Success::ok(DeletedResponse { url_id }))
}
