//! The root!
//!
//! Public redirects from a short URL to its destination

use axum::Extension;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::LOCATION;

use crate::api::Error;
use crate::api::PathParameters;
use crate::database::Database;
use crate::shortener;

/// Redirect an identifier to its destination
///
/// Every successful redirect counts as a click, unknown and inactive identifiers give a
/// `404 Not Found` without touching any link
pub async fn root(
    Extension(database): Extension<Database>,
    PathParameters(url_id): PathParameters<String>,
) -> Result<(StatusCode, HeaderMap), Error> {
    tracing::debug!("Looking for slug: /{url_id}");

    let destination_url = shortener::resolve(&*database, &url_id).await?;

    let Some(destination_url) = destination_url else {
        tracing::debug!(r#"Slug "{url_id}" not found"#);

        return Err(Error::not_found("URL does not exist"));
    };

    tracing::debug!(r#"Slug "{url_id}" redirecting to: {destination_url}"#);

    // raw only when it is plain visible ASCII
    let location = match HeaderValue::from_str(&destination_url) {
        Ok(location) if location.to_str().is_ok() => location,
        _ => serialized_location(&destination_url)?,
    };

    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, location);

    Ok((StatusCode::FOUND, headers))
}

/// Percent-encoded form of a destination that can not go in a header as supplied
fn serialized_location(destination_url: &str) -> Result<HeaderValue, Error> {
    let url = shortener::parse_destination_url(destination_url)?;

    HeaderValue::from_str(url.as_str())
        .map_err(|err| Error::internal_server_error("Invalid destination").with_description(err))
}

/// Anything that is not a single slug
pub async fn not_found() -> Error {
    Error::not_found("URL does not exist")
}
