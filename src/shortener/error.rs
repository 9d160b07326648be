use thiserror::Error;

use crate::database;

/// Everything that can go wrong while managing or resolving links
#[derive(Debug, Error)]
pub enum LinkError {
    /// The plan of the user does not allow shortening
    #[error("Only premium accounts can shorten links")]
    PlanRequired,

    /// The destination is not a well-formed URI
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The slug contains characters outside of `[A-Za-z0-9_-]`, or is empty
    #[error("Slug can only contain letters, digits, dashes and underscores")]
    InvalidSlugFormat,

    /// The slug is used by another link
    #[error("Slug is already in use")]
    SlugConflict,

    /// Every generated candidate was taken
    #[error("Could not find a free slug in {0} attempts")]
    SlugExhausted(usize),

    /// The user has as many links as the plan permits
    #[error("Link limit reached")]
    QuotaExceeded,

    /// Either the link does not exist or it belongs to someone else
    #[error("Link not found or not yours")]
    NotFoundOrForbidden,

    /// A unique index of the storage rejected a write
    #[error("Duplicate key: {0}")]
    DuplicateKey(&'static str),

    /// The storage could not be reached
    #[error("Storage unavailable: {0}")]
    StoreUnavailable(String),
}

impl LinkError {
    /// Stable, machine-checkable name of the error
    pub fn kind(&self) -> &'static str {
        match self {
            LinkError::PlanRequired => "plan_required",
            LinkError::InvalidUrl(_) => "invalid_url",
            LinkError::InvalidSlugFormat => "invalid_slug_format",
            LinkError::SlugConflict => "slug_conflict",
            LinkError::SlugExhausted(_) => "slug_exhausted",
            LinkError::QuotaExceeded => "quota_exceeded",
            LinkError::NotFoundOrForbidden => "not_found_or_forbidden",
            LinkError::DuplicateKey(_) => "duplicate_key",
            LinkError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl From<database::Error> for LinkError {
    fn from(err: database::Error) -> Self {
        match err {
            database::Error::DuplicateKey(field) => LinkError::DuplicateKey(field),
            database::Error::Connection(message) => LinkError::StoreUnavailable(message),
        }
    }
}
