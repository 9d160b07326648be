//! Slug generation, validation and the uniqueness check
//!
//! Generated slugs aim for collision resistance, not unguessability

use std::sync::LazyLock;

use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;

use crate::database;
use crate::database::Storage;

/// Length of slugs generated on request of the user
pub const RANDOM_SLUG_LENGTH: usize = 8;

/// Length of identifiers generated when the user does not care
pub const DEFAULT_ID_LENGTH: usize = 10;

/// Maximum amount of candidates to try before giving up
pub const MAX_ATTEMPTS: usize = 20;

/// Pattern every identifier has to match
static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Valid slug pattern"));

/// How a system-generated identifier is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// [`RANDOM_SLUG_LENGTH`] characters from the 62-character alphanumeric alphabet
    Random,

    /// [`DEFAULT_ID_LENGTH`] characters from the URL-safe `A-Za-z0-9_-` alphabet
    Default,
}

impl Strategy {
    /// Draw a single candidate
    pub fn generate(self) -> String {
        match self {
            Strategy::Random => generate_random(RANDOM_SLUG_LENGTH),
            Strategy::Default => nanoid::nanoid!(DEFAULT_ID_LENGTH),
        }
    }
}

/// Draw `length` characters uniformly from `[A-Za-z0-9]`
pub fn generate_random(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Is the user supplied slug non-empty and made of `[A-Za-z0-9_-]` only?
pub fn validate_custom(candidate: &str) -> bool {
    SLUG_PATTERN.is_match(candidate)
}

/// Is the identifier already used by any link?
///
/// Only a fast path, the unique index of the storage has the final say
pub async fn is_taken(storage: &dyn Storage, identifier: &str) -> database::Result<bool> {
    storage
        .find_single_link_by_identifier(identifier)
        .await
        .map(|link| link.is_some())
}
