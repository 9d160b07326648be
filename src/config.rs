//! Configuration from the environment

use std::env::var;
use std::net::SocketAddr;

use anyhow::Result;

const DEFAULT_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Get the value of ENV var, or a default
///
/// Only when:
/// - It is set
/// - It is not empty
pub fn env_var_or_else<F>(var_name: &'static str, or_else: F) -> String
where
    F: FnOnce() -> String,
{
    match var(var_name) {
        Ok(value) if !value.is_empty() => value,
        _ => or_else(),
    }
}

/// Settings shared with the handlers
#[derive(Clone, Debug)]
pub struct Settings {
    /// Public base of every short URL, without trailing slash
    base_url: String,
}

impl Settings {
    /// Create settings with the given base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Read the settings from `BASE_URL`
    pub fn from_env() -> Self {
        let base_url = env_var_or_else("BASE_URL", || {
            tracing::info!("`BASE_URL` is not set, using {DEFAULT_BASE_URL}");
            DEFAULT_BASE_URL.to_string()
        });

        Self::new(&base_url)
    }

    /// The full short URL of an identifier
    pub fn short_url(&self, identifier: &str) -> String {
        format!("{}/{identifier}", self.base_url)
    }
}

/// Address to listen on, from `ADDRESS` with an optional `PORT` override
pub fn address() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || DEFAULT_ADDRESS.to_string()).parse::<SocketAddr>()?;

    let port = env_var_or_else("PORT", String::new);
    if !port.is_empty() {
        address.set_port(port.parse::<u16>()?);
    }

    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_url() {
        let settings = Settings::new("https://sho.rt/");
        assert_eq!("https://sho.rt/abc", settings.short_url("abc"));

        let settings = Settings::new("https://example.com/s");
        assert_eq!("https://example.com/s/my-link", settings.short_url("my-link"));
    }
}
