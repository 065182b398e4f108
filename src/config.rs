use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Base URL every endpoint path is appended to.
pub const BASE_URL: &str = "https://api.groupme.com/v3";

/// Environment variable holding the access token.
pub const TOKEN_VAR: &str = "GROUPME_TOKEN";

/// Optional override of [`BASE_URL`], mostly for pointing at a stub server.
pub const BASE_URL_VAR: &str = "GROUPME_API_URL";

/// Optional request timeout in whole seconds.
pub const TIMEOUT_VAR: &str = "GROUPME_TIMEOUT_SECS";

/// Settings fixed for the lifetime of an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub access_token: String,
    /// Deadline applied to every in-flight request.
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(access_token: impl Into<String>) -> Self {
        Config {
            base_url: default_base_url(),
            access_token: access_token.into(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read the token from `GROUPME_TOKEN`, plus the optional base URL and
    /// timeout overrides.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_VAR).unwrap_or_default();
        if token.is_empty() {
            return Err(Error::Config(format!(
                "access token environment variable '{TOKEN_VAR}' is not set"
            )));
        }
        Self::from_parts(
            token,
            std::env::var(BASE_URL_VAR).ok().as_deref(),
            std::env::var(TIMEOUT_VAR).ok().as_deref(),
        )
    }

    /// Assemble a config from raw string settings as found in the
    /// environment. Empty overrides are ignored.
    pub fn from_parts(token: String, base_url: Option<&str>, timeout_secs: Option<&str>) -> Result<Self> {
        let mut config = Config::new(token);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            config = config.with_base_url(url)?;
        }
        if let Some(secs) = timeout_secs.filter(|s| !s.is_empty()) {
            let secs: u64 = secs
                .parse()
                .map_err(|_| Error::Config(format!("'{TIMEOUT_VAR}' must be whole seconds, got {secs:?}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

fn default_base_url() -> Url {
    Url::parse(BASE_URL).expect("BASE_URL is a valid URL")
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::Config(format!("invalid base URL {raw:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("base URL {raw:?} cannot carry a path")));
    }
    Ok(url)
}
