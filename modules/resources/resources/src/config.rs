//! Configuration for the resources module.

use std::time::Duration;

use depot_http::{DEFAULT_USER_AGENT, HttpClientConfig, TransportSecurity};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Configuration errors detected before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid base_url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error(
        "base_url '{url}' uses plain HTTP; set allow_insecure_http or use https://"
    )]
    InsecureBaseUrl { url: String },

    #[error("HTTP client setup failed: {0}")]
    Http(String),
}

/// `resources` section of the application config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ResourcesConfig {
    /// Backend root, e.g. `https://depot.example.com/`. API paths are
    /// resolved relative to it.
    pub base_url: String,

    /// Per-request timeout. Default: `15s`
    #[serde(with = "depot_utils::humantime_serde")]
    pub request_timeout: Duration,

    pub user_agent: String,

    /// Permit `http://` base URLs on non-loopback hosts.
    pub allow_insecure_http: bool,

    /// Response body limit in bytes. Default: 10 MiB
    pub max_body_size: usize,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_owned(),
            request_timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            allow_insecure_http: false,
            max_body_size: 10 * 1024 * 1024,
        }
    }
}

impl ResourcesConfig {
    /// Parsed base URL, normalized to end with `/`.
    ///
    /// Plain HTTP is accepted for loopback hosts, or anywhere when
    /// `allow_insecure_http` is set.
    ///
    /// # Errors
    /// `InvalidBaseUrl` for unparsable, relative or non-HTTP URLs;
    /// `InsecureBaseUrl` for disallowed `http://` URLs.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: reason.to_owned(),
        };

        let mut url = Url::parse(self.base_url.trim()).map_err(|e| invalid(&e.to_string()))?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(invalid("not an absolute URL with a host"));
        }
        match url.scheme() {
            "https" => {}
            "http" if self.allow_insecure_http || is_loopback(&url) => {}
            "http" => {
                return Err(ConfigError::InsecureBaseUrl {
                    url: self.base_url.clone(),
                });
            }
            _ => return Err(invalid("scheme must be http or https")),
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    /// HTTP client settings derived from this section.
    ///
    /// # Errors
    /// Same as [`base_url`](Self::base_url).
    pub fn http_config(&self) -> Result<HttpClientConfig, ConfigError> {
        let base = self.base_url()?;
        let transport = if base.scheme() == "http" {
            TransportSecurity::AllowInsecureHttp
        } else {
            TransportSecurity::TlsOnly
        };
        Ok(HttpClientConfig {
            request_timeout: self.request_timeout,
            max_body_size: self.max_body_size,
            user_agent: self.user_agent.clone(),
            transport,
            ..HttpClientConfig::default()
        })
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
