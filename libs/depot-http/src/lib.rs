#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP client used by the Depot admin gateway
//!
//! A hyper-based client wrapped in a small tower stack:
//! - TLS via rustls (HTTPS only unless insecure HTTP is explicitly allowed)
//! - Connection pooling
//! - A bounded per-request timeout (15 seconds by default)
//! - `User-Agent` and `Accept` header injection
//! - Transparent response decompression (gzip, brotli, deflate)
//! - JSON, form, query-string and `multipart/form-data` request bodies
//!
//! The client never retries. A failed request is reported once and the caller
//! decides what to do with it.
//!
//! # Example
//!
//! ```ignore
//! use depot_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(15))
//!     .user_agent("depot-admin/0.3")
//!     .build()?;
//!
//! let employees: Vec<serde_json::Value> = client
//!     .get("https://depot.example.com/api/employees/get-employees")
//!     .bearer_auth(token)
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod multipart;
mod request;
mod response;
pub mod security;
mod tls;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_USER_AGENT, HttpClientConfig, TlsRootConfig, TransportSecurity};
pub use error::{HttpError, InvalidUriKind};
pub use layers::{DefaultHeadersLayer, DefaultHeadersService};
pub use multipart::{Multipart, Part};
pub use request::RequestBuilder;
pub use response::{HttpResponse, ResponseBody};
