//! Resources Module Implementation
//!
//! Generic list controllers, detail presenters, the session context and the
//! REST gateway for the Depot logistics backend. Contracts and models live in
//! `resources-sdk` and are re-exported here.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub use resources_sdk::{
    ResourceError, ResourceGateway, ResourceId, ResourceKind, SessionGateway,
};

pub mod config;
pub mod domain;
pub mod infra;

pub use config::{ConfigError, ResourcesConfig};
pub use domain::{
    DetailPresenter, ListController, ListSnapshot, LoadState, Notifier, SessionContext,
    TracingNotifier, load_dashboard,
};
pub use infra::RestResourceGateway;
