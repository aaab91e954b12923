//! REST gateway for the Depot backend.

pub mod error;
pub mod gateway;
pub mod routes;

pub use gateway::RestResourceGateway;
