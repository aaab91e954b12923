pub mod rest;

pub use rest::RestResourceGateway;
