//! Shared helpers for the Depot admin crates.
//!
//! - [`humantime_serde`]: `"15s"` / `"2m 30s"` durations in config files
//! - [`SecretString`]: redacted, zeroized holder for passwords and tokens

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

#[cfg(feature = "humantime-serde")]
pub mod humantime_serde;
pub mod secret_string;

pub use secret_string::SecretString;
