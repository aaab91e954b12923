//! Human readable `Duration` fields for serde.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Timeouts {
//!     #[serde(with = "depot_utils::humantime_serde")]
//!     request: Duration,
//!     #[serde(default, with = "depot_utils::humantime_serde::option")]
//!     idle: Option<Duration>,
//! }
//! ```
//!
//! Plain integers are accepted as whole seconds so that environment overrides
//! such as `DEPOT__RESOURCES__REQUEST_TIMEOUT=30` keep working.

use std::fmt;
use std::time::Duration;

use serde::{Deserializer, Serializer, de};

struct DurationVisitor;

impl de::Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration such as \"15s\" or a number of seconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        let trimmed = v.trim();
        if let Ok(secs) = trimmed.parse::<u64>() {
            return Ok(Duration::from_secs(secs));
        }
        humantime::parse_duration(trimmed)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
        Ok(Duration::from_secs(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
        u64::try_from(v)
            .map(Duration::from_secs)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }
}

/// Deserialize a `Duration` from `"15s"`-style text or whole seconds.
///
/// # Errors
/// Fails when the input is neither a humantime duration nor a non-negative
/// integer.
pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    d.deserialize_any(DurationVisitor)
}

/// Serialize a `Duration` as humantime text (`"15s"`).
///
/// # Errors
/// Propagates serializer errors.
pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.collect_str(&humantime::format_duration(*d))
}

pub mod option {
    //! `Option<Duration>` variant; `null` and a missing field both mean `None`
    //! (combine with `#[serde(default)]`).

    use std::fmt;
    use std::time::Duration;

    use serde::{Deserializer, Serializer, de};

    struct OptionVisitor;

    impl<'de> de::Visitor<'de> for OptionVisitor {
        type Value = Option<Duration>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an optional duration")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            super::deserialize(d).map(Some)
        }
    }

    /// # Errors
    /// Fails on malformed durations.
    pub fn deserialize<'de, D>(d: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_option(OptionVisitor)
    }

    /// # Errors
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match d {
            Some(d) => s.collect_str(&humantime::format_duration(*d)),
            None => s.serialize_none(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Serialize, Deserialize)]
    struct Timeouts {
        #[serde(with = "super")]
        request: Duration,
        #[serde(default, with = "super::option")]
        idle: Option<Duration>,
    }

    #[test]
    fn parses_humantime_text() {
        let t: Timeouts = serde_json::from_str(r#"{"request": "2m 30s"}"#).unwrap();
        assert_eq!(t.request, Duration::from_secs(150));
        assert_eq!(t.idle, None);
    }

    #[test]
    fn integers_are_seconds() {
        let t: Timeouts = serde_json::from_str(r#"{"request": 15, "idle": "90"}"#).unwrap();
        assert_eq!(t.request, Duration::from_secs(15));
        assert_eq!(t.idle, Some(Duration::from_secs(90)));
    }

    #[test]
    fn null_option_is_none() {
        let t: Timeouts = serde_json::from_str(r#"{"request": "1s", "idle": null}"#).unwrap();
        assert_eq!(t.idle, None);
    }

    #[test]
    fn serializes_as_text() {
        let t = Timeouts {
            request: Duration::from_secs(15),
            idle: Some(Duration::from_secs(610)),
        };
        assert_eq!(
            serde_json::to_string(&t).unwrap(),
            r#"{"request":"15s","idle":"10m 10s"}"#
        );
    }

    #[test]
    fn rejects_garbage_and_negatives() {
        assert!(serde_json::from_str::<Timeouts>(r#"{"request": "soon"}"#).is_err());
        assert!(serde_json::from_str::<Timeouts>(r#"{"request": -3}"#).is_err());
    }
}
