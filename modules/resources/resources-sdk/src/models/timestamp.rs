use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Date/time as the backend sends it: either a component array
/// (`[2024, 3, 9, 14, 5, 0]`) or an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Parts(Vec<i64>),
    Text(String),
}

impl Timestamp {
    /// Calendar date, when the value holds a valid one.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Parts(parts) => match parts.as_slice() {
                [y, m, d, ..] => NaiveDate::from_ymd_opt(
                    i32::try_from(*y).ok()?,
                    u32::try_from(*m).ok()?,
                    u32::try_from(*d).ok()?,
                ),
                _ => None,
            },
            Self::Text(text) => parse_text(text).map(|dt| dt.date()),
        }
    }

    /// Date and time; missing time components count as zero.
    #[must_use]
    pub fn date_time(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Parts(parts) => {
                let date = self.date()?;
                let component = |i: usize| {
                    parts
                        .get(i)
                        .map_or(Some(0), |v| u32::try_from(*v).ok())
                };
                let time = NaiveTime::from_hms_opt(component(3)?, component(4)?, component(5)?)?;
                Some(date.and_time(time))
            }
            Self::Text(text) => parse_text(text),
        }
    }

    /// `y-m-d` without zero padding (`2024-3-9`), the grouping key used for
    /// per-day statistics and table output.
    #[must_use]
    pub fn date_key(&self) -> Option<String> {
        self.date()
            .map(|d| format!("{}-{}-{}", d.year(), d.month(), d.day()))
    }
}

fn parse_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Renders the date key, or the raw value when it is not a valid date.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.date_key(), self) {
            (Some(key), _) => f.write_str(&key),
            (None, Self::Text(text)) => f.write_str(text),
            (None, Self::Parts(parts)) => {
                let joined: Vec<String> = parts.iter().map(ToString::to_string).collect();
                f.write_str(&joined.join("-"))
            }
        }
    }
}
