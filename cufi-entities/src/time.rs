use std::{fmt, ops::Add, time::Duration};

use thiserror::Error;
use time::{macros::format_description, OffsetDateTime};

pub use time::Date;

/// Substituted for dates that cannot be parsed, e.g. while importing
/// events from external sources.
pub const SENTINEL_DATE: Date = time::macros::date!(9999 - 09 - 09);

#[derive(Debug, Error)]
#[error("Invalid date '{input}'")]
pub struct DateParseError {
    input: String,
    #[source]
    source: time::error::Parse,
}

/// Parse a date in the presentation format `DD-MM-YYYY`.
pub fn parse_date(input: &str) -> Result<Date, DateParseError> {
    Date::parse(input, format_description!("[day]-[month]-[year]")).map_err(|source| {
        DateParseError {
            input: input.to_owned(),
            source,
        }
    })
}

/// Parse a date in the ISO format `YYYY-MM-DD`.
pub fn parse_iso_date(input: &str) -> Result<Date, DateParseError> {
    Date::parse(input, format_description!("[year]-[month]-[day]")).map_err(|source| {
        DateParseError {
            input: input.to_owned(),
            source,
        }
    })
}

/// Format a date as `DD-MM-YYYY`.
pub fn format_date(date: Date) -> String {
    format!(
        "{:02}-{:02}-{:04}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

/// Format a date as `YYYY-MM-DD`.
///
/// The lexicographical order of the resulting strings matches
/// the chronological order of the dates.
pub fn format_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Unix timestamp with a resolution of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc().unix_timestamp())
    }

    pub const fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    pub const fn as_seconds(self) -> i64 {
        self.0
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        let secs = i64::try_from(rhs.as_secs()).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match OffsetDateTime::from_unix_timestamp(self.0) {
            Ok(dt) => write!(f, "{dt}"),
            Err(_) => write!(f, "{}s", self.0),
        }
    }
}
