//! Time related utils.

use std::fmt::Debug;

use chrono::Utc;

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a new DateTime with current time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into RFC 2822 date as Duo expects it: `Fri, 24 May 2024 12:00:00 -0000`
///
/// The zone is always written as `-0000`, the form used for UTC timestamps
/// that make no claim about the local zone.
pub fn format_rfc2822_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S -0000").to_string()
}

/// DateStringProvider yields the request timestamp used for `x-duo-date`.
///
/// The signer calls it exactly once per request and uses the same string
/// for the header and the canonical string.
pub trait DateStringProvider: Debug + Send + Sync + 'static {
    /// Return the current time formatted per RFC 2822.
    fn rfc_2822_date_string(&self) -> String;
}

/// SystemDateStringProvider reads the wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDateStringProvider;

impl DateStringProvider for SystemDateStringProvider {
    fn rfc_2822_date_string(&self) -> String {
        format_rfc2822_date(now())
    }
}

/// StaticDateStringProvider always returns the same date string.
///
/// Useful for tests or for replaying a previously signed request.
#[derive(Debug, Clone)]
pub struct StaticDateStringProvider(String);

impl StaticDateStringProvider {
    /// Create a provider returning `date`.
    pub fn new(date: impl Into<String>) -> Self {
        Self(date.into())
    }
}

impl DateStringProvider for StaticDateStringProvider {
    fn rfc_2822_date_string(&self) -> String {
        self.0.clone()
    }
}
