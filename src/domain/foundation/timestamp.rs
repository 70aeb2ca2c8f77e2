//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// RFC 3339 rendering for wire payloads.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_monotonic_enough_for_ordering() {
        let a = Timestamp::now();
        let b = Timestamp::now();
        assert!(!b.is_before(&a));
    }

    #[test]
    fn duration_since_is_signed() {
        let a = Timestamp::now();
        let b = Timestamp::from_datetime(*a.as_datetime() + Duration::seconds(5));
        assert_eq!(b.duration_since(&a), Duration::seconds(5));
        assert_eq!(a.duration_since(&b), Duration::seconds(-5));
    }
}
