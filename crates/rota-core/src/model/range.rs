// ── Date ranges ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A closed interval `[start, end]` with `start <= end`.
///
/// Construction is the only validation point; a `DateRange` is never
/// mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = CoreError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::validation(format!(
                "date range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build from bounds already known to be ordered; swaps them otherwise.
    pub(crate) fn spanning(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Inclusive overlap: touching bounds count.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.end >= other.start && self.start <= other.end
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn rejects_start_after_end() {
        assert!(DateRange::new(day(2), day(1)).is_err());
        assert!(DateRange::new(day(1), day(1)).is_ok());
    }

    #[test]
    fn overlap_is_inclusive() {
        let a = DateRange::new(day(1), day(3)).unwrap();
        let b = DateRange::new(day(3), day(5)).unwrap();
        let c = DateRange::new(day(4), day(5)).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn deserialization_validates() {
        let bad = r#"{"start":"2024-03-02T00:00:00Z","end":"2024-03-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<DateRange>(bad).is_err());
        let good = r#"{"start":"2024-03-01T00:00:00Z","end":"2024-03-02T00:00:00Z"}"#;
        let range: DateRange = serde_json::from_str(good).unwrap();
        assert!(range.contains(day(1)));
    }
}
