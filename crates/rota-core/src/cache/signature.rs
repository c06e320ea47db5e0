// ── Filter signatures ──
//
// A signature is the cache key for a filter state: a compact JSON
// encoding of the filters with every list sorted and de-duplicated, so
// two filters that differ only in list order share an entry.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::filters::{canonical_code, canonical_id};
use crate::model::{CalendarFilters, EventType, LeaveStatus};

/// Deterministic, order-independent key for a [`CalendarFilters`] value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSignature(String);

impl FilterSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Normalized<'a> {
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    event_types: BTreeSet<EventType>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    user_ids: BTreeSet<&'a str>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    user_roles: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    leave_types: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    leave_statuses: BTreeSet<LeaveStatus>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    location_ids: BTreeSet<&'a str>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    team_ids: BTreeSet<&'a str>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    specialty_ids: BTreeSet<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<String>,
}

fn ids(values: &[String]) -> BTreeSet<&str> {
    values.iter().map(|v| canonical_id(v)).collect()
}

fn codes(values: &[String]) -> BTreeSet<String> {
    values.iter().map(|v| canonical_code(v)).collect()
}

/// Compute the cache key for `filters`.
pub fn signature_of(filters: &CalendarFilters) -> FilterSignature {
    let normalized = Normalized {
        event_types: filters.event_types.iter().copied().collect(),
        user_ids: ids(&filters.user_ids),
        user_roles: codes(&filters.user_roles),
        leave_types: codes(&filters.leave_types),
        leave_statuses: filters.leave_statuses.iter().copied().collect(),
        location_ids: ids(&filters.location_ids),
        team_ids: ids(&filters.team_ids),
        specialty_ids: ids(&filters.specialty_ids),
        search: filters.normalized_search(),
        start: filters.date_range.map(|r| r.start().to_rfc3339()),
        end: filters.date_range.map(|r| r.end().to_rfc3339()),
    };
    let encoded =
        serde_json::to_string(&normalized).unwrap_or_else(|_| format!("{normalized:?}"));
    FilterSignature(encoded)
}
