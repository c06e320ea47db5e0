// Wire types for the calendar backend.
//
// These mirror the JSON the backend emits as closely as possible: a flat
// object per event with a `type` discriminator and whichever variant
// fields apply. `rota-core` converts them into the typed domain model.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ── Identifiers ─────────────────────────────────────────────────────

/// Identifier as sent by the backend: database rows use integers,
/// composite calendar ids (`"leave-12"`) use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for WireId {
    fn from(s: &str) -> Self {
        s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_owned()), Self::Number)
    }
}

// ── Events ──────────────────────────────────────────────────────────

/// The user attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WireId>,
    #[serde(rename = "prenom", alias = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "nom", alias = "lastName", default)]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Event payload without an identifier.
///
/// Sent as the body of create/update requests, and flattened into
/// [`ApiEvent`] for responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventInput {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<WireId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ApiUser>,

    // Leave
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counted_days: Option<f64>,

    // Placement (assignments, duties, on-call, training, meetings)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<WireId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<WireId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty_id: Option<WireId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty_name: Option<String>,

    // Training
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer: Option<String>,

    // Meeting
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<WireId>,

    // Holiday
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_national: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,
}

/// A calendar event as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEvent {
    pub id: WireId,
    #[serde(flatten)]
    pub fields: ApiEventInput,
}

/// Body of a status update (`PATCH /api/calendar/events/{id}/status`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Error body returned by the backend on 4xx/5xx.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: String,
    #[serde(default)]
    pub details: Option<String>,
}

// ── Query ───────────────────────────────────────────────────────────

/// Query parameters for `GET /api/calendar`.
///
/// List parameters are sent repeated (`eventTypes=LEAVE&eventTypes=DUTY`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    pub event_types: Vec<String>,
    pub user_ids: Vec<String>,
    pub user_roles: Vec<String>,
    pub leave_types: Vec<String>,
    pub leave_statuses: Vec<String>,
    pub location_ids: Vec<String>,
    pub team_ids: Vec<String>,
    pub specialty_ids: Vec<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub search_term: Option<String>,
}

impl EventQuery {
    /// Flatten into `(name, value)` pairs suitable for `RequestBuilder::query`.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let lists: [(&'static str, &Vec<String>); 8] = [
            ("eventTypes", &self.event_types),
            ("userIds", &self.user_ids),
            ("userRoles", &self.user_roles),
            ("leaveTypes", &self.leave_types),
            ("leaveStatuses", &self.leave_statuses),
            ("locationIds", &self.location_ids),
            ("teamIds", &self.team_ids),
            ("specialtyIds", &self.specialty_ids),
        ];

        let mut pairs: Vec<(&'static str, String)> = lists
            .into_iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name, v.clone())))
            .collect();

        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.to_rfc3339_opts(SecondsFormat::Millis, true)));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.to_rfc3339_opts(SecondsFormat::Millis, true)));
        }
        if let Some(ref term) = self.search_term {
            pairs.push(("searchTerm", term.clone()));
        }

        pairs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn wire_id_accepts_numbers_and_strings() {
        let n: WireId = serde_json::from_str("42").unwrap();
        let s: WireId = serde_json::from_str("\"leave-42\"").unwrap();
        assert_eq!(n, WireId::Number(42));
        assert_eq!(s.to_string(), "leave-42");
    }

    #[test]
    fn wire_id_from_str_prefers_numbers() {
        assert_eq!(WireId::from("17"), WireId::Number(17));
        assert_eq!(WireId::from("abc"), WireId::Text("abc".into()));
    }

    #[test]
    fn event_deserializes_backend_shape() {
        let raw = r#"{
            "id": "leave-12",
            "title": "Ada Martin - Congé (ANNUAL)",
            "start": "2024-03-11T00:00:00+01:00",
            "end": "2024-03-15T00:00:00+01:00",
            "allDay": true,
            "userId": 5,
            "user": { "id": 5, "prenom": "Ada", "nom": "Martin", "role": "MAR" },
            "type": "LEAVE",
            "leaveId": 12,
            "leaveType": "ANNUAL",
            "status": "PENDING",
            "countedDays": 5,
            "description": ""
        }"#;
        let ev: ApiEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(ev.id, WireId::Text("leave-12".into()));
        assert_eq!(ev.fields.event_type, "LEAVE");
        assert_eq!(ev.fields.status.as_deref(), Some("PENDING"));
        assert_eq!(ev.fields.counted_days, Some(5.0));
        let user = ev.fields.user.unwrap();
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert_eq!(
            ev.fields.start,
            Utc.with_ymd_and_hms(2024, 3, 10, 23, 0, 0).unwrap()
        );
    }

    #[test]
    fn user_accepts_english_field_names() {
        let user: ApiUser =
            serde_json::from_str(r#"{"firstName": "Grace", "lastName": "Hopper"}"#).unwrap();
        assert_eq!(user.first_name.as_deref(), Some("Grace"));
        assert_eq!(user.last_name.as_deref(), Some("Hopper"));
    }

    #[test]
    fn query_pairs_repeat_list_parameters() {
        let query = EventQuery {
            event_types: vec!["LEAVE".into(), "DUTY".into()],
            start_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            search_term: Some("ada".into()),
            ..EventQuery::default()
        };
        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("eventTypes", "LEAVE".to_string()),
                ("eventTypes", "DUTY".to_string()),
                ("startDate", "2024-03-01T00:00:00.000Z".to_string()),
                ("searchTerm", "ada".to_string()),
            ]
        );
    }
}
