// ── API-to-domain type conversions ──
//
// Bridges `rota_api` wire types and the canonical `rota_core::model`
// types. Wire events are flat and loosely typed; here they are checked
// (`start <= end`, known status) and folded into the typed `EventKind`.

use std::str::FromStr;

use tracing::warn;

use rota_api::{ApiEvent, ApiEventInput, ApiUser, EventQuery, WireId};

use crate::error::CoreError;
use crate::model::filters::{canonical_code, canonical_id};
use crate::model::{
    CalendarEvent, CalendarFilters, EventDraft, EventKind, EventType, LeaveStatus, NamedRef,
    UserRef,
};

// ── Helpers ────────────────────────────────────────────────────────

fn named(id: Option<&WireId>, name: Option<&String>) -> Option<NamedRef> {
    id.map(|id| NamedRef::new(id.to_string(), name.cloned()))
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

fn user_from_wire(user: Option<ApiUser>, user_id: Option<&WireId>) -> Option<UserRef> {
    match user {
        Some(u) => {
            let id = u.id.as_ref().or(user_id)?.to_string();
            Some(UserRef {
                id,
                first_name: u.first_name.unwrap_or_default(),
                last_name: u.last_name.unwrap_or_default(),
                email: u.email,
                role: u.role,
            })
        }
        None => user_id.map(|id| UserRef {
            id: id.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            role: None,
        }),
    }
}

fn user_to_wire(user: &UserRef) -> ApiUser {
    ApiUser {
        id: Some(WireId::from(user.id.as_str())),
        first_name: Some(user.first_name.clone()),
        last_name: Some(user.last_name.clone()),
        email: user.email.clone(),
        role: user.role.clone(),
    }
}

// ── Events ─────────────────────────────────────────────────────────

/// Convert one wire event. Unknown type strings become [`EventType::Other`].
pub(crate) fn event_from_wire(raw: ApiEvent) -> Result<CalendarEvent, CoreError> {
    let ApiEvent { id, fields: f } = raw;
    let event_type = EventType::from_str(&f.event_type).unwrap_or(EventType::Other);

    let location = named(f.location_id.as_ref(), f.location_name.as_ref());
    let team = named(f.team_id.as_ref(), f.team_name.as_ref());
    let specialty = named(f.specialty_id.as_ref(), f.specialty_name.as_ref());

    let kind = match event_type {
        EventType::Assignment => EventKind::Assignment {
            location,
            team,
            specialty,
        },
        EventType::Leave => {
            let status = match f.status.as_deref() {
                None => LeaveStatus::Pending,
                Some(s) => LeaveStatus::from_str(s).map_err(|_| {
                    CoreError::validation(format!("event {id}: unknown leave status {s:?}"))
                })?,
            };
            EventKind::Leave {
                leave_type: f.leave_type.clone().unwrap_or_else(|| "OTHER".into()),
                status,
                counted_days: f.counted_days,
            }
        }
        EventType::Duty => EventKind::Duty { location },
        EventType::OnCall => EventKind::OnCall { location },
        EventType::Training => EventKind::Training {
            location,
            specialty,
            trainer: f.trainer.clone(),
        },
        EventType::Meeting => EventKind::Meeting {
            location,
            team,
            participants: f.participants.iter().map(ToString::to_string).collect(),
        },
        EventType::Holiday => EventKind::Holiday {
            is_national: f.is_national.unwrap_or(false),
            regions: f.regions.clone(),
        },
        EventType::Other => EventKind::Other,
    };

    let mut event = CalendarEvent::new(id.to_string(), f.title, f.start, f.end, kind)?;
    event.all_day = f.all_day;
    event.description = non_blank(f.description);
    event.user = user_from_wire(f.user, f.user_id.as_ref());
    Ok(event)
}

/// Convert a fetched batch, skipping events that fail validation.
pub(crate) fn events_from_wire(raw: Vec<ApiEvent>) -> Vec<CalendarEvent> {
    raw.into_iter()
        .filter_map(|e| match event_from_wire(e) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(error = %err, "skipping invalid calendar event");
                None
            }
        })
        .collect()
}

/// Request body for a create or update.
pub(crate) fn draft_to_wire(draft: &EventDraft) -> ApiEventInput {
    let mut input = ApiEventInput {
        title: draft.title.clone(),
        start: draft.start,
        end: draft.end,
        event_type: draft.kind.event_type().to_string(),
        all_day: draft.all_day,
        description: draft.description.clone(),
        user_id: draft.user.as_ref().map(|u| WireId::from(u.id.as_str())),
        user: draft.user.as_ref().map(user_to_wire),
        ..ApiEventInput::default()
    };

    let place = |r: &Option<NamedRef>| {
        r.as_ref()
            .map(|r| (WireId::from(r.id.as_str()), r.name.clone()))
    };

    match &draft.kind {
        EventKind::Assignment {
            location,
            team,
            specialty,
        } => {
            (input.location_id, input.location_name) = split(place(location));
            (input.team_id, input.team_name) = split(place(team));
            (input.specialty_id, input.specialty_name) = split(place(specialty));
        }
        EventKind::Leave {
            leave_type,
            status,
            counted_days,
        } => {
            input.leave_type = Some(leave_type.clone());
            input.status = Some(status.to_string());
            input.counted_days = *counted_days;
        }
        EventKind::Duty { location } | EventKind::OnCall { location } => {
            (input.location_id, input.location_name) = split(place(location));
        }
        EventKind::Training {
            location,
            specialty,
            trainer,
        } => {
            (input.location_id, input.location_name) = split(place(location));
            (input.specialty_id, input.specialty_name) = split(place(specialty));
            input.trainer.clone_from(trainer);
        }
        EventKind::Meeting {
            location,
            team,
            participants,
        } => {
            (input.location_id, input.location_name) = split(place(location));
            (input.team_id, input.team_name) = split(place(team));
            input.participants = participants.iter().map(|p| WireId::from(p.as_str())).collect();
        }
        EventKind::Holiday {
            is_national,
            regions,
        } => {
            input.is_national = Some(*is_national);
            input.regions.clone_from(regions);
        }
        EventKind::Other => {}
    }

    input
}

fn split(pair: Option<(WireId, Option<String>)>) -> (Option<WireId>, Option<String>) {
    match pair {
        Some((id, name)) => (Some(id), name),
        None => (None, None),
    }
}

// ── Filters ────────────────────────────────────────────────────────

/// Query parameters mirroring `filters`, so the backend can pre-filter.
pub(crate) fn query_from_filters(filters: &CalendarFilters) -> EventQuery {
    EventQuery {
        event_types: filters.event_types.iter().map(ToString::to_string).collect(),
        user_ids: ids(&filters.user_ids),
        user_roles: codes(&filters.user_roles),
        leave_types: codes(&filters.leave_types),
        leave_statuses: filters.leave_statuses.iter().map(ToString::to_string).collect(),
        location_ids: ids(&filters.location_ids),
        team_ids: ids(&filters.team_ids),
        specialty_ids: ids(&filters.specialty_ids),
        start_date: filters.date_range.map(|r| r.start()),
        end_date: filters.date_range.map(|r| r.end()),
        search_term: filters.normalized_search(),
    }
}

fn ids(values: &[String]) -> Vec<String> {
    values.iter().map(|v| canonical_id(v).to_owned()).collect()
}

fn codes(values: &[String]) -> Vec<String> {
    values.iter().map(|v| canonical_code(v)).collect()
}
