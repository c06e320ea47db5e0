// ── Filter engine ──
//
// Pure predicate evaluation over `CalendarEvent`s. Dimensions are ANDed;
// values within a dimension are ORed; an empty dimension is unrestricted.
// Dimensions that target a field an event variant does not carry are
// vacuously true for that event.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::model::filters::{canonical_code, canonical_id};
use crate::model::{Attr, CalendarEvent, CalendarFilters, NamedRef};

/// Whether `event` satisfies every active dimension of `filters`.
pub fn matches(event: &CalendarEvent, filters: &CalendarFilters) -> bool {
    let search = filters.normalized_search();
    matches_with_search(event, filters, search.as_deref())
}

/// Filter `events` and order the result by start, then id.
pub fn apply_all(
    events: &[Arc<CalendarEvent>],
    filters: &CalendarFilters,
) -> Vec<Arc<CalendarEvent>> {
    let search = filters.normalized_search();
    let mut out: Vec<Arc<CalendarEvent>> = events
        .iter()
        .filter(|e| matches_with_search(e, filters, search.as_deref()))
        .cloned()
        .collect();
    out.sort_by(|a, b| chronological(a, b));
    out
}

/// Ordering used for every published event list.
pub fn chronological(a: &CalendarEvent, b: &CalendarEvent) -> Ordering {
    a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id))
}

fn matches_with_search(event: &CalendarEvent, filters: &CalendarFilters, search: Option<&str>) -> bool {
    type_matches(event, filters)
        && user_matches(event, filters)
        && leave_matches(event, filters)
        && ref_matches(event.kind.location(), &filters.location_ids)
        && ref_matches(event.kind.team(), &filters.team_ids)
        && ref_matches(event.kind.specialty(), &filters.specialty_ids)
        && range_matches(event, filters)
        && search.is_none_or(|term| search_matches(event, term))
}

// ── Dimensions ───────────────────────────────────────────────────────

fn type_matches(event: &CalendarEvent, filters: &CalendarFilters) -> bool {
    filters.event_types.is_empty() || filters.event_types.contains(&event.event_type())
}

fn user_matches(event: &CalendarEvent, filters: &CalendarFilters) -> bool {
    if filters.user_ids.is_empty() && filters.user_roles.is_empty() {
        return true;
    }
    if !event.kind.has_owner() {
        return true;
    }
    let Some(ref user) = event.user else {
        return false;
    };
    let id_ok = filters.user_ids.is_empty() || id_listed(&filters.user_ids, &user.id);
    let role_ok = filters.user_roles.is_empty()
        || user
            .role
            .as_deref()
            .is_some_and(|role| code_listed(&filters.user_roles, role));
    id_ok && role_ok
}

fn leave_matches(event: &CalendarEvent, filters: &CalendarFilters) -> bool {
    let type_ok = filters.leave_types.is_empty()
        || match event.kind.leave_type() {
            Attr::NotApplicable => true,
            Attr::Unset => false,
            Attr::Value(t) => code_listed(&filters.leave_types, t),
        };
    let status_ok = filters.leave_statuses.is_empty()
        || match event.kind.leave_status() {
            Attr::NotApplicable => true,
            Attr::Unset => false,
            Attr::Value(s) => filters.leave_statuses.contains(&s),
        };
    type_ok && status_ok
}

fn ref_matches(attr: Attr<&NamedRef>, wanted: &[String]) -> bool {
    if wanted.is_empty() {
        return true;
    }
    match attr {
        Attr::NotApplicable => true,
        Attr::Unset => false,
        Attr::Value(r) => id_listed(wanted, &r.id),
    }
}

fn id_listed(wanted: &[String], id: &str) -> bool {
    wanted.iter().any(|w| canonical_id(w) == id)
}

fn code_listed(wanted: &[String], code: &str) -> bool {
    let code = canonical_code(code);
    wanted.iter().any(|w| canonical_code(w) == code)
}

fn range_matches(event: &CalendarEvent, filters: &CalendarFilters) -> bool {
    filters
        .date_range
        .as_ref()
        .is_none_or(|range| event.overlaps(range))
}

/// `term` is already lowercased.
fn search_matches(event: &CalendarEvent, term: &str) -> bool {
    let hit = |s: &str| s.to_lowercase().contains(term);

    hit(&event.title)
        || event.description.as_deref().is_some_and(hit)
        || event.user.as_ref().is_some_and(|u| hit(&u.full_name()))
        || event
            .kind
            .location()
            .value()
            .and_then(|r| r.name.as_deref())
            .is_some_and(hit)
        || event
            .kind
            .team()
            .value()
            .and_then(|r| r.name.as_deref())
            .is_some_and(hit)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cache::signature_of;
    use crate::model::{DateRange, EventKind, EventType, LeaveStatus, UserRef};
    use chrono::{DateTime, TimeZone, Utc};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()
    }

    fn user(id: &str, first: &str, last: &str, role: &str) -> UserRef {
        UserRef {
            id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            email: None,
            role: Some(role.into()),
        }
    }

    fn leave(id: &str, status: LeaveStatus) -> CalendarEvent {
        CalendarEvent::new(
            id,
            "Congé annuel",
            day(10),
            day(12),
            EventKind::Leave {
                leave_type: "ANNUAL".into(),
                status,
                counted_days: Some(3.0),
            },
        )
        .unwrap()
        .with_user(user("5", "Ada", "Martin", "MAR"))
    }

    fn duty(id: &str) -> CalendarEvent {
        CalendarEvent::new(
            id,
            "Garde",
            day(11),
            day(11),
            EventKind::Duty {
                location: Some(NamedRef::new("3", Some("Bloc Nord".into()))),
            },
        )
        .unwrap()
        .with_user(user("6", "Grace", "Hopper", "IADE"))
    }

    fn holiday() -> CalendarEvent {
        CalendarEvent::new(
            "holiday-1",
            "Lundi de Pâques",
            day(1),
            day(1),
            EventKind::Holiday {
                is_national: true,
                regions: vec![],
            },
        )
        .unwrap()
    }

    #[test]
    fn empty_filters_match_everything() {
        let f = CalendarFilters::default();
        assert!(matches(&leave("1", LeaveStatus::Pending), &f));
        assert!(matches(&duty("2"), &f));
        assert!(matches(&holiday(), &f));
    }

    #[test]
    fn event_types_are_ored() {
        let f = CalendarFilters::builder()
            .event_types([EventType::Leave, EventType::Holiday])
            .build()
            .unwrap();
        assert!(matches(&leave("1", LeaveStatus::Pending), &f));
        assert!(matches(&holiday(), &f));
        assert!(!matches(&duty("2"), &f));
    }

    #[test]
    fn leave_statuses_do_not_exclude_other_variants() {
        let f = CalendarFilters::builder()
            .leave_statuses([LeaveStatus::Approved])
            .build()
            .unwrap();
        assert!(matches(&duty("2"), &f));
        assert!(matches(&holiday(), &f));
        assert!(matches(&leave("1", LeaveStatus::Approved), &f));
        assert!(!matches(&leave("1", LeaveStatus::Rejected), &f));
    }

    #[test]
    fn location_filter_is_vacuous_for_leaves() {
        let f = CalendarFilters::builder().location_ids(["3"]).build().unwrap();
        assert!(matches(&leave("1", LeaveStatus::Pending), &f));
        assert!(matches(&duty("2"), &f));
        let f = CalendarFilters::builder().location_ids(["4"]).build().unwrap();
        assert!(!matches(&duty("2"), &f));
    }

    #[test]
    fn dimensions_are_anded() {
        let f = CalendarFilters::builder()
            .event_types([EventType::Leave])
            .user_ids(["6"])
            .build()
            .unwrap();
        assert!(!matches(&leave("1", LeaveStatus::Pending), &f));
        let f = CalendarFilters::builder()
            .event_types([EventType::Leave])
            .user_ids(["5"])
            .user_roles(["mar"])
            .build()
            .unwrap();
        assert!(matches(&leave("1", LeaveStatus::Pending), &f));
    }

    #[test]
    fn user_filters_skip_holidays_but_require_owner_elsewhere() {
        let f = CalendarFilters::builder().user_ids(["5"]).build().unwrap();
        assert!(matches(&holiday(), &f));
        let orphan = CalendarEvent::new("x", "Réunion", day(2), day(2), EventKind::Other).unwrap();
        assert!(!matches(&orphan, &f));
    }

    #[test]
    fn search_covers_title_description_user_and_location() {
        let ev = duty("2").with_description("Remplacement urgent");
        for term in ["GARDE", "urgent", "grace hop", "nord"] {
            let f = CalendarFilters::builder().search(term).build().unwrap();
            assert!(matches(&ev, &f), "term {term:?} should match");
        }
        let f = CalendarFilters::builder().search("absent").build().unwrap();
        assert!(!matches(&ev, &f));
    }

    #[test]
    fn equal_signatures_select_the_same_events() {
        let raw = |ids: &[&str], roles: &[&str]| CalendarFilters {
            user_ids: ids.iter().map(|s| (*s).to_owned()).collect(),
            user_roles: roles.iter().map(|s| (*s).to_owned()).collect(),
            ..CalendarFilters::default()
        };
        let pairs = [
            (raw(&[" 6"], &[]), CalendarFilters::builder().user_ids(["6"]).build().unwrap()),
            (raw(&[], &["iade "]), raw(&[], &["IADE"])),
            (raw(&[], &["médecin"]), raw(&[], &["MÉDECIN"])),
        ];
        let chief = duty("3").with_user(user("7", "Alan", "Turing", "Médecin"));
        let events = [leave("1", LeaveStatus::Pending), duty("2"), chief, holiday()];

        for (a, b) in &pairs {
            assert_eq!(signature_of(a), signature_of(b));
            for ev in &events {
                assert_eq!(matches(ev, a), matches(ev, b), "{a:?} vs {b:?} on {}", ev.id);
            }
        }
        assert!(matches(&duty("2"), &pairs[0].0));
        assert!(matches(&events[2], &pairs[2].0));
    }

    #[test]
    fn range_overlap_is_inclusive() {
        // Event spans [D-1, D+1], visible range is [D, D].
        let ev = CalendarEvent::new("1", "x", day(9), day(11), EventKind::Other).unwrap();
        let f = CalendarFilters {
            date_range: Some(DateRange::new(day(10), day(10)).unwrap()),
            ..CalendarFilters::default()
        };
        assert!(matches(&ev, &f));

        let touching = CalendarFilters {
            date_range: Some(DateRange::new(day(11), day(20)).unwrap()),
            ..CalendarFilters::default()
        };
        assert!(matches(&ev, &touching));

        let after = CalendarFilters {
            date_range: Some(DateRange::new(day(12), day(20)).unwrap()),
            ..CalendarFilters::default()
        };
        assert!(!matches(&ev, &after));
    }

    #[test]
    fn apply_all_orders_by_start_then_id() {
        let events: Vec<Arc<CalendarEvent>> = vec![
            Arc::new(duty("b")),
            Arc::new(leave("z", LeaveStatus::Approved)),
            Arc::new(duty("a")),
            Arc::new(holiday()),
        ];
        let out = apply_all(&events, &CalendarFilters::default());
        let ids: Vec<&str> = out.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["holiday-1", "z", "a", "b"]);
    }
}
