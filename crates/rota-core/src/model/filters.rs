// ── Calendar filters ──
//
// `CalendarFilters` is the canonical, validated filter state held by the
// controller. Views never build one directly: they submit a `FilterDelta`
// which is merged into the current state before each query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::{EventType, LeaveStatus};
use super::range::DateRange;
use crate::error::CoreError;

/// Active filter dimensions. An empty list means "unrestricted".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarFilters {
    pub event_types: Vec<EventType>,
    pub user_ids: Vec<String>,
    pub user_roles: Vec<String>,
    pub leave_types: Vec<String>,
    pub leave_statuses: Vec<LeaveStatus>,
    pub location_ids: Vec<String>,
    pub team_ids: Vec<String>,
    pub specialty_ids: Vec<String>,
    pub search_term: Option<String>,
    pub date_range: Option<DateRange>,
}

impl CalendarFilters {
    pub fn builder() -> CalendarFiltersBuilder {
        CalendarFiltersBuilder::default()
    }

    /// Reject blank identifiers. Date ranges are validated by construction.
    pub fn validate(&self) -> Result<(), CoreError> {
        let lists: [(&str, &Vec<String>); 6] = [
            ("userIds", &self.user_ids),
            ("userRoles", &self.user_roles),
            ("leaveTypes", &self.leave_types),
            ("locationIds", &self.location_ids),
            ("teamIds", &self.team_ids),
            ("specialtyIds", &self.specialty_ids),
        ];
        for (name, values) in lists {
            if values.iter().any(|v| v.trim().is_empty()) {
                return Err(CoreError::validation(format!(
                    "{name} must not contain blank entries"
                )));
            }
        }
        Ok(())
    }

    /// Rewrite every list value into its canonical form. The cache key,
    /// the matcher and the wire query all compare canonical values.
    pub fn canonicalize(&mut self) {
        for ids in [
            &mut self.user_ids,
            &mut self.location_ids,
            &mut self.team_ids,
            &mut self.specialty_ids,
        ] {
            for id in ids.iter_mut() {
                *id = canonical_id(id).to_owned();
            }
        }
        for codes in [&mut self.user_roles, &mut self.leave_types] {
            for code in codes.iter_mut() {
                *code = canonical_code(code);
            }
        }
    }

    /// Lowercased, trimmed search term; `None` when blank.
    pub fn normalized_search(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Copy with the date range replaced.
    pub fn with_date_range(&self, range: DateRange) -> Self {
        Self {
            date_range: Some(range),
            ..self.clone()
        }
    }
}

/// Identifiers compare exactly, ignoring surrounding whitespace.
pub(crate) fn canonical_id(value: &str) -> &str {
    value.trim()
}

/// Codes (roles, leave types) compare case-insensitively.
pub(crate) fn canonical_code(value: &str) -> String {
    value.trim().to_uppercase()
}

// ── Builder ─────────────────────────────────────────────────────────

/// Validating builder for [`CalendarFilters`].
#[derive(Debug, Clone, Default)]
pub struct CalendarFiltersBuilder {
    filters: CalendarFilters,
    range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

fn strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl CalendarFiltersBuilder {
    pub fn event_types(mut self, types: impl IntoIterator<Item = EventType>) -> Self {
        self.filters.event_types = types.into_iter().collect();
        self
    }

    pub fn user_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.filters.user_ids = strings(ids);
        self
    }

    pub fn user_roles<I: IntoIterator<Item = S>, S: Into<String>>(mut self, roles: I) -> Self {
        self.filters.user_roles = strings(roles);
        self
    }

    pub fn leave_types<I: IntoIterator<Item = S>, S: Into<String>>(mut self, types: I) -> Self {
        self.filters.leave_types = strings(types);
        self
    }

    pub fn leave_statuses(mut self, statuses: impl IntoIterator<Item = LeaveStatus>) -> Self {
        self.filters.leave_statuses = statuses.into_iter().collect();
        self
    }

    pub fn location_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.filters.location_ids = strings(ids);
        self
    }

    pub fn team_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.filters.team_ids = strings(ids);
        self
    }

    pub fn specialty_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.filters.specialty_ids = strings(ids);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.filters.search_term = Some(term.into());
        self
    }

    pub fn date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.range = Some((start, end));
        self
    }

    pub fn build(self) -> Result<CalendarFilters, CoreError> {
        let mut filters = self.filters;
        if let Some((start, end)) = self.range {
            filters.date_range = Some(DateRange::new(start, end)?);
        }
        filters.validate()?;
        filters.canonicalize();
        Ok(filters)
    }
}

// ── Delta ───────────────────────────────────────────────────────────

/// A partial filter update. `None` fields leave the current value alone.
///
/// The date range is deliberately absent: it always comes from
/// navigation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDelta {
    /// Start from empty filters instead of the current ones.
    pub reset: bool,
    pub event_types: Option<Vec<EventType>>,
    pub user_ids: Option<Vec<String>>,
    pub user_roles: Option<Vec<String>>,
    pub leave_types: Option<Vec<String>>,
    pub leave_statuses: Option<Vec<LeaveStatus>>,
    pub location_ids: Option<Vec<String>>,
    pub team_ids: Option<Vec<String>>,
    pub specialty_ids: Option<Vec<String>>,
    /// `Some(None)` clears the search term.
    pub search_term: Option<Option<String>>,
}

impl FilterDelta {
    /// No changes: re-run the query with the current filters.
    pub fn none() -> Self {
        Self::default()
    }

    /// Clear every dimension.
    pub fn reset() -> Self {
        Self {
            reset: true,
            ..Self::default()
        }
    }

    pub fn event_types(mut self, types: impl IntoIterator<Item = EventType>) -> Self {
        self.event_types = Some(types.into_iter().collect());
        self
    }

    pub fn user_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.user_ids = Some(strings(ids));
        self
    }

    pub fn user_roles<I: IntoIterator<Item = S>, S: Into<String>>(mut self, roles: I) -> Self {
        self.user_roles = Some(strings(roles));
        self
    }

    pub fn leave_types<I: IntoIterator<Item = S>, S: Into<String>>(mut self, types: I) -> Self {
        self.leave_types = Some(strings(types));
        self
    }

    pub fn leave_statuses(mut self, statuses: impl IntoIterator<Item = LeaveStatus>) -> Self {
        self.leave_statuses = Some(statuses.into_iter().collect());
        self
    }

    pub fn location_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.location_ids = Some(strings(ids));
        self
    }

    pub fn team_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.team_ids = Some(strings(ids));
        self
    }

    pub fn specialty_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.specialty_ids = Some(strings(ids));
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(Some(term.into()));
        self
    }

    pub fn clear_search(mut self) -> Self {
        self.search_term = Some(None);
        self
    }

    /// Merge onto `base`, keeping its date range, and validate the result.
    pub fn apply_to(&self, base: &CalendarFilters) -> Result<CalendarFilters, CoreError> {
        let mut next = if self.reset {
            CalendarFilters {
                date_range: base.date_range,
                ..CalendarFilters::default()
            }
        } else {
            base.clone()
        };

        if let Some(ref v) = self.event_types {
            next.event_types.clone_from(v);
        }
        if let Some(ref v) = self.user_ids {
            next.user_ids.clone_from(v);
        }
        if let Some(ref v) = self.user_roles {
            next.user_roles.clone_from(v);
        }
        if let Some(ref v) = self.leave_types {
            next.leave_types.clone_from(v);
        }
        if let Some(ref v) = self.leave_statuses {
            next.leave_statuses.clone_from(v);
        }
        if let Some(ref v) = self.location_ids {
            next.location_ids.clone_from(v);
        }
        if let Some(ref v) = self.team_ids {
            next.team_ids.clone_from(v);
        }
        if let Some(ref v) = self.specialty_ids {
            next.specialty_ids.clone_from(v);
        }
        if let Some(ref v) = self.search_term {
            next.search_term.clone_from(v);
        }

        next.validate()?;
        next.canonicalize();
        Ok(next)
    }
}

impl From<CalendarFilters> for FilterDelta {
    /// A delta that replaces every dimension with `filters`' values.
    fn from(filters: CalendarFilters) -> Self {
        Self {
            reset: true,
            event_types: Some(filters.event_types),
            user_ids: Some(filters.user_ids),
            user_roles: Some(filters.user_roles),
            leave_types: Some(filters.leave_types),
            leave_statuses: Some(filters.leave_statuses),
            location_ids: Some(filters.location_ids),
            team_ids: Some(filters.team_ids),
            specialty_ids: Some(filters.specialty_ids),
            search_term: Some(filters.search_term),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn builder_rejects_inverted_range() {
        let start = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let result = CalendarFilters::builder().date_range(start, end).build();
        assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
    }

    #[test]
    fn builder_rejects_blank_ids() {
        let result = CalendarFilters::builder().user_ids(["7", "  "]).build();
        assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
    }

    #[test]
    fn delta_keeps_untouched_dimensions() {
        let base = CalendarFilters::builder()
            .event_types([EventType::Leave])
            .user_ids(["1"])
            .build()
            .unwrap();
        let next = FilterDelta::none()
            .user_ids(["2", "3"])
            .apply_to(&base)
            .unwrap();
        assert_eq!(next.event_types, vec![EventType::Leave]);
        assert_eq!(next.user_ids, vec!["2".to_string(), "3".to_string()]);
    }

    #[test]
    fn reset_clears_everything_but_the_range() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let base = CalendarFilters::builder()
            .event_types([EventType::Duty])
            .search("ada")
            .date_range(start, start)
            .build()
            .unwrap();
        let next = FilterDelta::reset().apply_to(&base).unwrap();
        assert!(next.event_types.is_empty());
        assert!(next.search_term.is_none());
        assert_eq!(next.date_range, base.date_range);
    }

    #[test]
    fn clear_search_removes_term() {
        let base = CalendarFilters::builder().search("x").build().unwrap();
        let next = FilterDelta::none().clear_search().apply_to(&base).unwrap();
        assert_eq!(next.search_term, None);
    }

    #[test]
    fn construction_canonicalizes_list_values() {
        let built = CalendarFilters::builder()
            .user_ids([" u2 "])
            .user_roles(["iade "])
            .leave_types(["Annual"])
            .build()
            .unwrap();
        assert_eq!(built.user_ids, vec!["u2".to_string()]);
        assert_eq!(built.user_roles, vec!["IADE".to_string()]);
        assert_eq!(built.leave_types, vec!["ANNUAL".to_string()]);

        let merged = FilterDelta::none()
            .team_ids(["\tteam-9"])
            .user_roles(["médecin"])
            .apply_to(&CalendarFilters::default())
            .unwrap();
        assert_eq!(merged.team_ids, vec!["team-9".to_string()]);
        assert_eq!(merged.user_roles, vec!["MÉDECIN".to_string()]);
    }

    #[test]
    fn normalized_search_ignores_blank() {
        let filters = CalendarFilters::builder().search("   ").build().unwrap();
        assert_eq!(filters.normalized_search(), None);
        let filters = CalendarFilters::builder().search(" Ada ").build().unwrap();
        assert_eq!(filters.normalized_search().as_deref(), Some("ada"));
    }
}
