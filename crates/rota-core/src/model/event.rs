// ── Calendar event types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::range::DateRange;
use crate::error::CoreError;

/// Event identifier as issued by the backend (`"leave-12"`, `"42"`).
pub type EventId = String;

/// Discriminator of [`EventKind`], used by filters and the wire format.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EventType {
    Assignment,
    Leave,
    Duty,
    OnCall,
    Training,
    Meeting,
    Holiday,
    Other,
}

/// Approval state of a leave request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// Reference to a location, team or specialty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: Option<String>,
}

impl NamedRef {
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
        }
    }
}

/// The person an event belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl UserRef {
    /// `"First Last"`, trimmed when either part is empty.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// Presence of a variant-specific attribute on an event.
///
/// Filters treat [`Attr::NotApplicable`] as a pass (the dimension does not
/// concern this variant) and [`Attr::Unset`] as a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr<T> {
    NotApplicable,
    Unset,
    Value(T),
}

impl<T> Attr<T> {
    fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Value)
    }

    /// The value, if the variant carries one.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotApplicable | Self::Unset => None,
        }
    }
}

/// Variant-specific payload of a [`CalendarEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum EventKind {
    Assignment {
        location: Option<NamedRef>,
        team: Option<NamedRef>,
        specialty: Option<NamedRef>,
    },
    Leave {
        leave_type: String,
        status: LeaveStatus,
        counted_days: Option<f64>,
    },
    Duty {
        location: Option<NamedRef>,
    },
    OnCall {
        location: Option<NamedRef>,
    },
    Training {
        location: Option<NamedRef>,
        specialty: Option<NamedRef>,
        trainer: Option<String>,
    },
    Meeting {
        location: Option<NamedRef>,
        team: Option<NamedRef>,
        participants: Vec<String>,
    },
    Holiday {
        is_national: bool,
        regions: Vec<String>,
    },
    Other,
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Assignment { .. } => EventType::Assignment,
            Self::Leave { .. } => EventType::Leave,
            Self::Duty { .. } => EventType::Duty,
            Self::OnCall { .. } => EventType::OnCall,
            Self::Training { .. } => EventType::Training,
            Self::Meeting { .. } => EventType::Meeting,
            Self::Holiday { .. } => EventType::Holiday,
            Self::Other => EventType::Other,
        }
    }

    pub fn location(&self) -> Attr<&NamedRef> {
        match self {
            Self::Assignment { location, .. }
            | Self::Duty { location }
            | Self::OnCall { location }
            | Self::Training { location, .. }
            | Self::Meeting { location, .. } => Attr::from_option(location.as_ref()),
            Self::Leave { .. } | Self::Holiday { .. } | Self::Other => Attr::NotApplicable,
        }
    }

    pub fn team(&self) -> Attr<&NamedRef> {
        match self {
            Self::Assignment { team, .. } | Self::Meeting { team, .. } => {
                Attr::from_option(team.as_ref())
            }
            Self::Leave { .. }
            | Self::Duty { .. }
            | Self::OnCall { .. }
            | Self::Training { .. }
            | Self::Holiday { .. }
            | Self::Other => Attr::NotApplicable,
        }
    }

    pub fn specialty(&self) -> Attr<&NamedRef> {
        match self {
            Self::Assignment { specialty, .. } | Self::Training { specialty, .. } => {
                Attr::from_option(specialty.as_ref())
            }
            Self::Leave { .. }
            | Self::Duty { .. }
            | Self::OnCall { .. }
            | Self::Meeting { .. }
            | Self::Holiday { .. }
            | Self::Other => Attr::NotApplicable,
        }
    }

    pub fn leave_type(&self) -> Attr<&str> {
        match self {
            Self::Leave { leave_type, .. } => Attr::Value(leave_type.as_str()),
            _ => Attr::NotApplicable,
        }
    }

    pub fn leave_status(&self) -> Attr<LeaveStatus> {
        match self {
            Self::Leave { status, .. } => Attr::Value(*status),
            _ => Attr::NotApplicable,
        }
    }

    /// Whether user-based filters concern this variant. Public holidays
    /// belong to nobody.
    pub fn has_owner(&self) -> bool {
        !matches!(self, Self::Holiday { .. })
    }
}

// ── CalendarEvent ───────────────────────────────────────────────────

/// A time-bounded calendar entry. `start <= end` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl CalendarEvent {
    /// Build an event, rejecting `start > end` and blank ids.
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        kind: EventKind,
    ) -> Result<Self, CoreError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::validation("event id must not be empty"));
        }
        DateRange::new(start, end)?;
        Ok(Self {
            id,
            title: title.into(),
            start,
            end,
            description: None,
            all_day: false,
            user: None,
            kind,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_user(mut self, user: UserRef) -> Self {
        self.user = Some(user);
        self
    }

    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    /// The `[start, end]` span covered by this event.
    pub fn span(&self) -> DateRange {
        DateRange::spanning(self.start, self.end)
    }

    /// Inclusive overlap with `range`.
    pub fn overlaps(&self, range: &DateRange) -> bool {
        self.end >= range.start() && self.start <= range.end()
    }
}

// ── EventDraft ──────────────────────────────────────────────────────

/// An event not yet persisted by the backend (no id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl EventDraft {
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        kind: EventKind,
    ) -> Result<Self, CoreError> {
        DateRange::new(start, end)?;
        Ok(Self {
            title: title.into(),
            start,
            end,
            description: None,
            all_day: false,
            user: None,
            kind,
        })
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::validation("event title must not be empty"));
        }
        DateRange::new(self.start, self.end).map(|_| ())
    }

    /// Attach the identifier assigned by the backend.
    pub fn into_event(self, id: impl Into<EventId>) -> CalendarEvent {
        CalendarEvent {
            id: id.into(),
            title: self.title,
            start: self.start,
            end: self.end,
            description: self.description,
            all_day: self.all_day,
            user: self.user,
            kind: self.kind,
        }
    }
}

impl From<CalendarEvent> for EventDraft {
    fn from(event: CalendarEvent) -> Self {
        Self {
            title: event.title,
            start: event.start,
            end: event.end,
            description: event.description,
            all_day: event.all_day,
            user: event.user,
            kind: event.kind,
        }
    }
}
