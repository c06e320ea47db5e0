// ── Calendar domain model ──
//
// Canonical types shared by the filter engine, the cache and the
// controller. Wire payloads from `rota-api` are converted into these in
// `crate::convert`; nothing downstream sees raw JSON.

pub mod color;
pub mod event;
pub mod filters;
pub mod range;
pub mod view;

// ── Re-exports ──────────────────────────────────────────────────────

pub use color::ColorScheme;
pub use event::{
    Attr, CalendarEvent, EventDraft, EventId, EventKind, EventType, LeaveStatus, NamedRef, UserRef,
};
pub use filters::{CalendarFilters, CalendarFiltersBuilder, FilterDelta};
pub use range::DateRange;
pub use view::{ViewType, WeekStart};
