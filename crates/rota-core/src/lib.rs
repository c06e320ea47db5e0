//! rota-core: calendar state between rota-api and its consumers (CLI, HTTP views).
//!
//! The [`Controller`] owns the navigation window, the active filters and a
//! TTL query cache, and publishes every change as a [`CalendarSnapshot`].
//! Events come from any [`EventSource`]; the HTTP [`rota_api::CalendarClient`]
//! implements it out of the box.

pub mod cache;
pub mod command;
pub mod config;
pub mod controller;
pub(crate) mod convert;
pub mod error;
pub mod filter;
pub mod model;
pub mod navigation;
pub mod persist;
pub mod snapshot;
pub mod source;
mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{CacheEntry, Clock, FilterSignature, ManualClock, SystemClock, TtlCache, signature_of};
pub use command::{Command, CommandResult, Mutation};
pub use config::{ControllerConfig, Preferences};
pub use controller::{Controller, ControllerBuilder};
pub use error::CoreError;
pub use navigation::NavigationState;
pub use persist::{FileStore, KeyValueStore, MemoryStore};
pub use snapshot::{CalendarSnapshot, EventList};
pub use source::EventSource;
pub use stream::{CalendarStream, CalendarWatchStream};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Attr, CalendarEvent, CalendarFilters, CalendarFiltersBuilder, ColorScheme, DateRange,
    EventDraft, EventId, EventKind, EventType, FilterDelta, LeaveStatus, NamedRef, UserRef,
    ViewType, WeekStart,
};
