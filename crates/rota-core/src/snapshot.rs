// ── Published calendar state ──

use std::sync::Arc;

use crate::cache::FilterSignature;
use crate::error::CoreError;
use crate::model::{CalendarEvent, CalendarFilters, ColorScheme, DateRange};
use crate::navigation::NavigationState;

/// Shared, ordered list of events.
pub type EventList = Arc<Vec<Arc<CalendarEvent>>>;

/// Everything a view needs to render, published after every state change.
#[derive(Debug, Clone)]
pub struct CalendarSnapshot {
    /// Raw events for the current window, as last fetched or mutated.
    pub events: EventList,
    /// `events` narrowed by `filters`, ordered by start then id.
    pub filtered_events: EventList,
    /// A fetch for `signature` is in flight.
    pub loading: bool,
    /// The last fetch failed. `events` still holds the previous data.
    pub error: Option<CoreError>,
    /// `events` came from the cache rather than the data source.
    pub cache_hit: bool,
    pub filters: CalendarFilters,
    pub navigation: NavigationState,
    pub signature: FilterSignature,
    pub color_scheme: ColorScheme,
}

impl CalendarSnapshot {
    /// The visible window.
    pub fn range(&self) -> DateRange {
        self.navigation.range()
    }

    /// Label for the visible window (`"March 2024"`).
    pub fn title(&self) -> String {
        self.navigation.title()
    }
}
