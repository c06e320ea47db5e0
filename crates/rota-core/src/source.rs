// ── Event source ──
//
// The data collaborator consumed by the controller. The production
// implementation is the HTTP `CalendarClient`; tests supply their own.

use async_trait::async_trait;
use tracing::debug;

use rota_api::CalendarClient;

use crate::convert::{draft_to_wire, event_from_wire, events_from_wire, query_from_filters};
use crate::error::CoreError;
use crate::model::{CalendarEvent, CalendarFilters, EventDraft, EventType, LeaveStatus};

/// Where calendar events come from and where writes go.
#[async_trait]
pub trait EventSource: Send + Sync + 'static {
    /// Events matching `filters`. Implementations may over-fetch; the
    /// controller re-applies the filters locally.
    async fn fetch_events(&self, filters: &CalendarFilters) -> Result<Vec<CalendarEvent>, CoreError>;

    async fn create_event(&self, draft: &EventDraft) -> Result<CalendarEvent, CoreError>;

    async fn update_event(&self, event: &CalendarEvent) -> Result<CalendarEvent, CoreError>;

    async fn delete_event(&self, id: &str, event_type: EventType) -> Result<(), CoreError>;

    async fn update_status(&self, id: &str, status: LeaveStatus) -> Result<CalendarEvent, CoreError>;
}

#[async_trait]
impl EventSource for CalendarClient {
    async fn fetch_events(&self, filters: &CalendarFilters) -> Result<Vec<CalendarEvent>, CoreError> {
        let raw = self.list_events(&query_from_filters(filters)).await?;
        let received = raw.len();
        let events = events_from_wire(raw);
        debug!(received, kept = events.len(), "converted calendar events");
        Ok(events)
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<CalendarEvent, CoreError> {
        let created = CalendarClient::create_event(self, &draft_to_wire(draft)).await?;
        event_from_wire(created)
    }

    async fn update_event(&self, event: &CalendarEvent) -> Result<CalendarEvent, CoreError> {
        let body = draft_to_wire(&EventDraft::from(event.clone()));
        let updated = CalendarClient::update_event(self, &event.id, &body).await?;
        event_from_wire(updated)
    }

    async fn delete_event(&self, id: &str, event_type: EventType) -> Result<(), CoreError> {
        CalendarClient::delete_event(self, id, event_type.as_ref()).await?;
        Ok(())
    }

    async fn update_status(&self, id: &str, status: LeaveStatus) -> Result<CalendarEvent, CoreError> {
        let updated = CalendarClient::update_status(self, id, status.as_ref()).await?;
        event_from_wire(updated)
    }
}
