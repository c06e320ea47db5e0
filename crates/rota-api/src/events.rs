// Calendar event endpoints.
//
// Thin wrappers over the HTTP helpers on `CalendarClient`. Paths are
// relative to the client's base URL.

use tracing::debug;

use crate::Error;
use crate::client::CalendarClient;
use crate::models::{ApiEvent, ApiEventInput, EventQuery, StatusUpdate};

const EVENTS_PATH: &str = "api/calendar";

impl CalendarClient {
    /// List events matching `query` (`GET /api/calendar`).
    pub async fn list_events(&self, query: &EventQuery) -> Result<Vec<ApiEvent>, Error> {
        let events: Vec<ApiEvent> = self
            .get_with_params(EVENTS_PATH, &query.to_query_pairs())
            .await?;
        debug!(count = events.len(), "fetched calendar events");
        Ok(events)
    }

    /// Create an event (`POST /api/calendar/events`).
    pub async fn create_event(&self, input: &ApiEventInput) -> Result<ApiEvent, Error> {
        self.post(&format!("{EVENTS_PATH}/events"), input).await
    }

    /// Replace an event (`PUT /api/calendar/events/{id}`).
    pub async fn update_event(&self, id: &str, input: &ApiEventInput) -> Result<ApiEvent, Error> {
        self.put(&format!("{EVENTS_PATH}/events/{id}"), input).await
    }

    /// Delete an event (`DELETE /api/calendar/events/{id}?type=...`).
    ///
    /// The backend routes deletions by event type, so it must be supplied.
    pub async fn delete_event(&self, id: &str, event_type: &str) -> Result<(), Error> {
        self.delete_with_params(
            &format!("{EVENTS_PATH}/events/{id}"),
            &[("type", event_type.to_owned())],
        )
        .await
    }

    /// Change a leave's approval status (`PATCH /api/calendar/events/{id}/status`).
    pub async fn update_status(&self, id: &str, status: &str) -> Result<ApiEvent, Error> {
        self.patch(
            &format!("{EVENTS_PATH}/events/{id}/status"),
            &StatusUpdate {
                status: status.to_owned(),
            },
        )
        .await
    }
}
