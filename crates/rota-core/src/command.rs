// ── Command API ──
//
// All writes flow through a unified `Command` enum. The controller sends
// each one to the data source, then applies the result to local state as
// a `Mutation` so views update without waiting for a refetch.

use std::sync::Arc;

use crate::error::CoreError;
use crate::model::{CalendarEvent, EventDraft, EventId, EventType, LeaveStatus};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// Write operations against the calendar backend.
#[derive(Debug, Clone)]
pub enum Command {
    CreateEvent(EventDraft),
    UpdateEvent(CalendarEvent),
    /// The backend routes deletions by type.
    DeleteEvent {
        id: EventId,
        event_type: EventType,
    },
    UpdateLeaveStatus {
        id: EventId,
        status: LeaveStatus,
    },
}

/// Outcome of a successful [`Command`].
#[derive(Debug, Clone)]
pub enum CommandResult {
    Created(Arc<CalendarEvent>),
    Updated(Arc<CalendarEvent>),
    Deleted(EventId),
}

/// A local change to the event store.
#[derive(Debug, Clone)]
pub enum Mutation {
    Add(CalendarEvent),
    Update(CalendarEvent),
    Remove(EventId),
}

impl Mutation {
    pub fn id(&self) -> &str {
        match self {
            Self::Add(e) | Self::Update(e) => &e.id,
            Self::Remove(id) => id,
        }
    }
}
