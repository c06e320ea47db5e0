// ── Raw event store ──
//
// Concurrent storage for the events of the current window, with O(1)
// lookups by id and a chronologically ordered snapshot rebuilt on every
// mutation.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::filter::chronological;
use crate::model::CalendarEvent;

pub(crate) struct EventStore {
    /// Primary storage: event id -> event.
    by_id: DashMap<String, Arc<CalendarEvent>>,

    /// Ordered snapshot, rebuilt on mutation.
    snapshot: watch::Sender<Arc<Vec<Arc<CalendarEvent>>>>,
}

impl EventStore {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_id: DashMap::new(),
            snapshot,
        }
    }

    /// Insert or update an event. Returns the previous value, if any.
    pub(crate) fn upsert(&self, event: CalendarEvent) -> Option<Arc<CalendarEvent>> {
        let previous = self.by_id.insert(event.id.clone(), Arc::new(event));
        self.rebuild_snapshot();
        previous
    }

    /// Remove an event by id. Returns the removed event if it existed.
    pub(crate) fn remove(&self, id: &str) -> Option<Arc<CalendarEvent>> {
        let removed = self.by_id.remove(id).map(|(_, v)| v);
        if removed.is_some() {
            self.rebuild_snapshot();
        }
        removed
    }

    pub(crate) fn get(&self, id: &str) -> Option<Arc<CalendarEvent>> {
        self.by_id.get(id).map(|r| Arc::clone(r.value()))
    }

    /// Replace the contents wholesale with `events`.
    ///
    /// Upserts first, then prunes ids not in the incoming set, so readers
    /// never observe an empty intermediate state.
    pub(crate) fn replace_all(&self, events: &[Arc<CalendarEvent>]) {
        let incoming: HashSet<&str> = events.iter().map(|e| e.id.as_str()).collect();
        for event in events {
            self.by_id.insert(event.id.clone(), Arc::clone(event));
        }
        self.by_id.retain(|id, _| incoming.contains(id.as_str()));
        self.rebuild_snapshot();
    }

    /// Current ordered snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<CalendarEvent>>> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn rebuild_snapshot(&self) {
        let mut values: Vec<Arc<CalendarEvent>> =
            self.by_id.iter().map(|r| Arc::clone(r.value())).collect();
        values.sort_by(|a, b| chronological(a, b));
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}
