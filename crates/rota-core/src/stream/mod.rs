// ── Reactive calendar stream ──
//
// Subscription handle over the controller's published snapshots. Views
// bind to this instead of polling the controller.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::snapshot::CalendarSnapshot;

/// A subscription to the controller's calendar state.
///
/// Provides both point-in-time access and change notification via
/// [`changed()`](Self::changed) or by converting into a `Stream`.
pub struct CalendarStream {
    current: Arc<CalendarSnapshot>,
    receiver: watch::Receiver<Arc<CalendarSnapshot>>,
}

impl CalendarStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<CalendarSnapshot>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation time (or at the last `changed()`).
    pub fn current(&self) -> &Arc<CalendarSnapshot> {
        &self.current
    }

    /// The latest published snapshot.
    pub fn latest(&self) -> Arc<CalendarSnapshot> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next publication.
    /// Returns `None` once the controller has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<CalendarSnapshot>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> CalendarWatchStream {
        CalendarWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding every published snapshot.
pub struct CalendarWatchStream {
    inner: WatchStream<Arc<CalendarSnapshot>>,
}

impl Stream for CalendarWatchStream {
    type Item = Arc<CalendarSnapshot>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
