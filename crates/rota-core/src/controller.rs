// ── Controller ──
//
// Orchestrates navigation, filters, the query cache and the data source
// behind a single query surface. Every state change is published as a
// `CalendarSnapshot` on a `watch` channel.
//
// Synchronous state (filters, navigation, preferences) lives behind a
// std `Mutex` that is never held across an await. Fetches are
// single-flight per signature, and a result is committed only if its
// signature is still current when it resolves.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;
use chrono_tz::Tz;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, Clock, FilterSignature, SystemClock, TtlCache, signature_of, spawn_sweeper};
use crate::command::{Command, CommandEnvelope, CommandResult, Mutation};
use crate::config::{ControllerConfig, Preferences};
use crate::error::CoreError;
use crate::filter::{self, chronological};
use crate::model::{CalendarEvent, CalendarFilters, ColorScheme, DateRange, EventKind, FilterDelta, ViewType, WeekStart};
use crate::navigation::{NavigationState, today_in};
use crate::persist::{CACHE_KEY, KeyValueStore, PREFERENCES_KEY};
use crate::snapshot::{CalendarSnapshot, EventList};
use crate::source::EventSource;
use crate::store::EventStore;
use crate::stream::CalendarStream;

const COMMAND_CHANNEL_SIZE: usize = 64;

type SharedFetch = Shared<BoxFuture<'static, Result<EventList, CoreError>>>;
type PersistedCache = Vec<(FilterSignature, CacheEntry<EventList>)>;

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for views.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Call
/// [`start()`](Self::start) before issuing commands and
/// [`shutdown()`](Self::shutdown) when done.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    source: Arc<dyn EventSource>,
    cache: Arc<TtlCache<EventList>>,
    store: EventStore,
    clock: Arc<dyn Clock>,
    persistence: Option<Arc<dyn KeyValueStore>>,
    persist_preferences: bool,
    state: Mutex<ViewState>,
    published: watch::Sender<Arc<CalendarSnapshot>>,
    in_flight: DashMap<FilterSignature, SharedFetch>,
    /// Sequence number of the latest local mutation.
    mutations: AtomicU64,
    running: AtomicBool,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: tokio::sync::Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    task_handles: tokio::sync::Mutex<Vec<JoinHandle<()>>>,
}

/// Mutable view state. `filters.date_range` always equals
/// `navigation.range()` once a query has run.
struct ViewState {
    filters: CalendarFilters,
    navigation: NavigationState,
    preferences: Preferences,
    signature: FilterSignature,
    /// Local mutations made while at least one fetch is awaiting, replayed
    /// over that fetch's result so it cannot revert them.
    pending_changes: Vec<(u64, LocalChange)>,
    open_fetches: usize,
}

#[derive(Debug, Clone)]
enum LocalChange {
    Upsert(CalendarEvent),
    Remove(String),
}

impl ViewState {
    /// Re-derive the date range and signature after a navigation change.
    fn resync(&mut self) {
        self.filters = self.filters.with_date_range(self.navigation.range());
        self.signature = signature_of(&self.filters);
    }
}

// ── Builder ──────────────────────────────────────────────────────

/// Assembles a [`Controller`] around an [`EventSource`].
pub struct ControllerBuilder {
    source: Arc<dyn EventSource>,
    config: ControllerConfig,
    preferences: Preferences,
    clock: Arc<dyn Clock>,
    persistence: Option<Arc<dyn KeyValueStore>>,
    persist_preferences: bool,
    anchor: Option<NaiveDate>,
}

impl ControllerBuilder {
    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Time source for cache expiry and "today".
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Persist the cache (and, unless disabled, preferences) to `store`.
    pub fn persistence(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.persistence = Some(store);
        self
    }

    /// Whether preferences are restored on start and saved on shutdown.
    pub fn persist_preferences(mut self, enabled: bool) -> Self {
        self.persist_preferences = enabled;
        self
    }

    /// Initial anchor date. Defaults to today in the configured timezone.
    pub fn anchor(mut self, anchor: NaiveDate) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn build(self) -> Controller {
        let prefs = self.preferences;
        let anchor = self
            .anchor
            .unwrap_or_else(|| today_in(prefs.timezone, self.clock.now()));
        let navigation =
            NavigationState::new(anchor, prefs.default_view, prefs.week_starts_on, prefs.timezone);

        let mut state = ViewState {
            filters: self.config.initial_filters.clone(),
            navigation,
            preferences: prefs,
            signature: signature_of(&CalendarFilters::default()),
            pending_changes: Vec::new(),
            open_fetches: 0,
        };
        state.resync();

        let cache = Arc::new(TtlCache::with_clock(
            self.config.cache_ttl,
            Arc::clone(&self.clock),
        ));
        let store = EventStore::new();
        let initial = Arc::new(CalendarSnapshot {
            events: store.snapshot(),
            filtered_events: Arc::new(Vec::new()),
            loading: false,
            error: None,
            cache_hit: false,
            filters: state.filters.clone(),
            navigation: state.navigation,
            signature: state.signature.clone(),
            color_scheme: prefs.color_scheme,
        });
        let (published, _) = watch::channel(initial);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        Controller {
            inner: Arc::new(ControllerInner {
                config: self.config,
                source: self.source,
                cache,
                store,
                clock: self.clock,
                persistence: self.persistence,
                persist_preferences: self.persist_preferences,
                state: Mutex::new(state),
                published,
                in_flight: DashMap::new(),
                mutations: AtomicU64::new(0),
                running: AtomicBool::new(false),
                command_tx,
                command_rx: tokio::sync::Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                task_handles: tokio::sync::Mutex::new(Vec::new()),
            }),
        }
    }
}

impl Controller {
    pub fn builder(source: Arc<dyn EventSource>) -> ControllerBuilder {
        ControllerBuilder {
            source,
            config: ControllerConfig::default(),
            preferences: Preferences::default(),
            clock: Arc::new(SystemClock),
            persistence: None,
            persist_preferences: true,
            anchor: None,
        }
    }

    /// Controller with default preferences and no persistence.
    pub fn new(config: ControllerConfig, source: Arc<dyn EventSource>) -> Self {
        Self::builder(source).config(config).build()
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// Access the query cache.
    pub fn cache(&self) -> &TtlCache<EventList> {
        &self.inner.cache
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Restore persisted state and spawn background tasks (cache sweeper,
    /// command processor, optional periodic refresh). Idempotent.
    pub async fn start(&self) -> Result<(), CoreError> {
        let Some(rx) = self.inner.command_rx.lock().await.take() else {
            debug!("controller already started");
            return Ok(());
        };

        self.rehydrate();

        let mut handles = self.inner.task_handles.lock().await;

        handles.push(spawn_sweeper(
            Arc::clone(&self.inner.cache),
            self.inner.config.sweep_interval,
            self.inner.cancel.clone(),
        ));

        let ctrl = self.clone();
        handles.push(tokio::spawn(command_processor_task(ctrl, rx)));

        if let Some(every) = self.inner.config.refresh_interval {
            let ctrl = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(refresh_task(ctrl, every, cancel)));
        }

        self.inner.running.store(true, Ordering::Release);
        info!(
            cache_ttl = ?self.inner.config.cache_ttl,
            refresh = ?self.inner.config.refresh_interval,
            "controller started"
        );
        Ok(())
    }

    /// Cancel background tasks and persist state.
    pub async fn shutdown(&self) {
        self.inner.running.store(false, Ordering::Release);
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        self.persist();
        debug!("controller stopped");
    }

    /// Write the live cache and preferences to the key/value store.
    /// Failures are logged, never returned.
    pub fn persist(&self) {
        let Some(ref store) = self.inner.persistence else {
            return;
        };

        let entries: PersistedCache = self.inner.cache.export();
        let count = entries.len();
        match serde_json::to_string(&entries) {
            Ok(json) => match store.set(CACHE_KEY, &json) {
                Ok(()) => debug!(entries = count, "persisted cache"),
                Err(e) => warn!(error = %e, "failed to persist cache"),
            },
            Err(e) => warn!(error = %e, "failed to encode cache"),
        }

        if self.inner.persist_preferences {
            let prefs = self.state().preferences;
            match serde_json::to_string(&prefs) {
                Ok(json) => {
                    if let Err(e) = store.set(PREFERENCES_KEY, &json) {
                        warn!(error = %e, "failed to persist preferences");
                    }
                }
                Err(e) => warn!(error = %e, "failed to encode preferences"),
            }
        }
    }

    /// Load persisted cache entries (expired ones are dropped) and
    /// preferences. Corrupt state is discarded.
    fn rehydrate(&self) {
        let Some(ref store) = self.inner.persistence else {
            return;
        };

        match store.get(CACHE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<PersistedCache>(&json) {
                Ok(entries) => {
                    let total = entries.len();
                    let loaded = self.inner.cache.rehydrate(entries);
                    debug!(loaded, discarded = total - loaded, "rehydrated cache");
                }
                Err(e) => {
                    warn!(error = %e, "discarding unreadable persisted cache");
                    let _ = store.remove(CACHE_KEY);
                }
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to read persisted cache"),
        }

        if !self.inner.persist_preferences {
            return;
        }
        match store.get(PREFERENCES_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Preferences>(&json) {
                Ok(prefs) => {
                    let mut state = self.state();
                    state.preferences = prefs;
                    state.navigation = NavigationState::new(
                        state.navigation.anchor,
                        prefs.default_view,
                        prefs.week_starts_on,
                        prefs.timezone,
                    );
                    state.resync();
                    debug!(?prefs, "restored preferences");
                }
                Err(e) => {
                    warn!(error = %e, "discarding unreadable preferences");
                    let _ = store.remove(PREFERENCES_KEY);
                }
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to read preferences"),
        }
    }

    // ── Queries ──────────────────────────────────────────────────

    /// Merge `delta` into the current filters, pin the date range to the
    /// navigation window, and resolve from cache or the data source.
    ///
    /// Only invalid filters produce `Err`; fetch failures are reported in
    /// the returned snapshot's `error` field.
    pub async fn query(&self, delta: FilterDelta) -> Result<Arc<CalendarSnapshot>, CoreError> {
        let (filters, signature) = {
            let mut state = self.state();
            let range = state.navigation.range();
            let filters = delta.apply_to(&state.filters)?.with_date_range(range);
            state.signature = signature_of(&filters);
            state.filters = filters.clone();
            (filters, state.signature.clone())
        };
        Ok(self.resolve(filters, signature).await)
    }

    async fn resolve(&self, filters: CalendarFilters, signature: FilterSignature) -> Arc<CalendarSnapshot> {
        if let Some(events) = self.inner.cache.get(&signature) {
            debug!(%signature, events = events.len(), "cache hit");
            let state = self.state();
            if state.signature != signature {
                debug!(%signature, "discarding stale cache hit");
                return self.snapshot();
            }
            self.inner.store.replace_all(&events);
            return self.publish_locked(&state, false, None, true);
        }

        debug!(%signature, "cache miss, fetching");
        {
            let state = self.state();
            if state.signature == signature {
                let prev = self.snapshot();
                self.publish_locked(&state, true, None, prev.cache_hit);
            }
        }

        // Registered under the state lock so `mutate` either happens before
        // `mutations_before` is read or is recorded for replay.
        let (mutations_before, pending) = {
            let mut state = self.state();
            state.open_fetches += 1;
            let fetch = self.fetch_shared(&filters, &signature);
            (
                self.inner.mutations.load(Ordering::Acquire),
                PendingFetch {
                    controller: self,
                    signature: signature.clone(),
                    fetch,
                },
            )
        };
        let result = pending.fetch.clone().await;

        let state = self.state();
        if state.signature != signature {
            debug!(%signature, "discarding stale fetch result");
            return self.snapshot();
        }

        match result {
            Ok(events) => {
                let replay: Vec<&LocalChange> = state
                    .pending_changes
                    .iter()
                    .filter(|(seq, _)| *seq > mutations_before)
                    .map(|(_, change)| change)
                    .collect();
                self.inner.store.replace_all(&events);
                if replay.is_empty() {
                    self.inner
                        .cache
                        .put(signature.clone(), Arc::clone(&events), filters.date_range);
                } else {
                    debug!(%signature, replayed = replay.len(), "local mutation during fetch, result not cached");
                    for change in replay {
                        match change {
                            LocalChange::Upsert(event) => {
                                self.inner.store.upsert(event.clone());
                            }
                            LocalChange::Remove(id) => {
                                self.inner.store.remove(id);
                            }
                        }
                    }
                }
                debug!(%signature, events = self.inner.store.len(), "fetch committed");
                self.publish_locked(&state, false, None, false)
            }
            Err(e) => {
                warn!(error = %e, %signature, "calendar fetch failed");
                self.publish_locked(&state, false, Some(e), false)
            }
        }
    }

    /// Join the in-flight fetch for `signature`, or start one.
    fn fetch_shared(&self, filters: &CalendarFilters, signature: &FilterSignature) -> SharedFetch {
        match self.inner.in_flight.entry(signature.clone()) {
            Entry::Occupied(existing) => {
                debug!(%signature, "joining in-flight fetch");
                existing.get().clone()
            }
            Entry::Vacant(slot) => {
                let source = Arc::clone(&self.inner.source);
                let filters = filters.clone();
                let fetch = async move {
                    let mut events = source.fetch_events(&filters).await?;
                    events.sort_by(chronological);
                    Ok(Arc::new(events.into_iter().map(Arc::new).collect()))
                }
                .boxed()
                .shared();
                slot.insert(fetch.clone());
                fetch
            }
        }
    }

    /// Drop the current window's cache entry (or the whole cache when
    /// `force`) and re-run the query.
    pub async fn refresh(&self, force: bool) -> Result<Arc<CalendarSnapshot>, CoreError> {
        if force {
            self.inner.cache.clear();
            info!("cache cleared for forced refresh");
        } else {
            let signature = self.state().signature.clone();
            self.inner.cache.invalidate(&signature);
        }
        self.query(FilterDelta::none()).await
    }

    // ── Local mutations ──────────────────────────────────────────

    /// Apply a change to the local event store, re-derive the filtered
    /// projection and invalidate cached windows touched by the change.
    pub fn mutate(&self, mutation: Mutation) -> Arc<CalendarSnapshot> {
        let mut state = self.state();
        let seq = self.inner.mutations.fetch_add(1, Ordering::AcqRel) + 1;

        let id = mutation.id().to_owned();
        let mut spans: Vec<DateRange> = Vec::with_capacity(2);
        if let Some(old) = self.inner.store.get(&id) {
            spans.push(old.span());
        }

        match mutation {
            Mutation::Add(event) | Mutation::Update(event) => {
                spans.push(event.span());
                if state.open_fetches > 0 {
                    state.pending_changes.push((seq, LocalChange::Upsert(event.clone())));
                }
                self.inner.store.upsert(event);
            }
            Mutation::Remove(_) => {
                if state.open_fetches > 0 {
                    state.pending_changes.push((seq, LocalChange::Remove(id.clone())));
                }
                self.inner.store.remove(&id);
            }
        }

        let invalidated = self.inner.cache.invalidate_where(|_, entry| {
            let window_hit = entry
                .range
                .is_none_or(|window| spans.iter().any(|span| window.overlaps(span)));
            window_hit || entry.data.iter().any(|e| e.id == id)
        });
        debug!(%id, invalidated, "applied local mutation");

        let prev = self.snapshot();
        self.publish_locked(&state, prev.loading, prev.error.clone(), prev.cache_hit)
    }

    /// Send a write to the data source and apply the result locally.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if !self.inner.running.load(Ordering::Acquire) {
            return Err(CoreError::NotRunning);
        }

        let (tx, rx) = tokio::sync::oneshot::channel();
        self.inner
            .command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::NotRunning)?;

        rx.await.map_err(|_| CoreError::NotRunning)?
    }

    // ── Navigation ───────────────────────────────────────────────

    async fn navigate(
        &self,
        step: impl FnOnce(NavigationState) -> NavigationState + Send,
    ) -> Result<Arc<CalendarSnapshot>, CoreError> {
        {
            let mut state = self.state();
            state.navigation = step(state.navigation);
            state.resync();
        }
        self.query(FilterDelta::none()).await
    }

    pub async fn next(&self) -> Result<Arc<CalendarSnapshot>, CoreError> {
        self.navigate(NavigationState::next).await
    }

    pub async fn previous(&self) -> Result<Arc<CalendarSnapshot>, CoreError> {
        self.navigate(NavigationState::previous).await
    }

    /// Jump to today (in the configured timezone), keeping the view.
    pub async fn today(&self) -> Result<Arc<CalendarSnapshot>, CoreError> {
        let now = self.inner.clock.now();
        self.navigate(|nav| nav.today(today_in(nav.timezone, now)))
            .await
    }

    pub async fn go_to(&self, date: NaiveDate) -> Result<Arc<CalendarSnapshot>, CoreError> {
        self.navigate(|nav| nav.with_anchor(date)).await
    }

    pub async fn set_view(&self, view: ViewType) -> Result<Arc<CalendarSnapshot>, CoreError> {
        self.navigate(|nav| nav.with_view(view)).await
    }

    pub async fn set_week_start(&self, week_start: WeekStart) -> Result<Arc<CalendarSnapshot>, CoreError> {
        self.state().preferences.week_starts_on = week_start;
        self.navigate(|nav| nav.with_week_start(week_start)).await
    }

    /// Change the display timezone. Every cached window boundary shifts,
    /// so the whole cache is dropped.
    pub async fn set_timezone(&self, timezone: Tz) -> Result<Arc<CalendarSnapshot>, CoreError> {
        self.state().preferences.timezone = timezone;
        self.inner.cache.clear();
        info!(%timezone, "timezone changed, cache cleared");
        self.navigate(|nav| nav.with_timezone(timezone)).await
    }

    /// Change the color palette. No refetch.
    pub fn set_color_scheme(&self, scheme: ColorScheme) -> Arc<CalendarSnapshot> {
        let mut state = self.state();
        state.preferences.color_scheme = scheme;
        let prev = self.snapshot();
        self.publish_locked(&state, prev.loading, prev.error.clone(), prev.cache_hit)
    }

    // ── State observation ────────────────────────────────────────

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<CalendarSnapshot> {
        self.inner.published.borrow().clone()
    }

    /// Subscribe to published snapshots.
    pub fn subscribe(&self) -> CalendarStream {
        CalendarStream::new(self.inner.published.subscribe())
    }

    pub fn filters(&self) -> CalendarFilters {
        self.state().filters.clone()
    }

    pub fn navigation(&self) -> NavigationState {
        self.state().navigation
    }

    pub fn preferences(&self) -> Preferences {
        self.state().preferences
    }

    // ── Private helpers ──────────────────────────────────────────

    /// Build and publish a snapshot from the store and `state`.
    fn publish_locked(
        &self,
        state: &ViewState,
        loading: bool,
        error: Option<CoreError>,
        cache_hit: bool,
    ) -> Arc<CalendarSnapshot> {
        let events = self.inner.store.snapshot();
        let filtered = Arc::new(filter::apply_all(&events, &state.filters));
        let snapshot = Arc::new(CalendarSnapshot {
            events,
            filtered_events: filtered,
            loading,
            error,
            cache_hit,
            filters: state.filters.clone(),
            navigation: state.navigation,
            signature: state.signature.clone(),
            color_scheme: state.preferences.color_scheme,
        });
        self.inner.published.send_replace(Arc::clone(&snapshot));
        snapshot
    }
}

// ── In-flight bookkeeping ────────────────────────────────────────

/// One waiter on a shared fetch. Dropping it, on completion or when the
/// waiting future is cancelled, retires the in-flight entry and releases
/// the replay log once no fetch is awaiting.
struct PendingFetch<'a> {
    controller: &'a Controller,
    signature: FilterSignature,
    fetch: SharedFetch,
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        let inner = &self.controller.inner;
        inner
            .in_flight
            .remove_if(&self.signature, |_, f| f.ptr_eq(&self.fetch));

        let mut state = self.controller.state();
        state.open_fetches = state.open_fetches.saturating_sub(1);
        if state.open_fetches == 0 {
            state.pending_changes.clear();
        }
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically re-fetch the visible window.
async fn refresh_task(controller: Controller, every: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(every);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match controller.refresh(false).await {
                    Ok(snap) => {
                        if let Some(ref e) = snap.error {
                            warn!(error = %e, "periodic refresh failed");
                        }
                    }
                    Err(e) => warn!(error = %e, "periodic refresh rejected"),
                }
            }
        }
    }
}

/// Process commands from the mpsc channel one at a time.
async fn command_processor_task(controller: Controller, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = controller.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&controller, envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────

async fn route_command(controller: &Controller, cmd: Command) -> Result<CommandResult, CoreError> {
    let source = &controller.inner.source;

    match cmd {
        Command::CreateEvent(draft) => {
            draft.validate()?;
            let created = source.create_event(&draft).await?;
            info!(id = %created.id, "event created");
            controller.mutate(Mutation::Add(created.clone()));
            Ok(CommandResult::Created(Arc::new(created)))
        }

        Command::UpdateEvent(event) => {
            DateRange::new(event.start, event.end)?;
            let updated = source.update_event(&event).await?;
            info!(id = %updated.id, "event updated");
            controller.mutate(Mutation::Update(updated.clone()));
            Ok(CommandResult::Updated(Arc::new(updated)))
        }

        Command::DeleteEvent { id, event_type } => {
            source.delete_event(&id, event_type).await?;
            info!(%id, "event deleted");
            controller.mutate(Mutation::Remove(id.clone()));
            Ok(CommandResult::Deleted(id))
        }

        Command::UpdateLeaveStatus { id, status } => {
            if let Some(existing) = controller.inner.store.get(&id) {
                if !matches!(existing.kind, EventKind::Leave { .. }) {
                    return Err(CoreError::validation(format!(
                        "event {id} is a {}, not a leave",
                        existing.event_type()
                    )));
                }
            }
            let updated = source.update_status(&id, status).await?;
            info!(%id, %status, "leave status updated");
            controller.mutate(Mutation::Update(updated.clone()));
            Ok(CommandResult::Updated(Arc::new(updated)))
        }
    }
}
