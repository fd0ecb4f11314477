//! Session State
//!
//! Per-user session state: the named snapshot store, per-feed tick
//! control state, per-grid selections, and the teardown token.
//!
//! # Ownership
//!
//! Snapshots and tick guards are owned exclusively by their session.
//! Every snapshot mutation happens under the store lock and replaces the
//! row collection wholesale, so observers holding a [`SnapshotRows`]
//! always see a consistent point-in-time view. The lock is never held
//! across a suspension point; the tick loop acquires it once per
//! iteration.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use desk_data::{Row, position_by_id};
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::broadcast::{DashboardHub, SharedHub, SnapshotUpdate};
use crate::infrastructure::config::DashboardConfig;

// =============================================================================
// Types
// =============================================================================

/// An immutable point-in-time row collection for one feed.
pub type SnapshotRows = Arc<[Row]>;

/// Session-level error.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The owning session no longer exists.
    #[error("session no longer exists")]
    Invalidated,
}

// =============================================================================
// Tick Control State
// =============================================================================

/// Per-feed control state for the live tick loop.
///
/// `streaming` is the desired running state, toggled by user action.
/// `guard` is the reentrancy counter: 0 means no active loop, 1 means
/// exactly one. The guard is claimed with a compare-and-swap on loop
/// entry, so only one loop per feed can ever win, and it is released on
/// every exit path.
#[derive(Debug)]
pub struct TickSession {
    streaming: AtomicBool,
    guard: AtomicU32,
    interval: Duration,
}

impl TickSession {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            streaming: AtomicBool::new(false),
            guard: AtomicU32::new(0),
            interval,
        }
    }

    /// Desired running state of the feed.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }

    /// Current guard value (0 = idle, 1 = one active loop).
    #[must_use]
    pub fn guard(&self) -> u32 {
        self.guard.load(Ordering::SeqCst)
    }

    /// Tick cadence for this feed.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    pub(crate) fn set_streaming(&self, streaming: bool) {
        self.streaming.store(streaming, Ordering::SeqCst);
    }

    /// Claim the guard (0 -> 1). Only one claimant can win.
    pub(crate) fn try_claim(&self) -> bool {
        self.guard
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Release the guard (1 -> 0).
    pub(crate) fn release(&self) {
        self.guard.fetch_sub(1, Ordering::SeqCst);
    }
}

// =============================================================================
// Session
// =============================================================================

pub(crate) struct SessionInner {
    store: RwLock<HashMap<String, SnapshotRows>>,
    selections: RwLock<HashMap<String, Vec<Row>>>,
    ticks: RwLock<HashMap<String, Arc<TickSession>>>,
    tick_interval: Duration,
    hub: SharedHub,
    cancel: CancellationToken,
}

impl SessionInner {
    /// Get (or lazily create) the tick control state for a feed.
    ///
    /// Guards are independent per named feed: pausing one feed never
    /// affects another feed's loop.
    pub(crate) fn tick_session(&self, feed: &str) -> Arc<TickSession> {
        if let Some(existing) = self.ticks.read().get(feed) {
            return Arc::clone(existing);
        }
        let mut ticks = self.ticks.write();
        Arc::clone(
            ticks
                .entry(feed.to_string())
                .or_insert_with(|| Arc::new(TickSession::new(self.tick_interval))),
        )
    }

    pub(crate) fn snapshot(&self, feed: &str) -> Option<SnapshotRows> {
        self.store.read().get(feed).cloned()
    }

    pub(crate) fn replace_snapshot(&self, feed: &str, rows: Vec<Row>) {
        let rows: SnapshotRows = Arc::from(rows);
        self.store
            .write()
            .insert(feed.to_string(), Arc::clone(&rows));
        let _ = self.hub.send_snapshot(SnapshotUpdate {
            feed: feed.to_string(),
            rows,
        });
    }

    /// Patch the first row whose identity field matches, wholesale
    /// replacing and republishing the collection on a hit.
    ///
    /// The lookup and swap happen under one write-lock acquisition, so a
    /// concurrent tick cannot interleave between them.
    pub(crate) fn patch_row(
        &self,
        feed: &str,
        row_id: &str,
        updates: &Row,
        id_field: &str,
    ) -> bool {
        let published = {
            let mut store = self.store.write();
            let Some(rows) = store.get(feed) else {
                return false;
            };
            let Some(index) = position_by_id(rows, row_id, id_field) else {
                return false;
            };

            let mut next: Vec<Row> = rows.to_vec();
            next[index] = next[index].merged(updates);
            let next: SnapshotRows = Arc::from(next);
            store.insert(feed.to_string(), Arc::clone(&next));
            next
        };

        let _ = self.hub.send_snapshot(SnapshotUpdate {
            feed: feed.to_string(),
            rows: published,
        });
        true
    }

    pub(crate) fn set_selection(&self, grid_id: &str, rows: Vec<Row>) {
        self.selections.write().insert(grid_id.to_string(), rows);
    }

    pub(crate) fn selection(&self, grid_id: &str) -> Vec<Row> {
        self.selections.read().get(grid_id).cloned().unwrap_or_default()
    }

    pub(crate) fn hub(&self) -> &DashboardHub {
        &self.hub
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// A user session owning its snapshots, selections, and tick loops.
///
/// Cheap to clone (all clones share the same state). Dropping the last
/// clone invalidates the session: any active tick loop observes this on
/// its next iteration and exits, restoring its guard.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Create a session with its own broadcast hub.
    #[must_use]
    pub fn new(config: &DashboardConfig) -> Self {
        Self::with_hub(config, Arc::new(DashboardHub::new(config.channels.clone().into())))
    }

    /// Create a session publishing into an existing hub.
    #[must_use]
    pub fn with_hub(config: &DashboardConfig, hub: SharedHub) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                store: RwLock::new(HashMap::new()),
                selections: RwLock::new(HashMap::new()),
                ticks: RwLock::new(HashMap::new()),
                tick_interval: config.tick.interval,
                hub,
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// The broadcast hub this session publishes into.
    #[must_use]
    pub fn hub(&self) -> SharedHub {
        Arc::clone(&self.inner.hub)
    }

    /// Install (or replace) a named feed snapshot and publish it.
    ///
    /// This is the entry point for loading data from a service into the
    /// session.
    pub fn load_feed(&self, feed: &str, rows: Vec<Row>) {
        tracing::info!(feed, rows = rows.len(), "loading feed snapshot");
        self.inner.replace_snapshot(feed, rows);
    }

    /// Current snapshot of a named feed, if loaded.
    #[must_use]
    pub fn snapshot(&self, feed: &str) -> Option<SnapshotRows> {
        self.inner.snapshot(feed)
    }

    /// Wholesale-replace a named feed snapshot and publish it.
    pub fn replace_snapshot(&self, feed: &str, rows: Vec<Row>) {
        self.inner.replace_snapshot(feed, rows);
    }

    /// Tick control state for a named feed.
    #[must_use]
    pub fn tick_session(&self, feed: &str) -> Arc<TickSession> {
        self.inner.tick_session(feed)
    }

    pub(crate) fn patch_row(&self, feed: &str, row_id: &str, updates: &Row, id_field: &str) -> bool {
        self.inner.patch_row(feed, row_id, updates, id_field)
    }

    pub(crate) fn set_selection(&self, grid_id: &str, rows: Vec<Row>) {
        self.inner.set_selection(grid_id, rows);
    }

    pub(crate) fn selection(&self, grid_id: &str) -> Vec<Row> {
        self.inner.selection(grid_id)
    }

    /// Tear the session down.
    ///
    /// Cancels the session token; active tick loops observe it at their
    /// next iteration boundary and exit, restoring their guards.
    pub fn shutdown(&self) {
        tracing::info!("session shutdown requested");
        self.inner.cancel.cancel();
    }

    pub(crate) fn downgrade(&self) -> std::sync::Weak<SessionInner> {
        Arc::downgrade(&self.inner)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("feeds", &self.inner.store.read().len())
            .field("cancelled", &self.inner.is_cancelled())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> Session {
        Session::new(&DashboardConfig::default())
    }

    fn rows(ids: &[&str]) -> Vec<Row> {
        ids.iter().map(|id| Row::new().with("id", *id)).collect()
    }

    #[test]
    fn load_feed_publishes_to_hub() {
        let session = test_session();
        let mut rx = session.hub().snapshots_rx();

        session.load_feed("positions", rows(&["a", "b"]));

        let update = rx.try_recv().unwrap();
        assert_eq!(update.feed, "positions");
        assert_eq!(update.rows.len(), 2);
    }

    #[test]
    fn replace_is_wholesale_not_in_place() {
        let session = test_session();
        session.load_feed("fx", rows(&["a"]));
        let before = session.snapshot("fx").unwrap();

        session.replace_snapshot("fx", rows(&["a", "b"]));

        // The old reference still sees the old view
        assert_eq!(before.len(), 1);
        assert_eq!(session.snapshot("fx").unwrap().len(), 2);
    }

    #[test]
    fn snapshot_of_unknown_feed_is_none() {
        assert!(test_session().snapshot("nope").is_none());
    }

    #[test]
    fn guard_claim_is_exclusive() {
        let session = test_session();
        let tick = session.tick_session("fx");

        assert!(tick.try_claim());
        assert!(!tick.try_claim());
        assert_eq!(tick.guard(), 1);

        tick.release();
        assert_eq!(tick.guard(), 0);
        assert!(tick.try_claim());
    }

    #[test]
    fn tick_sessions_are_independent_per_feed() {
        let session = test_session();
        let fx = session.tick_session("fx");
        let md = session.tick_session("market_data");

        fx.set_streaming(true);
        assert!(fx.is_streaming());
        assert!(!md.is_streaming());

        // Same feed name returns the same control state
        assert!(session.tick_session("fx").is_streaming());
    }

    #[test]
    fn patch_row_hit_replaces_exactly_one() {
        let session = test_session();
        session.load_feed("positions", rows(&["a", "b", "c"]));

        let updates = Row::new().with("note", "edited");
        assert!(session.patch_row("positions", "b", &updates, "id"));

        let snapshot = session.snapshot("positions").unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[1].text("note"), Some("edited"));
        assert!(snapshot[0].text("note").is_none());
        assert!(snapshot[2].text("note").is_none());
    }

    #[test]
    fn patch_row_miss_is_noop() {
        let session = test_session();
        session.load_feed("positions", rows(&["a"]));
        let before = session.snapshot("positions").unwrap();

        let updates = Row::new().with("note", "edited");
        assert!(!session.patch_row("positions", "zz", &updates, "id"));
        assert!(!session.patch_row("unknown_feed", "a", &updates, "id"));

        assert_eq!(*session.snapshot("positions").unwrap(), *before);
    }

    #[test]
    fn selection_replaced_wholesale() {
        let session = test_session();
        session.set_selection("grid_a", rows(&["a", "b"]));
        session.set_selection("grid_a", rows(&["c"]));
        session.set_selection("grid_b", rows(&["x"]));

        assert_eq!(session.selection("grid_a").len(), 1);
        assert_eq!(session.selection("grid_b").len(), 1);
        assert!(session.selection("grid_c").is_empty());
    }

    #[test]
    fn shutdown_cancels_token() {
        let session = test_session();
        assert!(!session.inner.is_cancelled());

        session.shutdown();

        assert!(session.inner.is_cancelled());
    }
}
