//! Live Tick Engine
//!
//! Simulates a real-time feed by perturbing a named snapshot at a fixed
//! cadence while streaming is enabled, with at-most-one active loop per
//! feed.
//!
//! # Concurrency Contract
//!
//! - `start`/`stop` are synchronous, non-blocking toggles; they may be
//!   called concurrently with an active loop.
//! - The loop claims the feed's guard with a compare-and-swap at entry;
//!   a second `start()` while a loop is active never enqueues a second
//!   loop.
//! - The guard is released through an RAII drop guard, so every exit
//!   path (streaming turned off, session dropped, token cancelled)
//!   restores it to zero.
//! - Each iteration runs under a single exclusive-acquisition scope that
//!   is dropped before the inter-tick sleep; `stop()` and direct row
//!   edits interleave between iterations, never mid-iteration.

use std::sync::{Arc, Weak};

use desk_data::{FxService, Row};

use crate::domain::session::{Session, SessionError, SessionInner, TickSession};

// =============================================================================
// Perturbation Contract
// =============================================================================

/// A pure snapshot perturbation.
///
/// Implementations must not mutate the input rows; they return the next
/// snapshot computed from the current one. For bid/ask feeds the
/// post-tick invariant `ask >= bid` must hold.
pub trait Ticker: Send + Sync + 'static {
    /// Compute the next snapshot from the current one.
    fn tick(&self, rows: &[Row]) -> Vec<Row>;
}

impl Ticker for FxService {
    fn tick(&self, rows: &[Row]) -> Vec<Row> {
        self.generate_tick(rows)
    }
}

// =============================================================================
// Tick Engine
// =============================================================================

/// Drives the live tick loops of one session.
///
/// Holds the session weakly: if the host drops the session while a loop
/// is active, the loop observes the invalidation at its next iteration
/// and exits without leaking its guard.
pub struct TickEngine {
    session: Weak<SessionInner>,
}

impl TickEngine {
    /// Create an engine for the given session.
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.downgrade(),
        }
    }

    /// Enable streaming for a feed and schedule its loop if idle.
    ///
    /// Idempotent: calling while already streaming leaves the running
    /// loop untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Invalidated`] if the session is gone.
    pub fn start<T: Ticker>(&self, feed: &str, ticker: Arc<T>) -> Result<(), SessionError> {
        let inner = self.session.upgrade().ok_or(SessionError::Invalidated)?;
        let tick = inner.tick_session(feed);
        tick.set_streaming(true);

        if tick.guard() == 0 {
            tracing::debug!(feed, "scheduling tick loop");
            tokio::spawn(tick_loop(
                Weak::clone(&self.session),
                feed.to_string(),
                ticker as Arc<dyn Ticker>,
            ));
        }
        Ok(())
    }

    /// Disable streaming for a feed.
    ///
    /// Advisory and non-blocking: an in-flight tick is never interrupted,
    /// but the loop observes the flag within one interval and exits.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Invalidated`] if the session is gone.
    pub fn stop(&self, feed: &str) -> Result<(), SessionError> {
        let inner = self.session.upgrade().ok_or(SessionError::Invalidated)?;
        inner.tick_session(feed).set_streaming(false);
        Ok(())
    }

    /// Toggle streaming for a feed, returning the new desired state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Invalidated`] if the session is gone.
    pub fn toggle<T: Ticker>(&self, feed: &str, ticker: Arc<T>) -> Result<bool, SessionError> {
        let inner = self.session.upgrade().ok_or(SessionError::Invalidated)?;
        if inner.tick_session(feed).is_streaming() {
            self.stop(feed)?;
            Ok(false)
        } else {
            self.start(feed, ticker)?;
            Ok(true)
        }
    }

    /// Whether streaming is currently desired for a feed.
    #[must_use]
    pub fn is_streaming(&self, feed: &str) -> bool {
        self.session
            .upgrade()
            .is_some_and(|inner| inner.tick_session(feed).is_streaming())
    }
}

// =============================================================================
// Loop Body
// =============================================================================

/// Releases the claimed guard on every exit path.
struct GuardRelease(Arc<TickSession>);

impl Drop for GuardRelease {
    fn drop(&mut self) {
        self.0.release();
    }
}

async fn tick_loop(session: Weak<SessionInner>, feed: String, ticker: Arc<dyn Ticker>) {
    let Some(tick) = session.upgrade().map(|inner| inner.tick_session(&feed)) else {
        return;
    };

    // Only one claimant can move the guard 0 -> 1; losers exit before
    // touching any session state.
    if !tick.try_claim() {
        tracing::trace!(feed, "tick loop already active");
        return;
    }
    let _release = GuardRelease(Arc::clone(&tick));

    let interval = tick.interval();
    tracing::debug!(feed, ?interval, "tick loop started");

    loop {
        // Exclusive-acquisition scope: dropped before the sleep so other
        // session operations interleave between iterations.
        let cancel = {
            let Some(inner) = session.upgrade() else {
                tracing::debug!(feed, "session invalidated, stopping tick loop");
                break;
            };
            if inner.is_cancelled() || !tick.is_streaming() {
                break;
            }

            let current = inner.snapshot(&feed).unwrap_or_else(|| Arc::from(Vec::new()));
            let next = ticker.tick(&current);
            inner.replace_snapshot(&feed, next);
            inner.cancellation()
        };

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }

    tracing::debug!(feed, "tick loop stopped");
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::infrastructure::config::{DashboardConfig, TickSettings};

    fn fast_config() -> DashboardConfig {
        DashboardConfig {
            tick: TickSettings {
                interval: Duration::from_millis(10),
            },
            ..DashboardConfig::default()
        }
    }

    struct CountingTicker;

    impl Ticker for CountingTicker {
        fn tick(&self, rows: &[Row]) -> Vec<Row> {
            rows.iter()
                .map(|row| {
                    let n = row.number("ticks").unwrap_or_default();
                    let mut next = row.clone();
                    next.set("ticks", n + rust_decimal::Decimal::ONE);
                    next
                })
                .collect()
        }
    }

    fn counting_ticker() -> Arc<CountingTicker> {
        Arc::new(CountingTicker)
    }

    #[tokio::test]
    async fn loop_ticks_until_stopped() {
        let session = Session::new(&fast_config());
        session.load_feed("fx", vec![Row::new().with("id", "a")]);
        let engine = TickEngine::new(&session);

        engine.start("fx", counting_ticker()).unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        engine.stop("fx").unwrap();

        // One more interval for the loop to observe the flag
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(session.tick_session("fx").guard(), 0);

        let ticks = session.snapshot("fx").unwrap()[0].number("ticks").unwrap();
        assert!(ticks >= rust_decimal::Decimal::from(2));

        // No further updates after stop
        let frozen = session.snapshot("fx").unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(*session.snapshot("fx").unwrap(), *frozen);
    }

    #[tokio::test]
    async fn double_start_runs_a_single_loop() {
        let session = Session::new(&fast_config());
        session.load_feed("fx", vec![Row::new().with("id", "a")]);
        let engine = TickEngine::new(&session);

        engine.start("fx", counting_ticker()).unwrap();
        engine.start("fx", counting_ticker()).unwrap();
        tokio::time::sleep(Duration::from_millis(35)).await;

        let tick = session.tick_session("fx");
        assert!(tick.guard() <= 1);

        // A single stop ends updates
        engine.stop("fx").unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(tick.guard(), 0);
    }

    #[tokio::test]
    async fn toggle_flips_desired_state() {
        let session = Session::new(&fast_config());
        let engine = TickEngine::new(&session);

        assert!(engine.toggle("fx", counting_ticker()).unwrap());
        assert!(engine.is_streaming("fx"));
        assert!(!engine.toggle("fx", counting_ticker()).unwrap());
        assert!(!engine.is_streaming("fx"));
    }

    #[tokio::test]
    async fn dropped_session_invalidates_engine() {
        let session = Session::new(&fast_config());
        let engine = TickEngine::new(&session);
        drop(session);

        assert!(matches!(
            engine.start("fx", counting_ticker()),
            Err(SessionError::Invalidated)
        ));
        assert!(!engine.is_streaming("fx"));
    }

    #[tokio::test]
    async fn shutdown_stops_loop_and_restores_guard() {
        let session = Session::new(&fast_config());
        session.load_feed("fx", vec![Row::new().with("id", "a")]);
        let engine = TickEngine::new(&session);

        engine.start("fx", counting_ticker()).unwrap();
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(session.tick_session("fx").guard(), 1);

        session.shutdown();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(session.tick_session("fx").guard(), 0);
    }

    #[tokio::test]
    async fn loop_on_unloaded_feed_ticks_empty_snapshot() {
        let session = Session::new(&fast_config());
        let engine = TickEngine::new(&session);

        engine.start("ghost", counting_ticker()).unwrap();
        tokio::time::sleep(Duration::from_millis(25)).await;
        engine.stop("ghost").unwrap();

        // The loop installed (empty) snapshots without panicking
        assert_eq!(session.snapshot("ghost").unwrap().len(), 0);
    }
}
