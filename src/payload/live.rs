//! Live payload subscription
//!
//! One task per [`LivePayload`] re-serializes the state on every store
//! change and, while time sync is on, on a fixed period so the timestamp
//! keeps moving. The task owns the only refresh timer; dropping the handle
//! aborts the task and with it the timer.

use super::{PayloadSettings, QrPayload, serialize, time_sync_enabled};
use crate::logging::StructuredLogger;
use crate::store::{ConfigState, ConfigStore};
use crate::timezone::Clock;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tokio_stream::Stream;
use tokio_stream::wrappers::WatchStream;

/// Handle on a running payload derivation
pub struct LivePayload {
    payload: watch::Receiver<QrPayload>,
    refreshing: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

enum Wake {
    StateChanged,
    Tick,
    StoreGone,
}

impl LivePayload {
    /// Start deriving payloads from `store`.
    ///
    /// The first payload is computed before returning. Must be called from
    /// within a Tokio runtime.
    pub fn spawn(store: &ConfigStore, settings: PayloadSettings, clock: Arc<dyn Clock>) -> Self {
        let mut state_rx = store.subscribe();
        let sections = state_rx.borrow_and_update().clone();
        let (tx, payload) = watch::channel(serialize(&sections, settings.capacity, clock.as_ref()));
        let refreshing = Arc::new(AtomicBool::new(false));

        let task = tokio::spawn(run(
            state_rx,
            sections,
            tx,
            settings,
            clock,
            Arc::clone(&refreshing),
        ));

        Self {
            payload,
            refreshing,
            task,
        }
    }

    /// Receiver of every newly derived payload
    pub fn subscribe(&self) -> watch::Receiver<QrPayload> {
        self.payload.clone()
    }

    pub fn current(&self) -> QrPayload {
        self.payload.borrow().clone()
    }

    /// Whether the time-sync refresh timer is armed
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst)
    }

    /// Turn the subscription into a stream that keeps it alive
    pub fn into_stream(self) -> PayloadStream {
        PayloadStream {
            inner: WatchStream::new(self.subscribe()),
            _live: self,
        }
    }
}

impl Drop for LivePayload {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Stream of payloads, current one first; ends the subscription when dropped
pub struct PayloadStream {
    inner: WatchStream<QrPayload>,
    _live: LivePayload,
}

impl Stream for PayloadStream {
    type Item = QrPayload;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<QrPayload>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

async fn run(
    mut state_rx: watch::Receiver<ConfigState>,
    mut sections: ConfigState,
    tx: watch::Sender<QrPayload>,
    settings: PayloadSettings,
    clock: Arc<dyn Clock>,
    refreshing: Arc<AtomicBool>,
) {
    let logger = crate::logging::get_logger("payload");
    let mut refresh = arm(&sections, settings.refresh_interval, &refreshing, &logger);

    loop {
        let wake = tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_ok() { Wake::StateChanged } else { Wake::StoreGone }
            }
            () = next_tick(refresh.as_mut()) => Wake::Tick,
        };

        match wake {
            Wake::StateChanged => {
                sections = state_rx.borrow_and_update().clone();
                // Replaces (and so cancels) any running timer
                refresh = arm(&sections, settings.refresh_interval, &refreshing, &logger);
            }
            Wake::Tick => {}
            Wake::StoreGone => break,
        }

        tx.send_replace(serialize(&sections, settings.capacity, clock.as_ref()));
    }

    refreshing.store(false, Ordering::SeqCst);
    logger.debug("Payload subscription ended");
}

/// Fresh timer when time sync is on, none otherwise
fn arm(
    sections: &ConfigState,
    period: Duration,
    refreshing: &AtomicBool,
    logger: &StructuredLogger,
) -> Option<Interval> {
    let enabled = time_sync_enabled(sections);
    let was_enabled = refreshing.swap(enabled, Ordering::SeqCst);
    if enabled != was_enabled {
        logger.debug(if enabled {
            "Time-sync refresh started"
        } else {
            "Time-sync refresh stopped"
        });
    }
    enabled.then(|| {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    })
}

async fn next_tick(refresh: Option<&mut Interval>) {
    match refresh {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
