//! Cross-thread access to a timeline.
//!
//! The timeline itself is single-threaded. Hosts that tick playback from a
//! timer thread share it through [`SharedTimeline`], which serializes every
//! command, gesture update and tick behind one lock.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{select, Receiver, Sender};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::timeline::Timeline;

/// A timeline behind a single-writer lock.
#[derive(Debug, Clone)]
pub struct SharedTimeline {
    inner: Arc<Mutex<Timeline>>,
}

impl SharedTimeline {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            inner: Arc::new(Mutex::new(timeline)),
        }
    }

    /// Exclusive access until the guard drops.
    pub fn lock(&self) -> MutexGuard<'_, Timeline> {
        self.inner.lock()
    }

    /// Run `f` with the lock held.
    pub fn with<R>(&self, f: impl FnOnce(&mut Timeline) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl From<Timeline> for SharedTimeline {
    fn from(timeline: Timeline) -> Self {
        Self::new(timeline)
    }
}

/// Notifications published by the playback thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The clip under the playhead changed (None over a gap)
    ActiveClipChanged(Option<Uuid>),
    /// Playback reached the end of the timeline and stopped
    Finished,
}

/// Handle to a running playback thread.
///
/// Dropping the handle signals the thread and detaches it; only [`stop`]
/// waits for it, so callers must not hold the timeline lock there.
///
/// [`stop`]: PlaybackThread::stop
pub struct PlaybackThread {
    stop_tx: Option<Sender<()>>,
    events: Receiver<PlaybackEvent>,
    handle: Option<JoinHandle<()>>,
}

impl PlaybackThread {
    pub fn events(&self) -> &Receiver<PlaybackEvent> {
        &self.events
    }

    /// Stop ticking and wait for the thread to exit.
    pub fn stop(mut self) {
        self.signal_stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Playback thread panicked");
            }
        }
    }

    fn signal_stop(&mut self) {
        // Dropping the sender disconnects the stop channel
        self.stop_tx.take();
    }
}

impl Drop for PlaybackThread {
    fn drop(&mut self) {
        self.signal_stop();
        if self.handle.take().is_some() {
            debug!("Playback thread detached");
        }
    }
}

/// Tick `shared` every `interval` on a background thread.
///
/// Ticks only advance the playhead while the timeline is playing, and are
/// ignored by the timeline while a gesture holds it.
pub fn spawn_playback(shared: SharedTimeline, interval: Duration) -> framecut_core::Result<PlaybackThread> {
    let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
    let (event_tx, events) = crossbeam_channel::unbounded();

    let handle = thread::Builder::new()
        .name("framecut-playback".into())
        .spawn(move || run_playback(shared, interval, stop_rx, event_tx))?;

    debug!(interval_ms = interval.as_millis() as u64, "Playback thread started");
    Ok(PlaybackThread {
        stop_tx: Some(stop_tx),
        events,
        handle: Some(handle),
    })
}

fn run_playback(
    shared: SharedTimeline,
    interval: Duration,
    stop_rx: Receiver<()>,
    event_tx: Sender<PlaybackEvent>,
) {
    let ticker = crossbeam_channel::tick(interval);
    let mut last = Instant::now();
    let mut active = shared.lock().active_clip().map(|c| c.id);

    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(ticker) -> at => {
                let now = at.unwrap_or_else(|_| Instant::now());
                let elapsed = now.saturating_duration_since(last).as_secs_f64();
                last = now;

                let (current, finished) = {
                    let mut timeline = shared.lock();
                    let was_playing = timeline.is_playing();
                    let current = timeline.tick(elapsed).map(|c| c.id);
                    (current, was_playing && !timeline.is_playing())
                };

                if current != active {
                    active = current;
                    if event_tx.send(PlaybackEvent::ActiveClipChanged(current)).is_err() {
                        break;
                    }
                }
                if finished && event_tx.send(PlaybackEvent::Finished).is_err() {
                    break;
                }
            }
        }
    }
    debug!("Playback thread stopped");
}
