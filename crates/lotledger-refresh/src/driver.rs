//! Thread-backed driver for the [`Coalescer`].
//!
//! Owns a worker thread that waits on a control channel with a deadline
//! derived from the coalescer, runs the caller's refresh closure on the
//! loop thread (so at most one refresh is ever in flight), and publishes
//! each result into a shared cell readers can take snapshots of.

use crate::{Category, Coalescer, RefreshScope};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::RwLock;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// The refresh loop thread has exited and can no longer be driven.
#[derive(Debug, thiserror::Error)]
#[error("refresh loop is closed")]
pub struct LoopClosed;

enum Control {
    Notify(String),
    Visible(bool),
    Force,
    Shutdown,
}

/// Handle to a running refresh loop.
///
/// `T` is whatever the refresh closure produces (typically the full report
/// bundle); the latest value is always available through
/// [`latest`](Self::latest).
pub struct RefreshLoop<T> {
    tx: Sender<Control>,
    latest: Arc<RwLock<Option<T>>>,
    handle: Option<JoinHandle<()>>,
}

impl<T: Send + Sync + 'static> RefreshLoop<T> {
    /// Spawn the loop around a refresh closure.
    ///
    /// The closure runs on the loop thread, once per coalesced trigger. The
    /// first pass (initial load) runs with [`RefreshScope::Full`] as soon
    /// as the thread starts.
    #[must_use]
    pub fn spawn<F>(mut refresh: F) -> Self
    where
        F: FnMut(&RefreshScope) -> T + Send + 'static,
    {
        let (tx, rx) = unbounded::<Control>();
        let latest = Arc::new(RwLock::new(None));
        let shared = Arc::clone(&latest);

        let handle = thread::spawn(move || {
            let mut coalescer = Coalescer::new(Instant::now());
            loop {
                if let Some(scope) = coalescer.poll(Instant::now()) {
                    let result = refresh(&scope);
                    *shared.write() = Some(result);
                    coalescer.finish(Instant::now());
                    continue;
                }
                match pump(&rx, &mut coalescer) {
                    Flow::Continue => {}
                    Flow::Stop => break,
                }
            }
            tracing::debug!("refresh loop stopped");
        });

        Self {
            tx,
            latest,
            handle: Some(handle),
        }
    }

    /// Forward a "table changed" notification.
    pub fn notify(&self, table: &str) -> Result<(), LoopClosed> {
        self.send(Control::Notify(table.to_string()))
    }

    /// Toggle consumer visibility (gates the background safety refresh).
    pub fn set_visible(&self, visible: bool) -> Result<(), LoopClosed> {
        self.send(Control::Visible(visible))
    }

    /// Request a manual full refresh.
    pub fn force(&self) -> Result<(), LoopClosed> {
        self.send(Control::Force)
    }

    /// Shared cell holding the most recent refresh result.
    #[must_use]
    pub fn latest(&self) -> Arc<RwLock<Option<T>>> {
        Arc::clone(&self.latest)
    }

    /// Stop the loop and join its thread.
    pub fn shutdown(mut self) {
        let _ = self.tx.send(Control::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn send(&self, msg: Control) -> Result<(), LoopClosed> {
        self.tx.send(msg).map_err(|_| LoopClosed)
    }
}

impl<T> Drop for RefreshLoop<T> {
    fn drop(&mut self) {
        let _ = self.tx.send(Control::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

enum Flow {
    Continue,
    Stop,
}

/// Wait until the coalescer's next deadline or a control message, then
/// apply everything queued up.
fn pump(rx: &Receiver<Control>, coalescer: &mut Coalescer) -> Flow {
    let received = match coalescer.next_deadline() {
        Some(deadline) => rx.recv_deadline(deadline),
        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };
    match received {
        Ok(msg) => {
            if matches!(apply(msg, coalescer), Flow::Stop) {
                return Flow::Stop;
            }
        }
        Err(RecvTimeoutError::Timeout) => return Flow::Continue,
        Err(RecvTimeoutError::Disconnected) => return Flow::Stop,
    }
    // Absorb the rest of the burst without blocking
    while let Ok(msg) = rx.try_recv() {
        if matches!(apply(msg, coalescer), Flow::Stop) {
            return Flow::Stop;
        }
    }
    Flow::Continue
}

fn apply(msg: Control, coalescer: &mut Coalescer) -> Flow {
    let now = Instant::now();
    match msg {
        Control::Notify(table) => coalescer.notify(Category::from_table(&table), now),
        Control::Visible(visible) => coalescer.set_visible(visible),
        Control::Force => coalescer.force(now),
        Control::Shutdown => return Flow::Stop,
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_initial_full_refresh_runs() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let refresh_loop = RefreshLoop::spawn(move |scope| {
            assert_eq!(*scope, RefreshScope::Full);
            seen.fetch_add(1, Ordering::SeqCst) + 1
        });

        let latest = refresh_loop.latest();
        // Wait for the initial pass to publish
        for _ in 0..100 {
            if latest.read().is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(*latest.read(), Some(1));
        refresh_loop.shutdown();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_controls_accepted_while_running() {
        let refresh_loop: RefreshLoop<()> = RefreshLoop::spawn(|_| ());
        assert!(refresh_loop.notify("shipments").is_ok());
        assert!(refresh_loop.set_visible(false).is_ok());
        refresh_loop.shutdown();
    }

    #[test]
    fn test_drop_joins_the_thread() {
        let refresh_loop: RefreshLoop<u32> = RefreshLoop::spawn(|_| 7);
        drop(refresh_loop);
    }
}
