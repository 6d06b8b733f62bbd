//! Change coalescing for lotledger.
//!
//! The reconciliation pipeline is a pure transform, so the only concurrency
//! question is *when* to re-run it. The realtime collaborator emits
//! "table X changed" notifications with no ordering or delivery guarantee;
//! this crate turns those bursts into single, debounced recompute passes
//! with at most one refresh in flight:
//!
//! - A notification (re)starts a ~1s debounce window and records which data
//!   category changed.
//! - When the window elapses, one refresh runs over the accumulated
//!   categories.
//! - Notifications arriving mid-refresh are captured and cause one
//!   follow-up cycle; they are never dropped and never run concurrently.
//! - A 15s safety tick forces a full refresh, skipped while a refresh is
//!   active or the consumer is not visible.
//!
//! [`Coalescer`] is the state machine, driven entirely by [`Instant`]s the
//! caller supplies, so tests use a virtual clock and never sleep.
//! [`driver::RefreshLoop`] wires it to a real thread and channel.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod driver;

pub use driver::{LoopClosed, RefreshLoop};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Debounce window absorbing notification bursts.
pub const DEBOUNCE: Duration = Duration::from_secs(1);
/// Interval of the full-refresh safety net.
pub const SAFETY_INTERVAL: Duration = Duration::from_secs(15);

/// A data category the collaborator can report as changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Purchase lots.
    Lots,
    /// Sale shipments.
    Shipments,
    /// Customer-side payments.
    CustomerPayments,
    /// Supplier-side payments.
    SupplierPayments,
}

impl Category {
    /// Map a collaborator table name to a category.
    ///
    /// `None` for unknown names; callers should widen those to a full
    /// refresh rather than drop them, since the notification carries no
    /// other payload to reason with.
    #[must_use]
    pub fn from_table(name: &str) -> Option<Self> {
        match name {
            "purchase_lots" | "lots" => Some(Self::Lots),
            "sale_shipments" | "shipments" => Some(Self::Shipments),
            "customer_payments" => Some(Self::CustomerPayments),
            "supplier_payments" => Some(Self::SupplierPayments),
            _ => None,
        }
    }
}

/// What a refresh pass should recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshScope {
    /// Recompute everything (first load, manual load, safety tick, unknown
    /// category).
    Full,
    /// Recompute only views fed by these categories.
    Categories(BTreeSet<Category>),
}

/// Coalescer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Pending { deadline: Instant },
    Refreshing,
}

/// Debouncing, coalescing refresh scheduler.
///
/// Drive it with [`notify`](Self::notify) on every change notification,
/// [`poll`](Self::poll) whenever [`next_deadline`](Self::next_deadline)
/// passes (or anything else happens), and [`finish`](Self::finish) when the
/// triggered refresh completes.
#[derive(Debug)]
pub struct Coalescer {
    state: State,
    accumulated: BTreeSet<Category>,
    full_requested: bool,
    visible: bool,
    next_safety: Instant,
    debounce: Duration,
    safety_interval: Duration,
}

impl Coalescer {
    /// New coalescer; the first poll yields a full refresh immediately.
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self::with_intervals(now, DEBOUNCE, SAFETY_INTERVAL)
    }

    /// New coalescer with explicit windows (used by tests).
    #[must_use]
    pub fn with_intervals(now: Instant, debounce: Duration, safety_interval: Duration) -> Self {
        Self {
            // Initial load: pending with an already-expired deadline
            state: State::Pending { deadline: now },
            accumulated: BTreeSet::new(),
            full_requested: true,
            visible: true,
            next_safety: now + safety_interval,
            debounce,
            safety_interval,
        }
    }

    /// Is a refresh currently in flight?
    #[must_use]
    pub const fn is_refreshing(&self) -> bool {
        matches!(self.state, State::Refreshing)
    }

    /// Record a change notification.
    ///
    /// `None` means the category was unrecognized and widens the next pass
    /// to a full refresh. In `Idle` or `Pending` this (re)starts the
    /// debounce window; mid-refresh it is captured for a follow-up cycle.
    pub fn notify(&mut self, category: Option<Category>, now: Instant) {
        match category {
            Some(category) => {
                self.accumulated.insert(category);
            }
            None => self.full_requested = true,
        }
        match self.state {
            State::Idle | State::Pending { .. } => {
                self.state = State::Pending {
                    deadline: now + self.debounce,
                };
            }
            // Captured in `accumulated`; finish() re-arms
            State::Refreshing => {}
        }
        tracing::trace!(?category, state = ?self.state, "change notification");
    }

    /// Request a manual full refresh on the next poll.
    pub fn force(&mut self, now: Instant) {
        self.full_requested = true;
        if !self.is_refreshing() {
            self.state = State::Pending { deadline: now };
        }
    }

    /// Visibility gate for the safety tick; an invisible consumer gets no
    /// background full refreshes.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Check the timers and hand out at most one refresh to run.
    ///
    /// Returns `Some(scope)` exactly when the caller must run a refresh and
    /// then call [`finish`](Self::finish). While one is in flight this
    /// always returns `None`.
    pub fn poll(&mut self, now: Instant) -> Option<RefreshScope> {
        if self.is_refreshing() {
            return None;
        }

        if let State::Pending { deadline } = self.state {
            if now >= deadline {
                let scope = self.take_scope();
                self.state = State::Refreshing;
                tracing::debug!(?scope, "debounce elapsed, refreshing");
                return Some(scope);
            }
        }

        if now >= self.next_safety {
            self.next_safety = now + self.safety_interval;
            if self.visible {
                self.accumulated.clear();
                self.full_requested = false;
                self.state = State::Refreshing;
                tracing::debug!("safety tick, full refresh");
                return Some(RefreshScope::Full);
            }
            // Not visible: skip this tick entirely
        }

        None
    }

    /// Mark the in-flight refresh as complete.
    ///
    /// Notifications captured during the refresh re-arm the debounce window
    /// immediately.
    pub fn finish(&mut self, now: Instant) {
        debug_assert!(self.is_refreshing());
        self.next_safety = now + self.safety_interval;
        if self.accumulated.is_empty() && !self.full_requested {
            self.state = State::Idle;
        } else {
            self.state = State::Pending {
                deadline: now + self.debounce,
            };
            tracing::debug!("notifications arrived mid-refresh, re-armed");
        }
    }

    /// The next instant at which [`poll`](Self::poll) can make progress, if
    /// any. `None` while refreshing (the safety tick is suspended too).
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            State::Refreshing => None,
            State::Pending { deadline } => {
                if self.visible {
                    Some(deadline.min(self.next_safety))
                } else {
                    Some(deadline)
                }
            }
            State::Idle => self.visible.then_some(self.next_safety),
        }
    }

    fn take_scope(&mut self) -> RefreshScope {
        let accumulated = std::mem::take(&mut self.accumulated);
        if std::mem::take(&mut self.full_requested) || accumulated.is_empty() {
            RefreshScope::Full
        } else {
            RefreshScope::Categories(accumulated)
        }
    }
}
