//! Stale-response and duplicate-query guards

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Identifies one issued request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    #[must_use]
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Last-write-wins ordering for concurrent requests.
///
/// Only the response to the most recently issued ticket is accepted.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    #[must_use]
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// `Some(value)` if `ticket` is still the latest, `None` if superseded.
    pub fn accept<T>(&self, ticket: RequestTicket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }
}

/// Suppresses a query identical to the one issued just before it.
#[derive(Debug, Default)]
pub struct QueryCoalescer {
    last: Mutex<Option<String>>,
}

impl QueryCoalescer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `fingerprint` and returns `true` unless it equals the last one.
    pub fn should_issue(&self, fingerprint: &str) -> bool {
        let mut last = self.last.lock();
        if last.as_deref() == Some(fingerprint) {
            return false;
        }
        *last = Some(fingerprint.to_owned());
        true
    }

    /// Forget the last fingerprint so the next query is always issued.
    pub fn reset(&self) {
        *self.last.lock() = None;
    }
}
