//! Match event stream.
//!
//! Resolved matches, generation swaps, and runtime adds are published to
//! subscribers over bounded channels. Publishing is lossy: a subscriber
//! that falls behind loses events (counted, observable) rather than ever
//! stalling the match path.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::score::{MatchMethod, Score};
use crate::template::TemplateId;

/// Characters kept in query/answer previews carried by events and logs.
pub const PREVIEW_CHARS: usize = 50;

/// Identifier of one event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(u64);

impl SubscriberId {
    const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Observable engine activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    /// A query resolved to a template answer.
    Resolved {
        template_id: TemplateId,
        category: String,
        method: MatchMethod,
        score: Score,
        query_preview: String,
        answer_preview: String,
    },

    /// A generation built from a source scan was published.
    Reloaded {
        version: u64,
        template_count: usize,
    },

    /// A template was appended at runtime.
    TemplateAdded {
        template_id: TemplateId,
    },
}

/// Truncates text to [`PREVIEW_CHARS`] characters, marking the cut.
#[must_use]
pub(crate) fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if out.chars().count() < text.chars().count() {
        out.push_str("...");
    }
    out
}

/// Subscriber registry and lossy fan-out.
#[derive(Debug)]
pub struct EventBus {
    subscribers: RwLock<Vec<(SubscriberId, Sender<MatchEvent>)>>,
    next_id: AtomicU64,
    dropped: AtomicU64,
    capacity: usize,
}

impl EventBus {
    /// Creates a bus whose subscriber channels hold `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    /// Registers a subscriber and returns its stream handle.
    #[must_use]
    pub fn subscribe(self: &Arc<Self>) -> EventStream {
        let id = SubscriberId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = bounded(self.capacity);
        if let Ok(mut subscribers) = self.subscribers.write() {
            subscribers.push((id, tx));
        }
        EventStream {
            id,
            rx,
            bus: Arc::clone(self),
            unsubscribed: AtomicBool::new(false),
        }
    }

    /// Fans an event out to all subscribers without blocking. Full or
    /// disconnected subscribers drop the event and bump the counter.
    pub fn publish(&self, event: &MatchEvent) {
        let Ok(subscribers) = self.subscribers.read() else {
            return;
        };
        for (_, tx) in subscribers.iter() {
            if tx.try_send(event.clone()).is_err() {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().map_or(0, |subscribers| subscribers.len())
    }

    /// Events dropped because a subscriber was full or gone.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn unsubscribe(&self, id: SubscriberId) {
        if let Ok(mut subscribers) = self.subscribers.write() {
            subscribers.retain(|(existing, _)| *existing != id);
        }
    }
}

/// A subscription stream for match events.
///
/// Dropping the stream unregisters it.
#[derive(Debug)]
pub struct EventStream {
    id: SubscriberId,
    rx: Receiver<MatchEvent>,
    bus: Arc<EventBus>,
    unsubscribed: AtomicBool,
}

impl EventStream {
    /// The subscription id backing this stream.
    #[must_use]
    pub const fn subscriber_id(&self) -> SubscriberId {
        self.id
    }

    /// Returns the next buffered event, if any.
    #[must_use]
    pub fn try_recv(&self) -> Option<MatchEvent> {
        self.rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event. The bus is lossy, so
    /// absence means nothing arrived, never an error.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<MatchEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Explicit unregistration; idempotent.
    pub fn unsubscribe(&self) {
        if !self.unsubscribed.swap(true, Ordering::AcqRel) {
            self.bus.unsubscribe(self.id);
        }
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
