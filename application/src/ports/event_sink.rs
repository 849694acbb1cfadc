//! Event sink port
//!
//! The orchestrator reports progress as an ordered stream of
//! [`StreamEvent`]s. Emission is synchronous so that events leave in exactly
//! the order they were produced.

use council_domain::StreamEvent;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Receiver of debate events.
///
/// Implementations live in the presentation layer (console renderer) or
/// wrap a channel for async consumers.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: StreamEvent);
}

/// Sink that drops every event.
pub struct NoEvents;

impl EventSink for NoEvents {
    fn emit(&self, _event: StreamEvent) {}
}

/// Sink backed by an unbounded channel.
///
/// Sending never blocks or reorders. Events sent after the receiver is
/// dropped are discarded.
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<StreamEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::UnboundedSender<StreamEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink and the receiver it feeds.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: StreamEvent) {
        let _ = self.tx.send(event);
    }
}

/// Sink that keeps every event in memory.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<StreamEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<StreamEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Kind tags of the events received so far, in order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(StreamEvent::kind).collect()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: StreamEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
