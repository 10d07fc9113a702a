// Asynchronous progress notification, decoupled from worker execution

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::result::NodeResult;
use crate::node::Node;

/// Progress events emitted during an execution.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    /// A node's unit of work has started.
    NodeStart { node: Arc<Node> },

    /// A node's unit of work has finished, successfully or not.
    NodeFinished {
        node: Arc<Node>,
        result: NodeResult,
    },
}

impl ExecutionEvent {
    pub fn node(&self) -> &Arc<Node> {
        match self {
            ExecutionEvent::NodeStart { node } => node,
            ExecutionEvent::NodeFinished { node, .. } => node,
        }
    }
}

/// Receiver of progress events, supplied by the caller.
///
/// Invoked on a dedicated forwarder task, so a slow callback delays only the
/// final flush, never a worker. For a single node, `NodeStart` is always
/// delivered before its `NodeFinished`; no ordering holds across nodes.
pub trait ProgressCallback: Send + Sync + 'static {
    fn on_event(&self, event: ExecutionEvent);
}

impl<F> ProgressCallback for F
where
    F: Fn(ExecutionEvent) + Send + Sync + 'static,
{
    fn on_event(&self, event: ExecutionEvent) {
        self(event)
    }
}

/// Internal queue message. `Flush` marks the end of an execution's events
/// so the forwarder can exit without waiting on outstanding sink clones.
enum Message {
    Event(ExecutionEvent),
    Flush,
}

/// Cheap per-worker handle for enqueueing events without blocking.
#[derive(Clone)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<Message>>,
}

impl EventSink {
    pub fn notify(&self, event: ExecutionEvent) {
        if let Some(ref tx) = self.tx {
            // The receiver lives until shutdown, which happens after the
            // pool drains; a send can only fail if shutdown already ran.
            let _ = tx.send(Message::Event(event));
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }
}

/// Owns the event queue and the forwarder task delivering to the callback.
pub struct Notifier {
    sink: EventSink,
    forwarder: Option<JoinHandle<()>>,
}

impl Notifier {
    /// Build a notifier. Without a callback, every `notify` is a no-op and
    /// shutdown returns immediately.
    pub fn new(callback: Option<Arc<dyn ProgressCallback>>) -> Self {
        match callback {
            None => Notifier {
                sink: EventSink { tx: None },
                forwarder: None,
            },
            Some(callback) => {
                let (tx, mut rx) = mpsc::unbounded_channel();
                let forwarder = tokio::spawn(async move {
                    while let Some(message) = rx.recv().await {
                        match message {
                            Message::Event(event) => callback.on_event(event),
                            Message::Flush => break,
                        }
                    }
                });
                Notifier {
                    sink: EventSink { tx: Some(tx) },
                    forwarder: Some(forwarder),
                }
            }
        }
    }

    pub fn sink(&self) -> EventSink {
        self.sink.clone()
    }

    /// Drain the queue, delivering every enqueued event, then return.
    /// Called once, after the pool has fully drained. Does not require
    /// outstanding `EventSink` clones to have been dropped; events they
    /// enqueue after this point are discarded.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.sink.tx.take() {
            // Everything enqueued before the marker is delivered first.
            let _ = tx.send(Message::Flush);
        }
        if let Some(forwarder) = self.forwarder.take() {
            if let Err(e) = forwarder.await {
                tracing::error!(error = %e, "event forwarder failed");
            }
        }
    }
}
