//! Ordered message delivery between a research run and its client.
//!
//! Many concurrent pipeline stages produce progress messages; exactly one
//! transport writes to the client. The channel decouples the two with a
//! bounded FIFO queue and a dedicated delivery task that owns the only
//! reference to the transport, so interleaved producers can never corrupt
//! the framing.
//!
//! Overflow policy: when the queue is full the oldest progress (`logs`)
//! message is dropped to admit the newcomer. Terminal messages (`report`,
//! `usage`, `path`, `error`) are never dropped; an incoming `logs` message
//! is shed instead when nothing else is droppable.

use crate::types::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Maximum queued messages per session before the overflow policy kicks in.
pub const DELIVERY_QUEUE_CAPACITY: usize = 256;

// ============= Wire Messages =============

/// Token accounting for one research run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReport {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub smart_llm_model: String,
}

/// Locations of the exported report documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPaths {
    pub pdf: String,
    pub docx: String,
}

/// A message delivered to the client, framed as `{"type": ..., "output": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "output", rename_all = "lowercase")]
pub enum DeliveryMessage {
    /// Human-readable progress string.
    Logs(String),
    /// An incremental chunk of the report text.
    Report(String),
    /// Prompt/completion token counts and the model used.
    Usage(UsageReport),
    /// Filesystem paths of the exported documents.
    Path(ExportPaths),
    /// A terminal failure description.
    Error(String),
}

impl DeliveryMessage {
    /// Progress messages are droppable under queue pressure; everything
    /// else must reach the client intact.
    pub fn is_progress(&self) -> bool {
        matches!(self, DeliveryMessage::Logs(_))
    }
}

// ============= Transport Seam =============

/// The write half of a client transport. One implementor exists per
/// connection and is owned exclusively by the delivery task.
#[async_trait]
pub trait MessageSink: Send {
    /// Write one framed message. An error means the peer is gone.
    async fn send_text(&mut self, text: String) -> Result<()>;
}

// ============= Session Channel =============

struct Shared {
    queue: Mutex<VecDeque<DeliveryMessage>>,
    notify: Notify,
    closed: AtomicBool,
}

/// Per-connection mailbox plus its delivery task.
///
/// `send` never blocks beyond the enqueue and is safe from any task. Once
/// the channel is closed, or the transport has died, `send` becomes a
/// no-op rather than an error.
pub struct SessionChannel {
    shared: Arc<Shared>,
    delivery: Mutex<Option<JoinHandle<()>>>,
}

impl SessionChannel {
    /// Open a channel over the given transport, spawning its delivery task.
    pub fn open(sink: Box<dyn MessageSink>) -> Self {
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
        });
        let handle = tokio::spawn(deliver(Arc::clone(&shared), sink));
        Self {
            shared,
            delivery: Mutex::new(Some(handle)),
        }
    }

    /// Enqueue a message for delivery. No-op after close or transport death.
    pub fn send(&self, message: DeliveryMessage) {
        if self.shared.closed.load(Ordering::Acquire) {
            return;
        }
        {
            let mut queue = self.shared.queue.lock();
            if !enqueue(&mut queue, message) {
                return;
            }
        }
        self.shared.notify.notify_one();
    }

    /// Enqueue a progress message.
    pub fn send_log(&self, output: impl Into<String>) {
        self.send(DeliveryMessage::Logs(output.into()));
    }

    /// Close the channel: undelivered messages are discarded and the
    /// delivery task is joined. Idempotent.
    pub async fn close(&self) {
        self.shared.closed.store(true, Ordering::Release);
        self.shared.queue.lock().clear();
        self.shared.notify.notify_one();
        let handle = self.delivery.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Whether the delivery task is still running. Used by tests to assert
    /// no background work leaks past `close`.
    pub fn is_delivering(&self) -> bool {
        self.delivery
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

/// Apply the overflow policy and push. Returns false if the message was
/// shed instead of enqueued.
fn enqueue(queue: &mut VecDeque<DeliveryMessage>, message: DeliveryMessage) -> bool {
    if queue.len() >= DELIVERY_QUEUE_CAPACITY {
        if let Some(oldest_progress) = queue.iter().position(DeliveryMessage::is_progress) {
            queue.remove(oldest_progress);
        } else if message.is_progress() {
            return false;
        }
    }
    queue.push_back(message);
    true
}

async fn deliver(shared: Arc<Shared>, mut sink: Box<dyn MessageSink>) {
    loop {
        let next = shared.queue.lock().pop_front();
        match next {
            Some(message) => {
                let frame = match serde_json::to_string(&message) {
                    Ok(frame) => frame,
                    Err(err) => {
                        tracing::error!(error = %err, "failed to serialize delivery message");
                        continue;
                    }
                };
                if sink.send_text(frame).await.is_err() {
                    // Peer is gone. Stop delivering; producers become no-ops.
                    shared.closed.store(true, Ordering::Release);
                    return;
                }
            }
            None if shared.closed.load(Ordering::Acquire) => return,
            // notify_one stores a permit, so a push racing this gap still
            // wakes us immediately.
            None => shared.notify.notified().await,
        }
    }
}

impl std::fmt::Debug for SessionChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionChannel")
            .field("queued", &self.shared.queue.lock().len())
            .field("closed", &self.shared.closed.load(Ordering::Acquire))
            .finish()
    }
}
