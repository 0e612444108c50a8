//! Output channels for the coordinator.
//!
//! Two sinks exist per system: the client sink (always wired) and the venue
//! sink (wiring it selects front mode). Implementations write to stdout or
//! to an in-memory buffer for tests.

use serde_json::Value;

/// One-way message channel. Implementations must tolerate being called from
/// behind a shared reference; buffering sinks use interior mutability.
pub trait MessageSink: Send + Sync {
    fn send(&self, message: &Value);
}

/// Writes one prefixed JSON line per message to stdout.
pub struct StdoutSink {
    prefix: String,
}

impl StdoutSink {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl MessageSink for StdoutSink {
    fn send(&self, message: &Value) {
        println!("{} {}", self.prefix, message);
    }
}

/// In-memory sink for tests and the REST adapter. Clone shares the same
/// backing buffer.
#[derive(Clone, Default)]
pub struct InMemorySink {
    messages: std::sync::Arc<std::sync::Mutex<Vec<Value>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the buffered messages without consuming them.
    pub fn messages(&self) -> Vec<Value> {
        self.messages.lock().expect("lock").clone()
    }

    /// Takes and clears the buffered messages.
    pub fn drain(&self) -> Vec<Value> {
        std::mem::take(&mut *self.messages.lock().expect("lock"))
    }

    pub fn clear(&self) {
        self.messages.lock().expect("lock").clear();
    }
}

impl MessageSink for InMemorySink {
    fn send(&self, message: &Value) {
        self.messages.lock().expect("lock").push(message.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn in_memory_sink_buffers_and_drains() {
        let sink = InMemorySink::new();
        let shared = sink.clone();
        sink.send(&json!({"a": 1}));
        sink.send(&json!({"b": 2}));
        assert_eq!(shared.messages().len(), 2);
        let drained = shared.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0], json!({"a": 1}));
        assert!(sink.messages().is_empty());
    }
}
