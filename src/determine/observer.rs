use parking_lot::Mutex;

/// Severity of an observed determination message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservedLevel {
    Info,
    Warn,
    Error,
}

/// Receives informational messages from a [`Determinator`](super::Determinator).
///
/// Observers are side-effect only: nothing they do changes the result of a
/// determination. All methods default to doing nothing.
pub trait DeterminationObserver: Send + Sync {
    fn info(&self, message: &str) {
        let _ = message;
    }

    fn warn(&self, message: &str) {
        let _ = message;
    }

    fn error(&self, message: &str) {
        let _ = message;
    }
}

/// Discards all messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DeterminationObserver for NoopObserver {}

/// Forwards messages to `tracing` under the `docdet` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DeterminationObserver for TracingObserver {
    fn info(&self, message: &str) {
        tracing::info!(target: "docdet", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "docdet", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "docdet", "{message}");
    }
}

/// Records every message, e.g. to attach them to a processing report.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    messages: Mutex<Vec<(ObservedLevel, String)>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages recorded so far, oldest first.
    pub fn messages(&self) -> Vec<(ObservedLevel, String)> {
        self.messages.lock().clone()
    }

    /// Messages of one level, oldest first.
    pub fn messages_at(&self, level: ObservedLevel) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Remove and return all recorded messages.
    pub fn take(&self) -> Vec<(ObservedLevel, String)> {
        std::mem::take(&mut *self.messages.lock())
    }

    fn record(&self, level: ObservedLevel, message: &str) {
        self.messages.lock().push((level, message.to_string()));
    }
}

impl DeterminationObserver for CollectingObserver {
    fn info(&self, message: &str) {
        self.record(ObservedLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(ObservedLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.record(ObservedLevel::Error, message);
    }
}
