use crate::domain::notification::{Notification, Severity};
use chrono::Local;
use std::sync::{Arc, Mutex};

const MAX_NOTIFICATIONS: usize = 100;

/// Fire-and-forget, user-visible message channel.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Forwards notifications to the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => tracing::warn!(severity = %severity, "{}", message),
            _ => tracing::info!(severity = %severity, "{}", message),
        }
    }
}

/// Keeps the most recent notifications in memory, oldest first.
#[derive(Debug, Default, Clone)]
pub struct MemoryNotifier {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|entry| entry.message)
            .collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries().pop()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        let entry = Notification {
            time: Local::now().format("%H:%M:%S").to_string(),
            severity,
            message: message.to_string(),
        };
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
            if entries.len() > MAX_NOTIFICATIONS {
                entries.remove(0);
            }
        }
    }
}

/// Delivers each notification to every inner notifier.
pub struct FanoutNotifier {
    targets: Vec<Arc<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new(targets: Vec<Arc<dyn Notifier>>) -> Self {
        Self { targets }
    }
}

impl Notifier for FanoutNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        for target in &self.targets {
            target.notify(severity, message);
        }
    }
}
