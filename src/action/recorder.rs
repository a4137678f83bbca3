//! In-memory notifier and navigator that remember what they were asked to do

use super::traits::{Navigator, Notification, Notifier, Severity};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Keeps every notification in order
#[derive(Debug, Default, Clone)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        self.lock().push(Notification {
            title: title.to_string(),
            message: message.to_string(),
            severity,
        });
    }
}

/// Keeps every requested route in order
#[derive(Debug, Default, Clone)]
pub struct RouteRecorder {
    routes: Arc<Mutex<Vec<String>>>,
}

impl RouteRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current(&self) -> Option<String> {
        self.routes().last().cloned()
    }
}

impl Navigator for RouteRecorder {
    fn navigate_to(&self, route: &str) {
        tracing::debug!(route, "navigate");
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.to_string());
    }
}
