//! Trait abstraction for submission side effects to enable mocking in tests

use crate::state::FormValues;
use async_trait::async_trait;
use serde::Serialize;

/// Result of a successful action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessPayload {
    /// Identifier of whatever the action created, if any
    pub reference: Option<String>,
    pub message: String,
}

impl SuccessPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            reference: None,
            message: message.into(),
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// Why an action did not take effect. Actions are all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("{0}")]
    Rejected(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A notification as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

/// The effect of submitting a form
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Action: Send + Sync {
    /// Perform the effect once with a snapshot of the validated values
    async fn perform(&self, values: FormValues) -> Result<SuccessPayload, ActionError>;
}

/// Fire-and-forget notification surface
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str, severity: Severity);
}

/// Route change surface
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, route: &str);
}
