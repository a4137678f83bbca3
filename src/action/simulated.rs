//! Local stand-ins for the marketplace backend

use super::traits::{Action, ActionError, Notifier, Severity, SuccessPayload};
use crate::state::FormValues;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Settles after a fixed delay with a preconfigured outcome
#[derive(Debug)]
pub struct SimulatedAction {
    delay: Duration,
    reference_prefix: String,
    success_message: String,
    rejection: Option<String>,
    invocations: AtomicUsize,
}

impl SimulatedAction {
    /// Default delay of the marketplace's fake network calls
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

    pub fn succeeding(delay: Duration, success_message: impl Into<String>) -> Self {
        Self {
            delay,
            reference_prefix: "SUB".to_string(),
            success_message: success_message.into(),
            rejection: None,
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn rejecting(delay: Duration, reason: impl Into<String>) -> Self {
        Self {
            rejection: Some(reason.into()),
            ..Self::succeeding(delay, "")
        }
    }

    /// Prefix of the reference handed back on success (e.g. `RPT`)
    pub fn with_reference_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.reference_prefix = prefix.into();
        self
    }

    /// How many times `perform` has been called
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Action for SimulatedAction {
    async fn perform(&self, values: FormValues) -> Result<SuccessPayload, ActionError> {
        let call = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            call,
            fields = values.len(),
            delay_ms = self.delay.as_millis() as u64,
            "simulated action started"
        );
        tokio::time::sleep(self.delay).await;

        match &self.rejection {
            Some(reason) => Err(ActionError::Rejected(reason.clone())),
            None => {
                let id = uuid::Uuid::new_v4().simple().to_string();
                let reference = format!("{}-{}", self.reference_prefix, &id[..8]).to_uppercase();
                Ok(SuccessPayload::new(self.success_message.clone()).with_reference(reference))
            }
        }
    }
}

/// Reports notifications through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => tracing::info!(%title, %message, "notification"),
            Severity::Warning => tracing::warn!(%title, %message, "notification"),
            Severity::Error => tracing::error!(%title, %message, "notification"),
        }
    }
}
