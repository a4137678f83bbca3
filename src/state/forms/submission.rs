//! Submit coordination: validate, run the injected action, settle state
//!
//! State machine:
//!
//! ```text
//! Idle --submit--> Validating --invalid--> Idle (errors published)
//!                  Validating --valid----> Submitting --ok----> Succeeded --reset--> Idle
//!                                          Submitting --err---> Failed --submit--> Validating
//! ```
//!
//! At most one action is in flight per form: `submit` while Submitting is
//! ignored. A form disposed while its action is pending drops the result.

use super::field::FieldValue;
use super::form_state::{FormError, FormEvent, FormState};
use super::schema::FormSchema;
use super::validator::{validate, FieldErrors, ValidationResult};
use super::values::FormValues;
use crate::action::{Action, ActionError, Navigator, Notifier, Severity, SuccessPayload};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    /// Holds the failure reason for display
    Failed(String),
}

/// What happens after the action succeeds
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AfterSuccess {
    /// Stay in Succeeded until `reset` is called
    Stay,
    /// Reset to the initial values right away
    #[default]
    Reset,
    /// Reset, then navigate to the route
    Navigate(String),
}

/// Result of one `submit` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Invalid(FieldErrors),
    Succeeded(SuccessPayload),
    Failed(ActionError),
    /// Another submission is still in flight; nothing was done
    InFlight,
    /// The previous submission succeeded and the form was not reset
    AlreadySucceeded,
    /// A multi-step form was submitted before reaching its last step
    StepsRemaining { current: usize, total: usize },
    /// The form was torn down; the result (if any) was discarded
    Disposed,
}

/// Drives one form through its submission lifecycle
#[derive(Clone)]
pub struct SubmitCoordinator {
    form: Arc<Mutex<FormState>>,
    action: Arc<dyn Action>,
    notifier: Arc<dyn Notifier>,
    navigator: Option<Arc<dyn Navigator>>,
    after_success: AfterSuccess,
    success_title: String,
    disposed: Arc<AtomicBool>,
}

impl SubmitCoordinator {
    pub fn new(form: FormState, action: Arc<dyn Action>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            form: Arc::new(Mutex::new(form)),
            action,
            notifier,
            navigator: None,
            after_success: AfterSuccess::default(),
            success_title: "Submitted".to_string(),
            disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a coordinator for a fresh form of `schema`
    pub fn for_schema(
        schema: Arc<FormSchema>,
        action: Arc<dyn Action>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::new(FormState::new(schema), action, notifier)
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn after_success(mut self, after: AfterSuccess) -> Self {
        self.after_success = after;
        self
    }

    /// Title of the success notification
    pub fn success_title(mut self, title: impl Into<String>) -> Self {
        self.success_title = title.into();
        self
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the form state
    pub fn with_form<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn set_field(&self, name: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        self.lock().set_field(name, value)
    }

    pub fn values(&self) -> FormValues {
        self.lock().values().clone()
    }

    pub fn errors(&self) -> FieldErrors {
        self.lock().errors().clone()
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().submission().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().is_submitting()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.lock().subscribe()
    }

    /// Validate the whole form and, if valid, run the action once.
    pub async fn submit(&self) -> SubmitOutcome {
        let values = {
            let mut form = self.lock();
            match self.begin(&mut form) {
                Ok(values) => values,
                Err(outcome) => return outcome,
            }
        };
        self.settle(values).await
    }

    /// Guard checks and validation. On success the form is Submitting and
    /// the returned snapshot is what the action receives.
    fn begin(&self, form: &mut FormState) -> Result<FormValues, SubmitOutcome> {
        if self.is_disposed() {
            return Err(SubmitOutcome::Disposed);
        }
        match form.submission() {
            SubmissionState::Submitting | SubmissionState::Validating => {
                tracing::debug!(form = form.schema().name(), "submit ignored, already in flight");
                return Err(SubmitOutcome::InFlight);
            }
            SubmissionState::Succeeded => return Err(SubmitOutcome::AlreadySucceeded),
            SubmissionState::Idle | SubmissionState::Failed(_) => {}
        }

        form.set_submission(SubmissionState::Validating);
        match validate(form.schema(), form.values()) {
            ValidationResult::Invalid(errors) => {
                tracing::info!(
                    form = form.schema().name(),
                    errors = errors.len(),
                    "submission blocked by validation"
                );
                form.set_errors(errors.clone());
                form.set_submission(SubmissionState::Idle);
                Err(SubmitOutcome::Invalid(errors))
            }
            ValidationResult::Valid => {
                form.clear_errors();
                form.set_submission(SubmissionState::Submitting);
                tracing::info!(form = form.schema().name(), "submitting");
                Ok(form.values().clone())
            }
        }
    }

    async fn settle(&self, values: FormValues) -> SubmitOutcome {
        let result = self.action.perform(values).await;

        if self.is_disposed() {
            tracing::warn!("form disposed while submitting, discarding result");
            return SubmitOutcome::Disposed;
        }

        match result {
            Ok(payload) => {
                {
                    let mut form = self.lock();
                    form.set_submission(SubmissionState::Succeeded);
                    tracing::info!(
                        form = form.schema().name(),
                        reference = ?payload.reference,
                        "submission succeeded"
                    );
                    if !matches!(self.after_success, AfterSuccess::Stay) {
                        form.reset();
                    }
                }
                self.notifier
                    .notify(&self.success_title, &payload.message, Severity::Success);
                if let (AfterSuccess::Navigate(route), Some(navigator)) =
                    (&self.after_success, &self.navigator)
                {
                    navigator.navigate_to(route);
                }
                SubmitOutcome::Succeeded(payload)
            }
            Err(err) => {
                {
                    let mut form = self.lock();
                    tracing::warn!(form = form.schema().name(), error = %err, "submission failed");
                    form.set_submission(SubmissionState::Failed(err.to_string()));
                }
                self.notifier
                    .notify("Submission failed", &err.to_string(), Severity::Error);
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Return to Idle with initial values. Ignored while Submitting.
    pub fn reset(&self) -> bool {
        let mut form = self.lock();
        if form.is_submitting() {
            return false;
        }
        form.reset();
        true
    }

    /// Tear the form down. A pending action still settles but its result
    /// no longer touches the form or the notifier.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{MockAction, MockNavigator, MockNotifier, SimulatedAction};
    use crate::state::forms::field::FieldSpec;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn schema() -> Arc<FormSchema> {
        Arc::new(
            FormSchema::builder("enroll")
                .field(FieldSpec::text("name", "Name").required())
                .field(FieldSpec::email("email", "Email").required())
                .field(FieldSpec::text("track", "Track").with_default("web"))
                .build()
                .unwrap(),
        )
    }

    fn quiet_notifier() -> Arc<dyn Notifier> {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().returning(|_, _, _| ());
        Arc::new(notifier)
    }

    fn fill(coordinator: &SubmitCoordinator) {
        coordinator.set_field("name", "Jane Doe").unwrap();
        coordinator.set_field("email", "jane@example.com").unwrap();
    }

    mod validation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_invalid_submit_never_calls_action() {
            let mut action = MockAction::new();
            action.expect_perform().times(0);
            let coordinator =
                SubmitCoordinator::for_schema(schema(), Arc::new(action), quiet_notifier());

            let errors = match coordinator.submit().await {
                SubmitOutcome::Invalid(errors) => errors,
                other => panic!("expected invalid outcome, got {other:?}"),
            };
            assert_eq!(errors.len(), 2);
            assert_eq!(coordinator.errors(), errors);
            assert_eq!(coordinator.state(), SubmissionState::Idle);
        }

        #[tokio::test]
        async fn test_valid_submit_clears_old_errors() {
            let mut action = MockAction::new();
            action
                .expect_perform()
                .times(1)
                .returning(|_| Ok(SuccessPayload::new("Enrolled")));
            let coordinator =
                SubmitCoordinator::for_schema(schema(), Arc::new(action), quiet_notifier())
                    .after_success(AfterSuccess::Stay);

            coordinator.submit().await;
            assert!(!coordinator.errors().is_empty());
            fill(&coordinator);
            let outcome = coordinator.submit().await;
            assert_eq!(outcome, SubmitOutcome::Succeeded(SuccessPayload::new("Enrolled")));
            assert!(coordinator.errors().is_empty());
        }
    }

    mod success {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_action_receives_values_snapshot() {
            let mut action = MockAction::new();
            action
                .expect_perform()
                .withf(|values| values.text("name") == "Jane Doe" && values.text("track") == "web")
                .times(1)
                .returning(|_| Ok(SuccessPayload::new("ok")));
            let coordinator =
                SubmitCoordinator::for_schema(schema(), Arc::new(action), quiet_notifier());
            fill(&coordinator);
            assert!(matches!(coordinator.submit().await, SubmitOutcome::Succeeded(_)));
        }

        #[tokio::test]
        async fn test_default_resets_to_defaults() {
            let mut action = MockAction::new();
            action
                .expect_perform()
                .returning(|_| Ok(SuccessPayload::new("ok")));
            let coordinator =
                SubmitCoordinator::for_schema(schema(), Arc::new(action), quiet_notifier());
            fill(&coordinator);
            coordinator.set_field("track", "mobile").unwrap();

            coordinator.submit().await;
            assert_eq!(coordinator.values(), schema().defaults());
            assert_eq!(coordinator.state(), SubmissionState::Idle);
        }

        #[tokio::test]
        async fn test_stay_requires_reset_before_next_submit() {
            let mut action = MockAction::new();
            action
                .expect_perform()
                .times(1)
                .returning(|_| Ok(SuccessPayload::new("ok")));
            let coordinator =
                SubmitCoordinator::for_schema(schema(), Arc::new(action), quiet_notifier())
                    .after_success(AfterSuccess::Stay);
            fill(&coordinator);

            coordinator.submit().await;
            assert_eq!(coordinator.state(), SubmissionState::Succeeded);
            assert_eq!(coordinator.submit().await, SubmitOutcome::AlreadySucceeded);

            assert!(coordinator.reset());
            assert_eq!(coordinator.state(), SubmissionState::Idle);
            assert_eq!(coordinator.values(), schema().defaults());
        }

        #[tokio::test]
        async fn test_reset_is_idempotent() {
            let coordinator = SubmitCoordinator::for_schema(
                schema(),
                Arc::new(MockAction::new()),
                quiet_notifier(),
            );
            fill(&coordinator);
            coordinator.reset();
            let once = coordinator.values();
            coordinator.reset();
            assert_eq!(coordinator.values(), once);
            assert_eq!(once, schema().defaults());
        }

        #[tokio::test]
        async fn test_notifies_and_navigates() {
            let mut action = MockAction::new();
            action
                .expect_perform()
                .returning(|_| Ok(SuccessPayload::new("Application sent")));
            let mut notifier = MockNotifier::new();
            notifier
                .expect_notify()
                .withf(|title, message, severity| {
                    title == "Applied"
                        && message == "Application sent"
                        && *severity == Severity::Success
                })
                .times(1)
                .returning(|_, _, _| ());
            let mut navigator = MockNavigator::new();
            navigator
                .expect_navigate_to()
                .withf(|route| route == "/jobs")
                .times(1)
                .returning(|_| ());

            let coordinator =
                SubmitCoordinator::for_schema(schema(), Arc::new(action), Arc::new(notifier))
                    .with_navigator(Arc::new(navigator))
                    .after_success(AfterSuccess::Navigate("/jobs".to_string()))
                    .success_title("Applied");
            fill(&coordinator);
            coordinator.submit().await;
        }
    }

    mod failure {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_failure_keeps_values_and_reason() {
            let mut action = MockAction::new();
            action
                .expect_perform()
                .times(1)
                .returning(|_| Err(ActionError::Unavailable("timeout".to_string())));
            let mut notifier = MockNotifier::new();
            notifier
                .expect_notify()
                .withf(|_, message, severity| {
                    message == "service unavailable: timeout" && *severity == Severity::Error
                })
                .times(1)
                .returning(|_, _, _| ());

            let coordinator =
                SubmitCoordinator::for_schema(schema(), Arc::new(action), Arc::new(notifier));
            fill(&coordinator);

            let outcome = coordinator.submit().await;
            assert_eq!(
                outcome,
                SubmitOutcome::Failed(ActionError::Unavailable("timeout".to_string()))
            );
            assert_eq!(
                coordinator.state(),
                SubmissionState::Failed("service unavailable: timeout".to_string())
            );
            assert_eq!(coordinator.values().text("name"), "Jane Doe");
        }

        #[tokio::test]
        async fn test_retry_after_failure_runs_action_again() {
            let mut action = MockAction::new();
            let mut seq = mockall::Sequence::new();
            action
                .expect_perform()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Err(ActionError::Rejected("try later".to_string())));
            action
                .expect_perform()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(SuccessPayload::new("ok")));

            let coordinator =
                SubmitCoordinator::for_schema(schema(), Arc::new(action), quiet_notifier());
            fill(&coordinator);

            assert!(matches!(coordinator.submit().await, SubmitOutcome::Failed(_)));
            assert!(matches!(coordinator.submit().await, SubmitOutcome::Succeeded(_)));
        }
    }

    mod concurrency {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test(start_paused = true)]
        async fn test_double_submit_runs_action_once() {
            let action = Arc::new(SimulatedAction::succeeding(
                Duration::from_millis(1500),
                "ok",
            ));
            let coordinator =
                SubmitCoordinator::for_schema(schema(), action.clone(), quiet_notifier());
            fill(&coordinator);

            let (first, second) = tokio::join!(coordinator.submit(), coordinator.submit());
            assert!(matches!(first, SubmitOutcome::Succeeded(_)));
            assert_eq!(second, SubmitOutcome::InFlight);
            assert_eq!(action.invocations(), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_is_submitting_while_pending() {
            let action = Arc::new(SimulatedAction::succeeding(
                Duration::from_millis(1500),
                "ok",
            ));
            let coordinator =
                SubmitCoordinator::for_schema(schema(), action, quiet_notifier());
            fill(&coordinator);

            let background = coordinator.clone();
            let handle = tokio::spawn(async move { background.submit().await });
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert!(coordinator.is_submitting());
            assert!(!coordinator.reset());

            handle.await.unwrap();
            assert!(!coordinator.is_submitting());
        }

        #[tokio::test(start_paused = true)]
        async fn test_dispose_discards_pending_result() {
            let action = Arc::new(SimulatedAction::succeeding(
                Duration::from_millis(1500),
                "ok",
            ));
            let mut notifier = MockNotifier::new();
            notifier.expect_notify().times(0);
            let coordinator =
                SubmitCoordinator::for_schema(schema(), action, Arc::new(notifier));
            fill(&coordinator);

            let background = coordinator.clone();
            let handle = tokio::spawn(async move { background.submit().await });
            tokio::time::sleep(Duration::from_millis(100)).await;
            coordinator.dispose();

            assert_eq!(handle.await.unwrap(), SubmitOutcome::Disposed);
            assert_eq!(coordinator.state(), SubmissionState::Submitting);
            assert_eq!(coordinator.submit().await, SubmitOutcome::Disposed);
        }
    }

    #[test]
    fn test_submission_changes_are_published() {
        let mut action = MockAction::new();
        action
            .expect_perform()
            .returning(|_| Ok(SuccessPayload::new("ok")));
        let coordinator =
            SubmitCoordinator::for_schema(schema(), Arc::new(action), quiet_notifier())
                .after_success(AfterSuccess::Stay);
        fill(&coordinator);
        let mut rx = coordinator.subscribe();

        tokio_test::block_on(coordinator.submit());

        let mut states = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let FormEvent::SubmissionChanged(state) = event {
                states.push(state);
            }
        }
        assert_eq!(
            states,
            vec![
                SubmissionState::Validating,
                SubmissionState::Submitting,
                SubmissionState::Succeeded,
            ]
        );
    }
}
