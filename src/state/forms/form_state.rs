//! Form state container: values, field errors and submission state

use super::field::FieldValue;
use super::schema::FormSchema;
use super::submission::SubmissionState;
use super::validator::{FieldError, FieldErrors};
use super::values::FormValues;
use std::sync::Arc;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Change notifications for the presentation layer. Field-level events name
/// only the affected fields so a view can re-render just those.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    FieldChanged(String),
    ErrorsChanged(Vec<String>),
    SubmissionChanged(SubmissionState),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("form has no field named '{name}'")]
    UnknownField { name: String },
}

/// Holds the mutable state of one mounted form
#[derive(Debug)]
pub struct FormState {
    schema: Arc<FormSchema>,
    initial: FormValues,
    values: FormValues,
    errors: FieldErrors,
    submission: SubmissionState,
    events: broadcast::Sender<FormEvent>,
}

impl FormState {
    /// Create a form holding the schema's declared defaults
    pub fn new(schema: Arc<FormSchema>) -> Self {
        let initial = schema.defaults();
        Self::from_initial(schema, initial)
    }

    /// Create a form prefilled with `values` (edit forms).
    ///
    /// Fields not named in `values` keep their schema default, and reset
    /// returns to this prefilled state.
    pub fn with_values(schema: Arc<FormSchema>, values: FormValues) -> Result<Self, FormError> {
        if let Some((name, _)) = values.iter().find(|(name, _)| !schema.contains(name)) {
            return Err(FormError::UnknownField {
                name: name.to_string(),
            });
        }
        let mut initial = schema.defaults();
        initial.merge(values);
        Ok(Self::from_initial(schema, initial))
    }

    fn from_initial(schema: Arc<FormSchema>, initial: FormValues) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            schema,
            values: initial.clone(),
            initial,
            errors: FieldErrors::new(),
            submission: SubmissionState::Idle,
            events,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> &FieldValue {
        self.values.value(name)
    }

    /// Update one field. No validation runs here; any error shown for the
    /// field is cleared.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        if !self.schema.contains(name) {
            return Err(FormError::UnknownField {
                name: name.to_string(),
            });
        }
        self.values.set(name, value);
        tracing::debug!(form = self.schema.name(), field = name, "field updated");
        self.emit(FormEvent::FieldChanged(name.to_string()));
        if self.errors.remove(name).is_some() {
            self.emit(FormEvent::ErrorsChanged(vec![name.to_string()]));
        }
        Ok(())
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&FieldError> {
        self.errors.get(name)
    }

    /// Replace all published errors
    pub fn set_errors(&mut self, errors: FieldErrors) {
        let mut touched: Vec<String> = self.errors.keys().cloned().collect();
        touched.extend(errors.keys().filter(|k| !self.errors.contains_key(*k)).cloned());
        self.errors = errors;
        if !touched.is_empty() {
            touched.sort();
            self.emit(FormEvent::ErrorsChanged(touched));
        }
    }

    /// Replace the errors of the `scope` fields only, leaving the rest intact
    pub fn set_errors_for(&mut self, scope: &[String], errors: FieldErrors) {
        let mut touched = Vec::new();
        for name in scope {
            let had = self.errors.remove(name).is_some();
            if had || errors.contains_key(name) {
                touched.push(name.clone());
            }
        }
        for (name, error) in errors {
            if scope.contains(&name) {
                self.errors.insert(name, error);
            }
        }
        if !touched.is_empty() {
            self.emit(FormEvent::ErrorsChanged(touched));
        }
    }

    pub fn clear_errors(&mut self) {
        self.set_errors(FieldErrors::new());
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.submission, SubmissionState::Submitting)
    }

    pub(crate) fn set_submission(&mut self, state: SubmissionState) {
        if self.submission != state {
            tracing::debug!(
                form = self.schema.name(),
                from = ?self.submission,
                to = ?state,
                "submission state changed"
            );
            self.submission = state.clone();
            self.emit(FormEvent::SubmissionChanged(state));
        }
    }

    /// Restore initial values, drop errors and return to Idle
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        self.submission = SubmissionState::Idle;
        self.emit(FormEvent::Reset);
    }

    /// Listen for change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: FormEvent) {
        // No subscribers is fine: nothing is rendering this form
        let _ = self.events.send(event);
    }
}
