//! Huntboard - form workflows for a bug bounty marketplace
//!
//! Declarative form schemas, a synchronous validator and a submit
//! coordinator that runs an injected async [`action::Action`] at most once
//! per submission.

pub mod action;
pub mod catalog;
pub mod config;
pub mod state;

pub use action::{Action, ActionError, Navigator, Notifier, Severity, SuccessPayload};
pub use catalog::{FormKind, UploadLimits};
pub use config::HuntboardConfig;
pub use state::{
    validate, FieldSpec, FieldValue, FormSchema, FormState, FormValues, SubmitCoordinator,
    SubmitOutcome, ValidationResult, WizardForm,
};
