//! Form domain layer
//!
//! Schema-validated forms with a submit state machine. Every form in the
//! marketplace (applications, enrollments, reports, registrations) is a
//! [`FormSchema`] driven by a [`SubmitCoordinator`].

mod field;
mod form_state;
mod schema;
mod submission;
mod validator;
mod values;
mod wizard;

pub use field::{Constraint, FieldKind, FieldSpec, FieldValue, FileHandle, FileRules};
pub use form_state::{FormError, FormEvent, FormState};
pub use schema::{CrossFieldRule, FormSchema, FormSchemaBuilder, SchemaError};
pub use submission::{AfterSuccess, SubmissionState, SubmitCoordinator, SubmitOutcome};
pub use validator::{
    check_field, validate, validate_fields, FieldError, FieldErrorKind, FieldErrors,
    ValidationResult,
};
pub use values::FormValues;
pub use wizard::{StepOutcome, WizardForm, WizardStep};
