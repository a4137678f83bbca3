//! Pure schema validation
//!
//! `validate` walks the schema in declared order and reports at most one
//! message per field: the required check first, then file rules for file
//! fields, then declared constraints, short-circuiting at the first failure.
//! Cross-field rules run last and only for fields that are still clean.
//! Failures are data, never errors.

use super::field::{Constraint, FieldSpec, FieldValue};
use super::schema::{CrossFieldRule, FormSchema};
use super::values::FormValues;
use serde::Serialize;
use std::collections::BTreeMap;

/// Category of a field-scoped validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    Format,
    Length,
    Range,
    Choice,
    FileCount,
    FileTooLarge,
    FileType,
    Mismatch,
    Custom,
}

/// Message shown next to a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Field name to error, ordered by name so output is stable
pub type FieldErrors = BTreeMap<String, FieldError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(FieldErrors),
}

impl ValidationResult {
    fn from_errors(errors: FieldErrors) -> Self {
        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Errors of an invalid result (empty for a valid one)
    pub fn errors(&self) -> FieldErrors {
        match self {
            ValidationResult::Valid => FieldErrors::new(),
            ValidationResult::Invalid(errors) => errors.clone(),
        }
    }

    pub fn into_errors(self) -> FieldErrors {
        match self {
            ValidationResult::Valid => FieldErrors::new(),
            ValidationResult::Invalid(errors) => errors,
        }
    }
}

/// Validate every field of `schema` against `values`
pub fn validate(schema: &FormSchema, values: &FormValues) -> ValidationResult {
    validate_where(schema, values, |_| true)
}

/// Validate only the named fields.
///
/// Cross-field rules apply when both of their fields are in scope. Used by
/// multi-step forms to check one step at a time.
pub fn validate_fields(
    schema: &FormSchema,
    values: &FormValues,
    names: &[String],
) -> ValidationResult {
    validate_where(schema, values, |name| names.iter().any(|n| n == name))
}

fn validate_where<F>(schema: &FormSchema, values: &FormValues, in_scope: F) -> ValidationResult
where
    F: Fn(&str) -> bool,
{
    let mut errors = FieldErrors::new();

    for spec in schema.fields().iter().filter(|s| in_scope(&s.name)) {
        if let Some(error) = check_field(spec, values.value(&spec.name)) {
            errors.insert(spec.name.clone(), error);
        }
    }

    for rule in schema.cross_rules() {
        if !in_scope(rule.field()) || !in_scope(rule.other()) {
            continue;
        }
        if errors.contains_key(rule.field()) || rule.holds(values) {
            continue;
        }
        errors.insert(rule.field().to_string(), cross_error(rule));
    }

    ValidationResult::from_errors(errors)
}

/// Check a single field value. Optional empty fields always pass.
pub fn check_field(spec: &FieldSpec, value: &FieldValue) -> Option<FieldError> {
    if value.is_empty() {
        return spec
            .required
            .then(|| FieldError::new(FieldErrorKind::Required, spec.required_message.clone()));
    }

    if let Some(rules) = &spec.file_rules {
        let files = value.files();
        if files.len() < rules.min_files || files.len() > rules.max_files {
            return Some(FieldError::new(
                FieldErrorKind::FileCount,
                rules.count_message.clone(),
            ));
        }
        if files.iter().any(|f| f.size > rules.max_bytes) {
            return Some(FieldError::new(
                FieldErrorKind::FileTooLarge,
                rules.too_large_message.clone(),
            ));
        }
        if files.iter().any(|f| !rules.allows_mime(&f.mime)) {
            return Some(FieldError::new(
                FieldErrorKind::FileType,
                rules.wrong_type_message.clone(),
            ));
        }
    }

    spec.constraints
        .iter()
        .find(|c| !c.check(value))
        .map(|c| FieldError::new(constraint_kind(c), c.message()))
}

fn constraint_kind(constraint: &Constraint) -> FieldErrorKind {
    match constraint {
        Constraint::MinLength { .. }
        | Constraint::MaxLength { .. }
        | Constraint::MinItems { .. } => FieldErrorKind::Length,
        Constraint::Pattern { .. }
        | Constraint::Email { .. }
        | Constraint::Url { .. }
        | Constraint::Phone { .. }
        | Constraint::Numeric { .. } => FieldErrorKind::Format,
        Constraint::Range { .. } => FieldErrorKind::Range,
        Constraint::OneOf { .. } => FieldErrorKind::Choice,
        Constraint::Custom { .. } => FieldErrorKind::Custom,
    }
}

fn cross_error(rule: &CrossFieldRule) -> FieldError {
    let kind = match rule {
        CrossFieldRule::Matches { .. } => FieldErrorKind::Mismatch,
        CrossFieldRule::NotLessThan { .. } => FieldErrorKind::Range,
    };
    FieldError::new(kind, rule.message())
}
