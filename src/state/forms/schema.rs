//! Form schemas: the ordered field list plus cross-field rules

use super::field::FieldSpec;
use super::values::FormValues;
use std::collections::HashSet;

/// Schema construction failures. These are programmer errors and are
/// reported when the schema is built, never at submit time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("field '{name}' is declared more than once")]
    DuplicateField { name: String },

    #[error("cross-field rule on '{rule}' references unknown field '{field}'")]
    UnknownCrossField { rule: String, field: String },

    #[error("field '{field}' has an invalid pattern: {reason}")]
    InvalidPattern { field: String, reason: String },

    #[error("a multi-step form needs at least one step")]
    EmptyWizard,

    #[error("step '{step}' references unknown field '{field}'")]
    UnknownStepField { step: String, field: String },

    #[error("field '{field}' is owned by more than one step")]
    OverlappingStepField { field: String },
}

/// Rule spanning two fields. The error is always reported on `field`.
#[derive(Debug, Clone, PartialEq)]
pub enum CrossFieldRule {
    /// `field` must equal `other` (password confirmation)
    Matches {
        field: String,
        other: String,
        message: String,
    },
    /// Numeric `field` must not be below numeric `other`
    NotLessThan {
        field: String,
        other: String,
        message: String,
    },
}

impl CrossFieldRule {
    pub fn matches(field: &str, other: &str, message: impl Into<String>) -> Self {
        Self::Matches {
            field: field.to_string(),
            other: other.to_string(),
            message: message.into(),
        }
    }

    pub fn not_less_than(field: &str, other: &str, message: impl Into<String>) -> Self {
        Self::NotLessThan {
            field: field.to_string(),
            other: other.to_string(),
            message: message.into(),
        }
    }

    /// Field the error is keyed to
    pub fn field(&self) -> &str {
        match self {
            Self::Matches { field, .. } | Self::NotLessThan { field, .. } => field,
        }
    }

    /// Field the rule compares against
    pub fn other(&self) -> &str {
        match self {
            Self::Matches { other, .. } | Self::NotLessThan { other, .. } => other,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Matches { message, .. } | Self::NotLessThan { message, .. } => message,
        }
    }

    pub fn holds(&self, values: &FormValues) -> bool {
        match self {
            Self::Matches { field, other, .. } => {
                let (a, b) = (values.value(field), values.value(other));
                (a.is_empty() && b.is_empty()) || a == b
            }
            Self::NotLessThan { field, other, .. } => {
                match (values.value(field).as_number(), values.value(other).as_number()) {
                    (Some(a), Some(b)) => a >= b,
                    // Unparseable numbers are reported by the per-field rules
                    _ => true,
                }
            }
        }
    }
}

/// Immutable, ordered set of field specs
#[derive(Debug, Clone)]
pub struct FormSchema {
    name: String,
    fields: Vec<FieldSpec>,
    cross_rules: Vec<CrossFieldRule>,
}

impl FormSchema {
    pub fn builder(name: &str) -> FormSchemaBuilder {
        FormSchemaBuilder {
            name: name.to_string(),
            fields: Vec::new(),
            cross_rules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn cross_rules(&self) -> &[CrossFieldRule] {
        &self.cross_rules
    }

    /// Values holding each field's declared default
    pub fn defaults(&self) -> FormValues {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect()
    }
}

pub struct FormSchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
    cross_rules: Vec<CrossFieldRule>,
}

impl FormSchemaBuilder {
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn cross(mut self, rule: CrossFieldRule) -> Self {
        self.cross_rules.push(rule);
        self
    }

    pub fn build(self) -> Result<FormSchema, SchemaError> {
        let mut seen = HashSet::new();
        for spec in &self.fields {
            if !seen.insert(spec.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    name: spec.name.clone(),
                });
            }
        }

        for rule in &self.cross_rules {
            for name in [rule.field(), rule.other()] {
                if !seen.contains(name) {
                    return Err(SchemaError::UnknownCrossField {
                        rule: rule.field().to_string(),
                        field: name.to_string(),
                    });
                }
            }
        }

        Ok(FormSchema {
            name: self.name,
            fields: self.fields,
            cross_rules: self.cross_rules,
        })
    }
}
