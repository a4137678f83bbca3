//! Multi-step forms (e.g. organization registration)
//!
//! Each step owns a disjoint subset of the schema's fields. Moving forward
//! validates only the current step; moving back never validates and never
//! discards values. The final submit validates the whole schema.

use super::schema::SchemaError;
use super::submission::{SubmissionState, SubmitCoordinator, SubmitOutcome};
use super::validator::{validate_fields, FieldErrors, ValidationResult};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardStep {
    pub title: String,
    pub fields: Vec<String>,
}

impl WizardStep {
    pub fn new(title: &str, fields: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Result of `next_step`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved to the given 1-based step
    Advanced(usize),
    /// Current step has errors; the index did not change
    Invalid(FieldErrors),
    /// Already on the last step; use `submit`
    AtLastStep,
}

pub struct WizardForm {
    coordinator: SubmitCoordinator,
    steps: Vec<WizardStep>,
    /// 1-based
    current: usize,
}

impl WizardForm {
    pub fn new(
        coordinator: SubmitCoordinator,
        steps: Vec<WizardStep>,
    ) -> Result<Self, SchemaError> {
        if steps.is_empty() {
            return Err(SchemaError::EmptyWizard);
        }

        let mut owned = HashSet::new();
        coordinator.with_form(|form| {
            for step in &steps {
                for field in &step.fields {
                    if !form.schema().contains(field) {
                        return Err(SchemaError::UnknownStepField {
                            step: step.title.clone(),
                            field: field.clone(),
                        });
                    }
                    if !owned.insert(field.clone()) {
                        return Err(SchemaError::OverlappingStepField {
                            field: field.clone(),
                        });
                    }
                }
            }
            Ok(())
        })?;

        Ok(Self {
            coordinator,
            steps,
            current: 1,
        })
    }

    pub fn coordinator(&self) -> &SubmitCoordinator {
        &self.coordinator
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self) -> &WizardStep {
        &self.steps[self.current - 1]
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn is_last_step(&self) -> bool {
        self.current == self.steps.len()
    }

    /// Validate the current step and advance if it is clean
    pub fn next_step(&mut self) -> StepOutcome {
        if self.is_last_step() {
            return StepOutcome::AtLastStep;
        }

        let scope = self.step().fields.clone();
        let result = self.coordinator.with_form(|form| {
            let result = validate_fields(form.schema(), form.values(), &scope);
            form.set_errors_for(&scope, result.errors());
            result
        });

        match result {
            ValidationResult::Valid => {
                self.current += 1;
                tracing::debug!(step = self.current, "wizard advanced");
                StepOutcome::Advanced(self.current)
            }
            ValidationResult::Invalid(errors) => {
                tracing::debug!(step = self.current, errors = errors.len(), "wizard step invalid");
                StepOutcome::Invalid(errors)
            }
        }
    }

    /// Go back one step without validating. Returns the new index.
    pub fn prev_step(&mut self) -> usize {
        if self.current > 1 {
            self.current -= 1;
        }
        self.current
    }

    /// Validate every step and run the action. Only allowed on the last step.
    ///
    /// If validation fails, the wizard moves back to the first step that
    /// holds an error.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.is_last_step() {
            return SubmitOutcome::StepsRemaining {
                current: self.current,
                total: self.steps.len(),
            };
        }

        let outcome = self.coordinator.submit().await;
        match &outcome {
            SubmitOutcome::Invalid(errors) => {
                if let Some(index) = self
                    .steps
                    .iter()
                    .position(|s| s.fields.iter().any(|f| errors.contains_key(f)))
                {
                    self.current = index + 1;
                }
            }
            // The form was reset after success; start over from the top
            SubmitOutcome::Succeeded(_) if self.coordinator.state() == SubmissionState::Idle => {
                self.current = 1;
            }
            _ => {}
        }
        outcome
    }

    /// Reset values and return to the first step
    pub fn reset(&mut self) -> bool {
        let reset = self.coordinator.reset();
        if reset {
            self.current = 1;
        }
        reset
    }
}
