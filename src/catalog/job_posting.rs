//! Job postings managed by organizations
//!
//! `JobBoard` is the in-memory posting store. Creating and editing go
//! through the regular form machinery: the store exposes them as actions.

use crate::action::{Action, ActionError, SuccessPayload};
use crate::state::{CrossFieldRule, FieldSpec, FieldValue, FormSchema, FormValues, SchemaError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

pub const EMPLOYMENT_TYPES: [&str; 4] = ["full-time", "part-time", "contract", "internship"];

pub fn job_posting() -> Result<FormSchema, SchemaError> {
    FormSchema::builder("job_posting")
        .field(
            FieldSpec::text("title", "Job title")
                .required()
                .min_length(5, "Job title must be at least 5 characters"),
        )
        .field(
            FieldSpec::text("location", "Location")
                .required()
                .with_default("Remote"),
        )
        .field(
            FieldSpec::choice("employmentType", "Employment type", &EMPLOYMENT_TYPES)
                .required_with("Please select an employment type")
                .with_default("full-time"),
        )
        .field(
            FieldSpec::number("salaryMin", "Minimum salary")
                .required()
                .range(0.0, 1_000_000.0, "Salary must be between 0 and 1,000,000"),
        )
        .field(
            FieldSpec::number("salaryMax", "Maximum salary")
                .required()
                .range(0.0, 1_000_000.0, "Salary must be between 0 and 1,000,000"),
        )
        .field(
            FieldSpec::multiline("description", "Description")
                .required()
                .min_length(50, "Description must be at least 50 characters"),
        )
        .field(
            FieldSpec::list("requirements", "Requirements")
                .required_with("Add at least one requirement")
                .min_items(1, "Add at least one requirement"),
        )
        .cross(CrossFieldRule::not_less_than(
            "salaryMax",
            "salaryMin",
            "Maximum salary must not be below the minimum",
        ))
        .build()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub employment_type: String,
    pub salary_min: f64,
    pub salary_max: f64,
    pub description: String,
    pub requirements: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPosting {
    fn from_values(
        id: Uuid,
        values: &FormValues,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ActionError> {
        let number = |name: &str| {
            values
                .value(name)
                .as_number()
                .ok_or_else(|| ActionError::Rejected(format!("{name} is not a number")))
        };
        Ok(Self {
            id,
            title: values.text("title").to_string(),
            location: values.text("location").to_string(),
            employment_type: values.text("employmentType").to_string(),
            salary_min: number("salaryMin")?,
            salary_max: number("salaryMax")?,
            description: values.text("description").to_string(),
            requirements: values
                .value("requirements")
                .selections()
                .into_iter()
                .map(str::to_string)
                .collect(),
            created_at,
            updated_at: Utc::now(),
        })
    }

    /// Form values that prefill the edit form
    pub fn to_values(&self) -> FormValues {
        let mut values = FormValues::new();
        values.set("title", self.title.as_str());
        values.set("location", self.location.as_str());
        values.set("employmentType", self.employment_type.as_str());
        values.set("salaryMin", self.salary_min.to_string());
        values.set("salaryMax", self.salary_max.to_string());
        values.set("description", self.description.as_str());
        values.set("requirements", FieldValue::Choices(self.requirements.clone()));
        values
    }
}

/// Shared in-memory store of an organization's postings
#[derive(Debug, Default, Clone)]
pub struct JobBoard {
    postings: Arc<Mutex<Vec<JobPosting>>>,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<JobPosting>> {
        self.postings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list(&self) -> Vec<JobPosting> {
        self.lock().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<JobPosting> {
        self.lock().iter().find(|p| p.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove a posting; false when it does not exist
    pub fn delete(&self, id: Uuid) -> bool {
        let mut postings = self.lock();
        let before = postings.len();
        postings.retain(|p| p.id != id);
        let removed = postings.len() != before;
        if removed {
            tracing::info!(%id, "job posting deleted");
        }
        removed
    }

    pub fn creator(&self) -> CreatePosting {
        CreatePosting { board: self.clone() }
    }

    pub fn editor(&self, id: Uuid) -> UpdatePosting {
        UpdatePosting {
            board: self.clone(),
            id,
        }
    }
}

/// Action that adds a posting built from the submitted values
#[derive(Debug, Clone)]
pub struct CreatePosting {
    board: JobBoard,
}

#[async_trait]
impl Action for CreatePosting {
    async fn perform(&self, values: FormValues) -> Result<SuccessPayload, ActionError> {
        let posting = JobPosting::from_values(Uuid::new_v4(), &values, Utc::now())?;
        let id = posting.id;
        let message = format!("'{}' is now live", posting.title);
        self.board.lock().push(posting);
        tracing::info!(%id, "job posting created");
        Ok(SuccessPayload::new(message).with_reference(id.to_string()))
    }
}

/// Action that replaces an existing posting's contents
#[derive(Debug, Clone)]
pub struct UpdatePosting {
    board: JobBoard,
    id: Uuid,
}

#[async_trait]
impl Action for UpdatePosting {
    async fn perform(&self, values: FormValues) -> Result<SuccessPayload, ActionError> {
        let mut postings = self.board.lock();
        let slot = postings
            .iter_mut()
            .find(|p| p.id == self.id)
            .ok_or_else(|| ActionError::Rejected("Job posting no longer exists".to_string()))?;
        let updated = JobPosting::from_values(self.id, &values, slot.created_at)?;
        let message = format!("'{}' was updated", updated.title);
        *slot = updated;
        tracing::info!(id = %self.id, "job posting updated");
        Ok(SuccessPayload::new(message).with_reference(self.id.to_string()))
    }
}
