//! The marketplace's forms
//!
//! Each module builds the schema for one page's form. Schemas are checked
//! when built, so a broken catalog entry surfaces as a [`SchemaError`].

mod course_enrollment;
mod job_application;
mod job_posting;
mod organization;
mod report;
mod sign_up;

pub use course_enrollment::course_enrollment;
pub use job_application::job_application;
pub use job_posting::{job_posting, CreatePosting, JobBoard, JobPosting, UpdatePosting};
pub use organization::{organization_registration, organization_steps};
pub use report::report_submission;
pub use sign_up::researcher_sign_up;

use crate::state::{FileRules, FormSchema, SchemaError, WizardStep};
use serde::{Deserialize, Serialize};

/// Upload limits shared by every file field in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_file_bytes: u64,
}

impl UploadLimits {
    pub fn from_megabytes(mb: u64) -> Self {
        Self {
            max_file_bytes: mb.saturating_mul(FileRules::MEGABYTE),
        }
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self::from_megabytes(5)
    }
}

/// Every form the marketplace offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    JobApplication,
    CourseEnrollment,
    ReportSubmission,
    ResearcherSignUp,
    OrganizationRegistration,
    JobPosting,
}

impl FormKind {
    pub const ALL: [FormKind; 6] = [
        FormKind::JobApplication,
        FormKind::CourseEnrollment,
        FormKind::ReportSubmission,
        FormKind::ResearcherSignUp,
        FormKind::OrganizationRegistration,
        FormKind::JobPosting,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::JobApplication => "job-application",
            Self::CourseEnrollment => "course-enrollment",
            Self::ReportSubmission => "report-submission",
            Self::ResearcherSignUp => "researcher-sign-up",
            Self::OrganizationRegistration => "organization-registration",
            Self::JobPosting => "job-posting",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }

    pub fn schema(&self, limits: &UploadLimits) -> Result<FormSchema, SchemaError> {
        match self {
            Self::JobApplication => job_application(limits),
            Self::CourseEnrollment => course_enrollment(),
            Self::ReportSubmission => report_submission(limits),
            Self::ResearcherSignUp => researcher_sign_up(),
            Self::OrganizationRegistration => organization_registration(),
            Self::JobPosting => job_posting(),
        }
    }

    /// Steps for multi-step forms; `None` for single-page forms
    pub fn steps(&self) -> Option<Vec<WizardStep>> {
        match self {
            Self::OrganizationRegistration => Some(organization_steps()),
            _ => None,
        }
    }

    /// Route the page navigates to after a successful submit
    pub fn success_route(&self) -> Option<&'static str> {
        match self {
            Self::JobApplication => Some("/jobs"),
            Self::CourseEnrollment => Some("/learning"),
            Self::ReportSubmission => Some("/researcher/reports"),
            Self::ResearcherSignUp => Some("/researcher/dashboard"),
            Self::OrganizationRegistration => Some("/organization/dashboard"),
            Self::JobPosting => None,
        }
    }

    /// Title of the success notification
    pub fn success_title(&self) -> &'static str {
        match self {
            Self::JobApplication => "Application submitted",
            Self::CourseEnrollment => "Enrollment confirmed",
            Self::ReportSubmission => "Report submitted",
            Self::ResearcherSignUp => "Account created",
            Self::OrganizationRegistration => "Organization registered",
            Self::JobPosting => "Job posting saved",
        }
    }

    /// Prefix of the reference handed back by the simulated backend
    pub fn reference_prefix(&self) -> &'static str {
        match self {
            Self::JobApplication => "APP",
            Self::CourseEnrollment => "ENR",
            Self::ReportSubmission => "RPT",
            Self::ResearcherSignUp => "USR",
            Self::OrganizationRegistration => "ORG",
            Self::JobPosting => "JOB",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_catalog_schema_builds() {
        let limits = UploadLimits::default();
        for kind in FormKind::ALL {
            let schema = kind.schema(&limits);
            assert!(schema.is_ok(), "{} failed: {:?}", kind.slug(), schema.err());
        }
    }

    #[test]
    fn test_slug_round_trip() {
        for kind in FormKind::ALL {
            assert_eq!(FormKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(FormKind::from_slug("nope"), None);
    }

    #[test]
    fn test_only_organization_is_multi_step() {
        for kind in FormKind::ALL {
            assert_eq!(
                kind.steps().is_some(),
                kind == FormKind::OrganizationRegistration
            );
        }
    }

    #[test]
    fn test_huge_upload_limit_saturates() {
        assert_eq!(UploadLimits::from_megabytes(u64::MAX).max_file_bytes, u64::MAX);
    }

    #[test]
    fn test_default_upload_limit_is_five_megabytes() {
        assert_eq!(UploadLimits::default().max_file_bytes, 5 * 1024 * 1024);
    }
}
