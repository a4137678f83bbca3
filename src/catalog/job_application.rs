//! Job application form (apply dialog on a job listing)

use super::UploadLimits;
use crate::state::{FieldSpec, FileRules, FormSchema, SchemaError};

pub(crate) const DOCUMENT_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub fn job_application(limits: &UploadLimits) -> Result<FormSchema, SchemaError> {
    let cv_rules = FileRules::single(limits.max_file_bytes, &DOCUMENT_TYPES)
        .with_type_message("Only PDF, DOC, and DOCX files are allowed")
        .with_count_message("Please upload a single CV file");

    FormSchema::builder("job_application")
        .field(
            FieldSpec::text("fullName", "Full name")
                .required_with("Full name must be at least 2 characters")
                .min_length(2, "Full name must be at least 2 characters"),
        )
        .field(FieldSpec::email("email", "Email").required())
        .field(FieldSpec::phone("phone", "Phone number").required())
        .field(
            FieldSpec::number("experience", "Years of experience")
                .required()
                .range(0.0, 50.0, "Experience must be between 0 and 50 years"),
        )
        .field(
            FieldSpec::multiline("coverLetter", "Cover letter")
                .required()
                .min_length(50, "Cover letter must be at least 50 characters")
                .max_length(2000, "Cover letter must be at most 2000 characters"),
        )
        .field(FieldSpec::file("cv", "CV", cv_rules).required_with("Please upload your CV"))
        .field(FieldSpec::url("portfolio", "Portfolio"))
        .build()
}
