//! Vulnerability report submission

use super::UploadLimits;
use crate::state::{FieldSpec, FileRules, FormSchema, SchemaError};

pub const SEVERITIES: [&str; 5] = ["critical", "high", "medium", "low", "info"];

pub const VULNERABILITY_TYPES: [&str; 8] = [
    "xss",
    "sqli",
    "csrf",
    "ssrf",
    "idor",
    "rce",
    "auth-bypass",
    "other",
];

const ATTACHMENT_TYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/gif",
    "application/pdf",
    "text/plain",
];

const MAX_ATTACHMENTS: usize = 5;

pub fn report_submission(limits: &UploadLimits) -> Result<FormSchema, SchemaError> {
    let attachments = FileRules::multiple(MAX_ATTACHMENTS, limits.max_file_bytes, &ATTACHMENT_TYPES)
        .with_type_message("Attachments must be images, PDF or plain text");

    FormSchema::builder("report_submission")
        .field(
            FieldSpec::text("title", "Title")
                .required()
                .min_length(10, "Title must be at least 10 characters")
                .max_length(120, "Title must be at most 120 characters"),
        )
        .field(FieldSpec::text("program", "Program").required_with("Please select a program"))
        .field(
            FieldSpec::choice("severity", "Severity", &SEVERITIES)
                .required_with("Please select a severity"),
        )
        .field(FieldSpec::url("asset", "Affected asset").required())
        .field(
            FieldSpec::choice("vulnerabilityType", "Vulnerability type", &VULNERABILITY_TYPES)
                .required_with("Please select a vulnerability type"),
        )
        .field(
            FieldSpec::multiline("description", "Description")
                .required()
                .min_length(50, "Description must be at least 50 characters"),
        )
        .field(
            FieldSpec::multiline("stepsToReproduce", "Steps to reproduce")
                .required()
                .min_length(20, "Steps to reproduce must be at least 20 characters"),
        )
        .field(
            FieldSpec::multiline("impact", "Impact")
                .required()
                .min_length(20, "Impact must be at least 20 characters"),
        )
        .field(FieldSpec::file("attachments", "Attachments", attachments))
        .build()
}
