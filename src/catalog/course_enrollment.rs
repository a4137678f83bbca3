//! Course enrollment form (learning hub)

use crate::state::{FieldSpec, FormSchema, SchemaError};

pub const EXPERIENCE_LEVELS: [&str; 3] = ["beginner", "intermediate", "advanced"];

pub fn course_enrollment() -> Result<FormSchema, SchemaError> {
    FormSchema::builder("course_enrollment")
        .field(
            FieldSpec::text("fullName", "Full name")
                .required()
                .min_length(2, "Full name must be at least 2 characters"),
        )
        .field(FieldSpec::email("email", "Email").required())
        .field(
            FieldSpec::choice("experienceLevel", "Experience level", &EXPERIENCE_LEVELS)
                .required_with("Please select your experience level")
                .with_default("beginner"),
        )
        .field(
            FieldSpec::multiline("motivation", "Motivation")
                .required()
                .min_length(20, "Motivation must be at least 20 characters"),
        )
        .field(
            FieldSpec::choice("agreeToTerms", "Terms", &["yes"])
                .required_with("You must accept the course terms"),
        )
        .build()
}
