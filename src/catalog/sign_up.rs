//! Researcher sign-up

use crate::state::{Constraint, CrossFieldRule, FieldSpec, FormSchema, SchemaError};

pub fn researcher_sign_up() -> Result<FormSchema, SchemaError> {
    let username = Constraint::pattern(
        "^[A-Za-z0-9_]{3,20}$",
        "Username must be 3-20 letters, digits or underscores",
    )
    .map_err(|e| SchemaError::InvalidPattern {
        field: "username".to_string(),
        reason: e.to_string(),
    })?;

    FormSchema::builder("researcher_sign_up")
        .field(FieldSpec::text("username", "Username").required().constraint(username))
        .field(FieldSpec::email("email", "Email").required())
        .field(password_field())
        .field(
            FieldSpec::text("confirmPassword", "Confirm password")
                .required_with("Please confirm your password"),
        )
        .cross(CrossFieldRule::matches(
            "confirmPassword",
            "password",
            "Passwords don't match",
        ))
        .build()
}

/// Password field shared with organization registration
pub(crate) fn password_field() -> FieldSpec {
    FieldSpec::text("password", "Password")
        .required()
        .min_length(8, "Password must be at least 8 characters")
        .constraint(Constraint::custom(
            |value| {
                value
                    .as_text()
                    .is_some_and(|s| s.chars().any(|c| c.is_ascii_digit()))
            },
            "Password must contain at least one number",
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{validate, FieldErrorKind, FormValues};
    use pretty_assertions::assert_eq;

    fn values() -> FormValues {
        let mut values = FormValues::new();
        values.set("username", "null_byte");
        values.set("email", "nb@example.com");
        values.set("password", "correcthorse9");
        values.set("confirmPassword", "correcthorse9");
        values
    }

    #[test]
    fn test_valid_sign_up() {
        assert!(validate(&researcher_sign_up().unwrap(), &values()).is_valid());
    }

    #[test]
    fn test_password_needs_digit() {
        let mut values = values();
        values.set("password", "correcthorse");
        values.set("confirmPassword", "correcthorse");
        let errors = validate(&researcher_sign_up().unwrap(), &values).into_errors();
        assert_eq!(errors["password"].message, "Password must contain at least one number");
    }

    #[test]
    fn test_confirmation_mismatch() {
        let mut values = values();
        values.set("confirmPassword", "correcthorse8");
        let errors = validate(&researcher_sign_up().unwrap(), &values).into_errors();
        assert_eq!(errors["confirmPassword"].kind, FieldErrorKind::Mismatch);
    }

    #[test]
    fn test_username_pattern() {
        let mut values = values();
        values.set("username", "no spaces please");
        let errors = validate(&researcher_sign_up().unwrap(), &values).into_errors();
        assert_eq!(errors["username"].kind, FieldErrorKind::Format);
    }
}
