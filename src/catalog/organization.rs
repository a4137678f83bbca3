//! Organization registration: a three-step sign-up

use super::sign_up::password_field;
use crate::state::{CrossFieldRule, FieldSpec, FormSchema, SchemaError, WizardStep};

pub const INDUSTRIES: [&str; 6] = [
    "technology",
    "finance",
    "healthcare",
    "government",
    "retail",
    "other",
];

pub const COMPANY_SIZES: [&str; 4] = ["1-10", "11-50", "51-200", "201+"];

pub fn organization_registration() -> Result<FormSchema, SchemaError> {
    FormSchema::builder("organization_registration")
        // Organization
        .field(
            FieldSpec::text("orgName", "Organization name")
                .required()
                .min_length(2, "Organization name must be at least 2 characters"),
        )
        .field(
            FieldSpec::choice("industry", "Industry", &INDUSTRIES)
                .required_with("Please select an industry"),
        )
        .field(FieldSpec::url("website", "Website").required())
        .field(
            FieldSpec::choice("companySize", "Company size", &COMPANY_SIZES)
                .required_with("Please select a company size"),
        )
        // Contact
        .field(
            FieldSpec::text("contactName", "Contact name")
                .required()
                .min_length(2, "Contact name must be at least 2 characters"),
        )
        .field(FieldSpec::email("email", "Work email").required())
        .field(FieldSpec::phone("phone", "Phone number").required())
        // Account
        .field(password_field())
        .field(
            FieldSpec::text("confirmPassword", "Confirm password")
                .required_with("Please confirm your password"),
        )
        .field(
            FieldSpec::choice("agreeToTerms", "Terms", &["yes"])
                .required_with("You must accept the terms of service"),
        )
        .cross(CrossFieldRule::matches(
            "confirmPassword",
            "password",
            "Passwords don't match",
        ))
        .build()
}

pub fn organization_steps() -> Vec<WizardStep> {
    vec![
        WizardStep::new("Organization", &["orgName", "industry", "website", "companySize"]),
        WizardStep::new("Contact", &["contactName", "email", "phone"]),
        WizardStep::new("Account", &["password", "confirmPassword", "agreeToTerms"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{NotificationLog, SimulatedAction};
    use crate::state::{StepOutcome, SubmitCoordinator, SubmitOutcome, WizardForm};
    use std::sync::Arc;
    use std::time::Duration;

    fn wizard() -> WizardForm {
        let coordinator = SubmitCoordinator::for_schema(
            Arc::new(organization_registration().unwrap()),
            Arc::new(SimulatedAction::succeeding(Duration::from_millis(1500), "Welcome aboard")),
            Arc::new(NotificationLog::new()),
        );
        WizardForm::new(coordinator, organization_steps()).unwrap()
    }

    #[test]
    fn test_steps_cover_every_field() {
        let schema = organization_registration().unwrap();
        let owned: usize = organization_steps().iter().map(|s| s.fields.len()).sum();
        assert_eq!(owned, schema.fields().len());
    }

    #[test]
    fn test_invalid_website_blocks_first_step() {
        let mut wizard = wizard();
        let c = wizard.coordinator();
        c.set_field("orgName", "Acme Corp").unwrap();
        c.set_field("industry", "technology").unwrap();
        c.set_field("website", "acme").unwrap();
        c.set_field("companySize", "11-50").unwrap();

        match wizard.next_step() {
            StepOutcome::Invalid(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.contains_key("website"));
            }
            other => panic!("expected invalid step, got {other:?}"),
        }
        assert_eq!(wizard.current_step(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_registration() {
        let mut wizard = wizard();
        {
            let c = wizard.coordinator();
            c.set_field("orgName", "Acme Corp").unwrap();
            c.set_field("industry", "technology").unwrap();
            c.set_field("website", "https://acme.io").unwrap();
            c.set_field("companySize", "11-50").unwrap();
        }
        assert_eq!(wizard.next_step(), StepOutcome::Advanced(2));
        {
            let c = wizard.coordinator();
            c.set_field("contactName", "Jo Park").unwrap();
            c.set_field("email", "jo@acme.io").unwrap();
            c.set_field("phone", "+1 555 010 2030").unwrap();
        }
        assert_eq!(wizard.next_step(), StepOutcome::Advanced(3));
        {
            let c = wizard.coordinator();
            c.set_field("password", "acmesecure1").unwrap();
            c.set_field("confirmPassword", "acmesecure1").unwrap();
            c.set_field("agreeToTerms", "yes").unwrap();
        }
        assert!(matches!(wizard.submit().await, SubmitOutcome::Succeeded(_)));
    }
}
