use crate::api::{ApiClient, ApiError};
use crate::core::controller::SubmissionAdapter;
use crate::core::flow::FlowDef;
use crate::core::record::FormRecord;
use crate::core::step::StepDef;
use crate::core::validation::{StepValidator, format, required};
use crate::input::field::FieldSpec;
use crate::input::validators;
use serde_json::json;

/// Single-step flow through the same engine the wizards use.
pub fn flow(dashboard_route: &str) -> FlowDef {
    FlowDef::new("login", "Sign in")
        .post_submit_route(dashboard_route)
        .step(
            StepDef::new("credentials", "Credentials")
                .field(FieldSpec::text("email", "Email"))
                .field(FieldSpec::text("password", "Password").secret())
                .validator(
                    StepValidator::new()
                        .rule(required("email", "Email"))
                        .rule(format("email", validators::email()))
                        .rule(required("password", "Password")),
                ),
        )
}

pub struct LoginSubmission;

impl SubmissionAdapter for LoginSubmission {
    fn build_payload(&self, record: &FormRecord) -> serde_json::Value {
        json!({
            "email": record.text(&"email".into()),
            "password": record.text(&"password".into()),
        })
    }

    fn submit(&self, api: &ApiClient, record: &FormRecord) -> Result<serde_json::Value, ApiError> {
        let email = record.text(&"email".into());
        let password = record.text(&"password".into());
        let response = api.login(&email, &password)?;
        Ok(json!({ "token": response.token, "user": response.user }))
    }
}
