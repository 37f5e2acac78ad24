use crate::api::{ApiClient, ApiError, payload};
use crate::core::controller::SubmissionAdapter;
use crate::core::flow::FlowDef;
use crate::core::record::FormRecord;
use crate::core::step::StepDef;
use crate::core::validation::{StepValidator, format, required};
use crate::input::field::FieldSpec;
use crate::input::validators;

use super::clients::SaveMode;

/// Staff onboarding wizard: personal details, employment terms, account
/// access. The edit flow drops the temporary-password field; the backend
/// keeps the stored credential when none is sent.
pub fn flow(mode: &SaveMode, staff_route: &str) -> FlowDef {
    FlowDef::new("staff-onboarding", "Staff registration")
        .post_submit_route(staff_route)
        .step(personal_step())
        .step(employment_step())
        .step(account_step(mode))
}

fn personal_step() -> StepDef {
    StepDef::new("personal", "Personal")
        .field(FieldSpec::text("firstName", "First name"))
        .field(FieldSpec::text("lastName", "Last name"))
        .field(FieldSpec::select("gender", "Gender", ["female", "male"]))
        .field(FieldSpec::text("nationalId", "National ID").placeholder("CM12345678901X"))
        .field(FieldSpec::text("phoneNumber", "Phone number").placeholder("0712345678"))
        .validator(
            StepValidator::new()
                .rule(required("firstName", "First name"))
                .rule(required("lastName", "Last name"))
                .rule(required("gender", "Gender"))
                .rule(required("nationalId", "National ID"))
                .rule(format("nationalId", validators::national_id()))
                .rule(required("phoneNumber", "Phone number"))
                .rule(format("phoneNumber", validators::phone())),
        )
}

fn employment_step() -> StepDef {
    StepDef::new("employment", "Employment")
        .field(FieldSpec::select(
            "position",
            "Position",
            ["loan-officer", "branch-manager", "accountant", "teller", "admin"],
        ))
        .field(FieldSpec::text("branch", "Branch"))
        .field(FieldSpec::text("salary", "Monthly salary").numeric())
        .field(FieldSpec::text("startDate", "Start date").placeholder("YYYY-MM-DD"))
        .validator(
            StepValidator::new()
                .rule(required("position", "Position"))
                .rule(required("branch", "Branch"))
                .rule(required("salary", "Monthly salary"))
                .rule(format("salary", validators::amount()))
                .rule(required("startDate", "Start date")),
        )
}

fn account_step(mode: &SaveMode) -> StepDef {
    let step = StepDef::new("account", "Account")
        .description("Login credentials for the staff portal")
        .field(FieldSpec::text("email", "Email").placeholder("name@branch.tindigwa.org"));

    let validator = StepValidator::new()
        .rule(required("email", "Email"))
        .rule(format("email", validators::email()));

    match mode {
        SaveMode::Create => step
            .field(FieldSpec::text("password", "Temporary password").secret())
            .validator(
                validator
                    .rule(required("password", "Temporary password"))
                    .rule(format("password", validators::min_length(8))),
            ),
        SaveMode::Update(_) => step.validator(validator),
    }
}

pub struct StaffSubmission {
    mode: SaveMode,
}

impl StaffSubmission {
    pub fn new(mode: SaveMode) -> Self {
        Self { mode }
    }
}

impl SubmissionAdapter for StaffSubmission {
    fn build_payload(&self, record: &FormRecord) -> serde_json::Value {
        payload::staff_payload(record)
    }

    fn submit(&self, api: &ApiClient, record: &FormRecord) -> Result<serde_json::Value, ApiError> {
        let body = self.build_payload(record);
        match &self.mode {
            SaveMode::Create => api.save_staff(body),
            SaveMode::Update(id) => api.update_staff(id, body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field_path::FieldPath;
    use crate::core::value::Value;

    #[test]
    fn create_flow_requires_a_password_but_edit_does_not() {
        let create = flow(&SaveMode::Create, "/staff");
        let edit = flow(&SaveMode::Update("9".to_string()), "/staff");

        let mut record = FormRecord::new();
        record.set(&FieldPath::from("email"), Value::text("jane@branch.tindigwa.org"));

        let create_errors = create.steps[2].validator.validate(&record);
        assert!(create_errors.get("password").is_some());

        let edit_errors = edit.steps[2].validator.validate(&record);
        assert!(edit_errors.is_empty());
    }

    #[test]
    fn short_passwords_are_rejected_on_create() {
        let create = flow(&SaveMode::Create, "/staff");
        let mut record = FormRecord::new();
        record.set(&FieldPath::from("email"), Value::text("jane@branch.tindigwa.org"));
        record.set(&FieldPath::from("password"), Value::text("short"));
        let errors = create.steps[2].validator.validate(&record);
        assert!(errors.get("password").is_some());
    }
}
