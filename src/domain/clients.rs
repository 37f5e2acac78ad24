use crate::api::{ApiClient, ApiError, payload};
use crate::core::controller::SubmissionAdapter;
use crate::core::field_path::FieldPath;
use crate::core::flow::FlowDef;
use crate::core::record::FormRecord;
use crate::core::step::StepDef;
use crate::core::validation::{StepValidator, format, numeric_range, required, required_if};
use crate::core::value::Value;
use crate::input::field::FieldSpec;
use crate::input::validators;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    Update(String),
}

/// Client onboarding wizard. The same four steps back both the add and edit
/// pages; edit seeds the record from the fetched client.
pub fn flow(clients_route: &str) -> FlowDef {
    FlowDef::new("client-onboarding", "Client registration")
        .post_submit_route(clients_route)
        .step(personal_step())
        .step(contact_step())
        .step(family_step())
        .step(employment_step())
}

fn personal_step() -> StepDef {
    StepDef::new("personal", "Personal")
        .description("Who the client is")
        .field(FieldSpec::text("firstName", "First name"))
        .field(FieldSpec::text("lastName", "Last name"))
        .field(FieldSpec::text("age", "Age").numeric().placeholder("18–100"))
        .field(FieldSpec::select("gender", "Gender", ["female", "male"]))
        .field(FieldSpec::select(
            "maritalStatus",
            "Marital status",
            ["single", "married", "divorced", "widowed"],
        ))
        .field(FieldSpec::text("spouse.firstName", "Spouse first name"))
        .field(FieldSpec::text("spouse.lastName", "Spouse last name"))
        .validator(
            StepValidator::new()
                .rule(required("firstName", "First name"))
                .rule(required("lastName", "Last name"))
                .rule(required("age", "Age"))
                .rule(numeric_range("age", "Age", 18.0, 100.0))
                .rule(required("gender", "Gender"))
                .rule(required("maritalStatus", "Marital status"))
                .rule(required_if(
                    "maritalStatus",
                    "married",
                    "spouse.firstName",
                    "Spouse first name",
                ))
                .rule(required_if(
                    "maritalStatus",
                    "married",
                    "spouse.lastName",
                    "Spouse last name",
                )),
        )
}

fn contact_step() -> StepDef {
    StepDef::new("contact", "Contact")
        .description("How to reach and identify the client")
        .field(FieldSpec::text("phoneNumber", "Phone number").placeholder("0712345678"))
        .field(FieldSpec::text("email", "Email").placeholder("optional"))
        .field(FieldSpec::text("nationalId", "National ID").placeholder("CF12345678901X"))
        .field(FieldSpec::text("district", "District"))
        .field(FieldSpec::text("village", "Village"))
        .validator(
            StepValidator::new()
                .rule(required("phoneNumber", "Phone number"))
                .rule(format("phoneNumber", validators::phone()))
                .rule(format("email", validators::email()))
                .rule(required("nationalId", "National ID"))
                .rule(format("nationalId", validators::national_id()))
                .rule(required("district", "District"))
                .rule(required("village", "Village")),
        )
}

fn family_step() -> StepDef {
    StepDef::new("family", "Guarantor & kin")
        .description("Guarantor and next of kin")
        .field(FieldSpec::text("guarantor.firstName", "Guarantor first name"))
        .field(FieldSpec::text("guarantor.lastName", "Guarantor last name"))
        .field(FieldSpec::text("guarantor.phoneNumber", "Guarantor phone"))
        .field(FieldSpec::select(
            "guarantor.relationship",
            "Guarantor relationship",
            ["parent", "sibling", "spouse", "friend", "other"],
        ))
        .field(FieldSpec::text("nextOfKin.firstName", "Next of kin first name"))
        .field(FieldSpec::text("nextOfKin.lastName", "Next of kin last name"))
        .field(FieldSpec::text("nextOfKin.phoneNumber", "Next of kin phone"))
        .field(FieldSpec::select(
            "nextOfKin.relationship",
            "Next of kin relationship",
            ["parent", "sibling", "spouse", "child", "other"],
        ))
        .validator(
            StepValidator::new()
                .rule(required("guarantor.firstName", "Guarantor first name"))
                .rule(required("guarantor.lastName", "Guarantor last name"))
                .rule(required("guarantor.phoneNumber", "Guarantor phone"))
                .rule(format("guarantor.phoneNumber", validators::phone()))
                .rule(required("nextOfKin.firstName", "Next of kin first name"))
                .rule(required("nextOfKin.phoneNumber", "Next of kin phone"))
                .rule(format("nextOfKin.phoneNumber", validators::phone())),
        )
}

fn employment_step() -> StepDef {
    StepDef::new("employment", "Employment")
        .description("Income used for loan assessment")
        .field(FieldSpec::select(
            "employmentStatus",
            "Employment status",
            ["employed", "self-employed", "unemployed"],
        ))
        .field(FieldSpec::text("employerName", "Employer name"))
        .field(FieldSpec::text("employerContact", "Employer contact"))
        .field(FieldSpec::text("occupation", "Occupation"))
        .field(FieldSpec::text("monthlyIncome", "Monthly income").numeric())
        .validator(
            StepValidator::new()
                .rule(required("employmentStatus", "Employment status"))
                .rule(required_if(
                    "employmentStatus",
                    "employed",
                    "employerName",
                    "Employer name",
                ))
                .rule(required_if(
                    "employmentStatus",
                    "employed",
                    "employerContact",
                    "Employer contact",
                ))
                .rule(required("monthlyIncome", "Monthly income"))
                .rule(format("monthlyIncome", validators::amount())),
        )
}

/// Sensible starting record for the add page; selects open on their common
/// case so the first Next is not a wall of errors.
pub fn defaults() -> FormRecord {
    let mut record = FormRecord::new();
    record.set(&FieldPath::from("maritalStatus"), Value::text("single"));
    record.set(
        &FieldPath::from("employmentStatus"),
        Value::text("self-employed"),
    );
    record
}

pub struct ClientSubmission {
    mode: SaveMode,
}

impl ClientSubmission {
    pub fn new(mode: SaveMode) -> Self {
        Self { mode }
    }
}

impl SubmissionAdapter for ClientSubmission {
    fn build_payload(&self, record: &FormRecord) -> serde_json::Value {
        payload::client_payload(record)
    }

    fn submit(&self, api: &ApiClient, record: &FormRecord) -> Result<serde_json::Value, ApiError> {
        let body = self.build_payload(record);
        match &self.mode {
            SaveMode::Create => api.create_client(body),
            SaveMode::Update(id) => api.update_client(id, body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_personal() -> FormRecord {
        let mut record = defaults();
        for (path, value) in [
            ("firstName", "Agnes"),
            ("lastName", "Nansubuga"),
            ("age", "34"),
            ("gender", "female"),
        ] {
            record.set(&FieldPath::from(path), Value::text(value));
        }
        record
    }

    #[test]
    fn spouse_fields_only_required_when_married() {
        let step = personal_step();

        let single = filled_personal();
        assert!(step.validator.validate(&single).is_empty());

        let mut married = filled_personal();
        married.set(&FieldPath::from("maritalStatus"), Value::text("married"));
        let errors = step.validator.validate(&married);
        assert!(errors.get("spouse.firstName").is_some());
        assert!(errors.get("spouse.lastName").is_some());
    }

    #[test]
    fn employer_fields_only_required_when_employed() {
        let step = employment_step();

        let mut record = FormRecord::new();
        record.set(&FieldPath::from("employmentStatus"), Value::text("self-employed"));
        record.set(&FieldPath::from("monthlyIncome"), Value::text("250000"));
        assert!(step.validator.validate(&record).is_empty());

        record.set(&FieldPath::from("employmentStatus"), Value::text("employed"));
        let errors = step.validator.validate(&record);
        assert!(errors.get("employerName").is_some());
    }

    #[test]
    fn age_outside_range_is_rejected() {
        let step = personal_step();
        let mut record = filled_personal();
        record.set(&FieldPath::from("age"), Value::text("17"));
        assert!(step.validator.validate(&record).get("age").is_some());
    }

    #[test]
    fn flow_has_four_gated_steps() {
        let flow = flow("/clients");
        assert_eq!(flow.len(), 4);
        assert_eq!(flow.post_submit_route, "/clients");
    }
}
