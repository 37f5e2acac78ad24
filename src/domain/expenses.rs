use crate::api::{ApiClient, ApiError, payload};
use crate::core::controller::SubmissionAdapter;
use crate::core::flow::FlowDef;
use crate::core::record::FormRecord;
use crate::core::step::StepDef;
use crate::core::validation::{StepValidator, format, required};
use crate::domain::catalog::Category;
use crate::input::field::FieldSpec;
use crate::input::validators;

/// Expense entry: one step, category options come from the catalog store
/// refreshed at page mount.
pub fn flow(categories: &[Category], dashboard_route: &str) -> FlowDef {
    let names: Vec<String> = categories.iter().map(|c| c.name.clone()).collect();
    FlowDef::new("expense-entry", "Record expense")
        .post_submit_route(dashboard_route)
        .step(
            StepDef::new("details", "Details")
                .field(FieldSpec::text("description", "Description"))
                .field(FieldSpec::select("category", "Category", names))
                .field(FieldSpec::text("amount", "Amount").numeric())
                .field(FieldSpec::text("incurredOn", "Date").placeholder("YYYY-MM-DD"))
                .field(FieldSpec::text("notes", "Notes").placeholder("optional"))
                .validator(
                    StepValidator::new()
                        .rule(required("description", "Description"))
                        .rule(required("category", "Category"))
                        .rule(required("amount", "Amount"))
                        .rule(format("amount", validators::amount()))
                        .rule(required("incurredOn", "Date")),
                ),
        )
}

pub struct ExpenseSubmission {
    categories: Vec<Category>,
}

impl ExpenseSubmission {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    fn category_id(&self, name: &str) -> Option<i64> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
    }
}

impl SubmissionAdapter for ExpenseSubmission {
    fn build_payload(&self, record: &FormRecord) -> serde_json::Value {
        let mut body = payload::expense_payload(record);
        let name = record.text(&"category".into());
        body["categoryId"] = match self.category_id(&name) {
            Some(id) => serde_json::json!(id),
            None => serde_json::Value::Null,
        };
        body
    }

    fn submit(&self, api: &ApiClient, record: &FormRecord) -> Result<serde_json::Value, ApiError> {
        api.create_expense(self.build_payload(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field_path::FieldPath;
    use crate::core::value::Value;

    #[test]
    fn category_name_is_mapped_to_its_id() {
        let adapter = ExpenseSubmission::new(vec![
            Category { id: 3, name: "Rent".to_string() },
            Category { id: 9, name: "Fuel".to_string() },
        ]);
        let mut record = FormRecord::new();
        record.set(&FieldPath::from("description"), Value::text("Office rent"));
        record.set(&FieldPath::from("category"), Value::text("Fuel"));
        record.set(&FieldPath::from("amount"), Value::text("80000"));

        let body = adapter.build_payload(&record);
        assert_eq!(body["categoryId"], serde_json::json!(9));
        assert_eq!(body["amount"], serde_json::json!(80000.0));
    }

    #[test]
    fn unknown_category_travels_as_null() {
        let adapter = ExpenseSubmission::new(vec![]);
        let mut record = FormRecord::new();
        record.set(&FieldPath::from("category"), Value::text("Ghost"));
        let body = adapter.build_payload(&record);
        assert!(body["categoryId"].is_null());
    }
}
