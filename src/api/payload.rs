use crate::core::field_path::FieldPath;
use crate::core::record::FormRecord;
use serde_json::{Map, Value, json};

/// Payload builders are pure: the same record always produces a deep-equal
/// payload. Renaming, nesting and coercion happen here and nowhere else.

fn text(record: &FormRecord, path: &str) -> String {
    record.text(&FieldPath::from(path))
}

/// Optional fields default to the empty string in backend payloads.
fn text_value(record: &FormRecord, path: &str) -> Value {
    Value::String(text(record, path))
}

/// Numeric strings are coerced to numbers; anything unparseable becomes 0,
/// which validation upstream prevents for gated fields.
fn number_value(record: &FormRecord, path: &str) -> Value {
    let raw = text(record, path);
    match raw.trim().parse::<f64>() {
        Ok(parsed) => json!(parsed),
        Err(_) => json!(0),
    }
}

fn sub_record(record: &FormRecord, root: &str, fields: &[&str]) -> Value {
    let mut out = Map::new();
    for field in fields {
        out.insert(
            (*field).to_string(),
            text_value(record, &format!("{root}.{field}")),
        );
    }
    Value::Object(out)
}

/// Client create/update payload. The backend keeps a legacy `fullName`
/// column alongside the split names; guarantor and next-of-kin travel as
/// nested objects while spouse names are flattened to the legacy columns.
pub fn client_payload(record: &FormRecord) -> Value {
    let first = text(record, "firstName");
    let last = text(record, "lastName");

    json!({
        "firstName": first,
        "lastName": last,
        "fullName": format!("{first} {last}").trim().to_string(),
        "age": number_value(record, "age"),
        "gender": text_value(record, "gender"),
        "maritalStatus": text_value(record, "maritalStatus"),
        "spouseFirstName": text_value(record, "spouse.firstName"),
        "spouseLastName": text_value(record, "spouse.lastName"),
        "phoneNumber": text_value(record, "phoneNumber"),
        "email": text_value(record, "email"),
        "nationalId": text_value(record, "nationalId"),
        "district": text_value(record, "district"),
        "village": text_value(record, "village"),
        "guarantor": sub_record(
            record,
            "guarantor",
            &["firstName", "lastName", "phoneNumber", "relationship"],
        ),
        "nextOfKin": sub_record(
            record,
            "nextOfKin",
            &["firstName", "lastName", "phoneNumber", "relationship"],
        ),
        "employmentStatus": text_value(record, "employmentStatus"),
        "employerName": text_value(record, "employerName"),
        "employerContact": text_value(record, "employerContact"),
        "occupation": text_value(record, "occupation"),
        "monthlyIncome": number_value(record, "monthlyIncome"),
    })
}

/// Staff payload for both the save and update routes.
pub fn staff_payload(record: &FormRecord) -> Value {
    let first = text(record, "firstName");
    let last = text(record, "lastName");

    json!({
        "firstName": first,
        "lastName": last,
        "fullName": format!("{first} {last}").trim().to_string(),
        "gender": text_value(record, "gender"),
        "nationalId": text_value(record, "nationalId"),
        "phoneNumber": text_value(record, "phoneNumber"),
        "position": text_value(record, "position"),
        "branch": text_value(record, "branch"),
        "salary": number_value(record, "salary"),
        "startDate": text_value(record, "startDate"),
        "email": text_value(record, "email"),
        "password": text_value(record, "password"),
    })
}

/// Expense entry payload; category travels by id, amount as a number.
pub fn expense_payload(record: &FormRecord) -> Value {
    json!({
        "description": text_value(record, "description"),
        "categoryId": text_value(record, "categoryId"),
        "amount": number_value(record, "amount"),
        "incurredOn": text_value(record, "incurredOn"),
        "notes": text_value(record, "notes"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field_path::FieldPath;
    use crate::core::value::Value as FieldValue;

    fn sample_client() -> FormRecord {
        let mut record = FormRecord::new();
        for (path, value) in [
            ("firstName", "Agnes"),
            ("lastName", "Nansubuga"),
            ("age", "34"),
            ("gender", "female"),
            ("maritalStatus", "married"),
            ("spouse.firstName", "Joseph"),
            ("phoneNumber", "0712345678"),
            ("nationalId", "CF12345678901X"),
            ("guarantor.firstName", "John"),
            ("guarantor.phoneNumber", "0798765432"),
            ("monthlyIncome", "450000"),
        ] {
            record.set(&FieldPath::from(path), FieldValue::text(value));
        }
        record
    }

    #[test]
    fn same_record_builds_deep_equal_payloads() {
        let record = sample_client();
        assert_eq!(client_payload(&record), client_payload(&record));
    }

    #[test]
    fn full_name_concatenates_split_names() {
        let payload = client_payload(&sample_client());
        assert_eq!(payload["fullName"], "Agnes Nansubuga");
    }

    #[test]
    fn guarantor_fields_nest_and_missing_ones_default_to_empty() {
        let payload = client_payload(&sample_client());
        assert_eq!(payload["guarantor"]["firstName"], "John");
        assert_eq!(payload["guarantor"]["lastName"], "");
        assert_eq!(payload["nextOfKin"]["firstName"], "");
    }

    #[test]
    fn spouse_names_flatten_to_legacy_columns() {
        let payload = client_payload(&sample_client());
        assert_eq!(payload["spouseFirstName"], "Joseph");
        assert_eq!(payload["spouseLastName"], "");
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let payload = client_payload(&sample_client());
        assert_eq!(payload["age"], serde_json::json!(34.0));
        assert_eq!(payload["monthlyIncome"], serde_json::json!(450000.0));
    }

    #[test]
    fn unparseable_numbers_fall_back_to_zero() {
        let record = FormRecord::new();
        let payload = staff_payload(&record);
        assert_eq!(payload["salary"], serde_json::json!(0));
        assert_eq!(payload["email"], "");
    }
}
