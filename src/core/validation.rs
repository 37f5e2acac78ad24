use crate::core::error_map::ErrorMap;
use crate::core::field_path::FieldPath;
use crate::core::record::FormRecord;
use crate::input::validators::Validator;

pub type StepRule = Box<dyn Fn(&FormRecord) -> Vec<(String, String)> + Send + Sync>;

/// Step-scoped validator: a list of rules run against the whole record,
/// each reporting zero or more (field path, message) entries. Pure and
/// deterministic; rules only inspect fields belonging to their step.
#[derive(Default)]
pub struct StepValidator {
    rules: Vec<StepRule>,
}

impl StepValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: StepRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn validate(&self, record: &FormRecord) -> ErrorMap {
        let mut errors = ErrorMap::new();
        for rule in &self.rules {
            for (path, message) in rule(record) {
                // First message per field wins within a pass.
                if errors.get(&path).is_none() {
                    errors.insert(path, message);
                }
            }
        }
        errors
    }
}

/// Trimmed non-empty check.
pub fn required(path: impl Into<FieldPath>, label: impl Into<String>) -> StepRule {
    let path = path.into();
    let label = label.into();
    Box::new(move |record: &FormRecord| {
        if record.text(&path).trim().is_empty() {
            vec![(path.to_string(), format!("{label} is required"))]
        } else {
            vec![]
        }
    })
}

/// Inclusive numeric range on a text field; empty values are left to a
/// `required` rule on the same field.
pub fn numeric_range(
    path: impl Into<FieldPath>,
    label: impl Into<String>,
    min: f64,
    max: f64,
) -> StepRule {
    let path = path.into();
    let label = label.into();
    Box::new(move |record: &FormRecord| {
        let text = record.text(&path);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return vec![];
        }
        match trimmed.parse::<f64>() {
            Ok(parsed) if (min..=max).contains(&parsed) => vec![],
            Ok(_) => vec![(
                path.to_string(),
                format!("{label} must be between {min} and {max}"),
            )],
            Err(_) => vec![(path.to_string(), format!("{label} must be a number"))],
        }
    })
}

/// Conditional requirement: `path` becomes required only while the field at
/// `when` holds `equals` (spouse fields for married clients, employer fields
/// for employed ones).
pub fn required_if(
    when: impl Into<FieldPath>,
    equals: &str,
    path: impl Into<FieldPath>,
    label: impl Into<String>,
) -> StepRule {
    let when = when.into();
    let expected = equals.to_string();
    let path = path.into();
    let label = label.into();
    Box::new(move |record: &FormRecord| {
        if record.text(&when) != expected {
            return vec![];
        }
        if record.text(&path).trim().is_empty() {
            vec![(path.to_string(), format!("{label} is required"))]
        } else {
            vec![]
        }
    })
}

/// Delegate to a shared format validator. Runs only on non-empty values;
/// pair with `required` where the field is mandatory.
pub fn format(path: impl Into<FieldPath>, validator: Validator) -> StepRule {
    let path = path.into();
    Box::new(move |record: &FormRecord| {
        let text = record.text(&path);
        if text.trim().is_empty() {
            return vec![];
        }
        match validator(&text) {
            Ok(()) => vec![],
            Err(message) => vec![(path.to_string(), message)],
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;
    use crate::input::validators;

    fn record_with(path: &str, value: &str) -> FormRecord {
        let mut record = FormRecord::new();
        record.set(&FieldPath::from(path), Value::text(value));
        record
    }

    #[test]
    fn required_flags_whitespace_only_values() {
        let validator = StepValidator::new().rule(required("firstName", "First name"));
        let errors = validator.validate(&record_with("firstName", "   "));
        assert_eq!(errors.get("firstName"), Some("First name is required"));
    }

    #[test]
    fn numeric_range_bounds_are_inclusive() {
        let validator = StepValidator::new().rule(numeric_range("age", "Age", 18.0, 100.0));
        assert!(validator.validate(&record_with("age", "18")).is_empty());
        assert!(validator.validate(&record_with("age", "100")).is_empty());
        assert!(!validator.validate(&record_with("age", "17")).is_empty());
        assert!(!validator.validate(&record_with("age", "abc")).is_empty());
    }

    #[test]
    fn required_if_only_fires_on_matching_condition() {
        let validator = StepValidator::new().rule(required_if(
            "maritalStatus",
            "married",
            "spouse.firstName",
            "Spouse first name",
        ));

        let single = record_with("maritalStatus", "single");
        assert!(validator.validate(&single).is_empty());

        let married = record_with("maritalStatus", "married");
        let errors = validator.validate(&married);
        assert_eq!(
            errors.get("spouse.firstName"),
            Some("Spouse first name is required")
        );
    }

    #[test]
    fn format_skips_empty_optional_values() {
        let validator = StepValidator::new().rule(format("email", validators::email()));
        assert!(validator.validate(&FormRecord::new()).is_empty());
        assert!(!validator.validate(&record_with("email", "nope")).is_empty());
    }

    #[test]
    fn first_message_per_field_wins() {
        let validator = StepValidator::new()
            .rule(required("phoneNumber", "Phone number"))
            .rule(format("phoneNumber", validators::phone()));
        let errors = validator.validate(&record_with("phoneNumber", "123"));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("phoneNumber"),
            Some("Phone number must have exactly 10 digits")
        );
    }
}
