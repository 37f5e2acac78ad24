use crate::core::validation::StepValidator;
use crate::input::field::FieldSpec;

/// One section of a multi-step flow: identity, display metadata, the ordered
/// fields it edits and the validator gating forward navigation out of it.
pub struct StepDef {
    pub id: &'static str,
    pub label: String,
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
    pub validator: StepValidator,
}

impl StepDef {
    pub fn new(id: &'static str, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            description: None,
            fields: Vec::new(),
            validator: StepValidator::new(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn validator(mut self, validator: StepValidator) -> Self {
        self.validator = validator;
        self
    }
}
