use crate::core::error_map::ErrorMap;
use crate::core::record::FormRecord;
use crate::core::step::StepDef;
use crate::ui::span::Line;
use indexmap::IndexMap;

/// Focused field within the active step, with the text cursor as a char
/// offset into its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldFocus {
    pub index: usize,
    pub cursor: usize,
}

/// Pure presentation of one step: lines out, nothing mutated. Renderers get
/// the whole record and error map but only read the fields of their step.
pub trait StepRenderer: Send {
    fn render(
        &self,
        step: &StepDef,
        record: &FormRecord,
        errors: &ErrorMap,
        focus: Option<FieldFocus>,
    ) -> Vec<Line>;
}

/// Step id → renderer, with a shared default for the common field-list
/// layout. Flows register a custom renderer only where a step needs one.
pub struct StepRegistry {
    renderers: IndexMap<&'static str, Box<dyn StepRenderer>>,
    fallback: Box<dyn StepRenderer>,
}

impl StepRegistry {
    pub fn new(fallback: Box<dyn StepRenderer>) -> Self {
        Self {
            renderers: IndexMap::new(),
            fallback,
        }
    }

    pub fn register(&mut self, step_id: &'static str, renderer: Box<dyn StepRenderer>) {
        self.renderers.insert(step_id, renderer);
    }

    pub fn render(
        &self,
        step: &StepDef,
        record: &FormRecord,
        errors: &ErrorMap,
        focus: Option<FieldFocus>,
    ) -> Vec<Line> {
        self.renderers
            .get(step.id)
            .unwrap_or(&self.fallback)
            .render(step, record, errors, focus)
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::new(Box::new(crate::ui::step_renderer::FieldListRenderer))
    }
}
