use crate::core::step::StepDef;

/// A complete wizard: ordered steps plus where the app navigates after a
/// successful submission. Client and staff onboarding, and the login form,
/// are all instances of this one shape.
pub struct FlowDef {
    pub id: &'static str,
    pub title: String,
    pub steps: Vec<StepDef>,
    pub post_submit_route: String,
}

impl FlowDef {
    pub fn new(id: &'static str, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            steps: Vec::new(),
            post_submit_route: String::from("/"),
        }
    }

    pub fn step(mut self, step: StepDef) -> Self {
        self.steps.push(step);
        self
    }

    pub fn post_submit_route(mut self, route: impl Into<String>) -> Self {
        self.post_submit_route = route.into();
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_at(&self, index: usize) -> Option<&StepDef> {
        index.checked_sub(1).and_then(|i| self.steps.get(i))
    }
}
