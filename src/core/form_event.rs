#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    FieldChanged {
        path: String,
        value: String,
    },
    /// A validation pass on the active step produced errors.
    ErrorsPublished {
        step: usize,
        count: usize,
    },
    StepChanged {
        from: usize,
        to: usize,
    },
    StepCompleted {
        index: usize,
    },
    SubmitStarted,
    SubmitSucceeded {
        route: String,
    },
    SubmitFailed {
        message: String,
    },
}
