use crate::api::{ApiClient, ApiError};
use crate::core::error_map::ErrorMap;
use crate::core::field_path::FieldPath;
use crate::core::flow::FlowDef;
use crate::core::form_event::FormEvent;
use crate::core::record::FormRecord;
use crate::core::sequencer::StepSequencer;
use crate::core::step::StepDef;
use crate::core::value::Value;
use tracing::{info, warn};

/// Converts an accumulated record into the backend call for its flow.
/// `build_payload` must be pure; `submit` performs exactly one network call.
pub trait SubmissionAdapter: Send {
    fn build_payload(&self, record: &FormRecord) -> serde_json::Value;
    fn submit(&self, api: &ApiClient, record: &FormRecord) -> Result<serde_json::Value, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitGate {
    Ready,
    /// Submit is only offered on the final step.
    NotAtEnd,
    /// The final step's validator rejected the record.
    Invalid,
    /// A submission is already in flight; the action is disabled.
    Busy,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Saved {
        entity: serde_json::Value,
        route: String,
    },
    Blocked(SubmitGate),
    Failed {
        message: String,
    },
}

/// Page-level owner of one wizard's record, errors and progress. Every
/// mutation flows through here; renderers and the app shell only read.
pub struct FormController {
    flow: FlowDef,
    record: FormRecord,
    errors: ErrorMap,
    sequencer: StepSequencer,
    saving: bool,
}

impl FormController {
    pub fn new(flow: FlowDef) -> Self {
        Self::with_record(flow, FormRecord::new())
    }

    /// Edit mode: start from a record seeded with the fetched entity.
    pub fn with_record(flow: FlowDef, record: FormRecord) -> Self {
        let sequencer = StepSequencer::new(flow.len());
        Self {
            flow,
            record,
            errors: ErrorMap::new(),
            sequencer,
            saving: false,
        }
    }

    pub fn flow(&self) -> &FlowDef {
        &self.flow
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn current_step(&self) -> &StepDef {
        self.flow
            .step_at(self.sequencer.current())
            .expect("sequencer index stays within the flow")
    }

    /// Merge one field edit into the record and drop that field's error
    /// entry. No validation runs here.
    pub fn update_field(&mut self, path: FieldPath, value: Value) -> Vec<FormEvent> {
        let path_text = path.to_string();
        let display = value.display_text();
        self.record.set(&path, value);
        self.errors.clear_field(&path_text);
        vec![FormEvent::FieldChanged {
            path: path_text,
            value: display,
        }]
    }

    /// Validate the active step; advance on success, publish errors
    /// otherwise.
    pub fn next(&mut self) -> Vec<FormEvent> {
        let from = self.sequencer.current();
        let errors = self.current_step().validator.validate(&self.record);
        if self.sequencer.next(&errors) {
            let mut events = vec![FormEvent::StepCompleted { index: from }];
            let to = self.sequencer.current();
            if to != from {
                events.push(FormEvent::StepChanged { from, to });
            }
            events
        } else {
            let count = errors.len();
            self.errors = errors;
            vec![FormEvent::ErrorsPublished { step: from, count }]
        }
    }

    pub fn previous(&mut self) -> Vec<FormEvent> {
        let from = self.sequencer.current();
        if self.sequencer.previous() {
            vec![FormEvent::StepChanged {
                from,
                to: self.sequencer.current(),
            }]
        } else {
            vec![]
        }
    }

    pub fn go_to(&mut self, index: usize) -> Vec<FormEvent> {
        let from = self.sequencer.current();
        if self.sequencer.go_to(index) && self.sequencer.current() != from {
            vec![FormEvent::StepChanged {
                from,
                to: self.sequencer.current(),
            }]
        } else {
            vec![]
        }
    }

    /// Gate a submission attempt: final step only, final validator clean,
    /// nothing already in flight. On `Ready` the saving flag goes up and
    /// stays up until [`FormController::complete_submit`].
    pub fn prepare_submit(&mut self) -> (SubmitGate, Vec<FormEvent>) {
        if self.saving {
            return (SubmitGate::Busy, vec![]);
        }
        if !self.sequencer.is_last() {
            return (SubmitGate::NotAtEnd, vec![]);
        }
        let step = self.sequencer.current();
        let errors = self.current_step().validator.validate(&self.record);
        if !errors.is_empty() {
            let count = errors.len();
            self.errors = errors;
            return (
                SubmitGate::Invalid,
                vec![FormEvent::ErrorsPublished { step, count }],
            );
        }
        self.saving = true;
        (SubmitGate::Ready, vec![FormEvent::SubmitStarted])
    }

    /// Fold the adapter's result back in. Success keeps the record only
    /// until the app navigates away; failure keeps it so the user can fix
    /// and resubmit.
    pub fn complete_submit(
        &mut self,
        result: Result<serde_json::Value, ApiError>,
    ) -> (SubmitOutcome, Vec<FormEvent>) {
        self.saving = false;
        match result {
            Ok(entity) => {
                let route = self.flow.post_submit_route.clone();
                info!(flow = self.flow.id, %route, "submission accepted");
                (
                    SubmitOutcome::Saved {
                        entity,
                        route: route.clone(),
                    },
                    vec![FormEvent::SubmitSucceeded { route }],
                )
            }
            Err(err) => {
                let message = err.user_message();
                warn!(flow = self.flow.id, error = %err, "submission failed");
                (
                    SubmitOutcome::Failed {
                        message: message.clone(),
                    },
                    vec![FormEvent::SubmitFailed { message }],
                )
            }
        }
    }

    /// One-shot submission path used by headless callers and tests; the app
    /// shell splits it so it can render the saving state in between.
    pub fn submit(
        &mut self,
        adapter: &dyn SubmissionAdapter,
        api: &ApiClient,
    ) -> (SubmitOutcome, Vec<FormEvent>) {
        let (gate, mut events) = self.prepare_submit();
        if gate != SubmitGate::Ready {
            return (SubmitOutcome::Blocked(gate), events);
        }
        let result = adapter.submit(api, &self.record);
        let (outcome, more) = self.complete_submit(result);
        events.extend(more);
        (outcome, events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::{HttpRequest, HttpResponse, HttpTransport};
    use crate::core::step::StepDef;
    use crate::core::validation::{StepValidator, required};
    use crate::input::field::FieldSpec;
    use serde_json::json;

    struct UnreachableTransport;

    impl HttpTransport for UnreachableTransport {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Connection("test transport".to_string()))
        }
    }

    struct StaticAdapter {
        result: fn() -> Result<serde_json::Value, ApiError>,
    }

    impl SubmissionAdapter for StaticAdapter {
        fn build_payload(&self, _record: &FormRecord) -> serde_json::Value {
            json!({})
        }

        fn submit(
            &self,
            _api: &ApiClient,
            _record: &FormRecord,
        ) -> Result<serde_json::Value, ApiError> {
            (self.result)()
        }
    }

    fn two_step_flow() -> FlowDef {
        FlowDef::new("test", "Test flow")
            .post_submit_route("/done")
            .step(
                StepDef::new("first", "First")
                    .field(FieldSpec::text("firstName", "First name"))
                    .validator(StepValidator::new().rule(required("firstName", "First name"))),
            )
            .step(
                StepDef::new("second", "Second")
                    .field(FieldSpec::text("phoneNumber", "Phone number"))
                    .validator(StepValidator::new().rule(required("phoneNumber", "Phone number"))),
            )
    }

    fn api() -> ApiClient {
        ApiClient::new("http://test", Box::new(UnreachableTransport))
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut controller = FormController::new(two_step_flow());
        controller.next();
        assert!(controller.errors().get("firstName").is_some());

        controller.update_field(FieldPath::from("firstName"), Value::text("Agnes"));
        assert!(controller.errors().get("firstName").is_none());
    }

    #[test]
    fn next_stays_put_until_the_step_validates() {
        let mut controller = FormController::new(two_step_flow());
        controller.next();
        assert_eq!(controller.sequencer().current(), 1);

        controller.update_field(FieldPath::from("firstName"), Value::text("Agnes"));
        controller.next();
        assert_eq!(controller.sequencer().current(), 2);
        assert!(controller.sequencer().is_completed(1));
    }

    #[test]
    fn submit_is_blocked_before_the_final_step() {
        let mut controller = FormController::new(two_step_flow());
        let adapter = StaticAdapter { result: || Ok(json!({"id": 1})) };
        let (outcome, _) = controller.submit(&adapter, &api());
        assert!(matches!(
            outcome,
            SubmitOutcome::Blocked(SubmitGate::NotAtEnd)
        ));
    }

    #[test]
    fn successful_submit_reports_the_post_submit_route() {
        let mut controller = FormController::new(two_step_flow());
        controller.update_field(FieldPath::from("firstName"), Value::text("Agnes"));
        controller.next();
        controller.update_field(FieldPath::from("phoneNumber"), Value::text("0712345678"));

        let adapter = StaticAdapter { result: || Ok(json!({"id": 7})) };
        let (outcome, events) = controller.submit(&adapter, &api());
        match outcome {
            SubmitOutcome::Saved { route, entity } => {
                assert_eq!(route, "/done");
                assert_eq!(entity["id"], 7);
            }
            other => panic!("expected Saved, got {other:?}"),
        }
        assert!(events.contains(&FormEvent::SubmitStarted));
        assert!(!controller.is_saving());
    }

    #[test]
    fn failed_submit_keeps_the_record_for_resubmission() {
        let mut controller = FormController::new(two_step_flow());
        controller.update_field(FieldPath::from("firstName"), Value::text("Agnes"));
        controller.next();
        controller.update_field(FieldPath::from("phoneNumber"), Value::text("0712345678"));

        let adapter = StaticAdapter {
            result: || Err(ApiError::Connection("refused".to_string())),
        };
        let (outcome, _) = controller.submit(&adapter, &api());
        assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
        assert_eq!(
            controller.record().text(&FieldPath::from("phoneNumber")),
            "0712345678"
        );
        assert!(!controller.is_saving());
    }

    #[test]
    fn invalid_final_step_blocks_the_submission() {
        let mut controller = FormController::new(two_step_flow());
        controller.update_field(FieldPath::from("firstName"), Value::text("Agnes"));
        controller.next();

        let adapter = StaticAdapter { result: || Ok(json!({})) };
        let (outcome, _) = controller.submit(&adapter, &api());
        assert!(matches!(
            outcome,
            SubmitOutcome::Blocked(SubmitGate::Invalid)
        ));
        assert!(controller.errors().get("phoneNumber").is_some());
    }
}
