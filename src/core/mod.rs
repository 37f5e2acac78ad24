pub mod controller;
pub mod error_map;
pub mod field_path;
pub mod flow;
pub mod form_event;
pub mod record;
pub mod registry;
pub mod sequencer;
pub mod step;
pub mod validation;
pub mod value;

pub use controller::{FormController, SubmissionAdapter, SubmitGate, SubmitOutcome};
pub use error_map::ErrorMap;
pub use field_path::FieldPath;
pub use flow::FlowDef;
pub use form_event::FormEvent;
pub use record::FormRecord;
pub use registry::{FieldFocus, StepRegistry, StepRenderer};
pub use sequencer::StepSequencer;
pub use step::StepDef;
pub use validation::StepValidator;
pub use value::Value;
