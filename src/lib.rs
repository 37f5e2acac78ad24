pub mod api;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod input;
pub mod session;
pub mod terminal;
pub mod ui;
pub mod upload;

pub use api::{ApiClient, ApiError};
pub use app::{App, WizardOutcome};
pub use config::AppConfig;
pub use crate::core::{FormController, FormRecord, SubmissionAdapter};
pub use session::SessionStore;
