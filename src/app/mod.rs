pub mod notify;

use crate::api::ApiClient;
use crate::core::controller::{FormController, SubmissionAdapter, SubmitGate, SubmitOutcome};
use crate::core::registry::StepRegistry;
use crate::input::editor::{FieldEditor, KeyResult};
use crate::session::SessionStore;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, Terminal};
use crate::ui::renderer::Renderer;
use notify::Notifications;
use std::io;
use std::time::{Duration, Instant};
use tracing::warn;

/// Delay between the success notification and leaving the wizard, mirroring
/// the short post-save pause before the page navigates away.
const NAVIGATE_DELAY: Duration = Duration::from_millis(1200);

#[derive(Debug)]
pub struct WizardOutcome {
    pub route: Option<String>,
    pub entity: Option<serde_json::Value>,
    pub cancelled: bool,
}

/// One wizard session: routes keys between the field editor and the form
/// controller, runs the submission, shows notifications, decides when the
/// loop ends.
pub struct App {
    controller: FormController,
    registry: StepRegistry,
    editor: FieldEditor,
    adapter: Box<dyn SubmissionAdapter>,
    api: ApiClient,
    session: SessionStore,
    notifications: Notifications,
    store_login: bool,
    submit_pending: bool,
    navigate_at: Option<Instant>,
    route: Option<String>,
    entity: Option<serde_json::Value>,
    cancelled: bool,
    should_exit: bool,
}

impl App {
    pub fn new(
        controller: FormController,
        adapter: Box<dyn SubmissionAdapter>,
        api: ApiClient,
        session: SessionStore,
    ) -> Self {
        let mut editor = FieldEditor::new();
        editor.reset(&controller.current_step().fields, controller.record());

        Self {
            controller,
            registry: StepRegistry::default(),
            editor,
            adapter,
            api,
            session,
            notifications: Notifications::new(),
            store_login: false,
            submit_pending: false,
            navigate_at: None,
            route: None,
            entity: None,
            cancelled: false,
            should_exit: false,
        }
    }

    /// Login flows persist the returned token/user into the session store.
    pub fn store_login(mut self) -> Self {
        self.store_login = true;
        self
    }

    pub fn registry_mut(&mut self) -> &mut StepRegistry {
        &mut self.registry
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn submit_pending(&self) -> bool {
        self.submit_pending
    }

    pub fn outcome(self) -> WizardOutcome {
        WizardOutcome {
            route: self.route,
            entity: self.entity,
            cancelled: self.cancelled,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // The triggering actions stay disabled while a submission runs.
        if self.controller.is_saving() || self.submit_pending {
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.cancelled = true;
                self.should_exit = true;
            }
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::PageUp => {
                let before = self.controller.sequencer().current();
                self.controller.previous();
                if self.controller.sequencer().current() != before {
                    self.reset_editor();
                }
            }
            KeyCode::Char(digit @ '1'..='9') if key.modifiers.contains(KeyModifiers::ALT) => {
                let target = digit as usize - '0' as usize;
                let before = self.controller.sequencer().current();
                self.controller.go_to(target);
                if self.controller.sequencer().current() != before {
                    self.reset_editor();
                }
            }
            _ => self.handle_field_key(key),
        }
    }

    fn handle_field_key(&mut self, key: KeyEvent) {
        let Some(spec) = self
            .editor
            .focused_field(&self.controller.current_step().fields)
            .cloned()
        else {
            return;
        };
        let current = self.controller.record().text(&spec.path);

        match self
            .editor
            .handle_key(&spec, &current, key.code, key.modifiers)
        {
            KeyResult::Edited(value) => {
                self.controller.update_field(spec.path.clone(), value);
            }
            KeyResult::Submit => self.handle_enter(),
            KeyResult::Handled | KeyResult::NotHandled => {}
        }
    }

    /// Enter walks the remaining fields first; from the last field it runs
    /// the step gate (Next on intermediate steps, Submit on the final one).
    fn handle_enter(&mut self) {
        let advanced = self.editor.advance_focus(
            &self.controller.current_step().fields,
            self.controller.record(),
        );
        if advanced {
            return;
        }

        if !self.controller.sequencer().is_last() {
            let before = self.controller.sequencer().current();
            self.controller.next();
            if self.controller.sequencer().current() != before {
                self.reset_editor();
            }
            return;
        }

        let (gate, _events) = self.controller.prepare_submit();
        if gate == SubmitGate::Ready {
            // The network call runs from the loop after a "Saving…" frame.
            self.submit_pending = true;
        }
    }

    fn move_focus(&mut self, direction: isize) {
        self.editor.move_focus(
            &self.controller.current_step().fields,
            self.controller.record(),
            direction,
        );
    }

    fn reset_editor(&mut self) {
        self.editor.reset(
            &self.controller.current_step().fields,
            self.controller.record(),
        );
    }

    /// Exactly one network call per attempt; failures keep the record so
    /// the user can fix and resubmit.
    pub fn run_pending_submission(&mut self) {
        self.submit_pending = false;
        let result = self.adapter.submit(&self.api, self.controller.record());
        let (outcome, _events) = self.controller.complete_submit(result);

        match outcome {
            SubmitOutcome::Saved { entity, route } => {
                if self.store_login {
                    self.persist_login(&entity);
                }
                self.notifications.success("Saved successfully");
                self.entity = Some(entity);
                self.route = Some(route);
                self.navigate_at = Some(Instant::now() + NAVIGATE_DELAY);
            }
            SubmitOutcome::Failed { message } => self.notifications.error(message),
            SubmitOutcome::Blocked(_) => {}
        }
    }

    fn persist_login(&mut self, entity: &serde_json::Value) {
        let Some(token) = entity.get("token").and_then(|t| t.as_str()) else {
            warn!("login response carried no token");
            return;
        };
        let user = entity
            .get("user")
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        self.session.set_login(token.to_string(), user);
        self.api.set_token(Some(token.to_string()));
        if let Err(err) = self.session.save() {
            warn!(%err, "could not persist session");
        }
    }

    /// Timed state: notification expiry and the post-save navigation delay.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        let mut changed = self.notifications.tick(now);
        if let Some(at) = self.navigate_at {
            if now >= at {
                self.navigate_at = None;
                self.should_exit = true;
                changed = true;
            }
        }
        changed
    }

    pub fn render(&mut self, terminal: &mut Terminal) -> io::Result<()> {
        let frame = Renderer::frame(
            &self.controller,
            &self.registry,
            &self.editor,
            self.notifications.current(),
        );
        terminal.render_frame(&frame)?;
        terminal.flush()
    }
}
