use crate::core::field_path::FieldPath;
use crate::core::record::FormRecord;
use crate::core::value::Value;
use crate::input::field::{FieldKind, FieldSpec};
use crate::terminal::{KeyCode, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum KeyResult {
    /// The focused field has a new value for the controller to store.
    Edited(Value),
    /// Key consumed (cursor movement and the like), nothing to store.
    Handled,
    /// Enter on the last field: hand control back to the step logic.
    Submit,
    NotHandled,
}

/// Focus and cursor state over the active step's fields. The editor never
/// touches the record; it reads current values and reports replacements.
#[derive(Debug, Clone)]
pub struct FieldEditor {
    focus: usize,
    cursor: usize,
}

impl FieldEditor {
    pub fn new() -> Self {
        Self { focus: 0, cursor: 0 }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Reset for a new step, cursor at the end of the first field's value.
    pub fn reset(&mut self, fields: &[FieldSpec], record: &FormRecord) {
        self.focus = 0;
        self.cursor = self
            .current_text(fields, record)
            .map(|t| t.chars().count())
            .unwrap_or(0);
    }

    pub fn move_focus(&mut self, fields: &[FieldSpec], record: &FormRecord, direction: isize) {
        if fields.is_empty() {
            return;
        }
        let len = fields.len() as isize;
        self.focus = ((self.focus as isize + direction + len) % len) as usize;
        self.cursor = self
            .current_text(fields, record)
            .map(|t| t.chars().count())
            .unwrap_or(0);
    }

    /// Advance without wrapping; false when already on the last field.
    pub fn advance_focus(&mut self, fields: &[FieldSpec], record: &FormRecord) -> bool {
        if self.focus + 1 < fields.len() {
            self.move_focus(fields, record, 1);
            true
        } else {
            false
        }
    }

    pub fn focused_field<'a>(&self, fields: &'a [FieldSpec]) -> Option<&'a FieldSpec> {
        fields.get(self.focus)
    }

    fn current_text(&self, fields: &[FieldSpec], record: &FormRecord) -> Option<String> {
        self.focused_field(fields).map(|f| record.text(&f.path))
    }

    pub fn handle_key(
        &mut self,
        spec: &FieldSpec,
        current: &str,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> KeyResult {
        match &spec.kind {
            FieldKind::Text => self.handle_text_key(current, code, modifiers),
            FieldKind::Select(options) => Self::handle_select_key(options, current, code),
            FieldKind::Flag => Self::handle_flag_key(current, code),
        }
    }

    fn handle_text_key(
        &mut self,
        current: &str,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> KeyResult {
        match code {
            KeyCode::Char('w') if modifiers.contains(KeyModifiers::CONTROL) => {
                KeyResult::Edited(Value::text(self.delete_word(current)))
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                let mut chars: Vec<char> = current.chars().collect();
                let at = self.cursor.min(chars.len());
                chars.insert(at, ch);
                self.cursor = at + 1;
                KeyResult::Edited(Value::text(chars.into_iter().collect::<String>()))
            }
            KeyCode::Backspace if modifiers.contains(KeyModifiers::CONTROL) => {
                KeyResult::Edited(Value::text(self.delete_word(current)))
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return KeyResult::Handled;
                }
                let mut chars: Vec<char> = current.chars().collect();
                chars.remove(self.cursor - 1);
                self.cursor -= 1;
                KeyResult::Edited(Value::text(chars.into_iter().collect::<String>()))
            }
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                KeyResult::Handled
            }
            KeyCode::Right => {
                if self.cursor < current.chars().count() {
                    self.cursor += 1;
                }
                KeyResult::Handled
            }
            KeyCode::Home => {
                self.cursor = 0;
                KeyResult::Handled
            }
            KeyCode::End => {
                self.cursor = current.chars().count();
                KeyResult::Handled
            }
            KeyCode::Enter => KeyResult::Submit,
            _ => KeyResult::NotHandled,
        }
    }

    fn handle_select_key(options: &[String], current: &str, code: KeyCode) -> KeyResult {
        if options.is_empty() {
            return KeyResult::NotHandled;
        }
        let position = options.iter().position(|o| o == current);
        match code {
            KeyCode::Left => {
                let index = match position {
                    Some(i) => (i + options.len() - 1) % options.len(),
                    None => 0,
                };
                KeyResult::Edited(Value::text(options[index].clone()))
            }
            KeyCode::Right | KeyCode::Char(' ') => {
                let index = match position {
                    Some(i) => (i + 1) % options.len(),
                    None => 0,
                };
                KeyResult::Edited(Value::text(options[index].clone()))
            }
            KeyCode::Enter => KeyResult::Submit,
            _ => KeyResult::NotHandled,
        }
    }

    fn handle_flag_key(current: &str, code: KeyCode) -> KeyResult {
        match code {
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                KeyResult::Edited(Value::Bool(current != "yes"))
            }
            KeyCode::Enter => KeyResult::Submit,
            _ => KeyResult::NotHandled,
        }
    }

    fn is_separator(ch: char) -> bool {
        ch.is_whitespace() || matches!(ch, '.' | '/' | ',' | '-' | '@')
    }

    fn delete_word(&mut self, current: &str) -> String {
        let mut chars: Vec<char> = current.chars().collect();
        let mut pos = self.cursor.min(chars.len());

        while pos > 0 && chars.get(pos - 1).is_some_and(|c| Self::is_separator(*c)) {
            chars.remove(pos - 1);
            pos -= 1;
        }
        while pos > 0 && chars.get(pos - 1).is_some_and(|c| !Self::is_separator(*c)) {
            chars.remove(pos - 1);
            pos -= 1;
        }

        self.cursor = pos;
        chars.into_iter().collect()
    }
}

impl Default for FieldEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldEditor, KeyResult};
    use crate::core::value::Value;
    use crate::input::field::FieldSpec;
    use crate::terminal::{KeyCode, KeyModifiers};

    #[test]
    fn typing_inserts_at_the_cursor() {
        let mut editor = FieldEditor::new();
        let spec = FieldSpec::text("firstName", "First name");
        let result = editor.handle_key(&spec, "", KeyCode::Char('A'), KeyModifiers::NONE);
        assert_eq!(result, KeyResult::Edited(Value::text("A")));
        assert_eq!(editor.cursor(), 1);
    }

    #[test]
    fn backspace_at_start_is_consumed_without_edit() {
        let mut editor = FieldEditor::new();
        let spec = FieldSpec::text("firstName", "First name");
        let result = editor.handle_key(&spec, "Agnes", KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(result, KeyResult::Handled);
    }

    #[test]
    fn select_cycles_through_options() {
        let mut editor = FieldEditor::new();
        let spec = FieldSpec::select("gender", "Gender", ["female", "male"]);
        let result = editor.handle_key(&spec, "female", KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(result, KeyResult::Edited(Value::text("male")));
        let result = editor.handle_key(&spec, "male", KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(result, KeyResult::Edited(Value::text("female")));
    }

    #[test]
    fn ctrl_w_deletes_the_previous_word() {
        let mut editor = FieldEditor::new();
        let spec = FieldSpec::text("village", "Village");
        editor.cursor = 11;
        let result = editor.handle_key(
            &spec,
            "Kira Wakiso",
            KeyCode::Char('w'),
            KeyModifiers::CONTROL,
        );
        assert_eq!(result, KeyResult::Edited(Value::text("Kira ")));
    }

    #[test]
    fn enter_requests_submission() {
        let mut editor = FieldEditor::new();
        let spec = FieldSpec::text("firstName", "First name");
        let result = editor.handle_key(&spec, "x", KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(result, KeyResult::Submit);
    }
}
