use crate::core::controller::FormController;
use crate::core::registry::{FieldFocus, StepRegistry};
use crate::input::editor::FieldEditor;
use crate::ui::frame::Frame;
use crate::ui::span::{Line, Span};
use crate::ui::style::{Color, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
    Error,
}

/// Stateless frame builder: wizard chrome around whatever the step registry
/// renders for the active step.
pub struct Renderer;

impl Renderer {
    pub fn frame(
        controller: &FormController,
        registry: &StepRegistry,
        editor: &FieldEditor,
        status: Option<(&str, StatusTone)>,
    ) -> Frame {
        let mut frame = Frame::new();

        frame.push_span(Span::styled(
            controller.flow().title.clone(),
            Style::new().bold(),
        ));
        frame.push(Self::step_indicator(controller));
        frame.blank();

        let step = controller.current_step();
        if let Some(description) = &step.description {
            frame.push_span(Span::styled(description.clone(), Style::new().dim()));
            frame.blank();
        }

        frame.extend(registry.render(
            step,
            controller.record(),
            controller.errors(),
            Some(FieldFocus {
                index: editor.focus(),
                cursor: editor.cursor(),
            }),
        ));

        frame.blank();
        if controller.is_saving() {
            frame.push_span(Span::styled(
                "Saving…",
                Style::new().color(Color::Yellow).bold(),
            ));
        } else if let Some((message, tone)) = status {
            let style = match tone {
                StatusTone::Info => Style::new().color(Color::Cyan),
                StatusTone::Success => Style::new().color(Color::Green),
                StatusTone::Error => Style::new().color(Color::Red),
            };
            frame.push_span(Span::styled(message, style));
        }

        frame.blank();
        frame.push_span(Span::styled(Self::hints(controller), Style::new().dim()));
        frame.trim_trailing_empty();
        frame
    }

    fn step_indicator(controller: &FormController) -> Line {
        let sequencer = controller.sequencer();
        let mut line = Line::new();

        for (offset, step) in controller.flow().steps.iter().enumerate() {
            let index = offset + 1;
            if offset > 0 {
                line.push(Span::styled(" · ", Style::new().dim()));
            }

            let mark = if sequencer.is_completed(index) { "✓" } else { " " };
            let text = format!("{index} {}{mark}", step.label);
            let style = if index == sequencer.current() {
                Style::new().color(Color::Cyan).bold()
            } else if sequencer.is_completed(index) {
                Style::new().color(Color::Green)
            } else if index <= sequencer.unlocked() {
                Style::new()
            } else {
                Style::new().dim()
            };
            line.push(Span::styled(text, style));
        }

        line
    }

    fn hints(controller: &FormController) -> String {
        let finish = if controller.sequencer().is_last() {
            "Enter submit"
        } else {
            "Enter continue"
        };
        format!("Tab field · {finish} · PgUp back · Alt+n jump · Esc quit")
    }
}
