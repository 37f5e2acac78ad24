use crate::core::error_map::ErrorMap;
use crate::core::record::FormRecord;
use crate::core::registry::{FieldFocus, StepRenderer};
use crate::core::step::StepDef;
use crate::input::field::{FieldKind, FieldSpec};
use crate::ui::span::{Line, Span};
use crate::ui::style::{Color, Style};
use unicode_width::UnicodeWidthStr;

/// Default step body: one row per field (label column, value, select/flag
/// adornments), an inline error line under any field that has one.
pub struct FieldListRenderer;

impl StepRenderer for FieldListRenderer {
    fn render(
        &self,
        step: &StepDef,
        record: &FormRecord,
        errors: &ErrorMap,
        focus: Option<FieldFocus>,
    ) -> Vec<Line> {
        let label_width = step
            .fields
            .iter()
            .map(|f| f.label.width())
            .max()
            .unwrap_or(0);

        let mut lines = Vec::new();
        for (index, field) in step.fields.iter().enumerate() {
            let cursor = focus.filter(|f| f.index == index).map(|f| f.cursor);
            lines.push(field_line(field, record, label_width, cursor));

            if let Some(message) = errors.get(&field.path.to_string()) {
                let mut error_line = Line::new();
                error_line.push(Span::new(" ".repeat(label_width + 6)));
                error_line.push(Span::styled(
                    format!("✗ {message}"),
                    Style::new().color(Color::Red),
                ));
                lines.push(error_line);
            }
        }
        lines
    }
}

fn field_line(
    field: &FieldSpec,
    record: &FormRecord,
    label_width: usize,
    cursor: Option<usize>,
) -> Line {
    let focused = cursor.is_some();
    let mut line = Line::new();

    let marker = if focused { "❯ " } else { "  " };
    let marker_style = if focused {
        Style::new().color(Color::Cyan).bold()
    } else {
        Style::new()
    };
    line.push(Span::styled(marker, marker_style));

    let padded = format!("{:<width$}  ", field.label, width = label_width);
    line.push(Span::styled(padded, Style::new().color(Color::White)));

    let value = record.text(&field.path);
    match &field.kind {
        FieldKind::Select(_) => {
            let shown = if value.is_empty() { "—" } else { value.as_str() };
            if focused {
                line.push(Span::styled("◂ ", Style::new().dim()));
                line.push(Span::styled(shown, Style::new().color(Color::Cyan)));
                line.push(Span::styled(" ▸", Style::new().dim()));
            } else {
                line.push(Span::new(shown));
            }
        }
        FieldKind::Flag => {
            let mark = if value == "yes" { "[x]" } else { "[ ]" };
            let style = if focused {
                Style::new().color(Color::Cyan)
            } else {
                Style::new()
            };
            line.push(Span::styled(mark, style));
        }
        FieldKind::Text => {
            let shown = if field.secret {
                "•".repeat(value.chars().count())
            } else {
                value.clone()
            };
            match cursor {
                Some(at) => {
                    line.push(Span::styled(
                        with_cursor(&shown, at),
                        Style::new().color(Color::Cyan),
                    ));
                }
                None => {
                    if shown.is_empty() {
                        if let Some(hint) = &field.placeholder {
                            line.push(Span::styled(hint.clone(), Style::new().dim()));
                        }
                    } else {
                        line.push(Span::new(shown));
                    }
                }
            }
        }
    }

    line
}

/// Inline caret at a char offset; editing feedback without moving the
/// hardware cursor.
fn with_cursor(value: &str, at: usize) -> String {
    let mut out = String::new();
    let mut placed = false;
    for (i, ch) in value.chars().enumerate() {
        if i == at {
            out.push('▏');
            placed = true;
        }
        out.push(ch);
    }
    if !placed {
        out.push('▏');
    }
    out
}
