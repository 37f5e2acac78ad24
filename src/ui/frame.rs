use crate::ui::span::{Line, Span};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    lines: Vec<Line>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn push_span(&mut self, span: Span) {
        self.lines.push(Line::from_spans(vec![span]));
    }

    pub fn blank(&mut self) {
        self.lines.push(Line::new());
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = Line>) {
        self.lines.extend(lines);
    }

    pub fn trim_trailing_empty(&mut self) {
        while self.lines.last().map(Line::is_empty).unwrap_or(false) {
            self.lines.pop();
        }
    }
}
