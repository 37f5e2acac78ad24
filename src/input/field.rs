use crate::core::field_path::FieldPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Fixed option list cycled with Left/Right.
    Select(Vec<String>),
    /// Boolean toggled with Space.
    Flag,
}

/// One editable field of a step: where it lives in the record, how it is
/// labelled and edited, and whether its text is coerced to a number when the
/// submission payload is built.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub path: FieldPath,
    pub label: String,
    pub kind: FieldKind,
    pub placeholder: Option<String>,
    pub numeric: bool,
    /// Masked rendering for secrets (passwords).
    pub secret: bool,
}

impl FieldSpec {
    pub fn text(path: impl Into<FieldPath>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            kind: FieldKind::Text,
            placeholder: None,
            numeric: false,
            secret: false,
        }
    }

    pub fn select<I, S>(path: impl Into<FieldPath>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: FieldKind::Select(options.into_iter().map(Into::into).collect()),
            ..Self::text(path, label)
        }
    }

    pub fn flag(path: impl Into<FieldPath>, label: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Flag,
            ..Self::text(path, label)
        }
    }

    pub fn placeholder(mut self, hint: impl Into<String>) -> Self {
        self.placeholder = Some(hint.into());
        self
    }

    pub fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            FieldKind::Select(options) => Some(options.as_slice()),
            _ => None,
        }
    }
}
