use std::fmt;

/// Dotted field address, at most one level deep: `phoneNumber` or
/// `guarantor.firstName`. Anything past the first `.` belongs to the child
/// key; the record model never nests further.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    root: String,
    child: Option<String>,
}

impl FieldPath {
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn child(&self) -> Option<&str> {
        self.child.as_deref()
    }

    pub fn is_nested(&self) -> bool {
        self.child.is_some()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.child {
            Some(child) => write!(f, "{}.{}", self.root, child),
            None => f.write_str(&self.root),
        }
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        match raw.split_once('.') {
            Some((root, child)) if !child.is_empty() => Self {
                root: root.to_string(),
                child: Some(child.to_string()),
            },
            _ => Self {
                root: raw.trim_end_matches('.').to_string(),
                child: None,
            },
        }
    }
}

impl From<String> for FieldPath {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::FieldPath;

    #[test]
    fn flat_path_has_no_child() {
        let path = FieldPath::from("phoneNumber");
        assert_eq!(path.root(), "phoneNumber");
        assert_eq!(path.child(), None);
        assert!(!path.is_nested());
    }

    #[test]
    fn dotted_path_splits_once() {
        let path = FieldPath::from("guarantor.firstName");
        assert_eq!(path.root(), "guarantor");
        assert_eq!(path.child(), Some("firstName"));
        assert_eq!(path.to_string(), "guarantor.firstName");
    }
}
