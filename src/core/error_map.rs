use indexmap::IndexMap;

/// Field path → human-readable message, produced wholesale by a validation
/// pass. Entries are cleared individually when the user edits the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorMap {
    entries: IndexMap<String, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.entries.insert(path.into(), message.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn clear_field(&mut self, path: &str) -> bool {
        self.entries.shift_remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn extend(&mut self, other: ErrorMap) {
        self.entries.extend(other.entries);
    }
}

impl FromIterator<(String, String)> for ErrorMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
