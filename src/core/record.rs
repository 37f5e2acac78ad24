use crate::core::field_path::FieldPath;
use crate::core::value::Value;
use indexmap::IndexMap;

/// The accumulated draft of an entity being created or edited across steps.
///
/// Flat map at the top level; sub-records (`guarantor`, `nextOfKin`, `spouse`)
/// are `Value::Object` entries merged one level deep. The record never
/// validates anything; it only stores what the controller routes into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormRecord {
    values: IndexMap<String, Value>,
}

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a fetched entity (edit mode). Scalars and one level of
    /// nested objects are taken over; anything deeper is ignored.
    pub fn from_entity(entity: &serde_json::Value) -> Self {
        let mut record = Self::new();
        let Some(map) = entity.as_object() else {
            return record;
        };
        for (key, value) in map {
            record.values.insert(key.clone(), Value::from_json(value));
        }
        record
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let root = self.values.get(path.root())?;
        match path.child() {
            None => Some(root),
            Some(child) => root.as_object()?.get(child),
        }
    }

    /// Text view of a field; absent or non-text values read as empty so
    /// renderers degrade gracefully when optional sub-records are missing.
    pub fn text(&self, path: &FieldPath) -> String {
        self.get(path).map(Value::display_text).unwrap_or_default()
    }

    pub fn set(&mut self, path: &FieldPath, value: Value) {
        match path.child() {
            None => {
                self.values.insert(path.root().to_string(), value);
            }
            Some(child) => {
                let entry = self
                    .values
                    .entry(path.root().to_string())
                    .or_insert_with(Value::object);
                if entry.as_object().is_none() {
                    *entry = Value::object();
                }
                entry
                    .as_object_mut()
                    .expect("entry was just made an object")
                    .insert(child.to_string(), value);
            }
        }
    }

    /// Merge a partial update: shallow at the top level, one level deep for
    /// dotted paths. Returns the paths that were written so the controller
    /// can clear their error entries.
    pub fn update(
        &mut self,
        partial: impl IntoIterator<Item = (FieldPath, Value)>,
    ) -> Vec<FieldPath> {
        let mut updated = Vec::new();
        for (path, value) in partial {
            self.set(&path, value);
            updated.push(path);
        }
        updated
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::FormRecord;
    use crate::core::field_path::FieldPath;
    use crate::core::value::Value;

    #[test]
    fn set_and_get_flat_field() {
        let mut record = FormRecord::new();
        record.set(&FieldPath::from("firstName"), Value::text("Agnes"));
        assert_eq!(record.text(&FieldPath::from("firstName")), "Agnes");
    }

    #[test]
    fn nested_set_merges_one_level_deep() {
        let mut record = FormRecord::new();
        record.set(&FieldPath::from("guarantor.firstName"), Value::text("John"));
        record.set(&FieldPath::from("guarantor.lastName"), Value::text("Okello"));

        assert_eq!(record.text(&FieldPath::from("guarantor.firstName")), "John");
        assert_eq!(record.text(&FieldPath::from("guarantor.lastName")), "Okello");
    }

    #[test]
    fn missing_fields_read_as_empty_text() {
        let record = FormRecord::new();
        assert_eq!(record.text(&FieldPath::from("spouse.firstName")), "");
    }

    #[test]
    fn update_reports_written_paths() {
        let mut record = FormRecord::new();
        let updated = record.update(vec![
            (FieldPath::from("firstName"), Value::text("Agnes")),
            (FieldPath::from("nextOfKin.phoneNumber"), Value::text("0712345678")),
        ]);
        assert_eq!(updated.len(), 2);
        assert_eq!(updated[1].to_string(), "nextOfKin.phoneNumber");
    }

    #[test]
    fn entity_seeding_keeps_nested_objects() {
        let entity = serde_json::json!({
            "firstName": "Agnes",
            "age": 34,
            "guarantor": { "firstName": "John" }
        });
        let record = FormRecord::from_entity(&entity);
        assert_eq!(record.text(&FieldPath::from("firstName")), "Agnes");
        assert_eq!(record.text(&FieldPath::from("age")), "34");
        assert_eq!(record.text(&FieldPath::from("guarantor.firstName")), "John");
    }
}
