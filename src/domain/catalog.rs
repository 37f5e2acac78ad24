use crate::api::{ApiClient, ApiError};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Explicit store for backend catalogs, owned by the app root and passed
/// down by reference. Consumers re-read `snapshot` when `version` moves; no
/// module-level singletons, no polling broadcast.
#[derive(Debug, Default)]
pub struct CatalogStore {
    categories: Vec<Category>,
    version: u64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn snapshot(&self) -> &[Category] {
        &self.categories
    }

    pub fn refresh(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        let body = api.list_expense_categories()?;
        let items = unwrap_list(&body);
        let categories: Vec<Category> = serde_json::from_value(items.clone())
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        if categories != self.categories {
            debug!(count = categories.len(), "expense categories refreshed");
            self.categories = categories;
            self.version += 1;
        }
        Ok(())
    }
}

/// List endpoints answer either a bare array or `{ "data": [...] }`.
fn unwrap_list(body: &serde_json::Value) -> &serde_json::Value {
    match body.get("data") {
        Some(data) if data.is_array() => data,
        _ => body,
    }
}
