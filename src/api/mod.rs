pub mod auth;
pub mod error;
pub mod payload;
pub mod transport;

pub use error::{ApiError, ErrorKind};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, RequestBody, UreqTransport};

use crate::upload::Attachment;
use serde_json::Value;
use tracing::debug;

/// Thin client over the loan-management REST backend. Endpoint wrappers are
/// one call each; all shaping of request payloads happens in
/// [`payload`](crate::api::payload) and the flow adapters.
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    transport: Box<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Box<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            transport,
        }
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }

    fn request(&self, method: Method, path: &str, body: Option<RequestBody>) -> Result<Value, ApiError> {
        debug!(method = method.as_str(), path, "api request");
        let response = self.transport.execute(HttpRequest {
            method,
            url: self.url(path),
            headers: self.headers(),
            body,
        })?;
        if !response.is_success() {
            return Err(ApiError::from_response(response.status, &response.body));
        }
        response.json()
    }

    pub fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::Get, path, None)
    }

    pub fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(Method::Post, path, Some(RequestBody::Json(body)))
    }

    pub fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(Method::Put, path, Some(RequestBody::Json(body)))
    }

    pub fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::Delete, path, None)
    }

    pub fn post_multipart(&self, path: &str, attachments: &[Attachment]) -> Result<Value, ApiError> {
        let (content_type, data) = crate::upload::multipart_body(attachments);
        self.request(
            Method::Post,
            path,
            Some(RequestBody::Raw { content_type, data }),
        )
    }

    // Clients

    pub fn list_clients(&self) -> Result<Value, ApiError> {
        self.get("/clients")
    }

    pub fn fetch_client(&self, id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/clients/{id}"))
    }

    pub fn create_client(&self, body: Value) -> Result<Value, ApiError> {
        self.post("/clients", body)
    }

    pub fn update_client(&self, id: &str, body: Value) -> Result<Value, ApiError> {
        self.put(&format!("/clients/{id}"), body)
    }

    pub fn delete_client(&self, id: &str) -> Result<Value, ApiError> {
        self.delete(&format!("/clients/{id}"))
    }

    pub fn upload_client_photo(&self, id: &str, photo: Attachment) -> Result<Value, ApiError> {
        self.post_multipart(&format!("/clients/{id}/photo"), &[photo])
    }

    // Staff. The save/update paths differ from plain REST; the backend kept
    // its legacy route names.

    pub fn list_staff(&self) -> Result<Value, ApiError> {
        self.get("/staff")
    }

    pub fn fetch_staff(&self, id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/staff/{id}"))
    }

    pub fn save_staff(&self, body: Value) -> Result<Value, ApiError> {
        self.post("/staff/save-staff", body)
    }

    pub fn update_staff(&self, id: &str, body: Value) -> Result<Value, ApiError> {
        self.put(&format!("/staff/update-staff/{id}"), body)
    }

    pub fn delete_staff(&self, id: &str) -> Result<Value, ApiError> {
        self.delete(&format!("/staff/{id}"))
    }

    // Expenses

    pub fn list_expenses(&self) -> Result<Value, ApiError> {
        self.get("/expenses")
    }

    pub fn create_expense(&self, body: Value) -> Result<Value, ApiError> {
        self.post("/expenses", body)
    }

    pub fn import_expenses(&self, csv: Attachment) -> Result<Value, ApiError> {
        self.post_multipart("/expenses/import", &[csv])
    }

    pub fn expense_template(&self) -> Result<Value, ApiError> {
        self.get("/expenses/template")
    }

    pub fn upload_expense_receipt(&self, id: &str, receipt: Attachment) -> Result<Value, ApiError> {
        self.post_multipart(&format!("/expenses/{id}/receipt"), &[receipt])
    }

    pub fn list_expense_categories(&self) -> Result<Value, ApiError> {
        self.get("/expense-categories")
    }

    pub fn create_expense_category(&self, body: Value) -> Result<Value, ApiError> {
        self.post("/expense-categories", body)
    }

    // Loans, installments, payments

    pub fn list_loans(&self) -> Result<Value, ApiError> {
        self.get("/loans")
    }

    pub fn approve_loan(&self, id: &str) -> Result<Value, ApiError> {
        self.post(&format!("/loans/{id}/approve"), Value::Null)
    }

    pub fn reject_loan(&self, id: &str) -> Result<Value, ApiError> {
        self.post(&format!("/loans/{id}/reject"), Value::Null)
    }

    pub fn disburse_loan(&self, id: &str) -> Result<Value, ApiError> {
        self.post(&format!("/loans/{id}/disburse"), Value::Null)
    }

    pub fn loan_schedule(&self, loan_id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/installments/loan/{loan_id}/schedule"))
    }

    pub fn loan_summary(&self, loan_id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/installments/loan/{loan_id}/summary"))
    }

    pub fn process_payment(&self, body: Value) -> Result<Value, ApiError> {
        self.post("/payments/process", body)
    }
}
