use crate::api::{ApiClient, ApiError};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetupStatus {
    #[serde(rename = "setupComplete", default)]
    pub setup_complete: bool,
}

impl ApiClient {
    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = self.post("/auth/login", json!({ "email": email, "password": password }))?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub fn setup(&self, body: Value) -> Result<Value, ApiError> {
        self.post("/auth/setup", body)
    }

    pub fn setup_status(&self) -> Result<SetupStatus, ApiError> {
        let body = self.get("/auth/setup-status")?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub fn forgot_password(&self, email: &str) -> Result<Value, ApiError> {
        self.post("/auth/forgot-password", json!({ "email": email }))
    }

    pub fn reset_password(&self, token: &str, password: &str) -> Result<Value, ApiError> {
        self.post(
            "/auth/reset-password",
            json!({ "token": token, "password": password }),
        )
    }

    /// Connectivity probe behind the status banner.
    pub fn check_connection(&self) -> Result<(), ApiError> {
        self.get("/auth/check-connection").map(|_| ())
    }
}
