use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// On-disk session state. Key names match what the browser build kept in
/// local storage, so a file written by either front-end reads back in both;
/// `authToken`/`tindigwa_user` are accepted as legacy spellings on load and
/// folded into the canonical keys on the next save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(rename = "tindigwa_token", skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "currentUser", skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
    #[serde(rename = "sidebarCollapsed", default)]
    pub sidebar_collapsed: bool,
    #[serde(rename = "tindigwa_setup_complete", default)]
    pub setup_complete: bool,
    #[serde(rename = "authToken", default, skip_serializing)]
    legacy_token: Option<String>,
    #[serde(rename = "tindigwa_user", default, skip_serializing)]
    legacy_user: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot access session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode session file: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct SessionStore {
    path: PathBuf,
    data: SessionData,
}

impl SessionStore {
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tindigwa")
            .join("session.json")
    }

    /// A missing file is a fresh session; a corrupt one is dropped with a
    /// warning rather than locking the user out.
    pub fn load(path: &Path) -> Self {
        let data = match std::fs::read(path) {
            Ok(bytes) => match serde_json::from_slice::<SessionData>(&bytes) {
                Ok(mut data) => {
                    if data.token.is_none() {
                        data.token = data.legacy_token.take();
                    }
                    if data.user.is_none() {
                        data.user = data.legacy_user.take();
                    }
                    data
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "discarding unreadable session file");
                    SessionData::default()
                }
            },
            Err(_) => SessionData::default(),
        };

        Self {
            path: path.to_path_buf(),
            data,
        }
    }

    pub fn save(&self) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(&self.data)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.data.token.as_deref()
    }

    pub fn user(&self) -> Option<&serde_json::Value> {
        self.data.user.as_ref()
    }

    pub fn set_login(&mut self, token: String, user: serde_json::Value) {
        self.data.token = Some(token);
        self.data.user = Some(user);
    }

    pub fn clear_login(&mut self) {
        self.data.token = None;
        self.data.user = None;
    }

    pub fn setup_complete(&self) -> bool {
        self.data.setup_complete
    }

    pub fn set_setup_complete(&mut self, complete: bool) {
        self.data.setup_complete = complete;
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.data.sidebar_collapsed
    }

    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.data.sidebar_collapsed = collapsed;
    }
}
