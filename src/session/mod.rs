//! Operator session persistence.
//!
//! The session file holds the bearer token and the theme preference, stored
//! as JSON in the platform data directory. Its lifetime is the file's
//! lifetime: login writes it, logout clears it, and a token that fails
//! validation on startup is treated as logged-out rather than an error.
//!
//! The token is persisted in cleartext; anyone with access to the
//! operator's account can read it. This mirrors the risk profile of a
//! browser's localStorage and is documented rather than worked around.

use crate::api::ApiClient;
use crate::ui::themes::ThemeVariant;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, warn};

/// Errors that can occur in session handling
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Authentication rejected or unreachable; carries the server detail
    #[error("{0}")]
    Auth(#[from] crate::api::ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable session state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub theme: ThemeVariant,
}

/// Owner of the persisted session state
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    state: SessionState,
}

impl SessionStore {
    /// Default location: `<data_dir>/vecops/session.json`
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vecops")
            .join("session.json")
    }

    /// Load the session file, starting fresh when it is missing or garbled
    pub async fn load(path: PathBuf) -> Result<Self, SessionError> {
        let state = match fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(state) => state,
                Err(err) => {
                    warn!(error = %err, "session file unreadable, starting logged out");
                    SessionState::default()
                }
            },
            Err(_) => SessionState::default(),
        };

        Ok(Self { path, state })
    }

    async fn save(&self) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, content).await?;
        debug!(path = %self.path.display(), "session state saved");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.token.is_some()
    }

    pub fn theme(&self) -> ThemeVariant {
        self.state.theme
    }

    /// Persist a new theme preference
    pub async fn set_theme(&mut self, theme: ThemeVariant) -> Result<(), SessionError> {
        self.state.theme = theme;
        self.save().await
    }

    /// Authenticate against the backend and persist the returned token.
    ///
    /// On failure the server-provided detail is surfaced unchanged; nothing
    /// is retried.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        let response = api.login(username, password).await?;
        api.set_token(&response.access_token);
        self.state.token = Some(response.access_token);
        self.save().await?;
        info!("operator logged in");
        Ok(())
    }

    /// Validate a stored token on startup.
    ///
    /// Returns whether the session is usable. Any validation failure -
    /// expired token, revoked token, unreachable server - clears the stored
    /// token and reports `false` instead of an error.
    pub async fn restore(&mut self, api: &ApiClient) -> Result<bool, SessionError> {
        let Some(token) = self.state.token.clone() else {
            return Ok(false);
        };

        api.set_token(&token);
        match api.whoami().await {
            Ok(()) => {
                debug!("stored token validated");
                Ok(true)
            }
            Err(err) => {
                warn!(error = %err, "stored token rejected, clearing session");
                api.clear_token();
                self.state.token = None;
                self.save().await?;
                Ok(false)
            }
        }
    }

    /// End the session.
    ///
    /// The server notification is best-effort; local state is cleared
    /// unconditionally so the console always comes back clean.
    pub async fn logout(&mut self, api: &ApiClient) -> Result<(), SessionError> {
        if self.state.token.is_some() {
            if let Err(err) = api.logout().await {
                debug!(error = %err, "logout notification failed, ignoring");
            }
        }
        api.clear_token();
        self.state.token = None;
        self.save().await?;
        info!("operator logged out");
        Ok(())
    }

    pub async fn change_password(
        &self,
        api: &ApiClient,
        old: &str,
        new: &str,
    ) -> Result<(), SessionError> {
        api.change_password(old, new).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_starts_logged_out() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::load(dir.path().join("session.json"))
            .await
            .unwrap();
        assert!(!store.is_authenticated());
        assert_eq!(store.theme(), ThemeVariant::Light);
    }

    #[tokio::test]
    async fn garbled_file_starts_logged_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = SessionStore::load(path).await.unwrap();
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn theme_preference_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut store = SessionStore::load(path.clone()).await.unwrap();
        store.set_theme(ThemeVariant::Dark).await.unwrap();

        let reloaded = SessionStore::load(path).await.unwrap();
        assert_eq!(reloaded.theme(), ThemeVariant::Dark);
    }
}
