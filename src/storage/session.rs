use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{KeyValueStore, StorageError};

const TOKEN_KEY: &str = "auth.token";
const PIN_HASH_KEY: &str = "security.pin_hash";
const BIOMETRIC_KEY: &str = "security.biometric_enabled";
const FAILED_ATTEMPTS_KEY: &str = "security.failed_attempts";
const LAST_LOGIN_KEY: &str = "session.last_login";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastLogin {
    pub phone_number: String,
    pub display_name: Option<String>,
    pub logged_in_at: DateTime<Utc>,
}

/// Typed view over a [`KeyValueStore`] holding the session state.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn token(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .store
            .get(TOKEN_KEY)
            .await?
            .filter(|t| !t.trim().is_empty()))
    }

    pub async fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(TOKEN_KEY, token).await
    }

    pub async fn clear_token(&self) -> Result<(), StorageError> {
        self.store.remove(TOKEN_KEY).await
    }

    pub async fn pin_hash(&self) -> Result<Option<String>, StorageError> {
        self.store.get(PIN_HASH_KEY).await
    }

    pub async fn set_pin_hash(&self, hash: &str) -> Result<(), StorageError> {
        self.store.set(PIN_HASH_KEY, hash).await
    }

    pub async fn biometric_enabled(&self) -> Result<bool, StorageError> {
        Ok(self.store.get(BIOMETRIC_KEY).await?.as_deref() == Some("true"))
    }

    pub async fn set_biometric_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        self.store
            .set(BIOMETRIC_KEY, if enabled { "true" } else { "false" })
            .await
    }

    pub async fn failed_attempts(&self) -> Result<u32, StorageError> {
        Ok(self
            .store
            .get(FAILED_ATTEMPTS_KEY)
            .await?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0))
    }

    pub async fn set_failed_attempts(&self, attempts: u32) -> Result<(), StorageError> {
        if attempts == 0 {
            return self.store.remove(FAILED_ATTEMPTS_KEY).await;
        }
        self.store
            .set(FAILED_ATTEMPTS_KEY, &attempts.to_string())
            .await
    }

    pub async fn last_login(&self) -> Result<Option<LastLogin>, StorageError> {
        match self.store.get(LAST_LOGIN_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn set_last_login(&self, login: &LastLogin) -> Result<(), StorageError> {
        let raw = serde_json::to_string(login)?;
        self.store.set(LAST_LOGIN_KEY, &raw).await
    }

    /// Logout: drops the token and the lockout counter, keeps PIN and
    /// last-login so the next login screen can be prefilled.
    pub async fn end_session(&self) -> Result<(), StorageError> {
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(FAILED_ATTEMPTS_KEY).await
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.clear().await
    }
}
