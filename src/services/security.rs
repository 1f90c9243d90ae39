//! PIN and biometric gating for app unlock.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::storage::SessionStore;
use crate::validation::validate_pin;

pub const MAX_PIN_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum UnlockOutcome {
    Unlocked,
    #[serde(rename_all = "camelCase")]
    Rejected { attempts_left: u32 },
    /// Too many failures; the session was ended and a full login is required.
    LockedOut,
    /// No PIN has been set on this device yet.
    NotConfigured,
}

/// How the customer is trying to unlock the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockMethod {
    Pin(String),
    /// Result of the platform biometric prompt.
    Biometric { verified: bool },
}

fn hash_pin(pin: &str) -> String {
    hex::encode(Sha256::digest(pin.as_bytes()))
}

#[derive(Clone)]
pub struct SecurityGate {
    session: SessionStore,
    max_attempts: u32,
}

impl SecurityGate {
    pub fn new(session: SessionStore) -> Self {
        Self {
            session,
            max_attempts: MAX_PIN_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub async fn has_pin(&self) -> Result<bool, AppError> {
        Ok(self.session.pin_hash().await?.is_some())
    }

    pub async fn set_pin(&self, pin: &str) -> Result<(), AppError> {
        validate_pin(pin).map_err(|e| AppError::ValidationError(e.to_string()))?;
        self.session.set_pin_hash(&hash_pin(pin)).await?;
        self.session.set_failed_attempts(0).await?;
        tracing::info!("PIN updated");
        Ok(())
    }

    pub async fn verify_pin(&self, pin: &str) -> Result<UnlockOutcome, AppError> {
        let Some(stored) = self.session.pin_hash().await? else {
            return Ok(UnlockOutcome::NotConfigured);
        };
        if self.session.token().await?.is_none() {
            return Ok(UnlockOutcome::LockedOut);
        }

        if stored == hash_pin(pin) {
            self.session.set_failed_attempts(0).await?;
            return Ok(UnlockOutcome::Unlocked);
        }

        let attempts = self.session.failed_attempts().await? + 1;
        if attempts >= self.max_attempts {
            tracing::warn!(attempts, "PIN attempts exhausted, ending session");
            self.session.end_session().await?;
            return Ok(UnlockOutcome::LockedOut);
        }
        self.session.set_failed_attempts(attempts).await?;
        Ok(UnlockOutcome::Rejected {
            attempts_left: self.max_attempts - attempts,
        })
    }

    pub async fn enable_biometric(&self, enabled: bool) -> Result<(), AppError> {
        if enabled && !self.has_pin().await? {
            return Err(AppError::InvalidState(
                "Set a PIN before enabling biometric unlock".to_string(),
            ));
        }
        self.session.set_biometric_enabled(enabled).await?;
        Ok(())
    }

    pub async fn unlock(&self, method: UnlockMethod) -> Result<UnlockOutcome, AppError> {
        match method {
            UnlockMethod::Pin(pin) => self.verify_pin(&pin).await,
            UnlockMethod::Biometric { verified } => self.unlock_with_biometric(verified).await,
        }
    }

    /// `platform_verified` is the result of the OS biometric prompt.
    pub async fn unlock_with_biometric(&self, platform_verified: bool) -> Result<UnlockOutcome, AppError> {
        if !self.session.biometric_enabled().await? {
            return Ok(UnlockOutcome::NotConfigured);
        }
        if self.session.token().await?.is_none() {
            return Ok(UnlockOutcome::LockedOut);
        }
        if platform_verified {
            self.session.set_failed_attempts(0).await?;
            Ok(UnlockOutcome::Unlocked)
        } else {
            let attempts_left = self
                .max_attempts
                .saturating_sub(self.session.failed_attempts().await?);
            Ok(UnlockOutcome::Rejected { attempts_left })
        }
    }
}
