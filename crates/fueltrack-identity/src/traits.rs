//! Identity provider traits

use async_trait::async_trait;
use fueltrack_store::StoreError;
use fueltrack_util::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from identity operations
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Identity service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for IdentityError {
    fn from(e: reqwest::Error) -> Self {
        IdentityError::Request(e.to_string())
    }
}

impl From<IdentityError> for fueltrack_util::FuelTrackError {
    fn from(e: IdentityError) -> Self {
        fueltrack_util::FuelTrackError::identity(e.to_string())
    }
}

pub type IdentityResult<T> = Result<T, IdentityError>;

/// A signed-in session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Expiry as epoch seconds; `None` never expires locally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: i64) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the session has expired at `now` (epoch seconds)
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// The user a session belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, email: Option<&str>) -> Self {
        Self {
            id: UserId::new(id),
            email: email.map(str::to_string),
        }
    }

    /// Email if known, otherwise the id
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Identity provider trait - implemented by auth backends
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current session, if any; expired sessions count as none
    async fn get_session(&self) -> IdentityResult<Option<Session>>;

    /// User behind the current session
    async fn get_user(&self) -> IdentityResult<User>;

    /// Forget the current session
    async fn sign_out(&self) -> IdentityResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_expiry() {
        let session = Session::new("token");
        assert!(!session.is_expired_at(i64::MAX));

        let session = session.with_expiry(1_000);
        assert!(!session.is_expired_at(999));
        assert!(session.is_expired_at(1_000));
    }

    #[test]
    fn user_ignores_extra_fields() {
        let json = r#"{"id":"1b2c","aud":"authenticated","email":"ana@example.com","role":"authenticated"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id.as_str(), "1b2c");
        assert_eq!(user.display_name(), "ana@example.com");
    }
}
