//! Supabase auth client

use async_trait::async_trait;
use fueltrack_config::IdentityConfig;
use fueltrack_store::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{IdentityError, IdentityProvider, IdentityResult, Session, SessionStore, User};

/// Request timeout for auth calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Identity provider backed by the Supabase auth REST API.
///
/// The session is kept in the local store; the user is fetched from
/// `GET {url}/auth/v1/user` with the anon key and the session's bearer token.
pub struct SupabaseIdentity {
    client: reqwest::Client,
    url: String,
    anon_key: String,
    sessions: SessionStore,
}

impl SupabaseIdentity {
    pub fn new(config: &IdentityConfig, store: Arc<dyn KeyValueStore>) -> IdentityResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            sessions: SessionStore::new(store),
        })
    }

    /// Store a session for an access token obtained elsewhere, then check
    /// that the service accepts it. A rejected token is not kept.
    pub async fn sign_in_with_token(
        &self,
        access_token: &str,
        expires_at: Option<i64>,
    ) -> IdentityResult<User> {
        let session = Session {
            access_token: access_token.to_string(),
            refresh_token: None,
            expires_at,
        };
        self.sessions.save(&session)?;

        match self.fetch_user(&session).await {
            Ok(user) => {
                info!(user_id = %user.id, "Signed in");
                Ok(user)
            }
            Err(e) => {
                self.sessions.clear()?;
                Err(e)
            }
        }
    }

    async fn fetch_user(&self, session: &Session) -> IdentityResult<User> {
        let url = format!("{}/auth/v1/user", self.url);
        debug!(url = %url, "Fetching user");

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "User lookup rejected");
            return Err(IdentityError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<User>()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn get_session(&self) -> IdentityResult<Option<Session>> {
        let Some(session) = self.sessions.load()? else {
            return Ok(None);
        };

        if session.is_expired_at(fueltrack_util::now().timestamp()) {
            debug!(expires_at = ?session.expires_at, "Stored session expired");
            return Ok(None);
        }

        Ok(Some(session))
    }

    async fn get_user(&self) -> IdentityResult<User> {
        let session = self.get_session().await?.ok_or(IdentityError::NotSignedIn)?;
        self.fetch_user(&session).await
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        self.sessions.clear()?;
        info!("Signed out");
        Ok(())
    }
}
