//! Session persistence

use fueltrack_api::SESSION_KEY;
use fueltrack_store::KeyValueStore;
use std::sync::Arc;
use tracing::debug;

use crate::{IdentityError, IdentityResult, Session};

/// Stores the signed-in session under `fueltrack_session`
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> IdentityResult<Option<Session>> {
        let Some(json) = self.store.get(SESSION_KEY)? else {
            return Ok(None);
        };
        let session = serde_json::from_str(&json)
            .map_err(|e| IdentityError::InvalidResponse(format!("stored session: {e}")))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> IdentityResult<()> {
        let json = serde_json::to_string(session)
            .map_err(|e| IdentityError::Internal(e.to_string()))?;
        self.store.set(SESSION_KEY, &json)?;
        debug!(expires_at = ?session.expires_at, "Session saved");
        Ok(())
    }

    pub fn clear(&self) -> IdentityResult<()> {
        self.store.remove(SESSION_KEY)?;
        debug!("Session cleared");
        Ok(())
    }
}
