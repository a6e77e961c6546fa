//! Route gating on the identity provider's answer

use fueltrack_api::{LOGS_KEY, VEHICLES_KEY};
use fueltrack_config::{DEFAULT_LOGIN_ROUTE, DEFAULT_MAIN_ROUTE, IdentityConfig};
use fueltrack_store::KeyValueStore;
use tracing::{debug, info, warn};

use crate::{IdentityProvider, IdentityResult, User};

/// What to do with a request for a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Not signed in; go to the login route
    RedirectToLogin,
    /// Already signed in on the login route; go to the main route
    RedirectToMain,
    /// Show the route, with the signed-in user if there is one
    Render(Option<User>),
}

/// Decides where a request ends up based on the current session
#[derive(Debug, Clone)]
pub struct AuthGate {
    login_route: String,
    main_route: String,
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_ROUTE, DEFAULT_MAIN_ROUTE)
    }
}

impl AuthGate {
    pub fn new(login_route: impl Into<String>, main_route: impl Into<String>) -> Self {
        Self {
            login_route: login_route.into(),
            main_route: main_route.into(),
        }
    }

    pub fn from_config(config: &IdentityConfig) -> Self {
        Self::new(config.login_route.clone(), config.main_route.clone())
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn main_route(&self) -> &str {
        &self.main_route
    }

    fn is_login(&self, route: &str) -> bool {
        route == self.login_route
    }

    fn unauthenticated(&self, route: &str) -> GateDecision {
        if self.is_login(route) {
            GateDecision::Render(None)
        } else {
            GateDecision::RedirectToLogin
        }
    }

    /// Decide what to do with `route`. Provider failures are treated as
    /// "not signed in".
    pub async fn check(&self, provider: &dyn IdentityProvider, route: &str) -> GateDecision {
        match provider.get_session().await {
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!(route, "No session");
                return self.unauthenticated(route);
            }
            Err(e) => {
                warn!(route, error = %e, "Session lookup failed");
                return self.unauthenticated(route);
            }
        }

        match provider.get_user().await {
            Ok(user) if self.is_login(route) => {
                debug!(user_id = %user.id, "Signed in on login route");
                GateDecision::RedirectToMain
            }
            Ok(user) => GateDecision::Render(Some(user)),
            Err(e) => {
                warn!(route, error = %e, "User lookup failed");
                self.unauthenticated(route)
            }
        }
    }
}

/// Sign out and forget every local record
pub async fn logout(provider: &dyn IdentityProvider, store: &dyn KeyValueStore) -> IdentityResult<()> {
    provider.sign_out().await?;
    store.remove(VEHICLES_KEY)?;
    store.remove(LOGS_KEY)?;
    info!("Logged out, local records cleared");
    Ok(())
}
