//! Mock identity provider for testing

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::{IdentityError, IdentityProvider, IdentityResult, Session, User};

/// Mock identity provider for unit/integration testing
#[derive(Clone, Default)]
pub struct MockIdentity {
    session: Arc<Mutex<Option<Session>>>,
    user: Arc<Mutex<Option<User>>>,

    /// Configure session lookup to fail
    pub fail_session: Arc<Mutex<bool>>,

    /// Configure user lookup to fail
    pub fail_user: Arc<Mutex<bool>>,
}

impl MockIdentity {
    /// No session
    pub fn new() -> Self {
        Self::default()
    }

    /// Signed in as `user`
    pub fn signed_in(user: User) -> Self {
        let mock = Self::new();
        mock.set_session(Some(Session::new("mock-token")));
        *mock.user.lock().unwrap() = Some(user);
        mock
    }

    pub fn set_session(&self, session: Option<Session>) {
        *self.session.lock().unwrap() = session;
    }

    pub fn set_fail_session(&self, fail: bool) {
        *self.fail_session.lock().unwrap() = fail;
    }

    pub fn set_fail_user(&self, fail: bool) {
        *self.fail_user.lock().unwrap() = fail;
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn get_session(&self) -> IdentityResult<Option<Session>> {
        if *self.fail_session.lock().unwrap() {
            return Err(IdentityError::Request("Mock session failure".into()));
        }
        Ok(self.session.lock().unwrap().clone())
    }

    async fn get_user(&self) -> IdentityResult<User> {
        if *self.fail_user.lock().unwrap() {
            return Err(IdentityError::Request("Mock user failure".into()));
        }
        if self.session.lock().unwrap().is_none() {
            return Err(IdentityError::NotSignedIn);
        }
        self.user
            .lock()
            .unwrap()
            .clone()
            .ok_or(IdentityError::NotSignedIn)
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        self.set_session(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signed_in() {
        let mock = MockIdentity::signed_in(User::new("u1", Some("a@b.c")));
        assert!(mock.get_session().await.unwrap().is_some());
        assert_eq!(mock.get_user().await.unwrap().id.as_str(), "u1");

        mock.sign_out().await.unwrap();
        assert!(mock.get_session().await.unwrap().is_none());
        assert!(matches!(mock.get_user().await, Err(IdentityError::NotSignedIn)));
    }

    #[tokio::test]
    async fn test_mock_failures() {
        let mock = MockIdentity::signed_in(User::new("u1", None));
        mock.set_fail_user(true);
        assert!(mock.get_user().await.is_err());

        mock.set_fail_session(true);
        assert!(mock.get_session().await.is_err());
    }
}
