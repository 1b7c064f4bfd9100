//! Profile screen: the signed-in user.

use crate::device::{AuthSession, User};
use crate::domain::Result;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub signed_in: bool,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProfileScreen {
    auth: Arc<AuthSession>,
}

impl ProfileScreen {
    #[must_use]
    pub const fn new(auth: Arc<AuthSession>) -> Self {
        Self { auth }
    }

    /// # Errors
    ///
    /// Propagates the authentication error to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.auth.login(email, password).await
    }

    /// # Errors
    ///
    /// Propagates the authentication error to the caller.
    pub async fn register(&self, email: &str, password: &str) -> Result<User> {
        self.auth.register(email, password).await
    }

    /// # Errors
    ///
    /// Propagates the provider's error.
    pub async fn logout(&self) -> Result<()> {
        self.auth.logout().await
    }

    pub async fn view(&self) -> ProfileView {
        let user = self.auth.current_user().await;
        ProfileView {
            signed_in: user.is_some(),
            email: user.map(|u| u.email),
        }
    }
}
