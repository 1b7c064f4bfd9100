//! Authentication against a hosted identity provider.
//!
//! [`Authenticator`] is the provider contract; [`FirebaseAuthenticator`] talks to the
//! Identity Toolkit REST API. [`AuthSession`] keeps the signed-in user for the
//! lifetime of the app session and is what screens read from.

use crate::domain::{Result, ServiceFinderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
    /// Provider token; never logged.
    #[serde(default, skip_serializing)]
    pub id_token: String,
}

/// Identity provider operations. Failures are propagated to the caller.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Auth`] if the provider rejects the sign-up.
    async fn register(&self, email: &str, password: &str) -> Result<User>;

    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Auth`] if the credentials are rejected.
    async fn login(&self, email: &str, password: &str) -> Result<User>;

    /// # Errors
    ///
    /// Returns an error if the provider cannot end the session.
    async fn logout(&self) -> Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// Identity Toolkit (Firebase Authentication) REST client.
#[derive(Debug, Clone)]
pub struct FirebaseAuthenticator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FirebaseAuthenticator {
    /// Creates a client for `base_url` (e.g. `https://identitytoolkit.googleapis.com/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceFinderError::Config(format!("failed to build auth client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn credentials(&self, action: &str, email: &str, password: &str) -> Result<User> {
        let url = format!("{}/accounts:{action}", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&CredentialsRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| ServiceFinderError::Network(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceFinderError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ProviderErrorBody>(&bytes)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| format!("status code {}", status.as_u16()));
            tracing::debug!(action, status = status.as_u16(), message = %message, "auth rejected");
            return Err(ServiceFinderError::Auth(message));
        }

        let body: CredentialsResponse =
            serde_json::from_slice(&bytes).map_err(|e| ServiceFinderError::Decode(e.to_string()))?;

        tracing::debug!(action, uid = %body.local_id, "auth succeeded");
        Ok(User {
            uid: body.local_id,
            email: if body.email.is_empty() { email.to_string() } else { body.email },
            id_token: body.id_token,
        })
    }
}

#[async_trait]
impl Authenticator for FirebaseAuthenticator {
    async fn register(&self, email: &str, password: &str) -> Result<User> {
        self.credentials("signUp", email, password).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.credentials("signInWithPassword", email, password).await
    }

    async fn logout(&self) -> Result<()> {
        // Tokens are bearer tokens held client-side; dropping them ends the session.
        Ok(())
    }
}

/// The current user, readable for the rest of the app session.
pub struct AuthSession {
    provider: Arc<dyn Authenticator>,
    current: RwLock<Option<User>>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession").finish_non_exhaustive()
    }
}

impl AuthSession {
    #[must_use]
    pub fn new(provider: Arc<dyn Authenticator>) -> Self {
        Self {
            provider,
            current: RwLock::new(None),
        }
    }

    fn check_credentials(email: &str, password: &str) -> Result<()> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ServiceFinderError::Validation(
                crate::domain::service::MISSING_FIELDS_MESSAGE.to_string(),
            ));
        }
        Ok(())
    }

    /// Signs up and makes the new user current.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Validation`] for blank credentials, otherwise
    /// the provider's error. The current user is unchanged on failure.
    pub async fn register(&self, email: &str, password: &str) -> Result<User> {
        Self::check_credentials(email, password)?;
        let user = self.provider.register(email.trim(), password).await?;
        *self.current.write().await = Some(user.clone());
        Ok(user)
    }

    /// Signs in and makes the user current.
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        Self::check_credentials(email, password)?;
        let user = self.provider.login(email.trim(), password).await?;
        *self.current.write().await = Some(user.clone());
        Ok(user)
    }

    /// Signs out and clears the current user.
    ///
    /// # Errors
    ///
    /// Propagates the provider's error; the user stays signed in on failure.
    pub async fn logout(&self) -> Result<()> {
        self.provider.logout().await?;
        *self.current.write().await = None;
        Ok(())
    }

    /// Returns the signed-in user, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }
}
