use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::rpc::{
    domain::{TokenRequest, TokenResponse},
    RpcApiEndpoint,
};
use crate::{
    errors::AuthError,
    store::{AccessToken, TokenStore},
};

/// Tokens this close to their expiry are refreshed before use.
const TOKEN_EXPIRY_SKEW_SECS: i64 = 30;

// CREDENTIALS
// ================================================================================================

/// Client credentials exchanged for access tokens.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

// TOKEN AUTHENTICATOR
// ================================================================================================

/// Hands out bearer tokens for API requests.
///
/// A token is taken from memory first, then from the [TokenStore]; only when neither holds a
/// token that is still valid is a new one requested with the configured [Credentials].
pub struct TokenAuthenticator {
    http: reqwest::Client,
    token_url: String,
    credentials: Option<Credentials>,
    store: Box<dyn TokenStore>,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenAuthenticator {
    pub fn new(
        http: reqwest::Client,
        token_url: String,
        credentials: Option<Credentials>,
        store: Box<dyn TokenStore>,
    ) -> Self {
        Self {
            http,
            token_url,
            credentials,
            store,
            cached: Mutex::new(None),
        }
    }

    /// Returns a bearer token that is valid for at least the expiry skew.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;
        if cached.is_none() {
            *cached = self.store.load()?;
        }

        if let Some(token) = cached.as_ref() {
            if !token.expires_within(Utc::now(), Duration::seconds(TOKEN_EXPIRY_SKEW_SECS)) {
                return Ok(token.access_token.clone());
            }
            debug!("Cached access token expired at {}", token.expires_at);
        }

        let token = self.request_token().await?;
        self.store.save(&token)?;
        let access_token = token.access_token.clone();
        *cached = Some(token);

        Ok(access_token)
    }

    /// Requests a new token regardless of what is cached and stores it.
    pub async fn login(&self) -> Result<AccessToken, AuthError> {
        let mut cached = self.cached.lock().await;
        let token = self.request_token().await?;
        self.store.save(&token)?;
        *cached = Some(token.clone());

        Ok(token)
    }

    /// Drops the cached token, both in memory and in the store.
    pub async fn invalidate(&self) -> Result<(), AuthError> {
        let mut cached = self.cached.lock().await;
        *cached = None;
        self.store.clear()?;

        Ok(())
    }

    async fn request_token(&self) -> Result<AccessToken, AuthError> {
        let credentials = self.credentials.as_ref().ok_or(AuthError::MissingCredentials)?;

        info!("Requesting a new access token for client {}", credentials.client_id);
        let response = self
            .http
            .post(&self.token_url)
            .json(&TokenRequest {
                client_id: &credentials.client_id,
                client_secret: &credentials.client_secret,
            })
            .send()
            .await
            .map_err(|err| {
                AuthError::TokenRequestFailed(format!("{}: {err}", RpcApiEndpoint::RequestToken))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenRejected { status: status.as_u16(), message });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| AuthError::TokenRequestFailed(err.to_string()))?;

        let expires_at = token_expiry(Utc::now(), token.expires_in)?;
        Ok(AccessToken::new(token.access_token, expires_at))
    }
}

/// Returns the instant a token issued at `issued_at` and valid for `expires_in` seconds expires.
fn token_expiry(issued_at: DateTime<Utc>, expires_in: i64) -> Result<DateTime<Utc>, AuthError> {
    Duration::try_seconds(expires_in)
        .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
        .ok_or_else(|| {
            AuthError::TokenRequestFailed(format!(
                "{}: token lifetime of {expires_in} seconds is out of range",
                RpcApiEndpoint::RequestToken
            ))
        })
}

// TESTS
// ================================================================================================
