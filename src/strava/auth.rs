//! Strava token lifecycle.
//!
//! Produces an authenticated [`StravaClient`] from the stored credential
//! record, refreshing the token pair transparently when it has expired:
//!
//! 1. Load the current payload from the credential store
//! 2. No payload → return an unauthenticated client
//! 3. Payload fresh → return a client carrying the stored tokens
//! 4. Payload stale → refresh against the token endpoint, persist the new
//!    payload, return a client carrying it
//!
//! A failed refresh propagates with the stored record untouched: no
//! retry, and no fallback to the stale token.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info};

use super::api::StravaClient;
use super::config::{StravaSettings, BASE_URL, SERVICE, TOKEN_URL};
use crate::credentials::{CredentialStore, StoreError, TokenPayload};

/// Failure on the main "get an authenticated client" path.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token endpoint rejected the refresh or was unreachable
    #[error("Strava token refresh failed: {0}")]
    Refresh(String),

    /// Refreshed payload could not be persisted
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of the connectivity probe.
#[derive(Clone, Debug)]
pub enum ConnectionStatus {
    /// Authenticated call succeeded
    Connected {
        athlete_id: u64,
        username: Option<String>,
    },
    /// Construction, refresh, or the identity call failed
    Disconnected { reason: String },
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected { .. })
    }
}

/// Manages the Strava OAuth token lifecycle.
///
/// Holds no token state of its own: every call re-reads the credential
/// store, and the returned client owns a transient copy of the tokens.
pub struct TokenLifecycle {
    store: Arc<CredentialStore>,
    settings: StravaSettings,
    http_client: reqwest::Client,
    token_url: String,
    api_base_url: String,
}

impl TokenLifecycle {
    /// Creates a lifecycle manager against the real Strava endpoints.
    pub fn new(store: Arc<CredentialStore>, settings: StravaSettings) -> Self {
        Self::with_endpoints(store, settings, TOKEN_URL.to_string(), BASE_URL.to_string())
    }

    /// Creates a lifecycle manager with custom endpoints (for testing
    /// with a mock server).
    pub fn with_endpoints(
        store: Arc<CredentialStore>,
        settings: StravaSettings,
        token_url: String,
        api_base_url: String,
    ) -> Self {
        Self {
            store,
            settings,
            http_client: reqwest::Client::new(),
            token_url,
            api_base_url,
        }
    }

    /// Produces a ready-to-use client handle.
    ///
    /// With no stored credentials the handle is unauthenticated and its
    /// calls fail with Strava's own error. A stored token that has
    /// reached `expires_at` (inclusive) is refreshed and the new payload
    /// persisted before the handle is returned.
    ///
    /// # Errors
    /// * [`AuthError::Refresh`] - the refresh was rejected or unreachable;
    ///   the stored record is left untouched
    /// * [`AuthError::Store`] - the refreshed payload could not be saved
    pub async fn client(&self) -> Result<StravaClient, AuthError> {
        let mut client = StravaClient::with_base_url(self.api_base_url.clone());

        let payload = match self.store.load(SERVICE) {
            Some(payload) => payload,
            None => return Ok(client),
        };
        client.set_tokens(&payload.access_token, &payload.refresh_token);

        if Utc::now().timestamp() < payload.expires_at {
            return Ok(client);
        }

        debug!("Strava tokens expired, refreshing");
        let refreshed = self.refresh(&payload.refresh_token).await?;
        self.store.save(SERVICE, &refreshed)?;
        client.set_tokens(&refreshed.access_token, &refreshed.refresh_token);
        info!("Strava tokens refreshed");

        Ok(client)
    }

    /// Exchanges the refresh token for a new payload at the token endpoint.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPayload, AuthError> {
        let mut form = HashMap::new();
        form.insert("client_id", self.settings.client_id.as_str());
        form.insert("client_secret", self.settings.client_secret.as_str());
        form.insert("grant_type", "refresh_token");
        form.insert("refresh_token", refresh_token);

        let response = self
            .http_client
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::Refresh(format!("token endpoint unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            return Err(AuthError::Refresh(format!(
                "status {}: {}",
                status, body
            )));
        }

        response
            .json::<TokenPayload>()
            .await
            .map_err(|e| AuthError::Refresh(format!("malformed token response: {}", e)))
    }

    /// Connectivity probe: construct a client, then make one lightweight
    /// authenticated call.
    ///
    /// Never fails: every failure along the way (load, refresh, the
    /// identity call itself) is logged and folded into
    /// [`ConnectionStatus::Disconnected`].
    pub async fn probe(&self) -> ConnectionStatus {
        let client = match self.client().await {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "Strava not connected");
                return ConnectionStatus::Disconnected {
                    reason: e.to_string(),
                };
            }
        };

        match client.get_athlete().await {
            Ok(athlete) => {
                debug!(athlete_id = athlete.id, "Strava connected");
                ConnectionStatus::Connected {
                    athlete_id: athlete.id,
                    username: athlete.username,
                }
            }
            Err(e) => {
                error!(error = %e, "Strava not connected");
                ConnectionStatus::Disconnected {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// User-facing authorization URL for the "connect" link.
    pub fn connect_url(&self) -> String {
        self.settings.authorization_url()
    }
}
