// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The authorizer context: credentials, store, and token lifecycle operations.

use std::sync::Arc;

use axum::http::request::Parts;
use axum::Router;

use crate::config::AuthConfig;
use crate::credentials::DeveloperCredentials;
use crate::error::AuthError;
use crate::launch::{LaunchGate, LaunchIdentity};
use crate::provider::ProviderClient;
use crate::store::{access_token_expiry, epoch_ms, MemoryTokenStore, TokenPack, TokenStore};

/// Handle to one authorizer instance.
///
/// Cheap to clone; doubles as the axum router state. Multiple independent
/// instances (e.g. per tenant group) can coexist in one process — nothing
/// here is global.
#[derive(Clone)]
pub struct Authorizer {
    inner: Arc<Inner>,
}

struct Inner {
    credentials: DeveloperCredentials,
    store: Arc<dyn TokenStore>,
    gate: Arc<dyn LaunchGate>,
    provider: ProviderClient,
    /// Space-joined scope string, precomputed from config.
    scopes: Option<String>,
    authorize_path: String,
    home_path: String,
}

impl Authorizer {
    /// Validate the configuration and build the context.
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        config.developer_credentials.validate()?;
        if !config.authorize_path.starts_with('/') {
            return Err(AuthError::RequiredOptionExcluded(
                "authorize path must begin with '/'".to_owned(),
            ));
        }

        let store = config
            .token_store
            .unwrap_or_else(|| Arc::new(MemoryTokenStore::new()) as Arc<dyn TokenStore>);
        let scopes =
            if config.scopes.is_empty() { None } else { Some(config.scopes.join(" ")) };

        Ok(Self {
            inner: Arc::new(Inner {
                credentials: config.developer_credentials,
                store,
                gate: config.launch_gate,
                provider: ProviderClient::new(config.num_retries),
                scopes,
                authorize_path: config.authorize_path,
                home_path: config.home_path,
            }),
        })
    }

    /// Router carrying the handshake route, ready to merge into the host app.
    pub fn router(&self) -> Router {
        crate::handshake::build_router(self.clone())
    }

    pub fn authorize_path(&self) -> &str {
        &self.inner.authorize_path
    }

    pub fn home_path(&self) -> &str {
        &self.inner.home_path
    }

    pub(crate) fn credentials(&self) -> &DeveloperCredentials {
        &self.inner.credentials
    }

    pub(crate) fn provider(&self) -> &ProviderClient {
        &self.inner.provider
    }

    pub(crate) fn scopes(&self) -> Option<&str> {
        self.inner.scopes.as_deref()
    }

    /// The launch identity for this request, if a valid launch exists.
    pub async fn launch_info(&self, parts: &Parts) -> Option<LaunchIdentity> {
        self.inner.gate.launch_info(parts).await
    }

    /// The stored token pack for an identity.
    ///
    /// Store read failures degrade to the absent case so the caller re-runs
    /// the handshake instead of hard-failing; the error is logged.
    pub(crate) async fn stored_pack(&self, identity: &LaunchIdentity) -> Option<TokenPack> {
        match self.inner.store.get(&identity.canvas_host, identity.user_id).await {
            Ok(pack) => pack,
            Err(e) => {
                tracing::warn!(host = %identity.canvas_host, err = %e, "token store read failed");
                None
            }
        }
    }

    pub(crate) async fn store_pack(
        &self,
        identity: &LaunchIdentity,
        pack: TokenPack,
    ) -> Result<(), AuthError> {
        self.inner
            .store
            .set(&identity.canvas_host, identity.user_id, pack)
            .await
            .map_err(|e| {
                tracing::warn!(host = %identity.canvas_host, err = %e, "token store write failed");
                AuthError::StoreWrite
            })
    }

    /// Refresh the authorization of the user behind this request.
    pub async fn refresh(&self, parts: &Parts) -> Result<TokenPack, AuthError> {
        let identity =
            self.launch_info(parts).await.ok_or(AuthError::RefreshSessionExpired)?;
        self.refresh_identity(&identity).await
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// On any failure the store is left untouched. Never retries; transport
    /// retry policy lives in [`ProviderClient`].
    pub async fn refresh_identity(
        &self,
        identity: &LaunchIdentity,
    ) -> Result<TokenPack, AuthError> {
        let pack = self
            .stored_pack(identity)
            .await
            .filter(|pack| !pack.refresh_token.is_empty())
            .ok_or(AuthError::RefreshTokenMissing)?;

        let creds = self
            .inner
            .credentials
            .for_host(&identity.canvas_host)
            .ok_or_else(|| AuthError::NoCreds(identity.canvas_host.clone()))?;

        let grant = self
            .inner
            .provider
            .post_token(
                &identity.canvas_host,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", pack.refresh_token.as_str()),
                    ("client_id", creds.client_id.as_str()),
                    ("client_secret", creds.client_secret.as_str()),
                ],
            )
            .await
            .map_err(|e| {
                tracing::warn!(host = %identity.canvas_host, err = %e, "token refresh request failed");
                AuthError::RefreshFailed
            })?;

        if let Some(error) = &grant.error {
            tracing::warn!(host = %identity.canvas_host, error = %error, "provider rejected token refresh");
            return Err(AuthError::RefreshFailed);
        }
        let Some(access_token) = grant.access_token else {
            tracing::warn!(host = %identity.canvas_host, "token refresh response had no access token");
            return Err(AuthError::RefreshFailed);
        };

        let new_pack = TokenPack {
            access_token,
            // Canvas does not always rotate refresh tokens; keep the old one
            // when the response omits a new one.
            refresh_token: grant.refresh_token.unwrap_or(pack.refresh_token),
            access_token_expiry: access_token_expiry(epoch_ms(), grant.expires_in),
            canvas_host: identity.canvas_host.clone(),
        };

        self.store_pack(identity, new_pack.clone())
            .await
            .map_err(|_| AuthError::RefreshFailed)?;

        tracing::info!(host = %identity.canvas_host, user = identity.user_id, "access token refreshed");
        Ok(new_pack)
    }

    /// Currently-valid access token for the user behind this request,
    /// refreshing just-in-time when the cached token is near expiry.
    ///
    /// This is the read path downstream handlers call before making
    /// authenticated Canvas API requests.
    pub async fn access_token(&self, parts: &Parts) -> Result<String, AuthError> {
        let identity = self.launch_info(parts).await.ok_or(AuthError::GetNoSession)?;
        self.access_token_for(&identity).await
    }

    /// Same as [`Authorizer::access_token`] for a pre-resolved identity.
    pub async fn access_token_for(
        &self,
        identity: &LaunchIdentity,
    ) -> Result<String, AuthError> {
        let pack =
            self.stored_pack(identity).await.ok_or(AuthError::GetNoAuthorization)?;

        if pack.needs_refresh(epoch_ms()) {
            // No silent fallback to a known-stale token.
            let refreshed = self.refresh_identity(identity).await?;
            return Ok(refreshed.access_token);
        }
        Ok(pack.access_token)
    }
}
