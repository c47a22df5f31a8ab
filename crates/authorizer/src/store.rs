// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token pack model and the pluggable token store.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Refresh this long before the access token actually expires.
pub const REFRESH_MARGIN_MS: u64 = 300_000;

/// The persisted token bundle for one user on one Canvas host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPack {
    /// Opaque bearer credential for Canvas API calls.
    pub access_token: String,
    /// Long-lived credential used to obtain new access tokens.
    pub refresh_token: String,
    /// Epoch ms after which `access_token` must be treated as unusable.
    pub access_token_expiry: u64,
    /// The Canvas instance this pack is valid against.
    pub canvas_host: String,
}

impl TokenPack {
    /// Whether the access token is within the refresh margin of expiry.
    pub fn needs_refresh(&self, now_ms: u64) -> bool {
        now_ms + REFRESH_MARGIN_MS >= self.access_token_expiry
    }
}

/// Absolute expiry for a provider-granted token.
///
/// Shaved to 99% of the advertised lifetime to absorb clock skew and the
/// network latency between obtaining and using the token.
pub fn access_token_expiry(now_ms: u64, expires_in_secs: u64) -> u64 {
    now_ms + expires_in_secs.saturating_mul(990)
}

/// Current time in ms since epoch.
pub fn epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Persistence for token packs, keyed by `(canvas_host, user_id)`.
///
/// Both operations may involve I/O and must be safe under concurrent calls
/// for different keys; concurrent `set` calls for the same key are
/// last-write-wins. `get` for an unknown key resolves to `Ok(None)`.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, canvas_host: &str, user_id: i64) -> anyhow::Result<Option<TokenPack>>;

    async fn set(&self, canvas_host: &str, user_id: i64, pack: TokenPack) -> anyhow::Result<()>;
}

/// In-process token store: process-scoped, no eviction, not durable across
/// restarts. For development and testing; production deployments plug in
/// their own [`TokenStore`].
#[derive(Default)]
pub struct MemoryTokenStore {
    store: RwLock<HashMap<String, HashMap<i64, TokenPack>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, canvas_host: &str, user_id: i64) -> anyhow::Result<Option<TokenPack>> {
        let store = self.store.read().await;
        Ok(store.get(canvas_host).and_then(|users| users.get(&user_id)).cloned())
    }

    async fn set(&self, canvas_host: &str, user_id: i64, pack: TokenPack) -> anyhow::Result<()> {
        let mut store = self.store.write().await;
        store.entry(canvas_host.to_owned()).or_default().insert(user_id, pack);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
