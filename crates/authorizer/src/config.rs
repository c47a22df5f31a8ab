// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authorizer configuration.

use std::sync::Arc;

use crate::credentials::DeveloperCredentials;
use crate::launch::LaunchGate;
use crate::store::TokenStore;

/// Route the handshake is mounted on unless overridden.
pub const DEFAULT_AUTHORIZE_PATH: &str = "/canvas/authorize";

/// Where the user lands after authorization completes.
pub const DEFAULT_HOME_PATH: &str = "/";

/// Configuration for an [`Authorizer`](crate::Authorizer).
///
/// Required pieces go through [`AuthConfig::new`]; everything else has a
/// default and a `with_*` override.
#[derive(Clone)]
pub struct AuthConfig {
    pub developer_credentials: DeveloperCredentials,
    pub launch_gate: Arc<dyn LaunchGate>,
    /// Defaults to the in-memory store (development/testing only).
    pub token_store: Option<Arc<dyn TokenStore>>,
    /// Scope strings included in every authorization request.
    pub scopes: Vec<String>,
    pub authorize_path: String,
    pub home_path: String,
    /// Transport-level retries for token endpoint requests.
    pub num_retries: u32,
}

impl AuthConfig {
    pub fn new(
        developer_credentials: DeveloperCredentials,
        launch_gate: Arc<dyn LaunchGate>,
    ) -> Self {
        Self {
            developer_credentials,
            launch_gate,
            token_store: None,
            scopes: Vec::new(),
            authorize_path: DEFAULT_AUTHORIZE_PATH.to_owned(),
            home_path: DEFAULT_HOME_PATH.to_owned(),
            num_retries: 0,
        }
    }

    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_authorize_path(mut self, path: impl Into<String>) -> Self {
        self.authorize_path = path.into();
        self
    }

    pub fn with_home_path(mut self, path: impl Into<String>) -> Self {
        self.home_path = path.into();
        self
    }

    pub fn with_num_retries(mut self, num_retries: u32) -> Self {
        self.num_retries = num_retries;
        self
    }
}
