// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Developer credential configuration and per-host resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// A Canvas developer key pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Developer credentials, fixed at initialization.
///
/// Single-tenant deployments talk to one Canvas instance with one key pair;
/// multi-tenant deployments map each Canvas host to its own pair. In
/// multi-tenant mode a launch from an unconfigured host resolves to nothing,
/// which callers surface as [`AuthError::NoCreds`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeveloperCredentials {
    Single(ClientCredentials),
    PerHost(HashMap<String, ClientCredentials>),
}

impl DeveloperCredentials {
    /// Resolve the credentials to use for a Canvas host.
    pub fn for_host(&self, canvas_host: &str) -> Option<&ClientCredentials> {
        match self {
            Self::Single(creds) => Some(creds),
            Self::PerHost(map) => map.get(canvas_host),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), AuthError> {
        match self {
            Self::Single(creds) => {
                if creds.client_id.is_empty() || creds.client_secret.is_empty() {
                    return Err(AuthError::RequiredOptionExcluded(
                        "developer credentials must include a client id and secret".to_owned(),
                    ));
                }
            }
            Self::PerHost(map) => {
                if map.is_empty() {
                    return Err(AuthError::RequiredOptionExcluded(
                        "developer credentials must cover at least one Canvas host".to_owned(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
