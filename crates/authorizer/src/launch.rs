// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launch-identity contract: how the authorizer learns who a request is for.

use async_trait::async_trait;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

/// Identity asserted by a prior LTI launch.
///
/// Host and user id together form the only valid token-store key; a user id
/// alone is ambiguous across Canvas instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchIdentity {
    /// Hostname of the Canvas instance the user launched from.
    pub canvas_host: String,
    /// The user's Canvas id on that instance.
    pub user_id: i64,
}

/// Resolves the LTI launch identity for an inbound request.
///
/// Implemented by the host application on top of its session layer. The
/// authorizer only reads the identity; it never creates or mutates launch
/// state.
#[async_trait]
pub trait LaunchGate: Send + Sync {
    /// The launch identity for this request, or `None` if no valid launch
    /// exists (session expired or the user never launched).
    async fn launch_info(&self, parts: &Parts) -> Option<LaunchIdentity>;
}
