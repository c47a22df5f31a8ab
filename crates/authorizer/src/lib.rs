// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canvas OAuth2 token broker for LTI-launched web apps.
//!
//! Mounts a three-stage authorization handshake on the host application's
//! axum router, refreshes access tokens ahead of expiry, and persists
//! per-user token packs through a pluggable [`TokenStore`].
//!
//! The host constructs an [`Authorizer`] from an [`AuthConfig`] (developer
//! credentials plus a [`LaunchGate`] that asserts the LTI launch identity),
//! merges [`Authorizer::router`] into its own router, and calls
//! [`Authorizer::access_token`] from any downstream handler that needs an
//! authenticated Canvas call.

pub mod authorizer;
pub mod config;
pub mod credentials;
pub mod error;
pub mod handshake;
pub mod launch;
pub mod provider;
pub mod store;

pub use authorizer::Authorizer;
pub use config::AuthConfig;
pub use credentials::{ClientCredentials, DeveloperCredentials};
pub use error::AuthError;
pub use launch::{LaunchGate, LaunchIdentity};
pub use store::{MemoryTokenStore, TokenPack, TokenStore, REFRESH_MARGIN_MS};
