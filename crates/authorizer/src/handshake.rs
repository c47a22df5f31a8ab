// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three-stage authorization handshake, mounted on one well-known path.
//!
//! Every request to the authorize path lands in exactly one stage, picked
//! from the query string: provider error intercept, provider callback, or
//! first-visit entry. Requests that belong to none of them (e.g. a `state`
//! value this flow never issued) are not our concern and fall through.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::authorizer::Authorizer;
use crate::error::AuthError;
use crate::provider;
use crate::store::{access_token_expiry, epoch_ms, TokenPack};

/// Fixed `state` marker distinguishing this flow's provider callbacks from
/// unrelated query strings on the same path.
pub const STATE_MARKER: &str = "caccl";

/// Which handshake stage a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The provider reported an error outright.
    ErrorIntercept,
    /// Provider callback: `state` carries our marker.
    Callback,
    /// First visit: refresh if possible, otherwise redirect to the provider.
    Entry,
    /// Not part of this flow.
    NotOurs,
}

impl Stage {
    pub fn classify(query: &HashMap<String, String>) -> Stage {
        if query.contains_key("error") || query.contains_key("error_description") {
            return Stage::ErrorIntercept;
        }
        if query.get("state").map(String::as_str) == Some(STATE_MARKER) {
            return Stage::Callback;
        }
        if !query.contains_key("code") && !query.contains_key("state") {
            return Stage::Entry;
        }
        Stage::NotOurs
    }
}

/// Build the axum `Router` carrying the handshake route.
pub fn build_router(auth: Authorizer) -> Router {
    let path = auth.authorize_path().to_owned();
    Router::new().route(&path, get(authorize)).with_state(auth)
}

async fn authorize(
    State(auth): State<Authorizer>,
    Query(query): Query<HashMap<String, String>>,
    parts: Parts,
) -> Response {
    match Stage::classify(&query) {
        Stage::ErrorIntercept => error_intercept(&query),
        Stage::Callback => callback(&auth, &query, &parts).await,
        Stage::Entry => entry(&auth, &parts).await,
        Stage::NotOurs => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Stage 0: the provider sent us back an error instead of a code.
fn error_intercept(query: &HashMap<String, String>) -> Response {
    let error = titlecase_error_code(
        query.get("error").map_or("unknown_error", String::as_str),
    );
    let description = query
        .get("error_description")
        .cloned()
        .unwrap_or_else(|| "No further description could be found.".to_owned())
        // Some providers send '+' for spaces without percent-encoding.
        .replace('+', " ");

    tracing::warn!(error = %error, "provider reported a launch error");
    failure(
        StatusCode::FORBIDDEN,
        format!("A launch error occurred: {error}. {description}"),
    )
}

/// Stage 1: no code, no state. Refresh an existing authorization or send the
/// user to the provider's authorize endpoint.
async fn entry(auth: &Authorizer, parts: &Parts) -> Response {
    let Some(identity) = auth.launch_info(parts).await else {
        return failure(
            StatusCode::FORBIDDEN,
            "We could not authorize you with Canvas because your session has expired.",
        );
    };

    if auth.stored_pack(&identity).await.is_some() {
        return match auth.refresh_identity(&identity).await {
            Ok(_) => redirect(auth.home_path()),
            Err(err @ AuthError::NoCreds(_)) => failure_for(&err),
            Err(_) => failure(
                StatusCode::FORBIDDEN,
                "Your Canvas authorization has expired and we could not refresh \
                 your credentials.",
            ),
        };
    }

    let Some(creds) = auth.credentials().for_host(&identity.canvas_host) else {
        return failure_for(&AuthError::NoCreds(identity.canvas_host.clone()));
    };

    let redirect_uri =
        format!("https://{}{}", request_hostname(parts), auth.authorize_path());
    let url = provider::build_auth_url(
        &identity.canvas_host,
        &creds.client_id,
        &redirect_uri,
        STATE_MARKER,
        auth.scopes(),
    );
    redirect(&url)
}

/// Stage 2: provider callback carrying our `state` marker.
async fn callback(
    auth: &Authorizer,
    query: &HashMap<String, String>,
    parts: &Parts,
) -> Response {
    let code = query.get("code");
    let error = query.get("error");

    if code.is_none() && error.is_none() {
        return failure(
            StatusCode::FORBIDDEN,
            "We could not get your authorization with Canvas because Canvas \
             responded in an unexpected way.",
        );
    }

    let Some(identity) = auth.launch_info(parts).await else {
        return failure(
            StatusCode::FORBIDDEN,
            "We could not get your authorization with Canvas because your session \
             has expired.",
        );
    };

    if code.is_none() && error.map(String::as_str) == Some("unsupported_response_type") {
        return failure(
            StatusCode::FORBIDDEN,
            "We could not get your authorization with Canvas because Canvas would \
             not start the authorization process.",
        );
    }
    let Some(code) = code else {
        return failure(
            StatusCode::FORBIDDEN,
            "We could not get your authorization with Canvas because your access \
             was denied. Please contact your Canvas support team.",
        );
    };

    let Some(creds) = auth.credentials().for_host(&identity.canvas_host) else {
        return failure_for(&AuthError::NoCreds(identity.canvas_host.clone()));
    };

    let redirect_uri =
        format!("https://{}{}", request_hostname(parts), auth.authorize_path());
    let grant = match auth
        .provider()
        .post_token(
            &identity.canvas_host,
            &[
                ("code", code.as_str()),
                ("grant_type", "authorization_code"),
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
            ],
        )
        .await
    {
        Ok(grant) => grant,
        Err(e) => {
            tracing::warn!(host = %identity.canvas_host, err = %e, "code exchange failed");
            return failure(
                StatusCode::FORBIDDEN,
                "We could not get your authorization with Canvas because Canvas did \
                 not respond to our request for tokens.",
            );
        }
    };

    if grant.error.as_deref() == Some("invalid_client") {
        return failure(
            StatusCode::FORBIDDEN,
            "We could not get your authorization with Canvas because Canvas would \
             not recognize this app.",
        );
    }
    let Some(access_token) = grant.access_token else {
        return failure(
            StatusCode::FORBIDDEN,
            "We could not get your authorization with Canvas because Canvas \
             responded in an unexpected way.",
        );
    };

    let pack = TokenPack {
        access_token,
        refresh_token: grant.refresh_token.unwrap_or_default(),
        access_token_expiry: access_token_expiry(epoch_ms(), grant.expires_in),
        canvas_host: identity.canvas_host.clone(),
    };
    if let Err(err) = auth.store_pack(&identity, pack).await {
        return failure_for(&err);
    }

    tracing::info!(host = %identity.canvas_host, user = identity.user_id, "authorization complete");
    redirect(auth.home_path())
}

/// Titlecase a provider error code: `unsupported_response_type` becomes
/// `Unsupported Response Type`.
fn titlecase_error_code(code: &str) -> String {
    code.split('_')
        .map(|word| {
            if word.len() <= 1 {
                word.to_uppercase()
            } else {
                let (first, rest) = word.split_at(1);
                format!("{}{rest}", first.to_uppercase())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hostname from the Host header, without the port.
fn request_hostname(parts: &Parts) -> String {
    parts
        .headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.split(':').next())
        .unwrap_or_default()
        .to_owned()
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, message.into()).into_response()
}

fn failure_for(err: &AuthError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::FORBIDDEN);
    (status, err.user_message()).into_response()
}

fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

#[cfg(test)]
#[path = "handshake_tests.rs"]
mod tests;
