// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canvas OAuth2 wire protocol: authorize URL and token endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Token endpoint response body.
///
/// Error responses (e.g. `invalid_client`) arrive through the same shape
/// with `error` set; callers inspect it before trusting the token fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ProviderUser>,
}

/// The `user` object Canvas includes with a token grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: i64,
}

/// HTTP client for a Canvas instance's OAuth2 endpoints.
///
/// Owns transport policy: request timeout and a bounded number of retries
/// for transport failures. Responses that parse, including provider error
/// bodies, are never retried.
pub struct ProviderClient {
    http: reqwest::Client,
    num_retries: u32,
}

impl ProviderClient {
    pub fn new(num_retries: u32) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { http, num_retries }
    }

    /// POST form params to `{host}/login/oauth2/token`.
    pub async fn post_token(
        &self,
        canvas_host: &str,
        params: &[(&str, &str)],
    ) -> anyhow::Result<TokenGrant> {
        let url = format!("{}/login/oauth2/token", base_url(canvas_host));
        let mut attempt = 0;
        loop {
            match self.try_post(&url, params).await {
                Ok(grant) => return Ok(grant),
                Err(e) if attempt < self.num_retries => {
                    tracing::debug!(attempt, err = %e, "token endpoint request failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_post(&self, url: &str, params: &[(&str, &str)]) -> anyhow::Result<TokenGrant> {
        let resp = self.http.post(url).form(params).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        match serde_json::from_slice::<TokenGrant>(&bytes) {
            Ok(grant) => Ok(grant),
            Err(_) => anyhow::bail!("token endpoint returned {status} with an unreadable body"),
        }
    }
}

/// Scheme + host for a Canvas instance. Local Canvas simulators run without
/// TLS, so localhost hosts are dialed over plain HTTP.
fn base_url(canvas_host: &str) -> String {
    if canvas_host.starts_with("localhost") || canvas_host.starts_with("127.0.0.1") {
        format!("http://{canvas_host}")
    } else {
        format!("https://{canvas_host}")
    }
}

/// Build the provider authorize URL for the handshake redirect.
pub fn build_auth_url(
    canvas_host: &str,
    client_id: &str,
    redirect_uri: &str,
    state: &str,
    scopes: Option<&str>,
) -> String {
    let scope_addon = match scopes {
        Some(scopes) => format!("&scopes={}", percent_encode(scopes)),
        None => String::new(),
    };
    format!(
        "{base}/login/oauth2/auth?client_id={client_id}\
         &response_type=code\
         &redirect_uri={redirect_uri}\
         &state={state}{scope_addon}",
        base = base_url(canvas_host),
        client_id = percent_encode(client_id),
        redirect_uri = percent_encode(redirect_uri),
        state = percent_encode(state),
    )
}

/// Percent-encode a query parameter value.
pub fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0xf) as usize]));
            }
        }
    }
    out
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
