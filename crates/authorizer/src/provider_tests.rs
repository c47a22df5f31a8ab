// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn auth_url_carries_params_in_order() {
    let url = build_auth_url(
        "canvas.example.edu",
        "client-123",
        "https://app.example.edu/canvas/authorize",
        "caccl",
        None,
    );
    assert_eq!(
        url,
        "https://canvas.example.edu/login/oauth2/auth?client_id=client-123\
         &response_type=code\
         &redirect_uri=https%3A%2F%2Fapp.example.edu%2Fcanvas%2Fauthorize\
         &state=caccl",
    );
}

#[test]
fn auth_url_appends_space_joined_scopes() {
    let url = build_auth_url(
        "canvas.example.edu",
        "client-123",
        "https://app.example.edu/canvas/authorize",
        "caccl",
        Some("url:GET|/api/v1/courses url:GET|/api/v1/users"),
    );
    assert!(url.ends_with(
        "&scopes=url%3AGET%7C%2Fapi%2Fv1%2Fcourses%20url%3AGET%7C%2Fapi%2Fv1%2Fusers"
    ));
}

#[test]
fn localhost_hosts_are_dialed_over_plain_http() {
    assert_eq!(base_url("localhost:8080"), "http://localhost:8080");
    assert_eq!(base_url("127.0.0.1:3000"), "http://127.0.0.1:3000");
    assert_eq!(base_url("canvas.example.edu"), "https://canvas.example.edu");
}

#[test]
fn percent_encoding_leaves_unreserved_bytes_alone() {
    assert_eq!(percent_encode("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
    assert_eq!(percent_encode("a b|c"), "a%20b%7Cc");
}

#[test]
fn grant_parses_a_full_token_response() -> anyhow::Result<()> {
    let grant: TokenGrant = serde_json::from_str(
        r#"{"access_token":"T1","refresh_token":"R1","expires_in":3600,"user":{"id":42}}"#,
    )?;
    assert_eq!(grant.access_token.as_deref(), Some("T1"));
    assert_eq!(grant.refresh_token.as_deref(), Some("R1"));
    assert_eq!(grant.expires_in, 3600);
    assert_eq!(grant.user.map(|u| u.id), Some(42));
    assert_eq!(grant.error, None);
    Ok(())
}

#[test]
fn grant_parses_an_error_body() -> anyhow::Result<()> {
    let grant: TokenGrant = serde_json::from_str(r#"{"error":"invalid_client"}"#)?;
    assert_eq!(grant.error.as_deref(), Some("invalid_client"));
    assert_eq!(grant.access_token, None);
    Ok(())
}

#[test]
fn grant_tolerates_a_missing_refresh_token() -> anyhow::Result<()> {
    let grant: TokenGrant =
        serde_json::from_str(r#"{"access_token":"T2","expires_in":3600}"#)?;
    assert_eq!(grant.access_token.as_deref(), Some("T2"));
    assert_eq!(grant.refresh_token, None);
    Ok(())
}
