// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn provider_errors_are_intercepted_first() {
    assert_eq!(Stage::classify(&query(&[("error", "access_denied")])), Stage::ErrorIntercept);
    assert_eq!(
        Stage::classify(&query(&[("error_description", "nope")])),
        Stage::ErrorIntercept,
    );
    // Even alongside a marker callback.
    assert_eq!(
        Stage::classify(&query(&[("state", STATE_MARKER), ("error", "access_denied")])),
        Stage::ErrorIntercept,
    );
}

#[test]
fn marker_state_is_a_callback() {
    assert_eq!(
        Stage::classify(&query(&[("state", STATE_MARKER), ("code", "abc123")])),
        Stage::Callback,
    );
    // Marker with nothing else still belongs to the callback stage.
    assert_eq!(Stage::classify(&query(&[("state", STATE_MARKER)])), Stage::Callback);
}

#[test]
fn bare_requests_enter_the_flow() {
    assert_eq!(Stage::classify(&query(&[])), Stage::Entry);
    assert_eq!(Stage::classify(&query(&[("course", "17")])), Stage::Entry);
}

#[test]
fn foreign_state_is_not_ours() {
    assert_eq!(
        Stage::classify(&query(&[("state", "somebody-elses"), ("code", "abc")])),
        Stage::NotOurs,
    );
    assert_eq!(Stage::classify(&query(&[("code", "abc")])), Stage::NotOurs);
}

#[test]
fn error_codes_titlecase_on_underscores() {
    assert_eq!(titlecase_error_code("unsupported_response_type"), "Unsupported Response Type");
    assert_eq!(titlecase_error_code("access_denied"), "Access Denied");
    assert_eq!(titlecase_error_code("denied"), "Denied");
    // Single-letter words are uppercased wholesale.
    assert_eq!(titlecase_error_code("a_bad_day"), "A Bad Day");
}

#[test]
fn hostname_drops_the_port() {
    let (parts, _) = axum::http::Request::builder()
        .uri("/canvas/authorize")
        .header("host", "app.example.edu:8443")
        .body(())
        .expect("request")
        .into_parts();
    assert_eq!(request_hostname(&parts), "app.example.edu");
}
