mod common;

use common::{candidate_reply, closed_port, start_mock_upstream, start_truncated_upstream};
use gemini_client::{ApiKey, AuthMode, GeminiClient, GeminiError};
use serde_json::json;
use sysagent::diagnostic::{
    run_probe, write_network_error, write_outcome, Diagnosis, DIAGNOSTIC_MODEL, PROBE_PROMPT,
};

fn direct_client(base_url: &str) -> GeminiClient {
    GeminiClient::builder()
        .proxy(None::<String>)
        .base_url(base_url)
        .build()
        .unwrap()
}

fn key() -> ApiKey {
    ApiKey::new(Some("diag-key")).unwrap()
}

#[actix_web::test]
async fn test_probe_success_with_query_auth() {
    let upstream = start_mock_upstream(200, candidate_reply("SYSTEM_CHECK_PASSED")).await;

    let outcome = run_probe(
        direct_client(&upstream.base_url),
        &key(),
        AuthMode::Query,
        DIAGNOSTIC_MODEL,
    )
    .await
    .unwrap();
    assert_eq!(outcome.diagnosis(), Diagnosis::Success);
    assert!(outcome.body.contains("SYSTEM_CHECK_PASSED"));

    let seen = upstream.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].path,
        "/v1beta/models/gemini-2.5-flash:generateContent"
    );
    assert_eq!(seen[0].query, "key=diag-key");
    assert!(seen[0].api_key_header.is_none());
    assert_eq!(seen[0].body["contents"][0]["parts"][0]["text"], PROBE_PROMPT);

    upstream.stop().await;
}

#[actix_web::test]
async fn test_probe_forbidden_is_authorization_failure() {
    let upstream = start_mock_upstream(
        403,
        json!({"error": {"code": 403, "message": "denied", "status": "PERMISSION_DENIED"}}),
    )
    .await;

    let outcome = run_probe(
        direct_client(&upstream.base_url),
        &key(),
        AuthMode::Query,
        DIAGNOSTIC_MODEL,
    )
    .await
    .unwrap();
    assert_eq!(outcome.diagnosis(), Diagnosis::AuthorizationFailed);

    let mut out = Vec::new();
    write_outcome(&mut out, &outcome).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Status Code: 403 Forbidden"));
    assert!(text.contains("PERMISSION_DENIED"));
    assert!(text.contains("Authorization Failed"));

    upstream.stop().await;
}

#[actix_web::test]
async fn test_probe_other_status_is_unknown() {
    let upstream = start_mock_upstream(429, json!({"error": {"message": "quota"}})).await;

    let outcome = run_probe(
        direct_client(&upstream.base_url),
        &key(),
        AuthMode::Header,
        DIAGNOSTIC_MODEL,
    )
    .await
    .unwrap();
    assert_eq!(outcome.diagnosis(), Diagnosis::Unknown);
    assert_eq!(
        upstream.requests()[0].api_key_header.as_deref(),
        Some("diag-key")
    );

    upstream.stop().await;
}

#[actix_web::test]
async fn test_probe_network_error_hides_key() {
    let base_url = format!("http://127.0.0.1:{}", closed_port());

    let error = run_probe(
        direct_client(&base_url),
        &key(),
        AuthMode::Query,
        DIAGNOSTIC_MODEL,
    )
    .await
    .unwrap_err();
    assert!(matches!(error, GeminiError::Request(_)));

    let mut out = Vec::new();
    write_network_error(&mut out, &error).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("NETWORK ERROR"));
    assert!(text.contains("VPN/Proxy"));
    assert!(text.to_lowercase().contains("refused"));
    assert!(!text.contains("diag-key"));
}

#[actix_web::test]
async fn test_probe_through_unreachable_proxy_fails() {
    let client = GeminiClient::builder()
        .proxy(Some(format!("http://127.0.0.1:{}", closed_port())))
        .build()
        .unwrap();

    let error = run_probe(client, &key(), AuthMode::Query, DIAGNOSTIC_MODEL)
        .await
        .unwrap_err();
    assert!(matches!(error, GeminiError::Request(_)));
    assert!(!error.to_string().contains("diag-key"));

    let mut out = Vec::new();
    write_network_error(&mut out, &error).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("NETWORK ERROR: request error: error sending request: "));
}

#[actix_web::test]
async fn test_truncated_body_keeps_status_classification() {
    let base_url = start_truncated_upstream("403 Forbidden", 100, "{\"error\"");

    let outcome = run_probe(
        direct_client(&base_url),
        &key(),
        AuthMode::Query,
        DIAGNOSTIC_MODEL,
    )
    .await
    .unwrap();
    assert_eq!(outcome.status.as_u16(), 403);
    assert_eq!(outcome.diagnosis(), Diagnosis::AuthorizationFailed);
    assert!(outcome.body.starts_with("<body could not be read:"));
    assert!(!outcome.body.contains("diag-key"));

    let mut out = Vec::new();
    write_outcome(&mut out, &outcome).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Authorization Failed"));
    assert!(!text.contains("NETWORK ERROR"));
}
