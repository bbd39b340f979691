//! Request client behavior against stub backends.

use std::net::SocketAddr;
use std::sync::Arc;

use patta_client::config::ClientConfig;
use patta_client::http::{RequestBody, RequestOptions};
use patta_client::page::{HostCall, RecordingHost};
use patta_client::upload::{DocumentFile, LatLng};
use patta_client::{PattaApi, PattaError, SecureClient, Session};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::json;

mod common;

fn client_for(addr: SocketAddr, cookies: Option<&str>) -> (SecureClient, Arc<RecordingHost>) {
    let mut config = ClientConfig::default();
    config.api.base_url = format!("http://{}", addr);
    config.api.system_proxy = false;
    let session = Arc::new(Session::new(config.session.clone(), cookies.map(String::from)));
    let host = Arc::new(RecordingHost::new());
    let client = SecureClient::new(&config, session, host.clone()).unwrap();
    (client, host)
}

#[tokio::test]
async fn test_forbidden_reloads_once_and_expires_session() {
    let (addr, _requests) = common::start_fixed_backend(403, "forbidden").await;
    let (client, host) = client_for(addr, Some("csrf_token=abc"));

    let err = client
        .request("/api/patta/requests", RequestOptions::get())
        .await
        .unwrap_err();

    assert!(matches!(err, PattaError::SessionExpired));
    assert_eq!(host.reload_count(), 1);
    assert_eq!(host.calls(), vec![HostCall::Reload]);
}

#[tokio::test]
async fn test_other_errors_carry_status_and_body() {
    let (addr, _requests) = common::start_fixed_backend(500, "database unavailable").await;
    let (client, host) = client_for(addr, None);

    let err = client
        .request("/api/patta/requests", RequestOptions::get())
        .await
        .unwrap_err();

    match err {
        PattaError::HttpError { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "database unavailable");
        }
        other => panic!("expected HttpError, got {other:?}"),
    }
    assert_eq!(host.reload_count(), 0);
}

#[tokio::test]
async fn test_success_sends_security_headers_and_parses_json() {
    let (addr, mut requests) = common::start_fixed_backend(200, r#"{"ok":true}"#).await;
    let (client, _host) = client_for(addr, Some("csrf_token=abc; sid=s1"));

    let value = client
        .request("/api/patta/requests", RequestOptions::post_json(json!({"pattaId": "TN-7"})))
        .await
        .unwrap();
    assert_eq!(value, json!({"ok": true}));

    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.path, "/api/patta/requests");
    assert_eq!(seen.header("x-xsrf-token"), Some("abc"));
    assert_eq!(seen.header("x-requested-with"), Some("XMLHttpRequest"));
    assert_eq!(seen.header("content-type"), Some("application/json"));
    assert_eq!(seen.header("cookie"), Some("csrf_token=abc; sid=s1"));
    assert_eq!(seen.body, br#"{"pattaId":"TN-7"}"#);
}

#[tokio::test]
async fn test_generated_token_is_sent_consistently() {
    let (addr, mut requests) = common::start_fixed_backend(200, "{}").await;
    let (client, _host) = client_for(addr, None);

    client.request("/a", RequestOptions::get()).await.unwrap();
    client.request("/b", RequestOptions::get()).await.unwrap();

    let first = requests.recv().await.unwrap();
    let second = requests.recv().await.unwrap();
    let token = client.session().token().as_str();
    assert_eq!(token.len(), 43);
    assert_eq!(first.header("x-xsrf-token"), Some(token));
    assert_eq!(second.header("x-xsrf-token"), Some(token));
    assert_eq!(first.header("cookie"), None);
}

#[tokio::test]
async fn test_caller_content_type_is_kept() {
    let (addr, mut requests) = common::start_fixed_backend(200, "{}").await;
    let (client, _host) = client_for(addr, None);

    let mut options = RequestOptions {
        method: Method::PUT,
        body: RequestBody::Text("plain words".into()),
        ..RequestOptions::default()
    };
    options.headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    client.request("/notes", options).await.unwrap();

    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.method, "PUT");
    assert_eq!(seen.header("content-type"), Some("text/plain"));
    assert_eq!(seen.body, b"plain words");
}

#[tokio::test]
async fn test_multipart_body_gets_no_json_content_type() {
    let (addr, mut requests) = common::start_fixed_backend(
        201,
        r#"{"url":"https://store/doc.pdf","filename":"u_doc.pdf","message":"Document uploaded successfully"}"#,
    )
    .await;
    let (client, _host) = client_for(addr, Some("csrf_token=abc"));
    let api = PattaApi::new(client);

    let uploaded = api
        .upload_document(DocumentFile::new("doc.pdf", "application/pdf", b"%PDF".to_vec()))
        .await
        .unwrap();
    assert_eq!(uploaded.filename, "u_doc.pdf");

    let seen = requests.recv().await.unwrap();
    assert!(seen.header("content-type").unwrap().starts_with("multipart/form-data"));
    assert_eq!(seen.header("x-xsrf-token"), Some("abc"));

    let parts = common::parse_multipart(&seen);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].name, "document");
    assert_eq!(parts[0].filename.as_deref(), Some("doc.pdf"));
    assert_eq!(parts[0].data, b"%PDF");
}

#[tokio::test]
async fn test_typed_api_calls() {
    let (addr, mut requests) = common::start_programmable_backend(|req| async move {
        if req.method == "POST" {
            (201, r#"{"requestId":"r-1","status":"created"}"#.to_string())
        } else {
            (200, r#"{"requests":[{"id":"r-1","pattaId":"TN-7","status":"pending","documentsCount":0}],"count":1}"#.to_string())
        }
    })
    .await;
    let (client, _host) = client_for(addr, None);
    let api = PattaApi::new(client);

    let created = api.create_request("TN-7", LatLng::new(10.5, 79.1)).await.unwrap();
    assert_eq!(created.request_id, "r-1");

    let body: serde_json::Value = serde_json::from_slice(&requests.recv().await.unwrap().body).unwrap();
    assert_eq!(body, json!({"pattaId": "TN-7", "location": {"lat": 10.5, "lng": 79.1}}));

    let list = api.list_requests().await.unwrap();
    assert_eq!(list.count, 1);
    assert_eq!(list.requests[0].patta_id.as_deref(), Some("TN-7"));
}

#[tokio::test]
async fn test_out_of_range_location_never_sent() {
    let (addr, mut requests) = common::start_fixed_backend(201, "{}").await;
    let (client, _host) = client_for(addr, None);
    let api = PattaApi::new(client);

    let err = api.create_request("TN-7", LatLng::new(95.0, 79.1)).await.unwrap_err();
    assert!(matches!(err, PattaError::InvalidCoordinate { name: "lat", .. }));
    assert!(requests.try_recv().is_err());
}
