//! Integration tests for HTTP transport

use mint_transport::{HttpRequest, HttpTransport, HttpTransportConfig, Transport, TransportError};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport() -> HttpTransport {
    HttpTransport::with_config(HttpTransportConfig {
        user_agent: Some("Mint-Android/1.10.2".into()),
        ..Default::default()
    })
    .expect("Failed to create HTTP transport")
}

#[tokio::test]
async fn test_get_sends_query_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/me/nearby"))
        .and(query_param("lat", "52.5"))
        .and(query_param("scale", "1"))
        .and(header("X-Access-Token", "tok"))
        .and(header("User-Agent", "Mint-Android/1.10.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let request = HttpRequest::get(format!("{}/v3/me/nearby", server.uri()))
        .with_header("X-Access-Token", "tok")
        .with_query("lat", 52.5)
        .with_query("scale", 1);

    let response = transport().send(&request).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "OK");
    assert_eq!(
        response.json::<serde_json::Value>().unwrap(),
        json!({"data": []})
    );
}

#[tokio::test]
async fn test_query_appended_to_existing_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/me/nearby"))
        .and(query_param("active", ""))
        .and(query_param("lng", "13.4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request =
        HttpRequest::get(format!("{}/v3/me/nearby?active", server.uri())).with_query("lng", 13.4);

    let response = transport().send(&request).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_post_form_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/oauth"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("oauth_provider=fb&oauth_token=fb-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = HttpRequest::post(format!("{}/v1/oauth", server.uri()))
        .with_form([("oauth_provider", "fb"), ("oauth_token", "fb-token")]);

    let response = transport().send(&request).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_post_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/me/chats/9/messages/text"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"packet_id": 1, "message": "hi"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request = HttpRequest::post(format!("{}/v2/me/chats/9/messages/text", server.uri()))
        .with_json(json!({"packet_id": 1, "message": "hi"}));

    transport().send(&request).await.unwrap();
}

#[rstest]
#[case(401, "Unauthorized")]
#[case(410, "Gone")]
#[case(503, "Service Unavailable")]
#[tokio::test]
async fn test_error_status_is_a_response(#[case] status: u16, #[case] reason: &str) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
        .mount(&server)
        .await;

    let response = transport()
        .send(&HttpRequest::get(format!("{}/v5/me", server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status, status);
    assert_eq!(response.status_text, reason);
    assert_eq!(response.body, b"nope");
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let transport = HttpTransport::with_config(HttpTransportConfig {
        timeout: Duration::from_millis(100),
        ..Default::default()
    })
    .unwrap();

    let err = transport
        .send(&HttpRequest::get(server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err, TransportError::Timeout);
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = transport()
        .send(&HttpRequest::get(format!("http://{addr}/v5/me")))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Connection(_)), "{err:?}");
}
