use marketdesk_util::{build_client, FetchError, Util, DEFAULT_USER_AGENT};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn sends_the_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<table></table>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(DEFAULT_USER_AGENT).unwrap();
    let body = client
        .get_text(&format!("{}/page", server.uri()))
        .await
        .unwrap();

    assert_eq!(body, "<table></table>");
}

#[tokio::test]
async fn non_success_status_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&server)
        .await;

    let client = build_client(DEFAULT_USER_AGENT).unwrap();
    let err = client
        .get_text(&format!("{}/busy", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 503, .. }));
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let client = build_client(DEFAULT_USER_AGENT).unwrap();
    // port 9 (discard) on localhost is closed in test environments
    let err = client.get_text("http://127.0.0.1:9/").await.unwrap_err();

    assert!(matches!(err, FetchError::Transport { .. }));
    assert_eq!(err.status(), None);
}
