use std::time::Duration;

use crawler_engine::{Fetch, FetchError, FetchSettings, ReqwestFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> ReqwestFetcher {
    ReqwestFetcher::new(FetchSettings::default()).expect("build fetcher")
}

#[tokio::test]
async fn page_fetch_returns_html_text() {
    crawler_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let html = fetcher()
        .fetch_page(&format!("{}/doc", server.uri()))
        .await
        .expect("fetch ok");
    assert_eq!(html, "<html>ok</html>");
}

#[tokio::test]
async fn page_fetch_follows_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>moved</html>", "text/html"),
        )
        .mount(&server)
        .await;

    let html = fetcher()
        .fetch_page(&format!("{}/old", server.uri()))
        .await
        .expect("redirect followed");
    assert_eq!(html, "<html>moved</html>");
}

#[tokio::test]
async fn page_fetch_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch_page(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status(404)));
}

#[tokio::test]
async fn page_fetch_rejects_non_html_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch_page(&format!("{}/data", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::UnsupportedContentType(_)));
}

#[tokio::test]
async fn byte_fetch_ignores_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/image-1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(&b"\xFF\xD8jpegdata"[..], "image/jpeg"))
        .mount(&server)
        .await;

    let bytes = fetcher()
        .fetch_bytes(&format!("{}/image-1.jpg", server.uri()))
        .await
        .expect("image bytes");
    assert_eq!(bytes, b"\xFF\xD8jpegdata");
}

#[tokio::test]
async fn fetch_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let err = fetcher
        .fetch_page(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Timeout));
}

#[tokio::test]
async fn fetch_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let err = fetcher
        .fetch_page(&format!("{}/large", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::TooLarge { max_bytes: 10 }));
}
