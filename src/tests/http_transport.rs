// Runs the token client over the real HttpTransport against mock consoles.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::Method::{DELETE, GET, POST};
    use httpmock::MockServer;
    use reqwest::StatusCode;
    use serde_json::{json, Value};
    use tokio::time::Instant;

    use crate::api::TokenApiClient;
    use crate::config::endpoints::EndpointRegistry;
    use crate::config::settings::{BodyEncoding, RetryConfig};
    use crate::observability::metrics;
    use crate::tests::common::{bearer_auth, payload, settings_for};
    use crate::transport::{HttpTransport, Transport, TransportError};

    fn form_client(server: &MockServer) -> TokenApiClient<HttpTransport> {
        let transport = HttpTransport::new(&settings_for(&server.base_url()), None).unwrap();
        TokenApiClient::new(transport, EndpointRegistry::default())
    }

    async fn closed_port_url() -> String {
        // bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    /// Value of the exposition line for `series` whose labels mention `path`.
    fn sample(text: &str, series: &str, path: &str) -> Option<String> {
        text.lines()
            .filter(|line| line.starts_with(series) && line.contains(&format!("path=\"{}\"", path)))
            .find_map(|line| line.rsplit(' ').next().map(str::to_owned))
    }

    #[tokio::test]
    async fn list_sends_form_body_and_returns_json() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token/list")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body("userName=admin");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({"status": "success", "data": {"records": [{"tokenId": 1}], "total": 1}}));
            })
            .await;

        let result = form_client(&server)
            .list(&payload(json!({"userName": "admin"})))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result["data"]["total"], json!(1));
        assert_eq!(result["data"]["records"][0]["tokenId"], json!(1));
    }

    #[tokio::test]
    async fn create_with_json_encoding_sends_json_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token/create")
                    .json_body(json!({"userId": 100000, "description": "ci"}));
                then.status(200).json_body(json!({"tokenId": 9}));
            })
            .await;

        let mut settings = settings_for(&server.base_url());
        settings.body_encoding = BodyEncoding::Json;
        let transport = HttpTransport::new(&settings, None).unwrap();
        let client = TokenApiClient::new(transport, EndpointRegistry::default());

        let result = client
            .create(&payload(json!({"userId": 100000, "description": "ci"})))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, json!({"tokenId": 9}));
    }

    #[tokio::test]
    async fn delete_token_sends_identifier_as_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/token/delete")
                    .query_param("tokenId", "42");
                then.status(200).json_body(json!({"status": "success"}));
            })
            .await;

        let result = form_client(&server)
            .delete_token(&payload(json!({"tokenId": 42})))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, json!({"status": "success"}));
    }

    #[tokio::test]
    async fn copy_curl_plain_text_body_becomes_string() {
        let curl = "curl -X POST 'http://console/flink/app/start' -H 'Authorization: 69qMW7reOSuVl'";
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token/curl").body("tokenId=42");
                then.status(200).header("Content-Type", "text/plain").body(curl);
            })
            .await;

        let result = form_client(&server)
            .copy_curl(&payload(json!({"tokenId": 42})))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, Value::String(curl.to_owned()));
    }

    #[tokio::test]
    async fn auth_header_is_attached() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token/toggle")
                    .header("Authorization", "Bearer s3cret");
                then.status(200).body("");
            })
            .await;

        let transport = HttpTransport::new(&settings_for(&server.base_url()), Some(bearer_auth("s3cret"))).unwrap();
        let client = TokenApiClient::new(transport, EndpointRegistry::default());

        let result = client
            .update_token_status(&payload(json!({"tokenId": 3, "status": 1})))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, Value::Null);
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_body_and_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token/create");
                then.status(500).body("{\"message\":\"user not found\"}");
            })
            .await;

        let mut settings = settings_for(&server.base_url());
        settings.retry = Some(RetryConfig { attempts: Some(3), base_delay_ms: Some(1), max_delay_ms: Some(2) });
        let transport = HttpTransport::new(&settings, None).unwrap();
        let client = TokenApiClient::new(transport, EndpointRegistry::default());

        let err = client
            .create(&payload(json!({"userId": 1})))
            .await
            .unwrap_err();

        // exactly one call: status errors are never retried
        mock.assert_async().await;
        match err {
            TransportError::Status { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "{\"message\":\"user not found\"}");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn connection_failure_surfaces_as_retryable_request_error() {
        let mut settings = settings_for(&closed_port_url().await);
        settings.retry = Some(RetryConfig { attempts: Some(2), base_delay_ms: Some(1), max_delay_ms: Some(2) });
        let transport = HttpTransport::new(&settings, None).unwrap();
        let client = TokenApiClient::new(transport, EndpointRegistry::default());

        let err = client.list(&payload(json!({}))).await.unwrap_err();

        assert!(matches!(err, TransportError::Request(_)), "unexpected error: {:?}", err);
        assert!(err.is_retryable());
        assert_eq!(err.reason(), "connect");
    }

    #[tokio::test]
    async fn unresolvable_auth_fails_before_sending() {
        let auth = serde_yaml::from_str("value:\n  from_env: TOKEN_CONSOLE_TEST_UNSET_SECRET\n").unwrap();
        let transport = HttpTransport::new(&settings_for("http://127.0.0.1:9"), Some(auth)).unwrap();
        let client = TokenApiClient::new(transport, EndpointRegistry::default());

        let err = client.list(&payload(json!({}))).await.unwrap_err();

        assert!(matches!(err, TransportError::Auth(_)), "unexpected error: {:?}", err);
        assert_eq!(err.reason(), "auth");
    }

    #[tokio::test]
    async fn connection_failure_is_retried_with_backoff() {
        let mut settings = settings_for(&closed_port_url().await);
        settings.retry = Some(RetryConfig { attempts: Some(3), base_delay_ms: Some(50), max_delay_ms: Some(1000) });
        let transport = HttpTransport::new(&settings, None).unwrap();
        let client = TokenApiClient::new(transport, EndpointRegistry::default());

        let start = Instant::now();
        let err = client.list(&payload(json!({}))).await.unwrap_err();
        let elapsed = start.elapsed();

        // three attempts sleep 50ms then 100ms in between
        assert!(err.is_retryable(), "unexpected error: {:?}", err);
        assert!(elapsed >= Duration::from_millis(150), "retried too fast: {:?}", elapsed);
    }

    #[tokio::test]
    async fn single_attempt_by_default_does_not_wait() {
        let settings = settings_for(&closed_port_url().await);
        let transport = HttpTransport::new(&settings, None).unwrap();

        let start = Instant::now();
        let err = transport.post("/token/list", &payload(json!({}))).await.unwrap_err();

        assert_eq!(err.reason(), "connect");
        assert!(start.elapsed() < Duration::from_millis(200), "{:?}", start.elapsed());
    }

    #[tokio::test]
    async fn get_sends_payload_as_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/token/search")
                    .query_param("userName", "admin")
                    .query_param("pageNum", "2");
                then.status(200).json_body(json!({"total": 0}));
            })
            .await;

        let transport = HttpTransport::new(&settings_for(&server.base_url()), None).unwrap();
        let result = transport
            .get("/token/search", &payload(json!({"userName": "admin", "pageNum": 2, "skip": null})))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, json!({"total": 0}));
    }

    #[tokio::test]
    async fn failed_request_is_recorded_in_metrics() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/metrics-check/create");
                then.status(500).body("boom");
            })
            .await;

        let endpoints = EndpointRegistry { create: "/metrics-check/create".to_owned(), ..EndpointRegistry::default() };
        let transport = HttpTransport::new(&settings_for(&server.base_url()), None).unwrap();
        let client = TokenApiClient::new(transport, endpoints);

        let err = client.create(&payload(json!({"userId": 1}))).await.unwrap_err();
        assert_eq!(err.reason(), "status");
        mock.assert_async().await;

        let text = metrics::render().await.unwrap();
        let path = "/metrics-check/create";
        assert_eq!(sample(&text, "tokenconsole_requests_total{", path).as_deref(), Some("1"), "{}", text);
        assert_eq!(
            sample(&text, "tokenconsole_request_failures_total{", path).as_deref(),
            Some("1"),
            "{}",
            text
        );
        assert!(text.lines().any(|line| line.starts_with("tokenconsole_request_failures_total{")
            && line.contains(path)
            && line.contains("reason=\"status\"")));
        assert_eq!(
            sample(&text, "tokenconsole_request_duration_seconds_count{", path).as_deref(),
            Some("1"),
            "{}",
            text
        );
    }
}
