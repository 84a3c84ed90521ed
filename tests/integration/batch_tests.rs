//! End-to-end batch dispatch through the HTTP app

#[cfg(test)]
mod tests {
    use crate::common::{mount_get, post_json, test_state};
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use fanout_gateway::Config;
    use fanout_gateway::server::HttpServer;
    use fanout_gateway::server::routes::envelope::ResponseEnvelope;
    use serde_json::json;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    macro_rules! gateway {
        ($config:expr) => {
            test::init_service(HttpServer::create_app(test_state($config, None))).await
        };
        () => {
            gateway!(Config::default())
        };
    }

    #[actix_web::test]
    async fn test_mixed_batch_preserves_positions() {
        let server = MockServer::start().await;
        mount_get(&server, "/ok", 200, "fine", 0).await;
        Mock::given(method("POST"))
            .and(path("/p"))
            .and(body_string(r#"{"a":1}"#))
            .respond_with(ResponseTemplate::new(200).set_body_string("posted"))
            .expect(1)
            .mount(&server)
            .await;

        let app = gateway!();
        let req = post_json(
            "/makeRequests",
            &json!({"requests": [
                {"url": format!("{}/ok", server.uri()), "method": "GET"},
                {"url": "", "method": "GET"},
                {"url": format!("{}/p", server.uri()), "method": "POST", "body": "eyJhIjoxfQ=="},
            ]}),
        )
        .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body,
            json!({"responses": [
                {"index": 0, "responsecode": 200, "response": "fine"},
                {"index": 1, "error": "missing url"},
                {"index": 2, "responsecode": 200, "response": "posted"},
            ]})
        );
    }

    #[actix_web::test]
    async fn test_non_success_status_is_completed() {
        let server = MockServer::start().await;
        mount_get(&server, "/missing", 404, "not here", 0).await;
        mount_get(&server, "/broken", 500, "oops", 0).await;

        let app = gateway!();
        let req = post_json(
            "/makeRequests",
            &json!({"requests": [
                {"url": format!("{}/missing", server.uri()), "method": "GET"},
                {"url": format!("{}/broken", server.uri()), "method": "GET"},
            ]}),
        )
        .to_request();
        let body: ResponseEnvelope = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.responses[0].response_code, Some(404));
        assert_eq!(body.responses[0].response.as_deref(), Some("not here"));
        assert_eq!(body.responses[1].response_code, Some(500));
        assert!(body.responses.iter().all(|r| r.error.is_none()));
    }

    #[actix_web::test]
    async fn test_order_follows_submission_not_completion() {
        let server = MockServer::start().await;
        mount_get(&server, "/slow", 200, "first", 400).await;
        mount_get(&server, "/fast", 200, "second", 0).await;

        let app = gateway!();
        let req = post_json(
            "/makeRequests",
            &json!({"requests": [
                {"url": format!("{}/slow", server.uri()), "method": "GET"},
                {"url": format!("{}/fast", server.uri()), "method": "GET"},
            ]}),
        )
        .to_request();
        let body: ResponseEnvelope = test::call_and_read_body_json(&app, req).await;

        let order: Vec<_> = body
            .responses
            .iter()
            .map(|r| (r.index, r.response.clone().unwrap_or_default()))
            .collect();
        assert_eq!(
            order,
            vec![(0, "first".to_string()), (1, "second".to_string())]
        );
    }

    #[actix_web::test]
    async fn test_batch_runs_concurrently() {
        let server = MockServer::start().await;
        mount_get(&server, "/wait", 200, "done", 300).await;

        let app = gateway!();
        let requests: Vec<_> = (0..5)
            .map(|_| json!({"url": format!("{}/wait", server.uri()), "method": "GET"}))
            .collect();
        let req = post_json("/makeRequests", &json!({ "requests": requests })).to_request();

        let start = Instant::now();
        let body: ResponseEnvelope = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.responses.len(), 5);
        assert!(start.elapsed() < Duration::from_millis(1500));
    }

    #[actix_web::test]
    async fn test_validation_failures_make_no_calls() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = gateway!();
        let req = post_json(
            "/makeRequests",
            &json!({"requests": [
                {"url": format!("{}/a", server.uri())},
                {"url": format!("{}/b", server.uri()), "method": "POST", "body": "!!!"},
            ]}),
        )
        .to_request();
        let body: ResponseEnvelope = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.responses[0].error.as_deref(), Some("missing method"));
        assert!(
            body.responses[1]
                .error
                .as_deref()
                .is_some_and(|e| e.starts_with("invalid request body"))
        );
    }

    #[actix_web::test]
    async fn test_malformed_envelope_rejected_without_calls() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = gateway!();
        let payload = format!(r#"{{"requests":[{{"url":"{}/a","method":"GET"}}"#, server.uri());
        let req = TestRequest::post()
            .uri("/makeRequests")
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_null_fields_fail_only_their_item() {
        let server = MockServer::start().await;
        mount_get(&server, "/ok", 200, "fine", 0).await;

        let app = gateway!();
        let req = post_json(
            "/makeRequests",
            &json!({"requests": [
                {"url": null, "method": "GET"},
                {"url": format!("{}/ok", server.uri()), "method": "GET"},
                {"url": format!("{}/ok", server.uri()), "method": null},
            ]}),
        )
        .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body,
            json!({"responses": [
                {"index": 0, "error": "missing url"},
                {"index": 1, "responsecode": 200, "response": "fine"},
                {"index": 2, "error": "missing method"},
            ]})
        );
    }

    #[actix_web::test]
    async fn test_array_envelope_rejected_without_calls() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = gateway!();
        let target = format!("{}/a", server.uri());
        for (uri, payload) in [
            ("/makeRequests", json!([])),
            ("/makeRequests", json!([[{"url": target, "method": "GET"}]])),
            ("/makeRequest", json!([target, "GET"])),
        ] {
            let resp = test::call_service(&app, post_json(uri, &payload).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{} {}", uri, payload);
        }
    }

    #[actix_web::test]
    async fn test_envelope_error_carries_request_id() {
        let app = gateway!();
        let req = TestRequest::post()
            .uri("/makeRequests")
            .insert_header(("x-request-id", "trace-123"))
            .set_payload("[]")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["request_id"], "trace-123");
    }

    #[actix_web::test]
    async fn test_empty_batch_returns_empty_list() {
        let app = gateway!();
        let req = post_json("/makeRequests", &json!({"requests": []})).to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, r#"{"responses":[]}"#);
    }

    #[actix_web::test]
    async fn test_non_post_rejected() {
        let app = gateway!();
        for req in [
            TestRequest::get().uri("/makeRequests").to_request(),
            TestRequest::put().uri("/makeRequests").to_request(),
            TestRequest::delete().uri("/makeRequest").to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        }
    }

    #[actix_web::test]
    async fn test_item_timeout_is_per_item() {
        let server = MockServer::start().await;
        mount_get(&server, "/quick", 200, "quick", 0).await;
        mount_get(&server, "/stuck", 200, "late", 3_000).await;

        let mut config = Config::default();
        config.gateway.dispatch.item_timeout_ms = Some(300);
        let app = gateway!(config);
        let req = post_json(
            "/makeRequests",
            &json!({"requests": [
                {"url": format!("{}/stuck", server.uri()), "method": "GET"},
                {"url": format!("{}/quick", server.uri()), "method": "GET"},
            ]}),
        )
        .to_request();
        let body: ResponseEnvelope = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body.responses[0].error.as_deref(),
            Some("request timed out after 300ms")
        );
        assert_eq!(body.responses[1].response.as_deref(), Some("quick"));
    }

    #[actix_web::test]
    async fn test_connection_close_when_keep_alive_disabled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/c"))
            .and(header("connection", "close"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let app = gateway!();
        let req = post_json(
            "/makeRequest",
            &json!({"url": format!("{}/c", server.uri()), "method": "GET"}),
        )
        .to_request();
        let body: ResponseEnvelope = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.responses[0].response_code, Some(200));
    }
}
