//! App and upstream fixtures

use fanout_gateway::Config;
use fanout_gateway::core::dispatch::BatchDispatcher;
use fanout_gateway::server::AppState;
use fanout_gateway::storage::RequestLogStore;
use actix_web::test::TestRequest;
use actix_web::web;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Shared state for an app under test
pub fn test_state(config: Config, request_log: Option<Arc<RequestLogStore>>) -> web::Data<AppState> {
    let dispatcher = BatchDispatcher::new(config.dispatch()).expect("dispatcher should build");
    let mut state = AppState::new(config, dispatcher, None);
    state.request_log = request_log;
    web::Data::new(state)
}

/// Mount a GET route answering `status` with `body` after `delay_ms`
pub async fn mount_get(server: &MockServer, route: &str, status: u16, body: &str, delay_ms: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(server)
        .await;
}

/// POST a JSON value to `uri`
pub fn post_json(uri: &str, body: &serde_json::Value) -> TestRequest {
    TestRequest::post().uri(uri).set_json(body)
}
