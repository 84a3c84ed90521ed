//! Request log persistence through the HTTP app
//!
//! Uses a real in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::common::{TestDatabase, mount_get, post_json, test_state};
    use actix_web::test;
    use fanout_gateway::Config;
    use fanout_gateway::core::dispatch::CompletedCall;
    use fanout_gateway::server::HttpServer;
    use fanout_gateway::server::routes::envelope::ResponseEnvelope;
    use serde_json::json;
    use wiremock::MockServer;

    #[tokio::test]
    async fn test_health_check_after_migration() {
        let db = TestDatabase::new().await;
        assert!(db.store().health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_migration_is_idempotent() {
        let db = TestDatabase::new().await;
        assert!(db.store().migrate().await.is_ok());
    }

    #[tokio::test]
    async fn test_record_and_read_back() {
        let db = TestDatabase::new().await;
        let calls = vec![
            CompletedCall {
                url: "http://a/1".to_string(),
                method: "GET".to_string(),
                status_code: 200,
            },
            CompletedCall {
                url: "http://a/2".to_string(),
                method: "DELETE".to_string(),
                status_code: 404,
            },
        ];

        assert_eq!(db.store().record(&calls).await.unwrap(), 2);
        assert_eq!(db.store().record(&[]).await.unwrap(), 0);

        let rows = db.store().recent(10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].url, "http://a/2");
        assert_eq!(rows[0].response_code, 404);
        assert_eq!(rows[1].method, "GET");
    }

    #[actix_web::test]
    async fn test_batch_records_only_completed_items() {
        let server = MockServer::start().await;
        mount_get(&server, "/ok", 200, "ok", 0).await;
        mount_get(&server, "/gone", 410, "gone", 0).await;

        let db = TestDatabase::new().await;
        let app = test::init_service(HttpServer::create_app(test_state(
            Config::default(),
            Some(db.store_arc()),
        )))
        .await;

        let req = post_json(
            "/makeRequests",
            &json!({"requests": [
                {"url": format!("{}/ok", server.uri()), "method": "GET"},
                {"url": "", "method": "GET"},
                {"url": format!("{}/gone", server.uri()), "method": "GET"},
            ]}),
        )
        .to_request();
        let body: ResponseEnvelope = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.responses.len(), 3);

        let rows = db.wait_for_rows(2).await;
        assert_eq!(rows.len(), 2);
        let mut codes: Vec<i32> = rows.iter().map(|r| r.response_code).collect();
        codes.sort();
        assert_eq!(codes, vec![200, 410]);
        assert!(rows.iter().all(|r| r.method == "GET"));
    }
}
