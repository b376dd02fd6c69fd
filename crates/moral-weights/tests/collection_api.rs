use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use moral_weights::survey::collection::{
    collection_router, CollectionService, ResponseStore, StoreError, StoredSubmission,
};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

#[derive(Default)]
struct VecStore {
    records: Mutex<Vec<StoredSubmission>>,
}

impl ResponseStore for VecStore {
    fn append(&self, record: StoredSubmission) -> Result<(), StoreError> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(record);
        Ok(())
    }

    fn load(&self) -> Result<Vec<StoredSubmission>, StoreError> {
        Ok(self.records.lock().expect("store mutex poisoned").clone())
    }
}

fn router() -> (axum::Router, Arc<VecStore>) {
    let store = Arc::new(VecStore::default());
    let service = Arc::new(CollectionService::new(store.clone(), "test-key"));
    (collection_router(service), store)
}

fn submit_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "203.0.113.7")
        .header(header::USER_AGENT, "collection-tests/1.0")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}

#[tokio::test]
async fn submissions_are_stored_with_origin_stamps() {
    let (app, store) = router();

    let response = app
        .oneshot(submit_request(
            "/api/submit",
            serde_json::json!({
                "sessionId": "sess_a",
                "scenarioId": "q1_x",
                "choice": "A",
                "eloRatings": {},
                "questionNumber": 1
            }),
        ))
        .await
        .expect("handler responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["id"].is_string());

    let records = store.records.lock().expect("store mutex poisoned");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ip, "203.0.113.7");
    assert_eq!(records[0].user_agent, "collection-tests/1.0");
    assert_eq!(records[0].session_id, "sess_a");
}

#[tokio::test]
async fn admin_reads_require_the_shared_key() {
    let (app, _store) = router();

    let denied = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/responses")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("handler responds");
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let wrong_key = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/stats?key=nope")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("handler responds");
    assert_eq!(wrong_key.status(), StatusCode::UNAUTHORIZED);

    let allowed = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/responses?key=test-key")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("handler responds");
    assert_eq!(allowed.status(), StatusCode::OK);
    let body = body_json(allowed).await;
    assert!(body["responses"].as_array().expect("array").is_empty());
}

#[tokio::test]
async fn stats_and_csv_reflect_flattened_sessions() {
    let (app, _store) = router();

    app.clone()
        .oneshot(submit_request(
            "/api/submit",
            serde_json::json!({
                "sessionId": "sess_a",
                "scenarioId": "q1_x",
                "choice": "B"
            }),
        ))
        .await
        .expect("handler responds");

    app.clone()
        .oneshot(submit_request(
            "/api/session",
            serde_json::json!({
                "sessionId": "sess_b",
                "sessionStart": "2026-01-10T12:00:00Z",
                "responses": [
                    { "scenarioId": "q1_y", "choice": "A", "category": "rescue" },
                    { "scenarioId": "q2_y", "choice": "B", "category": "food-ethics" }
                ]
            }),
        ))
        .await
        .expect("handler responds");

    let stats_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/stats?key=test-key")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("handler responds");
    assert_eq!(stats_response.status(), StatusCode::OK);
    let stats = body_json(stats_response).await;
    assert_eq!(stats["totalRecords"], 2);
    assert_eq!(stats["uniqueSubmitters"], 1);
    assert_eq!(stats["uniqueSessions"], 2);
    assert!(stats["firstRecord"].is_string());

    let csv_response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/csv?key=test-key")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("handler responds");
    assert_eq!(csv_response.status(), StatusCode::OK);
    assert_eq!(
        csv_response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/csv")
    );
    let bytes = axum::body::to_bytes(csv_response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let csv = String::from_utf8(bytes.to_vec()).expect("csv is utf8");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4, "header, one response, two session rows");
    assert!(lines[0].starts_with("id,timestamp,ip,sessionId"));
    assert!(lines[1].contains("q1_x"));
    assert!(lines[3].contains("q2_y"));
}

#[tokio::test]
async fn malformed_bodies_are_rejected_without_storing() {
    let (app, store) = router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/submit")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .expect("request builds"),
        )
        .await
        .expect("handler responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.records.lock().expect("store mutex poisoned").is_empty());
}
