use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::domain::{ResponsePayload, SessionPayload, SubmitterMeta};
use super::service::CollectionService;
use super::store::ResponseStore;

/// Router builder exposing the write endpoints and the key-gated admin reads.
pub fn collection_router<S>(service: Arc<CollectionService<S>>) -> Router
where
    S: ResponseStore + 'static,
{
    Router::new()
        .route("/api/submit", post(submit_response_handler::<S>))
        .route("/api/session", post(submit_session_handler::<S>))
        .route("/api/admin/responses", get(admin_responses_handler::<S>))
        .route("/api/admin/stats", get(admin_stats_handler::<S>))
        .route("/api/admin/csv", get(admin_csv_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminKeyQuery {
    key: Option<String>,
}

/// Proxy-aware origin stamp; falls back to "unknown" rather than rejecting.
fn submitter_meta(headers: &HeaderMap) -> SubmitterMeta {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok());

    let ip = forwarded.or(real_ip).unwrap_or("unknown").to_string();

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    SubmitterMeta { ip, user_agent }
}

fn store_failure(err: impl std::fmt::Display) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}

fn unauthorized() -> Response {
    let payload = json!({ "error": "Unauthorized" });
    (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_response_handler<S>(
    State(service): State<Arc<CollectionService<S>>>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<ResponsePayload>,
) -> Response
where
    S: ResponseStore + 'static,
{
    let meta = submitter_meta(&headers);
    match service.record_response(meta, payload) {
        Ok(record) => {
            info!(session = %record.session_id, "stored response submission");
            (
                StatusCode::OK,
                axum::Json(json!({ "success": true, "id": record.id })),
            )
                .into_response()
        }
        Err(err) => store_failure(err),
    }
}

pub(crate) async fn submit_session_handler<S>(
    State(service): State<Arc<CollectionService<S>>>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<SessionPayload>,
) -> Response
where
    S: ResponseStore + 'static,
{
    let meta = submitter_meta(&headers);
    match service.record_session(meta, payload) {
        Ok(record) => {
            info!(session = %record.session_id, "stored session submission");
            (
                StatusCode::OK,
                axum::Json(json!({ "success": true, "id": record.id })),
            )
                .into_response()
        }
        Err(err) => store_failure(err),
    }
}

pub(crate) async fn admin_responses_handler<S>(
    State(service): State<Arc<CollectionService<S>>>,
    Query(query): Query<AdminKeyQuery>,
) -> Response
where
    S: ResponseStore + 'static,
{
    if !service.authorize(query.key.as_deref()) {
        return unauthorized();
    }

    match service.records() {
        Ok(records) => (
            StatusCode::OK,
            axum::Json(json!({ "responses": records })),
        )
            .into_response(),
        Err(err) => store_failure(err),
    }
}

pub(crate) async fn admin_stats_handler<S>(
    State(service): State<Arc<CollectionService<S>>>,
    Query(query): Query<AdminKeyQuery>,
) -> Response
where
    S: ResponseStore + 'static,
{
    if !service.authorize(query.key.as_deref()) {
        return unauthorized();
    }

    match service.stats() {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(err) => store_failure(err),
    }
}

pub(crate) async fn admin_csv_handler<S>(
    State(service): State<Arc<CollectionService<S>>>,
    Query(query): Query<AdminKeyQuery>,
) -> Response
where
    S: ResponseStore + 'static,
{
    if !service.authorize(query.key.as_deref()) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    match service.export_csv() {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"moral-weights-responses.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(err) => store_failure(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitter_meta_prefers_the_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.7, 10.0.0.2".parse().expect("valid header"),
        );
        headers.insert("x-real-ip", "10.0.0.9".parse().expect("valid header"));
        headers.insert(header::USER_AGENT, "probe/1.0".parse().expect("valid header"));

        let meta = submitter_meta(&headers);
        assert_eq!(meta.ip, "203.0.113.7");
        assert_eq!(meta.user_agent, "probe/1.0");
    }

    #[test]
    fn submitter_meta_falls_back_to_real_ip_then_unknown() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "10.0.0.9".parse().expect("valid header"));
        assert_eq!(submitter_meta(&headers).ip, "10.0.0.9");

        let empty = HeaderMap::new();
        let meta = submitter_meta(&empty);
        assert_eq!(meta.ip, "unknown");
        assert_eq!(meta.user_agent, "unknown");
    }
}
