//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly or drive a router with no state, and
//! need no server or database.

use assert_matches::assert_matches;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::Router;
use careerfair_api::error::AppError;
use careerfair_api::extract::{AppJson, AppQuery};
use careerfair_api::query::NextWalkInParams;
use careerfair_core::error::CoreError;
use careerfair_db::models::interview_request::SetStudentPreference;
use careerfair_db::RepoError;
use http_body_util::BodyExt;
use tower::ServiceExt;
use validator::Validate;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Stall",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Stall with id 42 not found");
}

#[tokio::test]
async fn malformed_token_is_a_validation_error() {
    let err = AppError::Core(CoreError::MalformedPriorityToken("12_x".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn round_gate_is_distinct_from_validation() {
    let err = AppError::Core(CoreError::RoundGateViolation { required_round: 2 });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "ROUND_GATE_VIOLATION");
    assert_eq!(json["required_round"], 2);
}

#[tokio::test]
async fn invalid_transition_returns_409() {
    let err = AppError::Core(CoreError::InvalidTransition {
        from: "completed",
        to: "cancelled",
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn pool_timeout_is_storage_unavailable() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::PoolTimedOut)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "STORAGE_UNAVAILABLE");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let err = AppError::Core(CoreError::Internal("positions not dense".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn repo_errors_unwrap_to_their_source() {
    let err: AppError = RepoError::Core(CoreError::Validation("bad".into())).into();
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad");

    let err: AppError = RepoError::Database(sqlx::Error::RowNotFound).into();
    let (status, _) = error_to_response(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn validator_errors_become_validation_errors() {
    let input = SetStudentPreference { preference: 0 };
    let err: AppError = input.validate().unwrap_err().into();
    assert_matches!(err, AppError::Core(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Extractor rejections
// ---------------------------------------------------------------------------

async fn echo_preference(AppJson(input): AppJson<SetStudentPreference>) -> String {
    input.preference.to_string()
}

async fn echo_count(AppQuery(params): AppQuery<NextWalkInParams>) -> String {
    params.count.to_string()
}

fn extractor_app() -> Router {
    Router::new()
        .route("/preference", put(echo_preference))
        .route("/next", get(echo_count))
}

async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = extractor_app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn put_body(body: &'static str) -> Request<Body> {
    Request::put("/preference")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn syntactically_broken_json_is_a_validation_error() {
    let (status, json) = send(put_body("{\"preference\":")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn mistyped_json_field_is_a_validation_error() {
    let (status, json) = send(put_body("{\"preference\":\"first\"}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_content_type_is_a_validation_error() {
    let request = Request::put("/preference")
        .body(Body::from("{\"preference\":1}"))
        .unwrap();
    let (status, json) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn non_numeric_query_is_a_validation_error() {
    let request = Request::get("/next?count=abc").body(Body::empty()).unwrap();
    let (status, json) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
