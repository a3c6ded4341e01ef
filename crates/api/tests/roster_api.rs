//! HTTP-level integration tests for the roster listings.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post, post_json, put_json, seed_stall};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn enqueue(pool: &PgPool, stall_id: i64, student_id: i64, category: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/queue/enqueue",
        json!({ "stall_id": stall_id, "student_id": student_id, "category": category }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn list(pool: &PgPool, uri: &str) -> Vec<Value> {
    let response = get(build_test_app(pool.clone()), uri).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    body_json(response).await["data"].as_array().unwrap().clone()
}

fn student_ids(rows: &[Value]) -> Vec<i64> {
    rows.iter().map(|r| r["student_id"].as_i64().unwrap()).collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stall_prelisted_follows_preferences(pool: PgPool) {
    let stall = seed_stall(&pool, 7).await;
    enqueue(&pool, stall, 1, "pre_listed").await;
    let second = enqueue(&pool, stall, 2, "pre_listed").await;
    enqueue(&pool, stall, 3, "walk_in").await;

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/interviews/{second}/student-preference"),
        json!({ "preference": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let rows = list(&pool, &format!("/api/v1/stalls/{stall}/prelisted")).await;
    assert_eq!(student_ids(&rows), vec![2, 1]);

    let rows = list(&pool, &format!("/api/v1/stalls/{stall}/walkin")).await;
    assert_eq!(student_ids(&rows), vec![3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn company_listings_and_counts(pool: PgPool) {
    let first = seed_stall(&pool, 7).await;
    let second = seed_stall(&pool, 7).await;
    enqueue(&pool, first, 1, "walk_in").await;
    enqueue(&pool, second, 2, "walk_in").await;
    enqueue(&pool, second, 3, "pre_listed").await;

    let all = list(&pool, "/api/v1/companies/7/interviews").await;
    assert_eq!(student_ids(&all), vec![3, 1, 2]);

    let walk_ins = list(&pool, "/api/v1/companies/7/interviews?category=walk_in").await;
    assert_eq!(student_ids(&walk_ins), vec![1, 2]);
    assert_eq!(list(&pool, "/api/v1/companies/7/prelisted").await.len(), 1);
    assert_eq!(list(&pool, "/api/v1/companies/7/walkin").await.len(), 2);

    let response = get(build_test_app(pool.clone()), "/api/v1/companies/7/walkin/count").await;
    assert_eq!(body_json(response).await["data"]["count"], 2);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/stalls/{first}/walkin/count"),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["count"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn student_listing_spans_stalls(pool: PgPool) {
    let first = seed_stall(&pool, 7).await;
    let second = seed_stall(&pool, 8).await;
    enqueue(&pool, first, 5, "pre_listed").await;
    enqueue(&pool, second, 5, "walk_in").await;
    enqueue(&pool, second, 6, "walk_in").await;

    let rows = list(&pool, "/api/v1/students/5/interviews").await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["category"], "pre_listed");

    let rows = list(&pool, "/api/v1/students/5/interviews?category=walk_in").await;
    assert_eq!(rows.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn next_walk_ins_respects_count_and_ownership(pool: PgPool) {
    let stall = seed_stall(&pool, 7).await;
    for student in 1..=3 {
        enqueue(&pool, stall, student, "walk_in").await;
    }

    let rows = list(&pool, &format!("/api/v1/companies/7/stalls/{stall}/walkin/next?count=2")).await;
    assert_eq!(student_ids(&rows), vec![1, 2]);

    let rows = list(&pool, &format!("/api/v1/companies/7/stalls/{stall}/walkin/next")).await;
    assert_eq!(student_ids(&rows), vec![1]);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/companies/8/stalls/{stall}/walkin/next"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/companies/7/stalls/{stall}/walkin/next?count=0"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stall_listing_of_unknown_stall_is_404(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/stalls/999/prelisted").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn scheduled_company_rosters_skip_started_and_cancelled(pool: PgPool) {
    let stall = seed_stall(&pool, 7).await;
    let started = enqueue(&pool, stall, 1, "walk_in").await;
    enqueue(&pool, stall, 2, "walk_in").await;
    let cancelled = enqueue(&pool, stall, 3, "pre_listed").await;
    enqueue(&pool, stall, 4, "pre_listed").await;

    let app = build_test_app(pool.clone());
    let response = post(app, &format!("/api/v1/interviews/{started}/start")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let app = build_test_app(pool.clone());
    let response = post(app, &format!("/api/v1/interviews/{cancelled}/cancel")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let rows = list(&pool, "/api/v1/companies/7/walkin/scheduled").await;
    assert_eq!(student_ids(&rows), vec![2]);
    let rows = list(&pool, "/api/v1/companies/7/prelisted/scheduled").await;
    assert_eq!(student_ids(&rows), vec![4]);

    let rows = list(&pool, "/api/v1/companies/7/walkin").await;
    assert_eq!(student_ids(&rows), vec![1, 2]);
    let rows = list(&pool, "/api/v1/companies/7/walkin?status=in_progress").await;
    assert_eq!(student_ids(&rows), vec![1]);
    let rows = list(&pool, "/api/v1/companies/7/interviews?status=scheduled").await;
    assert_eq!(student_ids(&rows), vec![4, 2]);
    let rows = list(&pool, &format!("/api/v1/stalls/{stall}/prelisted?status=cancelled")).await;
    assert_eq!(student_ids(&rows), vec![3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_status_filter_is_a_validation_error(pool: PgPool) {
    seed_stall(&pool, 7).await;
    let response = get(build_test_app(pool), "/api/v1/companies/7/interviews?status=pending").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
