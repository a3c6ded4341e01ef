//! Handlers for queue admission and the live queue view.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use careerfair_core::error::CoreError;
use careerfair_core::queue_view::build_view;
use careerfair_core::types::DbId;
use careerfair_db::models::interview_request::{EnqueueInterview, EnqueueOutcome, InterviewView};
use careerfair_db::repositories::{InterviewRequestRepo, StallRepo};
use serde::Serialize;
use serde_json::Value;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::query::ConfirmParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound on items accepted by one bulk enqueue call.
pub const MAX_BULK_ITEMS: usize = 500;

/// An admitted (or already present) request.
#[derive(Debug, Serialize)]
pub struct EnqueueResult {
    #[serde(flatten)]
    pub interview: InterviewView,
    /// `false` when an identical active request already existed.
    pub created: bool,
}

impl From<EnqueueOutcome> for EnqueueResult {
    fn from(outcome: EnqueueOutcome) -> Self {
        Self {
            interview: outcome.request.into(),
            created: outcome.created,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BulkFailure {
    /// Zero-based index of the item in the request body.
    pub index: usize,
    /// The item as sent, including items that failed to decode.
    pub input: Value,
    /// Same shape as a single-call error body.
    pub error: Value,
}

#[derive(Debug, Serialize)]
pub struct BulkSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct BulkEnqueueResponse {
    pub successful: Vec<EnqueueResult>,
    pub failed: Vec<BulkFailure>,
    pub summary: BulkSummary,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub deleted: u64,
}

async fn enqueue_one(state: &AppState, input: &EnqueueInterview) -> AppResult<EnqueueOutcome> {
    input.validate()?;
    Ok(InterviewRequestRepo::enqueue(&state.pool, input).await?)
}

/// POST /api/v1/queue/enqueue
///
/// Returns 201 for a new request and 200 when the same student already holds
/// an active request of that tier at the stall.
pub async fn enqueue(
    State(state): State<AppState>,
    AppJson(input): AppJson<EnqueueInterview>,
) -> AppResult<impl IntoResponse> {
    let outcome = enqueue_one(&state, &input).await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(DataResponse {
            data: EnqueueResult::from(outcome),
        }),
    ))
}

/// POST /api/v1/queue/enqueue/bulk
///
/// Each item is decoded and admitted on its own; a failing item never aborts
/// the rest.
pub async fn bulk_enqueue(
    State(state): State<AppState>,
    AppJson(items): AppJson<Vec<Value>>,
) -> AppResult<impl IntoResponse> {
    if items.len() > MAX_BULK_ITEMS {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Bulk enqueue accepts at most {MAX_BULK_ITEMS} items, got {}",
            items.len()
        ))));
    }

    let total = items.len();
    let mut successful = Vec::new();
    let mut failed = Vec::new();

    for (index, input) in items.into_iter().enumerate() {
        let result = match serde_json::from_value::<EnqueueInterview>(input.clone()) {
            Ok(item) => enqueue_one(&state, &item).await,
            Err(err) => Err(AppError::Core(CoreError::Validation(format!(
                "Invalid enqueue item: {err}"
            )))),
        };
        match result {
            Ok(outcome) => successful.push(EnqueueResult::from(outcome)),
            Err(err) => {
                let (_, error) = err.to_status_and_body();
                failed.push(BulkFailure {
                    index,
                    input,
                    error,
                });
            }
        }
    }

    tracing::info!(
        total,
        successful = successful.len(),
        failed = failed.len(),
        "Bulk enqueue finished",
    );

    let summary = BulkSummary {
        total,
        successful: successful.len(),
        failed: failed.len(),
    };

    Ok(Json(DataResponse {
        data: BulkEnqueueResponse {
            successful,
            failed,
            summary,
        },
    }))
}

/// POST /api/v1/queue/reset?confirm=true
///
/// Deletes every interview request. Refused unless `confirm=true`.
pub async fn reset_queues(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ConfirmParams>,
) -> AppResult<impl IntoResponse> {
    if !params.confirm {
        return Err(AppError::Core(CoreError::Validation(
            "Resetting all queues requires confirm=true".to_string(),
        )));
    }

    let deleted = InterviewRequestRepo::reset_all(&state.pool).await?;
    tracing::warn!(deleted, "All interview queues reset");

    Ok(Json(DataResponse {
        data: ResetResponse { deleted },
    }))
}

/// GET /api/v1/stalls/{stall_id}/queue
///
/// The live queue in service order with buffer slots after the round-1 run.
pub async fn view_queue(
    State(state): State<AppState>,
    Path(stall_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entries = active_members(&state, stall_id).await?;
    Ok(Json(DataResponse {
        data: build_view(entries),
    }))
}

/// GET /api/v1/stalls/{stall_id}/queue/members
pub async fn list_queue_members(
    State(state): State<AppState>,
    Path(stall_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entries = active_members(&state, stall_id).await?;
    Ok(Json(DataResponse { data: entries }))
}

async fn active_members(state: &AppState, stall_id: DbId) -> AppResult<Vec<InterviewView>> {
    let queue = StallRepo::resolve_queue(&state.pool, stall_id).await?;
    let rows = InterviewRequestRepo::list_active_by_queue(&state.pool, queue.queue_id).await?;
    Ok(rows.into_iter().map(InterviewView::from).collect())
}
