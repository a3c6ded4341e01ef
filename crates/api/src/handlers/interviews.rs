//! Handlers for individual interview requests: lookup, lifecycle
//! transitions and record maintenance.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use careerfair_core::error::CoreError;
use careerfair_core::lifecycle::LifecycleAction;
use careerfair_core::types::DbId;
use careerfair_db::models::interview_request::{InterviewView, SetRemark, SetStudentPreference};
use careerfair_db::repositories::InterviewRequestRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "InterviewRequest",
        id,
    })
}

/// GET /api/v1/interviews/{id}
pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let request = InterviewRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse {
        data: InterviewView::from(request),
    }))
}

async fn transition(
    state: &AppState,
    id: DbId,
    action: LifecycleAction,
) -> AppResult<Json<DataResponse<InterviewView>>> {
    let request = InterviewRequestRepo::transition(&state.pool, id, action).await?;
    Ok(Json(DataResponse {
        data: InterviewView::from(request),
    }))
}

/// POST /api/v1/interviews/{id}/start
pub async fn start_interview(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    transition(&state, id, LifecycleAction::Start).await
}

/// POST /api/v1/interviews/{id}/complete
pub async fn complete_interview(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    transition(&state, id, LifecycleAction::Finish).await
}

/// POST /api/v1/interviews/{id}/cancel
pub async fn cancel_interview(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    transition(&state, id, LifecycleAction::Cancel).await
}

/// PUT /api/v1/interviews/{id}/student-preference
pub async fn set_student_preference(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<SetStudentPreference>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let request = InterviewRequestRepo::set_student_preference(&state.pool, id, input.preference)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        request_id = id,
        preference = input.preference,
        "Student preference updated",
    );

    Ok(Json(DataResponse {
        data: InterviewView::from(request),
    }))
}

/// PUT /api/v1/interviews/{id}/remark
pub async fn set_remark(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<SetRemark>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let request = InterviewRequestRepo::set_remark(&state.pool, id, input.remark.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(request_id = id, "Interview remark updated");

    Ok(Json(DataResponse {
        data: InterviewView::from(request),
    }))
}

/// DELETE /api/v1/interviews/{id}/prelisted
///
/// Physically removes a pre-listed request and re-ranks the company's
/// remaining round-1 requests. Returns the removed record.
pub async fn remove_prelisted(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let removed = InterviewRequestRepo::remove_prelisted(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: InterviewView::from(removed),
    }))
}
