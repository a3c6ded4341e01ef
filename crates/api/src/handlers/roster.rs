//! Handlers for the read-only roster listings.
//!
//! Pre-listed requests are ordered by student preference, then company
//! preference, then arrival; walk-ins by arrival. These listings include
//! every status unless `?status=` narrows them, and say nothing about live
//! queue positions.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use careerfair_core::error::CoreError;
use careerfair_core::lifecycle::InterviewStatus;
use careerfair_core::priority::Category;
use careerfair_core::types::DbId;
use careerfair_db::models::interview_request::{InterviewRequest, InterviewView};
use careerfair_db::repositories::{RosterFilter, RosterRepo, RosterScope, StallRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppQuery;
use crate::query::{NextWalkInParams, RosterParams, StatusParams};
use crate::response::{CountResponse, DataResponse};
use crate::state::AppState;

fn views(rows: Vec<InterviewRequest>) -> Vec<InterviewView> {
    rows.into_iter().map(InterviewView::from).collect()
}

async fn ensure_stall(state: &AppState, stall_id: DbId) -> AppResult<()> {
    StallRepo::find_by_id(&state.pool, stall_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Stall",
            id: stall_id,
        }))?;
    Ok(())
}

async fn list_scope(
    state: &AppState,
    scope: RosterScope,
    filter: RosterFilter,
) -> AppResult<Vec<InterviewView>> {
    let rows = RosterRepo::list(&state.pool, scope, filter).await?;
    Ok(views(rows))
}

// ---------------------------------------------------------------------------
// Stall scope
// ---------------------------------------------------------------------------

/// GET /api/v1/stalls/{stall_id}/prelisted?status=
pub async fn list_prelisted_by_stall(
    State(state): State<AppState>,
    Path(stall_id): Path<DbId>,
    AppQuery(params): AppQuery<StatusParams>,
) -> AppResult<impl IntoResponse> {
    ensure_stall(&state, stall_id).await?;
    let filter = RosterFilter::category(Category::PreListed).with_status(params.status);
    let data = list_scope(&state, RosterScope::Stall(stall_id), filter).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/stalls/{stall_id}/walkin?status=
pub async fn list_walk_ins_by_stall(
    State(state): State<AppState>,
    Path(stall_id): Path<DbId>,
    AppQuery(params): AppQuery<StatusParams>,
) -> AppResult<impl IntoResponse> {
    ensure_stall(&state, stall_id).await?;
    let filter = RosterFilter::category(Category::WalkIn).with_status(params.status);
    let data = list_scope(&state, RosterScope::Stall(stall_id), filter).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/stalls/{stall_id}/walkin/count
pub async fn count_walk_ins_by_stall(
    State(state): State<AppState>,
    Path(stall_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_stall(&state, stall_id).await?;
    let count = RosterRepo::count_walk_ins(&state.pool, RosterScope::Stall(stall_id)).await?;
    Ok(Json(DataResponse {
        data: CountResponse { count },
    }))
}

// ---------------------------------------------------------------------------
// Company scope
// ---------------------------------------------------------------------------

/// GET /api/v1/companies/{company_id}/interviews?category=&status=
///
/// Without a category: pre-listed requests first, then walk-ins.
pub async fn list_by_company(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    AppQuery(params): AppQuery<RosterParams>,
) -> AppResult<impl IntoResponse> {
    let data = list_scope(&state, RosterScope::Company(company_id), params.into()).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/companies/{company_id}/prelisted?status=
pub async fn list_prelisted_by_company(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    AppQuery(params): AppQuery<StatusParams>,
) -> AppResult<impl IntoResponse> {
    let filter = RosterFilter::category(Category::PreListed).with_status(params.status);
    let data = list_scope(&state, RosterScope::Company(company_id), filter).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/companies/{company_id}/prelisted/scheduled
pub async fn list_scheduled_prelisted_by_company(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let filter = RosterFilter::category(Category::PreListed).with_status(Some(InterviewStatus::Scheduled));
    let data = list_scope(&state, RosterScope::Company(company_id), filter).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/companies/{company_id}/walkin?status=
pub async fn list_walk_ins_by_company(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    AppQuery(params): AppQuery<StatusParams>,
) -> AppResult<impl IntoResponse> {
    let filter = RosterFilter::category(Category::WalkIn).with_status(params.status);
    let data = list_scope(&state, RosterScope::Company(company_id), filter).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/companies/{company_id}/walkin/scheduled
pub async fn list_scheduled_walk_ins_by_company(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let filter = RosterFilter::category(Category::WalkIn).with_status(Some(InterviewStatus::Scheduled));
    let data = list_scope(&state, RosterScope::Company(company_id), filter).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/companies/{company_id}/walkin/count
pub async fn count_walk_ins_by_company(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let count = RosterRepo::count_walk_ins(&state.pool, RosterScope::Company(company_id)).await?;
    Ok(Json(DataResponse {
        data: CountResponse { count },
    }))
}

/// GET /api/v1/companies/{company_id}/stalls/{stall_id}/walkin/next?count=N
///
/// The next scheduled walk-ins to call. Does not change their status.
pub async fn next_walk_ins(
    State(state): State<AppState>,
    Path((company_id, stall_id)): Path<(DbId, DbId)>,
    AppQuery(params): AppQuery<NextWalkInParams>,
) -> AppResult<impl IntoResponse> {
    let rows = RosterRepo::next_walk_ins(&state.pool, company_id, stall_id, params.count).await?;
    Ok(Json(DataResponse { data: views(rows) }))
}

// ---------------------------------------------------------------------------
// Student scope
// ---------------------------------------------------------------------------

/// GET /api/v1/students/{student_id}/interviews?category=&status=
pub async fn list_by_student(
    State(state): State<AppState>,
    Path(student_id): Path<DbId>,
    AppQuery(params): AppQuery<RosterParams>,
) -> AppResult<impl IntoResponse> {
    let data = list_scope(&state, RosterScope::Student(student_id), params.into()).await?;
    Ok(Json(DataResponse { data }))
}
