use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::interviews;
use crate::state::AppState;

/// Per-request routes mounted at `/interviews`.
///
/// ```text
/// GET    /{id}                      -> get_interview
/// POST   /{id}/start                -> start_interview
/// POST   /{id}/complete             -> complete_interview
/// POST   /{id}/cancel               -> cancel_interview
/// PUT    /{id}/student-preference   -> set_student_preference
/// PUT    /{id}/remark               -> set_remark
/// DELETE /{id}/prelisted            -> remove_prelisted
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(interviews::get_interview))
        .route("/{id}/start", post(interviews::start_interview))
        .route("/{id}/complete", post(interviews::complete_interview))
        .route("/{id}/cancel", post(interviews::cancel_interview))
        .route(
            "/{id}/student-preference",
            put(interviews::set_student_preference),
        )
        .route("/{id}/remark", put(interviews::set_remark))
        .route("/{id}/prelisted", delete(interviews::remove_prelisted))
}
