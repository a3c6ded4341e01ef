use axum::routing::get;
use axum::Router;

use crate::handlers::roster;
use crate::state::AppState;

/// Student-scoped routes mounted at `/students`.
///
/// ```text
/// GET    /{student_id}/interviews       -> list_by_student
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{student_id}/interviews", get(roster::list_by_student))
}
