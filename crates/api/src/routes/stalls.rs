use axum::routing::get;
use axum::Router;

use crate::handlers::{queue, roster};
use crate::state::AppState;

/// Stall-scoped routes mounted at `/stalls`.
///
/// ```text
/// GET    /{stall_id}/queue              -> view_queue
/// GET    /{stall_id}/queue/members      -> list_queue_members
/// GET    /{stall_id}/prelisted          -> list_prelisted_by_stall
/// GET    /{stall_id}/walkin             -> list_walk_ins_by_stall
/// GET    /{stall_id}/walkin/count       -> count_walk_ins_by_stall
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{stall_id}/queue", get(queue::view_queue))
        .route("/{stall_id}/queue/members", get(queue::list_queue_members))
        .route("/{stall_id}/prelisted", get(roster::list_prelisted_by_stall))
        .route("/{stall_id}/walkin", get(roster::list_walk_ins_by_stall))
        .route("/{stall_id}/walkin/count", get(roster::count_walk_ins_by_stall))
}
