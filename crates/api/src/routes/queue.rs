use axum::routing::post;
use axum::Router;

use crate::handlers::queue;
use crate::state::AppState;

/// Admission routes mounted at `/queue`.
///
/// ```text
/// POST   /enqueue           -> enqueue
/// POST   /enqueue/bulk      -> bulk_enqueue
/// POST   /reset             -> reset_queues
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/enqueue", post(queue::enqueue))
        .route("/enqueue/bulk", post(queue::bulk_enqueue))
        .route("/reset", post(queue::reset_queues))
}
