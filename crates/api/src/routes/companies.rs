use axum::routing::get;
use axum::Router;

use crate::handlers::roster;
use crate::state::AppState;

/// Company-scoped routes mounted at `/companies`.
///
/// ```text
/// GET    /{company_id}/interviews                         -> list_by_company
/// GET    /{company_id}/prelisted                          -> list_prelisted_by_company
/// GET    /{company_id}/prelisted/scheduled                -> list_scheduled_prelisted_by_company
/// GET    /{company_id}/walkin                             -> list_walk_ins_by_company
/// GET    /{company_id}/walkin/scheduled                   -> list_scheduled_walk_ins_by_company
/// GET    /{company_id}/walkin/count                       -> count_walk_ins_by_company
/// GET    /{company_id}/stalls/{stall_id}/walkin/next      -> next_walk_ins
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{company_id}/interviews", get(roster::list_by_company))
        .route("/{company_id}/prelisted", get(roster::list_prelisted_by_company))
        .route(
            "/{company_id}/prelisted/scheduled",
            get(roster::list_scheduled_prelisted_by_company),
        )
        .route("/{company_id}/walkin", get(roster::list_walk_ins_by_company))
        .route(
            "/{company_id}/walkin/scheduled",
            get(roster::list_scheduled_walk_ins_by_company),
        )
        .route("/{company_id}/walkin/count", get(roster::count_walk_ins_by_company))
        .route(
            "/{company_id}/stalls/{stall_id}/walkin/next",
            get(roster::next_walk_ins),
        )
}
