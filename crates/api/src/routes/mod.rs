pub mod companies;
pub mod health;
pub mod interviews;
pub mod queue;
pub mod stalls;
pub mod students;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /queue/enqueue                                   enqueue (POST)
/// /queue/enqueue/bulk                              bulk enqueue (POST)
/// /queue/reset?confirm=true                        clear every queue (POST)
///
/// /stalls/{stall_id}/queue                         live view with buffer slots
/// /stalls/{stall_id}/queue/members                 active entries by position
/// /stalls/{stall_id}/prelisted                     pre-listed roster
/// /stalls/{stall_id}/walkin                        walk-in roster
/// /stalls/{stall_id}/walkin/count                  walk-in count
///
/// /companies/{company_id}/interviews               roster, optional ?category=
/// /companies/{company_id}/prelisted                pre-listed roster
/// /companies/{company_id}/walkin                   walk-in roster
/// /companies/{company_id}/walkin/count             walk-in count
/// /companies/{company_id}/stalls/{stall_id}/walkin/next?count=N
///
/// /students/{student_id}/interviews                roster, optional ?category=
///
/// /interviews/{id}                                 get
/// /interviews/{id}/start                           scheduled -> in_progress (POST)
/// /interviews/{id}/complete                        in_progress -> completed (POST)
/// /interviews/{id}/cancel                          active -> cancelled (POST)
/// /interviews/{id}/student-preference              set student rank (PUT)
/// /interviews/{id}/remark                          set remark (PUT)
/// /interviews/{id}/prelisted                       remove pre-listed (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/queue", queue::router())
        .nest("/stalls", stalls::router())
        .nest("/companies", companies::router())
        .nest("/students", students::router())
        .nest("/interviews", interviews::router())
}
