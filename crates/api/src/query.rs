//! Query parameter types shared by handler modules.

use careerfair_core::lifecycle::InterviewStatus;
use careerfair_core::priority::Category;
use careerfair_db::repositories::RosterFilter;
use serde::Deserialize;

/// Optional `?category=pre_listed|walk_in&status=...` filters for roster
/// listings that span both categories.
#[derive(Debug, Deserialize)]
pub struct RosterParams {
    pub category: Option<Category>,
    pub status: Option<InterviewStatus>,
}

impl From<RosterParams> for RosterFilter {
    fn from(params: RosterParams) -> Self {
        Self {
            category: params.category,
            status: params.status,
        }
    }
}

/// Optional `?status=...` filter for single-category rosters.
#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: Option<InterviewStatus>,
}

/// `?count=N` for walk-in lookahead. Defaults to one.
#[derive(Debug, Deserialize)]
pub struct NextWalkInParams {
    #[serde(default = "default_count")]
    pub count: i64,
}

fn default_count() -> i64 {
    1
}

/// `?confirm=true` guard for destructive administrative calls.
#[derive(Debug, Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub confirm: bool,
}
