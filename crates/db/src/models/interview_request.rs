//! Interview request rows and DTOs for the stall queue scheduler.

use careerfair_core::error::CoreError;
use careerfair_core::lifecycle::InterviewStatus;
use careerfair_core::priority::{encode_priority, Category, PriorityToken, Tier};
use careerfair_core::queue_order::ActiveEntry;
use careerfair_core::queue_view::QueueMember;
use careerfair_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `interview_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InterviewRequest {
    pub id: DbId,
    pub stall_id: DbId,
    pub queue_id: DbId,
    pub company_id: DbId,
    pub student_id: DbId,
    pub cv_reference: Option<String>,
    #[sqlx(try_from = "String")]
    pub category: Category,
    #[sqlx(try_from = "String")]
    pub tier: Tier,
    #[sqlx(try_from = "String")]
    pub status: InterviewStatus,
    /// Dense rank within the queue; `None` once completed or cancelled.
    pub position: Option<i32>,
    pub student_preference: i32,
    pub company_preference: i32,
    pub scheduled_time: Timestamp,
    pub actual_time: Option<Timestamp>,
    pub remark: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl InterviewRequest {
    /// The planner's view of this row, if it holds a queue position.
    pub fn active_entry(&self) -> Option<ActiveEntry> {
        match (self.status.is_active(), self.position) {
            (true, Some(position)) => Some(ActiveEntry {
                id: self.id,
                tier: self.tier,
                position,
            }),
            _ => None,
        }
    }

    /// Compact `<student>_<company>_<round>` token for this request.
    pub fn priority_token(&self) -> String {
        encode_priority(self.student_id, &self.company_id.to_string(), self.tier)
    }
}

impl QueueMember for InterviewRequest {
    fn tier(&self) -> Tier {
        self.tier
    }
}

/// Outward representation of a request: the row plus its priority token.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewView {
    #[serde(flatten)]
    pub request: InterviewRequest,
    pub priority_token: String,
}

impl From<InterviewRequest> for InterviewView {
    fn from(request: InterviewRequest) -> Self {
        let priority_token = request.priority_token();
        Self {
            request,
            priority_token,
        }
    }
}

impl QueueMember for InterviewView {
    fn tier(&self) -> Tier {
        self.request.tier
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// DTO for `POST /api/v1/queue/enqueue` (and each item of the bulk variant).
///
/// The tier comes either from `category` + `round` or from a `priority`
/// token; when both are given they must agree.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EnqueueInterview {
    pub stall_id: DbId,
    pub student_id: DbId,
    pub category: Option<Category>,
    #[validate(range(min = 1, max = 3))]
    pub round: Option<u8>,
    #[validate(length(min = 1, max = 64))]
    pub priority: Option<String>,
    /// Defaults to the time of admission.
    pub scheduled_time: Option<Timestamp>,
    #[validate(length(min = 1, max = 2048))]
    pub cv_reference: Option<String>,
}

impl EnqueueInterview {
    /// Resolve the tier of this request for a stall owned by `company_id`.
    pub fn resolve_tier(&self, company_id: DbId) -> Result<Tier, CoreError> {
        let Some(raw) = self.priority.as_deref() else {
            let category = self.category.ok_or_else(|| {
                CoreError::Validation(
                    "Either category or priority must be provided".to_string(),
                )
            })?;
            return Tier::for_request(category, self.round);
        };

        let token = PriorityToken::decode(raw)?;
        if token.student_id != self.student_id {
            return Err(CoreError::Validation(format!(
                "Priority token is for student {}, not {}",
                token.student_id, self.student_id
            )));
        }
        if token.company_code != company_id.to_string() {
            return Err(CoreError::Validation(format!(
                "Priority token is for company '{}', but the stall belongs to company {company_id}",
                token.company_code
            )));
        }

        let token_category = token.tier.category().ok_or_else(|| {
            CoreError::Validation("Buffer tokens cannot be enqueued".to_string())
        })?;
        if let Some(category) = self.category {
            if category != token_category {
                return Err(CoreError::Validation(format!(
                    "Category '{}' does not match priority token '{raw}'",
                    category.as_str()
                )));
            }
        }
        if let (Some(round), Some(token_round)) = (self.round, token.tier.round()) {
            if round != token_round {
                return Err(CoreError::Validation(format!(
                    "Round {round} does not match priority token '{raw}'"
                )));
            }
        }

        Ok(token.tier)
    }
}

/// DTO for `PUT /api/v1/interviews/{id}/student-preference`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetStudentPreference {
    #[validate(range(min = 1))]
    pub preference: i32,
}

/// DTO for `PUT /api/v1/interviews/{id}/remark`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetRemark {
    #[validate(length(max = 2000))]
    pub remark: Option<String>,
}

/// Outcome of an enqueue call.
#[derive(Debug, Clone)]
pub struct EnqueueOutcome {
    pub request: InterviewRequest,
    /// `false` when an identical active request already existed.
    pub created: bool,
}
