//! Read-only listings of interview requests by stall, company or student.

use careerfair_core::error::CoreError;
use careerfair_core::lifecycle::InterviewStatus;
use careerfair_core::priority::Category;
use careerfair_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::interview_request::InterviewRequest;
use crate::repositories::interview_request_repo::COLUMNS;
use crate::repositories::StallRepo;

/// Pre-listed requests come first, by the student's ranking and then the
/// company's; walk-ins follow, first come first served. With a single
/// category this reduces to that category's ordering.
const ROSTER_ORDER: &str = "(category = 'walk_in') ASC, \
     CASE WHEN category = 'pre_listed' THEN student_preference END ASC, \
     CASE WHEN category = 'pre_listed' THEN company_preference END ASC, \
     created_at ASC, id ASC";

/// Walk-ins: first come, first served.
const WALK_IN_ORDER: &str = "created_at ASC, id ASC";

/// Upper bound on how many walk-ins one `next_walk_ins` call returns.
pub const MAX_NEXT_WALK_INS: i64 = 50;

/// The owner a listing is filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterScope {
    Stall(DbId),
    Company(DbId),
    Student(DbId),
}

impl RosterScope {
    fn column(self) -> &'static str {
        match self {
            Self::Stall(_) => "stall_id",
            Self::Company(_) => "company_id",
            Self::Student(_) => "student_id",
        }
    }

    fn id(self) -> DbId {
        match self {
            Self::Stall(id) | Self::Company(id) | Self::Student(id) => id,
        }
    }
}

/// Optional narrowing of a roster. `None` fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RosterFilter {
    pub category: Option<Category>,
    pub status: Option<InterviewStatus>,
}

impl RosterFilter {
    pub fn category(category: Category) -> Self {
        Self {
            category: Some(category),
            status: None,
        }
    }

    pub fn with_status(mut self, status: Option<InterviewStatus>) -> Self {
        self.status = status;
        self
    }
}

/// Provides the roster queries. Every status is included unless filtered.
pub struct RosterRepo;

impl RosterRepo {
    /// List requests within `scope` matching `filter`, in roster order.
    ///
    /// Both categories are read in one statement, so a listing never mixes
    /// two snapshots.
    pub async fn list(
        pool: &PgPool,
        scope: RosterScope,
        filter: RosterFilter,
    ) -> Result<Vec<InterviewRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM interview_requests \
             WHERE {} = $1 \
               AND ($2::TEXT IS NULL OR category = $2) \
               AND ($3::TEXT IS NULL OR status = $3) \
             ORDER BY {ROSTER_ORDER}",
            scope.column(),
        );
        sqlx::query_as::<_, InterviewRequest>(&query)
            .bind(scope.id())
            .bind(filter.category.map(|c| c.as_str()))
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await
    }

    /// Count walk-in requests within `scope`, in any status.
    pub async fn count_walk_ins(pool: &PgPool, scope: RosterScope) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM interview_requests WHERE {} = $1 AND category = $2",
            scope.column()
        );
        let row: (i64,) = sqlx::query_as(&query)
            .bind(scope.id())
            .bind(Category::WalkIn.as_str())
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// The next `count` scheduled walk-ins at a company's stall, oldest first.
    ///
    /// `count` is clamped to [`MAX_NEXT_WALK_INS`]. Nothing is modified.
    pub async fn next_walk_ins(
        pool: &PgPool,
        company_id: DbId,
        stall_id: DbId,
        count: i64,
    ) -> Result<Vec<InterviewRequest>, RepoError> {
        if count < 1 {
            return Err(CoreError::Validation("count must be at least 1".to_string()).into());
        }

        let stall = StallRepo::find_by_id(pool, stall_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Stall",
                id: stall_id,
            })?;
        if stall.company_id != company_id {
            return Err(CoreError::Validation(format!(
                "Stall {stall_id} does not belong to company {company_id}"
            ))
            .into());
        }

        let query = format!(
            "SELECT {COLUMNS} FROM interview_requests \
             WHERE stall_id = $1 AND category = $2 AND status = $3 \
             ORDER BY {WALK_IN_ORDER} \
             LIMIT $4"
        );
        let requests = sqlx::query_as::<_, InterviewRequest>(&query)
            .bind(stall_id)
            .bind(Category::WalkIn.as_str())
            .bind(InterviewStatus::Scheduled.as_str())
            .bind(count.min(MAX_NEXT_WALK_INS))
            .fetch_all(pool)
            .await?;
        Ok(requests)
    }
}
