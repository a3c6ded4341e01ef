//! Repository for the `interview_requests` table.
//!
//! Every write that touches queue positions runs in one transaction that
//! first takes a row lock on the owning `queues` row. Writers on the same
//! queue are serialised by that lock; different queues proceed in parallel.
//! Readers use single statements and never observe a half-renumbered queue.

use careerfair_core::error::CoreError;
use careerfair_core::lifecycle::{self, InterviewStatus, LifecycleAction};
use careerfair_core::priority::{Category, Tier};
use careerfair_core::queue_order::{self, ActiveEntry, PositionAssignment};
use careerfair_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::error::RepoError;
use crate::models::interview_request::{EnqueueInterview, EnqueueOutcome, InterviewRequest};
use crate::repositories::StallRepo;

/// Column list for `interview_requests` queries.
pub(crate) const COLUMNS: &str = "\
    id, stall_id, queue_id, company_id, student_id, cv_reference, \
    category, tier, status, position, student_preference, company_preference, \
    scheduled_time, actual_time, remark, created_at, updated_at";

/// Preference rank given to requests nobody has ranked yet.
pub const DEFAULT_PREFERENCE: i32 = 999;

/// Provides admission, lifecycle, and renumbering operations for queue entries.
pub struct InterviewRequestRepo;

impl InterviewRequestRepo {
    // ── Reads ────────────────────────────────────────────────────────

    /// Find a request by its ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<InterviewRequest>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM interview_requests WHERE id = $1");
        sqlx::query_as::<_, InterviewRequest>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List the active entries of a queue ordered by position.
    pub async fn list_active_by_queue<'e, E>(
        executor: E,
        queue_id: DbId,
    ) -> Result<Vec<InterviewRequest>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM interview_requests \
             WHERE queue_id = $1 AND status IN ('scheduled', 'in_progress') \
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, InterviewRequest>(&query)
            .bind(queue_id)
            .fetch_all(executor)
            .await
    }

    // ── Admission ────────────────────────────────────────────────────

    /// Admit a request into its stall's queue.
    ///
    /// Resolves the stall, enforces the round gate, places the request at the
    /// end of its tier's run and renumbers the queue, all in one transaction.
    /// A repeated call for the same `(student, stall, tier)` while the earlier
    /// request is still active returns that request with `created = false`.
    pub async fn enqueue(pool: &PgPool, input: &EnqueueInterview) -> Result<EnqueueOutcome, RepoError> {
        let mut tx = pool.begin().await?;

        let queue = StallRepo::resolve_queue(&mut *tx, input.stall_id).await?;
        let tier = input.resolve_tier(queue.company_id)?;
        let category = tier.category().ok_or_else(|| {
            CoreError::Validation("Buffer is a display-only tier and cannot be enqueued".to_string())
        })?;

        Self::lock_queue(&mut tx, queue.queue_id).await?;

        if let Some(existing) =
            Self::find_active_for_student(&mut tx, input.student_id, input.stall_id, tier).await?
        {
            tx.commit().await?;
            tracing::info!(
                request_id = existing.id,
                stall_id = input.stall_id,
                student_id = input.student_id,
                tier = tier.as_str(),
                "Enqueue matched an existing active request",
            );
            return Ok(EnqueueOutcome {
                request: existing,
                created: false,
            });
        }

        let prior = match tier.preceding() {
            Some(prior_tier) => {
                Self::find_completed_for_student(&mut tx, input.student_id, input.stall_id, prior_tier)
                    .await?
            }
            None => None,
        };
        if let Err(err) = queue_order::check_round_gate(tier, prior.is_some()) {
            tracing::warn!(
                stall_id = input.stall_id,
                student_id = input.student_id,
                tier = tier.as_str(),
                "Enqueue rejected by round gate",
            );
            return Err(err.into());
        }

        let active = Self::list_active_by_queue(&mut *tx, queue.queue_id).await?;
        let entries: Vec<ActiveEntry> = active.iter().filter_map(InterviewRequest::active_entry).collect();
        let plan = queue_order::plan_insertion(&entries, tier)?;
        Self::apply_positions(&mut tx, &plan.shifted).await?;

        // Later rounds inherit the ranks of the round the student completed.
        let (student_preference, company_preference) = match (&prior, tier) {
            (Some(p), _) => (p.student_preference, p.company_preference),
            (None, Tier::Round1) => {
                Self::lock_company_preferences(&mut tx, queue.company_id).await?;
                let next = Self::next_company_preference(&mut tx, queue.company_id).await?;
                (DEFAULT_PREFERENCE, next)
            }
            (None, _) => (DEFAULT_PREFERENCE, DEFAULT_PREFERENCE),
        };

        let query = format!(
            "INSERT INTO interview_requests \
                 (stall_id, queue_id, company_id, student_id, cv_reference, category, tier, \
                  status, position, student_preference, company_preference, scheduled_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, COALESCE($12, NOW())) \
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, InterviewRequest>(&query)
            .bind(queue.stall_id)
            .bind(queue.queue_id)
            .bind(queue.company_id)
            .bind(input.student_id)
            .bind(&input.cv_reference)
            .bind(category.as_str())
            .bind(tier.as_str())
            .bind(InterviewStatus::Scheduled.as_str())
            .bind(plan.position)
            .bind(student_preference)
            .bind(company_preference)
            .bind(input.scheduled_time)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            request_id = request.id,
            stall_id = queue.stall_id,
            queue_id = queue.queue_id,
            student_id = request.student_id,
            tier = tier.as_str(),
            position = plan.position,
            shifted = plan.shifted.len(),
            "Interview request enqueued",
        );

        Ok(EnqueueOutcome {
            request,
            created: true,
        })
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Move a request through the status state machine.
    ///
    /// Leaving the active set clears the request's position and renumbers the
    /// remaining entries of its queue. Rejected transitions change nothing.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        action: LifecycleAction,
    ) -> Result<InterviewRequest, RepoError> {
        let not_found = || CoreError::NotFound {
            entity: "InterviewRequest",
            id,
        };

        let mut tx = pool.begin().await?;

        let queue_id = Self::find_queue_id(&mut tx, id).await?.ok_or_else(not_found)?;
        Self::lock_queue(&mut tx, queue_id).await?;

        // Re-read under the queue lock; the status may have moved meanwhile.
        let current = Self::find_by_id(&mut *tx, id).await?.ok_or_else(not_found)?;
        let transition = lifecycle::apply(current.status, action)?;
        let position = if transition.releases_position() {
            None
        } else {
            current.position
        };

        let query = format!(
            "UPDATE interview_requests SET \
                status = $2, \
                position = $3, \
                actual_time = CASE WHEN $4 THEN NOW() ELSE actual_time END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, InterviewRequest>(&query)
            .bind(id)
            .bind(transition.to.as_str())
            .bind(position)
            .bind(action == LifecycleAction::Start)
            .fetch_one(&mut *tx)
            .await?;

        let renumbered = if transition.releases_position() {
            Self::renumber_queue(&mut tx, queue_id).await?
        } else {
            0
        };

        tx.commit().await?;

        tracing::info!(
            request_id = id,
            queue_id,
            from = transition.from.as_str(),
            to = transition.to.as_str(),
            renumbered,
            "Interview status changed",
        );

        Ok(updated)
    }

    /// `scheduled -> in_progress`.
    pub async fn start(pool: &PgPool, id: DbId) -> Result<InterviewRequest, RepoError> {
        Self::transition(pool, id, LifecycleAction::Start).await
    }

    /// `in_progress -> completed`. Unblocks the student's next round.
    pub async fn complete(pool: &PgPool, id: DbId) -> Result<InterviewRequest, RepoError> {
        Self::transition(pool, id, LifecycleAction::Finish).await
    }

    /// `scheduled | in_progress -> cancelled`.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<InterviewRequest, RepoError> {
        Self::transition(pool, id, LifecycleAction::Cancel).await
    }

    // ── Record maintenance ───────────────────────────────────────────

    /// Set the student's own preference rank. Returns `None` if not found.
    pub async fn set_student_preference(
        pool: &PgPool,
        id: DbId,
        preference: i32,
    ) -> Result<Option<InterviewRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE interview_requests SET student_preference = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InterviewRequest>(&query)
            .bind(id)
            .bind(preference)
            .fetch_optional(pool)
            .await
    }

    /// Replace the remark on a request. Returns `None` if not found.
    pub async fn set_remark(
        pool: &PgPool,
        id: DbId,
        remark: Option<&str>,
    ) -> Result<Option<InterviewRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE interview_requests SET remark = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InterviewRequest>(&query)
            .bind(id)
            .bind(remark)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a pre-listed request.
    ///
    /// Re-ranks the company's remaining round-1 pre-listed requests to
    /// `1..=M` and, if the removed request was active, renumbers its queue.
    /// A completed request that is the only admission evidence for a later
    /// round of the same student at the same stall cannot be removed.
    pub async fn remove_prelisted(pool: &PgPool, id: DbId) -> Result<InterviewRequest, RepoError> {
        let not_found = || CoreError::NotFound {
            entity: "PreListedInterview",
            id,
        };

        let mut tx = pool.begin().await?;

        let queue_id = Self::find_queue_id(&mut tx, id).await?.ok_or_else(not_found)?;
        Self::lock_queue(&mut tx, queue_id).await?;

        // Later rounds at this stall are admitted under the same queue lock.
        let current = Self::find_by_id(&mut *tx, id).await?.ok_or_else(not_found)?;
        if current.category != Category::PreListed {
            return Err(not_found().into());
        }
        if Self::unlocks_later_round(&mut tx, &current).await? {
            tracing::warn!(
                request_id = id,
                student_id = current.student_id,
                stall_id = current.stall_id,
                tier = current.tier.as_str(),
                "Removal rejected: request unlocks a later round",
            );
            return Err(CoreError::Validation(format!(
                "Interview {id} is the completed {} interview a later round of student {} depends on",
                current.tier.as_str(),
                current.student_id
            ))
            .into());
        }

        let query = format!(
            "DELETE FROM interview_requests WHERE id = $1 AND category = $2 RETURNING {COLUMNS}"
        );
        let removed = sqlx::query_as::<_, InterviewRequest>(&query)
            .bind(id)
            .bind(Category::PreListed.as_str())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(not_found)?;

        Self::lock_company_preferences(&mut tx, removed.company_id).await?;
        let reranked = Self::renumber_company_preferences(&mut tx, removed.company_id).await?;

        let renumbered = if removed.status.is_active() {
            Self::renumber_queue(&mut tx, queue_id).await?
        } else {
            0
        };

        tx.commit().await?;

        tracing::info!(
            request_id = id,
            company_id = removed.company_id,
            queue_id,
            reranked,
            renumbered,
            "Pre-listed interview removed",
        );

        Ok(removed)
    }

    /// Delete every interview request in every queue. Returns the row count.
    ///
    /// Takes every queue lock (in ID order) so no admission interleaves.
    pub async fn reset_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM queues ORDER BY id FOR UPDATE")
            .fetch_all(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM interview_requests")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    // ── Transaction helpers ──────────────────────────────────────────

    /// Take the per-queue write lock for the rest of the transaction.
    async fn lock_queue(conn: &mut PgConnection, queue_id: DbId) -> Result<(), RepoError> {
        let locked: Option<(DbId,)> = sqlx::query_as("SELECT id FROM queues WHERE id = $1 FOR UPDATE")
            .bind(queue_id)
            .fetch_optional(&mut *conn)
            .await?;
        locked.map(|_| ()).ok_or_else(|| {
            CoreError::NotFound {
                entity: "Queue",
                id: queue_id,
            }
            .into()
        })
    }

    /// Serialise company-wide preference ranking for the rest of the transaction.
    async fn lock_company_preferences(
        conn: &mut PgConnection,
        company_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(company_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    async fn find_queue_id(conn: &mut PgConnection, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT queue_id FROM interview_requests WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(row.map(|(queue_id,)| queue_id))
    }

    async fn find_active_for_student(
        conn: &mut PgConnection,
        student_id: DbId,
        stall_id: DbId,
        tier: Tier,
    ) -> Result<Option<InterviewRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM interview_requests \
             WHERE student_id = $1 AND stall_id = $2 AND tier = $3 \
               AND status IN ('scheduled', 'in_progress')"
        );
        sqlx::query_as::<_, InterviewRequest>(&query)
            .bind(student_id)
            .bind(stall_id)
            .bind(tier.as_str())
            .fetch_optional(&mut *conn)
            .await
    }

    async fn find_completed_for_student(
        conn: &mut PgConnection,
        student_id: DbId,
        stall_id: DbId,
        tier: Tier,
    ) -> Result<Option<InterviewRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM interview_requests \
             WHERE student_id = $1 AND stall_id = $2 AND tier = $3 AND status = $4 \
             ORDER BY updated_at DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, InterviewRequest>(&query)
            .bind(student_id)
            .bind(stall_id)
            .bind(tier.as_str())
            .bind(InterviewStatus::Completed.as_str())
            .fetch_optional(&mut *conn)
            .await
    }

    /// Whether removing `request` would leave a later-round request of the
    /// same student at the same stall without a completed preceding round.
    async fn unlocks_later_round(
        conn: &mut PgConnection,
        request: &InterviewRequest,
    ) -> Result<bool, sqlx::Error> {
        let Some(next_tier) = request.tier.following() else {
            return Ok(false);
        };
        if request.status != InterviewStatus::Completed {
            return Ok(false);
        }

        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS ( \
                 SELECT 1 FROM interview_requests \
                 WHERE student_id = $1 AND stall_id = $2 AND tier = $3 \
             ) AND NOT EXISTS ( \
                 SELECT 1 FROM interview_requests \
                 WHERE student_id = $1 AND stall_id = $2 AND tier = $4 \
                   AND status = $5 AND id <> $6 \
             )",
        )
        .bind(request.student_id)
        .bind(request.stall_id)
        .bind(next_tier.as_str())
        .bind(request.tier.as_str())
        .bind(InterviewStatus::Completed.as_str())
        .bind(request.id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row.0)
    }

    async fn next_company_preference(
        conn: &mut PgConnection,
        company_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        let row: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(company_preference), 0) + 1 FROM interview_requests \
             WHERE company_id = $1 AND category = $2 AND tier = $3",
        )
        .bind(company_id)
        .bind(Category::PreListed.as_str())
        .bind(Tier::Round1.as_str())
        .fetch_one(&mut *conn)
        .await?;
        Ok(row.0)
    }

    /// Compact the company's round-1 pre-listed ranks to `1..=M`.
    async fn renumber_company_preferences(
        conn: &mut PgConnection,
        company_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE interview_requests AS ir \
             SET company_preference = ranked.new_rank, updated_at = NOW() \
             FROM ( \
                 SELECT id, \
                        (ROW_NUMBER() OVER (ORDER BY company_preference, created_at, id))::INTEGER \
                            AS new_rank \
                 FROM interview_requests \
                 WHERE company_id = $1 AND category = $2 AND tier = $3 \
             ) AS ranked \
             WHERE ir.id = ranked.id AND ir.company_preference <> ranked.new_rank",
        )
        .bind(company_id)
        .bind(Category::PreListed.as_str())
        .bind(Tier::Round1.as_str())
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Restore dense positions over the queue's active entries.
    async fn renumber_queue(conn: &mut PgConnection, queue_id: DbId) -> Result<usize, sqlx::Error> {
        let active = Self::list_active_by_queue(&mut *conn, queue_id).await?;
        let entries: Vec<ActiveEntry> = active.iter().filter_map(InterviewRequest::active_entry).collect();
        let assignments = queue_order::renumber(&entries);
        Self::apply_positions(conn, &assignments).await?;
        Ok(assignments.len())
    }

    async fn apply_positions(
        conn: &mut PgConnection,
        assignments: &[PositionAssignment],
    ) -> Result<(), sqlx::Error> {
        if assignments.is_empty() {
            return Ok(());
        }

        let ids: Vec<DbId> = assignments.iter().map(|a| a.id).collect();
        let positions: Vec<i32> = assignments.iter().map(|a| a.position).collect();

        sqlx::query(
            "UPDATE interview_requests AS ir \
             SET position = v.position, updated_at = NOW() \
             FROM UNNEST($1::BIGINT[], $2::INTEGER[]) AS v(id, position) \
             WHERE ir.id = v.id",
        )
        .bind(&ids)
        .bind(&positions)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
