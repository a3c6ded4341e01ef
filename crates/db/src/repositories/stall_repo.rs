//! Read-only access to the `stalls` and `queues` tables.

use careerfair_core::error::CoreError;
use careerfair_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::error::RepoError;
use crate::models::stall::{ResolvedQueue, Stall, StallQueue};

/// Column list for `stalls` queries.
const COLUMNS: &str = "id, room_id, company_id, stall_number, status, created_at, updated_at";

/// Looks up stalls and the queue bound to each.
pub struct StallRepo;

impl StallRepo {
    /// Find a stall by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Stall>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stalls WHERE id = $1");
        sqlx::query_as::<_, Stall>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a stall together with its queue ID (if one was provisioned).
    pub async fn find_with_queue<'e, E>(
        executor: E,
        stall_id: DbId,
    ) -> Result<Option<StallQueue>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, StallQueue>(
            "SELECT s.id AS stall_id, s.room_id, s.company_id, q.id AS queue_id \
             FROM stalls s \
             LEFT JOIN queues q ON q.stall_id = s.id \
             WHERE s.id = $1",
        )
        .bind(stall_id)
        .fetch_optional(executor)
        .await
    }

    /// Resolve `stall_id` to its queue, failing with `NotFound` for a missing
    /// stall or a stall without a queue.
    pub async fn resolve_queue<'e, E>(executor: E, stall_id: DbId) -> Result<ResolvedQueue, RepoError>
    where
        E: PgExecutor<'e>,
    {
        let stall = Self::find_with_queue(executor, stall_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Stall",
                id: stall_id,
            })?;

        let queue_id = stall.queue_id.ok_or(CoreError::NotFound {
            entity: "Queue",
            id: stall_id,
        })?;

        Ok(ResolvedQueue {
            stall_id: stall.stall_id,
            company_id: stall.company_id,
            queue_id,
        })
    }
}
